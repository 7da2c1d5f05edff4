// src/api/types.rs
use std::collections::BTreeMap;
use serde::{Deserialize, Deserializer, Serialize};

// Requests
#[derive(Serialize, Debug)]
pub struct AnalyseRequest<'a> {
    /// Password to analyse
    pub password: &'a str,
}

#[derive(Serialize, Debug)]
pub struct PassphraseRequest<'a> {
    /// Memorable words or phrases, already trimmed and non-empty
    pub phrases: &'a [String],
}

/// Crack-time estimates keyed by attack model, in hours.
pub type CrackTimes = BTreeMap<String, f64>;

// Single password analysis
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PasswordAnalysisResult {
    #[serde(default)]
    pub original_password: String,
    /// Strength ratio of the submitted password (0-1)
    pub strength: f64,
    /// Strength ratio of the suggested password (0-1)
    #[serde(default, alias = "suggested_strength")]
    pub new_strength: f64,
    #[serde(default)]
    pub suggested_password: Option<String>,
    #[serde(default, rename = "time_to_crack", deserialize_with = "deserialize_crack_times")]
    pub crack_times: CrackTimes,
    #[serde(default, rename = "new_time_to_crack", deserialize_with = "deserialize_crack_times")]
    pub new_crack_times: CrackTimes,
    #[serde(default, rename = "vulnerabilities_detected", alias = "vulnerabilities")]
    pub vulnerabilities: Vec<String>,
    #[serde(default, rename = "improvement_suggestions", alias = "suggestions")]
    pub suggestions: Vec<String>,
}

// Passphrase generation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PassphraseResult {
    pub passphrase: String,
    pub strength: f64,
    #[serde(default, rename = "time_to_crack", deserialize_with = "deserialize_crack_times")]
    pub crack_times: CrackTimes,
}

// Bulk password analysis
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PasswordDetail {
    pub password: String,
    /// String-encoded strength as sent by the backend
    #[serde(deserialize_with = "string_or_number")]
    pub strength: String,
    #[serde(default)]
    pub issues: String,
    #[serde(default)]
    pub suggested_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BulkAnalysisResult {
    pub total_passwords_analyzed: u64,
    pub weak_passwords: u64,
    pub moderate_passwords: u64,
    pub strong_passwords: u64,
    pub download_link: String,
    #[serde(default)]
    pub password_details: Option<Vec<PasswordDetail>>,
}

// Bulk PII analysis
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiiStatistics {
    pub matched_passwords: u64,
    pub not_matched_passwords: u64,
    pub total_passwords: u64,
}

impl PiiStatistics {
    pub fn is_consistent(&self) -> bool {
        self.matched_passwords.checked_add(self.not_matched_passwords) == Some(self.total_passwords)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BulkPiiResult {
    pub download_url: String,
    #[serde(default)]
    pub message: String,
    pub statistics: PiiStatistics,
}

// Security insights
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub header: String,
    pub quote: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct InsightsResult {
    #[serde(default)]
    pub insights: Vec<Insight>,
}

// A single estimate is either plain hours or a days/minutes split
#[derive(Deserialize)]
#[serde(untagged)]
enum CrackTimeValue {
    Hours(f64),
    Split {
        #[serde(default)]
        days: f64,
        #[serde(default)]
        minutes: f64,
    },
}

impl CrackTimeValue {
    fn hours(&self) -> f64 {
        match self {
            CrackTimeValue::Hours(hours) => *hours,
            CrackTimeValue::Split { days, minutes } => days * 24.0 + minutes / 60.0,
        }
    }
}

// The crack-time service nests estimates under `crack_times`
#[derive(Deserialize)]
#[serde(untagged)]
enum CrackTimeBlock {
    Nested { crack_times: BTreeMap<String, CrackTimeValue> },
    Flat(BTreeMap<String, CrackTimeValue>),
}

fn deserialize_crack_times<'de, D>(deserializer: D) -> Result<CrackTimes, D::Error>
where
    D: Deserializer<'de>,
{
    let block = Option::<CrackTimeBlock>::deserialize(deserializer)?;

    let estimates = match block {
        Some(CrackTimeBlock::Nested { crack_times }) => crack_times,
        Some(CrackTimeBlock::Flat(map)) => map,
        None => return Ok(CrackTimes::new()),
    };

    Ok(estimates
        .into_iter()
        .map(|(attack, value)| (attack, value.hours().max(0.0)))
        .collect())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
    })
}
