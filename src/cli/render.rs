// src/cli/render.rs
//
// Terminal rendering of controller results. Everything returns a String so
// the menu and one-shot commands print the same text.
use std::fmt::Write as _;
use console::{style, Style};
use serde::Serialize;

use crate::api::types::{
    BulkAnalysisResult, BulkPiiResult, CrackTimes, InsightsResult, PassphraseResult,
    PasswordAnalysisResult,
};
use crate::controllers::{Notifier, Toast, ToastVariant};
use crate::utils::{
    crack_time_bar_percent, format_large_number, humanize_crack_time, improvement_percentage, parse_strength,
    share_percent, strength_percent, truncate_string, CrackTimeLevel, SecurityRating,
};

const METER_WIDTH: usize = 20;
const BAR_WIDTH: usize = 24;

/// Prints toasts to stderr, or only logs them when `quiet`.
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Default => log::info!("{}: {}", toast.title, toast.description),
            ToastVariant::Destructive => log::warn!("{}: {}", toast.title, toast.description),
        }

        if self.quiet {
            return;
        }

        match toast.variant {
            ToastVariant::Default => eprintln!("✅ {} {}", style(&toast.title).green().bold(), toast.description),
            ToastVariant::Destructive => eprintln!("❌ {} {}", style(&toast.title).red().bold(), toast.description),
        }
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

pub fn error_line(message: &str) -> String {
    format!("❌ {}", style(message).red())
}

pub fn warning_line(message: &str) -> String {
    format!("⚠️ {}", style(message).yellow())
}

fn meter(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn strength_line(label: &str, strength: f64) -> String {
    let rating = SecurityRating::from_strength(strength);
    let percent = strength_percent(strength);
    format!(
        "  {:<14} {} {:>3}%  {}",
        label,
        rating.style().apply_to(meter(percent as f64, METER_WIDTH)),
        percent,
        rating.style().apply_to(rating.label())
    )
}

// "offline_brute_force" -> "Offline brute force"
fn attack_name(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn max_hours(maps: &[&CrackTimes]) -> f64 {
    maps.iter()
        .flat_map(|m| m.values())
        .copied()
        .filter(|h| h.is_finite())
        .fold(0.0, f64::max)
}

fn crack_time_rows(out: &mut String, times: &CrackTimes, max: f64) {
    if times.is_empty() {
        let _ = writeln!(out, "  {}", style("No crack-time estimates returned").dim());
        return;
    }

    let name_width = times.keys().map(|k| k.len()).max().unwrap_or(0).max(10);
    for (attack, hours) in times {
        let label = humanize_crack_time(Some(*hours));
        let level = CrackTimeLevel::from_label(&label);
        let level_style = Style::new().fg(level.color());
        let bar = meter(crack_time_bar_percent(*hours, max), BAR_WIDTH);

        let _ = writeln!(
            out,
            "  {:<width$}  {}  {:<18} {}",
            attack_name(attack),
            level_style.apply_to(bar),
            label,
            level_style.apply_to(level.label()),
            width = name_width
        );
    }
}

fn bullet_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{}", style(heading).bold());
    for item in items {
        let _ = writeln!(out, "  • {}", item);
    }
}

pub fn analysis(result: &PasswordAnalysisResult) -> String {
    let mut out = String::new();
    let max = max_hours(&[&result.crack_times, &result.new_crack_times]);

    let _ = writeln!(out, "{}", style("🔍 Password Analysis").cyan().bold());
    let _ = writeln!(out, "{}", strength_line("Current", result.strength));

    if let Some(suggested) = &result.suggested_password {
        let _ = writeln!(out, "{}", strength_line("Suggested", result.new_strength));
        let _ = writeln!(out, "  {:<14} {}", "Password", style(suggested).green().bold());
        let _ = writeln!(
            out,
            "  {:<14} +{}%",
            "Improvement",
            improvement_percentage(result.strength, result.new_strength)
        );
    }

    let _ = writeln!(out, "\n{}", style("Time to crack (current)").bold());
    crack_time_rows(&mut out, &result.crack_times, max);

    if result.suggested_password.is_some() {
        let _ = writeln!(out, "\n{}", style("Time to crack (suggested)").bold());
        crack_time_rows(&mut out, &result.new_crack_times, max);
    }

    bullet_list(&mut out, "Vulnerabilities", &result.vulnerabilities);
    bullet_list(&mut out, "Suggestions", &result.suggestions);
    out
}

pub fn passphrase(result: &PassphraseResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", style("🔐 Generated Passphrase").cyan().bold());
    let _ = writeln!(out, "  {}", style(&result.passphrase).green().bold());
    let _ = writeln!(out, "{}", strength_line("Strength", result.strength));

    if !result.crack_times.is_empty() {
        let _ = writeln!(out, "\n{}", style("Time to crack").bold());
        crack_time_rows(&mut out, &result.crack_times, max_hours(&[&result.crack_times]));
    }
    out
}

pub fn bulk(result: &BulkAnalysisResult) -> String {
    let mut out = String::new();
    let total = result.total_passwords_analyzed;

    let _ = writeln!(out, "{}", style("📊 Bulk Analysis").cyan().bold());
    let _ = writeln!(out, "  Passwords analyzed: {}", style(format_large_number(&total.to_string())).bold());

    let buckets = [
        ("Weak", result.weak_passwords, SecurityRating::VeryWeak),
        ("Moderate", result.moderate_passwords, SecurityRating::Moderate),
        ("Strong", result.strong_passwords, SecurityRating::VeryStrong),
    ];
    for (label, count, rating) in buckets {
        let share = share_percent(count, total);
        let _ = writeln!(
            out,
            "  {:<9} {} {:>5.1}%  ({})",
            label,
            rating.style().apply_to(meter(share, BAR_WIDTH)),
            share,
            count
        );
    }

    if let Some(details) = result.password_details.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "\n{}", style("Details").bold());
        for detail in details {
            let rating = parse_strength(&detail.strength)
                .map(SecurityRating::from_strength)
                .map(|r| r.style().apply_to(r.label()).to_string())
                .unwrap_or_else(|| detail.strength.clone());

            let issues: Vec<&str> = detail.issues.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
            let _ = writeln!(
                out,
                "  {:<24} {:<12} → {}",
                truncate_string(&detail.password, 24),
                rating,
                truncate_string(&detail.suggested_password, 32)
            );
            if !issues.is_empty() {
                let _ = writeln!(out, "    {}", style(issues.join("; ")).dim());
            }
        }
    }

    let _ = writeln!(out, "\n  Report: {}", result.download_link);
    out
}

pub fn bulk_pii(result: &BulkPiiResult) -> String {
    let mut out = String::new();
    let stats = &result.statistics;

    let _ = writeln!(out, "{}", style("🕵️ PII Analysis").cyan().bold());
    if !result.message.is_empty() {
        let _ = writeln!(out, "  {}", result.message);
    }
    let _ = writeln!(
        out,
        "  Passwords analyzed: {}",
        style(format_large_number(&stats.total_passwords.to_string())).bold()
    );

    let matched = share_percent(stats.matched_passwords, stats.total_passwords);
    let not_matched = share_percent(stats.not_matched_passwords, stats.total_passwords);
    let _ = writeln!(
        out,
        "  {:<12} {} {:>5.1}%  ({})",
        "Contain PII",
        style(meter(matched, BAR_WIDTH)).red(),
        matched,
        stats.matched_passwords
    );
    let _ = writeln!(
        out,
        "  {:<12} {} {:>5.1}%  ({})",
        "No PII",
        style(meter(not_matched, BAR_WIDTH)).green(),
        not_matched,
        stats.not_matched_passwords
    );

    if !stats.is_consistent() {
        let _ = writeln!(out, "  {}", style("⚠️ Counts do not add up to the total").yellow());
    }

    let _ = writeln!(out, "\n  Report: {}", result.download_url);
    out
}

pub fn insights(result: &InsightsResult) -> String {
    let mut out = String::new();
    if result.insights.is_empty() {
        return out;
    }

    let _ = writeln!(out, "{}", style("💡 Security Insights").cyan().bold());
    for insight in &result.insights {
        let _ = writeln!(out, "\n  {}", style(&insight.header).bold());
        let _ = writeln!(out, "  {}", style(format!("\"{}\"", insight.quote)).italic());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{Insight, PasswordDetail, PiiStatistics};

    fn sample_analysis() -> PasswordAnalysisResult {
        PasswordAnalysisResult {
            original_password: "summer2024".into(),
            strength: 0.2,
            new_strength: 0.9,
            suggested_password: Some("Summ3r!Breeze#2024".into()),
            crack_times: [("dictionary_attack".to_string(), 0.5)].into_iter().collect(),
            new_crack_times: [("dictionary_attack".to_string(), 100_000.0)].into_iter().collect(),
            vulnerabilities: vec!["Contains a year".into()],
            suggestions: vec![],
        }
    }

    #[test]
    fn analysis_shows_ratings_and_crack_times() {
        console::set_colors_enabled(false);
        let text = analysis(&sample_analysis());

        assert!(text.contains("Very Weak"));
        assert!(text.contains("Very Strong"));
        assert!(text.contains("Summ3r!Breeze#2024"));
        assert!(text.contains("+260%"));
        assert!(text.contains("Dictionary attack"));
        assert!(text.contains("30 minutes"));
        assert!(text.contains("Insecure"));
        assert!(text.contains("• Contains a year"));
        assert!(!text.contains("Suggestions"));
    }

    #[test]
    fn config_warnings_render_as_warning_lines() {
        console::set_colors_enabled(false);
        let line = warning_line("Ignoring invalid value 'lots' for MAX_RETRIES");
        assert_eq!(line, "⚠️ Ignoring invalid value 'lots' for MAX_RETRIES");
    }

    #[test]
    fn analysis_without_suggestion_hides_suggested_sections() {
        console::set_colors_enabled(false);
        let mut result = sample_analysis();
        result.suggested_password = None;

        let text = analysis(&result);
        assert!(!text.contains("Time to crack (suggested)"));
        assert!(!text.contains("Improvement"));
    }

    #[test]
    fn bulk_shows_shares_and_details() {
        console::set_colors_enabled(false);
        let result = BulkAnalysisResult {
            total_passwords_analyzed: 4,
            weak_passwords: 2,
            moderate_passwords: 1,
            strong_passwords: 1,
            download_link: "/download/bulk-report.csv".into(),
            password_details: Some(vec![PasswordDetail {
                password: "hunter22".into(),
                strength: "12".into(),
                issues: "Too short\nCommon word".into(),
                suggested_password: "Hunt3r!Moon#22".into(),
            }]),
        };

        let text = bulk(&result);
        assert!(text.contains(" 50.0%  (2)"));
        assert!(text.contains(" 25.0%  (1)"));
        assert!(text.contains("Too short; Common word"));
        assert!(text.contains("Very Weak"));
        assert!(text.contains("/download/bulk-report.csv"));

        let large = BulkAnalysisResult { total_passwords_analyzed: 1_250_000, ..result };
        assert!(bulk(&large).contains("Passwords analyzed: 1,250,000"));
    }

    #[test]
    fn empty_bulk_result_has_no_division_by_zero() {
        console::set_colors_enabled(false);
        let result = BulkAnalysisResult {
            total_passwords_analyzed: 0,
            weak_passwords: 0,
            moderate_passwords: 0,
            strong_passwords: 0,
            download_link: String::new(),
            password_details: None,
        };
        assert!(bulk(&result).contains("  0.0%  (0)"));
    }

    #[test]
    fn pii_flags_inconsistent_statistics() {
        console::set_colors_enabled(false);
        let mut result = BulkPiiResult {
            download_url: "http://127.0.0.1:5006/download/pii.csv".into(),
            message: "File processed successfully".into(),
            statistics: PiiStatistics { matched_passwords: 1, not_matched_passwords: 3, total_passwords: 4 },
        };
        assert!(!bulk_pii(&result).contains("do not add up"));

        result.statistics.total_passwords = 5;
        assert!(bulk_pii(&result).contains("do not add up"));
    }

    #[test]
    fn empty_insights_render_nothing() {
        assert_eq!(insights(&InsightsResult::default()), "");

        console::set_colors_enabled(false);
        let result = InsightsResult {
            insights: vec![Insight { header: "Use a manager".into(), quote: "Remember one password.".into() }],
        };
        let text = insights(&result);
        assert!(text.contains("Use a manager"));
        assert!(text.contains("\"Remember one password.\""));
    }

    #[test]
    fn attack_names_are_readable() {
        assert_eq!(attack_name("offline_brute_force"), "Offline brute force");
        assert_eq!(attack_name(""), "");
    }
}
