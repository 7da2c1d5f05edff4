// src/utils/format.rs
use console::{Color, Style};

pub const UNKNOWN: &str = "Unknown";

const HOURS_PER_DAY: f64 = 24.0;
const HOURS_PER_MONTH: f64 = 720.0;
const HOURS_PER_YEAR: f64 = 8_760.0;
const HOURS_PER_DECADE: f64 = 87_600.0;
const HOURS_PER_CENTURY: f64 = 876_000.0;
const HOURS_PER_MILLENNIUM: f64 = 8_760_000.0;

// Format a crack-time estimate (in hours) for display
pub fn humanize_crack_time(hours: Option<f64>) -> String {
    let hours = match hours {
        Some(h) if !h.is_nan() => h.max(0.0),
        _ => return UNKNOWN.to_string(),
    };

    let minutes = hours * 60.0;

    if minutes < 1.0 {
        "less than a minute".to_string()
    } else if hours < 1.0 {
        count_of(minutes, "minute", "minutes")
    } else if hours < HOURS_PER_DAY {
        count_of(hours, "hour", "hours")
    } else if hours < HOURS_PER_MONTH {
        count_of(hours / HOURS_PER_DAY, "day", "days")
    } else if hours < HOURS_PER_YEAR {
        count_of(hours / HOURS_PER_MONTH, "month", "months")
    } else if hours < HOURS_PER_DECADE {
        count_of(hours / HOURS_PER_YEAR, "year", "years")
    } else if hours < HOURS_PER_CENTURY {
        count_of(hours / HOURS_PER_DECADE, "decade", "decades")
    } else if hours < HOURS_PER_MILLENNIUM {
        count_of(hours / HOURS_PER_CENTURY, "century", "centuries")
    } else {
        count_of(hours / HOURS_PER_MILLENNIUM, "millennium", "millennia")
    }
}

fn count_of(value: f64, singular: &str, plural: &str) -> String {
    let n = value.round();
    if n == 1.0 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", format_grouped(n, 0), plural)
    }
}

// Render a numeric string: scientific above 1e12, grouped digits below
pub fn format_large_number(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return UNKNOWN.to_string();
    }

    let number: f64 = match trimmed.parse() {
        Ok(n) => n,
        Err(_) => return trimmed.to_string(),
    };

    if !number.is_finite() {
        return trimmed.to_string();
    }

    if number > 1e12 {
        return format_scientific(number);
    }

    format_grouped(number, 3)
}

// `1.50e+12` style, two decimals
fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.2e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
        _ => formatted,
    }
}

// Thousands separators with up to `max_fraction` trailing digits
fn format_grouped(value: f64, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) { "-" } else { "" };

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Five-step rating of a strength ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SecurityRating {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl SecurityRating {
    pub fn from_strength(strength: f64) -> Self {
        if strength.is_nan() || strength < 0.3 {
            SecurityRating::VeryWeak
        } else if strength < 0.5 {
            SecurityRating::Weak
        } else if strength < 0.65 {
            SecurityRating::Moderate
        } else if strength < 0.9 {
            SecurityRating::Strong
        } else {
            SecurityRating::VeryStrong
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SecurityRating::VeryWeak => "Very Weak",
            SecurityRating::Weak => "Weak",
            SecurityRating::Moderate => "Moderate",
            SecurityRating::Strong => "Strong",
            SecurityRating::VeryStrong => "Very Strong",
        }
    }

    pub fn style(&self) -> Style {
        match self {
            SecurityRating::VeryWeak => Style::new().red().bold(),
            SecurityRating::Weak => Style::new().color256(208), // orange
            SecurityRating::Moderate => Style::new().color256(214), // amber
            SecurityRating::Strong => Style::new().color256(37), // teal
            SecurityRating::VeryStrong => Style::new().color256(35).bold(), // emerald
        }
    }
}

impl std::fmt::Display for SecurityRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Coarse verdict on a humanized crack time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrackTimeLevel {
    Insecure,
    Moderate,
    Secure,
    VerySecure,
}

impl CrackTimeLevel {
    pub fn from_label(label: &str) -> Self {
        if label.contains("second") || label.contains("minute") || label.contains("hour") {
            CrackTimeLevel::Insecure
        } else if label.contains("day") || label.contains("week") || label.contains("month") {
            CrackTimeLevel::Moderate
        } else if label.contains("year") {
            CrackTimeLevel::Secure
        } else if label == UNKNOWN {
            CrackTimeLevel::Insecure
        } else {
            CrackTimeLevel::VerySecure
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CrackTimeLevel::Insecure => "Insecure",
            CrackTimeLevel::Moderate => "Moderate",
            CrackTimeLevel::Secure => "Secure",
            CrackTimeLevel::VerySecure => "Very Secure",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            CrackTimeLevel::Insecure => Color::Red,
            CrackTimeLevel::Moderate => Color::Yellow,
            CrackTimeLevel::Secure => Color::Cyan,
            CrackTimeLevel::VerySecure => Color::Green,
        }
    }
}

// Percentage improvement shown next to a suggested password
pub fn improvement_percentage(original: f64, new: f64) -> u32 {
    if original.is_nan() || new.is_nan() {
        return 0;
    }

    // Near-zero baselines would explode the ratio; scale linearly instead
    if original < 0.05 {
        let linear = ((new - original) * 2000.0).round().max(0.0);
        return linear.min(1000.0) as u32;
    }

    let raw = ((new - original) / original * 100.0).max(0.0);

    if raw > 200.0 {
        let compressed = 200.0 + 100.0 * (1.0 + (raw - 200.0) / 50.0).log10();
        return compressed.round().min(1000.0) as u32;
    }

    ((raw / 5.0).round() * 5.0) as u32
}

// Strength ratio as a 0-100 meter value
pub fn strength_percent(strength: f64) -> u8 {
    if strength.is_nan() {
        return 0;
    }
    (strength.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Parse a string-encoded strength; values above 1 are read as percentages.
pub fn parse_strength(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    let ratio = if parsed > 1.0 { parsed / 100.0 } else { parsed };
    Some(ratio.clamp(0.0, 1.0))
}

// Log-scale bar width so seconds and millennia fit on one chart
pub fn crack_time_bar_percent(hours: f64, max_hours: f64) -> f64 {
    let hours = if hours.is_nan() { 0.0 } else { hours.max(0.0) };
    let max_hours = if max_hours.is_nan() { 0.0 } else { max_hours.max(hours) };

    let denominator = (max_hours + 1.0).log10();
    if denominator <= 0.0 {
        return 0.0;
    }

    ((hours + 1.0).log10() / denominator * 100.0).clamp(0.0, 100.0)
}

pub fn share_percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

// Truncate a string if it's too long
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
