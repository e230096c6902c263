//! Display formatters for money, dates, and enum-style labels.
//!
//! Unknown values render as placeholders ("—", "TBD"), never as zero
//! amounts or epoch dates.

use chrono::{DateTime, Utc};

/// Currency symbols for the codes the product commonly sees; anything else
/// renders as `"12.34 XXX"`.
fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "NGN" => Some("₦"),
        "GHS" => Some("GH₵"),
        "KES" => Some("KSh"),
        _ => None,
    }
}

/// Format a money amount, or "—" when the value is unknown.
pub fn format_currency(value: Option<f64>, currency: &str) -> String {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return "—".to_string();
    };
    let code = if currency.is_empty() { "USD" } else { currency };
    let magnitude = group_thousands(value.abs());
    let sign = if value < 0.0 { "-" } else { "" };
    match currency_symbol(code) {
        Some(symbol) => format!("{sign}{symbol}{magnitude}"),
        None => format!("{sign}{magnitude} {code}"),
    }
}

fn group_thousands(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{grouped}.{fraction}")
}

/// Long date label, e.g. "Mar 15, 2026"; "TBD" when unknown.
pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => "TBD".to_string(),
    }
}

/// Short cycle-date label, e.g. "Mar 15"; `None` when unknown so callers
/// can fall through to another label.
pub fn format_cycle_date(value: Option<DateTime<Utc>>) -> Option<String> {
    value.map(|date| date.format("%b %-d").to_string())
}

/// Humanize an UPPER_SNAKE status, e.g. "PAID_OUT" -> "Paid Out"; "—" when
/// absent.
pub fn format_enum_label(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "—".to_string();
    };
    value
        .to_lowercase()
        .split('_')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn currency_renders_symbols_grouping_and_placeholder() {
        assert_eq!(format_currency(Some(1234.5), "USD"), "$1,234.50");
        assert_eq!(format_currency(Some(-42.0), "USD"), "-$42.00");
        assert_eq!(format_currency(Some(1000000.0), "NGN"), "₦1,000,000.00");
        assert_eq!(format_currency(Some(25.0), "XOF"), "25.00 XOF");
        assert_eq!(format_currency(Some(10.0), ""), "$10.00");
        assert_eq!(format_currency(None, "USD"), "—");
        assert_eq!(format_currency(Some(f64::NAN), "USD"), "—");
    }

    #[test]
    fn dates_render_labels_or_placeholders() {
        let date = Utc.with_ymd_and_hms(2026, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(format_date(Some(date)), "Mar 5, 2026");
        assert_eq!(format_date(None), "TBD");
        assert_eq!(format_cycle_date(Some(date)).as_deref(), Some("Mar 5"));
        assert_eq!(format_cycle_date(None), None);
    }

    #[test]
    fn enum_labels_humanize_snake_case() {
        assert_eq!(format_enum_label(Some("PAID_OUT")), "Paid Out");
        assert_eq!(format_enum_label(Some("MONTHLY")), "Monthly");
        assert_eq!(format_enum_label(Some("fixed_order")), "Fixed Order");
        assert_eq!(format_enum_label(None), "—");
        assert_eq!(format_enum_label(Some("")), "—");
    }
}
