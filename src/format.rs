//! Presentation formatting helpers
//!
//! Pure mappings from numbers to display strings. Widgets and views
//! use these so every region renders money and percentages the same
//! way.

/// Format a currency amount with thousand separators, e.g. `$1,234.56`.
pub fn currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs_value = value.abs();

    let integer_part = abs_value.trunc() as u64;
    let decimal_part = ((abs_value - integer_part as f64) * 100.0).round() as u64;
    // 0.999 rounds up into the next integer
    let (integer_part, decimal_part) = if decimal_part >= 100 {
        (integer_part + 1, 0)
    } else {
        (integer_part, decimal_part)
    };

    let int_str = integer_part.to_string();
    let mut grouped = String::new();
    for (i, c) in int_str.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, c);
    }

    format!("{sign}${grouped}.{decimal_part:02}")
}

/// Currency with an explicit sign for gains, e.g. `+$12.00`.
pub fn signed_currency(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", currency(value))
    } else {
        currency(value)
    }
}

/// Percentage with an explicit sign for gains, e.g. `+1.20%`.
pub fn signed_percentage(value: f64) -> String {
    if value >= 0.0 {
        format!("+{value:.2}%")
    } else {
        format!("{value:.2}%")
    }
}

/// Format an asset quantity (four decimals, matching the service).
pub fn quantity(value: f64) -> String {
    format!("{value:.4}")
}

/// Price with a dollar sign at asset precision, e.g. `$0.8123`.
pub fn price(value: f64) -> String {
    format!("${value:.4}")
}

/// Strategy names arrive as `SNAKE_CASE` identifiers; show them with
/// spaces, e.g. `ADVANCED STRATEGY`.
pub fn strategy_label(name: &str) -> String {
    name.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(-1234567.891), "-$1,234,567.89");
    }

    #[test]
    fn currency_rounds_cents_up_across_the_integer() {
        assert_eq!(currency(0.999), "$1.00");
        assert_eq!(currency(9.995), "$10.00");
    }

    #[test]
    fn signed_variants_mark_gains() {
        assert_eq!(signed_currency(12.0), "+$12.00");
        assert_eq!(signed_currency(-3.5), "-$3.50");
        assert_eq!(signed_percentage(1.2), "+1.20%");
        assert_eq!(signed_percentage(-0.4), "-0.40%");
    }

    #[test]
    fn strategy_labels_drop_underscores() {
        assert_eq!(strategy_label("GRID_TRADING_STRATEGY"), "GRID TRADING STRATEGY");
    }
}
