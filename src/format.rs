//! Presentation helpers for currency and percentage values

/// Format a dollar amount with thousands separators, e.g. `$1,234,567.89`.
/// Negative amounts render with a leading minus: `-$500.00`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

/// Format a percentage value (already in percent units), e.g. `12.34%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}
