use gifttracker_core::Cost;

/// Render a cost as `$1,234.50`. Missing costs render as zero.
pub fn format_currency(cost: Option<Cost>, symbol: &str) -> String {
    let cost = cost.unwrap_or(Cost::ZERO);
    let digits = cost.units().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{symbol}{grouped}.{:02}", cost.fraction())
}
