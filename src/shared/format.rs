//! Number and label formatting shared by the prompt and the report views.

/// Format with a fixed number of decimals and `,` thousands separators.
///
/// `group_thousands(25000.0, 2)` → `"25,000.00"`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Dollar amount, e.g. `money(-1200.0, 0)` → `"-$1,200"`.
pub fn money(value: f64, decimals: usize) -> String {
    let grouped = group_thousands(value, decimals);
    match grouped.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", grouped),
    }
}

/// `"needs_evaluation"` → `"Needs Evaluation"`.
pub fn title_case(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(25_000.0, 2), "25,000.00");
        assert_eq!(group_thousands(1_234_567.891, 0), "1,234,568");
        assert_eq!(group_thousands(999.0, 1), "999.0");
        assert_eq!(group_thousands(-4_500.0, 0), "-4,500");
        assert_eq!(group_thousands(-0.001, 1), "0.0");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(15_000.0, 2), "$15,000.00");
        assert_eq!(money(-1_200.0, 0), "-$1,200");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("needs_evaluation"), "Needs Evaluation");
        assert_eq!(title_case("MONOCRYSTALLINE"), "Monocrystalline");
        assert_eq!(title_case(""), "");
    }
}
