//! Ruble amounts are kept as integer kopecks and rendered Russian style,
//! `99 999,00 ₽`.

use crate::error::AppError;

pub const KOPECKS_PER_RUBLE: i64 = 100;

/// `12345678` -> `"123 456,78 ₽"`
pub fn format_rubles(kopecks: i64) -> String {
    let sign = if kopecks < 0 { "-" } else { "" };
    let abs = kopecks.unsigned_abs();
    let rubles = abs / KOPECKS_PER_RUBLE as u64;
    let cents = abs % KOPECKS_PER_RUBLE as u64;

    format!("{sign}{},{cents:02} ₽", group_thousands(rubles))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Parse a user-typed amount. Accepts `1234`, `1234.5`, `1 234,50`.
/// Empty input is zero. Negative amounts and more than two decimals are
/// rejected.
pub fn parse_rubles(input: &str) -> Result<i64, AppError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(0);
    }

    let invalid = || AppError::invalid_input("amount", format!("'{input}' is not a valid amount"));

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > 2 {
        return Err(invalid());
    }

    let rubles: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    rubles
        .checked_mul(KOPECKS_PER_RUBLE)
        .and_then(|k| k.checked_add(cents))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_comma() {
        assert_eq!(format_rubles(0), "0,00 ₽");
        assert_eq!(format_rubles(9_999_900), "99 999,00 ₽");
        assert_eq!(format_rubles(12_345_678), "123 456,78 ₽");
        assert_eq!(format_rubles(-150), "-1,50 ₽");
    }

    #[test]
    fn parses_common_spellings() {
        assert_eq!(parse_rubles("").ok(), Some(0));
        assert_eq!(parse_rubles("1500").ok(), Some(150_000));
        assert_eq!(parse_rubles("1 500,5").ok(), Some(150_050));
        assert_eq!(parse_rubles("0.07").ok(), Some(7));
        assert_eq!(parse_rubles(",5").ok(), Some(50));
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["abc", "-5", "1.234", "1.2.3", ".", "12р"] {
            assert!(
                matches!(parse_rubles(bad), Err(AppError::InvalidInput { .. })),
                "{bad} should be rejected"
            );
        }
    }
}
