//! Number formatting for cards, tables and tooltips.

/// `1234567.891` with `decimals = 2` → `"1,234,567.89"`.
pub fn thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Rounding may turn a tiny negative into zero; don't print "-0".
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `$3,610B` style (billions, no decimals).
pub fn billions(value: f64) -> String {
    format!("${}B", thousands(value, 0))
}

/// `$2,971.00B` style (billions, two decimals).
pub fn billions_precise(value: f64) -> String {
    format!("${}B", thousands(value, 2))
}

/// `$240.36` style.
pub fn usd(value: f64) -> String {
    format!("${}", thousands(value, 2))
}

/// Apply a printf-like display hint: `"$%.2f B"`, `"$%.2f"`, `"%.1f%%"`.
///
/// Only the single `%.Nf` / `%%` forms used by the column config are
/// understood; anything else is copied verbatim.
pub fn apply_hint(hint: &str, value: f64) -> String {
    let mut out = String::new();
    let mut rest = hint;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let spec = &rest[pos + 1..];
        if let Some(after) = spec.strip_prefix('%') {
            out.push('%');
            rest = after;
        } else if let Some((decimals, after)) = parse_precision(spec) {
            out.push_str(&thousands(value, decimals));
            rest = after;
        } else {
            out.push('%');
            rest = spec;
        }
    }
    out.push_str(rest);
    out
}

/// `".2f rest"` → `(2, " rest")`.
fn parse_precision(spec: &str) -> Option<(usize, &str)> {
    let s = spec.strip_prefix('.')?;
    let f = s.find('f')?;
    let decimals = s[..f].parse().ok()?;
    Some((decimals, &s[f + 1..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(thousands(999.0, 0), "999");
        assert_eq!(thousands(1000.0, 0), "1,000");
        assert_eq!(thousands(-12345.5, 1), "-12,345.5");
        assert_eq!(thousands(-0.001, 2), "0.00");
        assert_eq!(thousands(f64::NAN, 2), "n/a");
    }

    #[test]
    fn currency_helpers() {
        assert_eq!(billions(11674.0), "$11,674B");
        assert_eq!(billions_precise(3610.0), "$3,610.00B");
        assert_eq!(usd(240.36), "$240.36");
    }

    #[test]
    fn hints() {
        assert_eq!(apply_hint("$%.2f B", 3610.0), "$3,610.00 B");
        assert_eq!(apply_hint("$%.2f", 240.36), "$240.36");
        assert_eq!(apply_hint("%.1f%%", 87.26), "87.3%");
        assert_eq!(apply_hint("plain", 1.0), "plain");
        assert_eq!(apply_hint("%d", 1.0), "%d");
    }
}
