use std::sync::LazyLock;

use regex::Regex;

static SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
// Mathematical bold capitals that show up as decorative glyphs in product titles.
static MATH_GLYPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{1D401}-\x{1D419}]").unwrap());
static QUANTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*(ml|g)").unwrap());
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+").unwrap());
static INTEGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

const MULTI_ITEM_MARKERS: &[&str] = &["bundle", "set", "+", "trial"];
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₩', '₫', '฿', '₱'];

/// Strip punctuation, symbols and anything non-ASCII, then trim.
pub fn normalize(text: &str) -> String {
    let cleaned = SYMBOL_RE.replace_all(text, "");
    let cleaned = MATH_GLYPH_RE.replace_all(&cleaned, "");
    let ascii: String = cleaned.chars().filter(char::is_ascii).collect();
    ascii.trim().to_string()
}

/// First `<number><unit>` pair where unit is `ml` or `g`.
///
/// The unit is matched as a plain substring, so `525gb` yields `(525.0, "g")`.
pub fn extract_quantity(text: &str) -> Option<(f64, &'static str)> {
    let caps = QUANTITY_RE.captures(text)?;
    let value = caps[1].parse::<f64>().ok()?;
    let unit = match &caps[2] {
        "ml" => "ml",
        _ => "g",
    };
    Some((value, unit))
}

/// Bundles, sets and trial kits are not single products.
pub fn is_multi_item(identifier: &str) -> bool {
    let lower = identifier.to_lowercase();
    MULTI_ITEM_MARKERS.iter().any(|m| lower.contains(m))
}

/// Lowest decimal amount in a price region ("$12.90 - $15.00" → 12.9), or 0 when there is none.
/// Bare integers (discounts, counters) are not prices.
pub fn min_price(text: &str) -> f64 {
    let stripped: String = text
        .chars()
        .filter(|c| *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .collect();
    PRICE_RE
        .find_iter(&stripped)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .reduce(f64::min)
        .unwrap_or(0.0)
}

pub fn first_integer(text: &str) -> Option<u64> {
    INTEGER_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Python-style float rendering: whole numbers keep a trailing `.0`.
pub fn format_quantity(value: f64, unit: &str) -> String {
    format!("{:?}{}", value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_symbols_and_unicode() {
        assert_eq!(normalize("  COSRX Low-pH Gel Cleanser 150ml!! "), "COSRX LowpH Gel Cleanser 150ml");
        assert_eq!(normalize("Crème 💧 Hydra"), "Crme  Hydra");
        assert_eq!(normalize("\u{1D401}\u{1D402}Glow"), "Glow");
        assert_eq!(normalize("【限定】"), "");
    }

    #[test]
    fn normalize_is_idempotent_and_ascii_word_only() {
        let inputs = [
            "",
            "   ",
            "S$12.90 - S$15.00",
            "Ｆｕｌｌｗｉｄｔｈ ｔｅｘｔ",
            "tab\tand\nnewline ✨ snake_case",
            "\u{1D419}mixed\u{00A0}space",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
            assert!(
                once.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace()),
                "unexpected char in {:?}",
                once
            );
        }
    }

    #[test]
    fn quantity_first_match() {
        assert_eq!(extract_quantity("50ml cream"), Some((50.0, "ml")));
        assert_eq!(extract_quantity("Toner 12.5 ml and 30g"), Some((12.5, "ml")));
        assert_eq!(extract_quantity("Mask 30 g"), Some((30.0, "g")));
        assert_eq!(extract_quantity("no numbers here"), None);
        assert_eq!(extract_quantity("50ML caps"), None);
    }

    #[test]
    fn quantity_unit_is_substring_match() {
        assert_eq!(extract_quantity("drive 525gb"), Some((525.0, "g")));
    }

    #[test]
    fn multi_item_markers() {
        assert!(is_multi_item("Brand Bundle Set"));
        assert!(is_multi_item("productpages/Cleanser+Toner.html"));
        assert!(is_multi_item("TRIAL kit"));
        assert!(!is_multi_item("Single Cleanser"));
    }

    #[test]
    fn price_minimum() {
        assert_eq!(min_price("$12.90 - $15.00"), 12.9);
        assert_eq!(min_price("$1,299.00"), 1299.0);
        assert_eq!(min_price("$12.90 -5%"), 12.9);
        assert_eq!(min_price("S$8"), 0.0);
        assert_eq!(min_price(""), 0.0);
        assert_eq!(min_price("Sold out"), 0.0);
    }

    #[test]
    fn quantity_formatting() {
        assert_eq!(format_quantity(50.0, "ml"), "50.0ml");
        assert_eq!(format_quantity(12.5, "g"), "12.5g");
    }

    #[test]
    fn integers() {
        assert_eq!(first_integer("Favorite (1234)"), Some(1234));
        assert_eq!(first_integer("Favorite"), None);
    }
}
