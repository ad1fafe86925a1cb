/// Season year encoded in the first four characters of a storm id.
///
/// Whitespace around the id is ignored. Anything after the fourth character
/// is not inspected, so `2015ABC` still yields 2015. Returns `None` when the
/// prefix is not an integer (`N/A`, blank ids, `AB12...`).
pub fn derive_year(sid: &str) -> Option<i32> {
    let prefix: String = sid.trim().chars().take(4).collect();
    prefix.parse::<i32>().ok()
}

/// Parse an observation number, tolerating surrounding whitespace.
pub fn parse_number(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_from_well_formed_sid() {
        assert_eq!(derive_year("2010123N10300"), Some(2010));
        assert_eq!(derive_year("  2025001S12345 "), Some(2025));
    }

    #[test]
    fn short_numeric_prefix_still_parses() {
        // only the first four characters count, even if the real year is shorter
        assert_eq!(derive_year("18512N10300"), Some(1851));
    }

    #[test]
    fn trailing_garbage_is_truncated() {
        assert_eq!(derive_year("2015ABC"), Some(2015));
        assert_eq!(derive_year("2015"), Some(2015));
    }

    #[test]
    fn non_numeric_prefix_is_none() {
        assert_eq!(derive_year("N/A"), None);
        assert_eq!(derive_year("AB12001N10300"), None);
        assert_eq!(derive_year("201X001N10300"), None);
        assert_eq!(derive_year(""), None);
        assert_eq!(derive_year("   "), None);
    }

    #[test]
    fn signed_prefix_parses_decimal_does_not() {
        assert_eq!(derive_year("+201N10300"), Some(201));
        assert_eq!(derive_year("-201N10300"), Some(-201));
        assert_eq!(derive_year("1.5N10300"), None);
        assert_eq!(derive_year("1e3N10300"), None);
    }

    #[test]
    fn multibyte_prefix_does_not_panic() {
        assert_eq!(derive_year("é2010"), None);
    }

    #[test]
    fn number_parsing() {
        assert_eq!(parse_number("3"), Some(3));
        assert_eq!(parse_number(" 42 "), Some(42));
        assert_eq!(parse_number("x"), None);
    }
}
