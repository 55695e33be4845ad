//! Compiled input patterns shared by validation rules.

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters only. Emptiness is reported by the length rule.
pub static LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]*$").expect("valid regex"));

pub static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]*$").expect("valid regex"));

/// Uppercase letters and digits
pub static COURSE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]*$").expect("valid regex"));

/// Four ASCII digits; `\d` would also admit other scripts' numerals
pub static ACADEMIC_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns() {
        assert!(LETTERS.is_match("Ada"));
        assert!(!LETTERS.is_match("Ada1"));
        assert!(COURSE_CODE.is_match("CS101"));
        assert!(!COURSE_CODE.is_match("cs101"));
        assert!(ACADEMIC_YEAR.is_match("2024"));
        assert!(!ACADEMIC_YEAR.is_match("24"));
        assert!(!ACADEMIC_YEAR.is_match("2024a"));
        assert!(!ACADEMIC_YEAR.is_match("２０２４"));
        assert!(!ACADEMIC_YEAR.is_match("٢٠٢٤"));
    }
}
