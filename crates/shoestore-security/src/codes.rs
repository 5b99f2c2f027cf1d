//! One-time numeric confirmation codes

use rand::Rng;

pub const CODE_MIN: u32 = 100_000;
pub const CODE_MAX: u32 = 999_999;

/// Six-digit code in `100000..=999999`.
pub fn generate_code() -> String {
    rand::rng().random_range(CODE_MIN..=CODE_MAX).to_string()
}

pub fn is_well_formed(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_six_digits() {
        for _ in 0..1000 {
            let code = generate_code();
            assert!(is_well_formed(&code), "bad code {}", code);
            let value: u32 = code.parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&value));
        }
    }

    #[test]
    fn test_well_formed() {
        assert!(is_well_formed("123456"));
        assert!(!is_well_formed("12345"));
        assert!(!is_well_formed("12345a"));
    }
}
