//! Phone normalization into the fixed national format.

/// Default country code applied to bare 10-digit numbers.
const COUNTRY_CODE: &str = "91";

/// Canonicalizes an extracted phone string as `+91-XXXXXXXXXX`.
///
/// Keeps digits and `+` only, then reformats the three recognized shapes:
/// a `+91`-prefixed 13-character token, a bare 10-digit number, or a
/// 12-digit number starting with the bare country code. Any other shape is
/// passed through unchanged — digits are never fabricated.
pub fn standardize(phone: &str) -> String {
    let token: String = phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let digits = token.strip_prefix('+').unwrap_or(&token);
    if digits.contains('+') {
        // A stray interior plus is not a phone shape we recognize.
        return phone.to_string();
    }

    let prefixed = token.starts_with('+');
    match (prefixed, digits.len()) {
        (true, 12) if digits.starts_with(COUNTRY_CODE) => {
            format!("+{}-{}", COUNTRY_CODE, &digits[2..])
        }
        (false, 10) => format!("+{COUNTRY_CODE}-{digits}"),
        (false, 12) if digits.starts_with(COUNTRY_CODE) => {
            format!("+{}-{}", COUNTRY_CODE, &digits[2..])
        }
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_ten_digits_gets_country_code() {
        assert_eq!(standardize("7285868035"), "+91-7285868035");
    }

    #[test]
    fn test_plus_prefixed_token_reformats() {
        assert_eq!(standardize("+917285868035"), "+91-7285868035");
    }

    #[test]
    fn test_twelve_digits_with_bare_country_code() {
        assert_eq!(standardize("917285868035"), "+91-7285868035");
    }

    #[test]
    fn test_grouped_input_is_flattened_first() {
        assert_eq!(standardize("72858 68035"), "+91-7285868035");
        assert_eq!(standardize("(+91) 72858-68035"), "+91-7285868035");
    }

    #[test]
    fn test_unrecognized_shapes_pass_through() {
        assert_eq!(standardize("12345"), "12345");
        assert_eq!(standardize("+4479460958"), "+4479460958");
        assert_eq!(standardize("N/A"), "N/A");
        assert_eq!(standardize(""), "");
    }

    #[test]
    fn test_never_fabricates_digits() {
        // 11 digits is not a recognized shape even though it nearly fits.
        assert_eq!(standardize("17285868035"), "17285868035");
    }
}
