const COUNTRY_CODE: &str = "55";
const MIN_NATIONAL_LENGTH: usize = 11;

/// Digits-only phone number, prefixed with the Brazilian country code when the
/// caller sent a full national number without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(s: &str) -> Result<Self, String> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(format!("{s} does not contain any digits."));
        }

        if !digits.starts_with(COUNTRY_CODE) && digits.len() >= MIN_NATIONAL_LENGTH {
            return Ok(Self(format!("{COUNTRY_CODE}{digits}")));
        }

        Ok(Self(digits))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
