//! Value objects for the customer domain.
//!
//! Every constructor validates its input and returns an [`Outcome`], so an
//! instance that exists is always well formed. `Default` values exist only to
//! give the blank aggregate state something to hold before its creation event.

use common::{Failure, Outcome};
use serde::{Deserialize, Serialize};

/// Maximum length of a customer name, in characters.
pub const MAX_NAME_LENGTH: usize = 200;

const MAX_EMAIL_LENGTH: usize = 254;
const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// Display name of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerName(String);

impl CustomerName {
    /// Trims and validates a raw name.
    pub fn parse(raw: &str) -> Outcome<Self> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(Failure::invalid_argument("name cannot be empty"));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(Failure::invalid_argument(format!(
                "name cannot exceed {MAX_NAME_LENGTH} characters"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address, stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Outcome<Self> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            return Err(Failure::invalid_argument("email cannot be empty"));
        }
        if email.len() > MAX_EMAIL_LENGTH {
            return Err(Failure::invalid_argument(format!(
                "email cannot exceed {MAX_EMAIL_LENGTH} characters"
            )));
        }

        let invalid = || Failure::invalid_argument(format!("'{email}' is not a valid email address"));
        let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
        let domain_ok = domain
            .split('.')
            .all(|label| !label.is_empty())
            && domain.contains('.');
        if local.is_empty() || domain.contains('@') || !domain_ok || email.contains(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phone number normalised to digits with an optional leading `+`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Accepts digits separated by spaces, dashes, dots or parentheses.
    pub fn parse(raw: &str) -> Outcome<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Failure::invalid_argument("phone number cannot be empty"));
        }

        let (prefix, rest) = match raw.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", raw),
        };

        let mut digits = String::with_capacity(rest.len());
        for c in rest.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => {
                    return Err(Failure::invalid_argument(format!(
                        "'{raw}' is not a valid phone number"
                    )));
                }
            }
        }

        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len()) {
            return Err(Failure::invalid_argument(format!(
                "phone number must have between {MIN_PHONE_DIGITS} and {MAX_PHONE_DIGITS} digits"
            )));
        }

        Ok(Self(format!("{prefix}{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    street: String,
    city: String,
    postal_code: String,
    country: String,
}

impl Address {
    pub fn new(street: &str, city: &str, postal_code: &str, country: &str) -> Outcome<Self> {
        Ok(Self {
            street: required("street", street)?,
            city: required("city", city)?,
            postal_code: required("postal code", postal_code)?,
            country: required("country", country)?,
        })
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {} {}, {}",
            self.street, self.postal_code, self.city, self.country
        )
    }
}

fn required(field: &str, raw: &str) -> Outcome<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(Failure::invalid_argument(format!("{field} cannot be empty")));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(CustomerName::parse("  Ada  ").unwrap().as_str(), "Ada");
    }

    #[test]
    fn empty_name_is_rejected() {
        let failure = CustomerName::parse("   ").unwrap_err();
        assert_eq!(failure.message(), "name cannot be empty");
        assert_eq!(failure.kind(), common::ErrorKind::InvalidArgument);
    }

    #[test]
    fn name_length_limit_counts_characters() {
        assert!(CustomerName::parse(&"é".repeat(MAX_NAME_LENGTH)).is_ok());
        let failure = CustomerName::parse(&"a".repeat(MAX_NAME_LENGTH + 1)).unwrap_err();
        assert_eq!(failure.message(), "name cannot exceed 200 characters");
    }

    #[test]
    fn email_is_lower_cased() {
        assert_eq!(
            Email::parse(" Ada@Example.COM ").unwrap().as_str(),
            "ada@example.com"
        );
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in [
            "",
            "ada",
            "@example.com",
            "ada@",
            "ada@example",
            "ada@@example.com",
            "ada@example..com",
            "a da@example.com",
        ] {
            assert!(Email::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn phone_separators_are_stripped() {
        assert_eq!(
            PhoneNumber::parse("+1 (555) 010-9999").unwrap().as_str(),
            "+15550109999"
        );
        assert_eq!(PhoneNumber::parse("555.0100").unwrap().as_str(), "5550100");
    }

    #[test]
    fn bad_phone_numbers_are_rejected() {
        assert!(PhoneNumber::parse("").is_err());
        assert!(PhoneNumber::parse("12345").is_err());
        assert!(PhoneNumber::parse("1234567890123456").is_err());
        assert!(PhoneNumber::parse("555-CALL-NOW").is_err());
        assert!(PhoneNumber::parse("++15550109999").is_err());
    }

    #[test]
    fn address_requires_every_field() {
        let address = Address::new("1 Analytical Way", "London", "N1 9GU", "UK").unwrap();
        assert_eq!(address.to_string(), "1 Analytical Way, N1 9GU London, UK");

        let failure = Address::new("1 Analytical Way", " ", "N1 9GU", "UK").unwrap_err();
        assert_eq!(failure.message(), "city cannot be empty");
    }
}
