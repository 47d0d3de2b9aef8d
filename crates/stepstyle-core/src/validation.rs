//! # Validation Module
//!
//! Input rules for the checkout and account forms.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Card form                        Cash on delivery form                 │
//! │  ──────────                       ─────────────────────                 │
//! │  1. number length 15-16           1. address not blank                  │
//! │  2. expiry MM/YY present          2. address >= 10 chars                │
//! │  3. expiry not in the past        3. contains a 6-digit pincode         │
//! │  4. expiry month 1-12                                                   │
//! │  5. CVV length per network        Account forms                         │
//! │  6. cardholder name >= 3 chars    ─────────────                         │
//! │                                   email or 10-digit phone               │
//! │  First failure wins. Its message  password >= 6, OTP = 6 digits         │
//! │  is shown verbatim in the UI.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here reads the clock: callers pass `today` so expiry checks are
//! deterministic in tests.
//!
//! ## Usage
//! ```rust
//! use stepstyle_core::validation::validate_cod_address;
//!
//! assert!(validate_cod_address("123 Main St").is_err());
//! assert_eq!(validate_cod_address("123 Main St 400001").unwrap(), "400001");
//! ```

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::card::{last_four, strip_whitespace, CardNetwork};
use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("Invalid regex"));

/// Standalone run of exactly six digits. Word boundaries are ASCII-only, so
/// a letter like `é` right before the digits still counts as a boundary.
static PINCODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)[0-9]{6}(?-u:\b)").expect("Invalid regex"));

// =============================================================================
// Card Form
// =============================================================================

/// Raw card form input, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct CardDetails {
    pub number: String,
    /// `MM/YY`
    pub expiry: String,
    pub cvv: String,
    pub name: String,
}

/// What a passing card form yields for the processing stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCard {
    pub network: CardNetwork,
    pub last_four: String,
}

impl ValidatedCard {
    /// Method label recorded on the transaction: `Visa Card (****1111)`.
    pub fn method_label(&self) -> String {
        format!("{} Card (****{})", self.network, self.last_four)
    }
}

/// Validates the whole card form.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use stepstyle_core::validation::{validate_card, CardDetails};
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
/// let card = CardDetails {
///     number: "4111 1111 1111 1111".into(),
///     expiry: "12/28".into(),
///     cvv: "123".into(),
///     name: "Asha Rao".into(),
/// };
/// let ok = validate_card(&card, today).unwrap();
/// assert_eq!(ok.method_label(), "Visa Card (****1111)");
/// ```
pub fn validate_card(card: &CardDetails, today: NaiveDate) -> ValidationResult<ValidatedCard> {
    let number = strip_whitespace(&card.number);
    let len = number.chars().count();
    if !(15..=16).contains(&len) {
        return Err(ValidationError::CardNumber);
    }

    validate_expiry(&card.expiry, today)?;

    // A 15-16 character number is always long enough to be classified
    let network = CardNetwork::detect(&number).unwrap_or(CardNetwork::Unknown);
    validate_cvv(&card.cvv, network)?;

    if card.name.chars().count() < 3 {
        return Err(ValidationError::CardholderName);
    }

    Ok(ValidatedCard {
        network,
        last_four: last_four(&number),
    })
}

/// Validates an `MM/YY` expiry against `today`.
///
/// The past-date check runs before the month range check, so `13/20` reports
/// an expired card rather than a bad month.
pub fn validate_expiry(expiry: &str, today: NaiveDate) -> ValidationResult<()> {
    if expiry.chars().count() < 5 {
        return Err(ValidationError::ExpiryFormat);
    }

    let mut parts = expiry.split('/');
    let month = parts.next().and_then(leading_number);
    let year = parts
        .next()
        .and_then(|yy| leading_number(&format!("20{yy}")));

    let (Some(month), Some(year)) = (month, year) else {
        return Err(ValidationError::ExpiryFormat);
    };

    let current_year = today.year() as i64;
    let current_month = today.month() as i64;
    if year < current_year || (year == current_year && month < current_month) {
        return Err(ValidationError::CardExpired);
    }

    if !(1..=12).contains(&month) {
        return Err(ValidationError::ExpiryMonth);
    }

    Ok(())
}

/// CVV length must match the network (4 for American Express, else 3).
pub fn validate_cvv(cvv: &str, network: CardNetwork) -> ValidationResult<()> {
    if cvv.chars().count() == network.cvv_len() {
        return Ok(());
    }
    match network {
        CardNetwork::AmericanExpress => Err(ValidationError::AmexCvv),
        _ => Err(ValidationError::Cvv),
    }
}

/// Parses the leading run of ASCII digits (`"07"` → 7, `"1a"` → 1).
fn leading_number(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

// =============================================================================
// Cash on Delivery Form
// =============================================================================

/// Validates a delivery address and returns the pincode found in it.
pub fn validate_cod_address(address: &str) -> ValidationResult<String> {
    if address.trim().is_empty() {
        return Err(ValidationError::AddressMissing);
    }

    if address.chars().count() < 10 {
        return Err(ValidationError::AddressIncomplete);
    }

    PINCODE_RE
        .find(address)
        .map(|m| m.as_str().to_string())
        .ok_or(ValidationError::PincodeMissing)
}

// =============================================================================
// Account Forms
// =============================================================================

/// How a shopper identified themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Phone,
}

/// Classifies an identifier, if it is a valid email or 10-digit phone.
pub fn identifier_kind(identifier: &str) -> Option<IdentifierKind> {
    if EMAIL_RE.is_match(identifier) {
        Some(IdentifierKind::Email)
    } else if PHONE_RE.is_match(identifier) {
        Some(IdentifierKind::Phone)
    } else {
        None
    }
}

/// Login form identifier check.
pub fn validate_identifier(identifier: &str) -> ValidationResult<IdentifierKind> {
    identifier_kind(identifier).ok_or(ValidationError::Identifier)
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < 6 {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Any six digits pass; the code itself is never checked.
pub fn validate_otp(otp: &str) -> ValidationResult<()> {
    if otp.len() != 6 || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::Otp);
    }
    Ok(())
}

/// Signup form, checked in the order the form reports errors.
pub fn validate_signup(
    name: &str,
    identifier: &str,
    password: &str,
    confirm: &str,
) -> ValidationResult<IdentifierKind> {
    if name.trim().chars().count() < 3 {
        return Err(ValidationError::NameTooShort);
    }
    let kind = identifier_kind(identifier).ok_or(ValidationError::SignupIdentifier)?;
    validate_new_password(password, confirm)?;
    Ok(kind)
}

/// A new password must be long enough and typed the same way twice.
pub fn validate_new_password(password: &str, confirm: &str) -> ValidationResult<()> {
    validate_password(password)?;
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn visa() -> CardDetails {
        CardDetails {
            number: "4111 1111 1111 1111".to_string(),
            expiry: "12/28".to_string(),
            cvv: "123".to_string(),
            name: "Asha Rao".to_string(),
        }
    }

    #[test]
    fn test_card_number_length() {
        let mut card = visa();
        card.number = "4111111111111".to_string();
        assert_eq!(validate_card(&card, today()), Err(ValidationError::CardNumber));

        card.number = "4111111111111111".to_string();
        let ok = validate_card(&card, today()).unwrap();
        assert_eq!(ok.network, CardNetwork::Visa);
        assert_eq!(ok.last_four, "1111");
    }

    #[test]
    fn test_expiry_rules() {
        assert_eq!(validate_expiry("1/28", today()), Err(ValidationError::ExpiryFormat));
        assert_eq!(validate_expiry("01/20", today()), Err(ValidationError::CardExpired));
        assert_eq!(validate_expiry("09/26", today()), Err(ValidationError::CardExpired));
        assert_eq!(validate_expiry("10/26", today()), Ok(()));
        assert_eq!(validate_expiry("13/27", today()), Err(ValidationError::ExpiryMonth));
        assert_eq!(validate_expiry("00/27", today()), Err(ValidationError::ExpiryMonth));
        assert_eq!(validate_expiry("ab/cd", today()), Err(ValidationError::ExpiryFormat));
    }

    #[test]
    fn test_past_year_wins_over_bad_month() {
        assert_eq!(validate_expiry("13/20", today()), Err(ValidationError::CardExpired));
    }

    #[test]
    fn test_cvv_by_network() {
        let mut card = visa();
        card.cvv = "12".to_string();
        assert_eq!(validate_card(&card, today()), Err(ValidationError::Cvv));

        let amex = CardDetails {
            number: "3714 4963 5398 431".to_string(),
            cvv: "123".to_string(),
            ..visa()
        };
        assert_eq!(validate_card(&amex, today()), Err(ValidationError::AmexCvv));

        let amex = CardDetails {
            cvv: "1234".to_string(),
            ..amex
        };
        let ok = validate_card(&amex, today()).unwrap();
        assert_eq!(ok.method_label(), "American Express Card (****8431)");
    }

    #[test]
    fn test_cardholder_name() {
        let card = CardDetails {
            name: "Al".to_string(),
            ..visa()
        };
        assert_eq!(validate_card(&card, today()), Err(ValidationError::CardholderName));
    }

    #[test]
    fn test_cod_address() {
        assert_eq!(validate_cod_address("   "), Err(ValidationError::AddressMissing));
        assert_eq!(validate_cod_address("Flat 2"), Err(ValidationError::AddressIncomplete));
        assert_eq!(validate_cod_address("123 Main St"), Err(ValidationError::PincodeMissing));
        assert_eq!(validate_cod_address("123 Main St 400001").unwrap(), "400001");
        // A 7-digit run is not a pincode
        assert_eq!(
            validate_cod_address("Plot 1234567, Pune"),
            Err(ValidationError::PincodeMissing)
        );
    }

    #[test]
    fn test_pincode_after_non_ascii_letter() {
        assert_eq!(
            validate_cod_address("Flat 2, Indiranagar é400001").unwrap(),
            "400001"
        );
        assert_eq!(
            validate_cod_address("Flat 2, Indiranagar a400001"),
            Err(ValidationError::PincodeMissing)
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(identifier_kind("asha@example.com"), Some(IdentifierKind::Email));
        assert_eq!(identifier_kind("9876543210"), Some(IdentifierKind::Phone));
        assert_eq!(identifier_kind("98765"), None);
        assert_eq!(identifier_kind("asha@example"), None);
        assert_eq!(validate_identifier("nope"), Err(ValidationError::Identifier));
    }

    #[test]
    fn test_otp_and_password() {
        assert!(validate_otp("123456").is_ok());
        assert_eq!(validate_otp("12345"), Err(ValidationError::Otp));
        assert_eq!(validate_otp("12a456"), Err(ValidationError::Otp));
        assert_eq!(validate_password("12345"), Err(ValidationError::PasswordTooShort));
        assert!(validate_password("secret").is_ok());
    }

    #[test]
    fn test_new_password() {
        assert_eq!(
            validate_new_password("12345", "12345"),
            Err(ValidationError::PasswordTooShort)
        );
        assert_eq!(
            validate_new_password("secret1", "secret2"),
            Err(ValidationError::PasswordMismatch)
        );
        assert!(validate_new_password("secret1", "secret1").is_ok());
    }

    #[test]
    fn test_signup_order() {
        assert_eq!(
            validate_signup(" Al ", "asha@example.com", "secret", "secret"),
            Err(ValidationError::NameTooShort)
        );
        assert_eq!(
            validate_signup("Asha", "asha", "secret", "secret"),
            Err(ValidationError::SignupIdentifier)
        );
        assert_eq!(
            validate_signup("Asha", "9876543210", "secret", "secreT"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            validate_signup("Asha", "9876543210", "secret", "secret"),
            Ok(IdentifierKind::Phone)
        );
    }
}
