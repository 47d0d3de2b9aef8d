//! # Card Network Detection
//!
//! Identifies the card network from the leading digits of a card number and
//! formats card form input the way the checkout form displays it.
//!
//! ```text
//!   prefix        network
//!   ──────        ────────────────
//!   4             Visa
//!   51-55         Mastercard
//!   34, 37        American Express
//!   6011, 65      Discover
//!   other         Unknown (only once more than 6 digits are typed)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A payment card network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CardNetwork {
    Visa,
    Mastercard,
    AmericanExpress,
    Discover,
    Unknown,
}

impl CardNetwork {
    /// Detects the network of a (possibly space-separated) card number.
    ///
    /// Returns `None` while the prefix is unrecognised and the number is
    /// still short enough (6 digits or fewer) that more typing could change
    /// the answer.
    pub fn detect(card_number: &str) -> Option<CardNetwork> {
        let digits = strip_whitespace(card_number);
        let b = digits.as_bytes();

        if b.first() == Some(&b'4') {
            Some(CardNetwork::Visa)
        } else if b.len() >= 2 && b[0] == b'5' && (b'1'..=b'5').contains(&b[1]) {
            Some(CardNetwork::Mastercard)
        } else if b.len() >= 2 && b[0] == b'3' && (b[1] == b'4' || b[1] == b'7') {
            Some(CardNetwork::AmericanExpress)
        } else if digits.starts_with("6011") || digits.starts_with("65") {
            Some(CardNetwork::Discover)
        } else if digits.chars().count() > 6 {
            Some(CardNetwork::Unknown)
        } else {
            None
        }
    }

    /// Display name used in status messages and method labels.
    pub const fn name(&self) -> &'static str {
        match self {
            CardNetwork::Visa => "Visa",
            CardNetwork::Mastercard => "Mastercard",
            CardNetwork::AmericanExpress => "American Express",
            CardNetwork::Discover => "Discover",
            CardNetwork::Unknown => "Unknown",
        }
    }

    /// Number of CVV digits the network expects.
    pub const fn cvv_len(&self) -> usize {
        match self {
            CardNetwork::AmericanExpress => 4,
            _ => 3,
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Network name as the form shows it; empty while undetected.
pub fn network_label(card_number: &str) -> &'static str {
    CardNetwork::detect(card_number).map_or("", |n| n.name())
}

// =============================================================================
// Form Helpers
// =============================================================================

pub(crate) fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Last four digits of the card number, ignoring grouping spaces.
pub fn last_four(card_number: &str) -> String {
    let chars: Vec<char> = strip_whitespace(card_number).chars().collect();
    let start = chars.len().saturating_sub(4);
    chars[start..].iter().collect()
}

/// Groups the number in blocks of four: `4111 1111 1111 1111` (19 chars max).
pub fn format_card_number(input: &str) -> String {
    let digits = strip_whitespace(input);
    let mut out = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out.chars().take(19).collect()
}

/// Keeps digits only and inserts the slash: `1227` → `12/27`.
pub fn format_expiry(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let formatted = if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    };
    formatted.chars().take(5).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_networks() {
        assert_eq!(CardNetwork::detect("4111 1111 1111 1111"), Some(CardNetwork::Visa));
        assert_eq!(CardNetwork::detect("5500000000000004"), Some(CardNetwork::Mastercard));
        assert_eq!(CardNetwork::detect("371449635398431"), Some(CardNetwork::AmericanExpress));
        assert_eq!(CardNetwork::detect("6011000990139424"), Some(CardNetwork::Discover));
        assert_eq!(CardNetwork::detect("6500000000000002"), Some(CardNetwork::Discover));
    }

    #[test]
    fn test_unknown_only_after_six_digits() {
        assert_eq!(CardNetwork::detect("123456"), None);
        assert_eq!(CardNetwork::detect("1234567"), Some(CardNetwork::Unknown));
        // 56 is not a Mastercard prefix
        assert_eq!(CardNetwork::detect("5600000"), Some(CardNetwork::Unknown));
        assert_eq!(network_label("12"), "");
    }

    #[test]
    fn test_cvv_lengths() {
        assert_eq!(CardNetwork::AmericanExpress.cvv_len(), 4);
        assert_eq!(CardNetwork::Visa.cvv_len(), 3);
    }

    #[test]
    fn test_last_four() {
        assert_eq!(last_four("4111 1111 1111 1234"), "1234");
        assert_eq!(last_four("3714 4963 5398 431"), "8431");
        assert_eq!(last_four("12"), "12");
    }

    #[test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("41111"), "4111 1");
        assert_eq!(format_card_number("41111111111111112222"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry("1227"), "12/27");
        assert_eq!(format_expiry("12/2"), "12/2");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12ab345"), "12/34");
    }
}
