//! # Barcode Module
//!
//! EAN-13 generation and validation for product codes.
//!
//! ## Code Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EAN-13:   7 7 0 4 8 2 1 5 9 3 6 0 │ 4                                  │
//! │            └── payload (12) ─────┘ └ check digit                        │
//! │            └pfx┘ (optional GS1 prefix, rest random)                     │
//! │                                                                         │
//! │  check = (10 - Σ dᵢ·wᵢ mod 10) mod 10                                   │
//! │  wᵢ = 1 at odd 1-based positions, 3 at even positions                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where Codes Come From
//! ```text
//! New product without code ──► BarcodeGenerator::generate() ──► attach once
//!
//! Camera scan / OCR / typing ──► validate_barcode(raw) ──┬──► valid: lookup key
//!                                                        └──► {valid:false, reason}
//! ```
//!
//! A failed validation is a normal outcome (people scan garbage all day), so
//! it is a value, not an `Err`. Uniqueness against existing products is the
//! caller's job.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Total length of an EAN-13 code.
pub const EAN13_LEN: usize = 13;

/// Digits before the check digit.
pub const EAN13_PAYLOAD_LEN: usize = 12;

// =============================================================================
// Check Digit
// =============================================================================

/// Computes the EAN-13 check digit for a 12-digit payload.
///
/// Returns `None` unless `payload` is exactly 12 ASCII digits.
///
/// ## Example
/// ```rust
/// use wayra_core::barcode::ean13_check_digit;
///
/// assert_eq!(ean13_check_digit("400638133393"), Some(1));
/// assert_eq!(ean13_check_digit("40063813339"), None);
/// ```
pub fn ean13_check_digit(payload: &str) -> Option<u8> {
    let bytes = payload.as_bytes();
    if bytes.len() != EAN13_PAYLOAD_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(check_digit(bytes))
}

/// Caller guarantees 12 ASCII digits.
fn check_digit(payload: &[u8]) -> u8 {
    let sum: u32 = payload
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let digit = (b - b'0') as u32;
            // i is 0-based: even index = odd 1-based position
            if i % 2 == 0 {
                digit
            } else {
                digit * 3
            }
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

// =============================================================================
// Validation Result
// =============================================================================

/// Why a scanned or typed code was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BarcodeRejection {
    /// Not 13 characters after trimming.
    #[error("barcode must have exactly 13 digits")]
    Length,

    /// Contains something other than ASCII digits.
    #[error("barcode may only contain digits")]
    NonDigit,

    /// Last digit does not match the computed check digit.
    #[error("barcode check digit does not match")]
    Checksum,
}

impl BarcodeRejection {
    /// Wire code (`LENGTH`, `NON_DIGIT`, `CHECKSUM`).
    pub const fn code(&self) -> &'static str {
        match self {
            BarcodeRejection::Length => "LENGTH",
            BarcodeRejection::NonDigit => "NON_DIGIT",
            BarcodeRejection::Checksum => "CHECKSUM",
        }
    }
}

/// Outcome of [`validate_barcode`].
///
/// Serialized as `{"valid":true}` or `{"valid":false,"reason":"CHECKSUM"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BarcodeValidation {
    pub valid: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reason: Option<BarcodeRejection>,
}

impl BarcodeValidation {
    const fn ok() -> Self {
        BarcodeValidation {
            valid: true,
            reason: None,
        }
    }

    const fn rejected(reason: BarcodeRejection) -> Self {
        BarcodeValidation {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Validates a scanned, OCR'd, or typed EAN-13 code.
///
/// ## Checks
/// 1. Trim surrounding whitespace
/// 2. Every character is an ASCII digit, else `NON_DIGIT`
/// 3. Exactly 13 digits, else `LENGTH`
/// 4. Check digit matches, else `CHECKSUM`
///
/// The charset check runs before the length check, so a short code with a
/// letter in it (`"12345678901A"`) reports `NON_DIGIT`.
///
/// ## Example
/// ```rust
/// use wayra_core::barcode::{validate_barcode, BarcodeRejection};
///
/// assert!(validate_barcode("4006381333931").valid);
/// assert_eq!(validate_barcode("12345").reason, Some(BarcodeRejection::Length));
/// assert_eq!(validate_barcode("12345678901A").reason, Some(BarcodeRejection::NonDigit));
/// assert_eq!(validate_barcode("4006381333932").reason, Some(BarcodeRejection::Checksum));
/// ```
pub fn validate_barcode(code: &str) -> BarcodeValidation {
    match check(code) {
        Ok(_) => BarcodeValidation::ok(),
        Err(reason) => BarcodeValidation::rejected(reason),
    }
}

/// Shared by `validate_barcode` and `Barcode::parse`; returns the trimmed code.
fn check(code: &str) -> Result<&str, BarcodeRejection> {
    let code = code.trim();
    let bytes = code.as_bytes();

    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(BarcodeRejection::NonDigit);
    }

    if bytes.len() != EAN13_LEN {
        return Err(BarcodeRejection::Length);
    }

    let expected = check_digit(&bytes[..EAN13_PAYLOAD_LEN]);
    if bytes[EAN13_PAYLOAD_LEN] - b'0' != expected {
        return Err(BarcodeRejection::Checksum);
    }

    Ok(code)
}

// =============================================================================
// Barcode
// =============================================================================

/// A checksum-correct EAN-13 code.
///
/// Only obtainable through [`Barcode::parse`] or a [`BarcodeGenerator`], so
/// holding one proves it is valid. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Barcode(String);

impl Barcode {
    /// Parses a raw code (whitespace-trimmed).
    pub fn parse(code: &str) -> Result<Self, BarcodeRejection> {
        check(code).map(|trimmed| Barcode(trimmed.to_string()))
    }

    /// The 13 digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first 12 digits.
    pub fn payload(&self) -> &str {
        &self.0[..EAN13_PAYLOAD_LEN]
    }

    /// The trailing check digit.
    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[EAN13_PAYLOAD_LEN] - b'0'
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Barcode {
    type Err = BarcodeRejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Barcode::parse(s)
    }
}

impl TryFrom<String> for Barcode {
    type Error = BarcodeRejection;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Barcode::parse(&value)
    }
}

impl From<Barcode> for String {
    fn from(barcode: Barcode) -> Self {
        barcode.0
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Generates new EAN-13 codes, optionally under a fixed GS1 prefix.
///
/// ## Example
/// ```rust
/// use wayra_core::barcode::{validate_barcode, BarcodeGenerator};
///
/// let generator = BarcodeGenerator::new("770").unwrap(); // GS1 Colombia
/// let code = generator.generate();
/// assert!(code.as_str().starts_with("770"));
/// assert!(validate_barcode(code.as_str()).valid);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarcodeGenerator {
    prefix: String,
}

impl BarcodeGenerator {
    /// Creates a generator for `prefix` (0 to 11 digits, blank = none).
    ///
    /// At least one payload digit is always left for randomness.
    pub fn new(prefix: &str) -> CoreResult<Self> {
        let prefix = prefix.trim();

        if !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidConfig {
                reason: format!("barcode prefix '{}' must contain only digits", prefix),
            });
        }

        if prefix.len() >= EAN13_PAYLOAD_LEN {
            return Err(CoreError::InvalidConfig {
                reason: format!(
                    "barcode prefix '{}' must be shorter than {} digits",
                    prefix, EAN13_PAYLOAD_LEN
                ),
            });
        }

        Ok(BarcodeGenerator {
            prefix: prefix.to_string(),
        })
    }

    /// The configured prefix (possibly empty).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generates a code with the thread-local RNG.
    pub fn generate(&self) -> Barcode {
        self.generate_with(&mut rand::thread_rng())
    }

    /// Generates a code from the given RNG (seeded RNGs give repeatable codes).
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> Barcode {
        let mut digits = Vec::with_capacity(EAN13_LEN);
        digits.extend_from_slice(self.prefix.as_bytes());
        while digits.len() < EAN13_PAYLOAD_LEN {
            digits.push(b'0' + rng.gen_range(0..10u8));
        }
        digits.push(b'0' + check_digit(&digits));

        // Only ASCII digits were pushed
        Barcode(digits.into_iter().map(char::from).collect())
    }
}

/// Generates an unprefixed EAN-13 code.
pub fn generate_barcode() -> Barcode {
    BarcodeGenerator::default().generate()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_reference_check_digit() {
        assert_eq!(ean13_check_digit("400638133393"), Some(1));
        assert!(validate_barcode("4006381333931").valid);
        // Another published code
        assert_eq!(ean13_check_digit("590123412345"), Some(7));
    }

    #[test]
    fn test_check_digit_rejects_bad_payload() {
        assert_eq!(ean13_check_digit(""), None);
        assert_eq!(ean13_check_digit("4006381333931"), None);
        assert_eq!(ean13_check_digit("40063813339A"), None);
    }

    #[test]
    fn test_generated_codes_validate() {
        let mut rng = StdRng::seed_from_u64(7);
        let generator = BarcodeGenerator::default();
        for _ in 0..500 {
            let code = generator.generate_with(&mut rng);
            assert_eq!(code.as_str().len(), EAN13_LEN);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
            assert_eq!(validate_barcode(code.as_str()), BarcodeValidation::ok());
        }

        assert!(validate_barcode(generate_barcode().as_str()).valid);
    }

    #[test]
    fn test_seeded_generation_is_repeatable() {
        let generator = BarcodeGenerator::new("770").unwrap();
        let a = generator.generate_with(&mut StdRng::seed_from_u64(42));
        let b = generator.generate_with(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("770"));
    }

    #[test]
    fn test_flipping_check_digit_is_detected() {
        let code = "4006381333931";
        for replacement in b'0'..=b'9' {
            if replacement == b'1' {
                continue;
            }
            let mut bytes = code.as_bytes().to_vec();
            bytes[12] = replacement;
            let flipped = String::from_utf8(bytes).unwrap();
            assert_eq!(
                validate_barcode(&flipped).reason,
                Some(BarcodeRejection::Checksum),
                "{flipped}"
            );
        }
    }

    /// Weights 1 and 3 are both coprime with 10, so any single-digit
    /// substitution anywhere in the code changes the checksum.
    #[test]
    fn test_any_single_digit_substitution_is_detected() {
        let mut rng = StdRng::seed_from_u64(99);
        let code = BarcodeGenerator::default().generate_with(&mut rng);
        let original = code.as_str().as_bytes();

        for position in 0..EAN13_LEN {
            for replacement in b'0'..=b'9' {
                if replacement == original[position] {
                    continue;
                }
                let mut bytes = original.to_vec();
                bytes[position] = replacement;
                let flipped = String::from_utf8(bytes).unwrap();
                assert_eq!(
                    validate_barcode(&flipped).reason,
                    Some(BarcodeRejection::Checksum)
                );
            }
        }
    }

    #[test]
    fn test_length_and_charset_rejection() {
        assert_eq!(validate_barcode("12345").reason, Some(BarcodeRejection::Length));
        assert_eq!(validate_barcode("").reason, Some(BarcodeRejection::Length));
        assert_eq!(validate_barcode("   ").reason, Some(BarcodeRejection::Length));
        assert_eq!(
            validate_barcode("40063813339310").reason,
            Some(BarcodeRejection::Length)
        );
        assert_eq!(
            validate_barcode("12345678901A").reason,
            Some(BarcodeRejection::NonDigit)
        );
        assert_eq!(
            validate_barcode("4006-381333931").reason,
            Some(BarcodeRejection::NonDigit)
        );
        // Non-ASCII digits are not digits here
        assert_eq!(
            validate_barcode("400638133393١").reason,
            Some(BarcodeRejection::NonDigit)
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert!(validate_barcode("  4006381333931\n").valid);
        let parsed = Barcode::parse("\t4006381333931 ").unwrap();
        assert_eq!(parsed.as_str(), "4006381333931");
        assert_eq!(parsed.payload(), "400638133393");
        assert_eq!(parsed.check_digit(), 1);
    }

    #[test]
    fn test_validation_json_shape() {
        let ok = serde_json::to_string(&validate_barcode("4006381333931")).unwrap();
        assert_eq!(ok, r#"{"valid":true}"#);

        let bad = serde_json::to_string(&validate_barcode("4006381333932")).unwrap();
        assert_eq!(bad, r#"{"valid":false,"reason":"CHECKSUM"}"#);

        assert_eq!(BarcodeRejection::NonDigit.code(), "NON_DIGIT");
    }

    #[test]
    fn test_barcode_serde_rejects_invalid() {
        let code: Barcode = serde_json::from_str("\"4006381333931\"").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"4006381333931\"");
        assert!(serde_json::from_str::<Barcode>("\"4006381333930\"").is_err());
    }

    #[test]
    fn test_generator_prefix_rules() {
        assert!(BarcodeGenerator::new("").is_ok());
        assert!(BarcodeGenerator::new("77012345678").is_ok());
        assert!(BarcodeGenerator::new("770123456789").is_err());
        assert!(BarcodeGenerator::new("77O").is_err());

        let full = BarcodeGenerator::new("77012345678").unwrap();
        let code = full.generate_with(&mut StdRng::seed_from_u64(1));
        assert!(code.as_str().starts_with("77012345678"));
        assert!(validate_barcode(code.as_str()).valid);
    }
}
