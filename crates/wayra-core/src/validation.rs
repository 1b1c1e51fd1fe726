//! # Validation Module
//!
//! Input validation for the pricing and product forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web form (TypeScript)                                        │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── precio_compra: finite, > 0, bounded                               │
//! │  ├── tasa_usd: present, finite, > 0, bounded                           │
//! │  └── config values: percentages in range                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PricingEngine (integer math only)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Numeric inputs arrive as `f64` from the form and leave as an
//! [`ExactAmount`] holding exactly the digits typed. Nothing is rounded here.

use crate::error::ValidationError;
use crate::money::ExactAmount;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted purchase cost (in its own currency).
///
/// Keeps the full cost × rate × margin × IVA product well inside i64 pesos.
pub const MAX_PRECIO_COMPRA: f64 = 10_000_000_000.0;

/// Largest accepted exchange rate (COP per USD).
pub const MAX_TASA_USD: f64 = 100_000.0;

/// Largest accepted margin: 1000%.
pub const MAX_MARGIN_BPS: u32 = 100_000;

/// Largest accepted IVA or tier ratio: 100%.
pub const MAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase cost and returns it as an exact decimal.
///
/// ## Rules
/// - Must be finite (no NaN / infinity from a half-typed field)
/// - Must not exceed [`MAX_PRECIO_COMPRA`]
/// - Must be positive (> 0); any positive amount is kept, however small
///
/// ## Example
/// ```rust
/// use wayra_core::validation::validate_precio_compra;
///
/// let cost = validate_precio_compra(10.125).unwrap();
/// assert_eq!((cost.coefficient(), cost.exponent()), (10_125, -3));
/// assert!(validate_precio_compra(0.0).is_err());
/// assert!(validate_precio_compra(f64::NAN).is_err());
/// ```
pub fn validate_precio_compra(value: f64) -> ValidationResult<ExactAmount> {
    to_exact("precio_compra", value, MAX_PRECIO_COMPRA)
}

/// Validates the USD→COP exchange rate and returns it as an exact decimal.
///
/// ## Rules
/// - Required (a USD-priced line cannot be priced without it)
/// - Finite, positive, at most [`MAX_TASA_USD`]
pub fn validate_tasa_usd(value: Option<f64>) -> ValidationResult<ExactAmount> {
    let value = value.ok_or_else(|| ValidationError::Required {
        field: "tasa_usd".to_string(),
    })?;
    to_exact("tasa_usd", value, MAX_TASA_USD)
}

fn to_exact(field: &str, value: f64, max: f64) -> ValidationResult<ExactAmount> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: max as i64,
        });
    }

    match ExactAmount::from_f64(value) {
        Some(amount) if value > 0.0 && !amount.is_zero() => Ok(amount),
        _ => Err(ValidationError::MustBePositive {
            field: field.to_string(),
        }),
    }
}

/// Validates a basis-point value against an upper bound.
///
/// ## Example
/// ```rust
/// use wayra_core::validation::{validate_bps, MAX_RATE_BPS};
///
/// assert!(validate_bps("porcentaje_iva_bps", 1900, MAX_RATE_BPS).is_ok());
/// assert!(validate_bps("porcentaje_iva_bps", 12_000, MAX_RATE_BPS).is_err());
/// ```
pub fn validate_bps(field: &str, bps: u32, max: u32) -> ValidationResult<()> {
    if bps > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: max as i64,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates and normalizes a category name.
///
/// ## Rules
/// - Must not be blank
/// - At most 50 characters
///
/// ## Returns
/// The trimmed, upper-cased category (`" lubricantes "` → `"LUBRICANTES"`).
pub fn validate_categoria(categoria: &str) -> ValidationResult<String> {
    let categoria = categoria.trim();

    if categoria.is_empty() {
        return Err(ValidationError::Required {
            field: "categoria".to_string(),
        });
    }

    if categoria.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "categoria".to_string(),
            max: 50,
        });
    }

    Ok(categoria.to_uppercase())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use wayra_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Aceite ENI i-Sint 10W40").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "nombre".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "nombre".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
