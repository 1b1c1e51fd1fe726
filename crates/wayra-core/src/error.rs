//! # Error Types
//!
//! Domain-specific error types for wayra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wayra-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing configuration + business rules         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  wayra-catalog errors (separate crate)                                 │
//! │  ├── CatalogError     - Config files, barcode assignment               │
//! │  └── ApiError         - What the web UI sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CatalogError → ApiError → UI      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Barcode validation failures are NOT errors: a bad scan is an expected
//! event and is returned as a value (see [`crate::barcode::BarcodeValidation`]).

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No pricing rules exist for the requested product line.
    ///
    /// ## When This Occurs
    /// - `tipo` is not one of the five known product lines
    /// - `categoria` is not configured under that `tipo`
    ///
    /// ## User Workflow
    /// ```text
    /// Product form: tipo=TORNILLERIA, categoria=LUBRICANTES
    ///      │
    ///      ▼
    /// pricing_config() → no entry
    ///      │
    ///      ▼
    /// ConfigNotFound { tipo: "TORNILLERIA", categoria: "LUBRICANTES" }
    ///      │
    ///      ▼
    /// UI shows: "No se puede calcular el precio de esta línea de producto"
    /// ```
    ///
    /// Never recovered by assuming a zero markup.
    #[error("No pricing configuration for {tipo}/{categoria}")]
    ConfigNotFound { tipo: String, categoria: String },

    /// The pricing table itself is malformed (duplicate pair, bad range).
    #[error("Invalid pricing configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Tier prices are not ordered mayorista ≤ minorista ≤ venta.
    #[error(
        "Price tiers out of order: venta {precio_venta}, minorista {precio_minorista}, mayorista {precio_mayorista}"
    )]
    TierOrderViolation {
        precio_venta: i64,
        precio_minorista: i64,
        precio_mayorista: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true when the pricing table (not the user) is at fault.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CoreError::ConfigNotFound { .. } | CoreError::InvalidConfig { .. }
        )
    }

    /// Returns true when the caller should re-prompt the user.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any computation happens, so a failed validation never
/// leaves a half-computed quote behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// NaN or infinity reached a numeric input.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
