//! # Catalog Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Pricing     │  │       Barcodes          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Core(..)       │  │  InvalidBarcode         │ │
//! │  │  ConfigLoad..   │  │   ConfigNotFound│  │  BarcodeTaken           │ │
//! │  │  ConfigSave..   │  │   Validation    │  │  BarcodeSpaceExhausted  │ │
//! │  │                 │  │   TierOrder..   │  │  Registry               │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use wayra_core::{BarcodeRejection, CoreError};

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised around the pricing core.
#[derive(Debug, Error)]
pub enum CatalogError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values are inconsistent.
    #[error("Invalid catalog configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Pricing Errors
    // =========================================================================
    /// Pricing core rejected the request.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Barcode Errors
    // =========================================================================
    /// A code supplied by the user is not a valid EAN-13.
    #[error("Invalid barcode '{code}': {reason}")]
    InvalidBarcode {
        code: String,
        reason: BarcodeRejection,
    },

    /// A code supplied by the user already belongs to another product.
    #[error("Barcode {0} is already assigned")]
    BarcodeTaken(String),

    /// Every generated candidate collided with an existing code.
    #[error("Could not find a free barcode after {attempts} attempts")]
    BarcodeSpaceExhausted { attempts: u32 },

    /// The uniqueness check itself failed (e.g. database unavailable).
    #[error("Barcode registry error: {0}")]
    Registry(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CatalogError {
    fn from(err: toml::ser::Error) -> Self {
        CatalogError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl CatalogError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        match self {
            CatalogError::InvalidConfig(_)
            | CatalogError::ConfigLoadFailed(_)
            | CatalogError::ConfigSaveFailed(_) => true,
            CatalogError::Core(core) => core.is_config_error(),
            _ => false,
        }
    }

    /// Returns true if the user should correct their input and retry.
    pub fn is_user_error(&self) -> bool {
        match self {
            CatalogError::InvalidBarcode { .. } | CatalogError::BarcodeTaken(_) => true,
            CatalogError::Core(core) => core.is_input_error(),
            _ => false,
        }
    }
}
