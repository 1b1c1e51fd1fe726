//! # API Error Type
//!
//! What the dashboard's HTTP handlers send back when pricing or barcode
//! handling fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product form                      Handler                              │
//! │  ────────────                      ───────                              │
//! │                                                                         │
//! │  POST /pricing/preview ──► PricingService::preview                     │
//! │                                   │                                     │
//! │          ConfigNotFound ──────────┼──► PRICING_UNAVAILABLE             │
//! │          Validation ──────────────┼──► VALIDATION_ERROR                │
//! │          InvalidBarcode ──────────┼──► INVALID_BARCODE                 │
//! │          TierOrderViolation ──────┼──► BUSINESS_RULE                   │
//! │          InvalidConfig ───────────┼──► CONFIG_ERROR                    │
//! │          Registry ────────────────┴──► INTERNAL                        │
//! │                                                                         │
//! │  ◄── { "code": "PRICING_UNAVAILABLE", "message": "No se puede ..." }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration and registry details are logged here and never reach the
//! browser. Every message is in Spanish, the dashboard's language.

use serde::Serialize;
use ts_rs::TS;
use wayra_core::{CoreError, ValidationError};

use crate::error::CatalogError;

/// User-facing message for an unknown product line.
pub const PRICING_UNAVAILABLE_MESSAGE: &str =
    "No se puede calcular el precio de esta línea de producto";

/// API error body.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_BARCODE",
///   "message": "Código de barras inválido: CHECKSUM"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No pricing rules for the product line (422)
    PricingUnavailable,

    /// Input validation failed (400)
    ValidationError,

    /// Scanned or typed code is not a valid EAN-13 (400)
    InvalidBarcode,

    /// Business rule rejected the operation (422)
    BusinessRule,

    /// Server-side configuration is broken (500)
    ConfigError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status the handlers answer with.
    pub const fn http_status(&self) -> u16 {
        match self {
            ErrorCode::ValidationError | ErrorCode::InvalidBarcode => 400,
            ErrorCode::PricingUnavailable | ErrorCode::BusinessRule => 422,
            ErrorCode::ConfigError | ErrorCode::Internal => 500,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates the fixed pricing-unavailable error.
    pub fn pricing_unavailable() -> Self {
        ApiError::new(ErrorCode::PricingUnavailable, PRICING_UNAVAILABLE_MESSAGE)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigNotFound { tipo, categoria } => {
                tracing::warn!(%tipo, %categoria, "Pricing requested for unconfigured line");
                ApiError::pricing_unavailable()
            }
            CoreError::InvalidConfig { reason } => {
                tracing::error!("Invalid pricing configuration: {}", reason);
                ApiError::new(
                    ErrorCode::ConfigError,
                    "La configuración de precios no es válida",
                )
            }
            CoreError::TierOrderViolation {
                precio_venta,
                precio_minorista,
                precio_mayorista,
            } => ApiError::new(
                ErrorCode::BusinessRule,
                format!(
                    "Los precios no respetan el orden: venta {}, minorista {}, mayorista {}",
                    precio_venta, precio_minorista, precio_mayorista
                ),
            ),
            CoreError::Validation(e) => ApiError::validation(validation_message(&e)),
        }
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::Required { field } => format!("El campo {} es obligatorio", field),
        ValidationError::TooLong { field, max } => {
            format!("El campo {} admite como máximo {} caracteres", field, max)
        }
        ValidationError::MustBePositive { field } => {
            format!("El campo {} debe ser mayor que cero", field)
        }
        ValidationError::NotFinite { field } => {
            format!("El campo {} debe ser un número válido", field)
        }
        ValidationError::OutOfRange { field, min, max } => {
            format!("El campo {} debe estar entre {} y {}", field, min, max)
        }
    }
}

/// Converts catalog errors to API errors.
impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Core(core) => core.into(),
            CatalogError::InvalidBarcode { reason, .. } => ApiError::new(
                ErrorCode::InvalidBarcode,
                format!("Código de barras inválido: {}", reason.code()),
            ),
            CatalogError::BarcodeTaken(code) => ApiError::new(
                ErrorCode::BusinessRule,
                format!("El código de barras {} ya está asignado", code),
            ),
            CatalogError::BarcodeSpaceExhausted { attempts } => {
                tracing::error!(attempts, "Barcode generation kept colliding");
                ApiError::internal("No se pudo generar un código de barras")
            }
            CatalogError::InvalidConfig(e)
            | CatalogError::ConfigLoadFailed(e)
            | CatalogError::ConfigSaveFailed(e) => {
                tracing::error!("Catalog configuration error: {}", e);
                ApiError::new(
                    ErrorCode::ConfigError,
                    "La configuración del catálogo no es válida",
                )
            }
            CatalogError::Registry(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Barcode registry failed: {}", e);
                ApiError::internal("No se pudo consultar el código de barras")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
