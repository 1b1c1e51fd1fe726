//! # wayra-core: Pure Pricing and Barcode Logic for the Wayra Dashboard
//!
//! This crate holds the two pieces of the dashboard that carry real
//! invariants: the price tier / IVA computation and EAN-13 barcodes.
//! Everything here is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wayra Dashboard                                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web UI (product / order forms)               │   │
//! │  │    Price preview ──► Save product ──► Scan barcode ──► Lookup   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ REST                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          wayra-catalog (config, PricingService, ApiError)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ wayra-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  barcode  │  │   │
//! │  │   │  Product  │  │   Money   │  │  Engine   │  │  EAN-13   │  │   │
//! │  │   │  TaxRate  │  │  rounding │  │  Table    │  │ Generator │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TipoProducto, Moneda, TaxRate)
//! - [`money`] - Integer peso amounts with a single half-up rounding point
//! - [`pricing`] - Pricing table, engine and quotes
//! - [`barcode`] - EAN-13 check digit, validation, generation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, safe from any thread
//! 2. **No I/O**: configuration is passed in, never read here
//! 3. **Integer Money**: exact decimal inputs, rates in basis points, prices in pesos
//! 4. **Explicit Errors**: pricing failures are typed; bad scans are values
//!
//! ## Example Usage
//!
//! ```rust
//! use wayra_core::{compute_prices, generate_barcode, validate_barcode};
//!
//! let quote = compute_prices(1_000.0, "TORNILLERIA", "TORNILLERIA", false, None).unwrap();
//! assert_eq!(quote.precio_venta.pesos(), 2_380); // IVA is obligatory here
//!
//! let code = generate_barcode();
//! assert!(validate_barcode(code.as_str()).valid);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::{
    generate_barcode, validate_barcode, Barcode, BarcodeGenerator, BarcodeRejection,
    BarcodeValidation,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{ExactAmount, Money};
pub use pricing::{
    compute_prices, get_pricing_config, PriceQuote, PricingEngine, PricingTable,
    ProductLineConfig,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tenant used by single-shop installs.
///
/// Every product row carries a tenant id so Wayra and TorniRepuestos can
/// share one database.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";
