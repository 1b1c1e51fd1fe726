//! # wayra-catalog: Pricing Service for the Wayra Dashboard API
//!
//! Wraps the pure `wayra-core` logic with what a running server needs:
//! configuration from file and environment, a service object the HTTP
//! handlers share, barcode uniqueness, and user-facing error bodies.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  pricing.toml + WAYRA_* env ──► CatalogConfig ──► PricingService        │
//! │                                                        │                │
//! │           ┌────────────────────┬───────────────────────┤                │
//! │           ▼                    ▼                       ▼                │
//! │     preview(request)   build_product(draft)    accept_scanned(raw)      │
//! │           │                    │                       │                │
//! │           └──────── CatalogError ──► ApiError {code, message} ──► UI    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML + environment configuration
//! - [`service`] - `PricingService` and the barcode registry seam
//! - [`api_error`] - Error bodies for the HTTP layer
//! - [`error`] - Catalog error types
//! - [`logging`] - Tracing subscriber setup

pub mod api_error;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;

pub use api_error::{ApiError, ErrorCode};
pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use service::{
    BarcodeRegistry, InMemoryBarcodeRegistry, PriceRequest, PricingService, ProductDraft,
};
