//! # Domain Types
//!
//! Core domain types shared by the pricing engine and the dashboard API.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  TipoProducto   │   │     Moneda      │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  WAYRA_ENI      │   │  COP            │   │  bps (u32)      │       │
//! │  │  WAYRA_CALAN    │   │  USD            │   │  1900 = 19%     │       │
//! │  │  WAYRA_OTROS    │   └─────────────────┘   └─────────────────┘       │
//! │  │  TORNI_REPUESTO │                                                   │
//! │  │  TORNILLERIA    │   ┌──────────────────────────────────────┐        │
//! │  └─────────────────┘   │  Product                             │        │
//! │                        │  tipo + categoria → pricing rules    │        │
//! │                        │  precio_compra → 3 price tiers       │        │
//! │                        │  codigo_barras (EAN-13, immutable)   │        │
//! │                        └──────────────────────────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1900 bps = 19% (IVA general en Colombia)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

/// `19%`, `8.25%`
impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Product Line
// =============================================================================

/// The product line a product belongs to.
///
/// `WAYRA_*` lines are the workshop's oil and parts brands; `TORNI_*` and
/// `TORNILLERIA` belong to the TorniRepuestos counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoProducto {
    WayraEni,
    WayraCalan,
    WayraOtros,
    TorniRepuesto,
    Tornilleria,
}

impl TipoProducto {
    /// Every product line, in display order.
    pub const ALL: [TipoProducto; 5] = [
        TipoProducto::WayraEni,
        TipoProducto::WayraCalan,
        TipoProducto::WayraOtros,
        TipoProducto::TorniRepuesto,
        TipoProducto::Tornilleria,
    ];

    /// Wire name used by the API and the config file.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TipoProducto::WayraEni => "WAYRA_ENI",
            TipoProducto::WayraCalan => "WAYRA_CALAN",
            TipoProducto::WayraOtros => "WAYRA_OTROS",
            TipoProducto::TorniRepuesto => "TORNI_REPUESTO",
            TipoProducto::Tornilleria => "TORNILLERIA",
        }
    }
}

impl fmt::Display for TipoProducto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TipoProducto {
    type Err = CoreError;

    /// Unknown names surface as a missing pricing configuration, never as
    /// a silent default line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        TipoProducto::ALL
            .into_iter()
            .find(|tipo| tipo.as_str() == wanted)
            .ok_or_else(|| CoreError::ConfigNotFound {
                tipo: s.trim().to_string(),
                categoria: String::new(),
            })
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Currency a purchase cost is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Moneda {
    /// Colombian peso.
    #[default]
    Cop,
    /// US dollar, converted with the day's `tasa_usd`.
    Usd,
}

impl fmt::Display for Moneda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Moneda::Cop => write!(f, "COP"),
            Moneda::Usd => write!(f, "USD"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A priced product as stored by the dashboard API.
///
/// The core never persists this; it only produces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant (shop) this product belongs to.
    pub tenant_id: String,

    /// Display name.
    pub nombre: String,

    /// Product line.
    pub tipo: TipoProducto,

    /// Sub-category inside the line (normalized upper case).
    pub categoria: String,

    /// Purchase cost in `moneda_compra`, exactly as entered.
    pub precio_compra: f64,

    /// Currency of the purchase cost.
    pub moneda_compra: Moneda,

    /// Caller's IVA choice; only meaningful when the line's IVA is optional.
    pub aplica_iva: bool,

    /// Retail price (pesos).
    pub precio_venta: Money,

    /// Minorista tier (pesos).
    pub precio_minorista: Money,

    /// Mayorista tier (pesos).
    pub precio_mayorista: Money,

    /// EAN-13 code, attached once at creation.
    pub codigo_barras: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
