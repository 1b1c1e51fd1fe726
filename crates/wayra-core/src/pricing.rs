//! # Pricing Module
//!
//! Turns a purchase cost into the three customer-facing price tiers.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  precio_compra ──► validate (finite, > 0) ──► exact decimal             │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  (tipo, categoria) ──► PricingTable ──► ProductLineConfig               │
//! │        │                                  │ unknown pair? ConfigNotFound│
//! │        ▼                                  ▼                             │
//! │  costo_local   = conversion_usd ? cost × tasa_usd : cost                │
//! │  base          = costo_local × (1 + margen)                             │
//! │  iva_aplicable = iva_obligatorio OR aplica_iva                          │
//! │  precio_venta  = iva_aplicable ? base × (1 + iva) : base                │
//! │        │              (one exact fraction, rounded once, half-up)      │
//! │        ▼                                                                │
//! │  precio_minorista = precio_venta × ratio_minorista                      │
//! │  precio_mayorista = precio_venta × ratio_mayorista                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tier ratios are applied to `precio_venta`, which already contains IVA, so
//! IVA is never applied twice.
//!
//! ## Usage
//! ```rust
//! use wayra_core::pricing::compute_prices;
//!
//! // 10 USD of CALAN oil at 4.000 COP/USD: 40.000 → +15% → +IVA 15%
//! let quote = compute_prices(10.0, "WAYRA_CALAN", "CALAN", false, Some(4000.0)).unwrap();
//! assert_eq!(quote.precio_venta.pesos(), 52_900);
//! assert!(quote.iva_aplicable);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{ExactAmount, Money, BPS_EXPONENT};
use crate::types::{Moneda, TaxRate, TipoProducto};
use crate::validation::{
    validate_bps, validate_categoria, validate_precio_compra, validate_tasa_usd, MAX_MARGIN_BPS,
    MAX_RATE_BPS,
};

/// A tier ratio equal to `precio_venta`.
pub const FULL_RATIO_BPS: u32 = 10_000;

// =============================================================================
// Product Line Configuration
// =============================================================================

/// Pricing rules for one `(tipo, categoria)` pair.
///
/// ## Config File Shape
/// ```toml
/// [[lines]]
/// tipo = "WAYRA_CALAN"
/// categoria = "CALAN"
/// margen_ganancia_bps = 1500
/// iva_obligatorio = true
/// porcentaje_iva_bps = 1500
/// conversion_usd = true
/// ratio_minorista_bps = 9500
/// ratio_mayorista_bps = 9000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductLineConfig {
    pub tipo: TipoProducto,

    pub categoria: String,

    /// Markup over cost in basis points (1500 = 15%).
    pub margen_ganancia_bps: u32,

    /// IVA always applies; the caller's `aplica_iva` is ignored.
    #[serde(default)]
    pub iva_obligatorio: bool,

    /// IVA rate in basis points (1900 = 19%).
    #[serde(default)]
    pub porcentaje_iva_bps: u32,

    /// Cost is in USD and must be converted with `tasa_usd`.
    #[serde(default)]
    pub conversion_usd: bool,

    /// Minorista tier as a fraction of `precio_venta`.
    #[serde(default = "full_ratio")]
    pub ratio_minorista_bps: u32,

    /// Mayorista tier as a fraction of `precio_venta`.
    #[serde(default = "full_ratio")]
    pub ratio_mayorista_bps: u32,
}

fn full_ratio() -> u32 {
    FULL_RATIO_BPS
}

impl ProductLineConfig {
    /// Returns the IVA rate.
    #[inline]
    pub fn porcentaje_iva(&self) -> TaxRate {
        TaxRate::from_bps(self.porcentaje_iva_bps)
    }

    /// Currency purchase costs of this line are entered in.
    pub fn moneda_compra(&self) -> Moneda {
        if self.conversion_usd {
            Moneda::Usd
        } else {
            Moneda::Cop
        }
    }

    /// Checks ranges and normalizes the category name.
    pub fn validate(&mut self) -> CoreResult<()> {
        let invalid = |reason: String| CoreError::InvalidConfig {
            reason: format!("{}/{}: {}", self.tipo, self.categoria, reason),
        };

        let categoria = validate_categoria(&self.categoria).map_err(|e| invalid(e.to_string()))?;
        validate_bps("margen_ganancia_bps", self.margen_ganancia_bps, MAX_MARGIN_BPS)
            .map_err(|e| invalid(e.to_string()))?;
        validate_bps("porcentaje_iva_bps", self.porcentaje_iva_bps, MAX_RATE_BPS)
            .map_err(|e| invalid(e.to_string()))?;
        validate_bps("ratio_minorista_bps", self.ratio_minorista_bps, MAX_RATE_BPS)
            .map_err(|e| invalid(e.to_string()))?;
        validate_bps("ratio_mayorista_bps", self.ratio_mayorista_bps, MAX_RATE_BPS)
            .map_err(|e| invalid(e.to_string()))?;

        self.categoria = categoria;
        Ok(())
    }
}

/// The shop's pricing rules as deployed.
///
/// | tipo | categoria | margen | IVA | USD |
/// |------|-----------|--------|-----|-----|
/// | WAYRA_ENI | ENI | 15% | 19% optional | no |
/// | WAYRA_CALAN | CALAN | 15% | 15% obligatory | yes |
/// | WAYRA_OTROS | OTROS | 15% | 19% optional | no |
/// | TORNI_REPUESTO | REPUESTOS | 35% | 19% optional | no |
/// | TORNI_REPUESTO | LUBRICANTES | 15% | 19% optional | no |
/// | TORNILLERIA | TORNILLERIA | 100% | 19% obligatory | no |
///
/// Every line sells minorista at 95% and mayorista at 90% of `precio_venta`.
pub fn builtin_lines() -> Vec<ProductLineConfig> {
    let line = |tipo, categoria: &str, margen, iva_obligatorio, iva, conversion_usd| {
        ProductLineConfig {
            tipo,
            categoria: categoria.to_string(),
            margen_ganancia_bps: margen,
            iva_obligatorio,
            porcentaje_iva_bps: iva,
            conversion_usd,
            ratio_minorista_bps: 9_500,
            ratio_mayorista_bps: 9_000,
        }
    };

    vec![
        line(TipoProducto::WayraEni, "ENI", 1_500, false, 1_900, false),
        line(TipoProducto::WayraCalan, "CALAN", 1_500, true, 1_500, true),
        line(TipoProducto::WayraOtros, "OTROS", 1_500, false, 1_900, false),
        line(TipoProducto::TorniRepuesto, "REPUESTOS", 3_500, false, 1_900, false),
        line(TipoProducto::TorniRepuesto, "LUBRICANTES", 1_500, false, 1_900, false),
        line(TipoProducto::Tornilleria, "TORNILLERIA", 10_000, true, 1_900, false),
    ]
}

// =============================================================================
// Pricing Table
// =============================================================================

/// Lookup table keyed by `(tipo, CATEGORIA)`.
///
/// Read-only once built; share it freely between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingTable {
    lines: BTreeMap<(TipoProducto, String), ProductLineConfig>,
}

impl PricingTable {
    /// Builds a table, validating every entry.
    ///
    /// Fails on out-of-range values and on two entries for the same pair.
    pub fn from_entries<I>(entries: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = ProductLineConfig>,
    {
        let mut lines = BTreeMap::new();

        for mut entry in entries {
            entry.validate()?;
            let key = (entry.tipo, entry.categoria.clone());
            if lines.contains_key(&key) {
                return Err(CoreError::InvalidConfig {
                    reason: format!("duplicate pricing line {}/{}", key.0, key.1),
                });
            }
            lines.insert(key, entry);
        }

        Ok(PricingTable { lines })
    }

    /// The table from [`builtin_lines`].
    pub fn builtin() -> Self {
        let lines = builtin_lines()
            .into_iter()
            .map(|entry| ((entry.tipo, entry.categoria.clone()), entry))
            .collect();
        PricingTable { lines }
    }

    /// Finds the rules for a typed product line.
    pub fn lookup(&self, tipo: TipoProducto, categoria: &str) -> CoreResult<&ProductLineConfig> {
        let key = (tipo, categoria.trim().to_uppercase());
        self.lines.get(&key).ok_or_else(|| CoreError::ConfigNotFound {
            tipo: tipo.to_string(),
            categoria: categoria.trim().to_string(),
        })
    }

    /// Finds the rules for the raw strings coming from a form.
    ///
    /// Unknown `tipo` strings fail the same way as unknown pairs.
    pub fn get(&self, tipo: &str, categoria: &str) -> CoreResult<&ProductLineConfig> {
        let parsed = tipo
            .parse::<TipoProducto>()
            .map_err(|_| CoreError::ConfigNotFound {
                tipo: tipo.trim().to_string(),
                categoria: categoria.trim().to_string(),
            })?;
        self.lookup(parsed, categoria)
    }

    /// All configured lines, ordered by `tipo` then `categoria`.
    pub fn entries(&self) -> impl Iterator<Item = &ProductLineConfig> {
        self.lines.values()
    }

    /// Categories configured under `tipo` (for the form's dropdown).
    pub fn categorias(&self, tipo: TipoProducto) -> Vec<&str> {
        self.lines
            .keys()
            .filter(|(t, _)| *t == tipo)
            .map(|(_, categoria)| categoria.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Price Quote
// =============================================================================

/// Result of a price computation. Ephemeral; the caller persists it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// Retail price, IVA included when `iva_aplicable`.
    pub precio_venta: Money,

    pub precio_minorista: Money,

    pub precio_mayorista: Money,

    /// Whether IVA went into `precio_venta`.
    pub iva_aplicable: bool,

    /// The line's IVA rate (applied only when `iva_aplicable`).
    pub porcentaje_iva: TaxRate,

    /// Cost after currency conversion.
    pub costo_local: Money,

    /// Cost plus margin, before IVA.
    pub base_con_margen: Money,

    /// `precio_venta - base_con_margen`; zero without IVA.
    pub valor_iva: Money,

    /// Multiplier that produced `precio_minorista`.
    pub ratio_minorista_bps: u32,

    /// Multiplier that produced `precio_mayorista`.
    pub ratio_mayorista_bps: u32,
}

impl PriceQuote {
    /// Checks mayorista ≤ minorista ≤ venta.
    ///
    /// Ratios come from configuration, so the order is not guaranteed.
    pub fn check_tier_order(&self) -> CoreResult<()> {
        if self.precio_mayorista <= self.precio_minorista
            && self.precio_minorista <= self.precio_venta
        {
            return Ok(());
        }

        Err(CoreError::TierOrderViolation {
            precio_venta: self.precio_venta.pesos(),
            precio_minorista: self.precio_minorista.pesos(),
            precio_mayorista: self.precio_mayorista.pesos(),
        })
    }

    /// `"IVA 19% incluido"` when IVA applies.
    pub fn iva_label(&self) -> Option<String> {
        self.iva_aplicable
            .then(|| format!("IVA {} incluido", self.porcentaje_iva))
    }
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Stateless price calculator over a [`PricingTable`].
///
/// `Send + Sync`; one instance can serve every request.
#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    table: PricingTable,
}

impl PricingEngine {
    pub fn new(table: PricingTable) -> Self {
        PricingEngine { table }
    }

    /// Engine over the built-in table.
    pub fn builtin() -> Self {
        PricingEngine::new(PricingTable::builtin())
    }

    pub fn table(&self) -> &PricingTable {
        &self.table
    }

    /// Resolves the rules for a product line.
    ///
    /// ## Errors
    /// `ConfigNotFound` for any unknown `tipo` or `(tipo, categoria)` pair.
    pub fn pricing_config(&self, tipo: &str, categoria: &str) -> CoreResult<&ProductLineConfig> {
        self.table.get(tipo, categoria)
    }

    /// Computes the three price tiers for a purchase cost.
    ///
    /// ## Arguments
    /// * `precio_compra` - cost in the line's currency (USD when the line converts)
    /// * `aplica_iva` - caller's choice; ignored when IVA is obligatory
    /// * `tasa_usd` - COP per USD; required only for converting lines
    ///
    /// ## Errors
    /// - `Validation` for a non-positive / non-finite cost, or a missing or
    ///   invalid `tasa_usd` on a converting line
    /// - `ConfigNotFound` for an unknown product line
    ///
    /// ## User Workflow
    /// ```text
    /// Product form: user types precio_compra = 10 (USD), tipo = WAYRA_CALAN
    ///      │
    ///      ▼
    /// compute_prices(10, WAYRA_CALAN, CALAN, false, 4000) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Preview: Venta $52.900 (IVA 15% incluido) · Minorista $50.255 · Mayorista $47.610
    /// ```
    pub fn compute_prices(
        &self,
        precio_compra: f64,
        tipo: &str,
        categoria: &str,
        aplica_iva: bool,
        tasa_usd: Option<f64>,
    ) -> CoreResult<PriceQuote> {
        let cost = validate_precio_compra(precio_compra)?;
        let config = self.pricing_config(tipo, categoria)?;
        quote(config, cost, aplica_iva, tasa_usd)
    }
}

/// Prices an already-validated cost under `config`.
///
/// Used directly when re-pricing stored products. Every figure is rounded
/// once from the exact product of its factors.
pub fn quote(
    config: &ProductLineConfig,
    precio_compra: ExactAmount,
    aplica_iva: bool,
    tasa_usd: Option<f64>,
) -> CoreResult<PriceQuote> {
    if precio_compra.is_zero() {
        return Err(ValidationError::MustBePositive {
            field: "precio_compra".to_string(),
        }
        .into());
    }

    let tasa = if config.conversion_usd {
        validate_tasa_usd(tasa_usd)?
    } else {
        ExactAmount::ONE
    };

    let iva_aplicable = config.iva_obligatorio || aplica_iva;
    let iva_bps = if iva_aplicable {
        config.porcentaje_iva_bps
    } else {
        0
    };
    let iva_factor = (FULL_RATIO_BPS + iva_bps) as u64;
    let margen_factor = (FULL_RATIO_BPS + config.margen_ganancia_bps) as u64;

    let costo = [precio_compra.coefficient(), tasa.coefficient()];
    let exponent = precio_compra.exponent() + tasa.exponent();

    let costo_local = Money::from_decimal_product(&costo, exponent);
    let base_con_margen =
        Money::from_decimal_product(&[costo[0], costo[1], margen_factor], exponent + BPS_EXPONENT);
    let precio_venta = Money::from_decimal_product(
        &[costo[0], costo[1], margen_factor, iva_factor],
        exponent + 2 * BPS_EXPONENT,
    );

    Ok(PriceQuote {
        precio_venta,
        precio_minorista: precio_venta.apply_ratio(config.ratio_minorista_bps),
        precio_mayorista: precio_venta.apply_ratio(config.ratio_mayorista_bps),
        iva_aplicable,
        porcentaje_iva: config.porcentaje_iva(),
        costo_local,
        base_con_margen,
        valor_iva: precio_venta - base_con_margen,
        ratio_minorista_bps: config.ratio_minorista_bps,
        ratio_mayorista_bps: config.ratio_mayorista_bps,
    })
}

// =============================================================================
// Built-in Engine
// =============================================================================

fn builtin_engine() -> &'static PricingEngine {
    static ENGINE: OnceLock<PricingEngine> = OnceLock::new();
    ENGINE.get_or_init(PricingEngine::builtin)
}

/// [`PricingEngine::pricing_config`] over the built-in table.
pub fn get_pricing_config(tipo: &str, categoria: &str) -> CoreResult<ProductLineConfig> {
    builtin_engine().pricing_config(tipo, categoria).cloned()
}

/// [`PricingEngine::compute_prices`] over the built-in table.
pub fn compute_prices(
    precio_compra: f64,
    tipo: &str,
    categoria: &str,
    aplica_iva: bool,
    tasa_usd: Option<f64>,
) -> CoreResult<PriceQuote> {
    builtin_engine().compute_prices(precio_compra, tipo, categoria, aplica_iva, tasa_usd)
}

// =============================================================================
// Unit Tests
// =============================================================================
