//! # Pricing Service
//!
//! The one entry point the API handlers use for prices and barcodes, so the
//! live preview and the save path can never disagree.
//!
//! ## Request Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PricingService                                   │
//! │                                                                         │
//! │  Form typing ──► preview(PriceRequest) ──► PriceQuote (warns on tiers)  │
//! │                                                                         │
//! │  Save ─────────► build_product(ProductDraft, registry)                  │
//! │                    ├── validate name + cost                             │
//! │                    ├── quote + reject out-of-order tiers                │
//! │                    ├── supplied code? validate + check unused           │
//! │                    └── else assign_barcode (retry on collision)         │
//! │                                                                         │
//! │  Rate change ──► reprice(&mut Product, tasa) (barcode untouched)        │
//! │                                                                         │
//! │  Scanner ──────► accept_scanned(raw) ──► Barcode lookup key             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service holds only immutable data and is `Send + Sync`; wrap it in an
//! `Arc` and share it between request handlers.

use chrono::Utc;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::RwLock;
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;
use wayra_core::pricing::quote;
use wayra_core::validation::{validate_precio_compra, validate_product_name};
use wayra_core::{
    Barcode, BarcodeGenerator, CoreError, PriceQuote, PricingEngine, Product, ProductLineConfig,
    DEFAULT_TENANT_ID,
};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Requests
// =============================================================================

/// Body of a price preview request.
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub precio_compra: f64,
    pub tipo: String,
    pub categoria: String,

    #[serde(default)]
    pub aplica_iva: bool,

    /// Falls back to the configured rate when absent.
    #[serde(default)]
    #[ts(optional)]
    pub tasa_usd: Option<f64>,
}

/// A product as submitted by the create form.
#[derive(Debug, Clone, PartialEq, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub nombre: String,
    pub tipo: String,
    pub categoria: String,
    pub precio_compra: f64,

    #[serde(default)]
    pub aplica_iva: bool,

    #[serde(default)]
    #[ts(optional)]
    pub tasa_usd: Option<f64>,

    /// Code printed on the package, if any; generated otherwise.
    #[serde(default)]
    #[ts(optional)]
    pub codigo_barras: Option<String>,

    #[serde(default)]
    #[ts(optional)]
    pub tenant_id: Option<String>,
}

// =============================================================================
// Barcode Registry
// =============================================================================

/// Answers whether a code already belongs to a product.
///
/// Implemented over the products table by the API; the unique index there
/// stays the final guard against two concurrent saves.
pub trait BarcodeRegistry: Send + Sync {
    fn is_taken(&self, code: &Barcode) -> CatalogResult<bool>;
}

/// Registry kept in memory (tests, the price sheet tool).
#[derive(Debug, Default)]
pub struct InMemoryBarcodeRegistry {
    codes: RwLock<HashSet<Barcode>>,
}

impl InMemoryBarcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a code; returns false if it was already present.
    pub fn insert(&self, code: Barcode) -> CatalogResult<bool> {
        let mut codes = self
            .codes
            .write()
            .map_err(|_| CatalogError::Registry("barcode registry lock poisoned".into()))?;
        Ok(codes.insert(code))
    }

    pub fn len(&self) -> usize {
        self.codes.read().map(|codes| codes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BarcodeRegistry for InMemoryBarcodeRegistry {
    fn is_taken(&self, code: &Barcode) -> CatalogResult<bool> {
        let codes = self
            .codes
            .read()
            .map_err(|_| CatalogError::Registry("barcode registry lock poisoned".into()))?;
        Ok(codes.contains(code))
    }
}

// =============================================================================
// Pricing Service
// =============================================================================

/// Prices products and hands out barcodes.
#[derive(Debug, Clone)]
pub struct PricingService {
    engine: PricingEngine,
    generator: BarcodeGenerator,
    default_tasa_usd: Option<f64>,
    max_attempts: u32,
}

impl PricingService {
    /// Builds the service from validated configuration.
    pub fn from_config(config: &CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;

        let engine = PricingEngine::new(config.pricing_table()?);
        info!(
            lines = engine.table().len(),
            prefix = %config.barcode.prefix,
            tasa_usd = ?config.pricing.tasa_usd,
            "Pricing service ready"
        );

        Ok(PricingService {
            engine,
            generator: config.barcode_generator()?,
            default_tasa_usd: config.pricing.tasa_usd,
            max_attempts: config.barcode.max_attempts,
        })
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    pub fn default_tasa_usd(&self) -> Option<f64> {
        self.default_tasa_usd
    }

    /// Rules for a product line, for the form's IVA toggle and currency label.
    pub fn line(&self, tipo: &str, categoria: &str) -> CatalogResult<&ProductLineConfig> {
        Ok(self.engine.pricing_config(tipo, categoria)?)
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Computes a live preview for the product form.
    ///
    /// Out-of-order tiers are logged but still returned; only saving rejects
    /// them.
    pub fn preview(&self, request: &PriceRequest) -> CatalogResult<PriceQuote> {
        let quote = self.engine.compute_prices(
            request.precio_compra,
            &request.tipo,
            &request.categoria,
            request.aplica_iva,
            self.tasa(request.tasa_usd),
        )?;

        if let Err(e) = quote.check_tier_order() {
            warn!(tipo = %request.tipo, categoria = %request.categoria, "{}", e);
        }

        debug!(
            tipo = %request.tipo,
            categoria = %request.categoria,
            precio_venta = quote.precio_venta.pesos(),
            "Price preview"
        );

        Ok(quote)
    }

    /// Recomputes a stored product's prices, e.g. after a rate change.
    ///
    /// Only the three prices and `updated_at` change; the barcode never does.
    pub fn reprice(&self, product: &mut Product, tasa_usd: Option<f64>) -> CatalogResult<PriceQuote> {
        let config = self.engine.table().lookup(product.tipo, &product.categoria)?;

        if config.moneda_compra() != product.moneda_compra {
            return Err(CatalogError::InvalidConfig(format!(
                "line {}/{} now prices costs in {}, product {} was bought in {}",
                config.tipo,
                config.categoria,
                config.moneda_compra(),
                product.id,
                product.moneda_compra
            )));
        }

        let cost = validate_precio_compra(product.precio_compra).map_err(CoreError::from)?;
        let quote = quote(config, cost, product.aplica_iva, self.tasa(tasa_usd))?;
        quote.check_tier_order()?;

        product.precio_venta = quote.precio_venta;
        product.precio_minorista = quote.precio_minorista;
        product.precio_mayorista = quote.precio_mayorista;
        product.updated_at = Utc::now();

        debug!(product_id = %product.id, precio_venta = %quote.precio_venta, "Product repriced");
        Ok(quote)
    }

    fn tasa(&self, requested: Option<f64>) -> Option<f64> {
        requested.or(self.default_tasa_usd)
    }

    // =========================================================================
    // Barcodes
    // =========================================================================

    /// Validates a scanned, OCR'd or typed code for lookup.
    pub fn accept_scanned(&self, raw: &str) -> CatalogResult<Barcode> {
        Barcode::parse(raw).map_err(|reason| {
            debug!(code = %raw.trim(), reason = reason.code(), "Rejected barcode");
            CatalogError::InvalidBarcode {
                code: raw.trim().to_string(),
                reason,
            }
        })
    }

    /// Generates a code nobody in `registry` uses yet.
    ///
    /// ## Errors
    /// `BarcodeSpaceExhausted` once `max_attempts` candidates all collided.
    pub fn assign_barcode<R>(&self, registry: &R) -> CatalogResult<Barcode>
    where
        R: BarcodeRegistry + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();
            if !registry.is_taken(&candidate)? {
                return Ok(candidate);
            }
            debug!(attempt, code = %candidate, "Generated barcode already taken");
        }

        warn!(attempts = self.max_attempts, "No free barcode found");
        Err(CatalogError::BarcodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Turns a submitted form into a priced product with a barcode.
    ///
    /// Nothing is written; the caller persists the product and records its
    /// barcode.
    pub fn build_product<R>(&self, draft: ProductDraft, registry: &R) -> CatalogResult<Product>
    where
        R: BarcodeRegistry + ?Sized,
    {
        validate_product_name(&draft.nombre).map_err(CoreError::from)?;
        let cost = validate_precio_compra(draft.precio_compra).map_err(CoreError::from)?;
        let config = self.engine.pricing_config(&draft.tipo, &draft.categoria)?;

        let quote = quote(config, cost, draft.aplica_iva, self.tasa(draft.tasa_usd))?;
        quote.check_tier_order()?;

        let supplied = draft
            .codigo_barras
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty());
        let barcode = match supplied {
            Some(raw) => {
                let code = self.accept_scanned(raw)?;
                if registry.is_taken(&code)? {
                    return Err(CatalogError::BarcodeTaken(code.to_string()));
                }
                code
            }
            None => self.assign_barcode(registry)?,
        };

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            tenant_id: draft
                .tenant_id
                .unwrap_or_else(|| DEFAULT_TENANT_ID.to_string()),
            nombre: draft.nombre.trim().to_string(),
            tipo: config.tipo,
            categoria: config.categoria.clone(),
            precio_compra: draft.precio_compra,
            moneda_compra: config.moneda_compra(),
            aplica_iva: draft.aplica_iva,
            precio_venta: quote.precio_venta,
            precio_minorista: quote.precio_minorista,
            precio_mayorista: quote.precio_mayorista,
            codigo_barras: Some(barcode.into()),
            created_at: now,
            updated_at: now,
        };

        info!(
            product_id = %product.id,
            tipo = %product.tipo,
            precio_venta = %product.precio_venta,
            "Product priced"
        );
        Ok(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_error::{ApiError, ErrorCode};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use wayra_core::pricing::builtin_lines;
    use wayra_core::{validate_barcode, BarcodeRejection, Moneda, TipoProducto, ValidationError};

    fn service() -> PricingService {
        PricingService::from_config(&CatalogConfig::default()).unwrap()
    }

    fn calan_request(tasa_usd: Option<f64>) -> PriceRequest {
        PriceRequest {
            precio_compra: 10.0,
            tipo: "WAYRA_CALAN".into(),
            categoria: "CALAN".into(),
            aplica_iva: false,
            tasa_usd,
        }
    }

    fn draft(nombre: &str, codigo_barras: Option<&str>) -> ProductDraft {
        ProductDraft {
            nombre: nombre.into(),
            tipo: "TORNI_REPUESTO".into(),
            categoria: "REPUESTOS".into(),
            precio_compra: 1_000.0,
            aplica_iva: true,
            tasa_usd: None,
            codigo_barras: codigo_barras.map(String::from),
            tenant_id: None,
        }
    }

    /// Inverted tier ratios: minorista 80%, mayorista 95%.
    fn inverted_config() -> CatalogConfig {
        let mut config = CatalogConfig::default();
        config.lines = builtin_lines();
        for line in &mut config.lines {
            line.ratio_minorista_bps = 8_000;
            line.ratio_mayorista_bps = 9_500;
        }
        config
    }

    struct AlwaysTaken;

    impl BarcodeRegistry for AlwaysTaken {
        fn is_taken(&self, _code: &Barcode) -> CatalogResult<bool> {
            Ok(true)
        }
    }

    /// Reports the first `collisions` candidates as taken.
    struct Colliding {
        collisions: u32,
        calls: AtomicU32,
    }

    impl BarcodeRegistry for Colliding {
        fn is_taken(&self, _code: &Barcode) -> CatalogResult<bool> {
            Ok(self.calls.fetch_add(1, Ordering::SeqCst) < self.collisions)
        }
    }

    struct Offline;

    impl BarcodeRegistry for Offline {
        fn is_taken(&self, _code: &Barcode) -> CatalogResult<bool> {
            Err(CatalogError::Registry("database unavailable".into()))
        }
    }

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PricingService>();
        assert_send_sync::<InMemoryBarcodeRegistry>();
    }

    #[test]
    fn test_preview_fixture() {
        let quote = service().preview(&calan_request(Some(4_000.0))).unwrap();
        assert_eq!(quote.precio_venta.pesos(), 52_900);
        assert_eq!(quote.precio_minorista.pesos(), 50_255);
        assert_eq!(quote.precio_mayorista.pesos(), 47_610);
    }

    #[test]
    fn test_preview_uses_configured_rate() {
        let mut config = CatalogConfig::default();
        config.pricing.tasa_usd = Some(4_000.0);
        let service = PricingService::from_config(&config).unwrap();

        let quote = service.preview(&calan_request(None)).unwrap();
        assert_eq!(quote.precio_venta.pesos(), 52_900);

        // Request rate wins over the configured one: 10 × 4200 × 1.3225
        let quote = service.preview(&calan_request(Some(4_200.0))).unwrap();
        assert_eq!(quote.precio_venta.pesos(), 55_545);
    }

    #[test]
    fn test_preview_without_any_rate_fails() {
        let err = service().preview(&calan_request(None)).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Core(CoreError::Validation(ValidationError::Required { ref field }))
                if field == "tasa_usd"
        ));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_preview_unknown_line() {
        let request = PriceRequest {
            precio_compra: 100.0,
            tipo: "BOGUS".into(),
            categoria: "NOPE".into(),
            aplica_iva: false,
            tasa_usd: None,
        };
        let err = service().preview(&request).unwrap_err();
        assert!(err.is_config_error());

        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::PricingUnavailable);
    }

    #[test]
    fn test_preview_tolerates_tier_violation() {
        let service = PricingService::from_config(&inverted_config()).unwrap();
        let request = PriceRequest {
            precio_compra: 10_000.0,
            tipo: "WAYRA_ENI".into(),
            categoria: "ENI".into(),
            aplica_iva: false,
            tasa_usd: None,
        };
        let quote = service.preview(&request).unwrap();
        assert_eq!(quote.precio_minorista.pesos(), 9_200);
        assert_eq!(quote.precio_mayorista.pesos(), 10_925);
    }

    #[test]
    fn test_preview_json_request() {
        let request: PriceRequest = serde_json::from_str(
            r#"{"precioCompra":10,"tipo":"WAYRA_CALAN","categoria":"CALAN","tasaUsd":4000}"#,
        )
        .unwrap();
        assert!(!request.aplica_iva);
        assert_eq!(service().preview(&request).unwrap().precio_venta.pesos(), 52_900);
    }

    #[test]
    fn test_accept_scanned() {
        let service = service();
        let code = service.accept_scanned(" 4006381333931\n").unwrap();
        assert_eq!(code.as_str(), "4006381333931");

        let err = service.accept_scanned("12345678901A").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidBarcode { ref code, reason: BarcodeRejection::NonDigit }
                if code == "12345678901A"
        ));

        assert!(matches!(
            service.accept_scanned("4006381333932"),
            Err(CatalogError::InvalidBarcode { reason: BarcodeRejection::Checksum, .. })
        ));
    }

    #[test]
    fn test_assign_barcode_retries_collisions() {
        let registry = Colliding {
            collisions: 3,
            calls: AtomicU32::new(0),
        };
        let code = service().assign_barcode(&registry).unwrap();
        assert!(validate_barcode(code.as_str()).valid);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_assign_barcode_gives_up() {
        let mut config = CatalogConfig::default();
        config.barcode.max_attempts = 5;
        let service = PricingService::from_config(&config).unwrap();

        let err = service.assign_barcode(&AlwaysTaken).unwrap_err();
        assert!(matches!(err, CatalogError::BarcodeSpaceExhausted { attempts: 5 }));
    }

    #[test]
    fn test_registry_failure_propagates() {
        let err = service().assign_barcode(&Offline).unwrap_err();
        assert!(matches!(err, CatalogError::Registry(_)));
    }

    #[test]
    fn test_build_product_generates_barcode() {
        let mut config = CatalogConfig::default();
        config.barcode.prefix = "770".into();
        let service = PricingService::from_config(&config).unwrap();
        let registry = InMemoryBarcodeRegistry::new();

        let product = service
            .build_product(draft("  Pastillas de freno  ", None), &registry)
            .unwrap();

        assert_eq!(product.nombre, "Pastillas de freno");
        assert_eq!(product.tipo, TipoProducto::TorniRepuesto);
        assert_eq!(product.categoria, "REPUESTOS");
        assert_eq!(product.tenant_id, DEFAULT_TENANT_ID);
        assert_eq!(product.moneda_compra, Moneda::Cop);
        assert_eq!(product.precio_compra, 1_000.0);
        // 1000 × 1.35 × 1.19 = 1606.5
        assert_eq!(product.precio_venta.pesos(), 1_607);
        assert_eq!(product.created_at, product.updated_at);

        let code = product.codigo_barras.unwrap();
        assert!(code.starts_with("770"));
        assert!(validate_barcode(&code).valid);
    }

    #[test]
    fn test_build_product_keeps_supplied_barcode() {
        let registry = InMemoryBarcodeRegistry::new();
        let product = service()
            .build_product(draft("Filtro de aceite", Some(" 5901234123457 ")), &registry)
            .unwrap();
        assert_eq!(product.codigo_barras.as_deref(), Some("5901234123457"));
    }

    #[test]
    fn test_build_product_rejects_bad_or_taken_barcode() {
        let service = service();
        let registry = InMemoryBarcodeRegistry::new();

        let err = service
            .build_product(draft("Filtro", Some("5901234123458")), &registry)
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidBarcode { reason: BarcodeRejection::Checksum, .. }
        ));

        registry
            .insert(Barcode::parse("5901234123457").unwrap())
            .unwrap();
        let err = service
            .build_product(draft("Filtro", Some("5901234123457")), &registry)
            .unwrap_err();
        assert!(matches!(err, CatalogError::BarcodeTaken(ref code) if code == "5901234123457"));
    }

    #[test]
    fn test_build_product_validates_input() {
        let service = service();
        let registry = InMemoryBarcodeRegistry::new();

        let err = service.build_product(draft("   ", None), &registry).unwrap_err();
        assert!(err.is_user_error());

        let mut bad_cost = draft("Filtro", None);
        bad_cost.precio_compra = f64::NAN;
        assert!(service.build_product(bad_cost, &registry).is_err());

        let mut bad_line = draft("Filtro", None);
        bad_line.categoria = "CALAN".into();
        assert!(service
            .build_product(bad_line, &registry)
            .unwrap_err()
            .is_config_error());
    }

    #[test]
    fn test_build_product_rejects_tier_violation() {
        let service = PricingService::from_config(&inverted_config()).unwrap();
        let err = service
            .build_product(draft("Filtro", None), &InMemoryBarcodeRegistry::new())
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Core(CoreError::TierOrderViolation { .. })
        ));
    }

    #[test]
    fn test_reprice_keeps_barcode() {
        let service = service();
        let registry = InMemoryBarcodeRegistry::new();
        let calan = ProductDraft {
            nombre: "CALAN 20W50 (1L)".into(),
            tipo: "WAYRA_CALAN".into(),
            categoria: "CALAN".into(),
            precio_compra: 10.0,
            aplica_iva: false,
            tasa_usd: Some(4_000.0),
            codigo_barras: None,
            tenant_id: Some("tenant-2".into()),
        };

        let mut product = service.build_product(calan, &registry).unwrap();
        assert_eq!(product.moneda_compra, Moneda::Usd);
        assert_eq!(product.tenant_id, "tenant-2");
        assert_eq!(product.precio_venta.pesos(), 52_900);
        let code = product.codigo_barras.clone();

        let quote = service.reprice(&mut product, Some(4_200.0)).unwrap();
        assert_eq!(quote.precio_venta.pesos(), 55_545);
        assert_eq!(product.precio_venta.pesos(), 55_545);
        assert_eq!(product.codigo_barras, code);
        assert!(product.updated_at >= product.created_at);

        // Local lines ignore the rate entirely
        let mut local = service.build_product(draft("Filtro", None), &registry).unwrap();
        let before = local.precio_venta;
        service.reprice(&mut local, Some(9_999.0)).unwrap();
        assert_eq!(local.precio_venta, before);
    }

    #[test]
    fn test_stored_cost_keeps_typed_digits() {
        let service = service();
        let draft = ProductDraft {
            nombre: "CALAN 10W30 (250ml)".into(),
            tipo: "WAYRA_CALAN".into(),
            categoria: "CALAN".into(),
            precio_compra: 1.234,
            aplica_iva: true,
            tasa_usd: Some(4_000.0),
            codigo_barras: None,
            tenant_id: None,
        };

        let mut product = service
            .build_product(draft, &InMemoryBarcodeRegistry::new())
            .unwrap();
        assert_eq!(product.precio_compra, 1.234);
        assert_eq!(product.precio_venta.pesos(), 6_528);

        let quote = service.reprice(&mut product, Some(4_000.0)).unwrap();
        assert_eq!(quote.precio_venta.pesos(), 6_528);
    }

    #[test]
    fn test_reprice_rejects_currency_change() {
        let service = service();
        let mut product = service
            .build_product(draft("Filtro", None), &InMemoryBarcodeRegistry::new())
            .unwrap();

        let mut config = CatalogConfig::default();
        config.lines = builtin_lines();
        for line in &mut config.lines {
            line.conversion_usd = true;
        }
        let usd_service = PricingService::from_config(&config).unwrap();

        let err = usd_service.reprice(&mut product, Some(4_000.0)).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_generated_products_get_distinct_codes() {
        let service = service();
        let registry = InMemoryBarcodeRegistry::new();

        for i in 0..50 {
            let product = service
                .build_product(draft(&format!("Tornillo {}", i), None), &registry)
                .unwrap();
            let code = Barcode::parse(product.codigo_barras.as_deref().unwrap_or_default()).unwrap();
            assert!(registry.insert(code).unwrap());
        }
        assert_eq!(registry.len(), 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_previews_agree() {
        let service = Arc::new(service());
        let registry = Arc::new(InMemoryBarcodeRegistry::new());

        let mut handles = Vec::new();
        for i in 0..32 {
            let service = Arc::clone(&service);
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let quote = service.preview(&calan_request(Some(4_000.0))).unwrap();
                let code = service.assign_barcode(registry.as_ref()).unwrap();
                let fresh = registry.insert(code).unwrap();
                (i, quote, fresh)
            }));
        }

        for handle in handles {
            let (i, quote, fresh) = handle.await.unwrap();
            assert_eq!(quote.precio_venta.pesos(), 52_900, "task {i}");
            assert_eq!(quote.precio_mayorista.pesos(), 47_610, "task {i}");
            assert!(fresh, "task {i} was handed a code already in use");
        }
        assert_eq!(registry.len(), 32);
    }
}
