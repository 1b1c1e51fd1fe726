//! # Price Sheet
//!
//! Prices a sample product for every configured line and prints the result,
//! handy for checking a `pricing.toml` before deploying it.
//!
//! ## Usage
//! ```bash
//! # Built-in table (CALAN needs a rate)
//! cargo run -p wayra-catalog --bin price-sheet -- --tasa 4000
//!
//! # Custom config, JSON output
//! cargo run -p wayra-catalog --bin price-sheet -- --config ./pricing.toml --json
//! ```

use std::env;
use std::path::PathBuf;
use wayra_catalog::logging::init_tracing;
use wayra_catalog::{CatalogConfig, InMemoryBarcodeRegistry, PricingService, ProductDraft};
use wayra_core::{Barcode, Moneda, Product};

/// Sample cost per unit in the line's purchase currency.
fn sample_cost(moneda: Moneda) -> f64 {
    match moneda {
        Moneda::Usd => 10.0,
        Moneda::Cop => 10_000.0,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut tasa_usd: Option<f64> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--tasa" | "-t" => {
                if i + 1 < args.len() {
                    tasa_usd = Some(args[i + 1].parse()?);
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Wayra Price Sheet");
                println!();
                println!("Usage: price-sheet [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  Config file (default: platform config dir)");
                println!("  -t, --tasa <COP>     Exchange rate for USD-priced lines");
                println!("      --json           Print products as JSON");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    init_tracing("warn");

    let mut config = CatalogConfig::load(config_path)?;
    if tasa_usd.is_some() {
        config.pricing.tasa_usd = tasa_usd;
    }
    let service = PricingService::from_config(&config)?;
    let registry = InMemoryBarcodeRegistry::new();

    let mut products: Vec<Product> = Vec::new();
    let mut failures = 0;

    for line in service.engine().table().entries() {
        let draft = ProductDraft {
            nombre: format!("Muestra {}", line.categoria.to_lowercase()),
            tipo: line.tipo.to_string(),
            categoria: line.categoria.clone(),
            precio_compra: sample_cost(line.moneda_compra()),
            aplica_iva: true,
            tasa_usd: None,
            codigo_barras: None,
            tenant_id: None,
        };

        match service.build_product(draft, &registry) {
            Ok(product) => {
                if let Some(code) = product.codigo_barras.as_deref() {
                    registry.insert(Barcode::parse(code)?)?;
                }
                products.push(product);
            }
            Err(e) => {
                eprintln!("✗ {}/{}: {}", line.tipo, line.categoria, e);
                failures += 1;
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    println!("Wayra Price Sheet");
    println!("=================");
    if let Some(tasa) = service.default_tasa_usd() {
        println!("Tasa USD: {}", tasa);
    }
    println!();
    println!(
        "{:<16} {:<12} {:>12} {:>12} {:>12} {:>12}  {}",
        "TIPO", "CATEGORIA", "COSTO", "VENTA", "MINORISTA", "MAYORISTA", "CODIGO"
    );

    for product in &products {
        println!(
            "{:<16} {:<12} {:>12} {:>12} {:>12} {:>12}  {}",
            product.tipo.as_str(),
            product.categoria,
            format!("{} {:.2}", product.moneda_compra, product.precio_compra),
            product.precio_venta.to_string(),
            product.precio_minorista.to_string(),
            product.precio_mayorista.to_string(),
            product.codigo_barras.as_deref().unwrap_or("-"),
        );
    }

    println!();
    println!("✓ Priced {} lines", products.len());
    if failures > 0 {
        println!("⚠ {} lines could not be priced", failures);
    }

    Ok(())
}
