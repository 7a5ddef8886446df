//! # Cart Seed Tool
//!
//! Writes a demo cart snapshot into a storage file, or inspects one.
//!
//! ## Usage
//! ```bash
//! # Write a demo cart
//! cargo run -p gomarket-storage --bin seed
//!
//! # Inspect / clear what is stored
//! cargo run -p gomarket-storage --bin seed -- --show
//! cargo run -p gomarket-storage --bin seed -- --clear
//!
//! # Custom database path / namespace
//! cargo run -p gomarket-storage --bin seed -- --db ./data/gomarket.db --namespace Staging
//! ```

use gomarket_core::snapshot::{self, DEFAULT_NAMESPACE};
use gomarket_core::{storage_key, Cart, ProductDescriptor};
use gomarket_storage::{KeyValueStorage, SqliteStorage, StorageConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Demo catalog: (id, title, price, times added).
const DEMO_PRODUCTS: &[(&str, &str, f64, u32)] = &[
    ("1234", "Cadeira Rivatti", 1400.0, 1),
    ("2345", "Mesa de jantar", 2190.9, 1),
    ("3456", "Luminária de piso", 299.9, 2),
    ("4567", "Tapete persa", 649.0, 1),
    ("5678", "Kit de taças", 89.9, 4),
];

#[derive(Debug, PartialEq)]
enum Action {
    Seed,
    Show,
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut db_path = "./gomarket_dev.db".to_string();
    let mut namespace = DEFAULT_NAMESPACE.to_string();
    let mut action = Action::Seed;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = value.clone();
                    i += 1;
                }
            }
            "--namespace" | "-n" => {
                if let Some(value) = args.get(i + 1) {
                    namespace = value.clone();
                    i += 1;
                }
            }
            "--show" => action = Action::Show,
            "--clear" => action = Action::Clear,
            "--help" | "-h" => {
                println!("GoMarketplace Cart Seed Tool");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>          Database file path (default: ./gomarket_dev.db)");
                println!("  -n, --namespace <NAME>   Storage namespace (default: {})", DEFAULT_NAMESPACE);
                println!("      --show               Print the stored cart instead of seeding");
                println!("      --clear              Delete the stored cart");
                println!("  -h, --help               Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let key = storage_key(&namespace);
    let storage = SqliteStorage::new(StorageConfig::new(&db_path)).await?;
    info!(db = %db_path, key = %key, "Storage ready");

    match action {
        Action::Seed => {
            let cart = demo_cart()?;
            storage.set(&key, &snapshot::encode(cart.items())?).await?;
            info!(
                products = cart.len(),
                quantity = cart.total_quantity(),
                "Demo cart written"
            );
        }
        Action::Show => match storage.get(&key).await? {
            Some(text) => {
                let cart = snapshot::decode(&text)?;
                for item in cart.items() {
                    println!("{:>4} x {:<24} {:>10.2}  ({})", item.quantity, item.title, item.price, item.id);
                }
                println!("{} products, {} units", cart.len(), cart.total_quantity());
            }
            None => println!("No cart stored under {}", key),
        },
        Action::Clear => {
            storage.remove(&key).await?;
            info!(key = %key, "Stored cart cleared");
        }
    }

    storage.close().await;
    Ok(())
}

/// Builds the demo cart through the regular cart operations.
fn demo_cart() -> Result<Cart, gomarket_core::CoreError> {
    let mut cart = Cart::new();

    for (id, title, price, times) in DEMO_PRODUCTS {
        let image_url = format!("https://storage.gomarketplace.dev/products/{}.png", id);
        for _ in 0..*times {
            cart.add(ProductDescriptor::new(*id, *title, image_url.clone(), *price))?;
        }
    }

    Ok(cart)
}

/// Initializes the tracing subscriber.
///
/// Default: INFO, overridable with `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gomarket=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
