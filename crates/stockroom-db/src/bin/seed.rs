//! # Seed Data Generator
//!
//! Populates a database with reference data, products and a year of sales
//! for development.
//!
//! ## Usage
//! ```bash
//! # 100 products, 300 sales (defaults)
//! cargo run -p stockroom-db --bin seed
//!
//! # Custom amounts and path
//! cargo run -p stockroom-db --bin seed -- --products 400 --sales 2000 --db ./data/stockroom.db
//! ```
//!
//! ## Generated Data
//! - Categories: Beverages, Snacks, Dairy, Frozen, Grocery
//! - Warehouses: Main, Overflow
//! - Departments: Operations, Marketing, Payroll
//! - Products: `{CODE}-{NNN}` SKUs, price $1.99 - $13.49, cost 60-80% of price
//! - Sales spread over the previous 12 months
//!
//! Values are derived from the row index, so two runs produce the same data.

use chrono::{Duration, Utc};
use clap::Parser;
use stockroom_core::forms::{NameForm, ProductForm, SaleForm, WarehouseForm};
use stockroom_core::Money;
use stockroom_db::{Database, DbConfig};

/// Category name, SKU prefix, product names.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "Beverages",
        "BEV",
        &["Green Tea", "Black Tea", "Rooibos", "Espresso Beans", "Lemonade", "Cola", "Sparkling Water", "Orange Juice"],
    ),
    (
        "Snacks",
        "SNK",
        &["Potato Chips", "Pretzels", "Trail Mix", "Oat Cookies", "Dark Chocolate", "Popcorn", "Rice Crackers"],
    ),
    (
        "Dairy",
        "DRY",
        &["Whole Milk", "Oat Milk", "Cheddar", "Greek Yogurt", "Butter", "Cream Cheese"],
    ),
    (
        "Frozen",
        "FRZ",
        &["Vanilla Ice Cream", "Frozen Peas", "Fish Fingers", "Waffles", "Sorbet"],
    ),
    (
        "Grocery",
        "GRO",
        &["Spaghetti", "Brown Rice", "Canned Beans", "Olive Oil", "Flour", "Honey", "Peanut Butter"],
    ),
];

const SIZES: &[(&str, i64)] = &[("Small", 0), ("Regular", 100), ("Large", 250), ("Family", 400)];

const WAREHOUSES: &[(&str, &str, &str)] = &[("Main", "Harbour Road 1", "5000"), ("Overflow", "Airport Park 7", "2000")];

const DEPARTMENTS: &[&str] = &["Operations", "Marketing", "Payroll"];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Stockroom development data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./stockroom_dev.db")]
    db: String,

    /// Number of products to generate
    #[arg(short, long, default_value_t = 100)]
    products: usize,

    /// Number of sales to record
    #[arg(short, long, default_value_t = 300)]
    sales: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Stockroom Seed Data Generator");
    println!("=============================");
    println!("Database: {}", args.db);
    println!("Products: {}", args.products);
    println!("Sales:    {}", args.sales);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    seed_reference_data(&db).await?;
    println!("✓ Reference data created");

    let start = std::time::Instant::now();
    let product_ids = seed_products(&db, args.products).await?;
    println!("✓ Generated {} products in {:?}", product_ids.len(), start.elapsed());

    let start = std::time::Instant::now();
    let sales = seed_sales(&db, &product_ids, args.sales).await?;
    println!("✓ Recorded {} sales in {:?}", sales, start.elapsed());

    let years = db.reports().available_years().await?;
    println!();
    println!("  Report years: {:?}", years);
    println!("  Search 'tea': {} products", db.products().list("tea").await?.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

async fn seed_reference_data(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    for (category, _, _) in CATEGORIES {
        db.categories().insert(&NameForm::new(*category).validate()?).await?;
    }

    for (name, location, capacity) in WAREHOUSES {
        let form = WarehouseForm {
            name: name.to_string(),
            location: location.to_string(),
            capacity: capacity.to_string(),
            is_active: true,
        };
        db.warehouses().insert(&form.validate()?).await?;
    }

    for department in DEPARTMENTS {
        db.departments().insert(&NameForm::new(*department).validate()?).await?;
    }

    Ok(())
}

async fn seed_products(db: &Database, count: usize) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let mut ids = Vec::with_capacity(count);
    let mut seed = 0usize;

    'outer: for (category, code, names) in CATEGORIES {
        for name in names.iter() {
            for (size, price_addon) in SIZES {
                if ids.len() >= count {
                    break 'outer;
                }

                let form = generate_product(category, code, name, size, *price_addon, seed);
                seed += 1;

                match db.products().insert(&form.validate()?).await {
                    Ok(product) => ids.push(product.id),
                    Err(e) => eprintln!("Failed to insert {}: {}", form.sku, e),
                }
            }
        }
    }

    Ok(ids)
}

/// Builds one product form from the row index.
fn generate_product(
    category: &str,
    code: &str,
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> ProductForm {
    // $1.99 - $9.98 plus size addon
    let price_cents = 199 + ((seed * 17) % 800) as i64 + price_addon;

    // 60-80% of price
    let cost_cents = price_cents * (60 + (seed % 20) as i64) / 100;

    ProductForm {
        sku: format!("{}-{:03}", code, seed),
        name: format!("{} {}", name, size),
        description: String::new(),
        category: category.to_string(),
        warehouse: WAREHOUSES[seed % WAREHOUSES.len()].0.to_string(),
        cost: Money::from_cents(cost_cents).to_string(),
        price: Money::from_cents(price_cents).to_string(),
        quantity: (20 + seed % 181).to_string(),
        is_active: true,
    }
}

async fn seed_sales(
    db: &Database,
    product_ids: &[i64],
    count: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    if product_ids.is_empty() {
        return Ok(0);
    }

    let today = Utc::now().date_naive();
    let mut recorded = 0;

    for i in 0..count {
        let product_id = product_ids[(i * 7) % product_ids.len()];
        let date = today - Duration::days(((i * 13) % 365) as i64);

        let form = SaleForm {
            receipt_no: format!("R-{:05}", i + 1),
            date: date.format("%Y-%m-%d").to_string(),
            product: product_id.to_string(),
            qty: (1 + i % 5).to_string(),
            notes: String::new(),
            is_active: true,
        };

        if let Err(e) = db.sales().record(&form.validate()?).await {
            eprintln!("Failed to record {}: {}", form.receipt_no, e);
            continue;
        }

        recorded += 1;
        if recorded % 100 == 0 {
            println!("  Recorded {} sales...", recorded);
        }
    }

    Ok(recorded)
}
