use std::sync::Arc;
use std::time::Duration;

use admin_app::context::AppContext;
use admin_app::inventory_page::InventoryPage;
use admin_app::products_page::ProductsPage;
use admin_app::rate::Throttle;
use admin_app::storage::Storage;
use anyhow::Result;
use api_client::{connect, BackendMode};
use clap::{Parser, ValueEnum};
use shared::MovementType;
use tracing::info;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Mock,
    Remote,
}

#[derive(Parser)]
#[command(name = "pos-admin")]
struct Args {
    #[arg(long, env = "POS_API_URL", default_value = "http://localhost:3000/api")]
    base_url: String,

    #[arg(long, env = "POS_BACKEND", value_enum, default_value = "mock")]
    backend: Mode,

    #[arg(long, default_value = "10")]
    page_size: u32,

    #[arg(long, default_value = "500")]
    mock_delay_ms: u64,

    #[arg(long, env = "POS_STATE_FILE", default_value = ".pos-admin-state.json")]
    state_file: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mode = match args.backend {
        Mode::Mock => BackendMode::Mock,
        Mode::Remote => BackendMode::Remote,
    };
    let backend = connect(
        mode,
        &args.base_url,
        Duration::from_millis(args.mock_delay_ms),
    );
    let ctx = Arc::new(AppContext::new(backend, Storage::new(&args.state_file)));

    let mut products = ProductsPage::new(ctx.clone(), args.page_size);
    products.load_initial().await;
    info!("products page loaded");
    println!("== Products ==");
    println!("{}", products.render_table());
    println!("{}", products.render_pagination());
    let stats = products.stats();
    println!(
        "{} products | {} in stock | {} low | {} out | {} categories",
        stats.total, stats.in_stock, stats.low_stock, stats.out_of_stock, stats.categories
    );

    // Debounced search: the reload waits for typing to settle.
    products.set_search_input("cola");
    while !products.flush_search().await {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    println!("\n== Products matching \"cola\" ==");
    println!("{}", products.render_table());

    let products_report = products.export_csv();
    let product_rows = products_report.lines().count().saturating_sub(1);
    info!(rows = product_rows, "products report ready");

    let mut inventory = InventoryPage::new(ctx.clone(), args.page_size);
    inventory.load_initial().await;
    info!("inventory page loaded");
    println!("\n== Inventory ==");
    println!("{}", inventory.render_inventory_table());
    println!("{}", inventory.render_pagination());
    println!("\n== Stock Movements ==");
    println!("{}", inventory.render_movements_table());
    println!("{}", inventory.render_movements_pagination());
    println!("\n== Alerts ==");
    println!("{}", inventory.render_alerts());

    inventory
        .set_movement_type_filter(Some(MovementType::Out))
        .await;
    println!("\n== Outbound movements ==");
    println!("{}", inventory.render_movements_table());

    // One refresh at most; repeated triggers inside the window are dropped.
    let mut refresh_throttle = Throttle::new(Duration::from_secs(2));
    if refresh_throttle.allow() {
        inventory.refresh_all().await;
    }
    let inventory_report = inventory.export_csv();
    let inventory_rows = inventory_report.lines().count().saturating_sub(1);
    info!(rows = inventory_rows, "inventory report ready");

    for notification in ctx.notifier.purge_expired() {
        println!("[{}] {}", notification.severity.label(), notification.message);
    }

    Ok(())
}
