//! Binary entry point: boots the storage area and prints the season at a
//! glance.

use dotenvy::dotenv;
use hoze_ledger::config::{database, seed};
use hoze_ledger::core::{dashboard, digital, users};
use hoze_ledger::errors::Result;
use hoze_ledger::storage::Store;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the seed catalog
    let config = seed::load_default_config()
        .inspect(|config| {
            info!(
                concerts = config.concerts.len(),
                crew = config.crew.len(),
                "Loaded seed configuration."
            );
        })
        .inspect_err(|e| error!("Failed to load seed configuration: {e}"))?;

    // 4. Initialize the storage area
    let connection = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to storage: {e}"))?;
    database::create_tables(&connection)
        .await
        .inspect(|()| info!("Storage initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize storage: {e}"))?;
    let store = Store::new(connection);

    // 5. First-run seeding: the user table and one digital income record
    //    per month
    if users::ensure_user_table(&store).await? {
        info!("Created an empty user table.");
    }
    let seeded = digital::seed_missing_months(&store, &config.digital_income).await?;
    if seeded > 0 {
        info!(months = seeded, "Seeded missing digital income records.");
    }

    // 6. Print every month of the season
    for summary in dashboard::season_overview(&store, &config).await? {
        info!(
            month = %summary.month,
            income = %dashboard::format_try(summary.total_income),
            expense = %dashboard::format_try(summary.total_expense),
            net = %dashboard::format_try_signed(summary.net_profit),
            "Month summary"
        );
    }

    Ok(())
}
