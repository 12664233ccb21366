use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use sms_composer::core::catalog;
use sms_composer::core::config::{self, CliOverrides, ComposerConfig};
use sms_composer::tui;

#[derive(Parser)]
#[command(name = "sms-composer", about = "Compose and preview SMS/MMS broadcasts")]
struct Args {
    /// JSON file with contact lists, contacts and products
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Estimated cost per recipient
    #[arg(long)]
    unit_price: Option<f64>,

    /// Character limit of a single SMS
    #[arg(long)]
    max_characters: Option<usize>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to sms-composer.log in current directory.
    // The configured level is applied below through the global max level,
    // so messages from config loading are not lost.
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("sms-composer.log") {
        let _ = WriteLogger::init(LevelFilter::Trace, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        ComposerConfig::default()
    });
    let cli = CliOverrides {
        catalog: args.catalog,
        unit_price: args.unit_price,
        max_characters: args.max_characters,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::set_max_level(resolved.log_level);

    log::info!(
        "SMS composer starting (max_characters={}, unit_price={}, catalog={:?})",
        resolved.max_characters,
        resolved.unit_price,
        resolved.catalog_file
    );

    let catalog = Arc::new(catalog::load_catalog(resolved.catalog_file.as_deref()));
    tui::run(resolved, catalog)
}
