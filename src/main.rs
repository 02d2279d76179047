//! Vernacular command line
//!
//! Loads the configured translation roots and translates one message:
//!
//! ```text
//! vernacular <target_language> <message> [domain]
//! ```

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use vernacular::{
    catalog::CatalogLoader,
    config::Settings,
    i18n::{TranslatableString, Translator},
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", vernacular::info());

    let mut args = std::env::args().skip(1);
    let (Some(target_language), Some(message)) = (args.next(), args.next()) else {
        eprintln!("usage: vernacular <target_language> <message> [domain]");
        std::process::exit(2);
    };
    let domain = args.next();
    if args.next().is_some() {
        warn!("Ignoring extra arguments");
    }

    info!("Loading translations...");
    let store = match CatalogLoader::from_config(&settings.translations).load().await {
        Ok(store) => store,
        Err(e) => {
            error!(severity = %e.severity(), recoverable = e.is_recoverable(),
                   "Failed to load translations: {}", e);
            return Err(e.into());
        }
    };
    info!("Translation store: {}", serde_json::to_string(&store.stats())?);

    let translator = Translator::new(Arc::new(store), settings.translations.default_domain.clone());
    let translated = translator.translate(
        &TranslatableString::new(message),
        &target_language,
        domain.as_deref(),
    )?;

    println!("{}", translated);
    Ok(())
}
