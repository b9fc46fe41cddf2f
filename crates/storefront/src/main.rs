use std::io;
use std::sync::Arc;

use anyhow::Context;

use storefront::{Controller, StorefrontConfig};
use storefront_cart::CartEngine;

fn main() -> anyhow::Result<()> {
    let config = StorefrontConfig::from_env().context("reading configuration")?;
    storefront_observability::init(config.log_format);

    let catalog = Arc::new(config.load_catalog()?);
    let engine = CartEngine::new(catalog);
    tracing::info!(cart_id = %engine.cart_id(), "storefront session started");

    let mut controller = Controller::new(engine).context("starting storefront")?;
    controller.run(io::stdin().lock(), io::stdout().lock())?;

    tracing::info!("storefront session ended");
    Ok(())
}
