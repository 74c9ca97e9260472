use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Registry with every project module registered
pub fn registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Run the service until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = registry();
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module startup failed")?;

    tracing::info!("bookshelf bootstrap complete");

    let served = bookshelf_http::start_server(
        &registry,
        &settings,
        bookshelf_http::shutdown_signal(),
    )
    .await;

    // Modules are stopped even if the server failed
    registry.stop_all().await.context("module shutdown failed")?;
    served
}
