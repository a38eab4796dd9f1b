//! Bookshelf application library
//!
//! Wires the books module into the kernel's module registry and serves it
//! through the HTTP facade.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Re-export commonly used types
pub use modules::books::{
    models::{Author, Book},
    registry::BookRegistry,
};

/// Build a registry holding every application module
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// Run the service until a shutdown signal arrives
///
/// Modules are stopped even when the server exits with an error; the server
/// error takes precedence in the returned result.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(
        env = ?settings.environment,
        modules = registry.module_count(),
        "bookshelf bootstrap complete"
    );

    let served = bookshelf_http::start_server(&registry, &settings).await;
    let stopped = registry
        .stop_modules()
        .await
        .context("failed to stop modules");

    served.and(stopped)
}
