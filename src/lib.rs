//! shelf application library
//!
//! Wires the project modules into the kernel registry and drives the
//! service lifecycle.

pub mod modules;

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Registry holding every project module
pub fn build_registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry).context("failed to register modules")?;
    Ok(registry)
}

/// Run the service until a shutdown signal arrives.
///
/// Modules are initialized and started before the listener binds and
/// stopped after in-flight requests drain.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry()?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    let served =
        shelf_http::start_server(&registry, &settings, shelf_http::shutdown_signal()).await;

    registry.stop_modules().await?;
    served
}
