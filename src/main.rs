use std::sync::Arc;

use anyhow::Context;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;
mod session;
mod state;
mod templates;

use session::RemoteValidator;
use state::AppState;
use templates::TemplateSet;

fn main() -> anyhow::Result<()> {
    let cfg = config::Config::load()?;

    logger::init(&cfg).context("failed to initialize logger")?;

    // Templates are parsed once here and never change afterwards.
    // A malformed template aborts startup.
    let templates = TemplateSet::load(&cfg.site.template_dir)
        .with_context(|| format!("failed to load templates from '{}'", cfg.site.template_dir))?;

    let validator =
        RemoteValidator::from_config(&cfg.session).context("failed to build session validator")?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let state = Arc::new(AppState::new(cfg, templates, Box::new(validator))?);

    runtime.block_on(async_main(state))
}

async fn async_main(state: Arc<AppState>) -> anyhow::Result<()> {
    let addr = state.config.socket_addr()?;

    let listener =
        server::bind_listener(addr).map_err(|source| error::StartupError::Bind { addr, source })?;

    logger::log_server_start(&addr, &state.config);

    server::run(listener, state).await?;
    Ok(())
}
