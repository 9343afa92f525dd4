use case_server::cli::Cli;
use case_server::config::{AppState, Config};
use case_server::{logger, server};
use clap::Parser;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config, &cli.overrides())?;

    if cli.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    logger::init(&cfg)?;

    // Worker thread count from config, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(cfg)?);
    let listener = server::create_reusable_listener(addr, state.config.server.backlog)?;

    logger::log_server_start(
        &listener.local_addr()?,
        &state.config,
        state.dispatcher.root(),
        &state.dispatcher.chain().case_names(),
    );

    server::start_signal_handler(Arc::clone(&state.shutdown));
    server::run(listener, state).await;
    Ok(())
}
