pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod service;
pub mod store;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting chores CLI"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli.url.clone(),
    cli.key.clone()
  );
  debug!(
    config = ?cfg.loaded_file,
    tasks = %cfg.store.tasks_table,
    "configuration resolved"
  );

  let endpoint = cfg
    .store
    .endpoint()
    .context(
      "cannot reach the chore store"
    )?;
  let store =
    store::RestStore::new(&endpoint)?;
  let service = service::ChoreService::new(
    store, &cfg.store
  );
  let mut app = app::ChoreApp::new(
    service,
    cfg.completion.default_by.clone()
  );

  let renderer =
    render::Renderer::new(!cli.no_color);
  let command =
    cli.command.unwrap_or_default();

  let runtime =
    tokio::runtime::Builder::new_current_thread()
      .enable_all()
      .build()
      .context(
        "failed to start async runtime"
      )?;
  runtime.block_on(commands::dispatch(
    &mut app, &renderer, command
  ))?;

  info!("done");
  Ok(())
}
