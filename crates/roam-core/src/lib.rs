pub mod catalog;
pub mod cli;
pub mod config;
pub mod controller;
pub mod filter;
pub mod item;
pub mod render;
pub mod screen;
pub mod session;

use std::ffi::OsString;
use std::io::{self, IsTerminal};

use anyhow::Context;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use controller::{
  ListSpec,
  ListViewController
};
pub use item::{
  Item,
  ItemId
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre =
    cli::preprocess_args(&raw_args)?;
  let cli = cli::GlobalCli::parse_from(
    pre.cleaned_args
  );

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting roam CLI"
  );
  debug!(?pre.rc_overrides, "preprocessed rc overrides");

  let mut cfg = config::Config::load(
    cli.roamrc.as_deref()
  )?;
  cfg.apply_overrides(
    pre.rc_overrides.into_iter().chain(
      cli
        .rc_overrides
        .into_iter()
        .map(|kv| (kv.key, kv.value))
    )
  );
  if let Some(view) = cli.view {
    cfg.apply_overrides([(
      "default.view".to_string(),
      view
    )]);
  }

  let mut catalog =
    catalog::Catalog::builtin();
  if let Some(path) =
    config::resolve_data_file(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data file"
    )?
  {
    let overrides =
      catalog::Catalog::load(&path)
        .with_context(|| {
          format!(
            "failed to load catalog \
             from {}",
            path.display()
          )
        })?;
    catalog = catalog.overlay(overrides);
  }

  let renderer =
    render::Renderer::new(&cfg)?;
  let inv = cli::Invocation::parse(
    &cfg,
    cli.screen.as_deref(),
    cli.rest
  )?;

  let mut session =
    session::Session::start(
      inv.screen, catalog, cfg
    )?;

  let stdout = io::stdout();
  let mut out = stdout.lock();
  let stdin = io::stdin();
  if inv.actions.is_empty()
    && !stdin.is_terminal()
  {
    debug!("no actions given; reading actions from stdin");
    session.run_script(
      &renderer,
      stdin.lock(),
      &mut out
    )?;
  } else {
    session.run_actions(
      &renderer,
      &mut out,
      inv.actions
    )?;
  }

  info!("done");
  Ok(())
}
