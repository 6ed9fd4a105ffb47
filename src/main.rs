//! mdserve - live preview server for a single markdown document.

mod actor;
mod cache;
mod cli;
mod compiler;
mod config;
mod core;
mod embed;
mod logger;
mod reload;
mod utils;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, serve::ServeContext};
use config::MdserveConfig;
use owo_colors::OwoColorize;

use crate::actor::{Coordinator, FsActor, reload_channel};
use crate::cache::ShellCache;
use crate::reload::Orchestrator;
use crate::utils::path::display_name;

fn main() -> ExitCode {
    // Setup global Ctrl+C handler (before any blocking operations)
    if let Err(e) = core::setup_shutdown_handler() {
        return fail(&e);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version print to stdout and exit 0
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match serve(&cli) {
        // The request loop only returns after Ctrl+C
        Ok(()) => ExitCode::from(core::exit_status()),
        Err(e) => fail(&e),
    }
}

/// Print a fatal error on one line and report failure.
fn fail(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {:#}", "error:".bright_red().bold(), err);
    ExitCode::FAILURE
}

// =============================================================================
// Serve
// =============================================================================

fn serve(cli: &Cli) -> Result<()> {
    let document = cli::validate_target(&cli.file)?;
    core::set_initializing();

    let config = MdserveConfig::load(cli, &document)?;
    if let Some(path) = &config.config_path {
        debug!("serve"; "config from {}", path.display());
    }

    let shell_cache = ShellCache::locate()?;
    let shell_path = shell_cache.init()?;
    debug!("serve"; "page shell at {}", shell_path.display());
    let shell = shell_cache.load_shell();

    // Watcher-first: arm the watch before the first render so no edit is lost
    let watcher = if config.serve.watch {
        let (reload_tx, reload_rx) = reload_channel();
        match FsActor::new(document.clone(), reload_tx.clone(), config.watch.debounce()) {
            Ok(fs) => Some((fs, reload_tx, reload_rx)),
            Err(e) => {
                log!("watch"; "failed to watch {}: {}, live reload disabled", document.display(), e);
                None
            }
        }
    } else {
        None
    };

    let orchestrator = Orchestrator::initialize(document.clone(), config.markdown_options())
        .with_context(|| format!("can't render {}", document.display()))?;

    let bound = cli::serve::bind_server(&config.serve)?;
    let url = bound.url();
    let live_reload = watcher.is_some();
    let ctx = ServeContext::new(
        orchestrator.slot(),
        shell,
        display_name(&document),
        &config.serve,
        live_reload,
    );
    core::set_serving();

    log!("serve"; "{} served on {}", display_name(&document), url);
    if config.serve.open
        && let Err(e) = utils::browser::open(&url)
    {
        log!("serve"; "failed to open browser: {}", e);
    }

    let coordinator = watcher.map(|(fs, reload_tx, reload_rx)| {
        Coordinator::new(fs, reload_tx, reload_rx, Arc::new(orchestrator))
    });

    if live_reload {
        log!("watch"; "watching {} for changes", display_name(&document));
    }
    log!("serve"; "CTRL + C to quit");

    bound.run(ctx, coordinator)
}
