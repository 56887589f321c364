// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kliros — parish service schedule and news.
//
// Entry point. Parses the command line, opens storage, initialises logging
// (debug level when the debugMode setting is on), and dispatches the command.

mod cli;
mod commands;
mod services;
mod state;

use std::process::ExitCode;

use clap::Parser;
use kliros_core::human_errors::humanize_error;
use kliros_data::AnySource;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use commands::Prompt;
use services::app_services::AppServices;
use services::data_dir;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let svc = match init_services(&cli) {
        Ok(svc) => svc,
        Err(e) => {
            let human = humanize_error(&e);
            eprintln!("{}: {}", human.title, human.message);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(svc.settings().debug_mode);
    tracing::info!(data_dir = %svc.data_dir().display(), "Kliros starting");

    let prompt = Prompt::new(cli.yes);
    let result = commands::run(cli.command, &svc, &prompt).await;

    let reported = match &result {
        Ok(()) => true,
        Err(e) => svc.report(e),
    };
    commands::print_notifications(&svc);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            if !reported {
                let human = humanize_error(&e);
                eprintln!("{}: {}", human.title, human.message);
            }
            ExitCode::FAILURE
        }
    }
}

/// Open persistent storage, or fall back to memory if the data directory
/// can't be used.
fn init_services(cli: &Cli) -> kliros_core::error::Result<AppServices> {
    let source = AnySource::parse(&cli.source)?;
    let dir = data_dir::data_dir(cli.data_dir.as_deref());
    let opened = dir.and_then(|dir| AppServices::open(dir, source.clone()));
    match opened {
        Ok(svc) => Ok(svc),
        Err(e) => {
            eprintln!("warning: persistent storage unavailable ({e}); nothing will be saved");
            AppServices::in_memory(std::env::temp_dir(), source)
        }
    }
}

fn init_tracing(debug_mode: bool) {
    let default = if debug_mode { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}
