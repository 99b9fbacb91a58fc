//! VaultNote CLI - client-side encrypted notes with commit history
//!
//! This is the command-line interface for VaultNote. It provides a
//! user-friendly interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod output;
mod ui;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{envelope, history, init, session};
use crate::constants::env_vars;
use crate::errors::{exit_code_for, CliError};
use crate::ui::print_error;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli) {
        let ui_ctx = ctx.ui_context(false);
        match e.chain().find_map(|cause| cause.downcast_ref::<CliError>()) {
            Some(cli_err) => {
                let (message, hint) = cli_err.parts();
                print_error(&ui_ctx, message, hint);
            }
            None => print_error(&ui_ctx, &format!("{:#}", e), None),
        }
        std::process::exit(exit_code_for(&e));
    }
}

/// Logs go to stderr; stdout is reserved for command output.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(env_vars::LOG).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => init::handle_init(ctx, args),
        Commands::Unlock(args) => session::handle_unlock(ctx, args),
        Commands::Lock => session::handle_lock(ctx),
        Commands::Status(args) => session::handle_status(ctx, args),
        Commands::Encrypt(args) => envelope::handle_encrypt(ctx, args),
        Commands::Decrypt(args) => envelope::handle_decrypt(ctx, args),
        Commands::Verify(args) => envelope::handle_verify(ctx, args),
        Commands::Commit(args) => history::handle_commit(ctx, args),
        Commands::Log(args) => history::handle_log(ctx, args),
        Commands::Show(args) => history::handle_show(ctx, args),
        Commands::Diff(args) => history::handle_diff(ctx, args),
        Commands::Branch(args) => history::handle_branch(ctx, args),
        Commands::Checkout(args) => history::handle_checkout(ctx, args),
        Commands::Branches(args) => history::handle_branches(ctx, args),
        Commands::Strength(args) => envelope::handle_strength(ctx, args),
        Commands::Inspect(args) => envelope::handle_inspect(ctx, args),
        Commands::ClearHistory(args) => history::handle_clear_history(ctx, args),
    }
}
