// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SecureTOTP - an encrypted local vault for TOTP secrets.
//!
//! This is the binary entry point. It loads configuration, installs the
//! tracing subscriber, and dispatches to one command module per subcommand.

mod context;
mod info;
mod init;
mod passwd;
mod payload;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use securetotp_config::SecureTotpConfig;
use securetotp_core::VaultError;

use crate::context::VaultContext;

/// SecureTOTP - an encrypted local vault for TOTP secrets.
#[derive(Parser, Debug)]
#[command(name = "securetotp", version, about, long_about = None)]
struct Cli {
    /// Vault file (default: ~/.securetotp-cli/mytotp.vault).
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Key file mixed into key derivation alongside the passphrase.
    #[arg(long, global = true, value_name = "PATH")]
    key_file: Option<PathBuf>,

    /// Additional configuration file, merged after the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new vault. Fails if one already exists.
    Init {
        /// Initial payload (default: empty).
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// Show the vault header: timestamp, format version, and KDF parameters.
    Info {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Decrypt the vault and write the payload to stdout.
    Show,
    /// Replace the vault payload with the contents of a file.
    Write {
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Change the vault passphrase (and optionally the key file).
    Passwd {
        /// Key file for the new credentials (default: none).
        #[arg(long, value_name = "PATH")]
        new_key_file: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match securetotp_config::load_and_validate(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            securetotp_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.log.normalized_level());

    if let Err(e) = run(cli, &config) {
        eprintln!("securetotp: error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &SecureTotpConfig) -> Result<(), VaultError> {
    let ctx = VaultContext::resolve(cli.file, cli.key_file, config)?;
    tracing::debug!(vault = %ctx.path().display(), "resolved vault path");

    match cli.command {
        Commands::Init { input } => init::run_init(&ctx, input.as_deref()),
        Commands::Info { json } => info::run_info(&ctx, json),
        Commands::Show => payload::run_show(&ctx),
        Commands::Write { input } => payload::run_write(&ctx, &input),
        Commands::Passwd { new_key_file } => passwd::run_passwd(&ctx, new_key_file),
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// Logs go to stderr so `show` output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn filter_directive(log_level: &str) -> String {
    format!("securetotp={log_level},warn")
}
