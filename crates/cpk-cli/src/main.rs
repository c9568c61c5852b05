//! CPK CLI
//!
//! Thin shell over `cpk-core` for generating secret files:
//! - salted password records
//! - signing keypairs

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use cpk_core::{password, PrivateKey};
use tracing::{info, Level};

/// CPK - identity-based key tooling
#[derive(Parser)]
#[command(name = "cpk")]
#[command(about = "Combined Public Key tooling")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate secret files
    Gen {
        #[command(subcommand)]
        target: GenCommands,
    },
}

#[derive(Subcommand)]
enum GenCommands {
    /// Generate a password record file
    Pwd {
        /// File to write the password record to
        #[arg(short, long)]
        password_file: PathBuf,
    },

    /// Generate a private/public keypair as files
    Skey {
        /// File to write the raw private key to
        #[arg(short = 's', long)]
        private_key_file: PathBuf,

        /// File to write the hex-encoded public key to
        #[arg(short = 'k', long)]
        public_key_file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Gen { target } => match target {
            GenCommands::Pwd { password_file } => gen_pwd(&password_file),
            GenCommands::Skey {
                private_key_file,
                public_key_file,
            } => gen_skey(&private_key_file, &public_key_file),
        },
    }
}

fn gen_pwd(password_file: &Path) -> Result<()> {
    let password = prompt_password()?;
    let record = password::hash(&password);
    std::fs::write(password_file, record)?;

    info!(path = ?password_file, "password record written");
    Ok(())
}

fn gen_skey(private_key_file: &Path, public_key_file: &Path) -> Result<()> {
    let private = PrivateKey::random();
    let public = private.public();

    std::fs::write(private_key_file, private.to_bytes())?;
    restrict_permissions(private_key_file)?;
    std::fs::write(public_key_file, hex::encode(public.to_bytes()))?;

    info!(
        path = ?private_key_file,
        public_key = hex::encode(public.to_bytes()),
        "keypair written"
    );
    Ok(())
}

fn prompt_password() -> Result<String> {
    print!("Enter password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
