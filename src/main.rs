//! ecrypt - Authenticated file encryption
//!
//! Usage:
//!   ecrypt encrypt -i <file>            - Encrypt a file with a fresh key
//!   ecrypt encrypt -k KEY_VAR           - Encrypt stdin with a key from the environment
//!   ecrypt decrypt -k KEY_VAR -n <hex>  - Decrypt with the key and nonce from encryption
//!
//! Key material travels through environment variables, never argv, so it
//! does not land in shell history or the process table.

use clap::{Parser, Subcommand};
use ecrypt::{crypto, Error, Key, KeySize, Result};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "ecrypt")]
#[command(author = "ecrypt Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Authenticated file encryption with AES-GCM")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file or stdin
    Encrypt {
        /// Input file (stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for ciphertext (hex to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Environment variable holding a hex-encoded key; a fresh random
        /// 256-bit key is generated and printed if not specified
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Decrypt a file or stdin
    Decrypt {
        /// Input file with raw ciphertext (hex text on stdin if not specified)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file for decrypted data (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Environment variable holding the hex-encoded key
        #[arg(short, long)]
        key: String,

        /// Hex-encoded nonce value used during encryption
        #[arg(short, long)]
        nonce: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    if let Err(e) = run_command(cli.command) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Encrypt { input, output, key } => cmd_encrypt(input, output, key),

        Commands::Decrypt {
            input,
            output,
            key,
            nonce,
        } => cmd_decrypt(input, output, &key, &nonce),
    }
}

fn cmd_encrypt(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    key_env: Option<String>,
) -> Result<()> {
    let data = read_input(input.as_deref())?;

    let mut key = match key_env.as_deref() {
        Some(var) => {
            let key = key_from_env(var)?;
            info!("Using key from environment variable {}", var);
            key
        }
        None => {
            let key = Key::generate(KeySize::Aes256)?;
            info!("Generated a new random key");
            key
        }
    };

    // Zero the key material on success and error paths alike
    let result = seal_and_report(&data, &key, output.as_deref());
    key.destroy();
    result
}

fn seal_and_report(data: &[u8], key: &Key, output: Option<&Path>) -> Result<()> {
    let key_bytes = key.bytes().ok_or(Error::InvalidKey)?;
    let (ciphertext, nonce) = crypto::encrypt(data, key_bytes)?;

    match output {
        Some(path) => {
            info!("Writing to file: {}", path.display());
            write_output(path, &ciphertext)?;
        }
        None => println!("Ciphertext: {}", hex::encode(&ciphertext)),
    }

    // Both are needed for decryption
    println!("Encryption key: {}", hex::encode(key_bytes));
    println!("Nonce: {}", hex::encode(nonce));

    Ok(())
}

fn cmd_decrypt(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    key_env: &str,
    nonce_hex: &str,
) -> Result<()> {
    // A file carries raw ciphertext; stdin carries hex text
    let data = match input.as_deref() {
        Some(path) => {
            info!("Reading from file: {}", path.display());
            fs::read(path)?
        }
        None => {
            info!("Reading from stdin...");
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            hex::decode(text.trim())?
        }
    };

    let mut key = key_from_env(key_env)?;
    let nonce = hex::decode(nonce_hex)?;

    let result = open_and_report(&data, &nonce, &key, output.as_deref());
    key.destroy();
    result
}

fn open_and_report(
    ciphertext: &[u8],
    nonce: &[u8],
    key: &Key,
    output: Option<&Path>,
) -> Result<()> {
    let key_bytes = key.bytes().ok_or(Error::InvalidKey)?;
    let plaintext = crypto::decrypt(ciphertext, nonce, key_bytes)?;

    match output {
        Some(path) => {
            info!("Writing to file: {}", path.display());
            write_output(path, &plaintext)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(&plaintext)?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(())
}

/// Read plaintext bytes from a file, or from stdin when no file is given.
fn read_input(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => {
            info!("Reading from file: {}", path.display());
            Ok(fs::read(path)?)
        }
        None => {
            info!("Reading from stdin...");
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

/// Build a key from the hex value of the named environment variable.
fn key_from_env(var: &str) -> Result<Key> {
    let key_hex = env::var(var).unwrap_or_default();
    if key_hex.is_empty() {
        return Err(Error::KeyEnvVar(var.to_string()));
    }

    // Decoded hex is key material too; clear it once copied into the Key
    let key_bytes = Zeroizing::new(hex::decode(key_hex)?);
    Key::from_bytes(&key_bytes)
}

/// Write output owner-readable only; ciphertext and plaintext both warrant it.
fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(data)?;
    Ok(())
}
