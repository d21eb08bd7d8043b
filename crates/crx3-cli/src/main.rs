//! `crx3` — pack, unpack and identify CRX3 browser extensions.

mod id;
mod keygen;
mod pack;
mod unpack;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use crx3::Algorithm;

/// Pack, verify and unpack CRX3 browser extensions.
#[derive(Parser)]
#[command(name = "crx3", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the extension ID of a .crx container or a .pem key.
    Id {
        /// Container or PEM key file.
        infile: PathBuf,
    },

    /// Pack a directory or zip file into a signed .crx container.
    Pack {
        /// Extension directory or .zip archive.
        path: PathBuf,
        /// Private key to sign with. A new key is generated and saved beside the container if omitted.
        #[arg(short, long)]
        pem: Option<PathBuf>,
        /// Output .crx file.
        #[arg(short, long)]
        outfile: Option<PathBuf>,
        /// Algorithm for a generated key.
        #[arg(short, long, default_value_t = Algorithm::Ed25519)]
        algorithm: Algorithm,
    },

    /// Verify (when a key is given) and extract a .crx container.
    Unpack {
        /// Container to unpack.
        infile: PathBuf,
        /// Checksummed base-32 identity of the permitted signer.
        #[arg(short, long, conflicts_with = "pem")]
        key: Option<String>,
        /// PEM public (or private) key of the permitted signer.
        #[arg(short, long)]
        pem: Option<PathBuf>,
        /// Existing directory to extract into.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Largest container accepted, in bytes.
        #[arg(long, default_value_t = crx3::unpack::DEFAULT_MAX_CONTAINER_SIZE)]
        max_size: u64,
    },

    /// Generate a signing key pair.
    Keygen {
        /// Output path for the private key.
        output: PathBuf,
        /// Key algorithm.
        #[arg(short, long, default_value_t = Algorithm::Ed25519)]
        algorithm: Algorithm,
        /// Also write the public key to this path.
        #[arg(long)]
        public: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Id { infile } => id::run(&infile),
        Command::Pack { path, pem, outfile, algorithm } => pack::run(&path, pem.as_deref(), outfile, algorithm),
        Command::Unpack { infile, key, pem, out, max_size } => {
            unpack::run(&infile, key.as_deref(), pem.as_deref(), out, max_size)
        }
        Command::Keygen { output, algorithm, public } => keygen::run(&output, algorithm, public.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
