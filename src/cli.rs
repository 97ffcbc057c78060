use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::bits::FlipResult;
use crate::client::{Endpoints, ANU_BASE_URL, QR_BASE_URL};
use crate::engine::{EntropySource, FlipEngine};
use crate::entropy;
use crate::error::FlipError;
use crate::session::{LabelSet, DEFAULT_ONES_LABEL, DEFAULT_ZEROS_LABEL};
use crate::source::SourceSelector;

/// quantum coin flips from remote entropy
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "qcoin",
    version,
    about,
    long_about = "Fetches 1024 bytes from a quantum random number service, counts set and unset bits, and reports whether ones or zeros won. Use -i for an interactive carousel of results."
)]
pub struct Cli {
    /// entropy provider: qr (qrandom.io) or anu (ANU QRNG)
    #[clap(short = 's', long, value_enum, default_value_t = SourceSelector::Qr)]
    pub source: SourceSelector,

    /// start interactive TUI mode
    #[clap(short = 'i', long)]
    pub interactive: bool,

    /// seconds to wait on each provider request
    #[clap(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// card label for flips won by ones (interactive mode)
    #[clap(long, default_value = DEFAULT_ONES_LABEL)]
    pub ones_label: String,

    /// card label for flips won by zeros (interactive mode)
    #[clap(long, default_value = DEFAULT_ZEROS_LABEL)]
    pub zeros_label: String,

    /// write the fetched entropy block to FILE as hex
    #[clap(long, value_name = "FILE", conflicts_with = "interactive")]
    pub save: Option<PathBuf>,

    /// flip a hex dump written by --save instead of contacting a provider
    /// (every flip of an interactive session replays the same dump)
    #[clap(long, value_name = "FILE")]
    pub load: Option<PathBuf>,

    #[clap(long, hide = true, default_value = QR_BASE_URL)]
    pub qr_url: String,

    #[clap(long, hide = true, default_value = ANU_BASE_URL)]
    pub anu_url: String,
}

/// Resolved run configuration shared by both modes
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub source: SourceSelector,
    pub interactive: bool,
    pub timeout: Duration,
    pub labels: LabelSet,
    pub endpoints: Endpoints,
    pub save: Option<PathBuf>,
    pub load: Option<PathBuf>,
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            source: cli.source,
            interactive: cli.interactive,
            timeout: Duration::from_secs(cli.timeout),
            labels: LabelSet::new(&cli.ones_label, &cli.zeros_label),
            endpoints: Endpoints {
                qr_base: cli.qr_url.clone(),
                anu_base: cli.anu_url.clone(),
            },
            save: cli.save.clone(),
            load: cli.load.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Flip(#[from] FlipError),

    #[error("writing output: {0}")]
    Output(#[from] io::Error),
}

/// Non-interactive mode: one flip, three lines of output.
pub fn run_once<S: EntropySource, W: Write>(
    engine: &FlipEngine<S>,
    settings: &Settings,
    out: &mut W,
) -> Result<FlipResult, RunError> {
    let (result, block) = engine.flip_with_entropy(settings.source)?;

    if let Some(path) = &settings.save {
        entropy::save_hex(path, &block)?;
        info!(path = %path.display(), "entropy block saved");
    }

    writeln!(out, "Ones: {}", result.ones())?;
    writeln!(out, "Zeros: {}", result.zeros())?;
    writeln!(out, "Result: {}", result.verdict())?;

    Ok(result)
}
