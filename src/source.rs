use std::str::FromStr;

use clap::ValueEnum;

use crate::error::FlipError;

/// Remote provider queried for entropy
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SourceSelector {
    /// qrandom.io, two-phase descriptor + binary download
    #[default]
    Qr,
    /// ANU QRNG, single JSON request
    Anu,
}

impl SourceSelector {
    /// Short tag used on the command line
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Qr => "qr",
            Self::Anu => "anu",
        }
    }

    /// Human-readable provider name used in error messages
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Qr => "qrandom.io",
            Self::Anu => "ANU QRNG",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Qr => Self::Anu,
            Self::Anu => Self::Qr,
        }
    }
}

impl FromStr for SourceSelector {
    type Err = FlipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qr" => Ok(Self::Qr),
            "anu" => Ok(Self::Anu),
            other => Err(FlipError::UnknownSource(other.to_string())),
        }
    }
}
