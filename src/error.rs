use std::path::PathBuf;

use strum_macros::Display;
use thiserror::Error;

/// Stable tag describing where a fetch went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum FailureCause {
    /// first request never produced a response
    RequestFailed,
    /// non-2xx status at any phase
    BadStatus,
    /// response body was not the expected JSON document
    DecodeFailed,
    /// second-phase payload download never produced a response
    FetchFailed,
    /// provider answered with `success: false`
    ProviderRejected,
    /// payload length differs from the requested byte count
    LengthMismatch,
}

/// Everything that can abort a single flip
#[derive(Debug, Clone, Error)]
pub enum FlipError {
    #[error("{provider} {cause}: {message}")]
    Transport {
        provider: &'static str,
        cause: FailureCause,
        message: String,
        timed_out: bool,
    },

    #[error("{provider} {cause}: {detail}")]
    Protocol {
        provider: &'static str,
        cause: FailureCause,
        detail: String,
    },

    #[error("unknown source: {0} (use 'qr' or 'anu')")]
    UnknownSource(String),

    #[error("entropy dump {}: {reason}", .path.display())]
    Dump { path: PathBuf, reason: String },
}

impl FlipError {
    pub fn protocol(
        provider: &'static str,
        cause: FailureCause,
        detail: impl Into<String>,
    ) -> Self {
        Self::Protocol {
            provider,
            cause,
            detail: detail.into(),
        }
    }

    pub fn cause(&self) -> Option<FailureCause> {
        match self {
            Self::Transport { cause, .. } | Self::Protocol { cause, .. } => Some(*cause),
            Self::UnknownSource(_) | Self::Dump { .. } => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }
}
