use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::entropy::RawEntropy;
use crate::error::{FailureCause, FlipError};
use crate::source::SourceSelector;

/// Upper bound for every outbound request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const QR_BASE_URL: &str = "https://qrandom.io";
pub const ANU_BASE_URL: &str = "https://qrng.anu.edu.au";

/// Status and body of a completed GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A GET that never produced a usable response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
    pub timed_out: bool,
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

/// Minimal HTTP surface the providers need
pub trait HttpTransport: Send + Sync + 'static {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportFailure>;
}

/// Production transport backed by a blocking reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("qcoin/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, TransportFailure> {
        let response = self.client.get(url).timeout(timeout).send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

/// Base URLs for both providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub qr_base: String,
    pub anu_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            qr_base: QR_BASE_URL.to_string(),
            anu_base: ANU_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn qr_descriptor_url(&self, byte_count: usize) -> String {
        format!(
            "{}/api/random/binary?bytes={byte_count}",
            self.qr_base.trim_end_matches('/')
        )
    }

    pub fn anu_url(&self, byte_count: usize) -> String {
        format!(
            "{}/API/jsonI.php?length={byte_count}&type=uint8",
            self.anu_base.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct BinaryDescriptor {
    #[serde(rename = "binaryURL")]
    binary_url: String,
}

#[derive(Debug, Deserialize)]
struct AnuResponse {
    #[serde(default)]
    data: Vec<u8>,
    success: bool,
}

/// Fetches entropy blocks from the remote providers. Keeps no state between calls.
#[derive(Debug, Clone)]
pub struct RandomSourceClient<T: HttpTransport> {
    transport: T,
    endpoints: Endpoints,
}

impl<T: HttpTransport> RandomSourceClient<T> {
    pub fn new(transport: T, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetch exactly `byte_count` bytes from the selected provider.
    pub fn fetch(
        &self,
        selector: SourceSelector,
        byte_count: usize,
        timeout: Duration,
    ) -> Result<RawEntropy, FlipError> {
        match selector {
            SourceSelector::Qr => self.fetch_qr(byte_count, timeout),
            SourceSelector::Anu => self.fetch_anu(byte_count, timeout),
        }
    }

    /// Same as [`fetch`](Self::fetch) for a textual provider tag.
    pub fn fetch_tag(
        &self,
        tag: &str,
        byte_count: usize,
        timeout: Duration,
    ) -> Result<RawEntropy, FlipError> {
        self.fetch(tag.parse()?, byte_count, timeout)
    }

    fn fetch_qr(&self, byte_count: usize, timeout: Duration) -> Result<RawEntropy, FlipError> {
        let provider = SourceSelector::Qr.provider_name();

        let url = self.endpoints.qr_descriptor_url(byte_count);
        debug!(%url, "requesting binary descriptor");
        let response = self
            .transport
            .get(&url, timeout)
            .map_err(|failure| transport_error(provider, FailureCause::RequestFailed, failure))?;
        if !response.is_success() {
            return Err(FlipError::protocol(
                provider,
                FailureCause::BadStatus,
                format!("returned status {}", response.status),
            ));
        }

        let descriptor: BinaryDescriptor =
            serde_json::from_slice(&response.body).map_err(|err| {
                FlipError::protocol(provider, FailureCause::DecodeFailed, err.to_string())
            })?;
        if descriptor.binary_url.is_empty() {
            return Err(FlipError::protocol(
                provider,
                FailureCause::DecodeFailed,
                "descriptor has an empty binaryURL",
            ));
        }

        debug!(url = %descriptor.binary_url, "downloading binary payload");
        let payload = self
            .transport
            .get(&descriptor.binary_url, timeout)
            .map_err(|failure| transport_error(provider, FailureCause::FetchFailed, failure))?;
        if !payload.is_success() {
            return Err(FlipError::protocol(
                provider,
                FailureCause::BadStatus,
                format!("binary fetch returned status {}", payload.status),
            ));
        }

        exact_length(provider, payload.body, byte_count)
    }

    fn fetch_anu(&self, byte_count: usize, timeout: Duration) -> Result<RawEntropy, FlipError> {
        let provider = SourceSelector::Anu.provider_name();

        let url = self.endpoints.anu_url(byte_count);
        debug!(%url, "requesting uint8 array");
        let response = self
            .transport
            .get(&url, timeout)
            .map_err(|failure| transport_error(provider, FailureCause::RequestFailed, failure))?;
        if !response.is_success() {
            return Err(FlipError::protocol(
                provider,
                FailureCause::BadStatus,
                format!("returned status {}", response.status),
            ));
        }

        let decoded: AnuResponse = serde_json::from_slice(&response.body).map_err(|err| {
            FlipError::protocol(provider, FailureCause::DecodeFailed, err.to_string())
        })?;
        if !decoded.success {
            return Err(FlipError::protocol(
                provider,
                FailureCause::ProviderRejected,
                "API returned success=false",
            ));
        }

        exact_length(provider, decoded.data, byte_count)
    }
}

fn transport_error(
    provider: &'static str,
    cause: FailureCause,
    failure: TransportFailure,
) -> FlipError {
    FlipError::Transport {
        provider,
        cause,
        message: failure.message,
        timed_out: failure.timed_out,
    }
}

fn exact_length(
    provider: &'static str,
    bytes: Vec<u8>,
    expected: usize,
) -> Result<RawEntropy, FlipError> {
    if bytes.len() != expected {
        return Err(FlipError::protocol(
            provider,
            FailureCause::LengthMismatch,
            format!("expected {expected} bytes, got {}", bytes.len()),
        ));
    }
    Ok(RawEntropy::new(bytes))
}
