use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

use crate::bits::FlipResult;
use crate::client::{HttpTransport, RandomSourceClient};
use crate::entropy::{self, RawEntropy, ENTROPY_BYTES};
use crate::error::{FailureCause, FlipError};
use crate::source::SourceSelector;

/// Anything that can hand out an entropy block
pub trait EntropySource: Send + Sync + 'static {
    fn fetch(
        &self,
        selector: SourceSelector,
        byte_count: usize,
        timeout: Duration,
    ) -> Result<RawEntropy, FlipError>;
}

impl<T: HttpTransport> EntropySource for RandomSourceClient<T> {
    fn fetch(
        &self,
        selector: SourceSelector,
        byte_count: usize,
        timeout: Duration,
    ) -> Result<RawEntropy, FlipError> {
        RandomSourceClient::fetch(self, selector, byte_count, timeout)
    }
}

/// Replays a hex dump written by `--save`. The selector is ignored.
#[derive(Debug, Clone)]
pub struct DumpSource {
    path: PathBuf,
}

impl DumpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntropySource for DumpSource {
    fn fetch(
        &self,
        _selector: SourceSelector,
        byte_count: usize,
        _timeout: Duration,
    ) -> Result<RawEntropy, FlipError> {
        entropy::load_hex(&self.path, byte_count)
    }
}

/// One flip: fetch a block, count its bits.
#[derive(Debug)]
pub struct FlipEngine<S: EntropySource> {
    source: S,
    timeout: Duration,
}

impl<S: EntropySource> FlipEngine<S> {
    pub fn new(source: S, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn flip(&self, selector: SourceSelector) -> Result<FlipResult, FlipError> {
        self.flip_with_entropy(selector).map(|(result, _)| result)
    }

    /// Like [`flip`](Self::flip) but also hands back the block that was counted.
    pub fn flip_with_entropy(
        &self,
        selector: SourceSelector,
    ) -> Result<(FlipResult, RawEntropy), FlipError> {
        let fetched = self
            .source
            .fetch(selector, ENTROPY_BYTES, self.timeout)
            .and_then(|entropy| full_block(selector, entropy));
        match fetched {
            Ok(entropy) => {
                let result = FlipResult::from_bytes(entropy.as_bytes());
                info!(
                    source = selector.tag(),
                    ones = result.ones(),
                    zeros = result.zeros(),
                    verdict = %result.verdict(),
                    "flip completed"
                );
                Ok((result, entropy))
            }
            Err(err) => {
                warn!(source = selector.tag(), error = %err, "flip failed");
                Err(err)
            }
        }
    }
}

/// The counted block must be exactly [`ENTROPY_BYTES`] long, whatever the source.
fn full_block(selector: SourceSelector, entropy: RawEntropy) -> Result<RawEntropy, FlipError> {
    if entropy.len() != ENTROPY_BYTES {
        return Err(FlipError::protocol(
            selector.provider_name(),
            FailureCause::LengthMismatch,
            format!("expected {ENTROPY_BYTES} bytes, got {}", entropy.len()),
        ));
    }
    Ok(entropy)
}

/// Run a flip off the caller's thread and hand the outcome to `on_done`.
///
/// The handle is returned for tests; the interactive loop drops it so quitting
/// never waits on an in-flight fetch.
pub fn spawn_flip<S, F>(
    engine: Arc<FlipEngine<S>>,
    selector: SourceSelector,
    on_done: F,
) -> JoinHandle<()>
where
    S: EntropySource,
    F: FnOnce(Result<FlipResult, FlipError>) + Send + 'static,
{
    thread::spawn(move || on_done(engine.flip(selector)))
}
