// Library surface for the binary, headless tests, and reuse.
pub mod app;
pub mod app_dirs;
pub mod bits;
pub mod cli;
pub mod client;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod keymap;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod source;
pub mod ui;
pub mod view;

pub use bits::{count_bits, BitTally, FlipResult, Verdict};
pub use error::{FailureCause, FlipError};
pub use source::SourceSelector;
