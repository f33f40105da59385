//! rawplay - YUV4MPEG2 frame indexing and color conversion in pure Rust
//!
//! rawplay indexes raw YUV4MPEG2 ("y4m") byte buffers into zero-copy frame
//! views and converts them to RGB with full-range BT.601 math, on the CPU or
//! through a GPU shader pipeline.
//!
//! # Architecture
//!
//! rawplay is organized into several key modules:
//!
//! - `y4m`: stream header parsing and zero-copy frame indexing
//! - `convert`: YUV 4:2:0 to RGB conversion (CPU path, optional `gpu` path)
//! - `util`: common utilities and data structures
//! - `error`: error types shared across the crate

pub mod convert;
pub mod error;
pub mod util;
pub mod y4m;

pub use error::{Error, Result};

/// rawplay version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// Configuration for the rawplay library
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of threads to use for parallel conversion
    pub max_threads: Option<usize>,
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_threads: None,
            verbose: false,
            debug: false,
        }
    }
}

/// Initialize the rawplay library with the given configuration
pub fn init(config: Config) -> Result<()> {
    // Initialize thread pool if max_threads is specified
    if let Some(threads) = config.max_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| Error::Init(format!("Failed to initialize thread pool: {}", e)))?;
    }

    // Initialize logging
    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        tracing_subscriber::fmt().with_env_filter(level).init();
    }

    Ok(())
}
