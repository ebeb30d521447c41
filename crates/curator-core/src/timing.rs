//! Elapsed time for processing metadata.
//!
//! `wasm32-unknown-unknown` has no monotonic clock in std, so there the
//! stopwatch always reads zero.

#[cfg(not(target_arch = "wasm32"))]
pub(crate) struct Stopwatch(std::time::Instant);

#[cfg(target_arch = "wasm32")]
pub(crate) struct Stopwatch;

impl Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn start() -> Self {
        Self(std::time::Instant::now())
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn start() -> Self {
        Self
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn elapsed_us(&self) -> u64 {
        self.0.elapsed().as_micros() as u64
    }

    #[cfg(target_arch = "wasm32")]
    pub(crate) fn elapsed_us(&self) -> u64 {
        0
    }

    pub(crate) fn elapsed_ms(&self) -> u64 {
        self.elapsed_us() / 1000
    }
}
