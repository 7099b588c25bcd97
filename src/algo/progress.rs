//! Progress reporting for long-running matches.
//!
//! Correspondence growth can take a while on dense meshes, so the matching
//! entry points accept a progress callback invoked once per growth
//! iteration. The callback receives a percent-complete value in `[0, 100]`
//! and a short label naming the current stage.
//!
//! The callback is expected to be fast and non-blocking. There is no
//! cancellation mechanism beyond panicking from inside the callback, which
//! the engine propagates without catching.
//!
//! # Example
//!
//! ```
//! use topomatch::algo::Progress;
//!
//! let progress = Progress::new(|percent, label| {
//!     println!("[{percent:5.1}%] {label}");
//! });
//! progress.report(50.0, "matching island 1/2");
//! ```

/// A progress callback that receives updates during matching.
pub struct Progress {
    callback: Box<dyn Fn(f64, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(f64, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress. `percent` is clamped to `[0, 100]`.
    #[inline]
    pub fn report(&self, percent: f64, label: &str) {
        (self.callback)(percent.clamp(0.0, 100.0), label);
    }

    /// Report a count out of a total as a percentage.
    #[inline]
    pub(crate) fn report_count(&self, current: usize, total: f64, label: &str) {
        if total > 0.0 {
            self.report(current as f64 / total * 100.0, label);
        }
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
