//! Opt-in stage timing.
//!
//! Each pipeline stage opens a `ProfileScope`; when profiling is enabled the
//! scope logs its wall time to stderr on drop.
//!
//! # Usage
//!
//! ```
//! use influence_runner::profiling::ProfileScope;
//!
//! fn correlate() {
//!     let _scope = ProfileScope::new("correlation");
//!     // Timing logged on drop
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `INFLUENCE_PROFILE=1` - Enable stage timing

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static PROFILING_ENABLED: AtomicBool = AtomicBool::new(false);

/// Read `INFLUENCE_PROFILE` once at program start.
pub fn init() {
    let enabled = std::env::var("INFLUENCE_PROFILE")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    PROFILING_ENABLED.store(enabled, Ordering::Relaxed);

    if enabled {
        eprintln!("[PROFILING] Enabled (INFLUENCE_PROFILE=1)");
    }
}

#[inline]
pub fn is_enabled() -> bool {
    PROFILING_ENABLED.load(Ordering::Relaxed)
}

/// Measures the time between creation and drop.
pub struct ProfileScope {
    name: &'static str,
    start: Instant,
}

impl ProfileScope {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if is_enabled() {
            eprintln!(
                "[PROFILE] {} took {:.3}ms",
                self.name,
                self.elapsed().as_secs_f64() * 1000.0
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let scope = ProfileScope::new("elapsed");
        let first = scope.elapsed();
        assert!(scope.elapsed() >= first);
    }
}
