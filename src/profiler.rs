// profiler.rs
// Scoped timing of structural edits, compiled in with the `profiling` feature

use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, Default)]
pub struct SectionTiming {
    pub total: Duration,
    pub calls: u32,
}

/// Cumulative time spent per named section (one section per editor operation).
pub struct Profiler {
    pub timings: HashMap<&'static str, SectionTiming>,
}

impl Profiler {
    pub fn new() -> Self {
        Self { timings: HashMap::new() }
    }

    pub fn finish(&mut self, guard: &ProfilerGuard) {
        let entry = self.timings.entry(guard.name).or_default();
        entry.total += guard.start.elapsed();
        entry.calls += 1;
    }

    /// Sections sorted by total time, slowest first.
    pub fn report_sorted(&self) -> Vec<(&'static str, SectionTiming)> {
        let mut v: Vec<_> = self.timings.iter().map(|(n, t)| (*n, *t)).collect();
        v.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        v
    }

    pub fn clear(&mut self) {
        self.timings.clear();
    }

    pub fn log_and_clear(&mut self) {
        for (name, timing) in self.report_sorted() {
            let mean = timing.total / timing.calls.max(1);
            log::info!("{:<24} {:>6} calls {:?} total {:?} mean", name, timing.calls, timing.total, mean);
        }
        self.clear();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section. The guard reports to the global profiler when dropped.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard { name, start: Instant::now() }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Profile the enclosing scope only when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}
