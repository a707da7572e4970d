pub mod app;
pub mod bond;
pub mod boundary;
pub mod config;
pub mod edit;
pub mod element;
pub mod error;
pub mod mirror;
pub mod molecule;
pub mod obstacle;
pub mod oracle;
pub mod particle;
pub mod profiler;
pub mod scene;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
