// Centralized configuration for the structural editor

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

// ====================
// Store Parameters
// ====================
/// Default number of particle slots (live + scratch buffer share this size).
pub const DEFAULT_CAPACITY: usize = 1000;
/// Number of undoable edits kept before the oldest is dropped.
pub const DEFAULT_UNDO_LIMIT: usize = 64;

// ====================
// Overlap Parameters
// ====================
/// Exact placement: no van der Waals overlap at all.
pub const EXACT_OVERLAP_FACTOR: f32 = 1.0;
/// Relaxed placement (chain growth heuristics): up to 50% radius overlap.
pub const RELAXED_OVERLAP_FACTOR: f32 = 0.5;
/// Above this many live particles the overlap scan runs on the rayon pool.
pub const PARALLEL_SCAN_THRESHOLD: usize = 4096;

// ====================
// Boundary Parameters
// ====================
/// Ghost generation distance as a multiple of the widest element sigma.
pub const MIRROR_WRAP_FACTOR: f32 = 1.0;

// ====================
// Bond Parameters
// ====================
pub const DEFAULT_BOND_STRENGTH: f32 = 0.2;
pub const DEFAULT_BEND_STRENGTH: f32 = 20.0;
/// Minimum vertex spacing of a free-form outline, in units of the Sp sigma.
pub const SURFACE_SPACING_FACTOR: f32 = 1.0;

// ====================
// Insertion Parameters
// ====================
/// Default friction given to freshly inserted particles
pub const DEFAULT_FRICTION: f32 = 0.0;
/// Lattice fills stop trying after this many rejected sites in a row
pub const LATTICE_MAX_REJECTIONS: usize = 10_000;
/// Bond length of a grown atom as a fraction of contact distance
pub const GROWTH_SPACING_FACTOR: f32 = 0.75;

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

fn default_relaxed_overlap_factor() -> f32 {
    RELAXED_OVERLAP_FACTOR
}

fn default_mirror_wrap_factor() -> f32 {
    MIRROR_WRAP_FACTOR
}

fn default_surface_spacing_factor() -> f32 {
    SURFACE_SPACING_FACTOR
}

fn default_parallel_scan_threshold() -> usize {
    PARALLEL_SCAN_THRESHOLD
}

fn default_seed() -> u64 {
    0x5eed
}

/// Runtime editor settings, loadable from a TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
    #[serde(default = "default_relaxed_overlap_factor")]
    pub relaxed_overlap_factor: f32,
    #[serde(default = "default_mirror_wrap_factor")]
    pub mirror_wrap_factor: f32,
    #[serde(default = "default_surface_spacing_factor")]
    pub surface_spacing_factor: f32,
    #[serde(default = "default_parallel_scan_threshold")]
    pub parallel_scan_threshold: usize,
    /// Temperature for Maxwell-Boltzmann velocities of inserted particles.
    /// `None` keeps whatever velocity the caller supplied.
    #[serde(default)]
    pub insertion_temperature: Option<f32>,
    /// Seed for the insertion velocity generator
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            undo_limit: DEFAULT_UNDO_LIMIT,
            relaxed_overlap_factor: RELAXED_OVERLAP_FACTOR,
            mirror_wrap_factor: MIRROR_WRAP_FACTOR,
            surface_spacing_factor: SURFACE_SPACING_FACTOR,
            parallel_scan_threshold: PARALLEL_SCAN_THRESHOLD,
            insertion_temperature: None,
            seed: default_seed(),
        }
    }
}

impl EditorConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, ..Self::default() }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.relaxed_overlap_factor) {
            return Err(ConfigError::Invalid {
                key: "relaxed_overlap_factor",
                reason: format!("{} is outside [0, 1]", self.relaxed_overlap_factor),
            });
        }
        if self.mirror_wrap_factor < 0.0 {
            return Err(ConfigError::Invalid {
                key: "mirror_wrap_factor",
                reason: "must not be negative".to_string(),
            });
        }
        if let Some(t) = self.insertion_temperature {
            if t < 0.0 {
                return Err(ConfigError::Invalid {
                    key: "insertion_temperature",
                    reason: format!("{} is negative", t),
                });
            }
        }
        Ok(())
    }
}
