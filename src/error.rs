// error.rs
// User-recoverable failures of structural edits and configuration loading.
// Broken internal bookkeeping is never reported here: it panics.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("particle store is full ({capacity} particles), cannot insert {requested} more")]
    CapacityExceeded { capacity: usize, requested: usize },

    #[error("placement at ({x:.2}, {y:.2}) lies outside the simulation boundary")]
    OutOfBounds { x: f32, y: f32 },

    #[error("placement overlaps an existing {what}")]
    ObjectOverlap { what: OverlapKind },

    #[error("outline edges {first} and {second} cross each other")]
    SelfCrossingGeometry { first: usize, second: usize },

    #[error("outline vertices {first} and {second} are {spacing:.2} apart, closer than {minimum:.2}")]
    DegenerateOutline {
        first: usize,
        second: usize,
        spacing: f32,
        minimum: f32,
    },

    #[error("outline has {count} vertices, needs at least {minimum}")]
    TooFewVertices { count: usize, minimum: usize },

    #[error("cannot bond particles {slots:?}: {reason}")]
    InvalidBond { slots: Vec<usize>, reason: &'static str },

    #[error("particles {a} and {b} are already bonded")]
    DuplicateBond { a: usize, b: usize },

    #[error("no bond between particles {slots:?}")]
    MissingBond { slots: Vec<usize> },

    #[error("no obstacle with index {index}")]
    UnknownObstacle { index: usize },

    #[error("editor thread has shut down")]
    Disconnected,
}

/// What a rejected placement collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapKind {
    Particle,
    Obstacle,
    Surface,
}

impl std::fmt::Display for OverlapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OverlapKind::Particle => "particle",
            OverlapKind::Obstacle => "obstacle",
            OverlapKind::Surface => "molecular surface",
        };
        f.write_str(name)
    }
}

impl EditError {
    pub fn overlap(what: OverlapKind) -> Self {
        Self::ObjectOverlap { what }
    }

    pub fn invalid_bond(slots: &[usize], reason: &'static str) -> Self {
        Self::InvalidBond { slots: slots.to_vec(), reason }
    }

    pub fn missing_bond(slots: &[usize]) -> Self {
        Self::MissingBond { slots: slots.to_vec() }
    }

    /// Placement-style rejections, as opposed to malformed requests.
    pub fn is_placement_rejection(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. }
                | Self::ObjectOverlap { .. }
                | Self::SelfCrossingGeometry { .. }
                | Self::DegenerateOutline { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}
