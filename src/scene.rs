// scene.rs
// Loads an initial scene description from TOML and builds it through the editor

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use ultraviolet::Vec2;

use crate::app::{handle_command, EditCommand, EditOutcome, EditorHandle};
use crate::boundary::{Boundary, BoundaryMode};
use crate::edit::{EditContext, MoleculeTemplate, StructureEditor};
use crate::element::Element;
use crate::error::{ConfigError, EditError};
use crate::obstacle::Obstacle;
use crate::particle::Particle;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SceneConfig {
    pub boundary: Option<BoundaryConfig>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
    #[serde(default)]
    pub atoms: Vec<AtomConfig>,
    #[serde(default)]
    pub chains: Vec<ChainConfig>,
    #[serde(default)]
    pub rings: Vec<RingConfig>,
    #[serde(default)]
    pub surfaces: Vec<SurfaceConfig>,
    #[serde(default)]
    pub lattices: Vec<LatticeConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BoundaryConfig {
    pub width: f32,
    pub height: f32,
    /// e.g. `wrap = { mode = "periodic" }`; reflecting when omitted
    pub wrap: Option<BoundaryMode>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ObstacleConfig {
    pub min: [f32; 2],
    pub size: [f32; 2],
    #[serde(default)]
    pub permeable: Vec<Element>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AtomConfig {
    pub element: Element,
    pub pos: [f32; 2],
    pub vel: Option<[f32; 2]>,
    pub charge: Option<f32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChainConfig {
    pub element: Element,
    pub origin: [f32; 2],
    pub length: usize,
    pub spacing: f32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RingConfig {
    pub element: Element,
    pub center: [f32; 2],
    pub count: usize,
    pub radius: f32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SurfaceConfig {
    pub points: Vec<[f32; 2]>,
    /// Open outlines become ribbons
    #[serde(default = "default_closed")]
    pub closed: bool,
}

fn default_closed() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LatticeConfig {
    pub element: Element,
    pub min: [f32; 2],
    pub max: [f32; 2],
    pub spacing: f32,
}

/// What a scene load produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneSummary {
    pub particles: usize,
    pub obstacles: usize,
    /// Items dropped because they could not be placed
    pub skipped: usize,
}

fn vec2(v: [f32; 2]) -> Vec2 {
    Vec2::new(v[0], v[1])
}

impl SceneConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let scene: SceneConfig = toml::from_str(content)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key, reason: &str| ConfigError::Invalid { key, reason: reason.to_string() };
        if let Some(b) = &self.boundary {
            if b.width <= 0.0 || b.height <= 0.0 {
                return Err(invalid("boundary", "width and height must be positive"));
            }
        }
        if self.obstacles.iter().any(|o| o.size[0] <= 0.0 || o.size[1] <= 0.0) {
            return Err(invalid("obstacles", "size must be positive"));
        }
        if self.chains.iter().any(|c| c.length == 0 || c.spacing <= 0.0) {
            return Err(invalid("chains", "length and spacing must be positive"));
        }
        if self.rings.iter().any(|r| r.count < 3 || r.radius <= 0.0) {
            return Err(invalid("rings", "need at least 3 atoms on a positive radius"));
        }
        if self.lattices.iter().any(|l| l.spacing <= 0.0) {
            return Err(invalid("lattices", "spacing must be positive"));
        }
        Ok(())
    }

    /// Simulation box; 500 x 500 reflecting when the scene gives none.
    pub fn boundary(&self) -> Boundary {
        match &self.boundary {
            Some(b) => Boundary::new(
                Vec2::zero(),
                Vec2::new(b.width, b.height),
                b.wrap.unwrap_or(BoundaryMode::Reflecting),
            ),
            None => Boundary::reflecting(500.0, 500.0),
        }
    }

    /// Edits that build this scene, obstacles first and lattices last.
    pub fn commands(&self) -> Vec<EditCommand> {
        let mut commands = Vec::new();
        for o in &self.obstacles {
            let obstacle = Obstacle::new(vec2(o.min), vec2(o.size)).permeable_to(o.permeable.iter().copied());
            commands.push(EditCommand::AddObstacle { obstacle });
        }
        for a in &self.atoms {
            let mut particle = Particle::new(a.element, vec2(a.pos));
            if let Some(vel) = a.vel {
                particle = particle.with_velocity(vec2(vel));
            }
            if let Some(charge) = a.charge {
                particle = particle.with_charge(charge);
            }
            commands.push(EditCommand::InsertParticle { particle });
        }
        for c in &self.chains {
            commands.push(EditCommand::InsertMolecule {
                template: MoleculeTemplate::chain(c.element, c.length, c.spacing),
                origin: vec2(c.origin),
            });
        }
        for r in &self.rings {
            commands.push(EditCommand::InsertMolecule {
                template: MoleculeTemplate::ring(r.element, r.count, r.radius),
                origin: vec2(r.center),
            });
        }
        for s in &self.surfaces {
            commands.push(EditCommand::InsertSurface {
                outline: s.points.iter().copied().map(vec2).collect(),
                closed: s.closed,
            });
        }
        for l in &self.lattices {
            commands.push(EditCommand::FillLattice {
                element: l.element,
                min: vec2(l.min),
                max: vec2(l.max),
                spacing: l.spacing,
            });
        }
        commands
    }

    /// Build the scene through a running editor thread. Scene edits are not
    /// undoable.
    pub fn apply(&self, handle: &EditorHandle) -> Result<SceneSummary, EditError> {
        self.run(|command| handle.request(EditContext::SCRIPTED, command))
    }

    pub fn apply_to(&self, editor: &mut StructureEditor) -> Result<SceneSummary, EditError> {
        self.run(|command| handle_command(command, EditContext::SCRIPTED, editor))
    }

    fn run<F>(&self, mut submit: F) -> Result<SceneSummary, EditError>
    where
        F: FnMut(EditCommand) -> Result<EditOutcome, EditError>,
    {
        let mut summary = SceneSummary::default();
        for command in self.commands() {
            match submit(command) {
                Ok(EditOutcome::Inserted(range)) => summary.particles += range.len(),
                Ok(EditOutcome::ObstacleAdded(_)) => summary.obstacles += 1,
                Ok(_) => {}
                Err(e) if e.is_placement_rejection() => {
                    log::warn!("scene item skipped: {}", e);
                    summary.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        log::info!(
            "scene loaded: {} particles, {} obstacles, {} items skipped",
            summary.particles,
            summary.obstacles,
            summary.skipped
        );
        Ok(summary)
    }
}
