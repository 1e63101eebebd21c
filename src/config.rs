use glam::Vec2;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{Material, WorldConfig};
use crate::units::UnitConverter;

/// Runtime configuration of the bridge.
///
/// The material scalars and the unit ratio go through validated setters:
/// negative (or NaN) values are dropped and the previous value is kept.
#[derive(Clone, Debug, PartialEq)]
pub struct BridgeConfig {
    material: Material,
    ratio: f32,
    /// Step the world on each draw pass.
    pub enabled: bool,
    /// Fixed timestep in seconds.
    pub dt: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
    /// Gravity in m/s², +Y down the screen.
    pub gravity: Vec2,
    pub allow_sleep: bool,
    /// Half-thickness of the frame bodies in pixels; `None` uses `ratio`.
    pub boundary_thickness: Option<f32>,
    pub boundary_material: Material,
    /// Seed for the initial-velocity generator; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            material: Material::default(),
            ratio: 50.0,
            enabled: true,
            dt: 1.0 / 60.0,
            velocity_iterations: 3,
            position_iterations: 10,
            gravity: Vec2::new(0.0, 9.8),
            allow_sleep: true,
            boundary_thickness: None,
            boundary_material: Material {
                friction: 0.3,
                density: 0.5,
                restitution: 0.5,
            },
            seed: None,
        }
    }
}

/// On-disk shape of [`BridgeConfig`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    friction: Option<f32>,
    density: Option<f32>,
    restitution: Option<f32>,
    ratio: Option<f32>,
    enabled: Option<bool>,
    dt: Option<f32>,
    velocity_iterations: Option<usize>,
    position_iterations: Option<usize>,
    gravity: Option<Vec2>,
    allow_sleep: Option<bool>,
    boundary_thickness: Option<f32>,
    boundary_material: Option<Material>,
    seed: Option<u64>,
}

fn accepts(value: f32) -> bool {
    value >= 0.0
}

fn accepts_material(m: &Material) -> bool {
    accepts(m.friction) && accepts(m.density) && accepts(m.restitution)
}

impl BridgeConfig {
    /// Defaults with body density taken from the host's display density.
    pub fn for_display_density(density: f32) -> Self {
        let mut cfg = Self::default();
        cfg.set_density(density);
        cfg
    }

    /// Parse a TOML document. Omitted keys keep their defaults and rejected
    /// scalars fall back to them as well.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        let mut cfg = Self::default();
        if let Some(v) = raw.friction {
            cfg.set_friction(v);
        }
        if let Some(v) = raw.density {
            cfg.set_density(v);
        }
        if let Some(v) = raw.restitution {
            cfg.set_restitution(v);
        }
        if let Some(v) = raw.ratio {
            cfg.set_ratio(v);
        }
        if let Some(v) = raw.enabled {
            cfg.enabled = v;
        }
        match raw.dt {
            Some(v) if v > 0.0 => cfg.dt = v,
            Some(v) => tracing::debug!(dt = v, "ignoring timestep setting"),
            None => {}
        }
        if let Some(v) = raw.velocity_iterations {
            cfg.velocity_iterations = v;
        }
        if let Some(v) = raw.position_iterations {
            cfg.position_iterations = v;
        }
        if let Some(v) = raw.gravity {
            cfg.gravity = v;
        }
        if let Some(v) = raw.allow_sleep {
            cfg.allow_sleep = v;
        }
        cfg.boundary_thickness = raw.boundary_thickness.filter(|t| accepts(*t));
        match raw.boundary_material {
            Some(v) if accepts_material(&v) => cfg.boundary_material = v,
            Some(v) => tracing::debug!(?v, "ignoring boundary material setting"),
            None => {}
        }
        cfg.seed = raw.seed;
        Ok(cfg)
    }

    // --- Validated scalars -------------------------------------------------

    pub fn friction(&self) -> f32 {
        self.material.friction
    }

    pub fn set_friction(&mut self, friction: f32) {
        if accepts(friction) {
            self.material.friction = friction;
        } else {
            tracing::debug!(friction, "ignoring friction setting");
        }
    }

    pub fn density(&self) -> f32 {
        self.material.density
    }

    pub fn set_density(&mut self, density: f32) {
        if accepts(density) {
            self.material.density = density;
        } else {
            tracing::debug!(density, "ignoring density setting");
        }
    }

    pub fn restitution(&self) -> f32 {
        self.material.restitution
    }

    pub fn set_restitution(&mut self, restitution: f32) {
        if accepts(restitution) {
            self.material.restitution = restitution;
        } else {
            tracing::debug!(restitution, "ignoring restitution setting");
        }
    }

    /// Pixels per meter.
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        if accepts(ratio) {
            self.ratio = ratio;
        } else {
            tracing::debug!(ratio, "ignoring ratio setting");
        }
    }

    // --- Derived -----------------------------------------------------------

    /// Fixture material for element bodies.
    pub fn material(&self) -> Material {
        self.material
    }

    pub fn units(&self) -> UnitConverter {
        UnitConverter::new(self.ratio)
    }

    /// Boundary half-thickness in pixels.
    pub fn boundary_thickness_px(&self) -> f32 {
        self.boundary_thickness.unwrap_or(self.ratio)
    }

    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            gravity: self.gravity,
            allow_sleep: self.allow_sleep,
        }
    }
}
