//! # World Configuration
//!
//! Every tunable of the generator and the cache, loadable from TOML.
//!
//! All fields default, so a config file only needs the values it changes:
//!
//! ```toml
//! [generator]
//! hazard_depth = 900
//!
//! [generator.ring]
//! chance = 0.8
//!
//! [cache]
//! capacity = 64
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::CHUNK_SIZE;
use crate::error::{WorldgenError, WorldgenResult};

/// Upper bound for every depth and ring size, in cells (`i32::MAX`).
///
/// Sums of two extents stay far from `i64` overflow.
pub const MAX_EXTENT: i64 = 2_147_483_647;

/// Radius bounds for a halo around one kind of point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HaloRadii {
    /// No overlay closer than this to the centre.
    pub min: f64,
    /// No overlay farther than this from the centre.
    pub max: f64,
}

impl HaloRadii {
    /// Largest radius a halo may request.
    pub const LIMIT: f64 = crate::halo::MAX_RADIUS;

    /// Creates a radius pair.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(self, name: &str) -> WorldgenResult<()> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min >= 0.0
            && self.min <= self.max
            && self.max <= Self::LIMIT;
        if ok {
            Ok(())
        } else {
            Err(WorldgenError::InvalidConfig(format!(
                "{name} radii must satisfy 0 <= min <= max <= {}, got [{}, {}]",
                Self::LIMIT,
                self.min,
                self.max
            )))
        }
    }
}

/// Placement of the periodic structural rings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingConfig {
    /// Depth of the first ring band's top row.
    pub min_depth: i64,
    /// Rows between the tops of consecutive bands.
    pub period: i64,
    /// Columns per horizontal slot; each slot holds at most one ring.
    pub slot_width: i64,
    /// Ring width including the frame.
    pub width: i64,
    /// Ring height including the frame.
    pub height: i64,
    /// Probability that a slot holds a ring.
    pub chance: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            min_depth: 40,
            period: 48,
            slot_width: 40,
            width: 9,
            height: 7,
            chance: 0.55,
        }
    }
}

/// Terrain generator tunables.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Depth of the walkable surface row. Everything above is sky.
    pub surface_row: i64,
    /// First depth where caverns and rings may appear.
    pub safe_depth: i64,
    /// First depth of the magma floor.
    pub hazard_depth: i64,
    /// Heavy-rock chance per cell in the near-surface band.
    pub near_surface_rock_chance: f64,
    /// Heavy-rock chance per cell below `safe_depth`.
    pub deep_rock_chance: f64,
    /// Frequency of the cavern noise.
    pub cavern_scale: f64,
    /// Cavern noise threshold at `safe_depth`.
    pub cavern_threshold_top: f64,
    /// Threshold drop per row of depth.
    pub cavern_threshold_slope: f64,
    /// Lowest the threshold may fall.
    pub cavern_threshold_floor: f64,
    /// Flood-search cap for the cosmetic distance estimate.
    pub variant_search_radius: u32,
    /// Container candidates tried per chunk.
    pub container_attempts: u32,
    /// Chance that a candidate becomes a container.
    pub container_chance: f64,
    /// Structural ring layout.
    pub ring: RingConfig,
    /// Halo bounds around containers.
    pub container_halo: HaloRadii,
    /// Halo bounds around heavy rock.
    pub rock_halo: HaloRadii,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            surface_row: 3,
            safe_depth: 12,
            hazard_depth: 640,
            near_surface_rock_chance: 0.004,
            deep_rock_chance: 0.008,
            cavern_scale: 0.05,
            cavern_threshold_top: 0.32,
            cavern_threshold_slope: 0.0004,
            cavern_threshold_floor: 0.12,
            variant_search_radius: 6,
            container_attempts: 3,
            container_chance: 0.35,
            ring: RingConfig::default(),
            container_halo: HaloRadii::new(1.0, 3.0),
            rock_halo: HaloRadii::new(1.0, 2.0),
        }
    }
}

impl GeneratorConfig {
    /// Checks that the layout describes a playable world.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first violated constraint.
    pub fn validate(&self) -> WorldgenResult<()> {
        let ring = &self.ring;

        for (name, value) in [
            ("surface_row", self.surface_row),
            ("safe_depth", self.safe_depth),
            ("hazard_depth", self.hazard_depth),
            ("ring.min_depth", ring.min_depth),
            ("ring.period", ring.period),
            ("ring.slot_width", ring.slot_width),
            ("ring.width", ring.width),
            ("ring.height", ring.height),
        ] {
            ensure(
                (0..=MAX_EXTENT).contains(&value),
                &format!("{name} must lie in [0, {MAX_EXTENT}], got {value}"),
            )?;
        }

        ensure(self.surface_row < self.safe_depth, "safe_depth must lie below surface_row")?;
        ensure(ring.min_depth > self.safe_depth, "ring.min_depth must lie below safe_depth")?;
        ensure(
            ring.min_depth + ring.height < self.hazard_depth,
            "hazard_depth must leave room for at least one ring band",
        )?;

        ensure(ring.width >= 3 && ring.height >= 3, "rings need at least a 3x3 footprint")?;
        ensure(ring.width <= ring.slot_width, "ring.width must fit inside ring.slot_width")?;
        ensure(ring.period >= ring.height + 2, "ring.period must leave a gap between bands")?;

        for (name, p) in [
            ("near_surface_rock_chance", self.near_surface_rock_chance),
            ("deep_rock_chance", self.deep_rock_chance),
            ("ring.chance", ring.chance),
            ("container_chance", self.container_chance),
        ] {
            ensure((0.0..=1.0).contains(&p), &format!("{name} must lie in [0, 1], got {p}"))?;
        }

        ensure(
            self.cavern_scale.is_finite() && self.cavern_scale > 0.0,
            "cavern_scale must be positive",
        )?;
        ensure(
            [self.cavern_threshold_top, self.cavern_threshold_slope, self.cavern_threshold_floor]
                .iter()
                .all(|v| v.is_finite()),
            "cavern thresholds must be finite",
        )?;

        #[allow(clippy::cast_possible_truncation)]
        let max_radius = CHUNK_SIZE as u32;
        ensure(
            (1..=max_radius).contains(&self.variant_search_radius),
            "variant_search_radius must lie in [1, CHUNK_SIZE]",
        )?;

        self.container_halo.validate("container_halo")?;
        self.rock_halo.validate("rock_halo")
    }
}

/// Chunk cache tunables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of chunks held at once.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl CacheConfig {
    /// Creates a cache config with the given capacity.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Rejects a cache that could hold nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero capacity.
    pub fn validate(&self) -> WorldgenResult<()> {
        ensure(self.capacity > 0, "cache.capacity must be at least 1")
    }
}

/// Top-level configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Terrain generator settings.
    pub generator: GeneratorConfig,
    /// Chunk cache settings.
    pub cache: CacheConfig,
}

impl WorldConfig {
    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> WorldgenResult<()> {
        self.generator.validate()?;
        self.cache.validate()
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `Parse` for malformed TOML or unknown keys, `InvalidConfig`
    /// when validation fails.
    pub fn from_toml_str(text: &str) -> WorldgenResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        tracing::info!(
            hazard_depth = config.generator.hazard_depth,
            cache_capacity = config.cache.capacity,
            "world configuration loaded"
        );
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, otherwise as
    /// [`WorldConfig::from_toml_str`].
    pub fn from_toml_file(path: &Path) -> WorldgenResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if a value cannot be represented in TOML.
    pub fn to_toml_string(&self) -> WorldgenResult<String> {
        toml::to_string(self).map_err(|e| WorldgenError::InvalidConfig(e.to_string()))
    }
}

fn ensure(condition: bool, message: &str) -> WorldgenResult<()> {
    if condition {
        Ok(())
    } else {
        Err(WorldgenError::InvalidConfig(message.to_string()))
    }
}
