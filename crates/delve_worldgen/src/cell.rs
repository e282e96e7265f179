//! # Cells & Materials
//!
//! The vocabulary the generator emits and gameplay systems consume.
//!
//! A cell's [`Material`] fixes its [`Capabilities`] (solid, diggable,
//! hazardous, loot-bearing, fallable). Hit points, cosmetic variant and
//! overlay intensity are stored per cell and vary independently: the tier
//! decides hit points, the cosmetic pass decides the variant.

use std::ops::BitOr;

/// Number of cosmetic variants per stratified material.
pub const VARIANT_COUNT: u8 = 4;

/// Depth tier of stratified material. Deeper tiers are harder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Tier {
    /// Loose soil right under the surface.
    Topsoil = 0,
    /// Packed clay.
    Clay = 1,
    /// Layered shale.
    Shale = 2,
    /// Granite bedrock.
    Granite = 3,
    /// Basalt just above the magma floor.
    Basalt = 4,
}

impl Tier {
    /// All tiers, shallowest first.
    pub const ALL: [Self; 5] = [Self::Topsoil, Self::Clay, Self::Shale, Self::Granite, Self::Basalt];

    /// Depth (world Y) at which each tier after `Topsoil` begins.
    const BOUNDARIES: [i64; 4] = [24, 80, 200, 420];

    /// Maps a world depth to its tier.
    ///
    /// Step function, monotonic in depth. Depths above ground resolve to
    /// `Topsoil`.
    #[must_use]
    pub fn for_depth(depth: i64) -> Self {
        let index = Self::BOUNDARIES.iter().take_while(|&&start| depth >= start).count();
        Self::ALL[index]
    }

    /// Hits needed to dig one cell of this tier with a base tool.
    #[must_use]
    pub const fn hit_points(self) -> u16 {
        match self {
            Self::Topsoil => 1,
            Self::Clay => 2,
            Self::Shale => 3,
            Self::Granite => 5,
            Self::Basalt => 8,
        }
    }
}

/// Closed set of capability flags derived from a material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capabilities (open air).
    pub const NONE: Self = Self(0);
    /// Blocks movement.
    pub const SOLID: Self = Self(1);
    /// Can be dug; carries hit points.
    pub const DIGGABLE: Self = Self(1 << 1);
    /// Damages whatever enters it.
    pub const HAZARDOUS: Self = Self(1 << 2);
    /// Drops loot or spawns something when broken.
    pub const LOOT: Self = Self(1 << 3);
    /// Falls when unsupported.
    pub const FALLABLE: Self = Self(1 << 4);

    /// Union of two flag sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns true if every flag in `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bit pattern.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Material kind of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Material {
    /// Open air or a carved cavern.
    #[default]
    Empty,
    /// The walkable surface row.
    Surface,
    /// Depth-tiered diggable rock.
    Stratum(Tier),
    /// Rare heavy rock. Cannot be dug, falls when undermined.
    HeavyRock,
    /// Border of a structural ring. Indestructible.
    RingFrame,
    /// Forced-empty inside of a structural ring.
    RingInterior,
    /// Magma floor.
    Hazard,
    /// Reward container embedded in rock.
    Container(Tier),
    /// Decorative, protective crust around points of interest.
    Overlay(Tier),
}

impl Material {
    /// Capability flags for this material.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Empty | Self::RingInterior => Capabilities::NONE,
            Self::Surface | Self::Stratum(_) | Self::Overlay(_) => {
                Capabilities::SOLID.union(Capabilities::DIGGABLE)
            }
            Self::HeavyRock => Capabilities::SOLID.union(Capabilities::FALLABLE),
            Self::RingFrame => Capabilities::SOLID,
            Self::Hazard => Capabilities::HAZARDOUS,
            Self::Container(_) => Capabilities::SOLID
                .union(Capabilities::DIGGABLE)
                .union(Capabilities::LOOT),
        }
    }

    /// Stable identifier handed to renderers and serializers.
    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Self::Empty => 0,
            Self::Surface => 1,
            Self::Stratum(tier) => 10 + tier as u16,
            Self::HeavyRock => 20,
            Self::RingFrame => 30,
            Self::RingInterior => 31,
            Self::Hazard => 40,
            Self::Container(tier) => 50 + tier as u16,
            Self::Overlay(tier) => 60 + tier as u16,
        }
    }

    /// Base hit points a freshly generated cell of this material carries.
    #[must_use]
    pub const fn base_hit_points(self) -> u16 {
        match self {
            Self::Surface => 1,
            Self::Stratum(tier) => tier.hit_points(),
            Self::Container(tier) => tier.hit_points() + 1,
            Self::Overlay(tier) => tier.hit_points() + 2,
            Self::Empty | Self::HeavyRock | Self::RingFrame | Self::RingInterior | Self::Hazard => 0,
        }
    }

    /// Returns true for plain stratified rock.
    #[inline]
    #[must_use]
    pub const fn is_stratum(self) -> bool {
        matches!(self, Self::Stratum(_))
    }

    /// Returns true for either part of a structural ring.
    #[inline]
    #[must_use]
    pub const fn is_ring(self) -> bool {
        matches!(self, Self::RingFrame | Self::RingInterior)
    }
}

/// Result of hitting a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigOutcome {
    /// The cell cannot be dug (air, frame, heavy rock, hazard).
    Undiggable,
    /// Damage applied; this many hit points remain.
    Damaged(u16),
    /// Hit points exhausted. Carries the material that was broken.
    Broken(Material),
}

/// The atomic terrain unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    material: Material,
    hit_points: u16,
    variant: u8,
    overlay: u8,
}

impl Cell {
    /// Open air.
    pub const EMPTY: Self = Self::new(Material::Empty);

    /// Creates a cell with the material's base hit points and no cosmetics.
    #[must_use]
    pub const fn new(material: Material) -> Self {
        Self {
            material,
            hit_points: material.base_hit_points(),
            variant: 0,
            overlay: 0,
        }
    }

    /// Stratified rock of the tier for `depth`.
    #[must_use]
    pub fn stratum_at(depth: i64) -> Self {
        Self::new(Material::Stratum(Tier::for_depth(depth)))
    }

    /// Material kind.
    #[inline]
    #[must_use]
    pub const fn material(self) -> Material {
        self.material
    }

    /// Capability flags.
    #[inline]
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        self.material.capabilities()
    }

    /// Blocks movement.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        self.capabilities().contains(Capabilities::SOLID)
    }

    /// Can be dug.
    #[inline]
    #[must_use]
    pub const fn is_diggable(self) -> bool {
        self.capabilities().contains(Capabilities::DIGGABLE)
    }

    /// Damages on contact.
    #[inline]
    #[must_use]
    pub const fn is_hazardous(self) -> bool {
        self.capabilities().contains(Capabilities::HAZARDOUS)
    }

    /// Drops loot or spawns something when broken.
    #[inline]
    #[must_use]
    pub const fn has_loot(self) -> bool {
        self.capabilities().contains(Capabilities::LOOT)
    }

    /// Falls when unsupported.
    #[inline]
    #[must_use]
    pub const fn is_fallable(self) -> bool {
        self.capabilities().contains(Capabilities::FALLABLE)
    }

    /// A player can get through this cell: it is open or can be dug.
    #[inline]
    #[must_use]
    pub const fn is_escapable(self) -> bool {
        !self.is_solid() || self.is_diggable()
    }

    /// Stable material identifier.
    #[inline]
    #[must_use]
    pub const fn material_id(self) -> u16 {
        self.material.id()
    }

    /// Remaining hit points (0 for undiggable cells).
    #[inline]
    #[must_use]
    pub const fn hit_points(self) -> u16 {
        self.hit_points
    }

    /// Cosmetic variant in `0..VARIANT_COUNT`.
    #[inline]
    #[must_use]
    pub const fn variant(self) -> u8 {
        self.variant
    }

    /// Overlay strength, 0 when the cell is not an overlay.
    #[inline]
    #[must_use]
    pub const fn overlay_intensity(self) -> u8 {
        self.overlay
    }

    /// Returns the cell with a different cosmetic variant, clamped to range.
    #[must_use]
    pub const fn with_variant(mut self, variant: u8) -> Self {
        self.variant = if variant < VARIANT_COUNT { variant } else { VARIANT_COUNT - 1 };
        self
    }

    /// Returns the cell with a different overlay intensity.
    #[must_use]
    pub const fn with_overlay(mut self, intensity: u8) -> Self {
        self.overlay = intensity;
        self
    }

    /// Applies `damage` hits.
    ///
    /// A broken cell turns into open air; the caller decides what loot or
    /// effect the returned material triggers.
    pub fn apply_damage(&mut self, damage: u16) -> DigOutcome {
        if !self.is_diggable() {
            return DigOutcome::Undiggable;
        }
        self.hit_points = self.hit_points.saturating_sub(damage);
        if self.hit_points == 0 {
            let broken = self.material;
            *self = Self::EMPTY;
            DigOutcome::Broken(broken)
        } else {
            DigOutcome::Damaged(self.hit_points)
        }
    }
}
