//! Structural ring placement.
//!
//! Rings sit in horizontal bands that repeat every `period` rows starting at
//! `min_depth`. Each band is cut into `slot_width`-column slots; a slot holds
//! at most one ring, at a horizontal offset picked by the lattice hash. The
//! test is a pure function of the world position, so a chunk can ask about
//! ring cells that belong to its neighbours.

use crate::config::RingConfig;
use crate::noise::LatticeHash;
use crate::seed::WorldSeed;

/// Which part of a ring a cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingPart {
    /// Solid frame.
    Border,
    /// Forced-empty inside.
    Interior,
}

/// Deterministic ring layout for one world.
pub struct RingLayout {
    config: RingConfig,
    hazard_depth: i64,
    presence: LatticeHash,
    offset: LatticeHash,
}

impl RingLayout {
    /// Creates the layout. Bands that would touch `hazard_depth` are empty.
    #[must_use]
    pub fn new(seed: WorldSeed, config: RingConfig, hazard_depth: i64) -> Self {
        Self {
            config,
            hazard_depth,
            presence: LatticeHash::new(seed.derive(1)),
            offset: LatticeHash::new(seed.derive(2)),
        }
    }

    /// Classifies the world cell `(x, y)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn part_at(&self, x: i64, y: i64) -> Option<RingPart> {
        let c = &self.config;
        if y < c.min_depth || y >= self.hazard_depth {
            return None;
        }

        let band = (y - c.min_depth).div_euclid(c.period);
        let row = (y - c.min_depth).rem_euclid(c.period);
        if row >= c.height || (y - row).saturating_add(c.height) >= self.hazard_depth {
            return None;
        }

        let slot = x.div_euclid(c.slot_width);
        if self.presence.random(slot, band) >= c.chance {
            return None;
        }

        let spare = c.slot_width - c.width + 1;
        let shift = ((self.offset.random(slot, band) * spare as f64) as i64).min(spare - 1);
        let column = x.rem_euclid(c.slot_width) - shift;
        if column < 0 || column >= c.width {
            return None;
        }

        let edge = column == 0 || column == c.width - 1 || row == 0 || row == c.height - 1;
        Some(if edge { RingPart::Border } else { RingPart::Interior })
    }

    /// Returns true if any of the 8 neighbours of `(x, y)` is a frame cell.
    #[must_use]
    pub fn touches_border(&self, x: i64, y: i64) -> bool {
        (-1..=1).any(|dy| {
            (-1..=1).any(|dx| {
                (dx, dy) != (0, 0)
                    && self.part_at(x.saturating_add(dx), y.saturating_add(dy))
                        == Some(RingPart::Border)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> RingLayout {
        RingLayout::new(WorldSeed::new(8), RingConfig::default(), 640)
    }

    #[test]
    fn test_rings_have_expected_shape() {
        let rings = layout();
        let c = RingConfig::default();
        let mut found = 0;

        for slot in -20..20 {
            let left = slot * c.slot_width;
            let top = c.min_depth;
            let hits: Vec<i64> = (left..left + c.slot_width)
                .filter(|&x| rings.part_at(x, top) == Some(RingPart::Border))
                .collect();
            if hits.is_empty() {
                continue;
            }
            found += 1;
            assert_eq!(hits.len() as i64, c.width, "top row spans the ring width");

            let x0 = hits[0];
            for row in 0..c.height {
                for col in 0..c.width {
                    let edge = row == 0 || row == c.height - 1 || col == 0 || col == c.width - 1;
                    let expected = if edge { RingPart::Border } else { RingPart::Interior };
                    assert_eq!(rings.part_at(x0 + col, top + row), Some(expected));
                }
            }
            assert_eq!(rings.part_at(x0 - 1, top + 1), None);
            assert_eq!(rings.part_at(x0 + c.width, top + 1), None);
            assert_eq!(rings.part_at(x0 + 1, top + c.height), None);
        }
        assert!(found > 5, "expected several rings in 40 slots, found {found}");
    }

    #[test]
    fn test_no_rings_above_min_depth_or_near_hazard() {
        let rings = layout();
        for x in -200..200 {
            for y in 0..40 {
                assert_eq!(rings.part_at(x, y), None);
            }
            for y in 600..700 {
                let part = rings.part_at(x, y);
                assert!(part.is_none() || y + 1 < 640, "ring cell at {y} touches hazard");
            }
        }
    }

    #[test]
    fn test_bands_repeat_with_period() {
        let rings = layout();
        let c = RingConfig::default();
        let band_rows = (0..1000)
            .filter(|&x| (0..c.period).any(|dy| rings.part_at(x, c.min_depth + c.period + dy).is_some()))
            .count();
        assert!(band_rows > 0);
        for gap_row in c.height..c.period {
            for x in -100..100 {
                assert_eq!(rings.part_at(x, c.min_depth + gap_row), None);
            }
        }
    }

    #[test]
    fn test_extreme_positions_do_not_overflow() {
        let rings = layout();
        let c = RingConfig::default();
        for x in [i64::MIN, i64::MIN + 1, -1, 0, i64::MAX - 1, i64::MAX] {
            for y in [i64::MIN, c.min_depth, c.min_depth + 3, 639, i64::MAX] {
                let part = rings.part_at(x, y);
                assert!(part.is_none() || (c.min_depth..640).contains(&y));
                let _ = rings.touches_border(x, y);
            }
        }

        let wide = RingConfig {
            slot_width: i64::from(i32::MAX),
            ..RingConfig::default()
        };
        let rings = RingLayout::new(WorldSeed::new(8), wide, i64::from(i32::MAX));
        for x in [i64::MIN, i64::MAX] {
            let _ = rings.part_at(x, i64::from(i32::MAX) - 1);
            let _ = rings.touches_border(x, wide.min_depth);
        }
    }

    #[test]
    fn test_touches_border() {
        let rings = layout();
        let c = RingConfig::default();
        let (x0, y0) = (-400..400)
            .find(|&x| rings.part_at(x, c.min_depth) == Some(RingPart::Border))
            .map(|x| (x, c.min_depth))
            .expect("some ring in 800 columns");
        assert!(rings.touches_border(x0, y0 - 1));
        assert!(rings.touches_border(x0 - 1, y0 - 1));
        assert!(!rings.touches_border(x0, y0 - 2));
    }
}
