//! Hex coordinate system using cube coordinates (q, r, s).
//!
//! This module provides the integer geometry every other part of the crate sits on:
//! - `CubeCoord`: identifies a single cell of the flat-topped sector grid
//! - conversion from the tile-local offset coordinates used by the tile catalog
//! - clockwise rotation about the origin, translation, and hex distance
//! - enumeration of the cells of a hexagon of a given radius
//!
//! All arithmetic is exact. The invariant `q + r + s == 0` is enforced on construction
//! and on deserialization, so every `CubeCoord` in circulation is a real grid cell.
//! Deserialized coordinates are also bounded by `CubeCoord::MAX_COMPONENT`, so stepping
//! to a neighbor or rotating never overflows.

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Cube coordinate for a hex grid.
///
/// Ordering is lexicographic on `(q, r, s)`. That order is the canonical identity
/// order used to visit each unordered pair of cells exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Default)]
pub struct CubeCoord {
    q: i32,
    r: i32,
    s: i32,
}

impl<'de> Deserialize<'de> for CubeCoord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            q: i32,
            r: i32,
            s: i32,
        }

        let raw = Raw::deserialize(deserializer)?;
        let coord = CubeCoord::from_components(raw.q, raw.r, raw.s).ok_or_else(|| {
            de::Error::custom(format!(
                "cube coordinate ({}, {}, {}) does not satisfy q + r + s = 0",
                raw.q, raw.r, raw.s
            ))
        })?;
        if !coord.in_range() {
            return Err(de::Error::custom(format!(
                "cube coordinate {} is outside ±{}",
                coord,
                CubeCoord::MAX_COMPONENT
            )));
        }
        Ok(coord)
    }
}

/// The six unit vectors of the grid, clockwise starting from the lower-right neighbor.
pub const DIRECTIONS: [CubeCoord; 6] = [
    CubeCoord::new(1, 0),
    CubeCoord::new(0, 1),
    CubeCoord::new(-1, 1),
    CubeCoord::new(-1, 0),
    CubeCoord::new(0, -1),
    CubeCoord::new(1, -1),
];

impl CubeCoord {
    /// The grid origin (0, 0, 0)
    pub const ORIGIN: CubeCoord = CubeCoord::new(0, 0);

    /// Largest absolute component accepted from external input
    pub const MAX_COMPONENT: i32 = 1 << 24;

    /// Create a cube coordinate from `q` and `r`; `s` is derived.
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Create a cube coordinate from all three components, if they sum to zero.
    pub const fn from_components(q: i32, r: i32, s: i32) -> Option<Self> {
        if q as i64 + r as i64 + s as i64 == 0 {
            Some(Self { q, r, s })
        } else {
            None
        }
    }

    /// Convert a tile-local offset coordinate into cube coordinates.
    ///
    /// Tiles are described on a flat-topped offset grid where every other column is
    /// staggered by half a cell, so `r = y - floor(x / 2)`.
    pub const fn from_offset(x: i32, y: i32) -> Self {
        Self::new(x, y - x.div_euclid(2))
    }

    pub const fn q(&self) -> i32 {
        self.q
    }

    pub const fn r(&self) -> i32 {
        self.r
    }

    pub const fn s(&self) -> i32 {
        self.s
    }

    /// One 60° clockwise step about the origin: (q, r, s) -> (-r, -s, -q).
    pub const fn rotate_cw_once(self) -> Self {
        Self {
            q: -self.r,
            r: -self.s,
            s: -self.q,
        }
    }

    /// Rotate clockwise about the origin by `times * 60°`.
    pub fn rotate_cw(self, times: u8) -> Self {
        (0..times % 6).fold(self, |coord, _| coord.rotate_cw_once())
    }

    /// Whether every component lies within `±MAX_COMPONENT`.
    pub const fn in_range(&self) -> bool {
        let max = Self::MAX_COMPONENT.unsigned_abs();
        self.q.unsigned_abs() <= max
            && self.r.unsigned_abs() <= max
            && self.s.unsigned_abs() <= max
    }

    /// Component-wise sum, or `None` on overflow.
    pub fn checked_add(self, other: CubeCoord) -> Option<Self> {
        Some(Self {
            q: self.q.checked_add(other.q)?,
            r: self.r.checked_add(other.r)?,
            s: self.s.checked_add(other.s)?,
        })
    }

    /// Scale by `factor`, or `None` on overflow.
    pub fn checked_mul(self, factor: i32) -> Option<Self> {
        Some(Self {
            q: self.q.checked_mul(factor)?,
            r: self.r.checked_mul(factor)?,
            s: self.s.checked_mul(factor)?,
        })
    }

    /// Distance to another hex, in hex steps.
    pub fn distance_to(&self, other: &CubeCoord) -> u32 {
        let dq = self.q.abs_diff(other.q);
        let dr = self.r.abs_diff(other.r);
        let ds = self.s.abs_diff(other.s);
        dq.max(dr).max(ds)
    }

    /// Distance from the origin.
    pub fn length(&self) -> u32 {
        self.distance_to(&Self::ORIGIN)
    }

    /// The six neighboring cells, in `DIRECTIONS` order.
    pub fn neighbors(&self) -> [CubeCoord; 6] {
        DIRECTIONS.map(|direction| *self + direction)
    }
}

impl Add for CubeCoord {
    type Output = CubeCoord;

    fn add(self, other: CubeCoord) -> CubeCoord {
        CubeCoord {
            q: self.q + other.q,
            r: self.r + other.r,
            s: self.s + other.s,
        }
    }
}

impl Sub for CubeCoord {
    type Output = CubeCoord;

    fn sub(self, other: CubeCoord) -> CubeCoord {
        CubeCoord {
            q: self.q - other.q,
            r: self.r - other.r,
            s: self.s - other.s,
        }
    }
}

impl Mul<i32> for CubeCoord {
    type Output = CubeCoord;

    fn mul(self, factor: i32) -> CubeCoord {
        CubeCoord {
            q: self.q * factor,
            r: self.r * factor,
            s: self.s * factor,
        }
    }
}

impl fmt::Display for CubeCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.q, self.r, self.s)
    }
}

/// All cells within `radius` of the origin, `q` ascending then `r` ascending.
///
/// A radius-2 hexagon has 19 cells.
pub fn hexagon(radius: u32) -> Vec<CubeCoord> {
    let radius = radius as i32;
    let mut cells = Vec::with_capacity((3 * radius * (radius + 1) + 1) as usize);
    for q in -radius..=radius {
        let start_r = (-radius).max(-q - radius);
        let end_r = radius.min(-q + radius);
        for r in start_r..=end_r {
            cells.push(CubeCoord::new(q, r));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_components_sum_to_zero() {
        for x in -3..=3 {
            for y in -3..=3 {
                let c = CubeCoord::from_offset(x, y);
                assert_eq!(c.q() + c.r() + c.s(), 0, "offset ({}, {})", x, y);
                for times in 0..6 {
                    let rotated = c.rotate_cw(times);
                    assert_eq!(rotated.q() + rotated.r() + rotated.s(), 0);
                }
            }
        }
    }

    #[test]
    fn test_from_offset() {
        assert_eq!(CubeCoord::from_offset(0, 0), CubeCoord::ORIGIN);
        assert_eq!(CubeCoord::from_offset(-2, 0), CubeCoord::new(-2, 1));
        assert_eq!(CubeCoord::from_offset(-1, -1), CubeCoord::new(-1, 0));
        assert_eq!(CubeCoord::from_offset(1, -1), CubeCoord::new(1, -1));
        assert_eq!(CubeCoord::from_offset(2, 1), CubeCoord::new(2, 0));
        assert_eq!(CubeCoord::from_offset(0, 2), CubeCoord::new(0, 2));
    }

    #[test]
    fn test_from_components_rejects_bad_sum() {
        assert!(CubeCoord::from_components(1, 1, 1).is_none());
        // Wraps to zero in 32-bit arithmetic.
        assert!(CubeCoord::from_components(i32::MAX, i32::MAX, 2).is_none());
        assert_eq!(
            CubeCoord::from_components(2, -1, -1),
            Some(CubeCoord::new(2, -1))
        );
    }

    #[test]
    fn test_single_rotation_step() {
        let c = CubeCoord::new(1, -2);
        // (q, r, s) = (1, -2, 1) -> (2, -1, -1)
        assert_eq!(c.rotate_cw(1), CubeCoord::from_components(2, -1, -1).unwrap());
        assert_eq!(c.rotate_cw(0), c);
    }

    #[test]
    fn test_rotation_has_order_six() {
        for c in hexagon(3) {
            assert_eq!(c.rotate_cw(6), c);
            assert_eq!(c.rotate_cw(1).rotate_cw(5), c);
            assert_eq!(c.rotate_cw(2).rotate_cw(4), c);
            assert_eq!(c.rotate_cw(1).length(), c.length());
        }
    }

    #[test]
    fn test_hex_distance() {
        let a = CubeCoord::ORIGIN;
        let b = CubeCoord::new(2, -1);
        assert_eq!(a.distance_to(&b), 2);

        let c = CubeCoord::new(-3, 3);
        assert_eq!(a.distance_to(&c), 3);
        assert_eq!(b.distance_to(&c), 5);
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let cells = hexagon(2);
        for a in &cells {
            assert_eq!(a.distance_to(a), 0);
            for b in &cells {
                assert_eq!(a.distance_to(b), b.distance_to(a));
            }
        }
    }

    #[test]
    fn test_hex_neighbors() {
        let center = CubeCoord::new(4, -7);
        let neighbors = center.neighbors();

        let unique: HashSet<_> = neighbors.iter().collect();
        assert_eq!(unique.len(), 6);

        for neighbor in &neighbors {
            assert_eq!(center.distance_to(neighbor), 1);
        }
    }

    #[test]
    fn test_hexagon_cell_counts() {
        assert_eq!(hexagon(0), vec![CubeCoord::ORIGIN]);
        assert_eq!(hexagon(1).len(), 7);
        let cells = hexagon(2);
        assert_eq!(cells.len(), 19);
        assert!(cells.iter().all(|c| c.length() <= 2));
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), 19);
    }

    #[test]
    fn test_translation_arithmetic() {
        let shift = CubeCoord::new(5, -2);
        assert_eq!(shift * 2, CubeCoord::new(10, -4));
        assert_eq!(shift * 2 - shift, shift);
        assert_eq!((shift + CubeCoord::new(3, -5)).s(), -1);
    }

    #[test]
    fn test_checked_arithmetic() {
        let shift = CubeCoord::new(5, -2);
        assert_eq!(shift.checked_mul(3), Some(shift * 3));
        assert_eq!(shift.checked_add(shift), Some(shift * 2));
        assert_eq!(shift.checked_mul(i32::MAX), None);

        let far = CubeCoord::new(i32::MAX - 1, -(i32::MAX - 1));
        assert!(!far.in_range());
        assert_eq!(far.checked_add(CubeCoord::new(2, -2)), None);
        assert!(CubeCoord::new(CubeCoord::MAX_COMPONENT, 0).in_range());
    }

    #[test]
    fn test_display_and_ordering() {
        assert_eq!(CubeCoord::new(-1, 2).to_string(), "-1,2,-1");
        assert!(CubeCoord::new(-1, 5) < CubeCoord::new(0, -5));
        assert!(CubeCoord::new(0, -1) < CubeCoord::new(0, 1));
    }

    #[test]
    fn test_deserialize_checks_invariant() {
        let ok: CubeCoord = serde_json::from_str(r#"{"q":5,"r":-2,"s":-3}"#).unwrap();
        assert_eq!(ok, CubeCoord::new(5, -2));
        assert!(serde_json::from_str::<CubeCoord>(r#"{"q":5,"r":-2,"s":0}"#).is_err());

        let huge = format!(r#"{{"q":{},"r":{},"s":0}}"#, i32::MAX, -i32::MAX);
        assert!(serde_json::from_str::<CubeCoord>(&huge).is_err());
        let wrapping = format!(r#"{{"q":{},"r":1,"s":-5}}"#, i32::MAX);
        assert!(serde_json::from_str::<CubeCoord>(&wrapping).is_err());
    }
}
