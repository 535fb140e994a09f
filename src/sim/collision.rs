//! Axis-aligned box collision
//!
//! Resolution uses the axis of least penetration: of the four overlap depths,
//! the shallowest one names the side the mover came in from. This is an
//! approximation. It can pick the wrong side when a fast mover overlaps on two
//! axes at once, and it does nothing about tunneling.

use serde::{Deserialize, Serialize};

/// Box edges in scene units, y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Aabb {
    /// Strict overlap: touching edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.right > other.left
            && self.left < other.right
            && self.bottom > other.top
            && self.top < other.bottom
    }

    /// Horizontal spans overlap (vertical position ignored)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.right > other.left && self.left < other.right
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }
}

/// Which side of the obstacle the mover is pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Mover's top is inside the obstacle's bottom (hit from below)
    Bottom,
    /// Mover's feet are inside the obstacle's top (landing)
    Top,
    /// Mover's right edge is inside the obstacle's left edge
    Left,
    /// Mover's left edge is inside the obstacle's right edge
    Right,
}

/// Overlap depths of a mover inside an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// mover.right - obstacle.left
    pub left: f32,
    /// obstacle.right - mover.left
    pub right: f32,
    /// mover.bottom - obstacle.top
    pub top: f32,
    /// obstacle.bottom - mover.top
    pub bottom: f32,
}

impl Penetration {
    /// Depths for a mover overlapping an obstacle, `None` if they don't overlap
    pub fn between(mover: &Aabb, obstacle: &Aabb) -> Option<Self> {
        if !mover.overlaps(obstacle) {
            return None;
        }
        Some(Self {
            left: mover.right - obstacle.left,
            right: obstacle.right - mover.left,
            top: mover.bottom - obstacle.top,
            bottom: obstacle.bottom - mover.top,
        })
    }

    /// Depth along the shallowest axis
    pub fn min(&self) -> f32 {
        self.left.min(self.right).min(self.top).min(self.bottom)
    }

    /// Sides tied for the shallowest depth, in resolution order
    /// (bottom, top, left, right).
    ///
    /// Callers try each in turn; a side whose extra condition fails falls
    /// through to the next tied side.
    pub fn shallowest_sides(&self) -> impl Iterator<Item = Side> + '_ {
        let min = self.min();
        [
            (Side::Bottom, self.bottom),
            (Side::Top, self.top),
            (Side::Left, self.left),
            (Side::Right, self.right),
        ]
        .into_iter()
        .filter(move |&(_, depth)| depth == min)
        .map(|(side, _)| side)
    }

    /// Shallowest side, ties broken bottom, top, left, right
    pub fn least(&self) -> Side {
        self.shallowest_sides().next().unwrap_or(Side::Bottom)
    }

    /// Shallower of the two horizontal sides, ties to the left
    pub fn least_horizontal(&self) -> (Side, f32) {
        if self.left <= self.right {
            (Side::Left, self.left)
        } else {
            (Side::Right, self.right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(left: f32, top: f32, w: f32, h: f32) -> Aabb {
        Aabb {
            left,
            right: left + w,
            top,
            bottom: top + h,
        }
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = aabb(0.0, 0.0, 10.0, 10.0);
        let b = aabb(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(Penetration::between(&a, &b).is_none());
    }

    #[test]
    fn test_least_side_from_below() {
        // Mover's head pokes 3 units into the obstacle's underside
        let obstacle = aabb(100.0, 100.0, 80.0, 80.0);
        let mover = aabb(110.0, 177.0, 40.0, 100.0);
        let pen = Penetration::between(&mover, &obstacle).unwrap();
        assert_eq!(pen.bottom, 3.0);
        assert_eq!(pen.least(), Side::Bottom);
    }

    #[test]
    fn test_least_side_landing_and_walls() {
        let obstacle = aabb(100.0, 100.0, 80.0, 80.0);

        let landing = aabb(120.0, 2.0, 40.0, 100.0);
        assert_eq!(Penetration::between(&landing, &obstacle).unwrap().least(), Side::Top);

        let from_left = aabb(62.0, 120.0, 40.0, 40.0);
        assert_eq!(Penetration::between(&from_left, &obstacle).unwrap().least(), Side::Left);

        let from_right = aabb(178.0, 120.0, 40.0, 40.0);
        assert_eq!(Penetration::between(&from_right, &obstacle).unwrap().least(), Side::Right);
    }

    #[test]
    fn test_tie_order() {
        let all_equal = Penetration { left: 5.0, right: 5.0, top: 5.0, bottom: 5.0 };
        assert_eq!(all_equal.least(), Side::Bottom);
        assert_eq!(
            all_equal.shallowest_sides().collect::<Vec<_>>(),
            vec![Side::Bottom, Side::Top, Side::Left, Side::Right]
        );

        let top_left = Penetration { left: 5.0, right: 9.0, top: 5.0, bottom: 9.0 };
        assert_eq!(top_left.least(), Side::Top);

        let left_right = Penetration { left: 5.0, right: 5.0, top: 9.0, bottom: 9.0 };
        assert_eq!(left_right.least(), Side::Left);
        assert_eq!(left_right.least_horizontal(), (Side::Left, 5.0));
    }
}
