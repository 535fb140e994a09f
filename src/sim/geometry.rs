//! Scene layout
//!
//! Every position in the scene derives from the canvas size and the device
//! class. The layout is rebuilt wholesale when the device class changes and is
//! never edited in place.
//!
//! Vertical bands (top to bottom): 70% sky, 20% sand, 10% grass. The grass top
//! has a 4-unit edge that the player's feet rest on.

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::Direction;
use crate::device::DeviceClass;

/// Sprite scale for the mobile portrait layout
pub const MOBILE_SCALE: f32 = 0.7;

// Reference sizes at desktop scale
const PLAYER_WIDTH: f32 = 125.0; // 416px sprite * 0.3
const PLAYER_HEIGHT: f32 = 187.0; // 624px sprite * 0.3
const BRICK_SIZE: f32 = 80.0;
const PIPE_SIZE: f32 = 86.0;
const GRASS_PERCENT: f32 = 10.0;
const GRASS_EDGE: f32 = 4.0;
/// Bricks float this many player heights above the grass
const BRICK_LIFT: f32 = 1.2;

/// Number of brick slots across the scene
pub const BRICK_SLOTS: u32 = 5;
// Margins are given against the reference width and scale with the canvas
const REFERENCE_WIDTH: f32 = 1400.0;
const LEFT_MARGIN: f32 = 100.0;
const RIGHT_MARGIN: f32 = 200.0;

const PIPE_RIGHT_GAP: f32 = 50.0;
const PIPE_SINK: f32 = 12.0;
const PIPE_INSET_LEFT: f32 = 26.0;
const PIPE_INSET_RIGHT: f32 = 14.0;
const PIPE_INSET_TOP: f32 = 14.0;
/// The sprite's visible body sits left of its box when facing right
const FACING_RIGHT_OFFSET: f32 = -10.0;
const SPAWN_X: f32 = 50.0;

/// A rectangle in scene units (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Read-only scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGeometry {
    pub device: DeviceClass,
    pub game_width: f32,
    pub game_height: f32,
    /// Top of the grass strip
    pub ground_y: f32,
    /// Player `position.y` when standing on the ground
    pub player_ground_y: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub brick_size: f32,
    /// Top edge shared by every brick
    pub brick_y: f32,
    /// Left edge of brick slot 0
    pub brick_left_margin: f32,
    /// Horizontal gap between neighbouring slots
    pub brick_gap: f32,
    /// Where the pipe sprite is drawn
    pub pipe_sprite: Rect,
    /// Collision box, inset from the sprite bounds
    pub pipe_box: Aabb,
    /// Player `position.y` when standing on the pipe
    pub pipe_top_y: f32,
    /// Horizontal offset applied to the pipe center when facing right
    pub facing_right_offset: f32,
    pub spawn_x: f32,
}

impl SceneGeometry {
    pub fn new(game_width: f32, game_height: f32, device: DeviceClass) -> Self {
        let scale = match device {
            DeviceClass::Desktop => 1.0,
            DeviceClass::MobilePortrait => MOBILE_SCALE,
        };

        let player_width = PLAYER_WIDTH * scale;
        let player_height = PLAYER_HEIGHT * scale;
        let ground_y = game_height - game_height * GRASS_PERCENT / 100.0;
        let player_ground_y = ground_y + GRASS_EDGE - player_height;

        let brick_size = BRICK_SIZE * scale;
        let brick_y = ground_y - player_height * BRICK_LIFT - brick_size;
        let brick_left_margin = game_width * LEFT_MARGIN / REFERENCE_WIDTH;
        let brick_right_margin = game_width * RIGHT_MARGIN / REFERENCE_WIDTH;
        let available = game_width - brick_left_margin - brick_right_margin;
        let slots = BRICK_SLOTS as f32;
        let brick_gap = (available - slots * brick_size) / (slots - 1.0);

        let pipe_size = PIPE_SIZE * scale;
        let pipe_sprite = Rect {
            x: game_width - pipe_size - PIPE_RIGHT_GAP * scale,
            y: ground_y - pipe_size - PIPE_SINK * scale,
            w: pipe_size,
            h: pipe_size,
        };
        let pipe_box = Aabb {
            left: pipe_sprite.x + PIPE_INSET_LEFT * scale,
            right: pipe_sprite.x + pipe_size - PIPE_INSET_RIGHT * scale,
            top: pipe_sprite.y + PIPE_INSET_TOP * scale,
            bottom: pipe_sprite.y + pipe_size,
        };

        Self {
            device,
            game_width,
            game_height,
            ground_y,
            player_ground_y,
            player_width,
            player_height,
            brick_size,
            brick_y,
            brick_left_margin,
            brick_gap,
            pipe_sprite,
            pipe_top_y: pipe_box.top - player_height,
            pipe_box,
            facing_right_offset: FACING_RIGHT_OFFSET * scale,
            spawn_x: SPAWN_X * scale,
        }
    }

    /// The standard 1400x600 desktop scene
    pub fn desktop() -> Self {
        use crate::consts::{GAME_HEIGHT, GAME_WIDTH};
        Self::new(GAME_WIDTH, GAME_HEIGHT, DeviceClass::Desktop)
    }

    /// Left edge of a brick slot
    pub fn brick_x(&self, slot: u32) -> f32 {
        self.brick_left_margin + slot as f32 * (self.brick_size + self.brick_gap)
    }

    /// Player `position.x` that visually centers the sprite over the pipe
    pub fn pipe_center_x(&self, direction: Direction) -> f32 {
        let base = (self.pipe_box.left + self.pipe_box.right) / 2.0 - self.player_width / 2.0;
        match direction {
            Direction::Right => base + self.facing_right_offset,
            Direction::Left => base,
        }
    }

    /// Rightmost legal `position.x`
    pub fn max_player_x(&self) -> f32 {
        self.game_width - self.player_width
    }

    /// Player collision box at a given top-left position
    pub fn player_box(&self, x: f32, y: f32) -> Aabb {
        Aabb {
            left: x,
            right: x + self.player_width,
            top: y,
            bottom: y + self.player_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_desktop_matches_reference_layout() {
        let g = SceneGeometry::desktop();
        assert_eq!(g.ground_y, 540.0);
        assert_eq!(g.player_ground_y, 357.0);
        assert_eq!(g.pipe_sprite.x, 1264.0);
        assert_eq!(g.pipe_sprite.y, 442.0);
        assert_eq!(g.pipe_box, Aabb { left: 1290.0, right: 1336.0, top: 456.0, bottom: 528.0 });
        assert_eq!(g.pipe_top_y, 269.0);
        assert_eq!(g.max_player_x(), 1275.0);
        assert!(approx(g.brick_y, 235.6));
    }

    #[test]
    fn test_brick_slots_evenly_spaced() {
        let g = SceneGeometry::desktop();
        assert_eq!(g.brick_gap, 175.0);
        assert_eq!(g.brick_x(0), 100.0);
        assert_eq!(g.brick_x(1), 355.0);
        assert_eq!(g.brick_x(4), 1120.0);
        // Last brick ends at the right margin
        assert_eq!(g.brick_x(4) + g.brick_size, 1400.0 - 200.0);
    }

    #[test]
    fn test_pipe_center_depends_on_facing() {
        let g = SceneGeometry::desktop();
        assert_eq!(g.pipe_center_x(Direction::Left), 1250.5);
        assert_eq!(g.pipe_center_x(Direction::Right), 1240.5);
    }

    #[test]
    fn test_mobile_portrait_scales_sprites() {
        let g = SceneGeometry::new(600.0, 900.0, DeviceClass::MobilePortrait);
        assert!(approx(g.player_width, 87.5));
        assert!(approx(g.brick_size, 56.0));
        assert_eq!(g.ground_y, 810.0);
        assert!(approx(g.player_ground_y + g.player_height, 814.0));
        // Pipe stays inside the scene and its box inside the sprite
        assert!(g.pipe_sprite.x + g.pipe_sprite.w <= g.game_width);
        assert!(g.pipe_box.left > g.pipe_sprite.x);
        assert!(g.pipe_box.right < g.pipe_sprite.x + g.pipe_sprite.w);
        assert!(g.brick_gap > 0.0);
    }

    #[test]
    fn test_bricks_reachable_from_ground() {
        for g in [
            SceneGeometry::desktop(),
            SceneGeometry::new(600.0, 900.0, DeviceClass::MobilePortrait),
        ] {
            let brick_bottom = g.brick_y + g.brick_size;
            // Standing player's head is below the bricks
            assert!(g.player_ground_y > brick_bottom);
        }
    }
}
