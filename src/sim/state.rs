//! Entity records
//!
//! Plain data: the player, the bricks and the content they reveal. Behavior
//! lives in `tick` (physics) and `pipe` (pipe travel).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::SceneGeometry;

/// Facing direction. Cosmetic, but also picks the pipe-centering offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

/// Which world is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Realm {
    #[default]
    Surface,
    Underground,
}

impl Realm {
    pub fn opposite(self) -> Self {
        match self {
            Realm::Surface => Realm::Underground,
            Realm::Underground => Realm::Surface,
        }
    }

    pub fn is_underground(self) -> bool {
        self == Realm::Underground
    }
}

/// Pipe travel phase as seen on the player (`None` = physics owns the player)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeAnimation {
    #[default]
    None,
    Priming,
    Entering,
    Transitioning,
    Exiting,
}

impl PipeAnimation {
    /// Physics integration is suspended while any pipe phase is playing
    pub fn is_active(self) -> bool {
        self != PipeAnimation::None
    }
}

/// The one player in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the collision box
    pub pos: Vec2,
    /// Displacement per tick
    pub vel: Vec2,
    /// Airborne after a jump until something is landed on
    pub is_jumping: bool,
    /// Crouched; never while airborne or walking
    pub is_squatting: bool,
    pub direction: Direction,
    pub realm: Realm,
    pub pipe_animation: PipeAnimation,
}

impl Player {
    /// Standing at the spawn point on the surface, facing right
    pub fn spawn(geometry: &SceneGeometry) -> Self {
        Self {
            pos: Vec2::new(geometry.spawn_x, geometry.player_ground_y),
            vel: Vec2::ZERO,
            is_jumping: false,
            is_squatting: false,
            direction: Direction::Right,
            realm: Realm::Surface,
            pipe_animation: PipeAnimation::None,
        }
    }

    pub fn is_underground(&self) -> bool {
        self.realm.is_underground()
    }

    /// Park on the pipe-top line at the pipe center, motionless
    pub fn pin_to_pipe(&mut self, geometry: &SceneGeometry) {
        self.pos = Vec2::new(geometry.pipe_center_x(self.direction), geometry.pipe_top_y);
        self.vel = Vec2::ZERO;
        self.is_jumping = false;
    }
}

/// Stable brick identifier, shared across world swaps
pub type BrickId = String;

/// Brick type, selects icon and content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickKind {
    Education,
    Experience,
    Projects,
    Skills,
    Contact,
    Keyboard,
    Music,
    Cooking,
}

/// What a brick reveals when struck
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrickContent {
    pub title: String,
    pub description: String,
    /// Display lines, opaque to the simulation
    #[serde(default)]
    pub items: Vec<String>,
}

/// A brick in the active world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: BrickId,
    /// Top-left corner; bricks are `brick_size` squares
    pub pos: Vec2,
    pub kind: BrickKind,
    /// Has been struck at least once this session
    pub hit: bool,
    pub content: BrickContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_on_ground() {
        let g = SceneGeometry::desktop();
        let p = Player::spawn(&g);
        assert_eq!(p.pos, Vec2::new(50.0, 357.0));
        assert_eq!(p.realm, Realm::Surface);
        assert!(!p.pipe_animation.is_active());
    }

    #[test]
    fn test_realm_opposite_round_trips() {
        assert_eq!(Realm::Surface.opposite(), Realm::Underground);
        assert_eq!(Realm::Surface.opposite().opposite(), Realm::Surface);
    }

    #[test]
    fn test_pin_to_pipe_uses_facing() {
        let g = SceneGeometry::desktop();
        let mut p = Player::spawn(&g);
        p.vel = Vec2::new(5.0, -3.0);
        p.is_jumping = true;
        p.direction = Direction::Left;
        p.pin_to_pipe(&g);
        assert_eq!(p.pos, Vec2::new(1250.5, 269.0));
        assert_eq!(p.vel, Vec2::ZERO);
        assert!(!p.is_jumping);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&PipeAnimation::Transitioning).unwrap(), "\"transitioning\"");
        assert_eq!(serde_json::to_string(&BrickKind::Cooking).unwrap(), "\"cooking\"");
    }
}
