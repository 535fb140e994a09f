//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Wall-clock time enters only as an argument (`now_ms`)
//! - Stable iteration order (catalog order)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod geometry;
pub mod pipe;
pub mod state;
pub mod tick;
pub mod world;

pub use catalog::{BrickCatalog, BrickDef, CatalogError, HitRegistry};
pub use collision::{Aabb, Penetration, Side};
pub use geometry::{Rect, SceneGeometry};
pub use pipe::{PipeEvent, PipePhase, PipeTravel};
pub use state::{Brick, BrickContent, BrickId, BrickKind, Direction, PipeAnimation, Player, Realm};
pub use tick::{BrickHit, TickInput, TickReport, TickStatus, TravelGate, tick};
pub use world::{SimEvent, Snapshot, World};
