//! Brick catalog and hit registry
//!
//! The catalog holds both worlds' brick definitions. Hit state is not stored on
//! the definitions: a single `HitRegistry` is the source of truth, and the
//! active brick list is rebuilt from catalog + registry + geometry whenever any
//! of them changes.

use std::collections::HashSet;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{BRICK_SLOTS, SceneGeometry};
use super::state::{Brick, BrickContent, BrickId, BrickKind, Realm};

const BUILTIN_CATALOG: &str = include_str!("../../assets/bricks.json");

/// One brick definition, positioned by slot rather than coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickDef {
    pub id: BrickId,
    pub kind: BrickKind,
    /// Horizontal slot, `0..BRICK_SLOTS`
    pub slot: u32,
    pub content: BrickContent,
}

#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    DuplicateId(BrickId),
    SlotOutOfRange { id: BrickId, slot: u32 },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "malformed brick catalog: {}", e),
            CatalogError::DuplicateId(id) => write!(f, "brick id '{}' is used twice", id),
            CatalogError::SlotOutOfRange { id, slot } => {
                write!(f, "brick '{}' has slot {} (max {})", id, slot, BRICK_SLOTS - 1)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

/// Brick definitions for both worlds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrickCatalog {
    pub surface: Vec<BrickDef>,
    pub underground: Vec<BrickDef>,
}

impl BrickCatalog {
    /// Parse and validate a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the crate
    pub fn builtin() -> Self {
        match Self::from_json(BUILTIN_CATALOG) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Built-in brick catalog rejected: {}", e);
                Self::default()
            }
        }
    }

    /// Ids must be unique across both worlds; slots must fit the scene
    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for def in self.surface.iter().chain(&self.underground) {
            if !seen.insert(def.id.as_str()) {
                return Err(CatalogError::DuplicateId(def.id.clone()));
            }
            if def.slot >= BRICK_SLOTS {
                return Err(CatalogError::SlotOutOfRange {
                    id: def.id.clone(),
                    slot: def.slot,
                });
            }
        }
        Ok(())
    }

    pub fn defs(&self, realm: Realm) -> &[BrickDef] {
        match realm {
            Realm::Surface => &self.surface,
            Realm::Underground => &self.underground,
        }
    }

    /// Build the active brick list for a world
    pub fn project(&self, realm: Realm, geometry: &SceneGeometry, hits: &HitRegistry) -> Vec<Brick> {
        self.defs(realm)
            .iter()
            .map(|def| Brick {
                id: def.id.clone(),
                pos: Vec2::new(geometry.brick_x(def.slot), geometry.brick_y),
                kind: def.kind,
                hit: hits.contains(&def.id),
                content: def.content.clone(),
            })
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&BrickDef> {
        self.surface.iter().chain(&self.underground).find(|d| d.id == id)
    }
}

/// Ids of every brick struck this session. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HitRegistry {
    ids: HashSet<BrickId>,
}

impl HitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit. Returns true the first time an id is marked.
    pub fn mark(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_owned())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
