//! Room catalogue - the fixed set of rooms under camera and their scene world.
//!
//! Props and introduced artifacts live as entities in one `hecs` world so an
//! anomaly can hold a plain `Entity` handle to whatever it touched. The
//! optional light/painting/screen features live directly on the
//! [`RoomDescriptor`], present or absent as a whole.

use std::collections::{HashMap, HashSet};

use hecs::{Entity, World};
use nightshift_logic::kinds::{kind_pool, AnomalyKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::*;

/// A room as seen by the anomaly engine.
#[derive(Debug, Clone)]
pub struct RoomDescriptor {
    pub id: String,
    pub name: String,
    /// Camera overlay text, e.g. `CAM 02 — KITCHEN`
    pub camera_label: String,
    pub dimensions: Vec3,
    /// Targetable props, in insertion order
    pub objects: Vec<Entity>,
    pub light: Option<Light>,
    pub painting: Option<Painting>,
    pub screen: Option<Screen>,
}

impl RoomDescriptor {
    /// Anomaly kinds this room can host.
    pub fn kind_pool(&self) -> Vec<AnomalyKind> {
        kind_pool(self.painting.is_some(), self.screen.is_some())
    }
}

/// A prop to place in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropSpec {
    pub name: String,
    pub position: Vec3,
}

/// Declarative description of one room, used to build a catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dimensions: Vec3,
    #[serde(default)]
    pub light: Option<Light>,
    #[serde(default)]
    pub painting: Option<Painting>,
    #[serde(default)]
    pub screen: Option<Screen>,
    #[serde(default)]
    pub props: Vec<PropSpec>,
}

impl RoomSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dimensions: Vec3::ZERO,
            light: None,
            painting: None,
            screen: None,
            props: Vec::new(),
        }
    }

    pub fn with_dimensions(mut self, x: f32, y: f32, z: f32) -> Self {
        self.dimensions = Vec3::new(x, y, z);
        self
    }

    pub fn with_light(mut self, intensity: f32, color: u32) -> Self {
        self.light = Some(Light::new(intensity, Color::from_hex(color)));
        self
    }

    pub fn with_painting(mut self, color: u32) -> Self {
        self.painting = Some(Painting {
            color: Color::from_hex(color),
        });
        self
    }

    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = Some(screen);
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, x: f32, y: f32, z: f32) -> Self {
        self.props.push(PropSpec {
            name: name.into(),
            position: Vec3::new(x, y, z),
        });
        self
    }
}

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("a room catalogue needs at least one room")]
    Empty,
    #[error("room id {0:?} appears more than once")]
    DuplicateRoom(String),
    #[error("room {0:?} has no props to target")]
    NoProps(String),
    #[error("failed to parse room specs: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Stable mapping from room id to room, plus the world holding their entities.
pub struct RoomCatalogue {
    world: World,
    rooms: Vec<RoomDescriptor>,
    index: HashMap<String, usize>,
    /// Validated specs, kept so the house can be rebuilt between shifts
    specs: Vec<RoomSpec>,
}

impl RoomCatalogue {
    /// Build a catalogue; room order is camera order.
    ///
    /// Every room must carry at least one prop so prop-targeting anomalies
    /// always have something to act on.
    pub fn from_specs(specs: Vec<RoomSpec>) -> Result<Self, CatalogueError> {
        if specs.is_empty() {
            return Err(CatalogueError::Empty);
        }

        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            if !seen.insert(spec.id.as_str()) {
                return Err(CatalogueError::DuplicateRoom(spec.id.clone()));
            }
            if spec.props.is_empty() {
                return Err(CatalogueError::NoProps(spec.id.clone()));
            }
        }

        let mut catalogue = Self {
            world: World::new(),
            rooms: Vec::new(),
            index: HashMap::new(),
            specs,
        };
        catalogue.populate();
        Ok(catalogue)
    }

    /// Throw away every mutation and artifact and rebuild the rooms from
    /// their specs. Entity handles held from before the reset are dead.
    pub fn reset(&mut self) {
        self.populate();
    }

    fn populate(&mut self) {
        let mut world = World::new();
        let mut rooms = Vec::with_capacity(self.specs.len());
        let mut index = HashMap::with_capacity(self.specs.len());

        for (room_idx, spec) in self.specs.iter().enumerate() {
            let objects = spec
                .props
                .iter()
                .map(|prop| {
                    world.spawn((
                        Prop::new(prop.name.clone()),
                        Position::new(prop.position, room_idx),
                        Visibility::VISIBLE,
                    ))
                })
                .collect();

            index.insert(spec.id.clone(), room_idx);
            rooms.push(RoomDescriptor {
                id: spec.id.clone(),
                name: spec.name.clone(),
                camera_label: format!("CAM {:02} — {}", room_idx + 1, spec.name.to_uppercase()),
                dimensions: spec.dimensions,
                objects,
                light: spec.light,
                painting: spec.painting,
                screen: spec.screen,
            });
        }

        self.world = world;
        self.rooms = rooms;
        self.index = index;
    }

    /// Build from a JSON array of [`RoomSpec`]s.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogueError> {
        let specs: Vec<RoomSpec> = serde_json::from_str(json)?;
        Self::from_specs(specs)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn rooms(&self) -> &[RoomDescriptor] {
        &self.rooms
    }

    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(|room| room.id.as_str())
    }

    pub fn index_of(&self, room_id: &str) -> Option<usize> {
        self.index.get(room_id).copied()
    }

    pub fn room(&self, room_id: &str) -> Option<&RoomDescriptor> {
        self.index_of(room_id).map(|idx| &self.rooms[idx])
    }

    pub fn room_at(&self, idx: usize) -> Option<&RoomDescriptor> {
        self.rooms.get(idx)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Borrow one room's features and the scene world at the same time.
    pub fn room_and_world_mut(&mut self, idx: usize) -> Option<(&mut RoomDescriptor, &mut World)> {
        let room = self.rooms.get_mut(idx)?;
        Some((room, &mut self.world))
    }

    /// Same as [`RoomCatalogue::room_and_world_mut`] for an index known to be in range.
    pub(crate) fn room_and_world_at(&mut self, idx: usize) -> (&mut RoomDescriptor, &mut World) {
        (&mut self.rooms[idx], &mut self.world)
    }

    pub fn prop_position(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<&Position>(entity).ok().map(|pos| pos.local)
    }

    pub fn is_visible(&self, entity: Entity) -> Option<bool> {
        self.world.get::<&Visibility>(entity).ok().map(|vis| vis.visible)
    }

    /// Artifacts currently standing in a room.
    pub fn artifacts_in(&self, idx: usize) -> Vec<Entity> {
        self.world
            .query::<(&Artifact, &Position)>()
            .iter()
            .filter(|(_, (_, pos))| pos.room == idx)
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn artifact_count(&self) -> usize {
        self.world.query::<&Artifact>().iter().count()
    }
}
