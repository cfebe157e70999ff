//! Anomaly mutations - what each kind does to a room and how it is undone.
//!
//! Both directions are an exhaustive match on [`AnomalyKind`], so a new kind
//! cannot be added without deciding how it is applied and restored.

use hecs::{Entity, World};
use nightshift_logic::constants::visuals;
use nightshift_logic::kinds::AnomalyKind;
use rand::Rng;

use crate::catalogue::RoomDescriptor;
use crate::components::*;

pub type AnomalyId = u64;

/// Pre-mutation values needed to put a room back exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OriginalState {
    Position(Vec3),
    Light(Light),
    Painting(Painting),
    Screen(Screen),
}

/// A single visual deviation injected into one room.
#[derive(Debug, Clone)]
pub struct Anomaly {
    pub id: AnomalyId,
    /// Room id as used in player reports
    pub room: String,
    /// Index of the room in the catalogue
    pub room_index: usize,
    pub kind: AnomalyKind,
    /// Prop acted on (displaced/missing only)
    pub target: Option<Entity>,
    /// Filled by apply, consumed by restore; stays `None` when apply was a no-op
    pub original_state: Option<OriginalState>,
    /// Artifact introduced into the scene (extra/intruder)
    pub added_entity: Option<Entity>,
    /// Simulated seconds into the shift when it appeared
    pub spawned_at: f64,
}

impl Anomaly {
    pub fn new(
        id: AnomalyId,
        room: &RoomDescriptor,
        room_index: usize,
        kind: AnomalyKind,
        target: Option<Entity>,
        spawned_at: f64,
    ) -> Self {
        Self {
            id,
            room: room.id.clone(),
            room_index,
            kind,
            target: if kind.needs_target() { target } else { None },
            original_state: None,
            added_entity: None,
            spawned_at,
        }
    }

    pub fn matches(&self, room_id: &str, kind: AnomalyKind) -> bool {
        self.room == room_id && self.kind == kind
    }
}

/// Perturb the room according to the anomaly's kind.
///
/// A kind whose feature (or target prop) is absent leaves the room untouched
/// and records nothing.
pub fn apply_mutation(
    room: &mut RoomDescriptor,
    world: &mut World,
    anomaly: &mut Anomaly,
    rng: &mut impl Rng,
) {
    match anomaly.kind {
        AnomalyKind::Displaced => {
            let Some(target) = anomaly.target else { return };
            if let Ok(mut pos) = world.get::<&mut Position>(target) {
                anomaly.original_state = Some(OriginalState::Position(pos.local));
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                pos.local.x += sign * visuals::DISPLACEMENT;
            }
        }
        AnomalyKind::Light => {
            if let Some(light) = room.light.as_mut() {
                anomaly.original_state = Some(OriginalState::Light(*light));
                if rng.gen_bool(0.5) {
                    light.intensity = visuals::BLACKOUT_INTENSITY;
                } else {
                    light.intensity = visuals::OMINOUS_INTENSITY;
                    light.color = Color::from_hex(visuals::OMINOUS_COLOR);
                }
            }
        }
        AnomalyKind::Extra => {
            anomaly.added_entity = Some(spawn_artifact(world, Artifact::apparition(), anomaly.room_index));
        }
        AnomalyKind::Intruder => {
            anomaly.added_entity = Some(spawn_artifact(world, Artifact::intruder(), anomaly.room_index));
        }
        AnomalyKind::Missing => {
            let Some(target) = anomaly.target else { return };
            if let Ok(mut vis) = world.get::<&mut Visibility>(target) {
                vis.visible = false;
            }
        }
        AnomalyKind::Painting => {
            if let Some(painting) = room.painting.as_mut() {
                anomaly.original_state = Some(OriginalState::Painting(*painting));
                let palette = &visuals::PAINTING_PALETTE;
                painting.color = Color::from_hex(palette[rng.gen_range(0..palette.len())]);
            }
        }
        AnomalyKind::Tv => {
            if let Some(screen) = room.screen.as_mut() {
                anomaly.original_state = Some(OriginalState::Screen(*screen));
                screen.color = Color::from_hex(visuals::STATIC_SCREEN_COLOR);
                screen.emissive = Color::from_hex(visuals::STATIC_EMISSIVE_COLOR);
                screen.emissive_intensity = visuals::STATIC_EMISSIVE_INTENSITY;
            }
        }
    }
}

/// Undo [`apply_mutation`]: restore saved values and remove any introduced artifact.
pub fn restore_mutation(room: &mut RoomDescriptor, world: &mut World, anomaly: &mut Anomaly) {
    let saved = anomaly.original_state.take();
    match anomaly.kind {
        AnomalyKind::Displaced => {
            if let (Some(target), Some(OriginalState::Position(local))) = (anomaly.target, saved) {
                if let Ok(mut pos) = world.get::<&mut Position>(target) {
                    pos.local = local;
                }
            }
        }
        AnomalyKind::Light => {
            if let (Some(light), Some(OriginalState::Light(original))) = (room.light.as_mut(), saved) {
                *light = original;
            }
        }
        AnomalyKind::Missing => {
            if let Some(target) = anomaly.target {
                if let Ok(mut vis) = world.get::<&mut Visibility>(target) {
                    vis.visible = true;
                }
            }
        }
        AnomalyKind::Painting => {
            if let (Some(painting), Some(OriginalState::Painting(original))) =
                (room.painting.as_mut(), saved)
            {
                *painting = original;
            }
        }
        AnomalyKind::Tv => {
            if let (Some(screen), Some(OriginalState::Screen(original))) = (room.screen.as_mut(), saved) {
                *screen = original;
            }
        }
        // Artifacts are removed below, for whichever kind carries one.
        AnomalyKind::Extra | AnomalyKind::Intruder => {}
    }

    if let Some(artifact) = anomaly.added_entity.take() {
        if world.despawn(artifact).is_err() {
            log::warn!(
                "Anomaly {} artifact {:?} was already gone from {}",
                anomaly.id,
                artifact,
                anomaly.room
            );
        }
    }
}

fn spawn_artifact(world: &mut World, artifact: Artifact, room_index: usize) -> Entity {
    let position = Position::new(artifact.offset(), room_index);
    world.spawn((artifact, position, Visibility::VISIBLE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{RoomCatalogue, RoomSpec};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn den() -> RoomCatalogue {
        RoomCatalogue::from_specs(vec![RoomSpec::new("den", "Den")
            .with_light(15.0, 0xffffff)
            .with_painting(0xaabbcc)
            .with_screen(Screen {
                color: Color::from_hex(0x000000),
                emissive: Color::from_hex(0x101010),
                emissive_intensity: 0.5,
            })
            .with_prop("armchair", 0.0, 0.5, 0.0)
            .with_prop("lamp", 1.0, 1.2, -1.0)])
        .unwrap()
    }

    fn anomaly_for(catalogue: &RoomCatalogue, kind: AnomalyKind) -> Anomaly {
        let room = catalogue.room_at(0).unwrap();
        Anomaly::new(1, room, 0, kind, room.objects.first().copied(), 0.0)
    }

    fn apply(catalogue: &mut RoomCatalogue, anomaly: &mut Anomaly, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (room, world) = catalogue.room_and_world_mut(0).unwrap();
        apply_mutation(room, world, anomaly, &mut rng);
    }

    fn restore(catalogue: &mut RoomCatalogue, anomaly: &mut Anomaly) {
        let (room, world) = catalogue.room_and_world_mut(0).unwrap();
        restore_mutation(room, world, anomaly);
    }

    #[test]
    fn test_displaced_moves_two_units_along_x() {
        let mut catalogue = den();
        let mut anomaly = anomaly_for(&catalogue, AnomalyKind::Displaced);
        let target = anomaly.target.unwrap();
        let before = catalogue.prop_position(target).unwrap();

        apply(&mut catalogue, &mut anomaly, 3);

        let after = catalogue.prop_position(target).unwrap();
        assert_eq!((after.x - before.x).abs(), 2.0);
        assert_eq!(after.y, before.y);
        assert_eq!(after.z, before.z);
        assert_eq!(anomaly.original_state, Some(OriginalState::Position(before)));

        restore(&mut catalogue, &mut anomaly);
        assert_eq!(catalogue.prop_position(target), Some(before));
        assert!(anomaly.original_state.is_none());
    }

    #[test]
    fn test_displacement_sign_varies() {
        let mut seen_left = false;
        let mut seen_right = false;
        for seed in 0..32 {
            let mut catalogue = den();
            let mut anomaly = anomaly_for(&catalogue, AnomalyKind::Displaced);
            let target = anomaly.target.unwrap();
            apply(&mut catalogue, &mut anomaly, seed);
            let x = catalogue.prop_position(target).unwrap().x;
            seen_left |= x < 0.0;
            seen_right |= x > 0.0;
        }
        assert!(seen_left && seen_right);
    }

    #[test]
    fn test_light_is_blackout_or_ominous_and_restores() {
        for seed in 0..16 {
            let mut catalogue = den();
            let original = catalogue.room_at(0).unwrap().light.unwrap();
            let mut anomaly = anomaly_for(&catalogue, AnomalyKind::Light);

            apply(&mut catalogue, &mut anomaly, seed);
            let light = catalogue.room_at(0).unwrap().light.unwrap();
            let blackout = light.intensity == 0.0 && light.color == original.color;
            let ominous = light.intensity == 5.0 && light.color == Color::from_hex(0xff00ff);
            assert!(blackout || ominous, "unexpected light {:?}", light);

            restore(&mut catalogue, &mut anomaly);
            assert_eq!(catalogue.room_at(0).unwrap().light, Some(original));
        }
    }

    #[test]
    fn test_extra_and_intruder_add_then_remove_artifacts() {
        for kind in [AnomalyKind::Extra, AnomalyKind::Intruder] {
            let mut catalogue = den();
            let mut anomaly = anomaly_for(&catalogue, kind);
            assert!(anomaly.target.is_none());

            apply(&mut catalogue, &mut anomaly, 1);
            let artifact = anomaly.added_entity.expect("artifact handle");
            assert_eq!(catalogue.artifacts_in(0), vec![artifact]);
            assert!(anomaly.original_state.is_none());

            restore(&mut catalogue, &mut anomaly);
            assert_eq!(catalogue.artifact_count(), 0);
            assert!(!catalogue.world().contains(artifact));
        }
    }

    #[test]
    fn test_intruder_stands_at_its_offset() {
        let mut catalogue = den();
        let mut anomaly = anomaly_for(&catalogue, AnomalyKind::Intruder);
        apply(&mut catalogue, &mut anomaly, 1);
        let artifact = anomaly.added_entity.unwrap();
        let kind = catalogue.world().get::<&Artifact>(artifact).unwrap().kind;
        assert_eq!(kind, ArtifactKind::Intruder);
        assert_eq!(catalogue.prop_position(artifact), Some(Vec3::new(-2.0, 1.0, -2.0)));
    }

    #[test]
    fn test_missing_hides_then_shows() {
        let mut catalogue = den();
        let mut anomaly = anomaly_for(&catalogue, AnomalyKind::Missing);
        let target = anomaly.target.unwrap();

        apply(&mut catalogue, &mut anomaly, 1);
        assert_eq!(catalogue.is_visible(target), Some(false));
        assert!(anomaly.original_state.is_none());

        restore(&mut catalogue, &mut anomaly);
        assert_eq!(catalogue.is_visible(target), Some(true));
    }

    #[test]
    fn test_painting_uses_palette_and_restores() {
        let mut catalogue = den();
        let mut anomaly = anomaly_for(&catalogue, AnomalyKind::Painting);

        apply(&mut catalogue, &mut anomaly, 5);
        let color = catalogue.room_at(0).unwrap().painting.unwrap().color;
        assert!(visuals::PAINTING_PALETTE.contains(&color.hex()));
        assert_eq!(
            anomaly.original_state,
            Some(OriginalState::Painting(Painting {
                color: Color::from_hex(0xaabbcc)
            }))
        );

        restore(&mut catalogue, &mut anomaly);
        assert_eq!(catalogue.room_at(0).unwrap().painting.unwrap().color.hex(), 0xaabbcc);
    }

    #[test]
    fn test_tv_static_and_exact_restore() {
        let mut catalogue = den();
        let original = catalogue.room_at(0).unwrap().screen.unwrap();
        let mut anomaly = anomaly_for(&catalogue, AnomalyKind::Tv);

        apply(&mut catalogue, &mut anomaly, 1);
        let screen = catalogue.room_at(0).unwrap().screen.unwrap();
        assert_eq!(screen.color.hex(), 0x99bbff);
        assert_eq!(screen.emissive.hex(), 0x4466cc);
        assert_eq!(screen.emissive_intensity, 1.8);

        restore(&mut catalogue, &mut anomaly);
        assert_eq!(catalogue.room_at(0).unwrap().screen, Some(original));
    }

    #[test]
    fn test_feature_kinds_skip_missing_features() {
        let mut catalogue = RoomCatalogue::from_specs(vec![
            RoomSpec::new("closet", "Closet").with_prop("broom", 0.0, 1.0, 0.0)
        ])
        .unwrap();
        for kind in [AnomalyKind::Painting, AnomalyKind::Tv, AnomalyKind::Light] {
            let mut anomaly = anomaly_for(&catalogue, kind);
            apply(&mut catalogue, &mut anomaly, 1);
            assert!(anomaly.original_state.is_none(), "{} recorded state", kind);
            restore(&mut catalogue, &mut anomaly);
        }
        let closet = catalogue.room_at(0).unwrap();
        assert!(closet.painting.is_none() && closet.screen.is_none() && closet.light.is_none());
    }
}
