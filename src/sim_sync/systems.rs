//! Per-frame systems moving data between the ECS world and [`Simulation`].

use bevy::prelude::*;
use hashbrown::HashMap;
use log::{debug, warn};

use crate::components::{CreatureTag, CreatureView, Player};
use crate::creature::CreatureHandle;
use crate::simulation::{SimEvent, Simulation};

use super::events::{CreatureDamaged, CreatureDied, CreatureSpawned, PlayerStruck};
use super::DamageInbox;

/// Maps simulation handles to the entities mirroring them.
#[derive(Resource, Debug, Default)]
pub struct CreatureEntities {
    entities: HashMap<CreatureHandle, Entity>,
}

impl CreatureEntities {
    /// Entity mirroring `handle`, if it has been spawned.
    #[must_use]
    pub fn get(&self, handle: CreatureHandle) -> Option<Entity> {
        self.entities.get(&handle).copied()
    }

    /// Number of mirrored creatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// `true` when no creature is mirrored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Copies the player's position into the simulation. With no `Player`
/// entity the creatures see no player at all.
pub fn snapshot_player_system(player: Query<&Transform, With<Player>>, mut sim: ResMut<Simulation>) {
    let position = player.iter().next().map(|transform| transform.translation);
    sim.set_player(position);
}

/// Applies buffered hits. Requests naming entities without a
/// [`CreatureTag`] are dropped.
pub fn drain_damage_inbox_system(
    mut inbox: ResMut<DamageInbox>,
    mut sim: ResMut<Simulation>,
    tags: Query<&CreatureTag>,
) {
    for request in inbox.drain() {
        let Ok(tag) = tags.get(request.target) else {
            warn!("damage for non-creature entity {:?} ignored", request.target);
            continue;
        };
        sim.apply_damage(tag.handle, request.amount, request.hit_origin);
    }
}

/// Advances the simulation by the frame's exact [`Time`] delta.
pub fn step_simulation_system(time: Res<Time>, mut sim: ResMut<Simulation>) {
    sim.step_by(time.delta());
}

/// Spawns and despawns mirror entities and re-triggers simulation events
/// as observer events.
pub fn publish_simulation_events_system(
    mut commands: Commands,
    mut sim: ResMut<Simulation>,
    mut entities: ResMut<CreatureEntities>,
) {
    for event in sim.drain_events() {
        match event {
            SimEvent::Spawned {
                handle,
                kind,
                position,
                fell_back,
            } => {
                let view = sim.creature(handle).map(CreatureView::of).unwrap_or_default();
                let entity = commands
                    .spawn((
                        Name::new(format!("{kind} {handle}")),
                        CreatureTag { handle, kind },
                        view,
                        Transform::from_translation(position),
                    ))
                    .id();
                entities.entities.insert(handle, entity);
                commands.trigger(CreatureSpawned {
                    entity,
                    handle,
                    kind,
                    position,
                    fell_back,
                });
            }
            SimEvent::Damaged {
                handle,
                kind,
                report,
            } => {
                commands.trigger(CreatureDamaged {
                    entity: entities.get(handle),
                    handle,
                    kind,
                    amount: report.amount,
                    position: report.position,
                    color: report.color,
                    lethal: report.lethal,
                });
            }
            SimEvent::PlayerStruck {
                attacker,
                kind,
                amount,
            } => {
                commands.trigger(PlayerStruck {
                    attacker: entities.get(attacker),
                    kind,
                    amount,
                });
            }
            SimEvent::Died {
                handle,
                kind,
                position,
            } => {
                match entities.entities.remove(&handle) {
                    Some(entity) => commands.entity(entity).despawn(),
                    None => debug!("{kind} {handle} died without a mirror entity"),
                }
                commands.trigger(CreatureDied {
                    handle,
                    kind,
                    position,
                });
            }
        }
    }
}

/// Writes pose and animation state onto every mirror entity.
pub fn sync_creature_views_system(
    sim: Res<Simulation>,
    mut creatures: Query<(&CreatureTag, &mut Transform, &mut CreatureView)>,
) {
    for (tag, mut transform, mut view) in &mut creatures {
        let Some(creature) = sim.creature(tag.handle) else {
            continue;
        };
        transform.translation = creature.position();
        transform.rotation = creature.orientation();
        *view = CreatureView::of(creature);
    }
}
