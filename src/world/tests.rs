use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Builder, Bundle, World};
use crate::comp::Kind;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::event::{Event, EventId, ParamId};
use crate::system::{Handle, System};
use crate::test_util::{self, CompN, Integrate, Position, Recorder, Reaper, Velocity};
use crate::Signature;

/// Checks that signatures agree with storages
/// and that every system tracks exactly the matching live entities.
fn assert_consistent(world: &World, systems: &[(&str, Vec<Entity>, Signature)]) {
    for entity in world.entities() {
        let signature = world.signature(entity).unwrap();
        for kind in 0..world.component_kind_count() {
            let kind = Kind::new(kind as u32);
            let storage = world.components.storage_of(kind).unwrap();
            assert_eq!(
                signature.contains(kind),
                storage.contains(entity),
                "{entity} disagrees on {kind}"
            );
        }
    }

    for (name, tracked, required) in systems {
        for &entity in tracked {
            assert!(world.is_alive(entity), "{name} tracks dead {entity}");
        }
        for entity in world.entities() {
            let matches = world.signature(entity).unwrap().matches(required);
            assert_eq!(tracked.contains(&entity), matches, "{name} tracking of {entity}");
        }
    }
}

fn snapshot<S: System>(
    name: &'static str,
    world: &World,
    handle: &Handle<S>,
) -> (&'static str, Vec<Entity>, Signature) {
    (name, handle.entities(), world.system_signature::<S>().unwrap().clone())
}

#[test]
fn test_movement_tracking() -> Result<()> {
    let mut world = test_util::world(16);
    world.register_component::<Position>()?;
    world.register_component::<Velocity>()?;
    let movement = world.register_system::<Integrate>()?;
    world.set_system_signature_of::<Integrate, (Position, Velocity)>()?;

    let entity = world.create_entity()?;
    world.add_component(entity, Position([0.0, 0.0, 0.0]))?;
    assert!(!movement.contains(entity));

    world.add_component(entity, Velocity([1.0, 2.0, 0.0]))?;
    assert!(movement.contains(entity));

    movement.update(&mut world, 0.5)?;
    assert_eq!(world.get_component::<Position>(entity)?, &Position([0.5, 1.0, 0.0]));

    assert_eq!(world.remove_component::<Velocity>(entity)?, Velocity([1.0, 2.0, 0.0]));
    assert!(!movement.contains(entity));
    assert!(!world.has_component::<Velocity>(entity)?);
    assert!(world.has_component::<Position>(entity)?);

    // no longer tracked, so no longer moved
    movement.update(&mut world, 0.5)?;
    assert_eq!(world.get_component::<Position>(entity)?, &Position([0.5, 1.0, 0.0]));
    assert_eq!(movement.lock().frames, 2);

    world.add_component(entity, Velocity::default())?;
    assert!(movement.contains(entity));

    world.destroy_entity(entity)?;
    assert!(movement.is_empty());
    Ok(())
}

#[test]
fn test_pool_exhaustion_and_reuse() -> Result<()> {
    let mut world = test_util::world(3);

    let entities = (0..3).map(|_| world.create_entity()).collect::<Result<Vec<_>>>()?;
    assert_eq!(entities, vec![Entity::new(0), Entity::new(1), Entity::new(2)]);

    assert_eq!(world.create_entity(), Err(Error::CapacityExceeded { capacity: 3 }));
    assert_eq!(world.entity_count(), 3);

    world.destroy_entity(entities[1])?;
    assert!(!world.is_alive(entities[1]));
    assert_eq!(world.create_entity()?, entities[1]);
    assert_eq!(world.create_entity(), Err(Error::CapacityExceeded { capacity: 3 }));
    Ok(())
}

#[test]
fn test_destroy_compacts_storage() -> Result<()> {
    let mut world = test_util::world(8);
    world.register_component::<Position>()?;

    let mut entities = Vec::new();
    for i in 0..3 {
        let entity = world.create_entity()?;
        world.add_component(entity, Position([i as f32; 3]))?;
        entities.push(entity);
    }

    let storage = world.storage::<Position>()?;
    assert_eq!(storage.entities(), &entities[..]);

    world.destroy_entity(entities[0])?;

    let storage = world.storage::<Position>()?;
    assert_eq!(storage.len(), 2);
    assert_eq!(storage.entities(), &[entities[2], entities[1]]);
    assert_eq!(storage.as_slice(), &[Position([2.0; 3]), Position([1.0; 3])]);
    assert_eq!(storage.slot_of(entities[2]), Some(0));
    assert_eq!(storage.slot_of(entities[0]), None);

    assert_eq!(world.get_component::<Position>(entities[2])?, &Position([2.0; 3]));
    assert_eq!(
        world.get_component::<Position>(entities[0]),
        Err(Error::MissingComponent { entity: entities[0], component: std::any::type_name::<Position>() })
    );
    Ok(())
}

#[test]
fn test_reused_identity_starts_clean() -> Result<()> {
    let mut world = test_util::world(1);
    world.register_component::<Position>()?;
    world.register_component::<Velocity>()?;
    let movement = world.register_system::<Integrate>()?;
    world.set_system_signature_of::<Integrate, (Position, Velocity)>()?;

    let old = world.create_entity()?;
    world.add_component(old, Position::default())?;
    world.add_component(old, Velocity::default())?;
    world.destroy_entity(old)?;

    let new = world.create_entity()?;
    assert_eq!(new, old);
    assert!(world.signature(new)?.is_empty());
    assert!(!world.has_component::<Position>(new)?);
    assert!(!movement.contains(new));
    Ok(())
}

#[test]
fn test_failed_operations_leave_state_unchanged() -> Result<()> {
    let mut world = test_util::world(4);
    let position = world.register_component::<Position>()?;
    world.register_component::<Velocity>()?;

    let entity = world.create_entity()?;
    world.add_component(entity, Position([1.0; 3]))?;

    assert!(matches!(
        world.add_component(entity, Position([9.0; 3])),
        Err(Error::DuplicateComponent { entity: e, .. }) if e == entity
    ));
    assert_eq!(world.get_component::<Position>(entity)?, &Position([1.0; 3]));

    assert!(matches!(
        world.remove_component::<Velocity>(entity),
        Err(Error::MissingComponent { .. })
    ));
    assert_eq!(world.signature(entity)?, &world.empty_signature().with(position));

    assert!(matches!(
        world.add_component(entity, CompN::<0>(0)),
        Err(Error::NotRegistered(_))
    ));

    let dead = Entity::new(3);
    assert_eq!(world.add_component(dead, Velocity::default()), Err(Error::DeadEntity(dead)));
    assert_eq!(world.destroy_entity(dead), Err(Error::DeadEntity(dead)));
    assert!(world.storage::<Velocity>()?.is_empty());

    let outside = Entity::new(4);
    assert_eq!(
        world.destroy_entity(outside),
        Err(Error::InvalidEntity { entity: outside, capacity: 4 })
    );
    assert_eq!(world.entity_count(), 1);
    Ok(())
}

#[test]
fn test_late_registration_tracks_existing_entities() -> Result<()> {
    let mut world = test_util::world(8);
    world.register_component::<CompN<0>>()?;

    let bare = world.create_entity()?;
    let tagged = world.create_entity()?;
    world.add_component(tagged, CompN::<0>(7))?;

    let recorder = world.register_system::<Recorder>()?;
    assert_eq!(recorder.entities(), vec![bare, tagged]);

    world.set_system_signature_of::<Recorder, (CompN<0>,)>()?;
    assert_eq!(recorder.entities(), vec![tagged]);

    world.set_system_signature::<Recorder>(world.empty_signature())?;
    assert_eq!(recorder.entities(), vec![bare, tagged]);

    let created = world.create_entity()?;
    assert!(recorder.contains(created));
    Ok(())
}

#[test]
fn test_system_may_destroy_during_update() -> Result<()> {
    let mut world = test_util::world(8);
    let reaper = world.register_system::<Reaper>()?;
    let recorder = world.register_system::<Recorder>()?;
    for _ in 0..4 {
        world.create_entity()?;
    }

    reaper.update(&mut world, 1.0)?;
    assert_eq!(world.entity_count(), 0);
    assert!(reaper.is_empty());
    assert!(recorder.is_empty());
    Ok(())
}

#[test]
fn test_system_lookup() -> Result<()> {
    let mut world = test_util::world(8);
    assert!(matches!(world.system::<Recorder>(), Err(Error::NotRegistered(_))));

    world.register_system::<Recorder>()?;
    assert!(matches!(world.register_system::<Recorder>(), Err(Error::AlreadyRegistered(_))));

    let handle = world.system::<Recorder>()?;
    handle.init(&mut world)?;
    assert!(world.system::<Recorder>()?.lock().initialized);
    Ok(())
}

#[test]
fn test_component_kind_limit() -> Result<()> {
    let mut world = Builder::default().max_entities(4).max_component_kinds(2).build();
    assert_eq!(world.max_entities(), 4);
    assert_eq!(world.max_component_kinds(), 2);

    world.register_component::<CompN<0>>()?;
    world.register_component::<CompN<1>>()?;
    assert_eq!(world.register_component::<CompN<2>>(), Err(Error::TooManyKinds { limit: 2 }));
    assert_eq!(world.component_kind_count(), 2);
    assert_eq!(world.component_kind::<CompN<1>>()?.id(), 1);
    Ok(())
}

#[test]
fn test_components_mut() -> Result<()> {
    let mut world = test_util::world(8);
    world.register_component::<CompN<0>>()?;
    for i in 0..3 {
        let entity = world.create_entity()?;
        world.add_component(entity, CompN::<0>(i))?;
    }

    let (entities, values) = world.components_mut::<CompN<0>>()?;
    for (entity, value) in entities.iter().zip(values) {
        value.0 += entity.index() as i32 * 10;
    }

    assert_eq!(world.get_component::<CompN<0>>(Entity::new(2))?, &CompN(22));
    Ok(())
}

#[test]
fn test_random_churn_keeps_invariants() -> Result<()> {
    let mut world = test_util::world(32);
    world.register_component::<Position>()?;
    world.register_component::<Velocity>()?;
    world.register_component::<CompN<0>>()?;

    let movement = world.register_system::<Integrate>()?;
    world.set_system_signature_of::<Integrate, (Position, Velocity)>()?;
    let tagged = world.register_system::<Recorder>()?;
    world.set_system_signature_of::<Recorder, (CompN<0>,)>()?;
    let everything = world.register_system::<Reaper>()?;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..2000 {
        let live: Vec<Entity> = world.entities().collect();
        let target = if live.is_empty() { None } else { Some(live[rng.gen_range(0..live.len())]) };

        let result = match (rng.gen_range(0..8), target) {
            (0 | 1, _) | (_, None) => world.create_entity().map(|_| ()),
            (2, Some(entity)) => world.destroy_entity(entity),
            (3, Some(entity)) => world.add_component(entity, Position::default()),
            (4, Some(entity)) => world.add_component(entity, Velocity::default()),
            (5, Some(entity)) => world.add_component(entity, CompN::<0>(0)),
            (6, Some(entity)) => world.remove_component::<Velocity>(entity).map(|_| ()),
            (_, Some(entity)) => world.remove_component::<CompN<0>>(entity).map(|_| ()),
        };
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    Error::CapacityExceeded { .. }
                        | Error::DuplicateComponent { .. }
                        | Error::MissingComponent { .. }
                ),
                "unexpected {err}"
            );
        }

        assert_consistent(&world, &[
            snapshot("movement", &world, &movement),
            snapshot("tagged", &world, &tagged),
            snapshot("everything", &world, &everything),
        ]);
    }

    assert!(world.entity_count() <= world.max_entities());
    Ok(())
}

#[derive(Default)]
struct Counter;

impl System for Counter {
    fn update(&mut self, _: &mut World, _: &[Entity], _: f32) -> Result<()> { Ok(()) }
}

struct MotionBundle {
    bodies: usize,
}

impl Bundle for MotionBundle {
    fn register(&self, world: &mut World) -> Result<()> {
        world.register_component::<Position>()?;
        world.register_component::<Velocity>()?;
        world.register_system::<Integrate>()?;
        world.set_system_signature_of::<Integrate, (Position, Velocity)>()
    }

    fn populate(&self, world: &mut World) -> Result<()> {
        for _ in 0..self.bodies {
            let entity = world.create_entity()?;
            world.add_component(entity, Position::default())?;
            world.add_component(entity, Velocity([0.0, -9.8, 0.0]))?;
        }
        Ok(())
    }
}

struct TagBundle;

impl Bundle for TagBundle {
    fn register(&self, world: &mut World) -> Result<()> {
        world.register_component::<CompN<0>>()?;
        world.register_system::<Counter>()?;
        world.set_system_signature_of::<Counter, (CompN<0>,)>()
    }

    fn populate(&self, world: &mut World) -> Result<()> {
        // relies on MotionBundle being registered already
        let entity = world.create_entity()?;
        world.add_component(entity, Position::default())?;
        world.add_component(entity, CompN::<0>(1))
    }
}

#[test]
fn test_build_with_bundles() -> Result<()> {
    test_util::init();

    let world = Builder::default()
        .max_entities(16)
        .build_with([&TagBundle as &dyn Bundle, &MotionBundle { bodies: 2 }])?;

    assert_eq!(world.entity_count(), 3);
    assert_eq!(world.system::<Integrate>()?.len(), 2);
    assert_eq!(world.system::<Counter>()?.len(), 1);
    assert_eq!(world.component_kind::<CompN<0>>()?.id(), 0);
    Ok(())
}

#[test]
fn test_events() {
    const SPAWNED: EventId = EventId::named("Test::Spawned");
    const ENTITY: ParamId = ParamId::named("Test::Spawned::Entity");

    let mut world = test_util::world(4);
    let seen = Arc::new(AtomicUsize::new(0));
    {
        let seen = Arc::clone(&seen);
        world.add_event_listener(SPAWNED, move |event| {
            let entity = *event.param::<Entity>(ENTITY).expect("spawn events carry the entity");
            seen.fetch_add(entity.index() as usize + 1, Ordering::SeqCst);
        });
    }

    let entity = world.create_entity().unwrap();
    world.send_event(&Event::new(SPAWNED).with_param(ENTITY, entity));
    world.send_event_id(EventId::named("Test::Unheard"));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_default_capacities() {
    let world = World::new();
    assert_eq!(world.max_entities(), super::DEFAULT_MAX_ENTITIES as usize);
    assert_eq!(world.max_component_kinds(), super::DEFAULT_MAX_COMPONENT_KINDS);
    assert!(world.signature_of::<(Position,)>().is_err());
}
