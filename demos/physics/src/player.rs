//! Steers player entities from input events.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use nexus_ecs::event::{EventId, ParamId};
use nexus_ecs::{Entity, Result, System, World};

use crate::math::Vec3;
use crate::physics::Transform;

pub const INPUT: EventId = EventId::named("Window::Input");
pub const BUTTONS: ParamId = ParamId::named("Window::Input::Buttons");

/// Bits of the `BUTTONS` parameter.
pub mod button {
    pub const FORWARD: u8 = 1 << 0;
    pub const BACK: u8 = 1 << 1;
    pub const UP: u8 = 1 << 2;
    pub const DOWN: u8 = 1 << 3;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Player;

#[derive(Debug, Clone, Copy)]
pub struct Thrust {
    pub force: Vec3,
}

#[derive(Default)]
pub struct PlayerControlSystem {
    buttons: Arc<AtomicU8>,
}

impl System for PlayerControlSystem {
    fn init(&mut self, world: &mut World) -> Result<()> {
        let buttons = Arc::clone(&self.buttons);
        world.add_event_listener(INPUT, move |event| match event.param::<u8>(BUTTONS) {
            Ok(&value) => buttons.store(value, Ordering::Relaxed),
            Err(err) => log::error!("malformed input event: {err}"),
        });
        Ok(())
    }

    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) -> Result<()> {
        let buttons = self.buttons.load(Ordering::Relaxed);

        let mut direction = Vec3::default();
        if buttons & button::FORWARD != 0 {
            direction.z += 1.0;
        }
        if buttons & button::BACK != 0 {
            direction.z -= 1.0;
        }
        if buttons & button::UP != 0 {
            direction.y += 1.0;
        }
        if buttons & button::DOWN != 0 {
            direction.y -= 1.0;
        }

        for &entity in entities {
            let thrust = world.get_component::<Thrust>(entity)?.force;
            let transform = world.get_component_mut::<Transform>(entity)?;
            transform.position += Vec3::new(
                direction.x * thrust.x,
                direction.y * thrust.y,
                direction.z * thrust.z,
            ) * dt;
        }
        Ok(())
    }
}

/// Makes the first `players` entities with a transform controllable.
pub struct Bundle {
    pub players: usize,
}

impl nexus_ecs::Bundle for Bundle {
    fn register(&self, world: &mut World) -> Result<()> {
        world.register_component::<Player>()?;
        world.register_component::<Thrust>()?;
        world.register_system::<PlayerControlSystem>()?;
        world.set_system_signature_of::<PlayerControlSystem, (Player, Thrust, Transform)>()
    }

    fn populate(&self, world: &mut World) -> Result<()> {
        let candidates: Vec<Entity> = world.storage::<Transform>()?.entities().to_vec();
        for &entity in candidates.iter().take(self.players) {
            world.add_component(entity, Player)?;
            world.add_component(entity, Thrust { force: Vec3::splat(20.0) })?;
        }
        Ok(())
    }
}
