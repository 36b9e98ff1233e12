//! Integrates velocity and gravity for every rigid body.

use nexus_ecs::{Entity, Result, System, World};
use rand::Rng;

use crate::math::Vec3;
use crate::render::Renderable;

#[derive(Debug, Clone, Copy)]
pub struct Gravity {
    pub force: Vec3,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RigidBody {
    pub velocity:     Vec3,
    pub acceleration: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale:    Vec3,
}

#[derive(Default)]
pub struct PhysicsSystem;

impl System for PhysicsSystem {
    fn update(&mut self, world: &mut World, entities: &[Entity], dt: f32) -> Result<()> {
        for &entity in entities {
            let gravity = world.get_component::<Gravity>(entity)?.force;
            let velocity = world.get_component::<RigidBody>(entity)?.velocity;

            world.get_component_mut::<Transform>(entity)?.position += velocity * dt;

            let body = world.get_component_mut::<RigidBody>(entity)?;
            body.velocity += (gravity + body.acceleration) * dt;
        }
        Ok(())
    }
}

/// Registers the physics components and spawns `bodies` falling entities.
pub struct Bundle {
    pub bodies: usize,
}

impl nexus_ecs::Bundle for Bundle {
    fn register(&self, world: &mut World) -> Result<()> {
        world.register_component::<Gravity>()?;
        world.register_component::<RigidBody>()?;
        world.register_component::<Transform>()?;

        world.register_system::<PhysicsSystem>()?;
        world.set_system_signature_of::<PhysicsSystem, (Gravity, RigidBody, Transform)>()
    }

    fn populate(&self, world: &mut World) -> Result<()> {
        let mut rng = rand::thread_rng();
        let scale = rng.gen_range(3.0..5.0);

        for _ in 0..self.bodies {
            let entity = world.create_entity()?;
            world.add_component(entity, Gravity { force: Vec3::new(0.0, rng.gen_range(-10.0..-1.0), 0.0) })?;
            world.add_component(entity, RigidBody::default())?;
            world.add_component(entity, Transform {
                position: Vec3::new(
                    rng.gen_range(-100.0..100.0),
                    rng.gen_range(-100.0..100.0),
                    rng.gen_range(-100.0..100.0),
                ),
                rotation: Vec3::new(
                    rng.gen_range(0.0..3.0),
                    rng.gen_range(0.0..3.0),
                    rng.gen_range(0.0..3.0),
                ),
                scale:    Vec3::splat(scale),
            })?;
            world.add_component(entity, Renderable {
                color: Vec3::new(rng.gen(), rng.gen(), rng.gen()),
            })?;
        }

        log::info!("spawned {} bodies", self.bodies);
        Ok(())
    }
}
