//! A headless stand-in for a renderer.
//!
//! Instead of drawing, it reports the vertical extent and mean color of everything visible.

use nexus_ecs::{Entity, Result, System, World};

use crate::math::Vec3;
use crate::physics::Transform;

#[derive(Debug, Clone, Copy)]
pub struct Renderable {
    pub color: Vec3,
}

#[derive(Default)]
pub struct RenderSystem {
    pub frames: u64,
}

impl System for RenderSystem {
    fn update(&mut self, world: &mut World, entities: &[Entity], _dt: f32) -> Result<()> {
        self.frames += 1;

        let mut lowest = f32::INFINITY;
        let mut highest = f32::NEG_INFINITY;
        let mut tint = Vec3::default();
        for &entity in entities {
            let transform = world.get_component::<Transform>(entity)?;
            lowest = lowest.min(transform.position.y - transform.scale.y / 2.0);
            highest = highest.max(transform.position.y + transform.scale.y / 2.0);
            tint += world.get_component::<Renderable>(entity)?.color;
        }
        if !entities.is_empty() {
            tint = tint * (1.0 / entities.len() as f32);
        }
        log::trace!(
            "frame {}: {} visible, y in [{lowest}, {highest}], mean color {tint:?}",
            self.frames,
            entities.len()
        );
        Ok(())
    }
}

pub struct Bundle;

impl nexus_ecs::Bundle for Bundle {
    fn register(&self, world: &mut World) -> Result<()> {
        world.register_component::<Renderable>()?;
        world.register_system::<RenderSystem>()?;
        world.set_system_signature_of::<RenderSystem, (Renderable, Transform)>()
    }
}
