//! A headless falling-bodies simulation.
//!
//! Runs a fixed number of frames at a fixed time step,
//! then sends the quit event to itself.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nexus_ecs::event::{Event, EventId};
use nexus_ecs::world;

mod math;
mod physics;
mod player;
mod render;

const QUIT: EventId = EventId::named("Window::Quit");

const FRAMES: u64 = 600;
const DT: f32 = 1.0 / 60.0;

fn main() -> nexus_ecs::Result<()> {
    env_logger::init();

    // the player bundle picks its entities among those spawned by the physics bundle
    let mut world = world::Builder::default().build_with([
        &physics::Bundle { bodies: world::DEFAULT_MAX_ENTITIES as usize - 1 } as &dyn nexus_ecs::Bundle,
        &render::Bundle,
        &player::Bundle { players: 4 },
    ])?;

    let quit = Arc::new(AtomicBool::new(false));
    {
        let quit = Arc::clone(&quit);
        world.add_event_listener(QUIT, move |_| quit.store(true, Ordering::Relaxed));
    }

    let player_control = world.system::<player::PlayerControlSystem>()?;
    let physics = world.system::<physics::PhysicsSystem>()?;
    let render = world.system::<render::RenderSystem>()?;
    player_control.init(&mut world)?;
    physics.init(&mut world)?;
    render.init(&mut world)?;

    let mut frame = 0;
    while !quit.load(Ordering::Relaxed) {
        // scripted input in place of a window
        let buttons = if frame % 120 < 60 { player::button::UP } else { player::button::FORWARD };
        world.send_event(&Event::new(player::INPUT).with_param(player::BUTTONS, buttons));

        player_control.update(&mut world, DT)?;
        physics.update(&mut world, DT)?;
        render.update(&mut world, DT)?;

        frame += 1;
        if frame == FRAMES {
            world.send_event_id(QUIT);
        }
    }

    log::info!(
        "simulated {} frames of {} bodies, {} controlled by the player",
        render.lock().frames,
        physics.len(),
        player_control.len()
    );
    Ok(())
}
