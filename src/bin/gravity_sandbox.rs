//! Gravity Sandbox
//!
//! Run with: `cargo run --bin gravity_sandbox [config.json]`
//!
//! Headless walk through a closed 10 m room. The avatar walks into the east
//! wall, climbs it and crosses onto the ceiling. It then stops and holds jump,
//! which fires once the avatar is settled on whatever surface it reached.
//! Every gravity change and a once-per-second status line are logged.
//!
//! Logging follows `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=kula_engine=debug cargo run --bin gravity_sandbox`.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use glam::Vec3;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use kula_engine::{Aabb, GravityChanged, MovementIntent, Simulation, SimulationConfig};

// ============================================================================
// ROOM
// ============================================================================

/// Half-width of the room interior (meters)
const HALF_WIDTH: f32 = 5.0;
/// Interior height (meters)
const HEIGHT: f32 = 10.0;
/// Wall thickness (meters)
const THICKNESS: f32 = 1.0;

const FRAME_DT: f32 = 1.0 / 60.0;
/// Length of the scripted run (seconds)
const RUN_SECONDS: f32 = 12.0;
/// Walking stops and jump is held from here on (seconds)
const JUMP_AT: f32 = 8.0;

/// Six boxes enclosing the interior, each with its walkable normal.
fn room() -> Vec<(Aabb, Vec3)> {
    let w = HALF_WIDTH;
    let o = HALF_WIDTH + THICKNESS;
    let h = HEIGHT;
    let t = THICKNESS;
    vec![
        // Floor and ceiling
        (Aabb::new(Vec3::new(-o, -t, -o), Vec3::new(o, 0.0, o)), Vec3::Y),
        (Aabb::new(Vec3::new(-o, h, -o), Vec3::new(o, h + t, o)), Vec3::NEG_Y),
        // East and west
        (Aabb::new(Vec3::new(w, 0.0, -w), Vec3::new(o, h, w)), Vec3::NEG_X),
        (Aabb::new(Vec3::new(-o, 0.0, -w), Vec3::new(-w, h, w)), Vec3::X),
        // North and south
        (Aabb::new(Vec3::new(-w, 0.0, -o), Vec3::new(w, h, -w)), Vec3::Z),
        (Aabb::new(Vec3::new(-w, 0.0, w), Vec3::new(w, h, o)), Vec3::NEG_Z),
    ]
}

// ============================================================================
// SCRIPT
// ============================================================================

/// Intent for frame `frame`: walk, then stop and hold jump.
///
/// Jump stays held to the end so it still fires when the walk ends in the
/// middle of a transition. The jump latch keeps it to a single impulse.
fn scripted_intent(frame: u32) -> MovementIntent {
    let seconds = frame as f32 * FRAME_DT;
    if seconds < JUMP_AT {
        MovementIntent::forward()
    } else {
        MovementIntent::idle().with_jump(true)
    }
}

/// What a finished run did.
#[derive(Debug, Clone, Copy)]
struct Summary {
    gravity_changes: u32,
    jumps: u32,
}

fn run(config: SimulationConfig) -> Result<Summary, Box<dyn std::error::Error>> {
    let mut sim = Simulation::try_new(config)?;
    for (collider, normal) in room() {
        sim.add_surface(collider, normal)?;
    }

    let changes = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&changes);
    sim.subscribe(move |event: &GravityChanged| {
        counter.set(counter.get() + 1);
        info!(gravity = ?event.gravity, up = ?event.up, surface = ?event.surface, "camera: reorient");
    });

    info!(
        surfaces = sim.gravity().surface_count(),
        transition_s = sim.config().gravity.transition_duration(),
        "sandbox ready"
    );

    // The camera looks toward the east wall and then follows the avatar's forward
    let mut camera = Vec3::X;
    let frames = (RUN_SECONDS / FRAME_DT) as u32;
    for frame in 0..frames {
        let report = sim.step(FRAME_DT, scripted_intent(frame), camera);
        camera = sim.movement().get_forward_vector();

        if report.movement.jumped {
            info!(up = ?sim.movement().get_up_vector(), "jumped");
        }
        if frame % 60 == 0 {
            if let Some(body) = sim.avatar_body() {
                info!(
                    t = frame as f32 * FRAME_DT,
                    position = ?body.position,
                    gravity = ?report.gravity,
                    grounded = report.movement.grounded,
                    transitioning = report.transitioning,
                    "status"
                );
            }
        }
    }

    Ok(Summary {
        gravity_changes: changes.get(),
        jumps: sim.movement().get_jumps_fired(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            SimulationConfig::load(&path)?
        }
        None => SimulationConfig::default(),
    };

    let summary = run(config)?;
    info!(
        gravity_changes = summary.gravity_changes,
        jumps = summary.jumps,
        "sandbox finished"
    );
    Ok(())
}
