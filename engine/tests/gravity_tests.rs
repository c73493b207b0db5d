//! Gravity Tests - Transitions, Edge Detection and Notifications
//!
//! Exercises the gravity controller against a closed cube room so every one
//! of the six cardinal orientations goes through the same code path.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use kula_engine::config::GravityConfig;
use kula_engine::error::GravityError;
use kula_engine::gravity::{GravityChanged, GravityController, SurfaceId};
use kula_engine::physics::{Aabb, BodyHandle, PhysicsWorld, RigidBody, SimpleWorld};

const G: f32 = 9.82;
const DT: f32 = 1.0 / 60.0;
/// Interior half-size of the test room
const ROOM: f32 = 5.0;

const AXES: [Vec3; 6] = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];

/// Slab on the side of the room a surface with inward `normal` belongs to.
fn slab(normal: Vec3) -> Aabb {
    let half = Vec3::splat(ROOM + 1.0) - normal.abs() * (ROOM + 0.5);
    Aabb::from_center_half_extents(-normal * (ROOM + 0.5), half)
}

fn cube_room(direction: Vec3) -> (GravityController, Vec<(Vec3, SurfaceId)>) {
    let mut controller = GravityController::with_direction(GravityConfig::default(), direction);
    let ids = AXES
        .iter()
        .map(|&n| (n, controller.register_surface(slab(n), n).unwrap()))
        .collect();
    (controller, ids)
}

fn run_to_completion(
    controller: &mut GravityController,
    world: &mut SimpleWorld,
    avatar: BodyHandle,
) -> Option<GravityChanged> {
    for _ in 0..200 {
        let event = controller.tick(DT, world, avatar);
        assert!((controller.current_vector().length() - G).abs() < 1e-3);
        if event.is_some() {
            return event;
        }
    }
    None
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_every_orthogonal_reorientation_lands_on_minus_normal() {
    let mut world = SimpleWorld::default();
    let avatar = world.add_body(RigidBody::sphere(Vec3::ZERO, 0.5, 1.0));

    for down in AXES {
        for normal in AXES {
            if normal.dot(down).abs() > 0.5 {
                continue;
            }
            let mut controller = GravityController::with_direction(GravityConfig::default(), down);
            controller.reorient_to(normal).unwrap();

            let event = run_to_completion(&mut controller, &mut world, avatar).unwrap();
            assert!((controller.current_vector() - (-normal * G)).length() < 1e-4);
            assert!((event.up - normal).length() < 1e-5);
            assert_eq!(world.gravity(), controller.current_vector());
        }
    }
}

#[test]
fn test_transition_takes_magnitude_over_rate() {
    let config = GravityConfig::default();
    let expected = config.transition_duration();
    assert!((expected - 0.5).abs() < 1e-6);

    let mut controller = GravityController::new(config);
    let mut world = SimpleWorld::default();
    let avatar = world.add_body(RigidBody::sphere(Vec3::ZERO, 0.5, 1.0));
    controller.reorient_to(Vec3::Z).unwrap();

    let mut ticks = 0;
    while controller.is_transitioning() {
        controller.tick(DT, &mut world, avatar);
        ticks += 1;
        assert!(ticks < 100);
    }
    let elapsed = ticks as f32 * DT;
    assert!((elapsed - expected).abs() <= DT + 1e-5, "took {elapsed}s");
}

#[test]
fn test_progress_reported_while_in_flight() {
    let mut controller = GravityController::new(GravityConfig::default());
    let mut world = SimpleWorld::default();
    let avatar = world.add_body(RigidBody::sphere(Vec3::ZERO, 0.5, 1.0));

    assert_eq!(controller.transition_progress(), None);
    controller.reorient_to(Vec3::X).unwrap();
    assert_eq!(controller.transition_progress(), Some(0.0));

    let mut previous = 0.0;
    for _ in 0..10 {
        controller.tick(DT, &mut world, avatar);
        let progress = controller.transition_progress().unwrap();
        assert!(progress > previous);
        previous = progress;
    }
}

#[test]
fn test_reorient_is_ignored_during_transition() {
    let mut controller = GravityController::new(GravityConfig::default());
    let mut world = SimpleWorld::default();
    let avatar = world.add_body(RigidBody::sphere(Vec3::ZERO, 0.5, 1.0));

    controller.reorient_to(Vec3::NEG_X).unwrap();
    controller.tick(DT, &mut world, avatar);
    assert_eq!(controller.reorient_to(Vec3::Z), Err(GravityError::TransitionInProgress));

    run_to_completion(&mut controller, &mut world, avatar).unwrap();
    assert!((controller.current_vector() - Vec3::new(G, 0.0, 0.0)).length() < 1e-4);
}

// ============================================================================
// Edge detection
// ============================================================================

#[test]
fn test_edge_detection_is_the_same_for_all_orientations() {
    for down in AXES {
        let (controller, ids) = cube_room(down);

        for &(normal, id) in &ids {
            if normal.dot(down).abs() > 0.5 {
                continue;
            }
            // Resting on the floor, 0.8 m in front of the wall, walking into it
            let position = down * (ROOM - 0.5) - normal * (ROOM - 0.8);
            let velocity = -normal * 2.0;

            let candidate = controller
                .find_trigger(position, velocity)
                .unwrap_or_else(|| panic!("no trigger for down {down:?}, wall {normal:?}"));
            assert_eq!(candidate.surface, id);
            assert!((candidate.inward_speed - 2.0).abs() < 1e-4);
            assert!(candidate.edge_distance < 1.0);

            // Backing away from the same wall never triggers
            assert!(controller.find_trigger(position, -velocity).is_none());
        }
    }
}

#[test]
fn test_detected_transition_targets_wall() {
    let (mut controller, ids) = cube_room(Vec3::NEG_Y);
    let (_, south) = ids[5];
    let mut world = SimpleWorld::default();
    let avatar = world.add_body(RigidBody::sphere(Vec3::new(0.0, -4.5, 4.3), 0.5, 1.0));
    world.set_velocity(avatar, Vec3::new(0.0, 0.0, 3.0));

    controller.tick(DT, &mut world, avatar);
    assert!(controller.is_transitioning());
    let target = controller.state().target_vector().unwrap();
    assert!((target - Vec3::new(0.0, 0.0, G)).length() < 1e-4);

    let event = run_to_completion(&mut controller, &mut world, avatar).unwrap();
    assert_eq!(event.surface, Some(south));
    assert!((event.gravity - Vec3::new(0.0, 0.0, G)).length() < 1e-4);
}

#[test]
fn test_no_trigger_in_open_space() {
    let (controller, _) = cube_room(Vec3::NEG_Y);
    assert!(controller.find_trigger(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)).is_none());
}

#[test]
fn test_rejected_surfaces_are_discarded() {
    let mut controller = GravityController::new(GravityConfig::default());
    let bad = [Vec3::ZERO, Vec3::new(f32::NAN, 1.0, 0.0), Vec3::splat(f32::INFINITY)];
    for normal in bad {
        assert!(matches!(
            controller.register_surface(slab(Vec3::Y), normal),
            Err(GravityError::DegenerateNormal { .. })
        ));
    }
    assert_eq!(controller.surface_count(), 0);

    // Unnormalized but valid normals are stored normalized
    let id = controller.register_surface(slab(Vec3::Y), Vec3::new(0.0, 3.0, 0.0)).unwrap();
    assert_eq!(controller.surface(id).unwrap().normal(), Vec3::Y);
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn test_observers_hear_each_completed_transition_once() {
    let mut controller = GravityController::new(GravityConfig::default());
    let mut world = SimpleWorld::default();
    let avatar = world.add_body(RigidBody::sphere(Vec3::ZERO, 0.5, 1.0));

    let first = Rc::new(RefCell::new(Vec::new()));
    let second = Rc::new(RefCell::new(Vec::new()));
    let (a, b) = (Rc::clone(&first), Rc::clone(&second));
    controller.subscribe(move |e: &GravityChanged| a.borrow_mut().push(e.gravity));
    let id = controller.subscribe(move |e: &GravityChanged| b.borrow_mut().push(e.gravity));

    controller.reorient_to(Vec3::NEG_X).unwrap();
    run_to_completion(&mut controller, &mut world, avatar).unwrap();

    assert!(controller.unsubscribe(id));
    controller.reorient_to(Vec3::NEG_Y).unwrap();
    run_to_completion(&mut controller, &mut world, avatar).unwrap();

    assert_eq!(first.borrow().len(), 2);
    assert_eq!(second.borrow().len(), 1);
    assert!((first.borrow()[1] - Vec3::new(0.0, G, 0.0)).length() < 1e-4);
}

#[test]
fn test_feed_tracks_every_tick_of_a_transition() {
    let mut controller = GravityController::new(GravityConfig::default());
    let mut world = SimpleWorld::default();
    let avatar = world.add_body(RigidBody::sphere(Vec3::ZERO, 0.5, 1.0));
    let feed = controller.feed();

    controller.reorient_to(Vec3::Z).unwrap();
    let mut revision = feed.sample().revision;
    while controller.is_transitioning() {
        controller.tick(DT, &mut world, avatar);
        let sample = feed.sample();
        assert!(sample.revision > revision);
        assert_eq!(sample.vector, controller.current_vector());
        revision = sample.revision;
    }
    assert!(!feed.sample().transitioning);

    // Idle ticks publish nothing new
    controller.tick(DT, &mut world, avatar);
    assert_eq!(feed.sample().revision, revision);
}
