//! Browser bindings.
//!
//! The JS host owns the scene, camera animation and input devices; it
//! drives a [`WebSimulation`] once per animation frame and reads vectors
//! back as `[x, y, z]` arrays.
//!
//! ```js
//! import init, { WebSimulation } from "./pkg/kula_engine.js";
//!
//! await init();
//! const sim = new WebSimulation(null);
//! sim.add_surface(-5, -1, -5, 5, 0, 5, 0, 1, 0);
//! sim.step(dt, forward, right, jump, cam[0], cam[1], cam[2]);
//! const change = sim.take_gravity_change(); // [gx, gy, gz] or undefined
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec3;
use wasm_bindgen::prelude::*;

use crate::config::SimulationConfig;
use crate::gravity::GravityChanged;
use crate::input::MovementIntent;
use crate::physics::Aabb;
use crate::simulation::Simulation;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
}

fn to_array(v: Vec3) -> Vec<f32> {
    v.to_array().to_vec()
}

/// Simulation handle exported to JavaScript.
#[wasm_bindgen]
pub struct WebSimulation {
    sim: Simulation,
    /// Completed transitions not yet collected by the host
    changes: Rc<RefCell<VecDeque<GravityChanged>>>,
}

#[wasm_bindgen]
impl WebSimulation {
    /// Create a simulation from optional JSON config (defaults otherwise).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebSimulation, JsValue> {
        let config = match config_json {
            Some(json) => SimulationConfig::from_json_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => SimulationConfig::default(),
        };

        let mut sim = Simulation::try_new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let changes = Rc::new(RefCell::new(VecDeque::new()));
        let sink = Rc::clone(&changes);
        sim.subscribe(move |event: &GravityChanged| sink.borrow_mut().push_back(*event));

        Ok(WebSimulation { sim, changes })
    }

    /// Add a box collider (min/max corners) with its walkable normal.
    ///
    /// Returns the surface id, or an error string if the normal is rejected.
    #[allow(clippy::too_many_arguments)]
    pub fn add_surface(
        &mut self,
        min_x: f32,
        min_y: f32,
        min_z: f32,
        max_x: f32,
        max_y: f32,
        max_z: f32,
        nx: f32,
        ny: f32,
        nz: f32,
    ) -> Result<u32, JsValue> {
        let collider = Aabb::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z));
        self.sim
            .add_surface(collider, Vec3::new(nx, ny, nz))
            .map(|id| id.index())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn clear_level(&mut self) {
        self.sim.clear_level();
    }

    /// Advance one frame.
    #[allow(clippy::too_many_arguments)]
    pub fn step(
        &mut self,
        dt: f32,
        forward: f32,
        right: f32,
        jump: bool,
        camera_x: f32,
        camera_y: f32,
        camera_z: f32,
    ) {
        let intent = MovementIntent::new(forward, right, jump);
        self.sim.step(dt, intent, Vec3::new(camera_x, camera_y, camera_z));
    }

    /// Scripted reorientation; returns false if the request was rejected.
    pub fn reorient_to(&mut self, nx: f32, ny: f32, nz: f32) -> bool {
        self.sim.reorient_to(Vec3::new(nx, ny, nz)).is_ok()
    }

    /// Oldest uncollected gravity change as `[gx, gy, gz]`.
    pub fn take_gravity_change(&mut self) -> Option<Vec<f32>> {
        self.changes.borrow_mut().pop_front().map(|change| to_array(change.gravity))
    }

    pub fn gravity(&self) -> Vec<f32> {
        to_array(self.sim.gravity().current_vector())
    }

    pub fn up(&self) -> Vec<f32> {
        to_array(self.sim.movement().get_up_vector())
    }

    pub fn forward(&self) -> Vec<f32> {
        to_array(self.sim.movement().get_forward_vector())
    }

    pub fn position(&self) -> Vec<f32> {
        to_array(self.sim.avatar_body().map(|b| b.position).unwrap_or(Vec3::ZERO))
    }

    pub fn velocity(&self) -> Vec<f32> {
        to_array(self.sim.avatar_body().map(|b| b.velocity).unwrap_or(Vec3::ZERO))
    }

    pub fn is_grounded(&self) -> bool {
        self.sim.movement().is_grounded()
    }

    pub fn is_transitioning(&self) -> bool {
        self.sim.gravity().is_transitioning()
    }

    pub fn transition_progress(&self) -> f32 {
        self.sim.gravity().transition_progress().unwrap_or(0.0)
    }
}
