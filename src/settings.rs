//! Physics tuning
//!
//! Every field defaults to the matching literal in [`crate::consts`]. A JSON
//! override only needs the keys it changes; the rest keep their defaults.
//! On the web an override can be stored in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Runtime-tunable physics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Integration ===
    pub gravity: f32,
    pub air_drag: f32,
    pub angular_drag: f32,
    pub max_speed: f32,
    pub max_dt: f32,

    // === Walls ===
    pub wall_restitution: f32,
    pub floor_friction: f32,
    pub side_wall_spin_div: f32,
    pub side_wall_spin_gain: f32,
    pub floor_spin_div: f32,
    pub floor_spin_gain: f32,

    // === Token-token contact ===
    pub body_restitution: f32,
    pub body_friction: f32,
    pub collision_slop: f32,
    pub collision_iterations: u32,
    pub proxy_radius_frac: f32,

    // === Grab ===
    pub spring_k: f32,
    pub grab_torque_scale: f32,
    pub grab_radius_frac: f32,

    // === Spawning ===
    pub max_live: usize,
    pub size_viewport_frac: f32,
    pub base_size_min: f32,
    pub base_size_max: f32,
    pub size_scale_min: f32,
    pub size_scale_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    pub spawn_floor_gap: f32,
    pub launch_vx: f32,
    pub launch_vy: f32,
    pub launch_tilt: f32,
    pub launch_spin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            air_drag: AIR_DRAG,
            angular_drag: ANGULAR_DRAG,
            max_speed: MAX_SPEED,
            max_dt: MAX_DT,

            wall_restitution: WALL_RESTITUTION,
            floor_friction: FLOOR_FRICTION,
            side_wall_spin_div: SIDE_WALL_SPIN_DIV,
            side_wall_spin_gain: SIDE_WALL_SPIN_GAIN,
            floor_spin_div: FLOOR_SPIN_DIV,
            floor_spin_gain: FLOOR_SPIN_GAIN,

            body_restitution: BODY_RESTITUTION,
            body_friction: BODY_FRICTION,
            collision_slop: COLLISION_SLOP,
            collision_iterations: COLLISION_ITERATIONS,
            proxy_radius_frac: PROXY_RADIUS_FRAC,

            spring_k: SPRING_K,
            grab_torque_scale: GRAB_TORQUE_SCALE,
            grab_radius_frac: GRAB_RADIUS_FRAC,

            max_live: MAX_LIVE,
            size_viewport_frac: SIZE_VIEWPORT_FRAC,
            base_size_min: BASE_SIZE_MIN,
            base_size_max: BASE_SIZE_MAX,
            size_scale_min: SIZE_SCALE_MIN,
            size_scale_max: SIZE_SCALE_MAX,
            size_min: SIZE_MIN,
            size_max: SIZE_MAX,
            spawn_floor_gap: SPAWN_FLOOR_GAP,
            launch_vx: LAUNCH_VX,
            launch_vy: LAUNCH_VY,
            launch_tilt: LAUNCH_TILT,
            launch_spin: LAUNCH_SPIN,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the integrator or the spawn envelope
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("gravity", self.gravity),
            ("air_drag", self.air_drag),
            ("angular_drag", self.angular_drag),
            ("max_speed", self.max_speed),
            ("max_dt", self.max_dt),
            ("wall_restitution", self.wall_restitution),
            ("floor_friction", self.floor_friction),
            ("side_wall_spin_div", self.side_wall_spin_div),
            ("side_wall_spin_gain", self.side_wall_spin_gain),
            ("floor_spin_div", self.floor_spin_div),
            ("floor_spin_gain", self.floor_spin_gain),
            ("body_restitution", self.body_restitution),
            ("body_friction", self.body_friction),
            ("collision_slop", self.collision_slop),
            ("proxy_radius_frac", self.proxy_radius_frac),
            ("spring_k", self.spring_k),
            ("grab_torque_scale", self.grab_torque_scale),
            ("grab_radius_frac", self.grab_radius_frac),
            ("size_viewport_frac", self.size_viewport_frac),
            ("base_size_min", self.base_size_min),
            ("base_size_max", self.base_size_max),
            ("size_scale_min", self.size_scale_min),
            ("size_scale_max", self.size_scale_max),
            ("size_min", self.size_min),
            ("size_max", self.size_max),
            ("spawn_floor_gap", self.spawn_floor_gap),
            ("launch_vx", self.launch_vx),
            ("launch_vy", self.launch_vy),
            ("launch_tilt", self.launch_tilt),
            ("launch_spin", self.launch_spin),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });
        if self.max_dt <= 0.0 {
            return invalid("max_dt", "must be positive");
        }
        if self.max_speed <= 0.0 {
            return invalid("max_speed", "must be positive");
        }
        if self.side_wall_spin_div == 0.0 {
            return invalid("side_wall_spin_div", "must be non-zero");
        }
        if self.floor_spin_div == 0.0 {
            return invalid("floor_spin_div", "must be non-zero");
        }
        if self.max_live == 0 {
            return invalid("max_live", "must keep at least one token");
        }
        if self.collision_iterations == 0 {
            return invalid("collision_iterations", "must be at least 1");
        }
        if self.base_size_min > self.base_size_max {
            return invalid("base_size_min", "exceeds base_size_max");
        }
        if self.size_scale_min > self.size_scale_max {
            return invalid("size_scale_min", "exceeds size_scale_max");
        }
        if self.size_min <= 0.0 || self.size_min > self.size_max {
            return invalid("size_min", "must be positive and not exceed size_max");
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "heart_toss_tuning";

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub (the runner takes a file path instead)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
