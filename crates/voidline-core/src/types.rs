//! Fundamental geometric and timing types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in scene space. One scene unit is one kilometer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Camera pose supplied by the scene graph each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Position,
    /// Unit forward vector. Not used for range, carried for reticle placement.
    pub forward: Position,
}

/// Frame time tracking. Delays in the HUD are expressed in ticks so tests
/// can drive time by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each frame).
    pub tick: u64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Range to another position in scene units (kilometers).
    pub fn range_to(&self, other: &Position) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// True when every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.to_dvec3().is_finite()
    }
}

impl From<DVec3> for Position {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl CameraPose {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            forward: Position::new(0.0, 0.0, -1.0),
        }
    }

    /// Distance from the camera to a point, in kilometers.
    pub fn distance_to(&self, point: &Position) -> f64 {
        self.position.range_to(point)
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    /// Elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.tick as f64 * self.dt()
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
    }

    /// Tick that lies `ticks` frames in the future.
    pub fn after(&self, ticks: u64) -> u64 {
        self.tick.saturating_add(ticks)
    }
}

/// Convert a duration in milliseconds to whole ticks, rounding up so that a
/// non-zero delay never collapses to zero frames.
pub fn millis_to_ticks(millis: u64) -> u64 {
    let rate = crate::constants::TICK_RATE as u64;
    (millis * rate).div_ceil(1000)
}
