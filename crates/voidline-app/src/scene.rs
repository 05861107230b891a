//! Headless scene graph: a camera and a table of node positions. Stands in
//! for the renderer when the HUD runs without one.

use std::collections::HashMap;

use tracing::trace;

use voidline_core::target::TargetId;
use voidline_core::types::{CameraPose, Position};
use voidline_targeting::capabilities::SceneGraph;

#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    pub camera: CameraPose,
    pub nodes: HashMap<TargetId, Position>,
    pub reticle_color: Option<String>,
    pub wireframe_rebuilds: u64,
}

impl StaticScene {
    pub fn new(camera: CameraPose) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn place(&mut self, id: impl Into<TargetId>, position: Position) {
        self.nodes.insert(id.into(), position);
    }
}

impl SceneGraph for StaticScene {
    fn camera_pose(&self) -> CameraPose {
        self.camera
    }

    fn target_position(&self, id: &TargetId) -> Option<Position> {
        self.nodes.get(id).copied()
    }

    fn set_reticle_color(&mut self, color: &str) {
        if self.reticle_color.as_deref() != Some(color) {
            trace!(color, "reticle color");
            self.reticle_color = Some(color.to_string());
        }
    }

    fn rebuild_wireframe(&mut self, id: &TargetId) {
        trace!(target = %id, "wireframe rebuild");
        self.wireframe_rebuilds += 1;
    }
}
