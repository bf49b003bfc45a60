//! Process-wide camera bookkeeping, created once at startup and torn down
//! explicitly instead of living behind a lazily initialised global.

use bevy::prelude::Resource;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraId(pub u32);

#[derive(Resource, Debug)]
pub struct CameraStack {
    main: Option<CameraId>,
    stack: Vec<CameraId>,
    audio_enabled: bool,
    next_id: u32,
}

impl CameraStack {
    /// Starts with the scene's main camera on the stack, if one exists.
    pub fn new(main: Option<CameraId>) -> Self {
        if main.is_none() {
            warn!(target: "car_combat.camera", "no main camera registered");
        }
        let next_id = main.map(|id| id.0 + 1).unwrap_or(0);
        Self {
            main,
            stack: main.into_iter().collect(),
            audio_enabled: true,
            next_id,
        }
    }

    pub fn main(&self) -> Option<CameraId> {
        self.main
    }

    pub fn active(&self) -> Option<CameraId> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Player input and the chase camera only react while the main camera is
    /// the one being rendered.
    pub fn is_main_camera_active(&self) -> bool {
        matches!((self.main, self.active()), (Some(main), Some(active)) if main == active)
    }

    /// Pushes a fresh camera that takes over rendering and the audio
    /// listener. The previous top is disabled until popped back.
    pub fn push(&mut self) -> CameraId {
        let id = CameraId(self.next_id);
        self.next_id += 1;
        self.stack.push(id);
        debug!(target: "car_combat.camera", id = id.0, depth = self.stack.len(), "camera pushed");
        id
    }

    /// Removes the top camera and re-enables the one beneath it.
    pub fn pop(&mut self) -> Option<CameraId> {
        let popped = self.stack.pop();
        if let Some(id) = popped {
            debug!(
                target: "car_combat.camera",
                id = id.0,
                depth = self.stack.len(),
                "camera popped"
            );
        }
        popped
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    /// Only the active camera carries a live listener.
    pub fn listener_enabled(&self, camera: CameraId) -> bool {
        self.audio_enabled && self.active() == Some(camera)
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    pub fn teardown(&mut self) {
        self.stack.clear();
        self.main = None;
    }
}

impl Default for CameraStack {
    fn default() -> Self {
        Self::new(Some(CameraId(0)))
    }
}
