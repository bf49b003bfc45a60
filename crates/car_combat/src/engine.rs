use tracing::{debug, warn};

const FIRST_GEAR_TOP_SPEED: f32 = 40.0;
const GEAR_RATIO: f32 = 1.5;
const GEAR_SPEED_CAP: f32 = 200.0;
const MIN_PITCH: f32 = 0.6;
const MAX_PITCH: f32 = 1.2;
const START_CLIP_TAIL: f32 = 0.5;

pub const DEFAULT_START_CLIP_SECONDS: f32 = 1.5;

/// Engine on/off state machine with the delayed start sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    running: bool,
    starting: bool,
    start_timer: f32,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            running: true,
            starting: false,
            start_timer: 0.0,
        }
    }
}

impl EngineState {
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn starting(&self) -> bool {
        self.starting
    }

    /// Stops a running engine or begins cranking a stopped one. Ignored while
    /// the start clip is still playing.
    pub fn toggle(&mut self) {
        if self.starting {
            return;
        }
        if self.running {
            self.running = false;
            debug!(target: "car_combat.engine", "engine stopped");
        } else {
            self.starting = true;
            self.start_timer = 0.0;
            debug!(target: "car_combat.engine", "engine cranking");
        }
    }

    /// Advances the start sequence. Returns true on the tick the engine
    /// catches and the idle loop should begin.
    pub fn tick(&mut self, dt: f32, start_clip_len: f32) -> bool {
        if !self.starting {
            return false;
        }
        self.start_timer += dt;
        if self.start_timer > start_clip_len - START_CLIP_TAIL {
            self.running = true;
            self.starting = false;
            self.start_timer = 0.0;
            debug!(target: "car_combat.engine", "engine running");
            return true;
        }
        false
    }

    pub fn shut_down(&mut self) {
        self.running = false;
        self.starting = false;
        self.start_timer = 0.0;
    }
}

/// Idle loop pitch for the current speed, simulating gear changes.
pub fn engine_pitch(speed: f32) -> f32 {
    let mut gear_top = FIRST_GEAR_TOP_SPEED;
    while speed > gear_top && gear_top < GEAR_SPEED_CAP {
        gear_top *= GEAR_RATIO;
    }
    let t = (speed / gear_top).clamp(0.0, 1.0);
    MIN_PITCH + (MAX_PITCH - MIN_PITCH) * t
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSounds {
    pub start: String,
    pub idle_loop: String,
}

/// Clip names for a size class. Small to medium classes pick a start clip
/// matching the car's visual damage tier.
pub fn engine_sounds(vehicle_size: u8, health_tier: usize) -> Option<EngineSounds> {
    let variant = health_tier + 1;
    let (idle_loop, start) = match vehicle_size {
        1 => ("eishp", format!("esshp{variant}")),
        2 => ("eihp", format!("eshp{variant}")),
        3 => ("einp1", format!("esnp{variant}")),
        4 => ("eisv", "essv".to_string()),
        5 => ("eimarx", "esmarx".to_string()),
        6 => ("eitank", "estank".to_string()),
        other => {
            warn!(target: "car_combat.engine", size = other, "unknown vehicle size");
            return None;
        }
    };
    Some(EngineSounds {
        start: format!("{start}.gpw"),
        idle_loop: format!("{idle_loop}.gpw"),
    })
}
