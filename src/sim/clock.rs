//! Frame timing: how many physics steps each animation frame runs

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// How frames map onto physics steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepMode {
    /// One step per frame using the nominal interval. Speed follows the refresh rate.
    PerFrame,
    /// Accumulate real elapsed time and step in whole `SIM_DT` increments
    #[default]
    FixedStep,
}

/// Converts requestAnimationFrame timestamps into step counts
#[derive(Debug, Clone)]
pub struct FrameClock {
    mode: StepMode,
    max_substeps: u32,
    accumulator: f32,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new(mode: StepMode, max_substeps: u32) -> Self {
        Self {
            mode,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Forget elapsed time (call when entering Running)
    pub fn restart(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }

    /// Steps to run for a frame at `now_ms`
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);

        match self.mode {
            StepMode::PerFrame => 1,
            StepMode::FixedStep => {
                self.accumulator += dt;
                let mut steps = 0;
                while self.accumulator >= SIM_DT && steps < self.max_substeps {
                    self.accumulator -= SIM_DT;
                    steps += 1;
                }
                if steps == self.max_substeps {
                    // Drop the backlog instead of carrying it into the next frame
                    self.accumulator = self.accumulator.min(SIM_DT);
                }
                steps
            }
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(StepMode::default(), MAX_SUBSTEPS)
    }
}
