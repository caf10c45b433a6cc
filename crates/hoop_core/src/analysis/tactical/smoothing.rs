//! Exponential smoothing of tactical positions
//!
//! `smoothed = α · previous + (1 − α) · current`, per identity. The result is
//! clamped to the tactical diagram before it becomes the next `previous`.

use crate::config::TacticalConfig;
use crate::models::PositionFrame;

/// Per-video smoothing state.
#[derive(Debug, Clone)]
pub struct PositionSmoother {
    alpha: f32,
    width: f32,
    height: f32,
    previous: PositionFrame,
}

impl PositionSmoother {
    pub fn new(config: &TacticalConfig) -> Self {
        Self {
            alpha: config.smoothing_factor.clamp(0.0, 1.0),
            width: config.court_width,
            height: config.court_height,
            previous: PositionFrame::new(),
        }
    }

    /// Smooth one frame.
    ///
    /// Identities absent from `current` lose their history and re-enter
    /// unsmoothed.
    pub fn update(&mut self, current: &PositionFrame) -> PositionFrame {
        let smoothed: PositionFrame = current
            .iter()
            .map(|(&id, pos)| {
                let blended = match self.previous.get(&id) {
                    Some(prev) => prev.lerp(pos, 1.0 - self.alpha),
                    None => *pos,
                };
                (id, blended.clamp_to(self.width, self.height))
            })
            .collect();

        self.previous = smoothed.clone();
        smoothed
    }
}

/// Smooth a whole sequence with a fresh smoother.
pub fn smooth_positions(frames: &[PositionFrame], config: &TacticalConfig) -> Vec<PositionFrame> {
    let mut smoother = PositionSmoother::new(config);
    frames.iter().map(|f| smoother.update(f)).collect()
}
