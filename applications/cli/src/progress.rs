/// Pipeline progress surfaced through tracing
use quietcut_core::ProcessHooks;
use tracing::info;

/// Percent step between progress events
pub const PROGRESS_STEP_PERCENT: u32 = 10;

/// Logs one event each time progress crosses a [`PROGRESS_STEP_PERCENT`] boundary
#[derive(Debug, Default)]
pub struct ProgressLogger {
    /// Last boundary logged, in percent
    logged: u32,
}

impl ProgressLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_percent(&self) -> u32 {
        self.logged
    }
}

impl ProcessHooks for ProgressLogger {
    fn progress(&mut self, fraction: f32) {
        let percent = (fraction.clamp(0.0, 1.0) * 100.0).floor() as u32;
        let boundary = percent - percent % PROGRESS_STEP_PERCENT;
        if boundary > self.logged {
            self.logged = boundary;
            info!(percent = boundary, "Processing");
        }
    }
}
