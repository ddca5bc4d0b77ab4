pub const FPS_REPORT_INTERVAL: u32 = 30;

/// Reports the instantaneous rate (`1000 / delta`) of the latest frame once
/// every [`FPS_REPORT_INTERVAL`] frames.
#[derive(Debug, Default, Clone)]
pub struct FpsMeter {
    frames: u32,
    last_ms: Option<f64>,
    last_report: Option<f32>,
}

impl FpsMeter {
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        let delta = self.last_ms.map(|prev| now_ms - prev);
        self.last_ms = Some(now_ms);
        self.frames += 1;
        if self.frames < FPS_REPORT_INTERVAL {
            return None;
        }
        // A zero-length frame defers the report to the next tick.
        let delta = delta.filter(|d| *d > 0.0)?;
        self.frames = 0;
        let fps = (1000.0 / delta) as f32;
        self.last_report = Some(fps);
        Some(fps)
    }

    pub fn last_report(&self) -> Option<f32> {
        self.last_report
    }
}
