//! Host-independent "run on every tick" primitive.
//!
//! The app feeds it Bevy's clock once per frame; tests and the headless
//! snapshot feed it [`SyntheticTicks`]. Once cancelled it never runs again.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Running,
    Cancelled,
}

#[derive(Resource, Debug, Default)]
pub struct FrameLoop {
    state: LoopState,
    ticks: u64,
    last_timestamp_ms: Option<f64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Ticks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs `on_tick` with `timestamp_ms` if the loop is still live.
    /// Timestamps that go backwards are clamped to the previous one.
    pub fn tick<R>(&mut self, timestamp_ms: f64, on_tick: impl FnOnce(f64) -> R) -> Option<R> {
        if !self.is_running() {
            return None;
        }
        let ts = match self.last_timestamp_ms {
            Some(prev) if timestamp_ms < prev => prev,
            _ => timestamp_ms,
        };
        self.last_timestamp_ms = Some(ts);
        self.ticks += 1;
        Some(on_tick(ts))
    }

    /// Stops the loop. Returns `true` only for the call that actually stopped it.
    pub fn cancel(&mut self) -> bool {
        if self.state == LoopState::Cancelled {
            return false;
        }
        self.state = LoopState::Cancelled;
        info!(target: "frame_loop", "frame loop cancelled after {} ticks", self.ticks);
        true
    }

    /// Pulls timestamps from `source` until it runs dry or the loop is cancelled
    /// (`on_tick` may cancel through the handle it receives). Returns ticks run.
    pub fn drive<I, F>(&mut self, source: I, mut on_tick: F) -> u64
    where
        I: IntoIterator<Item = f64>,
        F: FnMut(&mut LoopControl, f64),
    {
        let start = self.ticks;
        for ts in source {
            let mut control = LoopControl { cancel: false };
            if self.tick(ts, |t| on_tick(&mut control, t)).is_none() {
                break;
            }
            if control.cancel {
                self.cancel();
            }
        }
        self.ticks - start
    }
}

/// Handed to [`FrameLoop::drive`] callbacks so they can stop the loop.
#[derive(Debug)]
pub struct LoopControl {
    cancel: bool,
}

impl LoopControl {
    pub fn cancel(&mut self) {
        self.cancel = true;
    }
}

/// Evenly spaced timestamps, e.g. `SyntheticTicks::at_hz(60.0, 120)`.
#[derive(Debug, Clone)]
pub struct SyntheticTicks {
    next_ms: f64,
    step_ms: f64,
    remaining: usize,
}

impl SyntheticTicks {
    pub fn new(start_ms: f64, step_ms: f64, count: usize) -> Self {
        Self {
            next_ms: start_ms,
            step_ms,
            remaining: count,
        }
    }

    pub fn at_hz(hz: f64, count: usize) -> Self {
        let step = 1000.0 / hz.max(1e-3);
        Self::new(step, step, count)
    }
}

impl Iterator for SyntheticTicks {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let ts = self.next_ms;
        self.next_ms += self.step_ms;
        Some(ts)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_reports_true_exactly_once() {
        let mut fl = FrameLoop::new();
        assert!(fl.cancel());
        assert!(!fl.cancel());
        assert!(fl.tick(16.0, |_| ()).is_none());
        assert_eq!(fl.ticks(), 0);
    }

    #[test]
    fn drive_stops_when_callback_cancels() {
        let mut fl = FrameLoop::new();
        let mut seen = Vec::new();
        let ran = fl.drive(SyntheticTicks::new(0.0, 10.0, 100), |ctl, t| {
            seen.push(t);
            if seen.len() == 5 {
                ctl.cancel();
            }
        });
        assert_eq!(ran, 5);
        assert_eq!(seen, vec![0.0, 10.0, 20.0, 30.0, 40.0]);
        assert!(!fl.is_running());
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let mut fl = FrameLoop::new();
        fl.tick(100.0, |_| ());
        let got = fl.tick(50.0, |t| t);
        assert_eq!(got, Some(100.0));
    }

    #[test]
    fn synthetic_ticks_at_sixty_hz() {
        let ts: Vec<f64> = SyntheticTicks::at_hz(60.0, 3).collect();
        assert_eq!(ts.len(), 3);
        assert!((ts[0] - 16.666).abs() < 0.01);
        assert!((ts[2] - 50.0).abs() < 0.01);
    }
}
