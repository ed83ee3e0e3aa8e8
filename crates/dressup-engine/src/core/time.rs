/// Variable-step frame clock fed by animation-frame timestamps.
/// Deltas are clamped so a stalled tab (or a breakpoint) can't dump a huge
/// step into the conveyor lanes on resume.
pub struct FrameClock {
    /// Largest delta in seconds handed out per frame.
    max_dt: f64,
    /// Timestamp of the previous frame in milliseconds.
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self {
            max_dt,
            last_ms: None,
        }
    }

    /// Advance to `now_ms` and return the clamped delta in seconds.
    /// The first frame after construction or [`reset`](Self::reset) returns 0.
    pub fn advance(&mut self, now_ms: f64) -> f64 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0).clamp(0.0, self.max_dt),
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt
    }

    /// Forget the previous timestamp, e.g. after the loop was torn down.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
