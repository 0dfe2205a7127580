/// Frame clock driven by the host's refresh timestamps.
///
/// Keeps a monotonic "running time" in milliseconds that only advances
/// while the loop is running: after `suspend()` the next frame re-bases on
/// the host timestamp instead of counting the paused gap.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Running time in milliseconds.
    now_ms: f64,
    /// Host timestamp of the previous frame.
    last_host_ms: Option<f64>,
    /// Elapsed time of the most recent frame.
    dt_ms: f64,
    /// Number of frames advanced so far.
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the host timestamp of a new frame. Returns the frame delta.
    /// Host clocks going backwards yield a zero delta.
    pub fn advance(&mut self, host_ms: f64) -> f64 {
        let dt = match self.last_host_ms {
            Some(last) => (host_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_host_ms = Some(host_ms);
        self.now_ms += dt;
        self.dt_ms = dt;
        self.frame += 1;
        dt
    }

    /// Forget the last host timestamp so a pause gap is not counted.
    pub fn suspend(&mut self) {
        self.last_host_ms = None;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn dt_ms(&self) -> f64 {
        self.dt_ms
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
