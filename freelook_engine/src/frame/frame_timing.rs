/// Wall-clock delta between successive frame starts.
#[derive(Debug, Clone, Default)]
pub struct FrameTiming {
    last_frame_time: Option<f64>,
    first_frame_time: Option<f64>,
    delta_time: f32,
    frame_count: u64,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame at time `now` (seconds) and return its delta
    ///
    /// The first frame has a zero delta. Time going backwards also yields
    /// zero, and a non-finite `now` is ignored entirely.
    pub fn advance(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            crate::engine_trace!("freelook::FrameTiming", "Ignoring non-finite time {}", now);
            self.delta_time = 0.0;
            return 0.0;
        }
        self.delta_time = match self.last_frame_time {
            Some(last) => (now - last).max(0.0) as f32,
            None => 0.0,
        };
        self.first_frame_time.get_or_insert(now);
        self.last_frame_time = Some(now);
        self.frame_count += 1;
        self.delta_time
    }

    /// Seconds since the previous frame start
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Seconds between the first and the latest frame start
    pub fn elapsed(&self) -> f64 {
        match (self.first_frame_time, self.last_frame_time) {
            (Some(first), Some(last)) => (last - first).max(0.0),
            _ => 0.0,
        }
    }

    /// Average frames per second since the first frame
    pub fn fps(&self) -> f64 {
        let elapsed = self.elapsed();
        if elapsed > 0.0 && self.frame_count > 1 {
            (self.frame_count - 1) as f64 / elapsed
        } else {
            0.0
        }
    }
}

#[cfg(test)]
#[path = "frame_timing_tests.rs"]
mod tests;
