use foundation::time::Time;

/// Frame metadata.
///
/// This is the primary timebase for the engine runtime. It is intentionally
/// small and pure so it can be recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time since the previous frame (seconds).
    pub dt_s: f64,
    /// Elapsed engine time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// Fixed-step frame: `time = index * dt_s`.
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}

/// Turns raw display-refresh timestamps into a monotonic elapsed clock.
///
/// The first timestamp becomes elapsed time zero. Timestamps that go
/// backwards (or are not finite) produce a zero delta instead of rewinding.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    start_s: Option<f64>,
    last_s: Option<f64>,
    elapsed_s: f64,
    next_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now_s: f64) -> Frame {
        let dt_s = match (self.last_s, now_s.is_finite()) {
            (Some(last), true) => (now_s - last).max(0.0),
            _ => 0.0,
        };
        if now_s.is_finite() {
            if self.start_s.is_none() {
                self.start_s = Some(now_s);
            }
            self.last_s = Some(self.last_s.map_or(now_s, |last| last.max(now_s)));
        }
        self.elapsed_s += dt_s;

        let frame = Frame {
            index: self.next_index,
            dt_s,
            time: Time(self.elapsed_s),
        };
        self.next_index += 1;
        frame
    }

    pub fn elapsed(&self) -> Time {
        Time(self.elapsed_s)
    }

    pub fn frames_ticked(&self) -> u64 {
        self.next_index
    }
}
