//! Frame-driven countdown used for cooldowns, effect lifetimes and patrols.
//!
//! The timer never reads a clock: every call to [`Timer::run`] is handed the
//! frame delta explicitly, which keeps the whole simulation deterministic.

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
    looping: bool,
    /// Set once a one-shot timer has reported completion.
    fired: bool,
}

impl Timer {
    /// One-shot timer. Negative durations are treated as zero.
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            looping: false,
            fired: false,
        }
    }

    /// Timer that restarts itself every time it completes.
    pub fn looping(duration: f32) -> Self {
        Self {
            looping: true,
            ..Self::new(duration)
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Changes the duration without touching the elapsed time.
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances the timer by `delta` seconds.
    ///
    /// Returns `true` on the call that detects completion. A one-shot timer
    /// then stays done and keeps returning `false` until [`Timer::reset`].
    /// A looping timer subtracts one duration on completion, keeping any
    /// overshoot; if the overshoot is still a full duration or more, the next
    /// call consumes it without adding time.
    pub fn run(&mut self, delta: f32) -> bool {
        if self.looping {
            return self.run_looping(delta);
        }

        if self.fired {
            return false;
        }
        if !self.is_done() {
            self.elapsed += delta.max(0.0);
        }
        if self.is_done() {
            self.fired = true;
            return true;
        }
        false
    }

    fn run_looping(&mut self, delta: f32) -> bool {
        if self.duration <= 0.0 {
            self.elapsed = 0.0;
            return true;
        }
        if !self.is_done() {
            self.elapsed += delta.max(0.0);
            if !self.is_done() {
                return false;
            }
        }
        self.elapsed -= self.duration;
        true
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.fired = false;
    }
}
