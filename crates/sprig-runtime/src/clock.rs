//! Game clock with fixed-timestep accumulator

/// Tracks frame time and provides a fixed-timestep accumulator for updates.
///
/// The host drives it with the timestamps it receives from its animation-frame
/// callback, in milliseconds. The step length is `1000 / room_speed` truncated
/// to whole milliseconds.
pub struct GameClock {
    /// Total elapsed time in milliseconds
    pub total_time: f64,
    /// Time since last frame in milliseconds
    pub delta_time: f64,
    /// Fixed step length in milliseconds
    pub frame_time: f64,
    /// Accumulated time for fixed-step consumption
    accumulator: f64,
    /// Timestamp of the last tick
    last_timestamp: f64,
    /// Whether the next tick only records its timestamp
    first_tick: bool,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame_time: Self::step_for(30),
            accumulator: 0.0,
            last_timestamp: 0.0,
            first_tick: true,
        }
    }
}

impl GameClock {
    /// Create a new game clock at the default room speed of 30 steps per second
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game clock running `room_speed` steps per second
    pub fn with_room_speed(room_speed: u32) -> Self {
        Self {
            frame_time: Self::step_for(room_speed),
            ..Self::default()
        }
    }

    /// Never shorter than 1 ms, so a step always drains the accumulator
    fn step_for(room_speed: u32) -> f64 {
        f64::from((1000 / room_speed.max(1)).max(1))
    }

    /// Adopt a new step rate. The accumulator is kept.
    pub fn set_room_speed(&mut self, room_speed: u32) {
        self.frame_time = Self::step_for(room_speed);
    }

    /// Forget the accumulated time and treat the next tick as the first one
    pub fn prime(&mut self) {
        self.first_tick = true;
        self.accumulator = 0.0;
        self.delta_time = 0.0;
    }

    /// Advance the clock to `timestamp` (ms). Call once per frame.
    pub fn tick(&mut self, timestamp: f64) {
        if self.first_tick {
            self.first_tick = false;
            self.last_timestamp = timestamp;
            self.delta_time = 0.0;
            return;
        }

        // Hosts occasionally hand out a timestamp older than the last one
        self.delta_time = (timestamp - self.last_timestamp).max(0.0);
        self.last_timestamp = timestamp;
        self.total_time += self.delta_time;
        self.accumulator += self.delta_time;
    }

    /// Returns true if there's enough accumulated time for a fixed update step
    pub fn should_fixed_update(&self) -> bool {
        self.accumulator >= self.frame_time
    }

    /// Consume one fixed timestep from the accumulator
    pub fn consume_fixed_step(&mut self) {
        self.accumulator -= self.frame_time;
    }

    /// Drop whatever backlog is left (used when a catch-up cap is hit)
    pub fn discard_backlog(&mut self) {
        self.accumulator %= self.frame_time;
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}
