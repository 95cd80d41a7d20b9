use crate::ports::clock::Clock as ClockTrait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Mock implementation of Clock
///
/// Returns a fixed instant that tests can move forward explicitly.
pub struct Clock {
    now: Mutex<DateTime<Utc>>,
}

impl Clock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock().unwrap() = instant;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl ClockTrait for Clock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
