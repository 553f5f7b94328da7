// File Path: src/services/clock.rs

//! Time source for reading timestamps, injectable so tests can pin it.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

#[cfg(test)]
impl FixedClock {
    pub fn at_unix(seconds: i64) -> Self {
        Self {
            now: DateTime::from_timestamp(seconds, 0).unwrap(),
        }
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
