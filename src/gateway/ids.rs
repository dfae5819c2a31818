use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Issues ids from the wall clock in milliseconds, strictly increasing so
/// two creates in the same millisecond still get distinct ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate.to_string(),
                Err(actual) => last = actual,
            }
        }
    }
}
