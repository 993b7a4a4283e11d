use std::time::{Duration, Instant};

use dashmap::DashMap;

const WINDOW: Duration = Duration::from_secs(15 * 60);
const MAX_FAILURES: u32 = 5;

/// Per-account login brute force limiter.
pub struct LoginRateLimiter {
    /// "company/email" -> (failed_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    fn key(company: &str, email: &str) -> String {
        format!("{}/{}", company.to_lowercase(), email.to_lowercase())
    }

    /// Check if login attempt is allowed. 5 failures per 15 minutes.
    /// Does NOT increment the counter; call `record_failure()` on invalid password.
    pub fn check(&self, company: &str, email: &str) -> Result<(), u64> {
        let now = Instant::now();

        let Some(entry) = self.entries.get(&Self::key(company, email)) else {
            return Ok(());
        };

        let (count, start) = entry.value();

        if now.duration_since(*start) > WINDOW {
            return Ok(());
        }

        if *count >= MAX_FAILURES {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(WINDOW.as_secs().saturating_sub(elapsed));
        }

        Ok(())
    }

    pub fn record_failure(&self, company: &str, email: &str) {
        let now = Instant::now();

        let mut entry = self
            .entries
            .entry(Self::key(company, email))
            .or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > WINDOW {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    pub fn reset(&self, company: &str, email: &str) {
        self.entries.remove(&Self::key(company, email));
    }

    pub fn cleanup(&self, max_age: Duration) {
        let now = Instant::now();
        self.entries.retain(|_, (_, start)| now.duration_since(*start) < max_age);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_five_failures() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..4 {
            limiter.record_failure("acme", "a@acme.io");
            assert!(limiter.check("acme", "a@acme.io").is_ok());
        }
        limiter.record_failure("acme", "a@acme.io");

        let retry_after = limiter.check("acme", "A@ACME.io").unwrap_err();
        assert!(retry_after > 0 && retry_after <= WINDOW.as_secs());
    }

    #[test]
    fn accounts_are_tracked_per_company() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..5 {
            limiter.record_failure("acme", "a@acme.io");
        }

        assert!(limiter.check("globex", "a@acme.io").is_ok());
    }

    #[test]
    fn reset_clears_failures() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..5 {
            limiter.record_failure("acme", "a@acme.io");
        }
        limiter.reset("acme", "a@acme.io");

        assert!(limiter.check("acme", "a@acme.io").is_ok());
    }
}
