use std::time::Duration;

/// Decision returned by the retry policy after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after the given delay.
    RetryAfter(Duration),
    /// Stop; sleep `cooldown` once before reporting failure.
    GiveUp { cooldown: Duration },
}

/// Linear retry: same delay every time, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay between attempts.
    pub delay: Duration,
    /// Sleep after the final failed attempt.
    pub cooldown: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
            cooldown: Duration::from_secs(300),
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based and names the attempt that just failed.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            RetryDecision::GiveUp {
                cooldown: self.cooldown,
            }
        } else {
            RetryDecision::RetryAfter(self.delay)
        }
    }
}
