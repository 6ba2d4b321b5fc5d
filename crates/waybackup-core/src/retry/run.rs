//! Retry loop: run a closure until success or the policy gives up.

use std::time::Duration;

use super::classify::classify;
use super::error::RetryExhausted;
use super::policy::{RetryDecision, RetryPolicy};
use crate::http::TransportError;

/// Blocking sleep, injectable so retry timing can be observed in tests.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Runs `f(attempt)` (1-based) until it succeeds or the policy gives up.
///
/// Between attempts sleeps the policy delay; after the last failure sleeps the
/// cooldown once and returns [`RetryExhausted`].
pub fn run_with_retry<T, S, F>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut f: F,
) -> Result<T, RetryExhausted>
where
    S: Sleeper + ?Sized,
    F: FnMut(u32) -> Result<T, TransportError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify(&e);
                match policy.decide(attempt) {
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            attempt,
                            kind = kind.as_str(),
                            "attempt failed: {}; retrying in {:?}",
                            e,
                            d
                        );
                        sleeper.sleep(d);
                        attempt += 1;
                    }
                    RetryDecision::GiveUp { cooldown } => {
                        tracing::error!(
                            attempt,
                            kind = kind.as_str(),
                            "giving up after {} attempt(s): {}; cooling down for {:?}",
                            attempt,
                            e,
                            cooldown
                        );
                        sleeper.sleep(cooldown);
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last: e,
                        });
                    }
                }
            }
        }
    }
}
