//! Retry policy for the CDX index fetch.
//!
//! Fixed attempt count with a fixed delay between attempts, then a single
//! long cooldown before giving up on the domain. Error classification only
//! feeds the logs; every transport failure is retried.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, ErrorKind};
pub use error::RetryExhausted;
pub use policy::{RetryDecision, RetryPolicy};
pub use run::{run_with_retry, Sleeper, ThreadSleeper};
