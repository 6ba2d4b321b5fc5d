use crate::http::TransportError;

/// Every attempt failed; the cooldown has already been slept.
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempt(s): {last}")]
pub struct RetryExhausted {
    pub attempts: u32,
    #[source]
    pub last: TransportError,
}
