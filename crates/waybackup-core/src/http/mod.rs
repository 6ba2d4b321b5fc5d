//! Blocking HTTP GET transport.
//!
//! Uses the curl crate (libcurl). The pipeline only talks to [`HttpGet`], so
//! tests can substitute a scripted client.

mod lines;

pub use lines::LineSplitter;

use curl::easy::Easy;
use std::time::Duration;

const USER_AGENT: &str = concat!("waybackup/", env!("CARGO_PKG_VERSION"));

/// Transport-level failure of a single GET.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Status(u32),
}

/// Minimal GET interface used by the fetcher and the availability checker.
pub trait HttpGet {
    /// GET `url` and hand each non-empty body line to `on_line` as it arrives.
    ///
    /// `timeout` bounds connecting and any stall in the body stream; a long but
    /// steady stream is not cut off.
    fn get_lines(
        &self,
        url: &str,
        timeout: Duration,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<(), TransportError>;

    /// GET `url` and return the whole body. `timeout` bounds the entire request.
    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError>;
}

impl<T: HttpGet + ?Sized> HttpGet for &T {
    fn get_lines(
        &self,
        url: &str,
        timeout: Duration,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<(), TransportError> {
        (**self).get_lines(url, timeout, on_line)
    }

    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        (**self).get(url, timeout)
    }
}

/// libcurl-backed [`HttpGet`]. Runs in the calling thread.
#[derive(Debug, Clone, Copy)]
pub struct CurlHttp {
    pub connect_timeout: Duration,
}

impl Default for CurlHttp {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
        }
    }
}

impl CurlHttp {
    fn handle(&self, url: &str) -> Result<Easy, TransportError> {
        let mut easy = Easy::new();
        easy.url(url)?;
        easy.useragent(USER_AGENT)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Error statuses fail the transfer before any body reaches the callback.
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        Ok(easy)
    }
}

/// Map the outcome of `perform()` plus the final status code to a transport result.
fn finish(easy: &mut Easy, performed: Result<(), curl::Error>) -> Result<(), TransportError> {
    if let Err(e) = performed {
        if e.is_http_returned_error() {
            let code = easy.response_code().unwrap_or(0);
            return Err(TransportError::Status(code));
        }
        return Err(TransportError::Curl(e));
    }
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransportError::Status(code));
    }
    Ok(())
}

impl HttpGet for CurlHttp {
    fn get_lines(
        &self,
        url: &str,
        timeout: Duration,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<(), TransportError> {
        let mut easy = self.handle(url)?;
        easy.low_speed_limit(1)?;
        easy.low_speed_time(timeout)?;

        let mut splitter = LineSplitter::default();
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                splitter.push(data, &mut *on_line);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        finish(&mut easy, performed)?;
        splitter.finish(on_line);
        Ok(())
    }

    fn get(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, TransportError> {
        let mut easy = self.handle(url)?;
        easy.timeout(timeout)?;

        let mut body = Vec::new();
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()
        };
        finish(&mut easy, performed)?;
        Ok(body)
    }
}
