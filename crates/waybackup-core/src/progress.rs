//! Console progress while an index stream is running.
//!
//! The spinner is purely cosmetic: it shares nothing with the fetch except its
//! stop flag and is always joined before the fetch returns.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const FRAMES: &[char] = &['|', '/', '-', '\\'];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Carriage return plus ANSI erase-line. Prefix console output with it while
/// the spinner may be drawing so the two do not share a line.
pub const CLEAR_LINE: &str = "\r\x1b[2K";

/// Whether [`Spinner::start`] will actually draw on stderr.
pub fn spinner_visible(enabled: bool) -> bool {
    enabled && io::stderr().is_terminal()
}

/// Background spinner on stderr. Stopped and joined on [`Spinner::stop`] or drop.
pub struct Spinner {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start drawing `label` with a spinner. Does nothing unless
    /// [`spinner_visible`] holds.
    pub fn start(label: &str, enabled: bool) -> Self {
        if !spinner_visible(enabled) {
            return Self {
                stop: Arc::new(AtomicBool::new(false)),
                handle: None,
            };
        }
        Self::spawn(label, io::stderr())
    }

    /// Draw on `out` from a new thread until stopped, then blank the line.
    fn spawn<W>(label: &str, mut out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let label = label.to_string();
        let handle = thread::spawn(move || {
            for frame in FRAMES.iter().cycle() {
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                let _ = write!(out, "\r{} {}", frame, label);
                let _ = out.flush();
                thread::sleep(FRAME_INTERVAL);
            }
            let _ = write!(out, "\r{}\r", " ".repeat(label.len() + 2));
            let _ = out.flush();
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::debug!("spinner thread panicked");
            }
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Counts streamed lines and reports every `every` lines.
#[derive(Debug, Clone, Copy)]
pub struct LineProgress {
    every: u64,
    count: u64,
}

impl LineProgress {
    /// `every == 0` never reports.
    pub fn new(every: u64) -> Self {
        Self { every, count: 0 }
    }

    /// Count one line; returns the running total when a report is due.
    pub fn tick(&mut self) -> Option<u64> {
        self.count += 1;
        if self.every > 0 && self.count % self.every == 0 {
            Some(self.count)
        } else {
            None
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Shared buffer that records when the drawing thread lets go of it.
    struct Screen {
        text: Arc<Mutex<Vec<u8>>>,
        released: Arc<AtomicBool>,
    }

    impl Write for Screen {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.text.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for Screen {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn screen() -> (Screen, Arc<Mutex<Vec<u8>>>, Arc<AtomicBool>) {
        let text = Arc::new(Mutex::new(Vec::new()));
        let released = Arc::new(AtomicBool::new(false));
        let s = Screen {
            text: Arc::clone(&text),
            released: Arc::clone(&released),
        };
        (s, text, released)
    }

    #[test]
    fn line_progress_reports_on_multiples() {
        let mut p = LineProgress::new(3);
        let reports: Vec<u64> = (0..7).filter_map(|_| p.tick()).collect();
        assert_eq!(reports, vec![3, 6]);
        assert_eq!(p.count(), 7);
    }

    #[test]
    fn line_progress_zero_never_reports() {
        let mut p = LineProgress::new(0);
        assert!((0..10).all(|_| p.tick().is_none()));
    }

    #[test]
    fn disabled_spinner_spawns_nothing() {
        let s = Spinner::start("Fetching URLs...", false);
        assert!(!s.is_running());
        assert!(!spinner_visible(false));
        s.stop();
    }

    #[test]
    fn stop_joins_the_drawing_thread() {
        let (out, text, released) = screen();
        let s = Spinner::spawn("Fetching URLs...", out);
        assert!(s.is_running());
        thread::sleep(FRAME_INTERVAL * 3);
        s.stop();

        assert!(released.load(Ordering::SeqCst), "thread still holds its writer");
        let drawn = String::from_utf8(text.lock().unwrap().clone()).unwrap();
        assert!(drawn.starts_with("\r| Fetching URLs..."));
        let last = drawn.rsplit('\r').nth(1).unwrap();
        assert!(last.chars().all(|c| c == ' '), "line not cleared: {:?}", last);
        assert!(drawn.ends_with('\r'));
    }

    #[test]
    fn drop_joins_the_drawing_thread() {
        let (out, _text, released) = screen();
        let s = Spinner::spawn("Fetching URLs...", out);
        thread::sleep(FRAME_INTERVAL / 2);
        drop(s);
        assert!(released.load(Ordering::SeqCst));
    }
}
