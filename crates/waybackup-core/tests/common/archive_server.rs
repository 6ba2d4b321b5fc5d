//! Minimal HTTP/1.1 server imitating the two archive endpoints for integration tests.
//!
//! `GET /cdx?url=*.<domain>/*...` answers with the configured lines as
//! text/plain; `GET /available?url=<u>` answers with availability JSON.
//! A domain can be made to fail its first N index requests with a 5xx.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct DomainIndex {
    pub lines: Vec<String>,
    /// Fail this many index requests with 500 before answering.
    pub fail_first: u32,
}

#[derive(Debug, Default)]
pub struct ArchiveState {
    pub index: HashMap<String, DomainIndex>,
    /// Targets that have an archived copy.
    pub archived: Vec<String>,
    /// Every request path+query received, in order.
    pub requests: Vec<String>,
}

pub struct ArchiveServer {
    pub base: String,
    pub state: Arc<Mutex<ArchiveState>>,
}

impl ArchiveServer {
    pub fn index_endpoint(&self) -> String {
        format!("{}/cdx", self.base)
    }

    pub fn availability_endpoint(&self) -> String {
        format!("{}/available", self.base)
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

/// Starts the server on a background thread; it runs until the process exits.
pub fn start(state: ArchiveState) -> ArchiveServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(state));
    let shared = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&shared);
            thread::spawn(move || handle(stream, &state));
        }
    });
    ArchiveServer {
        base: format!("http://127.0.0.1:{}", port),
        state,
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<ArchiveState>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]).to_string();
    let target = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    let parsed = match url::Url::parse(&format!("http://local{}", target)) {
        Ok(u) => u,
        Err(_) => return respond(&mut stream, "400 Bad Request", "text/plain", b""),
    };
    let query_url = parsed
        .query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
        .unwrap_or_default();

    let mut st = state.lock().unwrap();
    st.requests.push(target.clone());
    match parsed.path() {
        "/cdx" => {
            let domain = query_url
                .trim_start_matches("*.")
                .trim_end_matches("/*")
                .to_string();
            let Some(entry) = st.index.get_mut(&domain) else {
                return respond(&mut stream, "404 Not Found", "text/plain", b"");
            };
            if entry.fail_first > 0 {
                entry.fail_first -= 1;
                drop(st);
                return respond(&mut stream, "500 Internal Server Error", "text/plain", b"boom");
            }
            let body = entry.lines.join("\n");
            drop(st);
            respond_chunked_body(&mut stream, body.as_bytes());
        }
        "/available" => {
            let body = if st.archived.contains(&query_url) {
                format!(
                    r#"{{"url":"{0}","archived_snapshots":{{"closest":{{"status":"200","available":true,"url":"http://web.archive.org/web/20200101000000/{0}","timestamp":"20200101000000"}}}}}}"#,
                    query_url
                )
            } else {
                format!(r#"{{"url":"{}","archived_snapshots":{{}}}}"#, query_url)
            };
            drop(st);
            respond(&mut stream, "200 OK", "application/json", body.as_bytes());
        }
        _ => {
            drop(st);
            respond(&mut stream, "404 Not Found", "text/plain", b"");
        }
    }
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

/// Send the body in small pieces so the client sees it arrive incrementally.
fn respond_chunked_body(stream: &mut TcpStream, body: &[u8]) {
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    for piece in body.chunks(7) {
        if stream.write_all(piece).is_err() {
            return;
        }
        let _ = stream.flush();
    }
}
