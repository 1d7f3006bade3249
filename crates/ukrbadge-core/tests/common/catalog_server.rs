//! Minimal HTTP/1.1 catalog server for integration tests.
//!
//! Routes map an exact request target (path plus query) to a canned
//! response. Unknown targets get a 404. Every request is recorded with its
//! headers; a client that hangs up while a delayed route is still waiting
//! is recorded as a disconnect.

use std::collections::HashMap;
use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: String,
    /// Wait before responding (simulates a slow catalog).
    pub delay: Duration,
}

impl Route {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub target: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Log {
    requests: Mutex<Vec<Recorded>>,
    /// (target, time from request to hang-up) for clients that left early.
    disconnects: Mutex<Vec<(String, Duration)>>,
}

pub struct CatalogServer {
    /// Base URL without trailing slash, e.g. "http://127.0.0.1:12345".
    pub base_url: String,
    log: Arc<Log>,
}

impl CatalogServer {
    /// Request targets in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.recorded().into_iter().map(|r| r.target).collect()
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.log.requests.lock().unwrap().clone()
    }

    pub fn disconnects(&self) -> Vec<(String, Duration)> {
        self.log.disconnects.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> CatalogServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(target, route)| (target.to_string(), route))
            .collect(),
    );
    let log = Arc::new(Log::default());
    let server_log = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&server_log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    CatalogServer {
        base_url: format!("http://127.0.0.1:{}", port),
        log,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, log: &Log) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let recorded = parse_request(request);
    let target = recorded.target.clone();
    log.requests.lock().unwrap().push(recorded);

    let route = routes
        .get(&target)
        .cloned()
        .unwrap_or_else(|| Route::status(404, "<html>404</html>"));
    if !route.delay.is_zero() {
        if let Some(after) = wait_or_hang_up(&mut stream, route.delay) {
            log.disconnects.lock().unwrap().push((target, after));
            return;
        }
    }
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(route.body.as_bytes());
}

/// Sleeps for `delay` while watching the socket. Returns the elapsed time if the client closed it first.
fn wait_or_hang_up(stream: &mut TcpStream, delay: Duration) -> Option<Duration> {
    let start = Instant::now();
    let _ = stream.set_read_timeout(Some(Duration::from_millis(20)));
    let mut buf = [0u8; 256];
    while start.elapsed() < delay {
        match stream.read(&mut buf) {
            Ok(0) => return Some(start.elapsed()),
            Ok(_) => {}
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(_) => return Some(start.elapsed()),
        }
    }
    None
}

fn parse_request(request: &str) -> Recorded {
    let mut lines = request.lines();
    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    let headers = lines
        .take_while(|line| !line.trim().is_empty())
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();
    Recorded { target, headers }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
