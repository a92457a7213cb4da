//! A minimal CZDS lookalike served from a local TCP listener.
//!
//! The server speaks just enough HTTP/1.1 for the client under test: the
//! authentication endpoint, the link listing, and zone file routes
//! answering HEAD probes and ranged GETs. Every response closes its
//! connection. Fixtures can misbehave on demand, omitting the content
//! length, failing range requests, staggering range replies, or stalling
//! to give cancellation something to interrupt.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const TEST_TOKEN: &str = "token-0123456789abcdef";
pub const TEST_USERNAME: &str = "icann-user@example.com";
pub const TEST_PASSWORD: &str = "icann-password";

/// One zone file the server will serve.
pub struct ZoneFixture {
    pub name: String,
    pub body: Vec<u8>,
    pub head_omits_length: bool,
    pub fail_ranges: bool,
    pub truncate_ranges: bool,
    pub stagger: bool,
    pub stall: bool,
}

impl ZoneFixture {
    pub fn new(name: &str, body: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            body,
            head_omits_length: false,
            fail_ranges: false,
            truncate_ranges: false,
            stagger: false,
            stall: false,
        }
    }

    /// Answer HEAD probes without a Content-Length header.
    pub fn without_content_length(mut self) -> Self {
        self.head_omits_length = true;
        self
    }

    /// Answer every range request with a 500.
    pub fn failing_ranges(mut self) -> Self {
        self.fail_ranges = true;
        self
    }

    /// Serve each range one byte short of what was asked.
    pub fn truncated_ranges(mut self) -> Self {
        self.truncate_ranges = true;
        self
    }

    /// Delay the first range so chunks arrive out of order.
    pub fn staggered(mut self) -> Self {
        self.stagger = true;
        self
    }

    /// Sit on range requests long enough for a cancel to land first.
    pub fn stalled(mut self) -> Self {
        self.stall = true;
        self
    }
}

/// Server-wide failure switches.
#[derive(Default)]
pub struct ServerOptions {
    pub reject_credentials: bool,
    pub fail_listing: bool,
}

struct ServerState {
    addr: SocketAddr,
    zones: Vec<ZoneFixture>,
    options: ServerOptions,
    range_hits: AtomicUsize,
}

/// Handle to a running fixture server.
pub struct CzdsServer {
    state: Arc<ServerState>,
}

impl CzdsServer {
    pub fn start(zones: Vec<ZoneFixture>) -> Self {
        Self::start_with_options(zones, ServerOptions::default())
    }

    pub fn start_with_options(zones: Vec<ZoneFixture>, options: ServerOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture listener");
        let addr = listener.local_addr().expect("fixture listener address");
        let state = Arc::new(ServerState {
            addr,
            zones,
            options,
            range_hits: AtomicUsize::new(0),
        });

        let accept_state = state.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        let state = accept_state.clone();
                        thread::spawn(move || handle_connection(stream, state));
                    }
                    Err(_) => break,
                }
            }
        });

        Self { state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.state.addr)
    }

    pub fn auth_url(&self) -> String {
        format!("{}/api/authenticate", self.base_url())
    }

    pub fn zone_url(&self, name: &str) -> String {
        format!("{}/czds/downloads/{}.zone", self.base_url(), name)
    }

    /// The links the listing endpoint hands out, in serving order.
    pub fn links(&self) -> Vec<String> {
        self.state
            .zones
            .iter()
            .map(|z| self.zone_url(&z.name))
            .collect()
    }

    /// Number of ranged GETs answered so far.
    pub fn range_hits(&self) -> usize {
        self.state.range_hits.load(Ordering::SeqCst)
    }
}

struct Request {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn handle_connection(mut stream: TcpStream, state: Arc<ServerState>) {
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let response = route(&request, &state);
    let _ = stream.write_all(&response);
    let _ = stream.flush();
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut tmp = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut tmp).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&tmp[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        if buf.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = Vec::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut tmp).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&tmp[..n]);
    }
    body.truncate(content_length);

    Some(Request {
        method,
        path,
        headers,
        body,
    })
}

fn route(request: &Request, state: &ServerState) -> Vec<u8> {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/api/authenticate") => authenticate_route(request, state),
        ("GET", "/czds/downloads/links") => links_route(request, state),
        (method, path) if path.starts_with("/czds/downloads/") => {
            zone_route(method, path, request, state)
        }
        _ => plain_response(404, "not found"),
    }
}

fn authenticate_route(request: &Request, state: &ServerState) -> Vec<u8> {
    if state.options.reject_credentials {
        return plain_response(401, "invalid credentials");
    }
    let parsed: serde_json::Value = match serde_json::from_slice(&request.body) {
        Ok(parsed) => parsed,
        Err(_) => return plain_response(400, "bad request"),
    };
    if parsed["username"] == TEST_USERNAME && parsed["password"] == TEST_PASSWORD {
        json_response(200, &format!("{{\"accessToken\":\"{TEST_TOKEN}\"}}"))
    } else {
        plain_response(401, "invalid credentials")
    }
}

fn links_route(request: &Request, state: &ServerState) -> Vec<u8> {
    if !authorized(request) {
        return plain_response(401, "unauthorized");
    }
    if state.options.fail_listing {
        return plain_response(500, "listing backend exploded");
    }
    let links: Vec<String> = state
        .zones
        .iter()
        .map(|z| format!("http://{}/czds/downloads/{}.zone", state.addr, z.name))
        .collect();
    json_response(200, &serde_json::to_string(&links).expect("serialize links"))
}

fn zone_route(method: &str, path: &str, request: &Request, state: &ServerState) -> Vec<u8> {
    if !authorized(request) {
        return plain_response(401, "unauthorized");
    }
    let name = path
        .trim_start_matches("/czds/downloads/")
        .trim_end_matches(".zone");
    let Some(zone) = state.zones.iter().find(|z| z.name == name) else {
        return plain_response(404, "no such zone");
    };
    match method {
        "HEAD" => head_response(zone),
        "GET" => get_response(zone, request, state),
        _ => plain_response(405, "method not allowed"),
    }
}

fn head_response(zone: &ZoneFixture) -> Vec<u8> {
    if zone.head_omits_length {
        b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_vec()
    } else {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            zone.body.len()
        )
        .into_bytes()
    }
}

fn get_response(zone: &ZoneFixture, request: &Request, state: &ServerState) -> Vec<u8> {
    let total = zone.body.len();
    match request.header("range").and_then(parse_range) {
        Some((start, end)) => {
            state.range_hits.fetch_add(1, Ordering::SeqCst);
            if zone.fail_ranges {
                return plain_response(500, "range backend exploded");
            }
            if zone.stall {
                thread::sleep(Duration::from_secs(5));
            } else if zone.stagger && start == 0 {
                thread::sleep(Duration::from_millis(150));
            }
            if total == 0 || start >= total as u64 {
                return plain_response(416, "range not satisfiable");
            }
            let end = end.map_or(total as u64 - 1, |e| e.min(total as u64 - 1));
            let mut slice = &zone.body[start as usize..=end as usize];
            if zone.truncate_ranges && slice.len() > 1 {
                slice = &slice[..slice.len() - 1];
            }
            let mut response = format!(
                "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {start}-{end}/{total}\r\nConnection: close\r\n\r\n",
                slice.len()
            )
            .into_bytes();
            response.extend_from_slice(slice);
            response
        }
        None => {
            let mut response =
                format!("HTTP/1.1 200 OK\r\nContent-Length: {total}\r\nConnection: close\r\n\r\n")
                    .into_bytes();
            response.extend_from_slice(&zone.body);
            response
        }
    }
}

fn authorized(request: &Request) -> bool {
    request
        .header("authorization")
        .map(|v| v == format!("Bearer {TEST_TOKEN}"))
        .unwrap_or(false)
}

fn parse_range(value: &str) -> Option<(u64, Option<u64>)> {
    let spec = value.strip_prefix("bytes=")?;
    let (start, end) = spec.split_once('-')?;
    let start = start.parse::<u64>().ok()?;
    let end = if end.is_empty() {
        None
    } else {
        Some(end.parse::<u64>().ok()?)
    };
    Some((start, end))
}

fn plain_response(status: u16, body: &str) -> Vec<u8> {
    response_bytes(status, "text/plain", body.as_bytes())
}

fn json_response(status: u16, body: &str) -> Vec<u8> {
    response_bytes(status, "application/json", body.as_bytes())
}

fn response_bytes(status: u16, content_type: &str, body: &[u8]) -> Vec<u8> {
    let reason = match status {
        200 => "OK",
        206 => "Partial Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        416 => "Range Not Satisfiable",
        _ => "Internal Server Error",
    };
    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
