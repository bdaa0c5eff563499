//! Loopback fake of a firewall management API.
//!
//! Speaks just enough HTTP/1.1 over plain TCP to serve the three endpoints a
//! capture uses: `POST /logincheck`, the config backup `GET`, and
//! `POST /logout`. Every request is recorded for later assertions. Each
//! connection carries one request and is closed after the response.
//!
//! Form values are compared without URL decoding, so tests should use
//! URL-safe credentials.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

/// Path of the configuration backup endpoint, including its query.
pub const BACKUP_PATH: &str = "/api/v2/monitor/system/config/backup?scope=global";

/// One request received by the fake device.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct DeviceState {
    username: String,
    password: String,
    token: String,
    config: Vec<u8>,
    issue_token: bool,
    backup_status: u16,
    requests: Vec<RecordedRequest>,
}

/// A running fake device bound to `127.0.0.1` on an ephemeral port.
///
/// The accept loop runs on a detached thread for the rest of the test process.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    addr: SocketAddr,
    state: Arc<Mutex<DeviceState>>,
}

impl FakeDevice {
    /// Start a device accepting `username`/`password` and serving an empty config.
    pub fn start(username: &str, password: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake device");
        let addr = listener.local_addr().expect("fake device addr");

        let state = Arc::new(Mutex::new(DeviceState {
            username: username.to_string(),
            password: password.to_string(),
            token: "0123456789ABCDEF".to_string(),
            config: Vec::new(),
            issue_token: true,
            backup_status: 200,
            requests: Vec::new(),
        }));

        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                serve(stream, &shared);
            }
        });

        Self { addr, state }
    }

    /// Host part to use as the device address.
    pub fn address(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Anti-forgery token handed out on successful login.
    pub fn token(&self) -> String {
        self.lock().token.clone()
    }

    /// Configuration returned by the backup endpoint from now on.
    pub fn set_config(&self, config: impl Into<Vec<u8>>) {
        self.lock().config = config.into();
    }

    /// When false, logins succeed with HTTP 200 but never set the token cookie.
    pub fn set_issue_token(&self, issue: bool) {
        self.lock().issue_token = issue;
    }

    /// Status code returned by the backup endpoint for authenticated calls.
    pub fn set_backup_status(&self, status: u16) {
        self.lock().backup_status = status;
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Requests received for `path` (compared with the query string).
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn serve(mut stream: TcpStream, state: &Arc<Mutex<DeviceState>>) {
    let Some(request) = read_request(&mut stream) else {
        return;
    };

    let response = {
        let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
        state.requests.push(request.clone());
        route(&request, &state)
    };

    let _ = stream.write_all(&response);
    let _ = stream.flush();
}

fn route(request: &RecordedRequest, state: &DeviceState) -> Vec<u8> {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/logincheck") => {
            let form = parse_form(&request.body);
            let accepted = form.iter().any(|(k, v)| *k == "username" && *v == state.username)
                && form.iter().any(|(k, v)| *k == "secretkey" && *v == state.password);

            if accepted && state.issue_token {
                let cookies = [
                    "APSCOOKIE_1=\"session\"; Path=/; HttpOnly".to_string(),
                    format!("ccsrftoken=\"{}\"; Path=/", state.token),
                ];
                response(200, &cookies, b"1")
            } else {
                // Real devices answer a failed login with 200 and no token cookie.
                response(200, &[], b"0")
            }
        }
        ("GET", BACKUP_PATH) => {
            if request.header("x-csrftoken") != Some(state.token.as_str()) {
                response(401, &[], b"")
            } else if state.backup_status != 200 {
                response(state.backup_status, &[], b"")
            } else {
                response(200, &[], &state.config)
            }
        }
        ("POST", "/logout") => response(200, &[], b""),
        _ => response(404, &[], b""),
    }
}

fn response(status: u16, set_cookies: &[String], body: &[u8]) -> Vec<u8> {
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };

    let mut head = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for cookie in set_cookies {
        head.push_str(&format!("Set-Cookie: {cookie}\r\n"));
    }
    head.push_str("\r\n");

    let mut bytes = head.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

fn parse_form(body: &str) -> Vec<(&str, &str)> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .collect()
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).into_owned();

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}
