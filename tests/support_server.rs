use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

/// Version the fake service stamps on every ciphertext.
pub const FAKE_VERSION: &str = "1001000";
/// Policy name the fake service refuses with 400 Bad Request.
pub const REJECTED_POLICY: &str = "reject";
/// Policy name the fake service answers with `400 Policy Not Found`.
pub const UNKNOWN_POLICY: &str = "missing";

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    paths: Arc<Mutex<Vec<String>>>,
}

impl ServerHandle {
    /// Request paths received so far, in arrival order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn count(&self, path: &str) -> usize {
        self.paths().iter().filter(|seen| *seen == path).count()
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a fake protection service for tests.
///
/// Ciphertext is `enc:` followed by the reversed plaintext.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_crdp_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let paths = Arc::new(Mutex::new(Vec::new()));
    let server_paths = Arc::clone(&paths);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let client_paths = Arc::clone(&server_paths);
                    thread::spawn(move || handle_client(stream, &client_paths));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        addr.to_string(),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            paths,
        },
    ))
}

/// Like [`spawn_crdp_server`], but skips when sockets are not permitted.
///
/// # Errors
///
/// Returns an error if the listener fails for any other reason.
pub fn spawn_crdp_server_or_skip() -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_crdp_server() {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

struct Request {
    path: String,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        data.extend_from_slice(chunk.get(..read)?);
        if let Some(pos) = data.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos.checked_add(4)?;
        }
    };

    let head = String::from_utf8_lossy(data.get(..header_end)?).into_owned();
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))?
        .to_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let body_end = header_end.checked_add(content_length)?;

    while data.len() < body_end {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        data.extend_from_slice(chunk.get(..read)?);
    }

    Some(Request {
        path,
        body: data.get(header_end..body_end)?.to_vec(),
    })
}

fn handle_client(mut stream: TcpStream, paths: &Mutex<Vec<String>>) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    if let Ok(mut seen) = paths.lock() {
        seen.push(request.path.clone());
    }

    let (status, body) = respond(&request);
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn respond(request: &Request) -> (&'static str, String) {
    let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
        return bad_request("Malformed JSON body");
    };
    let policy = text(&body, "protection_policy_name").unwrap_or_default();
    if policy == UNKNOWN_POLICY {
        return (
            "400 Policy Not Found",
            json!({ "error": format!("Policy '{}' does not exist", policy) }).to_string(),
        );
    }
    if policy.is_empty() || policy == REJECTED_POLICY {
        return bad_request(&format!("Policy '{}' not found", policy));
    }

    match request.path.as_str() {
        "/v1/protect" => {
            let Some(data) = text(&body, "data") else {
                return bad_request("Missing data");
            };
            ok(&json!({
                "protected_data": encrypt(data),
                "external_version": FAKE_VERSION,
            }))
        }
        "/v1/protectbulk" => {
            let Some(items) = body.get("data_array").and_then(Value::as_array) else {
                return bad_request("Missing data_array");
            };
            let protected: Vec<Value> = items
                .iter()
                .map(|item| {
                    json!({
                        "protected_data": encrypt(item.as_str().unwrap_or_default()),
                        "external_version": FAKE_VERSION,
                    })
                })
                .collect();
            ok(&json!({ "status": "Success", "protected_data_array": protected }))
        }
        "/v1/reveal" => {
            if text(&body, "username").is_none() {
                return bad_request("Missing username");
            }
            if text(&body, "external_version") != Some(FAKE_VERSION) {
                return bad_request("Unknown external_version");
            }
            let Some(protected) = text(&body, "protected_data") else {
                return bad_request("Missing protected_data");
            };
            ok(&json!({ "data": decrypt(protected) }))
        }
        "/v1/revealbulk" => {
            if text(&body, "username").is_none() {
                return bad_request("Missing username");
            }
            let Some(items) = body.get("protected_data_array").and_then(Value::as_array) else {
                return bad_request("Missing protected_data_array");
            };
            let mut revealed = Vec::with_capacity(items.len());
            for item in items {
                if text(item, "external_version") != Some(FAKE_VERSION) {
                    return bad_request("Unknown external_version");
                }
                let protected = text(item, "protected_data").unwrap_or_default();
                revealed.push(json!({ "data": decrypt(protected) }));
            }
            ok(&json!({ "status": "Success", "data_array": revealed }))
        }
        _ => ("404 Not Found", json!({ "error": "Not found" }).to_string()),
    }
}

fn text<'value>(value: &'value Value, name: &str) -> Option<&'value str> {
    value.get(name).and_then(Value::as_str)
}

fn ok(body: &Value) -> (&'static str, String) {
    ("200 OK", body.to_string())
}

fn bad_request(message: &str) -> (&'static str, String) {
    ("400 Bad Request", json!({ "error": message }).to_string())
}

fn encrypt(plaintext: &str) -> String {
    format!("enc:{}", plaintext.chars().rev().collect::<String>())
}

fn decrypt(ciphertext: &str) -> String {
    ciphertext
        .strip_prefix("enc:")
        .unwrap_or(ciphertext)
        .chars()
        .rev()
        .collect()
}
