//! Common test utilities for cookbook integration tests

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use tempfile::TempDir;

/// A temporary cook-book for integration tests
pub struct TestCookbook {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to cook-book root
    pub path: PathBuf,
}

impl TestCookbook {
    /// Create an empty cook-book
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write `recipes/<name>/<name>.json`
    pub fn write_recipe(&self, name: &str, content: &str) {
        self.write_file(&format!("recipes/{name}/{name}.json"), content);
    }

    /// Read `recipes/<name>/<name>.json`
    pub fn read_recipe(&self, name: &str) -> String {
        self.read_file(&format!("recipes/{name}/{name}.json"))
    }

    /// Parsed `recipes/<name>/<name>.json`
    #[allow(dead_code)]
    pub fn recipe_json(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(&self.read_recipe(name)).expect("Recipe is not valid JSON")
    }

    /// Write a file in the cook-book
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the cook-book
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }
}

impl Default for TestCookbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal HTTP/1.1 server on loopback serving fixed bodies
///
/// Unknown paths get a 404. Every request is counted per path.
#[allow(dead_code)]
pub struct FixtureServer {
    port: u16,
    hits: Arc<Mutex<HashMap<String, usize>>>,
}

#[allow(dead_code)]
impl FixtureServer {
    pub fn start(routes: &[(&str, &[u8])]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fixture server");
        let port = listener.local_addr().expect("No local address").port();
        let routes: Arc<HashMap<String, Vec<u8>>> = Arc::new(
            routes
                .iter()
                .map(|(path, body)| ((*path).to_string(), body.to_vec()))
                .collect(),
        );
        let hits = Arc::new(Mutex::new(HashMap::new()));

        let server_hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&server_hits);
                thread::spawn(move || serve(stream, &routes, &hits));
            }
        });

        Self { port, hits }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().unwrap().values().sum()
    }
}

fn serve(
    stream: TcpStream,
    routes: &HashMap<String, Vec<u8>>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let mut reader = BufReader::new(stream.try_clone().expect("Failed to clone stream"));
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers up to the blank line
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => {}
        }
    }

    let path = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    *hits.lock().unwrap().entry(path.clone()).or_default() += 1;

    let (status, body): (&str, &[u8]) = match routes.get(&path) {
        Some(body) => ("200 OK", body),
        None => ("404 Not Found", b"not found"),
    };
    let mut stream = stream;
    let head = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}

/// SHA-256 of `bytes` as lowercase hex, computed independently of the binary
#[allow(dead_code)]
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    format!("{:x}", Sha256::digest(bytes))
}
