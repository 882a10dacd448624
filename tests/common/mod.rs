//! Common test helpers: an in-memory host and a capturing reporter.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use lsp_digest::client::ClientName;
use lsp_digest::error::{Error, Result};
use lsp_digest::host::{HostBridge, HostKind, LocationRequest, LocationResponse, Reporter};
use serde_json::Value;

/// Helper to get a fixture file path
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// In-memory [`HostBridge`] that counts every call it answers.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub kind: HostKind,
    pub backends: HashMap<(ClientName, Option<u32>), Value>,
    pub uris: HashMap<u32, String>,
    pub locations: Option<Vec<LocationResponse>>,
    pub fail_backend: bool,
    pub stall_backend: bool,
    pub requests: Mutex<Vec<LocationRequest>>,
    calls: AtomicUsize,
}

impl FakeHost {
    pub fn new(kind: HostKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Registers the raw answer of `client` for `buf_nr`.
    pub fn with_backend(mut self, client: ClientName, buf_nr: Option<u32>, raw: Value) -> Self {
        self.backends.insert((client, buf_nr), raw);
        self
    }

    pub fn with_uri(mut self, buf_nr: u32, uri: &str) -> Self {
        self.uris.insert(buf_nr, uri.to_string());
        self
    }

    pub fn with_locations(mut self, responses: Vec<LocationResponse>) -> Self {
        self.locations = Some(responses);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_backend = true;
        self
    }

    /// Backend queries never complete.
    pub fn stalled(mut self) -> Self {
        self.stall_backend = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl HostBridge for FakeHost {
    fn host_kind(&self) -> HostKind {
        self.kind
    }

    async fn query_backend(&self, client: ClientName, buf_nr: Option<u32>) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.stall_backend {
            std::future::pending::<()>().await;
        }
        if self.fail_backend {
            return Err(Error::backend(client.as_str(), "backend unavailable"));
        }
        Ok(self
            .backends
            .get(&(client, buf_nr))
            .cloned()
            .unwrap_or(Value::Null))
    }

    async fn resolve_file_uri(&self, buf_nr: u32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.uris
            .get(&buf_nr)
            .cloned()
            .ok_or_else(|| Error::backend("buffers", format!("buffer {buf_nr} has no file")))
    }

    async fn query_locations(
        &self,
        request: &LocationRequest,
    ) -> Result<Option<Vec<LocationResponse>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if self.fail_backend {
            return Err(Error::backend("locations", "request failed"));
        }
        Ok(self.locations.clone())
    }
}

/// [`Reporter`] that records everything it is told.
#[derive(Debug, Default)]
pub struct CapturingReporter {
    pub errors: Mutex<Vec<(String, String)>>,
    pub warnings: Mutex<Vec<(String, String)>>,
}

impl CapturingReporter {
    pub fn errors(&self) -> Vec<(String, String)> {
        self.errors.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<(String, String)> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Reporter for CapturingReporter {
    fn error(&self, subsystem: &str, error: &Error) {
        self.errors
            .lock()
            .unwrap()
            .push((subsystem.to_string(), error.to_string()));
    }

    fn warn(&self, subsystem: &str, message: &str) {
        self.warnings
            .lock()
            .unwrap()
            .push((subsystem.to_string(), message.to_string()));
    }
}

/// A response carrying `result` from client `source_id`.
pub fn response(source_id: &str, result: Value) -> LocationResponse {
    LocationResponse {
        source_id: source_id.to_string(),
        result,
    }
}
