use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use portal_core::{AuthTokenStore, PortalApi, RequestExecutor, TokenSubscription};
use portal_infra::{HttpClient, HttpRequestExecutor};
use serde_json::{json, Value};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use wiremock::MockServer;

type LogRecord = (Level, String);

/// Executor pointed at `server` with the default timeout.
pub fn executor_for(server: &MockServer, tokens: &AuthTokenStore) -> HttpRequestExecutor {
    HttpRequestExecutor::new(server.uri(), tokens.clone()).expect("executor should build")
}

/// Executor pointed at `server` with a custom timeout.
pub fn executor_with_timeout(
    server: &MockServer,
    tokens: &AuthTokenStore,
    timeout: Duration,
) -> HttpRequestExecutor {
    let http = HttpClient::builder().timeout(timeout).build().expect("http client should build");
    HttpRequestExecutor::with_client(http, server.uri(), tokens.clone())
}

/// Live façade over `server`, returning the shared token store as well.
pub fn live_api(server: &MockServer) -> (PortalApi, AuthTokenStore) {
    let tokens = AuthTokenStore::new();
    let executor: Arc<dyn RequestExecutor> = Arc::new(executor_for(server, &tokens));
    (PortalApi::live(executor, tokens.clone()), tokens)
}

/// Base URL on which nothing listens.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener); // release the port so that requests fail with ECONNREFUSED
    format!("http://{addr}")
}

/// Records every value the store publishes.
pub struct TokenRecorder {
    pub subscription: TokenSubscription,
    seen: Arc<Mutex<Vec<Option<String>>>>,
}

impl TokenRecorder {
    pub fn attach(tokens: &AuthTokenStore) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = tokens.subscribe(move |token| sink.lock().push(token.map(str::to_string)));
        Self { subscription, seen }
    }

    pub fn events(&self) -> Vec<Option<String>> {
        self.seen.lock().clone()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn login_body(token: &str) -> Value {
    json!({
        "token": token,
        "patient": {"id": "p-100", "name": "Test Patient", "email": "patient@example.test"}
    })
}

pub fn labs_body() -> Value {
    json!([
        {
            "id": "lab-1",
            "testName": "Hemoglobin A1c",
            "date": "2025-05-18T09:00:00Z",
            "value": "5.6",
            "unit": "%",
            "referenceRange": "4.0-5.6"
        },
        {
            "id": "lab-2",
            "testName": "LDL Cholesterol",
            "date": "2025-05-02T09:00:00Z",
            "value": "132",
            "unit": "mg/dL",
            "referenceRange": "< 100",
            "flag": "high"
        }
    ])
}

pub fn medications_body() -> Value {
    json!([
        {
            "id": "med-1",
            "name": "Atorvastatin",
            "dose": "20 mg",
            "frequency": "Once daily",
            "status": "active",
            "prescriber": "Dr. Smith",
            "startDate": "2025-02-01T00:00:00Z"
        }
    ])
}

pub fn appointments_body() -> Value {
    json!([
        {
            "id": "appt-1",
            "type": "Primary care follow-up",
            "start": "2025-06-08T15:00:00Z",
            "location": "Clinic A",
            "provider": "Dr. Smith",
            "status": "scheduled"
        },
        {
            "id": "appt-2",
            "type": "Lab draw",
            "start": "2025-05-12T08:00:00Z",
            "location": "Lab B",
            "status": "completed"
        }
    ])
}

pub fn summaries_body() -> Value {
    json!([
        {
            "id": "sum-1",
            "title": "Annual physical",
            "date": "2025-04-02T10:00:00Z",
            "summary": "Reviewed preventive screenings.",
            "followUps": ["Repeat lipid panel in 3 months"]
        }
    ])
}

// ============================================================================
// Log capture
// ============================================================================

/// Handle for inspecting captured tracing events during tests.
///
/// Capture is scoped to the current thread until the handle is dropped.
pub struct LogHandle {
    records: Arc<Mutex<Vec<LogRecord>>>,
    _guard: DefaultGuard,
}

impl LogHandle {
    /// Return all captured events as `(level, "message field=value ...")`.
    pub fn entries(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Check whether an event at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries().into_iter().any(|(lvl, msg)| lvl == level && msg.contains(needle))
    }

    /// Check whether any event, at any level, contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.entries().into_iter().any(|(_, msg)| msg.contains(needle))
    }
}

struct CaptureLayer {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

#[derive(Default)]
struct FieldCollector(String);

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        if field.name() == "message" {
            self.0.push_str(&format!("{value:?}"));
        } else {
            self.0.push_str(&format!("{}={value:?}", field.name()));
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        self.records.lock().push((*event.metadata().level(), collector.0));
    }
}

/// Install a thread-local capturing subscriber (TRACE and above).
pub fn capture_logs() -> LogHandle {
    let records = Arc::new(Mutex::new(Vec::new()));
    let subscriber =
        tracing_subscriber::registry().with(CaptureLayer { records: Arc::clone(&records) });
    let guard = tracing::subscriber::set_default(subscriber);
    LogHandle { records, _guard: guard }
}
