//! In-memory capture of log events for tests
//!
//! The layer records every event with its fields as strings. Spans are not
//! recorded, so assertions look at event fields only.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use dbmigrate_core_types::schema::{
    FIELD_ERR_CODE, FIELD_EVENT, FIELD_MESSAGE, FIELD_OP, FIELD_VERSION,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub version: Option<String>,
    pub err_code: Option<String>,
    /// Every field, including the ones above
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(level: Level, fields: HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned();
        Self {
            level,
            message: get(FIELD_MESSAGE),
            op: get(FIELD_OP),
            event: get(FIELD_EVENT),
            version: get(FIELD_VERSION),
            err_code: get(FIELD_ERR_CODE),
            fields,
        }
    }

    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct StringFields(HashMap<String, String>);

impl Visit for StringFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Subscriber layer writing into a `TestCapture` buffer
pub struct TestCaptureLayer {
    buffer: Buffer,
}

impl TestCaptureLayer {
    /// A layer and the handle reading what it records
    pub fn new() -> (Self, TestCapture) {
        let buffer = Buffer::default();
        (
            Self {
                buffer: Arc::clone(&buffer),
            },
            TestCapture { buffer },
        )
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = StringFields::default();
        event.record(&mut fields);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), fields.0);

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(captured);
        }
    }
}

/// Read side of the capture buffer
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Snapshot of every event recorded so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }

    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op.as_deref() == Some(op))
            .collect()
    }

    /// Versions carried by events with the given message, in emission order
    ///
    /// `versions_logged("applying migration")` gives the apply order.
    pub fn versions_logged(&self, message: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.message.as_deref() == Some(message))
            .filter_map(|e| e.version)
            .collect()
    }

    /// # Panics
    ///
    /// Panics if no event has this op and event name
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no op={} event={} among {} captured events",
            op,
            event,
            events.len()
        );
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (first call only)
///
/// Every test in one binary shares the buffer; filter on an op name or a
/// version no other test uses.
///
/// ```
/// use dbmigrate_core::logging_facility::test_capture::init_test_capture;
/// use dbmigrate_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).try_init().ok();
            capture
        })
        .clone()
}
