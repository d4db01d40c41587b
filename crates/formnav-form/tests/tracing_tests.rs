#![forbid(unsafe_code)]

//! Logging integration tests.
//!
//! Events enabled:
//!   cargo test -p formnav-form --features tracing --test tracing_tests
//!
//! Without the feature only the no-op check runs.

use std::sync::{Arc, Mutex};

use formnav_core::event::{KeyCode, KeyEvent};
use formnav_form::{
    ControlId, ControlRegistry, FieldId, FieldKeyEvent, FieldNavigator, FormController,
    NavigationSequence, RecordSubmit, SubmitEvent,
};
use pollster::block_on;
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
}

/// A tracing Layer that keeps every event's level and message.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn nav_missing_controls() -> FieldNavigator<FormController, RecordSubmit> {
    let mut registry = ControlRegistry::new();
    registry.push_field(ControlId::new(0));
    let seq = NavigationSequence::default();
    FieldNavigator::new(seq.clone(), FormController::new(seq), registry, RecordSubmit::default())
        .unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(feature = "tracing")]
#[test]
fn missing_control_is_logged_as_warning() {
    let events = capture(|| {
        let mut nav = nav_missing_controls();
        let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Char('a')), "Ada");
        block_on(nav.handle_field_key(&mut event, 0, FieldId::FirstName));
        block_on(nav.handle_submit(&mut SubmitEvent::new()));
    });

    assert!(
        events
            .iter()
            .any(|e| e.level == tracing::Level::WARN
                && e.message.contains("no control registered")),
        "expected a warning, got {events:?}"
    );
}

#[cfg(feature = "tracing")]
#[test]
fn successful_submit_is_logged_at_info() {
    let events = capture(|| {
        let mut nav = FieldNavigator::standard(formnav_form::LogSubmit);
        for (index, value) in ["Ada", "Lovelace", "female", "36"].iter().enumerate() {
            let id = nav.sequence().get(index).unwrap();
            let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Enter), value);
            block_on(nav.handle_field_key(&mut event, index, id));
        }
        block_on(nav.handle_submit(&mut SubmitEvent::new()));
    });

    let infos: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::INFO)
        .collect();
    assert!(infos.iter().any(|e| e.message.contains("form submitted")));
}

#[cfg(not(feature = "tracing"))]
#[test]
fn zero_overhead_without_feature() {
    let events = capture(|| {
        let mut nav = nav_missing_controls();
        let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Enter), "Ada");
        block_on(nav.handle_field_key(&mut event, 0, FieldId::FirstName));
        block_on(nav.handle_submit(&mut SubmitEvent::new()));
    });
    assert!(events.is_empty());
}
