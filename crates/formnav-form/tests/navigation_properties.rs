#![forbid(unsafe_code)]

//! End-to-end navigation and submission behavior.
//!
//! Each test drives a navigator the way a rendering surface would: key
//! events carry the control's current text, submit events come from the
//! submit control.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use formnav_core::event::{KeyCode, KeyEvent};
use formnav_form::validation::ValidationScope;
use formnav_form::{
    ControlId, ControlRegistry, FieldErrors, FieldId, FieldKeyEvent, FieldNavigator, FieldValue,
    FormController, FormValues, KeyOutcome, NavigationSequence, RecordSubmit, SubmitEvent,
    SubmitKeyEvent, SubmitOutcome, ValidationCapability,
};
use pollster::block_on;

const ENTER: KeyEvent = KeyEvent::new(KeyCode::Enter);

type Nav = FieldNavigator<FormController, RecordSubmit>;

fn standard() -> Nav {
    FieldNavigator::standard(RecordSubmit::default())
}

fn key(nav: &mut Nav, code: KeyCode, index: usize, value: &str) -> KeyOutcome {
    let field = nav.sequence().get(index).expect("index in sequence");
    let mut event = FieldKeyEvent::new(KeyEvent::new(code), value);
    block_on(nav.handle_field_key(&mut event, index, field))
}

fn enter(nav: &mut Nav, index: usize, value: &str) -> KeyOutcome {
    key(nav, KeyCode::Enter, index, value)
}

fn control(n: u32) -> ControlId {
    ControlId::new(n)
}

// ============================================================================
// Confirm key on a single field
// ============================================================================

#[test]
fn empty_required_field_keeps_focus_and_reports() {
    for (index, field) in NavigationSequence::default().iter().enumerate() {
        let mut nav = standard();
        nav.focus_control(control(index as u32));

        let outcome = enter(&mut nav, index, "");

        assert_eq!(outcome, KeyOutcome::Rejected, "{field}");
        assert_eq!(nav.focused(), Some(control(index as u32)), "{field}");
        let message = nav.errors().get(field).unwrap_or_default();
        assert!(!message.is_empty(), "{field} should carry an error");
    }
}

#[test]
fn valid_field_advances_to_next_or_submit() {
    let inputs = ["Ada", "Lovelace", "female", "36"];
    for (index, value) in inputs.iter().enumerate() {
        let mut nav = standard();
        let outcome = enter(&mut nav, index, value);
        let expected = control(index as u32 + 1);
        assert_eq!(outcome, KeyOutcome::Advanced(expected), "field {index}");
        assert_eq!(nav.focused(), Some(expected));
    }
    assert_eq!(standard().registry().submit(), Some(control(4)));
}

#[test]
fn revalidating_valid_field_is_idempotent_and_does_not_move_focus() {
    let mut nav = standard();
    enter(&mut nav, 0, "Ada");
    assert_eq!(nav.focused(), Some(control(1)));
    let moves = nav.focus_moves();

    for _ in 0..3 {
        assert!(block_on(nav.validate_field(FieldId::FirstName)));
    }

    assert_eq!(nav.focused(), Some(control(1)));
    assert_eq!(nav.focus_moves(), moves);
    assert!(nav.errors().get(FieldId::FirstName).is_none());
}

#[test]
fn other_keys_on_submit_control_do_nothing() {
    let mut nav = standard();
    nav.focus_control(control(4));
    let moves = nav.focus_moves();
    let mut event = SubmitKeyEvent::new(KeyEvent::new(KeyCode::Tab));

    assert_eq!(block_on(nav.handle_submit_key(&mut event)), None);
    assert!(!event.is_default_prevented());
    assert_eq!(nav.focus_moves(), moves);
    assert!(nav.controller().trace().is_empty());
}

#[test]
fn validate_one_directly_leaves_focus_alone() {
    let mut controller = FormController::new(NavigationSequence::default());
    controller.set_value(FieldId::LastName, "Lovelace");
    assert!(block_on(controller.validate_one(FieldId::LastName)));
    assert!(block_on(controller.validate_one(FieldId::LastName)));
    assert!(controller.errors().is_empty());
}

#[test]
fn typing_is_never_consumed() {
    let mut nav = standard();
    for (i, prefix) in ["A", "Ad", "Ada"].iter().enumerate() {
        let ch = prefix.chars().last().unwrap();
        let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Char(ch)), prefix);
        let outcome = block_on(nav.handle_field_key(&mut event, 0, FieldId::FirstName));
        assert_eq!(outcome, KeyOutcome::Ignored, "keystroke {i}");
        assert!(!event.is_default_prevented());
    }
    assert_eq!(nav.focused(), Some(control(0)));
    assert_eq!(
        nav.values().get(FieldId::FirstName),
        Some(&FieldValue::Text("Ada".into()))
    );
}

// ============================================================================
// Whole-form submit
// ============================================================================

#[test]
fn submitting_empty_form_focuses_first_name() {
    let mut nav = standard();
    nav.focus_control(control(4));

    let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            first_invalid: Some(FieldId::FirstName),
            focused: Some(control(0)),
        }
    );
    assert_eq!(nav.focused(), Some(control(0)));
    assert_eq!(nav.errors().len(), 4);
    for field in FieldId::ALL {
        assert_eq!(nav.errors().get(field), Some(field.required_message()));
    }
    assert_eq!(nav.submission_count(), 0);
}

#[test]
fn complete_form_submits_once_via_submit_key() {
    let mut nav = standard();
    for (index, value) in ["Ada", "Lovelace", "female", "36"].iter().enumerate() {
        enter(&mut nav, index, value);
    }
    assert_eq!(nav.focused(), Some(control(4)));

    let mut event = SubmitKeyEvent::new(ENTER);
    let outcome = block_on(nav.handle_submit_key(&mut event));

    assert_eq!(outcome, Some(SubmitOutcome::Submitted));
    assert!(event.is_default_prevented());
    let submissions = &nav.submit_handler().submissions;
    assert_eq!(submissions.len(), 1);
    assert_eq!(
        submissions[0].to_json(),
        r#"{"firstName":"Ada","lastName":"Lovelace","gender":"female","age":36}"#
    );
    assert!(nav.errors().is_empty());
    assert_eq!(nav.last_submitted(), Some(&submissions[0]));
}

#[test]
fn first_invalid_is_by_sequence_not_first_field() {
    let mut nav = standard();
    key(&mut nav, KeyCode::Char('a'), 0, "Ada");

    let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            first_invalid: Some(FieldId::LastName),
            focused: Some(control(1)),
        }
    );
    assert!(nav.errors().get(FieldId::FirstName).is_none());
    for field in [FieldId::LastName, FieldId::Gender, FieldId::Age] {
        assert!(nav.errors().contains(field), "{field}");
    }
}

#[test]
fn custom_order_picks_first_invalid_in_that_order() {
    let seq =
        NavigationSequence::new([FieldId::Age, FieldId::Gender, FieldId::LastName, FieldId::FirstName])
            .unwrap();
    let controller = FormController::new(seq.clone());
    let mut nav = FieldNavigator::new(
        seq,
        controller,
        ControlRegistry::sequential(4),
        RecordSubmit::default(),
    )
    .unwrap();
    let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Char('6')), "36");
    block_on(nav.handle_field_key(&mut event, 0, FieldId::Age));

    let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));

    // Gender sorts after both names in the error map, but comes first here.
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            first_invalid: Some(FieldId::Gender),
            focused: Some(control(1)),
        }
    );
}

#[test]
fn non_numeric_age_is_rejected_as_required() {
    let mut nav = standard();
    for (index, value) in ["Ada", "Lovelace", "female"].iter().enumerate() {
        enter(&mut nav, index, value);
    }
    assert_eq!(enter(&mut nav, 3, "thirty-six"), KeyOutcome::Rejected);
    assert_eq!(nav.errors().get(FieldId::Age), Some("Age is required"));

    let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            first_invalid: Some(FieldId::Age),
            focused: Some(control(3)),
        }
    );
    assert_eq!(nav.submission_count(), 0);
}

#[test]
fn missing_control_for_invalid_field_does_not_move_focus() {
    let mut registry = ControlRegistry::new();
    registry.push_field(control(0));
    registry.set_submit(control(9));
    let seq = NavigationSequence::default();
    let mut nav = FieldNavigator::new(
        seq.clone(),
        FormController::new(seq),
        registry,
        RecordSubmit::default(),
    )
    .unwrap();
    key(&mut nav, KeyCode::Char('a'), 0, "Ada");
    nav.focus_control(control(9));

    let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));

    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            first_invalid: Some(FieldId::LastName),
            focused: None,
        }
    );
    assert_eq!(nav.focused(), Some(control(9)));
}

#[test]
fn fixing_errors_then_resubmitting_clears_slots() {
    let mut nav = standard();
    block_on(nav.handle_submit(&mut SubmitEvent::new()));
    assert_eq!(nav.errors().len(), 4);

    for (index, value) in ["Ada", "Lovelace", "male", "40"].iter().enumerate() {
        assert!(matches!(enter(&mut nav, index, value), KeyOutcome::Advanced(_)));
    }
    assert!(nav.errors().is_empty());

    let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));
    assert!(outcome.is_submitted());
    let scopes: Vec<_> = nav.controller().trace().outcomes().collect();
    assert_eq!(scopes.first(), Some(&(ValidationScope::All, false)));
    assert_eq!(scopes.last(), Some(&(ValidationScope::All, true)));
}

// ============================================================================
// Suspending validation capability
// ============================================================================

/// Returns `Pending` once before resolving, like a validator that waits on
/// the event loop.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Wraps the stock controller and suspends before every validation.
struct SlowController {
    inner: FormController,
    suspensions: usize,
}

impl ValidationCapability for SlowController {
    fn set_value(&mut self, field: FieldId, raw: &str) -> bool {
        self.inner.set_value(field, raw)
    }

    async fn validate_one(&mut self, field: FieldId) -> bool {
        YieldOnce(false).await;
        self.suspensions += 1;
        self.inner.validate_one(field).await
    }

    async fn validate_all(&mut self) -> bool {
        YieldOnce(false).await;
        self.suspensions += 1;
        self.inner.validate_all().await
    }

    fn errors(&self) -> &FieldErrors {
        self.inner.errors()
    }

    fn values(&self) -> &FormValues {
        self.inner.values()
    }
}

#[test]
fn handlers_resume_after_suspended_validation() {
    let seq = NavigationSequence::default();
    let slow = SlowController {
        inner: FormController::new(seq.clone()),
        suspensions: 0,
    };
    let mut submitted = Vec::new();
    {
        let mut nav = FieldNavigator::new(
            seq,
            slow,
            ControlRegistry::sequential(4),
            |v: &FormValues| submitted.push(v.to_json()),
        )
        .unwrap();

        let mut event = FieldKeyEvent::new(ENTER, "Ada");
        let outcome = block_on(nav.handle_field_key(&mut event, 0, FieldId::FirstName));
        assert_eq!(outcome, KeyOutcome::Advanced(control(1)));

        let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected {
                first_invalid: Some(FieldId::LastName),
                focused: Some(control(1)),
            }
        );
        assert_eq!(nav.controller().suspensions, 2);
    }
    assert!(submitted.is_empty());
}
