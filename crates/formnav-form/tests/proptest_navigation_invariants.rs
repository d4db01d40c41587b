#![forbid(unsafe_code)]

//! Property tests for navigation invariants.
//!
//! - Submit focuses the first invalid field in sequence order, for any order
//!   and any subset of filled fields
//! - Form values keep exactly the sequence's fields under arbitrary writes
//! - Non-confirm keys never move focus or run validation

use formnav_core::event::{KeyCode, KeyEvent};
use formnav_form::{
    ControlId, ControlRegistry, FieldId, FieldKeyEvent, FieldNavigator, FormController,
    KeyOutcome, NavigationSequence, RecordSubmit, SubmitEvent, SubmitOutcome,
};
use pollster::block_on;
use proptest::prelude::*;

fn valid_input(id: FieldId) -> &'static str {
    match id {
        FieldId::FirstName => "Ada",
        FieldId::LastName => "Lovelace",
        FieldId::Gender => "female",
        FieldId::Age => "36",
    }
}

fn any_order() -> impl Strategy<Value = Vec<FieldId>> {
    Just(FieldId::ALL.to_vec()).prop_shuffle()
}

fn nav_for(order: &[FieldId]) -> FieldNavigator<FormController, RecordSubmit> {
    let seq = NavigationSequence::new(order.iter().copied()).expect("valid order");
    FieldNavigator::new(
        seq.clone(),
        FormController::new(seq),
        ControlRegistry::sequential(order.len()),
        RecordSubmit::default(),
    )
    .expect("matching controller")
}

proptest! {
    #[test]
    fn submit_focuses_first_invalid_in_sequence(order in any_order(), filled in prop::collection::vec(any::<bool>(), 4)) {
        let mut nav = nav_for(&order);
        for (index, (&id, &fill)) in order.iter().zip(&filled).enumerate() {
            let value = if fill { valid_input(id) } else { "" };
            let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Char('x')), value);
            block_on(nav.handle_field_key(&mut event, index, id));
        }

        let outcome = block_on(nav.handle_submit(&mut SubmitEvent::new()));

        match filled.iter().position(|f| !f) {
            None => {
                prop_assert_eq!(outcome, SubmitOutcome::Submitted);
                prop_assert_eq!(nav.submit_handler().submissions.len(), 1);
            }
            Some(first) => {
                prop_assert_eq!(
                    outcome,
                    SubmitOutcome::Rejected {
                        first_invalid: Some(order[first]),
                        focused: Some(ControlId::new(first as u32)),
                    }
                );
                prop_assert_eq!(nav.focused(), Some(ControlId::new(first as u32)));
                let expected_errors = filled.iter().filter(|f| !**f).count();
                prop_assert_eq!(nav.errors().len(), expected_errors);
            }
        }
    }

    #[test]
    fn values_keys_match_sequence(order in any_order(), writes in prop::collection::vec((0usize..4, ".{0,8}"), 0..20)) {
        let mut nav = nav_for(&order);
        for (index, raw) in &writes {
            let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Char('x')), raw);
            block_on(nav.handle_field_key(&mut event, *index, order[*index]));
        }
        prop_assert!(nav.values().keys().eq(order.iter().copied()));
    }

    #[test]
    fn non_confirm_keys_never_navigate(index in 0usize..4, ch in any::<char>(), raw in ".{0,8}") {
        let mut nav = nav_for(&FieldId::ALL);
        let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Char(ch)), &raw);
        let outcome = block_on(nav.handle_field_key(&mut event, index, FieldId::ALL[index]));

        prop_assert_eq!(outcome, KeyOutcome::Ignored);
        prop_assert!(!event.is_default_prevented());
        prop_assert_eq!(nav.focus_moves(), 0);
        prop_assert!(nav.controller().trace().is_empty());
    }

    #[test]
    fn confirm_moves_focus_iff_valid(index in 0usize..4, fill in any::<bool>()) {
        let mut nav = nav_for(&FieldId::ALL);
        let id = FieldId::ALL[index];
        let value = if fill { valid_input(id) } else { "   " };
        let mut event = FieldKeyEvent::new(KeyEvent::new(KeyCode::Enter), value);
        let outcome = block_on(nav.handle_field_key(&mut event, index, id));

        prop_assert!(event.is_default_prevented());
        if fill {
            prop_assert_eq!(outcome, KeyOutcome::Advanced(ControlId::new(index as u32 + 1)));
            prop_assert!(nav.errors().get(id).is_none());
        } else {
            prop_assert_eq!(outcome, KeyOutcome::Rejected);
            prop_assert_eq!(nav.errors().get(id), Some(id.required_message()));
        }
    }
}
