#![forbid(unsafe_code)]

//! Downstream submit handlers.

use crate::values::FormValues;

/// Receives the form values once every field passed validation.
pub trait SubmitHandler {
    fn submit(&mut self, values: &FormValues);
}

impl<F: FnMut(&FormValues)> SubmitHandler for F {
    fn submit(&mut self, values: &FormValues) {
        self(values);
    }
}

/// Logs the submitted values as JSON at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSubmit;

impl SubmitHandler for LogSubmit {
    fn submit(&mut self, values: &FormValues) {
        let span = formnav_core::info_span!("submit", fields = values.len());
        let _guard = span.enter();
        let data = values.to_json();
        formnav_core::info!(%data, "form submitted");
        #[cfg(not(feature = "tracing"))]
        let _ = data;
    }
}

/// Keeps every submission, newest last.
#[derive(Debug, Clone, Default)]
pub struct RecordSubmit {
    pub submissions: Vec<FormValues>,
}

impl SubmitHandler for RecordSubmit {
    fn submit(&mut self, values: &FormValues) {
        self.submissions.push(values.clone());
    }
}
