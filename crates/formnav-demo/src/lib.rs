#![forbid(unsafe_code)]

//! Terminal front end for the keyboard-driven form.

pub mod app;
pub mod cli;
pub mod terminal;
