//! SRS (Spaced Repetition System) library for ZeroBasics
//!
//! This crate provides the mastery update rule applied after every graded answer
//! and the policy used to pick the next question for a student.

pub mod mastery;
pub mod selection;

pub use mastery::{MasteryPolicy, MasteryState, ParsePolicyError};
pub use selection::{Selection, SelectionMode, SelectionReason, select_next};
