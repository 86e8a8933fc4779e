//! Domain model and pure algorithms for the quiz engine: questions, selection of a
//! question set, and scoring.

#![forbid(unsafe_code)]

pub mod model;
pub mod selector;
pub mod time;

pub use time::Clock;
