//! Shared test mocks and utilities for the Chambers narrative engine.

mod clock;
mod repository;
mod sink;

pub use clock::FixedClock;
pub use repository::{FailingStateRepository, InMemoryStateRepository, StaleStateRepository};
pub use sink::{FailingProgressSink, RecordingProgressSink};
