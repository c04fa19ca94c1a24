//! Chambers Core — shared domain abstractions.
//!
//! This crate defines the identifier types, session state, error taxonomy,
//! and collaborator traits that the narrative engine crates depend on. It
//! contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod ids;
pub mod repository;
pub mod sink;
pub mod state;
