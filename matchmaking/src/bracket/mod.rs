//! Single-elimination bracket generation.
//!
//! This module provides the bracket data model and the builder that turns a
//! player pool into an initial bracket:
//! - [`entities`]: stages, participants, opponent slots, and matches, with
//!   their wire (serde) representations
//! - [`build`] / [`build_named`]: the pure bracket builder
//!
//! The builder has no dependency on the rest of the crate and no side
//! effects; it can be called repeatedly to produce preview brackets without
//! touching shared state.

pub mod entities;

mod builder;

pub use builder::{DEFAULT_STAGE_NAME, build, build_named};
