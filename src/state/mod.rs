//! State module for tracking traversal progress
//!
//! A coordinator moves through `Idle → Running → {Completed, Aborted}` exactly
//! once; [`TraversalState`] encodes the legal transitions.

mod traversal_state;

pub use traversal_state::TraversalState;
