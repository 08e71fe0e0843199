//! High-level workflows tying the core layers together.
//!
//! Workflows are the public entry points of the library. Each one takes a
//! [`crate::core::models::system::MolecularSystem`] and a configuration and
//! runs a complete procedure end to end:
//!
//! - [`protonate`] - pH-dependent hydrogen addition across a whole system,
//!   from bond perception through titration-state resolution to geometric
//!   hydrogen construction.

pub mod protonate;
