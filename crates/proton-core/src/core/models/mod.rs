//! Fundamental data structures for representing molecular systems.
//!
//! The models form the foundation the rest of the library builds on: atoms,
//! residues, and chains stored in slot maps with stable IDs, plus bond
//! topology with a cached adjacency view. Most operations start by
//! constructing or mutating a [`system::MolecularSystem`].

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
pub mod topology;
