//! Foundation layer of the library.
//!
//! Stateless building blocks with no orchestration logic of their own:
//!
//! - **Molecular representation** ([`models`]) - atoms, residues, chains,
//!   bonds, and the system that holds them together
//! - **Chemical knowledge** ([`chem`]) - element parameters and covalent
//!   bond perception
//! - **File I/O** ([`io`]) - the structure-file trait and the PDB codec
//! - **Protonation building blocks** ([`protonation`]) - the residue
//!   catalog, titration rules, and hydrogen placement geometry
//! - **Math utilities** ([`utils`]) - direction constructions shared by the
//!   placement code

pub mod chem;
pub mod io;
pub mod models;
pub mod protonation;
pub mod utils;
