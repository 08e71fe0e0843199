//! Input/output for molecular structure file formats.
//!
//! A trait-based interface ([`traits::StructureFile`]) with a PDB
//! implementation ([`pdb::PdbFile`]). Formats parse into the shared
//! [`crate::core::models::system::MolecularSystem`] plus format-specific
//! metadata that survives a read-modify-write cycle.

pub mod pdb;
pub mod traits;
