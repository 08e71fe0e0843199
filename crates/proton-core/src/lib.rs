//! # ProtoPDB Core Library
//!
//! A library for pH-dependent protonation of molecular structures in PDB
//! format: read a structure, add hydrogens according to an ionization model
//! at a chosen pH, and write the result back out.
//!
//! ## Architectural Philosophy
//!
//! The library keeps a strict two-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models
//!   ([`core::models::system::MolecularSystem`]), chemical knowledge
//!   (elements, bond perception, the residue catalog with its titratable
//!   sites), hydrogen placement geometry, and file I/O.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built from the
//!   foundation. [`workflows::protonate`] is the main entry point: it
//!   perceives connectivity, resolves every titratable site against the
//!   target pH, and constructs hydrogen positions in place.
//!
//! ## Example
//!
//! ```ignore
//! use protopdb::core::io::{pdb::PdbFile, traits::StructureFile};
//! use protopdb::core::protonation::config::ProtonationConfig;
//! use protopdb::workflows::protonate;
//!
//! let (mut system, metadata) = PdbFile::read_from_path("input.pdb")?;
//! protonate::run(&mut system, &ProtonationConfig::at_ph(7.4))?;
//! PdbFile::write_to_path(&system, &metadata, "output.pdb")?;
//! ```

pub mod core;
pub mod workflows;
