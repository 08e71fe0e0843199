//! Chemical knowledge shared across the library.
//!
//! Element identities with their covalent radii, valences, and polarity
//! classes, plus distance-based covalent bond perception for structures
//! that arrive without connectivity.

pub mod elements;
pub mod perception;
