use super::ids::ResidueId;
use crate::core::chem::elements::Element;
use nalgebra::Point3;

/// Represents a single atom of a molecular structure.
///
/// Carries the identity and per-atom record data needed to protonate a
/// structure and to serialize it back out: the PDB atom name, the chemical
/// element, the 3D position, and the occupancy/temperature-factor columns
/// preserved from the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom name as it appears in the coordinate record (e.g. "CA", "OD2").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The chemical element of the atom.
    pub element: Element,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy from the source record; newly created atoms use 1.0.
    pub occupancy: f64,
    /// Temperature factor from the source record; newly created atoms use 0.0.
    pub temp_factor: f64,
}

impl Atom {
    /// Creates a new `Atom` with full occupancy and a zero temperature factor.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom name.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `element` - The chemical element.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, element: Element, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            residue_id,
            element,
            position,
            occupancy: 1.0,
            temp_factor: 0.0,
        }
    }

    /// Returns `true` if this atom is a hydrogen (or deuterium) atom.
    pub fn is_hydrogen(&self) -> bool {
        self.element == Element::H
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::ResidueId;
    use nalgebra::Point3;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", residue_id, Element::C, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.element, Element::C);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.occupancy, 1.0);
        assert_eq!(atom.temp_factor, 0.0);
    }

    #[test]
    fn is_hydrogen_distinguishes_elements() {
        let residue_id = ResidueId::default();
        let h = Atom::new("HA", residue_id, Element::H, Point3::origin());
        let c = Atom::new("CA", residue_id, Element::C, Point3::origin());
        assert!(h.is_hydrogen());
        assert!(!c.is_hydrogen());
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let residue_id = ResidueId::default();
        let atom1 = Atom::new("N", residue_id, Element::N, Point3::origin());
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
