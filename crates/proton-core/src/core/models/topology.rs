use super::ids::AtomId;

/// Multiplicity of a covalent bond.
///
/// PDB files carry no order information, so perceived and CONECT-derived
/// bonds are `Single`; the other variants exist for callers that construct
/// systems programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Returns the integer valence contribution of this bond order.
    ///
    /// Aromatic bonds count as one; the generic valence fill treats ring
    /// systems conservatively.
    pub fn valence_units(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// A covalent bond between two atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Self {
        Self {
            atom1_id,
            atom2_id,
            order,
        }
    }

    /// Returns `true` if the bond involves the given atom.
    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.atom1_id == atom_id || self.atom2_id == atom_id
    }

    /// Returns the atom on the other end of the bond, if `atom_id` is part of it.
    pub fn partner(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.atom1_id == atom_id {
            Some(self.atom2_id)
        } else if self.atom2_id == atom_id {
            Some(self.atom1_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn bond_order_default_is_single() {
        assert_eq!(BondOrder::default(), BondOrder::Single);
    }

    #[test]
    fn valence_units_counts_multiplicity() {
        assert_eq!(BondOrder::Single.valence_units(), 1);
        assert_eq!(BondOrder::Double.valence_units(), 2);
        assert_eq!(BondOrder::Triple.valence_units(), 3);
        assert_eq!(BondOrder::Aromatic.valence_units(), 1);
    }

    #[test]
    fn bond_contains_returns_true_for_both_atoms() {
        let a1 = dummy_atom_id(10);
        let a2 = dummy_atom_id(20);
        let bond = Bond::new(a1, a2, BondOrder::Single);
        assert!(bond.contains(a1));
        assert!(bond.contains(a2));
        assert!(!bond.contains(dummy_atom_id(30)));
    }

    #[test]
    fn partner_returns_opposite_atom() {
        let a1 = dummy_atom_id(1);
        let a2 = dummy_atom_id(2);
        let bond = Bond::new(a1, a2, BondOrder::Single);
        assert_eq!(bond.partner(a1), Some(a2));
        assert_eq!(bond.partner(a2), Some(a1));
        assert_eq!(bond.partner(dummy_atom_id(3)), None);
    }
}
