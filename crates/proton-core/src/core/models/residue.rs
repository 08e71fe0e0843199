use super::ids::{AtomId, ChainId};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Classifies a residue by how the protonation engine treats it.
///
/// The classification decides which hydrogen-addition path applies (residue
/// catalog, water geometry, or generic valence fill) and which record type
/// the PDB writer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResidueKind {
    /// One of the 20 standard amino acids known to the residue catalog.
    Protein,
    /// A water molecule (HOH and common synonyms).
    Water,
    /// Any other residue (ligands, ions, modified residues).
    #[default]
    Hetero,
}

impl fmt::Display for ResidueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResidueKind::Protein => "Protein",
                ResidueKind::Water => "Water",
                ResidueKind::Hetero => "Hetero",
            }
        )
    }
}

impl FromStr for ResidueKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "protein" => Ok(ResidueKind::Protein),
            "water" => Ok(ResidueKind::Water),
            "hetero" => Ok(ResidueKind::Hetero),
            _ => Err(()),
        }
    }
}

/// Represents a residue: a named group of atoms within a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// Residue sequence number from the source file.
    pub number: isize,
    /// Insertion code from the source file, if any.
    pub insertion_code: Option<char>,
    /// Name of the residue (e.g. "ALA", "HOH").
    pub name: String,
    /// Classification used by the protonation engine.
    pub kind: ResidueKind,
    /// ID of the parent chain.
    pub chain_id: ChainId,
    /// Atom IDs belonging to this residue, in insertion order.
    pub(crate) atoms: Vec<AtomId>,
    /// Map from atom name to its stable ID.
    atom_name_map: HashMap<String, AtomId>,
}

impl Residue {
    pub(crate) fn new(
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        kind: ResidueKind,
        chain_id: ChainId,
    ) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            kind,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub(crate) fn remove_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.retain(|&id| id != atom_id);
        self.atom_name_map.remove(atom_name);
    }

    /// Returns the atom IDs of this residue in insertion order.
    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Looks up an atom of this residue by its name.
    ///
    /// # Arguments
    ///
    /// * `name` - The atom name to look up (e.g. "CA").
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if an atom with that name exists, otherwise `None`.
    pub fn atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    /// Returns `true` if this residue contains an atom with the given name.
    pub fn has_atom(&self, name: &str) -> bool {
        self.atom_name_map.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let chain_id = dummy_chain_id(1);
        let residue = Residue::new(10, None, "GLY", ResidueKind::Protein, chain_id);
        assert_eq!(residue.number, 10);
        assert_eq!(residue.insertion_code, None);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.kind, ResidueKind::Protein);
        assert_eq!(residue.chain_id, chain_id);
        assert!(residue.atoms().is_empty());
        assert!(residue.atom_id_by_name("CA").is_none());
    }

    #[test]
    fn add_atom_registers_id_and_name() {
        let mut residue = Residue::new(5, None, "ALA", ResidueKind::Protein, dummy_chain_id(2));
        let atom_id = dummy_atom_id(42);
        residue.add_atom("CA", atom_id);
        assert_eq!(residue.atoms(), &[atom_id]);
        assert_eq!(residue.atom_id_by_name("CA"), Some(atom_id));
        assert!(residue.has_atom("CA"));
    }

    #[test]
    fn remove_atom_clears_id_and_name() {
        let mut residue = Residue::new(8, None, "THR", ResidueKind::Protein, dummy_chain_id(3));
        let atom_id = dummy_atom_id(100);
        residue.add_atom("OG1", atom_id);
        residue.remove_atom("OG1", atom_id);
        assert!(residue.atoms().is_empty());
        assert!(!residue.has_atom("OG1"));
    }

    #[test]
    fn remove_atom_ignores_unknown_atom() {
        let mut residue = Residue::new(9, None, "VAL", ResidueKind::Protein, dummy_chain_id(4));
        let atom_id = dummy_atom_id(200);
        residue.add_atom("CG1", atom_id);
        residue.remove_atom("CG2", dummy_atom_id(201));
        assert_eq!(residue.atoms(), &[atom_id]);
    }

    #[test]
    fn residue_kind_from_str_is_case_insensitive() {
        assert_eq!(ResidueKind::from_str("Protein"), Ok(ResidueKind::Protein));
        assert_eq!(ResidueKind::from_str("WATER"), Ok(ResidueKind::Water));
        assert_eq!(ResidueKind::from_str("hetero"), Ok(ResidueKind::Hetero));
        assert!(ResidueKind::from_str("ligand").is_err());
    }

    #[test]
    fn residue_kind_default_is_hetero() {
        assert_eq!(ResidueKind::default(), ResidueKind::Hetero);
    }
}
