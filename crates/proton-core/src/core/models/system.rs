use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueKind};
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

/// Represents a complete molecular system with atoms, residues, chains, and bonds.
///
/// This is the central data structure of the library. Atoms, residues, and
/// chains live in slot maps so that IDs stay valid across removals, and the
/// bond list is mirrored by a cached adjacency map for neighbor queries.
/// All mutating operations keep the caches consistent.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    bonds: Vec<Bond>,
    /// Lookup map for finding residues by chain, sequence number, and insertion code.
    residue_id_map: HashMap<(ChainId, isize, Option<char>), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Retrieves a mutable reference to an atom by its ID.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(id)
    }

    /// Returns an iterator over all atoms in the system.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Returns the number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves a mutable reference to a residue by its ID.
    pub fn residue_mut(&mut self, id: ResidueId) -> Option<&mut Residue> {
        self.residues.get_mut(id)
    }

    /// Returns an iterator over all residues in the system.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in the system.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    /// Returns a slice of all bonds in the system.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue by chain, sequence number, and insertion code.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain containing the residue.
    /// * `number` - The residue sequence number.
    /// * `insertion_code` - The insertion code, if any.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if the residue exists, otherwise `None`.
    pub fn find_residue(
        &self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, number, insertion_code))
            .copied()
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        *self.chain_id_map.entry(id).or_insert_with(|| {
            let chain = Chain::new(id, chain_type);
            self.chains.insert(chain)
        })
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// This method is idempotent with respect to the (chain, number,
    /// insertion code) key.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to add the residue to.
    /// * `number` - The residue sequence number.
    /// * `insertion_code` - The insertion code, if any.
    /// * `name` - The name of the residue.
    /// * `kind` - The classification of the residue.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (e.g. if the
    /// chain does not exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        kind: ResidueKind,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number, insertion_code);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(number, insertion_code, name, kind, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// The atom is inserted into the system, registered with the residue, and
    /// given an empty adjacency entry.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (e.g. if the
    /// residue does not exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        let name = atom.name.clone();

        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());

        let residue = self.residues.get_mut(residue_id).unwrap();
        residue.add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Idempotent; adding an existing bond succeeds without creating
    /// duplicates.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (e.g. if either
    /// atom does not exist).
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if !self.atoms.contains_key(atom1_id) || !self.atoms.contains_key(atom2_id) {
            return None;
        }

        if let Some(neighbors) = self.bond_adjacency.get(atom1_id) {
            if neighbors.contains(&atom2_id) {
                return Some(());
            }
        }

        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    /// Removes an atom from the system.
    ///
    /// Removes the atom together with its bonds and adjacency entries, and
    /// unregisters it from the parent residue.
    ///
    /// # Return
    ///
    /// Returns `Some(Atom)` if the atom existed and was removed, otherwise `None`.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> Option<Atom> {
        let atom = self.atoms.remove(atom_id)?;

        if let Some(residue) = self.residues.get_mut(atom.residue_id) {
            residue.remove_atom(&atom.name, atom_id);
        }

        let original_bonds = std::mem::take(&mut self.bonds);
        self.bonds = original_bonds
            .into_iter()
            .filter(|bond| !bond.contains(atom_id))
            .collect();

        let neighbors = self.bond_adjacency.remove(atom_id).unwrap_or_default();
        for neighbor_id in neighbors {
            if let Some(adjacency) = self.bond_adjacency.get_mut(neighbor_id) {
                adjacency.retain(|&id| id != atom_id);
            }
        }

        Some(atom)
    }

    /// Retrieves the bonded neighbors of an atom from the adjacency cache.
    pub fn bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Returns the bonded neighbors of an atom that are not hydrogens.
    pub fn heavy_neighbors(&self, atom_id: AtomId) -> Vec<AtomId> {
        self.bonded_neighbors(atom_id)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .copied()
                    .filter(|&id| self.atoms.get(id).is_some_and(|a| !a.is_hydrogen()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the sum of valence units of all bonds attached to an atom.
    pub fn bonded_valence(&self, atom_id: AtomId) -> u8 {
        self.bonds
            .iter()
            .filter(|bond| bond.contains(atom_id))
            .map(|bond| bond.order.valence_units())
            .sum()
    }
}
