use super::elements::Element;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use std::collections::HashMap;

/// Extra margin on top of the covalent radii sum when deciding whether two
/// atoms are bonded, in Angstroms.
const BOND_TOLERANCE: f64 = 0.45;

/// Pairs closer than this are treated as coordinate noise, not bonds.
const MIN_BOND_DISTANCE: f64 = 0.4;

/// Infers covalent bonds from interatomic distances.
///
/// Two heavy atoms are considered bonded when their separation lies between
/// [`MIN_BOND_DISTANCE`] and the sum of their covalent radii plus
/// [`BOND_TOLERANCE`]. Hydrogen-hydrogen pairs are never bonded, and bonds
/// already present in the system (e.g. from CONECT records) are kept as-is;
/// the perception pass only adds what is missing.
///
/// Candidate pairs come from a uniform spatial grid, so the cost stays linear
/// in the number of atoms for ordinary structures.
///
/// # Arguments
///
/// * `system` - The system to perceive bonds for; mutated in place.
///
/// # Return
///
/// The number of bonds added.
pub fn perceive_bonds(system: &mut MolecularSystem) -> usize {
    let atoms: Vec<(AtomId, Element, Point3<f64>)> = system
        .atoms_iter()
        .map(|(id, atom)| (id, atom.element, atom.position))
        .collect();

    if atoms.len() < 2 {
        return 0;
    }

    let max_radius = atoms
        .iter()
        .map(|(_, element, _)| element.covalent_radius())
        .fold(0.0_f64, f64::max);
    let cell_size = 2.0 * max_radius + BOND_TOLERANCE;

    let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    for (index, (_, _, position)) in atoms.iter().enumerate() {
        grid.entry(cell_of(position, cell_size)).or_default().push(index);
    }

    let mut added = 0;
    for (index, (atom_id, element, position)) in atoms.iter().enumerate() {
        let (cx, cy, cz) = cell_of(position, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(cell) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &other_index in cell {
                        if other_index <= index {
                            continue;
                        }
                        let (other_id, other_element, other_position) = &atoms[other_index];
                        if *element == Element::H && *other_element == Element::H {
                            continue;
                        }

                        let cutoff =
                            element.covalent_radius() + other_element.covalent_radius() + BOND_TOLERANCE;
                        let distance_sq = (position - other_position).norm_squared();
                        if distance_sq > cutoff * cutoff
                            || distance_sq < MIN_BOND_DISTANCE * MIN_BOND_DISTANCE
                        {
                            continue;
                        }

                        let already_bonded = system
                            .bonded_neighbors(*atom_id)
                            .is_some_and(|n| n.contains(other_id));
                        if !already_bonded
                            && system.add_bond(*atom_id, *other_id, BondOrder::Single).is_some()
                        {
                            added += 1;
                        }
                    }
                }
            }
        }
    }

    added
}

fn cell_of(position: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (position.x / cell_size).floor() as i64,
        (position.y / cell_size).floor() as i64,
        (position.z / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::core::models::residue::ResidueKind;

    fn add_atom(
        system: &mut MolecularSystem,
        name: &str,
        element: Element,
        position: Point3<f64>,
    ) -> AtomId {
        let chain_id = system.add_chain('A', ChainType::Other);
        let residue_id = system
            .add_residue(chain_id, 1, None, "LIG", ResidueKind::Hetero)
            .unwrap();
        system
            .add_atom_to_residue(residue_id, Atom::new(name, residue_id, element, position))
            .unwrap()
    }

    #[test]
    fn atoms_at_bonding_distance_get_bonded() {
        let mut system = MolecularSystem::new();
        let c1 = add_atom(&mut system, "C1", Element::C, Point3::origin());
        let c2 = add_atom(&mut system, "C2", Element::C, Point3::new(1.54, 0.0, 0.0));
        let added = perceive_bonds(&mut system);
        assert_eq!(added, 1);
        assert_eq!(system.bonded_neighbors(c1).unwrap(), &[c2]);
    }

    #[test]
    fn distant_atoms_stay_unbonded() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, "C1", Element::C, Point3::origin());
        add_atom(&mut system, "C2", Element::C, Point3::new(3.5, 0.0, 0.0));
        assert_eq!(perceive_bonds(&mut system), 0);
        assert!(system.bonds().is_empty());
    }

    #[test]
    fn overlapping_atoms_are_not_bonded() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, "C1", Element::C, Point3::origin());
        add_atom(&mut system, "C2", Element::C, Point3::new(0.1, 0.0, 0.0));
        assert_eq!(perceive_bonds(&mut system), 0);
    }

    #[test]
    fn hydrogen_pairs_are_never_bonded() {
        let mut system = MolecularSystem::new();
        add_atom(&mut system, "H1", Element::H, Point3::origin());
        add_atom(&mut system, "H2", Element::H, Point3::new(0.74, 0.0, 0.0));
        assert_eq!(perceive_bonds(&mut system), 0);
    }

    #[test]
    fn existing_bonds_are_preserved_not_duplicated() {
        let mut system = MolecularSystem::new();
        let c1 = add_atom(&mut system, "C1", Element::C, Point3::origin());
        let c2 = add_atom(&mut system, "C2", Element::C, Point3::new(1.54, 0.0, 0.0));
        system.add_bond(c1, c2, BondOrder::Single).unwrap();
        assert_eq!(perceive_bonds(&mut system), 0);
        assert_eq!(system.bonds().len(), 1);
    }

    #[test]
    fn disulfide_distance_links_sulfur_atoms() {
        let mut system = MolecularSystem::new();
        let s1 = add_atom(&mut system, "SG1", Element::S, Point3::origin());
        let s2 = add_atom(&mut system, "SG2", Element::S, Point3::new(2.05, 0.0, 0.0));
        assert_eq!(perceive_bonds(&mut system), 1);
        assert_eq!(system.bonded_neighbors(s1).unwrap(), &[s2]);
    }
}
