use crate::core::chem::elements::Element;
use crate::core::models::atom::Atom;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use crate::core::utils::geometry;
use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

/// Local geometry used when constructing hydrogen positions on an anchor atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HydrogenGeometry {
    /// sp3 center; hydrogens complete a tetrahedron around the anchor.
    Tetrahedral,
    /// sp2 center; hydrogens stay in the plane of the anchor's substituents.
    Trigonal,
    /// Hydroxyl/thiol hydrogen at the tetrahedral angle off a single bond.
    Bent,
    /// Isolated water oxygen; two hydrogens at the water angle.
    Water,
}

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("placement anchor no longer exists in the system")]
    UnknownAnchor,
    #[error("atom '{atom}' has no bonded frame to orient a {geometry:?} hydrogen")]
    NoOrientationFrame {
        atom: String,
        geometry: HydrogenGeometry,
    },
    #[error("atom '{atom}' is too saturated to accept {requested} more hydrogen(s)")]
    SaturatedAnchor { atom: String, requested: usize },
}

/// Constructs hydrogens on an anchor atom and bonds them to it.
///
/// Directions are derived from the anchor's existing bonded neighbors
/// (hydrogens included, so repeated calls keep filling open positions), and
/// the bond length comes from the anchor element. The new atoms join the
/// anchor's residue with full occupancy.
///
/// # Arguments
///
/// * `system` - The system to mutate.
/// * `anchor_id` - The heavy atom receiving hydrogens.
/// * `names` - Names for the new hydrogens; one atom is created per name.
/// * `geometry` - The local geometry to apply.
///
/// # Return
///
/// The IDs of the newly created hydrogen atoms.
///
/// # Errors
///
/// Returns an error if the requested geometry cannot be oriented (no bonded
/// neighbor where one is required) or if the anchor has fewer open positions
/// than requested names.
pub fn place_on_anchor(
    system: &mut MolecularSystem,
    anchor_id: AtomId,
    names: &[String],
    geometry: HydrogenGeometry,
) -> Result<Vec<AtomId>, PlacementError> {
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let anchor = system
        .atom(anchor_id)
        .ok_or(PlacementError::UnknownAnchor)?
        .clone();

    let neighbor_dirs: Vec<Vector3<f64>> = system
        .bonded_neighbors(anchor_id)
        .unwrap_or(&[])
        .iter()
        .filter_map(|&id| system.atom(id))
        .filter_map(|neighbor| {
            let offset = neighbor.position - anchor.position;
            (offset.norm_squared() > 1e-12).then(|| offset.normalize())
        })
        .collect();

    let directions = match geometry {
        HydrogenGeometry::Tetrahedral => {
            geometry::tetrahedral_directions(&neighbor_dirs, names.len())
        }
        HydrogenGeometry::Trigonal => {
            let plane_reference = if neighbor_dirs.len() == 1 {
                substituent_direction(system, anchor_id)
            } else {
                None
            };
            geometry::trigonal_directions(&neighbor_dirs, plane_reference.as_ref(), names.len())
        }
        HydrogenGeometry::Bent => {
            let Some(bond_dir) = neighbor_dirs.first() else {
                return Err(PlacementError::NoOrientationFrame {
                    atom: anchor.name.clone(),
                    geometry,
                });
            };
            let torsion_reference = substituent_direction(system, anchor_id);
            vec![geometry::bent_direction(bond_dir, torsion_reference.as_ref())]
        }
        HydrogenGeometry::Water => geometry::water_directions()
            .into_iter()
            .take(names.len())
            .collect(),
    };

    if directions.len() < names.len() {
        return Err(PlacementError::SaturatedAnchor {
            atom: anchor.name.clone(),
            requested: names.len(),
        });
    }

    let bond_length = anchor.element.hydrogen_bond_length();
    let mut created = Vec::with_capacity(names.len());
    for (name, direction) in names.iter().zip(directions) {
        let position = anchor.position + direction * bond_length;
        let hydrogen = Atom::new(name, anchor.residue_id, Element::H, position);
        // The anchor was just fetched, so its residue and the fresh atom exist.
        let hydrogen_id = system.add_atom_to_residue(anchor.residue_id, hydrogen).unwrap();
        system.add_bond(anchor_id, hydrogen_id, BondOrder::Single).unwrap();
        created.push(hydrogen_id);
    }

    Ok(created)
}

/// Finds a direction from the anchor's sole heavy neighbor towards one of
/// that neighbor's other substituents, for fixing planes and torsions.
fn substituent_direction(
    system: &MolecularSystem,
    anchor_id: AtomId,
) -> Option<Vector3<f64>> {
    let heavy = system.heavy_neighbors(anchor_id);
    let &neighbor_id = heavy.first()?;
    let neighbor = system.atom(neighbor_id)?;

    let second_shell = system
        .bonded_neighbors(neighbor_id)?
        .iter()
        .copied()
        .filter(|&id| id != anchor_id)
        .filter_map(|id| system.atom(id))
        .find(|atom| !atom.is_hydrogen())?;

    let offset = second_shell.position - neighbor.position;
    (offset.norm_squared() > 1e-12).then(|| offset.normalize())
}
