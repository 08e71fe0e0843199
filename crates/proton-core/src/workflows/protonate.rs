use crate::core::chem::elements::Element;
use crate::core::chem::perception;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::residue::ResidueKind;
use crate::core::models::system::MolecularSystem;
use crate::core::protonation::catalog::{self, ResidueTopology};
use crate::core::protonation::config::ProtonationConfig;
use crate::core::protonation::placement::{self, HydrogenGeometry, PlacementError};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

const N_TERMINUS_PKA: f64 = 8.0;
const C_TERMINUS_PKA: f64 = 3.1;

/// Summary of what a protonation run did to the system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtonationReport {
    pub hydrogens_added: usize,
    pub hydrogens_removed: usize,
    pub residues_processed: usize,
    pub generic_residues: usize,
    pub disulfide_bridges: usize,
}

#[derive(Debug, Error)]
pub enum ProtonationError {
    #[error("failed to place hydrogens on residue {residue} {number}: {source}")]
    Placement {
        residue: String,
        number: isize,
        #[source]
        source: PlacementError,
    },
}

/// Adds hydrogens to a molecular system according to the configured
/// ionization model.
///
/// The workflow strips existing hydrogens (unless configured otherwise),
/// perceives missing covalent bonds from interatomic distances, and then
/// walks every residue in file order. Residues known to the catalog receive
/// their canonical hydrogen set, with titratable sites resolved against the
/// configured pH, chain termini handled explicitly, and disulfide-bridged
/// cysteines left unprotonated at the sulfur. Anything else falls back to a
/// valence-based fill.
///
/// # Arguments
///
/// * `system` - The system to protonate; mutated in place.
/// * `config` - Run parameters (pH, polar-only, strip behavior).
///
/// # Return
///
/// A [`ProtonationReport`] with counts of what changed.
///
/// # Errors
///
/// Returns an error if a hydrogen position cannot be constructed, e.g. when
/// an anchor atom is present but its bonded frame is degenerate.
pub fn run(
    system: &mut MolecularSystem,
    config: &ProtonationConfig,
) -> Result<ProtonationReport, ProtonationError> {
    let mut report = ProtonationReport::default();

    if config.remove_existing {
        report.hydrogens_removed = strip_hydrogens(system);
        debug!(removed = report.hydrogens_removed, "Stripped existing hydrogens.");
    }

    let perceived = perception::perceive_bonds(system);
    debug!(bonds = perceived, "Perceived covalent bonds.");

    let (n_termini, c_termini) = find_termini(system);
    let half_cystines = find_half_cystines(system);
    report.disulfide_bridges = half_cystines.len() / 2;

    let residue_order: Vec<ResidueId> = system
        .chains_iter()
        .flat_map(|(_, chain)| chain.residues().iter().copied())
        .collect();

    for residue_id in residue_order {
        let residue_name = system.residue(residue_id).unwrap().name.clone();
        match catalog::residue_topology(&residue_name) {
            Some(topology) => protonate_cataloged(
                system,
                residue_id,
                topology,
                config,
                &n_termini,
                &c_termini,
                &half_cystines,
                &mut report,
            )?,
            None => generic_fill(system, residue_id, config, &mut report)?,
        }
        report.residues_processed += 1;
    }

    info!(
        added = report.hydrogens_added,
        residues = report.residues_processed,
        disulfides = report.disulfide_bridges,
        "Protonation complete."
    );
    Ok(report)
}

fn strip_hydrogens(system: &mut MolecularSystem) -> usize {
    let hydrogen_ids: Vec<AtomId> = system
        .atoms_iter()
        .filter(|(_, atom)| atom.is_hydrogen())
        .map(|(id, _)| id)
        .collect();
    for &id in &hydrogen_ids {
        system.remove_atom(id);
    }
    hydrogen_ids.len()
}

/// Finds the first and last protein residue of each chain.
fn find_termini(system: &MolecularSystem) -> (HashSet<ResidueId>, HashSet<ResidueId>) {
    let mut n_termini = HashSet::new();
    let mut c_termini = HashSet::new();
    for (_, chain) in system.chains_iter() {
        let protein: Vec<ResidueId> = chain
            .residues()
            .iter()
            .copied()
            .filter(|&id| {
                system
                    .residue(id)
                    .is_some_and(|residue| residue.kind == ResidueKind::Protein)
            })
            .collect();
        if let Some(&first) = protein.first() {
            n_termini.insert(first);
        }
        if let Some(&last) = protein.last() {
            c_termini.insert(last);
        }
    }
    (n_termini, c_termini)
}

/// Finds cysteine sulfurs that are bonded to a sulfur of another residue.
fn find_half_cystines(system: &MolecularSystem) -> HashSet<AtomId> {
    let mut half_cystines = HashSet::new();
    for (atom_id, atom) in system.atoms_iter() {
        if atom.element != Element::S || atom.name != "SG" {
            continue;
        }
        let bridged = system
            .bonded_neighbors(atom_id)
            .unwrap_or(&[])
            .iter()
            .filter_map(|&id| system.atom(id))
            .any(|other| other.element == Element::S && other.residue_id != atom.residue_id);
        if bridged {
            half_cystines.insert(atom_id);
        }
    }
    half_cystines
}

#[allow(clippy::too_many_arguments)]
fn protonate_cataloged(
    system: &mut MolecularSystem,
    residue_id: ResidueId,
    topology: &ResidueTopology,
    config: &ProtonationConfig,
    n_termini: &HashSet<ResidueId>,
    c_termini: &HashSet<ResidueId>,
    half_cystines: &HashSet<AtomId>,
    report: &mut ProtonationReport,
) -> Result<(), ProtonationError> {
    let is_n_terminal = n_termini.contains(&residue_id);

    for site in &topology.sites {
        // Terminal amines replace the backbone amide hydrogen.
        if is_n_terminal && site.atom == "N" {
            continue;
        }
        add_site_hydrogens(
            system,
            residue_id,
            &site.atom,
            &site.hydrogens,
            site.geometry,
            config,
            report,
        )?;
    }

    for site in &topology.titratable {
        let anchor = system
            .residue(residue_id)
            .unwrap()
            .atom_id_by_name(&site.atom);
        if anchor.is_some_and(|id| half_cystines.contains(&id)) {
            continue;
        }
        let names: Vec<String> = site.active_hydrogens(config.ph).to_vec();
        add_site_hydrogens(
            system,
            residue_id,
            &site.atom,
            &names,
            site.geometry,
            config,
            report,
        )?;
    }

    if is_n_terminal {
        add_terminal_amine(system, residue_id, config, report)?;
    }
    if c_termini.contains(&residue_id) {
        add_terminal_carboxyl(system, residue_id, config, report)?;
    }
    Ok(())
}

/// Places the hydrogens of one site, skipping names already present.
///
/// A missing anchor atom (truncated side chain) is logged and skipped; a
/// present but unorientable anchor is an error.
fn add_site_hydrogens(
    system: &mut MolecularSystem,
    residue_id: ResidueId,
    anchor_name: &str,
    names: &[String],
    geometry: HydrogenGeometry,
    config: &ProtonationConfig,
    report: &mut ProtonationReport,
) -> Result<(), ProtonationError> {
    let residue = system.residue(residue_id).unwrap();
    let residue_name = residue.name.clone();
    let residue_number = residue.number;

    let Some(anchor_id) = residue.atom_id_by_name(anchor_name) else {
        warn!(
            residue = %residue_name,
            number = residue_number,
            atom = anchor_name,
            "Anchor atom missing; skipping its hydrogens."
        );
        return Ok(());
    };

    let anchor_element = system.atom(anchor_id).unwrap().element;
    if config.polar_only && !anchor_element.is_polar_hydrogen_carrier() {
        return Ok(());
    }

    let missing: Vec<String> = names
        .iter()
        .filter(|name| !system.residue(residue_id).unwrap().has_atom(name))
        .cloned()
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let created = placement::place_on_anchor(system, anchor_id, &missing, geometry).map_err(
        |source| ProtonationError::Placement {
            residue: residue_name,
            number: residue_number,
            source,
        },
    )?;
    report.hydrogens_added += created.len();
    Ok(())
}

/// Builds the N-terminal amine hydrogens (H1..H3).
///
/// The hydrogen count follows the amine's bonding: an ammonium nitrogen
/// carries four substituents, a neutral amine three, minus however many
/// heavy neighbors the nitrogen already has (one for most residues, two for
/// proline).
fn add_terminal_amine(
    system: &mut MolecularSystem,
    residue_id: ResidueId,
    config: &ProtonationConfig,
    report: &mut ProtonationReport,
) -> Result<(), ProtonationError> {
    let residue = system.residue(residue_id).unwrap();
    let residue_name = residue.name.clone();
    let residue_number = residue.number;
    let Some(n_id) = residue.atom_id_by_name("N") else {
        warn!(
            residue = %residue_name,
            number = residue_number,
            "N-terminal residue has no backbone nitrogen."
        );
        return Ok(());
    };

    let protonated = config.ph.map(|ph| ph < N_TERMINUS_PKA).unwrap_or(true);
    let target_substituents: usize = if protonated { 4 } else { 3 };
    let heavy = system.heavy_neighbors(n_id).len();
    let count = target_substituents.saturating_sub(heavy);

    let names: Vec<String> = ["H1", "H2", "H3"]
        .iter()
        .take(count)
        .map(|name| name.to_string())
        .filter(|name| !system.residue(residue_id).unwrap().has_atom(name))
        .collect();
    if names.is_empty() {
        return Ok(());
    }

    let created =
        placement::place_on_anchor(system, n_id, &names, HydrogenGeometry::Tetrahedral).map_err(
            |source| ProtonationError::Placement {
                residue: residue_name,
                number: residue_number,
                source,
            },
        )?;
    report.hydrogens_added += created.len();
    Ok(())
}

/// Protonates the C-terminal carboxylate (HXT on OXT) under acidic pH.
fn add_terminal_carboxyl(
    system: &mut MolecularSystem,
    residue_id: ResidueId,
    config: &ProtonationConfig,
    report: &mut ProtonationReport,
) -> Result<(), ProtonationError> {
    let protonated = config.ph.map(|ph| ph < C_TERMINUS_PKA).unwrap_or(false);
    if !protonated {
        return Ok(());
    }

    let residue = system.residue(residue_id).unwrap();
    let residue_name = residue.name.clone();
    let residue_number = residue.number;
    let Some(oxt_id) = residue.atom_id_by_name("OXT") else {
        return Ok(());
    };
    if system.residue(residue_id).unwrap().has_atom("HXT") {
        return Ok(());
    }

    let created = placement::place_on_anchor(
        system,
        oxt_id,
        &["HXT".to_string()],
        HydrogenGeometry::Bent,
    )
    .map_err(|source| ProtonationError::Placement {
        residue: residue_name,
        number: residue_number,
        source,
    })?;
    report.hydrogens_added += created.len();
    Ok(())
}

/// Valence-based hydrogen fill for residues absent from the catalog.
///
/// Each heavy atom receives as many hydrogens as its standard valence minus
/// its current bond order sum, under the single-bond model of perceived
/// connectivity. Conservative by construction: elements with unknown valence
/// receive nothing.
fn generic_fill(
    system: &mut MolecularSystem,
    residue_id: ResidueId,
    config: &ProtonationConfig,
    report: &mut ProtonationReport,
) -> Result<(), ProtonationError> {
    let atom_ids: Vec<AtomId> = system.residue(residue_id).unwrap().atoms().to_vec();
    let mut filled_any = false;

    for anchor_id in atom_ids {
        let atom = system.atom(anchor_id).unwrap();
        if atom.is_hydrogen() {
            continue;
        }
        let element = atom.element;
        let anchor_name = atom.name.clone();
        if element.standard_valence() == 0 {
            continue;
        }
        if config.polar_only && !element.is_polar_hydrogen_carrier() {
            continue;
        }

        let missing = element
            .standard_valence()
            .saturating_sub(system.bonded_valence(anchor_id)) as usize;
        if missing == 0 {
            continue;
        }

        let heavy = system.heavy_neighbors(anchor_id).len();
        let geometry = match element {
            Element::O | Element::S | Element::Se if heavy == 1 && missing == 1 => {
                HydrogenGeometry::Bent
            }
            _ if heavy == 0 && element == Element::O && missing == 2 => HydrogenGeometry::Water,
            _ => HydrogenGeometry::Tetrahedral,
        };

        let names = generic_hydrogen_names(system, residue_id, &anchor_name, element, missing);
        let residue = system.residue(residue_id).unwrap();
        let residue_name = residue.name.clone();
        let residue_number = residue.number;
        let created = placement::place_on_anchor(system, anchor_id, &names, geometry).map_err(
            |source| ProtonationError::Placement {
                residue: residue_name,
                number: residue_number,
                source,
            },
        )?;
        report.hydrogens_added += created.len();
        filled_any = filled_any || !created.is_empty();
    }

    if filled_any {
        report.generic_residues += 1;
    }
    Ok(())
}

/// Derives conventional hydrogen names from the anchor name ("OD2" begets
/// "HD2", "C5" begets "H5"), appending digits to keep them unique within the
/// residue.
fn generic_hydrogen_names(
    system: &MolecularSystem,
    residue_id: ResidueId,
    anchor_name: &str,
    element: Element,
    count: usize,
) -> Vec<String> {
    let residue = system.residue(residue_id).unwrap();
    let symbol = element.symbol();
    let remainder = if anchor_name.len() >= symbol.len()
        && anchor_name[..symbol.len()].eq_ignore_ascii_case(symbol)
    {
        &anchor_name[symbol.len()..]
    } else {
        anchor_name
    };
    let base = format!("H{remainder}");

    if count == 1 && !residue.has_atom(&base) {
        return vec![base];
    }

    let mut names = Vec::with_capacity(count);
    let mut suffix = 1;
    while names.len() < count {
        let candidate = format!("{base}{suffix}");
        if !residue.has_atom(&candidate) && !names.contains(&candidate) {
            names.push(candidate);
        }
        suffix += 1;
    }
    names
}
