use super::placement::HydrogenGeometry;
use phf::{Set, phf_set};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Residue names that denote water in common PDB dialects.
static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "TIP3", "SOL",
};

/// A heavy atom that always carries the same hydrogens, independent of pH.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydrogenSite {
    /// Name of the anchor heavy atom (e.g. "CB").
    pub atom: String,
    /// Names of the hydrogens bonded to the anchor.
    pub hydrogens: Vec<String>,
    /// Local geometry used to construct the positions.
    pub geometry: HydrogenGeometry,
}

/// Whether a titratable site donates or accepts a proton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Acid,
    Base,
}

/// A heavy atom whose hydrogen count depends on the pH.
///
/// Below the site's pKa the `protonated` hydrogen set applies, at or above
/// it the `deprotonated` set. Without a pH the standard-state convention
/// applies: acids sit deprotonated, bases protonated.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TitratableSite {
    /// Name of the anchor heavy atom (e.g. "NZ").
    pub atom: String,
    /// The site's acid dissociation constant.
    pub pka: f64,
    pub kind: SiteKind,
    /// Hydrogen names carried below the pKa.
    pub protonated: Vec<String>,
    /// Hydrogen names carried at or above the pKa.
    pub deprotonated: Vec<String>,
    /// Local geometry used to construct the positions.
    pub geometry: HydrogenGeometry,
}

impl TitratableSite {
    /// Selects the hydrogen set this site carries at the given pH.
    pub fn active_hydrogens(&self, ph: Option<f64>) -> &[String] {
        match ph {
            Some(ph) if ph < self.pka => &self.protonated,
            Some(_) => &self.deprotonated,
            None => match self.kind {
                SiteKind::Acid => &self.deprotonated,
                SiteKind::Base => &self.protonated,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResidueInfo {
    name: String,
}

/// Hydrogen topology of one residue, as loaded from its catalog file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResidueTopology {
    info: ResidueInfo,
    #[serde(default)]
    pub sites: Vec<HydrogenSite>,
    #[serde(default)]
    pub titratable: Vec<TitratableSite>,
}

impl ResidueTopology {
    /// Returns the residue name this topology describes.
    pub fn name(&self) -> &str {
        &self.info.name
    }
}

static CATALOG: OnceLock<HashMap<String, ResidueTopology>> = OnceLock::new();

fn catalog() -> &'static HashMap<String, ResidueTopology> {
    CATALOG.get_or_init(load_catalog)
}

fn load_catalog() -> HashMap<String, ResidueTopology> {
    let mut by_name = HashMap::new();

    macro_rules! load_residue {
        ($path:literal) => {
            let content = include_str!(concat!("../../../data/residues/", $path));
            let topology: ResidueTopology = toml::from_str(content)
                .unwrap_or_else(|e| panic!("invalid residue catalog file '{}': {}", $path, e));
            if by_name
                .insert(topology.name().to_string(), topology)
                .is_some()
            {
                panic!("duplicate residue catalog entry in '{}'", $path);
            }
        };
    }

    load_residue!("ALA.toml");
    load_residue!("ARG.toml");
    load_residue!("ASN.toml");
    load_residue!("ASP.toml");
    load_residue!("CYS.toml");
    load_residue!("GLN.toml");
    load_residue!("GLU.toml");
    load_residue!("GLY.toml");
    load_residue!("HIS.toml");
    load_residue!("ILE.toml");
    load_residue!("LEU.toml");
    load_residue!("LYS.toml");
    load_residue!("MET.toml");
    load_residue!("PHE.toml");
    load_residue!("PRO.toml");
    load_residue!("SER.toml");
    load_residue!("THR.toml");
    load_residue!("TRP.toml");
    load_residue!("TYR.toml");
    load_residue!("VAL.toml");
    load_residue!("HOH.toml");

    by_name
}

/// Looks up the hydrogen topology for a residue name.
///
/// Water synonyms resolve to the water entry.
pub fn residue_topology(name: &str) -> Option<&'static ResidueTopology> {
    let name = name.trim();
    if is_water(name) {
        return catalog().get("HOH");
    }
    catalog().get(name)
}

/// Returns `true` if the name is one of the 20 standard amino acids.
pub fn is_standard_amino_acid(name: &str) -> bool {
    let name = name.trim();
    !is_water(name) && catalog().contains_key(name)
}

/// Returns `true` if the residue name denotes water.
pub fn is_water(name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(name.trim().to_ascii_uppercase().as_str())
}
