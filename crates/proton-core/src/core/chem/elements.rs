use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical elements relevant to biomolecular structures.
///
/// The set covers the organic elements, the halogens, and the metal ions
/// commonly found in PDB files. Anything else parses to `Unknown`, which
/// carries conservative fallback parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Element {
    H,
    C,
    N,
    O,
    S,
    P,
    F,
    Cl,
    Br,
    I,
    B,
    Se,
    Na,
    K,
    Mg,
    Ca,
    Zn,
    Fe,
    Mn,
    Cu,
    #[default]
    Unknown,
}

static ELEMENT_SYMBOLS: Map<&'static str, Element> = phf_map! {
    "H" => Element::H,
    "D" => Element::H,
    "C" => Element::C,
    "N" => Element::N,
    "O" => Element::O,
    "S" => Element::S,
    "P" => Element::P,
    "F" => Element::F,
    "CL" => Element::Cl,
    "BR" => Element::Br,
    "I" => Element::I,
    "B" => Element::B,
    "SE" => Element::Se,
    "NA" => Element::Na,
    "K" => Element::K,
    "MG" => Element::Mg,
    "CA" => Element::Ca,
    "ZN" => Element::Zn,
    "FE" => Element::Fe,
    "MN" => Element::Mn,
    "CU" => Element::Cu,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized element symbol '{0}'")]
pub struct ParseElementError(pub String);

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim().to_ascii_uppercase();
        ELEMENT_SYMBOLS
            .get(symbol.as_str())
            .copied()
            .ok_or_else(|| ParseElementError(s.trim().to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Element {
    /// Returns the canonical element symbol (e.g. "Cl").
    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::S => "S",
            Element::P => "P",
            Element::F => "F",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
            Element::B => "B",
            Element::Se => "Se",
            Element::Na => "Na",
            Element::K => "K",
            Element::Mg => "Mg",
            Element::Ca => "Ca",
            Element::Zn => "Zn",
            Element::Fe => "Fe",
            Element::Mn => "Mn",
            Element::Cu => "Cu",
            Element::Unknown => "X",
        }
    }

    /// Returns the single-bond covalent radius in Angstroms.
    ///
    /// Used by distance-based bond perception; unknown elements get a
    /// middle-of-the-road radius so they still pick up plausible bonds.
    pub fn covalent_radius(&self) -> f64 {
        match self {
            Element::H => 0.31,
            Element::C => 0.77,
            Element::N => 0.75,
            Element::O => 0.73,
            Element::S => 1.02,
            Element::P => 1.06,
            Element::F => 0.71,
            Element::Cl => 0.99,
            Element::Br => 1.14,
            Element::I => 1.33,
            Element::B => 0.82,
            Element::Se => 1.16,
            Element::Na => 1.54,
            Element::K => 1.96,
            Element::Mg => 1.30,
            Element::Ca => 1.74,
            Element::Zn => 1.31,
            Element::Fe => 1.25,
            Element::Mn => 1.39,
            Element::Cu => 1.38,
            Element::Unknown => 1.0,
        }
    }

    /// Returns the standard valence used by the generic hydrogen fill.
    ///
    /// Metals and unknowns return 0 so they never receive hydrogens.
    pub fn standard_valence(&self) -> u8 {
        match self {
            Element::H => 1,
            Element::C => 4,
            Element::N => 3,
            Element::O => 2,
            Element::S => 2,
            Element::P => 3,
            Element::F | Element::Cl | Element::Br | Element::I => 1,
            Element::B => 3,
            Element::Se => 2,
            _ => 0,
        }
    }

    /// Returns `true` if hydrogens bound to this element count as polar.
    pub fn is_polar_hydrogen_carrier(&self) -> bool {
        matches!(
            self,
            Element::N | Element::O | Element::S | Element::P | Element::Se
        )
    }

    /// Returns the typical bond length to hydrogen in Angstroms.
    pub fn hydrogen_bond_length(&self) -> f64 {
        match self {
            Element::C => 1.09,
            Element::N => 1.01,
            Element::O => 0.96,
            Element::S => 1.34,
            Element::Se => 1.46,
            _ => 1.0,
        }
    }

    /// Derives an element from a PDB atom name when the element columns are
    /// blank.
    ///
    /// Takes the leading alphabetic run of the name and tries the two-letter
    /// symbol first, then the one-letter symbol. Digit-prefixed hydrogen
    /// names ("1HB") resolve to hydrogen.
    pub fn from_atom_name(name: &str) -> Element {
        let trimmed = name.trim();
        if trimmed
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() && trimmed[1..].starts_with(['H', 'h']))
        {
            return Element::H;
        }

        let symbol: String = trimmed.chars().take_while(|c| c.is_alphabetic()).collect();
        if let Ok(element) = symbol.parse() {
            return element;
        }
        if let Some(first) = symbol.get(0..1) {
            if let Ok(element) = first.parse() {
                return element;
            }
        }
        Element::Unknown
    }
}
