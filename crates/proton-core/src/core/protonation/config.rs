/// Parameters of a protonation run.
///
/// Mirrors the classic hydrogen-addition signature of cheminformatics
/// toolkits: a polar-only switch, an optional pH for the ionization model,
/// and whether pre-existing hydrogens are rebuilt from scratch.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtonationConfig {
    /// Target pH for titratable sites. `None` applies standard-state
    /// defaults (acids deprotonated, bases protonated).
    pub ph: Option<f64>,
    /// When `true`, only heteroatom-bound (polar) hydrogens are added.
    pub polar_only: bool,
    /// When `true`, hydrogens already present are stripped before placement.
    pub remove_existing: bool,
}

impl Default for ProtonationConfig {
    fn default() -> Self {
        Self {
            ph: None,
            polar_only: false,
            remove_existing: true,
        }
    }
}

impl ProtonationConfig {
    /// Creates a configuration for a pH-dependent run over all hydrogens.
    ///
    /// # Arguments
    ///
    /// * `ph` - The target pH for ionization-state assignment.
    pub fn at_ph(ph: f64) -> Self {
        Self {
            ph: Some(ph),
            ..Self::default()
        }
    }
}
