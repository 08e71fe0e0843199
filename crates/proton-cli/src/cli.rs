use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

/// The usage line shown when the argument shape is wrong.
pub const USAGE_LINE: &str = "Usage: protonate <input.pdb> <output.pdb> <pH>";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Protonate a PDB structure: add hydrogens according to a pH-dependent ionization model.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Path to the input PDB structure file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Path for the protonated output PDB file (overwritten if present).
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Target pH for ionization-state assignment.
    #[arg(value_name = "PH")]
    pub ph: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_positional_arguments_parse() {
        let cli = Cli::try_parse_from(["protonate", "in.pdb", "out.pdb", "7.4"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("in.pdb"));
        assert_eq!(cli.output, PathBuf::from("out.pdb"));
        assert_eq!(cli.ph, 7.4);
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["protonate", "in.pdb", "out.pdb"]).is_err());
        assert!(Cli::try_parse_from(["protonate"]).is_err());
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["protonate", "a", "b", "7.0", "extra"]).is_err());
    }

    #[test]
    fn non_numeric_ph_is_rejected() {
        assert!(Cli::try_parse_from(["protonate", "in.pdb", "out.pdb", "neutral"]).is_err());
    }
}
