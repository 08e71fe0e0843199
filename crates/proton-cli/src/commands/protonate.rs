use crate::cli::Cli;
use crate::error::{CliError, Result};
use protopdb::core::io::pdb::PdbFile;
use protopdb::core::io::traits::StructureFile;
use protopdb::core::protonation::config::ProtonationConfig;
use protopdb::workflows::protonate;
use tracing::{debug, info};

/// Runs the protonation command: load, protonate, write, confirm.
///
/// The output file is only created after the structure has been loaded and
/// protonated, so a failing run never leaves a partial output behind.
pub fn run(args: &Cli) -> Result<()> {
    info!(input = %args.input.display(), ph = args.ph, "Loading structure.");
    let (mut system, metadata) =
        PdbFile::read_from_path(&args.input).map_err(|source| CliError::FileParsing {
            path: args.input.clone(),
            source,
        })?;
    debug!(atoms = system.atom_count(), "Structure loaded.");

    let config = ProtonationConfig::at_ph(args.ph);
    let report = protonate::run(&mut system, &config)?;
    info!(
        added = report.hydrogens_added,
        residues = report.residues_processed,
        "Hydrogens placed."
    );

    PdbFile::write_to_path(&system, &metadata, &args.output).map_err(|source| {
        CliError::FileWriting {
            path: args.output.clone(),
            source,
        }
    })?;

    println!(
        "Protonated PDB saved to {} at pH={}",
        args.output.display(),
        format_ph(args.ph)
    );
    Ok(())
}

/// Renders the pH with at least one decimal place, so a run at pH 7 reports
/// "7.0" while fractional values print as given.
fn format_ph(ph: f64) -> String {
    if ph.fract() == 0.0 {
        format!("{ph:.1}")
    } else {
        ph.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_keep_one_decimal() {
        assert_eq!(format_ph(7.0), "7.0");
        assert_eq!(format_ph(14.0), "14.0");
    }

    #[test]
    fn fractional_values_print_as_given() {
        assert_eq!(format_ph(7.4), "7.4");
        assert_eq!(format_ph(3.15), "3.15");
    }
}
