use crate::core::chem::elements::Element;
use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::chain::ChainType;
use crate::core::models::ids::AtomId;
use crate::core::models::residue::{Residue, ResidueKind};
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use crate::core::protonation::catalog;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Header records and the CRYST1 line preserved verbatim for write-back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    pub header_lines: Vec<String>,
    pub cryst1: Option<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Coordinate record is too short (must reach column 54)")]
    LineTooShort,
}

/// Records that describe per-atom extras keyed to serial numbers; the writer
/// renumbers atoms, so echoing them back would corrupt the file.
const SKIPPED_RECORDS: [&str; 4] = ["ANISOU", "SIGATM", "SIGUIJ", "MASTER"];

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn classify_residue(name: &str) -> ResidueKind {
    if catalog::is_water(name) {
        ResidueKind::Water
    } else if catalog::is_standard_amino_acid(name) {
        ResidueKind::Protein
    } else {
        ResidueKind::Hetero
    }
}

fn chain_type_for(kind: ResidueKind) -> ChainType {
    match kind {
        ResidueKind::Protein => ChainType::Protein,
        ResidueKind::Water => ChainType::Water,
        ResidueKind::Hetero => ChainType::Ligand,
    }
}

/// Resolves the element of a coordinate record.
///
/// The element columns (77-78) win when present. Otherwise the alignment of
/// the four-character name field decides: a name starting in column 13
/// carries a two-letter symbol (" CA " is an alpha carbon, "CA  " a calcium
/// ion), falling back to single-letter and name-derived lookup.
fn resolve_element(element_field: &str, raw_name: &str) -> Element {
    let trimmed = element_field.trim();
    if !trimmed.is_empty() {
        return trimmed.parse().unwrap_or(Element::Unknown);
    }

    let leading = raw_name.chars().next().unwrap_or(' ');
    if leading.is_ascii_alphabetic() {
        if let Ok(element) = raw_name.get(0..2).unwrap_or("").trim().parse() {
            return element;
        }
        if let Ok(element) = raw_name.get(0..1).unwrap_or("").parse() {
            return element;
        }
    } else if leading == ' ' {
        if let Ok(element) = raw_name.get(1..2).unwrap_or("").parse() {
            return element;
        }
    }
    Element::from_atom_name(raw_name)
}

/// The PDB file format.
///
/// The reader consumes only the first MODEL of a multi-model file, resolves
/// alternate locations by keeping the highest-occupancy copy, and turns
/// CONECT records into bonds. The writer renumbers serials from 1, emits
/// ATOM for standard amino-acid residues and HETATM for everything else,
/// closes each chain's protein stretch with TER, and appends CONECT records
/// for bonds among hetero-residue atoms.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut system = MolecularSystem::new();
        let mut metadata = PdbMetadata::default();

        let mut serial_to_atom: HashMap<usize, AtomId> = HashMap::new();
        let mut conect_pairs: Vec<(usize, usize)> = Vec::new();
        let mut models_seen = 0usize;

        for (line_index, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            let line_num = line_index + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    parse_atom_record(&line, line_num, &mut system, &mut serial_to_atom)?;
                }
                "MODEL" => {
                    models_seen += 1;
                    if models_seen > 1 {
                        break;
                    }
                }
                "ENDMDL" | "END" => break,
                "TER" => {}
                "CONECT" => {
                    parse_conect_record(&line, &mut conect_pairs);
                }
                "CRYST1" => {
                    metadata.cryst1 = Some(line);
                }
                "" => {
                    if !line.trim().is_empty() {
                        metadata.header_lines.push(line);
                    }
                }
                other if SKIPPED_RECORDS.contains(&other) => {}
                _ => {
                    metadata.header_lines.push(line);
                }
            }
        }

        for (serial1, serial2) in conect_pairs {
            // CONECT may reference atoms of later models or stripped copies.
            if let (Some(&a1), Some(&a2)) =
                (serial_to_atom.get(&serial1), serial_to_atom.get(&serial2))
            {
                system.add_bond(a1, a2, BondOrder::Single).ok_or_else(|| {
                    PdbError::Inconsistency(format!(
                        "CONECT references removed atoms ({serial1}, {serial2})"
                    ))
                })?;
            }
        }

        Ok((system, metadata))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{line}")?;
        }
        if let Some(cryst1) = &metadata.cryst1 {
            writeln!(writer, "{cryst1}")?;
        }

        let mut serial = 1usize;
        let mut atom_serials: HashMap<AtomId, usize> = HashMap::new();

        for (_, chain) in system.chains_iter() {
            let mut last_protein_residue = None;
            for &residue_id in chain.residues() {
                let residue = system
                    .residue(residue_id)
                    .ok_or_else(|| PdbError::Inconsistency("dangling residue ID".into()))?;
                if residue.kind == ResidueKind::Protein {
                    last_protein_residue = Some(residue_id);
                }
            }

            for &residue_id in chain.residues() {
                let residue = system.residue(residue_id).unwrap();
                let record_type = if residue.kind == ResidueKind::Protein {
                    "ATOM"
                } else {
                    "HETATM"
                };

                for &atom_id in residue.atoms() {
                    let atom = system
                        .atom(atom_id)
                        .ok_or_else(|| PdbError::Inconsistency("dangling atom ID".into()))?;
                    atom_serials.insert(atom_id, serial);
                    write_atom_record(writer, record_type, serial, atom, residue, chain.id)?;
                    serial += 1;
                }

                if Some(residue_id) == last_protein_residue {
                    writeln!(
                        writer,
                        "TER   {:>5}      {:>3} {}{:>4}{}",
                        serial % 100000,
                        truncate(&residue.name, 3),
                        chain.id,
                        residue.number.rem_euclid(10000),
                        residue.insertion_code.unwrap_or(' ')
                    )?;
                    serial += 1;
                }
            }
        }

        write_conect_records(system, writer, &atom_serials)?;
        writeln!(writer, "END")?;
        Ok(())
    }
}

fn parse_atom_record(
    line: &str,
    line_num: usize,
    system: &mut MolecularSystem,
    serial_to_atom: &mut HashMap<usize, AtomId>,
) -> Result<(), PdbError> {
    if line.len() < 54 {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort,
        });
    }

    let serial_str = slice_and_trim(line, 6, 11);
    let raw_name = line.get(12..16).unwrap_or("");
    let name = raw_name.trim();
    let res_name = slice_and_trim(line, 17, 20);
    let chain_char = line.chars().nth(21).filter(|c| !c.is_whitespace()).unwrap_or('A');
    let res_seq_str = slice_and_trim(line, 22, 26);
    let i_code = line.chars().nth(26).filter(|c| !c.is_whitespace());
    let element_field = slice_and_trim(line, 76, 78);

    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: "13-16".into(),
            },
        });
    }

    let serial: usize = serial_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "7-11".into(),
            value: serial_str.into(),
        },
    })?;
    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "23-26".into(),
            value: res_seq_str.into(),
        },
    })?;

    let mut coords = [0.0_f64; 3];
    for (slot, (start, end)) in coords.iter_mut().zip([(30, 38), (38, 46), (46, 54)]) {
        let field = slice_and_trim(line, start, end);
        *slot = field.parse().map_err(|_| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::InvalidFloat {
                columns: format!("{}-{}", start + 1, end),
                value: field.into(),
            },
        })?;
    }
    let position = Point3::new(coords[0], coords[1], coords[2]);

    let occupancy: f64 = slice_and_trim(line, 54, 60).parse().unwrap_or(1.0);
    let temp_factor: f64 = slice_and_trim(line, 60, 66).parse().unwrap_or(0.0);
    let element = resolve_element(element_field, raw_name);

    let kind = classify_residue(res_name);
    let chain_id = system.add_chain(chain_char, chain_type_for(kind));
    let residue_id = system
        .add_residue(chain_id, res_seq, i_code, res_name, kind)
        .ok_or_else(|| PdbError::Inconsistency("chain disappeared during parsing".into()))?;

    // Alternate locations collapse to the highest-occupancy copy.
    if let Some(existing_id) = system
        .residue(residue_id)
        .and_then(|residue| residue.atom_id_by_name(name))
    {
        let existing = system.atom_mut(existing_id).unwrap();
        if occupancy > existing.occupancy {
            existing.position = position;
            existing.occupancy = occupancy;
            existing.temp_factor = temp_factor;
        }
        serial_to_atom.insert(serial, existing_id);
        return Ok(());
    }

    let mut atom = Atom::new(name, residue_id, element, position);
    atom.occupancy = occupancy;
    atom.temp_factor = temp_factor;

    let atom_id = system
        .add_atom_to_residue(residue_id, atom)
        .ok_or_else(|| PdbError::Inconsistency("residue disappeared during parsing".into()))?;
    serial_to_atom.insert(serial, atom_id);
    Ok(())
}

fn parse_conect_record(line: &str, pairs: &mut Vec<(usize, usize)>) {
    let origin = match slice_and_trim(line, 6, 11).parse::<usize>() {
        Ok(serial) => serial,
        Err(_) => return,
    };
    for (start, end) in [(11, 16), (16, 21), (21, 26), (26, 31)] {
        if let Ok(partner) = slice_and_trim(line, start, end).parse::<usize>() {
            pairs.push((origin, partner));
        }
    }
}

fn truncate(name: &str, max: usize) -> &str {
    if name.len() > max { &name[..max] } else { name }
}

fn write_atom_record(
    writer: &mut impl Write,
    record_type: &str,
    serial: usize,
    atom: &Atom,
    residue: &Residue,
    chain_id: char,
) -> Result<(), PdbError> {
    // Names shorter than four characters start in column 14.
    let atom_name = if atom.name.len() >= 4 {
        truncate(&atom.name, 4).to_string()
    } else {
        format!(" {:<3}", atom.name)
    };

    writeln!(
        writer,
        "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}{}   {:8.3}{:8.3}{:8.3}{:6.2}{:6.2}          {:>2}",
        record_type,
        serial % 100000,
        atom_name,
        ' ',
        truncate(&residue.name, 3),
        chain_id,
        residue.number.rem_euclid(10000),
        residue.insertion_code.unwrap_or(' '),
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.temp_factor,
        atom.element.symbol().to_uppercase()
    )?;
    Ok(())
}

fn write_conect_records(
    system: &MolecularSystem,
    writer: &mut impl Write,
    atom_serials: &HashMap<AtomId, usize>,
) -> Result<(), PdbError> {
    let mut entries: Vec<(usize, Vec<usize>)> = Vec::new();

    for (atom_id, atom) in system.atoms_iter() {
        let in_hetero = system
            .residue(atom.residue_id)
            .is_some_and(|residue| residue.kind == ResidueKind::Hetero);
        if !in_hetero {
            continue;
        }

        let Some(&origin) = atom_serials.get(&atom_id) else {
            continue;
        };
        let mut partners: Vec<usize> = system
            .bonded_neighbors(atom_id)
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| atom_serials.get(id).copied())
            .collect();
        if partners.is_empty() {
            continue;
        }
        partners.sort_unstable();
        entries.push((origin, partners));
    }

    entries.sort_unstable_by_key(|(origin, _)| *origin);
    for (origin, partners) in entries {
        for chunk in partners.chunks(4) {
            write!(writer, "CONECT{origin:>5}")?;
            for partner in chunk {
                write!(writer, "{partner:>5}")?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
