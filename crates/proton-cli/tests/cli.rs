use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_protonate");

const FREE_ALANINE_PDB: &str = "\
ATOM      1  N   ALA A   1      -0.966   0.493   1.500  1.00  0.00           N
ATOM      2  CA  ALA A   1       0.257   1.173   1.044  1.00  0.00           C
ATOM      3  C   ALA A   1      -0.094   2.647   0.941  1.00  0.00           C
ATOM      4  O   ALA A   1      -1.056   3.052   0.290  1.00  0.00           O
ATOM      5  CB  ALA A   1       1.204   0.620   0.005  1.00  0.00           C
END
";

fn write_fixture(dir: &Path) -> PathBuf {
    let input = dir.join("molecule.pdb");
    fs::write(&input, FREE_ALANINE_PDB).unwrap();
    input
}

fn run_protonate(args: &[&str]) -> Output {
    Command::new(BIN).args(args).output().unwrap()
}

fn hydrogen_record_count(pdb: &str) -> usize {
    pdb.lines()
        .filter(|line| line.starts_with("ATOM") || line.starts_with("HETATM"))
        .filter(|line| line.len() >= 78 && line[76..78].trim() == "H")
        .count()
}

#[test]
fn no_arguments_print_usage_and_exit_1() {
    let output = run_protonate(&[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: protonate <input.pdb> <output.pdb> <pH>"));
}

#[test]
fn too_few_arguments_print_usage_and_exit_1() {
    let output = run_protonate(&["only.pdb", "two.pdb"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: protonate <input.pdb> <output.pdb> <pH>"));
}

#[test]
fn too_many_arguments_print_usage_and_exit_1() {
    let output = run_protonate(&["a.pdb", "b.pdb", "7.0", "extra"]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: protonate <input.pdb> <output.pdb> <pH>"));
}

#[test]
fn protonates_a_minimal_structure_and_confirms() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path());
    let output_path = dir.path().join("molecule_h.pdb");

    let output = run_protonate(&[
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "7.4",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Protonated PDB saved to"));
    assert!(stdout.contains("molecule_h.pdb"));
    assert!(stdout.contains("at pH=7.4"));

    let written = fs::read_to_string(&output_path).unwrap();
    assert!(hydrogen_record_count(&written) > hydrogen_record_count(FREE_ALANINE_PDB));
    assert!(written.lines().any(|line| line.starts_with("ATOM")));
    assert!(written.trim_end().ends_with("END"));
}

#[test]
fn rerun_overwrites_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path());
    let output_path = dir.path().join("molecule_h.pdb");
    fs::write(&output_path, "stale content").unwrap();

    let args = [
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "7.4",
    ];
    let first = run_protonate(&args);
    let second = run_protonate(&args);

    assert!(first.status.success());
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);

    let written = fs::read_to_string(&output_path).unwrap();
    assert!(!written.contains("stale content"));
    assert!(written.lines().next().unwrap().starts_with("ATOM"));
}

#[test]
fn non_numeric_ph_fails_before_writing_anything() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path());
    let output_path = dir.path().join("molecule_h.pdb");

    let output = run_protonate(&[
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "neutral",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!output_path.exists());
}

#[test]
fn missing_input_fails_without_creating_output() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("molecule_h.pdb");

    let output = run_protonate(&[
        dir.path().join("no_such_file.pdb").to_str().unwrap(),
        output_path.to_str().unwrap(),
        "7.4",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!output_path.exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
}

#[test]
fn whole_number_ph_is_reported_with_one_decimal() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_fixture(dir.path());
    let output_path = dir.path().join("molecule_h.pdb");

    let output = run_protonate(&[
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "7",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("at pH=7.0"));
}
