use protopdb::core::io::pdb::PdbError;
use protopdb::workflows::protonate::ProtonationError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error("Failed to write file '{path}': {source}", path = path.display())]
    FileWriting {
        path: PathBuf,
        #[source]
        source: PdbError,
    },

    #[error(transparent)]
    Protonation(#[from] ProtonationError),
}
