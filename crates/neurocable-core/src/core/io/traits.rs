use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The input file or resource does not exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Resource not found: '{}'", path.display())]
pub struct ResourceNotFound {
    pub path: PathBuf,
}

/// Defines the interface for reading and writing cable-mesh file formats.
///
/// Implementors handle format-specific parsing and serialization of their
/// [`Model`](CableFile::Model); the path-based helpers take care of opening
/// files and distinguishing a missing file from other I/O failures.
pub trait CableFile {
    /// The in-memory structure the format describes.
    type Model;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error> + From<ResourceNotFound>;

    /// Reads a model from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Self::Model, Self::Error>;

    /// Writes a model to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be represented in the format or
    /// writing fails.
    fn write_to(model: &Self::Model, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a model from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceNotFound`] (converted into `Self::Error`) if the file
    /// does not exist, or any error of [`read_from`](CableFile::read_from).
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self::Model, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => <Self::Error as From<ResourceNotFound>>::from(ResourceNotFound {
                path: path.to_path_buf(),
            }),
            _ => <Self::Error as From<io::Error>>::from(e),
        })?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes a model to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(model: &Self::Model, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(model, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
