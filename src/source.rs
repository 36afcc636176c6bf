use crate::error::{IngestError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Where the CSV export comes from
pub enum Source {
    Path(PathBuf),
    Reader(Box<dyn Read + Send>),
}

impl Source {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Source::Path(path.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Source::Reader(Box::new(reader))
    }

    /// In-memory source, mostly useful for tests and dry runs
    pub fn text(text: impl Into<String>) -> Self {
        Source::Reader(Box::new(std::io::Cursor::new(text.into().into_bytes())))
    }

    pub fn describe(&self) -> String {
        match self {
            Source::Path(path) => path.display().to_string(),
            Source::Reader(_) => "<stream>".to_string(),
        }
    }

    /// Open the source for reading. Failure here is fatal for the run.
    #[instrument(skip(self), fields(source = %self.describe()))]
    pub fn open(self) -> Result<Box<dyn Read + Send>> {
        match self {
            Source::Path(path) => {
                let file = open_file(&path)?;
                debug!("Opened source file");
                Ok(Box::new(BufReader::new(file)))
            }
            Source::Reader(reader) => Ok(reader),
        }
    }
}

fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| IngestError::Source {
        message: format!("Failed to open '{}': {}", path.display(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_source_error() {
        let result = Source::path("/definitely/not/here/food.csv").open();
        assert!(matches!(result, Err(IngestError::Source { .. })));
    }

    #[test]
    fn test_open_file_reads_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name\nMilk").unwrap();

        let mut reader = Source::path(file.path()).open().unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        assert_eq!(text, "name\nMilk\n");
    }
}
