use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

fn unwritable(path: &Path, source: std::io::Error) -> Error {
    Error::DestinationUnwritable {
        path: path.to_path_buf(),
        source,
    }
}

/// Output file that only becomes visible at `path` once committed. Dropping
/// it without committing removes the temporary file.
pub struct Staged {
    path: PathBuf,
    file: NamedTempFile,
}

impl Staged {
    pub fn create(path: &Path) -> Result<Staged> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file = tempfile::Builder::new()
            .prefix(".gleba-")
            .suffix(".part")
            .tempfile_in(dir)
            .map_err(|e| unwritable(path, e))?;
        Ok(Staged {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn commit(self) -> Result<PathBuf> {
        let Staged { path, file } = self;
        file.as_file().sync_all().map_err(|e| unwritable(&path, e))?;
        file.persist(&path).map_err(|e| unwritable(&path, e.error))?;
        Ok(path)
    }
}

impl Write for Staged {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let mut staged = Staged::create(path)?;
    staged.write_all(bytes).map_err(|e| unwritable(path, e))?;
    staged.commit()
}
