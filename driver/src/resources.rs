//! Per-pipeline registry of output streams and temporary directories.
//!
//! Output files are written to a temporary file next to their target and
//! only moved into place by [`Resources::commit`]; anything still open at
//! [`Resources::shutdown`] is discarded, so a failed compilation leaves no
//! output behind. Shutdown runs once; `Drop` runs it if the owner did not.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use snafu::{IntoError, OptionExt, ResultExt};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, warn};

use crate::error::{
    CleanupSnafu, CreateTempDirSnafu, PersistOutputSnafu, Result, UnknownStreamSnafu, WriteOutputSnafu,
};

/// Handle of an output stream registered in [`Resources`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(usize);

struct OutputStream {
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

pub struct Resources {
    keep_temp_dirs: bool,
    temp_dirs: Vec<TempDir>,
    streams: Vec<Option<OutputStream>>,
    closed: bool,
}

impl Resources {
    /// With `keep_temp_dirs`, temporary directories survive shutdown.
    pub fn new(keep_temp_dirs: bool) -> Self {
        Self { keep_temp_dirs, temp_dirs: Vec::new(), streams: Vec::new(), closed: false }
    }

    /// Fresh temporary directory, deleted at shutdown.
    pub fn temp_dir(&mut self) -> Result<PathBuf> {
        let dir = tempfile::Builder::new().prefix("_KG").tempdir().context(CreateTempDirSnafu)?;
        let path = dir.path().to_path_buf();
        debug!(path = %path.display(), "temporary directory created");
        self.temp_dirs.push(dir);
        Ok(path)
    }

    /// Open an output stream that [`Self::commit`] moves to `target`.
    pub fn open_output(&mut self, target: &Path) -> Result<StreamId> {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = NamedTempFile::new_in(dir).context(WriteOutputSnafu { path: target })?;
        self.streams.push(Some(OutputStream { target: target.to_path_buf(), writer: BufWriter::new(file) }));
        Ok(StreamId(self.streams.len() - 1))
    }

    /// Write `text` to stream `id`.
    pub fn write(&mut self, id: StreamId, text: &str) -> Result<()> {
        let stream = self.streams.get_mut(id.0).and_then(Option::as_mut).context(UnknownStreamSnafu { index: id.0 })?;
        stream.writer.write_all(text.as_bytes()).context(WriteOutputSnafu { path: &stream.target })
    }

    /// Flush stream `id` and move it to its target.
    pub fn commit(&mut self, id: StreamId) -> Result<PathBuf> {
        let stream = self.streams.get_mut(id.0).and_then(Option::take).context(UnknownStreamSnafu { index: id.0 })?;
        let OutputStream { target, writer } = stream;
        let file = writer
            .into_inner()
            .map_err(std::io::IntoInnerError::into_error)
            .context(WriteOutputSnafu { path: &target })?;
        file.persist(&target).context(PersistOutputSnafu { path: &target })?;
        debug!(path = %target.display(), "output committed");
        Ok(target)
    }

    /// Streams opened and neither committed nor discarded yet.
    pub fn nb_open_streams(&self) -> usize {
        self.streams.iter().filter(|s| s.is_some()).count()
    }

    pub fn nb_temp_dirs(&self) -> usize {
        self.temp_dirs.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Discard uncommitted streams and delete temporary directories.
    ///
    /// Every resource is released even when one fails; the first failure
    /// is returned. Later calls do nothing.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut first_error = None;
        for stream in self.streams.drain(..).flatten() {
            let OutputStream { target, writer } = stream;
            debug!(path = %target.display(), "discarding uncommitted output");
            let (file, _) = writer.into_parts();
            let path = file.path().to_path_buf();
            if let Err(source) = file.close() {
                warn!(path = %path.display(), %source, "shutdown: could not close an open stream");
                first_error.get_or_insert(CleanupSnafu { path }.into_error(source));
            }
        }

        for dir in self.temp_dirs.drain(..) {
            let path = dir.path().to_path_buf();
            if self.keep_temp_dirs {
                let kept = dir.keep();
                debug!(path = %kept.display(), "temporary directory kept");
                continue;
            }
            if let Err(source) = dir.close() {
                warn!(path = %path.display(), %source, "shutdown: could not delete temporary directory");
                first_error.get_or_insert(CleanupSnafu { path }.into_error(source));
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for Resources {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!(%err, "resource cleanup failed");
        }
    }
}
