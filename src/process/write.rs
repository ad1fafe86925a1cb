use csv::{Terminator, WriterBuilder};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use super::RawTable;
use crate::error::{PipelineError, PipelineResult};

/// Write `table` as CSV to `path`, header first.
///
/// The data goes to a hidden `.<name>.tmp` sibling that is renamed over
/// `path` once fully flushed, so a failed run never leaves a truncated
/// output behind. With `create_parent` unset a missing parent directory
/// is an I/O error. Returns the number of data rows written.
#[tracing::instrument(level = "info", skip(path, table), fields(path = %path.display()))]
pub fn write_csv(path: &Path, table: &RawTable, create_parent: bool) -> PipelineResult<usize> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        PipelineError::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;

    if create_parent {
        fs::create_dir_all(&parent).map_err(|e| PipelineError::io(&parent, e))?;
    }

    let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));
    if let Err(e) = write_rows(&tmp_path, table) {
        discard_tmp(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        discard_tmp(&tmp_path);
        return Err(PipelineError::io(path, e));
    }

    info!(rows = table.len(), "wrote output");
    Ok(table.len())
}

fn discard_tmp(tmp_path: &Path) {
    if let Err(rm) = fs::remove_file(tmp_path) {
        if rm.kind() != io::ErrorKind::NotFound {
            warn!(path = %tmp_path.display(), error = %rm, "could not remove temp file");
        }
    }
}

fn write_rows(tmp_path: &Path, table: &RawTable) -> PipelineResult<()> {
    let file = File::create(tmp_path).map_err(|e| PipelineError::io(tmp_path, e))?;
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);

    wtr.write_record(&table.headers)
        .map_err(|e| PipelineError::from_csv(tmp_path, e))?;
    for row in &table.rows {
        wtr.write_record(row)
            .map_err(|e| PipelineError::from_csv(tmp_path, e))?;
    }

    let file = wtr.into_inner().map_err(|e| {
        let err = e.error();
        PipelineError::io(tmp_path, io::Error::new(err.kind(), err.to_string()))
    })?;
    file.sync_all().map_err(|e| PipelineError::io(tmp_path, e))?;
    debug!(path = %tmp_path.display(), "flushed temp file");
    Ok(())
}
