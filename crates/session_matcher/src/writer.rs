//! CSV output for matcher stages
//!
//! Files are written next to their final path and renamed into place, so an
//! interrupted run never leaves a partial file that later counts as cached.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use contracts::{LabelError, Match, Result, TimestampedRecords};

/// Write `path` through a temporary sibling file
pub(crate) fn write_atomic<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let tmp = path.with_extension("tmp");

    let written = File::create(&tmp).and_then(|file| {
        let mut writer = BufWriter::new(file);
        body(&mut writer)?;
        writer.flush()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(LabelError::io(&tmp, e));
    }

    fs::rename(&tmp, path).map_err(|e| LabelError::io(path, e))
}

/// Write association results as `first,offset,<first fields>,<second fields>`
pub(crate) fn write_matches(
    path: &Path,
    header: &str,
    matches: &[Match],
    first: &TimestampedRecords,
    second: &TimestampedRecords,
) -> Result<()> {
    write_atomic(path, |w| {
        writeln!(w, "{header}")?;
        for m in matches {
            // both stamps come from the maps' own keys
            writeln!(
                w,
                "{},{},{},{}",
                m.first,
                m.offset(),
                first[&m.first].join(","),
                second[&m.second].join(",")
            )?;
        }
        Ok(())
    })
}
