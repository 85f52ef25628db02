use std::collections::HashMap;
use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;

use super::ZipEntry;
use crate::error::Error;

/// Re-assemble the archive entry-for-entry in original order, substituting
/// the rewritten parts. Everything happens in memory; the caller writes the
/// returned bytes in a single operation so a failed transform leaves no
/// partial output behind.
pub(super) fn write_package(
    entries: &[ZipEntry],
    replaced: &HashMap<String, String>,
) -> Result<Vec<u8>, Error> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in entries {
        if entry.is_dir {
            writer.add_directory(entry.name.trim_end_matches('/'), options)?;
            continue;
        }
        writer.start_file(entry.name.as_str(), options)?;
        match replaced.get(&entry.name) {
            Some(text) => writer.write_all(text.as_bytes())?,
            None => writer.write_all(&entry.data)?,
        }
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
