//! ZIP container framing for `.haven` archives. A thin wrapper over the
//! `zip` crate so the builder/reader never deal with `ZipWriter`/`ZipArchive`
//! directly.

use std::io::{Cursor, Read, Write};

use indexmap::IndexMap;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::ArchiveError;

/// Pack a path -> bytes map into a ZIP container, in iteration order.
pub fn pack(files: &IndexMap<String, Vec<u8>>) -> Result<Vec<u8>, ArchiveError> {
    let mut buf = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut buf));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (path, data) in files {
            writer.start_file(path, options)?;
            writer.write_all(data)?;
        }
        writer.finish()?;
    }
    Ok(buf)
}

/// Unpack a ZIP container into a path -> bytes map, preserving the entry
/// order recorded in the ZIP's central directory.
pub fn unpack(bytes: &[u8]) -> Result<IndexMap<String, Vec<u8>>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut out = IndexMap::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        out.insert(file.name().to_string(), data);
    }
    Ok(out)
}
