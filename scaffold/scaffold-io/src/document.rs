//! Region document encoding.
//!
//! A region file is a JSON object with a format tag, a version and the
//! serialized region:
//!
//! ```json
//! { "format": "scaffold-region", "version": 1, "region": { ... } }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use scaffold_types::Region;
use serde::{Deserialize, Serialize};

use crate::error::{RegionIoError, RegionIoResult};

/// Format tag written into every document.
pub const DOCUMENT_FORMAT: &str = "scaffold-region";

/// Document version this crate reads and writes.
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    format: &'a str,
    version: u32,
    region: &'a Region,
}

#[derive(Deserialize)]
struct Document {
    format: String,
    version: u32,
    region: Region,
}

pub(crate) fn encode<W: Write>(region: &Region, writer: W, origin: &Path) -> RegionIoResult<()> {
    let doc = DocumentRef {
        format: DOCUMENT_FORMAT,
        version: DOCUMENT_VERSION,
        region,
    };
    serde_json::to_writer_pretty(writer, &doc).map_err(|e| RegionIoError::document(origin, e))
}

pub(crate) fn decode<R: Read>(reader: R, origin: &Path) -> RegionIoResult<Region> {
    let doc: Document =
        serde_json::from_reader(reader).map_err(|e| RegionIoError::document(origin, e))?;
    if doc.format != DOCUMENT_FORMAT {
        let message = format!("expected format '{DOCUMENT_FORMAT}', found '{}'", doc.format);
        return Err(RegionIoError::document(
            origin,
            serde::de::Error::custom(message),
        ));
    }
    if doc.version != DOCUMENT_VERSION {
        return Err(RegionIoError::UnsupportedVersion {
            path: origin.to_path_buf(),
            found: doc.version,
            expected: DOCUMENT_VERSION,
        });
    }
    Ok(doc.region)
}

pub(crate) fn read_file(path: &Path) -> RegionIoResult<Region> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RegionIoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RegionIoError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    decode(BufReader::new(file), path)
}

pub(crate) fn write_file(region: &Region, file: &File, path: &Path) -> RegionIoResult<()> {
    let mut writer = BufWriter::new(file);
    encode(region, &mut writer, path)?;
    writer.flush().map_err(|e| RegionIoError::write(path, e))
}
