// this_file: crates/typsm-fontdb/src/woff.rs

//! Unwrapping WOFF 1.0 files into plain sfnt data
//!
//! WOFF stores each table zlib-compressed (or raw when compression did not
//! pay off) behind its own header and directory. Metadata and private
//! blocks are dropped.

use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;
use typsm_core::error::{FontLoadError, Result};

use crate::sfnt::{SfntBuilder, MAX_TABLES};

pub const WOFF_SIGNATURE: &[u8; 4] = b"wOFF";
pub const WOFF2_SIGNATURE: &[u8; 4] = b"wOF2";

const HEADER_LEN: usize = 44;
const DIRECTORY_ENTRY_LEN: usize = 20;

pub fn is_woff(data: &[u8]) -> bool {
    data.starts_with(WOFF_SIGNATURE)
}

pub fn is_woff2(data: &[u8]) -> bool {
    data.starts_with(WOFF2_SIGNATURE)
}

/// Decode WOFF `data` read from `path` into an sfnt binary
pub fn decode(data: &[u8], path: &Path) -> Result<Vec<u8>> {
    let invalid = || FontLoadError::InvalidData(path.to_path_buf());

    if !is_woff(data) || data.len() < HEADER_LEN {
        return Err(invalid().into());
    }
    let flavor = read_u32(data, 4).ok_or_else(invalid)?;
    let num_tables = read_u16(data, 12).ok_or_else(invalid)? as usize;
    if num_tables > MAX_TABLES {
        return Err(invalid().into());
    }

    let mut builder = SfntBuilder::new(flavor);
    for index in 0..num_tables {
        let entry = HEADER_LEN + index * DIRECTORY_ENTRY_LEN;
        let tag = data
            .get(entry..entry + 4)
            .and_then(|t| <[u8; 4]>::try_from(t).ok())
            .ok_or_else(invalid)?;
        let offset = read_u32(data, entry + 4).ok_or_else(invalid)? as usize;
        let comp_length = read_u32(data, entry + 8).ok_or_else(invalid)? as usize;
        let orig_length = read_u32(data, entry + 12).ok_or_else(invalid)? as usize;

        let stored = data
            .get(offset..offset.saturating_add(comp_length))
            .ok_or_else(invalid)?;
        let table = if comp_length < orig_length {
            let mut table = Vec::new();
            ZlibDecoder::new(stored)
                .take(orig_length as u64 + 1)
                .read_to_end(&mut table)
                .map_err(|_| invalid())?;
            if table.len() != orig_length {
                return Err(invalid().into());
            }
            table
        } else if comp_length == orig_length {
            stored.to_vec()
        } else {
            return Err(invalid().into());
        };
        builder.push(tag, table);
    }

    log::debug!("unwrapped {} WOFF table(s) from {}", builder.len(), path.display());
    Ok(builder.build())
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}
