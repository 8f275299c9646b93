//! Unsigned LEB128 varints used by directory columns

use crate::error::{FormatError, Result};

/// Longest encoding of a `u64`
pub const MAX_VARINT_LEN: usize = 10;

/// Read a varint starting at `offset`, advancing it past the value
pub fn read_varint(data: &[u8], offset: &mut usize) -> Result<u64> {
    let start = *offset;
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = data.get(*offset) else {
            return Err(FormatError::Varint(start));
        };
        *offset += 1;

        let value = u64::from(byte & 0x7F);
        // The tenth byte may only contribute the top bit
        if shift == 63 && value > 1 {
            return Err(FormatError::Varint(start));
        }
        result |= value << shift;

        if (byte & 0x80) == 0 {
            return Ok(result);
        }

        shift += 7;
        if shift >= 64 {
            return Err(FormatError::Varint(start));
        }
    }
}

/// Append a varint to `data`
pub fn write_varint(value: u64, data: &mut Vec<u8>) {
    let mut value = value;

    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;

        if value != 0 {
            byte |= 0x80; // Set continuation bit
        }

        data.push(byte);

        if value == 0 {
            break;
        }
    }
}
