//! Length-prefixed wire strings.

use crate::error::BitError;
use crate::reader::BitReader;
use crate::writer::BitWriter;
use std::fmt;

/// A string as it appears on the wire.
///
/// The prefix is a signed 32-bit length. A positive length means that
/// many single-byte characters including a trailing NUL; a negative
/// length means `-length` UTF-16 code units including the trailing NUL;
/// zero means the empty string with no payload at all. The `wide` flag
/// records which representation was decoded so re-encoding reproduces
/// the original bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetString {
    /// Decoded text, without the trailing NUL.
    pub text: String,
    /// True when the wire form was UTF-16.
    pub wide: bool,
}

impl NetString {
    /// A narrow (single-byte) string.
    pub fn narrow(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            wide: false,
        }
    }

    /// A wide (UTF-16) string.
    pub fn wide(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            wide: true,
        }
    }

    pub(crate) fn read(r: &mut BitReader<'_>) -> Result<Self, BitError> {
        let start = r.position();
        let len = r.read_i32()?;
        if len == 0 {
            return Ok(Self::default());
        }
        if len > 0 {
            let mut bytes = Vec::with_capacity(len as usize);
            for _ in 0..len {
                bytes.push(r.read_u8()?);
            }
            if bytes.pop() != Some(0) {
                return Err(BitError::MalformedString {
                    bit: start,
                    detail: "narrow string missing trailing NUL".into(),
                });
            }
            Ok(Self {
                text: bytes.iter().map(|&b| b as char).collect(),
                wide: false,
            })
        } else {
            let units = len.checked_neg().ok_or_else(|| BitError::MalformedString {
                bit: start,
                detail: "string length prefix out of range".into(),
            })? as usize;
            let mut data = Vec::with_capacity(units);
            for _ in 0..units {
                data.push(r.read_fixed(16)? as u16);
            }
            if data.pop() != Some(0) {
                return Err(BitError::MalformedString {
                    bit: start,
                    detail: "wide string missing trailing NUL".into(),
                });
            }
            let text = String::from_utf16(&data).map_err(|e| BitError::MalformedString {
                bit: start,
                detail: format!("invalid UTF-16: {e}"),
            })?;
            Ok(Self { text, wide: true })
        }
    }

    pub(crate) fn write(&self, w: &mut BitWriter) -> Result<(), BitError> {
        if self.text.is_empty() {
            w.write_i32(0);
            return Ok(());
        }
        if self.wide {
            let units: Vec<u16> = self.text.encode_utf16().collect();
            w.write_i32(-((units.len() + 1) as i32));
            for unit in units {
                w.write_fixed(unit as u32, 16);
            }
            w.write_fixed(0, 16);
        } else {
            w.write_i32(self.text.chars().count() as i32 + 1);
            for c in self.text.chars() {
                if c as u32 > 0xFF {
                    return Err(BitError::MalformedString {
                        bit: w.position(),
                        detail: format!("character {c:?} not representable in a narrow string"),
                    });
                }
                w.write_u8(c as u8);
            }
            w.write_u8(0);
        }
        Ok(())
    }
}

impl fmt::Display for NetString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
