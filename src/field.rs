//! The tag field: a self-describing, type-tagged value cell.
//!
//! A [`Field`] is the smallest independently parsed/rendered unit inside a
//! frame. It holds exactly one of: an unsigned integer, a list of text items,
//! or a binary buffer. The active kind is fixed at construction from the
//! frame's [`FieldDef`](crate::registry::FieldDef) and never changes.
//!
//! ## Text handling
//!
//! All text is stored internally as `String` (Unicode), no matter which
//! accessor group set it. The presentation encoding only matters at the
//! get/set boundary and at render time:
//!
//! - Latin-1 views transcode from the canonical text; characters above U+00FF
//!   become [`LATIN1_SUBSTITUTE`]. The substitution is deterministic, never a
//!   hard error.
//! - UTF-16 rendering writes a FF FE byte-order mark and little-endian code
//!   units per item. Parsing honors either byte-order mark and falls back to
//!   big-endian when none is present.
//!
//! Multi-item fields serialize their items separated by one NUL of the
//! encoding's code-unit width. A field flagged [`CSTR`](field_flags::CSTR)
//! instead terminates each item and parses exactly one item, leaving the rest
//! of the window to the fields that follow it in the frame.
//!
//! ## Failure behavior
//!
//! Calling an accessor group against the wrong kind is a usage error and
//! reports [`FieldError::KindMismatch`]. A failed [`Field::parse`] leaves the
//! field in its prior state.

use crate::registry::{field_flags, FieldDef, FieldId};
use crate::version::Version;
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// The closed set of data shapes a field may hold.
///
/// `AsciiText` fields are single-byte in every tag revision (language codes,
/// URLs, owner identifiers); `UnicodeText` fields follow the frame's text
/// encoding byte and may switch presentation encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    AsciiText,
    UnicodeText,
    Binary,
}

/// Presentation encoding for text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Single-byte text (ISO-8859-1).
    Latin1,
    /// Two-byte text with byte-order mark.
    Utf16,
}

/// Substitute byte for characters with no Latin-1 mapping.
pub const LATIN1_SUBSTITUTE: u8 = b'?';

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Kind mismatch: {0}")]
    KindMismatch(String),
    #[error("Out of range: {0}")]
    OutOfRange(String),
    #[error("Malformed: {0}")]
    Malformed(String),
}

/// Storage for the active kind. Exactly one variant is live per field.
#[derive(Debug, Clone, PartialEq)]
enum FieldData {
    Integer(u32),
    Text(Vec<String>),
    Binary(Vec<u8>),
}

/// A single typed field within a frame.
#[derive(Debug, Clone)]
pub struct Field {
    id: FieldId,
    kind: FieldKind,
    data: FieldData,
    encoding: TextEncoding,
    fixed_size: usize,
    flags: u16,
    spec_begin: Version,
    spec_end: Version,
    changed: bool,
}

impl Field {
    /// Create an empty field bound to one descriptor. The kind, identity,
    /// size, flags, and version range come from the frame table; the default
    /// presentation encoding is Latin-1.
    pub fn new(def: &FieldDef) -> Field {
        let data = match def.kind {
            FieldKind::Integer => FieldData::Integer(0),
            FieldKind::AsciiText | FieldKind::UnicodeText => FieldData::Text(Vec::new()),
            FieldKind::Binary => FieldData::Binary(Vec::new()),
        };
        Field {
            id: def.id,
            kind: def.kind,
            data,
            encoding: TextEncoding::Latin1,
            fixed_size: def.fixed_size,
            flags: def.flags,
            spec_begin: def.spec_begin,
            spec_end: def.spec_end,
            changed: false,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// True iff this field belongs in a tag of the given revision.
    pub fn in_scope(&self, version: Version) -> bool {
        self.spec_begin <= version && version <= self.spec_end
    }

    /// True once any mutation (set, add, clear, assign, successful parse) has
    /// happened. Never cleared by this type; the owning frame calls
    /// [`Field::reset_changed`] after a render pass.
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Owner-side reset of the change flag.
    pub fn reset_changed(&mut self) {
        self.changed = false;
    }

    /// Reset storage to the kind's empty value.
    pub fn clear(&mut self) {
        self.data = match self.kind {
            FieldKind::Integer => FieldData::Integer(0),
            FieldKind::AsciiText | FieldKind::UnicodeText => FieldData::Text(Vec::new()),
            FieldKind::Binary => FieldData::Binary(Vec::new()),
        };
        self.changed = true;
    }

    /// Logical size: integer byte width, total characters across text items,
    /// byte length for binary.
    pub fn size(&self) -> usize {
        match &self.data {
            FieldData::Integer(_) => self.int_width(),
            FieldData::Text(items) => items.iter().map(|s| s.chars().count()).sum(),
            FieldData::Binary(b) => b.len(),
        }
    }

    /// Exact number of bytes [`Field::render`] will produce for the current
    /// value, encoding, and flags. Derived from the same layout code as
    /// render, so the two cannot drift apart.
    pub fn bin_size(&self) -> usize {
        match &self.data {
            FieldData::Integer(_) => self.int_width(),
            FieldData::Text(items) => self.text_payload(items).len(),
            FieldData::Binary(b) => b.len(),
        }
    }

    pub fn num_text_items(&self) -> usize {
        match &self.data {
            FieldData::Text(items) => items.len(),
            _ => 0,
        }
    }

    /// True iff the serialized encoding of this field follows the frame's
    /// text-encoding byte. Fixed single-byte text (language codes, URLs) is
    /// not encodable.
    pub fn is_encodable(&self) -> bool {
        self.kind == FieldKind::UnicodeText
    }

    /// Switch the presentation encoding. Returns false (and changes nothing)
    /// unless the field is encodable. The stored text is unaffected either
    /// way.
    pub fn set_encoding(&mut self, encoding: TextEncoding) -> bool {
        if !self.is_encodable() {
            return false;
        }
        self.encoding = encoding;
        true
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Deep-copy the other field's storage, encoding, and identity. The kinds
    /// must match; the destination is marked changed.
    pub fn assign_from(&mut self, other: &Field) -> Result<(), FieldError> {
        if self.kind != other.kind {
            return Err(FieldError::KindMismatch(format!(
                "assign_from: {:?} field from {:?} field",
                self.kind, other.kind
            )));
        }
        self.data = other.data.clone();
        self.encoding = other.encoding;
        self.id = other.id;
        self.changed = true;
        Ok(())
    }

    // --- integer group ---

    pub fn set_integer(&mut self, value: u32) -> Result<(), FieldError> {
        match &mut self.data {
            FieldData::Integer(v) => {
                *v = value;
                self.changed = true;
                Ok(())
            }
            _ => Err(self.kind_mismatch("set_integer")),
        }
    }

    pub fn integer(&self) -> Result<u32, FieldError> {
        match &self.data {
            FieldData::Integer(v) => Ok(*v),
            _ => Err(self.kind_mismatch("integer")),
        }
    }

    // --- ASCII (Latin-1) group ---

    /// Replace the item list with one item decoded from Latin-1 bytes.
    /// Returns the number of bytes stored.
    pub fn set_latin1(&mut self, bytes: &[u8]) -> Result<usize, FieldError> {
        let items = self.text_items_mut("set_latin1")?;
        items.clear();
        items.push(from_latin1(bytes));
        self.changed = true;
        Ok(bytes.len())
    }

    /// Append one item decoded from Latin-1 bytes.
    pub fn add_latin1(&mut self, bytes: &[u8]) -> Result<usize, FieldError> {
        let items = self.text_items_mut("add_latin1")?;
        items.push(from_latin1(bytes));
        self.changed = true;
        Ok(bytes.len())
    }

    /// The whole text as Latin-1 bytes, items separated by NUL. Characters
    /// above U+00FF become [`LATIN1_SUBSTITUTE`].
    pub fn latin1(&self) -> Result<Vec<u8>, FieldError> {
        let items = self.text_items("latin1")?;
        let mut out = Vec::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push(0);
            }
            out.extend_from_slice(&to_latin1(item));
        }
        Ok(out)
    }

    /// One item as Latin-1 bytes.
    pub fn latin1_item(&self, index: usize) -> Result<Vec<u8>, FieldError> {
        Ok(to_latin1(self.text_item(index)?))
    }

    /// Copy the joined Latin-1 text into `buf`, truncating at its length.
    /// Returns the number of bytes written; never writes past the buffer.
    pub fn latin1_into(&self, buf: &mut [u8]) -> Result<usize, FieldError> {
        let joined = self.latin1()?;
        let n = joined.len().min(buf.len());
        buf[..n].copy_from_slice(&joined[..n]);
        Ok(n)
    }

    /// Copy one item's Latin-1 bytes into `buf`, truncating at its length.
    pub fn latin1_item_into(&self, buf: &mut [u8], index: usize) -> Result<usize, FieldError> {
        let item = self.latin1_item(index)?;
        let n = item.len().min(buf.len());
        buf[..n].copy_from_slice(&item[..n]);
        Ok(n)
    }

    // --- Unicode group ---

    /// Replace the item list with one item. Returns the number of characters
    /// stored.
    pub fn set_text(&mut self, text: &str) -> Result<usize, FieldError> {
        let items = self.text_items_mut("set_text")?;
        items.clear();
        items.push(text.to_owned());
        self.changed = true;
        Ok(text.chars().count())
    }

    /// Append one item.
    pub fn add_text(&mut self, text: &str) -> Result<usize, FieldError> {
        let items = self.text_items_mut("add_text")?;
        items.push(text.to_owned());
        self.changed = true;
        Ok(text.chars().count())
    }

    /// The whole text, items joined with U+0000. Lossless.
    pub fn text(&self) -> Result<String, FieldError> {
        Ok(self.text_items("text")?.join("\u{0}"))
    }

    pub fn text_item(&self, index: usize) -> Result<&str, FieldError> {
        let items = self.text_items("text_item")?;
        items
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| FieldError::OutOfRange(format!("item {} of {}", index, items.len())))
    }

    /// Copy the joined text as UTF-16 code units into `buf` (no byte-order
    /// mark), items separated by a zero unit. Truncates at the buffer length
    /// and returns the number of units written.
    pub fn utf16_into(&self, buf: &mut [u16]) -> Result<usize, FieldError> {
        let items = self.text_items("utf16_into")?;
        let mut n = 0;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                if n == buf.len() {
                    return Ok(n);
                }
                buf[n] = 0;
                n += 1;
            }
            for unit in item.encode_utf16() {
                if n == buf.len() {
                    return Ok(n);
                }
                buf[n] = unit;
                n += 1;
            }
        }
        Ok(n)
    }

    /// Copy one item's UTF-16 code units into `buf`, truncating at its length.
    pub fn utf16_item_into(&self, buf: &mut [u16], index: usize) -> Result<usize, FieldError> {
        let item = self.text_item(index)?;
        let mut n = 0;
        for unit in item.encode_utf16() {
            if n == buf.len() {
                return Ok(n);
            }
            buf[n] = unit;
            n += 1;
        }
        Ok(n)
    }

    // --- binary group ---

    pub fn set_binary(&mut self, bytes: &[u8]) -> Result<(), FieldError> {
        match &mut self.data {
            FieldData::Binary(b) => {
                b.clear();
                b.extend_from_slice(bytes);
                self.changed = true;
                Ok(())
            }
            _ => Err(self.kind_mismatch("set_binary")),
        }
    }

    pub fn binary(&self) -> Result<&[u8], FieldError> {
        match &self.data {
            FieldData::Binary(b) => Ok(b),
            _ => Err(self.kind_mismatch("binary")),
        }
    }

    /// Copy the buffer into `buf`, truncating at its length.
    pub fn binary_into(&self, buf: &mut [u8]) -> Result<usize, FieldError> {
        let bytes = self.binary()?;
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }

    /// Replace the buffer with the contents of a file. The field is left
    /// unchanged if the file cannot be read. Returns the byte count.
    pub fn from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, FieldError> {
        if !matches!(self.data, FieldData::Binary(_)) {
            return Err(self.kind_mismatch("from_file"));
        }
        let bytes = fs::read(path)?;
        let n = bytes.len();
        self.data = FieldData::Binary(bytes);
        self.changed = true;
        Ok(n)
    }

    /// Write the buffer to a file. Read-only: the change flag is untouched.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), FieldError> {
        let bytes = self.binary()?;
        fs::write(path, bytes)?;
        Ok(())
    }

    // --- parse / render ---

    /// Serialize the current value into the writer. Pure: the field is not
    /// mutated. Writes only this field's bytes (frame headers are the owning
    /// frame's job) and returns the count, which equals [`Field::bin_size`].
    pub fn render(&self, w: &mut Vec<u8>) -> Result<usize, FieldError> {
        match &self.data {
            FieldData::Integer(v) => {
                let width = self.int_width();
                let mask = if width >= 4 {
                    u64::from(u32::MAX)
                } else {
                    (1u64 << (width * 8)) - 1
                };
                let mut buf = [0u8; 4];
                BigEndian::write_uint(&mut buf[..width], u64::from(*v) & mask, width);
                w.extend_from_slice(&buf[..width]);
                Ok(width)
            }
            FieldData::Text(items) => {
                let payload = self.text_payload(items);
                w.extend_from_slice(&payload);
                Ok(payload.len())
            }
            FieldData::Binary(b) => {
                w.extend_from_slice(b);
                Ok(b.len())
            }
        }
    }

    /// Consume exactly this field's bytes from the cursor window the owning
    /// frame supplies and replace the stored value. On error the field keeps
    /// its prior state and the cursor is not advanced.
    pub fn parse(&mut self, r: &mut Cursor<&[u8]>) -> Result<(), FieldError> {
        let window = remaining_window(r);
        match self.kind {
            FieldKind::Integer => {
                let width = self.int_width();
                if window.len() < width {
                    return Err(FieldError::Malformed(format!(
                        "integer field: need {} bytes, have {}",
                        width,
                        window.len()
                    )));
                }
                let v = BigEndian::read_uint(&window[..width], width) as u32;
                advance(r, width);
                self.data = FieldData::Integer(v);
            }
            FieldKind::Binary => {
                let n = if self.fixed_size > 0 {
                    if window.len() < self.fixed_size {
                        return Err(FieldError::Malformed(format!(
                            "binary field: need {} bytes, have {}",
                            self.fixed_size,
                            window.len()
                        )));
                    }
                    self.fixed_size
                } else {
                    window.len()
                };
                let buf = window[..n].to_vec();
                advance(r, n);
                self.data = FieldData::Binary(buf);
            }
            FieldKind::AsciiText | FieldKind::UnicodeText => {
                let (items, consumed) = self.parse_text(window)?;
                advance(r, consumed);
                self.data = FieldData::Text(items);
            }
        }
        self.changed = true;
        Ok(())
    }

    // --- internals ---

    fn kind_mismatch(&self, op: &str) -> FieldError {
        FieldError::KindMismatch(format!("{} called on {:?} field", op, self.kind))
    }

    fn text_items(&self, op: &str) -> Result<&[String], FieldError> {
        match &self.data {
            FieldData::Text(items) => Ok(items),
            _ => Err(self.kind_mismatch(op)),
        }
    }

    fn text_items_mut(&mut self, op: &str) -> Result<&mut Vec<String>, FieldError> {
        let kind = self.kind;
        match &mut self.data {
            FieldData::Text(items) => Ok(items),
            _ => Err(FieldError::KindMismatch(format!(
                "{} called on {:?} field",
                op, kind
            ))),
        }
    }

    fn int_width(&self) -> usize {
        if (1..=4).contains(&self.fixed_size) {
            self.fixed_size
        } else {
            4
        }
    }

    /// The encoding actually used on the wire. `AsciiText` fields are
    /// single-byte in every revision regardless of the presentation encoding.
    fn effective_encoding(&self) -> TextEncoding {
        match self.kind {
            FieldKind::UnicodeText => self.encoding,
            _ => TextEncoding::Latin1,
        }
    }

    /// Serialized text layout. Shared by render and bin_size.
    fn text_payload(&self, items: &[String]) -> Vec<u8> {
        let mut out = Vec::new();
        if self.fixed_size > 0 {
            // Fixed-width text cells are single-byte, NUL padded.
            let mut bytes = items.first().map(|s| to_latin1(s)).unwrap_or_default();
            bytes.truncate(self.fixed_size);
            bytes.resize(self.fixed_size, 0);
            out.extend_from_slice(&bytes);
            return out;
        }
        let enc = self.effective_encoding();
        let terminated = self.flags & field_flags::CSTR != 0;
        for (i, item) in items.iter().enumerate() {
            if i > 0 && !terminated {
                push_nul(&mut out, enc);
            }
            match enc {
                TextEncoding::Latin1 => out.extend_from_slice(&to_latin1(item)),
                TextEncoding::Utf16 => {
                    out.extend_from_slice(&[0xFF, 0xFE]);
                    for unit in item.encode_utf16() {
                        out.extend_from_slice(&unit.to_le_bytes());
                    }
                }
            }
            if terminated {
                push_nul(&mut out, enc);
            }
        }
        out
    }

    /// Decode the text items this field owns out of `window`, returning the
    /// items and the number of bytes consumed.
    fn parse_text(&self, window: &[u8]) -> Result<(Vec<String>, usize), FieldError> {
        if self.fixed_size > 0 {
            if window.len() < self.fixed_size {
                return Err(FieldError::Malformed(format!(
                    "text field: need {} bytes, have {}",
                    self.fixed_size,
                    window.len()
                )));
            }
            let mut cell = &window[..self.fixed_size];
            while let [rest @ .., 0] = cell {
                cell = rest;
            }
            return Ok((vec![from_latin1(cell)], self.fixed_size));
        }
        let enc = self.effective_encoding();
        if self.flags & field_flags::CSTR != 0 {
            // One terminated item; the remainder belongs to following fields.
            let (item, consumed, _) = read_item(window, enc)?;
            return Ok((vec![item], consumed));
        }
        // Trailing variable text: the whole window, split on separators.
        let mut items = Vec::new();
        let mut pos = 0;
        let mut trailing_sep = false;
        while pos < window.len() {
            let (item, consumed, sep) = read_item(&window[pos..], enc)?;
            items.push(item);
            pos += consumed;
            trailing_sep = sep;
        }
        if trailing_sep {
            items.push(String::new());
        }
        Ok((items, window.len()))
    }
}

fn to_latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                LATIN1_SUBSTITUTE
            }
        })
        .collect()
}

fn from_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn push_nul(out: &mut Vec<u8>, enc: TextEncoding) {
    match enc {
        TextEncoding::Latin1 => out.push(0),
        TextEncoding::Utf16 => out.extend_from_slice(&[0, 0]),
    }
}

/// Read one item up to its separator/terminator or the end of the window.
/// Returns (item, bytes consumed including any separator, separator seen).
fn read_item(window: &[u8], enc: TextEncoding) -> Result<(String, usize, bool), FieldError> {
    match enc {
        TextEncoding::Latin1 => match window.iter().position(|&b| b == 0) {
            Some(idx) => Ok((from_latin1(&window[..idx]), idx + 1, true)),
            None => Ok((from_latin1(window), window.len(), false)),
        },
        TextEncoding::Utf16 => read_utf16_item(window),
    }
}

/// UTF-16 item: optional byte-order mark, then code units to a zero unit or
/// the window end. Without a mark the units are read big-endian.
fn read_utf16_item(window: &[u8]) -> Result<(String, usize, bool), FieldError> {
    let mut units: Vec<u16> = Vec::new();
    let mut pos = 0;
    let mut little = false;
    let mut first = true;
    while pos < window.len() {
        if window.len() - pos < 2 {
            return Err(FieldError::Malformed(
                "odd-length UTF-16 text payload".to_owned(),
            ));
        }
        let unit = if little {
            LittleEndian::read_u16(&window[pos..])
        } else {
            BigEndian::read_u16(&window[pos..])
        };
        pos += 2;
        if first {
            first = false;
            if unit == 0xFEFF {
                continue;
            }
            if unit == 0xFFFE {
                little = true;
                continue;
            }
        }
        if unit == 0 {
            let item = String::from_utf16(&units)
                .map_err(|_| FieldError::Malformed("invalid UTF-16 text".to_owned()))?;
            return Ok((item, pos, true));
        }
        units.push(unit);
    }
    let item = String::from_utf16(&units)
        .map_err(|_| FieldError::Malformed("invalid UTF-16 text".to_owned()))?;
    Ok((item, pos, false))
}

fn remaining_window<'a>(r: &Cursor<&'a [u8]>) -> &'a [u8] {
    let data: &'a [u8] = *r.get_ref();
    let pos = (r.position() as usize).min(data.len());
    &data[pos..]
}

fn advance(r: &mut Cursor<&[u8]>, n: usize) {
    r.set_position(r.position() + n as u64);
}
