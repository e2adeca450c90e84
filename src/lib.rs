//! # tagfield — Tag Field Codec and Frame Registry
//!
//! Building blocks for the ID3v2 family of binary metadata tags: a
//! polymorphic [`Field`] that parses/renders one typed value (integer,
//! single-byte text, Unicode text, or binary data), and a read-only
//! [`FrameRegistry`] describing which fields compose each known frame type.
//!
//! ## Field kinds
//!
//! - `Integer`: fixed-width big-endian unsigned value (1-4 bytes)
//! - `AsciiText`: single-byte (Latin-1) text, e.g. language codes and URLs
//! - `UnicodeText`: text whose wire encoding follows the frame's encoding
//!   byte (Latin-1 or UTF-16 with byte-order mark)
//! - `Binary`: opaque bytes, e.g. picture data
//!
//! Text is stored internally as Unicode regardless of how it was set; the
//! encoding only matters at the get/set boundary and on the wire. Text
//! fields may hold an ordered list of items (NUL-separated on the wire).
//!
//! ## Usage
//!
//! ```
//! use tagfield::{Field, FrameId, FrameRegistry, TextEncoding, Version};
//! use std::io::Cursor;
//!
//! // The title frame is an encoding byte plus one encodable text field.
//! let defs = FrameRegistry::field_defs(FrameId::Title);
//! let mut text = Field::new(&defs[1]);
//! text.set_text("Paranoid Android").unwrap();
//! text.set_encoding(TextEncoding::Utf16);
//! assert!(text.in_scope(Version::V2_4));
//!
//! let mut out = Vec::new();
//! let n = text.render(&mut out).unwrap();
//! assert_eq!(n, text.bin_size());
//!
//! let mut fresh = Field::new(&defs[1]);
//! fresh.set_encoding(TextEncoding::Utf16);
//! fresh.parse(&mut Cursor::new(&out[..])).unwrap();
//! assert_eq!(fresh.text().unwrap(), "Paranoid Android");
//! ```
//!
//! The owning frame drives the flow: it asks the registry for the field
//! descriptors of its frame id, instantiates one `Field` per descriptor, and
//! parses/renders them in order. Frame headers, the tag container, and
//! unsynchronization live above this crate.

pub mod field;
pub mod registry;
pub mod version;

pub use field::{Field, FieldError, FieldKind, TextEncoding, LATIN1_SUBSTITUTE};
pub use registry::{field_flags, FieldDef, FieldId, FrameDef, FrameId, FrameRegistry};
pub use version::Version;
