//! Field tests: per-kind round-trips, transcoding, dirty tracking, version
//! scoping, bounds safety, and multi-field frame layout parsing.

use std::io::Cursor;

use tagfield::{
    field_flags, Field, FieldDef, FieldError, FieldId, FieldKind, FrameId, FrameRegistry,
    TextEncoding, Version,
};

fn def(id: FieldId, kind: FieldKind, fixed_size: usize, flags: u16) -> FieldDef {
    FieldDef {
        id,
        kind,
        fixed_size,
        spec_begin: Version::EARLIEST,
        spec_end: Version::LATEST,
        flags,
    }
}

fn text_def(kind: FieldKind) -> FieldDef {
    def(FieldId::Text, kind, 0, field_flags::NONE)
}

fn parse_fresh(template: &FieldDef, encoding: TextEncoding, bytes: &[u8]) -> Field {
    let mut field = Field::new(template);
    field.set_encoding(encoding);
    field
        .parse(&mut Cursor::new(bytes))
        .expect("parse rendered bytes");
    field
}

#[test]
fn round_trip_integer_widths() {
    for (width, value) in [(1usize, 0x2Au32), (2, 0xBEEF), (3, 0x01_02_03), (4, 0xDEAD_BEEF)] {
        let d = def(FieldId::Counter, FieldKind::Integer, width, field_flags::NONE);
        let mut field = Field::new(&d);
        field.set_integer(value).expect("set");
        let mut out = Vec::new();
        let n = field.render(&mut out).expect("render");
        assert_eq!(n, width);
        assert_eq!(n, field.bin_size());
        assert_eq!(out.len(), width);

        let mut fresh = Field::new(&d);
        fresh.parse(&mut Cursor::new(&out[..])).expect("parse");
        assert_eq!(fresh.integer().expect("get"), value);
    }
}

#[test]
fn integer_masks_to_field_width() {
    let d = def(FieldId::Rating, FieldKind::Integer, 2, field_flags::NONE);
    let mut field = Field::new(&d);
    field.set_integer(0x0001_BEEF).expect("set");
    let mut out = Vec::new();
    field.render(&mut out).expect("render");
    assert_eq!(out, [0xBE, 0xEF]);
}

#[test]
fn round_trip_latin1_items() {
    let d = text_def(FieldKind::AsciiText);
    let mut field = Field::new(&d);
    field.add_latin1(b"Lead").expect("add");
    field.add_latin1(b"Backing").expect("add");

    let mut out = Vec::new();
    field.render(&mut out).expect("render");
    assert_eq!(out, b"Lead\0Backing");

    let fresh = parse_fresh(&d, TextEncoding::Latin1, &out);
    assert_eq!(fresh.num_text_items(), 2);
    assert_eq!(fresh.text_item(0).expect("item"), "Lead");
    assert_eq!(fresh.text_item(1).expect("item"), "Backing");
}

#[test]
fn round_trip_utf16_items() {
    let d = text_def(FieldKind::UnicodeText);
    let mut field = Field::new(&d);
    assert!(field.set_encoding(TextEncoding::Utf16));
    field.add_text("héllo").expect("add");
    field.add_text("wörld").expect("add");

    let mut out = Vec::new();
    let n = field.render(&mut out).expect("render");
    assert_eq!(n, field.bin_size());
    // item BOM, separator, item BOM
    assert_eq!(&out[..2], [0xFF, 0xFE]);

    let fresh = parse_fresh(&d, TextEncoding::Utf16, &out);
    assert_eq!(fresh.num_text_items(), 2);
    assert_eq!(fresh.text_item(0).expect("item"), "héllo");
    assert_eq!(fresh.text_item(1).expect("item"), "wörld");
}

#[test]
fn round_trip_binary() {
    let d = def(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE);
    let payload = [0u8, 1, 2, 0xFF, 0xFE, 0, 42];
    let mut field = Field::new(&d);
    field.set_binary(&payload).expect("set");

    let mut out = Vec::new();
    field.render(&mut out).expect("render");
    assert_eq!(out, payload);

    let mut fresh = Field::new(&d);
    fresh.parse(&mut Cursor::new(&out[..])).expect("parse");
    assert_eq!(fresh.binary().expect("get"), payload);
}

#[test]
fn utf16_big_endian_bom() {
    let d = text_def(FieldKind::UnicodeText);
    let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
    let field = parse_fresh(&d, TextEncoding::Utf16, &bytes);
    assert_eq!(field.text().expect("text"), "AB");
}

#[test]
fn utf16_without_bom_reads_big_endian() {
    let d = text_def(FieldKind::UnicodeText);
    let bytes = [0x00, 0x41, 0x00, 0x42];
    let field = parse_fresh(&d, TextEncoding::Utf16, &bytes);
    assert_eq!(field.text().expect("text"), "AB");
}

#[test]
fn latin1_substitution_is_deterministic() {
    let d = text_def(FieldKind::UnicodeText);
    let mut field = Field::new(&d);
    field.set_text("日本A").expect("set");
    let first = field.latin1().expect("latin1");
    let second = field.latin1().expect("latin1");
    assert_eq!(first, b"??A");
    assert_eq!(first, second);
    // Substitution is a view; the canonical text is intact.
    assert_eq!(field.text().expect("text"), "日本A");
}

#[test]
fn encoding_idempotence_within_latin1() {
    let d = text_def(FieldKind::UnicodeText);
    let mut field = Field::new(&d);
    field.set_latin1(b"caf\xE9").expect("set");
    assert_eq!(field.text().expect("unicode view"), "café");
    assert_eq!(field.latin1().expect("latin1 view"), b"caf\xE9");
}

#[test]
fn multi_item_ordering_both_kinds() {
    for kind in [FieldKind::AsciiText, FieldKind::UnicodeText] {
        let d = text_def(kind);
        let mut field = Field::new(&d);
        field.add_text("a").expect("add");
        field.add_text("b").expect("add");
        assert_eq!(field.num_text_items(), 2);
        assert_eq!(field.text_item(0).expect("item"), "a");
        assert_eq!(field.text_item(1).expect("item"), "b");
        assert_eq!(field.latin1_item(1).expect("item"), b"b");
    }
}

#[test]
fn dirty_tracking() {
    let d = text_def(FieldKind::UnicodeText);
    let mut field = Field::new(&d);
    assert!(!field.has_changed());
    field.set_text("x").expect("set");
    assert!(field.has_changed());

    let mut field = Field::new(&d);
    field.add_text("x").expect("add");
    assert!(field.has_changed());

    let mut field = Field::new(&d);
    field.clear();
    assert!(field.has_changed());

    let mut field = Field::new(&d);
    field.parse(&mut Cursor::new(&b"x"[..])).expect("parse");
    assert!(field.has_changed());

    let mut source = Field::new(&d);
    source.set_text("y").expect("set");
    let mut field = Field::new(&d);
    field.assign_from(&source).expect("assign");
    assert!(field.has_changed());

    // set_encoding is presentation only, not a mutation
    let mut field = Field::new(&d);
    field.set_encoding(TextEncoding::Utf16);
    assert!(!field.has_changed());

    field.set_text("z").expect("set");
    field.reset_changed();
    assert!(!field.has_changed());
}

#[test]
fn version_scoping() {
    let d = FieldDef {
        id: FieldId::MimeType,
        kind: FieldKind::AsciiText,
        fixed_size: 0,
        spec_begin: Version::V2_3,
        spec_end: Version::V2_4,
        flags: field_flags::CSTR,
    };
    let field = Field::new(&d);
    assert!(!field.in_scope(Version::V2_2));
    assert!(field.in_scope(Version::V2_3));
    assert!(field.in_scope(Version::V2_4));

    // The picture frame's image format only exists in 2.2.
    let image_format = Field::new(&FrameRegistry::field_defs(FrameId::Picture)[1]);
    assert!(image_format.in_scope(Version::V2_2));
    assert!(!image_format.in_scope(Version::V2_3));
}

#[test]
fn buffer_gets_never_overflow() {
    let d = text_def(FieldKind::UnicodeText);
    let mut field = Field::new(&d);
    field.set_text("abcdef").expect("set");

    for n in 0..8usize {
        let mut buf = vec![0xAAu8; n];
        let copied = field.latin1_into(&mut buf).expect("get");
        assert_eq!(copied, n.min(6));
        assert_eq!(&buf[..copied], &b"abcdef"[..copied]);
    }

    let mut units = [0u16; 3];
    let copied = field.utf16_into(&mut units).expect("get");
    assert_eq!(copied, 3);
    assert_eq!(units, [b'a' as u16, b'b' as u16, b'c' as u16]);
}

#[test]
fn wrong_kind_accessors_fail_loudly() {
    let mut text = Field::new(&text_def(FieldKind::AsciiText));
    assert!(matches!(text.integer(), Err(FieldError::KindMismatch(_))));
    assert!(matches!(text.set_integer(1), Err(FieldError::KindMismatch(_))));
    assert!(matches!(text.binary(), Err(FieldError::KindMismatch(_))));

    let mut int = Field::new(&def(FieldId::Counter, FieldKind::Integer, 4, field_flags::NONE));
    assert!(matches!(int.set_text("x"), Err(FieldError::KindMismatch(_))));
    assert!(matches!(int.latin1(), Err(FieldError::KindMismatch(_))));
    assert!(matches!(int.from_file("unused"), Err(FieldError::KindMismatch(_))));

    // Failed accessors leave no mark.
    assert!(!text.has_changed());
    assert!(!int.has_changed());
}

#[test]
fn item_index_out_of_range() {
    let mut field = Field::new(&text_def(FieldKind::UnicodeText));
    field.set_text("only").expect("set");
    assert!(matches!(field.text_item(1), Err(FieldError::OutOfRange(_))));
    let mut buf = [0u8; 8];
    assert!(matches!(
        field.latin1_item_into(&mut buf, 5),
        Err(FieldError::OutOfRange(_))
    ));
}

#[test]
fn comment_frame_layout_parses_field_by_field() {
    // COMM: encoding byte, 3-byte language, NUL-terminated description,
    // trailing text. Render four fields back to back, then parse the same
    // sequence with fresh fields from the registry descriptors.
    let defs = FrameRegistry::field_defs(FrameId::Comment);
    assert_eq!(defs.len(), 4);

    let mut encoding = Field::new(&defs[0]);
    encoding.set_integer(0).expect("set");
    let mut language = Field::new(&defs[1]);
    language.set_text("eng").expect("set");
    let mut description = Field::new(&defs[2]);
    description.set_text("liner notes").expect("set");
    let mut body = Field::new(&defs[3]);
    body.set_text("Recorded live.").expect("set");

    let mut out = Vec::new();
    for field in [&encoding, &language, &description, &body] {
        field.render(&mut out).expect("render");
    }

    let mut cursor = Cursor::new(&out[..]);
    let mut parsed: Vec<Field> = defs.iter().map(Field::new).collect();
    for field in &mut parsed {
        field.parse(&mut cursor).expect("parse in order");
    }
    assert_eq!(cursor.position() as usize, out.len());

    assert_eq!(parsed[0].integer().expect("encoding"), 0);
    assert_eq!(parsed[1].text().expect("language"), "eng");
    assert_eq!(parsed[2].text().expect("description"), "liner notes");
    assert_eq!(parsed[3].text().expect("body"), "Recorded live.");
}

#[test]
fn parse_failure_leaves_prior_state() {
    let d = def(FieldId::Counter, FieldKind::Integer, 4, field_flags::NONE);
    let mut field = Field::new(&d);
    field.set_integer(7).expect("set");

    let short = [0x01u8];
    let mut cursor = Cursor::new(&short[..]);
    let err = field.parse(&mut cursor).expect_err("short input");
    assert!(matches!(err, FieldError::Malformed(_)));
    assert_eq!(field.integer().expect("unchanged"), 7);
    assert_eq!(cursor.position(), 0);

    let d = text_def(FieldKind::UnicodeText);
    let mut field = Field::new(&d);
    field.set_encoding(TextEncoding::Utf16);
    field.set_text("keep").expect("set");
    let odd = [0xFF, 0xFE, 0x41];
    let err = field
        .parse(&mut Cursor::new(&odd[..]))
        .expect_err("odd-length payload");
    assert!(matches!(err, FieldError::Malformed(_)));
    assert_eq!(field.text().expect("unchanged"), "keep");
}

#[test]
fn fixed_size_text_cell() {
    let d = def(FieldId::Language, FieldKind::AsciiText, 3, field_flags::NONE);
    let mut field = Field::new(&d);
    field.set_text("en").expect("set");
    let mut out = Vec::new();
    field.render(&mut out).expect("render");
    assert_eq!(out, b"en\0");
    assert_eq!(field.bin_size(), 3);

    let fresh = parse_fresh(&d, TextEncoding::Latin1, b"eng");
    assert_eq!(fresh.text().expect("text"), "eng");

    let mut fresh = Field::new(&d);
    let err = fresh
        .parse(&mut Cursor::new(&b"en"[..]))
        .expect_err("too short for the cell");
    assert!(matches!(err, FieldError::Malformed(_)));
}

#[test]
fn empty_text_field() {
    let d = text_def(FieldKind::UnicodeText);
    let field = Field::new(&d);
    assert_eq!(field.num_text_items(), 0);
    assert_eq!(field.size(), 0);
    assert_eq!(field.bin_size(), 0);

    let fresh = parse_fresh(&d, TextEncoding::Latin1, b"");
    assert_eq!(fresh.num_text_items(), 0);
}

#[test]
fn clear_resets_storage() {
    let mut field = Field::new(&text_def(FieldKind::UnicodeText));
    field.add_text("a").expect("add");
    field.add_text("b").expect("add");
    field.clear();
    assert_eq!(field.num_text_items(), 0);
    assert_eq!(field.size(), 0);

    let mut field = Field::new(&def(FieldId::Counter, FieldKind::Integer, 4, field_flags::NONE));
    field.set_integer(99).expect("set");
    field.clear();
    assert_eq!(field.integer().expect("get"), 0);
}

#[test]
fn assign_from_copies_storage_and_encoding() {
    let d = text_def(FieldKind::UnicodeText);
    let mut source = Field::new(&d);
    source.set_encoding(TextEncoding::Utf16);
    source.add_text("a").expect("add");
    source.add_text("b").expect("add");

    let mut dest = Field::new(&d);
    dest.assign_from(&source).expect("assign");
    assert_eq!(dest.num_text_items(), 2);
    assert_eq!(dest.encoding(), TextEncoding::Utf16);

    let mut wrong = Field::new(&def(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE));
    assert!(matches!(
        wrong.assign_from(&source),
        Err(FieldError::KindMismatch(_))
    ));
}

#[test]
fn encoding_rules() {
    let mut ascii = Field::new(&text_def(FieldKind::AsciiText));
    assert!(!ascii.is_encodable());
    assert!(!ascii.set_encoding(TextEncoding::Utf16));
    assert_eq!(ascii.encoding(), TextEncoding::Latin1);

    let mut unicode = Field::new(&text_def(FieldKind::UnicodeText));
    assert!(unicode.is_encodable());
    assert!(unicode.set_encoding(TextEncoding::Utf16));
    assert_eq!(unicode.encoding(), TextEncoding::Utf16);

    // Switching encoding changes the wire form, not the content.
    unicode.set_text("same").expect("set");
    let utf16_size = unicode.bin_size();
    unicode.set_encoding(TextEncoding::Latin1);
    assert_eq!(unicode.text().expect("text"), "same");
    assert_eq!(unicode.bin_size(), 4);
    assert_eq!(utf16_size, 2 + 2 * 4);
}

#[test]
fn bin_size_matches_render_everywhere() {
    let mut cases: Vec<Field> = Vec::new();

    let mut f = Field::new(&def(FieldId::Counter, FieldKind::Integer, 3, field_flags::NONE));
    f.set_integer(0x010203).expect("set");
    cases.push(f);

    let mut f = Field::new(&text_def(FieldKind::AsciiText));
    f.add_text("one").expect("add");
    f.add_text("two").expect("add");
    cases.push(f);

    let mut f = Field::new(&text_def(FieldKind::UnicodeText));
    f.set_encoding(TextEncoding::Utf16);
    f.add_text("πß").expect("add");
    f.add_text("x").expect("add");
    cases.push(f);

    let mut f = Field::new(&def(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ));
    f.set_text("terminated").expect("set");
    cases.push(f);

    let mut f = Field::new(&def(FieldId::Language, FieldKind::AsciiText, 3, field_flags::NONE));
    f.set_text("de").expect("set");
    cases.push(f);

    let mut f = Field::new(&def(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE));
    f.set_binary(&[1, 2, 3, 4, 5]).expect("set");
    cases.push(f);

    for field in &cases {
        let mut out = Vec::new();
        let n = field.render(&mut out).expect("render");
        assert_eq!(n, out.len());
        assert_eq!(n, field.bin_size());
    }
}

#[test]
fn cstr_render_terminates_each_item() {
    let d = def(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    );
    let mut field = Field::new(&d);
    field.set_text("desc").expect("set");
    let mut out = Vec::new();
    field.render(&mut out).expect("render");
    assert_eq!(out, b"desc\0");

    // UTF-16 terminator is two bytes wide.
    field.set_encoding(TextEncoding::Utf16);
    let mut out = Vec::new();
    field.render(&mut out).expect("render");
    assert_eq!(&out[..2], [0xFF, 0xFE]);
    assert_eq!(&out[out.len() - 2..], [0, 0]);
}

#[test]
fn binary_file_transfer() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("blob.bin");

    let d = def(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE);
    let mut field = Field::new(&d);
    field.set_binary(&[9, 8, 7, 6]).expect("set");
    field.reset_changed();

    field.to_file(&path).expect("to_file");
    // to_file is read-only
    assert!(!field.has_changed());

    let mut loaded = Field::new(&d);
    let n = loaded.from_file(&path).expect("from_file");
    assert_eq!(n, 4);
    assert_eq!(loaded.binary().expect("get"), [9, 8, 7, 6]);
    assert!(loaded.has_changed());

    let mut untouched = Field::new(&d);
    untouched.set_binary(&[1]).expect("set");
    let missing = dir.path().join("missing.bin");
    assert!(matches!(
        untouched.from_file(&missing),
        Err(FieldError::Io(_))
    ));
    assert_eq!(untouched.binary().expect("unchanged"), [1]);
}
