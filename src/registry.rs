//! Frame descriptor registry.
//!
//! A read-only table describing every frame type this crate knows: its
//! four-letter identifier (and three-letter 2.2-era identifier where one
//! exists), a human-readable description, and the ordered list of field
//! descriptors the owning frame instantiates its [`Field`](crate::field::Field)s
//! from. The table is `static` data, built before `main` and never mutated,
//! so concurrent readers need no synchronization.

use crate::field::FieldKind;
use crate::version::Version;

/// Identifies which logical field within a frame a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    TextEncoding,
    Text,
    Url,
    Data,
    Description,
    Owner,
    Email,
    Rating,
    Filename,
    Language,
    PictureType,
    ImageFormat,
    MimeType,
    Counter,
    Symbol,
    TimestampFormat,
    ContentType,
}

/// Descriptor flag bits, reported by [`FrameRegistry::field_flags`].
pub mod field_flags {
    pub const NONE: u16 = 0x0000;
    /// Serialized NUL-terminated; parse stops after the terminator.
    pub const CSTR: u16 = 0x0001;
    /// May hold an ordered list of text items.
    pub const LIST: u16 = 0x0002;
    /// Serialized encoding follows the frame's text-encoding byte.
    pub const ENCODABLE: u16 = 0x0004;
}

/// One field descriptor: type, fixed size (0 = variable), version range,
/// flags.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub id: FieldId,
    pub kind: FieldKind,
    pub fixed_size: usize,
    pub spec_begin: Version,
    pub spec_end: Version,
    pub flags: u16,
}

/// One frame descriptor: identity, names, description, ordered field list.
#[derive(Debug, Clone, Copy)]
pub struct FrameDef {
    pub id: FrameId,
    pub short_name: &'static str,
    pub long_name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldDef],
}

/// Every frame type in the registry, ordered by long name. Ordinals start
/// at 1; `FrameId as u8` indexes the frame table.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameId {
    AudioCrypto = 1,
    Picture,
    Comment,
    Commercial,
    CryptoReg,
    Equalization,
    EventTiming,
    GeneralObject,
    GroupingReg,
    InvolvedPeople,
    LinkedInfo,
    CdId,
    MpegLookup,
    Ownership,
    PlayCounter,
    Popularimeter,
    PositionSync,
    Private,
    BufferSize,
    VolumeAdj,
    Reverb,
    SyncedLyrics,
    SyncedTempo,
    Album,
    Bpm,
    Composer,
    ContentType,
    Copyright,
    Date,
    PlaylistDelay,
    EncodedBy,
    Lyricist,
    FileType,
    Time,
    ContentGroup,
    Title,
    Subtitle,
    InitialKey,
    Language,
    SongLen,
    MediaType,
    OrigAlbum,
    OrigFilename,
    OrigLyricist,
    OrigArtist,
    OrigYear,
    FileOwner,
    LeadArtist,
    Band,
    Conductor,
    MixArtist,
    PartInSet,
    Publisher,
    TrackNum,
    RecordingDates,
    NetRadioStation,
    NetRadioOwner,
    Size,
    Isrc,
    EncoderSettings,
    UserText,
    Year,
    UniqueFileId,
    TermsOfUse,
    UnsyncedLyrics,
    WwwCommercialInfo,
    WwwCopyright,
    WwwAudioFile,
    WwwArtist,
    WwwAudioSource,
    WwwRadioPage,
    WwwPayment,
    WwwPublisher,
    WwwUser,
}

impl FrameId {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Enumeration entry point: `1..=FrameRegistry::max_frame_id()` maps onto
    /// the full frame set; anything else is `None`.
    pub fn from_ordinal(ordinal: u8) -> Option<FrameId> {
        if ordinal == 0 {
            return None;
        }
        FRAME_DEFS.get(ordinal as usize - 1).map(|d| d.id)
    }
}

const fn fld(id: FieldId, kind: FieldKind, fixed_size: usize, flags: u16) -> FieldDef {
    FieldDef {
        id,
        kind,
        fixed_size,
        spec_begin: Version::EARLIEST,
        spec_end: Version::LATEST,
        flags,
    }
}

const fn fld_between(
    id: FieldId,
    kind: FieldKind,
    fixed_size: usize,
    flags: u16,
    spec_begin: Version,
    spec_end: Version,
) -> FieldDef {
    FieldDef {
        id,
        kind,
        fixed_size,
        spec_begin,
        spec_end,
        flags,
    }
}

const TEXT_ENCODING: FieldDef = fld(FieldId::TextEncoding, FieldKind::Integer, 1, field_flags::NONE);

static TEXT_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(FieldId::Text, FieldKind::UnicodeText, 0, field_flags::ENCODABLE),
];

static INVOLVED_PEOPLE_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(
        FieldId::Text,
        FieldKind::UnicodeText,
        0,
        field_flags::ENCODABLE | field_flags::LIST,
    ),
];

static USER_TEXT_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ),
    fld(FieldId::Text, FieldKind::UnicodeText, 0, field_flags::ENCODABLE),
];

static URL_FIELDS: &[FieldDef] = &[fld(FieldId::Url, FieldKind::AsciiText, 0, field_flags::NONE)];

static USER_URL_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ),
    fld(FieldId::Url, FieldKind::AsciiText, 0, field_flags::NONE),
];

static COMMENT_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(FieldId::Language, FieldKind::AsciiText, 3, field_flags::NONE),
    fld(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ),
    fld(FieldId::Text, FieldKind::UnicodeText, 0, field_flags::ENCODABLE),
];

static TERMS_OF_USE_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(FieldId::Language, FieldKind::AsciiText, 3, field_flags::NONE),
    fld(FieldId::Text, FieldKind::UnicodeText, 0, field_flags::ENCODABLE),
];

static SYNCED_LYRICS_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(FieldId::Language, FieldKind::AsciiText, 3, field_flags::NONE),
    fld(FieldId::TimestampFormat, FieldKind::Integer, 1, field_flags::NONE),
    fld(FieldId::ContentType, FieldKind::Integer, 1, field_flags::NONE),
    fld(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ),
    fld(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE),
];

static PICTURE_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    // 2.2 carried a fixed 3-byte image format; 2.3 replaced it with a
    // NUL-terminated MIME type.
    fld_between(
        FieldId::ImageFormat,
        FieldKind::AsciiText,
        3,
        field_flags::NONE,
        Version::V2_2,
        Version::V2_2,
    ),
    fld_between(
        FieldId::MimeType,
        FieldKind::AsciiText,
        0,
        field_flags::CSTR,
        Version::V2_3,
        Version::LATEST,
    ),
    fld(FieldId::PictureType, FieldKind::Integer, 1, field_flags::NONE),
    fld(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ),
    fld(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE),
];

static OBJECT_FIELDS: &[FieldDef] = &[
    TEXT_ENCODING,
    fld(FieldId::MimeType, FieldKind::AsciiText, 0, field_flags::CSTR),
    fld(
        FieldId::Filename,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ),
    fld(
        FieldId::Description,
        FieldKind::UnicodeText,
        0,
        field_flags::CSTR | field_flags::ENCODABLE,
    ),
    fld(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE),
];

static UNIQUE_FILE_ID_FIELDS: &[FieldDef] = &[
    fld(FieldId::Owner, FieldKind::AsciiText, 0, field_flags::CSTR),
    fld(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE),
];

static PLAY_COUNTER_FIELDS: &[FieldDef] =
    &[fld(FieldId::Counter, FieldKind::Integer, 4, field_flags::NONE)];

static POPULARIMETER_FIELDS: &[FieldDef] = &[
    fld(FieldId::Email, FieldKind::AsciiText, 0, field_flags::CSTR),
    fld(FieldId::Rating, FieldKind::Integer, 1, field_flags::NONE),
    fld(FieldId::Counter, FieldKind::Integer, 4, field_flags::NONE),
];

static PRIVATE_FIELDS: &[FieldDef] = &[
    fld(FieldId::Owner, FieldKind::AsciiText, 0, field_flags::CSTR),
    fld(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE),
];

static REGISTRATION_FIELDS: &[FieldDef] = &[
    fld(FieldId::Owner, FieldKind::AsciiText, 0, field_flags::CSTR),
    fld(FieldId::Symbol, FieldKind::Integer, 1, field_flags::NONE),
    fld(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE),
];

static LINKED_INFO_FIELDS: &[FieldDef] = &[
    fld(FieldId::Data, FieldKind::Binary, 4, field_flags::NONE),
    fld(FieldId::Url, FieldKind::AsciiText, 0, field_flags::CSTR),
    fld(FieldId::Text, FieldKind::AsciiText, 0, field_flags::NONE),
];

/// Frames whose payload this crate carries opaquely.
static BINARY_DATA_FIELDS: &[FieldDef] =
    &[fld(FieldId::Data, FieldKind::Binary, 0, field_flags::NONE)];

const fn frame(
    id: FrameId,
    short_name: &'static str,
    long_name: &'static str,
    description: &'static str,
    fields: &'static [FieldDef],
) -> FrameDef {
    FrameDef {
        id,
        short_name,
        long_name,
        description,
        fields,
    }
}

/// The frame table. Order matches `FrameId` discriminants; the consistency
/// test walks every ordinal against this.
static FRAME_DEFS: &[FrameDef] = &[
    frame(FrameId::AudioCrypto, "CRA", "AENC", "Audio encryption", BINARY_DATA_FIELDS),
    frame(FrameId::Picture, "PIC", "APIC", "Attached picture", PICTURE_FIELDS),
    frame(FrameId::Comment, "COM", "COMM", "Comments", COMMENT_FIELDS),
    frame(FrameId::Commercial, "", "COMR", "Commercial", BINARY_DATA_FIELDS),
    frame(FrameId::CryptoReg, "", "ENCR", "Encryption method registration", REGISTRATION_FIELDS),
    frame(FrameId::Equalization, "EQU", "EQUA", "Equalization", BINARY_DATA_FIELDS),
    frame(FrameId::EventTiming, "ETC", "ETCO", "Event timing codes", BINARY_DATA_FIELDS),
    frame(FrameId::GeneralObject, "GEO", "GEOB", "General encapsulated object", OBJECT_FIELDS),
    frame(FrameId::GroupingReg, "", "GRID", "Group identification registration", REGISTRATION_FIELDS),
    frame(FrameId::InvolvedPeople, "IPL", "IPLS", "Involved people list", INVOLVED_PEOPLE_FIELDS),
    frame(FrameId::LinkedInfo, "LNK", "LINK", "Linked information", LINKED_INFO_FIELDS),
    frame(FrameId::CdId, "MCI", "MCDI", "Music CD identifier", BINARY_DATA_FIELDS),
    frame(FrameId::MpegLookup, "MLL", "MLLT", "MPEG location lookup table", BINARY_DATA_FIELDS),
    frame(FrameId::Ownership, "", "OWNE", "Ownership", BINARY_DATA_FIELDS),
    frame(FrameId::PlayCounter, "CNT", "PCNT", "Play counter", PLAY_COUNTER_FIELDS),
    frame(FrameId::Popularimeter, "POP", "POPM", "Popularimeter", POPULARIMETER_FIELDS),
    frame(FrameId::PositionSync, "", "POSS", "Position synchronisation", BINARY_DATA_FIELDS),
    frame(FrameId::Private, "", "PRIV", "Private", PRIVATE_FIELDS),
    frame(FrameId::BufferSize, "BUF", "RBUF", "Recommended buffer size", BINARY_DATA_FIELDS),
    frame(FrameId::VolumeAdj, "RVA", "RVAD", "Relative volume adjustment", BINARY_DATA_FIELDS),
    frame(FrameId::Reverb, "REV", "RVRB", "Reverb", BINARY_DATA_FIELDS),
    frame(FrameId::SyncedLyrics, "SLT", "SYLT", "Synchronized lyric/text", SYNCED_LYRICS_FIELDS),
    frame(FrameId::SyncedTempo, "STC", "SYTC", "Synchronized tempo codes", BINARY_DATA_FIELDS),
    frame(FrameId::Album, "TAL", "TALB", "Album/Movie/Show title", TEXT_FIELDS),
    frame(FrameId::Bpm, "TBP", "TBPM", "BPM (beats per minute)", TEXT_FIELDS),
    frame(FrameId::Composer, "TCM", "TCOM", "Composer", TEXT_FIELDS),
    frame(FrameId::ContentType, "TCO", "TCON", "Content type", TEXT_FIELDS),
    frame(FrameId::Copyright, "TCR", "TCOP", "Copyright message", TEXT_FIELDS),
    frame(FrameId::Date, "TDA", "TDAT", "Date", TEXT_FIELDS),
    frame(FrameId::PlaylistDelay, "TDY", "TDLY", "Playlist delay", TEXT_FIELDS),
    frame(FrameId::EncodedBy, "TEN", "TENC", "Encoded by", TEXT_FIELDS),
    frame(FrameId::Lyricist, "TXT", "TEXT", "Lyricist/Text writer", TEXT_FIELDS),
    frame(FrameId::FileType, "TFT", "TFLT", "File type", TEXT_FIELDS),
    frame(FrameId::Time, "TIM", "TIME", "Time", TEXT_FIELDS),
    frame(FrameId::ContentGroup, "TT1", "TIT1", "Content group description", TEXT_FIELDS),
    frame(FrameId::Title, "TT2", "TIT2", "Title/songname/content description", TEXT_FIELDS),
    frame(FrameId::Subtitle, "TT3", "TIT3", "Subtitle/Description refinement", TEXT_FIELDS),
    frame(FrameId::InitialKey, "TKE", "TKEY", "Initial key", TEXT_FIELDS),
    frame(FrameId::Language, "TLA", "TLAN", "Language(s)", TEXT_FIELDS),
    frame(FrameId::SongLen, "TLE", "TLEN", "Length", TEXT_FIELDS),
    frame(FrameId::MediaType, "TMT", "TMED", "Media type", TEXT_FIELDS),
    frame(FrameId::OrigAlbum, "TOT", "TOAL", "Original album/movie/show title", TEXT_FIELDS),
    frame(FrameId::OrigFilename, "TOF", "TOFN", "Original filename", TEXT_FIELDS),
    frame(FrameId::OrigLyricist, "TOL", "TOLY", "Original lyricist(s)/text writer(s)", TEXT_FIELDS),
    frame(FrameId::OrigArtist, "TOA", "TOPE", "Original artist(s)/performer(s)", TEXT_FIELDS),
    frame(FrameId::OrigYear, "TOR", "TORY", "Original release year", TEXT_FIELDS),
    frame(FrameId::FileOwner, "", "TOWN", "File owner/licensee", TEXT_FIELDS),
    frame(FrameId::LeadArtist, "TP1", "TPE1", "Lead performer(s)/Soloist(s)", TEXT_FIELDS),
    frame(FrameId::Band, "TP2", "TPE2", "Band/orchestra/accompaniment", TEXT_FIELDS),
    frame(FrameId::Conductor, "TP3", "TPE3", "Conductor/performer refinement", TEXT_FIELDS),
    frame(FrameId::MixArtist, "TP4", "TPE4", "Interpreted, remixed, or otherwise modified by", TEXT_FIELDS),
    frame(FrameId::PartInSet, "TPA", "TPOS", "Part of a set", TEXT_FIELDS),
    frame(FrameId::Publisher, "TPB", "TPUB", "Publisher", TEXT_FIELDS),
    frame(FrameId::TrackNum, "TRK", "TRCK", "Track number/Position in set", TEXT_FIELDS),
    frame(FrameId::RecordingDates, "TRD", "TRDA", "Recording dates", TEXT_FIELDS),
    frame(FrameId::NetRadioStation, "", "TRSN", "Internet radio station name", TEXT_FIELDS),
    frame(FrameId::NetRadioOwner, "", "TRSO", "Internet radio station owner", TEXT_FIELDS),
    frame(FrameId::Size, "TSI", "TSIZ", "Size", TEXT_FIELDS),
    frame(FrameId::Isrc, "TRC", "TSRC", "ISRC (international standard recording code)", TEXT_FIELDS),
    frame(FrameId::EncoderSettings, "TSS", "TSSE", "Software/Hardware and settings used for encoding", TEXT_FIELDS),
    frame(FrameId::UserText, "TXX", "TXXX", "User defined text information", USER_TEXT_FIELDS),
    frame(FrameId::Year, "TYE", "TYER", "Year", TEXT_FIELDS),
    frame(FrameId::UniqueFileId, "UFI", "UFID", "Unique file identifier", UNIQUE_FILE_ID_FIELDS),
    frame(FrameId::TermsOfUse, "", "USER", "Terms of use", TERMS_OF_USE_FIELDS),
    frame(FrameId::UnsyncedLyrics, "ULT", "USLT", "Unsynchronized lyric/text transcription", COMMENT_FIELDS),
    frame(FrameId::WwwCommercialInfo, "WCM", "WCOM", "Commercial information", URL_FIELDS),
    frame(FrameId::WwwCopyright, "WCP", "WCOP", "Copyright/Legal information", URL_FIELDS),
    frame(FrameId::WwwAudioFile, "WAF", "WOAF", "Official audio file webpage", URL_FIELDS),
    frame(FrameId::WwwArtist, "WAR", "WOAR", "Official artist/performer webpage", URL_FIELDS),
    frame(FrameId::WwwAudioSource, "WAS", "WOAS", "Official audio source webpage", URL_FIELDS),
    frame(FrameId::WwwRadioPage, "", "WORS", "Official internet radio station homepage", URL_FIELDS),
    frame(FrameId::WwwPayment, "", "WPAY", "Payment", URL_FIELDS),
    frame(FrameId::WwwPublisher, "WPB", "WPUB", "Publishers official webpage", URL_FIELDS),
    frame(FrameId::WwwUser, "WXX", "WXXX", "User defined URL link", USER_URL_FIELDS),
];

/// Lookup surface over the frame table. Stateless; every method reads the
/// `static` table.
pub struct FrameRegistry;

impl FrameRegistry {
    /// Highest valid ordinal; `1..=max_frame_id()` enumerates every frame.
    pub fn max_frame_id() -> u8 {
        FRAME_DEFS.len() as u8
    }

    /// The three-letter 2.2-era identifier, or empty for frames introduced
    /// later.
    pub fn short_name(id: FrameId) -> &'static str {
        Self::frame_def(id).short_name
    }

    /// The four-letter identifier used from revision 2.3 on.
    pub fn long_name(id: FrameId) -> &'static str {
        Self::frame_def(id).long_name
    }

    pub fn description(id: FrameId) -> &'static str {
        Self::frame_def(id).description
    }

    pub fn num_fields(id: FrameId) -> usize {
        Self::frame_def(id).fields.len()
    }

    pub fn field_type(id: FrameId, index: usize) -> Option<FieldKind> {
        Self::frame_def(id).fields.get(index).map(|f| f.kind)
    }

    pub fn field_size(id: FrameId, index: usize) -> Option<usize> {
        Self::frame_def(id).fields.get(index).map(|f| f.fixed_size)
    }

    pub fn field_flags(id: FrameId, index: usize) -> Option<u16> {
        Self::frame_def(id).fields.get(index).map(|f| f.flags)
    }

    /// The ordered descriptor list the owning frame builds its fields from.
    pub fn field_defs(id: FrameId) -> &'static [FieldDef] {
        Self::frame_def(id).fields
    }

    pub fn find_by_long_name(name: &str) -> Option<FrameId> {
        FRAME_DEFS.iter().find(|d| d.long_name == name).map(|d| d.id)
    }

    pub fn find_by_short_name(name: &str) -> Option<FrameId> {
        if name.is_empty() {
            return None;
        }
        FRAME_DEFS.iter().find(|d| d.short_name == name).map(|d| d.id)
    }

    fn frame_def(id: FrameId) -> &'static FrameDef {
        &FRAME_DEFS[id as usize - 1]
    }
}
