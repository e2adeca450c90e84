//! List every frame type the registry knows, with its field layout.
//!
//! Usage:
//!   list_frames [--fields]
//!
//! Options:
//!   --fields, -f  Also print each frame's field descriptors (type, size, flags)

use tagfield::{field_flags, FieldKind, FrameId, FrameRegistry};

fn kind_id(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Integer => "integer",
        FieldKind::AsciiText => "ascii",
        FieldKind::UnicodeText => "unicode",
        FieldKind::Binary => "binary",
    }
}

fn flag_names(flags: u16) -> String {
    let mut names = Vec::new();
    if flags & field_flags::CSTR != 0 {
        names.push("cstr");
    }
    if flags & field_flags::LIST != 0 {
        names.push("list");
    }
    if flags & field_flags::ENCODABLE != 0 {
        names.push("encodable");
    }
    if names.is_empty() {
        names.push("none");
    }
    names.join("|")
}

fn main() -> anyhow::Result<()> {
    let with_fields = std::env::args()
        .skip(1)
        .any(|a| a == "--fields" || a == "-f");

    for ordinal in 1..=FrameRegistry::max_frame_id() {
        let id = FrameId::from_ordinal(ordinal)
            .ok_or_else(|| anyhow::anyhow!("no frame at ordinal {}", ordinal))?;
        let short = FrameRegistry::short_name(id);
        println!(
            "{:>3}  {:<4} {:<4} {}",
            ordinal,
            if short.is_empty() { "-" } else { short },
            FrameRegistry::long_name(id),
            FrameRegistry::description(id)
        );
        if with_fields {
            for (i, def) in FrameRegistry::field_defs(id).iter().enumerate() {
                println!(
                    "       [{}] {:<8} size={} flags={}",
                    i,
                    kind_id(def.kind),
                    def.fixed_size,
                    flag_names(def.flags)
                );
            }
        }
    }
    Ok(())
}
