//! Benchmark: render+parse round-trips per field kind, and registry lookups.
//! Text cases cover both wire encodings; the binary case uses a picture-sized
//! payload.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::io::Cursor;
use tagfield::{Field, FrameId, FrameRegistry, TextEncoding};

fn text_field(encoding: TextEncoding) -> Field {
    let defs = FrameRegistry::field_defs(FrameId::Title);
    let mut field = Field::new(&defs[1]);
    field.set_encoding(encoding);
    field
        .add_text("Exit Music (For a Film)")
        .expect("add item");
    field.add_text("OK Computer").expect("add item");
    field
}

fn bench_text_round_trip(c: &mut Criterion) {
    for (label, encoding) in [
        ("text_latin1", TextEncoding::Latin1),
        ("text_utf16", TextEncoding::Utf16),
    ] {
        let field = text_field(encoding);
        let defs = FrameRegistry::field_defs(FrameId::Title);
        c.bench_function(label, |b| {
            b.iter(|| {
                let mut out = Vec::new();
                field.render(&mut out).expect("render");
                let mut fresh = Field::new(&defs[1]);
                fresh.set_encoding(encoding);
                fresh
                    .parse(&mut Cursor::new(black_box(&out[..])))
                    .expect("parse");
                black_box(fresh.num_text_items())
            })
        });
    }
}

fn bench_binary_round_trip(c: &mut Criterion) {
    let defs = FrameRegistry::field_defs(FrameId::Picture);
    let data_def = &defs[5];
    let payload = vec![0xA5u8; 64 * 1024];
    let mut field = Field::new(data_def);
    field.set_binary(&payload).expect("set");
    c.bench_function("binary_64k", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            field.render(&mut out).expect("render");
            let mut fresh = Field::new(data_def);
            fresh
                .parse(&mut Cursor::new(black_box(&out[..])))
                .expect("parse");
            black_box(fresh.bin_size())
        })
    });
}

fn bench_registry_lookup(c: &mut Criterion) {
    c.bench_function("registry_scan", |b| {
        b.iter(|| {
            let mut fields = 0usize;
            for ordinal in 1..=FrameRegistry::max_frame_id() {
                let id = FrameId::from_ordinal(ordinal).expect("ordinal");
                fields += FrameRegistry::num_fields(id);
            }
            black_box(fields)
        })
    });
    c.bench_function("registry_find_by_name", |b| {
        b.iter(|| black_box(FrameRegistry::find_by_long_name(black_box("WXXX"))))
    });
}

criterion_group!(
    benches,
    bench_text_round_trip,
    bench_binary_round_trip,
    bench_registry_lookup
);
criterion_main!(benches);
