use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ehfile::{decode, encode, is_container, Header, HeaderLayout, HEADER_SIZE};

fn ship_build_json(components: usize) -> String {
    let parts: Vec<String> = (0..components)
        .map(|i| format!(r#"{{"ComponentId":{},"Locked":false,"X":{},"Y":{},"BarrelId":-1,"Behaviour":0,"KeyBinding":-1}}"#, i % 97, i % 12, i / 12))
        .collect();
    format!(r#"{{"ItemType":8,"Id":1,"ShipId":4,"DifficultyClass":2,"Components":[{}]}}"#, parts.join(","))
}

fn header() -> Header {
    let mut raw = [0u8; HEADER_SIZE];
    raw[8..12].copy_from_slice(&17u32.to_le_bytes());
    Header::from_array(raw)
}

fn bench_decode(c: &mut Criterion) {
    let bytes = encode(&header(), &ship_build_json(200), HeaderLayout::VersionTable).unwrap();
    let unrelated = vec![0x42u8; 256 * 1024];

    c.bench_function("decode_ship_build_200", |b| b.iter(|| decode(black_box(&bytes)).unwrap()));
    c.bench_function("sniff_unrelated_256k", |b| b.iter(|| is_container(black_box(&unrelated))));
}

fn bench_encode(c: &mut Criterion) {
    let h = header();
    let json = ship_build_json(200);

    c.bench_function("encode_ship_build_200", |b| {
        b.iter(|| encode(black_box(&h), black_box(&json), HeaderLayout::VersionTable).unwrap())
    });
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
