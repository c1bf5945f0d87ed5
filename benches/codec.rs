use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jsonx::{decode, encode, jsonx, Map, Value};

fn object_document(fields: u32) -> String {
    let mut map = Map::new();
    for i in 0..fields {
        map.insert(format!("field_{i}"), Value::from(i));
    }
    encode(&Value::object(map)).unwrap()
}

fn product_array(size: u32) -> Value {
    let items = (0..size)
        .map(|i| {
            let mut map = Map::new();
            map.insert("sku".to_string(), Value::from(format!("SKU{i}")));
            map.insert("price".to_string(), Value::from(9.99 + f64::from(i)));
            map.insert("quantity".to_string(), Value::from(i));
            map.insert("in_stock".to_string(), Value::from(i % 2 == 0));
            Value::object(map)
        })
        .collect();
    Value::array(items)
}

fn benchmark_decode_simple(c: &mut Criterion) {
    let text = r#"{"id": 123, "name": "Alice", "email": "alice@example.com", "active": true}"#;

    c.bench_function("decode_simple_object", |b| {
        b.iter(|| decode(black_box(text)))
    });
}

fn benchmark_encode_simple(c: &mut Criterion) {
    let value = jsonx!({
        "id": 123,
        "name": "Alice",
        "email": "alice@example.com",
        "active": true
    });

    c.bench_function("encode_simple_object", |b| {
        b.iter(|| encode(black_box(&value)))
    });
}

fn benchmark_decode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_array");

    for size in [10, 50, 100, 500].iter() {
        let text = encode(&product_array(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| decode(black_box(text)))
        });
    }
    group.finish();
}

fn benchmark_encode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_array");

    for size in [10, 50, 100, 500].iter() {
        let value = product_array(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &value, |b, value| {
            b.iter(|| encode(black_box(value)))
        });
    }
    group.finish();
}

fn benchmark_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("strings");

    let plain = "\"a perfectly ordinary string without any escapes in it at all\"";
    let escaped = r#""line one\nline two\t\"quoted\"é☃""#;

    group.bench_function("decode_plain", |b| b.iter(|| decode(black_box(plain))));
    group.bench_function("decode_escaped", |b| b.iter(|| decode(black_box(escaped))));

    let unicode = Value::from("caf\u{e9} \u{2603} \u{1F600}".repeat(16));
    group.bench_function("encode_unicode", |b| b.iter(|| encode(black_box(&unicode))));

    group.finish();
}

fn benchmark_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("numbers");

    let integers = encode(&Value::array((0..100).map(Value::from).collect())).unwrap();
    let floats = encode(&Value::array(
        (0..100).map(|i| Value::from(f64::from(i) * 1.5)).collect(),
    ))
    .unwrap();
    let big = "123456789012345678901234567890";

    group.bench_function("decode_integers", |b| b.iter(|| decode(black_box(&integers))));
    group.bench_function("decode_floats", |b| b.iter(|| decode(black_box(&floats))));
    group.bench_function("decode_bigint", |b| b.iter(|| decode(black_box(big))));

    group.finish();
}

fn benchmark_deep_nesting(c: &mut Criterion) {
    let mut value = Value::from(1);
    for _ in 0..100 {
        value = Value::array(vec![value]);
    }
    let text = encode(&value).unwrap();

    let mut group = c.benchmark_group("deep_nesting");
    group.bench_function("decode", |b| b.iter(|| decode(black_box(&text))));
    group.bench_function("encode", |b| b.iter(|| encode(black_box(&value))));
    group.finish();
}

fn benchmark_comparison_with_serde_json(c: &mut Criterion) {
    let text = object_document(32);

    let mut group = c.benchmark_group("comparison");

    group.bench_function("jsonx_decode", |b| b.iter(|| decode(black_box(&text))));
    group.bench_function("serde_json_parse", |b| {
        b.iter(|| serde_json::from_str::<serde_json::Value>(black_box(&text)))
    });

    let value = decode(&text).unwrap();
    let json_value: serde_json::Value = serde_json::from_str(&text).unwrap();

    group.bench_function("jsonx_encode", |b| b.iter(|| encode(black_box(&value))));
    group.bench_function("serde_json_to_string", |b| {
        b.iter(|| serde_json::to_string(black_box(&json_value)))
    });

    group.finish();
}

fn benchmark_roundtrip(c: &mut Criterion) {
    let text = r#"{"id": 123, "scores": [1.5, 2.5, NaN], "name": "Alice"}"#;

    c.bench_function("roundtrip_simple", |b| {
        b.iter(|| {
            let value = decode(black_box(text)).unwrap();
            encode(black_box(&value)).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_decode_simple,
    benchmark_encode_simple,
    benchmark_decode_array,
    benchmark_encode_array,
    benchmark_strings,
    benchmark_numbers,
    benchmark_deep_nesting,
    benchmark_comparison_with_serde_json,
    benchmark_roundtrip
);
criterion_main!(benches);
