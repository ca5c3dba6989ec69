//! Search performance benchmarks
//!
//! Measures performance of:
//! - Substring search over a large section
//! - Extension filtering
//! - Deep page offsets

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use filefinder_core::{Database, DocumentPageQuery, ReplaceDocument, StoreConfig};
use tempfile::TempDir;

const EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "xlsx"];

fn setup_test_db(size: usize) -> (Database, TempDir) {
    let temp = TempDir::new().unwrap();
    let db = Database::open(temp.path().join("search_bench.sqlite"), &StoreConfig::default()).unwrap();

    let documents: Vec<_> = (0..size)
        .map(|i| {
            let name = format!("informe-{:06}.{}", i, EXTENSIONS[i % EXTENSIONS.len()]);
            ReplaceDocument::new(name.clone(), format!("/srv/archivo/{}/{}", i % 50, name))
        })
        .collect();
    db.replace_documents_for_section("bench", &documents).unwrap();

    (db, temp)
}

fn query(text: Option<&str>, extensions: &[&str], page: i64) -> DocumentPageQuery {
    DocumentPageQuery {
        section_id: "bench".to_string(),
        query: text.map(str::to_string),
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
        page: Some(page),
        page_size: Some(20),
    }
}

fn bench_substring_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("substring_search");
    let (db, _temp) = setup_test_db(20_000);

    for (name, text) in [("selective", "000123"), ("broad", "informe"), ("path", "/archivo/7/")] {
        let options = query(Some(text), &[], 1);
        group.bench_with_input(BenchmarkId::from_parameter(name), &options, |b, options| {
            b.iter(|| db.list_documents_page(black_box(options)).unwrap());
        });
    }

    group.finish();
}

fn bench_extension_filter(c: &mut Criterion) {
    let (db, _temp) = setup_test_db(20_000);
    let options = query(None, &["pdf", "docx"], 1);

    c.bench_function("extension_filter", |b| {
        b.iter(|| db.list_documents_page(black_box(&options)).unwrap());
    });
}

fn bench_page_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_offsets");
    let (db, _temp) = setup_test_db(20_000);

    for page in [1, 100, 999] {
        let options = query(None, &[], page);
        group.bench_with_input(BenchmarkId::from_parameter(page), &options, |b, options| {
            b.iter(|| db.list_documents_page(black_box(options)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_substring_search,
    bench_extension_filter,
    bench_page_offsets
);
criterion_main!(benches);
