//! # Indexing Integration Tests
//!
//! Drives `IndexingService` through the public API only:
//!
//! 1. **End-to-end** - CSV text in, distinct counts and artifacts out
//! 2. **False positives** - observed rate against the configured bound
//! 3. **Rollback** - a failing column leaves no artifact for any column
//! 4. **Filesystem** - artifacts on disk survive a fresh service

use std::sync::Arc;

use bloom_index::{
    BloomFilter, CsvRowSource, FileIndexSink, IndexConfig, IndexConfigBuilder, IndexError,
    IndexingApi, IndexingService, MemoryIndexSink, SinkError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// TEST HELPERS
// =============================================================================

const SOURCE: &str = "/tmp/fake.csv";

const FIXTURE: &str = "FieldA,FieldB,FieldC
apple,carrot,example.domain.com
banana,potato,www.google.co.uk
orange,leek,subdomain.yahoo.com
pear,cauliflower,
pineapple,bean,
,broccoli,
";

const FRUIT: [&str; 5] = ["apple", "banana", "orange", "pear", "pineapple"];
const VEGETABLES: [&str; 6] = ["carrot", "potato", "leek", "cauliflower", "bean", "broccoli"];

fn fixture_source(config: &IndexConfig) -> CsvRowSource<&'static [u8]> {
    let delimiter = config.delimiter_byte().unwrap();
    CsvRowSource::from_reader(SOURCE, FIXTURE.as_bytes(), delimiter)
}

fn memory_service() -> (Arc<MemoryIndexSink>, IndexingService<MemoryIndexSink>) {
    let sink = Arc::new(MemoryIndexSink::new());
    (sink.clone(), IndexingService::new(sink))
}

fn random_value(rng: &mut StdRng, prefix: &str) -> String {
    let suffix: String = (0..16)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect();
    format!("{}-{}", prefix, suffix)
}

// =============================================================================
// END-TO-END
// =============================================================================

#[test]
fn test_fixture_counts_exclude_blank_fields() {
    let (sink, service) = memory_service();
    let config = IndexConfigBuilder::new()
        .delimiter(',')
        .fields([1, 2])
        .build()
        .unwrap();

    let report = service.build_indexes(fixture_source(&config), &config).unwrap();

    assert_eq!(report.len(), 2);
    assert_eq!(report.get("/tmp/fake.csv.1.bfindex"), Some(5));
    assert_eq!(report.get("/tmp/fake.csv.2.bfindex"), Some(6));
    assert_eq!(
        sink.names(),
        vec!["/tmp/fake.csv.1.bfindex", "/tmp/fake.csv.2.bfindex"]
    );
}

#[test]
fn test_fixture_membership() {
    let (_sink, service) = memory_service();
    let config = IndexConfigBuilder::new()
        .delimiter(',')
        .fields([1, 2])
        .build()
        .unwrap();
    service.build_indexes(fixture_source(&config), &config).unwrap();

    let fruit = service.query(SOURCE, 1, &FRUIT).unwrap();
    assert!(fruit.iter().all(|&hit| hit));

    // 5 values at p = 0.00001: a vegetable showing up is vanishingly unlikely
    let vegetables = service.query(SOURCE, 1, &VEGETABLES).unwrap();
    assert!(vegetables.iter().all(|&hit| !hit));

    let filter = service.open_index(SOURCE, 2).unwrap();
    for vegetable in VEGETABLES {
        assert!(filter.contains(vegetable.as_bytes()));
    }
    assert!(!filter.contains(b"FieldB"));
}

#[test]
fn test_fixture_domain_expansion() {
    let (_sink, service) = memory_service();
    let config = IndexConfigBuilder::new()
        .delimiter(',')
        .fields([3])
        .expand_domains_recursively(true)
        .build()
        .unwrap();

    let report = service.build_indexes(fixture_source(&config), &config).unwrap();
    assert_eq!(report.get("/tmp/fake.csv.3.bfindex"), Some(9));

    let expected = [
        "example.domain.com",
        "domain.com",
        "com",
        "www.google.co.uk",
        "google.co.uk",
        "co.uk",
        "uk",
        "subdomain.yahoo.com",
        "yahoo.com",
    ];
    let hits = service.query(SOURCE, 3, &expected).unwrap();
    assert_eq!(hits, vec![true; expected.len()]);
}

#[test]
fn test_all_columns_when_no_filter() {
    let (sink, service) = memory_service();
    let config = IndexConfigBuilder::new().delimiter(',').build().unwrap();

    let report = service.build_indexes(fixture_source(&config), &config).unwrap();

    // Column 3 without expansion: three domains, blanks dropped
    let counts: Vec<(usize, usize)> = report
        .iter()
        .map(|e| (e.column, e.distinct_values))
        .collect();
    assert_eq!(counts, vec![(1, 5), (2, 6), (3, 3)]);
    assert_eq!(sink.len(), 3);
}

#[test]
fn test_invalid_utf8_field_is_skipped() {
    let data: &[u8] = b"h1,h2\napple,carrot\ncaf\xe9,leek\nbanana,bean\n";
    let (_sink, service) = memory_service();
    let config = IndexConfigBuilder::new().delimiter(',').build().unwrap();

    let delimiter = config.delimiter_byte().unwrap();
    let source = CsvRowSource::from_reader("latin1.csv", data, delimiter);
    let report = service.build_indexes(source, &config).unwrap();

    assert_eq!(report.get("latin1.csv.1.bfindex"), Some(2));
    assert_eq!(report.get("latin1.csv.2.bfindex"), Some(3));
    let hits = service.query("latin1.csv", 1, &["apple", "banana"]).unwrap();
    assert_eq!(hits, vec![true, true]);
}

// =============================================================================
// FALSE POSITIVES
// =============================================================================

#[test]
fn test_empirical_false_positive_rate() {
    const INSERTED: usize = 10_000;
    const LOOKUPS: usize = 200_000;
    const RATE: f64 = 0.0001;

    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut filter = BloomFilter::new(INSERTED, RATE);
    for _ in 0..INSERTED {
        filter.insert(random_value(&mut rng, "in").as_bytes());
    }

    let false_positives = (0..LOOKUPS)
        .filter(|_| filter.contains(random_value(&mut rng, "out").as_bytes()))
        .count();

    let observed = false_positives as f64 / LOOKUPS as f64;
    assert!(
        observed < 2.0 * RATE,
        "observed {} false positives out of {} ({})",
        false_positives,
        LOOKUPS,
        observed
    );
}

#[test]
fn test_no_false_negatives_after_persistence() {
    let mut rng = StdRng::seed_from_u64(7);
    let rows: Vec<Vec<String>> = (0..2_000)
        .map(|_| vec![random_value(&mut rng, "v")])
        .collect();
    let values: Vec<String> = rows.iter().map(|row| row[0].clone()).collect();

    let (_sink, service) = memory_service();
    let config = IndexConfigBuilder::new().skip_lines(0).build().unwrap();
    service
        .build_indexes(bloom_index::InMemoryRows::new("rand.csv", rows), &config)
        .unwrap();

    let lookups: Vec<&str> = values.iter().map(String::as_str).collect();
    let hits = service.query("rand.csv", 1, &lookups).unwrap();
    assert!(hits.into_iter().all(|hit| hit));
}

// =============================================================================
// ROLLBACK
// =============================================================================

#[test]
fn test_failed_write_rolls_back_every_artifact() {
    let (sink, service) = memory_service();
    sink.fail_writes_to("/tmp/fake.csv.2.bfindex");
    let config = IndexConfigBuilder::new().delimiter(',').build().unwrap();

    let err = service
        .build_indexes(fixture_source(&config), &config)
        .unwrap_err();

    assert!(matches!(err, IndexError::Sink(SinkError::Io { .. })));
    assert!(sink.is_empty(), "left behind: {:?}", sink.names());
}

#[test]
fn test_failed_rebuild_removes_stale_artifacts() {
    let (sink, service) = memory_service();
    let config = IndexConfigBuilder::new()
        .delimiter(',')
        .fields([1, 2])
        .build()
        .unwrap();
    service.build_indexes(fixture_source(&config), &config).unwrap();
    assert_eq!(sink.len(), 2);

    sink.fail_writes_to("/tmp/fake.csv.2.bfindex");
    assert!(service.build_indexes(fixture_source(&config), &config).is_err());

    for column in [1, 2] {
        assert!(matches!(
            service.open_index(SOURCE, column),
            Err(IndexError::Sink(SinkError::NotFound(_)))
        ));
    }
}

// =============================================================================
// FILESYSTEM
// =============================================================================

#[test]
fn test_file_sink_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("export.csv");
    std::fs::write(&input, FIXTURE.replace(',', ";")).unwrap();

    let config = IndexConfigBuilder::new().fields([1, 2]).build().unwrap();
    let service = IndexingService::new(Arc::new(FileIndexSink::new()));
    let source = CsvRowSource::open(&input, &config).unwrap();
    let report = service.build_indexes(source, &config).unwrap();

    let first = dir.path().join("export.csv.1.bfindex");
    let second = dir.path().join("export.csv.2.bfindex");
    assert!(first.exists());
    assert!(second.exists());
    assert_eq!(report.column(1).map(|e| e.distinct_values), Some(5));

    // A fresh service sees the same artifacts
    let reopened = IndexingService::new(Arc::new(FileIndexSink::new()));
    let source_id = input.display().to_string();
    let hits = reopened
        .query(&source_id, 2, &["leek", "broccoli"])
        .unwrap();
    assert_eq!(hits, vec![true, true]);
}

#[test]
fn test_file_sink_missing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let service = IndexingService::new(Arc::new(FileIndexSink::with_output_dir(dir.path())));

    let err = service.open_index("never-indexed.csv", 1).unwrap_err();
    assert!(matches!(err, IndexError::Sink(SinkError::NotFound(_))));
}
