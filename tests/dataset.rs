// Dataset ingestion tests: CSV rows into a postal table, then key lookups
// and interval queries against the loaded data.
use probe_table::dataset::{self, LoadSummary};
use probe_table::{postal, DatasetError, Strategy, TableConfig};
use std::io::{self, Cursor, Read};

const CEPS: &str = "\
UF,Localidade,Faixa de CEP,CEP inicial,CEP final
AC,Acrelandia,69945-000 a 69949-999,69945,69949
AC,Assis Brasil,69935-000 a 69939-999,69935,69939
AC,Rio Branco,69900-000 a 69923-999,69900,69923
AM,Manaus,69000-000 a 69099-999,69000,69099
SP,Sao Paulo,01000-000 a 05999-999,01000,05999
SP,Campinas,13000-000 a 13139-999,13000,13139
";

// Test: every row lands under its starting code, for both strategies and a
// range of thresholds that force several resizes from a tiny table.
#[test]
fn loads_all_rows_and_indexes_by_start() {
    for strategy in [Strategy::DoubleHashing, Strategy::LinearProbing] {
        for lf in [0.1, 0.5, 0.99] {
            let config = TableConfig::new(1, strategy, lf);
            let mut t = postal::new_table(config).unwrap();
            let s = dataset::load(Cursor::new(CEPS), &mut t).unwrap();
            assert_eq!(
                s,
                LoadSummary {
                    inserted: 6,
                    skipped: 0
                }
            );
            assert_eq!(t.len(), 6);
            assert_eq!(t.lookup("69900").unwrap().city, "Rio Branco");
            assert_eq!(t.lookup("13000").unwrap().state, "SP");
            assert!(t.lookup("69927").is_none());
        }
    }
}

// Test: interval queries against loaded data; a code inside no range misses.
#[test]
fn range_queries_over_loaded_rows() {
    let mut t = postal::new_table(TableConfig::default()).unwrap();
    dataset::load(Cursor::new(CEPS), &mut t).unwrap();
    assert_eq!(t.find_containing("69927").map(|r| r.city.as_str()), None);
    assert_eq!(
        t.find_containing("69920").map(|r| r.city.as_str()),
        Some("Rio Branco")
    );
    assert_eq!(
        t.find_containing("04500").map(|r| r.city.as_str()),
        Some("Sao Paulo")
    );
    assert!(t.delete("01000"));
    assert!(t.find_containing("04500").is_none());
}

// Test: Windows line endings and blank/short lines.
#[test]
fn tolerates_crlf_and_skips_short_lines() {
    let data = "h\r\nSP,Campinas,x,13000,13139\r\n\r\nSP,Only,three\r\n";
    let mut t = postal::new_table(TableConfig::default()).unwrap();
    let s = dataset::load(Cursor::new(data), &mut t).unwrap();
    assert_eq!(s.inserted, 1);
    assert_eq!(s.skipped, 2);
    assert_eq!(t.lookup("13000").unwrap().end, "13139");
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk on fire"))
    }
}

// Test: read errors propagate as `DatasetError::Io`.
#[test]
fn io_errors_propagate() {
    let mut t = postal::new_table(TableConfig::default()).unwrap();
    let reader = io::BufReader::new(FailingReader);
    let err = dataset::load(reader, &mut t).unwrap_err();
    assert!(matches!(err, DatasetError::Io(_)));
    assert!(err.to_string().contains("disk on fire"));
}
