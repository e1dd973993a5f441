//! Property tests for the tabular log.

use proptest::collection::vec;
use proptest::prelude::*;
use tempfile::tempdir;

use stash_core::{append_csv, read_csv, Row};

fn field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,\"\n]{1,8}"
}

fn rows(min: usize, max: usize) -> impl Strategy<Value = Vec<Row>> {
    vec(vec(field(), 1..5), min..max)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn append_preserves_existing_rows_then_new_rows(
        existing in rows(0, 6),
        new in rows(1, 6),
    ) {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.csv");

        if !existing.is_empty() {
            append_csv(&path, &existing).unwrap();
        }
        let before = read_csv(&path).unwrap();
        prop_assert_eq!(&before, &existing);

        let total = append_csv(&path, &new).unwrap();
        let after = read_csv(&path).unwrap();

        let mut expected = existing.clone();
        expected.extend(new.iter().cloned());
        prop_assert_eq!(total, expected.len());
        prop_assert_eq!(after, expected);
    }
}
