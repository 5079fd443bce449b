//! Deterministic filenames for exported images and the archive itself.
//!
//! ## Sequenced names
//!
//! `prefix + NNN + ".jpg"`, where `NNN` is `start + position` padded to at
//! least three digits. Wider numbers are never truncated:
//!
//! - `name_for("c", 5, 0)` → `c005.jpg`
//! - `name_for("s", 1, 998)` → `s999.jpg`
//! - `name_for("s", 1, 999)` → `s1000.jpg`
//!
//! The extension is always `.jpg` because sequenced exports always force JPEG
//! encoding. `position` is the zero-based index in the collection at the
//! moment the export runs, not a stable identity.
//!
//! ## Archive names
//!
//! Archives are named after the export date: `YYYYMMDD.zip`.

use chrono::NaiveDate;

/// Sequenced export filename for the entry at `position`.
pub fn name_for(prefix: &str, start: u32, position: usize) -> String {
    let number = u64::from(start) + position as u64;
    format!("{prefix}{number:03}.jpg")
}

/// Archive filename for an export made on `date`.
pub fn archive_filename(date: NaiveDate) -> String {
    format!("{}.zip", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn pads_to_three_digits() {
        assert_eq!(name_for("c", 5, 0), "c005.jpg");
        assert_eq!(name_for("c", 5, 1), "c006.jpg");
        assert_eq!(name_for("c", 5, 2), "c007.jpg");
    }

    #[test]
    fn wide_numbers_are_not_truncated() {
        assert_eq!(name_for("s", 1, 998), "s999.jpg");
        assert_eq!(name_for("s", 1, 999), "s1000.jpg");
        assert_eq!(name_for("m", 12345, 0), "m12345.jpg");
    }

    #[test]
    fn zero_start_is_allowed() {
        assert_eq!(name_for("m", 0, 0), "m000.jpg");
    }

    #[test]
    fn max_start_does_not_overflow() {
        assert_eq!(name_for("c", u32::MAX, 1), "c4294967296.jpg");
    }

    #[test]
    fn archive_name_is_compact_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(archive_filename(date), "20260307.zip");
    }

    proptest! {
        #[test]
        fn names_are_injective_and_increasing(
            prefix in prop::sample::select(vec!["c", "s", "m"]),
            start in 0u32..5000,
            count in 1usize..200,
        ) {
            let names: Vec<String> = (0..count).map(|i| name_for(prefix, start, i)).collect();
            let unique: HashSet<&String> = names.iter().collect();
            prop_assert_eq!(unique.len(), count);

            // Strictly increasing in the numeric part.
            let numbers: Vec<u64> = names
                .iter()
                .map(|n| n[prefix.len()..n.len() - 4].parse().unwrap())
                .collect();
            for pair in numbers.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }
}
