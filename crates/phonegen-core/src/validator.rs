//! Numbering-plan validation.
//!
//! The canonical prefix table is the single source of truth for what counts
//! as a well-formed number, independent of which carrier groups were used to
//! generate it.

use crate::constants::{PHONE_NUMBER_LEN, PREFIX_LEN};

/// Version tag of the canonical prefix table.
pub const PREFIX_TABLE_VERSION: &str = "2024.1";

/// Canonical valid-prefix table, sorted for binary search.
pub const CANONICAL_PREFIXES: [&str; 52] = [
    "130", "131", "132", "133", "134", "135", "136", "137", "138", "139", //
    "145", "147", "149", //
    "150", "151", "152", "153", "155", "156", "157", "158", "159", //
    "165", "166", "167", //
    "170", "171", "172", "173", "174", "175", "176", "177", "178", //
    "180", "181", "182", "183", "184", "185", "186", "187", "188", "189", //
    "191", "192", "193", "195", "196", "197", "198", "199",
];

/// Check whether `prefix` is in the canonical table.
#[inline]
#[must_use]
pub fn is_canonical_prefix(prefix: &str) -> bool {
    CANONICAL_PREFIXES.binary_search(&prefix).is_ok()
}

/// Check whether `candidate` is a well-formed phone number.
///
/// A candidate is valid when it is exactly 11 ASCII digits and its first
/// three digits are a canonical prefix.
///
/// ```
/// use phonegen_core::validator::is_valid;
///
/// assert!(is_valid("13412345678"));
/// assert!(!is_valid("12012345678")); // unknown block
/// assert!(!is_valid("1341234567")); // too short
/// assert!(!is_valid("1341234567a"));
/// ```
#[must_use]
pub fn is_valid(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    if bytes.len() != PHONE_NUMBER_LEN {
        return false;
    }
    if !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    is_canonical_prefix(&candidate[..PREFIX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        for pair in CANONICAL_PREFIXES.windows(2) {
            assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn table_entries_are_three_digits() {
        for prefix in CANONICAL_PREFIXES {
            assert_eq!(prefix.len(), PREFIX_LEN);
            assert!(prefix.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn accepts_every_canonical_prefix() {
        for prefix in CANONICAL_PREFIXES {
            let number = format!("{prefix}00000000");
            assert!(is_valid(&number), "{number} rejected");
        }
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(!is_valid(""));
        assert!(!is_valid("134"));
        assert!(!is_valid("1341234567"));
        assert!(!is_valid("134123456789"));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(!is_valid("134-2345678"));
        assert!(!is_valid("134 2345678"));
        assert!(!is_valid("+3412345678"));
    }

    #[test]
    fn rejects_multibyte_input_without_panicking() {
        // 11 bytes but not 11 ASCII digits; slicing must not split a char.
        assert!(!is_valid("13\u{00e9}1234567"));
        assert!(!is_valid("\u{0661}\u{0662}\u{0663}45678"));
    }

    #[test]
    fn rejects_unknown_prefixes() {
        assert!(!is_valid("12012345678"));
        assert!(!is_valid("14012345678"));
        assert!(!is_valid("19412345678"));
        assert!(!is_valid("00012345678"));
    }

    #[test]
    fn validation_is_repeatable() {
        for candidate in ["13412345678", "99999999999", "abc"] {
            assert_eq!(is_valid(candidate), is_valid(candidate));
        }
    }
}
