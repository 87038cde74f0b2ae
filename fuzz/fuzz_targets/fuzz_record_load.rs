#![no_main]

use libfuzzer_sys::fuzz_target;

use phonegen_core::validator::is_valid;
use phonegen_store::PersistedRecord;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must be rejected with a reason, never a panic.
    if let Ok(record) = PersistedRecord::from_slice(data) {
        assert_eq!(record.count, record.numbers.len());
        assert!(record.numbers.iter().all(|n| is_valid(n.as_str())));
    }
});
