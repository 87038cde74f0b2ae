#![no_main]

use libfuzzer_sys::fuzz_target;

use phonegen_core::number::PhoneNumber;
use phonegen_core::validator::is_valid;

fuzz_target!(|data: &[u8]| {
    let Ok(candidate) = std::str::from_utf8(data) else {
        return;
    };

    // Validation is pure and agrees with the typed constructor.
    let valid = is_valid(candidate);
    assert_eq!(valid, is_valid(candidate));
    assert_eq!(valid, PhoneNumber::parse(candidate).is_ok());
    if valid {
        assert_eq!(candidate.len(), 11);
        assert!(candidate.bytes().all(|b| b.is_ascii_digit()));
    }
});
