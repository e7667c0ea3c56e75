#![no_main]

use libfuzzer_sys::fuzz_target;
use peppol_edi::core::EdiStatus;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic. Accepted values must be whitelisted codes.
        if let Ok(status) = EdiStatus::from_remote(s) {
            assert_eq!(status.code(), s.trim());
        }
    }
});
