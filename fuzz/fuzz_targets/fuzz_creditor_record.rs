#![no_main]

use libfuzzer_sys::fuzz_target;
use peppol_edi::client::wire::{CreditorRecord, DebtorCreated};

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<CreditorRecord>(data);
    let _ = serde_json::from_slice::<DebtorCreated>(data);
});
