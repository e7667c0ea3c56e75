#![no_main]

use libfuzzer_sys::fuzz_target;
use peppol_edi::client::wire::{Page, PurchaseInvoice};

fuzz_target!(|data: &[u8]| {
    // Must not panic; malformed bodies are errors.
    let _ = serde_json::from_slice::<Page<PurchaseInvoice>>(data);
});
