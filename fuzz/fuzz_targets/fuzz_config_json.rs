//! Fuzz target for config file contents.
//!
//! Arbitrary bytes are parsed as a Tacotron-GST config, validated, and
//! written back out. Every step may fail but none may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tc_config::schemas::tacotron_gst_schema;
use tc_schema::{from_json_str, to_plain};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(instance) = from_json_str(&tacotron_gst_schema(), text) {
        let _ = instance.validate();
        let _ = to_plain(&instance);
    }
});
