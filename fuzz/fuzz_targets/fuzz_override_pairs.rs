//! Fuzz target for `key=value` command-line overrides.
//!
//! Builds an override tree from arbitrary pairs and merges it onto a
//! schema's defaults. A rejected merge must leave the instance unchanged.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tc_config::SchemaName;
use tc_schema::{instantiate, overrides_from_pairs, to_plain};

#[derive(Arbitrary, Debug)]
struct Input {
    schema: u8,
    pairs: Vec<String>,
}

fuzz_target!(|input: Input| {
    let name = SchemaName::ALL[input.schema as usize % SchemaName::ALL.len()];
    let Ok(overrides) = overrides_from_pairs(&input.pairs) else {
        return;
    };

    let mut instance = instantiate(&name.schema());
    let before = to_plain(&instance);
    if instance.merge_in_place(&overrides).is_err() {
        assert_eq!(to_plain(&instance), before);
    } else {
        let _ = instance.validate();
    }
});
