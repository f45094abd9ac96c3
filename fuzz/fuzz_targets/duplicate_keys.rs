#![no_main]

use libfuzzer_sys::fuzz_target;
use saphyr_repr::options::DuplicateKeyPolicy;
use saphyr_repr::{CoreSchema, Options, from_str_with_options};

// Builds mappings with intentional duplicate keys to exercise every duplicate
// key policy in block and flow styles.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);

    let yaml_top = format!("a: 1\na: 2\nkey: {s}\nkey: {s}\n");
    let yaml_nested = format!("outer:\n  inner: {{x: 1, x: 2}}\n  arr: [{{k: {s}}}, {{k: {s}}}]\n");
    let yaml_flow = format!("{{'{s}': 1, '{s}': 2}}\n");

    for policy in [
        DuplicateKeyPolicy::Error,
        DuplicateKeyPolicy::FirstWins,
        DuplicateKeyPolicy::LastWins,
        DuplicateKeyPolicy::Keep,
    ] {
        for y in [&yaml_top, &yaml_nested, &yaml_flow] {
            let options = Options {
                duplicate_keys: policy,
                ..Options::default()
            };
            if let Ok(doc) = from_str_with_options(y, CoreSchema::instance(), options) {
                let _ = doc.construct(CoreSchema::instance());
            }
        }
    }
});
