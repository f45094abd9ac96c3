#![no_main]

use libfuzzer_sys::fuzz_target;
use saphyr_repr::options::UnknownTagPolicy;
use saphyr_repr::{
    CoreSchema, FailsafeSchema, JsonSchema, NullSchema, Options, Schema, from_multiple_with_options,
    load_events,
};

// Loads arbitrary input under every bundled schema. Whatever loads must also
// construct (or fail cleanly) and serialize to events that load again.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);
    let schemas: [&'static dyn Schema; 4] = [
        NullSchema::instance(),
        FailsafeSchema::instance(),
        JsonSchema::instance(),
        CoreSchema::instance(),
    ];
    for schema in schemas {
        let options = Options {
            unknown_tags: UnknownTagPolicy::Preserve,
            ..Options::default()
        };
        let Ok(stream) = from_multiple_with_options(&s, |_| schema, options) else {
            continue;
        };
        for doc in stream.iter() {
            let _ = doc.construct(schema);
            let events = doc.to_events(schema);
            // Anchors are reassigned on output, so the alias ratio may differ.
            let options = Options {
                budget: None,
                unknown_tags: UnknownTagPolicy::Preserve,
                ..Options::default()
            };
            let reloaded = load_events(events.into_iter().map(Ok), |_| schema, options);
            assert!(reloaded.is_ok(), "serialized events must load again");
        }
    }
});
