#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Extraction must never panic, whatever the input
    let merged = softmax_pda::pda::extract(data);
    let sections = softmax_pda::pda::extract_sections(data);

    // Every merged key comes from some section
    for (name, _) in merged.iter() {
        assert!(sections.iter().any(|s| s.parameters.contains(name)));
    }
});
