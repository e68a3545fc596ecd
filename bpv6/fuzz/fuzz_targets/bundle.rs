#![no_main]

use hardy_bpv6::{bundle::ParsedBundle, config::Config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(parsed) = ParsedBundle::parse(data, &Config::default()) {
        assert!(parsed.length <= data.len());
        for block in &parsed.bundle.blocks {
            assert!(block.extent.end <= data.len());
            assert!(block.data.start >= block.extent.start && block.data.end <= block.extent.end);
        }
        for d in &parsed.diagnostics {
            _ = format!("{d}");
        }
        _ = format!("{:?}", parsed.bundle);
    }
});

// cargo cov -- export --format=lcov  -instr-profile ./fuzz/coverage/bundle/coverage.profdata ./target/x86_64-unknown-linux-gnu/coverage/x86_64-unknown-linux-gnu/release/bundle -ignore-filename-regex='/.cargo/|rustc/|/target/' > ./fuzz/coverage/bundle/lcov.info
