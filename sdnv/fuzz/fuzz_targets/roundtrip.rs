#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|value: u64| {
    let data = hardy_sdnv::encode::emit(value);
    assert_eq!(
        hardy_sdnv::decode::parse::<u64>(&data),
        Ok((value, data.len()))
    );
});
