#![no_main]

use hardy_sdnv::decode::Reader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = Reader::new(data);
    while !reader.is_empty() {
        let before = reader.offset();
        if reader.parse::<u64>().is_err() {
            break;
        }
        assert!(reader.offset() > before && reader.offset() <= data.len());
    }
});
