#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_blank_space::{
    Dialect, blank_space,
    utf16::{is_line_terminator, utf16_len},
};

fuzz_target!(|data: &[u8]| {
    // Limit input size to keep the fuzzer fast and avoid OOM in pathological cases.
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);

    // Malformed input is still blanked; whatever comes out must keep every line's length.
    for dialect in [Dialect::TypeScript, Dialect::Tsx] {
        let Ok(out) = blank_space(&source, dialect) else {
            continue;
        };
        assert!(
            out.split(is_line_terminator)
                .map(utf16_len)
                .eq(source.split(is_line_terminator).map(utf16_len))
        );
    }
});
