#![no_main]

use libfuzzer_sys::fuzz_target;
use ts_blank_space::{BlankError, Dialect, blank_space, blank_space_strict};

fuzz_target!(|data: &[u8]| {
    let data = if data.len() > 256 * 1024 {
        &data[..256 * 1024]
    } else {
        data
    };

    let source = String::from_utf8_lossy(data);

    // Strict mode fails only through reports, and agrees with the lenient output otherwise.
    for dialect in [Dialect::TypeScript, Dialect::Tsx] {
        match blank_space_strict(&source, dialect) {
            Ok(out) => assert_eq!(Some(out), blank_space(&source, dialect).ok()),
            Err(BlankError::Unsupported { diagnostics }) => assert!(!diagnostics.is_empty()),
            Err(_) => {}
        }
    }
});
