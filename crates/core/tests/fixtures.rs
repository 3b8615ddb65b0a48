use std::path::PathBuf;

use ts_blank_space::{Dialect, blank_space, blank_space_strict, utf16::line_starts};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name)).expect("read fixture")
}

const CASES: [(&str, &str); 11] = [
    ("basics.ts", "basics.out.js"),
    ("classes.ts", "classes.out.js"),
    ("asi.ts", "asi.out.js"),
    ("asi-hazards.ts", "asi-hazards.out.js"),
    ("arrow-functions.ts", "arrow-functions.out.js"),
    ("async-generic-arrow.ts", "async-generic-arrow.out.js"),
    ("decorators.ts", "decorators.out.js"),
    ("modules.ts", "modules.out.js"),
    ("namespaces.ts", "namespaces.out.js"),
    ("component.tsx", "component.out.jsx"),
    ("unicode.ts", "unicode.out.js"),
];

fn dialect(name: &str) -> Dialect {
    Dialect::from_path(name).unwrap_or_else(|| panic!("unknown file extension: {name}"))
}

#[test]
fn fixtures_match_expected_output() {
    for (input_name, expected_name) in CASES {
        let input = read_fixture(input_name);
        let expected = read_fixture(expected_name);

        let actual = blank_space_strict(&input, dialect(input_name))
            .unwrap_or_else(|e| panic!("{input_name}: {e}"));
        assert_eq!(actual, expected, "fixture mismatch: {input_name}");
    }
}

#[test]
fn fixtures_keep_every_position() {
    for (input_name, _) in CASES {
        let input = read_fixture(input_name);
        let actual = blank_space(&input, dialect(input_name)).unwrap();

        assert_eq!(
            actual.encode_utf16().count(),
            input.encode_utf16().count(),
            "UTF-16 length changed: {input_name}"
        );
        assert_eq!(
            line_starts(&actual).len(),
            line_starts(&input).len(),
            "line count changed: {input_name}"
        );
    }
}

#[test]
fn fixture_outputs_are_fixed_points() {
    // Blanked output is plain JavaScript, which the TypeScript grammar accepts unchanged.
    for (input_name, expected_name) in CASES {
        let expected = read_fixture(expected_name);
        let again = blank_space_strict(&expected, dialect(input_name)).unwrap();
        assert_eq!(again, expected, "not idempotent: {input_name}");
    }
}
