//! Generators for arbitrary, valid TOML sources with messy formatting.

use proptest::prelude::*;

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        "-?[1-9][0-9]{0,5}",
        "\"[a-zA-Z0-9 .>=_-]{0,12}\"",
        "'[a-z ]{0,8}'",
        Just("true".to_string()),
        Just("[1, 2, 3]".to_string()),
        Just("[\n    \"pytest>=8\",\n    \"ruff\",\n]".to_string()),
        Just("{ x = 1, y = \"z\" }".to_string()),
        Just("\"\"\"\nline one\n\n\n\nline two\n\"\"\"".to_string()),
    ]
}

fn gap() -> impl Strategy<Value = String> {
    (0usize..4, prop::option::of("# [a-z ]{0,10}")).prop_map(|(blanks, comment)| {
        let mut out = "\n".repeat(blanks);
        if let Some(comment) = comment {
            out.push_str(&comment);
            out.push('\n');
        }
        out
    })
}

fn entries() -> impl Strategy<Value = String> {
    prop::collection::btree_map("k[a-z0-9_-]{0,6}", (gap(), " {0,2}", value()), 0..5).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(key, (gap, pad, value))| format!("{gap}{key}{pad}= {value}\n"))
                .collect()
        },
    )
}

/// A TOML document: some root keys followed by uniquely named tables, with
/// random blank lines, comments and spacing.
pub fn toml_source() -> impl Strategy<Value = String> {
    (
        entries(),
        prop::collection::btree_map("s[a-z]{0,5}(\\.t[a-z]{0,4})?", (gap(), entries()), 0..4),
        "\n{0,3}",
    )
        .prop_map(|(root, tables, tail)| {
            let mut out = root;
            for (name, (gap, body)) in tables {
                out.push_str(&format!("{gap}[{name}]\n{body}"));
            }
            out.push_str(&tail);
            out
        })
}
