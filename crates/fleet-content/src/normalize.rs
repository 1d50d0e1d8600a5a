//! Formatting-only normalization
//!
//! Only decor (the whitespace and comments around keys and table headers) is
//! rewritten, so the content of multi-line strings is never touched and the
//! structural JSON view is unchanged.

use toml_edit::{Decor, Item, Table};

use crate::document::Document;
use crate::error::Result;

/// Normalize blank lines and the end of the document.
///
/// - runs of blank lines before any key or table header collapse to one
/// - the document has no leading blank lines
/// - trailing blank lines and whitespace are removed
/// - non-empty output ends with exactly one newline
/// - the document keeps its line ending
///
/// `normalize(normalize(d))` renders identically to `normalize(d)`.
pub fn normalize(document: &Document) -> Result<Document> {
    let mut working = document.clone();
    collapse_table(working.root_mut());

    let inner = working.inner_mut();
    if let Some(trailing) = inner.trailing().as_str() {
        let collapsed = collapse_blank_lines(trailing);
        inner.set_trailing(collapsed);
    }

    let rendered = working.serialize();
    let body = strip_leading_blank_lines(&rendered).trim_end();
    let text = if body.is_empty() {
        String::new()
    } else {
        format!("{body}{}", document.line_ending().as_str())
    };

    Document::parse(&text)
}

fn collapse_table(table: &mut Table) {
    collapse_decor(table.decor_mut());
    for (mut key, item) in table.iter_mut() {
        collapse_decor(key.leaf_decor_mut());
        match item {
            Item::Table(child) => collapse_table(child),
            Item::ArrayOfTables(array) => {
                for child in array.iter_mut() {
                    collapse_table(child);
                }
            }
            Item::Value(_) | Item::None => {}
        }
    }
}

fn collapse_decor(decor: &mut Decor) {
    let collapsed = match decor.prefix().and_then(|p| p.as_str()) {
        Some(prefix) if has_blank_run(prefix) => collapse_blank_lines(prefix),
        _ => return,
    };
    decor.set_prefix(collapsed);
}

fn is_blank_line(line: &str) -> bool {
    line.ends_with('\n') && line.trim().is_empty()
}

fn has_blank_run(text: &str) -> bool {
    let mut previous_blank = false;
    for line in text.split_inclusive('\n') {
        let blank = is_blank_line(line);
        if blank && previous_blank {
            return true;
        }
        previous_blank = blank;
    }
    false
}

/// Collapse consecutive blank lines into a single `\n`.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = false;
    for line in text.split_inclusive('\n') {
        if is_blank_line(line) {
            if !previous_blank {
                out.push('\n');
            }
            previous_blank = true;
        } else {
            out.push_str(line);
            previous_blank = false;
        }
    }
    out
}

fn strip_leading_blank_lines(text: &str) -> &str {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        offset += line.len();
    }
    &text[offset..]
}
