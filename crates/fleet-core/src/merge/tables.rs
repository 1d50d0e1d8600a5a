//! Copying template items into a target document
//!
//! Tables parsed from the template carry positions that only make sense in
//! the template, so they are rebuilt instead of cloned. Rebuilt tables have no
//! position and render after their parent.

use toml_edit::{ArrayOfTables, Decor, Item, Table};

/// Deep copy of a template item without document positions.
pub(crate) fn detached_item(item: &Item) -> Item {
    match item {
        Item::Table(table) => Item::Table(detached_table(table)),
        Item::ArrayOfTables(array) => {
            let mut out = ArrayOfTables::new();
            for table in array.iter() {
                out.push(detached_table(table));
            }
            Item::ArrayOfTables(out)
        }
        other => other.clone(),
    }
}

pub(crate) fn detached_table(source: &Table) -> Table {
    let mut table = table_shell(source);
    copy_entries(source, &mut table);
    table
}

/// Empty table with the template's header flags and comments.
pub(crate) fn table_shell(source: &Table) -> Table {
    let mut table = Table::new();
    table.set_implicit(source.is_implicit());
    table.set_dotted(source.is_dotted());
    *table.decor_mut() = fresh_decor(source.decor());
    table
}

/// Replace the entries of an existing table with the template's, keeping the
/// existing header decor and document position.
pub(crate) fn refill_table(existing: &mut Table, source: &Table) {
    let keys: Vec<String> = existing.iter().map(|(k, _)| k.to_string()).collect();
    for key in keys {
        existing.remove(&key);
    }
    existing.set_implicit(source.is_implicit());
    existing.set_dotted(source.is_dotted());
    copy_entries(source, existing);
}

fn copy_entries(source: &Table, target: &mut Table) {
    for (name, _) in source.iter() {
        if let Some((key, item)) = source.get_key_value(name) {
            target.insert_formatted(key, detached_item(item));
        }
    }
}

/// Header decor for a table new to the target: template comments survive,
/// leading blank lines collapse into the single separator line the default
/// decor would render.
fn fresh_decor(source: &Decor) -> Decor {
    let mut decor = Decor::default();

    let comments = source
        .prefix()
        .and_then(|p| p.as_str())
        .map(|p| p.trim_start_matches(['\n', '\r', ' ', '\t']))
        .filter(|p| p.contains('#'));
    if let Some(comments) = comments {
        decor.set_prefix(format!("\n{comments}"));
    }
    if let Some(suffix) = source.suffix() {
        decor.set_suffix(suffix.clone());
    }
    decor
}
