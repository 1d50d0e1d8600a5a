//! Structural merge of a template into a target pyproject document
//!
//! The template's top-level tables are *section roots*; so are the children
//! of the `tool` namespace table. Each direct child key of a section root is a
//! template-owned path and is overwritten wholesale, unless the
//! [`MergePolicy`] preserves it. When a preserved path lies below an owned
//! table, the merge descends into that table instead of replacing it.
//!
//! Everything the template does not mention is left untouched.

mod dev_deps;
mod policy;
mod tables;

pub use dev_deps::package_name;
pub use policy::{ALWAYS_PRESERVE, MergePolicy, PathClass};

use fleet_content::{Document, KeyPath};
use toml_edit::{Array, Item, Key, Table};

use self::tables::{detached_item, refill_table, table_shell};

/// Tables whose children are section roots rather than owned paths.
pub const NAMESPACE_TABLES: &[&str] = &["tool"];

/// Table and key of the development dependency group.
pub const DEV_DEPENDENCY_GROUP: (&str, &str) = ("dependency-groups", "dev");

/// Structural incompatibility between template and target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("type mismatch at {path}: template has {template}, target has {target}")]
    TypeMismatch {
        path: String,
        template: String,
        target: String,
    },

    #[error("invalid template at {path}: {reason}")]
    InvalidTemplate { path: String, reason: String },
}

/// The merged document and what happened to each template-owned path.
#[derive(Debug, Clone, Default)]
pub struct MergeResult {
    pub document: Document,
    /// Owned paths whose existing value was replaced.
    pub overwritten: Vec<KeyPath>,
    /// Owned paths skipped because the policy preserves them.
    pub preserved: Vec<KeyPath>,
    /// Owned paths the target did not have before.
    pub created: Vec<KeyPath>,
    /// Requirement strings appended to `dependency-groups.dev`.
    pub added_dev_dependencies: Vec<String>,
}

/// Merge `template` into a copy of `target`.
///
/// # Errors
///
/// - `TypeMismatch` when a section root or a table the merge must descend
///   into is neither a table nor an inline table in the target, or when the template puts a scalar
///   where the target keeps a table with preserved content.
/// - `InvalidTemplate` when a section root is an array of tables.
pub fn merge(
    template: &Document,
    target: &Document,
    policy: &MergePolicy,
    extra_dev_deps: &[String],
) -> Result<MergeResult, MergeError> {
    let mut document = target.clone();
    let mut merger = Merger {
        policy,
        changes: Changes::default(),
    };

    merger.merge_root(template.root(), document.root_mut())?;
    let added = merger.extend_dev_dependencies(document.root_mut(), extra_dev_deps)?;

    let Changes {
        overwritten,
        preserved,
        created,
    } = merger.changes;

    tracing::debug!(
        overwritten = overwritten.len(),
        preserved = preserved.len(),
        created = created.len(),
        dev_dependencies = added.len(),
        "merged template"
    );

    Ok(MergeResult {
        document,
        overwritten,
        preserved,
        created,
        added_dev_dependencies: added,
    })
}

#[derive(Debug, Default)]
struct Changes {
    overwritten: Vec<KeyPath>,
    preserved: Vec<KeyPath>,
    created: Vec<KeyPath>,
}

struct Merger<'p> {
    policy: &'p MergePolicy,
    changes: Changes,
}

impl Merger<'_> {
    fn merge_root(&mut self, template: &Table, target: &mut Table) -> Result<(), MergeError> {
        for (name, item) in template.iter() {
            let Some((key, _)) = template.get_key_value(name) else {
                continue;
            };
            let path = KeyPath::root(name);

            match item {
                Item::Table(namespace) if NAMESPACE_TABLES.contains(&name) => {
                    self.merge_namespace(target, key, namespace, path)?;
                }
                Item::Table(section) => self.merge_section(target, key, section, path)?,
                Item::ArrayOfTables(_) => return Err(invalid_section_root(&path)),
                Item::Value(_) => self.merge_owned(target, key, item, path)?,
                Item::None => {}
            }
        }
        Ok(())
    }

    fn merge_namespace(
        &mut self,
        target: &mut Table,
        key: &Key,
        namespace: &Table,
        path: KeyPath,
    ) -> Result<(), MergeError> {
        if self.skip_preserved(&path) {
            return Ok(());
        }

        let (table, created) = ensure_table(target, key, namespace, &path)?;
        for (name, item) in namespace.iter() {
            let Some((child_key, _)) = namespace.get_key_value(name) else {
                continue;
            };
            let child_path = path.child(name);
            match item {
                Item::Table(section) => {
                    self.merge_section(table, child_key, section, child_path)?;
                }
                Item::ArrayOfTables(_) => return Err(invalid_section_root(&child_path)),
                _ => self.merge_owned(table, child_key, item, child_path)?,
            }
        }

        drop_if_unused(target, key, namespace, created);
        Ok(())
    }

    fn merge_section(
        &mut self,
        parent: &mut Table,
        key: &Key,
        section: &Table,
        path: KeyPath,
    ) -> Result<(), MergeError> {
        if self.skip_preserved(&path) {
            return Ok(());
        }

        let (table, created) = ensure_table(parent, key, section, &path)?;
        for (name, item) in section.iter() {
            if let Some((child_key, _)) = section.get_key_value(name) {
                self.merge_owned(table, child_key, item, path.child(name))?;
            }
        }

        drop_if_unused(parent, key, section, created);
        Ok(())
    }

    /// Apply the overwrite-or-descend rule to one template-owned path.
    fn merge_owned(
        &mut self,
        parent: &mut Table,
        key: &Key,
        item: &Item,
        path: KeyPath,
    ) -> Result<(), MergeError> {
        if self.skip_preserved(&path) {
            return Ok(());
        }

        if self.policy.has_preserved_below(&path) {
            if let Item::Table(template_table) = item {
                let (table, created) = ensure_table(parent, key, template_table, &path)?;
                for (name, child) in template_table.iter() {
                    if let Some((child_key, _)) = template_table.get_key_value(name) {
                        self.merge_owned(table, child_key, child, path.child(name))?;
                    }
                }
                drop_if_unused(parent, key, template_table, created);
                return Ok(());
            }

            if let Some(existing) = parent.get(key.get())
                && existing.is_table_like()
            {
                return Err(MergeError::TypeMismatch {
                    path: path.to_string(),
                    template: item.type_name().to_string(),
                    target: existing.type_name().to_string(),
                });
            }
        }

        self.overwrite(parent, key, item, path);
        Ok(())
    }

    fn overwrite(&mut self, parent: &mut Table, key: &Key, item: &Item, path: KeyPath) {
        let existed = parent.contains_key(key.get());

        let refilled = match (item, parent.get_mut(key.get())) {
            (Item::Table(template_table), Some(Item::Table(existing))) => {
                refill_table(existing, template_table);
                true
            }
            _ => false,
        };
        if !refilled {
            parent.insert_formatted(key, detached_item(item));
        }

        if existed {
            tracing::debug!(path = %path, "overwrote from template");
            self.changes.overwritten.push(path);
        } else {
            tracing::debug!(path = %path, "created from template");
            self.changes.created.push(path);
        }
    }

    fn skip_preserved(&mut self, path: &KeyPath) -> bool {
        if !self.policy.is_preserved(path) {
            return false;
        }
        tracing::debug!(path = %path, class = ?self.policy.classify(path), "preserved");
        self.changes.preserved.push(path.clone());
        true
    }

    fn extend_dev_dependencies(
        &mut self,
        root: &mut Table,
        extras: &[String],
    ) -> Result<Vec<String>, MergeError> {
        let (group_name, dev_name) = DEV_DEPENDENCY_GROUP;
        let group_path = KeyPath::root(group_name);
        let dev_path = group_path.child(dev_name);

        if extras.is_empty() || self.policy.is_preserved(&dev_path) {
            return Ok(Vec::new());
        }

        if !root.contains_key(group_name) {
            root.insert(group_name, Item::Table(Table::new()));
        }
        promote_inline_table(root, group_name);
        let group = match root.get_mut(group_name) {
            Some(Item::Table(table)) => table,
            other => return Err(mismatch(&group_path, "table", other.as_deref())),
        };

        let existed = group.contains_key(dev_name);
        if !existed {
            group.insert(dev_name, toml_edit::value(Array::new()));
        }
        let dev_item = group.get_mut(dev_name);
        let target_type = dev_item.as_deref().map_or("nothing", Item::type_name);
        let Some(dev) = dev_item.and_then(Item::as_array_mut) else {
            return Err(MergeError::TypeMismatch {
                path: dev_path.to_string(),
                template: "array".to_string(),
                target: target_type.to_string(),
            });
        };

        let added = dev_deps::union_into(dev, extras);
        if !added.is_empty() {
            tracing::debug!(path = %dev_path, added = ?added, "extended dev dependencies");
            if existed {
                self.changes.overwritten.push(dev_path);
            } else {
                self.changes.created.push(dev_path);
            }
        }
        Ok(added)
    }
}

/// Find the target table at `key`, creating an empty one shaped like the
/// template's when absent. Returns whether it was created.
fn ensure_table<'t>(
    parent: &'t mut Table,
    key: &Key,
    template: &Table,
    path: &KeyPath,
) -> Result<(&'t mut Table, bool), MergeError> {
    let created = !parent.contains_key(key.get());
    if created {
        parent.insert_formatted(key, Item::Table(table_shell(template)));
    }
    promote_inline_table(parent, key.get());
    match parent.get_mut(key.get()) {
        Some(Item::Table(table)) => Ok((table, created)),
        other => Err(mismatch(path, "table", other.as_deref())),
    }
}

/// Turn an inline table at `key` into a standard table so the merge can
/// descend into it. Both spell the same TOML table; other items are left as
/// they are.
fn promote_inline_table(parent: &mut Table, key: &str) {
    let Some(item) = parent.get_mut(key) else {
        return;
    };
    if !item.is_inline_table() {
        return;
    }
    *item = match std::mem::take(item).into_table() {
        Ok(table) => Item::Table(table),
        Err(unchanged) => unchanged,
    };
    // `name = { ... }` leaves a space after the key that would end up inside
    // the `[name ]` header.
    if let Some(mut key) = parent.key_mut(key) {
        key.leaf_decor_mut().clear();
    }
}

/// Remove a table this merge created but never wrote into, so preserved-only
/// sections do not leave empty headers behind. Tables the template itself
/// leaves empty are kept.
fn drop_if_unused(parent: &mut Table, key: &Key, template: &Table, created: bool) {
    if !created || template.is_empty() {
        return;
    }
    if parent
        .get(key.get())
        .and_then(Item::as_table)
        .is_some_and(Table::is_empty)
    {
        parent.remove(key.get());
    }
}

fn mismatch(path: &KeyPath, template: &str, target: Option<&Item>) -> MergeError {
    MergeError::TypeMismatch {
        path: path.to_string(),
        template: template.to_string(),
        target: target.map_or("nothing", Item::type_name).to_string(),
    }
}

fn invalid_section_root(path: &KeyPath) -> MergeError {
    MergeError::InvalidTemplate {
        path: path.to_string(),
        reason: "section roots must be tables or scalars, not arrays of tables".to_string(),
    }
}
