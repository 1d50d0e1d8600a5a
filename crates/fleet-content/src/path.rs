//! Validated dotted key paths
//!
//! A [`KeyPath`] addresses a key inside a TOML document using the same
//! syntax TOML uses for dotted keys.
//!
//! # Path Syntax
//!
//! - Bare segments: `tool.pytest.ini_options`
//! - Quoted segments may contain dots: `tool."my.tool".enabled`
//! - Literal quotes work too: `tool.'my.tool'`
//!
//! # Examples
//!
//! ```
//! use fleet_content::KeyPath;
//!
//! let path = KeyPath::parse(r#"tool."my.tool".enabled"#).unwrap();
//! assert_eq!(path.segments(), ["tool", "my.tool", "enabled"]);
//! assert!(path.starts_with(&KeyPath::parse("tool").unwrap()));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A non-empty sequence of non-empty key segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parse a dotted path, rejecting empty paths, empty segments and
    /// unterminated quotes.
    pub fn parse(path: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut chars = path.chars().peekable();

        loop {
            while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}

            let segment = match chars.peek() {
                None => return Err(Error::invalid_path(path, "empty segment")),
                Some('"') => {
                    chars.next();
                    parse_basic_quoted(&mut chars, path)?
                }
                Some('\'') => {
                    chars.next();
                    let mut segment = String::new();
                    loop {
                        match chars.next() {
                            Some('\'') => break,
                            Some(c) => segment.push(c),
                            None => return Err(Error::invalid_path(path, "unterminated quote")),
                        }
                    }
                    segment
                }
                Some(_) => {
                    let mut segment = String::new();
                    while let Some(c) = chars.next_if(|c| is_bare_char(*c)) {
                        segment.push(c);
                    }
                    segment
                }
            };

            if segment.is_empty() {
                return Err(Error::invalid_path(path, "empty segment"));
            }
            segments.push(segment);

            while chars.next_if(|c| *c == ' ' || *c == '\t').is_some() {}

            match chars.next() {
                None => break,
                Some('.') => continue,
                Some(c) => {
                    return Err(Error::invalid_path(
                        path,
                        format!("unexpected character '{c}'"),
                    ));
                }
            }
        }

        Ok(Self { segments })
    }

    /// Build a path from already-split segments.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return Err(Error::invalid_path(&segments.join("."), "empty segment"));
        }
        Ok(Self { segments })
    }

    /// Single-segment path. Callers pass keys taken from a document, which
    /// TOML guarantees are present.
    pub fn root(key: &str) -> Self {
        Self {
            segments: vec![key.to_string()],
        }
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true for a parsed path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Final segment.
    pub fn leaf(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn parent(&self) -> Option<Self> {
        (self.segments.len() > 1).then(|| Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// True when `prefix` equals this path or is one of its ancestors.
    pub fn starts_with(&self, prefix: &KeyPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// True when this path is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &KeyPath) -> bool {
        other.segments.len() > self.segments.len() && other.starts_with(self)
    }
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn parse_basic_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    path: &str,
) -> Result<String> {
    let mut segment = String::new();
    loop {
        match chars.next() {
            Some('"') => return Ok(segment),
            Some('\\') => match chars.next() {
                Some('"') => segment.push('"'),
                Some('\\') => segment.push('\\'),
                Some('n') => segment.push('\n'),
                Some('t') => segment.push('\t'),
                Some(c) => {
                    return Err(Error::invalid_path(
                        path,
                        format!("unsupported escape '\\{c}'"),
                    ));
                }
                None => return Err(Error::invalid_path(path, "unterminated quote")),
            },
            Some(c) => segment.push(c),
            None => return Err(Error::invalid_path(path, "unterminated quote")),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if segment.chars().all(is_bare_char) {
                f.write_str(segment)?;
            } else {
                let escaped = segment
                    .replace('\\', "\\\\")
                    .replace('"', "\\\"")
                    .replace('\n', "\\n")
                    .replace('\t', "\\t");
                write!(f, "\"{escaped}\"")?;
            }
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
