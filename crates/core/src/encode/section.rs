//! One section of an outgoing script, rendered in canonical layout.

use crate::sections::SectionKey;
use std::collections::BTreeMap;
use std::fmt::{Display, Write};

/// A section under construction: an upper-case title, sorted keys, and
/// nested child sections (only `GAME` has any).
#[derive(Debug, Clone)]
pub(crate) struct WritableSection {
    title: String,
    values: BTreeMap<String, String>,
    children: Vec<WritableSection>,
}

impl WritableSection {
    pub fn new(key: SectionKey) -> Self {
        WritableSection {
            title: key.to_string().to_ascii_uppercase(),
            values: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.values.insert(key.to_owned(), value.to_string());
        self
    }

    pub fn set_opt<T: Display>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(key, value);
        }
        self
    }

    pub fn set_flag(&mut self, key: &str, value: bool) -> &mut Self {
        self.set(key, u8::from(value))
    }

    /// Copy free-form entries (options, restrictions) verbatim.
    pub fn extend<'a>(&mut self, entries: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (key, value) in entries {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn push_child(&mut self, child: WritableSection) {
        self.children.push(child);
    }

    /// `[TITLE]`, `{`, one `key=value;` per line, children, `}`. Each nesting
    /// level is indented by one tab.
    pub fn render(&self, out: &mut String, depth: usize) {
        let indent = "\t".repeat(depth);
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}[{}]", indent, self.title);
        let _ = writeln!(out, "{}{{", indent);
        for (key, value) in &self.values {
            let _ = writeln!(out, "{}\t{}={};", indent, key, value);
        }
        for child in &self.children {
            child.render(out, depth + 1);
        }
        let _ = writeln!(out, "{}}}", indent);
    }
}
