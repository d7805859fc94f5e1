//! String Interner - Deduplicate tag and attribute names
//!
//! Tag names ("div", "button", "li") and attribute names ("class", "id",
//! "style") repeat heavily across a tree; each is stored once and referenced
//! by a 4-byte ID.

use std::collections::HashMap;

/// Interned string ID - just 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct InternedString(pub u32);

impl InternedString {
    /// Empty string
    pub const EMPTY: InternedString = InternedString(0);
}

/// String interner for deduplicating strings
pub struct StringInterner {
    /// Interned strings, indexed by ID
    strings: Vec<Box<str>>,
    /// Map from string content to ID
    map: HashMap<Box<str>, u32>,
}

impl StringInterner {
    /// Create a new string interner with common HTML strings pre-interned
    pub fn new() -> Self {
        let mut interner = Self {
            strings: Vec::with_capacity(64),
            map: HashMap::with_capacity(64),
        };

        // Pre-intern empty string at index 0
        interner.intern("");

        // Pre-intern common HTML tag names
        const COMMON_TAGS: &[&str] = &[
            "div", "span", "p", "a", "img",
            "ul", "ol", "li", "table", "tr", "td",
            "form", "input", "button", "select", "option", "textarea",
            "h1", "h2", "h3", "h4", "h5", "h6",
            "header", "footer", "nav", "main", "section", "article",
            "label", "br", "hr", "strong", "em",
        ];

        // Pre-intern common attribute names
        const COMMON_ATTRS: &[&str] = &[
            "id", "class", "style", "href", "src", "alt", "title",
            "type", "name", "value", "placeholder", "disabled", "checked",
        ];

        for tag in COMMON_TAGS {
            interner.intern(tag);
        }
        for attr in COMMON_ATTRS {
            interner.intern(attr);
        }

        interner
    }

    /// Intern a string, returning its ID
    /// If the string is already interned, returns the existing ID
    pub fn intern(&mut self, s: &str) -> InternedString {
        if let Some(&id) = self.map.get(s) {
            return InternedString(id);
        }

        let id = self.strings.len() as u32;
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.map.insert(boxed, id);
        InternedString(id)
    }

    /// Look up an already-interned string without interning it
    pub fn lookup(&self, s: &str) -> Option<InternedString> {
        self.map.get(s).map(|&id| InternedString(id))
    }

    /// Resolve an ID back to its string
    pub fn resolve(&self, id: InternedString) -> &str {
        self.strings
            .get(id.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if interner is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
