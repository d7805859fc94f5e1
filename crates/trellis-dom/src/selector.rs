//! Selector Fragments
//!
//! Parses the `tag.class#id` shorthand accepted as a tag argument. This is
//! not a CSS selector engine: one optional tag name plus `#id` and `.class`
//! tokens in any order, everything else tolerated and skipped.

/// Parsed `tag.class#id` fragment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorFragment {
    /// Leading tag name, if present and valid
    pub tag: Option<String>,
    /// `#id` token; when repeated the last one wins
    pub id: Option<String>,
    /// `.class` tokens in order of appearance
    pub classes: Vec<String>,
}

/// Tag used when the fragment names none
pub const DEFAULT_TAG: &str = "div";

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl SelectorFragment {
    /// Parse a selector fragment. Never fails; malformed pieces are skipped.
    pub fn parse(s: &str) -> Self {
        let mut fragment = Self::default();
        let mut chars = s.trim().chars().peekable();

        // Leading run of name characters is the tag
        let mut tag = String::new();
        while let Some(&c) = chars.peek() {
            if is_name_char(c) {
                tag.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if !tag.is_empty() {
            fragment.tag = Some(tag.to_ascii_lowercase());
        }

        while let Some(c) = chars.next() {
            let marker = match c {
                '#' | '.' => c,
                // Not a token start, skip
                _ => continue,
            };

            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if is_name_char(c) {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                continue;
            }

            if marker == '#' {
                fragment.id = Some(name);
            } else {
                fragment.classes.push(name);
            }
        }

        fragment
    }

    /// Tag name to construct, falling back to the default container
    pub fn tag_or_default(&self) -> &str {
        self.tag.as_deref().unwrap_or(DEFAULT_TAG)
    }

    /// Space-joined class attribute value, if any classes were given
    pub fn class_attr(&self) -> Option<String> {
        if self.classes.is_empty() {
            None
        } else {
            Some(self.classes.join(" "))
        }
    }
}
