//! Template Parser
//!
//! Scans a string for `${identifier}` placeholders where the identifier is a
//! bare run of word characters. No dotted paths, no expressions, no escaping;
//! anything malformed stays literal.

use trellis_store::{display_property, StoreData};

/// A parsed template string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    props: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl Template {
    /// Parse a template. Never fails; a string without placeholders parses to
    /// a single static segment.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut props: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(start) = rest.find("${") {
            let after = &rest[start + 2..];
            let ident_len = after
                .find(|c: char| !is_ident_char(c))
                .unwrap_or(after.len());
            let closed = ident_len > 0 && after[ident_len..].starts_with('}');

            literal.push_str(&rest[..start]);
            if closed {
                let ident = &after[..ident_len];
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Placeholder(ident.to_string()));
                if !props.iter().any(|p| p == ident) {
                    props.push(ident.to_string());
                }
                rest = &after[ident_len + 1..];
            } else {
                // Unterminated or empty placeholder stays literal
                literal.push_str("${");
                rest = after;
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: source.to_string(),
            segments,
            props,
        }
    }

    /// Referenced property names, distinct, in order of first appearance
    pub fn props(&self) -> &[String] {
        &self.props
    }

    /// True when the template has no placeholders
    pub fn is_static(&self) -> bool {
        self.props.is_empty()
    }

    /// The unparsed template string
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute placeholders against the given data.
    ///
    /// A static template returns the source unchanged regardless of data;
    /// a missing property renders as the empty string.
    pub fn render(&self, data: &StoreData) -> String {
        if self.is_static() {
            return self.source.clone();
        }

        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => out.push_str(s),
                Segment::Placeholder(prop) => out.push_str(&display_property(data, prop)),
            }
        }
        out
    }
}
