use crate::ast::span::Span;
use std::fmt;

/// Dot-separated field path (e.g. `tag`, `property.has_link`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DotPath {
    pub segments: Vec<String>,
    pub span: Span,
}

impl DotPath {
    pub fn from_string(path: &str, span: Span) -> Self {
        Self {
            segments: path.split('.').map(|s| s.to_string()).collect(),
            span,
        }
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
