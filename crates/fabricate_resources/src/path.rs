//! Explicit property-path builder.
//!
//! Callers construct paths to nested properties with ordinary method calls
//! instead of syntactic capture: `PropertyPath::root().field("tags").index(0)`.
//! [`Value::at_path`](crate::Value::at_path) consumes these paths, and outer
//! layers use them to address fields when reporting or constraining values.

use core::fmt;

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Descend into a named field of a structured value.
    Field(String),
    /// Descend into one array element.
    Index(usize),
    /// Fan out across every array element.
    AnyIndex,
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{name}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
            PathSegment::AnyIndex => write!(f, "[*]"),
        }
    }
}

/// A path to a (possibly nested) property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Vec<PathSegment>,
}

impl PropertyPath {
    /// Creates an empty path addressing the value itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Appends a named-field segment.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Field(name.into()));
        self
    }

    /// Appends an array-index segment.
    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    /// Appends a segment matching every element of an array.
    #[must_use]
    pub fn any_index(mut self) -> Self {
        self.segments.push(PathSegment::AnyIndex);
        self
    }

    /// Returns the path's segments in order.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns true if the path addresses the value itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    if first {
                        write!(f, "{name}")?;
                    } else {
                        write!(f, ".{name}")?;
                    }
                }
                other => write!(f, "{other}")?,
            }
            first = false;
        }
        Ok(())
    }
}
