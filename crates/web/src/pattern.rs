//! Route path patterns.
//!
//! `/users/{id}` is parsed into literal and variable segments at
//! registration time; matching and capture are then segment-wise, with a
//! variable consuming exactly one non-empty segment.

use std::collections::HashMap;
use std::fmt;

use crate::error::WebError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `/users/{id}/orders`.
    ///
    /// Patterns must start with `/`; braces must wrap a whole segment, and
    /// variable names must be non-empty and unique within the pattern.
    pub fn parse(pattern: &str) -> Result<Self, WebError> {
        let invalid = |reason: &str| WebError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let rest = pattern.strip_prefix('/').ok_or_else(|| invalid("must start with '/'"))?;

        let mut segments = Vec::new();
        let mut seen: Vec<&str> = Vec::new();

        for part in rest.split('/') {
            if let Some(name) = part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                if name.is_empty() {
                    return Err(invalid("empty variable name"));
                }
                if name.contains('{') || name.contains('}') {
                    return Err(invalid("braces must wrap a whole segment"));
                }
                if seen.contains(&name) {
                    return Err(invalid("duplicate variable name"));
                }
                seen.push(name);
                segments.push(Segment::Variable(name.to_string()));
            } else if part.contains('{') || part.contains('}') {
                return Err(invalid("braces must wrap a whole segment"));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(PathPattern {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the pattern contains no variables.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Variable names in pattern order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Whether the path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts = match self.aligned_parts(path) {
            Some(parts) => parts,
            None => return false,
        };
        self.segments
            .iter()
            .zip(parts)
            .all(|(segment, part)| match segment {
                Segment::Literal(literal) => literal.as_str() == part,
                Segment::Variable(_) => !part.is_empty(),
            })
    }

    /// Match the path and extract its variable values.
    pub fn capture(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts = self.aligned_parts(path)?;

        let mut variables = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal.as_str() != part {
                        return None;
                    }
                }
                Segment::Variable(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    variables.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(variables)
    }

    /// Split the path into segments, or bail when the shape cannot match.
    fn aligned_parts<'a>(&self, path: &'a str) -> Option<Vec<&'a str>> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        Some(parts)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pattern_matches_exactly() {
        let pattern = PathPattern::parse("/users/count").unwrap();
        assert!(pattern.is_static());
        assert!(pattern.matches("/users/count"));
        assert!(!pattern.matches("/users"));
        assert!(!pattern.matches("/users/count/extra"));
    }

    #[test]
    fn test_variable_matches_one_segment() {
        let pattern = PathPattern::parse("/users/{id}").unwrap();
        assert!(!pattern.is_static());
        assert!(pattern.matches("/users/42"));
        assert!(pattern.matches("/users/alice"));
        assert!(!pattern.matches("/users"));
        assert!(!pattern.matches("/users/42/orders"));
    }

    #[test]
    fn test_variable_rejects_empty_segment() {
        let pattern = PathPattern::parse("/users/{id}").unwrap();
        assert!(!pattern.matches("/users/"));
    }

    #[test]
    fn test_capture_extracts_variables() {
        let pattern = PathPattern::parse("/users/{id}/orders/{order}").unwrap();
        let vars = pattern.capture("/users/42/orders/7").unwrap();

        assert_eq!(vars.get("id").map(String::as_str), Some("42"));
        assert_eq!(vars.get("order").map(String::as_str), Some("7"));
        assert_eq!(pattern.variable_names(), vec!["id", "order"]);
    }

    #[test]
    fn test_capture_fails_on_literal_mismatch() {
        let pattern = PathPattern::parse("/users/{id}").unwrap();
        assert!(pattern.capture("/orders/42").is_none());
    }

    #[test]
    fn test_trailing_slash_is_distinct() {
        let pattern = PathPattern::parse("/users").unwrap();
        assert!(pattern.matches("/users"));
        assert!(!pattern.matches("/users/"));

        let trailing = PathPattern::parse("/users/").unwrap();
        assert!(trailing.matches("/users/"));
        assert!(!trailing.matches("/users"));
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/users"));
    }

    #[test]
    fn test_parse_rejects_bad_patterns() {
        assert!(matches!(
            PathPattern::parse("users"),
            Err(WebError::InvalidPattern { .. })
        ));
        assert!(PathPattern::parse("/users/{}").is_err());
        assert!(PathPattern::parse("/users/{id").is_err());
        assert!(PathPattern::parse("/users/id}").is_err());
        assert!(PathPattern::parse("/{id}/{id}").is_err());
    }

    #[test]
    fn test_unmatched_paths_do_not_capture() {
        let pattern = PathPattern::parse("/users/{id}").unwrap();
        assert!(pattern.capture("/users").is_none());
        assert!(pattern.capture("users/42").is_none());
    }
}
