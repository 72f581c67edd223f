//! Route path patterns.
//!
//! A pattern is a sequence of segments, each either static text or a named
//! `{param}` placeholder. Matching is exact on segment count.

use crate::Params;

/// A single pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must equal the path segment exactly.
    Static(String),
    /// Matches any non-empty path segment, capturing it under the name.
    Param(String),
}

/// A parsed route path pattern such as `/api/movies/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
    static_count: usize,
}

impl RoutePattern {
    /// Parses a pattern string.
    ///
    /// Segments wrapped in braces become named parameters; everything else
    /// is matched literally. Leading and trailing slashes are ignored.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let segments: Vec<Segment> = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.strip_prefix('{')
                    .and_then(|s| s.strip_suffix('}'))
                    .map_or_else(
                        || Segment::Static(s.to_string()),
                        |name| Segment::Param(name.to_string()),
                    )
            })
            .collect();

        let static_count = segments
            .iter()
            .filter(|s| matches!(s, Segment::Static(_)))
            .count();

        Self {
            segments,
            static_count,
        }
    }

    /// Returns the number of static segments, used to rank matches.
    #[must_use]
    pub fn static_count(&self) -> usize {
        self.static_count
    }

    /// Attempts to match a request path, returning captured parameters.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let mut params = Params::new();
        let mut segments = self.segments.iter();

        for part in path.split('/').filter(|s| !s.is_empty()) {
            match segments.next()? {
                Segment::Static(expected) => {
                    if expected != part {
                        return None;
                    }
                }
                Segment::Param(name) => params.push(name.clone(), part),
            }
        }

        // The pattern must be fully consumed as well.
        if segments.next().is_some() {
            return None;
        }

        Some(params)
    }
}
