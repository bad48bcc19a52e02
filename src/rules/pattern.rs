//! Glob-style path patterns.
//!
//! Patterns are compiled into a list of segment matchers once per site config
//! and then compared segment by segment against request paths:
//!
//! | Segment   | Matches                                             |
//! |-----------|-----------------------------------------------------|
//! | `foo`     | exactly `foo` (case-sensitive)                      |
//! | `*`       | any single segment, including an empty one          |
//! | `*.json`  | a single segment matching the wildcard              |
//! | `**`      | zero or more segments                               |
//!
//! Both patterns and paths are anchored at the root; a missing leading `/` on
//! a pattern is implied.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`
    Any,
    /// Literal text mixed with `*`, e.g. `*.json`
    Glob(String),
    /// `**`
    Rest,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw {
            "**" => Segment::Rest,
            "*" => Segment::Any,
            s if s.contains('*') => Segment::Glob(s.to_string()),
            s => Segment::Literal(s.to_string()),
        }
    }

    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::Literal(lit) => lit == part,
            Segment::Any => true,
            Segment::Glob(glob) => wildcard_match(glob, part),
            Segment::Rest => true,
        }
    }
}

/// A compiled glob path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern such as `/blog/**` or `/*/index.json`
    pub fn new(pattern: &str) -> Self {
        let segments = split_segments(pattern).map(Segment::parse).collect();
        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as written in the configuration
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `path` matches this pattern
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = split_segments(path).collect();
        match_segments(&self.segments, &parts)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn split_segments(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

/// Segment-level counterpart of [`wildcard_match`], with `**` as the star
///
/// Only the most recent `**` is retried, which keeps matching linear in the
/// pattern length for each path segment.
fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < path.len() {
        match pattern.get(pi) {
            Some(Segment::Rest) => {
                backtrack = Some((pi, ti));
                pi += 1;
            }
            Some(seg) if seg.matches(path[ti]) => {
                pi += 1;
                ti += 1;
            }
            _ => match backtrack {
                Some((rest, mark)) => {
                    pi = rest + 1;
                    ti = mark + 1;
                    backtrack = Some((rest, mark + 1));
                }
                None => return false,
            },
        }
    }
    pattern[pi..].iter().all(|seg| *seg == Segment::Rest)
}

/// Match `text` against `glob`, where `*` matches any run of characters
fn wildcard_match(glob: &str, text: &str) -> bool {
    let p: Vec<char> = glob.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && p[pi] == '*' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if pi < p.len() && p[pi] == t[ti] {
            pi += 1;
            ti += 1;
        } else if let Some((star, mark)) = backtrack {
            pi = star + 1;
            ti = mark + 1;
            backtrack = Some((star, mark + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_star_matches_everything() {
        let p = PathPattern::new("/**");
        assert!(p.matches("/"));
        assert!(p.matches("/somepath/workbook"));
        assert!(p.matches("/a/b/c/d.json"));
    }

    #[test]
    fn test_single_star_is_one_segment() {
        let p = PathPattern::new("/*");
        assert!(p.matches("/foo"));
        assert!(p.matches("/"));
        assert!(!p.matches("/foo/bar"));
    }

    #[test]
    fn test_trailing_double_star_matches_zero_segments() {
        let p = PathPattern::new("/blog/**");
        assert!(p.matches("/blog"));
        assert!(p.matches("/blog/"));
        assert!(p.matches("/blog/2024/post"));
        assert!(!p.matches("/blogs/post"));
    }

    #[test]
    fn test_inner_double_star() {
        let p = PathPattern::new("/docs/**/index.json");
        assert!(p.matches("/docs/index.json"));
        assert!(p.matches("/docs/a/b/index.json"));
        assert!(!p.matches("/docs/a/b/other.json"));
    }

    #[test]
    fn test_literal_is_anchored_and_case_sensitive() {
        let p = PathPattern::new("/somepath/workbook");
        assert!(p.matches("/somepath/workbook"));
        assert!(!p.matches("/Somepath/workbook"));
        assert!(!p.matches("/x/somepath/workbook"));
        assert!(!p.matches("/somepath/workbook/more"));
    }

    #[test]
    fn test_segment_glob() {
        let p = PathPattern::new("/data/*.json");
        assert!(p.matches("/data/query-index.json"));
        assert!(p.matches("/data/.json"));
        assert!(!p.matches("/data/query-index.html"));
        assert!(!p.matches("/data/a/b.json"));
    }

    #[test]
    fn test_missing_leading_slash_is_implied() {
        assert!(PathPattern::new("fonts/*").matches("/fonts/a.woff2"));
    }

    #[test]
    fn test_repeated_double_star_on_long_path() {
        let p = PathPattern::new("/**/**/**/**/z");
        let deep = "/a".repeat(5000);
        assert!(!p.matches(&deep));
        assert!(p.matches(&format!("{}/z", deep)));
        assert!(p.matches("/z"));
    }

    #[test]
    fn test_double_star_between_literals() {
        let p = PathPattern::new("/a/**/b/**/c");
        assert!(p.matches("/a/b/c"));
        assert!(p.matches("/a/x/b/y/b/z/c"));
        assert!(!p.matches("/a/x/c/b"));
        assert!(!p.matches("/a/b/c/d"));
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("a*c", "abbbc"));
        assert!(wildcard_match("*b*", "abc"));
        assert!(wildcard_match("a**", "a"));
        assert!(!wildcard_match("a*c", "abcd"));
        assert!(!wildcard_match("abc", "ab"));
    }
}
