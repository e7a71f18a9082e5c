use crate::{ARRAY_ACCESSOR, KEY_ACCESSOR};

/// One step of a parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(i64),
    Wildcard,
    Filter(String),
}

/// Split a path string into segments, left to right.
///
/// Array accessors (`[0]`, `[*]`, `[?expr]`) and dotted keys interleave
/// freely; an unrecognized leading character stops parsing rather than
/// panicking, so a malformed trailing fragment is silently dropped, same
/// as the original.
pub fn parse_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut remaining = path;

    while !remaining.is_empty() {
        if let Some(caps) = ARRAY_ACCESSOR.captures(remaining) {
            let accessor = caps.get(1).unwrap().as_str();
            segments.push(if accessor == "*" {
                Segment::Wildcard
            } else if let Some(expr) = accessor.strip_prefix('?') {
                Segment::Filter(expr.to_string())
            } else {
                Segment::Index(accessor.parse().unwrap_or(0))
            });
            let matched = caps.get(0).unwrap().end();
            remaining = &remaining[matched..];
            continue;
        }

        if let Some(caps) = KEY_ACCESSOR.captures(remaining) {
            let key = caps.get(1).unwrap().as_str();
            segments.push(Segment::Key(key.to_string()));
            let matched = caps.get(0).unwrap().end();
            remaining = &remaining[matched..];
            continue;
        }

        if let Some(rest) = remaining.strip_prefix('.') {
            remaining = rest;
            continue;
        }

        break;
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_and_index() {
        assert_eq!(
            parse_path("hosts[0].ip"),
            vec![
                Segment::Key("hosts".into()),
                Segment::Index(0),
                Segment::Key("ip".into()),
            ]
        );
    }

    #[test]
    fn parses_wildcard() {
        assert_eq!(
            parse_path("hosts[*].ip"),
            vec![
                Segment::Key("hosts".into()),
                Segment::Wildcard,
                Segment::Key("ip".into()),
            ]
        );
    }

    #[test]
    fn parses_filter_expression() {
        assert_eq!(
            parse_path("hosts[?state==up]"),
            vec![
                Segment::Key("hosts".into()),
                Segment::Filter("state==up".into()),
            ]
        );
    }

    #[test]
    fn parses_negative_index() {
        assert_eq!(
            parse_path("hosts[-1]"),
            vec![Segment::Key("hosts".into()), Segment::Index(-1)]
        );
    }
}
