//! Path placeholder rendering
//!
//! Child endpoints embed the parent identifier in their path, e.g.
//! `/conversations/{conversation_id}`. Placeholders are filled from the
//! sync context.

use crate::error::{Error, Result};
use crate::partition::SyncContext;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// Everything except RFC 3986 unreserved characters
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Render a path template for `stream` with values from `context`
///
/// Each value is percent-encoded as a single path segment. A placeholder with
/// no value in the context is a `MissingContext` error; a value that would
/// collapse into a dot or empty segment is an `InvalidContext` error.
pub fn render_path(template: &str, stream: &str, context: &SyncContext) -> Result<String> {
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for cap in PLACEHOLDER_REGEX.captures_iter(template) {
        let (Some(full), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = context
            .get_string(name.as_str())
            .ok_or_else(|| Error::missing_context(stream, name.as_str()))?;
        if matches!(value.as_str(), "" | "." | "..") {
            return Err(Error::InvalidContext {
                stream: stream.to_string(),
                key: name.as_str().to_string(),
                value,
            });
        }
        result.push_str(&template[last..full.start()]);
        result.extend(utf8_percent_encode(&value, SEGMENT));
        last = full.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_simple_substitution() {
        let ctx = SyncContext::new().with_value("conversation_id", "123");
        let result = render_path("/conversations/{conversation_id}", "conversation_parts", &ctx).unwrap();
        assert_eq!(result, "/conversations/123");
    }

    #[test]
    fn test_number_substitution() {
        let ctx = SyncContext::new().with_value("article_id", 42);
        let result = render_path("/articles/{article_id}", "articles_extended", &ctx).unwrap();
        assert_eq!(result, "/articles/42");
    }

    #[test]
    fn test_multiple_substitutions() {
        let ctx = SyncContext::new()
            .with_value("team_id", "t1")
            .with_value("admin_id", "a9");
        let result = render_path("/teams/{team_id}/admins/{admin_id}", "x", &ctx).unwrap();
        assert_eq!(result, "/teams/t1/admins/a9");
    }

    #[test]
    fn test_missing_value() {
        let err = render_path("/conversations/{conversation_id}", "conversation_parts", &SyncContext::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingContext { ref stream, ref key }
                if stream == "conversation_parts" && key == "conversation_id"
        ));
    }

    #[test]
    fn test_no_placeholders() {
        let result = render_path("/admins", "admins", &SyncContext::new()).unwrap();
        assert_eq!(result, "/admins");
    }

    #[test]
    fn test_value_is_a_single_segment() {
        let ctx = SyncContext::new().with_value("conversation_id", "a/../../admins?x=1");
        let result = render_path("/conversations/{conversation_id}", "conversation_parts", &ctx).unwrap();
        assert_eq!(result, "/conversations/a%2F..%2F..%2Fadmins%3Fx%3D1");
    }

    #[test]
    fn test_value_reserved_characters_encoded() {
        let ctx = SyncContext::new().with_value("article_id", "50 50#frag&x");
        let result = render_path("/articles/{article_id}", "articles_extended", &ctx).unwrap();
        assert_eq!(result, "/articles/50%2050%23frag%26x");

        let ctx = SyncContext::new().with_value("article_id", "v1.2-rc_3~x");
        let result = render_path("/articles/{article_id}", "articles_extended", &ctx).unwrap();
        assert_eq!(result, "/articles/v1.2-rc_3~x");
    }

    #[test_case::test_case("" ; "empty")]
    #[test_case::test_case("." ; "dot")]
    #[test_case::test_case(".." ; "dot dot")]
    fn test_value_dot_or_empty_segment_rejected(value: &str) {
        let ctx = SyncContext::new().with_value("conversation_id", value);
        let err = render_path("/conversations/{conversation_id}", "conversation_parts", &ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidContext { ref key, .. } if key == "conversation_id"
        ));
    }
}
