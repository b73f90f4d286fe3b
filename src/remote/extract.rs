//! Pulling the metrics object out of a free-text reply.
//!
//! Models often wrap the JSON in prose or a code fence. The object is taken
//! from the first `{` through its balancing `}`, skipping braces that occur
//! inside JSON string literals.

use super::error::RemoteError;
use crate::normalizer::RawMetrics;

/// Locate the first balanced JSON object span in `reply`.
pub fn extract_json_object(reply: &str) -> Result<&str, RemoteError> {
    let start = reply
        .find('{')
        .ok_or_else(|| RemoteError::Extraction("reply contains no '{'".into()))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in reply[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&reply[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(RemoteError::Extraction(
        "object starting at first '{' is never closed".into(),
    ))
}

/// Extract and decode the metrics object from a reply.
pub fn parse_reply(reply: &str) -> Result<RawMetrics, RemoteError> {
    let json = extract_json_object(reply)?;
    Ok(RawMetrics::from_json(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::error::RemoteErrorKind;
    use indoc::indoc;

    #[test]
    fn test_bare_object() {
        assert_eq!(extract_json_object(r#"{"a":1}"#).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_object_wrapped_in_prose_and_fence() {
        let reply = indoc! {r#"
            Sure! Here is the analysis:

            ```json
            {"overallScore": 35, "issues": [{"line": 2}]}
            ```

            Let me know if you need more {details}.
        "#};
        assert_eq!(
            extract_json_object(reply).unwrap(),
            r#"{"overallScore": 35, "issues": [{"line": 2}]}"#
        );
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let reply = r#"{"recommendations": ["wrap in { braces }", "quote \" and }"]} trailing }"#;
        assert_eq!(
            extract_json_object(reply).unwrap(),
            r#"{"recommendations": ["wrap in { braces }", "quote \" and }"]}"#
        );
    }

    #[test]
    fn test_multibyte_text_before_object() {
        let reply = "Análisis → {\"overallScore\": 1}";
        assert_eq!(extract_json_object(reply).unwrap(), "{\"overallScore\": 1}");
    }

    #[test]
    fn test_no_object_is_extraction_error() {
        let err = extract_json_object("I could not analyze this code.").unwrap_err();
        assert_eq!(err.kind(), RemoteErrorKind::Extraction);
    }

    #[test]
    fn test_unclosed_object_is_extraction_error() {
        let err = extract_json_object(r#"{"overallScore": 4"#).unwrap_err();
        assert_eq!(err.kind(), RemoteErrorKind::Extraction);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_reply("Result: {overallScore: 40}").unwrap_err();
        assert_eq!(err.kind(), RemoteErrorKind::Parse);
    }

    #[test]
    fn test_parse_reply_decodes_metrics() {
        let raw = parse_reply(r#"Here: {"overallScore": 40, "linesOfCode": 12}"#).unwrap();
        assert_eq!(raw.overall_score, Some(40.0));
        assert_eq!(raw.lines_of_code, Some(12.0));
    }
}
