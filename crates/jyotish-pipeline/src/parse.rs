//! Lenient JSON extraction from collaborator output.
//!
//! Reasoners wrap JSON in prose, code fences, or stray tokens. The
//! extraction takes the outermost `{...}` span and deserializes that;
//! anything else is a parse failure the calling stage handles with its
//! own retry/skip policy.

use serde::de::DeserializeOwned;

use jyotish_core::errors::GenerationError;

/// The outermost brace-delimited span, if any.
pub fn json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Extract and deserialize one JSON document from free-form output.
pub fn from_response<T: DeserializeOwned>(
    stage: &'static str,
    text: &str,
) -> Result<T, GenerationError> {
    let block = json_block(text).ok_or_else(|| GenerationError::ParseFailed {
        stage: stage.to_string(),
        reason: "no JSON object in response".to_string(),
    })?;
    serde_json::from_str(block).map_err(|e| GenerationError::ParseFailed {
        stage: stage.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Doc {
        domains: Vec<String>,
    }

    #[test]
    fn extracts_fenced_json() {
        let text = "Sure! Here you go:\n```json\n{\"domains\": [\"career\"]}\n```\nHope that helps.";
        let doc: Doc = from_response("router", text).unwrap();
        assert_eq!(doc.domains, vec!["career"]);
    }

    #[test]
    fn plain_prose_fails_cleanly() {
        let err = from_response::<Doc>("router", "career looks strong this year").unwrap_err();
        assert!(matches!(err, GenerationError::ParseFailed { .. }));
    }

    #[test]
    fn malformed_json_fails_cleanly() {
        let err = from_response::<Doc>("router", "{\"domains\": [career]}").unwrap_err();
        assert!(matches!(err, GenerationError::ParseFailed { .. }));
    }
}
