//! Ordered text extraction from loosely shaped upstream responses
//!
//! Each extractor is a partial lookup over the JSON tree. A missing key, a
//! wrong type or an empty index at any depth yields `None`, which hands over
//! to the next extractor. The first non-empty trimmed string wins.

use serde_json::Value;

/// Returned when no extractor finds usable text
pub const NO_ROAST_PLACEHOLDER: &str = "Couldn't roast you 🤷";

type Extractor = fn(&Value) -> Option<&str>;

/// Extractors in precedence order
const EXTRACTORS: &[(&str, Extractor)] = &[
    ("candidate_parts", candidate_parts),
    ("candidate_text", candidate_text),
    ("output_content", output_content),
];

/// Pull the generated text out of an upstream response
pub fn extract_text(response: &Value) -> String {
    EXTRACTORS
        .iter()
        .find_map(|(rule, extract)| {
            let text = extract(response)?.trim();
            if text.is_empty() {
                return None;
            }
            tracing::debug!(rule, "extracted text from upstream response");
            Some(text.to_owned())
        })
        .unwrap_or_else(|| {
            tracing::debug!("no text found in upstream response, using placeholder");
            NO_ROAST_PLACEHOLDER.to_owned()
        })
}

fn first_candidate_content(response: &Value) -> Option<&Value> {
    response.get("candidates")?.get(0)?.get("content")
}

/// `candidates[0].content.parts[*].text`, first non-empty
fn candidate_parts(response: &Value) -> Option<&str> {
    first_candidate_content(response)?
        .get("parts")?
        .as_array()?
        .iter()
        .find_map(|part| part.get("text")?.as_str().filter(|text| !text.is_empty()))
}

/// `candidates[0].content.text`
fn candidate_text(response: &Value) -> Option<&str> {
    first_candidate_content(response)?.get("text")?.as_str()
}

/// `output[0].content[0].text`
fn output_content(response: &Value) -> Option<&str> {
    response.get("output")?.get(0)?.get("content")?.get(0)?.get("text")?.as_str()
}
