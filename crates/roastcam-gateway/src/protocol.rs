//! Gemini `generateContent` request wire format
//!
//! Only the request is typed. Responses are read as untyped JSON because
//! their shape varies across model versions; see [`crate::extract`].

use serde::Serialize;

use crate::types::GenerationRequest;

/// `generateContent` request body
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

/// One turn of content
#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

/// A single part within a content turn
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Part<'a> {
    Text(&'a str),
    InlineData(InlineData<'a>),
}

/// Inline binary data, base64 encoded
#[derive(Debug, Serialize)]
pub struct InlineData<'a> {
    pub mime_type: &'a str,
    pub data: &'a str,
}

impl<'a> From<&'a GenerationRequest> for GenerateContentRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text(request.prompt()),
                    Part::InlineData(InlineData {
                        mime_type: request.mime_type(),
                        data: request.image_base64(),
                    }),
                ],
            }],
        }
    }
}
