use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Prompt plus one inline image, ready to send upstream
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    prompt: String,
    image_base64: String,
    mime_type: String,
}

impl GenerationRequest {
    /// Encode raw image bytes as standard padded base64
    pub fn from_image(prompt: impl Into<String>, image: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image_base64: STANDARD.encode(image),
            mime_type: mime_type.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image_base64(&self) -> &str {
        &self.image_base64
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
