use axum::{Json, extract::State};
use roastcam_gateway::GenerationRequest;
use serde::Serialize;

use crate::error::{RouteError, RouteFailure};
use crate::state::AppState;
use crate::upload::{PhotoUpload, UploadedImage};

/// Instruction sent upstream with every photo
///
/// The word cap is left to the model and not enforced here.
pub const ROAST_PROMPT: &str =
    "Roast this person's photo in a short, funny, savage way (<= 12 words). Playful, not hateful.";

/// `{ "roast": "..." }`
#[derive(Debug, Serialize)]
pub struct RoastResponse {
    pub roast: String,
}

/// `POST /roast`: generate a roast for the uploaded photo
///
/// The upload is released before responding, whatever the outcome.
pub async fn roast(
    State(state): State<AppState>,
    PhotoUpload(image): PhotoUpload,
) -> Result<Json<RoastResponse>, RouteFailure> {
    let result = generate(&state, &image).await;
    image.release();

    let roast = result.map_err(|e| {
        tracing::error!(error = %e, "roast failed");
        e
    })?;

    Ok(Json(RoastResponse { roast }))
}

async fn generate(state: &AppState, image: &UploadedImage) -> Result<String, RouteError> {
    let bytes = image.read().await?;
    tracing::debug!(bytes = bytes.len(), mime_type = image.mime_type(), "roasting photo");

    let request = GenerationRequest::from_image(ROAST_PROMPT, &bytes, image.mime_type());
    Ok(state.upstream().generate_roast(&request).await?)
}
