//! Wire types for the text-generation API.

use serde::Deserialize;

/// One element of the provider's usual response shape:
/// a list of objects carrying a `generated_text` field.
#[derive(Debug, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// Normalize a provider response body into the reply string.
///
/// The provider usually answers with `[{"generated_text": "..."}]`, but some
/// models return other JSON shapes; those are rendered to their compact string
/// form so the caller always gets *something* to show the user.
pub fn normalize_response(body: &serde_json::Value) -> String {
    if let Some(first) = body.as_array().and_then(|items| items.first()) {
        if let Ok(item) = serde_json::from_value::<GeneratedText>(first.clone()) {
            return item.generated_text;
        }
    }
    body.to_string()
}
