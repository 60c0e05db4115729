//! Custom request extractors.

mod session_token;
mod validated_json;

pub use session_token::{token_from_headers, PresentedToken};
pub use validated_json::ValidatedJson;
