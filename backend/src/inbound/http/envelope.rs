//! Success envelope shared by every JSON endpoint.
//!
//! Payload fields are flattened next to `success`, so a venue listing
//! renders as `{"success": true, "areas": [...]}`.

use actix_web::HttpResponse;
use serde::Serialize;

/// `{"success": true, ...payload}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload in a successful envelope.
    #[must_use]
    pub const fn new(payload: T) -> Self {
        Self {
            success: true,
            payload,
        }
    }
}

/// 200 response carrying `payload` in the success envelope.
#[must_use]
pub fn ok<T: Serialize>(payload: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(payload))
}

/// 201 response carrying `payload` in the success envelope.
#[must_use]
pub fn created<T: Serialize>(payload: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::new(payload))
}
