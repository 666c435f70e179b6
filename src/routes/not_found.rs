use actix_web::{HttpRequest, HttpResponse};

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct NotFoundResponse {
    pub error: String,
}

/// Fallback for every unmatched route.
///
/// API and health paths get a JSON body so clients can tell a missing endpoint apart from a
/// network failure. Anything else is a bare 404.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    let path = req.path();
    if path.starts_with("/api/") || path.starts_with("/health") {
        HttpResponse::NotFound().json(NotFoundResponse {
            error: "API endpoint not found".into(),
        })
    } else {
        HttpResponse::NotFound().finish()
    }
}
