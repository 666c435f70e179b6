use actix_web::{HttpResponse, web};

/// Message returned by `GET /api/ping`, taken from `app.ping_message`.
pub struct PingMessage(pub String);

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct PingResponse {
    pub message: String,
}

pub async fn ping(message: web::Data<PingMessage>) -> HttpResponse {
    HttpResponse::Ok().json(PingResponse {
        message: message.0.clone(),
    })
}
