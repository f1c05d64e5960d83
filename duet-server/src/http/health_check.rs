use crate::SignalingService;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub message: &'static str,
    pub connections: usize,
    pub waiting: usize,
    pub rooms: usize,
}

pub async fn health(State(service): State<SignalingService>) -> Json<HealthReport> {
    let snapshot = service.snapshot().await.unwrap_or_default();

    Json(HealthReport {
        message: "Server is healthy",
        connections: service.registry().len(),
        waiting: snapshot.waiting,
        rooms: snapshot.rooms,
    })
}
