use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use log::{error, info, warn};

use crate::error::PredictError;
use crate::inference::ModelInference;
use crate::models::{ApiResponse, HealthStatus, ModelInfo, PredictionResult};
use crate::page::render_index;

pub type SharedModel = web::Data<Arc<ModelInference>>;

/// Registers every route of the service on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/predict", web::post().to(predict))
        .route("/api/health", web::get().to(health_check))
        .route("/api/model-info", web::get().to(model_info));
}

async fn index(model: SharedModel) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_index(model.features()))
}

async fn health_check(model: SharedModel) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(HealthStatus {
        status: "ok",
        features: model.features().len(),
    }))
}

async fn model_info(model: SharedModel) -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::<ModelInfo>::success(model.get_model_info()))
}

/// Domain failures are answered with 200 and `success: false`.
async fn predict(
    model: SharedModel,
    form: Result<web::Form<HashMap<String, String>>, actix_web::Error>,
) -> impl Responder {
    let form = match form {
        Ok(form) => form.into_inner(),
        Err(e) => return failure(PredictError::Form(e.to_string())),
    };

    let model = model.get_ref().clone();
    match web::block(move || model.predict(&form)).await {
        Ok(Ok(result)) => {
            info!("prediction: aqi={:.2} category={}", result.aqi, result.category);
            HttpResponse::Ok().json(ApiResponse::success(result))
        }
        Ok(Err(e)) => failure(e),
        Err(e) => failure(PredictError::Inference(e.to_string())),
    }
}

fn failure(e: PredictError) -> HttpResponse {
    if e.is_client_error() {
        warn!("prediction rejected: {}", e);
    } else {
        error!("prediction failed: {}", e);
    }
    HttpResponse::Ok().json(ApiResponse::<PredictionResult>::error(&e.to_string()))
}

pub async fn not_found() -> impl Responder {
    HttpResponse::NotFound().json(ApiResponse::<HealthStatus>::error("endpoint not found"))
}
