//! Air quality index prediction service.
//!
//! A pre-trained regression model and its ordered feature list are loaded once
//! at startup into a [`inference::ModelInference`], which the actix handlers
//! share read-only. `GET /` renders one input per feature and `POST /predict`
//! turns a form submission into a clamped, categorized AQI.

pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod models;
pub mod page;
