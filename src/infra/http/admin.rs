//! Headless admin JSON surface.
//!
//! Served from the admin listener only; every write goes through the
//! application services so cache invalidation fires.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{post, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::{
    admin::{AdminArticleService, AdminConfigService},
    repos::{CreateArticleParams, UpdateArticleParams},
};

use super::middleware::{log_responses, tag_request};

#[derive(Clone)]
pub struct AdminState {
    pub articles: Arc<AdminArticleService>,
    pub config: Arc<AdminConfigService>,
}

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/config/{name}", put(upsert_config))
        .route("/articles", post(create_article))
        .route("/articles/{id}", put(update_article).delete(delete_article))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(tag_request))
}

#[derive(Debug, Deserialize)]
struct ConfigForm {
    value: String,
}

async fn upsert_config(
    State(state): State<AdminState>,
    Path(name): Path<String>,
    Json(form): Json<ConfigForm>,
) -> Response {
    match state.config.upsert_config_entry(&name, &form.value).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ArticleForm {
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    is_top: bool,
}

async fn create_article(State(state): State<AdminState>, Json(form): Json<ArticleForm>) -> Response {
    let params = CreateArticleParams {
        title: form.title,
        body: form.body,
        is_top: form.is_top,
    };

    match state.articles.create_article(params).await {
        Ok(article) => (StatusCode::CREATED, Json(article)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_article(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ArticleForm>,
) -> Response {
    let params = UpdateArticleParams {
        id,
        title: form.title,
        body: form.body,
        is_top: form.is_top,
    };

    match state.articles.update_article(params).await {
        Ok(article) => (StatusCode::OK, Json(article)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_article(State(state): State<AdminState>, Path(id): Path<Uuid>) -> Response {
    match state.articles.delete_article(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
