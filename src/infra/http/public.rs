use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    application::{
        comments::CommentService,
        composer::ViewDataComposer,
        error::HttpError,
        repos::{ArticlesRepo, CreateCommentParams},
    },
    infra::db::PostgresRepositories,
    presentation::views::{
        ArticleCardView, ArticleDetailView, ArticleTemplate, HomeTemplate, SidebarView,
        SiteChromeView, render_not_found_response, render_template_response,
    },
};

use super::middleware::{log_responses, tag_request};

#[derive(Clone)]
pub struct HttpState {
    pub composer: Arc<ViewDataComposer>,
    pub articles: Arc<dyn ArticlesRepo>,
    pub comments: Arc<CommentService>,
    pub db: Option<Arc<PostgresRepositories>>,
    pub home_article_limit: u32,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/articles/{id}", get(article_detail))
        .route("/articles/{id}/comments", post(create_comment))
        .route("/_health/db", get(db_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(tag_request))
}

/// Home-group page: the common bundle plus the site-wide bundle.
async fn home(State(state): State<HttpState>) -> Response {
    let site = match state.composer.site_bundle().await {
        Ok(bundle) => bundle,
        Err(err) => return err.into_response(),
    };
    let common = match state.composer.home_bundle().await {
        Ok(bundle) => bundle,
        Err(err) => return err.into_response(),
    };

    let articles = match state
        .articles
        .list_recent_articles(state.home_article_limit)
        .await
    {
        Ok(articles) => articles,
        Err(err) => {
            return HttpError::new(
                "infra::http::public::home",
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load articles",
                err.to_string(),
            )
            .into_response();
        }
    };

    render_template_response(
        HomeTemplate {
            chrome: SiteChromeView::from_bundle(&site),
            sidebar: SidebarView::from_bundle(&common),
            articles: articles.iter().map(ArticleCardView::from).collect(),
        },
        StatusCode::OK,
    )
}

/// Any other page gets only the site-wide bundle.
async fn article_detail(State(state): State<HttpState>, Path(id): Path<Uuid>) -> Response {
    let site = match state.composer.site_bundle().await {
        Ok(bundle) => bundle,
        Err(err) => return err.into_response(),
    };
    let chrome = SiteChromeView::from_bundle(&site);

    match state.articles.find_article(id).await {
        Ok(Some(article)) => render_template_response(
            ArticleTemplate {
                chrome,
                article: ArticleDetailView::from(&article),
            },
            StatusCode::OK,
        ),
        Ok(None) => render_not_found_response(chrome),
        Err(err) => HttpError::new(
            "infra::http::public::article_detail",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load article",
            err.to_string(),
        )
        .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct CommentForm {
    #[serde(default)]
    nickname: String,
    content: String,
}

async fn create_comment(
    State(state): State<HttpState>,
    Path(id): Path<Uuid>,
    Json(form): Json<CommentForm>,
) -> Response {
    let params = CreateCommentParams {
        article_id: id,
        nickname: form.nickname,
        content: form.content,
    };

    match state.comments.create_comment(params).await {
        Ok(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn db_health(State(state): State<HttpState>) -> Response {
    match &state.db {
        Some(db) => match db.health_check().await {
            Ok(()) => (
                StatusCode::OK,
                Json(serde_json::json!({ "database": "ok" })),
            )
                .into_response(),
            Err(err) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "database": err.to_string() })),
            )
                .into_response(),
        },
        None => (
            StatusCode::OK,
            Json(serde_json::json!({ "database": "unconfigured" })),
        )
            .into_response(),
    }
}
