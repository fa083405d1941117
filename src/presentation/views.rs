//! Typed view models and template rendering.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use time::macros::format_description;

use crate::application::composer::SiteBundle;
use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::{ArticleRecord, ArticleSummary};
use crate::domain::view_data::CommonBundle;

/// Render a template, turning an askama failure into a 500 with the
/// underlying error captured for the response log.
pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(err) => Err(HttpError::from_error(
            "presentation::views::render_template",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Template rendering failed",
            &err,
        )),
    }
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// The HTML not-found page, reported to the response log like any other
/// client error.
pub fn render_not_found_response(chrome: SiteChromeView) -> Response {
    let mut response = render_template_response(
        ErrorTemplate {
            chrome,
            message: "The page you are looking for does not exist.".to_string(),
        },
        StatusCode::NOT_FOUND,
    );
    ErrorReport::message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

// ============================================================================
// View models
// ============================================================================

#[derive(Clone)]
pub struct ArticleLinkView {
    pub id: String,
    pub title: String,
}

impl From<&ArticleSummary> for ArticleLinkView {
    fn from(summary: &ArticleSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            title: summary.title.clone(),
        }
    }
}

/// Site-wide values present on every page.
#[derive(Clone)]
pub struct SiteChromeView {
    pub site_name: String,
    pub featured_article: Option<ArticleLinkView>,
}

impl SiteChromeView {
    pub fn from_bundle(bundle: &SiteBundle) -> Self {
        let site_name = match bundle.config.non_empty("SITE_NAME") {
            Some(name) => name.to_string(),
            None => env!("CARGO_PKG_NAME").to_string(),
        };
        Self {
            site_name,
            featured_article: bundle.featured_article.as_ref().map(ArticleLinkView::from),
        }
    }
}

#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
}

#[derive(Clone)]
pub struct TagBadgeView {
    pub name: String,
    pub article_count: i64,
}

#[derive(Clone)]
pub struct CommentView {
    pub nickname: String,
    pub content: String,
}

#[derive(Clone)]
pub struct ExternalLinkView {
    pub name: String,
    pub href: String,
}

#[derive(Clone)]
pub struct GitProjectView {
    pub name: String,
    pub project_type: String,
}

/// Home-group sidebar assembled from the `common` bundle.
#[derive(Clone)]
pub struct SidebarView {
    pub categories: Vec<CategoryView>,
    pub tags: Vec<TagBadgeView>,
    pub top_articles: Vec<ArticleLinkView>,
    pub recent_comments: Vec<CommentView>,
    pub friendship_links: Vec<ExternalLinkView>,
    pub git_projects: Vec<GitProjectView>,
}

impl SidebarView {
    pub fn from_bundle(bundle: &CommonBundle) -> Self {
        Self {
            categories: bundle
                .categories
                .iter()
                .map(|category| CategoryView {
                    name: category.name.clone(),
                })
                .collect(),
            tags: bundle
                .tags
                .iter()
                .map(|tag| TagBadgeView {
                    name: tag.name.clone(),
                    article_count: tag.article_count,
                })
                .collect(),
            top_articles: bundle.top_articles.iter().map(ArticleLinkView::from).collect(),
            recent_comments: bundle
                .recent_comments
                .iter()
                .map(|comment| CommentView {
                    nickname: comment.nickname.clone(),
                    content: comment.content.clone(),
                })
                .collect(),
            friendship_links: bundle
                .friendship_links
                .iter()
                .map(|link| ExternalLinkView {
                    name: link.name.clone(),
                    href: link.url.clone(),
                })
                .collect(),
            git_projects: bundle
                .git_projects
                .iter()
                .map(|project| GitProjectView {
                    name: project.name.clone(),
                    project_type: project.project_type.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct ArticleCardView {
    pub id: String,
    pub title: String,
    pub published: String,
}

#[derive(Clone)]
pub struct ArticleDetailView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub published: String,
}

fn format_date(value: time::OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day]");
    value.format(&format).unwrap_or_default()
}

impl From<&ArticleRecord> for ArticleCardView {
    fn from(article: &ArticleRecord) -> Self {
        Self {
            id: article.id.to_string(),
            title: article.title.clone(),
            published: format_date(article.created_at),
        }
    }
}

impl From<&ArticleRecord> for ArticleDetailView {
    fn from(article: &ArticleRecord) -> Self {
        Self {
            id: article.id.to_string(),
            title: article.title.clone(),
            body: article.body.clone(),
            published: format_date(article.created_at),
        }
    }
}

// ============================================================================
// Templates
// ============================================================================

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: SiteChromeView,
    pub sidebar: SidebarView,
    pub articles: Vec<ArticleCardView>,
}

#[derive(Template)]
#[template(path = "article.html")]
pub struct ArticleTemplate {
    pub chrome: SiteChromeView,
    pub article: ArticleDetailView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub chrome: SiteChromeView,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::application::oauth::OauthProviders;
    use crate::domain::view_data::ConfigMap;

    fn empty_site_bundle(config: ConfigMap) -> SiteBundle {
        SiteBundle {
            oauth: OauthProviders::from_config(&config),
            config,
            featured_article: None,
        }
    }

    #[test]
    fn site_name_falls_back_to_package_name() {
        let chrome = SiteChromeView::from_bundle(&empty_site_bundle(ConfigMap::default()));
        assert_eq!(chrome.site_name, "brezza");
    }

    #[test]
    fn site_name_comes_from_config_when_present() {
        let config = ConfigMap::new([("SITE_NAME".to_string(), "My Blog".to_string())]);
        let chrome = SiteChromeView::from_bundle(&empty_site_bundle(config));
        assert_eq!(chrome.site_name, "My Blog");
    }

    #[test]
    fn home_template_renders_sidebar_sections() {
        let chrome = SiteChromeView {
            site_name: "Test".to_string(),
            featured_article: Some(ArticleLinkView {
                id: Uuid::nil().to_string(),
                title: "Featured".to_string(),
            }),
        };
        let sidebar = SidebarView {
            categories: vec![CategoryView {
                name: "rust".to_string(),
            }],
            tags: vec![TagBadgeView {
                name: "cache".to_string(),
                article_count: 3,
            }],
            top_articles: Vec::new(),
            recent_comments: Vec::new(),
            friendship_links: vec![ExternalLinkView {
                name: "neighbor".to_string(),
                href: "https://example.com".to_string(),
            }],
            git_projects: Vec::new(),
        };

        let html = HomeTemplate {
            chrome,
            sidebar,
            articles: Vec::new(),
        }
        .render()
        .expect("home template renders");

        assert!(html.contains("rust"));
        assert!(html.contains("cache"));
        assert!(html.contains("Featured"));
        assert!(html.contains("https://example.com"));
    }
}
