use std::{process, sync::Arc};

use brezza::{
    application::{
        admin::{AdminArticleService, AdminConfigService},
        comments::CommentService,
        composer::ViewDataComposer,
        error::AppError,
        repos::{
            ArticlesRepo, ArticlesWriteRepo, CategoriesRepo, CommentsRepo, CommentsWriteRepo,
            ConfigRepo, LinksRepo, TagsRepo,
        },
    },
    cache::{CacheConfig, CacheConsumer, CacheStore, CacheTrigger, EventQueue},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, AdminState, HttpState},
        telemetry,
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    run_serve(settings).await
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let app = build_application_context(repositories, &settings);

    // Queue a warmup so the first render hits a populated cache.
    if let Some(trigger) = &app.cache_trigger {
        trigger.warmup_on_startup().await;
    }

    // Spawn the auto-consume timer for events deferred by write paths.
    let cache_handle = app.cache_trigger.clone().map(|trigger| {
        let interval_ms = trigger.config().auto_consume_interval_ms;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_millis(interval_ms));
            interval.tick().await; // Skip the first immediate tick
            loop {
                interval.tick().await;
                trigger.consumer().consume().await;
            }
        })
    });

    let result = serve_http(&settings, app.http_state, app.admin_state).await;

    if let Some(handle) = cache_handle {
        handle.abort();
        let _ = handle.await;
    }

    result
}

struct ApplicationContext {
    http_state: HttpState,
    admin_state: AdminState,
    cache_trigger: Option<Arc<CacheTrigger>>,
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let repositories =
        PostgresRepositories::connect(database_url, settings.database.max_connections.get())
            .await
            .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    repositories
        .run_migrations()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(repositories))
}

fn build_application_context(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> ApplicationContext {
    let categories_repo: Arc<dyn CategoriesRepo> = repositories.clone();
    let tags_repo: Arc<dyn TagsRepo> = repositories.clone();
    let articles_repo: Arc<dyn ArticlesRepo> = repositories.clone();
    let articles_write_repo: Arc<dyn ArticlesWriteRepo> = repositories.clone();
    let comments_repo: Arc<dyn CommentsRepo> = repositories.clone();
    let comments_write_repo: Arc<dyn CommentsWriteRepo> = repositories.clone();
    let links_repo: Arc<dyn LinksRepo> = repositories.clone();
    let config_repo: Arc<dyn ConfigRepo> = repositories.clone();

    let cache_config = CacheConfig::from(&settings.cache);
    let cache_store = cache_config
        .enabled
        .then(|| Arc::new(CacheStore::new(&cache_config)));

    let composer = Arc::new(
        ViewDataComposer::new(
            categories_repo,
            tags_repo,
            articles_repo.clone(),
            comments_repo,
            links_repo,
            config_repo.clone(),
            settings.compose.recent_comments_limit.get(),
        )
        .with_cache_opt(cache_store.clone()),
    );

    let cache_trigger = cache_store.map(|store| {
        let queue = Arc::new(EventQueue::new());
        let consumer = Arc::new(
            CacheConsumer::new(cache_config.clone(), store, queue.clone())
                .with_warmer(composer.clone()),
        );
        Arc::new(CacheTrigger::new(cache_config.clone(), queue, consumer))
    });

    let comment_service = Arc::new(
        CommentService::new(comments_write_repo).with_cache_trigger_opt(cache_trigger.clone()),
    );
    let admin_article_service = Arc::new(
        AdminArticleService::new(articles_write_repo)
            .with_cache_trigger_opt(cache_trigger.clone()),
    );
    let admin_config_service = Arc::new(
        AdminConfigService::new(config_repo).with_cache_trigger_opt(cache_trigger.clone()),
    );

    let http_state = HttpState {
        composer,
        articles: articles_repo,
        comments: comment_service,
        db: Some(repositories),
        home_article_limit: settings.compose.home_article_limit.get(),
    };

    let admin_state = AdminState {
        articles: admin_article_service,
        config: admin_config_service,
    };

    ApplicationContext {
        http_state,
        admin_state,
        cache_trigger,
    }
}

async fn serve_http(
    settings: &config::Settings,
    http_state: HttpState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_router(http_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        public_addr = %settings.server.public_addr,
        admin_addr = %settings.server.admin_addr,
        "listening"
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
