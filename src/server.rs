use crate::{handler, postcard::PostcardTemplate, views::LoginGate, QuadraticLandsConfig};
use anyhow::Context;
use async_session::MemoryStore;
use axum::{
    extract::FromRef,
    http::Request,
    response::Response,
    routing::get,
    Router,
};
use axum_extra::routing::SpaRouter;
use std::{net::SocketAddr, path::Path, sync::Arc, time::Duration};
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::Span;

pub async fn start_server(config: QuadraticLandsConfig) -> anyhow::Result<()> {
    let postcard = PostcardTemplate::load(&config.postcard_template)
        .context("failed loading the postcard template")?;

    // Sessions are written by the identity provider integration sharing this store.
    let app_state = AppState::new(
        MemoryStore::new(),
        LoginGate::new(config.login_url.clone()),
        postcard,
    );
    let app = app(app_state, &config.static_dir);

    let addr: SocketAddr = config
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_addr))?;
    tracing::info!("listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

/// Route table for the whole site.
pub fn app(app_state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/quadraticlands", get(handler::index))
        .route("/quadraticlands/", get(handler::index))
        .route("/quadraticlands/test", get(handler::test))
        .route("/quadraticlands/dashboard", get(handler::dashboard))
        .route("/quadraticlands/:base", get(handler::base))
        .route("/quadraticlands/mission", get(handler::mission_index))
        .route("/quadraticlands/mission/postcard", get(handler::postcard))
        .route("/quadraticlands/mission/postcard/svg", get(handler::postcard_svg))
        .route("/quadraticlands/mission/:mission_name", get(handler::mission))
        .route(
            "/quadraticlands/mission/:mission_name/:mission_state",
            get(handler::mission_state),
        )
        .route(
            "/quadraticlands/mission/:mission_name/question/:question_num",
            get(handler::question),
        )
        .route(
            "/quadraticlands/mission/:mission_name/question/:question_num/:answer",
            get(handler::answer),
        )
        .with_state(app_state)
        .merge(SpaRouter::new("/static", static_dir))
        .layer(
            TraceLayer::new_for_http()
                .on_request(|request: &Request<_>, _span: &Span| {
                    tracing::info!("{} {}", request.method(), request.uri());
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    tracing::info!("{} in {:?}", response.status(), latency);
                })
                .on_failure(
                    |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        tracing::error!("{} after {:?}", error, latency);
                    },
                ),
        )
}

#[derive(Clone)]
pub struct AppState {
    store: MemoryStore,
    gate: LoginGate,
    postcard: Arc<PostcardTemplate>,
}

impl AppState {
    pub fn new(store: MemoryStore, gate: LoginGate, postcard: PostcardTemplate) -> Self {
        Self {
            store,
            gate,
            postcard: Arc::new(postcard),
        }
    }
}

impl FromRef<AppState> for MemoryStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for LoginGate {
    fn from_ref(state: &AppState) -> Self {
        state.gate.clone()
    }
}

impl FromRef<AppState> for Arc<PostcardTemplate> {
    fn from_ref(state: &AppState) -> Self {
        state.postcard.clone()
    }
}
