use super::{respond, NotFound};
use crate::{
    extractor::Viewer,
    views::{BasePage, LoginGate, PageContext, View},
};
use askama::Template;
use axum::{
    extract::{OriginalUri, Path, State},
    response::Response,
};
use tracing::instrument;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    ctx: PageContext,
}

#[derive(Template)]
#[template(path = "base.html")]
struct BaseTemplate {
    ctx: PageContext,
    page: &'static str,
}

#[derive(Template)]
#[template(path = "test.html")]
struct TestTemplate {
    ctx: PageContext,
}

#[instrument(skip(gate))]
pub async fn index(
    viewer: Viewer,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Response {
    respond(View::Index, &viewer, &uri, &gate, |_, ctx| IndexTemplate {
        ctx,
    })
}

#[instrument(skip(gate))]
pub async fn base(
    viewer: Viewer,
    Path(base): Path<String>,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Result<Response, NotFound> {
    let page = BasePage::parse(&base).ok_or(NotFound)?;

    Ok(respond(View::Base(page), &viewer, &uri, &gate, |_, ctx| {
        BaseTemplate {
            ctx,
            page: page.name(),
        }
    }))
}

#[instrument(skip(gate))]
pub async fn test(
    viewer: Viewer,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Response {
    respond(View::Test, &viewer, &uri, &gate, |_, ctx| TestTemplate { ctx })
}
