use super::respond;
use crate::{
    extractor::Viewer,
    views::{LoginGate, PageContext, View},
};
use askama::Template;
use axum::{
    extract::{OriginalUri, State},
    response::Response,
};
use tracing::instrument;

#[derive(Template)]
#[template(path = "dashboard/index.html")]
struct DashboardTemplate {
    ctx: PageContext,
}

#[instrument(skip(gate))]
pub async fn dashboard(
    viewer: Viewer,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Response {
    respond(View::Dashboard, &viewer, &uri, &gate, |_, ctx| {
        DashboardTemplate { ctx }
    })
}
