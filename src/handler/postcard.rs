use super::respond;
use crate::{
    extractor::Viewer,
    postcard::{compose, PostcardTemplate, Selections},
    views::{LoginGate, PageContext, SlotChoices, View, POSTCARD_SLOTS},
};
use askama::Template;
use axum::{
    extract::{OriginalUri, Query, State},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::instrument;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

#[derive(Template)]
#[template(path = "mission/postcard.html")]
struct PostcardPage {
    ctx: PageContext,
    slots: &'static [SlotChoices],
}

#[instrument(skip(gate))]
pub async fn postcard(
    viewer: Viewer,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Response {
    respond(View::Postcard, &viewer, &uri, &gate, |_, ctx| PostcardPage {
        ctx,
        slots: POSTCARD_SLOTS,
    })
}

#[instrument(skip(template))]
pub async fn postcard_svg(
    State(template): State<Arc<PostcardTemplate>>,
    Query(selections): Query<Selections>,
) -> impl IntoResponse {
    let document = compose(&template, &selections);

    ([(CONTENT_TYPE, SVG_CONTENT_TYPE)], document.into_string())
}
