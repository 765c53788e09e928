use crate::{
    extractor::Viewer,
    views::{dispatch, LoginGate, Outcome, PageContext, Slug, View},
};
use askama::Template;
use axum::{
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};

pub mod dashboard;
pub mod home;
pub mod mission;
pub mod postcard;

pub use dashboard::dashboard;
pub use home::{base, index, test};
pub use mission::{answer, mission, mission_index, mission_state, question};
pub use postcard::{postcard, postcard_svg};

pub(crate) struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template. Error: {}", err),
            )
                .into_response(),
        }
    }
}

/// Unknown page or malformed path segment.
#[derive(Debug)]
pub struct NotFound;

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

pub(crate) fn slug(segment: &str) -> Result<Slug, NotFound> {
    Slug::parse(segment).ok_or(NotFound)
}

/// Sends an anonymous visitor to `target`, preserving nothing but the URL.
///
/// Uses 307 rather than the 302 a Django `redirect` would send; both are
/// temporary and browsers follow either with a GET for these pages.
pub struct AuthRedirect(pub String);

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::temporary(&self.0).into_response()
    }
}

/// Runs `view` through the access rules and renders it with the template
/// built by `page`, or redirects.
pub(crate) fn respond<T, F>(
    view: View,
    viewer: &Viewer,
    uri: &Uri,
    gate: &LoginGate,
    page: F,
) -> Response
where
    T: Template,
    F: FnOnce(View, PageContext) -> T,
{
    match dispatch(view, viewer.is_authenticated(), full_path(uri), gate) {
        Outcome::Render(view) => {
            tracing::debug!(template = %view.template_name(), "rendering");
            let ctx = PageContext::new(viewer.profile()).for_view(&view);
            HtmlTemplate(page(view, ctx)).into_response()
        }
        Outcome::Redirect(target) => {
            tracing::debug!(location = %target, "redirecting anonymous visitor");
            AuthRedirect(target).into_response()
        }
    }
}

fn full_path(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|path_and_query| path_and_query.as_str())
        .unwrap_or_else(|| uri.path())
}
