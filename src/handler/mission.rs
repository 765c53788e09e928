use super::{respond, slug, NotFound};
use crate::{
    extractor::Viewer,
    views::{LoginGate, PageContext, View},
};
use askama::Template;
use axum::{
    extract::{OriginalUri, Path, State},
    response::Response,
};
use tracing::instrument;

#[derive(Template)]
#[template(path = "mission/index.html")]
struct MissionIndexTemplate {
    ctx: PageContext,
}

/// Shared page for every mission step; `template_name` tells the front end
/// which step it is showing.
#[derive(Template)]
#[template(path = "mission/mission.html")]
struct MissionTemplate {
    ctx: PageContext,
    template_name: String,
    mission: String,
    step: Option<String>,
}

impl MissionTemplate {
    fn new(view: View, ctx: PageContext) -> Self {
        let template_name = view.template_name();
        let (mission, step) = match view {
            View::Mission { mission } => (mission.to_string(), None),
            View::MissionState { mission, state } => (mission.to_string(), Some(state.to_string())),
            View::Question { mission, question } => {
                (mission.to_string(), Some(format!("question {question}")))
            }
            View::Answer {
                mission,
                question,
                answer,
            } => (
                mission.to_string(),
                Some(format!("question {question}, answer {answer}")),
            ),
            _ => (String::new(), None),
        };

        Self {
            ctx,
            template_name,
            mission,
            step,
        }
    }
}

#[instrument(skip(gate))]
pub async fn mission_index(
    viewer: Viewer,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Response {
    respond(View::MissionIndex, &viewer, &uri, &gate, |_, ctx| {
        MissionIndexTemplate { ctx }
    })
}

#[instrument(skip(gate))]
pub async fn mission(
    viewer: Viewer,
    Path(mission_name): Path<String>,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Result<Response, NotFound> {
    let view = View::Mission {
        mission: slug(&mission_name)?,
    };

    Ok(respond(view, &viewer, &uri, &gate, MissionTemplate::new))
}

#[instrument(skip(gate))]
pub async fn mission_state(
    viewer: Viewer,
    Path((mission_name, mission_state)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Result<Response, NotFound> {
    let view = View::MissionState {
        mission: slug(&mission_name)?,
        state: slug(&mission_state)?,
    };

    Ok(respond(view, &viewer, &uri, &gate, MissionTemplate::new))
}

#[instrument(skip(gate))]
pub async fn question(
    viewer: Viewer,
    Path((mission_name, question_num)): Path<(String, u32)>,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Result<Response, NotFound> {
    let view = View::Question {
        mission: slug(&mission_name)?,
        question: question_num,
    };

    Ok(respond(view, &viewer, &uri, &gate, MissionTemplate::new))
}

#[instrument(skip(gate))]
pub async fn answer(
    viewer: Viewer,
    Path((mission_name, question_num, answer)): Path<(String, u32, String)>,
    OriginalUri(uri): OriginalUri,
    State(gate): State<LoginGate>,
) -> Result<Response, NotFound> {
    let view = View::Answer {
        mission: slug(&mission_name)?,
        question: question_num,
        answer: slug(&answer)?,
    };

    Ok(respond(view, &viewer, &uri, &gate, MissionTemplate::new))
}
