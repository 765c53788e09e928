//! Which page a request gets, and who is allowed to see it.
//!
//! Everything here is plain data and pure functions; the axum handlers only
//! translate requests into a [`View`] and an [`Outcome`] back into a response.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::auth::Profile;

const MISSION_INDEX_PATH: &str = "/quadraticlands/mission";

/// Mission that anonymous visitors are sent back to the mission list from.
const RECEIVE_MISSION: &str = "receive";

// Unreserved characters plus `/` stay readable in the `next` parameter.
const NEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// A lowercase path segment naming a mission, a mission state or an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug(String);

impl Slug {
    pub fn parse(segment: &str) -> Option<Self> {
        let valid = !segment.is_empty()
            && segment
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
        valid.then(|| Slug(segment.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static pages living directly under `/quadraticlands/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasePage {
    About,
    Faq,
    Privacy,
}

impl BasePage {
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "about" => Some(BasePage::About),
            "faq" => Some(BasePage::Faq),
            "privacy" => Some(BasePage::Privacy),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BasePage::About => "about",
            BasePage::Faq => "faq",
            BasePage::Privacy => "privacy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Index,
    Base(BasePage),
    Test,
    Dashboard,
    MissionIndex,
    Mission {
        mission: Slug,
    },
    MissionState {
        mission: Slug,
        state: Slug,
    },
    Question {
        mission: Slug,
        question: u32,
    },
    Answer {
        mission: Slug,
        question: u32,
        answer: Slug,
    },
    Postcard,
}

impl View {
    /// Path of the template rendering this view, relative to the template root.
    pub fn template_name(&self) -> String {
        match self {
            View::Index => "quadraticlands/index.html".to_string(),
            View::Base(page) => format!("quadraticlands/{}.html", page.name()),
            View::Test => "quadraticlands/test.html".to_string(),
            View::Dashboard => "quadraticlands/dashboard/index.html".to_string(),
            View::MissionIndex => "quadraticlands/mission/index.html".to_string(),
            View::Mission { mission } => format!("quadraticlands/mission/{mission}/index.html"),
            View::MissionState { mission, state } => {
                format!("quadraticlands/mission/{mission}/{state}.html")
            }
            View::Question { mission, question } => {
                format!("quadraticlands/mission/{mission}/question_{question}.html")
            }
            View::Answer {
                mission,
                question,
                answer,
            } => format!("quadraticlands/mission/{mission}/question_{question}_{answer}.html"),
            View::Postcard => "quadraticlands/mission/postcard/postcard.html".to_string(),
        }
    }

    fn requires_login(&self) -> bool {
        matches!(
            self,
            View::Dashboard
                | View::MissionState { .. }
                | View::Question { .. }
                | View::Answer { .. }
                | View::Postcard
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(View),
    Redirect(String),
}

/// Where anonymous visitors are sent to sign in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGate {
    login_url: String,
}

impl LoginGate {
    pub fn new(login_url: impl Into<String>) -> Self {
        Self {
            login_url: login_url.into(),
        }
    }

    /// Login URL that brings the visitor back to `next` afterwards.
    pub fn redirect_for(&self, next: &str) -> String {
        format!(
            "{}?next={}",
            self.login_url,
            utf8_percent_encode(next, NEXT_ENCODE_SET)
        )
    }
}

/// Decides between rendering `view` and redirecting the visitor.
///
/// `full_path` is the request path including its query string.
pub fn dispatch(view: View, authenticated: bool, full_path: &str, gate: &LoginGate) -> Outcome {
    if authenticated {
        return Outcome::Render(view);
    }

    let redirect = match &view {
        View::Mission { mission } if mission.as_str() == RECEIVE_MISSION => {
            Some(MISSION_INDEX_PATH.to_string())
        }
        view if view.requires_login() => Some(gate.redirect_for(full_path)),
        _ => None,
    };

    redirect.map_or(Outcome::Render(view), Outcome::Redirect)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "What is Quadratic Lands?",
        answer: "A game that teaches the mechanisms behind community governance, one mission at a time.",
    },
    FaqEntry {
        question: "How do I start playing?",
        answer: "Sign in, open the mission list and pick the first mission.",
    },
    FaqEntry {
        question: "Can I send a postcard?",
        answer: "Yes. Choose a frame, two backgrounds and a message on the postcard mission page.",
    },
];

/// Everything templates may show about the visitor and the game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub authenticated: bool,
    pub handle: Option<String>,
    pub initial_dist: Option<u64>,
    pub completed_missions: Vec<String>,
    pub faq: Vec<FaqEntry>,
}

impl PageContext {
    pub fn new(profile: Option<&Profile>) -> Self {
        match profile {
            Some(profile) => Self {
                authenticated: true,
                handle: Some(profile.handle.clone()),
                initial_dist: profile.initial_dist,
                completed_missions: profile.completed_missions.clone(),
                faq: Vec::new(),
            },
            None => Self::default(),
        }
    }

    /// Adds whatever extra data `view` needs.
    pub fn for_view(mut self, view: &View) -> Self {
        if let View::Base(BasePage::Faq) = view {
            self.faq = FAQ.to_vec();
        }
        self
    }
}

/// A customizable aspect of the postcard and the choices offered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotChoices {
    pub key: &'static str,
    pub values: &'static [&'static str],
}

pub const POSTCARD_SLOTS: &[SlotChoices] = &[
    SlotChoices {
        key: "front_frame",
        values: &["1", "2"],
    },
    SlotChoices {
        key: "front_background",
        values: &["a", "b"],
    },
    SlotChoices {
        key: "back_background",
        values: &["a", "b"],
    },
];
