use serde::Deserialize;
use std::path::PathBuf;

pub mod auth;
pub mod extractor;
pub mod handler;
pub mod postcard;
pub mod server;
pub mod views;

/// Settings read from `QL_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct QuadraticLandsConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_postcard_template")]
    pub postcard_template: PathBuf,
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_postcard_template() -> PathBuf {
    PathBuf::from("assets/postcard.svg")
}

fn default_login_url() -> String {
    "/login/github/".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}
