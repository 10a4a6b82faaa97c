//! Form page, widget page, assets and redirects.

use axum::{response::Redirect, routing::get, Router};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticFilesConfig;

/// Landing page with the platform/username form.
pub const FORM_PATH: &str = "/obs/fortnite";

const FORM_TEMPLATE: &str = "fortnite-stats-form.tmpl.html";
const WIDGET_PAGE: &str = "fortnite-stats-widget.html";

/// Routes that do not touch the stats provider.
pub fn routes(files: &StaticFilesConfig) -> Router {
    let form = Path::new(&files.templates_dir).join(FORM_TEMPLATE);
    let widget = Path::new(&files.pages_dir).join(WIDGET_PAGE);

    Router::new()
        .route("/", get(redirect_to_form))
        .route("/obs", get(redirect_to_form))
        .route_service(FORM_PATH, ServeFile::new(form))
        .route_service("/fortnite/{platform}/{username}", ServeFile::new(widget))
        .nest_service("/assets", ServeDir::new(&files.assets_dir))
}

/// 303 See Other to the form.
async fn redirect_to_form() -> Redirect {
    Redirect::to(FORM_PATH)
}
