//! Public marketing pages. Copy ships hardcoded here; the content provider
//! substitutes overrides per request and silently falls back when the
//! override document is unavailable.

use crate::content::{provider::ContentProvider, store::ContentStore};
use axum::{response::Html, Extension};

/// Minimal HTML escaping for text interpolated into pages.
pub(crate) fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shared page shell.
pub(crate) fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | Elextrio Automation</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> <a href=\"/about\">About</a></nav>\n\
         {body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn paragraphs(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("<p>{}</p>\n", escape(line)))
        .collect()
}

pub async fn home(Extension(store): Extension<ContentStore>) -> Html<String> {
    let content = ContentProvider::load(&store).await;

    let heading = content.content_text(
        "home-hero-heading",
        "Smart Automation Solutions for Industry Excellence",
    );
    let subheading = content.content_text(
        "home-hero-subheading",
        "Delivering innovative industrial automation solutions and special-purpose machines \
         that empower businesses to achieve efficiency, precision, and reliability.",
    );

    let body = format!(
        "<section>\n<h1>{}</h1>\n<p>{}</p>\n\
         <a href=\"/services\">Explore Services</a>\n</section>\n",
        escape(&heading),
        escape(&subheading),
    );

    Html(page("Home", &body))
}

pub async fn about(Extension(store): Extension<ContentStore>) -> Html<String> {
    let content = ContentProvider::load(&store).await;

    let heading = content.content_text("about-hero-heading", "About Elextrio");
    let subheading = content.content_text(
        "about-hero-subheading",
        "Pioneering innovation in industrial automation since 2005",
    );
    let story_heading = content.content_text("about-story-heading", "Our Story");
    let story = content.content_array(
        "about-story-subheading",
        &[
            "At Elextrio Automation, we specialize in providing cutting-edge industrial \
             automation solutions and custom-built special-purpose machines.",
        ],
    );
    let mission_heading = content.content_text("about-mission-heading", "Our Mission");
    let mission = content.content_array(
        "about-mission-subheading",
        &[
            "Our mission is to empower industries with reliable, efficient and innovative \
             automation solutions.",
        ],
    );
    let vision_heading = content.content_text("about-vision-heading", "Our Vision");
    let vision = content.content_array(
        "about-vision-subheading",
        &[
            "To be the partner of choice for industrial automation, known for engineering \
             excellence and dependable delivery.",
        ],
    );

    let body = format!(
        "<section>\n<h1>{}</h1>\n<p>{}</p>\n</section>\n\
         <section>\n<h2>{}</h2>\n{}</section>\n\
         <section>\n<h3>{}</h3>\n{}</section>\n\
         <section>\n<h3>{}</h3>\n{}</section>\n",
        escape(&heading),
        escape(&subheading),
        escape(&story_heading),
        paragraphs(&story),
        escape(&mission_heading),
        paragraphs(&mission),
        escape(&vision_heading),
        paragraphs(&vision),
    );

    Html(page("About", &body))
}
