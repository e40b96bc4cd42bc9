//! Admin area pages. Every page body renders behind the admin shell guard;
//! the chrome (sidebar, signed-in email, logout) is shared across pages.

use crate::api::handlers::{append_cookie, pages::escape};
use crate::auth::{
    gateway::SharedGateway,
    token::{clear_cookie, extract_auth_token, SessionTokenStore},
};
use crate::content::store::ContentStore;
use crate::guard::{
    admin_shell::{AdminShellGuard, ShellState},
    ADMIN_HOME,
};
use axum::{
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};

/// `/admin` is only an entry point; the dashboard is the real landing page.
pub async fn index() -> Redirect {
    Redirect::temporary(ADMIN_HOME)
}

pub async fn dashboard(
    Extension(gateway): Extension<SharedGateway>,
    Extension(tokens): Extension<SessionTokenStore>,
    headers: HeaderMap,
) -> Response {
    let email = match authenticate(&gateway, &tokens, &headers, "/admin/dashboard").await {
        Ok(email) => email,
        Err(response) => return response,
    };

    let body = "<h2>Dashboard</h2>\n\
                <p>Welcome to the Elextrio admin panel. Pick a section from the sidebar.</p>\n";
    Html(chrome("Dashboard", &email, "/admin/dashboard", body)).into_response()
}

pub async fn content(
    Extension(gateway): Extension<SharedGateway>,
    Extension(tokens): Extension<SessionTokenStore>,
    Extension(store): Extension<ContentStore>,
    headers: HeaderMap,
) -> Response {
    let email = match authenticate(&gateway, &tokens, &headers, "/admin/content").await {
        Ok(email) => email,
        Err(response) => return response,
    };

    let body = content_body(&store).await;
    Html(chrome("Content", &email, "/admin/content", &body)).into_response()
}

pub async fn jobs(
    Extension(gateway): Extension<SharedGateway>,
    Extension(tokens): Extension<SessionTokenStore>,
    headers: HeaderMap,
) -> Response {
    let email = match authenticate(&gateway, &tokens, &headers, "/admin/jobs").await {
        Ok(email) => email,
        Err(response) => return response,
    };

    let body = "<h2>Job Listings</h2>\n\
                <p>Job postings are managed in the external jobs service.</p>\n";
    Html(chrome("Jobs", &email, "/admin/jobs", body)).into_response()
}

/// Run the shell guard; `Ok` carries the signed-in email, `Err` carries the
/// finished response (redirect or error page) for the non-authenticated
/// states.
async fn authenticate(
    gateway: &SharedGateway,
    tokens: &SessionTokenStore,
    headers: &HeaderMap,
    path: &str,
) -> Result<String, Response> {
    let cookie = extract_auth_token(headers);
    let guard = AdminShellGuard::new(gateway.as_ref(), tokens);

    match guard.verify(cookie.as_deref(), path).await {
        ShellState::Authenticated { email } => Ok(email),
        ShellState::Redirecting { to } => {
            // The guard already dropped the local marker; drop the cookie
            // location with it so the browser does not keep presenting a
            // dead token on its way to the login page.
            let mut response = Redirect::temporary(&to).into_response();
            append_cookie(&mut response, &clear_cookie());
            Err(response)
        }
        ShellState::AuthError { message } => Err(Html(error_page(&message, path)).into_response()),
    }
}

fn chrome(title: &str, email: &str, active: &str, body: &str) -> String {
    let links = [
        ("/admin/dashboard", "Dashboard"),
        ("/admin/content", "Content"),
        ("/admin/jobs", "Jobs"),
    ];
    let sidebar: String = links
        .iter()
        .map(|(href, label)| {
            let marker = if *href == active { " aria-current=\"page\"" } else { "" };
            format!("<a href=\"{href}\"{marker}>{label}</a>\n")
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Elextrio Admin</title>\n</head>\n<body>\n\
         <aside>\n<nav>\n{sidebar}</nav>\n\
         <p>Signed in as {email}</p>\n\
         <form action=\"/logout\" method=\"post\"><button type=\"submit\">Log out</button></form>\n\
         </aside>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = escape(title),
        email = escape(email),
    )
}

fn error_page(message: &str, path: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Authentication Error | Elextrio Admin</title>\n</head>\n<body>\n\
         <main>\n<h1>Authentication Error</h1>\n<p>{message}</p>\n\
         <a href=\"{path}\">Try Again</a>\n<a href=\"/login\">Go to login</a>\n\
         </main>\n</body>\n</html>\n",
        message = escape(message),
        path = escape(path),
    )
}

async fn content_body(store: &ContentStore) -> String {
    match store.list_all().await {
        Ok(entries) if entries.is_empty() => {
            "<h2>Content</h2>\n<p>No overrides yet. Default copy is live.</p>\n".to_string()
        }
        Ok(entries) => {
            let rows: String = entries
                .iter()
                .map(|entry| {
                    format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                        escape(&entry.content_id),
                        escape(&entry.text.join(" / ")),
                        escape(entry.image.as_deref().unwrap_or("")),
                    )
                })
                .collect();
            format!(
                "<h2>Content</h2>\n<table>\n\
                 <tr><th>Content ID</th><th>Text</th><th>Image</th></tr>\n{rows}</table>\n"
            )
        }
        Err(err) => format!(
            "<h2>Content</h2>\n<p class=\"error\">{}</p>\n\
             <p>Default copy is being served in the meantime.</p>\n",
            escape(&err.to_string())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::store::ContentEntry;
    use std::env;

    #[test]
    fn chrome_marks_the_active_section() {
        let html = chrome("Jobs", "admin@elextrio.com", "/admin/jobs", "<h2>Jobs</h2>");
        assert!(html.contains("<a href=\"/admin/jobs\" aria-current=\"page\">Jobs</a>"));
        assert!(html.contains("Signed in as admin@elextrio.com"));
        assert!(html.contains("action=\"/logout\""));
    }

    #[test]
    fn error_page_offers_retry_and_login() {
        let html = error_page("Session verification timed out", "/admin/content");
        assert!(html.contains("Session verification timed out"));
        assert!(html.contains("<a href=\"/admin/content\">Try Again</a>"));
        assert!(html.contains("<a href=\"/login\">Go to login</a>"));
    }

    #[tokio::test]
    async fn content_body_surfaces_store_errors_as_banner() {
        let store = ContentStore::new(
            env::temp_dir()
                .join(format!("vetrina-admin-{}", uuid::Uuid::new_v4()))
                .join("content.json"),
        );
        let body = content_body(&store).await;
        assert!(body.contains("Failed to load content"));
        assert!(body.contains("Default copy is being served"));
    }

    #[tokio::test]
    async fn content_body_lists_entries() {
        let store = ContentStore::new(
            env::temp_dir()
                .join(format!("vetrina-admin-{}", uuid::Uuid::new_v4()))
                .join("content.json"),
        );
        store
            .upsert(ContentEntry {
                content_id: "about-hero-heading".to_string(),
                text: vec!["New Heading".to_string()],
                image: None,
            })
            .await
            .unwrap();

        let body = content_body(&store).await;
        assert!(body.contains("about-hero-heading"));
        assert!(body.contains("New Heading"));
    }
}
