//! Login page and session endpoints.
//!
//! `GET /login` runs the session probe before showing the form, so an
//! already-authenticated visit bounces straight to the admin area.
//! `POST /login` exchanges credentials, sets the `auth_token` cookie on the
//! redirect response, and re-renders the form inline on failure.

use crate::api::handlers::{
    append_cookie,
    pages::{escape, page},
};
use crate::auth::{
    gateway::SharedGateway,
    token::{clear_cookie, extract_auth_token, SessionTokenStore},
};
use crate::guard::{
    login_flow::{sanitize_target, LoginFlow, ProbeOutcome},
    LOGIN_PATH,
};
use axum::{
    extract::Query,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(rename = "redirectTo", default)]
    pub redirect_to: Option<String>,
}

fn render_form(notice: Option<&str>, error: Option<&str>, redirect_to: Option<&str>) -> String {
    let notice = notice.map_or_else(String::new, |text| {
        format!("<p class=\"notice\">{}</p>\n", escape(text))
    });
    let error = error.map_or_else(String::new, |text| {
        format!("<p class=\"error\">{}</p>\n", escape(text))
    });
    let hidden = redirect_to.map_or_else(String::new, |target| {
        format!(
            "<input type=\"hidden\" name=\"redirectTo\" value=\"{}\">\n",
            escape(target)
        )
    });

    let body = format!(
        "<section>\n<h1>Admin Login</h1>\n{notice}{error}\
         <form action=\"/login\" method=\"post\">\n{hidden}\
         <label>Email <input type=\"email\" name=\"email\" required></label>\n\
         <label>Password <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Log in</button>\n</form>\n</section>\n",
    );

    page("Login", &body)
}

pub async fn form(
    Extension(gateway): Extension<SharedGateway>,
    Extension(tokens): Extension<SessionTokenStore>,
    Query(query): Query<LoginQuery>,
    headers: HeaderMap,
) -> Response {
    let cookie = extract_auth_token(&headers);
    let flow = LoginFlow::new(gateway.as_ref(), &tokens);

    match flow
        .probe(cookie.as_deref(), query.redirect_to.as_deref())
        .await
    {
        ProbeOutcome::Redirect { to, issued } => {
            let mut response = Redirect::to(&to).into_response();
            if let Some(token) = issued {
                append_cookie(&mut response, &token.cookie());
            }
            response
        }
        ProbeOutcome::Form { notice } => {
            let mut response = Html(render_form(
                notice.as_deref(),
                None,
                query.redirect_to.as_deref(),
            ))
            .into_response();
            // A cookie that did not survive the probe is dead weight; clear
            // it so the browser stops presenting it.
            if cookie.is_some() {
                append_cookie(&mut response, &clear_cookie());
            }
            response
        }
    }
}

pub async fn submit(
    Extension(gateway): Extension<SharedGateway>,
    Extension(tokens): Extension<SessionTokenStore>,
    Form(form): Form<LoginForm>,
) -> Response {
    let flow = LoginFlow::new(gateway.as_ref(), &tokens);

    match flow.submit(&form.email, &form.password).await {
        Ok(token) => {
            let target = sanitize_target(form.redirect_to.as_deref());
            let mut response = Redirect::to(&target).into_response();
            append_cookie(&mut response, &token.cookie());
            response
        }
        Err(err) => Html(render_form(
            None,
            Some(&err.to_string()),
            form.redirect_to.as_deref(),
        ))
        .into_response(),
    }
}

/// Sign out everywhere: both marker locations and the provider session.
pub async fn logout(
    Extension(gateway): Extension<SharedGateway>,
    Extension(tokens): Extension<SessionTokenStore>,
    headers: HeaderMap,
) -> Response {
    let cookie = extract_auth_token(&headers);
    tokens.clear(cookie.as_deref()).await;
    gateway.sign_out().await;

    let mut response = Redirect::to(LOGIN_PATH).into_response();
    append_cookie(&mut response, &clear_cookie());
    response
}
