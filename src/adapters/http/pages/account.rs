//! Login, registration and logout pages.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;

use super::{render_error, render_page};
use crate::adapters::http::error::PageError;
use crate::adapters::http::forms::{non_blank, required};
use crate::adapters::http::state::AppState;
use crate::adapters::render::templates;
use crate::application::{LoginCommand, LogoutCommand, RegisterCommand};
use crate::domain::backend::Credentials;
use crate::ports::{keys, PagePayload};

/// Username/password form shared by login and registration. Only the
/// registration page asks for `email`.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl CredentialsForm {
    /// The password is forwarded exactly as typed.
    fn credentials(&self) -> Result<Credentials, PageError> {
        let username = required(Some(self.username.as_str()), "Username")?;
        required(Some(self.password.as_str()), "Password")?;
        Ok(Credentials::new(username, self.password.as_str()))
    }

    fn email(&self) -> Option<String> {
        non_blank(self.email.as_deref()).map(str::to_string)
    }

    /// Values echoed back into the form; never the password.
    fn redisplay(&self) -> serde_json::Value {
        json!({ "username": self.username, "email": self.email })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub registered: Option<String>,
}

pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn login_page(State(state): State<AppState>, Query(query): Query<LoginQuery>) -> Response {
    let mut payload = PagePayload::titled("Log in");
    if query.registered.is_some() {
        payload.insert(keys::NOTICE, "Registration successful. Please log in.");
    }
    render_page(&state, templates::LOGIN, payload, StatusCode::OK)
}

pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let fallback = PagePayload::titled("Log in").with(keys::FORM, form.redisplay());

    let credentials = match form.credentials() {
        Ok(credentials) => credentials,
        Err(err) => return render_error(&state, templates::LOGIN, fallback, err),
    };
    let command = LoginCommand {
        session_id: state.settings.cookie.session_id(&headers),
        credentials,
    };

    match state.login_handler().handle(command).await {
        Ok(session) => {
            let cookie = state.settings.cookie.issue(session.id());
            (
                [(header::SET_COOKIE, cookie.to_string())],
                Redirect::to("/dashboard"),
            )
                .into_response()
        }
        Err(err) => render_error(&state, templates::LOGIN, fallback, err.into()),
    }
}

pub async fn register_page(State(state): State<AppState>) -> Response {
    render_page(
        &state,
        templates::REGISTER,
        PagePayload::titled("Register"),
        StatusCode::OK,
    )
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let fallback = PagePayload::titled("Register").with(keys::FORM, form.redisplay());

    let credentials = match form.credentials() {
        Ok(credentials) => credentials,
        Err(err) => return render_error(&state, templates::REGISTER, fallback, err),
    };

    match state
        .register_handler()
        .handle(RegisterCommand {
            credentials,
            email: form.email(),
        })
        .await
    {
        Ok(_) => Redirect::to("/login?registered=1").into_response(),
        Err(err) => render_error(&state, templates::REGISTER, fallback, err.into()),
    }
}

/// Clears the session and the cookie. Safe to call repeatedly.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let command = LogoutCommand {
        session_id: state.settings.cookie.session_id(&headers),
    };
    if let Err(e) = state.logout_handler().handle(command).await {
        tracing::warn!(error = %e, "Logout could not delete the session");
    }

    (
        [(header::SET_COOKIE, state.settings.cookie.expire().to_string())],
        Redirect::to("/login"),
    )
        .into_response()
}
