/*!
The public login page and the login/logout form endpoints.
*/
use axum::{
    extract::{Extension, Form},
    http::header::{self, HeaderMap, HeaderValue},
    http::StatusCode,
    response::{Redirect, Response},
};
use serde_json::json;

use crate::nav::Route;

use super::*;

/// Data type to read the form data from a front-page login request.
#[derive(serde::Deserialize)]
pub struct LoginData {
    pub uname: String,
    pub password: String,
}

pub fn respond_bad_password(uname: &str) -> Response {
    log::trace!("respond_bad_password( {:?} ) called.", uname);

    let data = json!({
        "error_message": "Invalid username/password combination.",
        "uname": uname,
    });

    serve_template(
        StatusCode::UNAUTHORIZED,
        "login",
        &data,
        vec![]
    )
}

pub async fn login_page() -> Response {
    log::trace!("login_page() called.");

    serve_template(
        StatusCode::OK,
        "login",
        &json!({}),
        vec![]
    )
}

pub async fn login(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
    Form(form): Form<LoginData>,
) -> Response {
    log::trace!("login( [ headers ], [ Glob ], {:?} ) called.", &form.uname);

    // A successful login always gets a session id the server chose. The
    // id the browser came in with (if any) is retired along with its record.
    let session = Session::start(glob.store.clone());

    let ident = match session.login(&glob.directory, &form.uname, &form.password) {
        Err(e) => {
            log::error!(
                "Session::login( [ directory ], {:?}, [ password ] ) error: {}",
                &form.uname, &e
            );
            return html_500();
        },
        Ok(None) => { return respond_bad_password(&form.uname); },
        Ok(Some(ident)) => ident,
    };

    if let Some(old_id) = session_id_from_headers(&headers) {
        let old = Session::init(glob.store.clone(), Some(&old_id));
        if old.id() != session.id() {
            if let Err(e) = old.logout() {
                log::error!("Unable to retire session {:?}: {}", old.id(), &e);
                return html_500();
            }
            log::debug!("Session {:?} replaced by {:?}.", old.id(), session.id());
        }
    }

    let cookie = match session_cookie(session.id()) {
        Ok(cookie) => cookie,
        Err(e) => {
            log::error!("Error issuing session cookie to {:?}: {}", &ident.username, &e);
            return html_500();
        },
    };

    Redirect::to(Route::Dashboard.path())
        .add_headers(vec![(header::SET_COOKIE, cookie)])
}

pub async fn logout(
    headers: HeaderMap,
    Extension(glob): Extension<Arc<Glob>>,
) -> Response {
    log::trace!("logout( [ headers ], [ Glob ] ) called.");

    if let Some(id) = session_id_from_headers(&headers) {
        let session = Session::init(glob.store.clone(), Some(&id));
        if let Err(e) = session.logout() {
            log::error!("Session::logout() error for {:?}: {}", session.id(), &e);
            return html_500();
        }
    }

    Redirect::to(Route::Root.path())
        .add_headers(vec![(header::SET_COOKIE, HeaderValue::from_static(CLEAR_COOKIE))])
}
