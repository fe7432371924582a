/*!
Interoperation between the client (browser) and server.

(Not the application and its storage; that's covered by `session` and
`store`.)
*/
use std::{
    fmt::Debug,
    path::Path,
    sync::Arc,
};

use axum::{
    extract::Extension,
    http::{header, Method, Request, StatusCode},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use handlebars::Handlebars;
use once_cell::sync::OnceCell;
use serde::Serialize;
use tower_http::services::ServeDir;

use crate::config::Glob;
use crate::guard;
use crate::session::Session;

pub mod login;
pub mod pages;

static TEMPLATES: OnceCell<Handlebars> = OnceCell::new();

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "schoolms_session";

static CLEAR_COOKIE: &str = "schoolms_session=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax";

static HTML_500: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>SchoolMS | Error</title>
<link rel="stylesheet" href="/static/schoolms.css">
</head>
<body>
<h1>Internal Server Error</h1>
<p>(Error 500)</p>
<p>Something went wrong on our end. No further or more
helpful information is available about the problem.</p>
</body>
</html>"#;

trait AddHeaders: IntoResponse + Sized {
    fn add_headers(self, mut new_headers: Vec<(HeaderName, HeaderValue)>) -> Response {
        let mut r = self.into_response();
        let r_headers = r.headers_mut();
        for (name, value) in new_headers.drain(..) {
            r_headers.insert(name, value);
        }

        r
    }
}

impl<T: IntoResponse + Sized> AddHeaders for T {}

/**
Initializes the resources used in this module. This function should be called
before any functionality of this module or any of its submodules is used.

Currently the only thing that happens here is loading the templates used by
`serve_template()`. Calling it again after a successful call does nothing.

The argument is the path to the directory where the templates used by
`serve_template()` can be found.
*/
pub fn init<P: AsRef<Path>>(template_dir: P) -> Result<(), String> {
    let template_dir = template_dir.as_ref();

    TEMPLATES.get_or_try_init(|| {
        let mut h = Handlebars::new();
        #[cfg(debug_assertions)]
        h.set_dev_mode(true);
        h.register_templates_directory(".html", template_dir)
            .map_err(|e| format!(
                "Error registering templates directory {}: {}",
                template_dir.display(), &e
            ))?;
        log::info!(
            "Registered {} templates from {}.",
            h.get_templates().len(), template_dir.display()
        );
        Ok::<Handlebars, String>(h)
    })?;

    Ok(())
}

/**
Return an HTML response in the case of an unrecoverable* error.

(*"Unrecoverable" from the perspective of fielding the current request,
not from the perspective of the program crashing.)
*/
pub fn html_500() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(HTML_500)
    ).into_response()
}

pub fn serve_template<S>(
    code: StatusCode,
    template_name: &str,
    data: &S,
    addl_headers: Vec<(HeaderName, HeaderValue)>
) -> Response
where
    S: Serialize + Debug
{
    log::trace!("serve_template( {}, {:?}, ... ) called.", &code, template_name);

    let templates = match TEMPLATES.get() {
        Some(h) => h,
        None => {
            log::error!("serve_template() called before inter::init().");
            return html_500();
        },
    };

    match templates.render(template_name, data) {
        Ok(response_body) => (
            code,
            Html(response_body)
        ).add_headers(addl_headers),
        Err(e) => {
            log::error!(
                "Error rendering template {:?} with data {:?}:\n{}",
                template_name, data, &e
            );
            html_500()
        },
    }
}

/// Pull the session id out of any `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE).iter() {
        let value = match value.to_str() {
            Ok(s) => s,
            Err(e) => {
                log::debug!("Ignoring unreadable cookie header {:?}: {}", value, &e);
                continue;
            },
        };
        for pair in value.split(';') {
            if let Some((name, id)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE {
                    return Some(id.to_owned());
                }
            }
        }
    }

    None
}

fn session_cookie(session_id: &str) -> Result<HeaderValue, String> {
    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session_id
    );
    HeaderValue::from_str(&cookie)
        .map_err(|e| format!("Unable to make cookie from {:?}: {}", &cookie, &e))
}

/**
Middleware that runs every navigation past the access guard.

Refused navigations get redirected. Allowed ones carry the session's
`Identity` (if any) into the request extensions for the handler. The login
and logout form posts go through untouched.
*/
pub async fn guard_layer<B>(
    mut req: Request<B>,
    next: Next<B>,
) -> Response {
    if req.method() == Method::POST
        && matches!(req.uri().path(), "/login" | "/logout")
    {
        return next.run(req).await;
    }

    let glob: Arc<Glob> = match req.extensions().get::<Arc<Glob>>() {
        Some(glob) => glob.clone(),
        None => {
            log::error!("guard_layer(): no Glob extension on request.");
            return html_500();
        },
    };

    let session_id = session_id_from_headers(req.headers());
    let session = Session::init(glob.store.clone(), session_id.as_deref());
    let identity = session.current_identity();
    let verdict = guard::evaluate(identity.as_ref(), req.uri().path());

    if let Some(target) = verdict.redirect {
        log::trace!(
            "guard: {:?} {:?} -> {:?}",
            &verdict.state, req.uri().path(), target.path()
        );
        return Redirect::to(target.path()).into_response();
    }

    if let Some(ident) = identity {
        req.extensions_mut().insert(ident);
    }
    next.run(req).await
}

/// Assemble the whole application.
pub fn router(glob: Arc<Glob>) -> Router {
    let static_dir = glob.static_dir.clone();

    Router::new()
        .route("/", get(login::login_page))
        .route("/login", get(pages::area).post(login::login))
        .route("/logout", get(pages::area).post(login::logout))
        .route("/:area", get(pages::area))
        .fallback(pages::area)
        .layer(middleware::from_fn(guard_layer))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(Extension(glob))
}
