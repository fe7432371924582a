/*!
The signed-in area pages: dashboard plus one page per functional area.

Each page is the same shell (role badge, identity, role menu) around the
area heading; what the area actually contains is up to the template.
*/
use axum::{
    extract::Extension,
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;

use crate::nav::{self, Route};
use crate::user::Identity;

use super::*;

#[derive(Debug, Serialize)]
struct NavLink {
    path: &'static str,
    label: &'static str,
    icon: &'static str,
    current: bool,
}

#[derive(Debug, Serialize)]
struct PageData<'a> {
    title: &'static str,
    heading: String,
    area: &'static str,
    is_dashboard: bool,
    name: &'a str,
    email: &'a str,
    initials: String,
    role: &'static str,
    role_class: &'static str,
    access_summary: &'static str,
    class_id: Option<&'a str>,
    n_children: usize,
    nav: Vec<NavLink>,
}

fn page_data(ident: &Identity, route: Route) -> PageData<'_> {
    let menu = nav::navigation_for(ident.role);

    let heading = if route == Route::Dashboard {
        format!("{} Dashboard", ident.role.title())
    } else {
        // Menu labels are role-specific ("My Classes", "Fee Status").
        match menu.iter().find(|item| item.route == route) {
            Some(item) => item.label.to_owned(),
            None => route.title().to_owned(),
        }
    };

    let nav = menu.iter()
        .map(|item| NavLink {
            path: item.path(),
            label: item.label,
            icon: item.icon.name(),
            current: item.route == route,
        })
        .collect();

    PageData {
        title: route.title(),
        heading,
        area: route.path().trim_start_matches('/'),
        is_dashboard: route == Route::Dashboard,
        name: &ident.name,
        email: &ident.email,
        initials: ident.initials(),
        role: ident.role.title(),
        role_class: ident.role.badge_class(),
        access_summary: ident.role.access_summary(),
        class_id: ident.class_id.as_deref(),
        n_children: ident.student_ids.len(),
        nav,
    }
}

pub async fn area(
    identity: Option<Extension<Identity>>,
    uri: Uri,
) -> Response {
    log::trace!("area( [ identity ], {:?} ) called.", uri.path());

    // The guard only lets identity-less requests through to `/`, which
    // isn't served here.
    let ident = match identity {
        Some(Extension(ident)) => ident,
        None => { return Redirect::to(Route::Root.path()).into_response(); },
    };

    let route = Route::from_path(uri.path());
    let data = page_data(&ident, route);

    if !nav::permits(ident.role, route) {
        return serve_template(
            StatusCode::NOT_FOUND,
            "not_found",
            &data,
            vec![]
        );
    }

    serve_template(
        StatusCode::OK,
        "page",
        &data,
        vec![]
    )
}
