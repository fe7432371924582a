/*!
Deciding, on each navigation, whether the requested page may be shown.

Without an identity only the login page (`/`) is reachable; everything
else bounces there. With an identity, the role's menu plus the dashboard
is reachable and everything else bounces to the dashboard. Both bounce
targets pass their own check, so a redirect never leads to another one.
*/
use crate::nav::{self, Route};
use crate::session::Session;
use crate::user::Identity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    AuthenticatedAllowed,
    AuthenticatedDenied,
}

/// The outcome of checking one navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub state: GuardState,
    /// Where to send the browser instead, if anywhere.
    pub redirect: Option<Route>,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool { self.redirect.is_none() }
}

pub fn evaluate(identity: Option<&Identity>, path: &str) -> Verdict {
    let target = Route::from_path(path);

    match identity {
        None => Verdict {
            state: GuardState::Unauthenticated,
            redirect: if target == Route::Root { None } else { Some(Route::Root) },
        },
        Some(ident) if nav::permits(ident.role, target) => Verdict {
            state: GuardState::AuthenticatedAllowed,
            redirect: None,
        },
        Some(ident) => {
            log::debug!(
                "{:?} ({}) denied {:?}; redirecting to dashboard.",
                &ident.username, &ident.role, path
            );
            Verdict {
                state: GuardState::AuthenticatedDenied,
                redirect: Some(Route::Dashboard),
            }
        },
    }
}

/// Check `path` against whoever is logged in to `session`.
pub fn check(session: &Session, path: &str) -> Verdict {
    evaluate(session.current_identity().as_ref(), path)
}

/**
Tracks where a client is as it navigates.

Each call to `navigate()` evaluates the requested path and, if it's
refused, follows the single redirect.
*/
#[derive(Debug)]
pub struct Guard {
    state: GuardState,
    location: Route,
}

impl Default for Guard {
    fn default() -> Self {
        Self { state: GuardState::Unauthenticated, location: Route::Root }
    }
}

impl Guard {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> GuardState { self.state }

    pub fn location(&self) -> Route { self.location }

    /// Navigate to `path` as `identity`; returns the route actually landed on.
    pub fn navigate(&mut self, identity: Option<&Identity>, path: &str) -> Route {
        let verdict = evaluate(identity, path);
        self.state = verdict.state;
        self.location = match verdict.redirect {
            Some(route) => route,
            None => Route::from_path(path),
        };
        self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;
    use crate::store::MemoryStore;
    use crate::user::Role;

    use std::sync::Arc;

    fn ident(uname: &str) -> Identity {
        Directory::demo().get(uname).unwrap().clone()
    }

    #[test]
    fn student_navigation() {
        let s = ident("student1");

        let v = evaluate(Some(&s), "/finance");
        assert_eq!(v.state, GuardState::AuthenticatedDenied);
        assert_eq!(v.redirect, Some(Route::Dashboard));

        let v = evaluate(Some(&s), "/academics");
        assert_eq!(v.state, GuardState::AuthenticatedAllowed);
        assert!(v.is_allowed());

        assert!(evaluate(Some(&s), "/dashboard").is_allowed());
        assert_eq!(evaluate(Some(&s), "/nowhere").redirect, Some(Route::Dashboard));
        assert_eq!(evaluate(Some(&s), "/").redirect, Some(Route::Dashboard));
    }

    #[test]
    fn anonymous_navigation() {
        let v = evaluate(None, "/");
        assert_eq!(v, Verdict { state: GuardState::Unauthenticated, redirect: None });

        let mut paths: Vec<&str> = Route::AREAS.iter().map(|r| r.path()).collect();
        paths.extend(["/nowhere", "/404", "/dashboard/"]);
        for p in paths {
            let v = evaluate(None, p);
            assert_eq!(v.state, GuardState::Unauthenticated);
            assert_eq!(v.redirect, Some(Route::Root), "{:?} not redirected", p);
        }
    }

    #[test]
    fn redirect_targets_are_allowed() {
        let d = Directory::demo();
        for role in Role::ALL.iter() {
            let who = match role {
                Role::Admin => "admin",
                Role::Teacher => "teacher1",
                Role::Student => "student1",
                Role::Parent => "parent1",
                Role::Accountant => "accountant",
            };
            let i = d.get(who).unwrap();
            for p in ["/", "/nowhere", "/admissions", "/settings", "/users"] {
                if let Some(target) = evaluate(Some(i), p).redirect {
                    assert!(evaluate(Some(i), target.path()).is_allowed());
                }
            }
        }
        assert!(evaluate(None, Route::Root.path()).is_allowed());
    }

    #[test]
    fn guard_follows_session() {
        let d = Directory::demo();
        let session = Session::init(Arc::new(MemoryStore::new()), None);
        assert_eq!(check(&session, "/homework").redirect, Some(Route::Root));

        session.login(&d, "teacher1", "password").unwrap();
        assert!(check(&session, "/homework").is_allowed());
        assert_eq!(check(&session, "/finance").redirect, Some(Route::Dashboard));

        session.logout().unwrap();
        assert_eq!(check(&session, "/homework").redirect, Some(Route::Root));
    }

    #[test]
    fn stateful_guard() {
        let p = ident("parent1");
        let mut g = Guard::new();
        assert_eq!(g.navigate(None, "/finance"), Route::Root);
        assert_eq!(g.state(), GuardState::Unauthenticated);

        assert_eq!(g.navigate(Some(&p), "/finance"), Route::Finance);
        assert_eq!(g.state(), GuardState::AuthenticatedAllowed);

        assert_eq!(g.navigate(Some(&p), "/homework"), Route::Dashboard);
        assert_eq!(g.state(), GuardState::AuthenticatedDenied);
        assert_eq!(g.location(), Route::Dashboard);

        assert_eq!(g.navigate(None, "/dashboard"), Route::Root);
    }
}
