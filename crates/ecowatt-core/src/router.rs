//! Route table and navigation guard.
//!
//! Every navigation runs the guard first. A protected route with no live
//! session sends the user to `/login` instead. The guard calls
//! `SessionStore::is_login`, so an expired credential is cleared here even if
//! no request has hit a 401 yet.

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::SessionStore;

pub const LOGIN_ROUTE: &str = "/login";

/// Window title used when a route has none.
pub const APP_TITLE: &str = "Household Energy Checkup & Saving Advisor";

/// Redirect chains longer than this are treated as a loop
const MAX_REDIRECTS: usize = 8;

/// Client-side navigation, as seen by the HTTP client core.
pub trait Navigator: Send + Sync {
    fn push(&self, path: &str);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("No route matches {0}")]
    UnknownRoute(String),

    #[error("Redirect loop starting at {0}")]
    RedirectLoop(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub title: Option<String>,
    pub requires_auth: bool,
    pub redirect: Option<String>,
}

impl Route {
    pub fn public(path: &str, title: &str) -> Self {
        Self {
            path: path.to_string(),
            title: Some(title.to_string()),
            requires_auth: false,
            redirect: None,
        }
    }

    pub fn protected(path: &str, title: &str) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(path, title)
        }
    }

    pub fn redirect(path: &str, to: &str) -> Self {
        Self {
            path: path.to_string(),
            title: None,
            requires_auth: false,
            redirect: Some(to.to_string()),
        }
    }
}

/// Result of running the guard for one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed(String),
    Redirect(String),
}

impl Navigation {
    /// The path the user ends up on.
    pub fn path(&self) -> &str {
        match self {
            Navigation::Proceed(path) | Navigation::Redirect(path) => path,
        }
    }
}

/// Decide whether a transition to `route` may complete.
pub fn guard(route: &Route, session: &SessionStore) -> Navigation {
    let live = session.is_login();
    debug!(path = %route.path, live, "Checking session before navigation");

    if route.requires_auth && !live {
        Navigation::Redirect(LOGIN_ROUTE.to_string())
    } else {
        Navigation::Proceed(route.path.clone())
    }
}

#[derive(Debug, Default)]
struct Location {
    path: Option<String>,
    title: String,
}

pub struct Router {
    routes: Vec<Route>,
    session: SessionStore,
    location: Mutex<Location>,
}

impl Router {
    pub fn new(routes: Vec<Route>, session: SessionStore) -> Self {
        Self {
            routes,
            session,
            location: Mutex::new(Location {
                path: None,
                title: APP_TITLE.to_string(),
            }),
        }
    }

    /// The application's route table.
    pub fn with_default_routes(session: SessionStore) -> Self {
        let routes = vec![
            Route::redirect("/", "/index/dashboard"),
            Route::protected("/index", "Home"),
            Route::protected("/index/dashboard", "Dashboard"),
            Route::protected("/index/electricity", "Electricity Analysis"),
            Route::protected("/index/gas", "Gas Analysis"),
            Route::protected("/index/water", "Water Analysis"),
            Route::protected("/index/devices", "Device Management"),
            Route::protected("/index/bills", "Bill Management"),
            Route::protected("/index/settings", "Settings"),
            Route::public(LOGIN_ROUTE, "Sign In & Register"),
        ];
        Self::new(routes, session)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Find the route for `path`, following static redirects.
    pub fn resolve(&self, path: &str) -> Result<&Route, RouterError> {
        let mut current = path;
        for _ in 0..MAX_REDIRECTS {
            let route = self
                .routes
                .iter()
                .find(|r| r.path == current)
                .ok_or_else(|| RouterError::UnknownRoute(current.to_string()))?;

            match route.redirect {
                Some(ref target) => current = target,
                None => return Ok(route),
            }
        }
        Err(RouterError::RedirectLoop(path.to_string()))
    }

    /// Navigate to `path`, running the guard first.
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouterError> {
        let target = self.resolve(path)?;
        let outcome = guard(target, &self.session);

        let landed = match outcome {
            Navigation::Proceed(_) => target,
            Navigation::Redirect(ref to) => {
                debug!(from = %path, to = %to, "Redirecting unauthenticated navigation");
                self.resolve(to)?
            }
        };

        let mut location = self.location.lock();
        location.path = Some(landed.path.clone());
        location.title = landed.title.clone().unwrap_or_else(|| APP_TITLE.to_string());

        Ok(outcome)
    }

    pub fn current_path(&self) -> Option<String> {
        self.location.lock().path.clone()
    }

    pub fn title(&self) -> String {
        self.location.lock().title.clone()
    }
}

impl Navigator for Router {
    fn push(&self, path: &str) {
        if let Err(e) = self.navigate(path) {
            warn!(path, error = %e, "Navigation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::codec::tests::token_expiring_at;
    use chrono::Utc;

    fn signed_in_session() -> SessionStore {
        let session = SessionStore::in_memory();
        session.set_token(token_expiring_at(Utc::now().timestamp() + 3600));
        session
    }

    #[test]
    fn test_protected_route_with_live_session_proceeds() {
        let router = Router::with_default_routes(signed_in_session());

        let outcome = router.navigate("/index/bills").unwrap();
        assert_eq!(outcome, Navigation::Proceed("/index/bills".to_string()));
        assert_eq!(router.current_path().as_deref(), Some("/index/bills"));
        assert_eq!(router.title(), "Bill Management");
    }

    #[test]
    fn test_protected_route_without_session_redirects() {
        let router = Router::with_default_routes(SessionStore::in_memory());

        let outcome = router.navigate("/index/devices").unwrap();
        assert_eq!(outcome, Navigation::Redirect(LOGIN_ROUTE.to_string()));
        assert_eq!(router.current_path().as_deref(), Some(LOGIN_ROUTE));
    }

    #[test]
    fn test_expired_session_redirects_and_clears_token() {
        let session = SessionStore::in_memory();
        session.set_token(token_expiring_at(Utc::now().timestamp() - 60));
        let router = Router::with_default_routes(session.clone());

        let outcome = router.navigate("/index/dashboard").unwrap();

        assert_eq!(outcome, Navigation::Redirect("/login".to_string()));
        assert_eq!(session.token(), "");
    }

    #[test]
    fn test_public_route_always_proceeds() {
        let router = Router::with_default_routes(SessionStore::in_memory());

        let outcome = router.navigate(LOGIN_ROUTE).unwrap();
        assert_eq!(outcome, Navigation::Proceed(LOGIN_ROUTE.to_string()));
        assert_eq!(router.title(), "Sign In & Register");
    }

    #[test]
    fn test_root_redirects_to_dashboard() {
        let router = Router::with_default_routes(signed_in_session());

        let outcome = router.navigate("/").unwrap();
        assert_eq!(outcome, Navigation::Proceed("/index/dashboard".to_string()));
        assert_eq!(outcome.path(), "/index/dashboard");
    }

    #[test]
    fn test_default_table_protects_everything_but_login() {
        let router = Router::with_default_routes(SessionStore::in_memory());

        for route in router.routes().iter().filter(|r| r.redirect.is_none()) {
            assert_eq!(route.requires_auth, route.path != LOGIN_ROUTE, "{}", route.path);
            assert!(route.title.is_some(), "{}", route.path);
        }
        assert!(router.routes().iter().any(|r| r.path == "/index/water"));
    }

    #[test]
    fn test_unknown_route() {
        let router = Router::with_default_routes(signed_in_session());
        assert_eq!(
            router.navigate("/nowhere"),
            Err(RouterError::UnknownRoute("/nowhere".to_string()))
        );
        assert_eq!(router.current_path(), None);
        assert_eq!(router.title(), APP_TITLE);
    }

    #[test]
    fn test_redirect_loop_is_detected() {
        let router = Router::new(
            vec![Route::redirect("/a", "/b"), Route::redirect("/b", "/a")],
            SessionStore::in_memory(),
        );
        assert_eq!(
            router.resolve("/a"),
            Err(RouterError::RedirectLoop("/a".to_string()))
        );
    }

    #[test]
    fn test_untitled_route_uses_app_title() {
        let mut route = Route::public("/about", "About");
        route.title = None;
        let router = Router::new(vec![route], SessionStore::in_memory());

        router.navigate("/about").unwrap();
        assert_eq!(router.title(), APP_TITLE);
    }

    #[test]
    fn test_push_to_login_is_idempotent() {
        let router = Router::with_default_routes(SessionStore::in_memory());
        router.push(LOGIN_ROUTE);
        router.push(LOGIN_ROUTE);
        assert_eq!(router.current_path().as_deref(), Some(LOGIN_ROUTE));
    }

    #[test]
    fn test_push_unknown_route_keeps_location() {
        let router = Router::with_default_routes(SessionStore::in_memory());
        router.push(LOGIN_ROUTE);
        router.push("/missing");
        assert_eq!(router.current_path().as_deref(), Some(LOGIN_ROUTE));
    }
}
