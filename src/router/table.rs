//! Route Table
//!
//! Ordered (pattern, entry) pairs plus a fallback. The first matching pattern
//! wins; an unmatched path resolves to the fallback with no parameters.

use super::error::RouteError;
use super::pattern::{PathPattern, RouteParams};

/// Immutable route table, built once at startup
#[derive(Debug, Clone)]
pub struct RouteTable<V> {
    routes: Vec<(PathPattern, V)>,
    fallback: V,
}

/// Result of resolving a path
#[derive(Debug)]
pub struct Resolved<'a, V> {
    pub entry: &'a V,
    pub params: RouteParams,
    /// Matched pattern, `None` for the fallback
    pub pattern: Option<&'a str>,
}

impl<V> RouteTable<V> {
    pub fn new(fallback: V) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    /// Append a route
    pub fn route(mut self, pattern: &str, entry: V) -> Result<Self, RouteError> {
        self.routes.push((PathPattern::parse(pattern)?, entry));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    /// Resolve a location path. Query string and fragment are ignored.
    pub fn resolve(&self, location: &str) -> Resolved<'_, V> {
        let path = strip_location(location);

        for (pattern, entry) in &self.routes {
            if let Some(params) = pattern.matches(path) {
                tracing::debug!(path, pattern = pattern.as_str(), "Route matched");
                return Resolved {
                    entry,
                    params,
                    pattern: Some(pattern.as_str()),
                };
            }
        }

        tracing::debug!(path, "No route matched, using fallback");
        Resolved {
            entry: &self.fallback,
            params: RouteParams::new(),
            pattern: None,
        }
    }
}

/// Drop `?query` and `#fragment`; an empty path is the root
fn strip_location(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    match &location[..end] {
        "" => "/",
        path => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table() -> RouteTable<&'static str> {
        RouteTable::new("dashboard")
            .route("/", "dashboard")
            .unwrap()
            .route("/players", "players")
            .unwrap()
            .route("/player/:uuid", "player")
            .unwrap()
    }

    #[test]
    fn test_resolves_declared_routes() {
        let t = table();
        assert_eq!(*t.resolve("/").entry, "dashboard");
        assert_eq!(*t.resolve("/players").entry, "players");

        let r = t.resolve("/player/abc-123");
        assert_eq!(*r.entry, "player");
        assert_eq!(r.params.get("uuid"), Some("abc-123"));
        assert_eq!(r.pattern, Some("/player/:uuid"));
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        let t = table();
        assert_eq!(*t.resolve("/players?page=2").entry, "players");
        assert_eq!(*t.resolve("/players#top").entry, "players");
        assert_eq!(t.resolve("/player/x?y=1").params.get("uuid"), Some("x"));
    }

    #[test]
    fn test_empty_path_is_root() {
        let t = table();
        let r = t.resolve("");
        assert_eq!(r.pattern, Some("/"));
    }

    #[test]
    fn test_first_match_wins() {
        let t = RouteTable::new("none")
            .route("/player/me", "me")
            .unwrap()
            .route("/player/:uuid", "player")
            .unwrap();
        assert_eq!(*t.resolve("/player/me").entry, "me");
        assert_eq!(*t.resolve("/player/you").entry, "player");
    }

    #[test]
    fn test_invalid_route_rejected() {
        let err = RouteTable::new(()).route("players", ()).unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    proptest! {
        #[test]
        fn prop_unmatched_paths_fall_back(path in "/[a-z]{1,10}/[a-z]{1,10}/[a-z]{1,10}") {
            let t = table();
            let r = t.resolve(&path);
            prop_assert_eq!(*r.entry, "dashboard");
            prop_assert!(r.params.is_empty());
            prop_assert_eq!(r.pattern, None);
        }
    }
}
