//! Route labels for spans and metrics.

/// Paths the gateway serves; anything else is reported as unmatched so
/// probes for random URLs cannot blow up label cardinality.
const KNOWN_ROUTES: [&str; 4] = ["/api/auth", "/api/proxy", "/healthcheck", "/metrics"];

const UNMATCHED_ROUTE: &str = "unmatched";

pub(super) fn route_label(path: &str) -> &'static str {
    let trimmed = path.trim_end_matches('/');

    KNOWN_ROUTES
        .iter()
        .copied()
        .find(|route| *route == trimmed)
        .unwrap_or(UNMATCHED_ROUTE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_routes_keep_their_path() {
        assert_eq!(route_label("/api/proxy"), "/api/proxy", "proxy route");
        assert_eq!(route_label("/api/auth/"), "/api/auth", "trailing slash ignored");
    }

    #[test]
    fn unknown_paths_collapse() {
        assert_eq!(route_label("/wp-login.php"), UNMATCHED_ROUTE, "probe collapsed");
    }
}
