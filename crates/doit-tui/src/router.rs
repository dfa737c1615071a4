//! Route table and navigation history.
//!
//! Two routes, mirroring the URL scheme of the todo service:
//!
//! | Path         | Name         | View   |
//! |--------------|--------------|--------|
//! | `/`          | `Home`       | List   |
//! | `/todos/:id` | `TodoDetail` | Detail |

/// Which screen a route renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

struct RouteRecord {
    path: &'static str,
    name: &'static str,
    view: View,
}

const ROUTES: [RouteRecord; 2] = [
    RouteRecord {
        path: "/",
        name: "Home",
        view: View::List,
    },
    RouteRecord {
        path: "/todos/:id",
        name: "TodoDetail",
        view: View::Detail,
    },
];

/// A resolved route, with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    TodoDetail { id: i64 },
}

impl Route {
    pub fn view(&self) -> View {
        match self {
            Route::Home => View::List,
            Route::TodoDetail { .. } => View::Detail,
        }
    }

    pub fn name(&self) -> &'static str {
        ROUTES
            .iter()
            .find(|r| r.view == self.view())
            .map(|r| r.name)
            .unwrap_or("Unknown")
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::TodoDetail { id } => format!("/todos/{}", id),
        }
    }

    /// Resolve a path against the route table.
    ///
    /// Query strings, fragments and a trailing slash are ignored. Returns
    /// None for unknown paths and for ids that are not integers.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        ROUTES.iter().find_map(|record| {
            let params = match_pattern(record.path, path)?;
            match record.view {
                View::List => Some(Route::Home),
                View::Detail => {
                    let id = params
                        .iter()
                        .find(|(name, _)| *name == "id")
                        .and_then(|(_, value)| value.parse().ok())?;
                    Some(Route::TodoDetail { id })
                }
            }
        })
    }
}

/// Match `path` against `pattern`, collecting `:param` segments.
fn match_pattern<'p, 'a>(pattern: &'p str, path: &'a str) -> Option<Vec<(&'p str, &'a str)>> {
    if !path.starts_with('/') {
        return None;
    }
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.iter().zip(path_segments.iter()) {
        if let Some(name) = expected.strip_prefix(':') {
            if actual.is_empty() {
                return None;
            }
            params.push((name, *actual));
        } else if expected != actual {
            return None;
        }
    }
    Some(params)
}

/// Navigation history. Never empty; the bottom entry is where the app started.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            history: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        // history always holds the start route
        self.history.last().copied().unwrap_or(Route::Home)
    }

    /// Navigate to `route`. Pushing the current route again is a no-op.
    pub fn push(&mut self, route: Route) {
        if self.current() != route {
            self.history.push(route);
        }
    }

    /// Navigate to a path. Returns false if it matches no route.
    pub fn navigate(&mut self, path: &str) -> bool {
        match Route::parse(path) {
            Some(route) => {
                self.push(route);
                true
            }
            None => false,
        }
    }

    /// Go back one entry. Returns false when already at the start.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }
}
