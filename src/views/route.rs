//! Navigation surface
//!
//! `/heroes/list`, `/heroes/detail/{id}`, `/heroes/new`, `/heroes/edit/{id}`.
//! Anything that does not match lands on the list.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(String),
    Create,
    Edit(String),
}

impl Route {
    pub fn parse(path: &str) -> Self {
        // Query string and fragment never select a route
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["heroes", "detail", id] => Route::Detail(id.to_string()),
            ["heroes", "new"] => Route::Create,
            ["heroes", "edit", id] => Route::Edit(id.to_string()),
            _ => Route::List,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/heroes/list".to_string(),
            Route::Detail(id) => format!("/heroes/detail/{id}"),
            Route::Create => "/heroes/new".to_string(),
            Route::Edit(id) => format!("/heroes/edit/{id}"),
        }
    }

    /// Identifier carried by the location, if any
    pub fn id(&self) -> Option<&str> {
        match self {
            Route::Detail(id) | Route::Edit(id) => Some(id),
            Route::List | Route::Create => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths() {
        assert_eq!(Route::parse("/heroes/list"), Route::List);
        assert_eq!(
            Route::parse("/heroes/detail/dc-batman"),
            Route::Detail("dc-batman".into())
        );
        assert_eq!(Route::parse("/heroes/new"), Route::Create);
        assert_eq!(
            Route::parse("/heroes/edit/marvel-thor/"),
            Route::Edit("marvel-thor".into())
        );
    }

    #[test]
    fn test_redirects_to_list() {
        for path in ["", "/", "/heroes", "heroes/", "/villains", "/heroes/detail", "/heroes/edit/a/b"] {
            assert_eq!(Route::parse(path), Route::List, "path {path:?}");
        }
    }

    #[test]
    fn test_query_and_fragment_ignored() {
        assert_eq!(
            Route::parse("/heroes/detail/dc-flash?tab=bio#top"),
            Route::Detail("dc-flash".into())
        );
    }

    #[test]
    fn test_path_formats_back() {
        let route = Route::Edit("dc-arrow".into());
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(route.to_string(), "/heroes/edit/dc-arrow");
        assert_eq!(route.id(), Some("dc-arrow"));
        assert_eq!(Route::Create.id(), None);
    }
}
