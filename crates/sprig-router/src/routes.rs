#![forbid(unsafe_code)]

//! Route table: canonical path → render function.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use sprig_dom::MaterializeError;

/// Zero-argument render function producing the page's root node.
pub type RenderFn<N> = Rc<dyn Fn() -> Result<N, MaterializeError>>;

/// Path → render function. Keys are matched verbatim; the last write for a
/// path wins.
pub struct Routes<N> {
    table: HashMap<String, RenderFn<N>>,
}

impl<N> Routes<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn route(
        mut self,
        path: impl Into<String>,
        render: impl Fn() -> Result<N, MaterializeError> + 'static,
    ) -> Self {
        self.insert(path, render);
        self
    }

    /// Register `render` for `path`, replacing any previous entry.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        render: impl Fn() -> Result<N, MaterializeError> + 'static,
    ) {
        self.table.insert(path.into(), Rc::new(render));
    }

    /// Register an infallible render function.
    #[must_use]
    pub fn page(self, path: impl Into<String>, render: impl Fn() -> N + 'static) -> Self {
        self.route(path, move || Ok(render()))
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<RenderFn<N>> {
        self.table.get(path).cloned()
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.table.contains_key(path)
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.table.remove(path).is_some()
    }

    /// Registered paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<_> = self.table.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<N> Default for Routes<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for Routes<N> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<N> fmt::Debug for Routes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routes")
            .field("paths", &self.paths())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let routes = Routes::new().page("/", || 1).page("/", || 2);
        assert_eq!(routes.len(), 1);
        let render = routes.get("/").unwrap();
        assert_eq!(render().unwrap(), 2);
    }

    #[test]
    fn lookup_is_verbatim() {
        let routes = Routes::new().page("/about", || ());
        assert!(routes.contains("/about"));
        assert!(!routes.contains("about"));
        assert!(!routes.contains("/about/"));
        assert!(routes.get("/About").is_none());
    }

    #[test]
    fn paths_are_sorted() {
        let mut routes = Routes::new().page("/b", || ()).page("/a", || ());
        assert_eq!(routes.paths(), ["/a", "/b"]);
        assert!(routes.remove("/a"));
        assert!(!routes.remove("/a"));
        assert_eq!(format!("{routes:?}"), r#"Routes { paths: ["/b"] }"#);
    }
}
