#![forbid(unsafe_code)]

//! Hash router: maps the navigator's fragment to a page and swaps it into
//! the mount element.
//!
//! # Render cycle
//!
//! Initialization and every navigator change notification run the same
//! cycle:
//!
//! 1. Canonicalize the fragment (empty → `/`, anything else verbatim).
//! 2. Look the path up in the route table.
//! 3. Matched: call the render function, then replace all of the mount's
//!    children with its node. Unmatched: replace them with a single
//!    not-found text node.
//!
//! There is no diffing. Whatever the previous page bound (reactive text,
//! event listeners) stays bound unless [`TeardownPolicy::FlushReplaced`] is
//! configured. Then every cycle builds its page inside a
//! [`CleanupRegistry::scoped`] capture, and the previous cycle's capture is
//! flushed only once the new page is in the mount. A page that fails to build
//! has its partial bindings flushed instead, and the page on screen keeps
//! working.
//!
//! # Ownership
//!
//! The router subscribes a listener to the navigator that holds only a weak
//! reference back to the router, and unsubscribes it when the last router
//! handle is dropped. [`Router::forget`] keeps it routing for the rest of the
//! program.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use sprig_core::{CleanupRegistry, Listener};
use sprig_dom::{Child, Host, HostError, MaterializeError, Materializer, Props};

use crate::link::{link, navigate};
use crate::navigator::{Navigator, NavigatorError};
use crate::routes::{RenderFn, Routes};

/// What to do with the outgoing page's bindings on each render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TeardownPolicy {
    /// Leave them registered. Listeners and reactive text bound by previous
    /// pages keep running until the registry is flushed by someone else.
    #[default]
    Retain,
    /// Capture each page's bindings in a registry of its own and flush it
    /// when the page is replaced. Bindings made outside a render cycle are
    /// left alone.
    FlushReplaced,
}

/// Configuration for [`Router`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
    /// Text rendered when no route matches.
    pub not_found_text: String,
    /// Handling of the previous page's bindings.
    pub teardown: TeardownPolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            not_found_text: "Not found".to_owned(),
            teardown: TeardownPolicy::Retain,
        }
    }
}

impl RouterConfig {
    #[must_use]
    pub fn with_not_found_text(mut self, text: impl Into<String>) -> Self {
        self.not_found_text = text.into();
        self
    }

    #[must_use]
    pub fn with_teardown(mut self, policy: TeardownPolicy) -> Self {
        self.teardown = policy;
        self
    }
}

/// Router lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Uninitialized,
    Initialized,
}

/// Result of one render cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Matched { path: String },
    NotFound { path: String },
}

impl RenderOutcome {
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Matched { path } | Self::NotFound { path } => path,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Errors from router operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A render was requested before [`Router::init`].
    NotInitialized,
    /// The page's render function or the mount swap failed.
    Materialize(MaterializeError),
    /// The navigator rejected a write.
    Navigation(NavigatorError),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => {
                f.write_str("router not initialized: call Router::init first")
            }
            Self::Materialize(err) => write!(f, "render failed: {err}"),
            Self::Navigation(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotInitialized => None,
            Self::Materialize(err) => Some(err),
            Self::Navigation(err) => Some(err),
        }
    }
}

impl From<MaterializeError> for RouterError {
    fn from(err: MaterializeError) -> Self {
        Self::Materialize(err)
    }
}

impl From<HostError> for RouterError {
    fn from(err: HostError) -> Self {
        Self::Materialize(err.into())
    }
}

impl From<NavigatorError> for RouterError {
    fn from(err: NavigatorError) -> Self {
        Self::Navigation(err)
    }
}

/// Map a navigator fragment to a route-table key.
#[must_use]
pub fn canonical_path(fragment: &str) -> &str {
    if fragment.is_empty() { "/" } else { fragment }
}

/// Make a navigation target absolute.
#[must_use]
pub fn normalize_target(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

struct Mounted<N> {
    mount: N,
    routes: Routes<N>,
}

struct Shared<H: Host, V: Navigator> {
    materializer: Materializer<H>,
    navigator: V,
    config: RouterConfig,
    mounted: RefCell<Option<Mounted<H::Node>>>,
    listener: RefCell<Option<Listener>>,
    /// Bindings of the page currently in the mount, under
    /// [`TeardownPolicy::FlushReplaced`].
    page_scope: RefCell<Option<CleanupRegistry>>,
}

impl<H: Host, V: Navigator> Drop for Shared<H, V> {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get_mut().take() {
            self.navigator.unsubscribe(&listener);
        }
    }
}

/// A hash router bound to one materializer and one navigator.
///
/// Cloning yields another handle to the same router.
pub struct Router<H: Host, V: Navigator> {
    shared: Rc<Shared<H, V>>,
}

impl<H: Host, V: Navigator> Clone for Router<H, V> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<H: Host, V: Navigator> Router<H, V> {
    /// An uninitialized router with the default configuration.
    pub fn new(materializer: Materializer<H>, navigator: V) -> Self {
        Self::with_config(materializer, navigator, RouterConfig::default())
    }

    pub fn with_config(
        materializer: Materializer<H>,
        navigator: V,
        config: RouterConfig,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                materializer,
                navigator,
                config,
                mounted: RefCell::new(None),
                listener: RefCell::new(None),
                page_scope: RefCell::new(None),
            }),
        }
    }

    /// Take ownership of `mount`'s children, install `routes` (replacing any
    /// previous table), subscribe to the navigator, and render once.
    ///
    /// Calling `init` again re-targets the router; it stays subscribed once.
    /// Routing lasts as long as some handle to the router does: keep one, or
    /// call [`forget`](Self::forget).
    pub fn init(
        &self,
        mount: H::Node,
        routes: Routes<H::Node>,
    ) -> Result<RenderOutcome, RouterError> {
        tracing::debug!(routes = routes.len(), "router initialized");
        *self.shared.mounted.borrow_mut() = Some(Mounted { mount, routes });
        self.subscribe();
        self.render()
    }

    fn subscribe(&self) {
        let mut slot = self.shared.listener.borrow_mut();
        if slot.is_some() {
            return;
        }
        let weak: Weak<Shared<H, V>> = Rc::downgrade(&self.shared);
        let listener = Listener::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let router = Router { shared };
            if let Err(err) = router.render() {
                tracing::warn!(%err, "route render failed");
            }
        });
        self.shared.navigator.subscribe(&listener);
        *slot = Some(listener);
    }

    /// Register a single route without replacing the table.
    pub fn set_route(
        &self,
        path: impl Into<String>,
        render: impl Fn() -> Result<H::Node, MaterializeError> + 'static,
    ) -> Result<(), RouterError> {
        let mut mounted = self.shared.mounted.borrow_mut();
        let mounted = mounted.as_mut().ok_or(RouterError::NotInitialized)?;
        mounted.routes.insert(path, render);
        Ok(())
    }

    /// Run one render cycle for the navigator's current fragment.
    pub fn render(&self) -> Result<RenderOutcome, RouterError> {
        let path = self.current_path();
        let (mount, render) = {
            let mounted = self.shared.mounted.borrow();
            let mounted = mounted.as_ref().ok_or(RouterError::NotInitialized)?;
            (mounted.mount.clone(), mounted.routes.get(&path))
        };

        let outcome = if render.is_some() {
            RenderOutcome::Matched { path }
        } else {
            RenderOutcome::NotFound { path }
        };

        match self.shared.config.teardown {
            TeardownPolicy::Retain => self.swap(&mount, render)?,
            TeardownPolicy::FlushReplaced => {
                let registry = self.shared.materializer.registry();
                let (swapped, scope) = registry.scoped(|| self.swap(&mount, render));
                if let Err(err) = swapped {
                    scope.flush_all();
                    return Err(err);
                }
                let replaced = self.shared.page_scope.replace(Some(scope));
                if let Some(replaced) = replaced {
                    let report = replaced.flush_all();
                    tracing::debug!(executed = report.executed, "replaced page torn down");
                }
            }
        }
        tracing::debug!(
            path = outcome.path(),
            matched = outcome.is_matched(),
            "route rendered"
        );
        Ok(outcome)
    }

    /// Build the page (or the not-found text) and make it the mount's only
    /// child. The mount is untouched when the build fails.
    fn swap(&self, mount: &H::Node, render: Option<RenderFn<H::Node>>) -> Result<(), RouterError> {
        let host = self.shared.materializer.host();
        let node = match render {
            Some(render) => render()?,
            None => host.create_text_node(&self.shared.config.not_found_text)?,
        };
        host.replace_children(mount, &node)?;
        Ok(())
    }

    /// Keep this router subscribed for the rest of the program, without a
    /// handle. For single-page apps whose router lives as long as the page.
    pub fn forget(self) {
        std::mem::forget(self);
    }

    /// Canonical path for the navigator's current fragment.
    #[must_use]
    pub fn current_path(&self) -> String {
        canonical_path(&self.shared.navigator.fragment()).to_owned()
    }

    #[must_use]
    pub fn state(&self) -> RouterState {
        if self.shared.mounted.borrow().is_some() {
            RouterState::Initialized
        } else {
            RouterState::Uninitialized
        }
    }

    /// The mount element, once initialized.
    #[must_use]
    pub fn mount(&self) -> Option<H::Node> {
        self.shared.mounted.borrow().as_ref().map(|m| m.mount.clone())
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.shared.config
    }

    pub fn navigator(&self) -> &V {
        &self.shared.navigator
    }

    pub fn materializer(&self) -> &Materializer<H> {
        &self.shared.materializer
    }

    /// [`navigate`](crate::navigate) through this router's navigator.
    pub fn navigate(&self, path: &str) -> Result<(), RouterError> {
        Ok(navigate(&self.shared.navigator, path)?)
    }

    /// [`link`](crate::link()) through this router's materializer and
    /// navigator.
    pub fn link<I>(&self, props: Props, children: I) -> Result<H::Node, MaterializeError>
    where
        I: IntoIterator<Item = Child<H::Node>>,
    {
        link(&self.shared.materializer, &self.shared.navigator, props, children)
    }
}

impl<H: Host, V: Navigator + fmt::Debug> fmt::Debug for Router<H, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("state", &self.state())
            .field("navigator", &self.shared.navigator)
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}
