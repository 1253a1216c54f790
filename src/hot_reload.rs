//! # Hot Reload
//!
//! Reloads the route table when its file changes, so handler docstrings can
//! be edited without restarting the documentation server.
//!
//! [`ReloadableRoutes`] keeps the current [`RouteTable`] behind an
//! [`ArcSwap`]; readers always see a complete table. A file that fails to
//! parse is logged and the previous table stays active.
//!
//! Reloading only changes what the next build sees. Documents already in the
//! cache are kept, so pair this with live-reload mode.
//!
//! ```rust,ignore
//! use pyrin_swagger::hot_reload::{watch_routes, ReloadableRoutes};
//! use std::sync::Arc;
//!
//! let routes = Arc::new(ReloadableRoutes::load("routes.yaml")?);
//! let _watcher = watch_routes(Arc::clone(&routes), |table| {
//!     println!("reloaded {} routes", table.len());
//! })?;
//! ```

use crate::route::{load_route_table, HandlerLookup, Route, RouteTable};
use crate::source::RouteSource;
use arc_swap::ArcSwap;
use http::Method;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// A route table that can be swapped while it is being read.
#[derive(Debug)]
pub struct ReloadableRoutes {
    path: PathBuf,
    table: ArcSwap<RouteTable>,
}

impl ReloadableRoutes {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let table = load_route_table(&path)?;
        Ok(Self {
            path,
            table: ArcSwap::from_pointee(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file. On failure the current table is kept.
    pub fn reload(&self) -> anyhow::Result<Arc<RouteTable>> {
        let table = Arc::new(load_route_table(&self.path)?);
        self.table.store(Arc::clone(&table));
        Ok(table)
    }

    pub fn current(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }
}

impl RouteSource for ReloadableRoutes {
    fn routes(&self) -> Vec<Route> {
        let table = self.table.load();
        RouteTable::routes(&table).to_vec()
    }

    fn handler_for(&self, route: &Route, verb: &Method) -> HandlerLookup {
        let table = self.table.load();
        RouteTable::handler_for(&table, route, verb)
    }

    fn snapshot(&self) -> Arc<dyn RouteSource> {
        self.table.load_full()
    }
}

/// Watch the route table file and reload it on every modification.
///
/// `on_reload` runs after each successful reload. The returned watcher must
/// be kept alive for watching to continue.
pub fn watch_routes<F>(routes: Arc<ReloadableRoutes>, mut on_reload: F) -> notify::Result<RecommendedWatcher>
where
    F: FnMut(&RouteTable) + Send + 'static,
{
    let watch_path = routes.path().to_path_buf();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    return;
                }
                match routes.reload() {
                    Ok(table) => {
                        info!(
                            path = %routes.path().display(),
                            routes = table.len(),
                            "hot-reload: route table reloaded"
                        );
                        on_reload(&table);
                    }
                    Err(e) => warn!(error = %format!("{e:#}"), "hot-reload: keeping previous route table"),
                }
            }
            Err(e) => error!(error = ?e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
