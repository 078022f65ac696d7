//! Hash router: resolves paths to templates and swaps the content region.
//!
//! A navigation is split in two. [`Router::prepare`] resolves the path and
//! marks the region busy; the returned [`Mutation::SwapStage`] goes through
//! the transition gate, and [`Router::commit`] performs the swap whenever the
//! gate releases it.

use crate::error::SurfaceError;
use crate::gate::Mutation;
use crate::platform::Stage;
use crate::routes::{RoutePath, RouteTable, TemplateId};

/// Outcome of committing a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swap {
    /// The template was mounted; a settle step is due on the next frame.
    Mounted,
    /// The template vanished before the swap ran; nothing changed.
    Aborted,
}

/// Route resolution and nav-link bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Router {
    table: RouteTable,
}

impl Router {
    /// Create a router over `table`.
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    /// The route table.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve `path` and mark the region busy.
    ///
    /// Returns `None` when the resolved template is missing from the
    /// document. The busy flag is then cleared unless `swap_in_flight`.
    pub fn prepare<S: Stage + ?Sized>(
        &self,
        path: &str,
        swap_in_flight: bool,
        stage: &mut S,
    ) -> Option<Mutation> {
        let resolved = self.table.resolve(path);
        if resolved.fell_back {
            tracing::debug!("Unknown path {path:?}, rendering {}", resolved.path);
        }
        if !stage.has_template(resolved.template) {
            tracing::debug!("Template {} missing, navigation aborted", resolved.template);
            if !swap_in_flight {
                stage.set_busy(false);
            }
            return None;
        }
        stage.set_busy(true);
        Some(Mutation::SwapStage {
            path: resolved.path.clone(),
            template: resolved.template.clone(),
        })
    }

    /// Swap the region to `template` and highlight the link for `path`.
    ///
    /// # Errors
    ///
    /// Propagates DOM failures other than a missing template; the busy flag
    /// is cleared first.
    pub fn commit<S: Stage + ?Sized>(
        &self,
        path: &RoutePath,
        template: &TemplateId,
        stage: &mut S,
    ) -> Result<Swap, SurfaceError> {
        match stage.mount(template) {
            Ok(()) => {}
            Err(SurfaceError::ElementNotFound(what)) => {
                tracing::debug!("Swap to {path} aborted, {what} not found");
                stage.set_busy(false);
                return Ok(Swap::Aborted);
            }
            Err(err) => {
                stage.set_busy(false);
                return Err(err);
            }
        }
        Self::highlight(stage, Some(&path.to_hash()));
        Ok(Swap::Mounted)
    }

    /// Mark exactly the first link targeting `href` active, all others inactive.
    pub fn highlight<S: Stage + ?Sized>(stage: &mut S, href: Option<&str>) {
        let links = stage.nav_links();
        let active = href.and_then(|href| links.iter().position(|link| link == href));
        for index in 0..links.len() {
            stage.set_link_active(index, Some(index) == active);
        }
    }
}
