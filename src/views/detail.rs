//! Hero detail view
//!
//! Resolves the hero named by the route id on activation and whenever the id
//! changes. A newer id supersedes any load still in flight for an older one.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::{Route, ViewCell};
use crate::api::HeroApi;
use crate::hero::Hero;

pub const MISSING_ID_MESSAGE: &str = "No hero id provided";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailState {
    pub id: Option<String>,
    pub loading: bool,
    pub hero: Option<Hero>,
    pub error: Option<String>,
}

pub struct DetailView {
    api: Arc<dyn HeroApi>,
    cell: ViewCell<DetailState>,
}

impl DetailView {
    pub fn new(api: Arc<dyn HeroApi>) -> Self {
        Self {
            api,
            cell: ViewCell::new(DetailState::default()),
        }
    }

    /// Point the view at `id`. Returns the load task, or `None` when nothing
    /// needs loading (same id as the active load, or no id at all).
    pub fn navigate(&self, id: Option<&str>) -> Option<JoinHandle<()>> {
        let id = id.map(str::trim).filter(|id| !id.is_empty());

        let unchanged = self.cell.is_active() && self.cell.with(|state| state.id.as_deref() == id);
        if unchanged {
            return None;
        }

        let Some(id) = id.map(str::to_string) else {
            self.cell.activate(|state| {
                *state = DetailState {
                    error: Some(MISSING_ID_MESSAGE.to_string()),
                    ..DetailState::default()
                };
            });
            return None;
        };

        let ticket = self.cell.activate(|state| {
            *state = DetailState {
                id: Some(id.clone()),
                loading: true,
                ..DetailState::default()
            };
        });

        let api = self.api.clone();
        let cell = self.cell.clone();

        Some(tokio::spawn(async move {
            let result = api.get(&id).await;
            let applied = cell.apply(ticket, |state| {
                state.loading = false;
                match result {
                    Ok(hero) => state.hero = Some(hero),
                    Err(e) => state.error = Some(e.to_string()),
                }
            });
            if !applied {
                tracing::debug!("Discarded superseded load of hero {}", id);
            }
        }))
    }

    pub fn deactivate(&self) {
        self.cell.deactivate();
    }

    pub fn state(&self) -> DetailState {
        self.cell.snapshot()
    }

    /// Return to the list; independent of the load outcome
    pub fn back(&self) -> Route {
        Route::List
    }
}
