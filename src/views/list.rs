//! Hero list view
//!
//! State: loaded heroes, search term, loading flag, last error.
//! Derived: [`ListView::filtered`], recomputed on read from `heroes` + `search`.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::filter::filter_heroes;
use super::{Confirm, ViewCell};
use crate::api::HeroApi;
use crate::hero::Hero;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub heroes: Vec<Hero>,
    pub search: String,
    pub loading: bool,
    pub error: Option<String>,
    /// Ids deleted since the last activation; a load already in flight may
    /// still carry them
    deleted: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// User declined; nothing was sent
    Cancelled,
    Deleted,
    /// Backend refused or was unreachable; the hero stays listed
    Failed(String),
}

pub struct ListView {
    api: Arc<dyn HeroApi>,
    cell: ViewCell<ListState>,
}

impl ListView {
    pub fn new(api: Arc<dyn HeroApi>) -> Self {
        Self {
            api,
            cell: ViewCell::new(ListState::default()),
        }
    }

    /// Start (or restart) loading the full hero list
    pub fn activate(&self) -> JoinHandle<()> {
        let ticket = self.cell.activate(|state| {
            state.loading = true;
            state.error = None;
            state.deleted.clear();
        });

        let api = self.api.clone();
        let cell = self.cell.clone();

        tokio::spawn(async move {
            let result = api.list().await;
            let applied = cell.apply(ticket, |state| {
                state.loading = false;
                match result {
                    Ok(mut heroes) => {
                        heroes.retain(|h| !state.deleted.contains(&h.id));
                        tracing::debug!("Loaded {} heroes", heroes.len());
                        state.heroes = heroes;
                    }
                    Err(e) => state.error = Some(e.to_string()),
                }
            });
            if !applied {
                tracing::debug!("Discarded superseded hero list load");
            }
        })
    }

    /// Stop observing in-flight loads
    pub fn deactivate(&self) {
        self.cell.deactivate();
    }

    pub fn set_search(&self, term: impl Into<String>) {
        let term = term.into();
        self.cell.update(|state| state.search = term);
    }

    pub fn state(&self) -> ListState {
        self.cell.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.cell.with(|state| state.loading)
    }

    /// Heroes matching the current search term
    pub fn filtered(&self) -> Vec<Hero> {
        self.cell
            .with(|state| filter_heroes(&state.heroes, &state.search))
    }

    /// Delete after explicit confirmation
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> DeleteOutcome {
        let name = self.cell.with(|state| {
            state
                .heroes
                .iter()
                .find(|h| h.id == id)
                .map(|h| h.superhero.clone())
        });
        let prompt = match name {
            Some(name) => format!("Delete {name} ({id})? This cannot be undone."),
            None => format!("Delete hero {id}? This cannot be undone."),
        };

        if !confirm.confirm(&prompt) {
            tracing::debug!("Delete of {} cancelled", id);
            return DeleteOutcome::Cancelled;
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.cell.apply_if_active(|state| {
                    state.heroes.retain(|h| h.id != id);
                    state.deleted.insert(id.to_string());
                    state.error = None;
                });
                tracing::info!("Deleted hero {}", id);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                let message = e.to_string();
                self.cell
                    .apply_if_active(|state| state.error = Some(message.clone()));
                DeleteOutcome::Failed(message)
            }
        }
    }
}
