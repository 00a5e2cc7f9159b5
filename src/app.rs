// App module - wires config, tracker, notifications and gateway into the views
//
// Each hero command drives one view the way a page would: activate, feed input,
// read state, render. Failures the pipeline already reported as notifications
// end the command with `Status::Failed`; everything else propagates as an error.

use anyhow::Result;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use crate::api::{HeroApi, HeroesClient, RequestPipeline};
use crate::cli::{self, Commands, HeroFields};
use crate::config::Config;
use crate::hero::Hero;
use crate::notify::{NotificationCenter, Toast};
use crate::tracker::LoadingTracker;
use crate::views::{
    Confirm, DeleteOutcome, DetailView, Field, FormView, ListView, Route, SubmitOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Done,
    Failed,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Done => ExitCode::SUCCESS,
            Status::Failed => ExitCode::FAILURE,
        }
    }
}

pub struct App {
    api: Arc<dyn HeroApi>,
    tracker: Arc<LoadingTracker>,
    notifications: Arc<NotificationCenter>,
}

impl App {
    pub fn new(api_url: &str, config: &Config) -> Result<Self> {
        let tracker = Arc::new(LoadingTracker::new());
        let notifications = Arc::new(NotificationCenter::new(config.notifications.durations()));
        let pipeline = RequestPipeline::new(tracker.clone(), notifications.clone());
        let client = HeroesClient::new(api_url, pipeline)?;

        Ok(Self {
            api: Arc::new(client),
            tracker,
            notifications,
        })
    }

    /// Take every notification raised so far
    pub fn drain_notifications(&self) -> Vec<Toast> {
        self.notifications.drain()
    }

    /// Show "Loading..." on an interactive stderr while requests are in flight
    pub fn spawn_busy_indicator(&self) {
        if !std::io::stderr().is_terminal() {
            return;
        }

        let mut busy = self.tracker.subscribe();
        tokio::spawn(async move {
            while busy.changed().await.is_ok() {
                if *busy.borrow_and_update() {
                    eprint!("Loading...\r");
                } else {
                    eprint!("          \r");
                }
                let _ = std::io::stderr().flush();
            }
        });
    }

    /// Run a hero command; `config` and `serve` are handled by the caller
    pub async fn execute(&self, command: Commands, out: &mut impl Write) -> Result<Status> {
        match command {
            Commands::List { search } => self.list(search.as_deref(), out).await,
            Commands::Show { id } => self.show(Some(&id), out).await,
            Commands::Open { path } => self.open(&path, out).await,
            Commands::Create { id, fields } => self.create(id.as_deref(), &fields, out).await,
            Commands::Edit { id, fields } => self.edit(&id, &fields, out).await,
            Commands::Delete { id, yes } => {
                if yes {
                    self.delete(&id, &|_: &str| true, out).await
                } else {
                    self.delete(&id, &cli::ask_stdin, out).await
                }
            }
            Commands::Serve { .. } | Commands::Config { .. } => {
                anyhow::bail!("not a hero command")
            }
        }
    }

    pub async fn list(&self, search: Option<&str>, out: &mut impl Write) -> Result<Status> {
        let view = ListView::new(self.api.clone());
        view.activate().await?;
        view.set_search(search.unwrap_or_default());

        let state = view.state();
        if state.error.is_some() {
            return Ok(Status::Failed);
        }

        let heroes = view.filtered();
        for hero in &heroes {
            writeln!(out, "{}", render_row(hero))?;
        }
        writeln!(out, "{} of {} heroes", heroes.len(), state.heroes.len())?;
        Ok(Status::Done)
    }

    pub async fn show(&self, id: Option<&str>, out: &mut impl Write) -> Result<Status> {
        let view = DetailView::new(self.api.clone());
        if let Some(load) = view.navigate(id) {
            load.await?;
        }

        let state = view.state();
        match (state.hero, state.error) {
            (Some(hero), _) => {
                write!(out, "{}", render_hero(&hero))?;
                Ok(Status::Done)
            }
            (None, Some(error)) if state.id.is_none() => {
                // Never reached the backend, so nothing was notified
                writeln!(out, "{error}")?;
                Ok(Status::Failed)
            }
            _ => Ok(Status::Failed),
        }
    }

    /// Resolve an app path and render the page it lands on
    pub async fn open(&self, path: &str, out: &mut impl Write) -> Result<Status> {
        let route = Route::parse(path);
        tracing::debug!("Resolved {} to {}", path, route);

        match &route {
            Route::List => self.list(None, out).await,
            Route::Detail(id) => self.show(Some(id), out).await,
            Route::Create | Route::Edit(_) => {
                let form = FormView::for_route(self.api.clone(), &route);
                if let Some(load) = form.activate() {
                    load.await?;
                }
                if form.state().load_error.is_some() {
                    return Ok(Status::Failed);
                }
                write!(out, "{}", render_form(&form))?;
                Ok(Status::Done)
            }
        }
    }

    pub async fn create(
        &self,
        id: Option<&str>,
        fields: &HeroFields,
        out: &mut impl Write,
    ) -> Result<Status> {
        let form = FormView::new(self.api.clone(), None);
        form.activate();

        if let Some(id) = id {
            form.set(Field::Id, id);
        }
        for (field, value) in fields.values() {
            form.set(field, value);
        }

        self.submit(&form, out).await
    }

    /// Without field flags this only shows the pre-filled form
    pub async fn edit(&self, id: &str, fields: &HeroFields, out: &mut impl Write) -> Result<Status> {
        let form = FormView::new(self.api.clone(), Some(id));
        if let Some(load) = form.activate() {
            load.await?;
        }
        if form.state().load_error.is_some() {
            return Ok(Status::Failed);
        }

        let values = fields.values();
        if values.is_empty() {
            write!(out, "{}", render_form(&form))?;
            return Ok(Status::Done);
        }
        for (field, value) in values {
            form.set(field, value);
        }

        self.submit(&form, out).await
    }

    async fn submit(&self, form: &FormView, out: &mut impl Write) -> Result<Status> {
        match form.submit().await {
            SubmitOutcome::Saved(route) => {
                writeln!(out, "{} saved", route.id().unwrap_or_default())?;
                self.show(route.id(), out).await
            }
            SubmitOutcome::Invalid(errors) => {
                writeln!(out, "{}: fix the following fields", form.title())?;
                for (field, error) in errors.iter() {
                    writeln!(out, "  {}: {}", field.name(), error)?;
                }
                Ok(Status::Failed)
            }
            SubmitOutcome::Failed(_) | SubmitOutcome::Ignored => Ok(Status::Failed),
        }
    }

    pub async fn delete(
        &self,
        id: &str,
        confirm: &dyn Confirm,
        out: &mut impl Write,
    ) -> Result<Status> {
        let view = ListView::new(self.api.clone());
        // Loaded first so the prompt can name the hero
        view.activate().await?;

        match view.delete(id, confirm).await {
            DeleteOutcome::Deleted => {
                writeln!(out, "{id} deleted")?;
                Ok(Status::Done)
            }
            DeleteOutcome::Cancelled => {
                writeln!(out, "Cancelled")?;
                Ok(Status::Done)
            }
            DeleteOutcome::Failed(_) => Ok(Status::Failed),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

pub fn render_row(hero: &Hero) -> String {
    format!("{:<20} {}", hero.id, hero.summary())
}

pub fn render_hero(hero: &Hero) -> String {
    let mut text = format!("{} ({})\n", hero.superhero, hero.id);
    text.push_str(&format!("  Alter ego:         {}\n", hero.alter_ego));
    text.push_str(&format!("  Publisher:         {}\n", hero.publisher));
    text.push_str(&format!("  First appearance:  {}\n", hero.first_appearance));
    text.push_str(&format!("  Image:             {}\n", hero.img));
    if let Some(alt) = &hero.alt_img {
        text.push_str(&format!("  Alternate image:   {alt}\n"));
    }
    text
}

pub fn render_form(form: &FormView) -> String {
    let mut text = format!("{}\n", form.title());
    for field in Field::ALL {
        let lock = if form.is_disabled(field) { " (locked)" } else { "" };
        text.push_str(&format!("  {:<17} {}{}\n", field.name(), form.value(field), lock));
        if let Some(error) = form.field_error(field) {
            text.push_str(&format!("    ! {error}\n"));
        }
    }
    text.push_str(&format!("[{}]\n", form.submit_label()));
    text
}
