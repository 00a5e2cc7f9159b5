//! Hero create/edit form
//!
//! Mode is derived from the route: an id means edit, no id means create. In
//! edit mode the existing hero is fetched and pre-fills every field; `id` is
//! then locked. Validation runs before any network call.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use tokio::task::JoinHandle;

use super::{Route, ViewCell};
use crate::api::HeroApi;
use crate::hero::Hero;

const MIN_NAME_LEN: usize = 2;

fn id_pattern() -> &'static Regex {
    static ID_PATTERN: OnceLock<Regex> = OnceLock::new();
    ID_PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("id pattern is valid"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Fields and validation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Superhero,
    Publisher,
    AlterEgo,
    FirstAppearance,
    Img,
    AltImg,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::Superhero,
        Field::Publisher,
        Field::AlterEgo,
        Field::FirstAppearance,
        Field::Img,
        Field::AltImg,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Superhero => "superhero",
            Field::Publisher => "publisher",
            Field::AlterEgo => "alter_ego",
            Field::FirstAppearance => "first_appearance",
            Field::Img => "img",
            Field::AltImg => "alt_img",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength(usize),
    Pattern,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str("This field is required"),
            FieldError::MinLength(n) => write!(f, "Minimum {n} characters"),
            FieldError::Pattern => {
                f.write_str("Only lowercase letters, numbers and hyphens are allowed")
            }
        }
    }
}

/// Failed fields, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<(Field, FieldError)>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, e)| *e)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Field, FieldError)> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, error)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.name(), error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Raw input values; `alt_img` empty means null
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroForm {
    pub id: String,
    pub superhero: String,
    pub publisher: String,
    pub alter_ego: String,
    pub first_appearance: String,
    pub img: String,
    pub alt_img: String,
}

impl HeroForm {
    pub fn from_hero(hero: &Hero) -> Self {
        Self {
            id: hero.id.clone(),
            superhero: hero.superhero.clone(),
            publisher: hero.publisher.clone(),
            alter_ego: hero.alter_ego.clone(),
            first_appearance: hero.first_appearance.clone(),
            img: hero.img.clone(),
            alt_img: hero.alt_img.clone().unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Superhero => &self.superhero,
            Field::Publisher => &self.publisher,
            Field::AlterEgo => &self.alter_ego,
            Field::FirstAppearance => &self.first_appearance,
            Field::Img => &self.img,
            Field::AltImg => &self.alt_img,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Id => &mut self.id,
            Field::Superhero => &mut self.superhero,
            Field::Publisher => &mut self.publisher,
            Field::AlterEgo => &mut self.alter_ego,
            Field::FirstAppearance => &mut self.first_appearance,
            Field::Img => &mut self.img,
            Field::AltImg => &mut self.alt_img,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    pub fn check(&self, field: Field, mode: FormMode) -> Option<FieldError> {
        let value = self.get(field);
        match field {
            // Locked in edit mode, never revalidated there
            Field::Id if mode == FormMode::Edit => None,
            Field::Id if value.is_empty() => Some(FieldError::Required),
            Field::Id if !id_pattern().is_match(value) => Some(FieldError::Pattern),
            Field::Superhero | Field::AlterEgo if value.is_empty() => Some(FieldError::Required),
            Field::Superhero | Field::AlterEgo if value.chars().count() < MIN_NAME_LEN => {
                Some(FieldError::MinLength(MIN_NAME_LEN))
            }
            Field::Publisher | Field::FirstAppearance | Field::Img if value.is_empty() => {
                Some(FieldError::Required)
            }
            _ => None,
        }
    }

    pub fn validate(&self, mode: FormMode) -> ValidationErrors {
        ValidationErrors(
            Field::ALL
                .iter()
                .filter_map(|&field| self.check(field, mode).map(|e| (field, e)))
                .collect(),
        )
    }

    pub fn to_hero(&self) -> Hero {
        Hero {
            id: self.id.clone(),
            superhero: self.superhero.clone(),
            publisher: self.publisher.clone(),
            alter_ego: self.alter_ego.clone(),
            first_appearance: self.first_appearance.clone(),
            img: self.img.clone(),
            alt_img: Some(self.alt_img.clone()).filter(|s| !s.is_empty()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// View
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub form: HeroForm,
    pub touched: BTreeSet<Field>,
    /// Edit mode: existing hero still loading
    pub loading: bool,
    pub load_error: Option<String>,
    pub submitting: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submission is already pending
    Ignored,
    /// Rejected before any network call; all fields are now touched
    Invalid(ValidationErrors),
    /// Saved; navigate here
    Saved(Route),
    /// Backend failure; still on the form
    Failed(String),
}

pub struct FormView {
    api: Arc<dyn HeroApi>,
    /// Route id; its presence is what makes this an edit form
    id: Option<String>,
    cell: ViewCell<FormState>,
}

impl FormView {
    pub fn new(api: Arc<dyn HeroApi>, id: Option<&str>) -> Self {
        let id = id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Self {
            api,
            id,
            cell: ViewCell::new(FormState::default()),
        }
    }

    /// Form for a route: edit for `/heroes/edit/{id}`, create otherwise
    pub fn for_route(api: Arc<dyn HeroApi>, route: &Route) -> Self {
        match route {
            Route::Edit(id) => Self::new(api, Some(id)),
            _ => Self::new(api, None),
        }
    }

    pub fn mode(&self) -> FormMode {
        if self.id.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => "New Hero",
            FormMode::Edit => "Edit Hero",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode() {
            FormMode::Create => "Create Hero",
            FormMode::Edit => "Update Hero",
        }
    }

    /// Activate; in edit mode this fetches the hero to pre-fill the form
    pub fn activate(&self) -> Option<JoinHandle<()>> {
        let Some(id) = self.id.clone() else {
            self.cell.activate(|_| {});
            return None;
        };

        let ticket = self.cell.activate(|state| {
            state.loading = true;
            state.load_error = None;
        });

        let api = self.api.clone();
        let cell = self.cell.clone();

        Some(tokio::spawn(async move {
            let result = api.get(&id).await;
            cell.apply(ticket, |state| {
                state.loading = false;
                match result {
                    Ok(hero) => {
                        // Input typed while the fetch was pending wins
                        let loaded = HeroForm::from_hero(&hero);
                        for field in Field::ALL {
                            if !state.touched.contains(&field) {
                                state.form.set(field, loaded.get(field));
                            }
                        }
                    }
                    Err(e) => state.load_error = Some(e.to_string()),
                }
            });
        }))
    }

    pub fn deactivate(&self) {
        self.cell.deactivate();
    }

    pub fn is_disabled(&self, field: Field) -> bool {
        field == Field::Id && self.mode() == FormMode::Edit
    }

    /// User input; returns false for a disabled field
    pub fn set(&self, field: Field, value: impl Into<String>) -> bool {
        if self.is_disabled(field) {
            return false;
        }
        let value = value.into();
        self.cell.update(|state| {
            state.form.set(field, value);
            state.touched.insert(field);
        });
        true
    }

    pub fn state(&self) -> FormState {
        self.cell.snapshot()
    }

    pub fn value(&self, field: Field) -> String {
        self.cell.with(|state| state.form.get(field).to_string())
    }

    /// Error to display for a field; only once the field is touched
    pub fn field_error(&self, field: Field) -> Option<FieldError> {
        let mode = self.mode();
        self.cell.with(|state| {
            if state.touched.contains(&field) {
                state.form.check(field, mode)
            } else {
                None
            }
        })
    }

    pub fn submit_allowed(&self) -> bool {
        let mode = self.mode();
        self.cell
            .with(|state| !state.submitting && state.form.validate(mode).is_empty())
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let mode = self.mode();

        let prepared = self.cell.update(|state| {
            if state.submitting {
                return Err(SubmitOutcome::Ignored);
            }
            let errors = state.form.validate(mode);
            if !errors.is_empty() {
                state.touched.extend(Field::ALL);
                return Err(SubmitOutcome::Invalid(errors));
            }
            state.submitting = true;
            Ok(state.form.to_hero())
        });

        let mut hero = match prepared {
            Ok(hero) => hero,
            Err(outcome) => return outcome,
        };
        let _pending = SubmitGuard {
            cell: self.cell.clone(),
        };

        let result = match (&self.id, mode) {
            (Some(id), FormMode::Edit) => {
                hero.id = id.clone();
                self.api.update(&hero).await
            }
            _ => self.api.create(&hero).await,
        };

        match result {
            Ok(saved) => {
                tracing::info!("Saved hero {}", saved.id);
                SubmitOutcome::Saved(Route::Detail(saved.id))
            }
            Err(e) => SubmitOutcome::Failed(e.to_string()),
        }
    }

    pub fn cancel(&self) -> Route {
        Route::List
    }
}

/// Clears `submitting` when the submission ends, including when the submit
/// future is dropped mid-request
struct SubmitGuard {
    cell: ViewCell<FormState>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.cell.update(|state| state.submitting = false);
    }
}
