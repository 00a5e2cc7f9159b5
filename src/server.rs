//! Demo REST backend for the `/heroes` resource
//!
//! An in-memory stand-in for the real backend, useful for trying the client
//! without any external service. Records keep insertion order.
//!
//! | Method | Path          | Success                 | Failure              |
//! |--------|---------------|-------------------------|----------------------|
//! | GET    | /heroes       | 200 + array             |                      |
//! | GET    | /heroes/:id   | 200 + hero              | 404                  |
//! | POST   | /heroes       | 201 + hero              | 400 duplicate id     |
//! | PUT    | /heroes/:id   | 200 + hero (id forced)  | 404                  |
//! | DELETE | /heroes/:id   | 200, empty body         | 404                  |

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::hero::Hero;

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
pub enum StoreError {
    NotFound(String),
    Duplicate(String),
}

impl StoreError {
    fn message(&self) -> String {
        match self {
            StoreError::NotFound(id) => format!("Hero with id '{id}' not found"),
            StoreError::Duplicate(id) => format!("Hero with id '{id}' already exists"),
        }
    }
}

/// Shared ordered collection of heroes
#[derive(Clone, Default)]
pub struct HeroStore {
    heroes: Arc<RwLock<Vec<Hero>>>,
}

impl HeroStore {
    pub fn new(heroes: Vec<Hero>) -> Self {
        Self {
            heroes: Arc::new(RwLock::new(heroes)),
        }
    }

    /// Store pre-filled with sample heroes
    pub fn seeded() -> Self {
        Self::new(seed_heroes())
    }

    pub async fn list(&self) -> Vec<Hero> {
        self.heroes.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Result<Hero, StoreError> {
        self.heroes
            .read()
            .await
            .iter()
            .find(|h| h.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn insert(&self, hero: Hero) -> Result<Hero, StoreError> {
        let mut heroes = self.heroes.write().await;
        if heroes.iter().any(|h| h.id == hero.id) {
            return Err(StoreError::Duplicate(hero.id));
        }
        heroes.push(hero.clone());
        Ok(hero)
    }

    /// Full replacement; the stored id is always the path id
    pub async fn replace(&self, id: &str, mut hero: Hero) -> Result<Hero, StoreError> {
        let mut heroes = self.heroes.write().await;
        let slot = heroes
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        hero.id = id.to_string();
        *slot = hero.clone();
        Ok(hero)
    }

    pub async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut heroes = self.heroes.write().await;
        let before = heroes.len();
        heroes.retain(|h| h.id != id);
        if heroes.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP layer
// ─────────────────────────────────────────────────────────────────────────────

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Duplicate(_) => StatusCode::BAD_REQUEST,
        };
        let message = self.message();

        tracing::info!("Demo backend: {} - {}", status, message);

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

async fn list_heroes(State(store): State<HeroStore>) -> Json<Vec<Hero>> {
    Json(store.list().await)
}

async fn get_hero(
    State(store): State<HeroStore>,
    Path(id): Path<String>,
) -> Result<Json<Hero>, StoreError> {
    store.get(&id).await.map(Json)
}

async fn create_hero(
    State(store): State<HeroStore>,
    Json(hero): Json<Hero>,
) -> Result<(StatusCode, Json<Hero>), StoreError> {
    let hero = store.insert(hero).await?;
    tracing::info!("Demo backend: created {}", hero.id);
    Ok((StatusCode::CREATED, Json(hero)))
}

async fn update_hero(
    State(store): State<HeroStore>,
    Path(id): Path<String>,
    Json(hero): Json<Hero>,
) -> Result<Json<Hero>, StoreError> {
    let hero = store.replace(&id, hero).await?;
    tracing::info!("Demo backend: updated {}", hero.id);
    Ok(Json(hero))
}

async fn delete_hero(
    State(store): State<HeroStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, StoreError> {
    store.remove(&id).await?;
    tracing::info!("Demo backend: deleted {}", id);
    Ok(StatusCode::OK)
}

pub fn router(store: HeroStore) -> Router {
    Router::new()
        .route("/heroes", get(list_heroes).post(create_hero))
        .route(
            "/heroes/:id",
            get(get_hero).put(update_hero).delete(delete_hero),
        )
        .with_state(store)
}

/// Serve the demo backend until Ctrl+C
pub async fn serve(bind_addr: SocketAddr, store: HeroStore) -> Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;

    tracing::info!("Demo backend listening on http://{}", bind_addr);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
        .context("Server error")?;

    tracing::info!("Demo backend shut down");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Seed data
// ─────────────────────────────────────────────────────────────────────────────

fn seed_heroes() -> Vec<Hero> {
    let seed = [
        ("dc-batman", "Batman", "DC Comics", "Bruce Wayne", "Detective Comics #27"),
        ("dc-superman", "Superman", "DC Comics", "Kal-El", "Action Comics #1"),
        ("dc-flash", "Flash", "DC Comics", "Jay Garrick", "Flash Comics #1"),
        ("dc-wonder", "Wonder Woman", "DC Comics", "Princess Diana", "All Star Comics #8"),
        ("dc-arrow", "Green Arrow", "DC Comics", "Oliver Queen", "More Fun Comics #73"),
        ("marvel-spider", "Spider Man", "Marvel Comics", "Peter Parker", "Amazing Fantasy #15"),
        ("marvel-captain", "Captain America", "Marvel Comics", "Steve Rogers", "Captain America Comics #1"),
        ("marvel-iron", "Iron Man", "Marvel Comics", "Tony Stark", "Tales of Suspense #39"),
        ("marvel-thor", "Thor", "Marvel Comics", "Thor Odinson", "Journey into Mystery #83"),
        ("marvel-wolverine", "Wolverine", "Marvel Comics", "James Howlett", "The Incredible Hulk #180"),
    ];

    seed.into_iter()
        .map(|(id, superhero, publisher, alter_ego, first_appearance)| Hero {
            id: id.to_string(),
            superhero: superhero.to_string(),
            publisher: publisher.to_string(),
            alter_ego: alter_ego.to_string(),
            first_appearance: first_appearance.to_string(),
            img: format!("assets/heroes/{id}.jpg"),
            alt_img: None,
        })
        .collect()
}
