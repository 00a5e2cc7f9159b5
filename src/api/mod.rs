//! Hero data gateway
//!
//! Views talk to the backend through the object-safe [`HeroApi`] trait so they
//! can be driven by [`HeroesClient`] in the app and by fakes in tests. Every
//! `HeroesClient` call goes through the [`RequestPipeline`].
//!
//! No retries, no caching, no de-duplication: one invocation, one round trip.

use futures::future::BoxFuture;

use crate::hero::Hero;

mod client;
mod error;
mod pipeline;

pub use client::HeroesClient;
pub use error::ApiError;
pub use pipeline::RequestPipeline;

/// The five CRUD calls against the hero resource
pub trait HeroApi: Send + Sync {
    /// GET /heroes
    fn list(&self) -> BoxFuture<'_, Result<Vec<Hero>, ApiError>>;

    /// GET /heroes/{id}
    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Hero, ApiError>>;

    /// POST /heroes
    fn create<'a>(&'a self, hero: &'a Hero) -> BoxFuture<'a, Result<Hero, ApiError>>;

    /// PUT /heroes/{hero.id}, full replacement
    fn update<'a>(&'a self, hero: &'a Hero) -> BoxFuture<'a, Result<Hero, ApiError>>;

    /// DELETE /heroes/{id}
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), ApiError>>;
}
