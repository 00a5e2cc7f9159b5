//! Scripted in-memory `HeroApi` for view tests

use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Semaphore;

use crate::api::{ApiError, HeroApi};
use crate::hero::Hero;

pub struct FakeApi {
    heroes: Mutex<Vec<Hero>>,
    failure: Mutex<Option<ApiError>>,
    /// When set, calls wait for a permit before answering
    gate: Option<Arc<Semaphore>>,
    /// Only `list` waits on the gate
    gate_list_only: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(heroes: Vec<Hero>) -> Self {
        Self {
            heroes: Mutex::new(heroes),
            failure: Mutex::new(None),
            gate: None,
            gate_list_only: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls block until the returned semaphore gets permits
    pub fn gated(heroes: Vec<Hero>) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let mut api = Self::new(heroes);
        api.gate = Some(gate.clone());
        (api, gate)
    }

    /// Only `list` calls block; `list` reads the store when issued, so a
    /// held list answers with the data as it was before later writes
    pub fn gated_list(heroes: Vec<Hero>) -> (Self, Arc<Semaphore>) {
        let (mut api, gate) = Self::gated(heroes);
        api.gate_list_only = true;
        (api, gate)
    }

    /// Every following call fails with `error`
    pub fn fail_with(&self, error: ApiError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Vec<Hero> {
        self.heroes.lock().unwrap().clone()
    }

    async fn enter(&self, call: String) -> Result<(), ApiError> {
        let waits = !self.gate_list_only || call == "list";
        self.calls.lock().unwrap().push(call);
        if let Some(gate) = self.gate.as_ref().filter(|_| waits) {
            gate.acquire().await.expect("gate closed").forget();
        }
        match self.failure.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl HeroApi for FakeApi {
    fn list(&self) -> BoxFuture<'_, Result<Vec<Hero>, ApiError>> {
        async move {
            let heroes = self.stored();
            self.enter("list".into()).await?;
            Ok(heroes)
        }
        .boxed()
    }

    fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Hero, ApiError>> {
        async move {
            self.enter(format!("get {id}")).await?;
            self.stored()
                .into_iter()
                .find(|h| h.id == id)
                .ok_or(ApiError::NotFound)
        }
        .boxed()
    }

    fn create<'a>(&'a self, hero: &'a Hero) -> BoxFuture<'a, Result<Hero, ApiError>> {
        async move {
            self.enter(format!("create {}", hero.id)).await?;
            self.heroes.lock().unwrap().push(hero.clone());
            Ok(hero.clone())
        }
        .boxed()
    }

    fn update<'a>(&'a self, hero: &'a Hero) -> BoxFuture<'a, Result<Hero, ApiError>> {
        async move {
            self.enter(format!("update {}", hero.id)).await?;
            let mut heroes = self.heroes.lock().unwrap();
            let slot = heroes
                .iter_mut()
                .find(|h| h.id == hero.id)
                .ok_or(ApiError::NotFound)?;
            *slot = hero.clone();
            Ok(hero.clone())
        }
        .boxed()
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<(), ApiError>> {
        async move {
            self.enter(format!("delete {id}")).await?;
            let mut heroes = self.heroes.lock().unwrap();
            let before = heroes.len();
            heroes.retain(|h| h.id != id);
            if heroes.len() == before {
                return Err(ApiError::NotFound);
            }
            Ok(())
        }
        .boxed()
    }
}
