use std::sync::Arc;

use crate::{
    associations,
    error::{CatalogError, CatalogResult},
    gate,
    logger::Logger,
    models::{Actor, ActorDraft, ActorId, Movie, MovieDraft, MovieId, SortKey, UserId},
    queries,
    store::Store,
};

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
    logger: Arc<dyn Logger>,
}

impl Catalog {
    pub fn new(store: Arc<dyn Store>, logger: Arc<dyn Logger>) -> Self {
        Self { store, logger }
    }

    pub async fn create_movie(&self, user_id: UserId, draft: MovieDraft) -> CatalogResult<Movie> {
        let result = async {
            gate::authorize_write(self.store(), user_id).await?;
            gate::validate_movie(&draft)?;
            associations::create_movie(self.store(), self.logger(), &draft).await
        }
        .await;
        self.report("create movie", user_id, result)
    }

    pub async fn update_movie(
        &self,
        user_id: UserId,
        id: MovieId,
        draft: MovieDraft,
    ) -> CatalogResult<Movie> {
        let result = async {
            gate::authorize_write(self.store(), user_id).await?;
            gate::validate_movie(&draft)?;
            associations::update_movie(self.store(), self.logger(), id, &draft).await
        }
        .await;
        self.report("update movie", user_id, result)
    }

    pub async fn delete_movie(&self, user_id: UserId, id: MovieId) -> CatalogResult<()> {
        let result = async {
            gate::authorize_write(self.store(), user_id).await?;
            associations::delete_movie(self.store(), id).await
        }
        .await;
        self.report("delete movie", user_id, result)
    }

    pub async fn get_movie(&self, user_id: UserId, id: MovieId) -> CatalogResult<Movie> {
        let result = async {
            gate::authorize_read(self.store(), user_id).await?;
            queries::load_movie(self.store(), self.logger(), id).await
        }
        .await;
        self.report("get movie", user_id, result)
    }

    pub async fn list_movies(&self, user_id: UserId, sort: SortKey) -> CatalogResult<Vec<Movie>> {
        let result = async {
            gate::authorize_read(self.store(), user_id).await?;
            queries::list_movies(self.store(), self.logger(), sort).await
        }
        .await;
        self.report("list movies", user_id, result)
    }

    pub async fn search_movies(&self, user_id: UserId, pattern: &str) -> CatalogResult<Vec<Movie>> {
        let result = async {
            gate::authorize_read(self.store(), user_id).await?;
            queries::search_movies(self.store(), self.logger(), pattern).await
        }
        .await;
        self.report("search movies", user_id, result)
    }

    pub async fn create_actor(&self, user_id: UserId, draft: ActorDraft) -> CatalogResult<Actor> {
        let result = async {
            gate::authorize_write(self.store(), user_id).await?;
            let id = self.store.insert_actor(&draft).await?;
            queries::load_actor(self.store(), self.logger(), id).await
        }
        .await;
        self.report("create actor", user_id, result)
    }

    pub async fn update_actor(
        &self,
        user_id: UserId,
        id: ActorId,
        draft: ActorDraft,
    ) -> CatalogResult<Actor> {
        let result = async {
            gate::authorize_write(self.store(), user_id).await?;
            if self.store.update_actor(id, &draft).await? == 0 {
                return Err(CatalogError::ActorNotFound(id));
            }
            queries::load_actor(self.store(), self.logger(), id).await
        }
        .await;
        self.report("update actor", user_id, result)
    }

    pub async fn delete_actor(&self, user_id: UserId, id: ActorId) -> CatalogResult<()> {
        let result = async {
            gate::authorize_write(self.store(), user_id).await?;
            associations::delete_actor(self.store(), id).await
        }
        .await;
        self.report("delete actor", user_id, result)
    }

    pub async fn get_actor(&self, user_id: UserId, id: ActorId) -> CatalogResult<Actor> {
        let result = async {
            gate::authorize_read(self.store(), user_id).await?;
            queries::load_actor(self.store(), self.logger(), id).await
        }
        .await;
        self.report("get actor", user_id, result)
    }

    pub async fn list_actors(&self, user_id: UserId) -> CatalogResult<Vec<Actor>> {
        let result = async {
            gate::authorize_read(self.store(), user_id).await?;
            queries::list_actors(self.store(), self.logger()).await
        }
        .await;
        self.report("list actors", user_id, result)
    }

    fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    fn report<T>(&self, op: &str, user_id: UserId, result: CatalogResult<T>) -> CatalogResult<T> {
        if let Err(err) = &result {
            self.logger.error(&format!("{op} (user {user_id}): {err}"));
        }
        result
    }
}
