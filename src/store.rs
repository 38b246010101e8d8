use async_trait::async_trait;

use crate::models::{Actor, ActorDraft, ActorId, Movie, MovieDraft, MovieId, Role, SortKey, UserId};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// Lookups return `Ok(None)` for absent rows. Mutations return affected rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn user_role(&self, user_id: UserId) -> StoreResult<Option<Role>>;

    async fn insert_movie(&self, draft: &MovieDraft) -> StoreResult<MovieId>;
    async fn update_movie(&self, id: MovieId, draft: &MovieDraft) -> StoreResult<u64>;
    async fn delete_movie(&self, id: MovieId) -> StoreResult<u64>;
    async fn find_movie(&self, id: MovieId) -> StoreResult<Option<Movie>>;
    async fn list_movies(&self, sort: SortKey) -> StoreResult<Vec<Movie>>;
    async fn search_movies(&self, pattern: &str) -> StoreResult<Vec<Movie>>;
    async fn movie_actors(&self, movie_id: MovieId) -> StoreResult<Vec<Actor>>;

    async fn insert_actor(&self, draft: &ActorDraft) -> StoreResult<ActorId>;
    async fn update_actor(&self, id: ActorId, draft: &ActorDraft) -> StoreResult<u64>;
    async fn delete_actor(&self, id: ActorId) -> StoreResult<u64>;
    async fn find_actor(&self, id: ActorId) -> StoreResult<Option<Actor>>;
    async fn list_actors(&self) -> StoreResult<Vec<Actor>>;
    async fn actor_movies(&self, actor_id: ActorId) -> StoreResult<Vec<Movie>>;

    // Association rows
    async fn link(&self, movie_id: MovieId, actor_id: ActorId) -> StoreResult<()>;
    async fn unlink_movie(&self, movie_id: MovieId) -> StoreResult<u64>;
    async fn unlink_actor(&self, actor_id: ActorId) -> StoreResult<u64>;
}
