use crate::{
    error::{CatalogError, CatalogResult},
    logger::Logger,
    models::{Actor, ActorId, Movie, MovieId, SortKey},
    store::Store,
};

pub async fn load_movie(store: &dyn Store, logger: &dyn Logger, id: MovieId) -> CatalogResult<Movie> {
    let mut movie = store.find_movie(id).await?.ok_or(CatalogError::MovieNotFound(id))?;
    movie.actors = actors_of(store, logger, id).await;
    Ok(movie)
}

pub async fn list_movies(
    store: &dyn Store,
    logger: &dyn Logger,
    sort: SortKey,
) -> CatalogResult<Vec<Movie>> {
    let movies = store.list_movies(sort).await?;
    with_actors(store, logger, movies).await
}

// `%` and `_` in the pattern act as LIKE wildcards.
pub async fn search_movies(
    store: &dyn Store,
    logger: &dyn Logger,
    pattern: &str,
) -> CatalogResult<Vec<Movie>> {
    let movies = store.search_movies(pattern).await?;
    with_actors(store, logger, movies).await
}

pub async fn load_actor(store: &dyn Store, logger: &dyn Logger, id: ActorId) -> CatalogResult<Actor> {
    let mut actor = store.find_actor(id).await?.ok_or(CatalogError::ActorNotFound(id))?;
    actor.movies = movies_of(store, logger, id).await;
    Ok(actor)
}

pub async fn list_actors(store: &dyn Store, logger: &dyn Logger) -> CatalogResult<Vec<Actor>> {
    let mut actors = store.list_actors().await?;
    for actor in &mut actors {
        actor.movies = movies_of(store, logger, actor.id).await;
    }
    Ok(actors)
}

async fn with_actors(
    store: &dyn Store,
    logger: &dyn Logger,
    mut movies: Vec<Movie>,
) -> CatalogResult<Vec<Movie>> {
    for movie in &mut movies {
        movie.actors = actors_of(store, logger, movie.id).await;
    }
    Ok(movies)
}

async fn actors_of(store: &dyn Store, logger: &dyn Logger, movie_id: MovieId) -> Vec<Actor> {
    store.movie_actors(movie_id).await.unwrap_or_else(|err| {
        logger.error(&format!("loading actors of movie {movie_id}: {err}"));
        Vec::new()
    })
}

async fn movies_of(store: &dyn Store, logger: &dyn Logger, actor_id: ActorId) -> Vec<Movie> {
    store.actor_movies(actor_id).await.unwrap_or_else(|err| {
        logger.error(&format!("loading movies of actor {actor_id}: {err}"));
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mockall::predicate::eq;

    use super::*;
    use crate::{
        logger::testing::RecordingLogger,
        models::Gender,
        store::{MockStore, StoreError},
    };

    fn db_down() -> StoreError {
        StoreError::Database(sea_orm::DbErr::Custom("timeout".into()))
    }

    fn movie(id: MovieId) -> Movie {
        Movie {
            id,
            title: format!("Movie{id}"),
            description: String::new(),
            release_date: Timestamp::UNIX_EPOCH,
            rating: 5.0,
            actors: vec![],
        }
    }

    fn actor(id: ActorId) -> Actor {
        Actor {
            id,
            first_name: format!("Actor{id}"),
            second_name: "Doe".to_string(),
            gender: Gender::Female,
            movies: vec![],
        }
    }

    #[tokio::test]
    async fn missing_movie_is_not_found() {
        let mut store = MockStore::new();
        store.expect_find_movie().returning(|_| Ok(None));
        store.expect_movie_actors().never();

        let logger = RecordingLogger::default();
        let err = load_movie(&store, &logger, 12).await.unwrap_err();
        assert!(matches!(err, CatalogError::MovieNotFound(12)));
    }

    #[tokio::test]
    async fn secondary_fetch_failure_yields_empty_actors() {
        let mut store = MockStore::new();
        store.expect_find_movie().returning(|id| Ok(Some(movie(id))));
        store.expect_movie_actors().returning(|_| Err(db_down()));

        let logger = RecordingLogger::default();
        let loaded = load_movie(&store, &logger, 1).await.unwrap();
        assert!(loaded.actors.is_empty());
        assert_eq!(logger.errors().len(), 1);
    }

    #[tokio::test]
    async fn primary_fetch_failure_propagates() {
        let mut store = MockStore::new();
        store.expect_find_actor().returning(|_| Err(db_down()));

        let logger = RecordingLogger::default();
        let err = load_actor(&store, &logger, 1).await.unwrap_err();
        assert!(matches!(err, CatalogError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn list_passes_sort_key_through() {
        let mut store = MockStore::new();
        store
            .expect_list_movies()
            .with(eq(SortKey::Rating))
            .times(1)
            .returning(|_| Ok(vec![movie(2), movie(1)]));
        store.expect_movie_actors().returning(|id| Ok(vec![actor(id + 10)]));

        let logger = RecordingLogger::default();
        let movies = list_movies(&store, &logger, SortKey::Rating).await.unwrap();
        let ids: Vec<_> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(movies[0].actors[0].id, 12);
    }

    #[tokio::test]
    async fn search_pattern_is_passed_verbatim() {
        let mut store = MockStore::new();
        store
            .expect_search_movies()
            .withf(|p: &str| p == "50%_off")
            .times(1)
            .returning(|_| Ok(vec![movie(3)]));
        store.expect_movie_actors().returning(|_| Ok(vec![]));

        let logger = RecordingLogger::default();
        let found = search_movies(&store, &logger, "50%_off").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn actor_list_tolerates_per_actor_failures() {
        let mut store = MockStore::new();
        store.expect_list_actors().returning(|| Ok(vec![actor(1), actor(2)]));
        store.expect_actor_movies().with(eq(1)).returning(|_| Err(db_down()));
        store.expect_actor_movies().with(eq(2)).returning(|_| Ok(vec![movie(9)]));

        let logger = RecordingLogger::default();
        let actors = list_actors(&store, &logger).await.unwrap();
        assert!(actors[0].movies.is_empty());
        assert_eq!(actors[1].movies[0].id, 9);
    }
}
