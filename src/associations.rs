// No transaction here: concurrent updates of one movie may interleave their
// unlink/link statements.

use crate::{
    error::{CatalogError, CatalogResult},
    logger::Logger,
    models::{ActorId, Movie, MovieDraft, MovieId},
    queries,
    store::Store,
};

pub async fn ensure_actors_exist(store: &dyn Store, ids: &[ActorId]) -> CatalogResult<()> {
    for &id in ids {
        if store.find_actor(id).await?.is_none() {
            return Err(CatalogError::ActorNotFound(id));
        }
    }
    Ok(())
}

pub fn unique_ids(ids: &[ActorId]) -> Vec<ActorId> {
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

pub async fn create_movie(
    store: &dyn Store,
    logger: &dyn Logger,
    draft: &MovieDraft,
) -> CatalogResult<Movie> {
    let actor_ids = unique_ids(&draft.actor_ids);
    ensure_actors_exist(store, &actor_ids).await?;

    let movie_id = store.insert_movie(draft).await?;

    // Best effort: a failed link leaves the movie and the other links in place.
    for &actor_id in &actor_ids {
        if let Err(err) = store.link(movie_id, actor_id).await {
            logger.error(&format!("linking actor {actor_id} to movie {movie_id}: {err}"));
        }
    }

    queries::load_movie(store, logger, movie_id).await
}

pub async fn update_movie(
    store: &dyn Store,
    logger: &dyn Logger,
    id: MovieId,
    draft: &MovieDraft,
) -> CatalogResult<Movie> {
    let actor_ids = unique_ids(&draft.actor_ids);
    ensure_actors_exist(store, &actor_ids).await?;

    // The affected-row count is the only existence check for the movie.
    if store.update_movie(id, draft).await? == 0 {
        return Err(CatalogError::MovieNotFound(id));
    }

    store.unlink_movie(id).await?;
    for &actor_id in &actor_ids {
        store.link(id, actor_id).await?;
    }

    queries::load_movie(store, logger, id).await
}

pub async fn delete_movie(store: &dyn Store, id: MovieId) -> CatalogResult<()> {
    if store.delete_movie(id).await? == 0 {
        return Err(CatalogError::MovieNotFound(id));
    }
    store.unlink_movie(id).await?;
    Ok(())
}

pub async fn delete_actor(store: &dyn Store, id: ActorId) -> CatalogResult<()> {
    if store.delete_actor(id).await? == 0 {
        return Err(CatalogError::ActorNotFound(id));
    }
    store.unlink_actor(id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mockall::{Sequence, predicate::eq};

    use super::*;
    use crate::{
        logger::testing::RecordingLogger,
        models::{Actor, Gender},
        store::{MockStore, StoreError},
    };

    fn db_down() -> StoreError {
        StoreError::Database(sea_orm::DbErr::Custom("connection reset".into()))
    }

    fn draft(actor_ids: Vec<ActorId>) -> MovieDraft {
        MovieDraft {
            title: "Solaris".to_string(),
            description: String::new(),
            release_date: Timestamp::UNIX_EPOCH,
            rating: 8.0,
            actor_ids,
        }
    }

    fn actor(id: ActorId) -> Actor {
        Actor {
            id,
            first_name: format!("Actor{id}"),
            second_name: String::new(),
            gender: Gender::Unknown,
            movies: vec![],
        }
    }

    fn movie(id: MovieId) -> Movie {
        Movie {
            id,
            title: "Solaris".to_string(),
            description: String::new(),
            release_date: Timestamp::UNIX_EPOCH,
            rating: 8.0,
            actors: vec![],
        }
    }

    #[test]
    fn unique_ids_keeps_first_occurrence_order() {
        assert_eq!(unique_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(unique_ids(&[]).is_empty());
    }

    #[tokio::test]
    async fn actor_check_stops_at_first_missing_id() {
        let mut store = MockStore::new();
        let mut seq = Sequence::new();
        store
            .expect_find_actor()
            .with(eq(4))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(Some(actor(id))));
        store
            .expect_find_actor()
            .with(eq(9))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        // id 5 is never looked up and no movie is inserted.

        let logger = RecordingLogger::default();
        let err = create_movie(&store, &logger, &draft(vec![4, 9, 5])).await.unwrap_err();
        assert!(matches!(err, CatalogError::ActorNotFound(9)));
    }

    #[tokio::test]
    async fn failed_link_on_create_is_tolerated() {
        let mut store = MockStore::new();
        store.expect_find_actor().returning(|id| Ok(Some(actor(id))));
        store.expect_insert_movie().times(1).returning(|_| Ok(10));
        store.expect_link().with(eq(10), eq(1)).returning(|_, _| Err(db_down()));
        store.expect_link().with(eq(10), eq(2)).returning(|_, _| Ok(()));
        store.expect_find_movie().with(eq(10)).returning(|id| Ok(Some(movie(id))));
        store.expect_movie_actors().returning(|_| Ok(vec![actor(2)]));

        let logger = RecordingLogger::default();
        let created = create_movie(&store, &logger, &draft(vec![1, 2])).await.unwrap();

        assert_eq!(created.id, 10);
        assert_eq!(created.actors, vec![actor(2)]);
        let errors = logger.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("actor 1"));
    }

    #[tokio::test]
    async fn repeated_actor_ids_are_linked_once() {
        let mut store = MockStore::new();
        store.expect_find_actor().times(1).returning(|id| Ok(Some(actor(id))));
        store.expect_insert_movie().returning(|_| Ok(1));
        store.expect_link().times(1).returning(|_, _| Ok(()));
        store.expect_find_movie().returning(|id| Ok(Some(movie(id))));
        store.expect_movie_actors().returning(|_| Ok(vec![actor(6)]));

        let logger = RecordingLogger::default();
        create_movie(&store, &logger, &draft(vec![6, 6, 6])).await.unwrap();
    }

    #[tokio::test]
    async fn update_of_missing_movie_touches_no_links() {
        let mut store = MockStore::new();
        store.expect_find_actor().returning(|id| Ok(Some(actor(id))));
        store.expect_update_movie().returning(|_, _| Ok(0));

        let logger = RecordingLogger::default();
        let err = update_movie(&store, &logger, 77, &draft(vec![1])).await.unwrap_err();
        assert!(matches!(err, CatalogError::MovieNotFound(77)));
    }

    #[tokio::test]
    async fn update_replaces_links_in_order() {
        let mut store = MockStore::new();
        let mut seq = Sequence::new();
        store.expect_find_actor().returning(|id| Ok(Some(actor(id))));
        store
            .expect_update_movie()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(1));
        store
            .expect_unlink_movie()
            .with(eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));
        store
            .expect_link()
            .with(eq(5), eq(8))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        store.expect_find_movie().returning(|id| Ok(Some(movie(id))));
        store.expect_movie_actors().returning(|_| Ok(vec![actor(8)]));

        let logger = RecordingLogger::default();
        let updated = update_movie(&store, &logger, 5, &draft(vec![8])).await.unwrap();
        assert_eq!(updated.actors, vec![actor(8)]);
    }

    #[tokio::test]
    async fn update_with_empty_list_only_unlinks() {
        let mut store = MockStore::new();
        store.expect_update_movie().returning(|_, _| Ok(1));
        store.expect_unlink_movie().times(1).returning(|_| Ok(2));
        store.expect_link().never();
        store.expect_find_movie().returning(|id| Ok(Some(movie(id))));
        store.expect_movie_actors().returning(|_| Ok(vec![]));

        let logger = RecordingLogger::default();
        let updated = update_movie(&store, &logger, 5, &draft(vec![])).await.unwrap();
        assert!(updated.actors.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_cleanup_failure_without_undoing() {
        let mut store = MockStore::new();
        store.expect_delete_movie().times(1).returning(|_| Ok(1));
        store.expect_unlink_movie().times(1).returning(|_| Err(db_down()));
        // No re-insert of the movie is expected.

        let err = delete_movie(&store, 3).await.unwrap_err();
        assert!(matches!(err, CatalogError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn delete_of_missing_rows_is_not_found() {
        let mut store = MockStore::new();
        store.expect_delete_movie().returning(|_| Ok(0));
        store.expect_delete_actor().returning(|_| Ok(0));

        assert!(matches!(delete_movie(&store, 3).await, Err(CatalogError::MovieNotFound(3))));
        assert!(matches!(delete_actor(&store, 4).await, Err(CatalogError::ActorNotFound(4))));
    }
}
