use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, sea_query::Expr,
};

use crate::{
    entities::{actor, movie, movie_actor, user},
    models::{Actor, ActorDraft, ActorId, Movie, MovieDraft, MovieId, Role, SortKey, UserId},
    store::{Store, StoreError, StoreResult},
};

#[derive(Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for SqlStore {
    async fn user_role(&self, user_id: UserId) -> StoreResult<Option<Role>> {
        let Some(key) = key(user_id) else {
            return Ok(None);
        };
        let row = user::Entity::find_by_id(key).one(&self.db).await?;
        Ok(row.map(|u| Role::parse(&u.role)))
    }

    async fn insert_movie(&self, draft: &MovieDraft) -> StoreResult<MovieId> {
        let model = movie::ActiveModel {
            id: NotSet,
            title: Set(draft.title.clone()),
            description: Set(draft.description.clone()),
            release_date: Set(draft.release_date.as_second()),
            rating: Set(draft.rating),
        };
        let res = movie::Entity::insert(model).exec(&self.db).await?;
        id_from_row(res.last_insert_id)
    }

    async fn update_movie(&self, id: MovieId, draft: &MovieDraft) -> StoreResult<u64> {
        let Some(key) = key(id) else {
            return Ok(0);
        };
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Title, Expr::value(draft.title.clone()))
            .col_expr(movie::Column::Description, Expr::value(draft.description.clone()))
            .col_expr(movie::Column::ReleaseDate, Expr::value(draft.release_date.as_second()))
            .col_expr(movie::Column::Rating, Expr::value(draft.rating))
            .filter(movie::Column::Id.eq(key))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn delete_movie(&self, id: MovieId) -> StoreResult<u64> {
        let Some(key) = key(id) else {
            return Ok(0);
        };
        let res = movie::Entity::delete_by_id(key).exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    async fn find_movie(&self, id: MovieId) -> StoreResult<Option<Movie>> {
        let Some(key) = key(id) else {
            return Ok(None);
        };
        movie::Entity::find_by_id(key).one(&self.db).await?.map(movie_from_row).transpose()
    }

    async fn list_movies(&self, sort: SortKey) -> StoreResult<Vec<Movie>> {
        let query = movie::Entity::find();
        let query = match sort {
            SortKey::Default => query.order_by_desc(movie::Column::Rating),
            SortKey::Title => query.order_by_asc(movie::Column::Title),
            SortKey::Rating => query.order_by_asc(movie::Column::Rating),
            SortKey::ReleaseDate => query.order_by_asc(movie::Column::ReleaseDate),
        };
        let rows = query.order_by_asc(movie::Column::Id).all(&self.db).await?;
        rows.into_iter().map(movie_from_row).collect()
    }

    async fn search_movies(&self, pattern: &str) -> StoreResult<Vec<Movie>> {
        // Wildcards inside `pattern` are not escaped.
        let like = format!("%{pattern}%");
        let rows = movie::Entity::find()
            .join(JoinType::LeftJoin, movie::Relation::MovieActor.def())
            .join(JoinType::LeftJoin, movie_actor::Relation::Actor.def())
            .filter(
                Condition::any()
                    .add(movie::Column::Title.like(like.clone()))
                    .add(actor::Column::FirstName.like(like.clone()))
                    .add(actor::Column::SecondName.like(like)),
            )
            .distinct()
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        rows.into_iter().map(movie_from_row).collect()
    }

    async fn movie_actors(&self, movie_id: MovieId) -> StoreResult<Vec<Actor>> {
        let Some(key) = key(movie_id) else {
            return Ok(Vec::new());
        };
        let rows = actor::Entity::find()
            .join(JoinType::InnerJoin, actor::Relation::MovieActor.def())
            .filter(movie_actor::Column::MovieId.eq(key))
            .order_by_asc(actor::Column::Id)
            .all(&self.db)
            .await?;
        rows.into_iter().map(actor_from_row).collect()
    }

    async fn insert_actor(&self, draft: &ActorDraft) -> StoreResult<ActorId> {
        let model = actor::ActiveModel {
            id: NotSet,
            first_name: Set(draft.first_name.clone()),
            second_name: Set(draft.second_name.clone()),
            gender: Set(draft.gender.as_str().to_string()),
        };
        let res = actor::Entity::insert(model).exec(&self.db).await?;
        id_from_row(res.last_insert_id)
    }

    async fn update_actor(&self, id: ActorId, draft: &ActorDraft) -> StoreResult<u64> {
        let Some(key) = key(id) else {
            return Ok(0);
        };
        let res = actor::Entity::update_many()
            .col_expr(actor::Column::FirstName, Expr::value(draft.first_name.clone()))
            .col_expr(actor::Column::SecondName, Expr::value(draft.second_name.clone()))
            .col_expr(actor::Column::Gender, Expr::value(draft.gender.as_str()))
            .filter(actor::Column::Id.eq(key))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn delete_actor(&self, id: ActorId) -> StoreResult<u64> {
        let Some(key) = key(id) else {
            return Ok(0);
        };
        let res = actor::Entity::delete_by_id(key).exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    async fn find_actor(&self, id: ActorId) -> StoreResult<Option<Actor>> {
        let Some(key) = key(id) else {
            return Ok(None);
        };
        actor::Entity::find_by_id(key).one(&self.db).await?.map(actor_from_row).transpose()
    }

    async fn list_actors(&self) -> StoreResult<Vec<Actor>> {
        let rows = actor::Entity::find().order_by_asc(actor::Column::Id).all(&self.db).await?;
        rows.into_iter().map(actor_from_row).collect()
    }

    async fn actor_movies(&self, actor_id: ActorId) -> StoreResult<Vec<Movie>> {
        let Some(key) = key(actor_id) else {
            return Ok(Vec::new());
        };
        let rows = movie::Entity::find()
            .join(JoinType::InnerJoin, movie::Relation::MovieActor.def())
            .filter(movie_actor::Column::ActorId.eq(key))
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        rows.into_iter().map(movie_from_row).collect()
    }

    async fn link(&self, movie_id: MovieId, actor_id: ActorId) -> StoreResult<()> {
        let (Some(movie_key), Some(actor_key)) = (key(movie_id), key(actor_id)) else {
            return Err(StoreError::Corrupt(format!(
                "association {movie_id}/{actor_id} out of range"
            )));
        };
        let model = movie_actor::ActiveModel { movie_id: Set(movie_key), actor_id: Set(actor_key) };
        movie_actor::Entity::insert(model).exec_without_returning(&self.db).await?;
        Ok(())
    }

    async fn unlink_movie(&self, movie_id: MovieId) -> StoreResult<u64> {
        let Some(key) = key(movie_id) else {
            return Ok(0);
        };
        let res = movie_actor::Entity::delete_many()
            .filter(movie_actor::Column::MovieId.eq(key))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    async fn unlink_actor(&self, actor_id: ActorId) -> StoreResult<u64> {
        let Some(key) = key(actor_id) else {
            return Ok(0);
        };
        let res = movie_actor::Entity::delete_many()
            .filter(movie_actor::Column::ActorId.eq(key))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}

/// Ids above `i64::MAX` cannot name a row.
fn key(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn id_from_row(id: i64) -> StoreResult<u64> {
    u64::try_from(id).map_err(|_| StoreError::Corrupt(format!("negative id {id}")))
}

fn movie_from_row(row: movie::Model) -> StoreResult<Movie> {
    let release_date = jiff::Timestamp::from_second(row.release_date)
        .map_err(|e| StoreError::Corrupt(format!("movie {} release date: {e}", row.id)))?;
    Ok(Movie {
        id: id_from_row(row.id)?,
        title: row.title,
        description: row.description,
        release_date,
        rating: row.rating,
        actors: Vec::new(),
    })
}

fn actor_from_row(row: actor::Model) -> StoreResult<Actor> {
    Ok(Actor {
        id: id_from_row(row.id)?,
        first_name: row.first_name,
        second_name: row.second_name,
        gender: row.gender.into(),
        movies: Vec::new(),
    })
}
