use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{FromRequestParts, Query, Request, State},
    http::{StatusCode, request::Parts},
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{ActorId, MovieDraft, MovieId, SortKey, UserId},
    views::{ActorBody, ActorView, Envelope, MovieBody, MovieView},
};

pub fn router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route(
            "/api/v1/movies",
            get(get_movie).post(create_movie).put(update_movie).delete(delete_movie),
        )
        .route("/api/v1/movies/list", get(list_movies))
        .route(
            "/api/v1/actors",
            get(get_actor).post(create_actor).put(update_actor).delete(delete_actor),
        )
        .route("/api/v1/actors/list", get(list_actors))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

pub struct Caller(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .map(Caller)
            .ok_or(AppError::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
pub struct MovieIdQuery {
    movie_id: MovieId,
}

#[derive(Debug, Deserialize)]
pub struct ActorIdQuery {
    actor_id: ActorId,
}

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pattern: Option<String>,
    sort_by: Option<String>,
}

type MovieResponse = AppResult<Json<Envelope<MovieView>>>;
type ActorResponse = AppResult<Json<Envelope<ActorView>>>;

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Json(body), _): WithRejection<Json<MovieBody>, AppError>,
) -> MovieResponse {
    let draft = MovieDraft::try_from(body)?;
    let movie = state.catalog.create_movie(user_id, draft).await?;
    Ok(Json(Envelope::ok(movie.into())))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Query(q), _): WithRejection<Query<MovieIdQuery>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<MovieBody>, AppError>,
) -> MovieResponse {
    let draft = MovieDraft::try_from(body)?;
    let movie = state.catalog.update_movie(user_id, q.movie_id, draft).await?;
    Ok(Json(Envelope::ok(movie.into())))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Query(q), _): WithRejection<Query<MovieIdQuery>, AppError>,
) -> AppResult<Json<Envelope<()>>> {
    state.catalog.delete_movie(user_id, q.movie_id).await?;
    Ok(Json(Envelope::ok(())))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Query(q), _): WithRejection<Query<MovieIdQuery>, AppError>,
) -> MovieResponse {
    let movie = state.catalog.get_movie(user_id, q.movie_id).await?;
    Ok(Json(Envelope::ok(movie.into())))
}

// `pattern`, even empty, selects search over listing.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Query(q), _): WithRejection<Query<MovieListQuery>, AppError>,
) -> AppResult<Json<Envelope<Vec<MovieView>>>> {
    let movies = match q.pattern {
        Some(pattern) => state.catalog.search_movies(user_id, &pattern).await?,
        None => {
            let sort = q.sort_by.as_deref().map(SortKey::parse).unwrap_or_default();
            state.catalog.list_movies(user_id, sort).await?
        }
    };
    Ok(Json(Envelope::ok(movies.into_iter().map(MovieView::from).collect())))
}

pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Json(body), _): WithRejection<Json<ActorBody>, AppError>,
) -> ActorResponse {
    let actor = state.catalog.create_actor(user_id, body.into()).await?;
    Ok(Json(Envelope::ok(actor.into())))
}

pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Query(q), _): WithRejection<Query<ActorIdQuery>, AppError>,
    WithRejection(Json(body), _): WithRejection<Json<ActorBody>, AppError>,
) -> ActorResponse {
    let actor = state.catalog.update_actor(user_id, q.actor_id, body.into()).await?;
    Ok(Json(Envelope::ok(actor.into())))
}

pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Query(q), _): WithRejection<Query<ActorIdQuery>, AppError>,
) -> AppResult<Json<Envelope<()>>> {
    state.catalog.delete_actor(user_id, q.actor_id).await?;
    Ok(Json(Envelope::ok(())))
}

pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
    WithRejection(Query(q), _): WithRejection<Query<ActorIdQuery>, AppError>,
) -> ActorResponse {
    let actor = state.catalog.get_actor(user_id, q.actor_id).await?;
    Ok(Json(Envelope::ok(actor.into())))
}

pub async fn list_actors(
    State(state): State<Arc<AppState>>,
    Caller(user_id): Caller,
) -> AppResult<Json<Envelope<Vec<ActorView>>>> {
    let actors = state.catalog.list_actors(user_id).await?;
    Ok(Json(Envelope::ok(actors.into_iter().map(ActorView::from).collect())))
}

async fn log_requests(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let resp = next.run(req).await;
    let line = format!("{method} {uri} {}", resp.status().as_u16());
    if resp.status() == StatusCode::INTERNAL_SERVER_ERROR {
        state.logger.error(&line);
    } else {
        state.logger.info(&line);
    }
    resp
}
