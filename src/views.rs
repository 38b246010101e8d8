use serde::{Deserialize, Serialize};

use crate::models::{Actor, ActorDraft, ActorId, Gender, Movie, MovieDraft, MovieId};

// Handler bodies carry exactly one of `data` or `error`.
#[derive(Debug, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { data: Some(data), error: None }
    }

    pub fn error(msg: String) -> Self {
        Self { data: None, error: Some(msg) }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MovieView {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    /// Unix seconds.
    pub release_date: i64,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<ActorView>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ActorView {
    pub id: ActorId,
    pub first_name: String,
    pub second_name: String,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub movies: Vec<MovieView>,
}

impl From<Movie> for MovieView {
    fn from(m: Movie) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            release_date: m.release_date.as_second(),
            rating: m.rating,
            actors: m.actors.into_iter().map(ActorView::from).collect(),
        }
    }
}

impl From<Actor> for ActorView {
    fn from(a: Actor) -> Self {
        Self {
            id: a.id,
            first_name: a.first_name,
            second_name: a.second_name,
            gender: a.gender,
            movies: a.movies.into_iter().map(MovieView::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MovieBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub release_date: i64,
    pub rating: f64,
    #[serde(default, rename = "actors")]
    pub actor_ids: Vec<ActorId>,
}

impl TryFrom<MovieBody> for MovieDraft {
    type Error = jiff::Error;

    fn try_from(body: MovieBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: body.title,
            description: body.description,
            release_date: jiff::Timestamp::from_second(body.release_date)?,
            rating: body.rating,
            actor_ids: body.actor_ids,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ActorBody {
    pub first_name: String,
    pub second_name: String,
    #[serde(default)]
    pub gender: Gender,
}

impl From<ActorBody> for ActorDraft {
    fn from(body: ActorBody) -> Self {
        Self { first_name: body.first_name, second_name: body.second_name, gender: body.gender }
    }
}
