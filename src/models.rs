use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub type MovieId = u64;
pub type ActorId = u64;
pub type UserId = u64;

#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
    pub release_date: Timestamp,
    pub rating: f64,
    pub actors: Vec<Actor>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MovieDraft {
    pub title: String,
    pub description: String,
    pub release_date: Timestamp,
    pub rating: f64,
    pub actor_ids: Vec<ActorId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub first_name: String,
    pub second_name: String,
    pub gender: Gender,
    pub movies: Vec<Movie>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActorDraft {
    pub first_name: String,
    pub second_name: String,
    pub gender: Gender,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Unknown => "",
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other(s) => s,
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => Gender::Unknown,
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other(s),
        }
    }
}

impl From<Gender> for String {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Regular,
    Other(String),
}

impl Role {
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            "regular" => Role::Regular,
            _ => Role::Other(s.to_string()),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortKey {
    /// Rating, highest first.
    #[default]
    Default,
    Title,
    Rating,
    ReleaseDate,
}

impl SortKey {
    pub fn parse(s: &str) -> Self {
        match s {
            "title" => SortKey::Title,
            "rating" => SortKey::Rating,
            "release_date" => SortKey::ReleaseDate,
            _ => SortKey::Default,
        }
    }
}
