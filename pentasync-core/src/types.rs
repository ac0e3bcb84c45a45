//! Typed schedule records.
//!
//! Field names follow the cache layout (`conference_room_id`,
//! `event_role_state`, ...) through `serde(rename)`; unknown cache fields
//! are dropped on deserialization. Ids accept either integers or strings
//! and are always held as strings.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::roles::{Role, RoleState};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Raw id as found in the cache: Pentabarf ids are integers, hand-written
/// fixtures tend to use strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }
    };
}

id_newtype!(
    /// Primary key of a [`Room`].
    RoomId
);
id_newtype!(
    /// Primary key of a [`Track`].
    TrackId
);
id_newtype!(
    /// Primary key of a [`ConferenceDay`].
    DayId
);
id_newtype!(
    /// Primary key of an [`Event`].
    EventId
);
id_newtype!(
    /// Primary key of a [`Person`]; also keys [`ConferenceProfile`].
    PersonId
);

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The conference itself. Loaded from a single record, optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronym: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "conference_room_id")]
    pub id: RoomId,
    #[serde(rename = "conference_room")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "conference_track_id")]
    pub id: TrackId,
    #[serde(rename = "conference_track")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceDay {
    #[serde(rename = "conference_day_id")]
    pub id: DayId,
    pub name: String,
    #[serde(rename = "conference_day")]
    pub date: NaiveDate,
}

/// A scheduled event (talk, workshop, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "event_id")]
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(
        rename = "conference_room_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub room_id: Option<RoomId>,
    #[serde(
        rename = "conference_track_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub track_id: Option<TrackId>,
    #[serde(
        rename = "conference_day_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub day_id: Option<DayId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(rename = "person_id")]
    pub id: PersonId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Person {
    /// `public_name` wins only when the full name is incomplete; otherwise
    /// "first last". Falls back to the id for nameless records.
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name, &self.public_name) {
            (Some(first), Some(last), _) => format!("{first} {last}"),
            (_, _, Some(public)) => public.clone(),
            (first, last, None) => {
                let joined = [first.as_deref(), last.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                if joined.is_empty() {
                    self.id.0.clone()
                } else {
                    joined
                }
            }
        }
    }
}

/// Links a [`Person`] to an [`Event`] with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub event_id: EventId,
    pub person_id: PersonId,
    #[serde(rename = "event_role")]
    pub role: Role,
    #[serde(rename = "event_role_state", default)]
    pub state: RoleState,
}

/// Per-conference extension of a [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConferenceProfile {
    pub person_id: PersonId,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// All entity collections of one run, in cache order. Never mutated after
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub conference: Option<Conference>,
    pub days: Vec<ConferenceDay>,
    pub rooms: Vec<Room>,
    pub tracks: Vec<Track>,
    pub events: Vec<Event>,
    pub persons: Vec<Person>,
    pub role_assignments: Vec<RoleAssignment>,
    pub profiles: Vec<ConferenceProfile>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
