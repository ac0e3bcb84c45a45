//! Shared capabilities of the schedule entities that get pages or links.

use std::borrow::Cow;
use std::fmt;

use crate::types::{ConferenceDay, Event, Person, Room, Track};

/// Entity kinds that own a URL segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Room,
    Track,
    Event,
    Person,
    Day,
}

impl EntityKind {
    /// Directory / URL segment for pages of this kind.
    pub fn segment(&self) -> &'static str {
        match self {
            EntityKind::Room => "room",
            EntityKind::Track => "track",
            EntityKind::Event => "event",
            EntityKind::Person => "speaker",
            EntityKind::Day => "day",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Room => write!(f, "room"),
            EntityKind::Track => write!(f, "track"),
            EntityKind::Event => write!(f, "event"),
            EntityKind::Person => write!(f, "person"),
            EntityKind::Day => write!(f, "day"),
        }
    }
}

/// Name, identity, and path of anything the schedule links to.
pub trait ScheduleEntity {
    fn kind(&self) -> EntityKind;

    /// Human-readable name used in link texts and headings.
    fn display_name(&self) -> Cow<'_, str>;

    /// Primary key within the entity's kind.
    fn identity_key(&self) -> &str;

    /// Explicit slug from the source data, if any.
    fn explicit_slug(&self) -> Option<&str> {
        None
    }

    /// `<segment>/<slug>`, relative to the schedule root. The slug itself
    /// comes from the caller's slug boundary.
    fn canonical_path(&self, slug: &str) -> String {
        format!("{}/{}", self.kind().segment(), slug)
    }
}

impl ScheduleEntity for Room {
    fn kind(&self) -> EntityKind {
        EntityKind::Room
    }
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
    fn identity_key(&self) -> &str {
        self.id.as_str()
    }
    fn explicit_slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

impl ScheduleEntity for Track {
    fn kind(&self) -> EntityKind {
        EntityKind::Track
    }
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
    fn identity_key(&self) -> &str {
        self.id.as_str()
    }
    fn explicit_slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

impl ScheduleEntity for Event {
    fn kind(&self) -> EntityKind {
        EntityKind::Event
    }
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.title)
    }
    fn identity_key(&self) -> &str {
        self.id.as_str()
    }
    fn explicit_slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

impl ScheduleEntity for Person {
    fn kind(&self) -> EntityKind {
        EntityKind::Person
    }
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Owned(self.full_name())
    }
    fn identity_key(&self) -> &str {
        self.id.as_str()
    }
    fn explicit_slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }
}

impl ScheduleEntity for ConferenceDay {
    fn kind(&self) -> EntityKind {
        EntityKind::Day
    }
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
    fn identity_key(&self) -> &str {
        self.id.as_str()
    }
}

/// Borrowed reference to any linkable entity.
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Room(&'a Room),
    Track(&'a Track),
    Event(&'a Event),
    Person(&'a Person),
    Day(&'a ConferenceDay),
}

impl<'a> EntityRef<'a> {
    fn inner(&self) -> &'a dyn ScheduleEntity {
        match *self {
            EntityRef::Room(r) => r,
            EntityRef::Track(t) => t,
            EntityRef::Event(e) => e,
            EntityRef::Person(p) => p,
            EntityRef::Day(d) => d,
        }
    }
}

impl ScheduleEntity for EntityRef<'_> {
    fn kind(&self) -> EntityKind {
        self.inner().kind()
    }
    fn display_name(&self) -> Cow<'_, str> {
        self.inner().display_name()
    }
    fn identity_key(&self) -> &str {
        self.inner().identity_key()
    }
    fn explicit_slug(&self) -> Option<&str> {
        self.inner().explicit_slug()
    }
}

impl fmt::Display for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.identity_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PersonId, RoomId};

    #[test]
    fn canonical_path_uses_kind_segment() {
        let room = Room {
            id: RoomId::from("R1"),
            name: "Hall A".to_string(),
            slug: None,
        };
        assert_eq!(room.canonical_path("hall_a"), "room/hall_a");

        let person = Person {
            id: PersonId::from("P1"),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            public_name: None,
            slug: Some("jdoe".to_string()),
        };
        let entity = EntityRef::Person(&person);
        assert_eq!(entity.canonical_path("jane_doe"), "speaker/jane_doe");
        assert_eq!(entity.display_name(), "Jane Doe");
        assert_eq!(entity.explicit_slug(), Some("jdoe"));
        assert_eq!(entity.to_string(), "person P1");
    }
}
