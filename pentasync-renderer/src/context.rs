//! Template bindings: serializable page payloads built from the index.
//!
//! Every entity reaching a template carries its `name`, `slug`, and `url`
//! precomputed, so templates never resolve links themselves.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::PathBuf;

use serde::Serialize;

use pentasync_core::{
    Conference, ConferenceDay, ConferenceProfile, Event, EventId, Person, PersonId, Room, RoomId,
    ScheduleEntity, ScheduleIndex, Track, TrackId,
};

use crate::error::RenderError;
use crate::slug::Slugger;

/// Link to a page: enough to render `<a href="{{ url }}">{{ name }}</a>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCtx {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCtx {
    pub id: String,
    pub name: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCtx {
    #[serde(flatten)]
    pub link: LinkCtx,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<String>,
    pub language: Option<String>,
    pub room: Option<LinkCtx>,
    pub track: Option<LinkCtx>,
    pub day: Option<DayCtx>,
    pub speakers: Vec<LinkCtx>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonCtx {
    #[serde(flatten)]
    pub link: LinkCtx,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub public_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCtx {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConferenceCtx {
    pub title: String,
    pub acronym: Option<String>,
    pub subtitle: Option<String>,
    pub venue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaCtx {
    pub generator: String,
    pub version: String,
}

/// Bindings shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct PageCommon {
    pub title: String,
    pub kind: &'static str,
    pub conference: Option<ConferenceCtx>,
    pub meta: MetaCtx,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomPage {
    #[serde(flatten)]
    pub common: PageCommon,
    pub room: LinkCtx,
    pub events: Vec<EventCtx>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackPage {
    #[serde(flatten)]
    pub common: PageCommon,
    pub track: LinkCtx,
    pub events: Vec<EventCtx>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventPage {
    #[serde(flatten)]
    pub common: PageCommon,
    pub event: EventCtx,
    pub room: Option<LinkCtx>,
    pub track: Option<LinkCtx>,
    pub day: Option<DayCtx>,
    pub speakers: Vec<PersonCtx>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakerPage {
    #[serde(flatten)]
    pub common: PageCommon,
    pub person: PersonCtx,
    pub profile: Option<ProfileCtx>,
    pub events: Vec<EventCtx>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    #[serde(flatten)]
    pub common: PageCommon,
    pub rooms: Vec<LinkCtx>,
    pub tracks: Vec<LinkCtx>,
    pub events: Vec<EventCtx>,
    pub speakers: Vec<PersonCtx>,
    pub days: Vec<DayCtx>,
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Slugs of every page-owning entity, resolved once per run.
///
/// Only derived speakers get a person slug: nobody else has a page.
pub struct Links<'s> {
    prefix: String,
    rooms: HashMap<&'s RoomId, String>,
    tracks: HashMap<&'s TrackId, String>,
    events: HashMap<&'s EventId, String>,
    speakers: HashMap<&'s PersonId, String>,
}

fn resolve_slugs<'s, K, T>(
    items: impl IntoIterator<Item = &'s T>,
    key: impl Fn(&'s T) -> &'s K,
    slugger: &dyn Slugger,
) -> Result<HashMap<&'s K, String>, RenderError>
where
    K: Eq + Hash + 's,
    T: ScheduleEntity + 's,
{
    let mut slugs = HashMap::new();
    let mut owners: HashMap<String, String> = HashMap::new();
    for item in items {
        let slug = slugger.slug_of(item)?;
        let owner = format!("{} {}", item.kind(), item.identity_key());
        if let Some(first) = owners.insert(slug.clone(), owner.clone()) {
            return Err(RenderError::DuplicateTarget {
                path: page_path(item, &slug),
                first,
                second: owner,
            });
        }
        slugs.insert(key(item), slug);
    }
    Ok(slugs)
}

/// Output file of an entity page, relative to the output root.
pub fn page_path(entity: &dyn ScheduleEntity, slug: &str) -> PathBuf {
    PathBuf::from(format!("{}.html", entity.canonical_path(slug)))
}

impl<'s> Links<'s> {
    pub fn resolve(
        index: &ScheduleIndex<'s>,
        slugger: &dyn Slugger,
        url_prefix: &str,
    ) -> Result<Self, RenderError> {
        let schedule = index.schedule();
        Ok(Self {
            prefix: url_prefix.trim_end_matches('/').to_string(),
            rooms: resolve_slugs(&schedule.rooms, |r| &r.id, slugger)?,
            tracks: resolve_slugs(&schedule.tracks, |t| &t.id, slugger)?,
            events: resolve_slugs(&schedule.events, |e| &e.id, slugger)?,
            speakers: resolve_slugs(index.speakers().iter().copied(), |p| &p.id, slugger)?,
        })
    }

    fn link(&self, entity: &dyn ScheduleEntity, slug: &str) -> LinkCtx {
        LinkCtx {
            id: entity.identity_key().to_string(),
            name: entity.display_name().into_owned(),
            slug: slug.to_string(),
            url: format!("{}/{}", self.prefix, entity.canonical_path(slug)),
        }
    }

    fn slug<K: Eq + Hash>(map: &HashMap<&K, String>, key: &K) -> String {
        map.get(key).cloned().unwrap_or_default()
    }

    pub fn room_slug(&self, room: &Room) -> String {
        Self::slug(&self.rooms, &room.id)
    }

    pub fn track_slug(&self, track: &Track) -> String {
        Self::slug(&self.tracks, &track.id)
    }

    pub fn event_slug(&self, event: &Event) -> String {
        Self::slug(&self.events, &event.id)
    }

    pub fn speaker_slug(&self, person: &Person) -> String {
        Self::slug(&self.speakers, &person.id)
    }

    pub fn room(&self, room: &Room) -> LinkCtx {
        self.link(room, &self.room_slug(room))
    }

    pub fn track(&self, track: &Track) -> LinkCtx {
        self.link(track, &self.track_slug(track))
    }

    pub fn event(&self, event: &Event) -> LinkCtx {
        self.link(event, &self.event_slug(event))
    }

    pub fn speaker(&self, person: &Person) -> LinkCtx {
        self.link(person, &self.speaker_slug(person))
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl From<&ConferenceDay> for DayCtx {
    fn from(day: &ConferenceDay) -> Self {
        DayCtx {
            id: day.id.to_string(),
            name: day.name.clone(),
            date: day.date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&ConferenceProfile> for ProfileCtx {
    fn from(profile: &ConferenceProfile) -> Self {
        ProfileCtx {
            summary: profile.summary.clone(),
            description: profile.description.clone(),
            email: profile.email.clone(),
            url: profile.url.clone(),
        }
    }
}

impl From<&Conference> for ConferenceCtx {
    fn from(conference: &Conference) -> Self {
        ConferenceCtx {
            title: conference.title.clone(),
            acronym: conference.acronym.clone(),
            subtitle: conference.subtitle.clone(),
            venue: conference.venue.clone(),
        }
    }
}

impl MetaCtx {
    pub fn current() -> Self {
        MetaCtx {
            generator: "pentasync".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Builds page payloads from an index and its resolved links.
pub struct ContextBuilder<'a, 's> {
    index: &'a ScheduleIndex<'s>,
    links: &'a Links<'s>,
}

impl<'a, 's> ContextBuilder<'a, 's> {
    pub fn new(index: &'a ScheduleIndex<'s>, links: &'a Links<'s>) -> Self {
        Self { index, links }
    }

    fn common(&self, title: String, kind: &'static str) -> PageCommon {
        PageCommon {
            title,
            kind,
            conference: self
                .index
                .schedule()
                .conference
                .as_ref()
                .map(ConferenceCtx::from),
            meta: MetaCtx::current(),
        }
    }

    pub fn event(&self, event: &Event) -> EventCtx {
        let room = event.room_id.as_ref().and_then(|id| self.index.room(id));
        let track = event.track_id.as_ref().and_then(|id| self.index.track(id));
        let day = event.day_id.as_ref().and_then(|id| self.index.day(id));
        EventCtx {
            link: self.links.event(event),
            subtitle: event.subtitle.clone(),
            summary: event.summary.clone(),
            description: event.description.clone(),
            start_time: event.start_time.clone(),
            duration: event.duration.clone(),
            language: event.language.clone(),
            room: room.map(|r| self.links.room(r)),
            track: track.map(|t| self.links.track(t)),
            day: day.map(DayCtx::from),
            speakers: self
                .index
                .speakers_of(&event.id)
                .iter()
                .map(|p| self.links.speaker(p))
                .collect(),
        }
    }

    pub fn person(&self, person: &Person) -> PersonCtx {
        PersonCtx {
            link: self.links.speaker(person),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            public_name: person.public_name.clone(),
        }
    }

    fn events(&self, events: &[&Event]) -> Vec<EventCtx> {
        events.iter().map(|e| self.event(e)).collect()
    }

    pub fn room_page(&self, room: &Room) -> RoomPage {
        RoomPage {
            common: self.common(room.name.clone(), "room"),
            room: self.links.room(room),
            events: self.events(self.index.events_in_room(&room.id)),
        }
    }

    pub fn track_page(&self, track: &Track) -> TrackPage {
        TrackPage {
            common: self.common(track.name.clone(), "track"),
            track: self.links.track(track),
            events: self.events(self.index.events_in_track(&track.id)),
        }
    }

    pub fn event_page(&self, event: &Event) -> EventPage {
        let ctx = self.event(event);
        EventPage {
            common: self.common(event.title.clone(), "event"),
            room: ctx.room.clone(),
            track: ctx.track.clone(),
            day: ctx.day.clone(),
            speakers: self
                .index
                .speakers_of(&event.id)
                .iter()
                .map(|p| self.person(p))
                .collect(),
            event: ctx,
        }
    }

    pub fn speaker_page(&self, person: &Person) -> SpeakerPage {
        SpeakerPage {
            common: self.common(person.full_name(), "speaker"),
            person: self.person(person),
            profile: self.index.speaker_profile(&person.id).map(ProfileCtx::from),
            events: self.events(self.index.events_of_speaker(&person.id)),
        }
    }

    /// Bindings for the listing templates (`rooms`, `speakers`, ...).
    pub fn listing_page(&self, name: &str) -> ListingPage {
        let schedule = self.index.schedule();
        ListingPage {
            common: self.common(name.to_string(), "listing"),
            rooms: schedule.rooms.iter().map(|r| self.links.room(r)).collect(),
            tracks: schedule
                .tracks
                .iter()
                .map(|t| self.links.track(t))
                .collect(),
            events: schedule.events.iter().map(|e| self.event(e)).collect(),
            speakers: self
                .index
                .speakers()
                .iter()
                .map(|p| self.person(p))
                .collect(),
            days: schedule.days.iter().map(DayCtx::from).collect(),
        }
    }
}
