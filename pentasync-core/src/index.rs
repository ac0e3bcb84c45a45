//! Relational index over a loaded [`Schedule`].
//!
//! [`ScheduleIndex::build`] validates foreign keys and derives the
//! relationships the pages need:
//!
//! | Lookup                 | Key       | Value                          |
//! |------------------------|-----------|--------------------------------|
//! | `room` / `track` / ... | id        | the record                     |
//! | `events_in_room`       | room id   | events, cache order            |
//! | `events_in_track`      | track id  | events, cache order            |
//! | `role_assignments`     | event id  | assignments, cache order       |
//! | `speakers_of`          | event id  | speaking persons               |
//! | `events_of_speaker`    | person id | events the person speaks at    |
//! | `speaker_profile`      | person id | optional conference profile    |
//!
//! Sequence lookups never fail: unknown ids yield an empty slice. The index
//! borrows from the schedule and is rebuilt from scratch on every run.

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

use crate::error::IntegrityError;
use crate::roles::SpeakerPolicy;
use crate::types::{
    ConferenceDay, ConferenceProfile, DayId, Event, EventId, Person, PersonId, RoleAssignment,
    Room, RoomId, Schedule, Track, TrackId,
};

/// Read-only lookups and derived relationships for one run.
#[derive(Debug)]
pub struct ScheduleIndex<'s> {
    schedule: &'s Schedule,
    rooms: HashMap<&'s RoomId, &'s Room>,
    tracks: HashMap<&'s TrackId, &'s Track>,
    days: HashMap<&'s DayId, &'s ConferenceDay>,
    events: HashMap<&'s EventId, &'s Event>,
    persons: HashMap<&'s PersonId, &'s Person>,
    profiles: HashMap<&'s PersonId, &'s ConferenceProfile>,
    events_by_room: HashMap<&'s RoomId, Vec<&'s Event>>,
    events_by_track: HashMap<&'s TrackId, Vec<&'s Event>>,
    assignments_by_event: HashMap<&'s EventId, Vec<&'s RoleAssignment>>,
    speakers_by_event: HashMap<&'s EventId, Vec<&'s Person>>,
    events_by_speaker: HashMap<&'s PersonId, Vec<&'s Event>>,
    speakers: Vec<&'s Person>,
}

fn by_id<'s, K, T>(
    kind: &'static str,
    items: &'s [T],
    key: impl Fn(&'s T) -> &'s K,
) -> Result<HashMap<&'s K, &'s T>, IntegrityError>
where
    K: Eq + Hash + Display,
{
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        let id = key(item);
        if map.insert(id, item).is_some() {
            return Err(IntegrityError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(map)
}

/// One empty sequence per known key.
fn seeded<'s, K: Eq + Hash, V>(keys: impl Iterator<Item = &'s K>) -> HashMap<&'s K, Vec<V>> {
    keys.map(|k| (k, Vec::new())).collect()
}

fn slice_or_empty<'m, K: Eq + Hash, V>(map: &'m HashMap<&K, Vec<V>>, key: &K) -> &'m [V] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}

impl<'s> ScheduleIndex<'s> {
    /// Build with the default [`SpeakerPolicy`].
    pub fn build(schedule: &'s Schedule) -> Result<Self, IntegrityError> {
        Self::build_with(schedule, &SpeakerPolicy::default())
    }

    /// Build the index, aborting on the first unresolved reference.
    pub fn build_with(
        schedule: &'s Schedule,
        policy: &SpeakerPolicy,
    ) -> Result<Self, IntegrityError> {
        let rooms = by_id("room", &schedule.rooms, |r| &r.id)?;
        let tracks = by_id("track", &schedule.tracks, |t| &t.id)?;
        let days = by_id("day", &schedule.days, |d| &d.id)?;
        let events = by_id("event", &schedule.events, |e| &e.id)?;
        let persons = by_id("person", &schedule.persons, |p| &p.id)?;
        let profiles = by_id("conference profile", &schedule.profiles, |c| &c.person_id)?;

        // Pass 1: events per room and track.
        let mut events_by_room = seeded(schedule.rooms.iter().map(|r| &r.id));
        let mut events_by_track = seeded(schedule.tracks.iter().map(|t| &t.id));
        for event in &schedule.events {
            if let Some(room_id) = &event.room_id {
                let Some(list) = events_by_room.get_mut(room_id) else {
                    return Err(IntegrityError::MissingRoom {
                        event: event.id.to_string(),
                        room: room_id.to_string(),
                    });
                };
                list.push(event);
            }
            if let Some(track_id) = &event.track_id {
                let Some(list) = events_by_track.get_mut(track_id) else {
                    return Err(IntegrityError::MissingTrack {
                        event: event.id.to_string(),
                        track: track_id.to_string(),
                    });
                };
                list.push(event);
            }
        }

        // Pass 2: role assignments per event.
        let mut assignments_by_event = seeded(schedule.events.iter().map(|e| &e.id));
        for assignment in &schedule.role_assignments {
            if !persons.contains_key(&assignment.person_id) {
                return Err(IntegrityError::MissingPerson {
                    event: assignment.event_id.to_string(),
                    person: assignment.person_id.to_string(),
                });
            }
            let Some(list) = assignments_by_event.get_mut(&assignment.event_id) else {
                return Err(IntegrityError::MissingEvent {
                    person: assignment.person_id.to_string(),
                    event: assignment.event_id.to_string(),
                });
            };
            list.push(assignment);
        }

        // Pass 3: speakers, event by event.
        let mut speakers_by_event: HashMap<&EventId, Vec<&Person>> =
            seeded(schedule.events.iter().map(|e| &e.id));
        let mut events_by_speaker = seeded(schedule.persons.iter().map(|p| &p.id));
        let mut speakers = Vec::new();
        let mut seen_speakers = HashSet::new();
        for event in &schedule.events {
            let assignments = slice_or_empty(&assignments_by_event, &event.id);
            for assignment in assignments {
                if !policy.qualifies(&assignment.role, &assignment.state) {
                    continue;
                }
                // Resolved in pass 2.
                let Some(&person) = persons.get(&assignment.person_id) else {
                    continue;
                };

                let on_event = speakers_by_event.entry(&event.id).or_default();
                if on_event.iter().any(|p| p.id == person.id) {
                    continue;
                }
                on_event.push(person);
                events_by_speaker.entry(&person.id).or_default().push(event);
                if seen_speakers.insert(&person.id) {
                    speakers.push(person);
                }
            }
        }

        tracing::debug!(
            rooms = rooms.len(),
            tracks = tracks.len(),
            events = events.len(),
            persons = persons.len(),
            speakers = speakers.len(),
            "schedule indexed"
        );

        Ok(Self {
            schedule,
            rooms,
            tracks,
            days,
            events,
            persons,
            profiles,
            events_by_room,
            events_by_track,
            assignments_by_event,
            speakers_by_event,
            events_by_speaker,
            speakers,
        })
    }

    /// The collections this index was built from.
    pub fn schedule(&self) -> &'s Schedule {
        self.schedule
    }

    pub fn room(&self, id: &RoomId) -> Option<&'s Room> {
        self.rooms.get(id).copied()
    }

    pub fn track(&self, id: &TrackId) -> Option<&'s Track> {
        self.tracks.get(id).copied()
    }

    pub fn day(&self, id: &DayId) -> Option<&'s ConferenceDay> {
        self.days.get(id).copied()
    }

    pub fn event(&self, id: &EventId) -> Option<&'s Event> {
        self.events.get(id).copied()
    }

    pub fn person(&self, id: &PersonId) -> Option<&'s Person> {
        self.persons.get(id).copied()
    }

    /// Conference profile of a person, if one was loaded.
    pub fn speaker_profile(&self, id: &PersonId) -> Option<&'s ConferenceProfile> {
        self.profiles.get(id).copied()
    }

    pub fn events_in_room(&self, id: &RoomId) -> &[&'s Event] {
        slice_or_empty(&self.events_by_room, id)
    }

    pub fn events_in_track(&self, id: &TrackId) -> &[&'s Event] {
        slice_or_empty(&self.events_by_track, id)
    }

    pub fn role_assignments(&self, id: &EventId) -> &[&'s RoleAssignment] {
        slice_or_empty(&self.assignments_by_event, id)
    }

    pub fn speakers_of(&self, id: &EventId) -> &[&'s Person] {
        slice_or_empty(&self.speakers_by_event, id)
    }

    pub fn events_of_speaker(&self, id: &PersonId) -> &[&'s Event] {
        slice_or_empty(&self.events_by_speaker, id)
    }

    /// Every derived speaker once, in order of first appearance.
    pub fn speakers(&self) -> &[&'s Person] {
        &self.speakers
    }

    pub fn is_speaker(&self, id: &PersonId) -> bool {
        !self.events_of_speaker(id).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{Role, RoleState};
    use crate::types::ConferenceProfile;

    fn room(id: &str, name: &str) -> Room {
        Room {
            id: RoomId::from(id),
            name: name.to_string(),
            slug: None,
        }
    }

    fn track(id: &str, name: &str) -> Track {
        Track {
            id: TrackId::from(id),
            name: name.to_string(),
            slug: None,
        }
    }

    fn event(id: &str, room: Option<&str>, track: Option<&str>) -> Event {
        Event {
            id: EventId::from(id),
            title: format!("Talk {id}"),
            subtitle: None,
            slug: None,
            room_id: room.map(RoomId::from),
            track_id: track.map(TrackId::from),
            day_id: None,
            start_time: None,
            duration: None,
            language: None,
            summary: None,
            description: None,
        }
    }

    fn person(id: &str) -> Person {
        Person {
            id: PersonId::from(id),
            first_name: Some("Jane".to_string()),
            last_name: Some(format!("Doe {id}")),
            public_name: None,
            slug: None,
        }
    }

    fn assign(event: &str, person: &str, role: &str, state: &str) -> RoleAssignment {
        RoleAssignment {
            event_id: EventId::from(event),
            person_id: PersonId::from(person),
            role: Role::from(role),
            state: RoleState::from(state),
        }
    }

    fn scenario() -> Schedule {
        Schedule {
            rooms: vec![room("R1", "Hall A")],
            tracks: vec![track("T1", "Security")],
            events: vec![event("E1", Some("R1"), Some("T1"))],
            persons: vec![person("P1")],
            role_assignments: vec![assign("E1", "P1", "speaker", "confirmed")],
            ..Schedule::default()
        }
    }

    fn ids<'a, T: 'a>(items: &[&'a T], key: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| key(*i).to_string()).collect()
    }

    #[test]
    fn concrete_scenario_is_indexed() {
        let schedule = scenario();
        let index = ScheduleIndex::build(&schedule).unwrap();

        assert_eq!(
            ids(index.events_in_room(&RoomId::from("R1")), |e| e.id.as_str()),
            ["E1"]
        );
        assert_eq!(
            ids(index.events_in_track(&TrackId::from("T1")), |e| e.id.as_str()),
            ["E1"]
        );
        assert_eq!(
            ids(index.speakers_of(&EventId::from("E1")), |p| p.id.as_str()),
            ["P1"]
        );
        assert_eq!(
            ids(index.events_of_speaker(&PersonId::from("P1")), |e| e.id.as_str()),
            ["E1"]
        );
        assert_eq!(index.speakers().len(), 1);
        assert_eq!(index.role_assignments(&EventId::from("E1")).len(), 1);
        assert_eq!(index.room(&RoomId::from("R1")).unwrap().name, "Hall A");
    }

    #[test]
    fn missing_room_is_fatal_and_names_both_ids() {
        let mut schedule = scenario();
        schedule.events = vec![event("E1", Some("R9"), Some("T1"))];
        let err = ScheduleIndex::build(&schedule).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::MissingRoom {
                event: "E1".to_string(),
                room: "R9".to_string()
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("E1") && msg.contains("R9"), "got: {msg}");
    }

    #[test]
    fn missing_track_is_fatal() {
        let mut schedule = scenario();
        schedule.events = vec![event("E1", Some("R1"), Some("T9"))];
        let err = ScheduleIndex::build(&schedule).unwrap_err();
        assert!(
            matches!(err, IntegrityError::MissingTrack { .. }),
            "got: {err}"
        );
    }

    #[test]
    fn events_without_room_or_track_are_allowed() {
        let mut schedule = scenario();
        schedule.events.push(event("E2", None, Some("T1")));
        schedule.events.push(event("E3", None, None));
        let index = ScheduleIndex::build(&schedule).unwrap();
        assert_eq!(index.events_in_room(&RoomId::from("R1")).len(), 1);
        assert_eq!(
            ids(index.events_in_track(&TrackId::from("T1")), |e| e.id.as_str()),
            ["E1", "E2"]
        );
    }

    #[test]
    fn assignment_to_unknown_event_is_fatal() {
        let mut schedule = scenario();
        schedule
            .role_assignments
            .push(assign("E9", "P1", "speaker", "confirmed"));
        let err = ScheduleIndex::build(&schedule).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::MissingEvent {
                person: "P1".to_string(),
                event: "E9".to_string()
            }
        );
    }

    #[test]
    fn assignment_to_unknown_person_is_fatal() {
        let mut schedule = scenario();
        schedule
            .role_assignments
            .push(assign("E1", "P9", "attendee", "confirmed"));
        let err = ScheduleIndex::build(&schedule).unwrap_err();
        assert!(
            matches!(err, IntegrityError::MissingPerson { .. }),
            "got: {err}"
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut schedule = scenario();
        schedule.rooms.push(room("R1", "Hall B"));
        let err = ScheduleIndex::build(&schedule).unwrap_err();
        assert_eq!(
            err,
            IntegrityError::DuplicateId {
                kind: "room",
                id: "R1".to_string()
            }
        );
    }

    #[test]
    fn rejected_state_is_not_a_speaker() {
        let mut schedule = scenario();
        schedule.role_assignments = vec![assign("E1", "P1", "speaker", "rejected")];
        let index = ScheduleIndex::build(&schedule).unwrap();
        assert!(index.speakers_of(&EventId::from("E1")).is_empty());
        assert!(index.speakers().is_empty());
        assert!(!index.is_speaker(&PersonId::from("P1")));
        // The assignment itself is still indexed.
        assert_eq!(index.role_assignments(&EventId::from("E1")).len(), 1);
    }

    #[test]
    fn two_roles_on_one_event_list_the_person_once() {
        let mut schedule = scenario();
        schedule
            .role_assignments
            .push(assign("E1", "P1", "moderator", "offer"));
        let index = ScheduleIndex::build(&schedule).unwrap();
        assert_eq!(index.speakers_of(&EventId::from("E1")).len(), 1);
        assert_eq!(index.events_of_speaker(&PersonId::from("P1")).len(), 1);
    }

    #[test]
    fn derived_sequences_follow_cache_order() {
        let schedule = Schedule {
            rooms: vec![room("R1", "Hall A")],
            tracks: vec![track("T1", "Security")],
            events: vec![
                event("E3", Some("R1"), None),
                event("E1", Some("R1"), None),
                event("E2", Some("R1"), None),
            ],
            persons: vec![person("P1"), person("P2")],
            role_assignments: vec![
                assign("E2", "P1", "speaker", "confirmed"),
                assign("E1", "P2", "speaker", "confirmed"),
                assign("E1", "P1", "coordinator", "confirmed"),
                assign("E3", "P1", "speaker", "offer"),
            ],
            ..Schedule::default()
        };
        let index = ScheduleIndex::build(&schedule).unwrap();
        assert_eq!(
            ids(index.events_in_room(&RoomId::from("R1")), |e| e.id.as_str()),
            ["E3", "E1", "E2"]
        );
        assert_eq!(
            ids(index.speakers_of(&EventId::from("E1")), |p| p.id.as_str()),
            ["P2", "P1"]
        );
        assert_eq!(
            ids(index.events_of_speaker(&PersonId::from("P1")), |e| e.id.as_str()),
            ["E3", "E1", "E2"]
        );
        // First appearance while scanning events: E3 yields P1, E1 yields P2.
        assert_eq!(ids(index.speakers(), |p| p.id.as_str()), ["P1", "P2"]);
    }

    #[test]
    fn unknown_ids_yield_empty_sequences() {
        let schedule = scenario();
        let index = ScheduleIndex::build(&schedule).unwrap();
        assert!(index.events_in_room(&RoomId::from("nope")).is_empty());
        assert!(index.speakers_of(&EventId::from("nope")).is_empty());
        assert!(index.events_of_speaker(&PersonId::from("nope")).is_empty());
        assert!(index.room(&RoomId::from("nope")).is_none());
    }

    #[test]
    fn speaker_profile_joins_by_person() {
        let mut schedule = scenario();
        schedule.profiles.push(ConferenceProfile {
            person_id: PersonId::from("P1"),
            summary: Some("Researcher".to_string()),
            description: None,
            email: None,
            url: None,
        });
        let index = ScheduleIndex::build(&schedule).unwrap();
        let profile = index.speaker_profile(&PersonId::from("P1")).unwrap();
        assert_eq!(profile.summary.as_deref(), Some("Researcher"));
        assert!(index.speaker_profile(&PersonId::from("P2")).is_none());
    }

    #[test]
    fn narrowed_policy_changes_derivation() {
        let mut schedule = scenario();
        schedule.role_assignments = vec![assign("E1", "P1", "moderator", "confirmed")];
        let policy = SpeakerPolicy {
            roles: vec![Role::Speaker],
            states: vec![RoleState::Confirmed],
        };
        let index = ScheduleIndex::build_with(&schedule, &policy).unwrap();
        assert!(index.speakers().is_empty());

        let index = ScheduleIndex::build(&schedule).unwrap();
        assert_eq!(index.speakers().len(), 1);
    }
}
