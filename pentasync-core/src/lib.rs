//! pentasync core library: schedule entities, the entity store boundary,
//! the relational index and site configuration.
//!
//! - [`types`]: typed records and the [`Schedule`] collections
//! - [`roles`]: role / role-state enums and [`SpeakerPolicy`]
//! - [`entity`]: [`ScheduleEntity`] capability trait and [`EntityRef`]
//! - [`store`]: [`EntityStore`] trait and the YAML cache store
//! - [`index`]: [`ScheduleIndex`], validated lookups and derived relations
//! - [`config`]: [`SiteConfig`]

pub mod config;
pub mod entity;
pub mod error;
pub mod index;
pub mod roles;
pub mod store;
pub mod types;

pub use config::{RetryConfig, SiteConfig, DEFAULT_CONFIG_FILE};
pub use entity::{EntityKind, EntityRef, ScheduleEntity};
pub use error::{ConfigError, IntegrityError, StoreError};
pub use index::ScheduleIndex;
pub use roles::{Role, RoleState, SpeakerPolicy};
pub use store::{EntityStore, Record, YamlCacheStore};
pub use types::{
    Conference, ConferenceDay, ConferenceProfile, DayId, Event, EventId, Person, PersonId,
    RoleAssignment, Room, RoomId, Schedule, Track, TrackId,
};
