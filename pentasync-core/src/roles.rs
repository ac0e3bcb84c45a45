//! Event roles, role states, and the policy that turns them into speakers.
//!
//! Both enums are closed over the values the schedule cares about; anything
//! else is kept verbatim in `Other` and never counts towards speakers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a person on an event (`event_role` in the cache).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Coordinator,
    Moderator,
    Speaker,
    Other(String),
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "coordinator" => Role::Coordinator,
            "moderator" => Role::Moderator,
            "speaker" => Role::Speaker,
            _ => Role::Other(raw),
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_owned())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Coordinator => write!(f, "coordinator"),
            Role::Moderator => write!(f, "moderator"),
            Role::Speaker => write!(f, "speaker"),
            Role::Other(raw) => raw.fmt(f),
        }
    }
}

/// Confirmation state of a role (`event_role_state` in the cache).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleState {
    Confirmed,
    Offer,
    Other(String),
}

impl Default for RoleState {
    /// A missing state is not an active one.
    fn default() -> Self {
        RoleState::Other(String::new())
    }
}

impl From<String> for RoleState {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "confirmed" => RoleState::Confirmed,
            "offer" => RoleState::Offer,
            _ => RoleState::Other(raw),
        }
    }
}

impl From<&str> for RoleState {
    fn from(raw: &str) -> Self {
        RoleState::from(raw.to_owned())
    }
}

impl From<RoleState> for String {
    fn from(state: RoleState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for RoleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleState::Confirmed => write!(f, "confirmed"),
            RoleState::Offer => write!(f, "offer"),
            RoleState::Other(raw) => raw.fmt(f),
        }
    }
}

/// Which roles and states make a person a speaker of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerPolicy {
    pub roles: Vec<Role>,
    pub states: Vec<RoleState>,
}

impl Default for SpeakerPolicy {
    fn default() -> Self {
        Self {
            roles: vec![Role::Coordinator, Role::Moderator, Role::Speaker],
            states: vec![RoleState::Confirmed, RoleState::Offer],
        }
    }
}

impl SpeakerPolicy {
    /// `Other` values never qualify, even if listed.
    pub fn qualifies(&self, role: &Role, state: &RoleState) -> bool {
        !matches!(role, Role::Other(_))
            && !matches!(state, RoleState::Other(_))
            && self.roles.contains(role)
            && self.states.contains(state)
    }
}
