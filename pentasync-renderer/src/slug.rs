//! Slug boundary: names output files and URLs after entities.

use pentasync_core::ScheduleEntity;

use crate::error::RenderError;

/// Maps an entity to a path-safe name. Must be pure: the same entity always
/// yields the same slug.
pub trait Slugger {
    fn slug_of(&self, entity: &dyn ScheduleEntity) -> Result<String, RenderError>;
}

/// Lowercased explicit slug or display name.
///
/// Rules:
/// - runs of whitespace become `_`
/// - `-` becomes `_`
/// - `.` is dropped
/// - anything that is neither alphanumeric nor `_` is dropped
///
/// An empty result is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSlugger;

impl DefaultSlugger {
    pub fn slugify(input: &str) -> String {
        input
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .filter_map(|c| match c {
                '-' | '_' => Some('_'),
                c if c.is_alphanumeric() => Some(c),
                _ => None,
            })
            .collect()
    }
}

impl Slugger for DefaultSlugger {
    fn slug_of(&self, entity: &dyn ScheduleEntity) -> Result<String, RenderError> {
        let source = match entity.explicit_slug() {
            Some(slug) => slug.to_string(),
            None => entity.display_name().into_owned(),
        };
        let slug = Self::slugify(&source);
        if slug.is_empty() {
            return Err(RenderError::Slug {
                entity: format!("{} {}", entity.kind(), entity.identity_key()),
                reason: format!("'{source}' has no path-safe characters"),
            });
        }
        Ok(slug)
    }
}
