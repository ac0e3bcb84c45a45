//! Site planning: the full set of pages one schedule renders to.

use std::collections::HashMap;
use std::path::PathBuf;

use pentasync_core::{ScheduleEntity, ScheduleIndex};

use crate::context::{page_path, ContextBuilder, Links};
use crate::engine::{
    TemplateEngine, EVENT_TEMPLATE, ROOM_TEMPLATE, SPEAKER_TEMPLATE, TRACK_TEMPLATE,
};
use crate::error::RenderError;
use crate::slug::{DefaultSlugger, Slugger};

/// One rendered page, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Relative to the output root.
    pub path: PathBuf,
    pub template: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteOptions {
    pub url_prefix: String,
    pub listings: bool,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            url_prefix: "/schedule".to_string(),
            listings: true,
        }
    }
}

/// Renders every page of a schedule through one engine and slug boundary.
pub struct SitePlanner<'e> {
    engine: &'e TemplateEngine,
    slugger: Box<dyn Slugger + Send + Sync>,
    options: SiteOptions,
}

/// Collects pages and rejects a second page for the same path.
struct PageSet {
    pages: Vec<RenderedPage>,
    owners: HashMap<PathBuf, String>,
}

impl PageSet {
    fn push(&mut self, page: RenderedPage, owner: String) -> Result<(), RenderError> {
        if let Some(first) = self.owners.insert(page.path.clone(), owner.clone()) {
            return Err(RenderError::DuplicateTarget {
                path: page.path,
                first,
                second: owner,
            });
        }
        self.pages.push(page);
        Ok(())
    }
}

fn owner_of(entity: &dyn ScheduleEntity) -> String {
    format!("{} {}", entity.kind(), entity.identity_key())
}

impl<'e> SitePlanner<'e> {
    pub fn new(engine: &'e TemplateEngine, options: SiteOptions) -> Self {
        Self::with_slugger(engine, options, Box::new(DefaultSlugger))
    }

    pub fn with_slugger(
        engine: &'e TemplateEngine,
        options: SiteOptions,
        slugger: Box<dyn Slugger + Send + Sync>,
    ) -> Self {
        Self {
            engine,
            slugger,
            options,
        }
    }

    /// Render all pages: listings, speakers, events, tracks, rooms.
    ///
    /// Nothing is written; any failure aborts the whole plan.
    pub fn plan(&self, index: &ScheduleIndex<'_>) -> Result<Vec<RenderedPage>, RenderError> {
        let links = Links::resolve(index, self.slugger.as_ref(), &self.options.url_prefix)?;
        let builder = ContextBuilder::new(index, &links);
        let schedule = index.schedule();
        let mut set = PageSet {
            pages: Vec::new(),
            owners: HashMap::new(),
        };

        if self.options.listings {
            for name in self.engine.listing_templates() {
                let stem = name.trim_end_matches(".html").to_string();
                let content = self.engine.render(&name, &builder.listing_page(&stem))?;
                set.push(
                    RenderedPage {
                        path: PathBuf::from(&name),
                        template: name.clone(),
                        content,
                    },
                    format!("listing {stem}"),
                )?;
            }
        }

        for person in index.speakers() {
            let content = self
                .engine
                .render(SPEAKER_TEMPLATE, &builder.speaker_page(person))?;
            set.push(
                RenderedPage {
                    path: page_path(*person, &links.speaker_slug(person)),
                    template: SPEAKER_TEMPLATE.to_string(),
                    content,
                },
                owner_of(*person),
            )?;
        }

        for event in &schedule.events {
            let content = self
                .engine
                .render(EVENT_TEMPLATE, &builder.event_page(event))?;
            set.push(
                RenderedPage {
                    path: page_path(event, &links.event_slug(event)),
                    template: EVENT_TEMPLATE.to_string(),
                    content,
                },
                owner_of(event),
            )?;
        }

        for track in &schedule.tracks {
            let content = self
                .engine
                .render(TRACK_TEMPLATE, &builder.track_page(track))?;
            set.push(
                RenderedPage {
                    path: page_path(track, &links.track_slug(track)),
                    template: TRACK_TEMPLATE.to_string(),
                    content,
                },
                owner_of(track),
            )?;
        }

        for room in &schedule.rooms {
            let content = self
                .engine
                .render(ROOM_TEMPLATE, &builder.room_page(room))?;
            set.push(
                RenderedPage {
                    path: page_path(room, &links.room_slug(room)),
                    template: ROOM_TEMPLATE.to_string(),
                    content,
                },
                owner_of(room),
            )?;
        }

        tracing::debug!("planned {} pages", set.pages.len());
        Ok(set.pages)
    }
}
