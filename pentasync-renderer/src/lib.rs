//! # pentasync-renderer
//!
//! Turns an indexed schedule into rendered pages: one per room, track, event
//! and speaker, plus optional listing pages.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pentasync_core::{Schedule, ScheduleIndex};
//! use pentasync_renderer::{SiteOptions, SitePlanner, TemplateEngine};
//!
//! fn plan(schedule: &Schedule) {
//!     let Ok(index) = ScheduleIndex::build(schedule) else { return };
//!     if let Ok(engine) = TemplateEngine::new(None) {
//!         let planner = SitePlanner::new(&engine, SiteOptions::default());
//!         if let Ok(pages) = planner.plan(&index) {
//!             for page in pages {
//!                 println!("{}: {} bytes", page.path.display(), page.content.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod site;
pub mod slug;

pub use context::{ContextBuilder, Links};
pub use engine::{yaml_quote, TemplateEngine};
pub use error::RenderError;
pub use site::{RenderedPage, SiteOptions, SitePlanner};
pub use slug::{DefaultSlugger, Slugger};
