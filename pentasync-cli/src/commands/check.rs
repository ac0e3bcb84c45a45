//! `pentasync check`: load and index the cache without rendering.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use pentasync_core::{EntityStore, ScheduleIndex, YamlCacheStore};

use super::SiteArgs;

/// Arguments for `pentasync check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub site: SiteArgs,
}

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "collection")]
    collection: &'static str,
    #[tabled(rename = "records")]
    records: usize,
}

impl CheckArgs {
    pub fn run(self, config_path: &Path) -> Result<()> {
        let config = self.site.load(config_path)?;
        let store = YamlCacheStore::new(&config.cache_dir);
        let schedule = store
            .load_schedule()
            .with_context(|| format!("failed to read cache {}", config.cache_dir.display()))?;
        let index = ScheduleIndex::build(&schedule).context("schedule failed integrity check")?;

        let title = schedule
            .conference
            .as_ref()
            .map(|c| c.title.as_str())
            .unwrap_or("(no conference record)");
        println!(
            "pentasync v{} | {}",
            env!("CARGO_PKG_VERSION"),
            title.bold()
        );

        let rows = vec![
            CountRow {
                collection: "days",
                records: schedule.days.len(),
            },
            CountRow {
                collection: "rooms",
                records: schedule.rooms.len(),
            },
            CountRow {
                collection: "tracks",
                records: schedule.tracks.len(),
            },
            CountRow {
                collection: "events",
                records: schedule.events.len(),
            },
            CountRow {
                collection: "persons",
                records: schedule.persons.len(),
            },
            CountRow {
                collection: "role assignments",
                records: schedule.role_assignments.len(),
            },
            CountRow {
                collection: "profiles",
                records: schedule.profiles.len(),
            },
            CountRow {
                collection: "speakers",
                records: index.speakers().len(),
            },
        ];
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{} references resolve", "✓".green());
        Ok(())
    }
}
