//! Tera rendering engine: embedded page templates plus user overrides.
//!
//! # Templates
//!
//! | Template        | Renders                    | Output path              |
//! |-----------------|----------------------------|--------------------------|
//! | `room.html`     | one room and its events    | `room/<slug>.html`       |
//! | `track.html`    | one track and its events   | `track/<slug>.html`      |
//! | `event.html`    | one event                  | `event/<slug>.html`      |
//! | `speaker.html`  | one speaker                | `speaker/<slug>.html`    |
//! | `<name>s.html`  | a listing of everything    | `<name>s.html`           |
//!
//! `_layout.html` is the shared base: YAML front matter followed by the body.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera, Value};

use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates, baked into the binary via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("_layout.html", include_str!("templates/_layout.html")),
    ("room.html", include_str!("templates/room.html")),
    ("track.html", include_str!("templates/track.html")),
    ("event.html", include_str!("templates/event.html")),
    ("speaker.html", include_str!("templates/speaker.html")),
    ("rooms.html", include_str!("templates/rooms.html")),
    ("tracks.html", include_str!("templates/tracks.html")),
    ("events.html", include_str!("templates/events.html")),
    ("speakers.html", include_str!("templates/speakers.html")),
];

pub const ROOM_TEMPLATE: &str = "room.html";
pub const TRACK_TEMPLATE: &str = "track.html";
pub const EVENT_TEMPLATE: &str = "event.html";
pub const SPEAKER_TEMPLATE: &str = "speaker.html";

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io {
        path: path.into(),
        source,
    }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        tracing::warn!(
            "template dir {} does not exist; using built-ins",
            dir.display()
        );
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        if path.extension().and_then(|s| s.to_str()) != Some("html") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        tracing::debug!("template override {name} from {}", path.display());
        templates.push((name, contents));
    }
    Ok(templates)
}

/// Quote a scalar for a YAML front matter line.
///
/// Values containing `:` are single-quoted with inner quotes doubled;
/// everything else passes through.
pub fn yaml_quote(value: &str) -> String {
    if value.contains(':') {
        format!("'{}'", value.replace('\'', "''"))
    } else {
        value.to_string()
    }
}

fn yaml_str_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let quoted = match value {
        Value::Null => String::new(),
        Value::String(s) => yaml_quote(s),
        other => yaml_quote(&other.to_string()),
    };
    Ok(Value::String(quoted))
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert(
            normalize_template_name(Path::new(name)),
            (*content).to_string(),
        );
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.register_filter("yaml_str", yaml_str_filter);
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Tera-based engine for rendering page templates with optional user overrides.
///
/// `user_template_dir` may contain `.html` files that override the embedded
/// defaults or add new listing templates. Template names are normalised to
/// lowercase relative paths.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(TemplateEngine { tera })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render `name` with the fields of `bindings` as top-level variables.
    pub fn render<T: Serialize>(&self, name: &str, bindings: &T) -> Result<String, RenderError> {
        let ctx = Context::from_serialize(bindings)?;
        Ok(self.tera.render(name, &ctx)?)
    }

    /// Top-level templates whose stem ends in `s`, sorted by name.
    ///
    /// Partials (leading `_`) and templates in subdirectories never count.
    pub fn listing_templates(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tera
            .get_template_names()
            .filter(|n| !n.contains('/') && !n.starts_with('_'))
            .filter(|n| {
                Path::new(n)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|stem| stem.ends_with('s'))
            })
            .map(str::to_owned)
            .collect();
        names.sort();
        names
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
