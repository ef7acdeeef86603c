//! User preferences and their persistence.
//!
//! [`Preferences`] is a plain serde record. It is loaded once when the addon
//! starts and saved synchronously after every mutation. Persistence sits
//! behind the [`PreferencesStore`] trait:
//!
//! - [`JsonPreferencesStore`] writes pretty-printed JSON next to the other
//!   addon files. Writes go to a temporary file in the same directory which
//!   is then renamed over the target, so readers never see a torn file.
//! - [`MemoryPreferencesStore`] keeps the last saved value in memory and
//!   counts saves. Tests use it to assert that each mutation saves once.
//!
//! Loading never fails. A missing file yields defaults; a malformed file
//! yields defaults and a warning.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dobj_host::kind::{ObjectKind, KIND_COUNT};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// File name used by [`JsonPreferencesStore::in_dir`].
pub const PREFERENCES_FILE: &str = "display-objects.json";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from reading or writing the preferences file.
#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("preferences I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("preferences file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// User-toggleable overlay settings.
///
/// Missing fields in a saved file take their default value, so files written
/// by older versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Format version of the saved record.
    pub version: i32,
    /// Master switch for the overlay.
    pub enabled: bool,
    /// Visibility per [`ObjectKind`], indexed by the kind's discriminant.
    /// Index 0 is never visible.
    pub enabled_kinds: [bool; KIND_COUNT],
    /// Show the short tooltip next to every marker.
    pub always_show_tooltip: bool,
    /// Show the full tooltip and detail block under the cursor.
    pub mouseover_tooltip: bool,
    /// Marker circle radius in screen units.
    pub marker_radius: f32,
    /// Padding around tooltip text; also the tooltip corner radius.
    pub tooltip_padding: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: 0,
            enabled: true,
            enabled_kinds: [false; KIND_COUNT],
            always_show_tooltip: true,
            mouseover_tooltip: true,
            marker_radius: 3.5,
            tooltip_padding: 5.0,
        }
    }
}

impl Preferences {
    /// Defaults with the given kinds visible.
    pub fn with_visible_kinds(kinds: impl IntoIterator<Item = ObjectKind>) -> Self {
        let mut prefs = Self::default();
        for kind in kinds {
            prefs.set_kind_visible(kind, true);
        }
        prefs
    }

    /// Whether objects of `kind` are drawn. [`ObjectKind::None`] never is.
    pub fn is_kind_visible(&self, kind: ObjectKind) -> bool {
        kind != ObjectKind::None && self.enabled_kinds[kind.index()]
    }

    /// Show or hide `kind`. Requests for [`ObjectKind::None`] are ignored.
    pub fn set_kind_visible(&mut self, kind: ObjectKind, visible: bool) {
        if kind != ObjectKind::None {
            self.enabled_kinds[kind.index()] = visible;
        }
    }

    /// Kinds currently visible, in index order.
    pub fn visible_kinds(&self) -> impl Iterator<Item = ObjectKind> + '_ {
        ObjectKind::toggleable().filter(|kind| self.is_kind_visible(*kind))
    }

    /// Clear the `None` slot in case a hand-edited file set it.
    fn sanitized(mut self) -> Self {
        self.enabled_kinds[ObjectKind::None.index()] = false;
        self
    }
}

// ---------------------------------------------------------------------------
// PreferencesStore
// ---------------------------------------------------------------------------

/// Durable storage for [`Preferences`].
pub trait PreferencesStore {
    /// Saved preferences, or defaults when nothing usable is stored.
    fn load(&mut self) -> Preferences;

    /// Persist `prefs`. Failures are logged; the caller keeps its in-memory
    /// state either way.
    fn save(&mut self, prefs: &Preferences);
}

// ---------------------------------------------------------------------------
// JsonPreferencesStore
// ---------------------------------------------------------------------------

/// Preferences stored as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonPreferencesStore {
    path: PathBuf,
    default_kinds: Vec<ObjectKind>,
}

impl JsonPreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_kinds: Vec::new(),
        }
    }

    /// Store at `dir`/[`PREFERENCES_FILE`].
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PREFERENCES_FILE))
    }

    /// Kinds visible when no saved file exists.
    pub fn with_defaults(mut self, kinds: impl IntoIterator<Item = ObjectKind>) -> Self {
        self.default_kinds = kinds.into_iter().collect();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Preferences used when the file is absent or unreadable.
    pub fn defaults(&self) -> Preferences {
        Preferences::with_visible_kinds(self.default_kinds.iter().copied())
    }

    fn io_error(&self, source: io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    /// Read the file. `Ok(None)` when it does not exist.
    pub fn try_load(&self) -> Result<Option<Preferences>, PreferencesError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let prefs: Preferences = serde_json::from_str(&json)?;
        Ok(Some(prefs.sanitized()))
    }

    /// Write the file atomically.
    pub fn try_save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_string_pretty(prefs)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

impl PreferencesStore for JsonPreferencesStore {
    fn load(&mut self) -> Preferences {
        match self.try_load() {
            Ok(Some(prefs)) => {
                tracing::info!(path = %self.path.display(), "preferences loaded");
                prefs
            }
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "no preferences file, using defaults");
                self.defaults()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable preferences file, using defaults"
                );
                self.defaults()
            }
        }
    }

    fn save(&mut self, prefs: &Preferences) {
        match self.try_save(prefs) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "preferences saved"),
            Err(e) => tracing::error!(
                path = %self.path.display(),
                error = %e,
                "failed to save preferences"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryPreferencesStore
// ---------------------------------------------------------------------------

/// In-memory store that records how often it was saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferencesStore {
    stored: Option<Preferences>,
    defaults: Preferences,
    saves: usize,
}

impl MemoryPreferencesStore {
    /// Empty store; loads return [`Preferences::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `prefs`.
    pub fn holding(prefs: Preferences) -> Self {
        Self {
            stored: Some(prefs),
            ..Self::default()
        }
    }

    /// Empty store whose loads return `defaults`.
    pub fn with_defaults(defaults: Preferences) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Number of `save` calls so far.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// The last saved value.
    pub fn stored(&self) -> Option<&Preferences> {
        self.stored.as_ref()
    }
}

impl PreferencesStore for MemoryPreferencesStore {
    fn load(&mut self) -> Preferences {
        self.stored.clone().unwrap_or_else(|| self.defaults.clone())
    }

    fn save(&mut self, prefs: &Preferences) {
        self.saves += 1;
        self.stored = Some(prefs.clone());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
