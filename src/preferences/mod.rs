//! Accessibility preference store.
//!
//! Persists a small set of user-chosen display adjustments and projects them
//! onto a [`PresentationContext`], the explicitly-owned stand-in for
//! document-level presentation state. Storage failures degrade to
//! "preferences do not survive reload" and are logged, never surfaced.

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Storage key the preference set is persisted under.
pub const PREFERENCES_KEY: &str = "accessibility-settings";

/// Smallest allowed font scale, in percent.
pub const FONT_SCALE_MIN: u32 = 80;

/// Largest allowed font scale, in percent.
pub const FONT_SCALE_MAX: u32 = 150;

/// Granularity of font scale adjustments, in percent.
pub const FONT_SCALE_STEP: u32 = 10;

/// A user-chosen set of display adjustments.
///
/// Fields present in a stored payload override defaults; fields missing from
/// an older payload fall back to their defaults individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceSet {
    #[serde(default = "default_font_scale")]
    pub font_scale_percent: u32,

    #[serde(default)]
    pub high_contrast: bool,

    #[serde(default)]
    pub highlight_links: bool,

    #[serde(default)]
    pub pause_animations: bool,

    #[serde(default)]
    pub large_pointer: bool,
}

fn default_font_scale() -> u32 {
    100
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            font_scale_percent: default_font_scale(),
            high_contrast: false,
            highlight_links: false,
            pause_animations: false,
            large_pointer: false,
        }
    }
}

impl PreferenceSet {
    /// Force the font scale back onto the valid domain.
    fn normalize(mut self) -> Self {
        self.font_scale_percent = clamp_font_scale(self.font_scale_percent);
        self
    }
}

/// Clamp a font scale to [`FONT_SCALE_MIN`]..=[`FONT_SCALE_MAX`] and snap it
/// onto the [`FONT_SCALE_STEP`] grid. 160 becomes 150, 75 becomes 80, 83
/// becomes 80.
pub fn clamp_font_scale(value: u32) -> u32 {
    let value = value.clamp(FONT_SCALE_MIN, FONT_SCALE_MAX);
    value - value % FONT_SCALE_STEP
}

/// A single preference mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceUpdate {
    FontScalePercent(u32),
    HighContrast(bool),
    HighlightLinks(bool),
    PauseAnimations(bool),
    LargePointer(bool),
}

/// Independent boolean display modes a preference can switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DisplayMode {
    HighContrast,
    HighlightLinks,
    PauseAnimations,
    LargePointer,
}

/// Document-level presentation state, scoped to one page shell.
///
/// This is the one piece of shared mutable presentation state in the
/// subsystem. It is owned explicitly (injected into the store, readable by
/// the shell) rather than ambient, so each test run can instantiate an
/// isolated context.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PresentationContext {
    font_scale_percent: u32,
    modes: BTreeSet<DisplayMode>,
}

impl PresentationContext {
    /// Create a context with nothing applied yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently applied font scale, in percent.
    pub fn font_scale_percent(&self) -> u32 {
        self.font_scale_percent
    }

    /// Whether a display mode is currently switched on.
    pub fn is_mode_enabled(&self, mode: DisplayMode) -> bool {
        self.modes.contains(&mode)
    }

    fn set_font_scale(&mut self, percent: u32) {
        self.font_scale_percent = percent;
    }

    fn set_mode(&mut self, mode: DisplayMode, enabled: bool) {
        if enabled {
            self.modes.insert(mode);
        } else {
            self.modes.remove(&mode);
        }
    }
}

/// Maps user intent onto a persisted, applied [`PreferenceSet`].
///
/// Every mutation is written back to storage immediately and applied to the
/// presentation context in the same call; there is no batching.
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
    context: PresentationContext,
    current: PreferenceSet,
}

impl PreferenceStore {
    /// Create a store, reading any persisted preferences and applying them to
    /// the injected context.
    pub fn new(store: Arc<dyn KeyValueStore>, context: PresentationContext) -> Self {
        let current = Self::load_from(store.as_ref());
        let mut prefs = Self {
            store,
            context,
            current: current.clone(),
        };
        prefs.apply(&current);
        prefs
    }

    /// Read the persisted preference set, falling back to defaults.
    ///
    /// Fails soft: a missing key, a storage read error, or a malformed payload
    /// all yield the default set. Malformed payloads are discarded wholesale,
    /// never partially applied.
    fn load_from(store: &dyn KeyValueStore) -> PreferenceSet {
        let saved = match store.get(PREFERENCES_KEY) {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!("Failed to read preferences, using defaults: {}", e);
                return PreferenceSet::default();
            }
        };

        match saved {
            Some(payload) => match serde_json::from_str::<PreferenceSet>(&payload) {
                Ok(set) => set.normalize(),
                Err(e) => {
                    tracing::warn!("Discarding malformed preference payload: {}", e);
                    PreferenceSet::default()
                }
            },
            None => PreferenceSet::default(),
        }
    }

    /// The current preference set.
    pub fn current(&self) -> &PreferenceSet {
        &self.current
    }

    /// The presentation context the preferences are applied to.
    pub fn context(&self) -> &PresentationContext {
        &self.context
    }

    /// Idempotently project `set` onto the presentation context.
    pub fn apply(&mut self, set: &PreferenceSet) {
        self.context.set_font_scale(set.font_scale_percent);
        self.context
            .set_mode(DisplayMode::HighContrast, set.high_contrast);
        self.context
            .set_mode(DisplayMode::HighlightLinks, set.highlight_links);
        self.context
            .set_mode(DisplayMode::PauseAnimations, set.pause_animations);
        self.context
            .set_mode(DisplayMode::LargePointer, set.large_pointer);
    }

    /// Validate, merge, apply, and persist a single preference change.
    ///
    /// Out-of-domain font scales are clamped at this boundary; the raw value
    /// is never stored.
    pub fn update(&mut self, change: PreferenceUpdate) -> &PreferenceSet {
        match change {
            PreferenceUpdate::FontScalePercent(value) => {
                self.current.font_scale_percent = clamp_font_scale(value);
            }
            PreferenceUpdate::HighContrast(on) => self.current.high_contrast = on,
            PreferenceUpdate::HighlightLinks(on) => self.current.highlight_links = on,
            PreferenceUpdate::PauseAnimations(on) => self.current.pause_animations = on,
            PreferenceUpdate::LargePointer(on) => self.current.large_pointer = on,
        }

        let set = self.current.clone();
        self.apply(&set);
        self.persist();
        &self.current
    }

    /// Step the font scale up by one increment, saturating at the maximum.
    pub fn increase_font_scale(&mut self) -> &PreferenceSet {
        let next = self.current.font_scale_percent.saturating_add(FONT_SCALE_STEP);
        self.update(PreferenceUpdate::FontScalePercent(next))
    }

    /// Step the font scale down by one increment, saturating at the minimum.
    pub fn decrease_font_scale(&mut self) -> &PreferenceSet {
        let next = self.current.font_scale_percent.saturating_sub(FONT_SCALE_STEP);
        self.update(PreferenceUpdate::FontScalePercent(next))
    }

    /// Return to defaults, apply them, and clear the persisted entry.
    pub fn reset(&mut self) -> &PreferenceSet {
        self.current = PreferenceSet::default();
        let set = self.current.clone();
        self.apply(&set);

        if let Err(e) = self.store.remove(PREFERENCES_KEY) {
            self.log_storage_failure(&e);
        }
        &self.current
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.current) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to serialize preferences: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(PREFERENCES_KEY, &payload) {
            self.log_storage_failure(&e);
        }
    }

    fn log_storage_failure(&self, error: &StorageError) {
        tracing::warn!(
            "Preference storage failure (preferences will not survive reload): {}",
            error
        );
    }
}
