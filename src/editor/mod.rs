//! Application state and every action that mutates it.
//!
//! `Editor` owns the grid state (data, configuration, overrides), the
//! selection, and the undo history. Mutating actions:
//! - Apply their change to the state
//! - Commit exactly one history snapshot, even for bulk actions
//! - Notify subscribed listeners
//!
//! Selection and hover never enter the history.

pub mod history;
pub(crate) mod mutation;

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::color::zebra_colors;
use crate::error::{BarcodeGridError, Result};
use crate::layout::GridLayout;
use crate::time::now_ms;
use crate::types::{
    BarcodeItem, CellKey, ColorSet, ConfigPreset, GridConfig, GridState, Overrides, Preset,
    DEFAULT_SPACING,
};

pub use history::{History, HistoryEntry};
pub use mutation::{ConfigPatch, GlobalSettingsPatch};

/// What kind of change a listener is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Data,
    Config,
    Colors,
    Spacing,
    Preset,
    History,
    Selection,
    Hover,
}

impl Change {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Config => "config",
            Self::Colors => "colors",
            Self::Spacing => "spacing",
            Self::Preset => "preset",
            Self::History => "history",
            Self::Selection => "selection",
            Self::Hover => "hover",
        }
    }
}

/// Handle returned by [`Editor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(Change)>;

/// The explicit application-state object.
pub struct Editor {
    state: GridState,
    history: History,
    selection: BTreeSet<CellKey>,
    hovered: Option<CellKey>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("history", &self.history.len())
            .field("selection", &self.selection)
            .field("hovered", &self.hovered)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Editor {
    /// Empty grid with the default configuration and unbounded history.
    pub fn new() -> Self {
        Self::from_state(GridState::default())
    }

    pub fn from_state(state: GridState) -> Self {
        let history = History::new(state.clone(), now_ms());
        Self::with_history(state, history)
    }

    /// Keep at most `max_depth` history entries.
    pub fn with_history_depth(state: GridState, max_depth: usize) -> Self {
        let history = History::with_depth(state.clone(), now_ms(), max_depth);
        Self::with_history(state, history)
    }

    fn with_history(state: GridState, history: History) -> Self {
        Self {
            state,
            history,
            selection: BTreeSet::new(),
            hovered: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> &GridState {
        &self.state
    }

    pub fn data(&self) -> &[BarcodeItem] {
        &self.state.data
    }

    pub fn config(&self) -> &GridConfig {
        &self.state.config
    }

    pub fn overrides(&self) -> &Overrides {
        &self.state.overrides
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &BTreeSet<CellKey> {
        &self.selection
    }

    pub fn is_selected(&self, key: CellKey) -> bool {
        self.selection.contains(&key)
    }

    pub fn hovered(&self) -> Option<CellKey> {
        self.hovered
    }

    /// Lines needed for the current data (`ceil(items / columns)`).
    pub fn total_rows(&self) -> usize {
        self.state.total_rows()
    }

    /// Geometry of the current state.
    pub fn layout(&self) -> GridLayout {
        GridLayout::compute(&self.state)
    }

    // ------------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------------

    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            listener(change);
        }
    }

    fn commit(&mut self, change: Change) {
        self.history.record(self.state.clone(), now_ms());
        debug!(
            change = change.as_str(),
            entries = self.history.len(),
            "state committed"
        );
        self.notify(change);
    }

    // ------------------------------------------------------------------------
    // Data and configuration
    // ------------------------------------------------------------------------

    /// Replace the item list wholesale.
    pub fn set_data(&mut self, data: Vec<BarcodeItem>) {
        info!(items = data.len(), "data replaced");
        self.state.data = data;
        self.commit(Change::Data);
    }

    /// Replace the configuration after validating it. Invalid configurations
    /// leave the state untouched.
    pub fn set_config(&mut self, config: GridConfig) -> Result<()> {
        self.state.config = mutation::checked_config(config)?;
        self.commit(Change::Config);
        Ok(())
    }

    /// Merge `patch` into the configuration, then validate.
    pub fn update_config(&mut self, patch: &ConfigPatch) -> Result<()> {
        let next = patch.apply(&self.state.config);
        self.set_config(next)
    }

    // ------------------------------------------------------------------------
    // Colors
    // ------------------------------------------------------------------------

    pub fn set_line_color(&mut self, line: u32, colors: ColorSet) {
        self.state.overrides.line_colors.insert(line, colors);
        self.commit(Change::Colors);
    }

    pub fn set_column_color(&mut self, column: u32, colors: ColorSet) {
        self.state.overrides.column_colors.insert(column, colors);
        self.commit(Change::Colors);
    }

    pub fn set_cell_color(&mut self, key: CellKey, colors: ColorSet) {
        self.state.overrides.cell_colors.insert(key, colors);
        self.commit(Change::Colors);
    }

    pub fn clear_line_color(&mut self, line: u32) {
        self.state.overrides.line_colors.remove(&line);
        self.commit(Change::Colors);
    }

    pub fn clear_column_color(&mut self, column: u32) {
        self.state.overrides.column_colors.remove(&column);
        self.commit(Change::Colors);
    }

    pub fn clear_cell_color(&mut self, key: CellKey) {
        self.state.overrides.cell_colors.remove(&key);
        self.commit(Change::Colors);
    }

    /// Give every selected cell its own override. Returns how many cells changed.
    pub fn apply_colors_to_selection(&mut self, colors: &ColorSet) -> Result<usize> {
        if self.selection.is_empty() {
            return Err(BarcodeGridError::InvalidInput(
                "select at least one cell".into(),
            ));
        }
        for key in &self.selection {
            self.state
                .overrides
                .cell_colors
                .insert(*key, colors.clone());
        }
        let count = self.selection.len();
        self.commit(Change::Colors);
        Ok(count)
    }

    /// Same line override on every line that holds data.
    pub fn apply_line_color_to_all_lines(&mut self, colors: &ColorSet) {
        for line in self.line_indices() {
            self.state
                .overrides
                .line_colors
                .insert(line, colors.clone());
        }
        self.commit(Change::Colors);
    }

    /// Alternate white and light gray line backgrounds with black ink.
    pub fn apply_zebra_striping(&mut self) {
        for line in self.line_indices() {
            self.state
                .overrides
                .line_colors
                .insert(line, zebra_colors(line));
        }
        self.commit(Change::Colors);
    }

    /// Drop every line, column and cell color.
    pub fn clear_all_colors(&mut self) {
        let overrides = &mut self.state.overrides;
        overrides.line_colors.clear();
        overrides.column_colors.clear();
        overrides.cell_colors.clear();
        self.commit(Change::Colors);
    }

    fn line_indices(&self) -> impl Iterator<Item = u32> {
        0..u32::try_from(self.total_rows()).unwrap_or(u32::MAX)
    }

    // ------------------------------------------------------------------------
    // Spacing
    // ------------------------------------------------------------------------

    pub fn set_line_spacing(&mut self, line: u32, spacing: f64) -> Result<()> {
        let spacing = mutation::checked_spacing(spacing)?;
        self.state.overrides.line_spacing.insert(line, spacing);
        self.commit(Change::Spacing);
        Ok(())
    }

    pub fn set_column_spacing(&mut self, column: u32, spacing: f64) -> Result<()> {
        let spacing = mutation::checked_spacing(spacing)?;
        self.state.overrides.column_spacing.insert(column, spacing);
        self.commit(Change::Spacing);
        Ok(())
    }

    /// Same gap after every line but the last and every column but the last.
    pub fn apply_global_spacing(&mut self, spacing: f64) -> Result<()> {
        let spacing = mutation::checked_spacing(spacing)?;
        let lines = u32::try_from(self.total_rows().saturating_sub(1)).unwrap_or(u32::MAX);
        let columns = self.state.config.columns.saturating_sub(1);
        let overrides = &mut self.state.overrides;
        for line in 0..lines {
            overrides.line_spacing.insert(line, spacing);
        }
        for column in 0..columns {
            overrides.column_spacing.insert(column, spacing);
        }
        self.commit(Change::Spacing);
        Ok(())
    }

    /// Put every existing spacing override back to the default gap.
    pub fn reset_all_spacing(&mut self) {
        let overrides = &mut self.state.overrides;
        for spacing in overrides.line_spacing.values_mut() {
            *spacing = DEFAULT_SPACING;
        }
        for spacing in overrides.column_spacing.values_mut() {
            *spacing = DEFAULT_SPACING;
        }
        self.commit(Change::Spacing);
    }

    // ------------------------------------------------------------------------
    // Presets
    // ------------------------------------------------------------------------

    /// Replace data, configuration and overrides with the preset's.
    ///
    /// A preset whose configuration is out of range leaves the state untouched.
    pub fn load_preset(&mut self, preset: &Preset) -> Result<()> {
        let config = mutation::checked_config(preset.config.settings.grid_config())?;
        info!(id = %preset.id, name = %preset.name, "loading preset");
        self.state = GridState {
            data: preset.config.data.clone(),
            config,
            overrides: preset.config.settings.overrides(),
        };
        self.commit(Change::Preset);
        Ok(())
    }

    /// Replace configuration and overrides, keeping the current data.
    pub fn load_config_preset(&mut self, preset: &ConfigPreset) -> Result<()> {
        let config = mutation::checked_config(preset.config.grid_config())?;
        info!(id = %preset.id, name = %preset.name, "loading configuration preset");
        self.state.config = config;
        self.state.overrides = preset.config.overrides();
        self.commit(Change::Preset);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------------

    /// Restore the previous snapshot. Returns false when there is none.
    pub fn undo(&mut self) -> bool {
        let Some(state) = self.history.undo() else {
            return false;
        };
        self.state = state.clone();
        debug!(cursor = self.history.cursor(), "undo");
        self.notify(Change::History);
        true
    }

    /// Restore the next snapshot. Returns false when there is none.
    pub fn redo(&mut self) -> bool {
        let Some(state) = self.history.redo() else {
            return false;
        };
        self.state = state.clone();
        debug!(cursor = self.history.cursor(), "redo");
        self.notify(Change::History);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------------
    // Selection and hover
    // ------------------------------------------------------------------------

    pub fn select(&mut self, keys: impl IntoIterator<Item = CellKey>) {
        self.selection.extend(keys);
        self.notify(Change::Selection);
    }

    pub fn deselect(&mut self, keys: impl IntoIterator<Item = CellKey>) {
        for key in keys {
            self.selection.remove(&key);
        }
        self.notify(Change::Selection);
    }

    /// Flip one cell. Returns whether it is selected afterwards.
    pub fn toggle_selection(&mut self, key: CellKey) -> bool {
        let selected = if self.selection.remove(&key) {
            false
        } else {
            self.selection.insert(key);
            true
        };
        self.notify(Change::Selection);
        selected
    }

    /// Plain click selects only `key`; an additive click toggles it.
    pub fn click_cell(&mut self, key: CellKey, additive: bool) -> bool {
        if !additive {
            self.selection.clear();
        }
        self.toggle_selection(key)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify(Change::Selection);
    }

    pub fn set_hovered(&mut self, key: Option<CellKey>) {
        if self.hovered != key {
            self.hovered = key;
            self.notify(Change::Hover);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn items(n: usize) -> Vec<BarcodeItem> {
        (0..n)
            .map(|i| BarcodeItem::new(format!("barcode-0-{i}"), format!("LOC{i:04}")))
            .collect()
    }

    fn red() -> ColorSet {
        ColorSet::new("#fee2e2", "#991b1b", "#991b1b")
    }

    #[test]
    fn test_first_mutation_can_be_undone() {
        let mut editor = Editor::new();
        editor.set_data(items(3));
        assert!(editor.can_undo());
        assert!(editor.undo());
        assert!(editor.data().is_empty());
        assert!(editor.redo());
        assert_eq!(editor.data().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected_without_history() {
        let mut editor = Editor::new();
        let patch = ConfigPatch {
            columns: Some(11),
            ..ConfigPatch::default()
        };
        assert!(matches!(
            editor.update_config(&patch),
            Err(BarcodeGridError::Config(_))
        ));
        assert_eq!(editor.config().columns, 4);
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_bulk_actions_are_one_entry() {
        let mut editor = Editor::new();
        editor.set_data(items(20));
        let before = editor.history().len();
        editor.apply_zebra_striping();
        assert_eq!(editor.history().len(), before + 1);
        assert_eq!(editor.overrides().line_colors.len(), 5);
        assert_eq!(editor.overrides().line_colors[&1].background_color, "#f3f4f6");

        editor.undo();
        assert!(editor.overrides().line_colors.is_empty());
    }

    #[test]
    fn test_global_spacing_and_reset() {
        let mut editor = Editor::new();
        editor.set_data(items(10)); // 3 lines of 4
        editor.apply_global_spacing(24.0).unwrap();
        let o = editor.overrides();
        assert_eq!(o.line_spacing.len(), 2);
        assert_eq!(o.column_spacing.len(), 3);
        assert_eq!(o.spacing_after_line(1), 24.0);
        assert_eq!(o.spacing_after_line(2), DEFAULT_SPACING);

        editor.reset_all_spacing();
        let o = editor.overrides();
        assert_eq!(o.line_spacing.len(), 2);
        assert!(o.line_spacing.values().all(|&s| s == DEFAULT_SPACING));

        assert!(editor.apply_global_spacing(250.0).is_err());
    }

    #[test]
    fn test_selection_colors() {
        let mut editor = Editor::new();
        editor.set_data(items(8));
        assert!(editor.apply_colors_to_selection(&red()).is_err());

        editor.click_cell(CellKey::new(0, 1), false);
        editor.click_cell(CellKey::new(1, 2), true);
        assert_eq!(editor.selection().len(), 2);
        assert_eq!(editor.apply_colors_to_selection(&red()).unwrap(), 2);
        assert_eq!(editor.overrides().cell_colors.len(), 2);

        // A plain click replaces the selection.
        editor.click_cell(CellKey::new(0, 0), false);
        assert_eq!(editor.selection().len(), 1);
        assert!(editor.is_selected(CellKey::new(0, 0)));
    }

    #[test]
    fn test_selection_not_in_history() {
        let mut editor = Editor::new();
        editor.select([CellKey::new(0, 0), CellKey::new(0, 1)]);
        editor.deselect([CellKey::new(0, 0)]);
        editor.set_hovered(Some(CellKey::new(2, 2)));
        assert!(!editor.can_undo());
        assert_eq!(editor.hovered(), Some(CellKey::new(2, 2)));
        assert!(!editor.toggle_selection(CellKey::new(0, 1)));
        assert!(editor.selection().is_empty());
    }

    #[test]
    fn test_clear_colors() {
        let mut editor = Editor::new();
        editor.set_line_color(0, red());
        editor.set_column_color(1, red());
        editor.set_cell_color(CellKey::new(2, 3), red());
        assert!(editor.overrides().has_colors());
        editor.clear_line_color(0);
        assert!(editor.overrides().line_colors.is_empty());
        editor.clear_all_colors();
        assert!(!editor.overrides().has_colors());
    }

    #[test]
    fn test_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut editor = Editor::new();
        let id = editor.subscribe(move |change| sink.borrow_mut().push(change));

        editor.set_data(items(1));
        editor.undo();
        editor.toggle_selection(CellKey::new(0, 0));
        assert_eq!(
            *seen.borrow(),
            vec![Change::Data, Change::History, Change::Selection]
        );

        assert!(editor.unsubscribe(id));
        assert!(!editor.unsubscribe(id));
        editor.set_data(items(2));
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_config_preset_keeps_data() {
        let mut editor = Editor::new();
        editor.set_data(items(5));
        editor.set_line_color(0, red());
        let preset = ConfigPreset {
            id: "config-preset-1".into(),
            name: "Two columns".into(),
            timestamp: 1,
            config: crate::types::PresetSettings::capture(
                &GridConfig {
                    columns: 2,
                    ..GridConfig::default()
                },
                &Overrides::default(),
            ),
        };
        editor.load_config_preset(&preset).unwrap();
        assert_eq!(editor.data().len(), 5);
        assert_eq!(editor.config().columns, 2);
        assert!(!editor.overrides().has_colors());
    }

    #[test]
    fn test_out_of_range_preset_not_loaded() {
        let mut editor = Editor::new();
        editor.set_data(items(3));
        let before = editor.state().clone();
        let entries = editor.history().len();

        let mut settings = crate::types::PresetSettings::capture(
            &GridConfig::default(),
            &Overrides::default(),
        );
        settings.columns = 2_000_000;
        settings.margin = -30.0;
        let config_preset = ConfigPreset {
            id: "config-preset-9".into(),
            name: "Broken".into(),
            timestamp: 1,
            config: settings.clone(),
        };
        let preset = Preset {
            id: "preset-9".into(),
            name: "Broken".into(),
            timestamp: 1,
            config: crate::types::PresetConfig {
                data: Vec::new(),
                settings,
            },
        };

        assert!(matches!(
            editor.load_config_preset(&config_preset),
            Err(BarcodeGridError::Config(_))
        ));
        assert!(editor.load_preset(&preset).is_err());
        assert_eq!(editor.state(), &before);
        assert_eq!(editor.history().len(), entries);
    }
}
