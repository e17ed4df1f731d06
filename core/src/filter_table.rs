//! Table presentation of the player filter.
//!
//! `PlayerFilterTable` answers the data-source questions of a sectioned list
//! (sections, rows, cell contents) and turns row taps into filter mutations
//! on the discovery view model. What to redraw is returned as a
//! `TableUpdate` for the host UI to apply.

use std::sync::Arc;
use std::time::Duration;

use crate::discover::DiscoverPlayerViewModel;
use crate::filter::SortOrder;
use crate::http::Transport;
use crate::types::Position;

/// Duration of the cross-fade after the filters are reset.
pub const RESET_CROSS_FADE: Duration = Duration::from_millis(400);

pub const ANY: &str = "Any";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSection {
    Sort,
    PlayerInfo,
    Reset,
}

impl FilterSection {
    pub const ALL: [FilterSection; 3] = [FilterSection::Sort, FilterSection::PlayerInfo, FilterSection::Reset];

    pub fn header_text(&self) -> Option<&'static str> {
        match self {
            FilterSection::Sort => Some("Sort by"),
            FilterSection::PlayerInfo => Some("Player info"),
            FilterSection::Reset => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInfoRow {
    Nationality,
    Position,
    OverallRange,
}

impl PlayerInfoRow {
    pub const ALL: [PlayerInfoRow; 3] = [
        PlayerInfoRow::Nationality,
        PlayerInfoRow::Position,
        PlayerInfoRow::OverallRange,
    ];

    /// Rows that open an inline picker when tapped.
    pub fn has_picker(&self) -> bool {
        !matches!(self, PlayerInfoRow::OverallRange)
    }
}

/// Contents of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellModel {
    Sort { text: String, selected: bool },
    Picker { title: String, detail: String },
    Range { min: u8, max: u8 },
    Action { text: String },
}

/// What the host should redraw after a tap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableAction {
    None,
    ReloadSections(Vec<usize>),
    ReloadRows(Vec<IndexPath>),
    /// Focus the picker attached to the row.
    BeginEditing(PlayerInfoRow),
    ReloadAll { cross_fade: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableUpdate {
    pub action: TableAction,
    pub deselect: Option<IndexPath>,
}

pub struct PlayerFilterTable<T> {
    view_model: Arc<DiscoverPlayerViewModel<T>>,
    last_selected: Option<IndexPath>,
}

impl<T: Transport> PlayerFilterTable<T> {
    pub fn new(view_model: Arc<DiscoverPlayerViewModel<T>>) -> Self {
        Self {
            view_model,
            last_selected: None,
        }
    }

    pub fn view_model(&self) -> &DiscoverPlayerViewModel<T> {
        &self.view_model
    }

    pub fn last_selected(&self) -> Option<IndexPath> {
        self.last_selected
    }

    pub fn number_of_sections(&self) -> usize {
        FilterSection::ALL.len()
    }

    pub fn section(&self, index: usize) -> Option<FilterSection> {
        FilterSection::ALL.get(index).copied()
    }

    pub fn title_for_header(&self, section: usize) -> Option<&'static str> {
        self.section(section)?.header_text()
    }

    pub fn number_of_rows_in(&self, section: usize) -> usize {
        match self.section(section) {
            Some(FilterSection::Sort) => SortOrder::ALL.len(),
            Some(FilterSection::PlayerInfo) => PlayerInfoRow::ALL.len(),
            Some(FilterSection::Reset) => 1,
            None => 0,
        }
    }

    pub fn cell(&self, path: IndexPath) -> Option<CellModel> {
        let filter = self.view_model.filter_data();
        let cell = match self.section(path.section)? {
            FilterSection::Sort => {
                let sort = SortOrder::ALL.get(path.row)?;
                CellModel::Sort {
                    text: sort.title().to_string(),
                    selected: *sort == filter.sort,
                }
            }
            FilterSection::PlayerInfo => match PlayerInfoRow::ALL.get(path.row)? {
                PlayerInfoRow::Nationality => CellModel::Picker {
                    title: "Nationality".to_string(),
                    detail: self.detail_text_for_nationality(),
                },
                PlayerInfoRow::Position => CellModel::Picker {
                    title: "Position".to_string(),
                    detail: self.detail_text_for_position(),
                },
                PlayerInfoRow::OverallRange => CellModel::Range {
                    min: filter.overall.min(),
                    max: filter.overall.max(),
                },
            },
            FilterSection::Reset if path.row == 0 => CellModel::Action {
                text: "Reset filters".to_string(),
            },
            FilterSection::Reset => return None,
        };
        Some(cell)
    }

    pub fn detail_text_for_nationality(&self) -> String {
        self.view_model
            .filter_data()
            .nationality
            .map_or_else(|| ANY.to_string(), |n| n.name)
    }

    pub fn detail_text_for_position(&self) -> String {
        self.view_model
            .filter_data()
            .position
            .map_or_else(|| ANY.to_string(), |p| p.name().to_string())
    }

    pub fn did_select_row(&mut self, path: IndexPath) -> TableUpdate {
        let action = match self.section(path.section) {
            Some(FilterSection::Sort) => match SortOrder::ALL.get(path.row) {
                Some(sort) => {
                    self.view_model.select_sort_order(*sort);
                    TableAction::ReloadSections(vec![path.section])
                }
                None => TableAction::None,
            },
            Some(FilterSection::PlayerInfo) => match PlayerInfoRow::ALL.get(path.row) {
                Some(row) if row.has_picker() => {
                    self.last_selected = Some(path);
                    TableAction::BeginEditing(*row)
                }
                _ => TableAction::None,
            },
            Some(FilterSection::Reset) => {
                self.view_model.reset_filter_data();
                TableAction::ReloadAll {
                    cross_fade: RESET_CROSS_FADE,
                }
            }
            None => TableAction::None,
        };
        TableUpdate {
            action,
            deselect: Some(path),
        }
    }

    /// Choices of the picker attached to `row`, `"Any"` first.
    pub fn picker_options(&self, row: PlayerInfoRow) -> Vec<String> {
        let choices: Vec<String> = match row {
            PlayerInfoRow::Nationality => self
                .view_model
                .nationalities()
                .iter()
                .map(|n| n.name.clone())
                .collect(),
            PlayerInfoRow::Position => Position::ALL.iter().map(|p| p.name().to_string()).collect(),
            PlayerInfoRow::OverallRange => return Vec::new(),
        };
        std::iter::once(ANY.to_string()).chain(choices).collect()
    }

    /// Apply a picker choice to the row that opened it.
    ///
    /// `option` indexes `picker_options`; `0` clears the criterion.
    pub fn picker_did_select(&mut self, option: usize) -> TableUpdate {
        let Some(path) = self.last_selected else {
            return TableUpdate {
                action: TableAction::None,
                deselect: None,
            };
        };
        let applied = match PlayerInfoRow::ALL.get(path.row) {
            Some(PlayerInfoRow::Nationality) => {
                let choice = match option.checked_sub(1) {
                    None => Some(None),
                    Some(i) => self.view_model.nationalities().get(i).cloned().map(Some),
                };
                choice.map(|choice| self.view_model.select_nationality(choice))
            }
            Some(PlayerInfoRow::Position) => match option.checked_sub(1) {
                None => Some(None),
                Some(i) => Position::ALL.get(i).copied().map(Some),
            }
            .map(|choice| self.view_model.select_position(choice)),
            _ => None,
        };
        let action = match applied {
            Some(()) => TableAction::ReloadRows(vec![path]),
            None => TableAction::None,
        };
        TableUpdate {
            action,
            deselect: None,
        }
    }
}
