// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    AppMode, Column, FacetSelection, Location, Overlay, Pager, PersonId, Section, SortSpec,
    SortState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub section: Section,
    pub search_draft: String,
    pub applied_query: String,
    pub facets: FacetSelection,
    pub sort: SortState,
    pub pager: Pager,
    pub selected_row: usize,
    pub overlay: Overlay,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            section: Section::People,
            search_draft: String::new(),
            applied_query: String::new(),
            facets: FacetSelection::default(),
            sort: SortState::default(),
            pager: Pager::default(),
            selected_row: 0,
            overlay: Overlay::Closed,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextSection,
    ShowSection(Section),
    BeginSearch,
    EditSearch(String),
    SubmitSearch,
    CancelSearch,
    ToggleSort(Column),
    ApplyFacets(FacetSelection),
    PrevPage,
    NextPage,
    JumpToPage(usize),
    FirstPage,
    LastPage,
    MoveRow(isize),
    ResultCountChanged(usize),
    OpenDetail(PersonId),
    OpenEdit(PersonId),
    OpenDelete(PersonId),
    ConfirmDelete,
    CloseOverlay,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    SectionChanged(Section),
    QueryApplied(String),
    LocationChanged(Location),
    SortChanged(SortSpec),
    FacetsApplied(usize),
    PageChanged(usize),
    SelectionMoved(usize),
    OverlayChanged(Overlay),
    DeleteRequested(PersonId),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            pager: Pager::new(page_size),
            ..Self::default()
        }
    }

    pub fn from_location(location: &Location, page_size: usize) -> Self {
        Self {
            section: location.section(),
            search_draft: location.query().to_owned(),
            applied_query: location.query().to_owned(),
            ..Self::with_page_size(page_size)
        }
    }

    pub fn location(&self) -> Location {
        Location::people(&self.applied_query).with_section(self.section)
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextSection => {
                let next = match self.section {
                    Section::Overview => Section::People,
                    Section::People => Section::Overview,
                };
                self.show_section(next)
            }
            AppCommand::ShowSection(section) => self.show_section(section),
            AppCommand::BeginSearch => {
                if self.overlay.is_open() {
                    return self.refuse("close the dialog first");
                }
                self.section = Section::People;
                self.mode = AppMode::Search;
                self.search_draft = self.applied_query.clone();
                vec![
                    AppEvent::SectionChanged(self.section),
                    AppEvent::ModeChanged(self.mode),
                ]
            }
            AppCommand::EditSearch(draft) => {
                self.search_draft = draft;
                Vec::new()
            }
            AppCommand::SubmitSearch => {
                self.mode = AppMode::Nav;
                self.applied_query = self.search_draft.trim().to_owned();
                self.search_draft = self.applied_query.clone();
                self.selected_row = 0;
                let mut events = vec![
                    AppEvent::ModeChanged(self.mode),
                    AppEvent::QueryApplied(self.applied_query.clone()),
                    AppEvent::LocationChanged(self.location()),
                ];
                if self.pager.reset() {
                    events.push(AppEvent::PageChanged(self.pager.index()));
                }
                events
            }
            AppCommand::CancelSearch => {
                self.mode = AppMode::Nav;
                self.search_draft = self.applied_query.clone();
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleSort(column) => match self.sort.toggle(column) {
                Some(spec) => {
                    let label = format!(
                        "sort {} {}",
                        spec.column.label().to_ascii_lowercase(),
                        spec.direction.label()
                    );
                    vec![AppEvent::SortChanged(spec), self.set_status(&label)]
                }
                None => {
                    let label = format!("{} is not sortable", column.label());
                    vec![self.set_status(&label)]
                }
            },
            AppCommand::ApplyFacets(selection) => {
                self.facets = selection;
                self.selected_row = 0;
                let count = self.facets.len();
                let mut events = vec![AppEvent::FacetsApplied(count)];
                if self.pager.reset() {
                    events.push(AppEvent::PageChanged(self.pager.index()));
                }
                let label = match count {
                    0 => "filters cleared".to_owned(),
                    1 => "1 filter applied".to_owned(),
                    n => format!("{n} filters applied"),
                };
                events.push(self.set_status(&label));
                events
            }
            AppCommand::PrevPage => {
                let moved = self.pager.prev();
                self.page_moved(moved)
            }
            AppCommand::NextPage => {
                let moved = self.pager.next();
                self.page_moved(moved)
            }
            AppCommand::JumpToPage(index) => {
                let moved = self.pager.jump(index);
                self.page_moved(moved)
            }
            AppCommand::FirstPage => {
                let moved = self.pager.jump(0);
                self.page_moved(moved)
            }
            AppCommand::LastPage => {
                let last = self.pager.last_index();
                let moved = self.pager.jump(last);
                self.page_moved(moved)
            }
            AppCommand::MoveRow(delta) => {
                let page_len = self.pager.page_len();
                if page_len == 0 {
                    self.selected_row = 0;
                    return Vec::new();
                }
                let next = (self.selected_row as isize + delta)
                    .clamp(0, page_len as isize - 1) as usize;
                if next == self.selected_row {
                    return Vec::new();
                }
                self.selected_row = next;
                vec![AppEvent::SelectionMoved(next)]
            }
            AppCommand::ResultCountChanged(total) => {
                let moved = self.pager.set_total_rows(total);
                let mut events = Vec::new();
                if moved {
                    events.push(AppEvent::PageChanged(self.pager.index()));
                }
                let clamped = self
                    .selected_row
                    .min(self.pager.page_len().saturating_sub(1));
                if clamped != self.selected_row {
                    self.selected_row = clamped;
                    events.push(AppEvent::SelectionMoved(clamped));
                }
                events
            }
            AppCommand::OpenDetail(id) => self.open_overlay(Overlay::Detail(id)),
            AppCommand::OpenEdit(id) => self.open_overlay(Overlay::EditForm(id)),
            AppCommand::OpenDelete(id) => self.open_overlay(Overlay::DeleteConfirm(id)),
            AppCommand::ConfirmDelete => {
                let Overlay::DeleteConfirm(id) = self.overlay else {
                    return Vec::new();
                };
                self.overlay = Overlay::Closed;
                vec![
                    AppEvent::OverlayChanged(self.overlay),
                    AppEvent::DeleteRequested(id),
                ]
            }
            AppCommand::CloseOverlay => {
                if !self.overlay.is_open() {
                    return Vec::new();
                }
                self.overlay = Overlay::Closed;
                vec![AppEvent::OverlayChanged(self.overlay)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn show_section(&mut self, section: Section) -> Vec<AppEvent> {
        if self.overlay.is_open() {
            return self.refuse("close the dialog first");
        }
        if self.section == section {
            return Vec::new();
        }
        self.section = section;
        self.mode = AppMode::Nav;
        vec![
            AppEvent::SectionChanged(section),
            AppEvent::LocationChanged(self.location()),
        ]
    }

    fn open_overlay(&mut self, overlay: Overlay) -> Vec<AppEvent> {
        if self.overlay.is_open() {
            return self.refuse("another dialog is open");
        }
        self.overlay = overlay;
        vec![AppEvent::OverlayChanged(overlay)]
    }

    fn page_moved(&mut self, moved: bool) -> Vec<AppEvent> {
        if !moved {
            return Vec::new();
        }
        self.selected_row = 0;
        vec![AppEvent::PageChanged(self.pager.index())]
    }

    fn refuse(&mut self, message: &str) -> Vec<AppEvent> {
        vec![self.set_status(message)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState};
    use crate::{
        AppMode, Column, Facet, FacetSelection, Location, Overlay, PersonId, Section,
        SortDirection, SortSpec,
    };

    fn state_with_rows(total: usize) -> AppState {
        let mut state = AppState::with_page_size(10);
        state.dispatch(AppCommand::ResultCountChanged(total));
        state
    }

    fn id(seed: u8) -> PersonId {
        PersonId::from_random_bytes([seed; 16])
    }

    #[test]
    fn submit_search_applies_query_and_updates_location() {
        let mut state = state_with_rows(50);
        state.dispatch(AppCommand::JumpToPage(3));

        state.dispatch(AppCommand::BeginSearch);
        assert_eq!(state.mode, AppMode::Search);
        state.dispatch(AppCommand::EditSearch(" design ".to_owned()));
        let events = state.dispatch(AppCommand::SubmitSearch);

        assert_eq!(state.applied_query, "design");
        assert_eq!(state.pager.index(), 0);
        assert_eq!(
            events,
            vec![
                AppEvent::ModeChanged(AppMode::Nav),
                AppEvent::QueryApplied("design".to_owned()),
                AppEvent::LocationChanged(Location::people("design")),
                AppEvent::PageChanged(0),
            ]
        );
        assert_eq!(state.location().to_string(), "/people?query=design");
    }

    #[test]
    fn cancel_search_restores_applied_query() {
        let mut state = AppState::from_location(&Location::people("finance"), 10);
        state.dispatch(AppCommand::BeginSearch);
        state.dispatch(AppCommand::EditSearch("marketing".to_owned()));
        state.dispatch(AppCommand::CancelSearch);
        assert_eq!(state.search_draft, "finance");
        assert_eq!(state.applied_query, "finance");
        assert_eq!(state.mode, AppMode::Nav);
    }

    #[test]
    fn status_then_name_header_sequence() {
        let mut state = AppState::default();
        let first = state.dispatch(AppCommand::ToggleSort(Column::Status));
        assert_eq!(
            first[0],
            AppEvent::SortChanged(SortSpec {
                column: Column::Status,
                direction: SortDirection::Asc
            })
        );
        state.dispatch(AppCommand::ToggleSort(Column::Status));
        assert_eq!(
            state.sort.direction_for(Column::Status),
            Some(SortDirection::Desc)
        );
        assert_eq!(state.status_line.as_deref(), Some("sort status desc"));

        state.dispatch(AppCommand::ToggleSort(Column::Name));
        assert_eq!(state.sort.direction_for(Column::Name), Some(SortDirection::Asc));
        assert_eq!(state.sort.direction_for(Column::Status), None);
    }

    #[test]
    fn unsortable_header_reports_status() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::ToggleSort(Column::Teams));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("Teams is not sortable".to_owned())]
        );
        assert_eq!(state.sort.active(), None);
    }

    #[test]
    fn page_navigation_respects_bounds() {
        let mut state = state_with_rows(25);
        assert!(state.dispatch(AppCommand::PrevPage).is_empty());
        assert_eq!(
            state.dispatch(AppCommand::NextPage),
            vec![AppEvent::PageChanged(1)]
        );
        state.dispatch(AppCommand::LastPage);
        assert_eq!(state.pager.index(), 2);
        assert!(state.dispatch(AppCommand::NextPage).is_empty());
        assert!(state.dispatch(AppCommand::JumpToPage(7)).is_empty());
        state.dispatch(AppCommand::FirstPage);
        assert_eq!(state.pager.index(), 0);
    }

    #[test]
    fn shrinking_results_clamp_page_and_selection() {
        let mut state = state_with_rows(25);
        state.dispatch(AppCommand::LastPage);
        state.dispatch(AppCommand::MoveRow(4));
        assert_eq!(state.selected_row, 4);

        let events = state.dispatch(AppCommand::ResultCountChanged(21));
        assert_eq!(state.pager.index(), 2);
        assert_eq!(state.selected_row, 0);
        assert_eq!(events, vec![AppEvent::SelectionMoved(0)]);

        let events = state.dispatch(AppCommand::ResultCountChanged(8));
        assert_eq!(state.pager.index(), 0);
        assert_eq!(events, vec![AppEvent::PageChanged(0)]);
    }

    #[test]
    fn move_row_stays_on_page() {
        let mut state = state_with_rows(3);
        state.dispatch(AppCommand::MoveRow(10));
        assert_eq!(state.selected_row, 2);
        state.dispatch(AppCommand::MoveRow(-10));
        assert_eq!(state.selected_row, 0);

        let mut empty = state_with_rows(0);
        assert!(empty.dispatch(AppCommand::MoveRow(1)).is_empty());
        assert_eq!(empty.selected_row, 0);
    }

    #[test]
    fn only_one_overlay_at_a_time() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::OpenEdit(id(1)));
        let refused = state.dispatch(AppCommand::OpenDetail(id(1)));
        assert_eq!(state.overlay, Overlay::EditForm(id(1)));
        assert_eq!(
            refused,
            vec![AppEvent::StatusUpdated("another dialog is open".to_owned())]
        );

        state.dispatch(AppCommand::CloseOverlay);
        state.dispatch(AppCommand::OpenDetail(id(2)));
        assert_eq!(state.overlay, Overlay::Detail(id(2)));
    }

    #[test]
    fn confirm_delete_requests_removal_and_closes() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::ConfirmDelete).is_empty());

        state.dispatch(AppCommand::OpenDelete(id(3)));
        let events = state.dispatch(AppCommand::ConfirmDelete);
        assert_eq!(state.overlay, Overlay::Closed);
        assert_eq!(
            events,
            vec![
                AppEvent::OverlayChanged(Overlay::Closed),
                AppEvent::DeleteRequested(id(3)),
            ]
        );
    }

    #[test]
    fn cancel_delete_is_a_no_op() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::OpenDelete(id(4)));
        let events = state.dispatch(AppCommand::CloseOverlay);
        assert_eq!(events, vec![AppEvent::OverlayChanged(Overlay::Closed)]);
        assert!(
            !events
                .iter()
                .any(|event| matches!(event, AppEvent::DeleteRequested(_)))
        );
    }

    #[test]
    fn applying_facets_resets_page() {
        let mut state = state_with_rows(40);
        state.dispatch(AppCommand::NextPage);
        let mut selection = FacetSelection::default();
        selection.toggle(Facet::Teams, "Design");
        let events = state.dispatch(AppCommand::ApplyFacets(selection));
        assert_eq!(state.pager.index(), 0);
        assert_eq!(
            events,
            vec![
                AppEvent::FacetsApplied(1),
                AppEvent::PageChanged(0),
                AppEvent::StatusUpdated("1 filter applied".to_owned()),
            ]
        );
    }

    #[test]
    fn sections_switch_and_block_while_dialog_open() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::NextSection);
        assert_eq!(state.section, Section::Overview);
        assert_eq!(events[0], AppEvent::SectionChanged(Section::Overview));

        state.dispatch(AppCommand::ShowSection(Section::People));
        state.dispatch(AppCommand::OpenDetail(id(5)));
        state.dispatch(AppCommand::NextSection);
        assert_eq!(state.section, Section::People);
    }

    #[test]
    fn begin_search_is_refused_with_open_dialog() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::OpenDetail(id(6)));
        state.dispatch(AppCommand::BeginSearch);
        assert_eq!(state.mode, AppMode::Nav);
    }
}
