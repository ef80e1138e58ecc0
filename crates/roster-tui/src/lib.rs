// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use roster_app::{
    AppCommand, AppEvent, AppMode, AppState, Column, DirectoryCounts, Facet, FacetSelection,
    FormField, Overlay, PageButton, Pager, Person, PersonFormInput, PersonId, PersonStatus,
    PersonUpdate, Section, SortDirection, SortState, filter, page_buttons, project,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;
use time::macros::format_description;
use tracing::warn;

const BRAND: &str = "PEOPLE.CO";
const VISIBLE_TEAM_PILLS: usize = 3;
const SORT_ARROW_ASC: &str = "↑";
const SORT_ARROW_DESC: &str = "↓";
const STATUS_DOT: &str = "●";
const TEAM_PILL_COLORS: [Color; 3] = [Color::Magenta, Color::Blue, Color::Green];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverviewSnapshot {
    pub counts: DirectoryCounts,
    pub teams: Vec<(String, usize)>,
}

pub trait AppRuntime {
    fn load_people(&mut self) -> Result<Vec<Person>>;
    fn load_overview(&mut self) -> Result<OverviewSnapshot>;
    fn delete_person(&mut self, id: PersonId) -> Result<Person>;
    fn update_person(&mut self, id: PersonId, update: &PersonUpdate) -> Result<Person>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiOptions {
    pub operator: String,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            operator: "Jane Doe".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DirectoryStatus {
    NoRowSelected,
    NoSuchPage(usize),
    AlreadyFirstPage,
    AlreadyLastPage,
    SearchApplied { query: String, matches: usize },
    SearchCleared,
    EditCanceled,
    Saved(String),
    Deleted(String),
    DeleteCanceled,
    FilterMenuClosed,
    FilterSelectionCleared,
    HelpHidden,
}

impl DirectoryStatus {
    fn message(self) -> String {
        match self {
            Self::NoRowSelected => "no row selected".to_owned(),
            Self::NoSuchPage(number) => format!("page {number} does not exist"),
            Self::AlreadyFirstPage => "already on the first page".to_owned(),
            Self::AlreadyLastPage => "already on the last page".to_owned(),
            Self::SearchApplied { query, matches } => {
                let noun = if matches == 1 { "match" } else { "matches" };
                format!("{matches} {noun} for {query:?}")
            }
            Self::SearchCleared => "search cleared".to_owned(),
            Self::EditCanceled => "edit canceled".to_owned(),
            Self::Saved(name) => format!("saved {name}"),
            Self::Deleted(name) => format!("deleted {name}"),
            Self::DeleteCanceled => "delete canceled".to_owned(),
            Self::FilterMenuClosed => "filter menu closed".to_owned(),
            Self::FilterSelectionCleared => "selection cleared; enter to apply".to_owned(),
            Self::HelpHidden => "help hidden".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FilterMenuUiState {
    visible: bool,
    cursor: usize,
    pending: FacetSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditFormUiState {
    person_id: PersonId,
    person_name: String,
    input: PersonFormInput,
    field_index: usize,
    show_errors: bool,
}

impl EditFormUiState {
    fn new(person: &Person) -> Self {
        Self {
            person_id: person.id,
            person_name: person.name.clone(),
            input: PersonFormInput::from_person(person),
            field_index: 0,
            show_errors: false,
        }
    }

    fn field(&self) -> FormField {
        FormField::ALL[self.field_index]
    }

    fn move_field(&mut self, delta: isize) {
        let len = FormField::ALL.len() as isize;
        self.field_index = (self.field_index as isize + delta).rem_euclid(len) as usize;
    }

    fn cycle_status(&mut self) {
        let next = match PersonStatus::parse(&self.input.status) {
            Some(PersonStatus::Active) => PersonStatus::Inactive,
            _ => PersonStatus::Active,
        };
        self.input.status = next.as_str().to_owned();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    people: Vec<Person>,
    overview: OverviewSnapshot,
    operator: String,
    header_col: usize,
    filter_menu: FilterMenuUiState,
    form: Option<EditFormUiState>,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn new(options: &UiOptions) -> Self {
        Self {
            operator: options.operator.clone(),
            ..Self::default()
        }
    }
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: &UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(options);
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(state, runtime, &mut view_data) {
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error:#}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
            emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::HelpHidden.message(),
            );
        }
        return false;
    }

    if view_data.filter_menu.visible {
        handle_filter_menu_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    match state.overlay {
        Overlay::Detail(_) => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::CloseOverlay);
            }
            return false;
        }
        Overlay::EditForm(_) => {
            handle_edit_form_key(state, runtime, view_data, internal_tx, key);
            return false;
        }
        Overlay::DeleteConfirm(_) => {
            handle_delete_confirm_key(state, runtime, view_data, internal_tx, key);
            return false;
        }
        Overlay::Closed => {}
    }

    if state.mode == AppMode::Search {
        handle_search_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    handle_nav_key(state, runtime, view_data, internal_tx, key);
    false
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::SubmitSearch);
            let status = if state.applied_query.is_empty() {
                DirectoryStatus::SearchCleared
            } else {
                DirectoryStatus::SearchApplied {
                    query: state.applied_query.clone(),
                    matches: state.pager.total_rows(),
                }
            };
            emit_status(state, view_data, internal_tx, status.message());
        }
        (KeyCode::Esc, _) => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::CancelSearch);
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            state.dispatch(AppCommand::EditSearch(String::new()));
        }
        (KeyCode::Backspace, _) => {
            let mut draft = state.search_draft.clone();
            draft.pop();
            state.dispatch(AppCommand::EditSearch(draft));
        }
        (KeyCode::Char(value), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let mut draft = state.search_draft.clone();
            draft.push(value);
            state.dispatch(AppCommand::EditSearch(draft));
        }
        _ => {}
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return;
        }
        KeyCode::Tab => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::NextSection);
            return;
        }
        KeyCode::Char('/') => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::BeginSearch);
            return;
        }
        _ => {}
    }

    if state.section != Section::People {
        return;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('j') | KeyCode::Down, _) => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::MoveRow(1));
        }
        (KeyCode::Char('k') | KeyCode::Up, _) => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::MoveRow(-1));
        }
        (KeyCode::Char('h') | KeyCode::Left, _) => move_header_cursor(view_data, -1),
        (KeyCode::Char('l') | KeyCode::Right, _) => move_header_cursor(view_data, 1),
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            let column = Column::ALL[view_data.header_col];
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::ToggleSort(column),
            );
        }
        (KeyCode::Char('N'), _) => sort_by_header(state, runtime, view_data, internal_tx, Column::Name),
        (KeyCode::Char('S'), _) => {
            sort_by_header(state, runtime, view_data, internal_tx, Column::Status);
        }
        (KeyCode::Char('[') | KeyCode::PageUp, _) => {
            change_page(state, runtime, view_data, internal_tx, AppCommand::PrevPage);
        }
        (KeyCode::Char(']') | KeyCode::PageDown, _) => {
            change_page(state, runtime, view_data, internal_tx, AppCommand::NextPage);
        }
        (KeyCode::Home, _) => {
            change_page(state, runtime, view_data, internal_tx, AppCommand::FirstPage);
        }
        (KeyCode::End, _) => {
            change_page(state, runtime, view_data, internal_tx, AppCommand::LastPage);
        }
        (KeyCode::Char(digit @ '1'..='9'), _) => {
            let number = usize::from(digit as u8 - b'0');
            let events = dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::JumpToPage(number - 1),
            );
            if events.is_empty() && state.pager.index() != number - 1 {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    DirectoryStatus::NoSuchPage(number).message(),
                );
            }
        }
        (KeyCode::Enter, _) => match selected_person(state, view_data).map(|person| person.id) {
            Some(id) => {
                dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::OpenDetail(id));
            }
            None => emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::NoRowSelected.message(),
            ),
        },
        (KeyCode::Char('e'), KeyModifiers::NONE) => {
            open_edit_form(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) => {
            match selected_person(state, view_data).map(|person| person.id) {
                Some(id) => {
                    dispatch_and_refresh(
                        state,
                        runtime,
                        view_data,
                        internal_tx,
                        AppCommand::OpenDelete(id),
                    );
                }
                None => emit_status(
                    state,
                    view_data,
                    internal_tx,
                    DirectoryStatus::NoRowSelected.message(),
                ),
            }
        }
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            view_data.filter_menu = FilterMenuUiState {
                visible: true,
                cursor: 0,
                pending: state.facets.clone(),
            };
        }
        _ => {}
    }
}

fn move_header_cursor(view_data: &mut ViewData, delta: isize) {
    let last = Column::ALL.len() as isize - 1;
    view_data.header_col = (view_data.header_col as isize + delta).clamp(0, last) as usize;
}

fn sort_by_header<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    column: Column,
) {
    if let Some(index) = Column::ALL.iter().position(|candidate| *candidate == column) {
        view_data.header_col = index;
    }
    dispatch_and_refresh(
        state,
        runtime,
        view_data,
        internal_tx,
        AppCommand::ToggleSort(column),
    );
}

fn change_page<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let backwards = matches!(command, AppCommand::PrevPage | AppCommand::FirstPage);
    let events = dispatch_and_refresh(state, runtime, view_data, internal_tx, command);
    if !events.is_empty() || state.pager.page_count() == 0 {
        return;
    }
    let status = if backwards {
        DirectoryStatus::AlreadyFirstPage
    } else {
        DirectoryStatus::AlreadyLastPage
    };
    emit_status(state, view_data, internal_tx, status.message());
}

fn open_edit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = selected_person(state, view_data).map(EditFormUiState::new) else {
        emit_status(
            state,
            view_data,
            internal_tx,
            DirectoryStatus::NoRowSelected.message(),
        );
        return;
    };
    let events = dispatch_and_refresh(
        state,
        runtime,
        view_data,
        internal_tx,
        AppCommand::OpenEdit(form.person_id),
    );
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::OverlayChanged(Overlay::EditForm(_))))
    {
        view_data.form = Some(form);
    }
}

fn handle_edit_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.form = None;
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::CloseOverlay);
            emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::EditCanceled.message(),
            );
            return;
        }
        KeyCode::Enter => {
            submit_edit_form(state, runtime, view_data, internal_tx);
            return;
        }
        _ => {}
    }

    let Some(form) = view_data.form.as_mut() else {
        dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::CloseOverlay);
        return;
    };
    match (key.code, key.modifiers) {
        (KeyCode::Tab | KeyCode::Down, _) => form.move_field(1),
        (KeyCode::BackTab | KeyCode::Up, _) => form.move_field(-1),
        (KeyCode::Left | KeyCode::Right, _) if form.field() == FormField::Status => {
            form.cycle_status();
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            let field = form.field();
            form.input.field_mut(field).clear();
        }
        (KeyCode::Backspace, _) => {
            let field = form.field();
            form.input.field_mut(field).pop();
        }
        (KeyCode::Char(value), modifiers)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            let field = form.field();
            form.input.field_mut(field).push(value);
        }
        _ => {}
    }
}

fn submit_edit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.form.as_mut() else {
        return;
    };
    let person_id = form.person_id;
    let update = match form.input.to_update() {
        Ok(update) => update,
        Err(error) => {
            form.show_errors = true;
            emit_status(state, view_data, internal_tx, error.to_string());
            return;
        }
    };

    match runtime.update_person(person_id, &update) {
        Ok(person) => {
            view_data.form = None;
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::CloseOverlay);
            if let Err(error) = refresh_view_data(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("reload failed: {error:#}"));
                return;
            }
            emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::Saved(person.name).message(),
            );
        }
        Err(error) => {
            warn!(id = %person_id, "update failed: {error:#}");
            emit_status(state, view_data, internal_tx, format!("save failed: {error:#}"));
        }
    }
}

fn handle_delete_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::ConfirmDelete);
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::CloseOverlay);
            emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::DeleteCanceled.message(),
            );
        }
        _ => {}
    }
}

fn handle_filter_menu_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let entries = filter_menu_entries();
    let menu = &mut view_data.filter_menu;
    match key.code {
        KeyCode::Esc => {
            *menu = FilterMenuUiState::default();
            emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::FilterMenuClosed.message(),
            );
        }
        KeyCode::Enter => {
            let selection = std::mem::take(&mut menu.pending);
            *menu = FilterMenuUiState::default();
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::ApplyFacets(selection),
            );
        }
        KeyCode::Char('j') | KeyCode::Down => {
            menu.cursor = (menu.cursor + 1).min(entries.len().saturating_sub(1));
        }
        KeyCode::Char('k') | KeyCode::Up => {
            menu.cursor = menu.cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') => {
            if let Some((facet, option)) = entries.get(menu.cursor) {
                menu.pending.toggle(*facet, option);
            }
        }
        KeyCode::Char('c') => {
            menu.pending.clear();
            emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::FilterSelectionCleared.message(),
            );
        }
        _ => {}
    }
}

fn filter_menu_entries() -> Vec<(Facet, &'static str)> {
    Facet::ALL
        .into_iter()
        .flat_map(|facet| facet.options().iter().map(move |option| (facet, *option)))
        .collect()
}

fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) -> Vec<AppEvent> {
    let events = state.dispatch(command);
    for event in &events {
        if let AppEvent::DeleteRequested(id) = event {
            delete_person(state, runtime, view_data, internal_tx, *id);
        }
    }
    if should_resync_results(&events) {
        sync_result_count(state, view_data);
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
    events
}

fn should_resync_results(events: &[AppEvent]) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            AppEvent::QueryApplied(_) | AppEvent::FacetsApplied(_)
        )
    })
}

fn delete_person<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    id: PersonId,
) {
    match runtime.delete_person(id) {
        Ok(removed) => {
            if let Err(error) = refresh_view_data(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("reload failed: {error:#}"));
                return;
            }
            emit_status(
                state,
                view_data,
                internal_tx,
                DirectoryStatus::Deleted(removed.name).message(),
            );
        }
        Err(error) => {
            warn!(id = %id, "delete failed: {error:#}");
            emit_status(state, view_data, internal_tx, format!("delete failed: {error:#}"));
        }
    }
}

fn refresh_view_data<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    view_data.people = runtime.load_people().context("load people")?;
    view_data.overview = runtime.load_overview().context("load overview")?;
    sync_result_count(state, view_data);
    Ok(())
}

fn sync_result_count(state: &mut AppState, view_data: &ViewData) -> Vec<AppEvent> {
    let matched = filter(&view_data.people, &state.applied_query, &state.facets).len();
    state.dispatch(AppCommand::ResultCountChanged(matched))
}

fn selected_person<'a>(state: &AppState, view_data: &'a ViewData) -> Option<&'a Person> {
    let view = project(
        &view_data.people,
        &state.applied_query,
        &state.facets,
        state.sort,
        state.pager,
    );
    view.rows.get(state.selected_row).copied()
}

fn overlay_person<'a>(state: &AppState, view_data: &'a ViewData) -> Option<&'a Person> {
    let id = state.overlay.person_id()?;
    view_data.people.iter().find(|person| person.id == id)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(40)])
        .split(frame.area());
    render_sidebar(frame, columns[0], state, view_data);

    let main = match state.section {
        Section::Overview => Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(columns[1]),
        Section::People => Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(2),
            ])
            .split(columns[1]),
    };

    let top_bar = Paragraph::new(search_box_text(state)).block(
        Block::default()
            .title(format!("{BRAND} | {}", state.location()))
            .borders(Borders::ALL),
    );
    frame.render_widget(top_bar, main[0]);

    match state.section {
        Section::Overview => {
            let body = Paragraph::new(render_overview_text(view_data))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("Overview"));
            frame.render_widget(body, main[1]);
        }
        Section::People => {
            render_table(frame, main[1], state, view_data);
            let pager = Paragraph::new(pagination_line(state.pager))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(pager, main[2]);
        }
    }

    let status_area = main[main.len() - 1];
    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status_widget, status_area);

    render_overlays(frame, state, view_data);
}

fn render_sidebar(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let mut lines = vec![
        Line::from(Span::styled(
            BRAND,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for section in Section::ALL {
        let active = section == state.section;
        let marker = if active { "▸ " } else { "  " };
        let style = if active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", section.label()),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        view_data.operator.clone(),
        Style::default().fg(Color::DarkGray),
    )));
    let sidebar = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(sidebar, area);
}

fn render_overlays(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    match state.overlay {
        Overlay::Detail(_) => {
            if let Some(person) = overlay_person(state, view_data) {
                let area = centered_rect(60, 70, frame.area());
                frame.render_widget(Clear, area);
                let detail = Paragraph::new(render_detail_text(person))
                    .wrap(Wrap { trim: false })
                    .block(Block::default().title("details").borders(Borders::ALL));
                frame.render_widget(detail, area);
            }
        }
        Overlay::EditForm(_) => {
            if let Some(form) = &view_data.form {
                let area = centered_rect(60, 60, frame.area());
                frame.render_widget(Clear, area);
                let editor = Paragraph::new(Text::from(edit_form_lines(form))).block(
                    Block::default()
                        .title(format!("edit {}", form.person_name))
                        .borders(Borders::ALL)
                        .style(Style::default().fg(Color::White)),
                );
                frame.render_widget(editor, area);
            }
        }
        Overlay::DeleteConfirm(_) => {
            let area = centered_rect(50, 25, frame.area());
            frame.render_widget(Clear, area);
            let confirm = Paragraph::new(render_delete_confirm_text(overlay_person(
                state, view_data,
            )))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("delete")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Red)),
            );
            frame.render_widget(confirm, area);
        }
        Overlay::Closed => {}
    }

    if view_data.filter_menu.visible {
        let area = centered_rect(44, 60, frame.area());
        frame.render_widget(Clear, area);
        let menu = Paragraph::new(render_filter_menu_text(&view_data.filter_menu))
            .block(Block::default().title("filters").borders(Borders::ALL));
        frame.render_widget(menu, area);
    }

    if view_data.help_visible {
        let area = centered_rect(72, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let view = project(
        &view_data.people,
        &state.applied_query,
        &state.facets,
        state.sort,
        state.pager,
    );
    let title = table_title(state, view_data, view.matched);

    if view.rows.is_empty() {
        let empty = Paragraph::new("no people match; press / to search again or f to change filters")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header_focus = state.mode == AppMode::Nav && !state.overlay.is_open();
    let header_cells = Column::ALL.iter().enumerate().map(|(index, column)| {
        let mut style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        if header_focus && index == view_data.header_col {
            style = style.fg(Color::Black).bg(Color::Cyan);
        }
        Cell::from(header_label(*column, state.sort)).style(style)
    });
    let header = Row::new(header_cells).height(1);

    let rows = view.rows.iter().enumerate().map(|(row_index, person)| {
        let style = if row_index == state.selected_row {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(Text::from(vec![
                Line::from(Span::styled(
                    person.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    person.handle(),
                    Style::default().fg(Color::Gray),
                )),
            ])),
            Cell::from(status_line(person.status)),
            Cell::from(person.role.clone()),
            Cell::from(person.email.clone()),
            Cell::from(team_pills_line(&person.teams)),
        ])
        .height(2)
        .style(style)
    });

    let widths = [
        Constraint::Percentage(22),
        Constraint::Length(11),
        Constraint::Percentage(20),
        Constraint::Percentage(26),
        Constraint::Min(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn header_label(column: Column, sort: SortState) -> String {
    let mut label = column.label().to_owned();
    match sort.direction_for(column) {
        Some(SortDirection::Asc) => {
            label.push(' ');
            label.push_str(SORT_ARROW_ASC);
        }
        Some(SortDirection::Desc) => {
            label.push(' ');
            label.push_str(SORT_ARROW_DESC);
        }
        None => {}
    }
    label
}

fn table_title(state: &AppState, view_data: &ViewData, matched: usize) -> String {
    let mut title = format!("Team Members [{} users]", view_data.people.len());
    if !state.applied_query.is_empty() || !state.facets.is_empty() {
        title.push_str(&format!(" | {matched} shown"));
    }
    if !state.facets.is_empty() {
        title.push_str(&format!(" | {} filters", state.facets.len()));
    }
    title
}

fn status_line(status: PersonStatus) -> Line<'static> {
    let color = match status {
        PersonStatus::Active => Color::Green,
        PersonStatus::Inactive => Color::Red,
    };
    Line::from(vec![
        Span::styled(STATUS_DOT, Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(status.as_str(), Style::default().fg(color)),
    ])
}

/// First three teams, then a `+N` badge for the rest. No teams renders `-`.
fn team_pill_labels(teams: &[String]) -> Vec<String> {
    if teams.is_empty() {
        return vec!["-".to_owned()];
    }
    let mut labels = teams
        .iter()
        .take(VISIBLE_TEAM_PILLS)
        .cloned()
        .collect::<Vec<_>>();
    if teams.len() > VISIBLE_TEAM_PILLS {
        labels.push(format!("+{}", teams.len() - VISIBLE_TEAM_PILLS));
    }
    labels
}

fn team_pills_line(teams: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    for (index, label) in team_pill_labels(teams).into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if teams.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else if index < VISIBLE_TEAM_PILLS {
            Style::default()
                .fg(Color::Black)
                .bg(TEAM_PILL_COLORS[index % TEAM_PILL_COLORS.len()])
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {label} "), style));
    }
    Line::from(spans)
}

fn pagination_line(pager: Pager) -> Line<'static> {
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            "‹ Previous",
            if pager.can_prev() { enabled } else { disabled },
        ),
        Span::raw("  "),
    ];
    for button in page_buttons(pager.page_count(), pager.index()) {
        match button {
            PageButton::Number(index) if index == pager.index() => spans.push(Span::styled(
                format!("[{}]", index + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            PageButton::Number(index) => spans.push(Span::raw(format!(" {} ", index + 1))),
            PageButton::Gap => spans.push(Span::styled(" … ", disabled)),
        }
    }
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
        "Next ›",
        if pager.can_next() { enabled } else { disabled },
    ));
    let shown = if pager.page_count() == 0 {
        0
    } else {
        pager.index() + 1
    };
    spans.push(Span::styled(
        format!("   page {shown} of {}", pager.page_count()),
        disabled,
    ));
    Line::from(spans)
}

fn search_box_text(state: &AppState) -> String {
    match state.mode {
        AppMode::Search => format!("search: {}▏", state.search_draft),
        AppMode::Nav if state.applied_query.is_empty() => "search: (press / to search)".to_owned(),
        AppMode::Nav => format!("search: {}", state.applied_query),
    }
}

fn render_overview_text(view_data: &ViewData) -> String {
    let counts = view_data.overview.counts;
    let mut lines = vec![
        format!("Welcome {}", view_data.operator),
        String::new(),
        format!("Headcount: {}", counts.total),
        format!("Active: {}  Inactive: {}", counts.active, counts.inactive),
        String::new(),
        "Teams".to_owned(),
    ];
    if view_data.overview.teams.is_empty() {
        lines.push("  none".to_owned());
    }
    for (team, members) in &view_data.overview.teams {
        lines.push(format!("  {team:<12} {members}"));
    }
    lines.push(String::new());
    lines.push("tab opens the People Directory; / searches it".to_owned());
    lines.join("\n")
}

fn format_birth_date(date: Date) -> String {
    date.format(&format_description!(
        "[month repr:long] [day padding:none], [year]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

fn render_detail_text(person: &Person) -> String {
    let teams = if person.teams.is_empty() {
        "none".to_owned()
    } else {
        person.teams.join(", ")
    };
    [
        person.name.clone(),
        person.handle(),
        person.role.clone(),
        format!("id: {}", person.id),
        String::new(),
        "Personal information".to_owned(),
        format!(
            "  Date of birth  {}",
            format_birth_date(person.profile.date_of_birth)
        ),
        format!("  Gender         {}", person.profile.gender),
        format!("  Nationality    {}", person.profile.nationality),
        format!("  Contact no.    {}", person.profile.phone),
        format!("  Email address  {}", person.email),
        format!("  Work email     {}", person.profile.work_email),
        String::new(),
        "Teams".to_owned(),
        format!("  {teams}"),
        String::new(),
        "esc/enter close".to_owned(),
    ]
    .join("\n")
}

fn render_delete_confirm_text(person: Option<&Person>) -> String {
    let name = person.map_or("this person", |person| person.name.as_str());
    format!(
        "Delete {name}?\n\nThe record is removed for the rest of the session. There is no undo.\n\ny/enter delete | n/esc cancel"
    )
}

fn edit_form_lines(form: &EditFormUiState) -> Vec<Line<'static>> {
    let errors = if form.show_errors {
        form.input.field_errors()
    } else {
        Vec::new()
    };
    let hint = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();
    for (index, field) in FormField::ALL.into_iter().enumerate() {
        let focused = index == form.field_index;
        let marker = if focused { "▸" } else { " " };
        let cursor = if focused { "▏" } else { "" };
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {:<7} ", field.label()), label_style),
            Span::raw(format!("{}{cursor}", form.input.field(field))),
        ]));
        if let Some((_, message)) = errors.iter().find(|(failing, _)| *failing == field) {
            lines.push(Line::from(Span::styled(
                format!("    {message}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "teams: comma-separated, at most 4; team must be one of them",
        hint,
    )));
    lines.push(Line::from(Span::styled(
        "tab/shift+tab field | left/right status | ctrl+u clear | enter save | esc cancel",
        hint,
    )));
    lines
}

fn render_filter_menu_text(menu: &FilterMenuUiState) -> String {
    let mut lines = Vec::new();
    let mut current = None;
    for (index, (facet, option)) in filter_menu_entries().into_iter().enumerate() {
        if current != Some(facet) {
            if current.is_some() {
                lines.push(String::new());
            }
            lines.push(facet.label().to_owned());
            current = Some(facet);
        }
        let cursor = if index == menu.cursor { ">" } else { " " };
        let mark = if menu.pending.contains(facet, option) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(format!("{cursor} {mark} {option}"));
    }
    lines.push(String::new());
    lines.push("space toggle | c clear | enter SELECT | esc close".to_owned());
    lines.join("\n")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit | ? help | tab switch section\n\
search: / focus | type to edit | enter apply | esc cancel | ctrl+u clear\n\
table: j/k rows | h/l header | s sort header | N/S sort name/status\n\
pages: [/] or pgup/pgdn | 1-9 jump | home/end first/last\n\
rows: enter view | e edit | d delete | f filters\n\
edit: tab/shift+tab field | left/right status | enter save | esc cancel\n\
delete: y/enter confirm | n/esc cancel\n\
filters: j/k move | space toggle | c clear | enter select | esc close"
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }
    let mode = mode_label(state, view_data);
    let hints = key_hints(state, view_data);
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn mode_label(state: &AppState, view_data: &ViewData) -> &'static str {
    if view_data.filter_menu.visible {
        return "FILTER";
    }
    match state.overlay {
        Overlay::Detail(_) => "VIEW",
        Overlay::EditForm(_) => "EDIT",
        Overlay::DeleteConfirm(_) => "CONFIRM",
        Overlay::Closed => match state.mode {
            AppMode::Nav => "NAV",
            AppMode::Search => "SEARCH",
        },
    }
}

fn key_hints(state: &AppState, view_data: &ViewData) -> &'static str {
    if view_data.filter_menu.visible {
        return "j/k space c | enter select | esc";
    }
    match state.overlay {
        Overlay::Detail(_) => "esc close",
        Overlay::EditForm(_) => "tab field | enter save | esc cancel",
        Overlay::DeleteConfirm(_) => "y delete | n cancel",
        Overlay::Closed => match (state.mode, state.section) {
            (AppMode::Search, _) => "enter apply | esc cancel | ctrl+u clear",
            (AppMode::Nav, Section::Overview) => "tab directory | / search | ? help | ctrl+q",
            (AppMode::Nav, Section::People) => {
                "/ search | j/k h/l s N/S | [/] 1-9 | enter e d | f filter | tab | ? | ctrl+q"
            }
        },
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
