// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Filter, sort and paginate over the in-memory collection. Every view is
//! recomputed from the full collection on each render.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::{Column, Facet, Person, SortDirection, SortSpec};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Applied multi-select facets. An empty facet does not constrain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetSelection {
    roles: BTreeSet<String>,
    teams: BTreeSet<String>,
}

impl FacetSelection {
    fn set(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Roles => &self.roles,
            Facet::Teams => &self.teams,
        }
    }

    fn set_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Roles => &mut self.roles,
            Facet::Teams => &mut self.teams,
        }
    }

    /// Returns whether the option is selected after the toggle.
    pub fn toggle(&mut self, facet: Facet, option: &str) -> bool {
        let set = self.set_mut(facet);
        if set.remove(option) {
            false
        } else {
            set.insert(option.to_owned());
            true
        }
    }

    pub fn contains(&self, facet: Facet, option: &str) -> bool {
        self.set(facet).contains(option)
    }

    pub fn selected(&self, facet: Facet) -> impl Iterator<Item = &str> {
        self.set(facet).iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.roles.len() + self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.teams.is_empty()
    }

    pub fn clear(&mut self) {
        self.roles.clear();
        self.teams.clear();
    }

    pub fn matches(&self, person: &Person) -> bool {
        let role_ok = self.roles.is_empty()
            || self
                .roles
                .iter()
                .any(|role| role.eq_ignore_ascii_case(&person.role));
        let team_ok = self.teams.is_empty()
            || person.teams.iter().any(|team| {
                self.teams
                    .iter()
                    .any(|selected| selected.eq_ignore_ascii_case(team))
            });
        role_ok && team_ok
    }
}

/// Case-insensitive substring match over name, email, role, status and
/// every team.
pub fn matches_query(person: &Person, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);
    hit(person.name.as_str())
        || hit(person.email.as_str())
        || hit(person.role.as_str())
        || hit(person.status.as_str())
        || person.teams.iter().any(|team| hit(team.as_str()))
}

pub fn filter<'a>(people: &'a [Person], query: &str, facets: &FacetSelection) -> Vec<&'a Person> {
    people
        .iter()
        .filter(|person| matches_query(person, query) && facets.matches(person))
        .collect()
}

/// At most one active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    active: Option<SortSpec>,
}

impl SortState {
    pub const fn active(self) -> Option<SortSpec> {
        self.active
    }

    pub fn direction_for(self, column: Column) -> Option<SortDirection> {
        self.active
            .filter(|spec| spec.column == column)
            .map(|spec| spec.direction)
    }

    /// Same column flips direction; another column starts ascending.
    /// Returns `None` and leaves the state alone for unsortable columns.
    pub fn toggle(&mut self, column: Column) -> Option<SortSpec> {
        if !column.is_sortable() {
            return None;
        }
        let direction = match self.direction_for(column) {
            Some(direction) => direction.toggled(),
            None => SortDirection::Asc,
        };
        let spec = SortSpec { column, direction };
        self.active = Some(spec);
        Some(spec)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

pub fn compare_by(column: Column, left: &Person, right: &Person) -> Ordering {
    match column {
        Column::Name => left.name.cmp(&right.name),
        Column::Status => left.status.cmp(&right.status),
        Column::Role => left.role.cmp(&right.role),
        Column::Email => left.email.cmp(&right.email),
        Column::Teams => left.teams.cmp(&right.teams),
    }
}

/// Stable: rows with equal keys keep their filter-stage order.
pub fn sort(rows: &mut [&Person], spec: Option<SortSpec>) {
    let Some(spec) = spec else {
        return;
    };
    rows.sort_by(|left, right| {
        let ordering = compare_by(spec.column, left, right);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// Out-of-range pages are empty rather than an error.
pub fn paginate<T>(rows: &[T], page_index: usize, page_size: usize) -> &[T] {
    let start = page_index.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    index: usize,
    page_size: usize,
    total_rows: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            index: 0,
            page_size: page_size.max(1),
            total_rows: 0,
        }
    }

    pub const fn index(self) -> usize {
        self.index
    }

    pub const fn page_size(self) -> usize {
        self.page_size
    }

    pub const fn total_rows(self) -> usize {
        self.total_rows
    }

    pub fn page_count(self) -> usize {
        page_count(self.total_rows, self.page_size)
    }

    pub fn last_index(self) -> usize {
        self.page_count().saturating_sub(1)
    }

    pub fn can_prev(self) -> bool {
        self.index > 0
    }

    pub fn can_next(self) -> bool {
        self.page_count() > 0 && self.index < self.last_index()
    }

    /// Rows on the current page.
    pub fn page_len(self) -> usize {
        let start = self.index.saturating_mul(self.page_size);
        self.total_rows
            .saturating_sub(start)
            .min(self.page_size)
    }

    /// Records the new result length and pulls the index back onto an
    /// existing page. Returns whether the index moved.
    pub fn set_total_rows(&mut self, total_rows: usize) -> bool {
        self.total_rows = total_rows;
        let clamped = self.index.min(self.last_index());
        let moved = clamped != self.index;
        self.index = clamped;
        moved
    }

    pub fn jump(&mut self, index: usize) -> bool {
        if index > self.last_index() || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.can_prev() {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn reset(&mut self) -> bool {
        let moved = self.index != 0;
        self.index = 0;
        moved
    }

    pub fn slice<'a, T>(self, rows: &'a [T]) -> &'a [T] {
        paginate(rows, self.index, self.page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Number(usize),
    Gap,
}

const PAGE_BUTTON_WINDOW: usize = 7;

/// Zero-based page indices for the numbered strip, with gaps when the count
/// exceeds the window.
pub fn page_buttons(total_pages: usize, current: usize) -> Vec<PageButton> {
    if total_pages <= PAGE_BUTTON_WINDOW {
        return (0..total_pages).map(PageButton::Number).collect();
    }

    let last = total_pages - 1;
    let current = current.min(last);
    let low = current.saturating_sub(1).max(1);
    let high = (current + 1).min(last - 1);

    let mut buttons = vec![PageButton::Number(0)];
    if low > 1 {
        buttons.push(PageButton::Gap);
    }
    buttons.extend((low..=high).map(PageButton::Number));
    if high < last - 1 {
        buttons.push(PageButton::Gap);
    }
    buttons.push(PageButton::Number(last));
    buttons
}

/// One render's worth of derived data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView<'a> {
    pub matched: usize,
    pub rows: Vec<&'a Person>,
}

pub fn project<'a>(
    people: &'a [Person],
    query: &str,
    facets: &FacetSelection,
    sort_state: SortState,
    pager: Pager,
) -> DirectoryView<'a> {
    let mut matched = filter(people, query, facets);
    sort(&mut matched, sort_state.active());
    let rows = pager.slice(&matched).to_vec();
    DirectoryView {
        matched: matched.len(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FacetSelection, PageButton, Pager, SortState, filter, matches_query, page_buttons,
        page_count, paginate, project, sort,
    };
    use crate::{Column, Facet, Person, PersonId, PersonStatus, PersonalInfo, SortDirection};
    use time::{Date, Month};

    fn person(seed: u8, name: &str, status: PersonStatus, role: &str, teams: &[&str]) -> Person {
        Person {
            id: PersonId::from_random_bytes([seed; 16]),
            name: name.to_owned(),
            image: format!("https://avatars.example/{seed}.png"),
            status,
            role: role.to_owned(),
            email: format!("{}@people.co", name.to_ascii_lowercase().replace(' ', ".")),
            teams: teams.iter().map(|team| (*team).to_owned()).collect(),
            username: name.to_ascii_lowercase().replace(' ', "_"),
            profile: PersonalInfo {
                date_of_birth: Date::from_calendar_date(1990, Month::April, 29)
                    .expect("valid date"),
                gender: "Female".to_owned(),
                nationality: "Canadian".to_owned(),
                phone: "555-0100".to_owned(),
                work_email: "work@people.co".to_owned(),
            },
        }
    }

    fn sample() -> Vec<Person> {
        vec![
            person(1, "Olivia Rhye", PersonStatus::Inactive, "Product Designer", &["Design", "Product"]),
            person(2, "Phoenix Baker", PersonStatus::Active, "Backend Developer", &["Product"]),
            person(3, "Lana Steiner", PersonStatus::Active, "Frontend Developer", &["Marketing", "Finance"]),
            person(4, "Demi Wilkinson", PersonStatus::Inactive, "Product Manager", &["Finance"]),
            person(5, "Candice Wu", PersonStatus::Active, "Data Engineer", &["Design"]),
        ]
    }

    fn names(rows: &[&Person]) -> Vec<String> {
        rows.iter().map(|person| person.name.clone()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let people = sample();
        let rows = filter(&people, "", &FacetSelection::default());
        assert_eq!(rows.len(), people.len());
        assert!(rows.iter().zip(&people).all(|(row, person)| row.id == person.id));
    }

    #[test]
    fn query_matches_any_text_field_case_insensitively() {
        let people = sample();
        let design = filter(&people, "DESIGN", &FacetSelection::default());
        assert_eq!(names(&design), vec!["Olivia Rhye", "Candice Wu"]);

        let by_status = filter(&people, "inact", &FacetSelection::default());
        assert_eq!(names(&by_status), vec!["Olivia Rhye", "Demi Wilkinson"]);

        let by_email = filter(&people, "steiner@", &FacetSelection::default());
        assert_eq!(names(&by_email), vec!["Lana Steiner"]);

        assert!(filter(&people, "zzz", &FacetSelection::default()).is_empty());
    }

    #[test]
    fn membership_agrees_with_field_predicate() {
        let people = sample();
        for query in ["a", "pro", "Fin", "ACTIVE", "developer", "@"] {
            let rows = filter(&people, query, &FacetSelection::default());
            for person in &people {
                let needle = query.to_lowercase();
                let expected = [&person.name, &person.email, &person.role]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
                    || person.status.as_str().to_lowercase().contains(&needle)
                    || person
                        .teams
                        .iter()
                        .any(|team| team.to_lowercase().contains(&needle));
                let present = rows.iter().any(|row| row.id == person.id);
                assert_eq!(present, expected, "query {query:?} person {}", person.name);
            }
        }
    }

    #[test]
    fn facets_and_with_search_and_or_within_a_facet() {
        let people = sample();
        let mut facets = FacetSelection::default();
        assert!(facets.toggle(Facet::Teams, "Design"));
        assert_eq!(
            names(&filter(&people, "", &facets)),
            vec!["Olivia Rhye", "Candice Wu"]
        );

        facets.toggle(Facet::Teams, "Product");
        assert_eq!(
            names(&filter(&people, "", &facets)),
            vec!["Olivia Rhye", "Phoenix Baker", "Candice Wu"]
        );

        facets.toggle(Facet::Roles, "Backend Developer");
        assert_eq!(names(&filter(&people, "", &facets)), vec!["Phoenix Baker"]);
        assert!(filter(&people, "olivia", &facets).is_empty());

        assert!(!facets.toggle(Facet::Roles, "Backend Developer"));
        assert_eq!(facets.len(), 2);
        facets.clear();
        assert!(facets.is_empty());
        assert!(matches_query(&people[0], ""));
    }

    #[test]
    fn toggle_law_and_column_switch() {
        let mut state = SortState::default();
        let first = state.toggle(Column::Status).expect("status sortable");
        assert_eq!(first.direction, SortDirection::Asc);
        let second = state.toggle(Column::Status).expect("status sortable");
        assert_eq!(second.direction, SortDirection::Desc);

        let name = state.toggle(Column::Name).expect("name sortable");
        assert_eq!(name.direction, SortDirection::Asc);
        assert_eq!(state.direction_for(Column::Status), None);
        assert_eq!(state.direction_for(Column::Name), Some(SortDirection::Asc));
    }

    #[test]
    fn unsortable_column_leaves_state_alone() {
        let mut state = SortState::default();
        state.toggle(Column::Name);
        assert_eq!(state.toggle(Column::Email), None);
        assert_eq!(state.direction_for(Column::Name), Some(SortDirection::Asc));
    }

    #[test]
    fn status_sort_is_stable() {
        let people = sample();
        let mut rows = filter(&people, "", &FacetSelection::default());
        let mut state = SortState::default();
        sort(&mut rows, state.toggle(Column::Status));
        assert_eq!(
            names(&rows),
            vec![
                "Phoenix Baker",
                "Lana Steiner",
                "Candice Wu",
                "Olivia Rhye",
                "Demi Wilkinson"
            ]
        );

        sort(&mut rows, state.toggle(Column::Status));
        assert_eq!(rows[0].status, PersonStatus::Inactive);
        assert_eq!(rows[4].status, PersonStatus::Active);
    }

    #[test]
    fn name_sort_is_lexicographic() {
        let people = sample();
        let mut rows = filter(&people, "", &FacetSelection::default());
        let mut state = SortState::default();
        sort(&mut rows, state.toggle(Column::Name));
        assert_eq!(
            names(&rows),
            vec![
                "Candice Wu",
                "Demi Wilkinson",
                "Lana Steiner",
                "Olivia Rhye",
                "Phoenix Baker"
            ]
        );
    }

    #[test]
    fn twenty_five_rows_make_three_pages() {
        let rows = (0..25).collect::<Vec<_>>();
        assert_eq!(page_count(rows.len(), 10), 3);
        assert_eq!(paginate(&rows, 2, 10).len(), 5);
        assert!(paginate(&rows, 5, 10).is_empty());
        assert_eq!(paginate(&rows, 1, 10), &rows[10..20]);
    }

    #[test]
    fn last_page_holds_remainder_or_full_page() {
        for len in 1..=45 {
            let rows = (0..len).collect::<Vec<_>>();
            let pages = page_count(len, 10);
            assert_eq!(pages, len.div_ceil(10));
            let expected = if len % 10 == 0 { 10 } else { len % 10 };
            assert_eq!(paginate(&rows, pages - 1, 10).len(), expected, "len {len}");
        }
        assert_eq!(page_count(0, 10), 0);
    }

    #[test]
    fn pager_bounds_prev_and_next() {
        let mut pager = Pager::new(10);
        pager.set_total_rows(25);
        assert!(!pager.can_prev());
        assert!(pager.can_next());
        assert!(!pager.prev());

        assert!(pager.next());
        assert!(pager.next());
        assert_eq!(pager.index(), 2);
        assert!(!pager.can_next());
        assert!(!pager.next());
        assert_eq!(pager.page_len(), 5);

        assert!(pager.jump(0));
        assert!(!pager.jump(3));
    }

    #[test]
    fn pager_clamps_when_results_shrink() {
        let mut pager = Pager::new(10);
        pager.set_total_rows(50);
        pager.jump(4);
        assert!(pager.set_total_rows(12));
        assert_eq!(pager.index(), 1);
        assert!(pager.set_total_rows(0));
        assert_eq!(pager.index(), 0);
        assert!(!pager.can_next());
        assert!(!pager.can_prev());
        assert_eq!(pager.page_len(), 0);
    }

    #[test]
    fn page_buttons_collapse_long_runs() {
        use PageButton::{Gap, Number};
        assert_eq!(page_buttons(3, 0), vec![Number(0), Number(1), Number(2)]);
        assert!(page_buttons(0, 0).is_empty());
        assert_eq!(
            page_buttons(10, 0),
            vec![Number(0), Number(1), Gap, Number(9)]
        );
        assert_eq!(
            page_buttons(10, 5),
            vec![Number(0), Gap, Number(4), Number(5), Number(6), Gap, Number(9)]
        );
        assert_eq!(
            page_buttons(10, 9),
            vec![Number(0), Gap, Number(8), Number(9)]
        );
    }

    #[test]
    fn project_reports_match_count_and_page_rows() {
        let people = sample();
        let mut pager = Pager::new(2);
        pager.set_total_rows(people.len());
        pager.jump(1);
        let mut sort_state = SortState::default();
        sort_state.toggle(Column::Name);

        let view = project(&people, "", &FacetSelection::default(), sort_state, pager);
        assert_eq!(view.matched, 5);
        assert_eq!(names(&view.rows), vec!["Lana Steiner", "Olivia Rhye"]);
    }
}
