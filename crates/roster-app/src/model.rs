// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::Date;

use crate::ids::*;

pub const MAX_TEAMS: usize = 4;

pub const ROLE_FACET_OPTIONS: [&str; 4] = [
    "Frontend Developer",
    "Backend Developer",
    "Product Manager",
    "Product Designer",
];

pub const TEAM_FACET_OPTIONS: [&str; 4] = ["Product", "Marketing", "Design", "Technology"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PersonStatus {
    Active,
    Inactive,
}

impl PersonStatus {
    pub const ALL: [Self; 2] = [Self::Active, Self::Inactive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub date_of_birth: Date,
    pub gender: String,
    pub nationality: String,
    pub phone: String,
    pub work_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub image: String,
    pub status: PersonStatus,
    pub role: String,
    pub email: String,
    pub teams: Vec<String>,
    pub username: String,
    pub profile: PersonalInfo,
}

impl Person {
    pub fn handle(&self) -> String {
        format!("@{}", self.username)
    }

    pub fn primary_team(&self) -> Option<&str> {
        self.teams.first().map(String::as_str)
    }
}

/// Validated field values from the edit form, applied to a record by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonUpdate {
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: PersonStatus,
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Name,
    Status,
    Role,
    Email,
    Teams,
}

impl Column {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::Status,
        Self::Role,
        Self::Email,
        Self::Teams,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Status => "Status",
            Self::Role => "Role",
            Self::Email => "Email address",
            Self::Teams => "Teams",
        }
    }

    pub const fn is_sortable(self) -> bool {
        matches!(self, Self::Name | Self::Status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Overview,
    People,
}

impl Section {
    pub const ALL: [Self; 2] = [Self::Overview, Self::People];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::People => "People Directory",
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Overview => "/",
            Self::People => "/people",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Overview),
            "/people" => Some(Self::People),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overview" => Some(Self::Overview),
            "people" => Some(Self::People),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facet {
    Roles,
    Teams,
}

impl Facet {
    pub const ALL: [Self; 2] = [Self::Roles, Self::Teams];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Roles => "Roles",
            Self::Teams => "Teams",
        }
    }

    pub const fn options(self) -> &'static [&'static str] {
        match self {
            Self::Roles => &ROLE_FACET_OPTIONS,
            Self::Teams => &TEAM_FACET_OPTIONS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Search,
}

/// The single modal view bound to one record. At most one is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Overlay {
    #[default]
    Closed,
    Detail(PersonId),
    EditForm(PersonId),
    DeleteConfirm(PersonId),
}

impl Overlay {
    pub const fn person_id(self) -> Option<PersonId> {
        match self {
            Self::Closed => None,
            Self::Detail(id) | Self::EditForm(id) | Self::DeleteConfirm(id) => Some(id),
        }
    }

    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectoryCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl DirectoryCounts {
    pub fn tally<'a>(people: impl IntoIterator<Item = &'a Person>) -> Self {
        let mut counts = Self::default();
        for person in people {
            counts.total += 1;
            match person.status {
                PersonStatus::Active => counts.active += 1,
                PersonStatus::Inactive => counts.inactive += 1,
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, Overlay, PersonStatus, Section, SortDirection};
    use crate::PersonId;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(PersonStatus::parse("active"), Some(PersonStatus::Active));
        assert_eq!(PersonStatus::parse(" INACTIVE "), Some(PersonStatus::Inactive));
        assert_eq!(PersonStatus::parse("retired"), None);
    }

    #[test]
    fn status_order_matches_label_order() {
        assert!(PersonStatus::Active < PersonStatus::Inactive);
        assert!(PersonStatus::Active.as_str() < PersonStatus::Inactive.as_str());
    }

    #[test]
    fn only_name_and_status_sort() {
        let sortable = Column::ALL
            .into_iter()
            .filter(|column| column.is_sortable())
            .collect::<Vec<_>>();
        assert_eq!(sortable, vec![Column::Name, Column::Status]);
    }

    #[test]
    fn direction_toggles() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }

    #[test]
    fn section_paths_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_path(section.path()), Some(section));
        }
        assert_eq!(Section::from_path("/people/"), Some(Section::People));
        assert_eq!(Section::from_path("/settings"), None);
    }

    #[test]
    fn overlay_exposes_bound_person() {
        let id = PersonId::from_random_bytes([1; 16]);
        assert_eq!(Overlay::Closed.person_id(), None);
        assert_eq!(Overlay::EditForm(id).person_id(), Some(id));
        assert!(Overlay::Detail(id).is_open());
        assert!(!Overlay::Closed.is_open());
    }
}
