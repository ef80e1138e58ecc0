// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use roster_app::MAX_TEAMS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    EmptyName,
    TooManyTeams(usize),
    DuplicateTeam(String),
    BlankTeam,
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => f.write_str("name must not be empty"),
            Self::TooManyTeams(count) => {
                write!(f, "at most {MAX_TEAMS} teams allowed, got {count}")
            }
            Self::DuplicateTeam(team) => write!(f, "team {team:?} listed more than once"),
            Self::BlankTeam => f.write_str("team names must not be blank"),
        }
    }
}

impl std::error::Error for RecordError {}

pub type RecordResult<T> = std::result::Result<T, RecordError>;

pub fn check_name(name: &str) -> RecordResult<()> {
    if name.trim().is_empty() {
        return Err(RecordError::EmptyName);
    }
    Ok(())
}

/// At most four entries, none blank, no case-insensitive repeats.
pub fn check_teams(teams: &[String]) -> RecordResult<()> {
    if teams.len() > MAX_TEAMS {
        return Err(RecordError::TooManyTeams(teams.len()));
    }
    for (index, team) in teams.iter().enumerate() {
        if team.trim().is_empty() {
            return Err(RecordError::BlankTeam);
        }
        if teams[..index]
            .iter()
            .any(|earlier| earlier.eq_ignore_ascii_case(team))
        {
            return Err(RecordError::DuplicateTeam(team.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RecordError, check_name, check_teams};

    fn teams(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn empty_team_list_is_allowed() {
        assert_eq!(check_teams(&[]), Ok(()));
    }

    #[test]
    fn five_teams_are_rejected() {
        let result = check_teams(&teams(&["A", "B", "C", "D", "E"]));
        assert_eq!(result, Err(RecordError::TooManyTeams(5)));
    }

    #[test]
    fn repeats_ignore_case() {
        let result = check_teams(&teams(&["Design", "design"]));
        assert_eq!(result, Err(RecordError::DuplicateTeam("design".to_owned())));
    }

    #[test]
    fn blank_entries_are_rejected() {
        assert_eq!(check_teams(&teams(&["Design", " "])), Err(RecordError::BlankTeam));
    }

    #[test]
    fn error_messages_name_the_problem() {
        assert_eq!(
            RecordError::TooManyTeams(6).to_string(),
            "at most 4 teams allowed, got 6"
        );
        assert!(check_name("  ").is_err());
        assert!(check_name("Olivia").is_ok());
    }
}
