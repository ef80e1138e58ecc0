// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use regex::Regex;
use std::sync::LazyLock;

use crate::{MAX_TEAMS, Person, PersonStatus, PersonUpdate};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("valid email pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Email,
    Role,
    Team,
    Status,
    Teams,
}

impl FormField {
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Email,
        Self::Role,
        Self::Team,
        Self::Status,
        Self::Teams,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Role => "Role",
            Self::Team => "Team",
            Self::Status => "Status",
            Self::Teams => "Teams",
        }
    }
}

/// Raw text of the edit dialog. `team` is the primary team and must also
/// appear in the comma-separated `teams` list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersonFormInput {
    pub name: String,
    pub email: String,
    pub role: String,
    pub team: String,
    pub status: String,
    pub teams: String,
}

impl PersonFormInput {
    pub fn from_person(person: &Person) -> Self {
        Self {
            name: person.name.clone(),
            email: person.email.clone(),
            role: person.role.clone(),
            team: person.primary_team().unwrap_or_default().to_owned(),
            status: person.status.as_str().to_owned(),
            teams: person.teams.join(", "),
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Role => &self.role,
            FormField::Team => &self.team,
            FormField::Status => &self.status,
            FormField::Teams => &self.teams,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Role => &mut self.role,
            FormField::Team => &mut self.team,
            FormField::Status => &mut self.status,
            FormField::Teams => &mut self.teams,
        }
    }

    /// Every failing field with its message, in form order.
    pub fn field_errors(&self) -> Vec<(FormField, String)> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push((FormField::Name, "name is required".to_owned()));
        }
        if !EMAIL_PATTERN.is_match(self.email.trim()) {
            errors.push((FormField::Email, "invalid email".to_owned()));
        }
        if self.role.trim().is_empty() {
            errors.push((FormField::Role, "role is required".to_owned()));
        }

        let teams = parse_teams(&self.teams);
        let team = self.team.trim();
        if team.is_empty() {
            errors.push((FormField::Team, "team is required".to_owned()));
        } else if !teams.is_empty() && !teams.iter().any(|entry| entry.eq_ignore_ascii_case(team))
        {
            errors.push((
                FormField::Team,
                format!("team {team:?} must be listed in teams"),
            ));
        }

        if self.status.trim().is_empty() {
            errors.push((FormField::Status, "status is required".to_owned()));
        } else if PersonStatus::parse(&self.status).is_none() {
            errors.push((
                FormField::Status,
                "status must be Active or Inactive".to_owned(),
            ));
        }

        if teams.is_empty() {
            errors.push((FormField::Teams, "teams are required".to_owned()));
        } else if teams.len() > MAX_TEAMS {
            errors.push((
                FormField::Teams,
                format!("at most {MAX_TEAMS} teams, got {}", teams.len()),
            ));
        } else if has_duplicates(&teams) {
            errors.push((FormField::Teams, "teams must not repeat".to_owned()));
        }
        errors
    }

    pub fn error_for(&self, field: FormField) -> Option<String> {
        self.field_errors()
            .into_iter()
            .find(|(failing, _)| *failing == field)
            .map(|(_, message)| message)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some((field, message)) = self.field_errors().into_iter().next() {
            bail!(
                "{}: {message} -- fix the field and retry",
                field.label().to_ascii_lowercase()
            );
        }
        Ok(())
    }

    /// Validates and normalizes the form. The primary team moves to the
    /// front of the teams list.
    pub fn to_update(&self) -> Result<PersonUpdate> {
        self.validate()?;
        let Some(status) = PersonStatus::parse(&self.status) else {
            bail!("status must be Active or Inactive");
        };

        let primary = self.team.trim();
        let mut teams = parse_teams(&self.teams);
        if let Some(index) = teams
            .iter()
            .position(|entry| entry.eq_ignore_ascii_case(primary))
        {
            let entry = teams.remove(index);
            teams.insert(0, entry);
        }

        Ok(PersonUpdate {
            name: self.name.trim().to_owned(),
            email: self.email.trim().to_owned(),
            role: self.role.trim().to_owned(),
            status,
            teams,
        })
    }
}

pub fn parse_teams(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

fn has_duplicates(teams: &[String]) -> bool {
    teams.iter().enumerate().any(|(index, team)| {
        teams[..index]
            .iter()
            .any(|earlier| earlier.eq_ignore_ascii_case(team))
    })
}

#[cfg(test)]
mod tests {
    use super::{FormField, PersonFormInput, parse_teams};
    use crate::PersonStatus;

    fn valid_form() -> PersonFormInput {
        PersonFormInput {
            name: "Olivia Rhye".to_owned(),
            email: "olivia@untitledui.com".to_owned(),
            role: "Product Designer".to_owned(),
            team: "Design".to_owned(),
            status: "active".to_owned(),
            teams: "Product, Design, Marketing".to_owned(),
        }
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(valid_form().field_errors().is_empty());
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn blank_form_reports_every_required_field() {
        let fields = PersonFormInput::default()
            .field_errors()
            .into_iter()
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(fields, FormField::ALL.to_vec());
    }

    #[test]
    fn email_must_be_syntactically_valid() {
        for email in ["olivia", "olivia@", "@untitledui.com", "olivia@host", "a b@c.io"] {
            let form = PersonFormInput {
                email: email.to_owned(),
                ..valid_form()
            };
            assert_eq!(
                form.error_for(FormField::Email).as_deref(),
                Some("invalid email"),
                "email {email:?}"
            );
        }
    }

    #[test]
    fn status_must_name_a_known_value() {
        let form = PersonFormInput {
            status: "Retired".to_owned(),
            ..valid_form()
        };
        assert!(form.error_for(FormField::Status).is_some());
        let error = form.validate().expect_err("unknown status should fail");
        assert!(error.to_string().starts_with("status:"));
    }

    #[test]
    fn teams_are_capped_and_unique() {
        let too_many = PersonFormInput {
            teams: "Design, Product, Marketing, Finance, Technology".to_owned(),
            ..valid_form()
        };
        assert!(too_many.error_for(FormField::Teams).is_some());

        let repeated = PersonFormInput {
            teams: "Design, design".to_owned(),
            ..valid_form()
        };
        assert!(repeated.error_for(FormField::Teams).is_some());
    }

    #[test]
    fn primary_team_must_be_listed() {
        let form = PersonFormInput {
            team: "Finance".to_owned(),
            ..valid_form()
        };
        let message = form.error_for(FormField::Team).expect("team error");
        assert!(message.contains("Finance"));
    }

    #[test]
    fn update_moves_primary_team_first_and_parses_status() -> anyhow::Result<()> {
        let update = valid_form().to_update()?;
        assert_eq!(update.status, PersonStatus::Active);
        assert_eq!(update.teams, vec!["Design", "Product", "Marketing"]);
        assert_eq!(update.name, "Olivia Rhye");
        Ok(())
    }

    #[test]
    fn parse_teams_skips_blank_entries() {
        assert_eq!(parse_teams(" Design ,, Product ,"), vec!["Design", "Product"]);
        assert!(parse_teams("  ").is_empty());
    }
}
