// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod validation;

use anyhow::{Context, Result, bail};
use roster_app::{DirectoryCounts, Person, PersonId, PersonUpdate};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

pub use validation::{RecordError, RecordResult, check_name, check_teams};

/// Insertion-ordered collection of people for one session. Nothing is
/// persisted; a fresh store is built from generated records at startup.
#[derive(Debug, Clone, Default)]
pub struct Store {
    people: Vec<Person>,
}

impl Store {
    pub fn from_people(people: Vec<Person>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(people.len());
        for person in &people {
            if !seen.insert(person.id) {
                bail!(
                    "duplicate person id {} -- regenerate the directory with another seed",
                    person.id
                );
            }
            check_person(person)?;
        }
        debug!(count = people.len(), "store loaded");
        Ok(Self { people })
    }

    pub fn list(&self) -> &[Person] {
        &self.people
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn get(&self, id: PersonId) -> Option<&Person> {
        self.people.iter().find(|person| person.id == id)
    }

    pub fn get_person(&self, id: PersonId) -> Result<&Person> {
        self.get(id).with_context(|| {
            format!("person {id} not found -- reload the directory and pick an existing row")
        })
    }

    /// Removes exactly one record. There is no undo.
    pub fn remove(&mut self, id: PersonId) -> Result<Person> {
        let Some(index) = self.position(id) else {
            bail!("person {id} not found -- it may already have been deleted");
        };
        let removed = self.people.remove(index);
        info!(id = %removed.id, name = %removed.name, remaining = self.people.len(), "person deleted");
        Ok(removed)
    }

    pub fn update(&mut self, id: PersonId, update: &PersonUpdate) -> Result<Person> {
        check_name(&update.name).context("update rejected")?;
        check_teams(&update.teams).context("update rejected")?;
        let Some(index) = self.position(id) else {
            bail!("person {id} not found -- it may have been deleted while editing");
        };

        let person = &mut self.people[index];
        person.name.clone_from(&update.name);
        person.email.clone_from(&update.email);
        person.role.clone_from(&update.role);
        person.status = update.status;
        person.teams.clone_from(&update.teams);
        info!(
            id = %person.id,
            name = %person.name,
            status = person.status.as_str(),
            teams = person.teams.len(),
            "person updated"
        );
        Ok(person.clone())
    }

    pub fn counts(&self) -> DirectoryCounts {
        DirectoryCounts::tally(&self.people)
    }

    /// Members per team, alphabetical by team name.
    pub fn team_counts(&self) -> Vec<(String, usize)> {
        let mut counts = BTreeMap::<String, usize>::new();
        for team in self.people.iter().flat_map(|person| &person.teams) {
            *counts.entry(team.clone()).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    fn position(&self, id: PersonId) -> Option<usize> {
        self.people.iter().position(|person| person.id == id)
    }
}

fn check_person(person: &Person) -> Result<()> {
    check_name(&person.name).with_context(|| format!("invalid person {}", person.id))?;
    check_teams(&person.teams).with_context(|| format!("invalid person {}", person.id))?;
    Ok(())
}
