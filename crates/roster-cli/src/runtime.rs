// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use roster_app::{Person, PersonId, PersonUpdate};
use roster_store::Store;
use roster_tui::OverviewSnapshot;

pub struct StoreRuntime<'a> {
    store: &'a mut Store,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }
}

impl roster_tui::AppRuntime for StoreRuntime<'_> {
    fn load_people(&mut self) -> Result<Vec<Person>> {
        Ok(self.store.list().to_vec())
    }

    fn load_overview(&mut self) -> Result<OverviewSnapshot> {
        Ok(OverviewSnapshot {
            counts: self.store.counts(),
            teams: self.store.team_counts(),
        })
    }

    fn delete_person(&mut self, id: PersonId) -> Result<Person> {
        self.store.remove(id)
    }

    fn update_person(&mut self, id: PersonId, update: &PersonUpdate) -> Result<Person> {
        self.store.update(id, update)
    }
}

#[cfg(test)]
mod tests {
    use super::StoreRuntime;
    use anyhow::Result;
    use roster_app::{PersonStatus, PersonUpdate};
    use roster_faker::PeopleFaker;
    use roster_store::Store;
    use roster_tui::AppRuntime;

    fn store(count: usize) -> Result<Store> {
        Store::from_people(PeopleFaker::new(21).people(count))
    }

    #[test]
    fn load_people_mirrors_store_order() -> Result<()> {
        let mut store = store(6)?;
        let expected = store.list().to_vec();
        let mut runtime = StoreRuntime::new(&mut store);
        assert_eq!(runtime.load_people()?, expected);
        Ok(())
    }

    #[test]
    fn overview_counts_follow_deletes() -> Result<()> {
        let mut store = store(12)?;
        let id = store.list()[3].id;
        let mut runtime = StoreRuntime::new(&mut store);

        let before = runtime.load_overview()?;
        assert_eq!(before.counts.total, 12);
        assert!(!before.teams.is_empty());

        let removed = runtime.delete_person(id)?;
        assert_eq!(removed.id, id);
        assert_eq!(runtime.load_overview()?.counts.total, 11);
        assert!(runtime.delete_person(id).is_err());
        Ok(())
    }

    #[test]
    fn update_person_writes_through_to_store() -> Result<()> {
        let mut store = store(3)?;
        let id = store.list()[2].id;
        let update = PersonUpdate {
            name: "Phoenix Baker".to_owned(),
            email: "phoenix@untitledui.com".to_owned(),
            role: "Product Manager".to_owned(),
            status: PersonStatus::Active,
            teams: vec!["Product".to_owned()],
        };

        let mut runtime = StoreRuntime::new(&mut store);
        let updated = runtime.update_person(id, &update)?;
        assert_eq!(updated.name, "Phoenix Baker");
        assert_eq!(store.get_person(id)?.teams, vec!["Product"]);
        Ok(())
    }
}
