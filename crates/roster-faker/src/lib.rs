// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use roster_app::{MAX_TEAMS, Person, PersonId, PersonStatus, PersonalInfo};
use time::macros::date;
use time::{Date, Duration};

const FIRST_NAMES: [&str; 24] = [
    "Olivia", "Phoenix", "Lana", "Demi", "Candice", "Natali", "Drew", "Orlando", "Andi", "Kate",
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Kai",
    "Elliot", "Robin", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 24] = [
    "Rhye", "Baker", "Steiner", "Wilkinson", "Wu", "Craig", "Cano", "Diggs", "Lane", "Morrison",
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett",
];

const ROLES: [&str; 10] = [
    "Frontend Developer",
    "Backend Developer",
    "Product Manager",
    "Product Designer",
    "UX Researcher",
    "Data Engineer",
    "Marketing Lead",
    "Finance Analyst",
    "Engineering Manager",
    "QA Engineer",
];

const TEAMS: [&str; 5] = ["Design", "Product", "Marketing", "Finance", "Technology"];

const EMAIL_DOMAINS: [&str; 5] = [
    "untitledui.com",
    "people.co",
    "example.org",
    "mailbox.io",
    "corp.net",
];

const GENDERS: [&str; 3] = ["Female", "Male", "Non-binary"];

const NATIONALITIES: [&str; 10] = [
    "American",
    "Canadian",
    "British",
    "German",
    "Indian",
    "Brazilian",
    "Japanese",
    "Nigerian",
    "Australian",
    "Mexican",
];

const EARLIEST_BIRTH: Date = date!(1960 - 01 - 01);
const LATEST_BIRTH: Date = date!(2004 - 12 - 31);

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }

    fn bytes16(&mut self) -> [u8; 16] {
        let mut bytes = [0_u8; 16];
        bytes[..8].copy_from_slice(&self.next_u64().to_le_bytes());
        bytes[8..].copy_from_slice(&self.next_u64().to_le_bytes());
        bytes
    }
}

/// Seeded generator of synthetic directory records. The same seed yields the
/// same sequence of people.
#[derive(Debug, Clone)]
pub struct PeopleFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl PeopleFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn people(&mut self, count: usize) -> Vec<Person> {
        (0..count).map(|_| self.person()).collect()
    }

    pub fn person(&mut self) -> Person {
        let id = PersonId::from_random_bytes(self.rng.bytes16());
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let username = format!(
            "{}.{}{}",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase(),
            self.int_range(10, 99)
        );
        let status = if self.rng.bool() {
            PersonStatus::Active
        } else {
            PersonStatus::Inactive
        };
        let domain = self.pick(&EMAIL_DOMAINS);

        Person {
            id,
            name: format!("{first} {last}"),
            image: format!("https://avatars.people.co/{username}.png"),
            status,
            role: self.pick(&ROLES).to_owned(),
            email: format!(
                "{}.{}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            teams: self.teams(),
            profile: self.personal_info(&username),
            username,
        }
    }

    /// One to four distinct teams in shuffled order.
    pub fn teams(&mut self) -> Vec<String> {
        let count = self.int_range(1, MAX_TEAMS);
        let mut pool = TEAMS.to_vec();
        for index in 0..count {
            let swap = index + self.rng.int_n(pool.len() - index);
            pool.swap(index, swap);
        }
        pool.into_iter().take(count).map(str::to_owned).collect()
    }

    fn personal_info(&mut self, username: &str) -> PersonalInfo {
        PersonalInfo {
            date_of_birth: self.date_between(EARLIEST_BIRTH, LATEST_BIRTH),
            gender: self.pick(&GENDERS).to_owned(),
            nationality: self.pick(&NATIONALITIES).to_owned(),
            phone: format!(
                "+1 ({:03}) {:03}-{:04}",
                self.int_range(200, 999),
                self.int_range(200, 999),
                self.int_range(0, 9_999),
            ),
            work_email: format!("{username}@people.co"),
        }
    }

    fn date_between(&mut self, start: Date, end: Date) -> Date {
        let span = (end - start).whole_days();
        if span <= 0 {
            return start;
        }
        let offset = self.rng.next_u64() % (span as u64 + 1);
        start.saturating_add(Duration::days(offset as i64))
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        min + self.rng.int_n(max - min + 1)
    }
}

pub fn team_names() -> &'static [&'static str] {
    &TEAMS
}

pub fn role_names() -> &'static [&'static str] {
    &ROLES
}
