// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::fmt;
use url::{Position, Url};

use crate::Section;

const LOCATION_BASE: &str = "roster://people.co/";
const QUERY_PARAM: &str = "query";

/// Address state: the section being shown and the applied search query.
/// Rendered as a path plus query string, e.g. `/people?query=design`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    section: Section,
    query: String,
}

impl Default for Location {
    fn default() -> Self {
        Self::people("")
    }
}

impl Location {
    pub fn people(query: &str) -> Self {
        Self {
            section: Section::People,
            query: query.trim().to_owned(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let base = base_url()?;
        let url = base
            .join(raw.trim())
            .with_context(|| format!("parse location {raw:?}"))?;
        if url.scheme() != base.scheme() || url.host_str() != base.host_str() {
            bail!("location {raw:?} must be a path such as /people?query=design");
        }

        let section = Section::from_path(url.path()).ok_or_else(|| {
            anyhow!(
                "unknown location path {:?}; use / or /people",
                url.path()
            )
        })?;
        let query = url
            .query_pairs()
            .find(|(key, _)| key == QUERY_PARAM)
            .map(|(_, value)| value.trim().to_owned())
            .unwrap_or_default();
        Ok(Self { section, query })
    }

    pub const fn section(&self) -> Section {
        self.section
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn with_query(&self, query: &str) -> Self {
        Self {
            section: self.section,
            query: query.trim().to_owned(),
        }
    }

    pub fn with_section(&self, section: Section) -> Self {
        Self {
            section,
            query: self.query.clone(),
        }
    }

    pub fn to_url(&self) -> Result<Url> {
        let mut url = base_url()?
            .join(self.section.path())
            .context("build location url")?;
        if !self.query.is_empty() {
            url.query_pairs_mut().append_pair(QUERY_PARAM, &self.query);
        }
        Ok(url)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_url() {
            Ok(url) => f.write_str(&url[Position::BeforePath..]),
            Err(_) => f.write_str(self.section.path()),
        }
    }
}

fn base_url() -> Result<Url> {
    Url::parse(LOCATION_BASE).context("parse location base")
}

#[cfg(test)]
mod tests {
    use super::Location;
    use crate::Section;
    use anyhow::Result;

    #[test]
    fn parses_people_path_with_query() -> Result<()> {
        let location = Location::parse("/people?query=design")?;
        assert_eq!(location.section(), Section::People);
        assert_eq!(location.query(), "design");
        Ok(())
    }

    #[test]
    fn decodes_encoded_query_values() -> Result<()> {
        let location = Location::parse("/people?query=product+designer&page=2")?;
        assert_eq!(location.query(), "product designer");

        let percent = Location::parse("people?query=r%C3%A9my")?;
        assert_eq!(percent.query(), "rémy");
        Ok(())
    }

    #[test]
    fn root_path_is_overview_without_query() -> Result<()> {
        let location = Location::parse("/")?;
        assert_eq!(location.section(), Section::Overview);
        assert_eq!(location.query(), "");
        Ok(())
    }

    #[test]
    fn display_is_shareable_and_round_trips() -> Result<()> {
        let location = Location::people("product designer");
        let text = location.to_string();
        assert_eq!(text, "/people?query=product+designer");
        assert_eq!(Location::parse(&text)?, location);

        assert_eq!(Location::people("").to_string(), "/people");
        Ok(())
    }

    #[test]
    fn rejects_foreign_hosts_and_unknown_paths() {
        let foreign = Location::parse("https://evil.example/people?query=x")
            .expect_err("foreign url should fail");
        assert!(foreign.to_string().contains("must be a path"));

        let unknown = Location::parse("/settings").expect_err("unknown path should fail");
        assert!(unknown.to_string().contains("unknown location path"));
    }

    #[test]
    fn with_query_keeps_section() {
        let location = Location::default()
            .with_section(Section::Overview)
            .with_query("  finance ");
        assert_eq!(location.section(), Section::Overview);
        assert_eq!(location.query(), "finance");
    }
}
