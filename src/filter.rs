//! Include/exclude filtering over runner locations

use crate::gitlab::runners::Location;
use anyhow::{Context, Result};
use regex::Regex;

/// Decides which runners survive based on the groups/projects they are
/// registered to.
///
/// Exclude entries match a location's name or its id in decimal form and
/// always win. The include pattern, when set, must match at least one
/// location name; without one every runner is included.
#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    exclude: Vec<String>,
    include: Option<Regex>,
}

impl LocationFilter {
    pub fn new(exclude: Vec<String>, include: Option<&str>) -> Result<Self> {
        let include = match include {
            Some(pattern) => Some(
                Regex::new(pattern)
                    .with_context(|| format!("Invalid include pattern: {pattern}"))?,
            ),
            None => None,
        };

        Ok(Self { exclude, include })
    }

    /// True if any exclude entry equals a location's name or decimal id
    pub fn is_excluded(&self, locations: &[Location]) -> bool {
        self.exclude.iter().any(|filter| {
            locations
                .iter()
                .any(|loc| *filter == loc.name || *filter == loc.id.to_string())
        })
    }

    /// True if no include pattern is set, or it matches some location name
    pub fn is_included(&self, locations: &[Location]) -> bool {
        match &self.include {
            Some(pattern) => locations.iter().any(|loc| pattern.is_match(&loc.name)),
            None => true,
        }
    }

    /// Exclude takes precedence over include
    pub fn permits(&self, locations: &[Location]) -> bool {
        !self.is_excluded(locations) && self.is_included(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locations() -> Vec<Location> {
        vec![
            Location { id: 11, name: "Group1".into() },
            Location { id: 21, name: "Project2".into() },
        ]
    }

    #[test]
    fn no_filters_permit_everything() {
        let filter = LocationFilter::default();
        assert!(filter.permits(&locations()));
        assert!(filter.permits(&[]));
    }

    #[test]
    fn excludes_by_group_name() {
        let filter = LocationFilter::new(vec!["Group1".into()], None).unwrap();
        assert!(!filter.permits(&locations()));
    }

    #[test]
    fn excludes_by_project_id() {
        let filter = LocationFilter::new(vec!["21".into()], None).unwrap();
        assert!(!filter.permits(&locations()));
    }

    #[test]
    fn unrelated_exclude_keeps_runner() {
        let filter = LocationFilter::new(vec!["Other".into(), "999".into()], None).unwrap();
        assert!(filter.permits(&locations()));
    }

    #[test]
    fn include_pattern_must_match_a_name() {
        let filter = LocationFilter::new(vec![], Some("^Proj")).unwrap();
        assert!(filter.permits(&locations()));

        let filter = LocationFilter::new(vec![], Some("^nomatch$")).unwrap();
        assert!(!filter.permits(&locations()));
    }

    #[test]
    fn exclude_wins_over_include() {
        let filter = LocationFilter::new(vec!["Group1".into()], Some("Group1")).unwrap();
        assert!(!filter.permits(&locations()));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(LocationFilter::new(vec![], Some("([unclosed")).is_err());
    }
}
