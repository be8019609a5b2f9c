use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::models::{FilterCriteria, Outlet, OutletField};

/// Compiled-size ceiling for client-supplied patterns.
const MAX_REGEX_SIZE: usize = 1 << 20;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),
}

/// Criteria compiled once per request: one hash set per constrained field and
/// an optional case-insensitive regex.
pub struct OutletFilter<'a> {
    sets: Vec<(OutletField, HashSet<&'a str>)>,
    regex: Option<Regex>,
}

impl<'a> OutletFilter<'a> {
    pub fn new(criteria: &'a FilterCriteria) -> Result<Self, FilterError> {
        let sets: Vec<(OutletField, HashSet<&str>)> = OutletField::ALL
            .iter()
            .filter_map(|&field| {
                let values = criteria.values(field);
                (!values.is_empty())
                    .then(|| (field, values.iter().map(String::as_str).collect::<HashSet<_>>()))
            })
            .collect();

        let regex = match criteria.regex.as_deref() {
            Some(pattern) if !pattern.is_empty() => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .size_limit(MAX_REGEX_SIZE)
                    .build()?,
            ),
            _ => None,
        };

        Ok(Self { sets, regex })
    }

    /// True when the outlet satisfies every non-empty set and, if a regex was
    /// given, at least one of its code/type/channel matches it.
    pub fn matches(&self, outlet: &Outlet) -> bool {
        let in_sets = self.sets.iter().all(|(field, allowed)| {
            outlet
                .field(*field)
                .is_some_and(|value| allowed.contains(value))
        });

        in_sets
            && self.regex.as_ref().map_or(true, |re| {
                OutletField::ALL
                    .iter()
                    .filter_map(|&field| outlet.field(field))
                    .any(|value| re.is_match(value))
            })
    }
}

/// Returns the outlets matching `criteria`, in their original order.
pub fn filter_outlets<'o>(
    outlets: &'o [Outlet],
    criteria: &FilterCriteria,
) -> Result<Vec<&'o Outlet>, FilterError> {
    let filter = OutletFilter::new(criteria)?;
    Ok(outlets.iter().filter(|o| filter.matches(o)).collect())
}
