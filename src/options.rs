//! Boundary for selection fields whose options come from elsewhere.
//!
//! Fetching is the provider's business. This module only decides which
//! answer is current (last query wins) and degrades failures to an empty
//! option list.

use anyhow::Result;

use crate::domain::FieldOption;

/// Source of options for searchable selection fields.
pub trait OptionProvider {
    fn load_options(&self, query: &str) -> Result<Vec<FieldOption>>;
}

impl<F> OptionProvider for F
where
    F: Fn(&str) -> Result<Vec<FieldOption>>,
{
    fn load_options(&self, query: &str) -> Result<Vec<FieldOption>> {
        self(query)
    }
}

/// Handle for one issued query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    generation: u64,
    query: String,
}

impl QueryTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Tracks the latest query of one field so late answers can be dropped.
#[derive(Debug, Default)]
pub struct OptionLookup {
    generation: u64,
    options: Vec<FieldOption>,
}

impl OptionLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a query; any ticket issued before this one becomes stale.
    pub fn begin(&mut self, query: impl Into<String>) -> QueryTicket {
        self.generation += 1;
        QueryTicket {
            generation: self.generation,
            query: query.into(),
        }
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Accept the answer for `ticket`. Stale answers are discarded and return
    /// `false`; failures become an empty list.
    pub fn complete(&mut self, ticket: &QueryTicket, result: Result<Vec<FieldOption>>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(query = ticket.query(), "discarding superseded option results");
            return false;
        }
        self.options = match result {
            Ok(options) => options,
            Err(err) => {
                tracing::warn!(query = ticket.query(), error = %err, "option lookup failed");
                Vec::new()
            }
        };
        true
    }

    /// Issue and complete a query in one step.
    pub fn fetch(&mut self, provider: &dyn OptionProvider, query: &str) -> &[FieldOption] {
        let ticket = self.begin(query);
        let result = provider.load_options(query);
        self.complete(&ticket, result);
        &self.options
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }
}

/// Case-insensitive label filter for fields with a fixed option list.
pub fn filter_options<'a>(options: &'a [FieldOption], query: &str) -> Vec<&'a FieldOption> {
    let needle = query.to_lowercase();
    options
        .iter()
        .filter(|option| option.label.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn countries() -> Vec<FieldOption> {
        vec![
            FieldOption::new("Canada", "ca"),
            FieldOption::new("United States", "us"),
            FieldOption::new("United Kingdom", "uk"),
        ]
    }

    #[test]
    fn last_query_wins() {
        let mut lookup = OptionLookup::new();
        let first = lookup.begin("can");
        let second = lookup.begin("uni");
        assert!(lookup.complete(&second, Ok(countries()[1..].to_vec())));
        assert!(!lookup.complete(&first, Ok(countries()[..1].to_vec())));
        assert_eq!(lookup.options().len(), 2);
        assert_eq!(lookup.options()[0].label, "United States");
    }

    #[test]
    fn failures_degrade_to_no_options() {
        let mut lookup = OptionLookup::new();
        let ticket = lookup.begin("x");
        lookup.complete(&ticket, Ok(countries()));
        let failing = |_: &str| -> Result<Vec<FieldOption>> { Err(anyhow!("network down")) };
        assert!(lookup.fetch(&failing, "y").is_empty());
    }

    #[test]
    fn closures_act_as_providers() {
        let provider = |query: &str| -> Result<Vec<FieldOption>> {
            Ok(filter_options(&countries(), query)
                .into_iter()
                .cloned()
                .collect())
        };
        let mut lookup = OptionLookup::new();
        let labels: Vec<_> = lookup
            .fetch(&provider, "united")
            .iter()
            .map(|option| option.label.clone())
            .collect();
        assert_eq!(labels, vec!["United States", "United Kingdom"]);
    }

    #[test]
    fn filter_is_case_insensitive() {
        let options = countries();
        let matched = filter_options(&options, "KING");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].value, "uk");
        assert_eq!(filter_options(&options, "").len(), 3);
    }
}
