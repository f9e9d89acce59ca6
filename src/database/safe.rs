//! Read interface consumed by front-ends
//!
//! Terminal and graphical clients only ever see a database through this
//! trait, so they stay independent of the container format behind it.

use super::models::{Record, SearchResult};

/// Check if `text` contains `phrase`, ignoring case
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.to_lowercase().contains(&phrase.to_lowercase())
}

/// Query surface of an unlocked password database
pub trait PasswordSafe {
    /// All record titles, sorted
    fn list(&self) -> Vec<String>;

    /// Distinct group names, sorted; ungrouped records form the group `""`
    fn groups(&self) -> Vec<String>;

    /// Titles of the records in `group`, sorted
    fn list_by_group(&self, group: &str) -> Vec<String>;

    /// Record stored under `title`
    fn get_record(&self, title: &str) -> Option<&Record>;

    /// Database display name
    fn name(&self) -> &str;

    /// Filter titles by a case-insensitive phrase, grouped by group
    ///
    /// An empty phrase matches every record. Groups without a match are
    /// left out.
    fn search(&self, phrase: &str) -> Vec<SearchResult> {
        self.groups()
            .into_iter()
            .filter_map(|group| {
                let titles: Vec<String> = self
                    .list_by_group(&group)
                    .into_iter()
                    .filter(|title| contains_phrase(title, phrase))
                    .collect();
                (!titles.is_empty()).then_some(SearchResult { group, titles })
            })
            .collect()
    }
}
