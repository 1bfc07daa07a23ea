//! Tube state
//!
//! Local mirror of the connection's used tube and watch list. Updated only
//! after the server confirms a `use`, `watch` or `ignore`.

use std::collections::BTreeSet;

/// Name of the tube every new connection uses and watches
pub const DEFAULT_TUBE: &str = "default";

/// Used tube and watched tubes for one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TubeState {
    using: String,
    watched: BTreeSet<String>,
}

impl Default for TubeState {
    fn default() -> Self {
        Self {
            using: DEFAULT_TUBE.to_string(),
            watched: BTreeSet::from([DEFAULT_TUBE.to_string()]),
        }
    }
}

impl TubeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tube new jobs are inserted into
    pub fn using(&self) -> &str {
        &self.using
    }

    /// Tubes reservations may draw from
    pub fn watched(&self) -> &BTreeSet<String> {
        &self.watched
    }

    pub fn is_watching(&self, tube: &str) -> bool {
        self.watched.contains(tube)
    }

    /// Record a confirmed `use`
    pub fn record_use(&mut self, tube: &str) {
        self.using = tube.to_string();
    }

    /// Record a confirmed `watch`
    pub fn record_watch(&mut self, tube: &str) {
        self.watched.insert(tube.to_string());
    }

    /// Record a confirmed `ignore`
    ///
    /// The server never confirms ignoring the last watched tube, so the set
    /// stays non-empty.
    pub fn record_ignore(&mut self, tube: &str) {
        self.watched.remove(tube);
    }
}
