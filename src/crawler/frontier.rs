//! Crawl frontier
//!
//! A FIFO queue of URLs waiting to be fetched plus the visited set. Taking a URL
//! from the frontier marks it visited in the same step, so a URL is handed out at
//! most once per traversal no matter how many pages link to it.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO queue with check-and-set visited tracking
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,

    /// URLs ever enqueued, to keep duplicates out of the queue
    seen: HashSet<String>,

    /// URLs handed out or otherwise claimed
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier seeded with the root URL
    pub fn with_root(root: Url) -> Self {
        let mut frontier = Self::new();
        frontier.push(root);
        frontier
    }

    /// Enqueues a URL unless it was enqueued or visited before
    ///
    /// Returns true if the URL was added.
    pub fn push(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.seen.contains(key) {
            return false;
        }
        self.seen.insert(key.to_string());
        self.queue.push_back(url);
        true
    }

    /// Takes the next unvisited URL and marks it visited
    ///
    /// URLs that became visited while queued are skipped.
    pub fn next(&mut self) -> Option<Url> {
        while let Some(url) = self.queue.pop_front() {
            if self.visited.insert(url.as_str().to_string()) {
                return Some(url);
            }
        }
        None
    }

    /// Marks a URL visited without fetching it
    ///
    /// Returns true if it was not visited before.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_string())
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Number of URLs still queued
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }
}
