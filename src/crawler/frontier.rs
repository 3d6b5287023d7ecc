//! Breadth-first crawl frontier
//!
//! A FIFO queue of (URL, depth) entries plus the seen-set. A URL is admitted
//! at most once: pushes are rejected when the URL was already visited or is
//! already waiting in the queue.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Canonical URL
    pub url: Url,

    /// Link distance from the seed (seed is 0)
    pub depth: u32,
}

/// FIFO frontier with visit tracking
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,

    /// Keys currently in `queue`
    queued: HashSet<String>,

    /// Keys already taken for a visit
    seen: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier holding only the seed at depth 0
    pub fn new(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed, 0);
        frontier
    }

    /// Enqueues a URL unless it has been seen or is already queued
    ///
    /// Returns true if the entry was added.
    pub fn push(&mut self, url: Url, depth: u32) -> bool {
        let key = url.as_str();
        if self.seen.contains(key) || self.queued.contains(key) {
            return false;
        }

        self.queued.insert(key.to_string());
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Takes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.queued.remove(entry.url.as_str());
        Some(entry)
    }

    /// Records a visit; returns false if the URL had already been visited
    pub fn mark_seen(&mut self, url: &Url) -> bool {
        self.seen.insert(url.as_str().to_string())
    }

    pub fn is_seen(&self, url: &Url) -> bool {
        self.seen.contains(url.as_str())
    }

    /// Number of entries waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of URLs taken for a visit so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
