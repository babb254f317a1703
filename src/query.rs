use std::fmt;

use tracing::{debug, warn};

use crate::error::Result;
use crate::pagination::{reduce, PaginationPolicy, PaginationState};
use crate::types::Page;

/// Identity of a query: the resource plus the parameters it was issued with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: String,
    pub params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, name, value)?;
        }
        Ok(())
    }
}

/// Handed out when a fetch starts and handed back with its result.
///
/// `generation` ties the result to the query instance that asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Failed,
    Stale,
}

/// Paginated query with at most one fetch in flight.
///
/// Driven from the app's update loop: `fetch_next_page` hands out a ticket,
/// the caller performs the request, then feeds the outcome to `resolve`.
#[derive(Debug)]
pub struct InfiniteQuery<T> {
    key: QueryKey,
    policy: PaginationPolicy,
    pages: Vec<Page<T>>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    error: Option<String>,
}

impl<T: Clone> InfiniteQuery<T> {
    pub fn new(key: QueryKey, policy: PaginationPolicy) -> Self {
        Self {
            key,
            policy,
            pages: Vec::new(),
            generation: 0,
            in_flight: None,
            error: None,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// `None` until the first page has been appended
    pub fn data(&self) -> Option<&[Page<T>]> {
        if self.pages.is_empty() {
            None
        } else {
            Some(&self.pages)
        }
    }

    pub fn items(&self) -> Option<Vec<T>> {
        reduce(&self.pages)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some() && self.pages.is_empty()
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.in_flight.is_some() && !self.pages.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        match self.pages.last() {
            Some(last) => self.policy.next_page(last).is_some(),
            None => true,
        }
    }

    pub fn state(&self) -> PaginationState {
        match (self.pages.len(), self.in_flight.is_some()) {
            (0, false) => PaginationState::Idle,
            (0, true) => PaginationState::Loading,
            (pages, false) => PaginationState::Ready { pages },
            (pages, true) => PaginationState::LoadingMore { pages },
        }
    }

    /// Start fetching the next page. Returns `None` while another fetch for
    /// this key is still in flight or once the collection is exhausted.
    pub fn fetch_next_page(&mut self) -> Option<FetchTicket> {
        if let Some(pending) = self.in_flight {
            debug!(key = %self.key, page = pending.page, "fetch already in flight");
            return None;
        }

        let page = match self.pages.last() {
            Some(last) => self.policy.next_page(last)?,
            None => 1,
        };

        let ticket = FetchTicket {
            generation: self.generation,
            page,
        };
        debug!(key = %self.key, page, generation = self.generation, "fetching page");
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    pub fn resolve(&mut self, ticket: FetchTicket, result: Result<Page<T>>) -> Resolution {
        if self.in_flight != Some(ticket) {
            debug!(key = %self.key, page = ticket.page, "discarding stale page");
            return Resolution::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                debug!(key = %self.key, page = ticket.page, items = page.data.len(), "page appended");
                self.error = None;
                self.pages.push(page);
                Resolution::Applied
            }
            Err(e) => {
                warn!(key = %self.key, page = ticket.page, error = %e, "page fetch failed");
                self.error = Some(e.to_string());
                Resolution::Failed
            }
        }
    }

    /// Drop all pages and orphan any in-flight fetch
    pub fn reset(&mut self, key: QueryKey) {
        self.generation += 1;
        self.key = key;
        self.pages.clear();
        self.in_flight = None;
        self.error = None;
    }
}

/// Non-paginated query with the same stale-response guard
#[derive(Debug)]
pub struct SingleQuery<T> {
    key: QueryKey,
    data: Option<Page<T>>,
    generation: u64,
    in_flight: Option<FetchTicket>,
    error: Option<String>,
}

impl<T> SingleQuery<T> {
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            data: None,
            generation: 0,
            in_flight: None,
            error: None,
        }
    }

    pub fn data(&self) -> Option<&[T]> {
        self.data.as_ref().map(|page| page.data.as_slice())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns `None` if the data is already present or a fetch is running
    pub fn start(&mut self) -> Option<FetchTicket> {
        if self.in_flight.is_some() || self.data.is_some() {
            return None;
        }
        let ticket = FetchTicket {
            generation: self.generation,
            page: 1,
        };
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    pub fn resolve(&mut self, ticket: FetchTicket, result: Result<Page<T>>) -> Resolution {
        if self.in_flight != Some(ticket) {
            debug!(key = %self.key, "discarding stale response");
            return Resolution::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.error = None;
                self.data = Some(page);
                Resolution::Applied
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "fetch failed");
                self.error = Some(e.to_string());
                Resolution::Failed
            }
        }
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.data = None;
        self.in_flight = None;
        self.error = None;
    }
}
