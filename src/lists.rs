//! Server-owned data held on the client as "last successful fetch".
//!
//! A load never patches: it replaces the whole value. Each load takes a
//! [`LoadTicket`]; a response carrying an older ticket than the one already
//! applied is dropped, so a slow earlier request cannot overwrite a newer one.

use std::future::Future;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct Synced<V> {
    name: &'static str,
    value: Option<V>,
    error: Option<String>,
    issued: u64,
    applied: u64,
}

pub type ResourceList<T> = Synced<Vec<T>>;

impl<V> Synced<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            value: None,
            error: None,
            issued: 0,
            applied: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.value.is_some()
    }

    /// Message of the most recent failed load, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Returns whether the response was applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<V, ApiError>) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(list = self.name, ticket = ticket.0, applied = self.applied, "discarding stale response");
            return false;
        }

        match result {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
                self.applied = ticket.0;
                true
            }
            Err(err) => {
                tracing::warn!(list = self.name, error = %err, "load failed, keeping last known state");
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub async fn load_with<Fut>(&mut self, fetch: Fut) -> bool
    where
        Fut: Future<Output = Result<V, ApiError>>,
    {
        let ticket = self.begin_load();
        let result = fetch.await;
        self.finish_load(ticket, result)
    }

    /// Drops the value and invalidates every in-flight ticket.
    pub fn clear(&mut self) {
        self.value = None;
        self.error = None;
        self.applied = self.issued;
    }
}

impl<T> Synced<Vec<T>> {
    pub fn items(&self) -> &[T] {
        self.value.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}
