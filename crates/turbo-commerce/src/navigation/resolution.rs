//! Last-write-wins tracking of the resolved variant.
//!
//! Rapid option clicks can start several variant resolutions at once. Each
//! one gets a ticket; only the newest ticket may commit, so a slow early
//! response never overwrites a later selection.

use crate::catalog::VariantQuery;

/// Proof that a resolution was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    query: VariantQuery,
}

impl ResolutionTicket {
    pub fn query(&self) -> &VariantQuery {
        &self.query
    }
}

/// Resolved value `V` plus the bookkeeping for in-flight resolutions.
#[derive(Debug)]
pub struct VariantResolution<V> {
    generation: u64,
    current: Option<(VariantQuery, V)>,
    pending: Option<VariantQuery>,
}

impl<V> Default for VariantResolution<V> {
    fn default() -> Self {
        Self {
            generation: 0,
            current: None,
            pending: None,
        }
    }
}

impl<V> VariantResolution<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start resolving `query`.
    ///
    /// Returns `None` when the same query is already in flight, or already
    /// resolved with nothing else pending.
    pub fn begin(&mut self, query: VariantQuery) -> Option<ResolutionTicket> {
        match &self.pending {
            Some(pending) if *pending == query => return None,
            None if self.current_query() == Some(&query) => return None,
            _ => {}
        }
        self.generation += 1;
        self.pending = Some(query.clone());
        Some(ResolutionTicket {
            generation: self.generation,
            query,
        })
    }

    /// Commit a result. Stale tickets are discarded and return false.
    pub fn commit(&mut self, ticket: ResolutionTicket, value: V) -> bool {
        if ticket.generation != self.generation {
            tracing::trace!(query = %ticket.query, "stale variant resolution discarded");
            return false;
        }
        self.pending = None;
        self.current = Some((ticket.query, value));
        true
    }

    pub fn current(&self) -> Option<&V> {
        self.current.as_ref().map(|(_, v)| v)
    }

    pub fn current_query(&self) -> Option<&VariantQuery> {
        self.current.as_ref().map(|(q, _)| q)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> VariantQuery {
        VariantQuery::parse(s)
    }

    #[test]
    fn test_duplicate_request_gets_no_ticket() {
        let mut resolution: VariantResolution<&str> = VariantResolution::new();
        let ticket = resolution.begin(q("color=Blue")).unwrap();
        assert!(resolution.begin(q("color=Blue")).is_none());
        assert!(resolution.commit(ticket, "v-blue"));
        assert!(resolution.begin(q("color=Blue")).is_none());
        assert_eq!(resolution.current(), Some(&"v-blue"));
    }

    #[test]
    fn test_later_request_wins() {
        let mut resolution = VariantResolution::new();
        let first = resolution.begin(q("color=Blue")).unwrap();
        let second = resolution.begin(q("color=Red")).unwrap();

        assert!(resolution.commit(second, "v-red"));
        assert!(!resolution.commit(first, "v-blue"));
        assert_eq!(resolution.current(), Some(&"v-red"));
        assert_eq!(resolution.current_query(), Some(&q("color=Red")));
        assert!(!resolution.is_pending());
    }

    #[test]
    fn test_returning_to_current_while_pending() {
        let mut resolution = VariantResolution::new();
        let ticket = resolution.begin(q("color=Red")).unwrap();
        resolution.commit(ticket, "v-red");

        let _blue = resolution.begin(q("color=Blue")).unwrap();
        let back = resolution.begin(q("color=Red")).unwrap();
        assert_eq!(back.query(), &q("color=Red"));
        assert!(resolution.commit(back, "v-red"));
    }
}
