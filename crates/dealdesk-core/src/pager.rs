// ── Paged fetch state machine ──
//
// Retrieves a collection in fixed-size pages and accumulates them into one
// appendable list. The machine itself never performs I/O: callers ask it
// for the next `PageRequest`, run the fetch, and feed the outcome back.
// A generation counter makes responses from an abandoned filter harmless.

/// Where a [`Pager`] currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    /// Nothing fetched yet under the current filter.
    Idle,
    /// First page in flight; the accumulated list is empty.
    FetchingFirst,
    /// A follow-up page in flight; the accumulated list is intact.
    FetchingNext,
    /// At least one more page may exist.
    HasMore,
    /// A short page proved the collection is exhausted.
    Exhausted,
}

/// A fetch the caller should perform: `GET ...?take={take}&skip={skip}`.
/// Echo it back into [`Pager::apply_page`] or [`Pager::apply_failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub take: usize,
    pub skip: usize,
}

/// Accumulating page fetcher for one resource under one filter.
///
/// At most one fetch is in flight at a time; triggers while fetching are
/// suppressed rather than queued. Exhaustion is inferred solely from a
/// page shorter than `take`, so a collection sized at an exact multiple
/// of `take` costs one extra empty fetch before the pager settles.
#[derive(Debug)]
pub struct Pager<T> {
    items: Vec<T>,
    phase: PagePhase,
    take: usize,
    skip: usize,
    generation: u64,
}

impl<T> Pager<T> {
    pub fn new(take: usize) -> Self {
        Self {
            items: Vec::new(),
            phase: PagePhase::Idle,
            take: take.max(1),
            skip: 0,
            generation: 0,
        }
    }

    /// Pages accumulated so far, in fetch order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, PagePhase::FetchingFirst | PagePhase::FetchingNext)
    }

    pub fn has_more(&self) -> bool {
        self.phase == PagePhase::HasMore
    }

    /// Starts over at offset zero. Called on mount and on every filter or
    /// search change; the accumulated list is cleared synchronously and
    /// the generation bump strands any fetch still in flight.
    pub fn first_page(&mut self) -> PageRequest {
        self.items.clear();
        self.skip = 0;
        self.generation += 1;
        self.phase = PagePhase::FetchingFirst;
        self.request()
    }

    /// Requests the next page, or `None` when there is nothing to do:
    /// already fetching, exhausted, or never started.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        if self.phase != PagePhase::HasMore {
            return None;
        }
        self.phase = PagePhase::FetchingNext;
        Some(self.request())
    }

    /// Feeds a successful fetch back. A page from a stale generation or an
    /// unexpected phase is discarded; returns whether the page was taken.
    pub fn apply_page(&mut self, request: PageRequest, page: Vec<T>) -> bool {
        if request.generation != self.generation || !self.is_fetching() {
            return false;
        }
        let full = page.len() == self.take;
        self.items.extend(page);
        if full {
            self.skip += self.take;
            self.phase = PagePhase::HasMore;
        } else {
            self.phase = PagePhase::Exhausted;
        }
        true
    }

    /// Feeds a failed fetch back. The accumulated list is never cleared on
    /// failure; the phase returns to where it stood before the attempt so
    /// the user can re-trigger it.
    pub fn apply_failure(&mut self, request: PageRequest) -> bool {
        if request.generation != self.generation || !self.is_fetching() {
            return false;
        }
        self.phase = match self.phase {
            PagePhase::FetchingFirst => PagePhase::Idle,
            _ => PagePhase::HasMore,
        };
        true
    }

    fn request(&self) -> PageRequest {
        PageRequest {
            generation: self.generation,
            take: self.take,
            skip: self.skip,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn first_page_requests_offset_zero() {
        let mut pager: Pager<u32> = Pager::new(10);
        let req = pager.first_page();
        assert_eq!((req.take, req.skip), (10, 0));
        assert_eq!(pager.phase(), PagePhase::FetchingFirst);
        assert!(pager.is_fetching());
    }

    #[test]
    fn full_page_advances_the_cursor() {
        let mut pager = Pager::new(3);
        let req = pager.first_page();
        assert!(pager.apply_page(req, vec![1, 2, 3]));
        assert_eq!(pager.phase(), PagePhase::HasMore);

        let req = pager.next_page().unwrap();
        assert_eq!(req.skip, 3);
    }

    #[test]
    fn short_page_exhausts() {
        let mut pager = Pager::new(3);
        let req = pager.first_page();
        pager.apply_page(req, vec![1, 2]);
        assert_eq!(pager.phase(), PagePhase::Exhausted);
        assert_eq!(pager.next_page(), None);
    }

    #[test]
    fn exact_multiple_needs_one_extra_empty_fetch() {
        // A backend holding exactly `take` items: the pager cannot know the
        // collection is done until a follow-up fetch comes back short.
        let mut pager = Pager::new(3);
        let req = pager.first_page();
        pager.apply_page(req, vec![1, 2, 3]);
        assert_eq!(pager.phase(), PagePhase::HasMore);

        let req = pager.next_page().unwrap();
        assert_eq!(req.skip, 3);
        pager.apply_page(req, Vec::new());
        assert_eq!(pager.phase(), PagePhase::Exhausted);
        assert_eq!(pager.items(), [1, 2, 3]);
    }

    #[test]
    fn pages_accumulate_in_fetch_order() {
        let mut pager = Pager::new(2);
        let req = pager.first_page();
        pager.apply_page(req, vec![1, 2]);
        let req = pager.next_page().unwrap();
        pager.apply_page(req, vec![3, 4]);
        let req = pager.next_page().unwrap();
        pager.apply_page(req, vec![5]);
        assert_eq!(pager.items(), [1, 2, 3, 4, 5]);
        assert_eq!(pager.phase(), PagePhase::Exhausted);
    }

    #[test]
    fn triggers_while_fetching_are_suppressed() {
        let mut pager: Pager<u32> = Pager::new(2);
        pager.first_page();
        assert_eq!(pager.next_page(), None);

        let req = pager.first_page();
        pager.apply_page(req, vec![1, 2]);
        let inflight = pager.next_page().unwrap();
        assert_eq!(pager.next_page(), None);
        pager.apply_page(inflight, vec![3, 4]);
        assert_eq!(pager.len(), 4);
    }

    #[test]
    fn filter_change_clears_synchronously_and_strands_inflight_pages() {
        let mut pager = Pager::new(2);
        let req = pager.first_page();
        pager.apply_page(req, vec![1, 2]);
        let stale = pager.next_page().unwrap();

        // Filter changed while the fetch was in flight.
        let fresh = pager.first_page();
        assert!(pager.is_empty());
        assert_eq!(fresh.skip, 0);

        // The old filter's page must not leak into the new list.
        assert!(!pager.apply_page(stale, vec![3, 4]));
        assert!(pager.is_empty());

        assert!(pager.apply_page(fresh, vec![9]));
        assert_eq!(pager.items(), [9]);
    }

    #[test]
    fn failure_keeps_items_and_restores_the_prior_phase() {
        let mut pager = Pager::new(2);
        let req = pager.first_page();
        pager.apply_page(req, vec![1, 2]);
        let req = pager.next_page().unwrap();
        assert!(pager.apply_failure(req));
        assert_eq!(pager.phase(), PagePhase::HasMore);
        assert_eq!(pager.items(), [1, 2]);

        let mut empty: Pager<u32> = Pager::new(2);
        let req = empty.first_page();
        assert!(empty.apply_failure(req));
        assert_eq!(empty.phase(), PagePhase::Idle);
        assert!(empty.is_empty());
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut pager = Pager::new(2);
        let req = pager.first_page();
        pager.apply_page(req, vec![1, 2]);
        let stale = pager.next_page().unwrap();
        let fresh = pager.first_page();
        assert!(!pager.apply_failure(stale));
        assert_eq!(pager.phase(), PagePhase::FetchingFirst);
        assert!(pager.apply_page(fresh, vec![7, 8]));
    }
}
