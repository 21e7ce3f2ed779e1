// ── Ordered-list reordering ──
//
// Generic support for lists the user rearranges by drag gesture: an
// in-memory ordered collection with pairwise moves, a drag session that
// converts pointer positions into moves using a midpoint rule, and a
// batched persist that fires one update per item concurrently.

use std::future::Future;

use futures_util::future::join_all;

use crate::model::EntityId;

/// An entity with identity and an integer display position.
pub trait Orderable {
    fn id(&self) -> &EntityId;
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

/// An ordered collection of [`Orderable`] items.
///
/// Construction sorts by the stored position. Every successful
/// [`move_item`](Self::move_item) rewrites all positions to match array
/// indices (0-based, contiguous), so the list can absorb moves at pointer
/// event frequency and stay consistent.
#[derive(Debug, Clone)]
pub struct OrderedList<T> {
    items: Vec<T>,
    dirty: bool,
}

impl<T: Orderable> OrderedList<T> {
    pub fn new(mut items: Vec<T>) -> Self {
        items.sort_by_key(Orderable::position);
        Self { items, dirty: false }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the in-memory order has diverged from the last saved one.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Moves the item at `from` to `to`, shifting the items in between by
    /// one slot, then rewrites every position to its new array index.
    /// Out-of-range indices and `from == to` leave the list untouched.
    /// Returns whether a move happened.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len || from == to {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        for (position, item) in (0u32..).zip(self.items.iter_mut()) {
            item.set_position(position);
        }
        self.dirty = true;
        true
    }

    /// Snapshot of `(id, position)` pairs in display order, the unit a
    /// persist call carries.
    pub fn order(&self) -> Vec<(EntityId, u32)> {
        self.items
            .iter()
            .map(|item| (item.id().clone(), item.position()))
            .collect()
    }

    /// Marks the current order as saved. Called after a successful persist;
    /// a failed persist keeps the list dirty so the user can retry.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Replaces the contents with a fresh server fetch, re-sorting and
    /// clearing the dirty flag.
    pub fn replace(&mut self, items: Vec<T>) {
        *self = Self::new(items);
    }
}

/// Failure summary for a batched order persist: `failed` of `total`
/// update calls returned an error. The first error is kept for logging;
/// the caller reports one aggregate failure to the user.
#[derive(Debug)]
pub struct CommitError<E> {
    pub failed: usize,
    pub total: usize,
    pub first_error: E,
}

/// Persists an order snapshot by invoking `persist` once per item, all
/// concurrently. Succeeds only if every call succeeds; otherwise returns
/// a [`CommitError`] and leaves reconciliation to the next refetch.
pub async fn commit_order<F, Fut, E>(
    order: &[(EntityId, u32)],
    persist: F,
) -> Result<(), CommitError<E>>
where
    F: Fn(EntityId, u32) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let total = order.len();
    let results = join_all(
        order
            .iter()
            .map(|(id, position)| persist(id.clone(), *position)),
    )
    .await;

    let mut failed = 0;
    let mut first_error = None;
    for result in results {
        if let Err(err) = result {
            failed += 1;
            if first_error.is_none() {
                first_error = Some(err);
            }
        }
    }
    match first_error {
        None => Ok(()),
        Some(first_error) => Err(CommitError { failed, total, first_error }),
    }
}

/// Tracks one drag gesture over a list of equal-height rows and decides
/// when the dragged item should move.
///
/// A move fires only once the pointer crosses the vertical midpoint of the
/// hovered row, and only when the crossing direction matches the drag
/// direction: dragging downward fires once the pointer goes below the
/// midpoint, dragging upward once it goes above. After a move the dragged
/// item is tracked at its new index, so each threshold fires exactly once
/// per crossing and adjacent rows cannot flicker.
#[derive(Debug, Clone)]
pub struct DragSession {
    source: usize,
    list_top: f32,
    row_height: f32,
}

impl DragSession {
    /// Starts a drag of the item at `source`. `list_top` is the Y
    /// coordinate of the first row's top edge and `row_height` the uniform
    /// row height.
    pub fn new(source: usize, list_top: f32, row_height: f32) -> Self {
        Self { source, list_top, row_height }
    }

    /// Index the dragged item currently occupies.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Feeds a pointer position. Returns `Some((from, to))` when the
    /// midpoint rule fires; the caller applies the corresponding
    /// [`OrderedList::move_item`] and the session follows the item to its
    /// new index. Safe to call on every pointer event.
    pub fn update(&mut self, pointer_y: f32, len: usize) -> Option<(usize, usize)> {
        if len == 0 || self.row_height <= 0.0 || self.source >= len {
            return None;
        }
        let hover = self.row_at(pointer_y, len);
        if hover == self.source {
            return None;
        }
        let crossed = if hover > self.source {
            pointer_y > self.midpoint_of(hover)
        } else {
            pointer_y < self.midpoint_of(hover)
        };
        if !crossed {
            return None;
        }
        let from = self.source;
        self.source = hover;
        Some((from, hover))
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn midpoint_of(&self, row: usize) -> f32 {
        self.list_top + row as f32 * self.row_height + self.row_height / 2.0
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn row_at(&self, pointer_y: f32, len: usize) -> usize {
        let offset = (pointer_y - self.list_top).max(0.0);
        let row = (offset / self.row_height).floor() as usize;
        row.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    struct Row {
        id: EntityId,
        position: u32,
    }

    impl Row {
        fn new(id: &str, position: u32) -> Self {
            Self { id: EntityId::from(id), position }
        }
    }

    impl Orderable for Row {
        fn id(&self) -> &EntityId {
            &self.id
        }

        fn position(&self) -> u32 {
            self.position
        }

        fn set_position(&mut self, position: u32) {
            self.position = position;
        }
    }

    fn sample() -> OrderedList<Row> {
        OrderedList::new(vec![
            Row::new("a", 0),
            Row::new("b", 1),
            Row::new("c", 2),
            Row::new("d", 3),
            Row::new("e", 4),
        ])
    }

    fn ids(list: &OrderedList<Row>) -> Vec<String> {
        list.items().iter().map(|r| r.id.to_string()).collect()
    }

    fn assert_invariants(list: &OrderedList<Row>, expected_len: usize) {
        assert_eq!(list.len(), expected_len);
        let identities: HashSet<String> = ids(list).into_iter().collect();
        assert_eq!(identities.len(), expected_len, "identities must be preserved");
        for (index, row) in list.items().iter().enumerate() {
            assert_eq!(u64::from(row.position()), index as u64);
        }
    }

    // ── OrderedList tests ────────────────────────────────────────────

    #[test]
    fn construction_sorts_by_stored_position() {
        let list = OrderedList::new(vec![
            Row::new("c", 7),
            Row::new("a", 0),
            Row::new("b", 3),
        ]);
        assert_eq!(ids(&list), ["a", "b", "c"]);
        assert!(!list.is_dirty());
    }

    #[test]
    fn moves_rewrite_positions_to_array_indices() {
        let mut list = sample();
        for (from, to) in [(0, 4), (2, 0), (3, 1), (4, 4), (1, 3)] {
            list.move_item(from, to);
            assert_invariants(&list, 5);
        }
    }

    #[test]
    fn move_down_shifts_intermediates_up() {
        let mut list = sample();
        assert!(list.move_item(1, 3));
        assert_eq!(ids(&list), ["a", "c", "d", "b", "e"]);
        assert!(list.is_dirty());
    }

    #[test]
    fn out_of_range_and_noop_moves_are_rejected() {
        let mut list = sample();
        assert!(!list.move_item(0, 5));
        assert!(!list.move_item(5, 0));
        assert!(!list.move_item(2, 2));
        assert_eq!(ids(&list), ["a", "b", "c", "d", "e"]);
        assert!(!list.is_dirty());
    }

    #[test]
    fn replace_resets_dirty_flag() {
        let mut list = sample();
        list.move_item(0, 1);
        assert!(list.is_dirty());
        list.replace(vec![Row::new("x", 1), Row::new("y", 0)]);
        assert_eq!(ids(&list), ["y", "x"]);
        assert!(!list.is_dirty());
    }

    // ── commit_order tests ───────────────────────────────────────────

    #[tokio::test]
    async fn commit_fires_one_call_per_item() {
        let mut list = sample();
        list.move_item(0, 2);
        let calls = Mutex::new(Vec::new());

        let outcome = commit_order(&list.order(), |id, position| {
            calls.lock().unwrap().push((id.to_string(), position));
            async { Ok::<(), String>(()) }
        })
        .await;

        assert!(outcome.is_ok());
        let mut seen = calls.into_inner().unwrap();
        seen.sort();
        assert_eq!(
            seen,
            [
                ("a".to_string(), 2),
                ("b".to_string(), 0),
                ("c".to_string(), 1),
                ("d".to_string(), 3),
                ("e".to_string(), 4),
            ]
        );
    }

    #[tokio::test]
    async fn partial_failure_reports_one_aggregate_error_and_keeps_order() {
        let mut list = sample();
        list.move_item(4, 0);
        let before = list.order();
        let calls = Mutex::new(0_usize);

        let outcome = commit_order(&list.order(), |id, _position| {
            *calls.lock().unwrap() += 1;
            let fail = id.to_string() == "c";
            async move {
                if fail {
                    Err("boom".to_string())
                } else {
                    Ok(())
                }
            }
        })
        .await;

        let err = match outcome {
            Err(err) => err,
            Ok(()) => panic!("expected commit failure"),
        };
        assert_eq!(err.failed, 1);
        assert_eq!(err.total, 5);
        assert_eq!(err.first_error, "boom");
        // Every call still fired; the unsaved order is left as-is.
        assert_eq!(calls.into_inner().unwrap(), 5);
        assert_eq!(list.order(), before);
        assert!(list.is_dirty());
    }

    // ── DragSession tests ────────────────────────────────────────────

    #[test]
    fn downward_move_waits_for_the_midpoint() {
        // Rows are 20px tall starting at y = 0; row 3 spans 60..80 with its
        // midpoint at 70.
        let mut drag = DragSession::new(2, 0.0, 20.0);
        assert_eq!(drag.update(65.0, 5), None);
        assert_eq!(drag.update(69.9, 5), None);
        assert_eq!(drag.update(70.5, 5), Some((2, 3)));
        // Staying below the same midpoint must not re-fire.
        assert_eq!(drag.update(71.0, 5), None);
        assert_eq!(drag.update(79.0, 5), None);
        // The next row's midpoint (90) gates the next move.
        assert_eq!(drag.update(85.0, 5), None);
        assert_eq!(drag.update(90.5, 5), Some((3, 4)));
    }

    #[test]
    fn upward_move_needs_the_opposite_crossing() {
        let mut drag = DragSession::new(3, 0.0, 20.0);
        // Hovering row 2 (40..60, midpoint 50) in its lower half does not
        // fire while travelling up.
        assert_eq!(drag.update(55.0, 5), None);
        assert_eq!(drag.update(49.0, 5), Some((3, 2)));
        assert_eq!(drag.update(48.0, 5), None);
    }

    #[test]
    fn pointer_past_the_ends_is_clamped() {
        let mut drag = DragSession::new(1, 10.0, 20.0);
        // Way above the list: hover clamps to row 0, midpoint 20.
        assert_eq!(drag.update(-100.0, 3), Some((1, 0)));
        // Way below: hover clamps to the last row.
        assert_eq!(drag.update(1000.0, 3), Some((0, 2)));
        assert_eq!(drag.update(1000.0, 3), None);
    }

    #[test]
    fn drag_over_empty_or_degenerate_list_is_inert() {
        let mut drag = DragSession::new(0, 0.0, 20.0);
        assert_eq!(drag.update(100.0, 0), None);
        let mut flat = DragSession::new(0, 0.0, 0.0);
        assert_eq!(flat.update(100.0, 5), None);
    }
}
