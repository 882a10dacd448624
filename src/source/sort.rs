//! Ordering of diagnostic items.
//!
//! Diagnostics of one buffer are ordered by severity, then line. Across
//! buffers, the focused buffer and diagnostics with no buffer come first,
//! then the rest by buffer number.
//!
//! [`compare`] is a pairwise rule, not a total order: an item with no
//! buffer wins against anything from the left-hand side, so comparing two
//! such items returns `Less` both ways. `slice::sort_by` may panic on such
//! comparators, so [`sort_items`] runs its own stable merge sort that only
//! asks "does the right-hand item go first?".

use std::cmp::Ordering;

use crate::lsp::Diagnostic;

use super::item::Item;

/// Compares two diagnostic items relative to the focused buffer.
pub fn compare(a: &Item<Diagnostic>, b: &Item<Diagnostic>, focused: u32) -> Ordering {
    let (a_buf, b_buf) = (a.data.buf_nr, b.data.buf_nr);

    if let (Some(x), Some(y)) = (a_buf, b_buf)
        && x == y
    {
        return a
            .data
            .rank()
            .cmp(&b.data.rank())
            .then_with(|| a.action.line_nr.cmp(&b.action.line_nr));
    }

    let preferred = |buf: Option<u32>| buf.is_none_or(|n| n == focused);
    if preferred(a_buf) {
        Ordering::Less
    } else if preferred(b_buf) {
        Ordering::Greater
    } else {
        // Both defined: preferred() took every None.
        a_buf.cmp(&b_buf)
    }
}

/// Stable sort of diagnostic items for display.
pub fn sort_items(items: Vec<Item<Diagnostic>>, focused: u32) -> Vec<Item<Diagnostic>> {
    let order = merge_order(&items, |a, b| compare(a, b, focused));

    let mut slots: Vec<Option<Item<Diagnostic>>> = items.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|index| slots[index].take())
        .collect()
}

/// Bottom-up merge sort over indices. The right-hand element is taken only
/// when `cmp(left, right)` is `Greater`, which keeps ties in input order.
fn merge_order<T>(items: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Vec<usize> {
    let len = items.len();
    let mut order: Vec<usize> = (0..len).collect();
    let mut merged = Vec::with_capacity(len);
    let mut width = 1;

    while width < len {
        merged.clear();
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j) = (start, mid);
            while i < mid && j < end {
                if cmp(&items[order[i]], &items[order[j]]) == Ordering::Greater {
                    merged.push(order[j]);
                    j += 1;
                } else {
                    merged.push(order[i]);
                    i += 1;
                }
            }
            merged.extend_from_slice(&order[i..mid]);
            merged.extend_from_slice(&order[j..end]);
        }
        std::mem::swap(&mut order, &mut merged);
        width *= 2;
    }

    order
}
