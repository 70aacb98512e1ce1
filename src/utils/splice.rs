/// Where a tracked index ends up after the element at `from` is removed and
/// reinserted at `to` within the same list.
///
/// The tracked element itself follows the move; elements between the two
/// positions shift by one in the direction the gap closes; everything else
/// stays put.
pub fn index_after_move(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < to && index > from && index <= to {
        index - 1
    } else if to < from && index >= to && index < from {
        index + 1
    } else {
        index
    }
}
