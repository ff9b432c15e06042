use chrono::NaiveDateTime;

use crate::models::shift::Slot;

/// Finds `count` back-to-back available slots starting exactly at `start`.
///
/// `slots` must be one staff member's slots in start order; non-available
/// slots are skipped, which turns any booked or blocked unit inside the
/// chain into a gap. Accumulation starts at the slot beginning at `start`
/// and the first available slot not starting at the running cursor ends the
/// scan. Returns `None` unless the full chain exists.
pub fn find_consecutive<'a, I>(slots: I, start: NaiveDateTime, count: usize) -> Option<Vec<&'a Slot>>
where
    I: IntoIterator<Item = &'a Slot>,
{
    if count == 0 {
        return None;
    }

    let mut cursor = start;
    let mut chain: Vec<&Slot> = Vec::with_capacity(count);

    for slot in slots.into_iter().filter(|slot| slot.is_available()) {
        if slot.starts_at() == cursor {
            chain.push(slot);
            if chain.len() == count {
                return Some(chain);
            }
            cursor = slot.ends_at();
        } else if !chain.is_empty() {
            break;
        }
    }

    None
}
