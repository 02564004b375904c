use crate::SetupError;

/// A fixed window of visual slots sliding over the logical item sequence.
///
/// Slot `initial_slot` always shows the current item; its neighbors show
/// the neighboring items. The mapping is derived on demand and never
/// stored, so there is nothing to keep in sync when the index moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotWindow {
    num_slots: usize,
    initial_slot: usize,
}

impl SlotWindow {
    pub fn new(num_slots: usize, initial_slot: usize) -> Result<Self, SetupError> {
        if num_slots == 0 {
            return Err(SetupError::NoSlots);
        }
        if initial_slot >= num_slots {
            return Err(SetupError::InitialSlotOutOfRange {
                initial_slot,
                num_slots,
            });
        }

        Ok(Self {
            num_slots,
            initial_slot,
        })
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn initial_slot(&self) -> usize {
        self.initial_slot
    }

    /// Logical item shown in `slot` when the carousel rests at `index`,
    /// or `None` when the slot hangs past either end of the sequence.
    pub fn item(&self, slot: usize, index: usize, item_count: usize) -> Option<usize> {
        if slot >= self.num_slots {
            return None;
        }
        let logical = (slot + index).checked_sub(self.initial_slot)?;
        (logical < item_count).then_some(logical)
    }

    /// One `(slot, item)` pair per slot, in slot order. Empty slots come
    /// through as `None` so the renderer can still lay them out.
    pub fn items(
        &self,
        index: usize,
        item_count: usize,
    ) -> impl Iterator<Item = (usize, Option<usize>)> + '_ {
        (0..self.num_slots).map(move |slot| (slot, self.item(slot, index, item_count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_setup() {
        assert_eq!(SlotWindow::new(0, 0), Err(SetupError::NoSlots));
        assert_eq!(
            SlotWindow::new(3, 3),
            Err(SetupError::InitialSlotOutOfRange {
                initial_slot: 3,
                num_slots: 3,
            })
        );
    }

    #[test]
    fn centers_current_item_on_the_initial_slot() {
        let w = SlotWindow::new(5, 2).unwrap();
        assert_eq!(w.item(2, 7, 20), Some(7));
        assert_eq!(w.item(0, 7, 20), Some(5));
        assert_eq!(w.item(4, 7, 20), Some(9));
    }

    #[test]
    fn slots_past_either_end_are_empty() {
        let w = SlotWindow::new(5, 2).unwrap();
        // resting at the first item: the two slots left of center underflow
        assert_eq!(w.item(0, 0, 3), None);
        assert_eq!(w.item(1, 0, 3), None);
        assert_eq!(w.item(2, 0, 3), Some(0));
        // and the tail hangs past a short sequence
        assert_eq!(w.item(4, 2, 3), None);
    }

    #[test]
    fn out_of_window_slot_is_empty() {
        let w = SlotWindow::new(3, 1).unwrap();
        assert_eq!(w.item(3, 0, 10), None);
    }

    #[test]
    fn iterates_all_slots_in_order() {
        let w = SlotWindow::new(3, 1).unwrap();
        let pairs: Vec<_> = w.items(0, 5).collect();
        assert_eq!(pairs, vec![(0, None), (1, Some(0)), (2, Some(1))]);
    }
}
