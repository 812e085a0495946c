use serde::{Deserialize, Serialize};

/// Which item of one list is open in the editor.
///
/// Positional: "index 2" is whatever currently sits at position 2, so every
/// structural edit of the list has to re-derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    index: Option<usize>,
}

impl Selection {
    pub fn none() -> Self {
        Self { index: None }
    }

    pub fn at(index: usize) -> Self {
        Self { index: Some(index) }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn set(&mut self, index: Option<usize>) {
        self.index = index;
    }

    /// Newly inserted items become selected
    pub fn after_insert(&mut self, inserted: usize) {
        self.index = Some(inserted);
    }

    /// Re-derive after the element at `removed` was deleted
    pub fn after_remove(&mut self, removed: usize, new_len: usize) {
        self.index = match self.index {
            _ if new_len == 0 => None,
            None => None,
            Some(selected) if removed < selected => Some(selected - 1),
            Some(selected) => Some(selected.min(new_len - 1)),
        };
    }

    /// Follow the selected element through a splice move
    pub fn after_move(&mut self, from: usize, to: usize) {
        if let Some(selected) = self.index {
            self.index = Some(if selected == from {
                to
            } else if from < selected && selected <= to {
                selected - 1
            } else if to <= selected && selected < from {
                selected + 1
            } else {
                selected
            });
        }
    }

    /// Force the selection into `0..len`
    pub fn clamp(&mut self, len: usize) {
        self.index = match self.index {
            _ if len == 0 => None,
            Some(selected) => Some(selected.min(len - 1)),
            None => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::move_item;

    #[test]
    fn test_remove_only_item_clears_selection() {
        let mut selection = Selection::at(0);
        selection.after_remove(0, 0);
        assert_eq!(selection.index(), None);
    }

    #[test]
    fn test_remove_selected_last_position_clamps() {
        let mut selection = Selection::at(2);
        selection.after_remove(2, 2);
        assert_eq!(selection.index(), Some(1));
    }

    #[test]
    fn test_remove_selected_middle_keeps_position() {
        let mut selection = Selection::at(1);
        selection.after_remove(1, 3);
        assert_eq!(selection.index(), Some(1));
    }

    #[test]
    fn test_remove_before_selection_shifts_down() {
        let mut selection = Selection::at(3);
        selection.after_remove(0, 4);
        assert_eq!(selection.index(), Some(2));
    }

    #[test]
    fn test_remove_after_selection_keeps_index() {
        let mut selection = Selection::at(1);
        selection.after_remove(3, 3);
        assert_eq!(selection.index(), Some(1));
    }

    #[test]
    fn test_after_move_follows_element() {
        for from in 0..5 {
            for to in 0..5 {
                for selected in 0..5 {
                    let mut items: Vec<usize> = (0..5).collect();
                    let mut selection = Selection::at(selected);
                    move_item(&mut items, from, to);
                    selection.after_move(from, to);
                    assert_eq!(
                        items[selection.index().unwrap()],
                        selected,
                        "move {} -> {} with {} selected",
                        from,
                        to,
                        selected
                    );
                }
            }
        }
    }

    #[test]
    fn test_clamp() {
        let mut selection = Selection::at(5);
        selection.clamp(3);
        assert_eq!(selection.index(), Some(2));
        selection.clamp(0);
        assert_eq!(selection.index(), None);
    }
}
