/// Which detail pane is open in an expandable table. Opening one closes the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: Option<usize>,
}

impl ExpansionState {
    pub const fn new() -> Self {
        Self { open: None }
    }

    pub const fn open_row(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, row: usize) -> bool {
        self.open == Some(row)
    }

    /// Toggle `row`: collapse it if it is the open one, otherwise open it and collapse the rest.
    pub fn toggle(&mut self, row: usize) {
        self.open = if self.open == Some(row) {
            None
        } else {
            Some(row)
        };
    }

    pub fn collapse(&mut self) {
        self.open = None;
    }

    /// Drop the open pane if the table shrank below it.
    pub fn retain_within(&mut self, rows: usize) {
        if self.open.is_some_and(|row| row >= rows) {
            self.open = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ExpansionState;

    #[test]
    fn opening_a_row_closes_the_previous_one() {
        let mut state = ExpansionState::new();
        state.toggle(1);
        state.toggle(3);

        assert!(state.is_open(3));
        assert!(!state.is_open(1));
    }

    #[test]
    fn toggling_the_open_row_collapses_it() {
        let mut state = ExpansionState::new();
        state.toggle(2);
        state.toggle(2);

        assert_eq!(state.open_row(), None);
    }

    #[test]
    fn at_most_one_row_is_open_across_a_click_sequence() {
        let mut state = ExpansionState::new();
        let clicks = [0, 4, 4, 2, 7, 7, 7, 1, 0, 3];

        for click in clicks {
            state.toggle(click);
            let open = (0..8).filter(|row| state.is_open(*row)).count();
            assert!(open <= 1, "{open} rows open after clicking {click}");
        }
        assert_eq!(state.open_row(), Some(3));
    }

    #[test]
    fn shrinking_table_collapses_out_of_range_pane() {
        let mut state = ExpansionState::new();
        state.toggle(5);
        state.retain_within(3);
        assert_eq!(state.open_row(), None);
    }
}
