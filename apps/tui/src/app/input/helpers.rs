pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Move a list selection by `delta` rows, staying inside `0..len`.
pub const fn step_selection(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    let moved = index.saturating_add_signed(delta);
    if moved >= len {
        len - 1
    } else {
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_cycles_through_both_ends() {
        assert_eq!(wrap_increment(4, 5), 0);
        assert_eq!(wrap_decrement(0, 5), 4);
        assert_eq!(wrap_increment(0, 0), 0);
    }

    #[test]
    fn stepping_clamps_to_the_list() {
        assert_eq!(step_selection(2, 5, 4), 3);
        assert_eq!(step_selection(2, -5, 4), 0);
        assert_eq!(step_selection(0, 1, 0), 0);
    }
}
