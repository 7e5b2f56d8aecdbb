use thiserror::Error;

/// A fixed-capacity ring of state snapshots indexed by generation.
///
/// Generation 0 is the current snapshot, generation 1 the previous one, and
/// so on up to `depth - 1`.
/// Slots are allocated once; rotation only moves the head index and copies
/// the current snapshot into the slot that becomes current, so no reference
/// into the history survives a rotation pointing at the wrong generation.
#[derive(Debug, Clone)]
pub struct StepHistory<S> {
    slots: Vec<S>,
    head: usize,
}

/// Error returned when constructing an invalid [`StepHistory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("history must hold at least two generations, got {0}")]
    TooShallow(usize),
}

impl<S: Clone> StepHistory<S> {
    /// The smallest supported depth: a current and a previous generation.
    pub const MIN_DEPTH: usize = 2;

    /// Creates a history of `depth` generations, all equal to `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::TooShallow`] if `depth` is less than
    /// [`StepHistory::MIN_DEPTH`].
    pub fn new(initial: S, depth: usize) -> Result<Self, HistoryError> {
        if depth < Self::MIN_DEPTH {
            return Err(HistoryError::TooShallow(depth));
        }
        Ok(Self {
            slots: vec![initial; depth],
            head: 0,
        })
    }

    /// Creates a history holding only a current and a previous generation.
    pub(crate) fn with_min_depth(initial: S) -> Self {
        Self {
            slots: vec![initial; Self::MIN_DEPTH],
            head: 0,
        }
    }

    /// Advances the ring by one generation.
    ///
    /// The oldest slot becomes the current generation and starts out as a
    /// copy of the snapshot that was current before the rotation.
    pub fn rotate(&mut self) {
        let previous = self.head;
        self.head = (self.head + 1) % self.slots.len();
        let (dst, src) = pick_two(&mut self.slots, self.head, previous);
        dst.clone_from(src);
    }

    /// Overwrites every older generation with the current one.
    ///
    /// After a discrete transition the current snapshot becomes the only
    /// valid baseline; older generations describe a trajectory that no longer
    /// exists.
    pub fn rebaseline(&mut self) {
        let head = self.head;
        for age in 1..self.slots.len() {
            let index = self.index_of(age);
            let (dst, src) = pick_two(&mut self.slots, index, head);
            dst.clone_from(src);
        }
    }
}

impl<S> StepHistory<S> {
    #[must_use]
    pub fn depth(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn current(&self) -> &S {
        &self.slots[self.head]
    }

    pub fn current_mut(&mut self) -> &mut S {
        &mut self.slots[self.head]
    }

    #[must_use]
    pub fn previous(&self) -> &S {
        &self.slots[self.index_of(1)]
    }

    /// Returns the snapshot `age` generations back, or `None` past the depth.
    #[must_use]
    pub fn generation(&self, age: usize) -> Option<&S> {
        (age < self.slots.len()).then(|| &self.slots[self.index_of(age)])
    }

    /// Iterates from the current generation to the oldest.
    pub fn iter(&self) -> impl Iterator<Item = &S> {
        (0..self.slots.len()).map(|age| &self.slots[self.index_of(age)])
    }

    fn index_of(&self, age: usize) -> usize {
        let len = self.slots.len();
        (self.head + len - age % len) % len
    }
}

/// Borrows one slot mutably and another immutably.
fn pick_two<S>(slots: &mut [S], dst: usize, src: usize) -> (&mut S, &S) {
    debug_assert_ne!(dst, src);
    if dst < src {
        let (lo, hi) = slots.split_at_mut(src);
        (&mut lo[dst], &hi[0])
    } else {
        let (lo, hi) = slots.split_at_mut(dst);
        (&mut hi[0], &lo[src])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_below_two_is_rejected() {
        assert_eq!(
            StepHistory::new(0, 1).unwrap_err(),
            HistoryError::TooShallow(1)
        );
    }

    #[test]
    fn rotation_copies_current_forward() {
        let mut history = StepHistory::new(1, 3).unwrap();
        *history.current_mut() = 5;

        history.rotate();

        assert_eq!(*history.current(), 5);
        assert_eq!(*history.previous(), 5);

        *history.current_mut() = 7;
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![7, 5, 1]);
    }

    #[test]
    fn oldest_generation_is_reused() {
        let mut history = StepHistory::new(0, 2).unwrap();
        for value in 1..=4 {
            history.rotate();
            *history.current_mut() = value;
        }

        assert_eq!(*history.current(), 4);
        assert_eq!(*history.previous(), 3);
        assert_eq!(history.generation(2), None);
    }

    #[test]
    fn rebaseline_discards_older_generations() {
        let mut history = StepHistory::new(0, 3).unwrap();
        history.rotate();
        *history.current_mut() = 1;
        history.rotate();
        *history.current_mut() = 2;

        history.rebaseline();

        assert!(history.iter().all(|&value| value == 2));
    }
}
