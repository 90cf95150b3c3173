//! Majority voting with a deterministic tie-break.

/// Counts label votes in the order they are cast.
///
/// Labels keep the position of their first vote. When several labels share
/// the highest count, the one that was voted for first wins, so the result
/// only depends on the order of the votes and never on hashing.
#[derive(Debug, Clone, PartialEq)]
pub struct Tally<'a, L> {
    counts: Vec<(&'a L, usize)>,
    total: usize,
}

impl<L> Default for Tally<'_, L> {
    fn default() -> Self {
        Self {
            counts: Vec::new(),
            total: 0,
        }
    }
}

impl<'a, L: PartialEq> Tally<'a, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one vote for `label`.
    pub fn vote(&mut self, label: &'a L) {
        self.total += 1;
        // Keeps first-vote order.
        match self.counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((label, 1)),
        }
    }

    /// Total number of votes cast.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Per-label counts in first-vote order.
    pub fn counts(&self) -> &[(&'a L, usize)] {
        &self.counts
    }

    /// The winning label and its vote count, or `None` if nobody voted.
    pub fn winner(&self) -> Option<(&'a L, usize)> {
        let mut best: Option<(&'a L, usize)> = None;
        for &(label, count) in &self.counts {
            // Strictly greater: an equal count never displaces an earlier label.
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best
    }
}

impl<'a, L: PartialEq> FromIterator<&'a L> for Tally<'a, L> {
    fn from_iter<I: IntoIterator<Item = &'a L>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for label in iter {
            tally.vote(label);
        }
        tally
    }
}
