//! Bounded non-dominated archive with crowding-distance truncation.

use crate::dominance::{self, Dominance};
use crate::solution::{Solution, SolutionSet};

/// Keeps the mutually non-dominated solutions seen so far, at most
/// `capacity` of them.
#[derive(Debug, Clone)]
pub struct CrowdingArchive {
    capacity: usize,
    members: Vec<Solution>,
}

impl CrowdingArchive {
    /// An empty archive holding at most `capacity` (at least one) solutions.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            members: Vec::with_capacity(capacity + 1),
        }
    }

    /// Offer `candidate`; returns whether it was accepted.
    ///
    /// Candidates dominated by or equal to a member are rejected. Members
    /// dominated by an accepted candidate are dropped. On overflow the member
    /// with the smallest crowding distance leaves, which may be the candidate.
    pub fn add(&mut self, candidate: Solution) -> bool {
        let mut dominated = Vec::new();
        for (i, member) in self.members.iter().enumerate() {
            match dominance::compare(member.objectives(), candidate.objectives()) {
                Dominance::Dominates | Dominance::Equal => return false,
                Dominance::DominatedBy => dominated.push(i),
                Dominance::Incomparable => {}
            }
        }
        for i in dominated.into_iter().rev() {
            self.members.remove(i);
        }
        self.members.push(candidate);

        if self.members.len() > self.capacity {
            let last = self.members.len() - 1;
            let evicted = self.most_crowded();
            self.members.remove(evicted);
            return evicted != last;
        }
        true
    }

    fn most_crowded(&self) -> usize {
        let objectives: Vec<Vec<f64>> = self
            .members
            .iter()
            .map(|s| s.objectives().to_vec())
            .collect();
        let distances = dominance::crowding_distance(&objectives);
        distances
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map_or(0, |(i, _)| i)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn members(&self) -> &[Solution] {
        &self.members
    }

    /// Pick the member at `index` modulo the archive size.
    #[must_use]
    pub fn member(&self, index: usize) -> Option<&Solution> {
        if self.members.is_empty() {
            return None;
        }
        self.members.get(index % self.members.len())
    }

    #[must_use]
    pub fn into_solution_set(self) -> SolutionSet {
        SolutionSet::new(self.members)
    }
}
