use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::exchange::{Assignment, ExchangeError, Participant};
use crate::observability::exchange_metrics;

/// Draws who-gives-to-whom by rejection sampling: shuffle the slots uniformly
/// and keep the first shuffle that leaves nobody in their own slot.
///
/// Fixed points are judged by slot index, never by name or e-mail, so two
/// participants with identical details are still distinct people.
///
/// Callers are expected to supply at least three participants. Two always
/// resolve to the swap, one can never succeed and ends in
/// [`ExchangeError::AssignmentExhausted`], and an empty list yields no
/// assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentGenerator {
    max_attempts: u32,
}

impl Default for AssignmentGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

impl AssignmentGenerator {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub fn generate(&self, participants: &[Participant]) -> Result<Vec<Assignment>, ExchangeError> {
        self.generate_with_rng(participants, &mut rand::rng())
    }

    /// Givers keep the order of `participants`; receiver `k` is the
    /// participant whose slot the derangement puts at `k`.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        rng: &mut R,
    ) -> Result<Vec<Assignment>, ExchangeError> {
        let slots = self.derangement(participants.len(), rng)?;

        Ok(participants
            .iter()
            .zip(slots)
            .map(|(giver, slot)| Assignment {
                giver: giver.clone(),
                receiver: participants[slot].clone(),
            })
            .collect())
    }

    /// Returns a permutation of `0..len` with no `perm[k] == k`.
    pub fn derangement<R: Rng + ?Sized>(
        &self,
        len: usize,
        rng: &mut R,
    ) -> Result<Vec<usize>, ExchangeError> {
        let mut slots: Vec<usize> = (0..len).collect();

        for attempt in 1..=self.max_attempts {
            slots.shuffle(rng);
            exchange_metrics().record_shuffle();

            if !has_fixed_point(&slots) {
                debug!(participants = len, attempt, "Found derangement");
                return Ok(slots);
            }
        }

        warn!(
            participants = len,
            max_attempts = self.max_attempts,
            "Gave up looking for a derangement"
        );
        Err(ExchangeError::AssignmentExhausted {
            attempts: self.max_attempts,
        })
    }
}

fn has_fixed_point(slots: &[usize]) -> bool {
    slots.iter().enumerate().any(|(k, &slot)| k == slot)
}
