//! Route choice models.

use mm_core::SimRng;
use mm_routing::Path;

use crate::traveler::Traveler;

/// Picks one path among the k-shortest candidates computed for a traveler.
///
/// `candidate_count` tells the supervisor how many alternatives to request;
/// `choose` returns an index into the candidate slice, or `None` to abstain
/// (the traveler becomes unservable).  Choices draw randomness exclusively
/// from the run's `SimRng`, keeping runs reproducible per seed.
pub trait DecisionModel: Send + Sync {
    fn candidate_count(&self) -> usize;

    fn choose(&self, traveler: &Traveler, candidates: &[Path], rng: &mut SimRng) -> Option<usize>;
}

/// Deterministic all-or-nothing assignment onto the single shortest path.
#[derive(Debug, Default)]
pub struct ShortestPathDecision;

impl DecisionModel for ShortestPathDecision {
    fn candidate_count(&self) -> usize {
        1
    }

    fn choose(&self, _traveler: &Traveler, candidates: &[Path], _rng: &mut SimRng) -> Option<usize> {
        if candidates.is_empty() { None } else { Some(0) }
    }
}

/// Multinomial logit over path costs: candidate `i` is chosen with
/// probability proportional to `exp(-theta * cost_i)`.  Larger `theta`
/// concentrates choices on the cheapest path; `theta = 0` is uniform.
#[derive(Debug)]
pub struct LogitDecision {
    pub theta:      f64,
    pub candidates: usize,
}

impl LogitDecision {
    pub fn new(theta: f64, candidates: usize) -> Self {
        Self { theta, candidates: candidates.max(1) }
    }
}

impl DecisionModel for LogitDecision {
    fn candidate_count(&self) -> usize {
        self.candidates
    }

    fn choose(&self, _traveler: &Traveler, candidates: &[Path], rng: &mut SimRng) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        // Shift by the minimum cost so the exponentials stay well scaled.
        let min_cost = candidates.iter().map(|p| p.cost).fold(f64::INFINITY, f64::min);
        let weights: Vec<f64> =
            candidates.iter().map(|p| (-self.theta * (p.cost - min_cost)).exp()).collect();
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            return Some(0);
        }

        let mut draw = rng.gen_range(0.0..total);
        for (i, w) in weights.iter().enumerate() {
            if draw < *w {
                return Some(i);
            }
            draw -= w;
        }
        Some(candidates.len() - 1)
    }
}
