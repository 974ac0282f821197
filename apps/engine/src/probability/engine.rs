//! Game-facing probability queries with a bounded PMF cache.

use std::collections::{HashMap, VecDeque};

use crate::domain::dice::{DieKind, WILD_FACE};
use crate::domain::player_view::TableView;
use crate::probability::pbd::{at_least, exactly, pbd_pmf};

/// Cache capacity. The oldest half is dropped when the cap is hit, so
/// steady-state churn stays cheap.
const CACHE_CAPACITY: usize = 10_000;

/// Keys are the per-die probability vector rounded to 4 decimals. The same
/// kind mix at a given face always lands on the same key, and rounding keeps
/// float noise from fragmenting the cache.
type CacheKey = Vec<u16>;

struct PmfCache {
    entries: HashMap<CacheKey, Vec<f64>>,
    order: VecDeque<CacheKey>,
}

impl PmfCache {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn key(probabilities: &[f64]) -> CacheKey {
        probabilities
            .iter()
            .map(|p| (p.clamp(0.0, 1.0) * 10_000.0).round() as u16)
            .collect()
    }

    fn get_or_compute(&mut self, probabilities: &[f64]) -> &Vec<f64> {
        let key = Self::key(probabilities);
        if !self.entries.contains_key(&key) {
            if self.entries.len() >= CACHE_CAPACITY {
                self.evict_oldest_half();
            }
            self.entries.insert(key.clone(), pbd_pmf(probabilities));
            self.order.push_back(key.clone());
        }
        &self.entries[&key]
    }

    fn evict_oldest_half(&mut self) {
        let drop_count = self.order.len() / 2;
        for _ in 0..drop_count {
            if let Some(old) = self.order.pop_front() {
                self.entries.remove(&old);
            }
        }
    }
}

/// Exact dice-count probabilities over a set of hidden dice.
///
/// Queries mutate the cache, so shared users wrap the engine in a `Mutex`.
pub struct ProbabilityEngine {
    cache: PmfCache,
}

impl ProbabilityEngine {
    pub fn new() -> Self {
        Self {
            cache: PmfCache::new(),
        }
    }

    /// Probability that one hidden die of `kind` counts toward a bid on
    /// `face`: its own face plus the wild face, unless the bid is on wilds.
    pub fn effective_probability(&self, kind: DieKind, face: u8) -> f64 {
        if face == WILD_FACE {
            kind.face_probability(WILD_FACE)
        } else {
            kind.face_probability(face) + kind.face_probability(WILD_FACE)
        }
    }

    /// P(at least `k` of the hidden `kinds` count toward `face`).
    pub fn at_least_over(&mut self, kinds: &[DieKind], face: u8, k: u32) -> f64 {
        let probabilities = self.success_vector(kinds, face);
        let pmf = self.cache.get_or_compute(&probabilities);
        at_least(pmf, k as usize)
    }

    /// P(exactly `k` of the hidden `kinds` count toward `face`).
    pub fn exactly_over(&mut self, kinds: &[DieKind], face: u8, k: u32) -> f64 {
        let probabilities = self.success_vector(kinds, face);
        let pmf = self.cache.get_or_compute(&probabilities);
        exactly(pmf, k as usize)
    }

    /// Probability that a bid of `quantity` on `face` holds, from the
    /// viewer's seat: own matching dice are certain, the remainder must come
    /// from the unknown pool.
    pub fn bid_probability(&mut self, view: &TableView, quantity: u32, face: u8) -> f64 {
        let own = view.own_matching(face) as u32;
        let needed = quantity.saturating_sub(own);
        if needed == 0 {
            return 1.0;
        }
        self.at_least_over(&view.unknown_kinds(), face, needed)
    }

    /// Probability that the table holds exactly `quantity` of `face`, from
    /// the viewer's seat. Zero when own dice already exceed the claim.
    pub fn exact_probability(&mut self, view: &TableView, quantity: u32, face: u8) -> f64 {
        let own = view.own_matching(face) as u32;
        if own > quantity {
            return 0.0;
        }
        self.exactly_over(&view.unknown_kinds(), face, quantity - own)
    }

    fn success_vector(&self, kinds: &[DieKind], face: u8) -> Vec<f64> {
        kinds
            .iter()
            .map(|&k| self.effective_probability(k, face))
            .collect()
    }
}

impl Default for ProbabilityEngine {
    fn default() -> Self {
        Self::new()
    }
}
