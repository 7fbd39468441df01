//! Reference arc-consistency propagator
//!
//! Every active cell keeps a bitset domain over model tiles. Narrowing a
//! domain queues the cell, and the queue is drained by intersecting each
//! neighbour's domain with the union of tiles the narrowed cell still
//! supports in that direction. Observation picks the undecided cell with the
//! lowest entropy (ties broken by a little seeded noise) and a tile weighted by
//! model frequency.

use crate::algorithm::bitset::TileBitset;
use crate::algorithm::recovery::Selection;
use crate::algorithm::selection::{RandomSelector, RandomState};
use crate::algorithm::solver::{CellValue, Resolution, Solver, SolverOptions};
use crate::math::probability::shannon_entropy;
use crate::model::TileModel;
use crate::spatial::rotation::Direction;
use crate::spatial::topology::MaskedTopology;
use std::collections::{BTreeSet, VecDeque};

// Keeps entropy ties from always resolving to the lowest cell index
const ENTROPY_NOISE: f64 = 1e-6;

/// Domains saved before a choice so it can be undone
#[derive(Clone, Debug)]
struct Decision {
    domains: Vec<TileBitset>,
    cell: usize,
    tile: usize,
}

/// Bitset-domain propagator with optional chronological backtracking
#[derive(Clone, Debug)]
pub struct WavePropagator<'m> {
    model: &'m TileModel,
    topology: MaskedTopology,
    domains: Vec<TileBitset>,
    status: Resolution,
    selector: RandomSelector,
    backtrack: bool,
    trail: Vec<Decision>,
    backtracks: usize,
    tracker: Option<BTreeSet<usize>>,
    last_observation: Option<Selection>,
}

impl WavePropagator<'_> {
    fn domain_mut(&mut self, cell: usize) -> Option<&mut TileBitset> {
        if !self.topology.contains(cell) {
            return None;
        }
        self.domains.get_mut(cell)
    }

    fn record_change(&mut self, cell: usize) {
        if let Some(tracker) = &mut self.tracker {
            tracker.insert(cell);
        }
    }

    /// Replace a cell's domain with its intersection, returning whether it shrank
    fn restrict(&mut self, cell: usize, allowed: &TileBitset) -> bool {
        let Some(domain) = self.domain_mut(cell) else {
            return false;
        };
        let before = domain.count();
        domain.intersect_with(allowed);
        let changed = domain.count() != before;
        if changed {
            self.record_change(cell);
        }
        changed
    }

    /// Drain the propagation queue; false when some domain empties
    fn propagate(&mut self, mut queue: VecDeque<usize>) -> bool {
        let model = self.model;
        let rules = model.rules();
        let direction_count = self.topology.direction_count();

        while let Some(cell) = queue.pop_front() {
            let Some(domain) = self.domains.get(cell) else {
                continue;
            };
            if domain.is_empty() {
                return false;
            }
            let domain = domain.clone();

            for d in 0..direction_count {
                let direction = Direction(d as u8);
                let Some(neighbor) = self.topology.neighbor(cell, direction) else {
                    continue;
                };

                let mut support = TileBitset::new(model.tile_count());
                for tile in domain.iter() {
                    if let Some(allowed) = rules.allowed(direction, tile) {
                        support.union_with(allowed);
                    }
                }

                if self.restrict(neighbor, &support) {
                    if self.domains.get(neighbor).is_none_or(TileBitset::is_empty) {
                        return false;
                    }
                    queue.push_back(neighbor);
                }
            }
        }
        true
    }

    fn all_decided(&self) -> bool {
        self.topology
            .active_cells()
            .all(|cell| self.domains.get(cell).is_some_and(|d| d.count() == 1))
    }

    fn settle(&mut self, consistent: bool) -> Resolution {
        self.status = if !consistent {
            Resolution::Contradiction
        } else if self.all_decided() {
            Resolution::Decided
        } else {
            Resolution::Undecided
        };
        self.status
    }

    /// Undecided cell with the lowest noisy entropy
    fn observe_cell(&mut self) -> Option<usize> {
        let mut best: Option<(f64, usize)> = None;
        let active: Vec<usize> = self.topology.active_cells().collect();
        for cell in active {
            let Some(domain) = self.domains.get(cell) else {
                continue;
            };
            if domain.count() <= 1 {
                continue;
            }
            let entropy = shannon_entropy(domain.iter().map(|tile| self.model.frequency(tile)));
            let score = ENTROPY_NOISE.mul_add(self.selector.unit(), entropy);
            if best.is_none_or(|(lowest, _)| score < lowest) {
                best = Some((score, cell));
            }
        }
        best.map(|(_, cell)| cell)
    }

    fn choose_tile(&mut self, cell: usize) -> Option<usize> {
        let candidates = self.domains.get(cell)?.to_vec();
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&tile| self.model.frequency(tile))
            .collect();
        candidates
            .get(self.selector.weighted_choice(&weights))
            .copied()
    }

    /// Undo choices until one alternative survives propagation
    fn backtrack_from_contradiction(&mut self) -> bool {
        while let Some(decision) = self.trail.pop() {
            self.backtracks += 1;
            self.domains = decision.domains;
            self.record_change(decision.cell);

            let removed = self
                .domain_mut(decision.cell)
                .is_some_and(|domain| domain.remove(decision.tile) && !domain.is_empty());
            if !removed {
                continue;
            }

            // A failure here means the earlier state had no solution either
            if self.propagate(VecDeque::from([decision.cell])) {
                return true;
            }
        }
        false
    }
}

impl<'m> Solver<'m> for WavePropagator<'m> {
    fn create(model: &'m TileModel, topology: &MaskedTopology, options: &SolverOptions) -> Self {
        let tile_count = model.tile_count();
        let domains = (0..topology.cell_count())
            .map(|cell| {
                if topology.contains(cell) {
                    TileBitset::all(tile_count)
                } else {
                    TileBitset::new(tile_count)
                }
            })
            .collect();

        let mut propagator = Self {
            model,
            topology: topology.clone(),
            domains,
            status: Resolution::Undecided,
            selector: RandomSelector::new(options.seed),
            backtrack: options.backtrack,
            trail: Vec::new(),
            backtracks: 0,
            tracker: None,
            last_observation: None,
        };
        let queue = propagator.topology.active_cells().collect();
        let consistent = propagator.propagate(queue);
        propagator.settle(consistent);
        propagator
    }

    fn tile_count(&self) -> usize {
        self.model.tile_count()
    }

    fn select(&mut self, cell: usize, tiles: &TileBitset) -> Resolution {
        if self.status == Resolution::Contradiction {
            return self.status;
        }
        if !self.restrict(cell, tiles) {
            return self.status;
        }
        let consistent = self.domains.get(cell).is_some_and(|d| !d.is_empty())
            && self.propagate(VecDeque::from([cell]));
        self.settle(consistent)
    }

    fn ban(&mut self, cell: usize, tiles: &TileBitset) -> Resolution {
        let Some(domain) = self.domains.get(cell) else {
            return self.status;
        };
        let mut allowed = TileBitset::all(domain.capacity());
        for tile in tiles.iter() {
            allowed.remove(tile);
        }
        self.select(cell, &allowed)
    }

    fn step(&mut self) -> Resolution {
        if self.status != Resolution::Undecided {
            return self.status;
        }
        let Some(cell) = self.observe_cell() else {
            return self.settle(true);
        };
        let Some(tile) = self.choose_tile(cell) else {
            return self.settle(false);
        };

        self.last_observation = Some(Selection { cell, tile });
        if self.backtrack {
            self.trail.push(Decision {
                domains: self.domains.clone(),
                cell,
                tile,
            });
        }

        let chosen = TileBitset::single(self.model.tile_count(), tile);
        self.restrict(cell, &chosen);
        let mut consistent = self.propagate(VecDeque::from([cell]));
        if !consistent && self.backtrack {
            consistent = self.backtrack_from_contradiction();
        }
        self.settle(consistent)
    }

    fn status(&self) -> Resolution {
        self.status
    }

    fn to_value_array(&self) -> Vec<CellValue> {
        self.domains
            .iter()
            .enumerate()
            .map(|(cell, domain)| {
                if !self.topology.contains(cell) {
                    return CellValue::Masked;
                }
                match domain.count() {
                    0 => CellValue::Contradiction,
                    1 => domain.only().map_or(CellValue::Contradiction, CellValue::Decided),
                    _ => CellValue::Undecided,
                }
            })
            .collect()
    }

    fn create_change_tracker(&mut self) {
        self.tracker = Some(BTreeSet::new());
    }

    fn drain_changed_indices(&mut self) -> Vec<usize> {
        self.tracker
            .as_mut()
            .map(|tracker| std::mem::take(tracker).into_iter().collect())
            .unwrap_or_default()
    }

    fn possible_tiles(&self, cell: usize) -> Option<&TileBitset> {
        if !self.topology.contains(cell) {
            return None;
        }
        self.domains.get(cell)
    }

    fn progress(&self) -> f64 {
        let active = self.topology.active_count();
        if active == 0 {
            return 1.0;
        }
        let decided = self
            .topology
            .active_cells()
            .filter(|&cell| self.domains.get(cell).is_some_and(|d| d.count() == 1))
            .count();
        decided as f64 / active as f64
    }

    fn random_state(&self) -> RandomState {
        self.selector.state()
    }

    fn goto_random_state(&mut self, state: &RandomState) {
        self.selector.restore(state);
    }

    fn force_contradiction(&mut self) {
        self.status = Resolution::Contradiction;
    }

    fn backtrack_count(&self) -> usize {
        self.backtracks
    }

    fn last_observation(&self) -> Option<Selection> {
        self.last_observation
    }
}
