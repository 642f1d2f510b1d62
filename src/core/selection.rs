//! Randomized greedy packing of videos into a target duration.
//!
//! Each attempt sorts a private copy of the catalog by duration and keeps
//! drawing a uniformly random video among those that still fit, until the
//! leftover slack drops to `min_remaining` or nothing fits. Several attempts
//! are ranked by leftover slack, smallest first. This trades optimality for
//! speed and for variety between calls; it is not a subset-sum solver.

use crate::domain::model::{Combination, Video};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_MIN_REMAINING: i64 = 60;
pub const DEFAULT_ATTEMPTS: usize = 3;
/// Upper bound on attempts per request unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionParams {
    pub attempts: usize,
    /// Packing stops once the leftover slack is at or below this many seconds.
    /// Combinations with more slack are still returned.
    pub min_remaining: i64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            min_remaining: DEFAULT_MIN_REMAINING,
        }
    }
}

/// Runs one packing attempt. Never overshoots `target`.
///
/// A `target` of zero or less yields an empty combination whose `remaining`
/// equals `target`.
pub fn select_one<R: Rng>(
    items: &[Video],
    target: i64,
    min_remaining: i64,
    rng: &mut R,
) -> Combination {
    if target <= 0 {
        return Combination::empty(target);
    }

    // Stable sort: equal durations keep their input order, which keeps seeded
    // runs reproducible.
    let mut pool: Vec<&Video> = items.iter().collect();
    pool.sort_by_key(|video| video.duration);

    let mut selected = Vec::new();
    let mut total = 0;
    let mut remaining = target;

    while remaining > min_remaining && !pool.is_empty() {
        // The pool stays sorted, so the videos that fit form a prefix.
        let fits = pool.partition_point(|video| video.duration <= remaining);
        if fits == 0 {
            break;
        }

        let video = pool.remove(rng.gen_range(0..fits));
        total += video.duration;
        remaining = target - total;
        selected.push(video.clone());
    }

    Combination {
        items: selected,
        total_duration: total,
        remaining,
    }
}

/// Runs `attempts` independent attempts with the default slack and ranks them
/// by `remaining`, ties in generation order. Zero attempts yields no results.
pub fn select_many<R: Rng>(
    items: &[Video],
    target: i64,
    attempts: usize,
    rng: &mut R,
) -> Vec<Combination> {
    let params = SelectionParams {
        attempts,
        ..SelectionParams::default()
    };
    select_many_with(items, target, &params, rng)
}

pub fn select_many_with<R: Rng>(
    items: &[Video],
    target: i64,
    params: &SelectionParams,
    rng: &mut R,
) -> Vec<Combination> {
    let mut combinations: Vec<Combination> = (0..params.attempts)
        .map(|_| select_one(items, target, params.min_remaining, rng))
        .collect();

    rank(&mut combinations);
    combinations
}

/// Same as [`select_many_with`] but runs every attempt on its own blocking
/// task. Attempt `i` uses a `StdRng` seeded with `seed + i`, and the results
/// are ranked in attempt order, so the output does not depend on which task
/// finishes first.
pub async fn select_many_parallel(
    items: Arc<[Video]>,
    target: i64,
    params: SelectionParams,
    seed: u64,
) -> Vec<Combination> {
    let handles: Vec<_> = (0..params.attempts)
        .map(|attempt| {
            let items = Arc::clone(&items);
            tokio::task::spawn_blocking(move || {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(attempt as u64));
                select_one(&items, target, params.min_remaining, &mut rng)
            })
        })
        .collect();

    let mut combinations = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(combination) => combinations.push(combination),
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    rank(&mut combinations);
    combinations
}

fn rank(combinations: &mut [Combination]) {
    combinations.sort_by_key(|combination| combination.remaining);
}
