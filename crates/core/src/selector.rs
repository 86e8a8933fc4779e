//! Builds the initial question set for a quiz from the bank.
//!
//! The bank is passed as a slice in bank order. Randomness is always injected so
//! callers can seed it.

use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;

use crate::model::{IndexRange, Question, Selection, SelectionError, SelectionSpec};

/// Every question with `start <= index <= end`, in bank order.
///
/// # Errors
///
/// Returns `SelectionError::InvalidRange` if `start < 1`, `start > end`, or
/// `end > bank.len()`.
pub fn select_range(
    bank: &[Arc<Question>],
    start: u32,
    end: u32,
) -> Result<Selection, SelectionError> {
    let range = IndexRange::new(start, end).validate(bank.len())?;
    let questions = bank
        .iter()
        .filter(|q| range.contains(q.index()))
        .cloned()
        .collect();
    Ok(Selection::new(SelectionSpec::Range { start, end }, questions))
}

/// `count` distinct questions drawn uniformly from `pool` (or the whole bank).
///
/// The full candidate set is shuffled before truncation so every ordering is
/// equally likely.
///
/// # Errors
///
/// Returns `SelectionError::InvalidRange` for an invalid pool and
/// `SelectionError::InsufficientPool` when `count` exceeds the candidates.
pub fn select_random<R: Rng + ?Sized>(
    bank: &[Arc<Question>],
    count: usize,
    pool: Option<IndexRange>,
    rng: &mut R,
) -> Result<Selection, SelectionError> {
    let mut candidates: Vec<Arc<Question>> = match pool {
        Some(range) => {
            let range = range.validate(bank.len())?;
            bank.iter()
                .filter(|q| range.contains(q.index()))
                .cloned()
                .collect()
        }
        None => bank.to_vec(),
    };

    if count > candidates.len() {
        return Err(SelectionError::InsufficientPool {
            requested: count,
            available: candidates.len(),
        });
    }

    candidates.shuffle(rng);
    candidates.truncate(count);
    tracing::debug!(count, pool = ?pool, "sampled random selection");
    Ok(Selection::new(SelectionSpec::Random { count, pool }, candidates))
}

/// Dispatch on a [`SelectionSpec`].
///
/// # Errors
///
/// See [`select_range`] and [`select_random`].
pub fn select<R: Rng + ?Sized>(
    bank: &[Arc<Question>],
    spec: SelectionSpec,
    rng: &mut R,
) -> Result<Selection, SelectionError> {
    match spec {
        SelectionSpec::Range { start, end } => select_range(bank, start, end),
        SelectionSpec::Random { count, pool } => select_random(bank, count, pool, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionIndex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn bank(size: u32) -> Vec<Arc<Question>> {
        (1..=size)
            .map(|i| {
                Arc::new(
                    Question::new(
                        QuestionIndex::new(i),
                        format!("Q{i}"),
                        vec!["a".into(), "b".into(), "c".into()],
                        "a",
                    )
                    .unwrap(),
                )
            })
            .collect()
    }

    fn values(selection: &Selection) -> Vec<u32> {
        selection.indices().iter().map(QuestionIndex::value).collect()
    }

    #[test]
    fn range_returns_inclusive_slice() {
        let selection = select_range(&bank(5), 1, 3).unwrap();
        assert_eq!(values(&selection), vec![1, 2, 3]);
        assert_eq!(selection.spec(), SelectionSpec::Range { start: 1, end: 3 });
    }

    #[test]
    fn range_rejects_out_of_bounds() {
        let err = select_range(&bank(5), 2, 6).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidRange { end: 6, .. }));
        assert!(select_range(&bank(5), 4, 3).is_err());
        assert!(select_range(&bank(5), 0, 3).is_err());
    }

    #[test]
    fn random_draws_distinct_questions() {
        let mut rng = StdRng::seed_from_u64(7);
        let selection = select_random(&bank(5), 3, None, &mut rng).unwrap();
        let picked: HashSet<u32> = values(&selection).into_iter().collect();
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|i| (1..=5).contains(i)));
    }

    #[test]
    fn random_rejects_oversized_request() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = select_random(&bank(5), 6, None, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SelectionError::InsufficientPool {
                requested: 6,
                available: 5
            }
        );
    }

    #[test]
    fn random_respects_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = IndexRange::new(4, 8);
        let selection = select_random(&bank(10), 5, Some(pool), &mut rng).unwrap();
        let mut picked = values(&selection);
        picked.sort_unstable();
        assert_eq!(picked, vec![4, 5, 6, 7, 8]);

        let err = select_random(&bank(10), 6, Some(pool), &mut rng).unwrap_err();
        assert!(matches!(err, SelectionError::InsufficientPool { available: 5, .. }));
    }

    #[test]
    fn random_is_reproducible_with_same_seed() {
        let questions = bank(20);
        let a = select_random(&questions, 10, None, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = select_random(&questions, 10, None, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(values(&a), values(&b));
    }

    #[test]
    fn random_first_slot_is_roughly_uniform() {
        let questions = bank(4);
        let mut rng = StdRng::seed_from_u64(99);
        let mut hits = [0_u32; 4];
        for _ in 0..4000 {
            let selection = select_random(&questions, 1, None, &mut rng).unwrap();
            let first = selection.indices()[0].value() as usize;
            hits[first - 1] += 1;
        }
        assert!(hits.iter().all(|&h| (800..1200).contains(&h)), "{hits:?}");
    }

    #[test]
    fn select_dispatches_on_spec() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = select(&bank(5), SelectionSpec::Range { start: 2, end: 4 }, &mut rng).unwrap();
        assert_eq!(values(&range), vec![2, 3, 4]);

        let random = select(
            &bank(5),
            SelectionSpec::Random {
                count: 2,
                pool: None,
            },
            &mut rng,
        )
        .unwrap();
        assert_eq!(random.len(), 2);
    }
}
