// src/selection.rs

use rand::prelude::*;
use std::path::PathBuf;

/// Chooses one candidate uniformly at random. Returns `None` for an empty
/// slice. Generic over the RNG so tests can use a seeded `StdRng`.
pub fn choose_video<'a, R: Rng + ?Sized>(
    candidates: &'a [PathBuf],
    rng: &mut R,
) -> Option<&'a PathBuf> {
    candidates.choose(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_slice_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(choose_video(&[], &mut rng).is_none());
    }

    #[test]
    fn test_single_candidate_is_always_chosen() {
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = vec![PathBuf::from("only.mp4")];
        for _ in 0..10 {
            assert_eq!(choose_video(&candidates, &mut rng), Some(&candidates[0]));
        }
    }

    #[test]
    fn test_selection_is_roughly_uniform() {
        let candidates = vec![
            PathBuf::from("a.mp4"),
            PathBuf::from("b.webm"),
            PathBuf::from("c.mp4"),
        ];
        let mut rng = StdRng::seed_from_u64(42);
        let draws = 3000;

        let mut counts: HashMap<&PathBuf, usize> = HashMap::new();
        for _ in 0..draws {
            let picked = choose_video(&candidates, &mut rng).unwrap();
            *counts.entry(picked).or_insert(0) += 1;
        }

        // Expected frequency is draws / 3 = 1000; allow a generous band.
        for candidate in &candidates {
            let count = counts.get(candidate).copied().unwrap_or(0);
            assert!(
                (800..=1200).contains(&count),
                "candidate {} drawn {} times out of {}",
                candidate.display(),
                count,
                draws
            );
        }
    }
}
