/*
    Weighted random selection of sequences
        protected indices are always part of the selection
        remaining picks drawn without replacement, probability proportional to weight
        seeded so the same inputs give the same subset
*/


use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use log::{debug, info};
use super::errors::{ScaError, ScaResult};

pub fn rand_sel(weights: &[f64], target: usize, protected: &[usize], seed: u64) -> ScaResult<Vec<usize>> {
    let n = weights.len();
    let mut selection: Vec<usize> = Vec::with_capacity(target.min(n));
    for &idx in protected {
        if idx >= n {
            return Err(ScaError::input(format!(
                "protected index {} out of range for {} sequences", idx, n
            )));
        }
        if !selection.contains(&idx) {
            selection.push(idx);
        }
    }
    if target < selection.len() {
        return Err(ScaError::input(format!(
            "cannot select {} sequences while protecting {}", target, selection.len()
        )));
    }
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ScaError::input(format!("invalid sequence weight {}", w)));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut remaining: Vec<usize> = (0..n).filter(|i| !selection.contains(i)).collect();
    let goal = target.min(n);
    while selection.len() < goal {
        let total: f64 = remaining.iter().map(|&i| weights[i]).sum();
        let pick = if total > 0.0 {
            let mut threshold = rng.gen::<f64>() * total;
            let mut chosen = remaining.len() - 1;
            for (pos, &i) in remaining.iter().enumerate() {
                if threshold < weights[i] {
                    chosen = pos;
                    break;
                }
                threshold -= weights[i];
            }
            chosen
        } else {
            rng.gen_range(0..remaining.len())
        };
        selection.push(remaining.remove(pick));
    }
    selection.sort_unstable();
    debug!("Selected indices: {:?}", selection);
    info!("Selected {} of {} sequences", selection.len(), n);
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_always_kept() {
        let weights = vec![1.0; 50];
        for seed in 0..20 {
            let sel = rand_sel(&weights, 5, &[42], seed).unwrap();
            assert!(sel.contains(&42));
            assert_eq!(sel.len(), 5);
        }
    }

    #[test]
    fn test_never_exceeds_request() {
        let sel = rand_sel(&[0.5, 0.5, 1.0], 10, &[0], 0).unwrap();
        assert_eq!(sel, vec![0, 1, 2]);
    }

    #[test]
    fn test_seeded_selection_is_reproducible() {
        let weights: Vec<f64> = (1..=30).map(|w| w as f64).collect();
        let a = rand_sel(&weights, 10, &[3], 7).unwrap();
        let b = rand_sel(&weights, 10, &[3], 7).unwrap();
        assert_eq!(a, b);
        assert!(a.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_weights_skipped_while_weight_remains() {
        let sel = rand_sel(&[0.0, 1.0, 0.0, 1.0], 2, &[], 0).unwrap();
        assert_eq!(sel, vec![1, 3]);
    }

    #[test]
    fn test_target_below_protected_is_error() {
        assert!(rand_sel(&[1.0, 1.0], 0, &[1], 0).is_err());
        assert!(rand_sel(&[1.0, 1.0], 1, &[5], 0).is_err());
    }
}
