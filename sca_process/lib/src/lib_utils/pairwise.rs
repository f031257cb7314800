/*
    Needleman-Wunsch alignment of two ungapped sequences
        match 2, mismatch -1, gap -2
        end gaps are free so a structure fragment can sit inside a full-length family member
    Used to locate the reference in the alignment and to carry its numbering onto columns
*/


const MATCH: i32 = 2;
const MISMATCH: i32 = -1;
const GAP_PENALTY: i32 = -2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairwiseAlignment {
    /// Aligned residue pairs (index in first sequence, index in second), increasing
    pub pairs: Vec<(usize, usize)>,
    /// Aligned pairs carrying the same residue
    pub identical: usize,
    pub score: i32,
}

#[derive(Clone, Copy, PartialEq)]
enum Step {
    Diagonal,
    Up,
    Left,
}

pub fn global_align(first: &[u8], second: &[u8]) -> PairwiseAlignment {
    let (n, m) = (first.len(), second.len());
    if n == 0 || m == 0 {
        return PairwiseAlignment::default();
    }
    let cols = m + 1;
    let mut score = vec![0i32; (n + 1) * cols];
    let mut trace = vec![Step::Diagonal; (n + 1) * cols];
    for i in 1..=n {
        for j in 1..=m {
            let substitution = if first[i - 1].eq_ignore_ascii_case(&second[j - 1]) { MATCH } else { MISMATCH };
            let diagonal = score[(i - 1) * cols + j - 1] + substitution;
            let up = score[(i - 1) * cols + j] + GAP_PENALTY;
            let left = score[i * cols + j - 1] + GAP_PENALTY;
            let (best, step) = if diagonal >= up && diagonal >= left {
                (diagonal, Step::Diagonal)
            } else if up >= left {
                (up, Step::Up)
            } else {
                (left, Step::Left)
            };
            score[i * cols + j] = best;
            trace[i * cols + j] = step;
        }
    }

    // free trailing gaps: best cell on the last row or last column
    let mut end = (n, m);
    for j in 0..=m {
        if score[n * cols + j] > score[end.0 * cols + end.1] {
            end = (n, j);
        }
    }
    for i in 0..=n {
        if score[i * cols + m] > score[end.0 * cols + end.1] {
            end = (i, m);
        }
    }

    let best_score = score[end.0 * cols + end.1];
    let (mut i, mut j) = end;
    let mut pairs = Vec::new();
    let mut identical = 0;
    while i > 0 && j > 0 {
        match trace[i * cols + j] {
            Step::Diagonal => {
                pairs.push((i - 1, j - 1));
                if first[i - 1].eq_ignore_ascii_case(&second[j - 1]) {
                    identical += 1;
                }
                i -= 1;
                j -= 1;
            }
            Step::Up => i -= 1,
            Step::Left => j -= 1,
        }
    }
    pairs.reverse();
    PairwiseAlignment { pairs, identical, score: best_score }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sequences_align_on_diagonal() {
        let result = global_align(b"ACDEFG", b"ACDEFG");
        assert_eq!(result.pairs, (0..6).map(|i| (i, i)).collect::<Vec<_>>());
        assert_eq!(result.identical, 6);
        assert_eq!(result.score, 12);
    }

    #[test]
    fn test_fragment_placed_inside() {
        let result = global_align(b"MKTAYIAKQRQISFVKSHFSRQ", b"IAKQRQIS");
        assert_eq!(result.identical, 8);
        assert_eq!(result.pairs.first(), Some(&(5, 0)));
        assert_eq!(result.pairs.last(), Some(&(12, 7)));
    }

    #[test]
    fn test_internal_deletion() {
        let result = global_align(b"ACDEFGHIKL", b"ACDEGHIKL");
        assert_eq!(result.identical, 9);
        assert!(result.pairs.contains(&(5, 4)));
        assert!(!result.pairs.iter().any(|&(a, _)| a == 4));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(global_align(b"", b"ACD"), PairwiseAlignment::default());
    }
}
