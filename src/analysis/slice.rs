//! Bounded head/tail/range views over ordered element lists.

use serde::{Deserialize, Serialize};

/// A navigation bound. Only one bound applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slice {
    /// The first `n` items.
    Head(usize),
    /// The last `n` items.
    Tail(usize),
    /// 1-indexed inclusive positions `start..=end`.
    Range(usize, usize),
}

/// Apply an optional bound to `items`.
///
/// Out-of-range bounds are clipped. `Range` treats a start of 0 as 1 and
/// returns nothing when the start lies past the end or past the input.
pub fn slice<T: Clone>(items: &[T], bound: Option<Slice>) -> Vec<T> {
    let len = items.len();
    match bound {
        None => items.to_vec(),
        Some(Slice::Head(n)) => items[..n.min(len)].to_vec(),
        Some(Slice::Tail(n)) => items[len - n.min(len)..].to_vec(),
        Some(Slice::Range(start, end)) => {
            let start = start.max(1);
            if start > end || start > len {
                return Vec::new();
            }
            items[start - 1..end.min(len)].to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<u32> {
        (1..=10).collect()
    }

    #[test]
    fn test_no_bound_is_identity() {
        assert_eq!(slice(&items(), None), items());
    }

    #[test]
    fn test_head() {
        assert_eq!(slice(&items(), Some(Slice::Head(3))), [1, 2, 3]);
        assert_eq!(slice(&items(), Some(Slice::Head(50))), items());
        assert!(slice(&items(), Some(Slice::Head(0))).is_empty());
    }

    #[test]
    fn test_tail() {
        assert_eq!(slice(&items(), Some(Slice::Tail(2))), [9, 10]);
        assert_eq!(slice(&items(), Some(Slice::Tail(50))), items());
        assert!(slice(&items(), Some(Slice::Tail(0))).is_empty());
    }

    #[test]
    fn test_range_is_one_indexed_inclusive() {
        assert_eq!(slice(&items(), Some(Slice::Range(2, 4))), [2, 3, 4]);
        assert_eq!(slice(&items(), Some(Slice::Range(5, 5))), [5]);
    }

    #[test]
    fn test_range_clips() {
        assert_eq!(slice(&items(), Some(Slice::Range(8, 99))), [8, 9, 10]);
        assert_eq!(slice(&items(), Some(Slice::Range(0, 2))), [1, 2]);
        assert!(slice(&items(), Some(Slice::Range(11, 20))).is_empty());
        assert!(slice(&items(), Some(Slice::Range(5, 3))).is_empty());
    }

    #[test]
    fn test_empty_input() {
        let empty: Vec<u32> = Vec::new();
        for bound in [
            None,
            Some(Slice::Head(5)),
            Some(Slice::Tail(5)),
            Some(Slice::Range(1, 5)),
        ] {
            assert!(slice(&empty, bound).is_empty());
        }
    }
}
