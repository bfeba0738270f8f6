use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A track or user id with its score.
///
/// Ordered by rank: an entry is "less" than another when it ranks higher,
/// i.e. it has the larger score, or the same score and the smaller id.
/// That way the root of a `BinaryHeap` is the weakest entry kept so far.
#[derive(Debug, Clone)]
pub struct Scored {
    pub id: String,
    pub score: f64,
}

impl Scored {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self { id: id.into(), score }
    }
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scored {}

/// Keeps the best `k` entries offered to it.
pub(crate) struct TopK {
    heap: BinaryHeap<Scored>,
    k: usize,
}

impl TopK {
    pub(crate) fn new(k: usize, expected: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(k.min(expected)),
            k,
        }
    }

    pub(crate) fn offer(&mut self, entry: Scored) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(entry);
            return;
        }
        if let Some(mut weakest) = self.heap.peek_mut() {
            if entry < *weakest {
                *weakest = entry;
            }
        }
    }

    /// Best entry first.
    pub(crate) fn into_sorted_vec(self) -> Vec<Scored> {
        self.heap.into_sorted_vec()
    }
}
