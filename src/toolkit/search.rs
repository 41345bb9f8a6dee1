use serde::{Deserialize, Serialize};

/// A record with an integer search key
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for i64 {
    fn key(&self) -> i64 {
        *self
    }
}

/// A station on a line; stations after the first fault are faulty too
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub faulty: bool,
}

impl Keyed for Station {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Result of a search: the index found (if any) and how many elements were probed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOutcome {
    pub index: Option<usize>,
    pub probes: usize,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        self.index.is_some()
    }
}

/// Interpolation search over records sorted by key (ascending)
///
/// Estimates the probe position from the key range of the current window
/// instead of halving it, which takes O(log log n) probes on uniformly spread
/// keys and degrades towards O(n) on skewed ones. With duplicate keys any
/// matching index may be returned.
pub fn interpolation_search<T: Keyed>(records: &[T], target: i64) -> SearchOutcome {
    let mut probes = 0;
    if records.is_empty() {
        return SearchOutcome { index: None, probes };
    }

    let mut low = 0usize;
    let mut high = records.len() - 1;

    while low <= high {
        let low_key = records[low].key();
        let high_key = records[high].key();
        if target < low_key || target > high_key {
            break;
        }

        let pos = if high_key == low_key {
            low
        } else {
            // i128 keeps the product clear of overflow for any i64 keys
            let offset = (target as i128 - low_key as i128) * (high - low) as i128
                / (high_key as i128 - low_key as i128);
            low + offset as usize
        };

        probes += 1;
        let key = records[pos].key();
        if key == target {
            return SearchOutcome {
                index: Some(pos),
                probes,
            };
        }

        if key < target {
            low = pos + 1;
        } else if pos == 0 {
            break;
        } else {
            high = pos - 1;
        }
    }

    SearchOutcome { index: None, probes }
}

/// Binary search for the first element satisfying a monotone predicate
///
/// `is_faulty` must be `false` for a (possibly empty) prefix and `true` for
/// the rest. Returns `None` when no element is faulty.
pub fn first_faulty_binary<T, F>(items: &[T], is_faulty: F) -> SearchOutcome
where
    F: Fn(&T) -> bool,
{
    let mut low = 0usize;
    let mut high = items.len();
    let mut probes = 0;

    while low < high {
        let mid = low + (high - low) / 2;
        probes += 1;
        if is_faulty(&items[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    SearchOutcome {
        index: (low < items.len()).then_some(low),
        probes,
    }
}

/// Linear scan for the first element satisfying `is_faulty`
pub fn first_faulty_linear<T, F>(items: &[T], is_faulty: F) -> SearchOutcome
where
    F: Fn(&T) -> bool,
{
    let mut probes = 0;
    for (i, item) in items.iter().enumerate() {
        probes += 1;
        if is_faulty(item) {
            return SearchOutcome {
                index: Some(i),
                probes,
            };
        }
    }
    SearchOutcome { index: None, probes }
}
