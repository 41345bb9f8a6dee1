/// Bucket sort in place
///
/// Values are spread over `max(1, floor(sqrt(n)))` buckets by their position
/// in the `[min, max]` range, each bucket is insertion-sorted, and the buckets
/// are concatenated back into `values`. Empty input and all-equal input are
/// returned untouched.
pub fn bucket_sort(values: &mut [i32]) {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return;
    };
    if min == max {
        return;
    }

    let bucket_count = ((values.len() as f64).sqrt() as usize).max(1);
    let span = (max as i64 - min as i64) as f64;
    let mut buckets: Vec<Vec<i32>> = vec![Vec::new(); bucket_count];

    for &value in values.iter() {
        let normalized = (value as i64 - min as i64) as f64 / span;
        let idx = ((normalized * bucket_count as f64) as usize).min(bucket_count - 1);
        buckets[idx].push(value);
    }

    let mut out = 0;
    for bucket in &mut buckets {
        insertion_sort(bucket);
        values[out..out + bucket.len()].copy_from_slice(bucket);
        out += bucket.len();
    }
}

#[inline]
fn insertion_sort(bucket: &mut [i32]) {
    for i in 1..bucket.len() {
        let key = bucket[i];
        let mut j = i;
        while j > 0 && bucket[j - 1] > key {
            bucket[j] = bucket[j - 1];
            j -= 1;
        }
        bucket[j] = key;
    }
}

/// Check if a slice is sorted in ascending order.
#[inline]
pub fn is_sorted(values: &[i32]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}
