//! In-place hybrid sort for slot values.
//!
//! Inputs that already consist of a handful of ascending or descending runs
//! are merged bottom-up. Everything else goes to a dual-pivot quicksort that
//! hands small partitions to insertion sort. Comparisons use the natural
//! `PartialOrd` of the slot type; NaN leaves the order unspecified but never
//! panics or loses values.

use crate::array::slot::Slot;
use smallvec::SmallVec;

/// Maximum number of runs before the input is treated as unstructured
const MAX_RUN_COUNT: usize = 67;

/// Maximum length of a run of equal values
const MAX_RUN_LENGTH: usize = 33;

/// Below this length quicksort is used without run detection
const QUICKSORT_THRESHOLD: usize = 286;

/// Below this length insertion sort is used
const INSERTION_SORT_THRESHOLD: usize = 47;

type Runs = SmallVec<[usize; MAX_RUN_COUNT + 1]>;

/// Sort `values` into non-decreasing order.
pub fn sort<T: Slot>(values: &mut [T]) {
    if values.len() < QUICKSORT_THRESHOLD {
        quicksort(values);
        return;
    }

    match find_runs(values) {
        Some(runs) => merge_runs(values, runs),
        None => quicksort(values),
    }
}

/// Returns true if every adjacent pair is ordered
pub fn is_sorted<T: Slot>(values: &[T]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}

/// Split into ascending runs, reversing descending ones in place.
///
/// Returns the run boundaries, or `None` when the input has too many runs or
/// an overlong run of equal values.
fn find_runs<T: Slot>(v: &mut [T]) -> Option<Runs> {
    let n = v.len();
    let mut runs = Runs::new();
    runs.push(0);

    let mut k = 0;
    while k + 1 < n {
        let end = if v[k] < v[k + 1] {
            let mut end = k + 2;
            while end < n && v[end - 1] <= v[end] {
                end += 1;
            }
            end
        } else if v[k] > v[k + 1] {
            let mut end = k + 2;
            while end < n && v[end - 1] >= v[end] {
                end += 1;
            }
            v[k..end].reverse();
            end
        } else {
            let mut end = k + 1;
            let mut budget = MAX_RUN_LENGTH;
            while end < n && v[end - 1] == v[end] {
                end += 1;
                budget -= 1;
                if budget == 0 {
                    return None;
                }
            }
            end
        };

        if runs.len() == MAX_RUN_COUNT {
            return None;
        }
        runs.push(end);
        k = end;
    }

    // trailing single element
    if runs.last().copied() != Some(n) {
        runs.push(n);
    }
    Some(runs)
}

fn merge_runs<T: Slot>(v: &mut [T], mut runs: Runs) {
    let mut scratch = Vec::with_capacity(v.len() / 2 + 1);
    while runs.len() > 2 {
        let mut merged = Runs::new();
        merged.push(0);
        let mut i = 0;
        while i + 2 < runs.len() {
            let (start, mid, end) = (runs[i], runs[i + 1], runs[i + 2]);
            merge(&mut v[start..end], mid - start, &mut scratch);
            merged.push(end);
            i += 2;
        }
        if i + 1 < runs.len() {
            merged.push(runs[i + 1]);
        }
        runs = merged;
    }
}

/// Merge the sorted halves `v[..mid]` and `v[mid..]`.
fn merge<T: Slot>(v: &mut [T], mid: usize, scratch: &mut Vec<T>) {
    if mid == 0 || mid == v.len() || v[mid - 1] <= v[mid] {
        return;
    }

    scratch.clear();
    scratch.extend_from_slice(&v[..mid]);

    let (mut i, mut j, mut out) = (0, mid, 0);
    while i < scratch.len() && j < v.len() {
        if v[j] < scratch[i] {
            v[out] = v[j];
            j += 1;
        } else {
            v[out] = scratch[i];
            i += 1;
        }
        out += 1;
    }
    while i < scratch.len() {
        v[out] = scratch[i];
        i += 1;
        out += 1;
    }
}

fn insertion_sort<T: Slot>(v: &mut [T]) {
    for i in 1..v.len() {
        let value = v[i];
        let mut j = i;
        while j > 0 && value < v[j - 1] {
            v[j] = v[j - 1];
            j -= 1;
        }
        v[j] = value;
    }
}

fn quicksort<T: Slot>(v: &mut [T]) {
    let n = v.len();
    if n < INSERTION_SORT_THRESHOLD {
        insertion_sort(v);
        return;
    }

    // five samples spaced about n/7 apart around the middle
    let seventh = (n >> 3) + (n >> 6) + 1;
    let e3 = n / 2;
    let e2 = e3 - seventh;
    let e1 = e2 - seventh;
    let e4 = e3 + seventh;
    let e5 = e4 + seventh;
    let samples = [e1, e2, e3, e4, e5];
    for i in 1..samples.len() {
        let mut j = i;
        while j > 0 && v[samples[j]] < v[samples[j - 1]] {
            v.swap(samples[j], samples[j - 1]);
            j -= 1;
        }
    }

    if v[e1] != v[e2] && v[e2] != v[e3] && v[e3] != v[e4] && v[e4] != v[e5] {
        partition_dual(v, e1, e2, e4, e5);
    } else {
        partition_single(v, e3);
    }
}

/// Three-way partition around the second and fourth samples.
fn partition_dual<T: Slot>(v: &mut [T], e1: usize, e2: usize, e4: usize, e5: usize) {
    let n = v.len();
    let p1 = v[e2];
    let p2 = v[e4];

    // The pivots move to the ends once partitioning is done.
    v[e2] = v[0];
    v[e4] = v[n - 1];

    let mut less = 1;
    while less < n - 2 && v[less] < p1 {
        less += 1;
    }
    let mut great = n - 2;
    while great > less && v[great] > p2 {
        great -= 1;
    }

    // [1, less) < p1, [less, k) between the pivots, (great, n-1) > p2
    let mut k = less;
    'outer: while k <= great {
        let ak = v[k];
        if ak < p1 {
            v[k] = v[less];
            v[less] = ak;
            less += 1;
        } else if ak > p2 {
            while v[great] > p2 {
                if great == k {
                    great -= 1;
                    break 'outer;
                }
                great -= 1;
            }
            if v[great] < p1 {
                v[k] = v[less];
                v[less] = v[great];
                less += 1;
            } else {
                v[k] = v[great];
            }
            v[great] = ak;
            great -= 1;
        }
        k += 1;
    }

    v[0] = v[less - 1];
    v[less - 1] = p1;
    v[n - 1] = v[great + 1];
    v[great + 1] = p2;

    quicksort(&mut v[..less - 1]);
    quicksort(&mut v[great + 2..]);

    // A large middle part usually holds many copies of the pivots.
    if less < e1 && e5 < great {
        while less <= great && v[less] == p1 {
            less += 1;
        }
        while great >= less && v[great] == p2 {
            great -= 1;
        }

        let mut k = less;
        'inner: while k <= great {
            let ak = v[k];
            if ak == p1 {
                v[k] = v[less];
                v[less] = ak;
                less += 1;
            } else if ak == p2 {
                while v[great] == p2 {
                    if great == k {
                        great -= 1;
                        break 'inner;
                    }
                    great -= 1;
                }
                if v[great] == p1 {
                    v[k] = v[less];
                    v[less] = p1;
                    less += 1;
                } else {
                    v[k] = v[great];
                }
                v[great] = ak;
                great -= 1;
            }
            k += 1;
        }
    }

    quicksort(&mut v[less..great + 1]);
}

/// Dutch-flag partition around the middle sample.
fn partition_single<T: Slot>(v: &mut [T], e3: usize) {
    let pivot = v[e3];
    let mut less = 0;
    let mut hi = v.len();
    let mut k = 0;

    // [0, less) < pivot, [less, k) == pivot, [hi, n) > pivot
    while k < hi {
        let ak = v[k];
        if ak == pivot {
            k += 1;
            continue;
        }
        if ak < pivot {
            v[k] = v[less];
            v[less] = ak;
            less += 1;
        } else {
            while hi - 1 > k && v[hi - 1] > pivot {
                hi -= 1;
            }
            let g = hi - 1;
            if v[g] < pivot {
                v[k] = v[less];
                v[less] = v[g];
                less += 1;
            } else {
                v[k] = v[g];
            }
            v[g] = ak;
            hi -= 1;
        }
        k += 1;
    }

    quicksort(&mut v[..less]);
    quicksort(&mut v[hi..]);
}
