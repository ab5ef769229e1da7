use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;

/// Most frequent value. Ties go to the value seen first. Returns `None` for empty input.
pub fn mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .min_by_key(|(_, (count, first_seen))| (Reverse(*count), *first_seen))
        .map(|(value, _)| value)
}

/// Count of each distinct value, highest count first. Equal counts keep first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
