//! Minimal change lists between two versions of a collection.
//!
//! Callers that rebuild their item list wholesale (for example from a new
//! query result) can hand both versions to [`diff`] and report the result
//! instead of a reset, so the host animates only what actually changed.
//!
//! Two items are *the same item* when they share a kind. Same items in the
//! longest common kind subsequence stay in place and are reported as
//! `Changed` when their contents differ. Of the rest, an item that appears in
//! both lists (by reference) is reported as `Moved`; everything else is
//! `Removed` or `Inserted`.
//!
//! Replaying the returned changes in order on a copy of `old`, reading new
//! content from `new`, yields `new`.

use super::collection::StructuralChange;
use super::item::{ItemHandle, KindKey};

/// Changes turning `old` into `new`, with contents compared by reference.
pub fn diff(old: &[ItemHandle], new: &[ItemHandle]) -> Vec<StructuralChange> {
    diff_by(old, new, ItemHandle::ptr_eq)
}

/// Changes turning `old` into `new`, with contents compared by `same_contents`.
///
/// `same_contents` is only asked about pairs of the same kind.
pub fn diff_by<F>(old: &[ItemHandle], new: &[ItemHandle], mut same_contents: F) -> Vec<StructuralChange>
where
    F: FnMut(&ItemHandle, &ItemHandle) -> bool,
{
    let old_keys: Vec<KindKey> = old.iter().map(|item| item.kind_key()).collect();
    let new_keys: Vec<KindKey> = new.iter().map(|item| item.kind_key()).collect();

    // For each new position, the old position it is taken from.
    let mut source = match_by_kind(&old_keys, &new_keys);
    let mut kept = vec![false; old.len()];
    for i in source.iter().flatten() {
        kept[*i] = true;
    }

    for (j, slot) in source.iter_mut().enumerate() {
        if slot.is_some() {
            continue;
        }
        let moved = (0..old.len()).find(|&i| !kept[i] && old[i].ptr_eq(&new[j]));
        if let Some(i) = moved {
            kept[i] = true;
            *slot = Some(i);
        }
    }

    let mut changes = Vec::new();

    // Removals, back to front so earlier indices stay valid.
    let mut working: Vec<Option<usize>> = (0..old.len()).map(Some).collect();
    let mut end = old.len();
    while end > 0 {
        if kept[end - 1] {
            end -= 1;
            continue;
        }
        let mut start = end;
        while start > 0 && !kept[start - 1] {
            start -= 1;
        }
        changes.push(StructuralChange::Removed {
            index: start,
            count: end - start,
        });
        working.drain(start..end);
        end = start;
    }

    // Everything before `j` is final once position `j` is processed.
    let mut inserted = Run::default();
    let mut changed = Run::default();
    for (j, source) in source.iter().enumerate() {
        let Some(i) = *source else {
            changed.flush(&mut changes, changed_at);
            inserted.extend(j);
            working.insert(j, None);
            continue;
        };
        inserted.flush(&mut changes, inserted_at);

        let position = j + working[j..]
            .iter()
            .position(|entry| *entry == Some(i))
            .unwrap_or_default();
        if position != j {
            changes.push(StructuralChange::Moved { from: position, to: j });
            let entry = working.remove(position);
            working.insert(j, entry);
        }

        if same_contents(&old[i], &new[j]) {
            changed.flush(&mut changes, changed_at);
        } else {
            changed.extend(j);
        }
    }
    inserted.flush(&mut changes, inserted_at);
    changed.flush(&mut changes, changed_at);

    changes
}

/// Longest common subsequence of kinds, as new position -> old position.
fn match_by_kind(old: &[KindKey], new: &[KindKey]) -> Vec<Option<usize>> {
    let mut source = vec![None; new.len()];

    let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    for k in 0..prefix {
        source[k] = Some(k);
    }
    for k in 0..suffix {
        source[new.len() - 1 - k] = Some(old.len() - 1 - k);
    }

    let a = &old[prefix..old.len() - suffix];
    let b = &new[prefix..new.len() - suffix];
    if a.is_empty() || b.is_empty() {
        return source;
    }

    // lengths[i][j]: common subsequence length of a[i..] and b[j..].
    let width = b.len() + 1;
    let mut lengths = vec![0u32; (a.len() + 1) * width];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lengths[i * width + j] = if a[i] == b[j] {
                lengths[(i + 1) * width + j + 1] + 1
            } else {
                lengths[(i + 1) * width + j].max(lengths[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            source[prefix + j] = Some(prefix + i);
            i += 1;
            j += 1;
        } else if lengths[(i + 1) * width + j] >= lengths[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    source
}

/// A contiguous run of positions waiting to be reported as one change.
#[derive(Default)]
struct Run {
    start: usize,
    count: usize,
}

impl Run {
    fn extend(&mut self, position: usize) {
        if self.count == 0 {
            self.start = position;
        }
        self.count += 1;
    }

    fn flush(&mut self, changes: &mut Vec<StructuralChange>, make: fn(usize, usize) -> StructuralChange) {
        if self.count > 0 {
            changes.push(make(self.start, self.count));
            self.count = 0;
        }
    }
}

fn inserted_at(index: usize, count: usize) -> StructuralChange {
    StructuralChange::Inserted { index, count }
}

fn changed_at(index: usize, count: usize) -> StructuralChange {
    StructuralChange::Changed { index, count }
}
