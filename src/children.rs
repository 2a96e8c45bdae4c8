//! Classification of a keyed children list against the previous one.

use core::hash::Hash;
use hashbrown::HashMap;
use tracing::{instrument, trace};

/// What happens to the child at one position of the new list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildChange {
	/// Reuses the previous child at index `from` without touching its position in the host tree.
	Unchanged { from: usize },
	/// Reuses the previous child at index `from`, which has to be detached and reinserted.
	Moved { from: usize },
	/// No previous child had this key.
	New,
}

impl ChildChange {
	/// The previous index of a reused child.
	#[must_use]
	pub fn source(self) -> Option<usize> {
		match self {
			ChildChange::Unchanged { from } | ChildChange::Moved { from } => Some(from),
			ChildChange::New => None,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChildDiff {
	/// One entry per position in the new list.
	pub changes: Vec<ChildChange>,
	/// Previous indices whose keys are gone, ascending.
	pub removed: Vec<usize>,
}

impl ChildDiff {
	/// New positions of moved or new children, ascending. This is the reinsertion queue.
	pub fn insertions(&self) -> impl '_ + Iterator<Item = usize> {
		self.changes
			.iter()
			.enumerate()
			.filter(|(_, change)| !matches!(change, ChildChange::Unchanged { .. }))
			.map(|(index, _)| index)
	}
}

/// Compares two key sequences of the same parent.
///
/// Reused keys that form the longest run of still-ascending previous indices stay where they are.
/// Every other reused key is [moved](`ChildChange::Moved`), which keeps host operations down to at most one insertion
/// per moved or new child.
///
/// Keys must be unique within each sequence.
#[instrument(skip(previous, next), fields(previous.len = previous.len(), next.len = next.len()))]
pub fn diff_keys<K: Eq + Hash>(previous: &[K], next: &[K]) -> ChildDiff {
	let previous_indices = previous.iter().enumerate().map(|(index, key)| (key, index)).collect::<HashMap<_, _>>();

	let sources = next.iter().map(|key| previous_indices.get(key).copied()).collect::<Vec<_>>();

	let mut kept = vec![false; previous.len()];
	for &from in sources.iter().flatten() {
		kept[from] = true;
	}
	let removed = kept.iter().enumerate().filter(|(_, is_kept)| !**is_kept).map(|(index, _)| index).collect::<Vec<_>>();

	let stable = longest_increasing_run(&sources);
	let changes = sources
		.iter()
		.zip(stable)
		.map(|(&source, stable)| match source {
			Some(from) if stable => ChildChange::Unchanged { from },
			Some(from) => ChildChange::Moved { from },
			None => ChildChange::New,
		})
		.collect::<Vec<_>>();

	trace!(removed = removed.len(), "Classified children.");
	ChildDiff { changes, removed }
}

/// Marks the members of a longest strictly increasing subsequence among the `Some` entries.
fn longest_increasing_run(sources: &[Option<usize>]) -> Vec<bool> {
	// `tails[l]` is the position whose value ends the best known run of length `l + 1`.
	let mut tails: Vec<usize> = Vec::new();
	let mut predecessors = vec![None; sources.len()];

	for (position, source) in sources.iter().enumerate() {
		let value = match source {
			Some(value) => *value,
			None => continue,
		};
		let length = tails.partition_point(|&tail| sources[tail] < Some(value));
		if length > 0 {
			predecessors[position] = Some(tails[length - 1]);
		}
		if length == tails.len() {
			tails.push(position);
		} else {
			tails[length] = position;
		}
	}

	let mut stable = vec![false; sources.len()];
	let mut cursor = tails.last().copied();
	while let Some(position) = cursor {
		stable[position] = true;
		cursor = predecessors[position];
	}
	stable
}
