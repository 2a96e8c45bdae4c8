use trellis_dom::children::{diff_keys, ChildChange, ChildDiff};

#[test]
fn identical() {
	let diff = diff_keys(&["a", "b", "c"], &["a", "b", "c"]);
	assert_eq!(
		diff.changes,
		[
			ChildChange::Unchanged { from: 0 },
			ChildChange::Unchanged { from: 1 },
			ChildChange::Unchanged { from: 2 },
		]
	);
	assert!(diff.removed.is_empty());
	assert_eq!(diff.insertions().count(), 0);
}

#[test]
fn interior_removal() {
	let diff = diff_keys(&["a", "b", "c"], &["a", "c"]);
	assert_eq!(
		diff,
		ChildDiff {
			changes: vec![ChildChange::Unchanged { from: 0 }, ChildChange::Unchanged { from: 2 }],
			removed: vec![1],
		}
	);
	assert_eq!(diff.insertions().count(), 0);
}

#[test]
fn swap_moves_one() {
	let diff = diff_keys(&["a", "b"], &["b", "a"]);
	assert_eq!(diff.changes, [ChildChange::Moved { from: 1 }, ChildChange::Unchanged { from: 0 }]);
	assert_eq!(diff.insertions().collect::<Vec<_>>(), [0]);
}

#[test]
fn insertion() {
	let diff = diff_keys(&["a", "b"], &["a", "x", "b"]);
	assert_eq!(
		diff.changes,
		[ChildChange::Unchanged { from: 0 }, ChildChange::New, ChildChange::Unchanged { from: 1 }]
	);
	assert_eq!(diff.insertions().collect::<Vec<_>>(), [1]);
}

#[test]
fn rotation_keeps_the_longest_run() {
	let diff = diff_keys(&["a", "b", "c", "d"], &["d", "a", "b", "c"]);
	assert_eq!(
		diff.changes,
		[
			ChildChange::Moved { from: 3 },
			ChildChange::Unchanged { from: 0 },
			ChildChange::Unchanged { from: 1 },
			ChildChange::Unchanged { from: 2 },
		]
	);
}

#[test]
fn replace_all() {
	let diff = diff_keys(&["a", "b"], &["c"]);
	assert_eq!(diff.changes, [ChildChange::New]);
	assert_eq!(diff.removed, [0, 1]);
}

#[test]
fn empty() {
	let diff = diff_keys::<&str>(&[], &[]);
	assert_eq!(diff, ChildDiff::default());
}
