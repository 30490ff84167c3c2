//! End-to-end tests for the adapter facade.

mod common;

use std::sync::Arc;

use flexadapter::prelude::*;
use flexadapter::{RecordingHost, model::DragState};
use parking_lot::Mutex;

use common::{HeaderItem, Row, ShadowHost, SquarePicture, TextView, row_ids};

fn vertical_rows(count: u32) -> Vec<ItemHandle> {
    (0..count)
        .map(|id| Row::draggable(id, Directions::VERTICAL))
        .collect()
}

#[test]
fn test_mutations_replay_onto_shadow() {
    let adapter = FlexAdapter::with_columns(3).unwrap();
    let host = ShadowHost::attach(&adapter);
    let items = adapter.items();

    items.extend(vertical_rows(6));
    items.insert(2, ItemHandle::new(HeaderItem::new(1))).unwrap();
    items.remove(0).unwrap();
    items.move_item(4, 1).unwrap();
    items.replace(3, Row::swipeable(99, Directions::LEFT)).unwrap();
    items.insert_all(0, vertical_rows(2)).unwrap();
    items.remove_range(2..4).unwrap();
    items.retain(|item| item.downcast_ref::<HeaderItem>().is_none());
    items.push(ItemHandle::new(SquarePicture(7)));
    adapter.swipe(2, Direction::Left).unwrap();
    adapter.drag_start(0).unwrap();
    adapter.drag_over(1).unwrap();
    adapter.drag_end();
    items.clear();
    items.push(Row::draggable(1, Directions::NONE));

    assert!(host.matches(items));
    assert!(host.changes().len() > 10);
}

#[test]
fn test_bulk_append_emits_one_insert() {
    let adapter = FlexAdapter::default();
    let host = Arc::new(RecordingHost::new());
    adapter.attach_host(host.clone());

    adapter.items().extend(vertical_rows(25));

    assert_eq!(
        host.changes(),
        vec![StructuralChange::Inserted { index: 0, count: 25 }]
    );
}

#[test]
fn test_remove_by_reference_distinguishes_equal_items() {
    let adapter = FlexAdapter::default();
    let first = ItemHandle::new(HeaderItem::new(5));
    let second = ItemHandle::new(HeaderItem::new(5));
    adapter.items().extend([first.clone(), second.clone()]);

    assert_eq!(adapter.items().remove_item(&first), Some(0));

    assert_eq!(adapter.items().len(), 1);
    assert!(adapter.items().contains(&second));
    assert!(!adapter.items().contains(&first));
}

#[test]
fn test_drag_two_to_five_step_by_step() {
    let adapter = FlexAdapter::default();
    adapter.items().extend(vertical_rows(7));
    let host = ShadowHost::attach(&adapter);

    assert!(adapter.drag_start(2).unwrap().is_accepted());
    for target in 3..=5 {
        assert!(adapter.drag_over(target).unwrap().is_accepted());
    }
    assert!(adapter.drag_end().is_accepted());

    let ids = row_ids(adapter.items());
    assert_eq!(ids[5], Some(2));
    let mut sorted: Vec<u32> = ids.into_iter().flatten().collect();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..7).collect::<Vec<_>>());
    assert_eq!(
        host.changes(),
        vec![
            StructuralChange::Moved { from: 2, to: 3 },
            StructuralChange::Moved { from: 3, to: 4 },
            StructuralChange::Moved { from: 4, to: 5 },
        ]
    );
    assert!(host.matches(adapter.items()));
}

#[test]
fn test_drag_without_down_moves_nothing() {
    let adapter = FlexAdapter::default();
    let mut rows = vertical_rows(7);
    rows[2] = Row::draggable(2, Directions::UP);
    adapter.items().extend(rows);
    let host = Arc::new(RecordingHost::new());
    adapter.attach_host(host.clone());

    assert!(adapter.drag_start(2).unwrap().is_accepted());
    for target in 3..=5 {
        assert_eq!(adapter.drag_over(target).unwrap(), GestureOutcome::Rejected);
    }
    adapter.drag_end();

    assert!(host.changes().is_empty());
    assert_eq!(row_ids(adapter.items())[2], Some(2));
}

#[test]
fn test_forbidden_swipe_changes_nothing() {
    let adapter = FlexAdapter::default();
    adapter
        .items()
        .extend([Row::swipeable(0, Directions::LEFT), Row::swipeable(1, Directions::NONE)]);
    let host = Arc::new(RecordingHost::new());
    adapter.attach_host(host.clone());
    let calls = Arc::new(Mutex::new(0));
    let calls_clone = calls.clone();
    adapter.set_swipe_listener(move |_, _| *calls_clone.lock() += 1);

    assert_eq!(adapter.swipe(0, Direction::Right).unwrap(), GestureOutcome::Rejected);
    assert_eq!(adapter.swipe(1, Direction::Left).unwrap(), GestureOutcome::Rejected);

    assert!(host.changes().is_empty());
    assert_eq!(*calls.lock(), 0);
    assert_eq!(adapter.items().len(), 2);
}

#[test]
fn test_permitted_swipe_removes_item_then_notifies() {
    let adapter = FlexAdapter::default();
    let target = Row::swipeable(1, Directions::HORIZONTAL);
    adapter.items().extend([
        Row::swipeable(0, Directions::NONE),
        target.clone(),
        Row::swipeable(2, Directions::NONE),
    ]);
    let host = Arc::new(RecordingHost::new());
    adapter.attach_host(host.clone());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let host_clone = host.clone();
    adapter.set_swipe_listener(move |adapter, event| {
        seen_clone.lock().push((
            event.item.clone(),
            event.direction,
            adapter.items().contains(&event.item),
            host_clone.changes().len(),
        ));
    });

    assert!(adapter.swipe(1, Direction::Right).unwrap().is_accepted());

    assert_eq!(adapter.items().len(), 2);
    assert_eq!(host.changes(), vec![StructuralChange::Removed { index: 1, count: 1 }]);
    let seen = seen.lock();
    assert_eq!(seen.len(), 1);
    let (item, direction, still_present, changes_before_listener) = &seen[0];
    assert!(item.ptr_eq(&target));
    assert_eq!(*direction, Direction::Right);
    assert!(!still_present);
    assert_eq!(*changes_before_listener, 1);
}

#[test]
fn test_reregistering_swipe_listener_replaces_it() {
    let adapter = FlexAdapter::default();
    adapter.items().extend([
        Row::swipeable(0, Directions::ALL),
        Row::swipeable(1, Directions::ALL),
    ]);
    let log = Arc::new(Mutex::new(Vec::new()));

    let log_a = log.clone();
    assert!(adapter.set_swipe_listener(move |_, _| log_a.lock().push("a")).is_none());
    let log_b = log.clone();
    assert!(adapter.set_swipe_listener(move |_, _| log_b.lock().push("b")).is_some());

    adapter.swipe(0, Direction::Up).unwrap();
    assert!(adapter.clear_swipe_listener().is_some());
    adapter.swipe(0, Direction::Up).unwrap();

    assert_eq!(*log.lock(), vec!["b"]);
    assert!(adapter.items().is_empty());
}

#[test]
fn test_kind_identity() {
    let adapter = FlexAdapter::default();
    adapter.items().extend([
        ItemHandle::new(HeaderItem::new(1)),
        Row::draggable(0, Directions::NONE),
        ItemHandle::new(HeaderItem::new(2)),
        ItemHandle::new(SquarePicture(0)),
        Row::draggable(1, Directions::ALL),
    ]);

    let kinds: Vec<ItemKind> = (0..5).map(|i| adapter.item_kind(i).unwrap()).collect();
    assert_eq!(kinds[0], kinds[2]);
    assert_eq!(kinds[1], kinds[4]);
    assert_ne!(kinds[0], kinds[1]);
    assert_ne!(kinds[0], kinds[3]);
    assert_ne!(kinds[1], kinds[3]);
    assert_eq!(adapter.kind_count(), 3);
}

#[test]
fn test_units_recycle_across_items_of_a_kind() {
    let adapter = FlexAdapter::default();
    adapter.items().extend(vertical_rows(3));
    let kind = adapter.item_kind(0).unwrap();
    let mut unit = adapter.create_unit(kind, &DetachedContainer).unwrap();

    for index in 0..3 {
        adapter.bind_unit(&mut unit, index).unwrap();
        assert_eq!(
            unit.downcast_ref::<TextView>().unwrap().text,
            format!("row {index} at {index}")
        );
    }
}

#[test]
fn test_drag_listener_modes() {
    let drop_only = FlexAdapter::default();
    let live = FlexAdapter::new(AdapterConfig::new().drag_listener_on_drop_only(false)).unwrap();

    for adapter in [&drop_only, &live] {
        adapter.items().extend(vertical_rows(4));
    }
    let drops = Arc::new(Mutex::new(Vec::new()));
    let moves = Arc::new(Mutex::new(Vec::new()));
    let drops_clone = drops.clone();
    drop_only.set_drag_listener(move |_, e| drops_clone.lock().push((e.from, e.to)));
    let moves_clone = moves.clone();
    live.set_drag_listener(move |_, e| moves_clone.lock().push((e.from, e.to)));

    for adapter in [&drop_only, &live] {
        adapter.drag_start(0).unwrap();
        adapter.drag_over(1).unwrap();
        adapter.drag_over(2).unwrap();
        adapter.drag_over(3).unwrap();
        adapter.drag_end();
    }

    assert_eq!(*drops.lock(), vec![(0, 3)]);
    assert_eq!(*moves.lock(), vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn test_cancel_rollback() {
    let adapter =
        FlexAdapter::new(AdapterConfig::new().rollback_drag_on_cancel(true)).unwrap();
    adapter.items().extend(vertical_rows(4));
    let host = ShadowHost::attach(&adapter);

    adapter.drag_start(1).unwrap();
    adapter.drag_over(2).unwrap();
    adapter.drag_over(3).unwrap();
    assert!(adapter.drag_cancel().unwrap().is_accepted());

    assert_eq!(
        row_ids(adapter.items()),
        vec![Some(0), Some(1), Some(2), Some(3)]
    );
    assert_eq!(host.changes().last(), Some(&StructuralChange::Moved { from: 3, to: 1 }));
    assert!(host.matches(adapter.items()));
    assert!(matches!(adapter.drag_state(), DragState::Idle));
}

#[test]
fn test_cancel_keeps_partial_order_by_default() {
    let adapter = FlexAdapter::default();
    adapter.items().extend(vertical_rows(3));

    adapter.drag_start(0).unwrap();
    adapter.drag_over(1).unwrap();
    adapter.drag_cancel().unwrap();

    assert_eq!(row_ids(adapter.items()), vec![Some(1), Some(0), Some(2)]);
}

#[test]
fn test_grid_drag_uses_cells() {
    let adapter = FlexAdapter::with_columns(3).unwrap();
    adapter.items().push(ItemHandle::new(HeaderItem::new(0)));
    adapter
        .items()
        .extend((0..6).map(|i| ItemHandle::new(SquarePicture(i))));
    let horizontal = Row::draggable(9, Directions::HORIZONTAL);
    adapter.items().insert(2, horizontal.clone()).unwrap();

    // Row 1 is: picture 0, horizontal row, picture 1.
    assert!(adapter.drag_start(2).unwrap().is_accepted());
    assert!(adapter.drag_over(3).unwrap().is_accepted());
    assert_eq!(adapter.items().index_of(&horizontal), Some(3));
    // Picture 2 sits on the next grid row.
    assert_eq!(adapter.drag_over(4).unwrap(), GestureOutcome::Rejected);
    // So does the header row above.
    assert_eq!(adapter.drag_over(0).unwrap(), GestureOutcome::Rejected);
    adapter.drag_end();
}

#[test]
fn test_mark_item_changed_rebinds_new_state() {
    let adapter = FlexAdapter::default();
    let header = Arc::new(HeaderItem::new(1));
    adapter.items().push(ItemHandle::from_arc(header.clone()));
    let host = Arc::new(RecordingHost::new());
    adapter.attach_host(host.clone());

    header.text.set(2);
    assert!(adapter.mark_item_changed(&ItemHandle::from_arc(header.clone())));

    let kind = adapter.item_kind(0).unwrap();
    let mut unit = adapter.create_unit(kind, &DetachedContainer).unwrap();
    adapter.bind_unit(&mut unit, 0).unwrap();
    assert_eq!(unit.downcast_ref::<TextView>().unwrap().text, "2");
    assert_eq!(host.changes(), vec![StructuralChange::Changed { index: 0, count: 1 }]);
}

#[test]
fn test_span_lookup_clamps() {
    let adapter = FlexAdapter::with_columns(2).unwrap();
    adapter
        .items()
        .extend([ItemHandle::new(HeaderItem::new(0)), ItemHandle::new(SquarePicture(0))]);
    let lookup = adapter.span_lookup();

    assert_eq!(lookup.span_size(0), Ok(2));
    assert_eq!(lookup.span_size(1), Ok(1));
    assert_eq!(
        lookup.span_size(2),
        Err(AdapterError::IndexOutOfRange { index: 2, len: 2 })
    );
}

#[test]
fn test_out_of_range_gestures_are_errors() {
    let adapter = FlexAdapter::default();
    adapter.items().extend(vertical_rows(2));

    assert!(adapter.swipe(2, Direction::Left).is_err());
    assert!(adapter.drag_start(5).is_err());
    adapter.drag_start(0).unwrap();
    assert_eq!(
        adapter.drag_over(2),
        Err(AdapterError::IndexOutOfRange { index: 2, len: 2 })
    );
    assert!(adapter.drag_state().is_dragging());
}

#[test]
fn test_suspended_notifications() {
    let adapter = FlexAdapter::default();
    let host = ShadowHost::attach(&adapter);

    adapter.items().set_notifications_enabled(false);
    adapter.items().extend(vertical_rows(3));
    adapter.items().move_item(0, 2).unwrap();
    assert!(host.changes().is_empty());

    adapter.items().notify(StructuralChange::Reset);
    adapter.items().set_notifications_enabled(true);

    assert_eq!(host.changes(), vec![StructuralChange::Reset]);
    assert!(host.matches(adapter.items()));
}

#[test]
fn test_displaced_item_allowing_motion_makes_way() {
    let adapter = FlexAdapter::default();
    adapter
        .items()
        .extend([Row::draggable(0, Directions::VERTICAL), Row::draggable(1, Directions::DOWN)]);

    adapter.drag_start(0).unwrap();
    assert!(adapter.drag_over(1).unwrap().is_accepted());
    adapter.drag_end();

    assert_eq!(row_ids(adapter.items()), vec![Some(1), Some(0)]);
}

#[test]
fn test_host_after_mutating_listener_sees_mutation_order() {
    let adapter = FlexAdapter::default();
    let items = Arc::downgrade(adapter.items());
    adapter.items().signals().changed.connect(move |_| {
        if let Some(items) = items.upgrade() {
            if items.len() > 2 {
                let _ = items.remove(0);
            }
        }
    });
    let host = Arc::new(RecordingHost::new());
    adapter.attach_host(host.clone());

    adapter.items().extend(vertical_rows(3));

    assert_eq!(
        host.changes(),
        vec![
            StructuralChange::Inserted { index: 0, count: 3 },
            StructuralChange::Removed { index: 0, count: 1 },
        ]
    );
    assert_eq!(row_ids(adapter.items()), vec![Some(1), Some(2)]);
}

#[test]
fn test_registered_values_in_a_grid() {
    let adapter = FlexAdapter::with_columns(3).unwrap();
    adapter.register::<&'static str, TextView, _, _>(
        ItemAttrs::new().span(3),
        |_| TextView::default(),
        |title, view, _| view.text = title.to_string(),
    );
    adapter.register::<u32, TextView, _, _>(
        ItemAttrs::new().swipe(Directions::HORIZONTAL),
        |_| TextView::default(),
        |n, view, position| view.text = format!("{n}@{position}"),
    );

    adapter.items().extend([
        adapter.wrap("Numbers").unwrap(),
        adapter.wrap(1u32).unwrap(),
        adapter.wrap(2u32).unwrap(),
    ]);
    let lookup = adapter.span_lookup();
    assert_eq!(lookup.span_size(0), Ok(3));
    assert_eq!(lookup.span_size(1), Ok(1));
    assert_ne!(adapter.item_kind(0).unwrap(), adapter.item_kind(1).unwrap());

    let mut unit = adapter
        .create_unit(adapter.item_kind(2).unwrap(), &DetachedContainer)
        .unwrap();
    adapter.bind_unit(&mut unit, 2).unwrap();
    assert_eq!(unit.downcast_ref::<TextView>().unwrap().text, "2@2");

    assert!(adapter.swipe(1, Direction::Right).unwrap().is_accepted());
    assert_eq!(adapter.swipe(0, Direction::Right).unwrap(), GestureOutcome::Rejected);
}

#[test]
fn test_assign_replays_onto_shadow() {
    let adapter = FlexAdapter::default();
    let rows = vertical_rows(6);
    adapter.items().extend(rows.clone());
    let host = ShadowHost::attach(&adapter);

    let next = vec![
        rows[3].clone(),
        rows[0].clone(),
        ItemHandle::new(HeaderItem::new(1)),
        rows[1].clone(),
        rows[5].clone(),
    ];
    adapter.items().assign(next);

    assert!(!host.changes().is_empty());
    assert!(!host.changes().contains(&StructuralChange::Reset));
    assert!(host.matches(adapter.items()));
    assert_eq!(row_ids(adapter.items()), vec![Some(3), Some(0), None, Some(1), Some(5)]);
}
