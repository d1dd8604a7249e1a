use chrono::DateTime;
use globedash_core::{MemoryStateStorage, NewPin, StateError, StatePath, StateStore};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

#[test]
fn add_pin_generates_unique_ids_and_timestamps() {
    let mut store = StateStore::in_memory();

    let first = store.add_pin(NewPin::at(1.0, 2.0)).unwrap();
    let second = store
        .add_pin(NewPin::at(1.0, 2.0).with_label("again"))
        .unwrap();

    assert!(first.id.starts_with("pin-"));
    assert_ne!(first.id, second.id);
    assert_eq!(first.label, None);
    assert_eq!(second.label.as_deref(), Some("again"));
    assert!(DateTime::parse_from_rfc3339(&first.timestamp).is_ok());
    assert!(first.timestamp.ends_with('Z'));
    assert_eq!(store.pins(), &[first.clone(), second.clone()]);
    assert_eq!(store.get_pin(&first.id), Some(&first));
}

#[test]
fn pin_ids_stay_unique_across_many_inserts() {
    let mut store = StateStore::in_memory();
    let ids: HashSet<String> = (0..200)
        .map(|i| store.add_pin(NewPin::at(f64::from(i), 0.0)).unwrap().id)
        .collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn remove_pin_drops_it_and_persists() {
    let storage = MemoryStateStorage::new();
    let mut store = StateStore::new(storage.clone());
    let keep = store.add_pin(NewPin::at(10.0, 20.0)).unwrap();
    let gone = store.add_pin(NewPin::at(30.0, 40.0)).unwrap();

    store.remove_pin(&gone.id);

    assert_eq!(store.get_pin(&gone.id), None);
    assert_eq!(store.pins(), &[keep.clone()]);
    let persisted: Value = serde_json::from_str(&storage.slot("globeState").unwrap()).unwrap();
    assert_eq!(persisted["pins"].as_array().map(Vec::len), Some(1));
    assert_eq!(persisted["pins"][0]["id"], Value::String(keep.id));
}

#[test]
fn removing_unknown_pin_is_silent_noop() {
    let mut store = StateStore::in_memory();
    let pin = store.add_pin(NewPin::at(0.0, 0.0)).unwrap();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    store.subscribe(move |_| *counter.borrow_mut() += 1);

    store.remove_pin("pin-does-not-exist");

    assert_eq!(store.pins(), &[pin]);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn removing_selected_pin_clears_selection() {
    let mut store = StateStore::in_memory();
    let pin = store.add_pin(NewPin::at(5.0, 5.0)).unwrap();
    assert!(store.select_pin(Some(&pin.id)));
    assert_eq!(store.tree().selected_pin.as_deref(), Some(pin.id.as_str()));

    let paths = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&paths);
    store.subscribe(move |change| sink.borrow_mut().push(change.path.clone()));

    store.remove_pin(&pin.id);

    assert_eq!(store.tree().selected_pin, None);
    assert_eq!(
        paths.borrow().as_slice(),
        &[StatePath::Pins, StatePath::SelectedPin]
    );
}

#[test]
fn select_pin_rejects_unknown_ids() {
    let mut store = StateStore::in_memory();
    let pin = store.add_pin(NewPin::at(5.0, 5.0)).unwrap();

    assert!(!store.select_pin(Some("pin-missing")));
    assert_eq!(store.tree().selected_pin, None);

    assert!(store.select_pin(Some(&pin.id)));
    assert!(store.select_pin(None));
    assert_eq!(store.tree().selected_pin, None);
}

#[test]
fn add_pin_notifies_with_full_pin_list() {
    let mut store = StateStore::in_memory();
    let lengths = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&lengths);
    store.subscribe(move |change| {
        assert_eq!(change.path, &StatePath::Pins);
        sink.borrow_mut()
            .push(change.value.as_array().map_or(0, Vec::len));
    });

    store.add_pin(NewPin::at(1.0, 1.0)).unwrap();
    store.add_pin(NewPin::at(2.0, 2.0)).unwrap();

    assert_eq!(lengths.borrow().as_slice(), &[1, 2]);
}

#[test]
fn non_finite_coordinates_are_rejected_without_touching_state() {
    let storage = MemoryStateStorage::new();
    let mut store = StateStore::new(storage.clone());
    let kept = store.add_pin(NewPin::at(1.0, 2.0)).unwrap();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    store.subscribe(move |_| *counter.borrow_mut() += 1);

    for fields in [
        NewPin::at(f64::NAN, 2.0),
        NewPin::at(1.0, f64::INFINITY),
        NewPin::at(f64::NEG_INFINITY, f64::NAN),
    ] {
        let err = store.add_pin(fields).unwrap_err();
        assert!(matches!(
            err,
            StateError::InvalidValue {
                path: StatePath::Pins,
                ..
            }
        ));
    }

    assert_eq!(store.pins(), &[kept]);
    assert_eq!(*calls.borrow(), 0);
    // The store stays fully usable and its own export still imports.
    store.set(StatePath::IsLoading, serde_json::json!(true)).unwrap();
    let exported = store.export_state().unwrap();
    assert!(store.import_state(&exported));
    assert_eq!(StateStore::new(storage).pins().len(), 1);
}
