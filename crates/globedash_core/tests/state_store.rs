use globedash_core::{
    GlobeConfig, LayerKind, MemoryStateStorage, NewPin, SqliteStateStorage, StateError, StatePath,
    StateStorage, StateStore, StateTree, StorageError, Subscription,
};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

struct FailingStorage;

impl StateStorage for FailingStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    fn save(&mut self, _key: &str, _payload: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn new_store_starts_from_defaults() {
    let store = StateStore::in_memory();

    assert_eq!(store.tree(), &StateTree::default());
    assert_eq!(store.get(&StatePath::CameraAltitude), Some(json!(2.5)));
    assert_eq!(store.get(&"opacity.borders".parse::<StatePath>().unwrap()), Some(json!(0.6)));
    assert_eq!(store.get(&StatePath::SelectedPin), Some(Value::Null));
}

#[test]
fn get_dotted_returns_none_for_absent_segments() {
    let store = StateStore::in_memory();

    assert_eq!(store.get_dotted("layers.flights"), Some(json!(false)));
    assert_eq!(store.get_dotted("layers.unknown"), None);
    assert_eq!(store.get_dotted("camera.lat.deeper"), None);
    assert_eq!(store.get_dotted("nothing.here"), None);
}

#[test]
fn set_updates_tree_persists_and_notifies() {
    let storage = MemoryStateStorage::new();
    let mut store = StateStore::new(storage.clone());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |change| {
        let flights_visible = change.state.is_layer_visible(LayerKind::Flights);
        sink.borrow_mut()
            .push((change.path.to_string(), change.value.clone(), flights_visible));
    });

    store.set(StatePath::layer("flights"), json!(true)).unwrap();

    assert!(store.tree().layers["flights"]);
    assert_eq!(
        seen.borrow().as_slice(),
        &[("layers.flights".to_string(), json!(true), true)]
    );
    let persisted: Value = serde_json::from_str(&storage.slot("globeState").unwrap()).unwrap();
    assert_eq!(persisted["layers"]["flights"], json!(true));
}

#[test]
fn set_rejects_schema_violations_without_mutation() {
    let storage = MemoryStateStorage::new();
    let mut store = StateStore::new(storage.clone());
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    store.subscribe(move |_| *counter.borrow_mut() += 1);

    let err = store
        .set(StatePath::CameraLat, json!("north"))
        .unwrap_err();
    assert!(matches!(err, StateError::InvalidValue { .. }));

    let err = store.set(StatePath::All, json!({})).unwrap_err();
    assert!(matches!(err, StateError::NotAssignable(StatePath::All)));

    let err = store.set_dotted("camera.zoom.level", json!(1)).unwrap_err();
    assert!(matches!(err, StateError::UnknownPath(_)));

    for bad in [json!(5.0), json!(-1), json!(1.0001)] {
        let err = store.set(StatePath::opacity("flights"), bad).unwrap_err();
        assert!(matches!(
            err,
            StateError::InvalidValue {
                path: StatePath::LayerOpacity(_),
                ..
            }
        ));
    }
    let err = store
        .set(StatePath::Opacity, json!({"flights": 0.5, "oceans": 2.0}))
        .unwrap_err();
    assert!(matches!(err, StateError::InvalidValue { .. }));

    assert_eq!(store.tree(), &StateTree::default());
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(storage.slot("globeState"), None);
}

#[test]
fn update_applies_in_order_and_stops_at_first_failure() {
    let mut store = StateStore::in_memory();

    let err = store
        .update([
            (StatePath::CameraLat, json!(10.0)),
            (StatePath::IsLoading, json!("yes")),
            (StatePath::CameraLng, json!(99.0)),
        ])
        .unwrap_err();

    assert!(matches!(err, StateError::InvalidValue { .. }));
    assert_eq!(store.tree().camera.lat, 10.0);
    assert_eq!(store.tree().camera.lng, 0.0);
    assert!(!store.tree().is_loading);
}

#[test]
fn export_then_import_round_trips() {
    let mut source = StateStore::in_memory();
    source.set(StatePath::layer("oceans"), json!(true)).unwrap();
    source.set(StatePath::opacity("flights"), json!(0.25)).unwrap();
    source
        .set(StatePath::CurrentLocation, json!({"lat": 1.5, "lng": -2.0}))
        .unwrap();
    source.add_pin(NewPin::at(1.0, 2.0).with_label("home")).unwrap();
    // Values that need the shortest round-trip representation to survive.
    source
        .set(StatePath::CameraLat, json!(13.346133595589677))
        .unwrap();
    source.set(StatePath::CameraLng, json!(0.1 + 0.2)).unwrap();
    source
        .set(StatePath::opacity("shipping"), json!(1.0 / 3.0))
        .unwrap();
    source
        .add_pin(NewPin::at(13.346133595589677, -122.41941550000001))
        .unwrap();
    source.add_pin(NewPin::at(-33.868820, 151.209295)).unwrap();

    let exported = source.export_state().unwrap();
    let mut target = StateStore::in_memory();
    assert!(target.import_state(&exported));

    assert_eq!(target.tree(), source.tree());
    assert_eq!(target.pins()[1].lat, 13.346133595589677);
}

#[test]
fn persisted_floats_reload_bit_for_bit() {
    let storage = MemoryStateStorage::new();
    let mut store = StateStore::new(storage.clone());
    let lats = [13.346133595589677, 48.858370000000006, -0.000001234567891011];
    for lat in lats {
        store.add_pin(NewPin::at(lat, lat / 7.0)).unwrap();
    }

    let reopened = StateStore::new(storage);

    assert_eq!(reopened.tree(), store.tree());
    for (pin, lat) in reopened.pins().iter().zip(lats) {
        assert_eq!(pin.lat.to_bits(), lat.to_bits());
        assert_eq!(pin.lng.to_bits(), (lat / 7.0).to_bits());
    }
}

#[test]
fn import_is_shallow_merge_over_current_tree() {
    let mut store = StateStore::in_memory();
    store.set(StatePath::layer("shipping"), json!(true)).unwrap();
    store.set(StatePath::CameraAltitude, json!(1.2)).unwrap();

    assert!(store.import_state(r#"{"layers":{"flights":true}}"#));

    let tree = store.tree();
    assert_eq!(tree.layers.len(), 1);
    assert!(tree.layers["flights"]);
    assert!(!tree.layers.contains_key("shipping"));
    assert_eq!(tree.camera.altitude, 1.2);
    assert_eq!(tree.opacity, StateTree::default().opacity);
}

#[test]
fn import_rejects_out_of_range_opacity() {
    let mut store = StateStore::in_memory();

    assert!(!store.import_state(r#"{"opacity":{"flights":5.0}}"#));
    assert!(!store.import_state(r#"{"opacity":{"borders":-0.5}}"#));

    assert_eq!(store.tree(), &StateTree::default());
}

#[test]
fn unknown_top_level_keys_survive_import_and_reload() {
    let storage = MemoryStateStorage::new();
    let mut store = StateStore::new(storage.clone());

    assert!(store.import_state(r#"{"terrain":{"exaggeration":2},"isLoading":true}"#));
    store.set(StatePath::layer("oceans"), json!(true)).unwrap();

    let exported: Value = serde_json::from_str(&store.export_state().unwrap()).unwrap();
    assert_eq!(exported["terrain"], json!({"exaggeration": 2}));

    let reopened = StateStore::new(storage);
    assert_eq!(reopened.get_dotted("terrain.exaggeration"), Some(json!(2)));
    assert!(reopened.tree().is_loading);
    assert!(reopened.tree().layers["oceans"]);
}

#[test]
fn malformed_import_is_rejected_without_mutation() {
    let storage = MemoryStateStorage::new();
    let mut store = StateStore::new(storage.clone());
    store.set(StatePath::IsLoading, json!(true)).unwrap();
    let before = store.tree().clone();
    let persisted = storage.slot("globeState");

    for text in ["not json", "[1, 2]", "42", r#"{"camera": "far away"}"#] {
        assert!(!store.import_state(text), "accepted {text}");
    }

    assert_eq!(store.tree(), &before);
    assert_eq!(storage.slot("globeState"), persisted);
}

#[test]
fn reset_restores_defaults_and_notifies_wildcard() {
    let mut store = StateStore::in_memory();
    store.set(StatePath::layer("borders"), json!(true)).unwrap();
    let paths = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&paths);
    store.subscribe(move |change| sink.borrow_mut().push(change.path.clone()));

    store.reset();

    assert_eq!(store.tree(), &StateTree::default());
    assert_eq!(paths.borrow().as_slice(), &[StatePath::All]);
    assert_eq!(StatePath::All.to_string(), "*");
}

#[test]
fn subscribers_run_in_order_and_survive_a_panicking_peer() {
    let mut store = StateStore::in_memory();
    let order = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&order);
    store.subscribe(move |_| first.borrow_mut().push("first"));
    store.subscribe(|_| panic!("subscriber exploded"));
    let third = Rc::clone(&order);
    store.subscribe(move |_| third.borrow_mut().push("third"));

    store.set(StatePath::IsLoading, json!(true)).unwrap();
    store.set(StatePath::IsLoading, json!(false)).unwrap();

    assert_eq!(
        order.borrow().as_slice(),
        &["first", "third", "first", "third"]
    );
    assert!(!store.tree().is_loading);
}

#[test]
fn unsubscribe_stops_delivery_even_from_inside_a_callback() {
    let mut store = StateStore::in_memory();
    let calls = Rc::new(RefCell::new(0));

    let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&handle);
    let counter = Rc::clone(&calls);
    let subscription = store.subscribe(move |_| {
        *counter.borrow_mut() += 1;
        if let Some(subscription) = slot.borrow_mut().take() {
            subscription.unsubscribe();
        }
    });
    *handle.borrow_mut() = Some(subscription);

    store.set(StatePath::IsLoading, json!(true)).unwrap();
    store.set(StatePath::IsLoading, json!(false)).unwrap();

    assert_eq!(*calls.borrow(), 1);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn storage_failures_never_fail_mutations() {
    let mut store = StateStore::new(FailingStorage);
    assert_eq!(store.tree(), &StateTree::default());

    store.set(StatePath::layer("flights"), json!(true)).unwrap();
    let pin = store.add_pin(NewPin::at(3.0, 4.0)).unwrap();
    assert!(store.import_state(r#"{"isLoading": true}"#));

    assert!(store.tree().layers["flights"]);
    assert_eq!(store.get_pin(&pin.id), Some(&pin));
    assert!(store.tree().is_loading);
}

#[test]
fn construction_merges_older_blob_over_defaults() {
    let storage = MemoryStateStorage::new();
    storage.insert("globeState", r#"{"camera":{"altitude":4.0,"lat":1.0,"lng":2.0}}"#);

    let store = StateStore::new(storage);

    assert_eq!(store.tree().camera.altitude, 4.0);
    assert_eq!(store.tree().layers, StateTree::default().layers);
    assert_eq!(store.tree().opacity, StateTree::default().opacity);
}

#[test]
fn corrupt_blob_falls_back_to_defaults() {
    let storage = MemoryStateStorage::new();
    storage.insert("globeState", "{ definitely not json");

    let store = StateStore::new(storage);

    assert_eq!(store.tree(), &StateTree::default());
}

#[test]
fn sqlite_backed_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = GlobeConfig {
        state_db_path: Some(dir.path().join("state.db").to_string_lossy().into_owned()),
        storage_key: "dashboard".to_string(),
        ..GlobeConfig::default()
    };

    let mut store = StateStore::open(&config).unwrap();
    store.set(StatePath::layer("oceans"), json!(true)).unwrap();
    let pin = store.add_pin(NewPin::at(51.5, -0.12)).unwrap();
    drop(store);

    let reopened = StateStore::open(&config).unwrap();
    assert_eq!(reopened.storage_key(), "dashboard");
    assert!(reopened.tree().layers["oceans"]);
    assert_eq!(reopened.get_pin(&pin.id), Some(&pin));

    let storage = SqliteStateStorage::open(dir.path().join("state.db")).unwrap();
    let default_key = StateStore::new(storage);
    assert_eq!(default_key.tree(), &StateTree::default());
}
