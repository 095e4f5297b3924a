use crucible_di::Key;
use std::collections::{BTreeSet, HashMap};

#[test]
fn test_key_of_same_type_is_equal() {
    assert_eq!(Key::of::<u32>(), Key::of::<u32>());

    struct Local;
    assert_eq!(Key::of::<Local>(), Key::of::<Local>());
}

#[test]
fn test_key_of_different_types_differ() {
    assert_ne!(Key::of::<u32>(), Key::of::<u64>());
    assert_ne!(Key::of::<String>(), Key::of::<&'static str>());
}

#[test]
fn test_named_keys_are_distinct() {
    let unnamed = Key::of::<u32>();
    let a = Key::named::<u32>("a");
    let b = Key::named::<u32>("b");

    assert_ne!(unnamed, a);
    assert_ne!(a, b);
    assert_eq!(a, Key::named::<u32>("a"));
}

#[test]
fn test_key_for_trait_objects() {
    trait Service: Send + Sync {}

    let key = Key::of::<dyn Service>();
    assert_eq!(key, Key::of::<dyn Service>());
    assert!(key.display_name().contains("Service"));
}

#[test]
fn test_key_display() {
    assert_eq!(Key::of::<u32>().to_string(), "u32");
    assert_eq!(Key::named::<u32>("config_port").to_string(), "u32[config_port]");
}

#[test]
fn test_key_accessors() {
    let key = Key::named::<bool>("flag");
    assert_eq!(key.display_name(), "bool");
    assert_eq!(key.name(), Some("flag"));
    assert_eq!(Key::of::<bool>().name(), None);
}

#[test]
fn test_key_as_hashmap_key() {
    let mut map = HashMap::new();
    map.insert(Key::of::<u8>(), "unnamed");
    map.insert(Key::named::<u8>("alt"), "named");

    assert_eq!(map.len(), 2);
    assert_eq!(map[&Key::of::<u8>()], "unnamed");
    assert_eq!(map[&Key::named::<u8>("alt")], "named");
}

#[test]
fn test_key_ordering_is_total() {
    let mut set = BTreeSet::new();
    set.insert(Key::of::<u8>());
    set.insert(Key::of::<u16>());
    set.insert(Key::named::<u8>("a"));
    set.insert(Key::named::<u8>("b"));
    set.insert(Key::named::<u8>("a")); // duplicate

    assert_eq!(set.len(), 4);
}

#[test]
fn test_key_is_copy() {
    let key = Key::of::<u32>();
    let copy = key;
    // Both usable after the move-that-is-a-copy.
    assert_eq!(key, copy);
}
