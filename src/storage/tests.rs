use rand::Rng;

use super::{AnyStorage, Packed};
use crate::entity::Entity;
use crate::error::Error;
use crate::test_util;

/// Asserts that slots `0..len` are occupied and the two indices are mutual inverses.
fn assert_dense<T>(storage: &Packed<T>) {
    assert_eq!(storage.entities().len(), storage.len());
    assert_eq!(storage.as_slice().len(), storage.len());

    for (slot, &entity) in storage.entities().iter().enumerate() {
        assert_eq!(storage.slot_of(entity), Some(slot), "{entity} should point back to slot {slot}");
    }

    let owned = (0..storage.capacity())
        .filter(|&index| storage.contains(Entity::new(index.try_into().unwrap())))
        .count();
    assert_eq!(owned, storage.len(), "every entity with a slot must be listed in a slot");
}

fn ent(index: u32) -> Entity { Entity::new(index) }

#[test]
fn test_insert_appends() {
    let mut storage = Packed::new(8);
    storage.insert(ent(5), 50).unwrap();
    storage.insert(ent(2), 20).unwrap();
    storage.insert(ent(7), 70).unwrap();

    assert_eq!(storage.as_slice(), &[50, 20, 70]);
    assert_eq!(storage.entities(), &[ent(5), ent(2), ent(7)]);
    assert_eq!(storage.get(ent(2)), Ok(&20));
    assert_dense(&storage);
}

#[test]
fn test_swap_remove_first_of_three() {
    test_util::init();

    let mut storage = Packed::new(8);
    for (index, value) in [(0, 'a'), (1, 'b'), (2, 'c')] {
        storage.insert(ent(index), value).unwrap();
    }

    assert_eq!(storage.remove(ent(0)), Ok('a'));

    assert_eq!(storage.len(), 2);
    assert_eq!(storage.slot_of(ent(2)), Some(0), "the last component moves into the hole");
    assert_eq!(storage.entity_at(0), Some(ent(2)));
    assert_eq!(storage.get(ent(2)), Ok(&'c'));
    assert_eq!(
        storage.get(ent(0)),
        Err(Error::MissingComponent { entity: ent(0), component: "char" })
    );
    assert_dense(&storage);
}

#[test]
fn test_remove_last_slot() {
    let mut storage = Packed::new(4);
    storage.insert(ent(3), 3u8).unwrap();
    storage.insert(ent(1), 1u8).unwrap();

    assert_eq!(storage.remove(ent(1)), Ok(1));
    assert_eq!(storage.entities(), &[ent(3)]);
    assert!(!storage.contains(ent(1)));
    assert_dense(&storage);

    assert_eq!(storage.remove(ent(3)), Ok(3));
    assert!(storage.is_empty());
    assert_dense(&storage);
}

#[test]
fn test_duplicate_and_missing() {
    let mut storage = Packed::new(4);
    storage.insert(ent(1), 1i32).unwrap();

    assert_eq!(
        storage.insert(ent(1), 2),
        Err(Error::DuplicateComponent { entity: ent(1), component: "i32" })
    );
    assert_eq!(storage.get(ent(1)), Ok(&1), "a rejected insert must not overwrite");

    assert_eq!(
        storage.remove(ent(0)),
        Err(Error::MissingComponent { entity: ent(0), component: "i32" })
    );
    assert_eq!(storage.insert(ent(4), 4), Err(Error::InvalidEntity { entity: ent(4), capacity: 4 }));
    assert_dense(&storage);
}

#[test]
fn test_get_mut_writes_through() {
    let mut storage = Packed::new(4);
    storage.insert(ent(0), 1.0f32).unwrap();
    storage.insert(ent(1), 2.0f32).unwrap();

    *storage.get_mut(ent(1)).unwrap() += 0.5;
    for (_, value) in storage.iter_mut() {
        *value *= 2.0;
    }

    assert_eq!(storage.iter().collect::<Vec<_>>(), vec![(ent(0), &2.0), (ent(1), &5.0)]);
}

#[test]
fn test_entity_destroyed_tolerates_absence() {
    let mut storage = Packed::new(4);
    storage.insert(ent(2), "two").unwrap();

    let erased: &mut dyn AnyStorage = &mut storage;
    assert_eq!(erased.component_name(), "&str");
    erased.on_entity_destroyed(ent(0));
    erased.on_entity_destroyed(ent(9));
    assert_eq!(erased.len(), 1);

    erased.on_entity_destroyed(ent(2));
    assert!(erased.is_empty());
    assert!(erased.as_any().downcast_ref::<Packed<&'static str>>().is_some());
}

#[test]
fn test_random_churn_stays_dense() {
    test_util::init();

    const CAPACITY: u32 = 64;

    let mut rng = rand::thread_rng();
    let mut storage = Packed::new(CAPACITY.try_into().unwrap());
    let mut expected = std::collections::BTreeMap::new();

    for _ in 0..2000 {
        let entity = ent(rng.gen_range(0..CAPACITY));
        if let Some(value) = expected.remove(&entity) {
            assert_eq!(storage.remove(entity), Ok(value));
        } else {
            let value: u64 = rng.gen();
            storage.insert(entity, value).unwrap();
            expected.insert(entity, value);
        }

        assert_eq!(storage.len(), expected.len());
    }

    assert_dense(&storage);
    for (entity, value) in &expected {
        assert_eq!(storage.get(*entity), Ok(value));
    }
}
