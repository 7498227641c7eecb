//! Property-based tests for the inheritance hierarchy.
//!
//! Trees are generated so that every node's parent is either `Object` or an
//! earlier node, which keeps them acyclic by construction; the join and
//! subtype laws must then hold for any pair of declared classes.

use proptest::prelude::*;

use ceres::hierarchy::ClassHierarchy;
use ceres::types::Ty;

fn class(i: usize) -> Ty {
    Ty::Class(format!("C{i}"))
}

fn tree_of(seed: &[u8]) -> ClassHierarchy {
    let mut h = ClassHierarchy::new();
    for (i, &s) in seed.iter().enumerate() {
        let pick = (s as usize) % (i + 1);
        let parent = if pick == i { Ty::Object } else { class(pick) };
        h.register(&class(i), parent);
    }
    h
}

proptest! {
    #[test]
    fn generated_trees_validate(seed in prop::collection::vec(any::<u8>(), 1..12)) {
        prop_assert_eq!(tree_of(&seed).validate(), Ok(()));
    }

    #[test]
    fn every_class_descends_from_object(
        seed in prop::collection::vec(any::<u8>(), 1..12),
        pick in any::<u8>(),
    ) {
        let h = tree_of(&seed);
        let t = class((pick as usize) % seed.len());
        prop_assert!(h.is_subtype(&t, &Ty::Object).unwrap());
    }

    #[test]
    fn join_of_a_singleton_is_itself(
        seed in prop::collection::vec(any::<u8>(), 1..12),
        pick in any::<u8>(),
    ) {
        let h = tree_of(&seed);
        let t = class((pick as usize) % seed.len());
        prop_assert_eq!(h.join(std::slice::from_ref(&t)).unwrap(), t);
    }

    #[test]
    fn join_is_symmetric_and_bounds_both_sides(
        seed in prop::collection::vec(any::<u8>(), 1..12),
        a_pick in any::<u8>(),
        b_pick in any::<u8>(),
    ) {
        let h = tree_of(&seed);
        let a = class((a_pick as usize) % seed.len());
        let b = class((b_pick as usize) % seed.len());

        let ab = h.join(&[a.clone(), b.clone()]).unwrap();
        let ba = h.join(&[b.clone(), a.clone()]).unwrap();
        prop_assert_eq!(&ab, &ba);

        // the join is an ancestor of both inputs
        prop_assert!(h.is_subtype(&a, &ab).unwrap());
        prop_assert!(h.is_subtype(&b, &ab).unwrap());

        // and joining an input with the result is absorbing
        prop_assert_eq!(h.join(&[a.clone(), ab.clone()]).unwrap(), ab.clone());
    }

    #[test]
    fn object_absorbs_any_join(
        seed in prop::collection::vec(any::<u8>(), 1..12),
        pick in any::<u8>(),
    ) {
        let h = tree_of(&seed);
        let t = class((pick as usize) % seed.len());
        prop_assert_eq!(h.join(&[t, Ty::Object]).unwrap(), Ty::Object);
    }
}
