//! Property-based tests checking the deque against `VecDeque`.
//!
//! Random operation sequences are applied to both containers, and every
//! observable result must agree.

use block_deque::{Config, Deque, DequeError};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    /// insert before the element at `index % (len + 1)`
    Insert(usize, i32),
    /// erase the element at `index % len`
    Erase(usize),
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::PushFront),
        4 => any::<i32>().prop_map(Op::PushBack),
        2 => Just(Op::PopFront),
        2 => Just(Op::PopBack),
        4 => (any::<usize>(), any::<i32>()).prop_map(|(index, value)| Op::Insert(index, value)),
        3 => any::<usize>().prop_map(Op::Erase),
        1 => Just(Op::Clear),
    ]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (2usize..64, 1usize..8).prop_map(|(threshold, block_size)| {
        Config::new()
            .with_initial_threshold(threshold)
            .with_initial_block_size(block_size)
    })
}

fn apply(deque: &mut Deque<i32>, model: &mut VecDeque<i32>, op: Op) {
    match op {
        Op::PushFront(value) => {
            deque.push_front(value);
            model.push_front(value);
        }
        Op::PushBack(value) => {
            deque.push_back(value);
            model.push_back(value);
        }
        Op::PopFront => {
            assert_eq!(
                deque.pop_front().ok(),
                model.pop_front(),
                "pop_front disagrees"
            );
        }
        Op::PopBack => {
            assert_eq!(deque.pop_back().ok(), model.pop_back(), "pop_back disagrees");
        }
        Op::Insert(index, value) => {
            let index = index % (model.len() + 1);
            let pos = deque.offset(deque.begin(), index as isize).unwrap();
            let pos = deque.insert(pos, value).unwrap();
            model.insert(index, value);
            assert_eq!(deque.get(pos), Ok(&value));
            assert_eq!(deque.distance(deque.begin(), pos), Ok(index as isize));
        }
        Op::Erase(index) => {
            if model.is_empty() {
                assert_eq!(deque.erase(deque.begin()), Err(DequeError::BadPosition));
                return;
            }
            let index = index % model.len();
            let pos = deque.offset(deque.begin(), index as isize).unwrap();
            let next = deque.erase(pos).unwrap();
            model.remove(index);
            assert_eq!(deque.get(next).ok(), model.get(index));
        }
        Op::Clear => {
            deque.clear();
            model.clear();
            assert_eq!(deque.begin(), deque.end());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deque_matches_vec_deque(
        config in config_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..400),
    ) {
        let mut deque = Deque::with_config(config).unwrap();
        let mut model = VecDeque::new();
        for op in ops {
            apply(&mut deque, &mut model, op);
            prop_assert_eq!(deque.len(), model.len());
            prop_assert_eq!(deque.front().ok(), model.front());
            prop_assert_eq!(deque.back().ok(), model.back());
        }
        prop_assert!(deque.iter().eq(model.iter()));
        prop_assert!(deque.iter().rev().eq(model.iter().rev()));
        for (index, value) in model.iter().enumerate() {
            prop_assert_eq!(deque.at(index), Ok(value));
        }
        prop_assert_eq!(
            deque.at(model.len()),
            Err(DequeError::IndexOutOfBound { index: model.len(), len: model.len() })
        );
    }

    #[test]
    fn offset_and_distance_agree(
        values in prop::collection::vec(any::<i32>(), 0..300),
        a in any::<usize>(),
        b in any::<usize>(),
    ) {
        let deque = Deque::from_iter(values.iter().copied());
        let len = values.len();
        let a = a % (len + 1);
        let b = b % (len + 1);
        let from = deque.offset(deque.begin(), a as isize).unwrap();
        let to = deque.offset(deque.end(), b as isize - len as isize).unwrap();
        let n = deque.distance(from, to).unwrap();
        prop_assert_eq!(n, b as isize - a as isize);
        prop_assert_eq!(deque.offset(from, n), Ok(to));
        prop_assert_eq!(deque.distance(to, from), Ok(-n));
        prop_assert_eq!(deque.get(from).ok(), values.get(a));
    }

    #[test]
    fn iterators_agree_from_both_ends(
        values in prop::collection::vec(any::<i32>(), 0..300),
        split in any::<usize>(),
    ) {
        let mut deque = Deque::from_iter(values.iter().copied());
        let split = split % (values.len() + 1);

        let mut iter = deque.iter();
        let front: Vec<i32> = iter.by_ref().take(split).copied().collect();
        let mut back: Vec<i32> = iter.rev().copied().collect();
        back.reverse();
        prop_assert_eq!(&front[..], &values[..split]);
        prop_assert_eq!(&back[..], &values[split..]);

        deque.iter_mut().for_each(|value| *value = value.wrapping_add(1));
        let bumped: Vec<i32> = values.iter().map(|value| value.wrapping_add(1)).collect();
        prop_assert_eq!(&Vec::from_iter(deque.clone()), &bumped);
        prop_assert_eq!(Vec::from_iter(deque.into_iter().rev()), bumped.into_iter().rev().collect::<Vec<_>>());
    }

    #[test]
    fn clone_preserves_content(values in prop::collection::vec(any::<i32>(), 0..300)) {
        let deque = Deque::from_iter(values.iter().copied());
        let copy = deque.clone();
        prop_assert_eq!(&copy, &deque);
        prop_assert_eq!(copy.block_count(), deque.block_count());
        prop_assert!(copy.iter().eq(values.iter()));
    }
}
