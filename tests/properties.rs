use proptest::collection::vec;
use proptest::prelude::*;
use string_ring::Queue;

fn values() -> impl Strategy<Value = Vec<String>> {
    vec("[a-d]{0,3}", 0..48)
}

fn contents(queue: &Queue) -> Vec<String> {
    assert!(queue.is_well_formed());
    queue.iter().map(str::to_owned).collect()
}

proptest! {
    #[test]
    fn sort_orders_and_is_idempotent(input in values()) {
        let mut queue = Queue::from_values(&input).unwrap();
        queue.sort();
        let sorted = contents(&queue);
        prop_assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]));

        let mut expected = input.clone();
        expected.sort();
        prop_assert_eq!(&sorted, &expected);

        queue.sort();
        prop_assert_eq!(contents(&queue), sorted);
    }

    #[test]
    fn reverse_is_self_inverse(input in values()) {
        let mut queue = Queue::from_values(&input).unwrap();
        queue.reverse();
        let reversed: Vec<String> = input.iter().rev().cloned().collect();
        prop_assert_eq!(contents(&queue), reversed);
        queue.reverse();
        prop_assert_eq!(contents(&queue), input);
    }

    #[test]
    fn size_counts_insertions_and_removals(input in values(), removals in 0_usize..64) {
        let mut queue = Queue::new();
        for (i, value) in input.iter().enumerate() {
            if i % 3 == 0 {
                queue.insert_head(value).unwrap();
            } else {
                queue.insert_tail(value).unwrap();
            }
        }
        let removals = removals.min(input.len());
        for i in 0..removals {
            let removed = if i % 2 == 0 { queue.remove_head() } else { queue.remove_tail() };
            prop_assert!(removed.is_some());
        }
        prop_assert_eq!(queue.size(), input.len() - removals);
        prop_assert_eq!(queue.iter().count(), queue.size());
        prop_assert!(queue.is_well_formed());
    }

    #[test]
    fn delete_middle_removes_floor_half(input in values()) {
        prop_assume!(!input.is_empty());
        let mut queue = Queue::from_values(&input).unwrap();
        prop_assert!(queue.delete_middle());
        let mut expected = input.clone();
        expected.remove(input.len() / 2);
        prop_assert_eq!(contents(&queue), expected);
    }

    #[test]
    fn delete_duplicates_keeps_unique_values(input in values()) {
        let mut queue = Queue::from_values(&input).unwrap();
        queue.sort();
        queue.delete_duplicates();

        let mut sorted = input.clone();
        sorted.sort();
        let expected: Vec<String> = sorted
            .iter()
            .filter(|value| sorted.iter().filter(|other| other == value).count() == 1)
            .cloned()
            .collect();
        prop_assert_eq!(contents(&queue), expected);
    }

    #[test]
    fn swap_pairs_swaps_adjacent(input in values()) {
        let mut queue = Queue::from_values(&input).unwrap();
        queue.swap_pairs();
        let mut expected = input.clone();
        for pair in expected.chunks_mut(2) {
            pair.reverse();
        }
        prop_assert_eq!(contents(&queue), expected);
    }

    #[test]
    fn merge_of_sorted_queues_is_sorted(mut left in values(), mut right in values()) {
        left.sort();
        right.sort();
        let mut queue = Queue::from_values(&left).unwrap();
        queue.merge(Queue::from_values(&right).unwrap());

        let mut expected = [left, right].concat();
        expected.sort();
        prop_assert_eq!(contents(&queue), expected);
    }
}

#[test]
fn merge_into_empty_queue_takes_everything() {
    let mut queue = Queue::new();
    queue.merge(Queue::from_values(["a", "b", "c"]).unwrap());
    assert_eq!(contents(&queue), ["a", "b", "c"]);
    assert_eq!(queue.size(), 3);
}
