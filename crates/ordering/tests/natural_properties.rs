use std::cmp::Ordering;

use pageshot_ordering::{natural_cmp, natural_sort};
use proptest::prelude::*;

fn filename() -> impl Strategy<Value = String> {
    "[a-cA-C0-9_.-]{0,12}"
}

proptest! {
    #[test]
    fn sorting_is_idempotent(mut names in prop::collection::vec(filename(), 0..24)) {
        natural_sort(&mut names);
        let once = names.clone();
        natural_sort(&mut names);
        prop_assert_eq!(once, names);
    }

    #[test]
    fn comparison_is_antisymmetric(a in filename(), b in filename()) {
        prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
    }

    #[test]
    fn comparison_is_transitive(a in filename(), b in filename(), c in filename()) {
        let mut trio = vec![a, b, c];
        trio.sort_by(|x, y| natural_cmp(x, y));
        prop_assert_ne!(natural_cmp(&trio[0], &trio[2]), Ordering::Greater);
    }

    #[test]
    fn sorted_output_is_a_permutation(names in prop::collection::vec(filename(), 0..24)) {
        let mut sorted = names.clone();
        natural_sort(&mut sorted);

        let mut left = names;
        let mut right = sorted.clone();
        left.sort();
        right.sort();
        prop_assert_eq!(left, right);

        for pair in sorted.windows(2) {
            prop_assert_ne!(natural_cmp(&pair[0], &pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn numeric_suffix_orders_by_value(x in 0u32..100_000, y in 0u32..100_000) {
        let a = format!("img{x}.png");
        let b = format!("img{y}.png");
        prop_assert_eq!(natural_cmp(&a, &b), x.cmp(&y));
    }
}

#[test]
fn img2_sorts_before_img10_in_any_list() {
    let mut names = vec![
        "img10.png".to_string(),
        "cover.png".to_string(),
        "img2.png".to_string(),
        "img1.png".to_string(),
    ];
    natural_sort(&mut names);

    let pos2 = names.iter().position(|n| n == "img2.png").unwrap();
    let pos10 = names.iter().position(|n| n == "img10.png").unwrap();
    assert!(pos2 < pos10);
}
