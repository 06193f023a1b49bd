use proptest::prelude::*;
use shroud_core::{scan, Span};

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec![
            "123 Main Street, Springfield, IL 62704",
            "PO Box 4521, Reno, NV 89501",
            "jane@example.com",
            "(555) 123-4567",
            "555-123-4567",
            "123-45-6789",
            "12 Oak Ave",
            "from Austin, Texas",
            "zip code 60614",
            "London SW1A 1AA, UK",
            "Canada",
            "03/04/2021",
        ])
        .prop_map(String::from),
        "[a-zA-Z0-9 ,.#@()/-]{0,24}",
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..10).prop_map(|parts| parts.join(" "))
}

proptest! {
    #[test]
    fn detections_are_pairwise_disjoint(text in document()) {
        let found = scan(&text);
        for (i, a) in found.iter().enumerate() {
            for b in &found[i + 1..] {
                prop_assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn detections_are_in_bounds_and_scored(text in document()) {
        for d in scan(&text) {
            prop_assert!(d.start < d.end && d.end <= text.len());
            prop_assert_eq!(&text[d.start..d.end], d.original_text.as_str());
            prop_assert!((0.0..=1.0).contains(&d.confidence));
        }
    }

    #[test]
    fn scanning_is_deterministic(text in document()) {
        prop_assert_eq!(scan(&text), scan(&text));
    }

    #[test]
    fn confidence_order_is_descending(text in document()) {
        let found = scan(&text);
        for pair in found.windows(2) {
            prop_assert!(pair[0].confidence >= pair[1].confidence);
        }
    }
}
