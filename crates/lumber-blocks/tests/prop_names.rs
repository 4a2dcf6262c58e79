use lumber_blocks::{Namespaces, Phase, is_leaf, is_loggable};
use proptest::prelude::*;

fn arb_species() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "oak", "spruce", "birch", "jungle", "acacia", "dark_oak", "mangrove", "cherry",
    ])
    .prop_map(|s| s.to_string())
}

proptest! {
    // Converting a natural log and reverting it lands on the unstripped log.
    #[test]
    fn custom_roundtrip_returns_unstripped_log(sp in arb_species(), stripped in any::<bool>()) {
        let ns = Namespaces::default();
        let vanilla = if stripped {
            format!("minecraft:stripped_{sp}_log")
        } else {
            format!("minecraft:{sp}_log")
        };
        let custom = ns.to_custom(&vanilla);
        prop_assert!(ns.is_custom_log(&custom));
        prop_assert_eq!(ns.to_vanilla(&custom), format!("minecraft:{sp}_log"));
    }

    #[test]
    fn leaves_are_never_loggable(sp in arb_species()) {
        let id = format!("minecraft:{sp}_leaves");
        prop_assert!(is_leaf(&id));
        prop_assert!(!is_loggable(&id));
    }

    // Phase stays inside 0..=4 under any mix of advances and demotions.
    #[test]
    fn phase_walk_stays_bounded(steps in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut p = Phase::ZERO;
        for up in steps {
            p = if up { p.advanced().unwrap_or(p) } else { p.demoted().unwrap_or(p) };
            prop_assert!(p.get() <= Phase::TERMINAL.get());
        }
    }
}

#[test]
fn namespaces_deserialize_with_defaults() {
    let ns: Namespaces = toml::from_str(r#"custom = "lumber:""#).unwrap();
    assert_eq!(ns.custom, "lumber:");
    assert_eq!(ns.vanilla, "minecraft:");
    assert!(ns.is_custom_log("lumber:oak_log"));
}
