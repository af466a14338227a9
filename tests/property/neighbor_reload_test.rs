//! Property-based tests for the neighbor reload rule on the in-memory host.
//!
//! For any window layout and any activated tab, exactly one reload happens
//! when the tab at `index + 1` is discarded, and none otherwise.

use std::sync::Arc;

use proptest::prelude::*;
use tabkeeper::host::TabHost;
use tabkeeper::managers::activation_observer::{ActivationObserver, ActivationObserverTrait, Observation};
use tabkeeper::managers::tab_manager::{TabManager, TabManagerTrait};

#[derive(Debug, Clone)]
struct Layout {
    discarded: Vec<bool>,
    activate: usize,
}

fn arb_layout() -> impl Strategy<Value = Layout> {
    prop::collection::vec(any::<bool>(), 1..10).prop_flat_map(|discarded| {
        let len = discarded.len();
        (Just(discarded), 0..len).prop_map(|(discarded, activate)| Layout { discarded, activate })
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reload_iff_right_neighbor_discarded(layout in arb_layout()) {
        let (reloads, outcomes, expected) = runtime().block_on(async {
            let host = Arc::new(TabManager::new());
            let window = host.open_window();
            let ids: Vec<u32> = (0..layout.discarded.len())
                .map(|_| host.create_tab(window, None, false).unwrap())
                .collect();

            let observer = ActivationObserver::new(
                Arc::clone(&host) as Arc<dyn TabHost>,
                tokio::runtime::Handle::current(),
            );
            observer.enable();
            let _ = observer.settle().await;

            for (id, discard) in ids.iter().zip(&layout.discarded) {
                if *discard {
                    // The active tab refuses to be discarded; that is part of the layout.
                    let _ = host.discard_tab(*id);
                }
            }
            let expected = ids
                .get(layout.activate + 1)
                .filter(|id| host.find_tab(**id).map(|t| t.discarded).unwrap_or(false))
                .copied();

            host.switch_tab(ids[layout.activate]).unwrap();
            let outcomes = observer.settle().await;
            (host.reload_history(), outcomes, expected)
        });

        prop_assert_eq!(outcomes.len(), 1);
        match expected {
            Some(id) => {
                prop_assert_eq!(reloads, vec![id]);
                prop_assert_eq!(&outcomes[0], &Observation::Reloaded(id));
            }
            None => {
                prop_assert!(reloads.is_empty());
                prop_assert_eq!(&outcomes[0], &Observation::NoDiscardedNeighbor);
            }
        }
    }

    #[test]
    fn disabled_observer_never_reloads(layout in arb_layout()) {
        let reloads = runtime().block_on(async {
            let host = Arc::new(TabManager::new());
            let window = host.open_window();
            let ids: Vec<u32> = (0..layout.discarded.len())
                .map(|_| host.create_tab(window, None, false).unwrap())
                .collect();
            let observer = ActivationObserver::new(
                Arc::clone(&host) as Arc<dyn TabHost>,
                tokio::runtime::Handle::current(),
            );
            observer.enable();
            let _ = observer.settle().await;
            observer.disable();

            for (id, discard) in ids.iter().zip(&layout.discarded) {
                if *discard {
                    let _ = host.discard_tab(*id);
                }
            }
            host.switch_tab(ids[layout.activate]).unwrap();
            let _ = observer.settle().await;
            host.reload_history()
        });

        prop_assert!(reloads.is_empty());
    }
}
