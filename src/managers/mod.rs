// tabkeeper state managers
// Managers handle stateful tab concerns: the in-memory tab strip and the activation observer.

pub mod activation_observer;
pub mod tab_manager;
