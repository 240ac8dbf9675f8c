//! Planning the child-row changes for an update.
//!
//! Stored and incoming player modes are two sets keyed by mode name. Names
//! only in storage are deleted, names only in the incoming list are inserted,
//! and names in both are updated when their player counts differ.

use std::collections::{HashMap, HashSet};

use gamedata::PlayerMode;

/// Child-row changes that turn the stored modes into the incoming ones.
///
/// Apply `deletes` first, then `updates`, then `inserts`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan<'a> {
    pub deletes: Vec<String>,
    pub updates: Vec<&'a PlayerMode>,
    pub inserts: Vec<&'a PlayerMode>,
    pub unchanged: usize,
}

impl ReconcilePlan<'_> {
    #[cfg(test)]
    pub fn is_noop(&self) -> bool {
        self.deletes.is_empty() && self.updates.is_empty() && self.inserts.is_empty()
    }
}

/// Diff `stored` against `incoming`.
///
/// `incoming` must not repeat a mode name; callers reject such lists before
/// planning. Deletes follow stored order, updates and inserts follow incoming
/// order.
pub fn plan<'a>(stored: &[PlayerMode], incoming: &'a [PlayerMode]) -> ReconcilePlan<'a> {
    let stored_by_mode: HashMap<&str, &PlayerMode> =
        stored.iter().map(|m| (m.mode.as_str(), m)).collect();
    let incoming_modes: HashSet<&str> = incoming.iter().map(|m| m.mode.as_str()).collect();

    let mut plan = ReconcilePlan {
        deletes: stored
            .iter()
            .filter(|m| !incoming_modes.contains(m.mode.as_str()))
            .map(|m| m.mode.clone())
            .collect(),
        ..ReconcilePlan::default()
    };

    for mode in incoming {
        match stored_by_mode.get(mode.mode.as_str()) {
            Some(&current) if current == mode => plan.unchanged += 1,
            Some(_) => plan.updates.push(mode),
            None => plan.inserts.push(mode),
        }
    }

    plan
}
