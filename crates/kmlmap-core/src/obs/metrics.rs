use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for mapping operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) types: BTreeMap<String, TypeCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Descriptor tables
    pub descriptors_built: u64,

    // Engine entrypoints
    pub serialize_calls: u64,
    pub deserialize_calls: u64,

    // Volume
    pub entries_written: u64,
    pub warnings_emitted: u64,

    // Ownership
    pub ownership_rejections: u64,
}

///
/// TypeCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TypeCounters {
    pub properties: u64,
    pub serialize_calls: u64,
    pub deserialize_calls: u64,
    pub entries_written: u64,
    pub warnings_emitted: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    pub(crate) ops: EventOps,
    pub(crate) types: BTreeMap<String, TypeCounters>,
}

impl EventReport {
    /// Counters for one modeled type, by element name.
    #[must_use]
    pub fn for_type(&self, element: &str) -> Option<&TypeCounters> {
        self.types.get(element)
    }
}

#[must_use]
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        types: m.types.clone(),
    })
}
