//! Metrics sink boundary.
//!
//! Mapping logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    DescriptorBuilt {
        element: &'static str,
        properties: u64,
    },
    SerializeFinish {
        element: &'static str,
        entries: u64,
    },
    DeserializeFinish {
        element: &'static str,
        warnings: u64,
    },
    OwnershipRejected,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default process-local sink that writes into global metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::DescriptorBuilt {
                element,
                properties,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.descriptors_built = m.ops.descriptors_built.saturating_add(1);
                    let entry = m.types.entry(element.to_string()).or_default();
                    entry.properties = properties;
                });
            }

            MetricsEvent::SerializeFinish { element, entries } => {
                metrics::with_state_mut(|m| {
                    m.ops.serialize_calls = m.ops.serialize_calls.saturating_add(1);
                    m.ops.entries_written = m.ops.entries_written.saturating_add(entries);

                    let entry = m.types.entry(element.to_string()).or_default();
                    entry.serialize_calls = entry.serialize_calls.saturating_add(1);
                    entry.entries_written = entry.entries_written.saturating_add(entries);
                });
            }

            MetricsEvent::DeserializeFinish { element, warnings } => {
                metrics::with_state_mut(|m| {
                    m.ops.deserialize_calls = m.ops.deserialize_calls.saturating_add(1);
                    m.ops.warnings_emitted = m.ops.warnings_emitted.saturating_add(warnings);

                    let entry = m.types.entry(element.to_string()).or_default();
                    entry.deserialize_calls = entry.deserialize_calls.saturating_add(1);
                    entry.warnings_emitted = entry.warnings_emitted.saturating_add(warnings);
                });
            }

            MetricsEvent::OwnershipRejected => {
                metrics::with_state_mut(|m| {
                    m.ops.ownership_rejections = m.ops.ownership_rejections.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    // clone out so a sink may itself record without re-borrowing the slot
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        cell::Cell,
        panic::{AssertUnwindSafe, catch_unwind},
    };

    #[derive(Default)]
    struct CountingSink {
        calls: Cell<usize>,
    }

    impl MetricsSink for CountingSink {
        fn record(&self, _: MetricsEvent) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    fn clear_override() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });
    }

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        clear_override();

        let outer = Rc::new(CountingSink::default());
        let inner = Rc::new(CountingSink::default());

        record(MetricsEvent::OwnershipRejected);
        assert_eq!(outer.calls.get(), 0);

        with_metrics_sink(outer.clone(), || {
            record(MetricsEvent::OwnershipRejected);
            assert_eq!(outer.calls.get(), 1);

            with_metrics_sink(inner.clone(), || {
                record(MetricsEvent::OwnershipRejected);
            });

            // inner override was restored to outer
            record(MetricsEvent::OwnershipRejected);
        });

        assert_eq!(outer.calls.get(), 2);
        assert_eq!(inner.calls.get(), 1);

        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_none()));
    }

    #[test]
    fn with_metrics_sink_restores_override_on_panic() {
        clear_override();

        let sink = Rc::new(CountingSink::default());

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(sink.clone(), || {
                record(MetricsEvent::OwnershipRejected);
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();

        assert!(panicked);
        assert_eq!(sink.calls.get(), 1);
        SINK_OVERRIDE.with(|cell| assert!(cell.borrow().is_none()));

        record(MetricsEvent::OwnershipRejected);
        assert_eq!(sink.calls.get(), 1);
    }

    #[test]
    fn global_sink_accumulates_per_type() {
        clear_override();
        metrics_reset_all();

        record(MetricsEvent::DescriptorBuilt {
            element: "Sample",
            properties: 3,
        });
        record(MetricsEvent::SerializeFinish {
            element: "Sample",
            entries: 4,
        });
        record(MetricsEvent::SerializeFinish {
            element: "Sample",
            entries: 2,
        });
        record(MetricsEvent::DeserializeFinish {
            element: "Sample",
            warnings: 1,
        });

        let report = metrics_report();
        assert_eq!(report.ops.descriptors_built, 1);
        assert_eq!(report.ops.serialize_calls, 2);
        assert_eq!(report.ops.entries_written, 6);
        assert_eq!(report.ops.warnings_emitted, 1);

        let sample = report.for_type("Sample").expect("per-type counters");
        assert_eq!(sample.properties, 3);
        assert_eq!(sample.serialize_calls, 2);
        assert_eq!(sample.deserialize_calls, 1);

        metrics_reset_all();
        assert_eq!(metrics_report().ops, metrics::EventOps::default());
    }
}
