/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crate::error::ErrorKind;
use crate::operation::report::Report;

/// A monotonically increasing numeric value.
#[derive(Debug, Clone, Default)]
pub struct IncreasingCounter {
    value: Arc<AtomicU64>,
}

impl IncreasingCounter {
    /// Create a new counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter by the given amount and return the new value.
    pub fn increment(&self, amount: u64) -> u64 {
        self.value.fetch_add(amount, Ordering::Relaxed) + amount
    }

    /// Get the current value of the counter.
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// A value that can increase or decrease over time.
/// Minimum value is 0.
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    value: Arc<AtomicU64>,
}

impl Gauge {
    /// Create a new gauge starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the gauge by the given amount and return the new value.
    pub fn increment(&self, amount: u64) -> u64 {
        self.value.fetch_add(amount, Ordering::Relaxed) + amount
    }

    /// Decrement the gauge by the given amount and return the new value.
    /// If the decrement would cause underflow, the gauge is clamped at 0.
    pub fn decrement(&self, amount: u64) -> u64 {
        let previous = self
            .value
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(amount))
            })
            .unwrap_or_default();
        previous.saturating_sub(amount)
    }

    /// Get the current value of the gauge.
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Client-level counters aggregated across all invocations
#[derive(Debug, Clone, Default)]
pub struct InvocationMetrics {
    started: IncreasingCounter,
    succeeded: IncreasingCounter,
    failed: IncreasingCounter,
    failed_by_kind: [IncreasingCounter; 6],
    in_flight: Gauge,
}

impl InvocationMetrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Count a started invocation. It stays in flight until the returned guard is dropped.
    pub(crate) fn record_started(&self) -> InFlight {
        self.started.increment(1);
        self.in_flight.increment(1);
        InFlight {
            gauge: self.in_flight.clone(),
        }
    }

    pub(crate) fn record_finished(&self, report: &Report) {
        match report.error_kind() {
            None => {
                self.succeeded.increment(1);
            }
            Some(kind) => {
                self.failed.increment(1);
                self.failed_by_kind[kind.index()].increment(1);
            }
        }
    }

    /// Number of invocations started
    pub fn invocations_started(&self) -> u64 {
        self.started.value()
    }

    /// Number of invocations that produced a success report
    pub fn invocations_succeeded(&self) -> u64 {
        self.succeeded.value()
    }

    /// Number of invocations that produced a failure report
    pub fn invocations_failed(&self) -> u64 {
        self.failed.value()
    }

    /// Number of failures classified as `kind`
    pub fn failures_of_kind(&self, kind: ErrorKind) -> u64 {
        self.failed_by_kind[kind.index()].value()
    }

    /// Number of invocations currently running
    pub fn invocations_in_flight(&self) -> u64 {
        self.in_flight.value()
    }
}

/// Marks one invocation as in flight for as long as it is alive
#[derive(Debug)]
pub(crate) struct InFlight {
    gauge: Gauge,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.gauge.decrement(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{OperationDescriptor, OperationResult, Response};

    #[test]
    fn test_counter() {
        let counter = IncreasingCounter::new();
        assert_eq!(counter.value(), 0);
        assert_eq!(counter.increment(5), 5);
        assert_eq!(counter.increment(3), 8);
        assert_eq!(counter.value(), 8);
    }

    #[test]
    fn test_gauge_clamps_at_zero() {
        let gauge = Gauge::new();
        assert_eq!(gauge.increment(2), 2);
        assert_eq!(gauge.decrement(1), 1);
        assert_eq!(gauge.decrement(5), 0);
        assert_eq!(gauge.value(), 0);
    }

    #[test]
    fn test_invocation_metrics() {
        let descriptor = OperationDescriptor::builder("DeleteBucket")
            .build()
            .unwrap();
        let metrics = InvocationMetrics::new();

        let first = metrics.record_started();
        let second = metrics.record_started();
        assert_eq!(2, metrics.invocations_in_flight());

        metrics.record_finished(&Report::new(
            &descriptor,
            OperationResult::Success {
                response: Response::new(),
            },
        ));
        metrics.record_finished(&Report::new(
            &descriptor,
            OperationResult::Failure {
                kind: ErrorKind::Throttled,
                message: "SlowDown".to_owned(),
                retriable: true,
            },
        ));

        assert_eq!(2, metrics.invocations_started());
        assert_eq!(1, metrics.invocations_succeeded());
        assert_eq!(1, metrics.invocations_failed());
        assert_eq!(1, metrics.failures_of_kind(ErrorKind::Throttled));
        assert_eq!(0, metrics.failures_of_kind(ErrorKind::NotFound));
        assert_eq!(2, metrics.invocations_in_flight());

        drop(first);
        drop(second);
        assert_eq!(0, metrics.invocations_in_flight());
    }

    #[test]
    fn test_in_flight_released_without_report() {
        let metrics = InvocationMetrics::new();
        let in_flight = metrics.record_started();
        assert_eq!(1, metrics.invocations_in_flight());

        drop(in_flight);
        assert_eq!(1, metrics.invocations_started());
        assert_eq!(0, metrics.invocations_succeeded() + metrics.invocations_failed());
        assert_eq!(0, metrics.invocations_in_flight());
    }
}
