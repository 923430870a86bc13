//! Optional metrics instrumentation for tally.
//!
//! When the `observe` feature is enabled, the projector emits counters,
//! histograms and gauges via the [`metrics`] crate. A downstream
//! application must install a metrics recorder to collect them.
//!
//! Without the feature every function here is a zero-cost no-op.

/// Record one applied event.
///
/// - `tally.events.applied_total` – counter with `event` label
/// - `tally.events.apply_duration_seconds` – histogram
#[inline]
pub fn record_event_applied(event: &'static str, duration: std::time::Duration) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("tally.events.applied_total", "event" => event).increment(1);
        metrics::histogram!("tally.events.apply_duration_seconds").record(duration.as_secs_f64());
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (event, duration);
    }
}

/// Record records evicted by a rotation pass.
///
/// - `tally.rotation.evicted_total` – counter with `entity` label
#[inline]
pub fn record_rotation(entity: &'static str, evicted: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("tally.rotation.evicted_total", "entity" => entity)
            .increment(evicted as u64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (entity, evicted);
    }
}

/// Record a claim or expiry that matched no prize in the scan window.
///
/// - `tally.correlation.unmatched_total` – counter with `event` label
#[inline]
pub fn record_unmatched_correlation(event: &'static str) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("tally.correlation.unmatched_total", "event" => event).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = event;
    }
}

/// Set the number of live Transaction records.
///
/// - `tally.transactions.live` – gauge
#[inline]
pub fn set_live_transactions(count: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::gauge!("tally.transactions.live").set(count as f64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = count;
    }
}
