//! Prometheus metrics (lock-free atomics, zero allocation on hot path).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    // --- Session lifecycle ---
    pub connects_total: AtomicU64,
    pub disconnects_total: AtomicU64,

    // --- Balance reads ---
    pub balance_reads_total: AtomicU64,
    pub balance_read_errors: AtomicU64,

    // --- Mint writes ---
    pub mint_total: AtomicU64,
    pub mint_success: AtomicU64,
    pub mint_error: AtomicU64,
    pub mint_duration_us_sum: AtomicU64,
    pub mint_duration_us_max: AtomicU64,

    // --- RPC ---
    pub rpc_failovers: AtomicU64,
    pub rpc_errors: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            connects_total: AtomicU64::new(0),
            disconnects_total: AtomicU64::new(0),
            balance_reads_total: AtomicU64::new(0),
            balance_read_errors: AtomicU64::new(0),
            mint_total: AtomicU64::new(0),
            mint_success: AtomicU64::new(0),
            mint_error: AtomicU64::new(0),
            mint_duration_us_sum: AtomicU64::new(0),
            mint_duration_us_max: AtomicU64::new(0),
            rpc_failovers: AtomicU64::new(0),
            rpc_errors: AtomicU64::new(0),
        }
    }

    pub fn record_mint_duration(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.mint_duration_us_sum.fetch_add(us, Ordering::Relaxed);
        // CAS loop for max tracking
        let mut cur = self.mint_duration_us_max.load(Ordering::Relaxed);
        while us > cur {
            match self.mint_duration_us_max.compare_exchange_weak(
                cur,
                us,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => cur = actual,
            }
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, session_connected: bool) -> String {
        let connects = self.connects_total.load(Ordering::Relaxed);
        let disconnects = self.disconnects_total.load(Ordering::Relaxed);
        let balance_reads = self.balance_reads_total.load(Ordering::Relaxed);
        let balance_errors = self.balance_read_errors.load(Ordering::Relaxed);
        let mint_total = self.mint_total.load(Ordering::Relaxed);
        let mint_success = self.mint_success.load(Ordering::Relaxed);
        let mint_error = self.mint_error.load(Ordering::Relaxed);
        let mint_dur_sum = self.mint_duration_us_sum.load(Ordering::Relaxed);
        let mint_dur_max = self.mint_duration_us_max.swap(0, Ordering::Relaxed);
        let rpc_failovers = self.rpc_failovers.load(Ordering::Relaxed);
        let rpc_errors = self.rpc_errors.load(Ordering::Relaxed);
        let connected = u8::from(session_connected);

        // Convert μs to seconds for Prometheus conventions
        let mint_dur_sum_s = mint_dur_sum as f64 / 1_000_000.0;
        let mint_dur_max_s = mint_dur_max as f64 / 1_000_000.0;

        format!(
            "\
# HELP gateway_connects_total Session connect requests.\n\
# TYPE gateway_connects_total counter\n\
gateway_connects_total {connects}\n\
# HELP gateway_disconnects_total Session disconnect requests.\n\
# TYPE gateway_disconnects_total counter\n\
gateway_disconnects_total {disconnects}\n\
# HELP gateway_balance_reads_total Pass balance view calls attempted.\n\
# TYPE gateway_balance_reads_total counter\n\
gateway_balance_reads_total {balance_reads}\n\
# HELP gateway_balance_read_errors_total Balance view calls that failed.\n\
# TYPE gateway_balance_read_errors_total counter\n\
gateway_balance_read_errors_total {balance_errors}\n\
# HELP gateway_mint_total Sponsored mint invocations.\n\
# TYPE gateway_mint_total counter\n\
gateway_mint_total {mint_total}\n\
# HELP gateway_mint_success_total Mints confirmed on chain.\n\
# TYPE gateway_mint_success_total counter\n\
gateway_mint_success_total {mint_success}\n\
# HELP gateway_mint_error_total Mints that failed or were rejected.\n\
# TYPE gateway_mint_error_total counter\n\
gateway_mint_error_total {mint_error}\n\
# HELP gateway_mint_duration_seconds_sum Total mint handler time (seconds).\n\
# TYPE gateway_mint_duration_seconds_sum counter\n\
gateway_mint_duration_seconds_sum {mint_dur_sum_s:.6}\n\
# HELP gateway_mint_duration_seconds_max Max mint handler time since last scrape (seconds).\n\
# TYPE gateway_mint_duration_seconds_max gauge\n\
gateway_mint_duration_seconds_max {mint_dur_max_s:.6}\n\
# HELP gateway_rpc_failovers_total RPC primary-to-fallback failovers.\n\
# TYPE gateway_rpc_failovers_total counter\n\
gateway_rpc_failovers_total {rpc_failovers}\n\
# HELP gateway_rpc_errors_total RPC errors.\n\
# TYPE gateway_rpc_errors_total counter\n\
gateway_rpc_errors_total {rpc_errors}\n\
# HELP gateway_session_connected Whether an identity is currently connected.\n\
# TYPE gateway_session_connected gauge\n\
gateway_session_connected {connected}\n"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_session_gauge() {
        let metrics = Metrics::new();
        metrics.connects_total.fetch_add(2, Ordering::Relaxed);
        let out = metrics.render(true);
        assert!(out.contains("gateway_connects_total 2"));
        assert!(out.contains("gateway_session_connected 1"));
        let out = metrics.render(false);
        assert!(out.contains("gateway_session_connected 0"));
    }

    #[test]
    fn mint_duration_tracks_max() {
        let metrics = Metrics::new();
        let start = Instant::now();
        metrics.record_mint_duration(start);
        assert!(metrics.mint_duration_us_sum.load(Ordering::Relaxed) < 1_000_000);
    }
}
