//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with standardized naming conventions.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};

/// Metrics prefix for all litgraph metrics
pub const METRICS_PREFIX: &str = "litgraph";

/// Register all metric descriptions
pub fn register_metrics() {
    // Upstream call metrics
    describe_counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total requests to the knowledge-graph service"
    );

    describe_histogram!(
        format!("{}_upstream_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Knowledge-graph request latency in seconds"
    );

    describe_counter!(
        format!("{}_upstream_errors_total", METRICS_PREFIX),
        Unit::Count,
        "Total failed knowledge-graph requests"
    );

    // Graph assembly metrics
    describe_counter!(
        format!("{}_graphs_built_total", METRICS_PREFIX),
        Unit::Count,
        "Total graphs assembled"
    );

    describe_histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "End-to-end graph assembly latency in seconds"
    );

    describe_gauge!(
        format!("{}_graph_nodes_count", METRICS_PREFIX),
        Unit::Count,
        "Nodes in the most recently assembled graph"
    );

    describe_gauge!(
        format!("{}_graph_edges_count", METRICS_PREFIX),
        Unit::Count,
        "Edges in the most recently assembled graph"
    );

    // Example cache metrics
    describe_counter!(
        format!("{}_cache_hits_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache hits"
    );

    describe_counter!(
        format!("{}_cache_misses_total", METRICS_PREFIX),
        Unit::Count,
        "Total cache misses"
    );

    tracing::info!("Metrics registered");
}

/// Record an upstream call to the knowledge-graph service
pub fn record_upstream(endpoint: &str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    counter!(
        format!("{}_upstream_requests_total", METRICS_PREFIX),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    if success {
        histogram!(
            format!("{}_upstream_duration_seconds", METRICS_PREFIX),
            "endpoint" => endpoint.to_string()
        )
        .record(duration_secs);
    } else {
        counter!(
            format!("{}_upstream_errors_total", METRICS_PREFIX),
            "endpoint" => endpoint.to_string()
        )
        .increment(1);
    }
}

/// Record a completed graph assembly
pub fn record_graph_build(mode: &str, nodes: usize, edges: usize, duration_secs: f64) {
    counter!(
        format!("{}_graphs_built_total", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .increment(1);

    histogram!(
        format!("{}_graph_build_duration_seconds", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .record(duration_secs);

    gauge!(
        format!("{}_graph_nodes_count", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .set(nodes as f64);

    gauge!(
        format!("{}_graph_edges_count", METRICS_PREFIX),
        "mode" => mode.to_string()
    )
    .set(edges as f64);
}

/// Record example-cache usage
pub fn record_cache(hit: bool, cache_name: &str) {
    if hit {
        counter!(
            format!("{}_cache_hits_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    } else {
        counter!(
            format!("{}_cache_misses_total", METRICS_PREFIX),
            "cache" => cache_name.to_string()
        )
        .increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_helpers_do_not_panic() {
        // No recorder installed in tests; calls must still be safe.
        record_upstream("interpret", 0.05, true);
        record_upstream("evaluate", 0.2, false);
        record_graph_build("publications", 30, 12, 1.2);
        record_cache(true, "example");
        record_cache(false, "example");
    }
}
