//! End-to-end graph assembly pipeline
//!
//! Orchestrates the two-pass protocol: interpret the free-text query,
//! evaluate the selected expression into primary papers, resolve their
//! references in a secondary pass, and assemble the visualization
//! graph. Every stage that can legitimately come up empty terminates
//! the pipeline with an explicit `None` outcome instead of an error.

use crate::academic::AcademicClient;
use crate::config::AcademicConfig;
use crate::errors::Result;
use crate::graph::assemble::{
    build_author_graph, build_publication_graph, disjunction_expr, filter_complete,
    reference_candidates,
};
use crate::graph::model::VisualGraph;
use crate::metrics;
use std::time::Instant;

/// Which of the two assembly variants produced a graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphMode {
    /// Citation graph: primary results plus their references
    Publications,
    /// Co-authorship graph over one bulk evaluation
    Authors,
}

impl GraphMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphMode::Publications => "publications",
            GraphMode::Authors => "authors",
        }
    }
}

/// A fully assembled graph plus the expression that produced it
#[derive(Debug)]
pub struct AssembledGraph {
    pub graph: VisualGraph,
    /// Structured expression the interpreter selected; shown in the page title
    pub expression: String,
    pub mode: GraphMode,
}

/// Query-to-graph pipeline over the knowledge-graph client
#[derive(Debug, Clone)]
pub struct GraphPipeline {
    client: AcademicClient,
    bulk_count: u32,
}

impl GraphPipeline {
    /// Create a pipeline from configuration
    pub fn new(config: &AcademicConfig) -> Result<Self> {
        Ok(Self {
            client: AcademicClient::new(config)?,
            bulk_count: config.bulk_count,
        })
    }

    /// Build the citation graph for a query, requesting up to `n`
    /// primary results. `Ok(None)` means the query produced no usable
    /// data at some stage; it is not a failure.
    pub async fn publication_graph(
        &self,
        query: &str,
        n: u32,
    ) -> Result<Option<AssembledGraph>> {
        let start = Instant::now();

        let interpretation = self.client.interpret(query).await?;
        let Some(expression) = interpretation.expression() else {
            tracing::info!(query, "No usable interpretation");
            return Ok(None);
        };
        let expression = expression.to_string();

        let evaluation = self.client.evaluate(&expression, n).await?;
        let Some(entities) = evaluation.entities else {
            tracing::info!(query, expression, "Expression evaluated to no entities");
            return Ok(None);
        };

        let primary = filter_complete(entities);
        if primary.is_empty() {
            tracing::info!(query, expression, "No complete records survived");
            return Ok(None);
        }

        let candidates = reference_candidates(&primary);
        let secondary = if candidates.is_empty() {
            Vec::new()
        } else {
            // A failed or empty reference resolution is a normal
            // terminal condition; the primary graph still renders.
            match self
                .client
                .evaluate(&disjunction_expr(&candidates), self.bulk_count)
                .await
            {
                Ok(response) => filter_complete(response.entities.unwrap_or_default()),
                Err(e) => {
                    tracing::warn!(error = %e, "Reference resolution failed, rendering primary set only");
                    Vec::new()
                }
            }
        };

        let graph = build_publication_graph(&primary, &secondary);
        self.finish(GraphMode::Publications, query, &graph, start);

        Ok(Some(AssembledGraph {
            graph,
            expression,
            mode: GraphMode::Publications,
        }))
    }

    /// Build the co-authorship graph for a query. Single bulk
    /// evaluation, no secondary pass.
    pub async fn author_graph(&self, query: &str) -> Result<Option<AssembledGraph>> {
        let start = Instant::now();

        let interpretation = self.client.interpret(query).await?;
        let Some(expression) = interpretation.expression() else {
            tracing::info!(query, "No usable interpretation");
            return Ok(None);
        };
        let expression = expression.to_string();

        let evaluation = self.client.evaluate(&expression, self.bulk_count).await?;
        let Some(entities) = evaluation.entities else {
            tracing::info!(query, expression, "Expression evaluated to no entities");
            return Ok(None);
        };

        let papers = filter_complete(entities);
        if papers.is_empty() {
            tracing::info!(query, expression, "No complete records survived");
            return Ok(None);
        }

        let graph = build_author_graph(&papers);
        self.finish(GraphMode::Authors, query, &graph, start);

        Ok(Some(AssembledGraph {
            graph,
            expression,
            mode: GraphMode::Authors,
        }))
    }

    fn finish(&self, mode: GraphMode, query: &str, graph: &VisualGraph, start: Instant) {
        let elapsed = start.elapsed().as_secs_f64();
        metrics::record_graph_build(mode.as_str(), graph.node_count(), graph.edge_count(), elapsed);
        tracing::info!(
            query,
            mode = mode.as_str(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_secs = elapsed,
            "Graph assembled"
        );
    }
}
