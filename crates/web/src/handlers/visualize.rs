//! Graph page handler
//!
//! One endpoint drives both graph variants. The `n` parameter selects
//! between them: a number asks for a citation graph with that many
//! primary results, anything non-numeric asks for the co-authorship
//! graph. The bare landing page is served from a cached render of the
//! default query.

use axum::extract::{Query, State};
use axum::response::Html;
use litgraph_common::errors::Result;
use litgraph_common::metrics;
use serde::Deserialize;

use crate::render;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VisualizeParams {
    pub query: Option<String>,
    pub n: Option<String>,
}

/// Which graph variant the `n` parameter asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Publications(u32),
    Authors,
}

impl Selection {
    /// Value of the form option this selection corresponds to
    fn form_value(&self) -> String {
        match self {
            Selection::Publications(n) => n.to_string(),
            Selection::Authors => "A".to_string(),
        }
    }
}

/// Interpret the raw `n` parameter. Absent means the default citation
/// graph, a number is clamped into the accepted range, and anything
/// that fails to parse selects the co-authorship graph.
fn parse_selection(raw: Option<&str>, default_count: u32, max_count: u32) -> Selection {
    match raw {
        None => Selection::Publications(default_count),
        Some(value) => match value.trim().parse::<i64>() {
            Ok(n) => Selection::Publications(n.clamp(1, i64::from(max_count)) as u32),
            Err(_) => Selection::Authors,
        },
    }
}

/// GET / - render the query form and graph
pub async fn visualize(
    State(state): State<AppState>,
    Query(params): Query<VisualizeParams>,
) -> Result<Html<String>> {
    let selection = parse_selection(
        params.n.as_deref(),
        state.config.search.default_count,
        state.config.search.max_count,
    );

    // Parameterless landing page: build once, serve from cache after.
    if params.query.is_none() && params.n.is_none() {
        let hit = state.example.initialized();
        metrics::record_cache(hit, "example_page");
        let page = state
            .example
            .get_or_try_init(|| async {
                build_page(&state, state.config.search.default_query.clone(), selection).await
            })
            .await?;
        return Ok(Html(page.clone()));
    }

    let query = match (params.query.as_deref(), selection) {
        (Some(q), _) if !q.trim().is_empty() => q.trim().to_string(),
        (_, Selection::Authors) => state.config.search.default_author_query.clone(),
        (_, Selection::Publications(_)) => state.config.search.default_query.clone(),
    };

    let page = build_page(&state, query, selection).await?;
    Ok(Html(page))
}

async fn build_page(state: &AppState, query: String, selection: Selection) -> Result<String> {
    let assembled = match selection {
        Selection::Publications(n) => state.pipeline.publication_graph(&query, n).await?,
        Selection::Authors => state.pipeline.author_graph(&query).await?,
    };

    match assembled {
        Some(assembled) => render::render_page(&query, &selection.form_value(), &assembled),
        None => Ok(render::render_empty(&query, &selection.form_value())),
    }
}
