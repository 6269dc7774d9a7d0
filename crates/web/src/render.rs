//! HTML page rendering
//!
//! Builds the full visualization pages. Layout and interaction are
//! delegated to the force-graph library loaded from a CDN; this module
//! only produces the node/link payload and the surrounding page shell.

use litgraph_common::errors::{AppError, Result};
use litgraph_common::graph::model::VisualGraph;
use litgraph_common::graph::pipeline::{AssembledGraph, GraphMode};
use serde::Serialize;

const FORCE_GRAPH_CDN: &str = "https://unpkg.com/force-graph@1.49.5/dist/force-graph.min.js";

/// Result-count options offered in the search form
const FORM_OPTIONS: [(&str, &str); 4] = [
    ("10", "Publications and References, n=10"),
    ("20", "Publications and References, n=20"),
    ("50", "Publications and References, n=50"),
    ("A", "Co-Author Network"),
];

#[derive(Debug, Serialize)]
struct GraphPayload {
    nodes: Vec<NodePayload>,
    links: Vec<LinkPayload>,
}

#[derive(Debug, Serialize)]
struct NodePayload {
    id: String,
    color: &'static str,
    size: u32,
    role: &'static str,
    title: String,
    authors: String,
    journal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doi: Option<String>,
}

#[derive(Debug, Serialize)]
struct LinkPayload {
    source: String,
    target: String,
}

fn graph_payload(graph: &VisualGraph) -> GraphPayload {
    GraphPayload {
        nodes: graph
            .nodes()
            .iter()
            .map(|node| NodePayload {
                id: node.id.to_string(),
                color: node.color,
                size: node.size,
                role: node.role.label(),
                title: node.meta.title.clone(),
                authors: node.meta.authors.clone(),
                journal: node.meta.journal.clone(),
                year: node.meta.year,
                doi: node.meta.doi.clone(),
            })
            .collect(),
        links: graph
            .edges()
            .iter()
            .map(|(a, b)| LinkPayload {
                source: a.to_string(),
                target: b.to_string(),
            })
            .collect(),
    }
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>litgraph</title>
<style>
  body { font-family: Helvetica, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  header h1 { font-size: 1.1em; margin: 8px 0 0 0; font-weight: normal; }
  #graph { width: 100vw; }
</style>
</head>
<body>
<header>
__FORM__
<h1>__HEADING__</h1>
</header>
<div id="graph"></div>
<script src="__CDN__"></script>
<script>
  const data = __DATA__;
  const elem = document.getElementById('graph');
  ForceGraph()(elem)
    .graphData(data)
    .nodeId('id')
    .nodeVal(node => node.size)
    .nodeColor(node => node.color)
    .nodeLabel(node => {
      const parts = [node.role, node.title];
      if (node.authors) parts.push(node.authors);
      if (node.journal) parts.push(node.journal);
      if (node.year) parts.push(String(node.year));
      if (node.doi && node.doi !== 'unknown') parts.push('doi: ' + node.doi);
      return parts.map(p => '<div>' + p + '</div>').join('');
    })
    .linkColor(() => '#999999')
    .height(window.innerHeight - elem.getBoundingClientRect().top);
</script>
</body>
</html>
"#;

const EMPTY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>litgraph</title>
<style>
  body { font-family: Helvetica, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  main { padding: 16px; }
</style>
</head>
<body>
<header>
__FORM__
</header>
<main>
<p>No results for &quot;__QUERY__&quot;. Try a broader query.</p>
</main>
</body>
</html>
"#;

/// Render the full visualization page for an assembled graph
pub fn render_page(query: &str, selected: &str, assembled: &AssembledGraph) -> Result<String> {
    let data = serde_json::to_string(&graph_payload(&assembled.graph))
        .map_err(|e| AppError::Internal {
            message: format!("graph payload serialization failed: {e}"),
        })?
        // Keep the inline payload from terminating the script element.
        .replace("</", "<\\/");

    let heading = match assembled.mode {
        GraphMode::Publications => {
            format!("Relationship Graph for: {}", escape_html(&assembled.expression))
        }
        GraphMode::Authors => {
            format!("Co-Author Network for: {}", escape_html(&assembled.expression))
        }
    };

    Ok(PAGE_TEMPLATE
        .replace("__FORM__", &search_form(query, selected))
        .replace("__HEADING__", &heading)
        .replace("__CDN__", FORCE_GRAPH_CDN)
        .replace("__DATA__", &data))
}

/// Render the page shown when a query produced no usable data
pub fn render_empty(query: &str, selected: &str) -> String {
    EMPTY_TEMPLATE
        .replace("__FORM__", &search_form(query, selected))
        .replace("__QUERY__", &escape_html(query))
}

fn search_form(query: &str, selected: &str) -> String {
    let mut options = String::new();
    for (value, label) in FORM_OPTIONS {
        let marker = if value == selected { " selected" } else { "" };
        options.push_str(&format!(
            "<option value=\"{value}\"{marker}>{label}</option>"
        ));
    }
    format!(
        "<form method=\"get\" action=\"/\">\
         <input type=\"text\" name=\"query\" value=\"{query}\" size=\"40\">\
         <select name=\"n\">{options}</select>\
         <input type=\"submit\" value=\"Search\">\
         </form>",
        query = escape_html(query),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
