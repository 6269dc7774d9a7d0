//! Graph assembler
//!
//! Filters raw entity records down to complete papers, derives palette
//! buckets, and builds the publication (citation) and author
//! (co-authorship) graphs.

use crate::academic::PaperEntity;
use crate::graph::model::{GraphNode, NodeId, NodeMeta, NodeRole, VisualGraph};
use crate::graph::palette::{bucket, PRIMARY_PALETTE, SECONDARY_PALETTE};
use crate::UNKNOWN_DOI;
use std::collections::{HashMap, HashSet};

/// A paper record that survived the completeness filter
#[derive(Debug, Clone)]
pub struct CompletePaper {
    pub id: i64,
    pub title: String,
    pub authors: Vec<PaperAuthor>,
    pub journal: String,
    pub year: i32,
    pub citation_count: u64,
    /// Backfilled with the `"unknown"` sentinel when absent upstream
    pub doi: String,
    pub references: Vec<i64>,
}

#[derive(Debug, Clone)]
pub struct PaperAuthor {
    pub id: Option<i64>,
    pub name: String,
    pub affiliation: Option<String>,
}

impl CompletePaper {
    /// Comma-joined author names for display
    pub fn authors_line(&self) -> String {
        self.authors
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Hard completeness filter. Records missing the display name, author
/// list, journal, year, or citation count are dropped, in that stage
/// order; each stage only removes records, so the filter is idempotent.
/// Surviving records get their DOI backfilled with the sentinel.
pub fn filter_complete(entities: Vec<PaperEntity>) -> Vec<CompletePaper> {
    let total = entities.len();

    let entities: Vec<_> = entities.into_iter().filter(|e| e.title.is_some()).collect();
    let entities: Vec<_> = entities.into_iter().filter(|e| e.authors.is_some()).collect();
    let entities: Vec<_> = entities
        .into_iter()
        .filter(|e| e.journal.as_ref().is_some_and(|j| j.name.is_some()))
        .collect();
    let entities: Vec<_> = entities.into_iter().filter(|e| e.year.is_some()).collect();
    let entities: Vec<_> = entities
        .into_iter()
        .filter(|e| e.citation_count.is_some())
        .collect();

    let complete: Vec<CompletePaper> = entities
        .into_iter()
        .filter_map(|e| {
            // The id keys the graph; a record without one is unusable.
            let id = e.id?;
            Some(CompletePaper {
                id,
                title: e.title?,
                authors: e
                    .authors?
                    .into_iter()
                    .map(|a| PaperAuthor {
                        id: a.id,
                        name: a.name().unwrap_or_default().to_string(),
                        affiliation: a.affiliation,
                    })
                    .collect(),
                journal: e.journal?.name?,
                year: e.year?,
                citation_count: e.citation_count?,
                doi: e.doi.unwrap_or_else(|| UNKNOWN_DOI.to_string()),
                references: e.references.unwrap_or_default(),
            })
        })
        .collect();

    if complete.len() < total {
        tracing::debug!(
            dropped = total - complete.len(),
            kept = complete.len(),
            "Incomplete records filtered out"
        );
    }
    complete
}

/// Collect every referenced id across the primary set, deduplicated,
/// in encounter order, excluding ids already present as primaries.
/// The result is the secondary lookup set and is disjoint from the
/// primary id set by construction.
pub fn reference_candidates(primary: &[CompletePaper]) -> Vec<i64> {
    let primary_ids: HashSet<i64> = primary.iter().map(|p| p.id).collect();
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for paper in primary {
        for &rid in &paper.references {
            if !primary_ids.contains(&rid) && seen.insert(rid) {
                candidates.push(rid);
            }
        }
    }
    candidates
}

/// Build the OR-of-equality lookup expression for a set of entity ids
pub fn disjunction_expr(ids: &[i64]) -> String {
    match ids {
        [] => String::new(),
        [only] => format!("Id={}", only),
        many => {
            let terms: Vec<String> = many.iter().map(|id| format!("Id={}", id)).collect();
            format!("Or({})", terms.join(","))
        }
    }
}

/// Assemble the citation graph from the primary and secondary sets.
///
/// Primary papers are bucketed against the primary citation maximum on
/// the warm palette; secondary papers against their own maximum on the
/// cool palette. Edges fall into three classes (primary-primary,
/// primary-secondary, secondary-secondary); an edge is only added when
/// both endpoints exist in the combined node set.
pub fn build_publication_graph(
    primary: &[CompletePaper],
    secondary: &[CompletePaper],
) -> VisualGraph {
    let max_primary = primary.iter().map(|p| p.citation_count).max().unwrap_or(0);
    let max_secondary = secondary.iter().map(|p| p.citation_count).max().unwrap_or(0);

    let mut graph = VisualGraph::new();

    for paper in primary {
        graph.add_node(paper_node(paper, NodeRole::Primary, max_primary));
    }
    for paper in secondary {
        graph.add_node(paper_node(paper, NodeRole::Reference, max_secondary));
    }

    // Primary references resolve within the whole node set.
    for paper in primary {
        for &rid in &paper.references {
            graph.add_edge(NodeId::Paper(paper.id), NodeId::Paper(rid));
        }
    }

    // Secondary references only resolve among other secondary records.
    let secondary_ids: HashSet<i64> = secondary.iter().map(|p| p.id).collect();
    for paper in secondary {
        for &rid in &paper.references {
            if secondary_ids.contains(&rid) {
                graph.add_edge(NodeId::Paper(paper.id), NodeId::Paper(rid));
            }
        }
    }

    graph
}

fn paper_node(paper: &CompletePaper, role: NodeRole, max_citations: u64) -> GraphNode {
    let palette = match role {
        NodeRole::Reference | NodeRole::Author => &SECONDARY_PALETTE,
        NodeRole::Primary | NodeRole::Publication => &PRIMARY_PALETTE,
    };
    GraphNode {
        id: NodeId::Paper(paper.id),
        role,
        color: palette[bucket(paper.citation_count, max_citations)],
        size: role.base_size(),
        meta: NodeMeta {
            title: paper.title.clone(),
            authors: paper.authors_line(),
            journal: paper.journal.clone(),
            year: Some(paper.year),
            doi: Some(paper.doi.clone()),
        },
    }
}

/// Assemble the co-authorship graph for author mode.
///
/// Authors are deduplicated by id in first-seen order; the occurrence
/// count is the number of distinct papers listing the author. Every
/// author tied at the maximum count gets the highlight size and the
/// most intense cool bucket; the rest are bucketed against the
/// second-highest count. Authors without an id are skipped.
pub fn build_author_graph(papers: &[CompletePaper]) -> VisualGraph {
    let max_citations = papers.iter().map(|p| p.citation_count).max().unwrap_or(0);

    let mut graph = VisualGraph::new();
    for paper in papers {
        graph.add_node(paper_node(paper, NodeRole::Publication, max_citations));
    }

    // First-seen author records and per-author distinct-paper counts.
    let mut order: Vec<i64> = Vec::new();
    let mut first_seen: HashMap<i64, PaperAuthor> = HashMap::new();
    let mut occurrences: HashMap<i64, u64> = HashMap::new();

    for paper in papers {
        let mut in_this_paper = HashSet::new();
        for author in &paper.authors {
            let Some(id) = author.id else { continue };
            if !in_this_paper.insert(id) {
                continue;
            }
            if !first_seen.contains_key(&id) {
                order.push(id);
                first_seen.insert(id, author.clone());
            }
            *occurrences.entry(id).or_insert(0) += 1;
        }
    }

    let max_occurrence = occurrences.values().copied().max().unwrap_or(0);
    let second_highest = {
        let mut counts: Vec<u64> = occurrences.values().copied().collect();
        counts.sort_unstable();
        if counts.len() >= 2 {
            counts[counts.len() - 2]
        } else {
            max_occurrence
        }
    };

    for id in &order {
        let author = &first_seen[id];
        let occurrence = occurrences[id];

        let (size, color) = if occurrence == max_occurrence {
            (NodeRole::HIGHLIGHT_SIZE, SECONDARY_PALETTE[0])
        } else {
            (
                NodeRole::Author.base_size(),
                SECONDARY_PALETTE[bucket(occurrence, second_highest)],
            )
        };

        graph.add_node(GraphNode {
            id: NodeId::Author(*id),
            role: NodeRole::Author,
            color,
            size,
            meta: NodeMeta {
                title: author.name.clone(),
                authors: author.affiliation.clone().unwrap_or_default(),
                journal: String::new(),
                year: None,
                doi: None,
            },
        });
    }

    // One edge per paper-author authorship relation.
    for paper in papers {
        for author in &paper.authors {
            if let Some(id) = author.id {
                graph.add_edge(NodeId::Paper(paper.id), NodeId::Author(id));
            }
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academic::{AuthorEntity, Journal};

    fn entity(id: i64, citation_count: u64, references: &[i64]) -> PaperEntity {
        PaperEntity {
            id: Some(id),
            title: Some(format!("paper {}", id)),
            year: Some(2020),
            citation_count: Some(citation_count),
            journal: Some(Journal {
                name: Some("nature".into()),
            }),
            authors: Some(vec![AuthorEntity {
                id: Some(id * 10),
                display_name: Some(format!("author {}", id)),
                normalized_name: None,
                affiliation: None,
            }]),
            references: if references.is_empty() {
                None
            } else {
                Some(references.to_vec())
            },
            doi: None,
        }
    }

    fn paper(id: i64, citation_count: u64, references: &[i64]) -> CompletePaper {
        CompletePaper {
            id,
            title: format!("paper {}", id),
            authors: vec![PaperAuthor {
                id: Some(id * 10),
                name: format!("author {}", id),
                affiliation: None,
            }],
            journal: "nature".into(),
            year: 2020,
            citation_count,
            doi: UNKNOWN_DOI.into(),
            references: references.to_vec(),
        }
    }

    fn paper_with_authors(id: i64, citation_count: u64, author_ids: &[i64]) -> CompletePaper {
        let mut p = paper(id, citation_count, &[]);
        p.authors = author_ids
            .iter()
            .map(|&a| PaperAuthor {
                id: Some(a),
                name: format!("author {}", a),
                affiliation: Some(format!("affiliation {}", a)),
            })
            .collect();
        p
    }

    fn back_to_entity(p: &CompletePaper) -> PaperEntity {
        PaperEntity {
            id: Some(p.id),
            title: Some(p.title.clone()),
            year: Some(p.year),
            citation_count: Some(p.citation_count),
            journal: Some(Journal {
                name: Some(p.journal.clone()),
            }),
            authors: Some(
                p.authors
                    .iter()
                    .map(|a| AuthorEntity {
                        id: a.id,
                        display_name: Some(a.name.clone()),
                        normalized_name: None,
                        affiliation: a.affiliation.clone(),
                    })
                    .collect(),
            ),
            references: Some(p.references.clone()),
            doi: Some(p.doi.clone()),
        }
    }

    #[test]
    fn test_filter_drops_incomplete_records() {
        let mut no_title = entity(1, 5, &[]);
        no_title.title = None;
        let mut no_authors = entity(2, 5, &[]);
        no_authors.authors = None;
        let mut no_journal = entity(3, 5, &[]);
        no_journal.journal = None;
        let mut no_journal_name = entity(4, 5, &[]);
        no_journal_name.journal = Some(Journal { name: None });
        let mut no_year = entity(5, 5, &[]);
        no_year.year = None;
        let mut no_citations = entity(6, 5, &[]);
        no_citations.citation_count = None;

        let complete = filter_complete(vec![
            no_title,
            no_authors,
            no_journal,
            no_journal_name,
            no_year,
            no_citations,
            entity(7, 5, &[]),
        ]);

        assert_eq!(complete.len(), 1);
        assert_eq!(complete[0].id, 7);
    }

    #[test]
    fn test_filter_backfills_doi() {
        let complete = filter_complete(vec![entity(1, 5, &[])]);
        assert_eq!(complete[0].doi, UNKNOWN_DOI);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let mut partial = entity(2, 3, &[]);
        partial.year = None;

        let once = filter_complete(vec![entity(1, 5, &[]), partial]);
        let again = filter_complete(once.iter().map(back_to_entity).collect());

        assert_eq!(once.len(), again.len());
        let ids_once: Vec<i64> = once.iter().map(|p| p.id).collect();
        let ids_again: Vec<i64> = again.iter().map(|p| p.id).collect();
        assert_eq!(ids_once, ids_again);
    }

    #[test]
    fn test_reference_candidates_disjoint_from_primary() {
        // 101 is already a primary; only 102 needs secondary lookup.
        let primary = vec![paper(100, 5, &[101, 102]), paper(101, 3, &[])];
        let candidates = reference_candidates(&primary);
        assert_eq!(candidates, vec![102]);

        let primary_ids: HashSet<i64> = primary.iter().map(|p| p.id).collect();
        assert!(candidates.iter().all(|id| !primary_ids.contains(id)));
    }

    #[test]
    fn test_reference_candidates_dedup_preserves_order() {
        let primary = vec![paper(1, 5, &[30, 20, 30]), paper(2, 3, &[20, 40])];
        assert_eq!(reference_candidates(&primary), vec![30, 20, 40]);
    }

    #[test]
    fn test_disjunction_expr() {
        assert_eq!(disjunction_expr(&[]), "");
        assert_eq!(disjunction_expr(&[7]), "Id=7");
        assert_eq!(disjunction_expr(&[7, 8, 9]), "Or(Id=7,Id=8,Id=9)");
    }

    #[test]
    fn test_publication_graph_palette_buckets() {
        // Citation counts [0, 5, 10] against max 10 bucket to [8, 4, 0].
        let primary = vec![paper(1, 0, &[]), paper(2, 5, &[]), paper(3, 10, &[])];
        let graph = build_publication_graph(&primary, &[]);

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);
        assert!(reference_candidates(&primary).is_empty());

        assert_eq!(
            graph.get(NodeId::Paper(1)).unwrap().color,
            PRIMARY_PALETTE[8]
        );
        assert_eq!(
            graph.get(NodeId::Paper(2)).unwrap().color,
            PRIMARY_PALETTE[4]
        );
        assert_eq!(
            graph.get(NodeId::Paper(3)).unwrap().color,
            PRIMARY_PALETTE[0]
        );
    }

    #[test]
    fn test_publication_graph_edge_classes() {
        let primary = vec![paper(1, 5, &[2, 10, 999]), paper(2, 3, &[])];
        let secondary = vec![paper(10, 4, &[11, 1]), paper(11, 2, &[])];
        let graph = build_publication_graph(&primary, &secondary);

        // primary-primary, primary-secondary, secondary-secondary
        assert!(graph.edges().contains(&(NodeId::Paper(1), NodeId::Paper(2))));
        assert!(graph.edges().contains(&(NodeId::Paper(1), NodeId::Paper(10))));
        assert!(graph.edges().contains(&(NodeId::Paper(10), NodeId::Paper(11))));

        // No edge to the unresolved id, and no secondary-primary class.
        assert_eq!(graph.edge_count(), 3);
        for &(a, b) in graph.edges() {
            assert!(graph.contains(a));
            assert!(graph.contains(b));
        }
    }

    #[test]
    fn test_publication_graph_without_secondary_set() {
        let primary = vec![paper(1, 5, &[999]), paper(2, 3, &[1])];
        let graph = build_publication_graph(&primary, &[]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges(), &[(NodeId::Paper(1), NodeId::Paper(2))]);
    }

    #[test]
    fn test_secondary_buckets_use_secondary_maximum() {
        let primary = vec![paper(1, 1000, &[])];
        let secondary = vec![paper(10, 4, &[]), paper(11, 2, &[])];
        let graph = build_publication_graph(&primary, &secondary);

        // Bucketed against the secondary max of 4, not the primary 1000.
        assert_eq!(
            graph.get(NodeId::Paper(10)).unwrap().color,
            SECONDARY_PALETTE[0]
        );
        assert_eq!(
            graph.get(NodeId::Paper(11)).unwrap().color,
            SECONDARY_PALETTE[4]
        );
    }

    #[test]
    fn test_author_graph_dedup_first_seen_order() {
        let papers = vec![
            paper_with_authors(1, 5, &[7, 8]),
            paper_with_authors(2, 3, &[8, 9]),
            paper_with_authors(3, 1, &[8]),
        ];
        let graph = build_author_graph(&papers);

        let author_ids: Vec<NodeId> = graph
            .nodes()
            .iter()
            .filter(|n| n.role == NodeRole::Author)
            .map(|n| n.id)
            .collect();
        assert_eq!(
            author_ids,
            vec![NodeId::Author(7), NodeId::Author(8), NodeId::Author(9)]
        );

        // One edge per authorship relation.
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn test_author_graph_highlights_most_frequent() {
        let papers = vec![
            paper_with_authors(1, 5, &[7, 8]),
            paper_with_authors(2, 3, &[8, 9]),
            paper_with_authors(3, 1, &[8, 7]),
        ];
        let graph = build_author_graph(&papers);

        // Author 8 appears on all three papers.
        let top = graph.get(NodeId::Author(8)).unwrap();
        assert_eq!(top.size, NodeRole::HIGHLIGHT_SIZE);
        assert_eq!(top.color, SECONDARY_PALETTE[0]);

        // Author 7 (2 papers) is bucketed against the second-highest
        // occurrence count, which is its own.
        let second = graph.get(NodeId::Author(7)).unwrap();
        assert_eq!(second.size, NodeRole::Author.base_size());
        assert_eq!(second.color, SECONDARY_PALETTE[bucket(2, 2)]);
    }

    #[test]
    fn test_author_graph_ties_all_highlighted() {
        let papers = vec![
            paper_with_authors(1, 5, &[7, 8]),
            paper_with_authors(2, 3, &[7, 8]),
        ];
        let graph = build_author_graph(&papers);

        for id in [7, 8] {
            let node = graph.get(NodeId::Author(id)).unwrap();
            assert_eq!(node.size, NodeRole::HIGHLIGHT_SIZE);
            assert_eq!(node.color, SECONDARY_PALETTE[0]);
        }
    }

    #[test]
    fn test_author_graph_single_author() {
        // One distinct author must not panic on the second-highest lookup.
        let papers = vec![paper_with_authors(1, 5, &[7])];
        let graph = build_author_graph(&papers);

        let node = graph.get(NodeId::Author(7)).unwrap();
        assert_eq!(node.size, NodeRole::HIGHLIGHT_SIZE);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_author_graph_counts_distinct_papers() {
        // Author 7 listed twice on one paper counts once for it.
        let mut duplicated = paper_with_authors(1, 5, &[7]);
        duplicated.authors.push(PaperAuthor {
            id: Some(7),
            name: "author 7".into(),
            affiliation: None,
        });
        let papers = vec![duplicated, paper_with_authors(2, 3, &[7, 8])];
        let graph = build_author_graph(&papers);

        // 7 has two distinct papers, 8 one; 7 is the unique maximum.
        assert_eq!(graph.get(NodeId::Author(7)).unwrap().size, NodeRole::HIGHLIGHT_SIZE);
        assert_eq!(
            graph.get(NodeId::Author(8)).unwrap().size,
            NodeRole::Author.base_size()
        );
    }

    #[test]
    fn test_author_graph_skips_authors_without_id() {
        let mut p = paper_with_authors(1, 5, &[7]);
        p.authors.push(PaperAuthor {
            id: None,
            name: "anonymous".into(),
            affiliation: None,
        });
        let graph = build_author_graph(&[p]);

        assert_eq!(
            graph
                .nodes()
                .iter()
                .filter(|n| n.role == NodeRole::Author)
                .count(),
            1
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_author_node_metadata() {
        let papers = vec![paper_with_authors(1, 5, &[7])];
        let graph = build_author_graph(&papers);

        let node = graph.get(NodeId::Author(7)).unwrap();
        assert_eq!(node.meta.title, "author 7");
        assert_eq!(node.meta.authors, "affiliation 7");
        assert_eq!(node.meta.year, None);
        assert_eq!(node.meta.doi, None);
    }
}
