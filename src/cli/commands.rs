//! CLI command implementations.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::EngineConfig;
use crate::engine::{
    BatchResult, ChainQuery, ChainSpec, ClaimQuery, ExploreParams, PathParams, QueryEngine,
    SourceSpec, StepSpec, TemporalParams, WriteEngine,
};
use crate::format::{GraphDocument, SnapshotReader, SnapshotWriter};
use crate::graph::{GraphStore, MemoryGraph};
use crate::types::{
    now_micros, GraphFragment, KgResult, Node, NodeKind, Relation, RelationType,
    ScoredNode, SourceAttrs,
};

/// Where the graph lives and how results are printed.
pub struct CliContext {
    pub path: PathBuf,
    pub config: EngineConfig,
    pub json: bool,
}

impl CliContext {
    /// Load the snapshot. The file must exist.
    pub fn load(&self) -> KgResult<MemoryGraph> {
        SnapshotReader::read_from_file(&self.path)
    }

    /// Load the snapshot, or start an empty graph if the file does not exist yet.
    pub fn load_or_new(&self) -> KgResult<MemoryGraph> {
        if self.path.exists() {
            self.load()
        } else {
            log::info!("{} does not exist; starting an empty graph", self.path.display());
            Ok(MemoryGraph::new())
        }
    }

    /// Write the graph back to the snapshot file.
    pub fn save(&self, graph: &MemoryGraph) -> KgResult<()> {
        SnapshotWriter::new().write_to_file(graph, &self.path)
    }

    fn query(&self) -> QueryEngine {
        QueryEngine::new(self.config.clone())
    }
}

fn print_json<T: Serialize>(value: &T) -> KgResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe_edge(edge: &Relation) -> String {
    let mut line = format!(
        "{} -{}-> {} (weight {:.2})",
        edge.from,
        edge.relation_type,
        edge.to,
        edge.weight()
    );
    if let Some(order) = edge.order {
        line.push_str(&format!(" #{order}"));
    }
    line
}

fn print_fragment(fragment: &GraphFragment) {
    if fragment.is_empty() {
        println!("(empty)");
        return;
    }
    println!("Nodes ({}):", fragment.nodes.len());
    for node in &fragment.nodes {
        match node.confidence() {
            Some(c) => println!("  {} [{}] confidence {:.2}", node.name, node.kind(), c),
            None => println!("  {} [{}]", node.name, node.kind()),
        }
    }
    if !fragment.edges.is_empty() {
        println!("Edges ({}):", fragment.edges.len());
        for edge in &fragment.edges {
            println!("  {}", describe_edge(edge));
        }
    }
}

fn print_batch<T>(label: &str, batch: &BatchResult<T>) {
    println!("{}: {} written", label, batch.created.len());
    for failure in &batch.failures {
        println!("  failed {}: {}", failure.item, failure.error);
    }
}

/// Build a node of `kind` from serialized attribute values.
pub fn build_node(
    name: &str,
    kind: NodeKind,
    attributes: serde_json::Map<String, serde_json::Value>,
) -> KgResult<Node> {
    for key in attributes.keys() {
        if !kind.attribute_names().contains(&key.as_str()) {
            log::warn!("'{key}' is not an attribute of {kind}; ignored");
        }
    }
    let mut object = attributes;
    object.insert("name".to_string(), name.into());
    object.insert("kind".to_string(), kind.name().into());
    let mut node: Node = serde_json::from_value(serde_json::Value::Object(object))?;
    let now = now_micros();
    node.created_at = now;
    node.updated_at = now;
    Ok(node)
}

/// Create a new empty .akg file.
pub fn cmd_create(ctx: &CliContext) -> KgResult<()> {
    ctx.save(&MemoryGraph::new())?;
    println!("Created {}", ctx.path.display());
    Ok(())
}

/// Display information about an .akg file.
pub fn cmd_info(ctx: &CliContext) -> KgResult<()> {
    let graph = ctx.load()?;
    let stats = graph.stats()?;
    let file_size = std::fs::metadata(&ctx.path)?.len();

    if ctx.json {
        return print_json(&serde_json::json!({
            "file": ctx.path.display().to_string(),
            "file_size": file_size,
            "stats": stats,
        }));
    }
    println!("File: {}", ctx.path.display());
    println!("File size: {}", format_size(file_size));
    println!("Nodes: {}", stats.node_count);
    for (kind, count) in &stats.kinds {
        println!("  {kind}: {count}");
    }
    println!("Edges: {}", stats.edge_count);
    for (category, count) in &stats.categories {
        println!("  {}: {count}", category.name());
    }
    Ok(())
}

/// Create or update a node.
pub fn cmd_add(ctx: &CliContext, node: Node) -> KgResult<()> {
    let graph = ctx.load_or_new()?;
    let stored = WriteEngine::new().create_node(&graph, node)?;
    ctx.save(&graph)?;

    if ctx.json {
        print_json(&stored)
    } else {
        println!("Stored {} [{}]", stored.name, stored.kind());
        Ok(())
    }
}

/// Create or update a relation.
pub fn cmd_link(ctx: &CliContext, relation: Relation) -> KgResult<()> {
    let graph = ctx.load()?;
    let stored = WriteEngine::new().create_relation(&graph, relation)?;
    ctx.save(&graph)?;

    if ctx.json {
        print_json(&stored)
    } else {
        println!("Linked {}", describe_edge(&stored));
        Ok(())
    }
}

/// Record a source and link the nodes derived from it.
pub fn cmd_source(
    ctx: &CliContext,
    name: &str,
    attrs: SourceAttrs,
    derived: Vec<String>,
) -> KgResult<()> {
    let graph = ctx.load_or_new()?;
    let spec = SourceSpec {
        name: name.to_string(),
        attrs,
        derived,
    };
    let added = WriteEngine::new().add_sources(&graph, vec![spec]);
    ctx.save(&graph)?;

    if ctx.json {
        return print_json(&added);
    }
    print_batch("Sources", &added.sources);
    print_batch("Provenance links", &added.links);
    Ok(())
}

/// Show a node and its edges.
pub fn cmd_get(ctx: &CliContext, name: &str) -> KgResult<()> {
    let graph = ctx.load()?;
    let node = graph.require_node(name)?;
    let outgoing = graph.edges_from(name)?;
    let incoming = graph.edges_to(name)?;

    if ctx.json {
        return print_json(&serde_json::json!({
            "node": node,
            "outgoing": outgoing,
            "incoming": incoming,
        }));
    }
    println!("{}", serde_json::to_string_pretty(&node)?);
    println!("Outgoing ({}):", outgoing.len());
    for edge in &outgoing {
        println!("  {}", describe_edge(edge));
    }
    println!("Incoming ({}):", incoming.len());
    for edge in &incoming {
        println!("  {}", describe_edge(edge));
    }
    Ok(())
}

/// Delete a node and its incident edges.
pub fn cmd_delete(ctx: &CliContext, name: &str) -> KgResult<()> {
    let graph = ctx.load()?;
    WriteEngine::new().delete_node(&graph, name)?;
    ctx.save(&graph)?;
    if ctx.json {
        print_json(&serde_json::json!({ "deleted": name }))
    } else {
        println!("Deleted {name}");
        Ok(())
    }
}

/// Delete one relation.
pub fn cmd_unlink(
    ctx: &CliContext,
    from: &str,
    relation_type: RelationType,
    to: &str,
) -> KgResult<()> {
    let graph = ctx.load()?;
    WriteEngine::new().delete_relation(&graph, from, to, relation_type)?;
    ctx.save(&graph)?;
    if ctx.json {
        print_json(&serde_json::json!({
            "deleted": { "from": from, "relationType": relation_type, "to": to }
        }))
    } else {
        println!("Unlinked {from} -{relation_type}-> {to}");
        Ok(())
    }
}

/// Relevance search.
pub fn cmd_search(
    ctx: &CliContext,
    query: &str,
    kinds: &[NodeKind],
    limit: Option<usize>,
) -> KgResult<()> {
    let graph = ctx.load()?;
    let hits: Vec<ScoredNode> = ctx.query().search(&graph, query, kinds, limit)?;

    if ctx.json {
        return print_json(&hits);
    }
    if hits.is_empty() {
        println!("No matches for {query:?}");
    }
    for hit in &hits {
        println!("{:.3}  {} [{}]", hit.score, hit.node.name, hit.node.kind());
    }
    Ok(())
}

/// Weighted neighbourhood exploration.
pub fn cmd_explore(ctx: &CliContext, params: &ExploreParams) -> KgResult<()> {
    let graph = ctx.load()?;
    let fragment = ctx.query().explore(&graph, params)?;
    if ctx.json {
        print_json(&fragment)
    } else {
        print_fragment(&fragment);
        Ok(())
    }
}

/// Cheapest path between two nodes.
pub fn cmd_path(ctx: &CliContext, params: &PathParams) -> KgResult<()> {
    let graph = ctx.load()?;
    let result = ctx.query().shortest_path(&graph, params)?;
    if ctx.json {
        return print_json(&result);
    }
    if !result.found() {
        println!("No path from {} to {}", params.from, params.to);
        return Ok(());
    }
    println!("{}", result.fragment.names().join(" -> "));
    println!("Hops: {}, cost: {:.3}", result.hops, result.total_cost);
    for edge in &result.fragment.edges {
        println!("  {}", describe_edge(edge));
    }
    Ok(())
}

/// Temporal sequence around a start node.
pub fn cmd_timeline(ctx: &CliContext, params: &TemporalParams) -> KgResult<()> {
    let graph = ctx.load()?;
    let sequence = ctx.query().temporal_sequence(&graph, params)?;
    if ctx.json {
        return print_json(&sequence);
    }
    for (i, node) in sequence.fragment.nodes.iter().enumerate() {
        let when = node.time_key().unwrap_or("-");
        println!("{:>3}. {} [{}] {}", i, node.name, node.kind(), when);
    }
    if sequence.fragment.nodes.len() > 1 {
        println!("(ordered by {:?})", sequence.origin);
    }
    Ok(())
}

/// Create or update a reasoning chain.
pub fn cmd_chain(ctx: &CliContext, spec: ChainSpec) -> KgResult<()> {
    let graph = ctx.load_or_new()?;
    let created = WriteEngine::new().create_chain(&graph, spec)?;
    ctx.save(&graph)?;

    if ctx.json {
        return print_json(&created);
    }
    println!("Chain {}", created.chain.name);
    if let Some(thought) = &created.linked_thought {
        println!("  reasoning for {thought}");
    }
    for warning in &created.warnings {
        println!("  warning: {warning}");
    }
    Ok(())
}

/// Add a step to a reasoning chain.
pub fn cmd_step(ctx: &CliContext, spec: StepSpec) -> KgResult<()> {
    let graph = ctx.load()?;
    let added = WriteEngine::new().add_step(&graph, spec)?;
    ctx.save(&graph)?;

    if ctx.json {
        return print_json(&added);
    }
    println!("Step {} #{}", added.step.name, added.order);
    if !added.linked_references.is_empty() {
        println!("  references: {}", added.linked_references.join(", "));
    }
    if !added.linked_previous.is_empty() {
        println!("  follows: {}", added.linked_previous.join(", "));
    }
    for warning in &added.warnings {
        println!("  warning: {warning}");
    }
    Ok(())
}

/// Show one chain by name or every chain matching some topics.
pub fn cmd_show_chain(ctx: &CliContext, query: &ChainQuery) -> KgResult<()> {
    let graph = ctx.load()?;
    let fragment = ctx.query().reasoning_chain(&graph, query)?;
    if ctx.json {
        print_json(&fragment)
    } else {
        print_fragment(&fragment);
        Ok(())
    }
}

/// List contradictions, optionally only those touching some names.
pub fn cmd_conflicts(ctx: &CliContext, scope: &[String]) -> KgResult<()> {
    let graph = ctx.load()?;
    let scope = (!scope.is_empty()).then_some(scope);
    let pairs = ctx.query().detect_conflicts(&graph, scope)?;
    if ctx.json {
        return print_json(&pairs);
    }
    if pairs.is_empty() {
        println!("No conflicts");
    }
    for pair in &pairs {
        println!("{} <-> {}: {}", pair.first, pair.second, pair.reason);
    }
    Ok(())
}

/// Assess claims by query or by name.
pub fn cmd_assess(ctx: &CliContext, query: &ClaimQuery) -> KgResult<()> {
    let graph = ctx.load()?;
    let assessment = ctx.query().assess_claims(&graph, query)?;
    if ctx.json {
        return print_json(&assessment);
    }
    for entry in &assessment.assessments {
        let report = &entry.report;
        let stored = report
            .stored_confidence
            .map(|c| format!("{c:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{} [{}] stored {} effective {:.3} sources {} conflicts {}{}",
            report.node,
            entry.kind,
            stored,
            report.effective_confidence,
            report.sources.len(),
            report.conflict_count,
            if entry.candidate { " (candidate)" } else { "" }
        );
    }
    for pair in &assessment.conflicts {
        println!("  conflict: {} <-> {}: {}", pair.first, pair.second, pair.reason);
    }
    println!("{}", assessment.summary);
    Ok(())
}

/// Validate provenance and confidence of one node.
pub fn cmd_validate(ctx: &CliContext, name: &str, strict: bool) -> KgResult<()> {
    let graph = ctx.load()?;
    let report = ctx.query().validate(&graph, name)?;
    if ctx.json {
        print_json(&report)?;
    } else if report.valid {
        println!("{} [{}] is valid", report.node, report.kind);
    } else {
        println!("{} [{}] has {} issue(s):", report.node, report.kind, report.issues.len());
        for issue in &report.issues {
            println!("  - {issue}");
        }
    }
    if strict {
        report.into_result()?;
    }
    Ok(())
}

/// Export the graph as JSON.
pub fn cmd_export(ctx: &CliContext, nodes_only: bool, pretty: bool) -> KgResult<()> {
    let graph = ctx.load()?;
    let document = GraphDocument {
        nodes: graph.nodes()?,
        edges: if nodes_only { Vec::new() } else { graph.edges()? },
    };
    if pretty {
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("{}", serde_json::to_string(&document)?);
    }
    Ok(())
}

/// Import nodes and edges from a JSON document. Existing names are merged.
pub fn cmd_import(ctx: &CliContext, json_path: &Path) -> KgResult<()> {
    let graph = ctx.load_or_new()?;
    let data = std::fs::read_to_string(json_path)?;
    let document: GraphDocument = serde_json::from_str(&data)?;

    let engine = WriteEngine::new();
    let nodes = engine.create_nodes(&graph, document.nodes);
    let edges = engine.create_relations(&graph, document.edges);
    ctx.save(&graph)?;

    if ctx.json {
        return print_json(&serde_json::json!({ "nodes": nodes, "edges": edges }));
    }
    print_batch("Nodes", &nodes);
    print_batch("Edges", &edges);
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
