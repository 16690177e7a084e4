//! Phase 3 tests: snapshot persistence and engine configuration.

use std::io::Cursor;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tempfile::{tempdir, NamedTempFile};

use agentic_knowledge::config::{resolve_config, resolve_graph_path, EngineConfig};
use agentic_knowledge::format::compression::{compress_payload, decompress_payload};
use agentic_knowledge::format::{GraphDocument, SnapshotReader, SnapshotWriter};
use agentic_knowledge::graph::{GraphBuilder, GraphStore, MemoryGraph};
use agentic_knowledge::types::{
    KgError, Node, NodeData, NodeKind, Relation, RelationType, SnapshotHeader, HEADER_SIZE,
};

/// Environment variables are process-wide; tests touching them take this lock.
static ENV_LOCK: Mutex<()> = Mutex::new(());

// ==================== Helpers ====================

fn sample_graph() -> MemoryGraph {
    GraphBuilder::new()
        .add_source("wiki", 0.8)
        .add_proposition("tides", "The moon causes tides", 0.9)
        .add_event("eclipse", "2024-04-08")
        .add_thought("musing", "what about neap tides?")
        .add("moon", NodeKind::Entity)
        .derived_from("tides", "wiki")
        .relation(
            Relation::new("moon", "tides", RelationType::Causes)
                .with_weight(0.8)
                .with_confidence(0.7)
                .with_context("gravitational pull")
                .with_sources(vec!["wiki".into()]),
        )
        .link("moon", "eclipse", RelationType::RelatedTo, 0.4)
        .build()
        .unwrap()
}

fn snapshot_bytes(graph: &MemoryGraph) -> Vec<u8> {
    let mut buf = Vec::new();
    SnapshotWriter::new().write_to(graph, &mut buf).unwrap();
    buf
}

fn raw_snapshot(header: SnapshotHeader, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    header.write_to(&mut buf).unwrap();
    buf.extend_from_slice(payload);
    buf
}

// ==================== Snapshot Round Trip ====================

#[test]
fn test_snapshot_round_trip_file() {
    let graph = sample_graph();
    let tmp = NamedTempFile::new().unwrap();
    SnapshotWriter::new().write_to_file(&graph, tmp.path()).unwrap();

    let loaded = SnapshotReader::read_from_file(tmp.path()).unwrap();
    assert_eq!(loaded.node_count().unwrap(), 5);
    assert_eq!(loaded.edge_count().unwrap(), 3);
    assert_eq!(loaded.nodes().unwrap(), graph.nodes().unwrap());
    assert_eq!(loaded.edges().unwrap(), graph.edges().unwrap());

    let causes = &loaded.edges_from("moon").unwrap()[0];
    assert_eq!(causes.relation_type, RelationType::Causes);
    assert_eq!(causes.context.as_deref(), Some("gravitational pull"));
    assert_eq!(causes.sources, vec!["wiki"]);
    assert_eq!(causes.confidence_score, Some(0.7));
}

#[test]
fn test_snapshot_rebuilds_indexes() {
    let graph = sample_graph();
    let loaded = SnapshotReader::read_from(&mut Cursor::new(snapshot_bytes(&graph))).unwrap();

    let hits = loaded.find_nodes("tides", &[], 10).unwrap();
    assert_eq!(hits[0].node.name, "tides");
    assert!(hits.iter().any(|h| h.node.name == "musing"));
    assert_eq!(
        loaded.names_of_kind(NodeKind::Source).unwrap(),
        vec!["wiki".to_string()]
    );
    assert_eq!(loaded.edges_to("tides").unwrap().len(), 1);
}

#[test]
fn test_snapshot_empty_graph() {
    let bytes = snapshot_bytes(&MemoryGraph::new());
    assert!(bytes.len() > HEADER_SIZE);
    let loaded = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(loaded.node_count().unwrap(), 0);
    assert_eq!(loaded.edge_count().unwrap(), 0);
}

#[test]
fn test_snapshot_header_layout() {
    let bytes = snapshot_bytes(&sample_graph());
    assert_eq!(&bytes[0..4], b"AKGR");
    assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 1);

    let header = SnapshotHeader::read_from(&mut Cursor::new(&bytes[..HEADER_SIZE])).unwrap();
    assert_eq!(header.node_count, 5);
    assert_eq!(header.edge_count, 3);
    assert_eq!(header.payload_len as usize, bytes.len() - HEADER_SIZE);
}

#[test]
fn test_write_to_file_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join(".akg").join("graph.akg");
    SnapshotWriter::new().write_to_file(&sample_graph(), &path).unwrap();
    assert!(path.exists());
    assert_eq!(
        SnapshotReader::read_from_file(&path).unwrap().node_count().unwrap(),
        5
    );
}

#[test]
fn test_read_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = SnapshotReader::read_from_file(&dir.path().join("absent.akg")).unwrap_err();
    assert!(matches!(err, KgError::Io(_)));
}

// ==================== Snapshot Errors ====================

#[test]
fn test_truncated_header() {
    let err = SnapshotReader::read_from(&mut Cursor::new(vec![0x41, 0x4B, 0x47])).unwrap_err();
    assert!(matches!(err, KgError::Truncated));
}

#[test]
fn test_truncated_payload() {
    let mut bytes = snapshot_bytes(&sample_graph());
    bytes.truncate(bytes.len() - 5);
    let err = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, KgError::Truncated));
}

#[test]
fn test_invalid_magic() {
    let mut bytes = snapshot_bytes(&sample_graph());
    bytes[0..4].copy_from_slice(b"AMEM");
    let err = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, KgError::InvalidMagic));
}

#[test]
fn test_unsupported_version() {
    let mut bytes = snapshot_bytes(&sample_graph());
    bytes[4..8].copy_from_slice(&99u32.to_le_bytes());
    let err = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, KgError::UnsupportedVersion(99)));
}

#[test]
fn test_payload_that_is_not_json() {
    let payload = compress_payload(b"definitely not json");
    let bytes = raw_snapshot(SnapshotHeader::new(0, 0, payload.len() as u64), &payload);
    let err = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, KgError::Json(_)));
}

#[test]
fn test_header_count_mismatch() {
    let document = GraphDocument {
        nodes: vec![Node::of_kind("only", NodeKind::Entity)],
        edges: Vec::new(),
    };
    let payload = compress_payload(&serde_json::to_vec(&document).unwrap());
    let bytes = raw_snapshot(SnapshotHeader::new(2, 0, payload.len() as u64), &payload);
    let err = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, KgError::Compression(_)));
}

#[test]
fn test_dangling_edge_in_payload() {
    let document = GraphDocument {
        nodes: vec![Node::of_kind("a", NodeKind::Entity)],
        edges: vec![Relation::new("a", "b", RelationType::Knows)],
    };
    let payload = compress_payload(&serde_json::to_vec(&document).unwrap());
    let bytes = raw_snapshot(SnapshotHeader::new(1, 1, payload.len() as u64), &payload);
    let err = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, KgError::NotFound(name) if name == "b"));
}

#[test]
fn test_compression_round_trip_and_corruption() {
    let data = b"the same words, the same words, the same words".repeat(20);
    let compressed = compress_payload(&data);
    assert!(compressed.len() < data.len());
    assert_eq!(decompress_payload(&compressed).unwrap(), data);

    let mut broken = compressed.clone();
    broken.truncate(broken.len() / 2);
    assert!(matches!(
        decompress_payload(&broken),
        Err(KgError::Compression(_))
    ));
}

#[test]
fn test_oversized_declared_length_is_rejected() {
    let mut payload = compress_payload(b"{\"nodes\": [], \"edges\": []}");
    payload[0..4].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(
        decompress_payload(&payload),
        Err(KgError::Compression(msg)) if msg.contains("declared size")
    ));

    let bytes = raw_snapshot(SnapshotHeader::new(0, 0, payload.len() as u64), &payload);
    let err = SnapshotReader::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, KgError::Compression(_)));

    assert!(matches!(
        decompress_payload(&[1, 0]),
        Err(KgError::Compression(_))
    ));
}

// ==================== JSON Documents ====================

#[test]
fn test_graph_document_defaults_missing_sections() {
    let document: GraphDocument = serde_json::from_str(
        r#"{"nodes": [{"name": "rust", "kind": "concept", "definition": "a language"}]}"#,
    )
    .unwrap();
    assert_eq!(document.nodes.len(), 1);
    assert!(document.edges.is_empty());
    let NodeData::Concept(attrs) = &document.nodes[0].data else {
        panic!("expected a concept");
    };
    assert_eq!(attrs.definition.as_deref(), Some("a language"));
}

// ==================== Configuration ====================

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_config_defaults() {
    let config = EngineConfig::default();
    assert_eq!(config.temporal_candidate_cap, 27);
    assert_eq!(config.candidate_threshold, 0.5);
    assert_eq!(config.conflict_penalty, 0.2);
    assert_eq!(config.default_max_depth, 2);
    assert_eq!(config.default_max_nodes, 50);
    assert_eq!(config.default_min_weight, 0.0);
    assert_eq!(config.default_max_events, 20);
    assert_eq!(config.default_max_hops, 6);
    assert_eq!(config.search_limit, 10);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_load_partial_toml() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let file = write_config("conflict_penalty = 0.3\ntemporal_candidate_cap = 12\n");
    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.conflict_penalty, 0.3);
    assert_eq!(config.temporal_candidate_cap, 12);
    assert_eq!(config.candidate_threshold, 0.5);
    assert_eq!(config.default_max_hops, 6);
}

#[test]
fn test_config_load_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let file = write_config("conflict_penalty = \"high\"\n");
    assert!(matches!(
        EngineConfig::load(file.path()),
        Err(KgError::Config(_))
    ));

    let file = write_config("candidate_threshold = 1.5\n");
    let err = EngineConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("candidate_threshold"));

    let file = write_config("search_limit = 0\n");
    assert!(matches!(
        EngineConfig::load(file.path()),
        Err(KgError::Config(_))
    ));

    assert!(matches!(
        EngineConfig::load(Path::new("/definitely/not/here.toml")),
        Err(KgError::Config(_))
    ));
}

#[test]
fn test_config_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    std::env::set_var("AKG_CONFLICT_PENALTY", "0.35");
    std::env::set_var("AKG_DEFAULT_MAX_HOPS", "3");
    let config = EngineConfig::from_env();
    std::env::remove_var("AKG_CONFLICT_PENALTY");
    std::env::remove_var("AKG_DEFAULT_MAX_HOPS");

    let config = config.unwrap();
    assert_eq!(config.conflict_penalty, 0.35);
    assert_eq!(config.default_max_hops, 3);

    // Environment beats the file.
    let file = write_config("default_max_events = 5\nconflict_penalty = 0.1\n");
    std::env::set_var("AKG_DEFAULT_MAX_EVENTS", "8");
    let config = EngineConfig::load(file.path());
    std::env::remove_var("AKG_DEFAULT_MAX_EVENTS");
    let config = config.unwrap();
    assert_eq!(config.default_max_events, 8);
    assert_eq!(config.conflict_penalty, 0.1);

    std::env::set_var("AKG_SEARCH_LIMIT", "many");
    let result = EngineConfig::from_env();
    std::env::remove_var("AKG_SEARCH_LIMIT");
    assert!(matches!(result, Err(KgError::Config(msg)) if msg.contains("AKG_SEARCH_LIMIT")));
}

#[test]
fn test_resolve_paths() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let explicit = Path::new("/tmp/explicit.akg");
    assert_eq!(resolve_graph_path(Some(explicit)), explicit);

    std::env::set_var("AKG_GRAPH", "/tmp/from-env.akg");
    let from_env = resolve_graph_path(None);
    std::env::remove_var("AKG_GRAPH");
    assert_eq!(from_env, Path::new("/tmp/from-env.akg"));

    assert_eq!(resolve_graph_path(None), Path::new(".akg/graph.akg"));

    let file = write_config("search_limit = 4\n");
    let config = resolve_config(Some(file.path())).unwrap();
    assert_eq!(config.search_limit, 4);

    std::env::set_var("AKG_CONFIG", file.path());
    let config = resolve_config(None);
    std::env::remove_var("AKG_CONFIG");
    assert_eq!(config.unwrap().search_limit, 4);

    assert_eq!(resolve_config(None).unwrap(), EngineConfig::default());
}
