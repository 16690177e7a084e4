//! Phase 4 tests: CLI integration and end-to-end flows.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::{tempdir, NamedTempFile};

use agentic_knowledge::engine::{
    ChainQuery, ChainSpec, ClaimQuery, ExploreParams, PathParams, QueryEngine, SequenceOrigin,
    StepSpec, TemporalParams, WriteEngine,
};
use agentic_knowledge::format::{SnapshotReader, SnapshotWriter};
use agentic_knowledge::graph::{GraphStore, MemoryGraph, TraversalDirection};
use agentic_knowledge::types::{
    EventAttrs, Node, NodeData, NodeKind, ReasoningChainAttrs, ReasoningStepAttrs, Relation,
    RelationType, SourceType, ThoughtAttrs,
};

// ==================== CLI Helpers ====================

/// Locate the `akg` binary built alongside test binaries.
fn akg_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove "deps"
    path.push("akg");
    path
}

/// Run the `akg` CLI against `file` with the given arguments.
fn run_akg(file: &Path, args: &[&str]) -> Output {
    Command::new(akg_bin())
        .arg("--file")
        .arg(file)
        .args(args)
        .env_remove("AKG_GRAPH")
        .env_remove("AKG_CONFIG")
        .output()
        .expect("Failed to run akg")
}

/// Helper: assert that the CLI ran successfully (exit code 0).
fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "akg failed with status {:?}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

/// Helper: get stdout as a string from an Output.
fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn json_out(output: &Output) -> serde_json::Value {
    assert_success(output);
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Run every command in order, asserting each succeeds.
fn run_all(file: &Path, commands: &[&[&str]]) {
    for args in commands {
        assert_success(&run_akg(file, args));
    }
}

// ==================== CLI Tests ====================

#[test]
fn test_cli_create() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("kg").join("graph.akg");

    let output = run_akg(&path, &["create"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("Created"));

    let graph = SnapshotReader::read_from_file(&path).unwrap();
    assert_eq!(graph.node_count().unwrap(), 0);
    assert_eq!(graph.edge_count().unwrap(), 0);
}

#[test]
fn test_cli_add_and_get() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");

    // The first write creates the file.
    let output = run_akg(
        &path,
        &[
            "add",
            "concept",
            "ownership",
            "--set",
            "definition=Each value has one owner",
            "--set",
            "examples=[\"String\", \"Vec\"]",
            "--confidence",
            "0.9",
        ],
    );
    assert_success(&output);
    assert!(stdout_str(&output).contains("Stored ownership [concept]"));

    let output = run_akg(&path, &["get", "ownership"]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("\"definition\": \"Each value has one owner\""));
    assert!(stdout.contains("Outgoing (0):"));

    let graph = SnapshotReader::read_from_file(&path).unwrap();
    let node = graph.require_node("ownership").unwrap();
    assert_eq!(node.confidence(), Some(0.9));
    let NodeData::Concept(attrs) = &node.data else {
        panic!("expected a concept");
    };
    assert_eq!(attrs.examples, vec!["String", "Vec"]);
}

#[test]
fn test_cli_add_merges_attributes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "entity", "ada", "--set", "description=mathematician"],
            &["add", "entity", "ada", "--attrs", r#"{"subType": "person"}"#],
        ],
    );

    let graph = SnapshotReader::read_from_file(&path).unwrap();
    assert_eq!(graph.node_count().unwrap(), 1);
    let NodeData::Entity(attrs) = &graph.require_node("ada").unwrap().data else {
        panic!("expected an entity");
    };
    assert_eq!(attrs.description.as_deref(), Some("mathematician"));
    assert_eq!(attrs.sub_type.as_deref(), Some("person"));
}

#[test]
fn test_cli_info() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "entity", "alice"],
            &["add", "entity", "bob"],
            &["link", "alice", "KNOWS", "bob", "--weight", "0.7"],
        ],
    );

    let output = run_akg(&path, &["info"]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("Nodes: 2"));
    assert!(stdout.contains("entity: 2"));
    assert!(stdout.contains("Edges: 1"));
}

#[test]
fn test_cli_explore() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "entity", "hub"],
            &["add", "entity", "near"],
            &["add", "entity", "far"],
            &["add", "location", "place"],
            &["link", "hub", "KNOWS", "near", "--weight", "0.9"],
            &["link", "near", "KNOWS", "far", "--weight", "0.9"],
            &["link", "hub", "LOCATED_IN", "place", "--weight", "0.1"],
        ],
    );

    let output = run_akg(&path, &["--format", "json", "explore", "hub", "--depth", "1"]);
    let fragment = json_out(&output);
    let names: Vec<&str> = fragment["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["hub", "near", "place"]);

    let output = run_akg(
        &path,
        &["explore", "hub", "--depth", "3", "--exclude", "location"],
    );
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("far [entity]"));
    assert!(!stdout.contains("place"));
}

#[test]
fn test_cli_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "concept", "a"],
            &["add", "concept", "b"],
            &["add", "concept", "c"],
            &["link", "a", "RELATED_TO", "b", "--weight", "0.1"],
            &["link", "a", "RELATED_TO", "c", "--weight", "1.0"],
            &["link", "c", "RELATED_TO", "b", "--weight", "1.0"],
        ],
    );

    let output = run_akg(&path, &["path", "a", "b"]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("a -> c -> b"));
    assert!(stdout.contains("Hops: 2"));

    let output = run_akg(&path, &["path", "b", "a"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("No path from b to a"));

    let output = run_akg(&path, &["--format", "json", "path", "b", "a", "--bidirectional"]);
    let result = json_out(&output);
    assert_eq!(result["hops"], 2);
}

#[test]
fn test_cli_timeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "event", "wake", "--set", "timestamp=2024-05-01T07:00:00Z"],
            &["add", "event", "coffee", "--set", "timestamp=2024-05-01T07:15:00Z"],
            &["add", "event", "commute", "--set", "timestamp=2024-05-01T08:00:00Z"],
            &["link", "wake", "NEXT", "coffee"],
            &["link", "coffee", "NEXT", "commute"],
        ],
    );

    let output = run_akg(&path, &["timeline", "wake"]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    let wake = stdout.find("wake").unwrap();
    let coffee = stdout.find("coffee").unwrap();
    let commute = stdout.find("commute").unwrap();
    assert!(wake < coffee && coffee < commute);

    let output = run_akg(
        &path,
        &["--format", "json", "timeline", "commute", "--direction", "backward"],
    );
    let sequence = json_out(&output);
    assert_eq!(sequence["origin"], "relations");
    let names: Vec<&str> = sequence["fragment"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["commute", "coffee", "wake"]);
}

#[test]
fn test_cli_provenance_and_validate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[&[
            "add",
            "proposition",
            "tides",
            "--set",
            "statement=The moon causes tides",
            "--confidence",
            "0.8",
        ]],
    );

    let output = run_akg(&path, &["validate", "tides"]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("tides [proposition] has 1 issue(s):"));
    assert!(stdout.contains("missing DERIVED_FROM relation to a source"));

    // Strict mode turns issues into a failure.
    let output = run_akg(&path, &["validate", "tides", "--strict"]);
    assert!(!output.status.success());

    let output = run_akg(
        &path,
        &[
            "source",
            "almanac",
            "--type",
            "document",
            "--reliability",
            "0.9",
            "--for",
            "tides",
        ],
    );
    assert_success(&output);
    assert!(stdout_str(&output).contains("Provenance links: 1 written"));

    let output = run_akg(&path, &["validate", "tides", "--strict"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("tides [proposition] is valid"));
}

#[test]
fn test_cli_reasoning_chain() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "thought", "why-tides", "--set", "thoughtContent=why are there tides?"],
            &[
                "chain",
                "tide-argument",
                "--conclusion",
                "the moon pulls the sea",
                "--source-thought",
                "why-tides",
            ],
            &["add", "law", "gravity", "--set", "statement=masses attract"],
        ],
    );

    let output = run_akg(
        &path,
        &[
            "step",
            "tide-argument",
            "premise",
            "--type",
            "premise",
            "--content",
            "masses attract",
            "--reference",
            "gravity",
        ],
    );
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("Step premise #1"));
    assert!(stdout.contains("references: gravity"));

    let output = run_akg(
        &path,
        &[
            "step",
            "tide-argument",
            "conclusion",
            "--type",
            "conclusion",
            "--previous",
            "premise",
        ],
    );
    assert_success(&output);
    assert!(stdout_str(&output).contains("Step conclusion #2"));

    let output = run_akg(&path, &["--format", "json", "show-chain", "tide-argument"]);
    let fragment = json_out(&output);
    let names: Vec<&str> = fragment["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names[..3], ["tide-argument", "premise", "conclusion"]);
    assert!(names.contains(&"gravity"));
    assert_eq!(fragment["nodes"][0]["numberOfSteps"], 2);

    let graph = SnapshotReader::read_from_file(&path).unwrap();
    let thought_edges = graph.edges_from("why-tides").unwrap();
    assert!(thought_edges
        .iter()
        .any(|e| e.relation_type == RelationType::HasReasoning && e.to == "tide-argument"));
}

#[test]
fn test_cli_step_requires_chain() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(&path, &[&["create"]]);

    let output = run_akg(&path, &["step", "missing-chain", "s1"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_conflicts_and_assess() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "proposition", "earth-flat", "--confidence", "0.3"],
            &["add", "proposition", "earth-round", "--confidence", "0.95"],
            &["source", "survey", "--reliability", "0.9", "--for", "earth-round"],
            &[
                "link",
                "earth-flat",
                "CONTRADICTS",
                "earth-round",
                "--context",
                "shape disagreement",
            ],
        ],
    );

    let output = run_akg(&path, &["conflicts"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("earth-flat <-> earth-round: shape disagreement"));

    let output = run_akg(&path, &["conflicts", "survey"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("No conflicts"));

    let output = run_akg(
        &path,
        &["--format", "json", "assess", "earth-flat", "earth-round"],
    );
    let assessment = json_out(&output);
    let entries = assessment["assessments"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["node"], "earth-flat");
    assert_eq!(entries[0]["candidate"], true);
    assert_eq!(entries[1]["candidate"], false);
    assert_eq!(entries[1]["conflict_count"], 1);
    assert_eq!(assessment["conflicts"].as_array().unwrap().len(), 1);

    let output = run_akg(&path, &["assess", "--query", "earth"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("Assessed 2 claim(s)"));
}

#[test]
fn test_cli_search_unlink_and_delete() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "concept", "borrowing", "--set", "definition=temporary access"],
            &["add", "concept", "lifetimes", "--set", "definition=scope of a borrow"],
            &["link", "borrowing", "RELATED_TO", "lifetimes"],
        ],
    );

    let output = run_akg(&path, &["search", "borrowing", "--kind", "concept"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("borrowing [concept]"));

    let output = run_akg(&path, &["search", "zebra"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("No matches"));

    run_all(&path, &[&["unlink", "borrowing", "related-to", "lifetimes"]]);
    assert_eq!(
        SnapshotReader::read_from_file(&path)
            .unwrap()
            .edge_count()
            .unwrap(),
        0
    );

    let output = run_akg(&path, &["delete", "lifetimes"]);
    assert_success(&output);
    assert!(stdout_str(&output).contains("Deleted lifetimes"));
    let output = run_akg(&path, &["get", "lifetimes"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_cli_export_import() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[
            &["add", "entity", "alice"],
            &["add", "entity", "bob"],
            &["link", "alice", "KNOWS", "bob", "--weight", "0.6"],
        ],
    );

    let output = run_akg(&path, &["export", "--pretty"]);
    assert_success(&output);
    let exported = stdout_str(&output);
    assert!(exported.contains("\"relationType\": \"KNOWS\""));

    let mut json_file = NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut json_file, exported.as_bytes()).unwrap();

    let copy = dir.path().join("copy.akg");
    let output = run_akg(&copy, &["import", json_file.path().to_str().unwrap()]);
    assert_success(&output);
    let stdout = stdout_str(&output);
    assert!(stdout.contains("Nodes: 2 written"));
    assert!(stdout.contains("Edges: 1 written"));

    let original = SnapshotReader::read_from_file(&path).unwrap();
    let imported = SnapshotReader::read_from_file(&copy).unwrap();
    assert_eq!(imported.node_count().unwrap(), 2);
    assert_eq!(
        imported.edges_from("alice").unwrap()[0].weight,
        original.edges_from("alice").unwrap()[0].weight
    );

    let output = run_akg(&path, &["export", "--nodes-only"]);
    let document: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(document["edges"].as_array().unwrap().is_empty());
}

#[test]
fn test_cli_json_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(&path, &[&["add", "agent", "scout", "--set", "capabilities=[\"search\"]"]]);

    let info = json_out(&run_akg(&path, &["--format", "json", "info"]));
    assert_eq!(info["stats"]["node_count"], 1);

    let node = json_out(&run_akg(&path, &["--format", "json", "get", "scout"]));
    assert_eq!(node["node"]["kind"], "agent");
    assert_eq!(node["node"]["capabilities"][0], "search");
    assert!(node["outgoing"].as_array().unwrap().is_empty());
}

#[test]
fn test_cli_exit_codes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.akg");
    run_all(
        &path,
        &[&["add", "entity", "alice"], &["add", "source", "memo"]],
    );

    // Unknown node.
    assert_eq!(run_akg(&path, &["get", "nobody"]).status.code(), Some(4));
    assert_eq!(
        run_akg(&path, &["link", "alice", "KNOWS", "nobody"]).status.code(),
        Some(4)
    );
    // Bad input.
    assert_eq!(run_akg(&path, &["add", "gadget", "x"]).status.code(), Some(3));
    assert_eq!(
        run_akg(&path, &["link", "alice", "FROBS", "memo"]).status.code(),
        Some(3)
    );
    assert_eq!(
        run_akg(&path, &["link", "alice", "KNOWS", "memo", "--weight", "1.5"])
            .status
            .code(),
        Some(3)
    );
    assert_eq!(
        run_akg(&path, &["link", "memo", "DERIVED_FROM", "alice"])
            .status
            .code(),
        Some(3)
    );
    // Missing and corrupt files.
    let missing = dir.path().join("missing.akg");
    assert_eq!(run_akg(&missing, &["info"]).status.code(), Some(1));
    let corrupt = dir.path().join("corrupt.akg");
    std::fs::write(&corrupt, b"this is not a snapshot at all, not even close").unwrap();
    assert_eq!(run_akg(&corrupt, &["info"]).status.code(), Some(2));
}

// ==================== End-to-End ====================

fn proposition(name: &str, confidence: f32) -> Node {
    Node::proposition(name, format!("claim {name}")).with_confidence(confidence)
}

#[test]
fn test_provenance_conflict_scenario() {
    let graph = MemoryGraph::new();
    let write = WriteEngine::new();
    let query = QueryEngine::default();

    write
        .create_nodes(
            &graph,
            vec![
                Node::source("S1", SourceType::Document, 0.9),
                Node::source("S2", SourceType::ChatMessage, 0.4),
                proposition("P1", 0.8),
                proposition("P2", 0.8),
            ],
        )
        .into_result()
        .unwrap();
    write
        .create_relations(
            &graph,
            vec![
                Relation::new("P1", "S1", RelationType::DerivedFrom),
                Relation::new("P2", "S2", RelationType::DerivedFrom),
                Relation::new("P2", "P1", RelationType::Contradicts),
            ],
        )
        .into_result()
        .unwrap();

    assert!(query.validate(&graph, "P1").unwrap().valid);
    assert!(query.validate(&graph, "P2").unwrap().valid);

    let pairs = query
        .detect_conflicts(&graph, Some(&["P1".to_string()][..]))
        .unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].involves("P1") && pairs[0].involves("P2"));

    let assessment = query
        .assess_claims(&graph, &ClaimQuery::Names(vec!["P1".into(), "P2".into()]))
        .unwrap();
    let p1 = &assessment.assessments[0].report;
    let p2 = &assessment.assessments[1].report;
    assert_eq!(p1.sources.len(), 1);
    assert_eq!(p1.sources[0].source, "S1");
    assert!(p1.conflict_count >= 1);

    // Unconflicted, P1 would be 0.8 * 0.9.
    assert!(p1.effective_confidence < 0.72);
    assert!((p1.effective_confidence - 0.576).abs() < 1e-5);
    // The weaker source drags P2 further down.
    assert!(p2.effective_confidence < p1.effective_confidence);
    assert_eq!(assessment.conflicts.len(), 1);
}

#[test]
fn test_full_lifecycle() {
    let graph = MemoryGraph::new();
    let write = WriteEngine::new();
    let query = QueryEngine::default();

    // Knowledge with provenance.
    write.create_node(&graph, Node::source("journal", SourceType::Document, 0.8)).unwrap();
    let mut events = Vec::new();
    for (i, day) in ["2024-03-01", "2024-03-02", "2024-03-03"].iter().enumerate() {
        events.push(Node::new(
            format!("day{i}"),
            NodeData::Event(EventAttrs {
                timestamp: Some(day.to_string()),
                ..Default::default()
            }),
        ));
    }
    write.create_nodes(&graph, events).into_result().unwrap();
    write
        .create_relations(
            &graph,
            vec![
                Relation::new("day0", "day1", RelationType::Next),
                Relation::new("day1", "day2", RelationType::Next),
            ],
        )
        .into_result()
        .unwrap();

    write
        .create_node(
            &graph,
            Node::new(
                "idea",
                NodeData::Thought(ThoughtAttrs {
                    thought_content: Some("keep a daily log".into()),
                    ..Default::default()
                }),
            ),
        )
        .unwrap();
    write
        .create_relation(&graph, Relation::new("idea", "journal", RelationType::DerivedFrom))
        .unwrap();

    // A reasoning chain hanging off the thought.
    let created = write
        .create_chain(
            &graph,
            ChainSpec {
                name: "logging".into(),
                attrs: ReasoningChainAttrs {
                    conclusion: Some("logs help recall".into()),
                    source_thought: Some("idea".into()),
                    ..Default::default()
                },
            },
        )
        .unwrap();
    assert_eq!(created.linked_thought.as_deref(), Some("idea"));
    for (name, refs) in [("observe", vec!["day0"]), ("conclude", vec![])] {
        write
            .add_step(
                &graph,
                StepSpec {
                    chain: "logging".into(),
                    name: name.into(),
                    attrs: ReasoningStepAttrs {
                        supporting_references: refs.into_iter().map(String::from).collect(),
                        ..Default::default()
                    },
                    previous_steps: Vec::new(),
                },
            )
            .unwrap();
    }

    // Save and reload.
    let dir = tempdir().unwrap();
    let path = dir.path().join("lifecycle.akg");
    SnapshotWriter::new().write_to_file(&graph, &path).unwrap();
    let loaded = SnapshotReader::read_from_file(&path).unwrap();
    assert_eq!(loaded.node_count().unwrap(), graph.node_count().unwrap());
    assert_eq!(loaded.edge_count().unwrap(), graph.edge_count().unwrap());

    // Every query answers the same on the reloaded graph.
    let timeline = TemporalParams {
        start: "day0".into(),
        direction: TraversalDirection::Forward,
        ..Default::default()
    };
    let explore = ExploreParams::new(["idea"]);
    let path_params = PathParams {
        from: "idea".into(),
        to: "journal".into(),
        ..Default::default()
    };
    let chain = ChainQuery::Name("logging".into());

    for store in [&graph, &loaded] {
        let sequence = query.temporal_sequence(store, &timeline).unwrap();
        assert_eq!(sequence.origin, SequenceOrigin::Relations);
        assert_eq!(sequence.fragment.names(), vec!["day0", "day1", "day2"]);

        let fragment = query.explore(store, &explore).unwrap();
        assert_eq!(fragment.nodes[0].name, "idea");
        assert!(fragment.contains("logging"));
        assert!(fragment.contains("journal"));

        let chain_fragment = query.reasoning_chain(store, &chain).unwrap();
        assert_eq!(
            chain_fragment.names()[..3],
            ["logging", "observe", "conclude"]
        );
        assert!(chain_fragment.contains("day0"));

        assert!(query.validate(store, "idea").unwrap().valid);
        assert_eq!(
            query.search(store, "daily log", &[NodeKind::Thought], None).unwrap()[0]
                .node
                .name,
            "idea"
        );
    }

    // DERIVED_FROM is provenance, not a path.
    let result = query.shortest_path(&loaded, &path_params).unwrap();
    assert!(!result.found());

    // Mutations after reload persist on the next save.
    write.delete_node(&loaded, "day1").unwrap();
    SnapshotWriter::new().write_to_file(&loaded, &path).unwrap();
    let again = SnapshotReader::read_from_file(&path).unwrap();
    assert!(again.get_node("day1").unwrap().is_none());
    assert!(again.edges_from("day0").unwrap().is_empty());
}
