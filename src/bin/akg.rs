//! CLI entry point for the `akg` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use agentic_knowledge::cli::commands::{self, CliContext};
use agentic_knowledge::config::{resolve_config, resolve_graph_path};
use agentic_knowledge::engine::{
    ChainQuery, ChainSpec, ClaimQuery, ExploreParams, PathParams, StepSpec, TemporalParams,
};
use agentic_knowledge::graph::TraversalDirection;
use agentic_knowledge::types::{
    NodeKind, ReasoningChainAttrs, ReasoningStepAttrs, Relation, RelationType, SourceAttrs,
    SourceType, StepType,
};
use agentic_knowledge::KgError;

#[derive(Parser)]
#[command(
    name = "akg",
    about = "Agentic knowledge graph CLI: typed memory with graph reasoning for AI agents"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Path to the .akg file (default: $AKG_GRAPH, then .akg/graph.akg)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Path to a TOML engine config (default: $AKG_CONFIG, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty .akg file
    Create,
    /// Display information about an .akg file
    Info,
    /// Create or update a node
    Add {
        /// Node kind: entity, event, concept, proposition, thought, ...
        kind: String,
        /// Unique node name
        name: String,
        /// Attribute as key=value (camelCase key; value parsed as JSON when possible)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Attributes as a JSON object
        #[arg(long)]
        attrs: Option<String>,
        /// Confidence 0.0-1.0
        #[arg(long)]
        confidence: Option<f32>,
    },
    /// Create or update a relation between two nodes
    Link {
        /// Source node name
        from: String,
        /// Relation type, e.g. DERIVED_FROM, CAUSES, CONTRADICTS
        relation_type: String,
        /// Target node name
        to: String,
        /// Edge weight 0.0-1.0
        #[arg(long)]
        weight: Option<f32>,
        /// Relation confidence 0.0-1.0
        #[arg(long)]
        confidence: Option<f32>,
        /// Free-text context
        #[arg(long)]
        context: Option<String>,
        /// Backing source names
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Step order (CONTAINS_STEP)
        #[arg(long)]
        order: Option<u32>,
    },
    /// Record a source and link the nodes derived from it
    Source {
        /// Source name
        name: String,
        /// Source type: chat_message, web_page, pdf, email, transcript, document, api_payload
        #[arg(long = "type")]
        source_type: Option<String>,
        #[arg(long)]
        uri: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        /// Reliability 0.0-1.0
        #[arg(long)]
        reliability: Option<f32>,
        /// Nodes derived from this source
        #[arg(long = "for", value_name = "NODE")]
        derived: Vec<String>,
    },
    /// Show a node and its edges
    Get {
        /// Node name
        name: String,
    },
    /// Delete a node and its edges
    Delete {
        /// Node name
        name: String,
    },
    /// Delete one relation
    Unlink {
        from: String,
        relation_type: String,
        to: String,
    },
    /// Relevance search over names and text attributes
    Search {
        /// Query text
        query: String,
        /// Comma-separated node kinds to keep
        #[arg(long)]
        kind: Option<String>,
        /// Maximum results
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Explore the weighted neighbourhood of some seeds
    Explore {
        /// Seed names or search queries
        #[arg(required = true)]
        seeds: Vec<String>,
        /// Maximum hops from a seed
        #[arg(long)]
        depth: Option<u32>,
        /// Ignore edges lighter than this
        #[arg(long)]
        min_weight: Option<f32>,
        /// Maximum nodes to return
        #[arg(long)]
        max_nodes: Option<usize>,
        /// Comma-separated node kinds to keep
        #[arg(long)]
        include: Option<String>,
        /// Comma-separated node kinds to drop
        #[arg(long)]
        exclude: Option<String>,
        /// Comma-separated relation types to follow
        #[arg(long)]
        relations: Option<String>,
        /// Direction: forward, backward, or both
        #[arg(long, default_value = "both")]
        direction: String,
    },
    /// Find the cheapest path between two nodes
    Path {
        from: String,
        to: String,
        /// Maximum edges on the path
        #[arg(long)]
        max_hops: Option<u32>,
        /// Comma-separated node kinds allowed on the path
        #[arg(long)]
        include: Option<String>,
        /// Also follow edges against their direction
        #[arg(long)]
        bidirectional: bool,
    },
    /// Order events before or after a start node
    Timeline {
        /// Start node name or search query
        start: String,
        /// Direction: forward, backward, or both
        #[arg(long, default_value = "forward")]
        direction: String,
        /// Maximum nodes returned, start included
        #[arg(long)]
        max_events: Option<usize>,
        /// Comma-separated node kinds to keep
        #[arg(long)]
        kinds: Option<String>,
    },
    /// Create or update a reasoning chain
    Chain {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        conclusion: Option<String>,
        #[arg(long)]
        domain: Option<String>,
        #[arg(long)]
        methodology: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Thought this chain elaborates
        #[arg(long)]
        source_thought: Option<String>,
        #[arg(long)]
        confidence: Option<f32>,
    },
    /// Add a step to a reasoning chain
    Step {
        /// Chain name
        chain: String,
        /// Step name
        name: String,
        #[arg(long)]
        content: Option<String>,
        /// Step type: premise, inference, evidence, counterargument, rebuttal, conclusion
        #[arg(long = "type")]
        step_type: Option<String>,
        /// Step number (appended when omitted)
        #[arg(long)]
        number: Option<u32>,
        /// Supporting node names
        #[arg(long = "reference")]
        references: Vec<String>,
        /// Steps this one follows from
        #[arg(long = "previous")]
        previous: Vec<String>,
        #[arg(long)]
        confidence: Option<f32>,
    },
    /// Show a reasoning chain with its steps
    ShowChain {
        /// Chain name
        #[arg(required_unless_present = "topic")]
        name: Option<String>,
        /// Find chains by topic instead
        #[arg(long, conflicts_with = "name")]
        topic: Vec<String>,
    },
    /// List contradictions
    Conflicts {
        /// Only pairs involving these nodes
        names: Vec<String>,
    },
    /// Assess the confidence of claims
    Assess {
        /// Claim names
        names: Vec<String>,
        /// Assess the top hits of a search instead
        #[arg(long, conflicts_with = "names")]
        query: Option<String>,
        /// Maximum search hits
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Check provenance and confidence of a node
    Validate {
        name: String,
        /// Exit with an error when the node is invalid
        #[arg(long)]
        strict: bool,
    },
    /// Export the graph as JSON
    Export {
        /// Export only nodes, no edges
        #[arg(long)]
        nodes_only: bool,
        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Import nodes and edges from JSON
    Import {
        /// Path to the JSON file
        json_file: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn invalid(what: &str, value: &str) -> ! {
    eprintln!("Invalid {what}: {value}");
    process::exit(3);
}

fn parse_kind(name: &str) -> NodeKind {
    NodeKind::from_name(name).unwrap_or_else(|| invalid("node kind", name))
}

fn parse_kinds(list: Option<String>) -> Vec<NodeKind> {
    list.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(parse_kind)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_relation_type(name: &str) -> RelationType {
    RelationType::from_name(name).unwrap_or_else(|| invalid("relation type", name))
}

fn parse_direction(name: &str) -> TraversalDirection {
    TraversalDirection::from_name(name).unwrap_or_else(|| invalid("direction", name))
}

fn parse_attributes(
    set: Vec<String>,
    attrs: Option<String>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut map = match attrs {
        Some(text) => match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => invalid("attributes (expected a JSON object)", &text),
        },
        None => serde_json::Map::new(),
    };
    for pair in set {
        let Some((key, value)) = pair.split_once('=') else {
            invalid("attribute (expected KEY=VALUE)", &pair);
        };
        let value = serde_json::from_str(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
        map.insert(key.trim().to_string(), value);
    }
    map
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(3);
        }
    };
    let ctx = CliContext {
        path: resolve_graph_path(cli.file.as_deref()),
        config,
        json: cli.format == "json",
    };

    let result = match cli.command {
        Commands::Create => commands::cmd_create(&ctx),
        Commands::Info => commands::cmd_info(&ctx),
        Commands::Add {
            kind,
            name,
            set,
            attrs,
            confidence,
        } => {
            let kind = parse_kind(&kind);
            let attributes = parse_attributes(set, attrs);
            commands::build_node(&name, kind, attributes).and_then(|node| {
                let node = match confidence {
                    Some(c) => node.with_confidence(c),
                    None => node,
                };
                commands::cmd_add(&ctx, node)
            })
        }
        Commands::Link {
            from,
            relation_type,
            to,
            weight,
            confidence,
            context,
            sources,
            order,
        } => {
            let mut relation = Relation::new(from, to, parse_relation_type(&relation_type))
                .with_sources(sources);
            relation.weight = weight;
            relation.confidence_score = confidence;
            relation.context = context;
            relation.order = order;
            commands::cmd_link(&ctx, relation)
        }
        Commands::Source {
            name,
            source_type,
            uri,
            title,
            author,
            reliability,
            derived,
        } => {
            let source_type = source_type.map(|t| {
                SourceType::from_name(&t).unwrap_or_else(|| invalid("source type", &t))
            });
            let attrs = SourceAttrs {
                source_type,
                uri,
                title,
                author,
                reliability,
                ..Default::default()
            };
            commands::cmd_source(&ctx, &name, attrs, derived)
        }
        Commands::Get { name } => commands::cmd_get(&ctx, &name),
        Commands::Delete { name } => commands::cmd_delete(&ctx, &name),
        Commands::Unlink {
            from,
            relation_type,
            to,
        } => commands::cmd_unlink(&ctx, &from, parse_relation_type(&relation_type), &to),
        Commands::Search { query, kind, limit } => {
            commands::cmd_search(&ctx, &query, &parse_kinds(kind), limit)
        }
        Commands::Explore {
            seeds,
            depth,
            min_weight,
            max_nodes,
            include,
            exclude,
            relations,
            direction,
        } => {
            let relation_types = relations
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(parse_relation_type)
                        .collect()
                })
                .unwrap_or_default();
            let params = ExploreParams {
                seeds,
                max_depth: depth,
                min_weight,
                include_kinds: parse_kinds(include),
                exclude_kinds: parse_kinds(exclude),
                max_nodes,
                relation_types,
                direction: parse_direction(&direction),
            };
            commands::cmd_explore(&ctx, &params)
        }
        Commands::Path {
            from,
            to,
            max_hops,
            include,
            bidirectional,
        } => {
            let params = PathParams {
                from,
                to,
                max_hops,
                include_kinds: parse_kinds(include),
                bidirectional,
            };
            commands::cmd_path(&ctx, &params)
        }
        Commands::Timeline {
            start,
            direction,
            max_events,
            kinds,
        } => {
            let params = TemporalParams {
                start,
                direction: parse_direction(&direction),
                max_events,
                kinds: parse_kinds(kinds),
            };
            commands::cmd_timeline(&ctx, &params)
        }
        Commands::Chain {
            name,
            description,
            conclusion,
            domain,
            methodology,
            tags,
            source_thought,
            confidence,
        } => {
            let spec = ChainSpec {
                name,
                attrs: ReasoningChainAttrs {
                    description,
                    conclusion,
                    domain,
                    methodology,
                    tags,
                    source_thought,
                    confidence,
                    ..Default::default()
                },
            };
            commands::cmd_chain(&ctx, spec)
        }
        Commands::Step {
            chain,
            name,
            content,
            step_type,
            number,
            references,
            previous,
            confidence,
        } => {
            let step_type = step_type.map(|t| {
                StepType::from_name(&t).unwrap_or_else(|| invalid("step type", &t))
            });
            let spec = StepSpec {
                chain,
                name,
                attrs: ReasoningStepAttrs {
                    content,
                    step_type,
                    step_number: number,
                    supporting_references: references,
                    confidence,
                    ..Default::default()
                },
                previous_steps: previous,
            };
            commands::cmd_step(&ctx, spec)
        }
        Commands::ShowChain { name, topic } => {
            let query = match name {
                Some(name) => ChainQuery::Name(name),
                None => ChainQuery::Topics(topic),
            };
            commands::cmd_show_chain(&ctx, &query)
        }
        Commands::Conflicts { names } => commands::cmd_conflicts(&ctx, &names),
        Commands::Assess {
            names,
            query,
            limit,
        } => {
            let query = match query {
                Some(query) => ClaimQuery::Search { query, limit },
                None => ClaimQuery::Names(names),
            };
            commands::cmd_assess(&ctx, &query)
        }
        Commands::Validate { name, strict } => commands::cmd_validate(&ctx, &name, strict),
        Commands::Export { nodes_only, pretty } => commands::cmd_export(&ctx, nodes_only, pretty),
        Commands::Import { json_file } => commands::cmd_import(&ctx, &json_file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            KgError::Io(_) => 1,
            KgError::InvalidMagic
            | KgError::UnsupportedVersion(_)
            | KgError::Truncated
            | KgError::Compression(_)
            | KgError::Json(_) => 2,
            KgError::InvalidName(_)
            | KgError::InvalidConfidence(_)
            | KgError::InvalidWeight(_)
            | KgError::TypeMismatch { .. }
            | KgError::Config(_) => 3,
            KgError::NotFound(_) => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
