//! Node kinds, per-kind attribute sets and the core node struct.

use serde::{Deserialize, Serialize};

use super::{now_micros, DEFAULT_RELIABILITY};
use crate::types::error::{KgError, KgResult};

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// A person, organization, object or other named thing.
    Entity,
    /// Something that happened, with an optional time span.
    Event,
    /// An abstract idea.
    Concept,
    /// A measurable property with a value.
    Attribute,
    /// A statement that can be true or false.
    Proposition,
    /// A named emotion.
    Emotion,
    /// An actor with beliefs and capabilities.
    Agent,
    /// A hypothesis with evidence and methodology.
    ScientificInsight,
    /// A general rule with conditions and exceptions.
    Law,
    /// A place.
    Location,
    /// A recorded thought of the agent.
    Thought,
    /// An ordered argument made of reasoning steps.
    ReasoningChain,
    /// A single step of a reasoning chain.
    ReasoningStep,
    /// Provenance: where a piece of knowledge came from.
    Source,
    /// An emotional reaction tied to a moment in time.
    EmotionalEvent,
}

impl NodeKind {
    /// Every node kind, in declaration order.
    pub const ALL: [NodeKind; 15] = [
        Self::Entity,
        Self::Event,
        Self::Concept,
        Self::Attribute,
        Self::Proposition,
        Self::Emotion,
        Self::Agent,
        Self::ScientificInsight,
        Self::Law,
        Self::Location,
        Self::Thought,
        Self::ReasoningChain,
        Self::ReasoningStep,
        Self::Source,
        Self::EmotionalEvent,
    ];

    /// Return the snake_case name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Event => "event",
            Self::Concept => "concept",
            Self::Attribute => "attribute",
            Self::Proposition => "proposition",
            Self::Emotion => "emotion",
            Self::Agent => "agent",
            Self::ScientificInsight => "scientific_insight",
            Self::Law => "law",
            Self::Location => "location",
            Self::Thought => "thought",
            Self::ReasoningChain => "reasoning_chain",
            Self::ReasoningStep => "reasoning_step",
            Self::Source => "source",
            Self::EmotionalEvent => "emotional_event",
        }
    }

    /// Parse a kind from its name. Accepts snake_case, PascalCase and kebab-case.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::ALL
            .iter()
            .copied()
            .find(|kind| normalize(kind.name()) == wanted)
    }

    /// Kinds that must carry a `DERIVED_FROM` edge to a Source.
    pub fn requires_provenance(&self) -> bool {
        matches!(
            self,
            Self::Thought
                | Self::Proposition
                | Self::EmotionalEvent
                | Self::ReasoningChain
                | Self::ReasoningStep
        )
    }

    /// Whether this kind defines the generic `confidence` attribute.
    pub fn has_confidence(&self) -> bool {
        !matches!(self, Self::Emotion | Self::Source)
    }

    /// The attribute schema of this kind (serialized attribute names).
    pub fn attribute_names(&self) -> &'static [&'static str] {
        match self {
            Self::Entity => &[
                "description",
                "subType",
                "biography",
                "keyContributions",
                "observations",
                "confidence",
            ],
            Self::Event => &[
                "startDate",
                "endDate",
                "timestamp",
                "status",
                "duration",
                "location",
                "participants",
                "outcome",
                "significance",
                "confidence",
            ],
            Self::Concept => &[
                "definition",
                "description",
                "domain",
                "examples",
                "relatedConcepts",
                "significance",
                "confidence",
            ],
            Self::Attribute => &[
                "value",
                "unit",
                "valueType",
                "possibleValues",
                "description",
                "confidence",
            ],
            Self::Proposition => &[
                "statement",
                "status",
                "truthValue",
                "domain",
                "evidenceStrength",
                "counterEvidence",
                "confidence",
            ],
            Self::Emotion => &["intensity", "valence", "category", "subcategory", "description"],
            Self::Agent => &[
                "agentType",
                "description",
                "capabilities",
                "beliefs",
                "knowledge",
                "preferences",
                "modelName",
                "confidence",
            ],
            Self::ScientificInsight => &[
                "hypothesis",
                "evidence",
                "methodology",
                "field",
                "publications",
                "confidence",
            ],
            Self::Law => &[
                "statement",
                "conditions",
                "exceptions",
                "domain",
                "proof",
                "formalRepresentation",
                "confidence",
            ],
            Self::Location => &[
                "locationType",
                "latitude",
                "longitude",
                "description",
                "containingLocation",
                "significance",
                "confidence",
            ],
            Self::Thought => &[
                "thoughtContent",
                "references",
                "tags",
                "impact",
                "createdBy",
                "timestamp",
                "confidence",
            ],
            Self::ReasoningChain => &[
                "description",
                "conclusion",
                "methodology",
                "domain",
                "tags",
                "sourceThought",
                "numberOfSteps",
                "alternativeConclusionsConsidered",
                "confidence",
            ],
            Self::ReasoningStep => &[
                "content",
                "stepType",
                "stepNumber",
                "evidenceType",
                "supportingReferences",
                "alternatives",
                "counterarguments",
                "assumptions",
                "formalNotation",
                "confidence",
            ],
            Self::Source => &["sourceType", "uri", "title", "author", "retrievedAt", "reliability"],
            Self::EmotionalEvent => &[
                "timestamp",
                "valence",
                "arousal",
                "intensity",
                "trigger",
                "response",
                "context",
                "confidence",
            ],
        }
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Role of a step inside a reasoning chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// A starting assumption.
    Premise,
    /// A conclusion drawn from earlier steps.
    Inference,
    /// Support brought in from outside the chain.
    Evidence,
    /// An objection to an earlier step.
    Counterargument,
    /// An answer to a counterargument.
    Rebuttal,
    /// Where the chain ends up.
    Conclusion,
}

impl StepType {
    /// Return the snake_case name for this step type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Premise => "premise",
            Self::Inference => "inference",
            Self::Evidence => "evidence",
            Self::Counterargument => "counterargument",
            Self::Rebuttal => "rebuttal",
            Self::Conclusion => "conclusion",
        }
    }

    /// Parse a step type from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "premise" => Some(Self::Premise),
            "inference" => Some(Self::Inference),
            "evidence" => Some(Self::Evidence),
            "counterargument" | "counter_argument" => Some(Self::Counterargument),
            "rebuttal" => Some(Self::Rebuttal),
            "conclusion" => Some(Self::Conclusion),
            _ => None,
        }
    }
}

impl std::fmt::Display for StepType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The medium a Source node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// A message in a conversation with the agent.
    ChatMessage,
    /// A fetched web page.
    WebPage,
    /// A PDF file.
    Pdf,
    /// An email message.
    Email,
    /// A transcript of speech.
    Transcript,
    /// Any other document.
    Document,
    /// A response body from an external API.
    ApiPayload,
}

impl SourceType {
    /// Return the snake_case name for this source type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChatMessage => "chat_message",
            Self::WebPage => "web_page",
            Self::Pdf => "pdf",
            Self::Email => "email",
            Self::Transcript => "transcript",
            Self::Document => "document",
            Self::ApiPayload => "api_payload",
        }
    }

    /// Parse a source type from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "chat_message" | "chat" => Some(Self::ChatMessage),
            "web_page" | "web" => Some(Self::WebPage),
            "pdf" => Some(Self::Pdf),
            "email" => Some(Self::Email),
            "transcript" => Some(Self::Transcript),
            "document" => Some(Self::Document),
            "api_payload" | "api" => Some(Self::ApiPayload),
            _ => None,
        }
    }
}

/// Upsert semantics for a single attribute: a present incoming value wins.
trait MergeField {
    fn merge_from(&mut self, incoming: Self);
    fn is_unset(&self) -> bool;
}

impl<T> MergeField for Option<T> {
    fn merge_from(&mut self, incoming: Self) {
        if incoming.is_some() {
            *self = incoming;
        }
    }

    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

impl<T> MergeField for Vec<T> {
    fn merge_from(&mut self, incoming: Self) {
        if !incoming.is_empty() {
            *self = incoming;
        }
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! attributes {
    ($(#[$meta:meta])* $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(default, skip_serializing_if = "MergeField::is_unset")]
                pub $field: $ty,
            )*
        }

        impl $name {
            /// Overwrite every attribute that is present in `incoming`.
            pub fn merge(&mut self, incoming: Self) {
                $(self.$field.merge_from(incoming.$field);)*
            }
        }
    };
}

attributes!(
    /// Attributes of an Entity node.
    EntityAttrs {
        description: Option<String>,
        sub_type: Option<String>,
        biography: Option<String>,
        key_contributions: Vec<String>,
        observations: Vec<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of an Event node.
    EventAttrs {
        start_date: Option<String>,
        end_date: Option<String>,
        timestamp: Option<String>,
        status: Option<String>,
        duration: Option<String>,
        location: Option<String>,
        participants: Vec<String>,
        outcome: Option<String>,
        significance: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a Concept node.
    ConceptAttrs {
        definition: Option<String>,
        description: Option<String>,
        domain: Option<String>,
        examples: Vec<String>,
        related_concepts: Vec<String>,
        significance: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of an Attribute node.
    AttributeAttrs {
        value: Option<String>,
        unit: Option<String>,
        value_type: Option<String>,
        possible_values: Vec<String>,
        description: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a Proposition node.
    PropositionAttrs {
        statement: Option<String>,
        status: Option<String>,
        truth_value: Option<bool>,
        domain: Option<String>,
        evidence_strength: Option<f32>,
        counter_evidence: Vec<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of an Emotion node.
    EmotionAttrs {
        intensity: Option<f32>,
        valence: Option<f32>,
        category: Option<String>,
        subcategory: Option<String>,
        description: Option<String>,
    }
);

attributes!(
    /// Attributes of an Agent node.
    AgentAttrs {
        agent_type: Option<String>,
        description: Option<String>,
        capabilities: Vec<String>,
        beliefs: Vec<String>,
        knowledge: Vec<String>,
        preferences: Vec<String>,
        model_name: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a ScientificInsight node.
    ScientificInsightAttrs {
        hypothesis: Option<String>,
        evidence: Vec<String>,
        methodology: Option<String>,
        field: Option<String>,
        publications: Vec<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a Law node.
    LawAttrs {
        statement: Option<String>,
        conditions: Vec<String>,
        exceptions: Vec<String>,
        domain: Option<String>,
        proof: Option<String>,
        formal_representation: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a Location node.
    LocationAttrs {
        location_type: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        description: Option<String>,
        containing_location: Option<String>,
        significance: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a Thought node.
    ThoughtAttrs {
        thought_content: Option<String>,
        references: Vec<String>,
        tags: Vec<String>,
        impact: Option<String>,
        created_by: Option<String>,
        timestamp: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a ReasoningChain node.
    ReasoningChainAttrs {
        description: Option<String>,
        conclusion: Option<String>,
        methodology: Option<String>,
        domain: Option<String>,
        tags: Vec<String>,
        source_thought: Option<String>,
        number_of_steps: Option<u32>,
        alternative_conclusions_considered: Vec<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a ReasoningStep node.
    ReasoningStepAttrs {
        content: Option<String>,
        step_type: Option<StepType>,
        step_number: Option<u32>,
        evidence_type: Option<String>,
        supporting_references: Vec<String>,
        alternatives: Vec<String>,
        counterarguments: Vec<String>,
        assumptions: Vec<String>,
        formal_notation: Option<String>,
        confidence: Option<f32>,
    }
);

attributes!(
    /// Attributes of a Source node. Reliability defaults to 1.0 when absent.
    SourceAttrs {
        source_type: Option<SourceType>,
        uri: Option<String>,
        title: Option<String>,
        author: Option<String>,
        retrieved_at: Option<String>,
        reliability: Option<f32>,
    }
);

attributes!(
    /// Attributes of an EmotionalEvent node.
    EmotionalEventAttrs {
        timestamp: Option<String>,
        valence: Option<f32>,
        arousal: Option<f32>,
        intensity: Option<f32>,
        trigger: Option<String>,
        response: Option<String>,
        context: Option<String>,
        confidence: Option<f32>,
    }
);

/// Kind-tagged node payload. Each variant owns only the attributes of its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData {
    Entity(EntityAttrs),
    Event(EventAttrs),
    Concept(ConceptAttrs),
    Attribute(AttributeAttrs),
    Proposition(PropositionAttrs),
    Emotion(EmotionAttrs),
    Agent(AgentAttrs),
    ScientificInsight(ScientificInsightAttrs),
    Law(LawAttrs),
    Location(LocationAttrs),
    Thought(ThoughtAttrs),
    ReasoningChain(ReasoningChainAttrs),
    ReasoningStep(ReasoningStepAttrs),
    Source(SourceAttrs),
    EmotionalEvent(EmotionalEventAttrs),
}

impl NodeData {
    /// An empty payload of the given kind.
    pub fn empty(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Entity => Self::Entity(Default::default()),
            NodeKind::Event => Self::Event(Default::default()),
            NodeKind::Concept => Self::Concept(Default::default()),
            NodeKind::Attribute => Self::Attribute(Default::default()),
            NodeKind::Proposition => Self::Proposition(Default::default()),
            NodeKind::Emotion => Self::Emotion(Default::default()),
            NodeKind::Agent => Self::Agent(Default::default()),
            NodeKind::ScientificInsight => Self::ScientificInsight(Default::default()),
            NodeKind::Law => Self::Law(Default::default()),
            NodeKind::Location => Self::Location(Default::default()),
            NodeKind::Thought => Self::Thought(Default::default()),
            NodeKind::ReasoningChain => Self::ReasoningChain(Default::default()),
            NodeKind::ReasoningStep => Self::ReasoningStep(Default::default()),
            NodeKind::Source => Self::Source(Default::default()),
            NodeKind::EmotionalEvent => Self::EmotionalEvent(Default::default()),
        }
    }

    /// The kind tag of this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Entity(_) => NodeKind::Entity,
            Self::Event(_) => NodeKind::Event,
            Self::Concept(_) => NodeKind::Concept,
            Self::Attribute(_) => NodeKind::Attribute,
            Self::Proposition(_) => NodeKind::Proposition,
            Self::Emotion(_) => NodeKind::Emotion,
            Self::Agent(_) => NodeKind::Agent,
            Self::ScientificInsight(_) => NodeKind::ScientificInsight,
            Self::Law(_) => NodeKind::Law,
            Self::Location(_) => NodeKind::Location,
            Self::Thought(_) => NodeKind::Thought,
            Self::ReasoningChain(_) => NodeKind::ReasoningChain,
            Self::ReasoningStep(_) => NodeKind::ReasoningStep,
            Self::Source(_) => NodeKind::Source,
            Self::EmotionalEvent(_) => NodeKind::EmotionalEvent,
        }
    }

    /// The stored confidence, if this kind has one and it is set.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            Self::Entity(a) => a.confidence,
            Self::Event(a) => a.confidence,
            Self::Concept(a) => a.confidence,
            Self::Attribute(a) => a.confidence,
            Self::Proposition(a) => a.confidence,
            Self::Agent(a) => a.confidence,
            Self::ScientificInsight(a) => a.confidence,
            Self::Law(a) => a.confidence,
            Self::Location(a) => a.confidence,
            Self::Thought(a) => a.confidence,
            Self::ReasoningChain(a) => a.confidence,
            Self::ReasoningStep(a) => a.confidence,
            Self::EmotionalEvent(a) => a.confidence,
            Self::Emotion(_) | Self::Source(_) => None,
        }
    }

    fn confidence_mut(&mut self) -> Option<&mut Option<f32>> {
        match self {
            Self::Entity(a) => Some(&mut a.confidence),
            Self::Event(a) => Some(&mut a.confidence),
            Self::Concept(a) => Some(&mut a.confidence),
            Self::Attribute(a) => Some(&mut a.confidence),
            Self::Proposition(a) => Some(&mut a.confidence),
            Self::Agent(a) => Some(&mut a.confidence),
            Self::ScientificInsight(a) => Some(&mut a.confidence),
            Self::Law(a) => Some(&mut a.confidence),
            Self::Location(a) => Some(&mut a.confidence),
            Self::Thought(a) => Some(&mut a.confidence),
            Self::ReasoningChain(a) => Some(&mut a.confidence),
            Self::ReasoningStep(a) => Some(&mut a.confidence),
            Self::EmotionalEvent(a) => Some(&mut a.confidence),
            Self::Emotion(_) | Self::Source(_) => None,
        }
    }

    /// Merge an incoming payload into this one.
    ///
    /// Same kind: attributes present in `incoming` overwrite stored ones.
    /// Different kind: `incoming` replaces this payload. Returns `false` in that case.
    pub fn merge(&mut self, incoming: NodeData) -> bool {
        match (self, incoming) {
            (Self::Entity(a), Self::Entity(b)) => a.merge(b),
            (Self::Event(a), Self::Event(b)) => a.merge(b),
            (Self::Concept(a), Self::Concept(b)) => a.merge(b),
            (Self::Attribute(a), Self::Attribute(b)) => a.merge(b),
            (Self::Proposition(a), Self::Proposition(b)) => a.merge(b),
            (Self::Emotion(a), Self::Emotion(b)) => a.merge(b),
            (Self::Agent(a), Self::Agent(b)) => a.merge(b),
            (Self::ScientificInsight(a), Self::ScientificInsight(b)) => a.merge(b),
            (Self::Law(a), Self::Law(b)) => a.merge(b),
            (Self::Location(a), Self::Location(b)) => a.merge(b),
            (Self::Thought(a), Self::Thought(b)) => a.merge(b),
            (Self::ReasoningChain(a), Self::ReasoningChain(b)) => a.merge(b),
            (Self::ReasoningStep(a), Self::ReasoningStep(b)) => a.merge(b),
            (Self::Source(a), Self::Source(b)) => a.merge(b),
            (Self::EmotionalEvent(a), Self::EmotionalEvent(b)) => a.merge(b),
            (this, other) => {
                *this = other;
                return false;
            }
        }
        true
    }

    /// The chronological sort key: `timestamp`, else `startDate`.
    pub fn time_key(&self) -> Option<&str> {
        match self {
            Self::Event(a) => a.timestamp.as_deref().or(a.start_date.as_deref()),
            Self::Thought(a) => a.timestamp.as_deref(),
            Self::EmotionalEvent(a) => a.timestamp.as_deref(),
            _ => None,
        }
    }

    /// Free-text fields used for relevance search and similarity.
    pub fn text_fields(&self) -> Vec<&str> {
        fn push<'a>(out: &mut Vec<&'a str>, value: &'a Option<String>) {
            if let Some(v) = value {
                out.push(v.as_str());
            }
        }
        fn extend<'a>(out: &mut Vec<&'a str>, values: &'a [String]) {
            out.extend(values.iter().map(String::as_str));
        }

        let mut out = Vec::new();
        match self {
            Self::Entity(a) => {
                push(&mut out, &a.description);
                push(&mut out, &a.sub_type);
                push(&mut out, &a.biography);
                extend(&mut out, &a.observations);
                extend(&mut out, &a.key_contributions);
            }
            Self::Event(a) => {
                push(&mut out, &a.location);
                push(&mut out, &a.outcome);
                push(&mut out, &a.significance);
                extend(&mut out, &a.participants);
            }
            Self::Concept(a) => {
                push(&mut out, &a.definition);
                push(&mut out, &a.description);
                push(&mut out, &a.domain);
                extend(&mut out, &a.examples);
            }
            Self::Attribute(a) => {
                push(&mut out, &a.value);
                push(&mut out, &a.description);
            }
            Self::Proposition(a) => {
                push(&mut out, &a.statement);
                push(&mut out, &a.domain);
            }
            Self::Emotion(a) => {
                push(&mut out, &a.category);
                push(&mut out, &a.subcategory);
                push(&mut out, &a.description);
            }
            Self::Agent(a) => {
                push(&mut out, &a.agent_type);
                push(&mut out, &a.description);
                extend(&mut out, &a.capabilities);
                extend(&mut out, &a.beliefs);
            }
            Self::ScientificInsight(a) => {
                push(&mut out, &a.hypothesis);
                push(&mut out, &a.field);
                extend(&mut out, &a.evidence);
            }
            Self::Law(a) => {
                push(&mut out, &a.statement);
                push(&mut out, &a.domain);
                extend(&mut out, &a.conditions);
            }
            Self::Location(a) => {
                push(&mut out, &a.location_type);
                push(&mut out, &a.description);
                push(&mut out, &a.containing_location);
            }
            Self::Thought(a) => {
                push(&mut out, &a.thought_content);
                extend(&mut out, &a.tags);
            }
            Self::ReasoningChain(a) => {
                push(&mut out, &a.description);
                push(&mut out, &a.conclusion);
                push(&mut out, &a.domain);
                extend(&mut out, &a.tags);
            }
            Self::ReasoningStep(a) => {
                push(&mut out, &a.content);
                push(&mut out, &a.formal_notation);
            }
            Self::Source(a) => {
                push(&mut out, &a.title);
                push(&mut out, &a.author);
                push(&mut out, &a.uri);
            }
            Self::EmotionalEvent(a) => {
                push(&mut out, &a.trigger);
                push(&mut out, &a.response);
                push(&mut out, &a.context);
            }
        }
        out
    }
}

/// A node of the knowledge graph, identified by its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique, case-sensitive, non-empty name.
    pub name: String,
    /// Kind tag and kind-specific attributes.
    #[serde(flatten)]
    pub data: NodeData,
    /// When this node was first written (Unix epoch microseconds).
    #[serde(default)]
    pub created_at: u64,
    /// When this node was last written (Unix epoch microseconds).
    #[serde(default)]
    pub updated_at: u64,
}

impl Node {
    /// Create a node from a payload.
    pub fn new(name: impl Into<String>, data: NodeData) -> Self {
        let now = now_micros();
        Self {
            name: name.into(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a node of the given kind with no attributes set.
    pub fn of_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self::new(name, NodeData::empty(kind))
    }

    /// Create a Source node with the given reliability.
    pub fn source(name: impl Into<String>, source_type: SourceType, reliability: f32) -> Self {
        Self::new(
            name,
            NodeData::Source(SourceAttrs {
                source_type: Some(source_type),
                reliability: Some(reliability),
                ..Default::default()
            }),
        )
    }

    /// Create a Proposition node with a statement.
    pub fn proposition(name: impl Into<String>, statement: impl Into<String>) -> Self {
        Self::new(
            name,
            NodeData::Proposition(PropositionAttrs {
                statement: Some(statement.into()),
                ..Default::default()
            }),
        )
    }

    /// Set the generic confidence attribute. Ignored for kinds without one.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        if let Some(slot) = self.data.confidence_mut() {
            *slot = Some(confidence);
        }
        self
    }

    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Stored confidence, if any.
    pub fn confidence(&self) -> Option<f32> {
        self.data.confidence()
    }

    /// Source reliability (1.0 when unset). `None` for non-Source nodes.
    pub fn reliability(&self) -> Option<f32> {
        match &self.data {
            NodeData::Source(a) => Some(a.reliability.unwrap_or(DEFAULT_RELIABILITY)),
            _ => None,
        }
    }

    /// The chronological sort key of this node, if it has one.
    pub fn time_key(&self) -> Option<&str> {
        self.data.time_key()
    }

    /// Name plus all free-text attributes, space separated.
    pub fn searchable_text(&self) -> String {
        let mut text = self.name.clone();
        for field in self.data.text_fields() {
            text.push(' ');
            text.push_str(field);
        }
        text
    }

    /// Validate write-time constraints: non-empty name, confidence and reliability in range.
    pub fn validate(&self) -> KgResult<()> {
        if self.name.trim().is_empty() {
            return Err(KgError::InvalidName(self.name.clone()));
        }
        if let Some(c) = self.confidence() {
            if !(0.0..=1.0).contains(&c) {
                return Err(KgError::InvalidConfidence(c));
            }
        }
        if let NodeData::Source(SourceAttrs {
            reliability: Some(r),
            ..
        }) = &self.data
        {
            if !(0.0..=1.0).contains(r) {
                return Err(KgError::InvalidConfidence(*r));
            }
        }
        Ok(())
    }

    /// Merge an incoming write of the same name into this node.
    ///
    /// Returns `false` when the incoming kind differs and the payload was replaced.
    pub fn merge(&mut self, incoming: Node) -> bool {
        let same_kind = self.data.merge(incoming.data);
        self.updated_at = incoming.updated_at.max(self.updated_at);
        same_kind
    }
}
