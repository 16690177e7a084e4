//! Relation types and the core relation (edge) struct.

use serde::{Deserialize, Serialize};

use super::node::NodeKind;
use super::{now_micros, DEFAULT_EDGE_WEIGHT};
use crate::types::error::{KgError, KgResult};

/// Semantic family of a relation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationCategory {
    Hierarchical,
    Compositional,
    Spatial,
    Temporal,
    Causal,
    Social,
    Emotional,
    Evidentiary,
    Provenance,
    Reasoning,
    Associative,
}

impl RelationCategory {
    /// Return a human-readable name for this category.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hierarchical => "hierarchical",
            Self::Compositional => "compositional",
            Self::Spatial => "spatial",
            Self::Temporal => "temporal",
            Self::Causal => "causal",
            Self::Social => "social",
            Self::Emotional => "emotional",
            Self::Evidentiary => "evidentiary",
            Self::Provenance => "provenance",
            Self::Reasoning => "reasoning",
            Self::Associative => "associative",
        }
    }
}

macro_rules! relation_types {
    ($($variant:ident => $name:literal, $category:ident;)*) => {
        /// The closed vocabulary of relation verbs.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum RelationType {
            $(
                #[serde(rename = $name)]
                $variant,
            )*
        }

        impl RelationType {
            /// Every relation type, in declaration order.
            pub const ALL: &'static [RelationType] = &[$(Self::$variant,)*];

            /// The SCREAMING_SNAKE verb of this relation type.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// The semantic family of this relation type.
            pub fn category(&self) -> RelationCategory {
                match self {
                    $(Self::$variant => RelationCategory::$category,)*
                }
            }
        }
    };
}

relation_types! {
    IsA => "IS_A", Hierarchical;
    InstanceOf => "INSTANCE_OF", Hierarchical;
    SubClassOf => "SUB_CLASS_OF", Hierarchical;
    SuperClassOf => "SUPER_CLASS_OF", Hierarchical;
    HasType => "HAS_TYPE", Hierarchical;

    PartOf => "PART_OF", Compositional;
    HasPart => "HAS_PART", Compositional;
    Contains => "CONTAINS", Compositional;
    ComponentOf => "COMPONENT_OF", Compositional;
    MemberOf => "MEMBER_OF", Compositional;
    HasMember => "HAS_MEMBER", Compositional;

    LocatedIn => "LOCATED_IN", Spatial;
    HasLocation => "HAS_LOCATION", Spatial;
    ContainedIn => "CONTAINED_IN", Spatial;
    Near => "NEAR", Spatial;
    AdjacentTo => "ADJACENT_TO", Spatial;
    OccurredAt => "OCCURRED_AT", Spatial;
    OriginatedFrom => "ORIGINATED_FROM", Spatial;

    Next => "NEXT", Temporal;
    Previous => "PREVIOUS", Temporal;
    Before => "BEFORE", Temporal;
    After => "AFTER", Temporal;
    Follows => "FOLLOWS", Temporal;
    Precedes => "PRECEDES", Temporal;
    During => "DURING", Temporal;
    ConcurrentWith => "CONCURRENT_WITH", Temporal;
    OccurredOn => "OCCURRED_ON", Temporal;

    Causes => "CAUSES", Causal;
    CausedBy => "CAUSED_BY", Causal;
    Influences => "INFLUENCES", Causal;
    InfluencedBy => "INFLUENCED_BY", Causal;
    Enables => "ENABLES", Causal;
    Prevents => "PREVENTS", Causal;
    ContributesTo => "CONTRIBUTES_TO", Causal;
    ResultsIn => "RESULTS_IN", Causal;
    ResultsFrom => "RESULTS_FROM", Causal;
    DependsOn => "DEPENDS_ON", Causal;
    Triggers => "TRIGGERS", Causal;

    Knows => "KNOWS", Social;
    FriendOf => "FRIEND_OF", Social;
    Mentors => "MENTORS", Social;
    MentoredBy => "MENTORED_BY", Social;
    Employs => "EMPLOYS", Social;
    WorksFor => "WORKS_FOR", Social;
    CollaboratesWith => "COLLABORATES_WITH", Social;
    ParentOf => "PARENT_OF", Social;
    ChildOf => "CHILD_OF", Social;
    MarriedTo => "MARRIED_TO", Social;
    Founded => "FOUNDED", Social;
    CreatedBy => "CREATED_BY", Social;
    Authored => "AUTHORED", Social;

    Feels => "FEELS", Emotional;
    ExpressesEmotion => "EXPRESSES_EMOTION", Emotional;
    Evokes => "EVOKES", Emotional;
    Likes => "LIKES", Emotional;
    Dislikes => "DISLIKES", Emotional;
    Loves => "LOVES", Emotional;
    Fears => "FEARS", Emotional;

    Supports => "SUPPORTS", Evidentiary;
    Contradicts => "CONTRADICTS", Evidentiary;
    Refutes => "REFUTES", Evidentiary;
    Confirms => "CONFIRMS", Evidentiary;
    Challenges => "CHALLENGES", Evidentiary;
    Disputes => "DISPUTES", Evidentiary;
    ProvidesEvidenceFor => "PROVIDES_EVIDENCE_FOR", Evidentiary;

    DerivedFrom => "DERIVED_FROM", Provenance;
    Cites => "CITES", Provenance;
    CitedBy => "CITED_BY", Provenance;
    SourceOf => "SOURCE_OF", Provenance;
    RecordedIn => "RECORDED_IN", Provenance;
    MentionedIn => "MENTIONED_IN", Provenance;

    ContainsStep => "CONTAINS_STEP", Reasoning;
    LeadsTo => "LEADS_TO", Reasoning;
    References => "REFERENCES", Reasoning;
    HasReasoning => "HAS_REASONING", Reasoning;
    Implies => "IMPLIES", Reasoning;
    InferredFrom => "INFERRED_FROM", Reasoning;

    RelatedTo => "RELATED_TO", Associative;
    AssociatedWith => "ASSOCIATED_WITH", Associative;
    SimilarTo => "SIMILAR_TO", Associative;
    OppositeOf => "OPPOSITE_OF", Associative;
    Exemplifies => "EXEMPLIFIES", Associative;
    HasProperty => "HAS_PROPERTY", Associative;
    HasAttribute => "HAS_ATTRIBUTE", Associative;
    Describes => "DESCRIBES", Associative;
    AppliesTo => "APPLIES_TO", Associative;
    Uses => "USES", Associative;
}

/// Which way a temporal relation points in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalOrientation {
    /// Following the edge from its origin moves forward in the sequence.
    Forward,
    /// Following the edge from its origin moves backward in the sequence.
    Backward,
}

impl RelationType {
    /// Parse a relation type from its verb. Case-insensitive; `-` and spaces count as `_`.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted: String = name
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .flat_map(char::to_uppercase)
            .collect();
        Self::ALL.iter().copied().find(|rt| rt.name() == wanted)
    }

    /// Direction semantics used by temporal sequencing.
    pub fn temporal_orientation(&self) -> Option<TemporalOrientation> {
        match self {
            Self::Next | Self::After | Self::Causes | Self::Follows => {
                Some(TemporalOrientation::Forward)
            }
            Self::Previous | Self::Before | Self::CausedBy | Self::Precedes => {
                Some(TemporalOrientation::Backward)
            }
            _ => None,
        }
    }

    /// Whether shortest-path search uses this relation for its cost graph.
    pub fn is_path_bearing(&self) -> bool {
        matches!(
            self.category(),
            RelationCategory::Hierarchical
                | RelationCategory::Compositional
                | RelationCategory::Spatial
                | RelationCategory::Causal
                | RelationCategory::Associative
        )
    }

    /// Allowed kinds for the (from, to) endpoints. `None` means unconstrained.
    pub fn endpoint_kinds(&self) -> (Option<&'static [NodeKind]>, Option<&'static [NodeKind]>) {
        match self {
            Self::DerivedFrom | Self::RecordedIn => (None, Some(&[NodeKind::Source])),
            Self::SourceOf => (Some(&[NodeKind::Source]), None),
            Self::ContainsStep => (
                Some(&[NodeKind::ReasoningChain]),
                Some(&[NodeKind::ReasoningStep]),
            ),
            Self::HasReasoning => (
                Some(&[NodeKind::Thought]),
                Some(&[NodeKind::ReasoningChain]),
            ),
            Self::LeadsTo => (
                Some(&[NodeKind::ReasoningStep]),
                Some(&[NodeKind::ReasoningStep]),
            ),
            _ => (None, None),
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Identity of a relation: one edge per (from, to, type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelationKey {
    pub from: String,
    pub to: String,
    pub relation_type: RelationType,
}

/// A directed, typed relationship between two named nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    /// Origin node name.
    pub from: String,
    /// Destination node name.
    pub to: String,
    /// Relation verb.
    pub relation_type: RelationType,
    /// Strength 0.0–1.0; traversal cost is its inverse. Absent means 0.5.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
    /// How certain the relation is (0.0–1.0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,
    /// Free-text explanation of the relation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Names of sources backing this relation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Position of a step inside its chain (CONTAINS_STEP).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// When this relation was first written (Unix epoch microseconds).
    #[serde(default)]
    pub created_at: u64,
}

impl Relation {
    /// Create a relation with no attributes set.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: RelationType,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type,
            weight: None,
            confidence_score: None,
            context: None,
            sources: Vec::new(),
            order: None,
            created_at: now_micros(),
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set the confidence score.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence_score = Some(confidence);
        self
    }

    /// Set the context text.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the backing source names.
    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Set the step order.
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Effective weight (0.5 when unset).
    pub fn weight(&self) -> f32 {
        self.weight.unwrap_or(DEFAULT_EDGE_WEIGHT)
    }

    /// Traversal cost `1/weight`; `None` (infinite) for non-positive weights.
    pub fn cost(&self) -> Option<f32> {
        let w = self.weight();
        if w > 0.0 {
            Some(1.0 / w)
        } else {
            None
        }
    }

    /// The identity key of this relation.
    pub fn key(&self) -> RelationKey {
        RelationKey {
            from: self.from.clone(),
            to: self.to.clone(),
            relation_type: self.relation_type,
        }
    }

    /// Whether this relation touches the named node.
    pub fn touches(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }

    /// The endpoint opposite to `name`.
    pub fn other_end(&self, name: &str) -> &str {
        if self.from == name {
            &self.to
        } else {
            &self.from
        }
    }

    /// Validate weight and confidence ranges.
    pub fn validate(&self) -> KgResult<()> {
        if let Some(w) = self.weight {
            if !(0.0..=1.0).contains(&w) {
                return Err(KgError::InvalidWeight(w));
            }
        }
        if let Some(c) = self.confidence_score {
            if !(0.0..=1.0).contains(&c) {
                return Err(KgError::InvalidConfidence(c));
            }
        }
        if self.from.trim().is_empty() {
            return Err(KgError::InvalidName(self.from.clone()));
        }
        if self.to.trim().is_empty() {
            return Err(KgError::InvalidName(self.to.clone()));
        }
        Ok(())
    }

    /// Upsert: attributes present in `incoming` overwrite stored ones.
    pub fn merge(&mut self, incoming: Relation) {
        if incoming.weight.is_some() {
            self.weight = incoming.weight;
        }
        if incoming.confidence_score.is_some() {
            self.confidence_score = incoming.confidence_score;
        }
        if incoming.context.is_some() {
            self.context = incoming.context;
        }
        if !incoming.sources.is_empty() {
            self.sources = incoming.sources;
        }
        if incoming.order.is_some() {
            self.order = incoming.order;
        }
    }
}
