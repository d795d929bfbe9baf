//! Knowledge unit data model and submission preparation.
//!
//! Units are structural: required top-level fields are typed, while
//! `metadata`, `task`, and unknown top-level fields stay open maps so the
//! client keeps working as the registry schema evolves. The client never
//! range-validates scores or enum membership; the registry is authoritative
//! and rejects malformed units server-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Schema namespace for knowledge units exchanged with the registry.
pub const KP_CONTEXT: &str = "https://openknowledgepulse.org/schema/v1";

/// Variant kind of a knowledge unit.
///
/// The set is open: values the client does not recognize round-trip through
/// [`UnitKind::Other`] untouched rather than being rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// A recorded reasoning trace.
    ReasoningTrace,
    /// A reusable tool-call pattern.
    ToolCallPattern,
    /// A packaged skill.
    Skill,
    /// Any kind this client version does not know about.
    Other(String),
}

impl UnitKind {
    /// Wire form of the kind tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReasoningTrace => "ReasoningTrace",
            Self::ToolCallPattern => "ToolCallPattern",
            Self::Skill => "Skill",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for UnitKind {
    fn from(s: &str) -> Self {
        match s {
            "ReasoningTrace" => Self::ReasoningTrace,
            "ToolCallPattern" => Self::ToolCallPattern,
            "Skill" => Self::Skill,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UnitKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UnitKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(|s| Self::from(s.as_str()))
    }
}

/// Access scope of a contributed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible only to the contributing agent.
    Private,
    /// Visible within the contributing network.
    Network,
    /// Visible to everyone.
    Public,
}

/// Privacy treatment applied to a contributed unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// Aggregated with other contributions before exposure.
    Aggregated,
    /// Kept on the contributing node, shared as model updates.
    Federated,
    /// Never shared beyond the contributor.
    Private,
}

/// Metadata block of a knowledge unit.
///
/// Known fields are typed; anything else the registry adds round-trips
/// through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitMetadata {
    /// Creation timestamp (ISO 8601 on the wire).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Originating agent framework (`langgraph`, `crewai`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Task domain the unit was produced in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_domain: Option<String>,
    /// Whether the originating task succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Quality score in `[0, 1]`, transmitted unmodified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Access scope; overridable at submission time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Privacy treatment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_level: Option<PrivacyLevel>,
    /// Forward-compat extension fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Kind of a single reasoning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Internal reasoning.
    Thought,
    /// A tool invocation.
    ToolCall,
    /// An observed result.
    Observation,
    /// Recovery from a failed step.
    ErrorRecovery,
}

/// Reference to the tool a step invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRef {
    /// Tool name.
    pub name: String,
    /// MCP server the tool lives on, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_server: Option<String>,
}

/// One step of a reasoning trace. Step ids are caller-assigned and expected
/// to increase monotonically; the client does not enforce this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Caller-assigned ordinal.
    pub step_id: u64,
    /// Step kind.
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Step content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Tool reference for `tool_call` steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolRef>,
}

impl TraceStep {
    /// A `thought` step.
    #[must_use]
    pub fn thought(step_id: u64, content: impl Into<String>) -> Self {
        Self {
            step_id,
            kind: StepKind::Thought,
            content: Some(content.into()),
            tool: None,
        }
    }

    /// A `tool_call` step naming the tool used.
    #[must_use]
    pub fn tool_call(step_id: u64, content: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            step_id,
            kind: StepKind::ToolCall,
            content: Some(content.into()),
            tool: Some(ToolRef {
                name: tool.into(),
                mcp_server: None,
            }),
        }
    }

    /// An `observation` step.
    #[must_use]
    pub fn observation(step_id: u64, content: impl Into<String>) -> Self {
        Self {
            step_id,
            kind: StepKind::Observation,
            content: Some(content.into()),
            tool: None,
        }
    }
}

/// Final outcome of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Human-readable summary of the result.
    pub result_summary: String,
    /// Confidence in `[0, 1]`, transmitted unmodified.
    pub confidence: f64,
}

/// A structured record (reasoning trace, skill, or tool-call pattern)
/// exchanged between agents via the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeUnit {
    /// Schema namespace URI.
    #[serde(rename = "@context")]
    pub context: String,
    /// Variant kind tag.
    #[serde(rename = "@type")]
    pub kind: UnitKind,
    /// Namespaced identifier (`kp:trace:<uuid>`); uniqueness is enforced by
    /// the registry, not here.
    pub id: String,
    /// Metadata block. Optional: units without one are passed through and
    /// rejected server-side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<UnitMetadata>,
    /// Free-form task description.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub task: Value,
    /// Ordered reasoning steps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TraceStep>,
    /// Final outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    /// Unknown top-level fields, preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KnowledgeUnit {
    /// Create a unit with a freshly minted namespaced id and a `created_at`
    /// stamp of now.
    #[must_use]
    pub fn new(kind: UnitKind, framework: &str, task_domain: &str) -> Self {
        let namespace = match &kind {
            UnitKind::ReasoningTrace => "trace",
            UnitKind::ToolCallPattern => "pattern",
            UnitKind::Skill => "skill",
            UnitKind::Other(_) => "unit",
        };
        Self {
            context: KP_CONTEXT.to_string(),
            id: format!("kp:{namespace}:{}", Uuid::new_v4()),
            kind,
            metadata: Some(UnitMetadata {
                created_at: Some(Utc::now()),
                framework: Some(framework.to_string()),
                task_domain: Some(task_domain.to_string()),
                ..UnitMetadata::default()
            }),
            task: Value::Null,
            steps: Vec::new(),
            outcome: None,
            extra: Map::new(),
        }
    }

    /// Copy of this unit ready for transmission, with `visibility` written
    /// into the metadata block when an override is given.
    ///
    /// The caller's unit is never mutated. A unit without a metadata block is
    /// passed through unchanged: the client does not fabricate metadata, and
    /// rejection of malformed units is deferred to the registry.
    #[must_use]
    pub fn prepare_for_submission(&self, visibility: Option<Visibility>) -> Self {
        let mut prepared = self.clone();
        if let (Some(visibility), Some(metadata)) = (visibility, prepared.metadata.as_mut()) {
            metadata.visibility = Some(visibility);
        }
        prepared
    }
}

/// A reusable agent skill listed by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Namespaced identifier (`kp:skill:<name>:<version>`).
    pub id: String,
    /// Skill name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Registry-assigned quality score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Tags for discovery.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Unknown fields, preserved round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_unit() -> KnowledgeUnit {
        let mut unit = KnowledgeUnit::new(UnitKind::ReasoningTrace, "crewai", "code_review");
        unit.task = json!({"objective": "Review Python module for security issues"});
        unit.steps = vec![
            TraceStep::thought(0, "Scanning imports for known CVEs"),
            TraceStep::tool_call(1, "Running static analysis", "bandit_scan"),
            TraceStep::observation(2, "Found 2 medium-severity issues"),
        ];
        unit.outcome = Some(Outcome {
            result_summary: "2 issues found, patches suggested".to_string(),
            confidence: 0.92,
        });
        unit
    }

    #[test]
    fn test_new_unit_mints_namespaced_id() {
        let unit = KnowledgeUnit::new(UnitKind::ReasoningTrace, "crewai", "code_review");
        assert!(unit.id.starts_with("kp:trace:"));
        let pattern = KnowledgeUnit::new(UnitKind::ToolCallPattern, "crewai", "code_review");
        assert!(pattern.id.starts_with("kp:pattern:"));
    }

    #[test]
    fn test_new_unit_stamps_metadata() {
        let unit = KnowledgeUnit::new(UnitKind::Skill, "langgraph", "finance");
        let metadata = unit.metadata.expect("metadata expected");
        assert!(metadata.created_at.is_some());
        assert_eq!(metadata.framework.as_deref(), Some("langgraph"));
        assert_eq!(metadata.task_domain.as_deref(), Some("finance"));
    }

    #[test]
    fn test_wire_field_names() {
        let unit = sample_unit();
        let value = serde_json::to_value(&unit).unwrap();
        assert_eq!(value["@context"], KP_CONTEXT);
        assert_eq!(value["@type"], "ReasoningTrace");
        assert_eq!(value["steps"][1]["type"], "tool_call");
        assert_eq!(value["steps"][1]["tool"]["name"], "bandit_scan");
        assert_eq!(value["outcome"]["confidence"], 0.92);
    }

    #[test]
    fn test_unknown_kind_round_trips() {
        let raw = json!({
            "@context": KP_CONTEXT,
            "@type": "ExpertSOP",
            "id": "kp:sop:demo-001",
        });
        let unit: KnowledgeUnit = serde_json::from_value(raw).unwrap();
        assert_eq!(unit.kind, UnitKind::Other("ExpertSOP".to_string()));
        let back = serde_json::to_value(&unit).unwrap();
        assert_eq!(back["@type"], "ExpertSOP");
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = json!({
            "@context": KP_CONTEXT,
            "@type": "ReasoningTrace",
            "id": "kp:trace:demo-001",
            "metadata": {
                "created_at": "2026-02-22T00:00:00Z",
                "task_domain": "finance",
                "success": true,
                "quality_score": 0.85,
                "visibility": "network",
                "privacy_level": "aggregated",
                "validated_by": ["kp:validator:a"],
            },
            "knowledge_graph_delta": {"entities": []},
        });
        let unit: KnowledgeUnit = serde_json::from_value(raw.clone()).unwrap();
        let metadata = unit.metadata.as_ref().expect("metadata expected");
        assert_eq!(metadata.visibility, Some(Visibility::Network));
        assert_eq!(metadata.extra["validated_by"], json!(["kp:validator:a"]));
        assert_eq!(unit.extra["knowledge_graph_delta"], json!({"entities": []}));

        let back = serde_json::to_value(&unit).unwrap();
        assert_eq!(back["metadata"]["validated_by"], raw["metadata"]["validated_by"]);
        assert_eq!(back["knowledge_graph_delta"], raw["knowledge_graph_delta"]);
    }

    #[test]
    fn test_visibility_override_applied() {
        let mut unit = sample_unit();
        unit.metadata.as_mut().unwrap().visibility = Some(Visibility::Private);

        let prepared = unit.prepare_for_submission(Some(Visibility::Public));

        assert_eq!(
            prepared.metadata.as_ref().unwrap().visibility,
            Some(Visibility::Public)
        );
        // Caller-owned unit is untouched.
        assert_eq!(
            unit.metadata.as_ref().unwrap().visibility,
            Some(Visibility::Private)
        );
    }

    #[test]
    fn test_visibility_override_without_metadata_is_noop() {
        let mut unit = sample_unit();
        unit.metadata = None;

        let prepared = unit.prepare_for_submission(Some(Visibility::Public));

        assert!(prepared.metadata.is_none());
        assert_eq!(prepared, unit);
    }

    #[test]
    fn test_prepare_for_submission_is_idempotent() {
        let unit = sample_unit();
        let once = unit.prepare_for_submission(Some(Visibility::Network));
        let twice = once.prepare_for_submission(Some(Visibility::Network));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_override_keeps_existing_visibility() {
        let mut unit = sample_unit();
        unit.metadata.as_mut().unwrap().visibility = Some(Visibility::Private);
        let prepared = unit.prepare_for_submission(None);
        assert_eq!(
            prepared.metadata.as_ref().unwrap().visibility,
            Some(Visibility::Private)
        );
    }

    #[test]
    fn test_skill_deserializes_registry_shape() {
        let skill: Skill = serde_json::from_value(json!({
            "id": "kp:skill:python-linting:1.0.0",
            "name": "python-linting",
            "description": "Lint Python code with ruff",
            "quality_score": 0.91,
            "tags": ["python", "linting"],
            "uses": 42,
        }))
        .unwrap();
        assert_eq!(skill.name, "python-linting");
        assert_eq!(skill.tags, vec!["python", "linting"]);
        assert_eq!(skill.extra["uses"], 42);
    }
}
