use super::crop::IrrigationMethod;
use super::decision::{RuleDecision, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Agreement {
    BothAgree,
    RuleOnly,
    ModelOnly,
    DisagreementResolved,
}

impl Agreement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Agreement::BothAgree => "Rules and model agree",
            Agreement::RuleOnly => "Rules only",
            Agreement::ModelOnly => "Model only",
            Agreement::DisagreementResolved => "Disagreement resolved",
        }
    }
}

impl std::fmt::Display for Agreement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    Rule,
    Model,
    Hybrid,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Rule => "Rule",
            DecisionSource::Model => "Model",
            DecisionSource::Hybrid => "Hybrid",
        }
    }
}

impl std::fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final irrigation advice for one field snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub irrigation_required: bool,
    pub water_mm: f64,
    pub duration_hours: f64,
    pub confidence: f64,
    pub agreement: Agreement,
    pub source: DecisionSource,
    pub severity: Severity,
    pub explanation: Vec<String>,
    pub risks: Vec<String>,
    pub method: IrrigationMethod,
    pub frequency_days: u32,
}

impl Recommendation {
    /// Start from the rule decision; the arbiter adjusts fields from here.
    pub fn from_rule(
        decision: &RuleDecision,
        confidence: f64,
        agreement: Agreement,
        source: DecisionSource,
    ) -> Self {
        Self {
            irrigation_required: decision.irrigation_required,
            water_mm: decision.water_mm,
            duration_hours: decision.duration_hours,
            confidence: confidence.clamp(0.0, 1.0),
            agreement,
            source,
            severity: decision.severity,
            explanation: decision.reasons.clone(),
            risks: decision.risks.clone(),
            method: decision.method,
            frequency_days: decision.frequency_days,
        }
    }

    pub fn with_explanation(mut self, line: impl Into<String>) -> Self {
        self.explanation.push(line.into());
        self
    }

    /// Over-irrigation warnings are the only case where watering is harmful.
    pub fn is_oversaturated(&self) -> bool {
        !self.irrigation_required && self.severity == Severity::Warning
    }
}
