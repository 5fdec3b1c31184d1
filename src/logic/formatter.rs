use crate::logic::calculations::round1;
use crate::logic::rules::risk::NO_RISKS;
use crate::models::{Agreement, DecisionSource, Recommendation, Severity};
use serde::Serialize;

pub const EXPLANATION_SEPARATOR: &str = "\n";

/// Caller-facing view of a [`Recommendation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationRecord {
    pub headline: String,
    pub irrigation_required: bool,
    pub water_mm: f64,
    pub duration_hours: f64,
    pub confidence: String,
    pub agreement: Agreement,
    pub source: DecisionSource,
    pub severity: Severity,
    pub explanation: String,
    pub risks: Vec<String>,
    pub method: String,
    pub frequency: String,
}

impl PresentationRecord {
    /// Plain-text block for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", self.severity.symbol(), self.headline));
        if self.irrigation_required {
            out.push_str(&format!(
                "  Water: {:.1} mm over {:.1} h\n",
                self.water_mm, self.duration_hours
            ));
        }
        out.push_str(&format!(
            "  Confidence: {} ({}, {})\n",
            self.confidence, self.agreement, self.source
        ));
        out.push_str(&format!("  Method: {}, {}\n", self.method, self.frequency));

        out.push_str("\nWhy:\n");
        for line in self.explanation.split(EXPLANATION_SEPARATOR) {
            out.push_str(&format!("  - {}\n", line));
        }

        out.push_str("\nRisks:\n");
        for risk in &self.risks {
            out.push_str(&format!("  - {}\n", risk));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationFormatter;

impl RecommendationFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, rec: &Recommendation) -> PresentationRecord {
        let headline = if rec.irrigation_required {
            "IRRIGATION REQUIRED"
        } else if rec.is_oversaturated() {
            "DO NOT IRRIGATE - SOIL OVERSATURATED"
        } else {
            "NO IRRIGATION NEEDED"
        };

        let risks = if rec.risks.is_empty() {
            vec![NO_RISKS.to_string()]
        } else {
            rec.risks.clone()
        };

        let frequency = match rec.frequency_days {
            0 => "as needed".to_string(),
            1 => "every day".to_string(),
            days => format!("every {} days", days),
        };

        PresentationRecord {
            headline: headline.to_string(),
            irrigation_required: rec.irrigation_required,
            water_mm: round1(rec.water_mm),
            duration_hours: round1(rec.duration_hours),
            confidence: format!("{:.0}%", rec.confidence * 100.0),
            agreement: rec.agreement,
            source: rec.source,
            severity: rec.severity,
            explanation: rec.explanation.join(EXPLANATION_SEPARATOR),
            risks,
            method: rec.method.as_str().to_string(),
            frequency,
        }
    }
}
