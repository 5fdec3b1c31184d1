use crate::models::{
    Agreement, ClassifierResult, DecisionSource, Recommendation, RuleDecision, Severity,
};

/// Classifier confidence needed to turn a rule "no" into a "yes".
pub const OVERRIDE_CONFIDENCE: f64 = 0.8;
/// Upper bound on confidence whenever the two sources disagree.
pub const DISAGREEMENT_CONFIDENCE_CAP: f64 = 0.6;
/// Certainty of a rule decision that is neither critical nor advisory.
pub const DEFAULT_RULE_CERTAINTY: f64 = 0.7;

/// Reconciles the rule decision with an optional classifier opinion.
///
/// Safety first: a rule that asks for water is never overruled, and a rule
/// that holds water is only overruled by a confident model, which then gets
/// the rule's small top-up plan rather than a full deficit run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionArbiter;

impl DecisionArbiter {
    pub fn new() -> Self {
        Self
    }

    pub fn arbitrate(
        &self,
        decision: &RuleDecision,
        prediction: Option<&ClassifierResult>,
    ) -> Recommendation {
        let rule_certainty = rule_certainty(decision);

        let Some(prediction) = prediction else {
            tracing::debug!(confidence = rule_certainty, "rule-only recommendation");
            return Recommendation::from_rule(
                decision,
                rule_certainty,
                Agreement::RuleOnly,
                DecisionSource::Rule,
            );
        };

        if prediction.irrigation_required == decision.irrigation_required {
            let confidence = (rule_certainty + prediction.confidence) / 2.0;
            tracing::debug!(confidence, "rules and model agree");
            return prediction.top_factors.iter().fold(
                Recommendation::from_rule(
                    decision,
                    confidence,
                    Agreement::BothAgree,
                    DecisionSource::Hybrid,
                ),
                |rec, factor| {
                    rec.with_explanation(format!(
                        "Model factor: {} ({:.0}% importance)",
                        factor.feature,
                        factor.weight * 100.0
                    ))
                },
            );
        }

        self.resolve_disagreement(decision, prediction, rule_certainty)
    }

    fn resolve_disagreement(
        &self,
        decision: &RuleDecision,
        prediction: &ClassifierResult,
        rule_certainty: f64,
    ) -> Recommendation {
        let model_pct = prediction.confidence * 100.0;

        if decision.irrigation_required {
            let confidence = disagreement_confidence(rule_certainty, prediction.confidence);
            tracing::debug!(confidence, "rule irrigation kept over model objection");
            return Recommendation::from_rule(
                decision,
                confidence,
                Agreement::DisagreementResolved,
                DecisionSource::Hybrid,
            )
            .with_explanation(format!(
                "Model advised against irrigation ({:.0}% confidence); rules flagged a water deficit, so irrigation stands",
                model_pct
            ));
        }

        if prediction.confidence >= OVERRIDE_CONFIDENCE {
            let confidence = disagreement_confidence(prediction.confidence, rule_certainty);
            tracing::debug!(confidence, "confident model overrides rule hold");
            let mut rec = Recommendation::from_rule(
                decision,
                confidence,
                Agreement::DisagreementResolved,
                DecisionSource::Hybrid,
            );
            rec.irrigation_required = true;
            rec.water_mm = decision.top_up.water_mm;
            rec.duration_hours = decision.top_up.duration_hours;
            rec.severity = Severity::Advisory;
            return rec.with_explanation(format!(
                "Model predicts irrigation need with {:.0}% confidence against the rules; applying a light top-up of {:.1} mm",
                model_pct, decision.top_up.water_mm
            ));
        }

        let confidence = disagreement_confidence(rule_certainty, prediction.confidence);
        tracing::debug!(confidence, "model below override threshold, rule hold kept");
        Recommendation::from_rule(
            decision,
            confidence,
            Agreement::DisagreementResolved,
            DecisionSource::Hybrid,
        )
        .with_explanation(format!(
            "Model suggested irrigation ({:.0}% confidence) but below the {:.0}% override threshold; following the rules",
            model_pct,
            OVERRIDE_CONFIDENCE * 100.0
        ))
    }
}

/// Critical and advisory rules are treated as certain.
pub fn rule_certainty(decision: &RuleDecision) -> f64 {
    match decision.severity {
        Severity::Critical | Severity::Advisory => 1.0,
        Severity::Warning | Severity::None => DEFAULT_RULE_CERTAINTY,
    }
}

/// Mean of the winner's certainty and the loser's doubt, capped.
fn disagreement_confidence(winner: f64, loser: f64) -> f64 {
    ((winner + (1.0 - loser)) / 2.0).min(DISAGREEMENT_CONFIDENCE_CAP)
}
