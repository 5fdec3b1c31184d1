use super::arbiter::DecisionArbiter;
use super::classifier::ClassifierAdapter;
use super::formatter::{PresentationRecord, RecommendationFormatter};
use super::rules::RuleEvaluator;
use crate::error::Result;
use crate::models::{FeatureVector, Recommendation};
use std::sync::{Arc, RwLock};

/// Rules, classifier, arbiter and formatter behind one entry point.
///
/// The classifier can be replaced while requests are in flight. Each request
/// clones the current `Arc` once, so it sees a single model version from
/// start to finish.
pub struct AdvisoryEngine {
    rules: RuleEvaluator,
    classifier: RwLock<Option<Arc<ClassifierAdapter>>>,
    arbiter: DecisionArbiter,
    formatter: RecommendationFormatter,
}

impl AdvisoryEngine {
    /// Rule-only engine.
    pub fn new() -> Self {
        Self {
            rules: RuleEvaluator::new(),
            classifier: RwLock::new(None),
            arbiter: DecisionArbiter::new(),
            formatter: RecommendationFormatter::new(),
        }
    }

    pub fn with_classifier(self, classifier: ClassifierAdapter) -> Self {
        self.swap_classifier(Some(classifier));
        self
    }

    /// Replace the classifier, returning the previous one.
    pub fn swap_classifier(
        &self,
        classifier: Option<ClassifierAdapter>,
    ) -> Option<Arc<ClassifierAdapter>> {
        let mut slot = self.classifier.write().unwrap_or_else(|e| e.into_inner());
        let previous = std::mem::replace(&mut *slot, classifier.map(Arc::new));
        tracing::info!(
            loaded = slot.is_some(),
            replaced = previous.is_some(),
            "classifier swapped"
        );
        previous
    }

    pub fn has_classifier(&self) -> bool {
        self.current_classifier().is_some()
    }

    fn current_classifier(&self) -> Option<Arc<ClassifierAdapter>> {
        self.classifier
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn rules(&self) -> &RuleEvaluator {
        &self.rules
    }

    /// Evaluate rules, consult the classifier if one is loaded, and arbitrate.
    ///
    /// Classifier failures are returned as errors, never downgraded to a
    /// rule-only answer.
    pub fn recommend(&self, field: &FeatureVector) -> Result<Recommendation> {
        let decision = self.rules.evaluate(field);

        let prediction = match self.current_classifier() {
            Some(classifier) => Some(classifier.predict(field)?),
            None => None,
        };

        let recommendation = self.arbiter.arbitrate(&decision, prediction.as_ref());
        tracing::debug!(
            crop = field.crop(),
            irrigate = recommendation.irrigation_required,
            agreement = %recommendation.agreement,
            "recommendation ready"
        );
        Ok(recommendation)
    }

    pub fn present(&self, field: &FeatureVector) -> Result<PresentationRecord> {
        let recommendation = self.recommend(field)?;
        Ok(self.formatter.format(&recommendation))
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::classifier::adapter::tests::{adapter_with, FixedModel};
    use crate::logic::classifier::{EncodingScheme, Normalization};
    use crate::models::field::sample_conditions;
    use crate::models::{Agreement, CropStage, DecisionSource, FieldConditions, Severity, SoilType};

    fn field(edit: impl FnOnce(&mut FieldConditions)) -> FeatureVector {
        let mut conditions = sample_conditions();
        edit(&mut conditions);
        FeatureVector::new(conditions).unwrap()
    }

    fn rice_on_clay() -> FeatureVector {
        field(|c| {
            c.moisture_pct = 25.0;
            c.temperature_c = 32.0;
            c.rainfall_forecast_mm = 10.0;
            c.soil_type = SoilType::Clay;
            c.crop = "Rice".into();
            c.crop_stage = CropStage::Vegetative;
        })
    }

    #[test]
    fn dry_rice_without_model() {
        let rec = AdvisoryEngine::new().recommend(&rice_on_clay()).unwrap();
        assert!(rec.irrigation_required);
        assert!((rec.water_mm - 45.0).abs() < 0.5);
        assert!((rec.duration_hours - 4.5).abs() < 0.05);
        assert_eq!(rec.source, DecisionSource::Rule);
        assert_eq!(rec.agreement, Agreement::RuleOnly);
    }

    #[test]
    fn wet_field_without_model() {
        let engine = AdvisoryEngine::new();
        let wet = field(|c| {
            c.moisture_pct = 70.0;
            c.rainfall_forecast_mm = 0.0;
        });
        let rec = engine.recommend(&wet).unwrap();
        assert!(!rec.irrigation_required);
        assert_eq!(rec.severity, Severity::Warning);
        assert_eq!(rec.water_mm, 0.0);

        let record = engine.present(&wet).unwrap();
        assert_eq!(record.headline, "DO NOT IRRIGATE - SOIL OVERSATURATED");
    }

    #[test]
    fn confident_model_overrides_optimal_hold() {
        let engine = AdvisoryEngine::new().with_classifier(adapter_with(FixedModel::new(0.85)));
        let rec = engine.recommend(&field(|_| {})).unwrap();
        assert!(rec.irrigation_required);
        assert_eq!(rec.agreement, Agreement::DisagreementResolved);
        assert!(rec.water_mm > 0.0);
    }

    #[test]
    fn dissenting_model_cannot_stop_irrigation() {
        let engine = AdvisoryEngine::new().with_classifier(adapter_with(FixedModel::new(0.05)));
        let rec = engine.recommend(&rice_on_clay()).unwrap();
        assert!(rec.irrigation_required);
        assert_eq!(rec.agreement, Agreement::DisagreementResolved);
    }

    #[test]
    fn classifier_errors_propagate() {
        let engine = AdvisoryEngine::new().with_classifier(adapter_with(FixedModel::new(1.7)));
        let err = engine.recommend(&field(|_| {})).unwrap_err();
        assert!(err.is_configuration());

        let modelless =
            ClassifierAdapter::new(EncodingScheme::V1, Normalization::identity()).unwrap();
        let engine = AdvisoryEngine::new().with_classifier(modelless);
        assert!(engine.present(&field(|_| {})).is_err());
    }

    #[test]
    fn swap_replaces_and_clears_classifier() {
        let engine = AdvisoryEngine::new();
        assert!(!engine.has_classifier());

        let previous = engine.swap_classifier(Some(adapter_with(FixedModel::new(0.9))));
        assert!(previous.is_none());
        assert!(engine.has_classifier());

        let previous = engine.swap_classifier(None);
        assert!(previous.is_some());
        let rec = engine.recommend(&field(|_| {})).unwrap();
        assert_eq!(rec.agreement, Agreement::RuleOnly);
    }

    #[test]
    fn recommend_is_idempotent() {
        let engine = AdvisoryEngine::new().with_classifier(adapter_with(FixedModel::new(0.3)));
        let input = rice_on_clay();
        assert_eq!(engine.recommend(&input).unwrap(), engine.recommend(&input).unwrap());
        assert_eq!(engine.present(&input).unwrap(), engine.present(&input).unwrap());
    }

    #[test]
    fn concurrent_requests_during_swap() {
        let engine = AdvisoryEngine::new().with_classifier(adapter_with(FixedModel::new(0.1)));
        let input = field(|_| {});

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        let rec = engine.recommend(&input).unwrap();
                        // Either model version yields a coherent answer
                        match rec.agreement {
                            Agreement::BothAgree => assert!(!rec.irrigation_required),
                            Agreement::DisagreementResolved => assert!(rec.irrigation_required),
                            other => panic!("unexpected agreement {:?}", other),
                        }
                    }
                });
            }
            s.spawn(|| {
                for i in 0..20 {
                    let p = if i % 2 == 0 { 0.9 } else { 0.1 };
                    engine.swap_classifier(Some(adapter_with(FixedModel::new(p))));
                }
            });
        });
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdvisoryEngine>();
    }
}
