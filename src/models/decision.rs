use super::crop::IrrigationMethod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Advisory,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Advisory => "Advisory",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::None => "✓",
            Severity::Advisory => "→",
            Severity::Warning => "⚠",
            Severity::Critical => "!",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Depth of water to apply and how long the run takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IrrigationPlan {
    pub water_mm: f64,
    pub duration_hours: f64,
}

impl IrrigationPlan {
    pub const NONE: IrrigationPlan = IrrigationPlan {
        water_mm: 0.0,
        duration_hours: 0.0,
    };

    pub fn new(water_mm: f64, duration_hours: f64) -> Self {
        Self {
            water_mm: water_mm.max(0.0),
            duration_hours: duration_hours.max(0.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.water_mm <= 0.0
    }
}

/// Output of the agronomic rule set for one field snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDecision {
    pub irrigation_required: bool,
    pub water_mm: f64,
    pub duration_hours: f64,
    pub reasons: Vec<String>,
    pub severity: Severity,
    /// Light watering applied only when a confident model overrides a
    /// no-irrigation decision.
    pub top_up: IrrigationPlan,
    pub risks: Vec<String>,
    pub method: IrrigationMethod,
    pub frequency_days: u32,
}

impl RuleDecision {
    pub fn irrigate(plan: IrrigationPlan, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            irrigation_required: true,
            water_mm: plan.water_mm,
            duration_hours: plan.duration_hours,
            reasons: vec![reason.into()],
            severity,
            top_up: plan,
            risks: Vec::new(),
            method: IrrigationMethod::Drip,
            frequency_days: 0,
        }
    }

    pub fn hold(severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            irrigation_required: false,
            water_mm: 0.0,
            duration_hours: 0.0,
            reasons: vec![reason.into()],
            severity,
            top_up: IrrigationPlan::NONE,
            risks: Vec::new(),
            method: IrrigationMethod::Drip,
            frequency_days: 0,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    pub fn with_top_up(mut self, plan: IrrigationPlan) -> Self {
        self.top_up = plan;
        self
    }

    pub fn with_schedule(mut self, method: IrrigationMethod, frequency_days: u32) -> Self {
        self.method = method;
        self.frequency_days = frequency_days;
        self
    }

    pub fn with_risks(mut self, risks: Vec<String>) -> Self {
        self.risks = risks;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Advisory);
        assert!(Severity::Advisory > Severity::None);
    }

    #[test]
    fn plan_never_negative() {
        let plan = IrrigationPlan::new(-4.0, -0.5);
        assert_eq!(plan, IrrigationPlan::NONE);
        assert!(plan.is_empty());
    }

    #[test]
    fn hold_has_no_water() {
        let decision = RuleDecision::hold(Severity::Warning, "too wet").with_reason("second");
        assert!(!decision.irrigation_required);
        assert_eq!(decision.water_mm, 0.0);
        assert_eq!(decision.reasons, vec!["too wet", "second"]);
    }
}
