//! Ready-made extensions: momentum update rules, threshold alert handlers,
//! and a JSON file integration. These double as reference implementations
//! for extension authors.

use std::path::PathBuf;

use serde_json::json;

use crate::engine::{MomentumRule, ScoreThresholdHandler, VariableThresholdHandler};
use crate::export::export_to_json;
use crate::models::{SimulationResult, Variable};

use super::extension::{
    Capability, EventHandlerProvider, Extension, ExtensionHooks, HandlerTemplate, Integration,
    MetadataMap, RuleTemplate, UpdateRuleProvider,
};

/// Provider behind [`momentum_extension`].
pub struct MomentumRuleExtension {
    variable: Variable,
    momentum_factor: f64,
    acceleration: f64,
}

impl ExtensionHooks for MomentumRuleExtension {
    fn metadata(&self) -> MetadataMap {
        let value = json!({
            "description": "Update rule with momentum-based acceleration",
            "variable": self.variable.name(),
            "momentum_factor": self.momentum_factor,
            "acceleration": self.acceleration,
        });
        match value {
            serde_json::Value::Object(map) => map,
            _ => MetadataMap::new(),
        }
    }
}

impl UpdateRuleProvider for MomentumRuleExtension {
    fn update_rules(&self) -> Vec<RuleTemplate> {
        let variable = self.variable;
        let momentum_factor = self.momentum_factor;
        let acceleration = self.acceleration;
        vec![RuleTemplate {
            name: format!("momentum_{variable}"),
            variable,
            description: "Accelerates motion in the direction the variable is already moving"
                .to_string(),
            build: Box::new(move || {
                Box::new(MomentumRule::new(variable, momentum_factor, acceleration))
            }),
        }]
    }
}

/// Momentum update rule packaged as a registrable extension.
pub fn momentum_extension(variable: Variable, momentum_factor: f64, acceleration: f64) -> Extension {
    Extension::new(
        "momentum_update_rule",
        "1.0.0",
        Capability::UpdateRules(Box::new(MomentumRuleExtension {
            variable,
            momentum_factor,
            acceleration,
        })),
    )
}

/// Provider behind [`threshold_alert_extension`].
pub struct ThresholdAlertExtension {
    score_thresholds: Vec<f64>,
    variable_thresholds: Vec<(Variable, Vec<f64>)>,
}

impl ExtensionHooks for ThresholdAlertExtension {
    fn metadata(&self) -> MetadataMap {
        let value = json!({
            "description": "Event handlers for threshold-based alerts",
            "score_thresholds": self.score_thresholds,
            "monitored_variables": self
                .variable_thresholds
                .iter()
                .map(|(v, _)| v.name())
                .collect::<Vec<_>>(),
        });
        match value {
            serde_json::Value::Object(map) => map,
            _ => MetadataMap::new(),
        }
    }
}

impl EventHandlerProvider for ThresholdAlertExtension {
    fn event_handlers(&self) -> Vec<HandlerTemplate> {
        let mut templates = Vec::new();

        if !self.score_thresholds.is_empty() {
            let thresholds = self.score_thresholds.clone();
            templates.push(HandlerTemplate {
                name: "score_thresholds".to_string(),
                description: "Alerts when the intelligence score crosses configured levels"
                    .to_string(),
                build: Box::new(move || Box::new(ScoreThresholdHandler::new(thresholds.clone()))),
            });
        }

        for (variable, thresholds) in &self.variable_thresholds {
            let variable = *variable;
            let thresholds = thresholds.clone();
            templates.push(HandlerTemplate {
                name: format!("{variable}_thresholds"),
                description: format!("Alerts when {variable} crosses configured levels"),
                build: Box::new(move || {
                    Box::new(VariableThresholdHandler::new(variable, thresholds.clone()))
                }),
            });
        }

        templates
    }
}

/// Threshold alert handlers packaged as a registrable extension.
pub fn threshold_alert_extension(
    score_thresholds: Vec<f64>,
    variable_thresholds: Vec<(Variable, Vec<f64>)>,
) -> Extension {
    Extension::new(
        "threshold_alert",
        "1.0.0",
        Capability::EventHandlers(Box::new(ThresholdAlertExtension {
            score_thresholds,
            variable_thresholds,
        })),
    )
}

/// Integration that writes completed runs to a JSON file.
pub struct JsonExportIntegration {
    path: PathBuf,
    connected: bool,
}

impl JsonExportIntegration {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), connected: false }
    }
}

impl ExtensionHooks for JsonExportIntegration {
    fn metadata(&self) -> MetadataMap {
        let value = json!({
            "description": "Writes simulation results to a JSON file",
            "path": self.path.display().to_string(),
            "connected": self.connected,
        });
        match value {
            serde_json::Value::Object(map) => map,
            _ => MetadataMap::new(),
        }
    }
}

impl Integration for JsonExportIntegration {
    fn connect(&mut self, _params: &MetadataMap) -> Result<(), String> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn export_result(&mut self, result: &SimulationResult) -> Result<(), String> {
        if !self.connected {
            return Err("integration is not connected".to_string());
        }
        export_to_json(result, &self.path, true).map_err(|e| e.to_string())
    }
}

/// JSON file integration packaged as a registrable extension.
pub fn json_export_extension(path: impl Into<PathBuf>) -> Extension {
    Extension::new(
        "json_file_export",
        "1.0.0",
        Capability::Integration(Box::new(JsonExportIntegration::new(path))),
    )
}

#[cfg(test)]
mod tests {
    use crate::engine::TimeSphere;
    use crate::extensions::{Capability, ExtensionRegistry};
    use crate::models::AxiomInputs;

    use super::*;

    #[test]
    fn test_momentum_extension_installs_single_rule() {
        let registry = ExtensionRegistry::new();
        registry.register(momentum_extension(Variable::B, 0.95, 0.2)).unwrap();

        let mut sphere = TimeSphere::new(AxiomInputs::uniform(0.5));
        let bound = registry.install_rules("momentum_update_rule", &mut sphere).unwrap();
        assert_eq!(bound, vec![Variable::B]);
    }

    #[test]
    fn test_threshold_extension_builds_handler_per_variable() {
        let ext = threshold_alert_extension(
            vec![1.0, 2.0],
            vec![(Variable::A, vec![0.5]), (Variable::En, vec![5.0, 10.0])],
        );
        let templates = ext.event_handlers().unwrap();
        assert_eq!(templates.len(), 3);
        assert_eq!(templates[0].name, "score_thresholds");
        assert_eq!(templates[2].name, "E_n_thresholds");
    }

    #[test]
    fn test_json_export_requires_connect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut integration = JsonExportIntegration::new(&path);

        let result = TimeSphere::new(AxiomInputs::uniform(1.0)).simulate(2).unwrap();
        assert!(integration.export_result(&result).is_err());

        integration.connect(&MetadataMap::new()).unwrap();
        integration.export_result(&result).unwrap();
        assert!(path.exists());

        integration.disconnect();
        assert!(integration.export_result(&result).is_err());
    }

    #[test]
    fn test_extension_kind_tags() {
        assert!(matches!(
            momentum_extension(Variable::A, 0.9, 0.1).capability(),
            Capability::UpdateRules(_)
        ));
        assert!(matches!(
            json_export_extension("/tmp/out.json").capability(),
            Capability::Integration(_)
        ));
    }
}
