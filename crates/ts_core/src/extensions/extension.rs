//! Extension model: a named, versioned, enable/disable-able unit wrapping
//! one capability out of a closed set of kinds. Capabilities are tagged
//! variants rather than an open inheritance hierarchy, so the registry can
//! index by kind without type-name reflection.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::{EventHandler, UpdateRule};
use crate::models::{AxiomInputs, SimulationResult, Variable};

/// Descriptive key-value mapping an extension publishes about itself.
pub type MetadataMap = serde_json::Map<String, serde_json::Value>;

/// The closed set of capability kinds an extension may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionKind {
    UpdateRules,
    EventHandlers,
    Integration,
    DomainModel,
    Analysis,
}

impl ExtensionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionKind::UpdateRules => "update_rules",
            ExtensionKind::EventHandlers => "event_handlers",
            ExtensionKind::Integration => "integration",
            ExtensionKind::DomainModel => "domain_model",
            ExtensionKind::Analysis => "analysis",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common lifecycle surface shared by every capability kind.
pub trait ExtensionHooks: Send {
    /// One-time initialization, called exactly once at registration time.
    fn initialize(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Descriptive metadata (author, description, parameters, ...).
    fn metadata(&self) -> MetadataMap {
        MetadataMap::new()
    }
}

/// A named update rule an extension offers, bound to one variable. The
/// factory produces a fresh rule instance per installation so engines never
/// share rule state with each other or with the registry.
pub struct RuleTemplate {
    pub name: String,
    pub variable: Variable,
    pub description: String,
    pub build: Box<dyn Fn() -> Box<dyn UpdateRule> + Send + Sync>,
}

impl RuleTemplate {
    pub fn instantiate(&self) -> Box<dyn UpdateRule> {
        (self.build)()
    }
}

/// A named event handler an extension offers.
pub struct HandlerTemplate {
    pub name: String,
    pub description: String,
    pub build: Box<dyn Fn() -> Box<dyn EventHandler> + Send + Sync>,
}

impl HandlerTemplate {
    pub fn instantiate(&self) -> Box<dyn EventHandler> {
        (self.build)()
    }
}

/// Capability: a family of update rules.
pub trait UpdateRuleProvider: ExtensionHooks {
    fn update_rules(&self) -> Vec<RuleTemplate>;
}

/// Capability: a family of event handlers.
pub trait EventHandlerProvider: ExtensionHooks {
    fn event_handlers(&self) -> Vec<HandlerTemplate>;
}

/// Capability: an external-system integration consuming run results.
pub trait Integration: ExtensionHooks {
    fn connect(&mut self, params: &MetadataMap) -> Result<(), String>;
    fn disconnect(&mut self);
    fn export_result(&mut self, result: &SimulationResult) -> Result<(), String>;
}

/// Capability: a domain-specific interpretation of the eight parameters.
pub trait DomainModel: ExtensionHooks {
    /// Domain concept behind each axiom parameter.
    fn parameter_mappings(&self) -> BTreeMap<Variable, String>;
    /// Recommended starting configuration for this domain.
    fn default_config(&self) -> AxiomInputs;
    /// Domain-specific constraints beyond the generic bounds.
    fn validate_config(&self, inputs: &AxiomInputs) -> bool;
}

/// Capability: custom analysis over completed runs.
pub trait AnalysisProvider: ExtensionHooks {
    fn analyze(&self, result: &SimulationResult) -> MetadataMap;
    /// Available metric names with descriptions.
    fn metrics(&self) -> BTreeMap<String, String>;
}

/// The kind-tagged capability payload.
pub enum Capability {
    UpdateRules(Box<dyn UpdateRuleProvider>),
    EventHandlers(Box<dyn EventHandlerProvider>),
    Integration(Box<dyn Integration>),
    DomainModel(Box<dyn DomainModel>),
    Analysis(Box<dyn AnalysisProvider>),
}

impl Capability {
    pub fn kind(&self) -> ExtensionKind {
        match self {
            Capability::UpdateRules(_) => ExtensionKind::UpdateRules,
            Capability::EventHandlers(_) => ExtensionKind::EventHandlers,
            Capability::Integration(_) => ExtensionKind::Integration,
            Capability::DomainModel(_) => ExtensionKind::DomainModel,
            Capability::Analysis(_) => ExtensionKind::Analysis,
        }
    }
}

/// A registered unit: identity plus capability plus enabled flag.
pub struct Extension {
    name: String,
    version: String,
    enabled: bool,
    capability: Capability,
}

impl Extension {
    pub fn new(name: impl Into<String>, version: impl Into<String>, capability: Capability) -> Self {
        Self { name: name.into(), version: version.into(), enabled: true, capability }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn kind(&self) -> ExtensionKind {
        self.capability.kind()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    pub fn capability_mut(&mut self) -> &mut Capability {
        &mut self.capability
    }

    pub(crate) fn initialize(&mut self) -> Result<(), String> {
        match &mut self.capability {
            Capability::UpdateRules(p) => p.initialize(),
            Capability::EventHandlers(p) => p.initialize(),
            Capability::Integration(p) => p.initialize(),
            Capability::DomainModel(p) => p.initialize(),
            Capability::Analysis(p) => p.initialize(),
        }
    }

    /// The extension's own metadata mapping.
    pub fn metadata(&self) -> MetadataMap {
        match &self.capability {
            Capability::UpdateRules(p) => p.metadata(),
            Capability::EventHandlers(p) => p.metadata(),
            Capability::Integration(p) => p.metadata(),
            Capability::DomainModel(p) => p.metadata(),
            Capability::Analysis(p) => p.metadata(),
        }
    }

    /// Identity and status view, safe to hand across the registry boundary.
    pub fn describe(&self) -> ExtensionInfo {
        ExtensionInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            kind: self.kind(),
            enabled: self.enabled,
            metadata: self.metadata(),
        }
    }

    /// Rule templates, when this is an update-rule extension.
    pub fn update_rules(&self) -> Option<Vec<RuleTemplate>> {
        match &self.capability {
            Capability::UpdateRules(p) => Some(p.update_rules()),
            _ => None,
        }
    }

    /// Handler templates, when this is an event-handler extension.
    pub fn event_handlers(&self) -> Option<Vec<HandlerTemplate>> {
        match &self.capability {
            Capability::EventHandlers(p) => Some(p.event_handlers()),
            _ => None,
        }
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Extension")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("kind", &self.kind())
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Snapshot of one registered extension's identity and status.
#[derive(Debug, Clone, Serialize)]
pub struct ExtensionInfo {
    pub name: String,
    pub version: String,
    pub kind: ExtensionKind,
    pub enabled: bool,
    pub metadata: MetadataMap,
}
