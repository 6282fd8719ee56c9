pub mod builtin;
pub mod extension;
pub mod registry;

pub use builtin::{
    json_export_extension, momentum_extension, threshold_alert_extension, JsonExportIntegration,
    MomentumRuleExtension, ThresholdAlertExtension,
};
pub use extension::{
    AnalysisProvider, Capability, DomainModel, EventHandlerProvider, Extension, ExtensionHooks,
    ExtensionInfo, ExtensionKind, HandlerTemplate, Integration, MetadataMap, RuleTemplate,
    UpdateRuleProvider,
};
pub use registry::ExtensionRegistry;
