//! Catalog of registered extensions, indexed by unique name and by
//! capability kind.
//!
//! The registry is constructed explicitly and passed to whoever needs it;
//! process-wide lifetime is the composition root's business, not implicit
//! module state. An interior `RwLock` guards both indices together so
//! concurrent mutation cannot make them diverge; read-only queries may run
//! concurrently with each other.

use std::collections::BTreeMap;

use tracing::info;

use crate::engine::TimeSphere;
use crate::error::{EngineError, Result};
use crate::models::Variable;

use super::extension::{Extension, ExtensionInfo, ExtensionKind, MetadataMap};

#[derive(Default)]
struct RegistryIndex {
    by_name: BTreeMap<String, Extension>,
    by_kind: BTreeMap<ExtensionKind, Vec<String>>,
}

#[derive(Default)]
pub struct ExtensionRegistry {
    inner: std::sync::RwLock<RegistryIndex>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension under its unique name. The extension's
    /// initialization hook runs exactly once, here; on any failure the
    /// registry is left unchanged. Extensions start enabled.
    pub fn register(&self, mut extension: Extension) -> Result<()> {
        let mut index = self.write();
        let name = extension.name().to_string();

        if index.by_name.contains_key(&name) {
            return Err(EngineError::DuplicateExtension(name));
        }

        extension
            .initialize()
            .map_err(|message| EngineError::ExtensionFault { name: name.clone(), message })?;

        let kind = extension.kind();
        index.by_kind.entry(kind).or_default().push(name.clone());
        index.by_name.insert(name.clone(), extension);
        info!(name = %name, kind = %kind, "extension registered");
        Ok(())
    }

    /// Remove an extension from both indices. No teardown hook is invoked.
    pub fn unregister(&self, name: &str) -> Result<Extension> {
        let mut index = self.write();
        let extension = index
            .by_name
            .remove(name)
            .ok_or_else(|| EngineError::ExtensionNotFound(name.to_string()))?;

        let kind = extension.kind();
        if let Some(names) = index.by_kind.get_mut(&kind) {
            names.retain(|n| n != name);
            if names.is_empty() {
                index.by_kind.remove(&kind);
            }
        }
        Ok(extension)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().by_name.contains_key(name)
    }

    /// Identity/status snapshot of one extension.
    pub fn get(&self, name: &str) -> Option<ExtensionInfo> {
        self.read().by_name.get(name).map(Extension::describe)
    }

    /// All registered extensions of the given kind, enabled or not.
    /// Filtering by enabled status is the caller's business.
    pub fn get_by_kind(&self, kind: ExtensionKind) -> Vec<ExtensionInfo> {
        let index = self.read();
        index
            .by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|name| index.by_name.get(name).map(Extension::describe))
            .collect()
    }

    pub fn list_all(&self) -> Vec<ExtensionInfo> {
        self.read().by_name.values().map(Extension::describe).collect()
    }

    pub fn list_enabled(&self) -> Vec<ExtensionInfo> {
        self.read()
            .by_name
            .values()
            .filter(|e| e.is_enabled())
            .map(Extension::describe)
            .collect()
    }

    pub fn enable(&self, name: &str) -> Result<()> {
        self.set_enabled(name, true)
    }

    /// Disable an extension. Engines that already installed its rules keep
    /// running them; the flag only affects future lookups.
    pub fn disable(&self, name: &str) -> Result<()> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> Result<()> {
        let mut index = self.write();
        let extension = index
            .by_name
            .get_mut(name)
            .ok_or_else(|| EngineError::ExtensionNotFound(name.to_string()))?;
        extension.set_enabled(enabled);
        Ok(())
    }

    /// Metadata for every registered extension, keyed by name.
    pub fn metadata_all(&self) -> BTreeMap<String, MetadataMap> {
        self.read()
            .by_name
            .iter()
            .map(|(name, extension)| (name.clone(), extension.metadata()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().by_name.is_empty()
    }

    /// Instantiate every rule template of an update-rule extension into the
    /// given engine. The engine captures fresh instances; later enable or
    /// disable toggles do not reach into it. Returns the variables bound.
    pub fn install_rules(&self, name: &str, sphere: &mut TimeSphere) -> Result<Vec<Variable>> {
        let index = self.read();
        let extension = index
            .by_name
            .get(name)
            .ok_or_else(|| EngineError::ExtensionNotFound(name.to_string()))?;
        let templates = extension.update_rules().ok_or_else(|| EngineError::WrongExtensionKind {
            name: name.to_string(),
            expected: ExtensionKind::UpdateRules.as_str(),
            found: extension.kind().as_str(),
        })?;

        let mut bound = Vec::with_capacity(templates.len());
        for template in &templates {
            sphere.add_update_rule(template.variable, template.instantiate());
            bound.push(template.variable);
        }
        Ok(bound)
    }

    /// Instantiate every handler template of an event-handler extension into
    /// the given engine. Returns the number of handlers installed.
    pub fn install_handlers(&self, name: &str, sphere: &mut TimeSphere) -> Result<usize> {
        let index = self.read();
        let extension = index
            .by_name
            .get(name)
            .ok_or_else(|| EngineError::ExtensionNotFound(name.to_string()))?;
        let templates =
            extension.event_handlers().ok_or_else(|| EngineError::WrongExtensionKind {
                name: name.to_string(),
                expected: ExtensionKind::EventHandlers.as_str(),
                found: extension.kind().as_str(),
            })?;

        for template in &templates {
            sphere.add_event_handler(template.instantiate());
        }
        Ok(templates.len())
    }

    /// Run a closure against one extension with exclusive access, e.g. to
    /// drive an integration's connect/export cycle.
    pub fn with_extension<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut Extension) -> R,
    ) -> Result<R> {
        let mut index = self.write();
        let extension = index
            .by_name
            .get_mut(name)
            .ok_or_else(|| EngineError::ExtensionNotFound(name.to_string()))?;
        Ok(f(extension))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryIndex> {
        self.inner.read().expect("extension registry lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryIndex> {
        self.inner.write().expect("extension registry lock poisoned")
    }
}
