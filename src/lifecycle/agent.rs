use crate::framework::{
    BuildError, DirectoryInfo, DispatchError, Dispatcher, Managed, ManagedAccess, Value,
};
use crate::lifecycle::object_name::{ObjectName, ObjectNameError};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors raised by the management agent and by [`Registration`].
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Object already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Object not registered: {0}")]
    NotRegistered(String),

    #[error(transparent)]
    MalformedName(#[from] ObjectNameError),

    #[error("Type {0} declares no object name on its container marker")]
    MissingObjectName(String),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

struct Entry {
    name: ObjectName,
    access: Arc<dyn ManagedAccess>,
}

/// An in-process registry of managed objects, addressed by [`ObjectName`].
///
/// The agent only ever sees `Arc<dyn ManagedAccess>`. Requests look the object
/// up under a read lock and dispatch after the lock is released, so a slow
/// accessor never blocks registration.
#[derive(Default)]
pub struct ManagementAgent {
    entries: RwLock<BTreeMap<String, Entry>>,
}

impl ManagementAgent {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide agent.
    pub fn platform() -> &'static ManagementAgent {
        static PLATFORM: OnceLock<ManagementAgent> = OnceLock::new();
        PLATFORM.get_or_init(ManagementAgent::new)
    }

    #[instrument(skip(self, access), fields(object_name = %name))]
    pub fn register(&self, name: ObjectName, access: Arc<dyn ManagedAccess>) -> Result<(), AgentError> {
        let key = name.canonical();
        let mut entries = self.entries.write();
        if entries.contains_key(&key) {
            warn!("Already registered");
            return Err(AgentError::AlreadyRegistered(name.to_string()));
        }
        let type_name = access.info().type_name.clone();
        entries.insert(key, Entry { name, access });
        info!(%type_name, size = entries.len(), "Registered");
        Ok(())
    }

    /// Builds a [`Dispatcher`] for `target` and registers it.
    pub fn register_managed<T: Managed>(&self, name: ObjectName, target: Arc<T>) -> Result<(), AgentError> {
        let dispatcher = Dispatcher::for_instance(target)?;
        self.register(name, Arc::new(dispatcher))
    }

    #[instrument(skip(self), fields(object_name = %name))]
    pub fn unregister(&self, name: &ObjectName) -> Result<(), AgentError> {
        let mut entries = self.entries.write();
        match entries.remove(&name.canonical()) {
            Some(_) => {
                info!(size = entries.len(), "Unregistered");
                Ok(())
            }
            None => {
                warn!("Not registered");
                Err(AgentError::NotRegistered(name.to_string()))
            }
        }
    }

    pub fn is_registered(&self, name: &ObjectName) -> bool {
        self.entries.read().contains_key(&name.canonical())
    }

    /// Registered names, sorted by canonical form.
    pub fn names(&self) -> Vec<ObjectName> {
        self.entries.read().values().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn lookup(&self, name: &ObjectName) -> Result<Arc<dyn ManagedAccess>, AgentError> {
        self.entries
            .read()
            .get(&name.canonical())
            .map(|e| Arc::clone(&e.access))
            .ok_or_else(|| AgentError::NotRegistered(name.to_string()))
    }

    pub fn info(&self, name: &ObjectName) -> Result<DirectoryInfo, AgentError> {
        Ok(self.lookup(name)?.info().clone())
    }

    #[instrument(skip(self), fields(object_name = %name))]
    pub fn read_attribute(&self, name: &ObjectName, attribute: &str) -> Result<Value, AgentError> {
        debug!("Sending request");
        Ok(self.lookup(name)?.read_attribute(attribute)?)
    }

    #[instrument(skip(self), fields(object_name = %name))]
    pub fn write_attribute(&self, name: &ObjectName, attribute: &str, value: Value) -> Result<(), AgentError> {
        debug!("Sending request");
        Ok(self.lookup(name)?.write_attribute(attribute, value)?)
    }

    #[instrument(skip(self, args), fields(object_name = %name))]
    pub fn invoke_operation(&self, name: &ObjectName, operation: &str, args: Vec<Value>) -> Result<Value, AgentError> {
        debug!(args = args.len(), "Sending request");
        Ok(self.lookup(name)?.invoke_operation(operation, args)?)
    }
}

/// Binds one managed object, its name and an agent.
///
/// # Example
/// ```ignore
/// let registration = Registration::for_managed(Arc::new(counter))?;
/// registration.register()?;
/// // ... the counter is now visible under its declared object name
/// registration.unregister()?;
/// ```
pub struct Registration<'a> {
    access: Arc<dyn ManagedAccess>,
    name: ObjectName,
    agent: &'a ManagementAgent,
}

impl std::fmt::Debug for Registration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("type_name", &self.access.info().type_name)
            .finish_non_exhaustive()
    }
}

impl Registration<'static> {
    /// Registration with the platform agent, under the object name declared on
    /// the container marker of `T`.
    pub fn for_managed<T: Managed>(target: Arc<T>) -> Result<Self, AgentError> {
        Registration::declared(target, ManagementAgent::platform())
    }
}

impl<'a> Registration<'a> {
    pub fn new<T: Managed>(target: Arc<T>, name: ObjectName, agent: &'a ManagementAgent) -> Result<Self, AgentError> {
        let dispatcher = Dispatcher::for_instance(target)?;
        Ok(Self {
            access: Arc::new(dispatcher),
            name,
            agent,
        })
    }

    /// Registration with `agent`, under the object name declared on the
    /// container marker of `T`.
    pub fn declared<T: Managed>(target: Arc<T>, agent: &'a ManagementAgent) -> Result<Self, AgentError> {
        let dispatcher = Dispatcher::for_instance(target)?;
        let info = dispatcher.info();
        let declared = info
            .object_name
            .as_deref()
            .ok_or_else(|| AgentError::MissingObjectName(info.type_name.clone()))?;
        let name: ObjectName = declared.parse()?;
        Ok(Self {
            access: Arc::new(dispatcher),
            name,
            agent,
        })
    }

    pub fn name(&self) -> &ObjectName {
        &self.name
    }

    pub fn register(&self) -> Result<(), AgentError> {
        self.agent.register(self.name.clone(), Arc::clone(&self.access))
    }

    pub fn unregister(&self) -> Result<(), AgentError> {
        self.agent.unregister(&self.name)
    }
}
