//! ModelContainer - a schema of model types bound to its main context.

use std::fs;

use log::debug;

use super::ModelContext;
use crate::config::StoreConfig;
use crate::error::{StorageOp, StoreError};
use crate::model::Model;

/// The set of model types a store holds, plus the context serving them.
#[derive(Debug, Clone)]
pub struct ModelContainer {
    schema: Vec<&'static str>,
    main_context: ModelContext,
}

impl ModelContainer {
    pub fn builder(config: StoreConfig) -> ModelContainerBuilder {
        ModelContainerBuilder {
            config,
            schema: Vec::new(),
        }
    }

    pub fn main_context(&self) -> &ModelContext {
        &self.main_context
    }

    /// Registered type names, in registration order.
    pub fn schema(&self) -> &[&'static str] {
        &self.schema
    }

    pub fn contains<M: Model>(&self) -> bool {
        self.schema.contains(&M::TYPE_NAME)
    }
}

pub struct ModelContainerBuilder {
    config: StoreConfig,
    schema: Vec<&'static str>,
}

impl ModelContainerBuilder {
    /// Register a model type. Registering twice is a no-op.
    pub fn model<M: Model>(mut self) -> Self {
        if !self.schema.contains(&M::TYPE_NAME) {
            self.schema.push(M::TYPE_NAME);
        }
        self
    }

    /// Open the main context and create a directory for every registered type.
    pub fn build(self) -> Result<ModelContainer, StoreError> {
        let base_dir = self.config.base_dir.clone();
        let main_context = ModelContext::open(self.config)?;

        for type_name in &self.schema {
            let dir = base_dir.join(type_name);
            fs::create_dir_all(&dir).map_err(|e| {
                StoreError::storage(StorageOp::Write, format!("{}: {}", dir.display(), e))
            })?;
        }
        debug!("model container ready with schema {:?}", self.schema);

        Ok(ModelContainer {
            schema: self.schema,
            main_context,
        })
    }
}
