use std::collections::HashMap;
use std::sync::Arc;

use domain::event::entity::EventCategory;
use domain::message::error::DispatchError;
use ports::secondary::message_builder::MessageBuilder;

use crate::builders::{
    ActivityBuilder, ConfigurationChangeBuilder, DeletionBuilder, ExternalRetrieveBuilder,
    MismatchBuilder, NetworkFailureBuilder, PatientRecordBuilder, ProcedureRecordBuilder,
    ProvideAndRegisterBuilder, QueryBuilder, QueueEventBuilder, StorageCommitmentBuilder,
    TransferBuilder,
};

/// Message builders keyed by event category.
///
/// Completeness is enforced up front: a registry missing any category
/// cannot be constructed, so dispatch never discovers a hole at runtime.
pub struct BuilderRegistry {
    builders: HashMap<EventCategory, Arc<dyn MessageBuilder>>,
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("categories", &self.builders.len())
            .finish()
    }
}

impl BuilderRegistry {
    /// Build a registry from a custom builder map. Fails on the first
    /// category without a registered builder.
    pub fn new(
        builders: HashMap<EventCategory, Arc<dyn MessageBuilder>>,
    ) -> Result<Self, DispatchError> {
        for category in EventCategory::ALL {
            if !builders.contains_key(&category) {
                return Err(DispatchError::MissingBuilder(category));
            }
        }
        Ok(Self { builders })
    }

    /// The default builder set. Complete by construction: the match in
    /// [`standard_builder`] is exhaustive over the category enumeration.
    pub fn standard() -> Self {
        let builders = EventCategory::ALL
            .into_iter()
            .map(|category| (category, standard_builder(category)))
            .collect();
        Self { builders }
    }

    pub fn get(&self, category: EventCategory) -> Result<&Arc<dyn MessageBuilder>, DispatchError> {
        self.builders
            .get(&category)
            .ok_or(DispatchError::MissingBuilder(category))
    }
}

fn standard_builder(category: EventCategory) -> Arc<dyn MessageBuilder> {
    match category {
        EventCategory::ApplicationActivity => Arc::new(ActivityBuilder),
        EventCategory::ConnectionFailure | EventCategory::AssociationFailure => {
            Arc::new(NetworkFailureBuilder { category })
        }
        EventCategory::Store | EventCategory::Retrieve => Arc::new(TransferBuilder { category }),
        EventCategory::Deletion => Arc::new(DeletionBuilder),
        EventCategory::Query => Arc::new(QueryBuilder),
        EventCategory::PatientRecord => Arc::new(PatientRecordBuilder),
        EventCategory::ProcedureRecord => Arc::new(ProcedureRecordBuilder),
        EventCategory::ProvideAndRegister => Arc::new(ProvideAndRegisterBuilder),
        EventCategory::StorageCommitment => Arc::new(StorageCommitmentBuilder),
        EventCategory::ExternalRetrieve => Arc::new(ExternalRetrieveBuilder),
        EventCategory::ConfigurationChange => Arc::new(ConfigurationChangeBuilder),
        EventCategory::QueueEvent => Arc::new(QueueEventBuilder),
        EventCategory::Mismatch => Arc::new(MismatchBuilder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_category() {
        let registry = BuilderRegistry::standard();
        for category in EventCategory::ALL {
            assert!(registry.get(category).is_ok(), "missing {category}");
        }
    }

    #[test]
    fn incomplete_custom_registry_is_rejected() {
        let mut builders: HashMap<EventCategory, Arc<dyn MessageBuilder>> = HashMap::new();
        builders.insert(EventCategory::Store, Arc::new(QueryBuilder));
        let err = BuilderRegistry::new(builders).unwrap_err();
        assert!(matches!(err, DispatchError::MissingBuilder(_)));
    }

    #[test]
    fn complete_custom_registry_is_accepted() {
        let builders: HashMap<EventCategory, Arc<dyn MessageBuilder>> = EventCategory::ALL
            .into_iter()
            .map(|category| (category, standard_builder(category)))
            .collect();
        assert!(BuilderRegistry::new(builders).is_ok());
    }
}
