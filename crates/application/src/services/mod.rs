//! Application services - Use case implementations

mod asset_registrar;
mod coordinator;
mod credential_validator;
mod integration_service;
mod sensors;
mod snapshot_holder;

pub use asset_registrar::{
    AssetRegistrar, CARD_LOGICAL_NAME, CARD_URL_PATH, RegistrationReport, RegistrationState,
    ResourceOutcome, content_version, versioned_url,
};
pub use coordinator::{
    Coordinator, CoordinatorState, CoordinatorStatus, HOURLY_COORDINATOR, MINUTELY_COORDINATOR,
};
pub use credential_validator::{CredentialValidator, ValidationOutcome};
pub use integration_service::{ConfigEntry, Installation, IntegrationService};
pub use sensors::{
    AttributesFn, ComputeFn, SENSOR_DESCRIPTORS, SensorContext, SensorDescriptor, SensorEntity,
    SensorState, SensorValue,
};
pub use snapshot_holder::SnapshotHolder;
