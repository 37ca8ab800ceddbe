mod presenter_factory;
mod registry_factory;

pub use presenter_factory::{PresenterFactory, PresenterType};
pub use registry_factory::{RegistryFactory, RegistryType};
