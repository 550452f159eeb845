//! netcfg core
//!
//! Interface descriptors, derived kinds, udev rules and the error taxonomy
//! shared by the validation, config and apply crates.

pub mod descriptor;
pub mod error;
pub mod types;

pub use descriptor::{
    DescriptorInput, FieldMap, InterfaceDescriptor, InterfaceKind, ValidatedInterface,
};
pub use error::{CommandError, NetcfgError, PersistenceError, RestartError, ValidationError};
pub use types::*;

/// Result type for netcfg operations
pub type Result<T> = std::result::Result<T, NetcfgError>;
