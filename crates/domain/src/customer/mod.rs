//! Customer aggregate.
//!
//! Lifecycle:
//! - Registered customers start `Active`
//! - `Active` and `Inactive` can switch back and forth
//! - `Deleted` is a tombstone: every further change is rejected

mod aggregate;
mod commands;
mod events;
mod status;
mod value_objects;

pub use aggregate::Customer;
pub use commands::{
    ActivateCustomer, AddressInput, ChangeAddress, ChangeEmail, ChangePhone, DeactivateCustomer,
    DeleteCustomer, RegisterCustomer, RenameCustomer,
};
pub use events::*;
pub use status::CustomerStatus;
pub use value_objects::{Address, CustomerName, Email, MAX_NAME_LENGTH, PhoneNumber};
