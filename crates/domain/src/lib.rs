//! Aggregate consistency kernel.
//!
//! This crate provides:
//! - [`Entity`] identity and audit fields
//! - [`DomainEvent`] payloads and their [`RecordedEvent`] form
//! - [`Aggregate`] state driven through an [`AggregateRoot`] that owns the
//!   version, the pending events and the invariant gate
//! - [`Repository`] and [`CommandHandler`] for load, decide and save cycles
//! - A `Customer` aggregate built on all of the above

pub mod aggregate;
pub mod command;
pub mod customer;
pub mod entity;
pub mod error;
pub mod event;
pub mod repository;

pub use aggregate::{Aggregate, AggregateRoot};
pub use command::{Command, CommandHandler, CommandResult};
pub use customer::{
    ActivateCustomer, Address, AddressInput, ChangeAddress, ChangeEmail, ChangePhone, Customer,
    CustomerEvent, CustomerName, CustomerStatus, DeactivateCustomer, DeleteCustomer, Email,
    PhoneNumber, RegisterCustomer, RenameCustomer,
};
pub use entity::Entity;
pub use error::{CorruptedHistory, DomainError};
pub use event::{DomainEvent, RecordedEvent};
pub use repository::Repository;
