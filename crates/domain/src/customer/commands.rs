//! Customer commands.
//!
//! Commands carry raw input; validation happens when the aggregate decides.

use common::AggregateId;

use crate::command::Command;

use super::Customer;

/// Command to register a new customer.
#[derive(Debug, Clone)]
pub struct RegisterCustomer {
    pub customer_id: AggregateId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<AddressInput>,
    pub actor: Option<String>,
}

/// Unvalidated address fields.
#[derive(Debug, Clone, Default)]
pub struct AddressInput {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl RegisterCustomer {
    /// Creates a RegisterCustomer command with a generated customer ID.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            customer_id: AggregateId::new(),
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            actor: None,
        }
    }

    pub fn with_id(mut self, customer_id: AggregateId) -> Self {
        self.customer_id = customer_id;
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: AddressInput) -> Self {
        self.address = Some(address);
        self
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

impl Command for RegisterCustomer {
    type Aggregate = Customer;

    fn aggregate_id(&self) -> AggregateId {
        self.customer_id
    }

    fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

/// Declares a command that targets an existing customer.
macro_rules! customer_command {
    ($(#[$meta:meta])* $name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            pub customer_id: AggregateId,
            $(pub $field: $ty,)*
            pub actor: Option<String>,
        }

        impl $name {
            pub fn new(customer_id: AggregateId $(, $field: impl Into<$ty>)*) -> Self {
                Self {
                    customer_id,
                    $($field: $field.into(),)*
                    actor: None,
                }
            }

            pub fn by(mut self, actor: impl Into<String>) -> Self {
                self.actor = Some(actor.into());
                self
            }
        }

        impl Command for $name {
            type Aggregate = Customer;

            fn aggregate_id(&self) -> AggregateId {
                self.customer_id
            }

            fn actor(&self) -> Option<&str> {
                self.actor.as_deref()
            }
        }
    };
}

customer_command!(
    /// Command to change a customer's name.
    RenameCustomer { new_name: String }
);

customer_command!(
    /// Command to change a customer's email address.
    ChangeEmail { new_email: String }
);

customer_command!(ChangePhone { phone: String });

customer_command!(ChangeAddress { address: AddressInput });

customer_command!(ActivateCustomer {});

customer_command!(DeactivateCustomer { reason: String });

customer_command!(
    /// Command to tombstone a customer.
    DeleteCustomer { reason: String }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_expose_target_and_actor() {
        let id = AggregateId::new();
        let rename = RenameCustomer::new(id, "Grace").by("support");

        assert_eq!(rename.aggregate_id(), id);
        assert_eq!(Command::actor(&rename), Some("support"));
        assert_eq!(rename.new_name, "Grace");
    }

    #[test]
    fn register_generates_an_id() {
        let a = RegisterCustomer::new("Ada", "ada@example.com");
        let b = RegisterCustomer::new("Ada", "ada@example.com");
        assert_ne!(a.aggregate_id(), b.aggregate_id());
        assert_eq!(Command::actor(&a), None);
    }
}
