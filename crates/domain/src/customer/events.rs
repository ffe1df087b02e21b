//! Customer domain events.

use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;

use super::{Address, CustomerName, Email, PhoneNumber};

/// Events that can occur on a customer aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CustomerEvent {
    /// Customer was registered. Always the first event of a stream.
    CustomerCreated(CustomerCreatedData),

    CustomerRenamed(CustomerRenamedData),

    EmailChanged(EmailChangedData),

    PhoneChanged(PhoneChangedData),

    AddressChanged(AddressChangedData),

    CustomerActivated(CustomerActivatedData),

    CustomerDeactivated(CustomerDeactivatedData),

    /// Customer was tombstoned.
    CustomerDeleted(CustomerDeletedData),
}

impl DomainEvent for CustomerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CustomerEvent::CustomerCreated(_) => "CustomerCreated",
            CustomerEvent::CustomerRenamed(_) => "CustomerRenamed",
            CustomerEvent::EmailChanged(_) => "EmailChanged",
            CustomerEvent::PhoneChanged(_) => "PhoneChanged",
            CustomerEvent::AddressChanged(_) => "AddressChanged",
            CustomerEvent::CustomerActivated(_) => "CustomerActivated",
            CustomerEvent::CustomerDeactivated(_) => "CustomerDeactivated",
            CustomerEvent::CustomerDeleted(_) => "CustomerDeleted",
        }
    }
}

/// Data for CustomerCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerCreatedData {
    pub name: CustomerName,
    pub email: Email,
    pub phone: Option<PhoneNumber>,
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRenamedData {
    pub old_name: CustomerName,
    pub new_name: CustomerName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailChangedData {
    pub old_email: Email,
    pub new_email: Email,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneChangedData {
    pub phone: PhoneNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressChangedData {
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerActivatedData {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDeactivatedData {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDeletedData {
    pub reason: String,
}

// Convenience constructors
impl CustomerEvent {
    pub fn created(
        name: CustomerName,
        email: Email,
        phone: Option<PhoneNumber>,
        address: Option<Address>,
    ) -> Self {
        CustomerEvent::CustomerCreated(CustomerCreatedData {
            name,
            email,
            phone,
            address,
        })
    }

    pub fn renamed(old_name: CustomerName, new_name: CustomerName) -> Self {
        CustomerEvent::CustomerRenamed(CustomerRenamedData { old_name, new_name })
    }

    pub fn email_changed(old_email: Email, new_email: Email) -> Self {
        CustomerEvent::EmailChanged(EmailChangedData {
            old_email,
            new_email,
        })
    }

    pub fn phone_changed(phone: PhoneNumber) -> Self {
        CustomerEvent::PhoneChanged(PhoneChangedData { phone })
    }

    pub fn address_changed(address: Address) -> Self {
        CustomerEvent::AddressChanged(AddressChangedData { address })
    }

    pub fn activated() -> Self {
        CustomerEvent::CustomerActivated(CustomerActivatedData {})
    }

    pub fn deactivated(reason: impl Into<String>) -> Self {
        CustomerEvent::CustomerDeactivated(CustomerDeactivatedData {
            reason: reason.into(),
        })
    }

    pub fn deleted(reason: impl Into<String>) -> Self {
        CustomerEvent::CustomerDeleted(CustomerDeletedData {
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = CustomerEvent::renamed(
            CustomerName::parse("Ada").unwrap(),
            CustomerName::parse("Grace").unwrap(),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CustomerRenamed");
        assert_eq!(json["data"]["new_name"], "Grace");

        let back: CustomerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn event_type_matches_serde_tag() {
        let events = [
            CustomerEvent::activated(),
            CustomerEvent::deactivated("moved away"),
            CustomerEvent::deleted("gdpr request"),
        ];

        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.event_type());
        }
    }
}
