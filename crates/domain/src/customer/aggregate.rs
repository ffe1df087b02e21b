//! Customer aggregate implementation.

use common::{Failure, Outcome};

use crate::aggregate::{Aggregate, AggregateRoot};
use crate::entity::Entity;
use crate::event::RecordedEvent;

use super::commands::{AddressInput, RegisterCustomer};
use super::{Address, CustomerEvent, CustomerName, CustomerStatus, Email, PhoneNumber};

/// Customer aggregate state.
#[derive(Debug, Clone, Default)]
pub struct Customer {
    entity: Entity<Customer>,
    name: CustomerName,
    email: Option<Email>,
    phone: Option<PhoneNumber>,
    address: Option<Address>,
    status: CustomerStatus,
    status_reason: Option<String>,
}

impl Customer {
    /// Registers a new customer.
    ///
    /// The returned root holds a single pending `CustomerCreated` event.
    pub fn register(cmd: &RegisterCustomer) -> Outcome<AggregateRoot<Customer>> {
        let name = CustomerName::parse(&cmd.name)?;
        let email = Email::parse(&cmd.email)?;
        let phone = cmd.phone.as_deref().map(PhoneNumber::parse).transpose()?;
        let address = cmd.address.as_ref().map(parse_address).transpose()?;

        AggregateRoot::create(cmd.customer_id, cmd.actor.as_deref(), |_| {
            Ok(vec![CustomerEvent::created(name, email, phone, address)])
        })
    }

    pub fn rename(&self, new_name: &str) -> Outcome<Vec<CustomerEvent>> {
        self.ensure_mutable()?;
        let new_name = CustomerName::parse(new_name)?;
        if new_name == self.name {
            return Ok(vec![]);
        }
        Ok(vec![CustomerEvent::renamed(self.name.clone(), new_name)])
    }

    pub fn change_email(&self, new_email: &str) -> Outcome<Vec<CustomerEvent>> {
        self.ensure_mutable()?;
        let new_email = Email::parse(new_email)?;
        match &self.email {
            Some(current) if *current == new_email => Ok(vec![]),
            Some(current) => Ok(vec![CustomerEvent::email_changed(current.clone(), new_email)]),
            None => Err(Failure::business_rule("customer has no email on record")),
        }
    }

    pub fn change_phone(&self, phone: &str) -> Outcome<Vec<CustomerEvent>> {
        self.ensure_mutable()?;
        let phone = PhoneNumber::parse(phone)?;
        if self.phone.as_ref() == Some(&phone) {
            return Ok(vec![]);
        }
        Ok(vec![CustomerEvent::phone_changed(phone)])
    }

    pub fn change_address(&self, address: &AddressInput) -> Outcome<Vec<CustomerEvent>> {
        self.ensure_mutable()?;
        let address = parse_address(address)?;
        if self.address.as_ref() == Some(&address) {
            return Ok(vec![]);
        }
        Ok(vec![CustomerEvent::address_changed(address)])
    }

    pub fn activate(&self) -> Outcome<Vec<CustomerEvent>> {
        self.ensure_mutable()?;
        if self.status.is_active() {
            return Ok(vec![]);
        }
        Ok(vec![CustomerEvent::activated()])
    }

    pub fn deactivate(&self, reason: &str) -> Outcome<Vec<CustomerEvent>> {
        self.ensure_mutable()?;
        let reason = required_reason(reason)?;
        if self.status == CustomerStatus::Inactive {
            return Ok(vec![]);
        }
        Ok(vec![CustomerEvent::deactivated(reason)])
    }

    /// Tombstones the customer. Deleting twice is a no-op.
    pub fn delete(&self, reason: &str) -> Outcome<Vec<CustomerEvent>> {
        let reason = required_reason(reason)?;
        if self.status.is_deleted() {
            return Ok(vec![]);
        }
        Ok(vec![CustomerEvent::deleted(reason)])
    }

    fn ensure_mutable(&self) -> Outcome {
        if self.status.is_deleted() {
            return Err(Failure::business_rule("customer has been deleted"));
        }
        Ok(())
    }

    pub fn name(&self) -> &CustomerName {
        &self.name
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    pub fn status(&self) -> CustomerStatus {
        self.status
    }

    /// Reason given for the last deactivation or deletion.
    pub fn status_reason(&self) -> Option<&str> {
        self.status_reason.as_deref()
    }

    pub fn is_deleted(&self) -> bool {
        self.status.is_deleted()
    }
}

impl Aggregate for Customer {
    type Event = CustomerEvent;

    fn aggregate_type() -> &'static str {
        "Customer"
    }

    fn entity(&self) -> &Entity<Customer> {
        &self.entity
    }

    fn apply(&mut self, event: &RecordedEvent<CustomerEvent>) {
        let at = event.occurred_on;
        let by = event.actor.clone();

        match &event.payload {
            CustomerEvent::CustomerCreated(data) => {
                self.entity.establish(event.aggregate_id, at, by);
                self.name = data.name.clone();
                self.email = Some(data.email.clone());
                self.phone = data.phone.clone();
                self.address = data.address.clone();
                self.status = CustomerStatus::Active;
                return;
            }
            CustomerEvent::CustomerRenamed(data) => {
                self.name = data.new_name.clone();
            }
            CustomerEvent::EmailChanged(data) => {
                self.email = Some(data.new_email.clone());
            }
            CustomerEvent::PhoneChanged(data) => {
                self.phone = Some(data.phone.clone());
            }
            CustomerEvent::AddressChanged(data) => {
                self.address = Some(data.address.clone());
            }
            CustomerEvent::CustomerActivated(_) => {
                self.status = CustomerStatus::Active;
                self.status_reason = None;
            }
            CustomerEvent::CustomerDeactivated(data) => {
                self.status = CustomerStatus::Inactive;
                self.status_reason = Some(data.reason.clone());
            }
            CustomerEvent::CustomerDeleted(data) => {
                self.status = CustomerStatus::Deleted;
                self.status_reason = Some(data.reason.clone());
            }
        }

        self.entity.touch(at, by);
    }

    fn check_invariants(&self) -> Vec<String> {
        let mut violations = Vec::new();

        if !self.entity.is_established() {
            violations.push("customer has no identity".to_string());
        }
        if self.name.as_str().is_empty() {
            violations.push("customer has no name".to_string());
        }
        if self.email.is_none() {
            violations.push("customer has no email".to_string());
        }
        if !self.status.is_active() && self.status_reason.is_none() {
            violations.push(format!("{} customer has no reason on record", self.status));
        }

        violations
    }
}

fn parse_address(input: &AddressInput) -> Outcome<Address> {
    Address::new(&input.street, &input.city, &input.postal_code, &input.country)
}

fn required_reason(reason: &str) -> Outcome<String> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(Failure::invalid_argument("reason cannot be empty"));
    }
    Ok(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ErrorKind;
    use event_store::Version;

    fn register_ada() -> AggregateRoot<Customer> {
        Customer::register(&RegisterCustomer::new("Ada", "ada@example.com").by("signup")).unwrap()
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn register_emits_created_event() {
            let root = register_ada();

            assert_eq!(root.version(), Version::new(1));
            assert_eq!(root.pending_events().len(), 1);
            assert!(matches!(
                root.pending_events()[0].payload,
                CustomerEvent::CustomerCreated(_)
            ));
            assert_eq!(root.state().name().as_str(), "Ada");
            assert_eq!(root.state().status(), CustomerStatus::Active);
            assert!(root.id().is_some());
            assert_eq!(root.state().entity().created_by(), Some("signup"));
        }

        #[test]
        fn register_rejects_invalid_input() {
            let failure = Customer::register(&RegisterCustomer::new("", "ada@example.com")).unwrap_err();
            assert_eq!(failure.message(), "name cannot be empty");

            let failure = Customer::register(&RegisterCustomer::new("Ada", "not-an-email")).unwrap_err();
            assert_eq!(failure.kind(), ErrorKind::InvalidArgument);
        }

        #[test]
        fn deactivate_then_activate() {
            let mut root = register_ada();

            assert_eq!(root.execute(None, |c| c.deactivate("on holiday")).unwrap(), 1);
            assert_eq!(root.state().status(), CustomerStatus::Inactive);
            assert_eq!(root.state().status_reason(), Some("on holiday"));

            assert_eq!(root.execute(None, |c| c.deactivate("again")).unwrap(), 0);

            assert_eq!(root.execute(None, |c| c.activate()).unwrap(), 1);
            assert_eq!(root.state().status(), CustomerStatus::Active);
            assert_eq!(root.state().status_reason(), None);
            assert_eq!(root.version(), Version::new(3));
        }

        #[test]
        fn deleted_customer_rejects_changes() {
            let mut root = register_ada();
            root.execute(None, |c| c.delete("gdpr request")).unwrap();
            let version = root.version();

            let failure = root.execute(None, |c| c.rename("Grace")).unwrap_err();
            assert_eq!(failure.kind(), ErrorKind::BusinessRuleViolation);
            assert_eq!(root.version(), version);

            assert_eq!(root.execute(None, |c| c.delete("twice")).unwrap(), 0);
        }

        #[test]
        fn reason_is_required() {
            let mut root = register_ada();
            let failure = root.execute(None, |c| c.delete("  ")).unwrap_err();
            assert_eq!(failure.message(), "reason cannot be empty");
            assert!(!root.state().is_deleted());
        }

        #[test]
        fn reason_is_checked_even_when_status_is_unchanged() {
            let mut root = register_ada();
            root.execute(None, |c| c.deactivate("on holiday")).unwrap();

            let failure = root.execute(None, |c| c.deactivate("   ")).unwrap_err();
            assert_eq!(failure.kind(), ErrorKind::InvalidArgument);

            root.execute(None, |c| c.delete("gdpr request")).unwrap();
            let failure = root.execute(None, |c| c.delete("")).unwrap_err();
            assert_eq!(failure.message(), "reason cannot be empty");
            assert_eq!(root.version(), Version::new(3));
        }
    }

    mod mutations {
        use super::*;

        #[test]
        fn rename_to_empty_fails_without_side_effects() {
            let mut root = register_ada();

            let failure = root.execute(None, |c| c.rename("")).unwrap_err();

            assert_eq!(failure.message(), "name cannot be empty");
            assert_eq!(root.version(), Version::new(1));
            assert_eq!(root.pending_events().len(), 1);
            assert_eq!(root.state().name().as_str(), "Ada");
        }

        #[test]
        fn rename_to_same_name_is_a_no_op() {
            let mut root = register_ada();

            assert_eq!(root.execute(None, |c| c.rename("Grace")).unwrap(), 1);
            assert_eq!(root.execute(None, |c| c.rename("Grace")).unwrap(), 0);

            assert_eq!(root.version(), Version::new(2));
            assert_eq!(root.pending_events().len(), 2);
            assert_eq!(root.state().name().as_str(), "Grace");
        }

        #[test]
        fn email_change_records_old_and_new() {
            let mut root = register_ada();

            root.execute(Some("ada"), |c| c.change_email("Ada@Lovelace.org")).unwrap();

            let CustomerEvent::EmailChanged(data) = &root.pending_events()[1].payload else {
                panic!("expected EmailChanged");
            };
            assert_eq!(data.old_email.as_str(), "ada@example.com");
            assert_eq!(data.new_email.as_str(), "ada@lovelace.org");
            assert_eq!(root.state().entity().last_modified_by(), Some("ada"));

            assert_eq!(root.execute(None, |c| c.change_email("ADA@lovelace.org")).unwrap(), 0);
        }

        #[test]
        fn phone_and_address_changes() {
            let mut root = register_ada();
            let address = AddressInput {
                street: "12 St James's Square".into(),
                city: "London".into(),
                postal_code: "SW1Y 4LB".into(),
                country: "UK".into(),
            };

            root.execute(None, |c| c.change_phone("+44 20 7946 0000")).unwrap();
            root.execute(None, |c| c.change_address(&address)).unwrap();
            assert_eq!(root.execute(None, |c| c.change_phone("+442079460000")).unwrap(), 0);

            assert_eq!(root.state().phone().unwrap().as_str(), "+442079460000");
            assert_eq!(root.state().address().unwrap().city(), "London");
            assert_eq!(root.version(), Version::new(3));
        }
    }

    mod replay {
        use super::*;

        #[test]
        fn replay_reproduces_state() {
            let mut root = register_ada();
            root.execute(None, |c| c.rename("Grace")).unwrap();
            root.execute(None, |c| c.rename("Grace")).unwrap();
            let history = root.take_pending_events();

            let replayed = AggregateRoot::<Customer>::replay(history).unwrap();

            assert_eq!(replayed.state().name().as_str(), "Grace");
            assert_eq!(replayed.version(), Version::new(2));
            assert!(!replayed.has_pending_events());
            assert_eq!(replayed.id(), root.id());
        }

        #[test]
        fn replay_without_creation_violates_invariants() {
            let mut root = register_ada();
            root.execute(None, |c| c.rename("Grace")).unwrap();
            let mut history = root.take_pending_events();
            history.remove(0);
            for event in &mut history {
                event.version = Version::new(1);
            }

            let error = AggregateRoot::<Customer>::replay(history).unwrap_err();
            assert!(matches!(
                error,
                crate::error::CorruptedHistory::InvariantsViolated { .. }
            ));
        }
    }
}
