//! Routing table for [`CustomerEvent`].

use async_trait::async_trait;
use domain::RecordedEvent;
use domain::customer::{
    AddressChangedData, CustomerActivatedData, CustomerCreatedData, CustomerDeactivatedData,
    CustomerDeletedData, CustomerEvent, CustomerRenamedData, EmailChangedData, PhoneChangedData,
};

use crate::dispatcher::{Routable, Subscribe, deliver};
use crate::handler::{HandlerFailure, Handlers};
use crate::notification::EventHeader;

/// One handler list per customer event variant.
#[derive(Default)]
pub struct CustomerRoutes {
    created: Handlers<CustomerCreatedData>,
    renamed: Handlers<CustomerRenamedData>,
    email_changed: Handlers<EmailChangedData>,
    phone_changed: Handlers<PhoneChangedData>,
    address_changed: Handlers<AddressChangedData>,
    activated: Handlers<CustomerActivatedData>,
    deactivated: Handlers<CustomerDeactivatedData>,
    deleted: Handlers<CustomerDeletedData>,
}

macro_rules! subscribe {
    ($($data:ty => $field:ident),* $(,)?) => {
        $(
            impl Subscribe<$data> for CustomerRoutes {
                fn handlers_mut(&mut self) -> &mut Handlers<$data> {
                    &mut self.$field
                }
            }
        )*
    };
}

subscribe! {
    CustomerCreatedData => created,
    CustomerRenamedData => renamed,
    EmailChangedData => email_changed,
    PhoneChangedData => phone_changed,
    AddressChangedData => address_changed,
    CustomerActivatedData => activated,
    CustomerDeactivatedData => deactivated,
    CustomerDeletedData => deleted,
}

#[async_trait]
impl Routable for CustomerEvent {
    type Routes = CustomerRoutes;

    async fn route(
        routes: &CustomerRoutes,
        event: &RecordedEvent<CustomerEvent>,
        failures: &mut Vec<HandlerFailure>,
    ) -> usize {
        let header = EventHeader::from(event);
        match &event.payload {
            CustomerEvent::CustomerCreated(data) => {
                deliver(&routes.created, header, data, failures).await
            }
            CustomerEvent::CustomerRenamed(data) => {
                deliver(&routes.renamed, header, data, failures).await
            }
            CustomerEvent::EmailChanged(data) => {
                deliver(&routes.email_changed, header, data, failures).await
            }
            CustomerEvent::PhoneChanged(data) => {
                deliver(&routes.phone_changed, header, data, failures).await
            }
            CustomerEvent::AddressChanged(data) => {
                deliver(&routes.address_changed, header, data, failures).await
            }
            CustomerEvent::CustomerActivated(data) => {
                deliver(&routes.activated, header, data, failures).await
            }
            CustomerEvent::CustomerDeactivated(data) => {
                deliver(&routes.deactivated, header, data, failures).await
            }
            CustomerEvent::CustomerDeleted(data) => {
                deliver(&routes.deleted, header, data, failures).await
            }
        }
    }
}
