//! Demo entry point: registers a customer, edits it and drains the email queue.

use std::sync::Arc;

use app::config::Config;
use app::mailer::LogMailer;
use domain::{ChangeEmail, DeactivateCustomer, RegisterCustomer, RenameCustomer};
use event_store::InMemoryEventStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Configuration and tracing
    let config = Config::from_env();
    app::telemetry::init_tracing(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = app::telemetry::install_metrics()?;

    // 3. Wire the application and start the background worker
    let app = app::create_app(InMemoryEventStore::new(), &config, Arc::new(LogMailer));
    let worker = app.worker.spawn();
    let service = app.service;

    // 4. Run a short customer lifecycle
    let registered = service
        .register(RegisterCustomer::new("Ada", "ada@example.com").by("demo"))
        .await?;
    let id = registered.aggregate.id().ok_or("registered customer has no id")?;
    tracing::info!(%id, version = %registered.new_version, "customer registered");

    service.rename(RenameCustomer::new(id, "Ada Lovelace").by("demo")).await?;
    service
        .change_email(ChangeEmail::new(id, "ada@lovelace.org").by("demo"))
        .await?;

    if let Err(err) = service.rename(RenameCustomer::new(id, "")).await {
        tracing::info!(error = %err, class = ?err.class(), "invalid rename rejected");
    }

    service
        .deactivate(DeactivateCustomer::new(id, "demo finished"))
        .await?;

    let customer = service.get_customer(id).await?;
    tracing::info!(
        %id,
        name = %customer.state().name(),
        status = %customer.state().status(),
        version = %customer.version(),
        "final state"
    );

    // 5. Drop every producer so the worker drains the queue and stops
    drop(service);
    drop(app.queue);
    let taken = worker.await?;
    tracing::info!(taken, "background queue drained");

    tracing::debug!(metrics = %metrics_handle.render(), "metrics snapshot");
    Ok(())
}
