use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{data::payment::PaymentRepository, error::AppError};

/// Starts the abandoned payment expiry scheduler
///
/// This scheduler runs every minute and cancels payments that are still pending after
/// `expiry`. A later verification with a valid signature still completes, since only
/// succeeded payments are rejected as already verified.
///
/// # Arguments
/// - `db`: Database connection
/// - `expiry`: How long a payment may stay pending
pub async fn start_scheduler(
    db: DatabaseConnection,
    expiry: Duration,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();

    // Schedule job to run every minute
    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = job_db.clone();

        Box::pin(async move {
            if let Err(e) = expire_abandoned_payments(&db, Utc::now(), expiry).await {
                tracing::error!("Error expiring abandoned payments: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(
        "Payment expiry scheduler started, pending payments expire after {} minutes",
        expiry.num_minutes()
    );

    Ok(scheduler)
}

/// Cancels payments created more than `expiry` before `now` that are still pending
pub async fn expire_abandoned_payments(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
    expiry: Duration,
) -> Result<u64, AppError> {
    let expired = PaymentRepository::new(db)
        .expire_pending_before(now - expiry)
        .await?;

    if expired > 0 {
        tracing::info!("Cancelled {} abandoned payment orders", expired);
    }

    Ok(expired)
}
