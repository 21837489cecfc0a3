use super::*;

/// Tests expiring abandoned orders.
///
/// Expected: only pending payments older than the cutoff are cancelled
#[tokio::test]
async fn expires_only_stale_pending_payments() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let account = factory::create_account(db).await?;
    let slot = factory::create_slot(db).await?;
    let hour_ago = Utc::now() - Duration::hours(1);

    let stale = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .created_at(hour_ago)
        .build()
        .await?;
    let fresh = factory::create_payment(db, &account, &slot).await?;
    let paid = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .created_at(hour_ago)
        .build()
        .await?;

    let repo = PaymentRepository::new(db);
    let expired = repo
        .expire_pending_before(Utc::now() - Duration::minutes(30))
        .await?;

    assert_eq!(expired, 1);
    assert_eq!(
        repo.find_by_id(stale.id).await?.unwrap().status,
        PaymentStatus::Cancelled
    );
    assert_eq!(
        repo.find_by_id(fresh.id).await?.unwrap().status,
        PaymentStatus::Pending
    );
    assert_eq!(
        repo.find_by_id(paid.id).await?.unwrap().status,
        PaymentStatus::Succeeded
    );

    Ok(())
}
