use super::*;

/// Tests an admin refunding a paid booking.
///
/// Expected: payment refunded, linked booking cancelled and its seat released
#[tokio::test]
async fn refunds_and_cancels_linked_booking() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, _) = factory::helpers::create_patient_account(db).await?;
    let gateway = FakeGateway::default();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let order = service.create_order(account.id, slot.id).await?;
    let booking_id = match service
        .verify_and_book(account.id, signed(&order.order_id, "pay_refund"))
        .await?
    {
        VerifyOutcome::Booked { booking, .. } => booking.id,
        other => panic!("Expected booked outcome, got: {:?}", other),
    };
    assert_eq!(booked_seats(db, slot.id).await?, 1);

    let result = service.refund(order.id).await?;

    assert_eq!(result.payment.refund_status, RefundStatus::Refunded);
    assert_eq!(result.payment.refund_amount, Some(slot.price));
    assert!(result.payment.refunded_at.is_some());
    let cancelled = result.cancelled_booking.expect("linked booking cancelled");
    assert_eq!(cancelled.id, booking_id);
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(booked_seats(db, slot.id).await?, 0);

    Ok(())
}

/// Tests refunding a payment twice.
///
/// Expected: Err(AlreadyRefunded) and no second gateway refund
#[tokio::test]
async fn rejects_second_refund() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .build()
        .await?;
    let gateway = FakeGateway::default();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let first = service.refund(payment.id).await?;
    assert!(first.cancelled_booking.is_none());

    let second = service.refund(payment.id).await;
    assert!(matches!(
        second,
        Err(AppError::PaymentErr(PaymentError::AlreadyRefunded(_)))
    ));
    assert_eq!(gateway.refund_count(), 1);

    Ok(())
}

/// Tests two admins refunding the same payment at once.
///
/// Expected: one refund succeeds, the other is rejected, the gateway refunds once
#[tokio::test]
async fn concurrent_refunds_reach_gateway_once() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .build()
        .await?;
    let gateway = FakeGateway::default();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let (first, second) = tokio::join!(service.refund(payment.id), service.refund(payment.id));

    let rejected = match (first, second) {
        (Ok(_), Err(err)) | (Err(err), Ok(_)) => err,
        other => panic!("Expected one refund and one rejection, got: {:?}", other),
    };
    assert!(matches!(
        rejected,
        AppError::PaymentErr(
            PaymentError::AlreadyRefunded(_) | PaymentError::RefundInProgress(_)
        )
    ));
    assert_eq!(gateway.refund_count(), 1);

    Ok(())
}

/// Tests refunding a payment whose refund is already under way.
///
/// Expected: Err(RefundInProgress) and no gateway call
#[tokio::test]
async fn rejects_refund_while_one_is_pending() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .refund_status(RefundStatus::Pending)
        .build()
        .await?;
    let gateway = FakeGateway::default();

    let result = PaymentService::new(db, &gateway, KEY_SECRET)
        .refund(payment.id)
        .await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::RefundInProgress(id))) if id == payment.id
    ));
    assert_eq!(gateway.refund_count(), 0);

    Ok(())
}

/// Tests refunding a payment that never succeeded.
///
/// Expected: Err(NotRefundable) and no gateway call
#[tokio::test]
async fn refuses_refund_of_pending_payment() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;
    let payment = factory::create_payment(db, &account, &slot).await?;
    let gateway = FakeGateway::default();

    let result = PaymentService::new(db, &gateway, KEY_SECRET)
        .refund(payment.id)
        .await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::NotRefundable { .. }))
    ));
    assert_eq!(gateway.refund_count(), 0);

    Ok(())
}

/// Tests a refund the gateway refuses.
///
/// Expected: Err(AppError::GatewayErr) and the payment left unrefunded
#[tokio::test]
async fn gateway_refusal_changes_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .build()
        .await?;
    let gateway = FakeGateway::failing_refunds();

    let result = PaymentService::new(db, &gateway, KEY_SECRET)
        .refund(payment.id)
        .await;

    assert!(matches!(result, Err(AppError::GatewayErr(_))));
    let stored = entity::prelude::Payment::find_by_id(payment.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.refund_status, RefundStatus::None);

    Ok(())
}

/// Tests owners and admins reading a payment by order id.
///
/// Expected: owner and admin succeed, another account gets NotPaymentOwner
#[tokio::test]
async fn restricts_order_lookup_to_owner_and_admin() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let owner = factory::create_account(db).await?;
    let other = factory::create_account(db).await?;
    let admin = factory::create_admin(db).await?;
    let payment = factory::create_payment(db, &owner, &slot).await?;
    let gateway = FakeGateway::default();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let found = service
        .get_by_order_id(owner.id, false, &payment.order_id)
        .await?;
    assert_eq!(found.id, payment.id);
    service
        .get_by_order_id(admin.id, true, &payment.order_id)
        .await?;

    let denied = service
        .get_by_order_id(other.id, false, &payment.order_id)
        .await;
    assert!(matches!(
        denied,
        Err(AppError::PaymentErr(PaymentError::NotPaymentOwner { .. }))
    ));

    assert_eq!(service.get_by_account(owner.id).await?.len(), 1);
    assert!(service.get_by_account(other.id).await?.is_empty());
    assert_eq!(service.get_all().await?.len(), 1);

    Ok(())
}

/// Tests retrying a failed refund that the gateway refuses again.
///
/// Expected: Err(AppError::GatewayErr) and the refund status back at failed
#[tokio::test]
async fn gateway_refusal_restores_failed_status() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;
    let payment = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .refund_status(RefundStatus::Failed)
        .build()
        .await?;
    let gateway = FakeGateway::failing_refunds();

    let result = PaymentService::new(db, &gateway, KEY_SECRET)
        .refund(payment.id)
        .await;

    assert!(matches!(result, Err(AppError::GatewayErr(_))));
    let stored = entity::prelude::Payment::find_by_id(payment.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.refund_status, RefundStatus::Failed);

    Ok(())
}
