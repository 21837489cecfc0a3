use super::*;

/// Tests verifying a correctly signed payment.
///
/// Expected: VerifyOutcome::Booked with booking and payment linked both ways
#[tokio::test]
async fn books_after_valid_signature() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    let gateway = FakeGateway::default();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let order = service.create_order(account.id, slot.id).await?;
    let outcome = service
        .verify_and_book(account.id, signed(&order.order_id, "pay_ok"))
        .await?;

    match outcome {
        VerifyOutcome::Booked { booking, payment } => {
            assert_eq!(booking.patient_id, patient.id);
            assert_eq!(booking.token_number, 1);
            assert_eq!(booking.payment_id, Some(payment.id));
            assert_eq!(payment.booking_id, Some(booking.id));
            assert_eq!(payment.status, PaymentStatus::Succeeded);
            assert_eq!(payment.gateway_payment_id.as_deref(), Some("pay_ok"));
            assert!(payment.paid_at.is_some());
        }
        other => panic!("Expected booked outcome, got: {:?}", other),
    }
    assert_eq!(booked_seats(db, slot.id).await?, 1);
    assert_eq!(gateway.refund_count(), 0);

    Ok(())
}

/// Tests verifying with a forged signature.
///
/// Expected: Err(InvalidSignature), payment failed, no seat claimed
#[tokio::test]
async fn marks_payment_failed_on_signature_mismatch() -> Result<(), AppError> {
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
    let mut params = signed(&order.order_id, "pay_forged");
    params.signature = "0".repeat(64);

    let result = service.verify_and_book(account.id, params).await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::InvalidSignature(_)))
    ));
    let stored = entity::prelude::Payment::find_by_id(order.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.status, PaymentStatus::Failed);
    assert_eq!(booked_seats(db, slot.id).await?, 0);

    Ok(())
}

/// Tests the slot filling up while the patient pays.
///
/// Another patient takes the last seat between order creation and verification, so the
/// captured payment is refunded instead of overbooking.
///
/// Expected: VerifyOutcome::Refunded, no booking, slot still holding one seat
#[tokio::test]
async fn refunds_when_slot_fills_during_payment() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::slot::SlotFactory::new(db)
        .max_seats(1)
        .build()
        .await?;
    let (payer, payer_patient) = factory::helpers::create_patient_account(db).await?;
    let (walk_in, _) = factory::helpers::create_patient_account(db).await?;
    let gateway = FakeGateway::default();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let order = service.create_order(payer.id, slot.id).await?;
    BookingService::new(db)
        .create(
            Requester::Patient {
                account_id: walk_in.id,
            },
            slot.id,
        )
        .await?;

    let outcome = service
        .verify_and_book(payer.id, signed(&order.order_id, "pay_late"))
        .await?;

    match outcome {
        VerifyOutcome::Refunded { payment, message } => {
            assert_eq!(payment.status, PaymentStatus::Succeeded);
            assert_eq!(payment.refund_status, RefundStatus::Refunded);
            assert_eq!(payment.refund_amount, Some(payment.amount));
            assert!(payment.refund_id.is_some());
            assert!(payment.booking_id.is_none());
            assert!(message.contains("refunded"));
        }
        other => panic!("Expected refunded outcome, got: {:?}", other),
    }

    let refunds = gateway.refunds.lock().unwrap();
    assert_eq!(refunds.len(), 1);
    assert_eq!(refunds[0].payment_id, "pay_late");
    drop(refunds);

    let payer_bookings = BookingService::new(db)
        .get_by_patient(payer_patient.id)
        .await?;
    assert!(payer_bookings.is_empty());
    assert_eq!(booked_seats(db, slot.id).await?, 1);

    Ok(())
}

/// Tests an automatic refund the gateway refuses.
///
/// Expected: Err(RefundFailed) with the refund flagged failed for manual follow-up
#[tokio::test]
async fn flags_failed_automatic_refund() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::slot::SlotFactory::new(db)
        .max_seats(1)
        .build()
        .await?;
    let (account, _) = factory::helpers::create_patient_account(db).await?;
    let gateway = FakeGateway::failing_refunds();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let order = service.create_order(account.id, slot.id).await?;
    entity::prelude::Slot::update(entity::slot::ActiveModel {
        id: sea_orm::ActiveValue::Unchanged(slot.id),
        is_active: sea_orm::ActiveValue::Set(false),
        ..Default::default()
    })
    .exec(db)
    .await?;

    let result = service
        .verify_and_book(account.id, signed(&order.order_id, "pay_stuck"))
        .await;

    match result {
        Err(AppError::PaymentErr(PaymentError::RefundFailed(order_id))) => {
            assert_eq!(order_id, order.order_id)
        }
        other => panic!("Expected RefundFailed error, got: {:?}", other),
    }

    let stored = entity::prelude::Payment::find_by_id(order.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.status, PaymentStatus::Succeeded);
    assert_eq!(stored.refund_status, RefundStatus::Failed);
    assert_eq!(booked_seats(db, slot.id).await?, 0);

    Ok(())
}

/// Tests verifying the same order twice.
///
/// Expected: Err(AlreadyVerified) and still a single booking
#[tokio::test]
async fn rejects_second_verification() -> Result<(), AppError> {
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
    let params = signed(&order.order_id, "pay_once");
    service.verify_and_book(account.id, params.clone()).await?;

    let result = service.verify_and_book(account.id, params).await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::AlreadyVerified(_)))
    ));
    assert_eq!(booked_seats(db, slot.id).await?, 1);

    Ok(())
}

/// Tests verifying another account's order.
///
/// Expected: Err(NotPaymentOwner) and the payment left pending
#[tokio::test]
async fn rejects_foreign_order() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (owner, _) = factory::helpers::create_patient_account(db).await?;
    let (intruder, _) = factory::helpers::create_patient_account(db).await?;
    let gateway = FakeGateway::default();
    let service = PaymentService::new(db, &gateway, KEY_SECRET);

    let order = service.create_order(owner.id, slot.id).await?;
    let result = service
        .verify_and_book(intruder.id, signed(&order.order_id, "pay_x"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::NotPaymentOwner { .. }))
    ));
    let stored = entity::prelude::Payment::find_by_id(order.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.status, PaymentStatus::Pending);

    Ok(())
}

/// Tests verifying an unknown order.
///
/// Expected: Err(OrderNotFound)
#[tokio::test]
async fn unknown_order_is_not_found() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (account, _) = factory::helpers::create_patient_account(db).await?;
    let gateway = FakeGateway::default();

    let result = PaymentService::new(db, &gateway, KEY_SECRET)
        .verify_and_book(account.id, signed("order_nope", "pay_nope"))
        .await;

    assert!(matches!(
        result,
        Err(AppError::PaymentErr(PaymentError::OrderNotFound(_)))
    ));

    Ok(())
}

/// Tests linking a booking to a payment row that can no longer be updated.
///
/// The booking stands regardless, so the link failure must not turn into an error.
///
/// Expected: the payment is returned unchanged with no booking id
#[tokio::test]
async fn failed_booking_link_returns_unlinked_payment() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    let booking = factory::create_booking(db, &account, &patient, &slot).await?;
    let payment = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .build()
        .await?;
    entity::prelude::Payment::delete_by_id(payment.id)
        .exec(db)
        .await?;
    let gateway = FakeGateway::default();

    let returned = PaymentService::new(db, &gateway, KEY_SECRET)
        .link_booking(
            crate::server::model::payment::Payment::from_entity(payment.clone()),
            booking.id,
        )
        .await;

    assert_eq!(returned.id, payment.id);
    assert_eq!(returned.booking_id, None);
    assert_eq!(returned.status, PaymentStatus::Succeeded);

    Ok(())
}

/// Tests linking a booking to its payment.
///
/// Expected: the stored payment carries the booking id
#[tokio::test]
async fn links_booking_to_payment() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_payment_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    let booking = factory::create_booking(db, &account, &patient, &slot).await?;
    let payment = factory::payment::PaymentFactory::new(db, account.id, &slot)
        .status(PaymentStatus::Succeeded)
        .build()
        .await?;
    let gateway = FakeGateway::default();

    let returned = PaymentService::new(db, &gateway, KEY_SECRET)
        .link_booking(
            crate::server::model::payment::Payment::from_entity(payment.clone()),
            booking.id,
        )
        .await;

    assert_eq!(returned.booking_id, Some(booking.id));
    let stored = entity::prelude::Payment::find_by_id(payment.id)
        .one(db)
        .await?
        .unwrap();
    assert_eq!(stored.booking_id, Some(booking.id));

    Ok(())
}
