use super::*;

/// Tests listing a slot with its active bookings.
///
/// Expected: the slot and its non-cancelled bookings only
#[tokio::test]
async fn returns_slot_with_active_bookings() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::slot::SlotFactory::new(db)
        .booked_seats(1)
        .build()
        .await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    let (other_account, other_patient) = factory::helpers::create_patient_account(db).await?;
    let active = factory::create_booking(db, &account, &patient, &slot).await?;
    factory::booking::BookingFactory::new(db, other_account.id, other_patient.id, &slot)
        .status(BookingStatus::Cancelled)
        .build()
        .await?;

    let (found, bookings) = SlotService::new(db).get_with_bookings(slot.id).await?;

    assert_eq!(found.id, slot.id);
    assert_eq!(found.available_seats(), 19);
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, active.id);

    Ok(())
}

/// Tests listing bookings of a missing slot.
///
/// Expected: Err(SlotNotFound)
#[tokio::test]
async fn missing_slot_is_not_found() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let result = SlotService::new(db).get_with_bookings(7).await;

    assert!(matches!(
        result,
        Err(AppError::BookingErr(BookingError::SlotNotFound(7)))
    ));

    Ok(())
}
