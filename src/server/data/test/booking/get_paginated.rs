use super::*;

/// Tests paginating all bookings.
///
/// Expected: page sizes respected and total counts every booking
#[tokio::test]
async fn paginates_bookings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    for _ in 0..5 {
        let slot = factory::create_slot(db).await?;
        factory::create_booking(db, &account, &patient, &slot).await?;
    }

    let repo = BookingRepository::new(db);
    let (first_page, total) = repo.get_paginated(0, 2).await?;
    let (last_page, _) = repo.get_paginated(2, 2).await?;

    assert_eq!(total, 5);
    assert_eq!(first_page.len(), 2);
    assert_eq!(last_page.len(), 1);

    Ok(())
}

/// Tests listing a slot's non-cancelled bookings.
///
/// Expected: cancelled bookings excluded
#[tokio::test]
async fn lists_active_bookings_of_slot() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    let (other_account, other_patient) = factory::helpers::create_patient_account(db).await?;

    let active = factory::create_booking(db, &account, &patient, &slot).await?;
    factory::booking::BookingFactory::new(db, other_account.id, other_patient.id, &slot)
        .status(BookingStatus::Cancelled)
        .build()
        .await?;

    let bookings = BookingRepository::new(db).get_active_by_slot(slot.id).await?;

    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].id, active.id);

    Ok(())
}
