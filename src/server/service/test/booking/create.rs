use super::*;

/// Tests a patient booking the first seats of a slot.
///
/// Verifies token numbering and appointment windows for a 40 minute slot shared by
/// 20 seats: two minutes per patient.
///
/// Expected: T-01 at 07:00-07:02, then T-02 at 07:02-07:04
#[tokio::test]
async fn allocates_sequential_tokens_and_windows() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::slot::SlotFactory::new(db)
        .times("07:00", "07:40")
        .max_seats(20)
        .build()
        .await?;
    let (first_account, _) = factory::helpers::create_patient_account(db).await?;
    let (second_account, _) = factory::helpers::create_patient_account(db).await?;

    let service = BookingService::new(db);
    let first = service
        .create(
            Requester::Patient {
                account_id: first_account.id,
            },
            slot.id,
        )
        .await?;
    let second = service
        .create(
            Requester::Patient {
                account_id: second_account.id,
            },
            slot.id,
        )
        .await?;

    assert_eq!(first.token_number, 1);
    assert_eq!(first.token_id, "T-01");
    assert_eq!(first.appointment_time, "07:00");
    assert_eq!(first.appointment_end_time, "07:02");
    assert_eq!(first.status, BookingStatus::Confirmed);
    assert_eq!(first.booking_date, slot.date);

    assert_eq!(second.token_number, 2);
    assert_eq!(second.token_id, "T-02");
    assert_eq!(second.appointment_time, "07:02");
    assert_eq!(second.appointment_end_time, "07:04");

    assert_eq!(booked_seats(db, slot.id).await?, 2);

    Ok(())
}

/// Tests two patients racing for the last seat.
///
/// Expected: exactly one booking with token 1, the other Err(SlotFull)
#[tokio::test]
async fn last_seat_goes_to_exactly_one_patient() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::slot::SlotFactory::new(db)
        .max_seats(1)
        .build()
        .await?;
    let (first_account, _) = factory::helpers::create_patient_account(db).await?;
    let (second_account, _) = factory::helpers::create_patient_account(db).await?;

    let service = BookingService::new(db);
    let (first, second) = tokio::join!(
        service.create(
            Requester::Patient {
                account_id: first_account.id
            },
            slot.id
        ),
        service.create(
            Requester::Patient {
                account_id: second_account.id
            },
            slot.id
        )
    );

    let (booked, rejected) = match (first, second) {
        (Ok(booking), Err(err)) | (Err(err), Ok(booking)) => (booking, err),
        other => panic!("Expected one booking and one rejection, got: {:?}", other),
    };

    assert_eq!(booked.token_number, 1);
    match rejected {
        AppError::BookingErr(BookingError::SlotFull(slot_id)) => assert_eq!(slot_id, slot.id),
        other => panic!("Expected SlotFull error, got: {:?}", other),
    }
    assert_eq!(booked_seats(db, slot.id).await?, 1);

    Ok(())
}

/// Tests booking the same slot twice.
///
/// Expected: Err(DuplicateBooking) and only one seat counted
#[tokio::test]
async fn rejects_duplicate_booking() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    let requester = Requester::Patient {
        account_id: account.id,
    };

    let service = BookingService::new(db);
    service.create(requester, slot.id).await?;
    let result = service.create(requester, slot.id).await;

    match result {
        Err(AppError::BookingErr(BookingError::DuplicateBooking {
            patient_id,
            slot_id,
        })) => {
            assert_eq!(patient_id, patient.id);
            assert_eq!(slot_id, slot.id);
        }
        other => panic!("Expected DuplicateBooking error, got: {:?}", other),
    }
    assert_eq!(booked_seats(db, slot.id).await?, 1);

    Ok(())
}

/// Tests booking again after cancelling.
///
/// Expected: Ok(Booking) because cancelled bookings do not count as duplicates
#[tokio::test]
async fn allows_rebooking_after_cancellation() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;
    factory::booking::BookingFactory::new(db, account.id, patient.id, &slot)
        .status(BookingStatus::Cancelled)
        .build()
        .await?;

    let booking = BookingService::new(db)
        .create(
            Requester::Patient {
                account_id: account.id,
            },
            slot.id,
        )
        .await?;

    assert_eq!(booking.status, BookingStatus::Confirmed);

    Ok(())
}

/// Tests booking slots that cannot take bookings.
///
/// Expected: SlotFull, SlotInactive and SlotNotFound respectively, no seat claimed
#[tokio::test]
async fn rejects_unbookable_slots() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let full = factory::slot::SlotFactory::new(db)
        .max_seats(2)
        .booked_seats(2)
        .build()
        .await?;
    let inactive = factory::slot::SlotFactory::new(db)
        .is_active(false)
        .build()
        .await?;
    let (account, _) = factory::helpers::create_patient_account(db).await?;
    let requester = Requester::Patient {
        account_id: account.id,
    };
    let service = BookingService::new(db);

    assert!(matches!(
        service.create(requester, full.id).await,
        Err(AppError::BookingErr(BookingError::SlotFull(_)))
    ));
    assert!(matches!(
        service.create(requester, inactive.id).await,
        Err(AppError::BookingErr(BookingError::SlotInactive(_)))
    ));
    assert!(matches!(
        service.create(requester, 9999).await,
        Err(AppError::BookingErr(BookingError::SlotNotFound(9999)))
    ));

    assert_eq!(booked_seats(db, full.id).await?, 2);
    assert_eq!(booked_seats(db, inactive.id).await?, 0);

    Ok(())
}

/// Tests an admin booking on behalf of a patient.
///
/// Expected: booking for the named patient, recorded as made by the admin
#[tokio::test]
async fn admin_books_for_named_patient() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let admin = factory::account::AccountFactory::new(db)
        .role(AccountRole::Admin)
        .build()
        .await?;
    let patient = factory::create_patient(db).await?;

    let requester = Requester::from_account(&admin, Some(patient.id))?;
    let booking = BookingService::new(db).create(requester, slot.id).await?;

    assert_eq!(booking.account_id, admin.id);
    assert_eq!(booking.patient_id, patient.id);
    assert_eq!(booking.token_number, 1);

    Ok(())
}

/// Tests an admin naming a patient that does not exist.
///
/// Expected: Err(PatientNotFound) and no seat claimed
#[tokio::test]
async fn admin_with_unknown_patient_claims_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let admin = factory::create_admin(db).await?;

    let result = BookingService::new(db)
        .create(
            Requester::Admin {
                account_id: admin.id,
                patient_id: 31337,
            },
            slot.id,
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::BookingErr(BookingError::PatientNotFound(31337)))
    ));
    assert_eq!(booked_seats(db, slot.id).await?, 0);

    Ok(())
}

/// Tests a patient account without a linked patient profile.
///
/// Expected: Err(PatientProfileMissing)
#[tokio::test]
async fn patient_without_profile_cannot_book() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;

    let result = BookingService::new(db)
        .create(
            Requester::Patient {
                account_id: account.id,
            },
            slot.id,
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::BookingErr(BookingError::PatientProfileMissing(_)))
    ));
    assert_eq!(booked_seats(db, slot.id).await?, 0);

    Ok(())
}
