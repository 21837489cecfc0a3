use super::*;

/// Tests the compensating release when the booking insert fails.
///
/// The patient passed in does not exist, so the seat claim succeeds but the booking
/// insert violates the patient foreign key. The claimed seat must be returned.
///
/// Expected: Err(AppError::DbErr) and booked_seats back at 0
#[tokio::test]
async fn releases_seat_when_insert_fails() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let account = factory::create_account(db).await?;
    let ghost = entity::patient::Model {
        id: 777_777,
        account_id: None,
        name: "Nobody".to_string(),
        email: None,
        phone: None,
        age: None,
        gender: None,
        created_at: Utc::now(),
    };

    let result = BookingService::new(db)
        .reserve(account.id, &ghost, slot.id, None)
        .await;

    match result {
        Err(AppError::DbErr(_)) => {}
        other => panic!("Expected database error, got: {:?}", other),
    }
    assert_eq!(booked_seats(db, slot.id).await?, 0);

    Ok(())
}

/// Tests the same patient booking one slot twice at once.
///
/// Both requests can pass the active-booking check before either insert lands. The
/// unique index then rejects the second insert, which must surface as a duplicate and
/// give its claimed seat back.
///
/// Expected: one T-01 booking, one Err(DuplicateBooking), booked_seats 1
#[tokio::test]
async fn concurrent_duplicate_releases_its_seat() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .with_statement(migration::CREATE_ACTIVE_TOKEN_INDEX)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::create_slot(db).await?;
    let (account, patient) = factory::helpers::create_patient_account(db).await?;

    let service = BookingService::new(db);
    let requester = Requester::Patient {
        account_id: account.id,
    };
    let (first, second) = tokio::join!(
        service.create(requester, slot.id),
        service.create(requester, slot.id)
    );

    let (booked, rejected) = match (first, second) {
        (Ok(booking), Err(err)) | (Err(err), Ok(booking)) => (booking, err),
        other => panic!("Expected one booking and one rejection, got: {:?}", other),
    };

    assert_eq!(booked.token_id, "T-01");
    match rejected {
        AppError::BookingErr(BookingError::DuplicateBooking {
            patient_id,
            slot_id,
        }) => {
            assert_eq!(patient_id, patient.id);
            assert_eq!(slot_id, slot.id);
        }
        other => panic!("Expected DuplicateBooking error, got: {:?}", other),
    }
    assert_eq!(booked_seats(db, slot.id).await?, 1);

    Ok(())
}
