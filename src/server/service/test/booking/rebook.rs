use super::*;

/// Tests booking a slot after an earlier token was cancelled.
///
/// Three patients hold T-01 to T-03 on a 07:00-07:40 slot with 20 seats. T-01 is
/// cancelled, so the seat count drops back to 2 and the next claim produces 3, which T-03
/// still holds. The new patient must get the freed T-01 window instead of a second T-03.
///
/// Expected: fourth booking is T-01 at 07:00-07:02; live tokens are exactly 1, 2, 3
#[tokio::test]
async fn reuses_cancelled_token_instead_of_live_one() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .with_statement(migration::CREATE_ACTIVE_TOKEN_INDEX)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::slot::SlotFactory::new(db)
        .times("07:00", "07:40")
        .max_seats(20)
        .build()
        .await?;

    let service = BookingService::new(db);
    let mut accounts = Vec::new();
    let mut bookings = Vec::new();
    for _ in 0..3 {
        let (account, _) = factory::helpers::create_patient_account(db).await?;
        let booking = service
            .create(
                Requester::Patient {
                    account_id: account.id,
                },
                slot.id,
            )
            .await?;
        accounts.push(account);
        bookings.push(booking);
    }

    CancellationService::new(db)
        .cancel(CancelBookingParams::from_account(&accounts[0], bookings[0].id))
        .await?;
    assert_eq!(booked_seats(db, slot.id).await?, 2);

    let (fourth_account, _) = factory::helpers::create_patient_account(db).await?;
    let fourth = service
        .create(
            Requester::Patient {
                account_id: fourth_account.id,
            },
            slot.id,
        )
        .await?;

    assert_eq!(fourth.token_number, 1);
    assert_eq!(fourth.token_id, "T-01");
    assert_eq!(fourth.appointment_time, "07:00");
    assert_eq!(fourth.appointment_end_time, "07:02");
    assert_ne!(fourth.token_number, bookings[2].token_number);
    assert_eq!(booked_seats(db, slot.id).await?, 3);

    let mut live: Vec<i32> = BookingRepository::new(db)
        .live_token_numbers(slot.id)
        .await?;
    live.sort_unstable();
    assert_eq!(live, vec![1, 2, 3]);

    Ok(())
}

/// Tests that a booking after the freed token is refilled continues from the counter.
///
/// Expected: T-01 refilled first, then T-04
#[tokio::test]
async fn continues_from_counter_once_gaps_are_filled() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .with_statement(migration::CREATE_ACTIVE_TOKEN_INDEX)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = factory::slot::SlotFactory::new(db)
        .max_seats(10)
        .build()
        .await?;

    let service = BookingService::new(db);
    let (first_account, _) = factory::helpers::create_patient_account(db).await?;
    let first = service
        .create(
            Requester::Patient {
                account_id: first_account.id,
            },
            slot.id,
        )
        .await?;
    for _ in 0..2 {
        let (account, _) = factory::helpers::create_patient_account(db).await?;
        service
            .create(
                Requester::Patient {
                    account_id: account.id,
                },
                slot.id,
            )
            .await?;
    }

    CancellationService::new(db)
        .cancel(CancelBookingParams::from_account(&first_account, first.id))
        .await?;

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let (account, _) = factory::helpers::create_patient_account(db).await?;
        let booking = service
            .create(
                Requester::Patient {
                    account_id: account.id,
                },
                slot.id,
            )
            .await?;
        tokens.push(booking.token_number);
    }

    assert_eq!(tokens, vec![1, 4]);
    assert_eq!(booked_seats(db, slot.id).await?, 4);

    Ok(())
}
