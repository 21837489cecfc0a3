use super::*;

/// Tests creating a slot through the service.
///
/// Expected: Ok(Slot) with every seat available
#[tokio::test]
async fn creates_slot() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Slot)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let slot = SlotService::new(db)
        .create(params(4, "07:00", "07:40"))
        .await?;

    assert_eq!(slot.available_seats(), 20);
    assert_eq!(slot.minutes_per_patient(), 2);
    assert!(!slot.is_full());

    let available = SlotService::new(db).get_available().await?;
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, slot.id);

    Ok(())
}

/// Tests creating a second slot over the same date and time range.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_duplicate_range() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Slot)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let service = SlotService::new(db);
    service.create(params(4, "07:00", "07:40")).await?;

    let result = service.create(params(4, "07:00", "07:40")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    service.create(params(4, "07:40", "08:20")).await?;

    Ok(())
}
