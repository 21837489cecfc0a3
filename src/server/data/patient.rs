use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

pub struct PatientRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PatientRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a patient by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::patient::Model>, DbErr> {
        entity::prelude::Patient::find_by_id(id).one(self.db).await
    }

    /// Finds the patient profile linked to an account
    pub async fn find_by_account_id(
        &self,
        account_id: i32,
    ) -> Result<Option<entity::patient::Model>, DbErr> {
        entity::prelude::Patient::find()
            .filter(entity::patient::Column::AccountId.eq(account_id))
            .one(self.db)
            .await
    }
}
