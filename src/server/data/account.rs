use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

pub struct AccountRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AccountRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an account by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::account::Model>, DbErr> {
        entity::prelude::Account::find_by_id(id).one(self.db).await
    }
}
