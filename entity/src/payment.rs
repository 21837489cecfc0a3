use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{PaymentStatus, RefundStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub slot_id: i32,
    pub booking_id: Option<i32>,
    pub amount: i64,
    pub currency: String,
    #[sea_orm(unique)]
    pub order_id: String,
    pub gateway_payment_id: Option<String>,
    pub signature: Option<String>,
    pub status: PaymentStatus,
    pub refund_status: RefundStatus,
    pub refund_id: Option<String>,
    pub refund_amount: Option<i64>,
    pub paid_at: Option<DateTimeUtc>,
    pub refunded_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::slot::Entity",
        from = "Column::SlotId",
        to = "super::slot::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Slot,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
