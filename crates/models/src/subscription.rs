use sea_orm::{entity::prelude::*, Set, NotSet};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::month_year::MonthYear;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub service_name: String,
    pub price: i32,
    /// First day of the subscribed month.
    pub start_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn start_month(&self) -> MonthYear {
        MonthYear::from_date(self.start_date)
    }
}

/// Active model for a new row; `id` is left to the sequence.
pub fn new_active(user_id: Uuid, service_name: &str, price: i32, start: MonthYear) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        service_name: Set(service_name.to_string()),
        price: Set(price),
        start_date: Set(start.first_day()),
    }
}
