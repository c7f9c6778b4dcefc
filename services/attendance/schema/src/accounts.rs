use sea_orm::entity::prelude::*;

/// Campus account. Credentials live with the upstream identity provider.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profiles::Entity")]
    Profile,
    #[sea_orm(has_many = "super::makeup_classes::Entity")]
    MakeupClasses,
    #[sea_orm(has_many = "super::makeup_attendance::Entity")]
    MakeupAttendance,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::makeup_classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MakeupClasses.def()
    }
}

impl Related<super::makeup_attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MakeupAttendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
