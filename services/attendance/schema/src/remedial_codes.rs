use sea_orm::entity::prelude::*;

/// Time-boxed attendance code for one make-up class.
/// `code` is globally unique; at most one row per class has `is_active`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "remedial_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub makeup_class_id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub created_by: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::makeup_classes::Entity",
        from = "Column::MakeupClassId",
        to = "super::makeup_classes::Column::Id",
        on_delete = "Cascade"
    )]
    MakeupClass,
}

impl Related<super::makeup_classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MakeupClass.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
