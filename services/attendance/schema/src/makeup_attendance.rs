use sea_orm::entity::prelude::*;

/// A student's attendance at a make-up class. Unique on (student, class).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "makeup_attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub makeup_class_id: Uuid,
    pub remedial_code_id: Option<Uuid>,
    pub marked_at: chrono::DateTime<chrono::Utc>,
    pub is_present: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::StudentId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::makeup_classes::Entity",
        from = "Column::MakeupClassId",
        to = "super::makeup_classes::Column::Id",
        on_delete = "Cascade"
    )]
    MakeupClass,
    #[sea_orm(
        belongs_to = "super::remedial_codes::Entity",
        from = "Column::RemedialCodeId",
        to = "super::remedial_codes::Column::Id",
        on_delete = "SetNull"
    )]
    RemedialCode,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::makeup_classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MakeupClass.def()
    }
}

impl Related<super::remedial_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RemedialCode.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
