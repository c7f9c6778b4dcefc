use sea_orm::entity::prelude::*;

/// A remedial session scheduled by a faculty member.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "makeup_classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub faculty_id: Uuid,
    pub subject: String,
    pub topic: String,
    pub date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub venue: String,
    /// One of `upcoming`, `active`, `completed`, `cancelled`.
    pub status: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::FacultyId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    Faculty,
    #[sea_orm(has_many = "super::remedial_codes::Entity")]
    RemedialCodes,
    #[sea_orm(has_many = "super::makeup_attendance::Entity")]
    Attendance,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl Related<super::remedial_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RemedialCodes.def()
    }
}

impl Related<super::makeup_attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
