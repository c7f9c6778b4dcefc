use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, OnConflict},
};

use campus_attendance_schema::{
    accounts, makeup_attendance, makeup_classes, profiles, remedial_codes,
};
use campus_domain::id::{AccountId, ClassId, CodeId};
use campus_domain::pagination::PageRequest;
use campus_domain::role::{Role, RoleKind};

use crate::domain::repository::{
    AccountRepository, AttendanceRepository, ClassRepository, RemedialCodeRepository,
};
use crate::domain::types::{
    Account, AccountUpdate, Attendance, ClassDetails, ClassStatus, MakeUpClass, MarkOutcome,
    Profile, RemedialCode, RotateOutcome,
};
use crate::error::AttendanceServiceError;

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

impl AccountRepository for DbAccountRepository {
    async fn create(
        &self,
        account: &Account,
        profile: &Profile,
    ) -> Result<bool, AttendanceServiceError> {
        let account = account.clone();
        let profile = profile.clone();
        let created = self
            .db
            .transaction::<_, bool, DbErr>(move |txn| {
                Box::pin(async move {
                    let inserted = accounts::Entity::insert(account_to_active(&account))
                        .on_conflict(
                            OnConflict::column(accounts::Column::Username)
                                .do_nothing()
                                .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    if inserted == 0 {
                        return Ok(false);
                    }
                    profiles::Entity::insert(profile_to_active(&profile))
                        .exec_without_returning(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("create account with profile")?;
        Ok(created)
    }

    async fn find(
        &self,
        id: AccountId,
    ) -> Result<Option<(Account, Profile)>, AttendanceServiceError> {
        let row = accounts::Entity::find_by_id(id.0)
            .find_also_related(profiles::Entity)
            .one(&self.db)
            .await
            .context("find account with profile")?;
        match row {
            Some((account, Some(profile))) => Ok(Some((
                account_from_model(account),
                profile_from_model(profile)?,
            ))),
            _ => Ok(None),
        }
    }

    async fn find_profile(&self, id: AccountId) -> Result<Option<Profile>, AttendanceServiceError> {
        let model = profiles::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find profile")?;
        model.map(profile_from_model).transpose()
    }

    async fn update(
        &self,
        id: AccountId,
        update: &AccountUpdate,
    ) -> Result<(), AttendanceServiceError> {
        let update = update.clone();
        self.db
            .transaction::<_, (), DbErr>(move |txn| {
                Box::pin(async move {
                    if update.first_name.is_some()
                        || update.last_name.is_some()
                        || update.email.is_some()
                    {
                        let mut am = accounts::ActiveModel {
                            id: Set(id.0),
                            ..Default::default()
                        };
                        if let Some(first_name) = update.first_name {
                            am.first_name = Set(first_name);
                        }
                        if let Some(last_name) = update.last_name {
                            am.last_name = Set(last_name);
                        }
                        if let Some(email) = update.email {
                            am.email = Set(email);
                        }
                        am.update(txn).await?;
                    }
                    if let Some(department) = update.department {
                        profiles::ActiveModel {
                            account_id: Set(id.0),
                            department: Set(department),
                            ..Default::default()
                        }
                        .update(txn)
                        .await?;
                    }
                    Ok(())
                })
            })
            .await
            .context("update account")?;
        Ok(())
    }
}

fn account_to_active(account: &Account) -> accounts::ActiveModel {
    accounts::ActiveModel {
        id: Set(account.id.0),
        username: Set(account.username.clone()),
        first_name: Set(account.first_name.clone()),
        last_name: Set(account.last_name.clone()),
        email: Set(account.email.clone()),
        created_at: Set(account.created_at),
    }
}

fn account_from_model(model: accounts::Model) -> Account {
    Account {
        id: model.id.into(),
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        created_at: model.created_at,
    }
}

fn profile_to_active(profile: &Profile) -> profiles::ActiveModel {
    profiles::ActiveModel {
        account_id: Set(profile.account_id.0),
        role: Set(profile.role.kind().as_str().to_owned()),
        registration_number: Set(profile.role.registration_number().map(str::to_owned)),
        department: Set(profile.department.clone()),
    }
}

fn profile_from_model(model: profiles::Model) -> Result<Profile, AttendanceServiceError> {
    let kind = model
        .role
        .parse::<RoleKind>()
        .with_context(|| format!("decode role of profile {}", model.account_id))?;
    let role = Role::from_parts(kind, model.registration_number.as_deref())
        .with_context(|| format!("decode role of profile {}", model.account_id))?;
    Ok(Profile {
        account_id: model.account_id.into(),
        role,
        department: model.department,
    })
}

// ── Class repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbClassRepository {
    pub db: DatabaseConnection,
}

impl ClassRepository for DbClassRepository {
    async fn create(&self, class: &MakeUpClass) -> Result<(), AttendanceServiceError> {
        let d = &class.details;
        makeup_classes::ActiveModel {
            id: Set(class.id.0),
            faculty_id: Set(class.faculty_id.0),
            subject: Set(d.subject.clone()),
            topic: Set(d.topic.clone()),
            date: Set(d.date),
            start_time: Set(d.start_time),
            end_time: Set(d.end_time),
            venue: Set(d.venue.clone()),
            status: Set(class.status.as_str().to_owned()),
            description: Set(d.description.clone()),
            created_at: Set(class.created_at),
        }
        .insert(&self.db)
        .await
        .context("create makeup class")?;
        Ok(())
    }

    async fn find_by_id(&self, id: ClassId) -> Result<Option<MakeUpClass>, AttendanceServiceError> {
        let model = makeup_classes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find makeup class by id")?;
        model.map(class_from_model).transpose()
    }

    async fn update_details(
        &self,
        id: ClassId,
        details: &ClassDetails,
    ) -> Result<(), AttendanceServiceError> {
        makeup_classes::ActiveModel {
            id: Set(id.0),
            subject: Set(details.subject.clone()),
            topic: Set(details.topic.clone()),
            date: Set(details.date),
            start_time: Set(details.start_time),
            end_time: Set(details.end_time),
            venue: Set(details.venue.clone()),
            description: Set(details.description.clone()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update makeup class details")?;
        Ok(())
    }

    async fn set_status(
        &self,
        id: ClassId,
        from: ClassStatus,
        to: ClassStatus,
        deactivate_codes: bool,
    ) -> Result<bool, AttendanceServiceError> {
        let changed = self
            .db
            .transaction::<_, bool, DbErr>(move |txn| {
                Box::pin(async move {
                    let current = makeup_classes::Entity::find_by_id(id.0)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    match current {
                        Some(class) if class.status == from.as_str() => {}
                        _ => return Ok(false),
                    }
                    makeup_classes::ActiveModel {
                        id: Set(id.0),
                        status: Set(to.as_str().to_owned()),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    if deactivate_codes {
                        deactivate_active_codes(txn, id).await?;
                    }
                    Ok(true)
                })
            })
            .await
            .context("set makeup class status")?;
        Ok(changed)
    }

    async fn delete(&self, id: ClassId) -> Result<bool, AttendanceServiceError> {
        let result = makeup_classes::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete makeup class")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_faculty(
        &self,
        faculty_id: AccountId,
        page: PageRequest,
    ) -> Result<Vec<MakeUpClass>, AttendanceServiceError> {
        let models = makeup_classes::Entity::find()
            .filter(makeup_classes::Column::FacultyId.eq(faculty_id.0))
            .order_by_desc(makeup_classes::Column::Date)
            .order_by_desc(makeup_classes::Column::StartTime)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list makeup classes by faculty")?;
        models.into_iter().map(class_from_model).collect()
    }

    async fn count_by_faculty(&self, faculty_id: AccountId) -> Result<u64, AttendanceServiceError> {
        let count = makeup_classes::Entity::find()
            .filter(makeup_classes::Column::FacultyId.eq(faculty_id.0))
            .count(&self.db)
            .await
            .context("count makeup classes by faculty")?;
        Ok(count)
    }
}

fn class_from_model(model: makeup_classes::Model) -> Result<MakeUpClass, AttendanceServiceError> {
    let status = model.status.parse::<ClassStatus>().map_err(|_| {
        anyhow::anyhow!("unknown status {:?} on makeup class {}", model.status, model.id)
    })?;
    Ok(MakeUpClass {
        id: model.id.into(),
        faculty_id: model.faculty_id.into(),
        details: ClassDetails {
            subject: model.subject,
            topic: model.topic,
            date: model.date,
            start_time: model.start_time,
            end_time: model.end_time,
            venue: model.venue,
            description: model.description,
        },
        status,
        created_at: model.created_at,
    })
}

// ── Remedial code repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRemedialCodeRepository {
    pub db: DatabaseConnection,
}

impl RemedialCodeRepository for DbRemedialCodeRepository {
    async fn rotate(&self, code: &RemedialCode) -> Result<RotateOutcome, AttendanceServiceError> {
        let code = code.clone();
        let outcome = self
            .db
            .transaction::<_, RotateOutcome, DbErr>(move |txn| {
                Box::pin(async move {
                    // Serializes with concurrent issuance and status changes.
                    let class = makeup_classes::Entity::find_by_id(code.class_id.0)
                        .lock_exclusive()
                        .one(txn)
                        .await?;
                    let open = class
                        .and_then(|c| c.status.parse::<ClassStatus>().ok())
                        .is_some_and(|status| !status.is_terminal());
                    if !open {
                        return Ok(RotateOutcome::ClassClosed);
                    }

                    // Stored inactive first so the one-active-per-class index
                    // holds at every step.
                    let mut row = code_to_active(&code);
                    row.is_active = Set(false);
                    let inserted = remedial_codes::Entity::insert(row)
                        .on_conflict(
                            OnConflict::column(remedial_codes::Column::Code)
                                .do_nothing()
                                .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    if inserted == 0 {
                        return Ok(RotateOutcome::CodeTaken);
                    }

                    deactivate_active_codes(txn, code.class_id).await?;
                    remedial_codes::ActiveModel {
                        id: Set(code.id.0),
                        is_active: Set(code.is_active),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    Ok(RotateOutcome::Issued)
                })
            })
            .await
            .context("rotate remedial code")?;
        Ok(outcome)
    }

    async fn deactivate_for_class(&self, class_id: ClassId) -> Result<u64, AttendanceServiceError> {
        let rows = self
            .db
            .transaction::<_, u64, DbErr>(move |txn| {
                Box::pin(async move { deactivate_active_codes(txn, class_id).await })
            })
            .await
            .context("deactivate remedial codes")?;
        Ok(rows)
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        let model = remedial_codes::Entity::find()
            .filter(remedial_codes::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find remedial code by string")?;
        Ok(model.map(code_from_model))
    }

    async fn find_by_id(&self, id: CodeId) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        let model = remedial_codes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find remedial code by id")?;
        Ok(model.map(code_from_model))
    }

    async fn find_active_for_class(
        &self,
        class_id: ClassId,
    ) -> Result<Option<RemedialCode>, AttendanceServiceError> {
        let model = remedial_codes::Entity::find()
            .filter(remedial_codes::Column::MakeupClassId.eq(class_id.0))
            .filter(remedial_codes::Column::IsActive.eq(true))
            .order_by_desc(remedial_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find active remedial code for class")?;
        Ok(model.map(code_from_model))
    }

    async fn list_active_by_creator(
        &self,
        faculty_id: AccountId,
    ) -> Result<Vec<(RemedialCode, MakeUpClass)>, AttendanceServiceError> {
        let rows = remedial_codes::Entity::find()
            .filter(remedial_codes::Column::CreatedBy.eq(faculty_id.0))
            .filter(remedial_codes::Column::IsActive.eq(true))
            .find_also_related(makeup_classes::Entity)
            .order_by_desc(remedial_codes::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list active remedial codes by creator")?;
        rows.into_iter()
            .filter_map(|(code, class)| class.map(|class| (code, class)))
            .map(|(code, class)| Ok((code_from_model(code), class_from_model(class)?)))
            .collect()
    }
}

/// Switch off every active code of `class_id`.
async fn deactivate_active_codes(
    txn: &DatabaseTransaction,
    class_id: ClassId,
) -> Result<u64, DbErr> {
    let result = remedial_codes::Entity::update_many()
        .col_expr(remedial_codes::Column::IsActive, Expr::value(false))
        .filter(remedial_codes::Column::MakeupClassId.eq(class_id.0))
        .filter(remedial_codes::Column::IsActive.eq(true))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

fn code_to_active(code: &RemedialCode) -> remedial_codes::ActiveModel {
    remedial_codes::ActiveModel {
        id: Set(code.id.0),
        makeup_class_id: Set(code.class_id.0),
        code: Set(code.code.clone()),
        created_by: Set(code.created_by.0),
        created_at: Set(code.created_at),
        expires_at: Set(code.expires_at),
        is_active: Set(code.is_active),
    }
}

fn code_from_model(model: remedial_codes::Model) -> RemedialCode {
    RemedialCode {
        id: model.id.into(),
        class_id: model.makeup_class_id.into(),
        code: model.code,
        created_by: model.created_by.into(),
        created_at: model.created_at,
        expires_at: model.expires_at,
        is_active: model.is_active,
    }
}

// ── Attendance repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn exists(
        &self,
        student_id: AccountId,
        class_id: ClassId,
    ) -> Result<bool, AttendanceServiceError> {
        let count = makeup_attendance::Entity::find()
            .filter(makeup_attendance::Column::StudentId.eq(student_id.0))
            .filter(makeup_attendance::Column::MakeupClassId.eq(class_id.0))
            .count(&self.db)
            .await
            .context("check attendance exists")?;
        Ok(count > 0)
    }

    async fn create(&self, record: &Attendance) -> Result<MarkOutcome, AttendanceServiceError> {
        let record = record.clone();
        let outcome = self
            .db
            .transaction::<_, MarkOutcome, DbErr>(move |txn| {
                Box::pin(async move {
                    // FOR SHARE holds off deactivation of the code until commit.
                    if let Some(code_id) = record.remedial_code_id {
                        let code = remedial_codes::Entity::find_by_id(code_id.0)
                            .lock_shared()
                            .one(txn)
                            .await?
                            .map(code_from_model);
                        if !code.is_some_and(|c| c.is_valid_at(record.marked_at)) {
                            return Ok(MarkOutcome::CodeNoLongerValid);
                        }
                    }

                    let inserted =
                        makeup_attendance::Entity::insert(makeup_attendance::ActiveModel {
                            id: Set(record.id.0),
                            student_id: Set(record.student_id.0),
                            makeup_class_id: Set(record.class_id.0),
                            remedial_code_id: Set(record.remedial_code_id.map(|id| id.0)),
                            marked_at: Set(record.marked_at),
                            is_present: Set(record.is_present),
                        })
                        .on_conflict(
                            OnConflict::columns([
                                makeup_attendance::Column::StudentId,
                                makeup_attendance::Column::MakeupClassId,
                            ])
                            .do_nothing()
                            .to_owned(),
                        )
                        .exec_without_returning(txn)
                        .await?;
                    Ok(if inserted > 0 {
                        MarkOutcome::Marked
                    } else {
                        MarkOutcome::AlreadyMarked
                    })
                })
            })
            .await
            .context("insert attendance")?;
        Ok(outcome)
    }

    async fn list_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<Vec<(Attendance, Account)>, AttendanceServiceError> {
        let rows = makeup_attendance::Entity::find()
            .filter(makeup_attendance::Column::MakeupClassId.eq(class_id.0))
            .find_also_related(accounts::Entity)
            .order_by_desc(makeup_attendance::Column::MarkedAt)
            .all(&self.db)
            .await
            .context("list attendance by class")?;
        Ok(rows
            .into_iter()
            .filter_map(|(record, student)| {
                student.map(|s| (attendance_from_model(record), account_from_model(s)))
            })
            .collect())
    }

    async fn list_by_student(
        &self,
        student_id: AccountId,
        present_only: bool,
        page: PageRequest,
    ) -> Result<Vec<(Attendance, MakeUpClass)>, AttendanceServiceError> {
        let mut query = makeup_attendance::Entity::find()
            .filter(makeup_attendance::Column::StudentId.eq(student_id.0));
        if present_only {
            query = query.filter(makeup_attendance::Column::IsPresent.eq(true));
        }
        let rows = query
            .find_also_related(makeup_classes::Entity)
            .order_by_desc(makeup_attendance::Column::MarkedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list attendance by student")?;
        rows.into_iter()
            .filter_map(|(record, class)| class.map(|class| (record, class)))
            .map(|(record, class)| Ok((attendance_from_model(record), class_from_model(class)?)))
            .collect()
    }

    async fn count_present_by_student(
        &self,
        student_id: AccountId,
    ) -> Result<u64, AttendanceServiceError> {
        let count = makeup_attendance::Entity::find()
            .filter(makeup_attendance::Column::StudentId.eq(student_id.0))
            .filter(makeup_attendance::Column::IsPresent.eq(true))
            .count(&self.db)
            .await
            .context("count present attendance by student")?;
        Ok(count)
    }

    async fn count_present_by_class(
        &self,
        class_id: ClassId,
    ) -> Result<u64, AttendanceServiceError> {
        let count = makeup_attendance::Entity::find()
            .filter(makeup_attendance::Column::MakeupClassId.eq(class_id.0))
            .filter(makeup_attendance::Column::IsPresent.eq(true))
            .count(&self.db)
            .await
            .context("count present attendance by class")?;
        Ok(count)
    }
}

fn attendance_from_model(model: makeup_attendance::Model) -> Attendance {
    Attendance {
        id: model.id.into(),
        student_id: model.student_id.into(),
        class_id: model.makeup_class_id.into(),
        remedial_code_id: model.remedial_code_id.map(CodeId::from),
        marked_at: model.marked_at,
        is_present: model.is_present,
    }
}
