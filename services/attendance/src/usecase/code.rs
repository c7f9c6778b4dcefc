use tracing::{info, warn};

use campus_domain::id::{AccountId, ClassId, CodeId};

use crate::domain::repository::{
    AccountRepository, ClassRepository, Clock, CodeGenerator, RemedialCodeRepository,
};
use crate::domain::types::{
    CodeDuration, CodeStatus, MAX_CODE_ATTEMPTS, RemedialCode, RotateOutcome,
};
use crate::error::AttendanceServiceError;
use crate::usecase::require_owned_class;

// ── IssueCode ────────────────────────────────────────────────────────────────

pub struct IssueCodeUseCase<A, C, R, G, K>
where
    A: AccountRepository,
    C: ClassRepository,
    R: RemedialCodeRepository,
    G: CodeGenerator,
    K: Clock,
{
    pub accounts: A,
    pub classes: C,
    pub codes: R,
    pub generator: G,
    pub clock: K,
}

impl<A, C, R, G, K> IssueCodeUseCase<A, C, R, G, K>
where
    A: AccountRepository,
    C: ClassRepository,
    R: RemedialCodeRepository,
    G: CodeGenerator,
    K: Clock,
{
    /// Issue a fresh code for the class, replacing any active one.
    /// `duration_minutes` defaults to 30.
    pub async fn execute(
        &self,
        actor: AccountId,
        class_id: ClassId,
        duration_minutes: Option<u32>,
    ) -> Result<RemedialCode, AttendanceServiceError> {
        let class = require_owned_class(&self.accounts, &self.classes, actor, class_id).await?;
        let duration = match duration_minutes {
            Some(minutes) => {
                CodeDuration::from_minutes(minutes).ok_or(AttendanceServiceError::InvalidDuration)?
            }
            None => CodeDuration::default(),
        };
        if class.status.is_terminal() {
            return Err(AttendanceServiceError::ClassClosed);
        }

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let now = self.clock.now();
            let code = RemedialCode {
                id: CodeId::generate(),
                class_id,
                code: self.generator.generate(),
                created_by: actor,
                created_at: now,
                expires_at: now + duration.as_duration(),
                is_active: true,
            };
            match self.codes.rotate(&code).await? {
                RotateOutcome::Issued => {
                    info!(
                        class_id = %class_id,
                        code_id = %code.id,
                        minutes = duration.minutes(),
                        "remedial code issued"
                    );
                    return Ok(code);
                }
                RotateOutcome::CodeTaken => {
                    warn!(class_id = %class_id, attempt, "remedial code collision, retrying");
                }
                RotateOutcome::ClassClosed => return Err(AttendanceServiceError::ClassClosed),
            }
        }
        Err(AttendanceServiceError::CodeGenerationExhausted)
    }
}

// ── DeactivateCode ───────────────────────────────────────────────────────────

pub struct DeactivateCodeUseCase<A, C, R>
where
    A: AccountRepository,
    C: ClassRepository,
    R: RemedialCodeRepository,
{
    pub accounts: A,
    pub classes: C,
    pub codes: R,
}

impl<A, C, R> DeactivateCodeUseCase<A, C, R>
where
    A: AccountRepository,
    C: ClassRepository,
    R: RemedialCodeRepository,
{
    /// Idempotent: succeeds even when nothing is active.
    pub async fn execute(
        &self,
        actor: AccountId,
        class_id: ClassId,
    ) -> Result<(), AttendanceServiceError> {
        require_owned_class(&self.accounts, &self.classes, actor, class_id).await?;
        let deactivated = self.codes.deactivate_for_class(class_id).await?;
        if deactivated > 0 {
            info!(class_id = %class_id, deactivated, "remedial codes deactivated");
        }
        Ok(())
    }
}

// ── CodeStatus ───────────────────────────────────────────────────────────────

pub struct CodeStatusUseCase<R: RemedialCodeRepository, K: Clock> {
    pub codes: R,
    pub clock: K,
}

impl<R: RemedialCodeRepository, K: Clock> CodeStatusUseCase<R, K> {
    /// `None` when no such code exists.
    pub async fn execute(&self, code_id: CodeId) -> Result<Option<CodeStatus>, AttendanceServiceError> {
        let now = self.clock.now();
        Ok(self
            .codes
            .find_by_id(code_id)
            .await?
            .map(|code| code.status_at(now)))
    }
}
