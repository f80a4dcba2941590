// qualis-core/src/application/evaluation.rs

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::domain::compliance::{Assessment, ComplianceEngine, RecomputePolicy};
use crate::domain::error::DomainError;
use crate::domain::ports::CriterionStore;
use crate::domain::record::{Record, RecordAction, RecordStatus};
use crate::error::QualisError;
use crate::ports::repository::RecordRepository;

/// Everything a record use case needs, passed explicitly on each call.
#[derive(Clone, Copy)]
pub struct RecordContext<'a> {
    pub repo: &'a dyn RecordRepository,
    pub store: &'a dyn CriterionStore,
    pub engine: &'a ComplianceEngine,
    pub recompute: RecomputePolicy,
}

/// Stores a new draft record. Its values are evaluated right away under `on_edit`.
/// Records only enter later states through `transition_record`.
#[instrument(skip(ctx, record), fields(number = %record.number))]
pub async fn import_record(ctx: RecordContext<'_>, mut record: Record) -> Result<Record, QualisError> {
    if record.status != RecordStatus::Draft {
        return Err(DomainError::InvalidTransition {
            from: record.status.to_string(),
            action: "import".to_string(),
        }
        .into());
    }
    // Derived fields are always recomputed from the raw values, never imported.
    record.assessment = None;
    record.evaluated_at = None;
    ctx.repo.create_record(&record).await?;
    info!(values = record.values.len(), status = %record.status, "Record imported");

    if ctx.recompute == RecomputePolicy::OnEdit {
        evaluate_record(ctx, &record.number).await?;
    }
    ctx.repo.load_record(&record.number).await
}

/// Recomputes every item of a record and persists items, summary and errors together.
#[instrument(skip(ctx))]
pub async fn evaluate_record(ctx: RecordContext<'_>, number: &str) -> Result<Assessment, QualisError> {
    let record = ctx.repo.load_record(number).await?;
    record.ensure_editable()?;

    let assessment = ctx.engine.assess(ctx.store, &record.values);
    ctx.repo
        .save_assessment(number, &assessment, Utc::now())
        .await?;

    info!(
        score = ?assessment.summary.compliance_score,
        failed = assessment.summary.failed_items_count,
        errors = assessment.errors.len(),
        "Record evaluated"
    );
    Ok(assessment)
}

/// Enters or corrects one raw value. Returns the new assessment when the
/// policy recomputes on edit, `None` when evaluation waits for submission.
#[instrument(skip(ctx, value))]
pub async fn update_item(
    ctx: RecordContext<'_>,
    number: &str,
    criterion: &str,
    value: &str,
) -> Result<Option<Assessment>, QualisError> {
    let mut record = ctx.repo.load_record(number).await?;
    record.set_value(criterion, value)?;
    ctx.repo.set_raw_value(number, criterion, value).await?;

    match ctx.recompute {
        RecomputePolicy::OnEdit => evaluate_record(ctx, number).await.map(Some),
        RecomputePolicy::OnSubmit => {
            debug!("Evaluation deferred until submission");
            Ok(None)
        }
    }
}

/// Moves a record through its lifecycle. Submitting evaluates the record first,
/// and so does any action that locks it (approve, reject).
#[instrument(skip(ctx))]
pub async fn transition_record(
    ctx: RecordContext<'_>,
    number: &str,
    action: RecordAction,
) -> Result<RecordStatus, QualisError> {
    let mut record = ctx.repo.load_record(number).await?;
    let from = record.status;
    let to = record.apply(action)?;

    let locks = from.is_editable() && !to.is_editable();
    if action == RecordAction::Submit || locks {
        evaluate_record(ctx, number).await?;
    }
    // Two writes: the assessment lands while the record is still editable,
    // so a failed status write leaves it re-evaluable in its old state.
    ctx.repo.set_status(number, to).await?;

    info!(%from, %to, "Record status changed");
    Ok(to)
}
