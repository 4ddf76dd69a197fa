//! Submission review flow
//!
//! The one place a submission write and a ledger write belong together.
//! The status transition is the idempotency guard: crediting only runs
//! when the compare-and-set actually moved the submission out of
//! pending, so a decision can never credit twice.

use tracing::{info, warn};

use crate::db::schemas::{SubmissionDoc, SubmissionStatus};
use crate::db::Stores;
use crate::types::GroveError;

/// Resolve a pending submission and, on approval, credit the
/// submitter's ledger.
///
/// A crash between the transition and the credit leaves an approved
/// submission whose points were never applied; the guarded transition
/// keeps that window from ever crediting twice.
pub async fn resolve_submission(
    stores: &Stores,
    id: &str,
    decision: SubmissionStatus,
) -> Result<SubmissionDoc, GroveError> {
    let submission = stores.submissions.resolve(id, decision).await?;

    if submission.status == SubmissionStatus::Approved {
        let stats = stores
            .ledger
            .apply_approval(&submission.user_id, submission.points)
            .await
            .map_err(|e| {
                // The transition already happened; surface the failed credit loudly
                warn!(
                    submission = %submission.id,
                    user = %submission.user_id,
                    "Approved submission could not be credited: {}",
                    e
                );
                e
            })?;

        info!(
            submission = %submission.id,
            user = %submission.user_id,
            points = submission.points,
            credits = stats.credits,
            "Submission approved and credited"
        );
    } else {
        info!(
            submission = %submission.id,
            user = %submission.user_id,
            "Submission rejected"
        );
    }

    Ok(submission)
}
