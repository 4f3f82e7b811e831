use serde_json::Value;

use crate::email::templates;
use crate::error::AppError;
use crate::models::Submission;
use crate::state::AppState;

use super::fields;

/// What happened to the email alert for a stored submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotificationOutcome {
    Sent,
    Failed,
    /// No recipient address is configured.
    Skipped,
}

impl NotificationOutcome {
    pub fn email_sent(self) -> bool {
        self == NotificationOutcome::Sent
    }

    pub fn message(self) -> &'static str {
        match self {
            NotificationOutcome::Sent => "Message saved & email sent successfully!",
            NotificationOutcome::Failed => {
                "Message saved successfully! (Email could not be sent from server.)"
            }
            NotificationOutcome::Skipped => {
                "Message saved successfully! (Email notifications are not configured.)"
            }
        }
    }
}

pub struct PipelineResult {
    pub submission: Submission,
    pub notification: NotificationOutcome,
}

/// Validate, store, then try to send the email alert.
///
/// Once the store accepts the record this never fails: a notification
/// error only changes `notification`.
pub async fn run(state: &AppState, raw_data: Value) -> Result<PipelineResult, AppError> {
    let new = fields::validate(&raw_data).map_err(AppError::Validation)?;

    tracing::info!("Incoming contact from {} <{}>", new.name, new.email);

    let submission = state.store.create(&new).await?;

    tracing::info!("Contact saved with id {}", submission.id);

    let notification = notify(state, &submission).await;

    Ok(PipelineResult {
        submission,
        notification,
    })
}

async fn notify(state: &AppState, submission: &Submission) -> NotificationOutcome {
    let recipients = &state.config.recipients;
    if recipients.is_empty() {
        tracing::warn!("No EMAIL_TO / EMAIL_USER configured, skipping email");
        return NotificationOutcome::Skipped;
    }

    let Some(notifier) = state.notifier.as_ref() else {
        tracing::warn!("No mail transport configured, email for {} not sent", submission.id);
        return NotificationOutcome::Failed;
    };

    let body = match templates::render_contact_notification(submission) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to render notification for {}: {e}", submission.id);
            return NotificationOutcome::Failed;
        }
    };
    let subject = templates::contact_subject(submission);

    match notifier.send(recipients, &subject, &body).await {
        Ok(delivery) => {
            tracing::info!(
                "Email sent to {} recipient(s) for {}: {}",
                recipients.len(),
                submission.id,
                delivery.response
            );
            NotificationOutcome::Sent
        }
        Err(e) => {
            tracing::error!("Email send failed for {}: {e}", submission.id);
            NotificationOutcome::Failed
        }
    }
}
