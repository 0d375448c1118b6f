//! Enrollment notification dispatch.
//!
//! The lifecycle manager hands successful create/update events to a
//! [`NotificationDispatcher`], which is a fire-and-forget channel handle: the
//! request path never waits on delivery and delivery failures never roll an
//! enrollment back. A background worker drains the channel, records a
//! notification row for the student's feed and, when email is configured,
//! sends the enrollment email best-effort.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::db::handlers::notifications::Notifications;
use crate::db::models::{
    enrollments::EnrollmentRecord, notifications::NotificationCreateDBRequest, plans::PlanRecord, students::StudentRecord,
};
use crate::email::EmailService;
use crate::types::StudentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentEventKind {
    Created,
    Updated,
}

/// Everything the notification surface needs about one enrollment change:
/// student contact info, plan title, the derived window and the price.
#[derive(Debug, Clone)]
pub struct EnrollmentEvent {
    pub kind: EnrollmentEventKind,
    pub student_id: StudentId,
    pub student_name: String,
    pub student_email: String,
    pub plan_title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
}

impl EnrollmentEvent {
    pub fn new(kind: EnrollmentEventKind, student: &StudentRecord, plan: &PlanRecord, enrollment: &EnrollmentRecord) -> Self {
        Self {
            kind,
            student_id: student.id,
            student_name: student.name.clone(),
            student_email: student.email.clone(),
            plan_title: plan.title.clone(),
            start_date: enrollment.start_date,
            end_date: enrollment.end_date,
            price: enrollment.price,
        }
    }

    pub fn subject(&self) -> String {
        match self.kind {
            EnrollmentEventKind::Created => "Welcome to the gym!".to_string(),
            EnrollmentEventKind::Updated => "Your membership was updated".to_string(),
        }
    }

    /// Human-readable summary used for both the notification feed and the
    /// email body.
    pub fn message(&self) -> String {
        let verb = match self.kind {
            EnrollmentEventKind::Created => "is active",
            EnrollmentEventKind::Updated => "was updated",
        };
        format!(
            "Your {} membership {} from {} through {}, for a total of ${}.",
            self.plan_title,
            verb,
            self.start_date.format("%B %d, %Y"),
            self.end_date.format("%B %d, %Y"),
            self.price,
        )
    }
}

/// Fire-and-forget handle given to the lifecycle manager.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<EnrollmentEvent>,
}

impl NotificationDispatcher {
    /// Create a dispatcher and the receiving end for the worker.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<EnrollmentEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue an event. Never blocks and never fails the caller; a missing
    /// worker only costs the notification.
    pub fn notify(&self, event: EnrollmentEvent) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Notification worker is gone, dropping enrollment event");
        }
    }
}

/// Drain enrollment events until shutdown: persist a notification row and
/// send the email when a mailer is configured. All failures are logged and
/// swallowed; this path must never surface back into request handling.
pub async fn run_notification_worker(
    mut rx: mpsc::UnboundedReceiver<EnrollmentEvent>,
    pool: PgPool,
    email: Option<EmailService>,
    shutdown: CancellationToken,
) {
    tracing::info!(email_enabled = email.is_some(), "Starting enrollment notification worker");

    loop {
        let event = tokio::select! {
            event = rx.recv() => match event {
                Some(event) => event,
                None => {
                    tracing::info!("Notification channel closed, worker exiting");
                    return;
                }
            },
            _ = shutdown.cancelled() => {
                tracing::info!("Notification worker shutting down");
                return;
            }
        };

        handle_event(&pool, email.as_ref(), event).await;
    }
}

async fn handle_event(pool: &PgPool, email: Option<&EmailService>, event: EnrollmentEvent) {
    let request = NotificationCreateDBRequest {
        student_id: event.student_id,
        content: event.message(),
    };

    match pool.acquire().await {
        Ok(mut conn) => {
            if let Err(e) = Notifications::new(&mut conn).create(&request).await {
                tracing::warn!(student_id = %event.student_id, error = %e, "Failed to record enrollment notification");
            }
        }
        Err(e) => {
            tracing::warn!(student_id = %event.student_id, error = %e, "Failed to acquire connection for notification");
        }
    }

    if let Some(email_service) = email {
        if let Err(e) = email_service.send_enrollment_email(&event).await {
            tracing::warn!(
                student_id = %event.student_id,
                email = %event.student_email,
                error = %e,
                "Failed to send enrollment email"
            );
        } else {
            tracing::info!(
                student_id = %event.student_id,
                email = %event.student_email,
                kind = ?event.kind,
                "Sent enrollment notification email"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_enrollment_event;

    #[test]
    fn test_message_carries_plan_window_and_price() {
        let event = sample_enrollment_event();
        let message = event.message();

        assert!(message.contains(&event.plan_title));
        assert!(message.contains("January 01, 2024"));
        assert!(message.contains("April 01, 2024"));
        assert!(message.contains(&format!("${}", event.price)));
    }

    #[tokio::test]
    async fn test_notify_after_worker_gone_does_not_panic() {
        let (dispatcher, rx) = NotificationDispatcher::channel();
        drop(rx);

        dispatcher.notify(sample_enrollment_event());
    }

    #[tokio::test]
    async fn test_dispatcher_delivers_events_in_order() {
        let (dispatcher, mut rx) = NotificationDispatcher::channel();

        let mut first = sample_enrollment_event();
        first.kind = EnrollmentEventKind::Created;
        let mut second = sample_enrollment_event();
        second.kind = EnrollmentEventKind::Updated;

        dispatcher.notify(first);
        dispatcher.notify(second);

        assert_eq!(rx.recv().await.unwrap().kind, EnrollmentEventKind::Created);
        assert_eq!(rx.recv().await.unwrap().kind, EnrollmentEventKind::Updated);
    }
}
