//! Submission coordinator
//!
//! Orchestrates one submission cycle: collect observers fire, the form is
//! read once, the card is created, then attachments upload sequentially with
//! per-attachment failure tracking. The report is consumed exactly once and
//! replaced with a fresh instance whatever the outcome.

use crate::config::Config;
use crate::ports::board::{BoardError, BoardPort, CardRef, CreateCard};
use crate::ports::form::FormPort;
use crate::report::{ListRef, Report};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Phase of the submission state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    /// No submission in progress
    #[default]
    Idle,
    /// Observers are collecting data and the form is being read
    Collecting,
    /// Network calls in flight
    Submitting,
    /// Last submission succeeded fully; cleared by the next submit call
    Completed,
    /// Last submission failed (card creation or at least one attachment);
    /// cleared by the next submit call
    Failed,
}

/// Hooks fired around a submission.
///
/// `collect_data` runs synchronously before any form field is read, so
/// observers can inject extra sections or attachments into the report.
/// `submission_completed` fires only after the full pipeline succeeded.
pub trait SubmissionObserver: Send + Sync {
    /// Called before the form is read; may mutate the report.
    fn collect_data(&self, _report: &mut Report) {}

    /// Called once after a fully successful submission.
    fn submission_completed(&self) {}
}

/// One attachment that failed to upload.
#[derive(Debug)]
pub struct AttachmentFailure {
    /// Attachment name as composed into the report
    pub name: String,
    /// The upload error
    pub error: BoardError,
}

/// Result of one submission cycle.
#[derive(Debug, Default)]
pub struct SubmissionOutcome {
    /// The created card, if card creation succeeded
    pub card: Option<CardRef>,
    /// Attachments that failed to upload (card creation succeeded)
    pub failed_attachments: Vec<AttachmentFailure>,
    /// Message of the most recent failure, kept for logging
    pub last_error: Option<String>,
}

impl SubmissionOutcome {
    /// Whether the card was created and every attachment uploaded.
    pub fn is_success(&self) -> bool {
        self.card.is_some() && self.failed_attachments.is_empty()
    }
}

/// Errors raised before any network call is made
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Selected category index is outside the configured arrays
    #[error("selected category index {index} is out of range ({available} categories configured)")]
    InvalidCategory {
        /// The rejected index
        index: usize,
        /// Number of configured categories
        available: usize,
    },

    /// Selected priority index is outside the configured label array
    #[error("selected priority index {index} is out of range ({available} labels configured)")]
    InvalidPriority {
        /// The rejected index
        index: usize,
        /// Number of configured labels
        available: usize,
    },
}

/// Coordinates the feedback submission pipeline.
///
/// Owns the single mutable [`Report`] for the duration of a cycle; no other
/// component mutates it concurrently. Network calls run strictly
/// sequentially.
pub struct SubmissionCoordinator<B: BoardPort> {
    board: Arc<B>,
    config: Arc<Config>,
    report: Report,
    phase: SubmissionPhase,
    observers: Vec<Box<dyn SubmissionObserver>>,
}

impl<B: BoardPort> SubmissionCoordinator<B> {
    /// Creates a coordinator with a fresh empty report.
    pub fn new(board: Arc<B>, config: Arc<Config>) -> Self {
        Self {
            board,
            config,
            report: Report::new(),
            phase: SubmissionPhase::Idle,
            observers: Vec::new(),
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Returns the report being composed, for mutation before submit
    /// (screenshot bytes, extra attachments).
    pub fn report_mut(&mut self) -> &mut Report {
        &mut self.report
    }

    /// Registers an observer.
    pub fn add_observer(&mut self, observer: Box<dyn SubmissionObserver>) {
        self.observers.push(observer);
    }

    /// Runs one submission cycle.
    ///
    /// Card-creation failure aborts the pipeline; attachment failures are
    /// collected without stopping sibling uploads. The report slot is reset
    /// to a fresh instance regardless of the outcome.
    ///
    /// # Errors
    /// Returns `SubmitError` when the form indices do not match the
    /// configured board arrays. The report is rolled back to its
    /// pre-collect state in that case, so a corrected retry does not
    /// re-apply observer-injected sections or attachments.
    pub async fn submit<F: FormPort + ?Sized>(
        &mut self,
        form: &F,
    ) -> Result<SubmissionOutcome, SubmitError> {
        self.phase = SubmissionPhase::Collecting;

        // Observers may inject sections/attachments before any field is
        // read; keep the original around for the validation-error rollback
        let staged = self.report.clone();
        for observer in &self.observers {
            observer.collect_data(&mut self.report);
        }

        let fields = form.read_fields();

        let board_cfg = &self.config.board;
        if fields.category_index >= board_cfg.category_ids.len() {
            self.report = staged;
            self.phase = SubmissionPhase::Idle;
            return Err(SubmitError::InvalidCategory {
                index: fields.category_index,
                available: board_cfg.category_ids.len(),
            });
        }
        if fields.priority_index >= board_cfg.labels.len() {
            self.report = staged;
            self.phase = SubmissionPhase::Idle;
            return Err(SubmitError::InvalidPriority {
                index: fields.priority_index,
                available: board_cfg.labels.len(),
            });
        }

        self.report.list = ListRef {
            id: board_cfg.category_ids[fields.category_index].clone(),
            name: board_cfg.category_names[fields.category_index].clone(),
        };
        self.report.title = fields.summary.clone();
        self.report
            .add_label(board_cfg.labels[fields.priority_index].clone());

        Self::set_section(&mut self.report, "Summary", fields.summary, 0);
        Self::set_section(&mut self.report, "Email", fields.email, 1);
        Self::set_section(&mut self.report, "Detail", fields.detail, 2);

        self.phase = SubmissionPhase::Submitting;
        let outcome = self.run_pipeline().await;

        if outcome.is_success() {
            self.phase = SubmissionPhase::Completed;
            info!(card = ?outcome.card, "Feedback submitted");
            for observer in &self.observers {
                observer.submission_completed();
            }
        } else {
            self.phase = SubmissionPhase::Failed;
            error!(
                reason = outcome.last_error.as_deref().unwrap_or("unknown"),
                "Feedback submission failed"
            );
        }

        // The report is single-use: start the next cycle fresh. The phase
        // keeps its terminal value until the next submit call.
        self.report = Report::new();

        Ok(outcome)
    }

    /// Writes a form field into its named section at the given position,
    /// creating the section when an observer has not already done so.
    fn set_section(report: &mut Report, name: &str, text: String, sort_order: i32) {
        report.add_section(name, "");
        if let Some(section) = report.section_mut(name) {
            section.text = text;
            section.sort_order = sort_order;
        }
    }

    /// Creates the card, then uploads attachments one at a time.
    async fn run_pipeline(&mut self) -> SubmissionOutcome {
        let mut outcome = SubmissionOutcome::default();

        let card = CreateCard {
            title: self.report.title.clone(),
            body: self.report.render(),
            label_ids: self.report.label_ids(),
            list_id: self.report.list.id.clone(),
            screenshot: self.report.screenshot.take(),
        }
        .with_placeholders();

        debug!(list_id = %card.list_id, "Creating card");
        let card_ref = match self.board.create_card(card).await {
            Ok(card_ref) => card_ref,
            Err(e) => {
                // No attachment uploads after a failed creation
                outcome.last_error = Some(e.to_string());
                return outcome;
            }
        };

        // Best-effort uploads: every attachment is attempted exactly once
        for attachment in self.report.attachments() {
            debug!(name = %attachment.name, "Uploading attachment");
            if let Err(e) = self
                .board
                .add_attachment(&card_ref.id, attachment.data.clone(), None, &attachment.name)
                .await
            {
                error!(name = %attachment.name, error = %e, "Failed to attach file to report");
                outcome.last_error = Some(e.to_string());
                outcome.failed_attachments.push(AttachmentFailure {
                    name: attachment.name.clone(),
                    error: e,
                });
            }
        }

        outcome.card = Some(card_ref);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::form::FormFields;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock board recording every call
    struct MockBoard {
        fail_create: bool,
        fail_attachments: HashSet<String>,
        created: Mutex<Vec<CreateCard>>,
        attached: Mutex<Vec<(String, String)>>,
    }

    impl MockBoard {
        fn new() -> Self {
            Self {
                fail_create: false,
                fail_attachments: HashSet::new(),
                created: Mutex::new(Vec::new()),
                attached: Mutex::new(Vec::new()),
            }
        }

        fn failing_create() -> Self {
            Self {
                fail_create: true,
                ..Self::new()
            }
        }

        fn failing_attachment(name: &str) -> Self {
            let mut board = Self::new();
            board.fail_attachments.insert(name.to_string());
            board
        }

        fn created_cards(&self) -> Vec<CreateCard> {
            self.created.lock().unwrap().clone()
        }

        fn attached_names(&self) -> Vec<String> {
            self.attached
                .lock()
                .unwrap()
                .iter()
                .map(|(_, name)| name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl BoardPort for MockBoard {
        async fn create_card(&self, card: CreateCard) -> Result<CardRef, BoardError> {
            self.created.lock().unwrap().push(card);
            if self.fail_create {
                return Err(BoardError::Rejected {
                    status: 401,
                    message: "invalid token".to_string(),
                });
            }
            Ok(CardRef {
                id: "card-1".to_string(),
            })
        }

        async fn add_attachment(
            &self,
            card_id: &str,
            _data: Vec<u8>,
            _mime_type: Option<&str>,
            name: &str,
        ) -> Result<(), BoardError> {
            self.attached
                .lock()
                .unwrap()
                .push((card_id.to_string(), name.to_string()));
            if self.fail_attachments.contains(name) {
                return Err(BoardError::Network("connection reset".to_string()));
            }
            Ok(())
        }
    }

    fn test_config() -> Arc<Config> {
        let mut config = Config::default();
        config.board.category_ids = vec!["list-feedback".to_string(), "list-bug".to_string()];
        Arc::new(config)
    }

    fn filled_form() -> FormFields {
        FormFields {
            summary: "crash on save".to_string(),
            email: "user@example.com".to_string(),
            detail: "steps to reproduce".to_string(),
            category_index: 1,
            priority_index: 2,
        }
    }

    #[tokio::test]
    async fn test_successful_submission() {
        let board = Arc::new(MockBoard::new());
        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());

        let outcome = coordinator.submit(&filled_form()).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.card.unwrap().id, "card-1");

        let cards = board.created_cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "crash on save");
        assert_eq!(cards[0].list_id, "list-bug");
        assert_eq!(cards[0].label_ids, vec!["3".to_string()]);
        assert!(cards[0].body.starts_with("Summary\ncrash on save"));
        assert!(cards[0].body.contains("Email\nuser@example.com"));
        assert!(cards[0].body.ends_with("Detail\nsteps to reproduce"));
    }

    #[tokio::test]
    async fn test_failed_create_card_skips_attachments() {
        let board = Arc::new(MockBoard::failing_create());
        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());
        coordinator.report_mut().add_attachment("log.txt", vec![1]);

        let outcome = coordinator.submit(&filled_form()).await.unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.card.is_none());
        assert!(outcome.last_error.unwrap().contains("invalid token"));
        assert!(board.attached_names().is_empty());
    }

    #[tokio::test]
    async fn test_attachment_failure_does_not_stop_siblings() {
        let board = Arc::new(MockBoard::failing_attachment("B"));
        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());
        coordinator.report_mut().add_attachment("A", vec![1]);
        coordinator.report_mut().add_attachment("B", vec![2]);
        coordinator.report_mut().add_attachment("C", vec![3]);

        let outcome = coordinator.submit(&filled_form()).await.unwrap();

        // All three attempted exactly once, in order
        assert_eq!(board.attached_names(), vec!["A", "B", "C"]);
        assert!(!outcome.is_success());
        assert_eq!(outcome.failed_attachments.len(), 1);
        assert_eq!(outcome.failed_attachments[0].name, "B");
        assert!(outcome.last_error.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_empty_fields_become_placeholders() {
        let board = Arc::new(MockBoard::new());
        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());

        let form = FormFields {
            category_index: 0,
            priority_index: 0,
            ..Default::default()
        };
        let outcome = coordinator.submit(&form).await.unwrap();
        assert!(outcome.is_success());

        let cards = board.created_cards();
        assert_eq!(cards[0].title, "[no summary]");
        // Body renders to section names with empty text, which is non-empty;
        // placeholder applies only when the whole body is blank
        assert!(cards[0].body.contains("Summary"));
    }

    #[tokio::test]
    async fn test_report_resets_after_success_and_failure() {
        let board = Arc::new(MockBoard::failing_create());
        let mut coordinator = SubmissionCoordinator::new(board, test_config());
        coordinator.report_mut().add_attachment("log.txt", vec![1]);
        coordinator.report_mut().screenshot = Some(vec![9]);

        coordinator.submit(&filled_form()).await.unwrap();

        assert_eq!(coordinator.report_mut().sections().len(), 0);
        assert_eq!(coordinator.report_mut().attachments().len(), 0);
        assert!(coordinator.report_mut().screenshot.is_none());

        let board = Arc::new(MockBoard::new());
        let mut coordinator = SubmissionCoordinator::new(board, test_config());
        coordinator.submit(&filled_form()).await.unwrap();
        assert_eq!(coordinator.report_mut().sections().len(), 0);
        assert_eq!(coordinator.report_mut().attachments().len(), 0);
    }

    #[tokio::test]
    async fn test_phase_reflects_last_outcome() {
        let board = Arc::new(MockBoard::new());
        let mut coordinator = SubmissionCoordinator::new(board, test_config());
        assert_eq!(coordinator.phase(), SubmissionPhase::Idle);

        coordinator.submit(&filled_form()).await.unwrap();
        assert_eq!(coordinator.phase(), SubmissionPhase::Completed);

        let board = Arc::new(MockBoard::failing_create());
        let mut coordinator = SubmissionCoordinator::new(board, test_config());
        coordinator.submit(&filled_form()).await.unwrap();
        assert_eq!(coordinator.phase(), SubmissionPhase::Failed);
    }

    #[tokio::test]
    async fn test_screenshot_rides_with_card_creation() {
        let board = Arc::new(MockBoard::new());
        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());
        coordinator.report_mut().screenshot = Some(vec![0x89, 0x50]);

        coordinator.submit(&filled_form()).await.unwrap();

        let cards = board.created_cards();
        assert_eq!(cards[0].screenshot, Some(vec![0x89, 0x50]));
        // The screenshot is not double-sent as an attachment
        assert!(board.attached_names().is_empty());
    }

    struct CountingObserver {
        collected: AtomicUsize,
        completed: AtomicUsize,
    }

    impl SubmissionObserver for Arc<CountingObserver> {
        fn collect_data(&self, report: &mut Report) {
            self.collected.fetch_add(1, Ordering::SeqCst);
            report.add_attachment("device-info.txt", b"model: test".to_vec());
            report.add_section("Device", "test hardware");
            if let Some(section) = report.section_mut("Device") {
                section.sort_order = 10;
            }
        }

        fn submission_completed(&self) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_observers_inject_data_and_hear_completion() {
        let board = Arc::new(MockBoard::new());
        let observer = Arc::new(CountingObserver {
            collected: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });

        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());
        coordinator.add_observer(Box::new(Arc::clone(&observer)));

        coordinator.submit(&filled_form()).await.unwrap();

        assert_eq!(observer.collected.load(Ordering::SeqCst), 1);
        assert_eq!(observer.completed.load(Ordering::SeqCst), 1);
        // Injected data flowed into the submission
        assert_eq!(board.attached_names(), vec!["device-info.txt"]);
        assert!(board.created_cards()[0].body.ends_with("Device\ntest hardware"));
    }

    #[tokio::test]
    async fn test_completion_observer_silent_on_failure() {
        let board = Arc::new(MockBoard::failing_create());
        let observer = Arc::new(CountingObserver {
            collected: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });

        let mut coordinator = SubmissionCoordinator::new(board, test_config());
        coordinator.add_observer(Box::new(Arc::clone(&observer)));

        coordinator.submit(&filled_form()).await.unwrap();

        assert_eq!(observer.collected.load(Ordering::SeqCst), 1);
        assert_eq!(observer.completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_indices_rejected_before_network() {
        let board = Arc::new(MockBoard::new());
        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());

        let mut form = filled_form();
        form.category_index = 9;
        let result = coordinator.submit(&form).await;
        assert!(matches!(result, Err(SubmitError::InvalidCategory { index: 9, .. })));

        let mut form = filled_form();
        form.priority_index = 7;
        let result = coordinator.submit(&form).await;
        assert!(matches!(result, Err(SubmitError::InvalidPriority { index: 7, .. })));

        assert!(board.created_cards().is_empty());
        assert_eq!(coordinator.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn test_rejected_submit_rolls_back_observer_injections() {
        let board = Arc::new(MockBoard::new());
        let observer = Arc::new(CountingObserver {
            collected: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        });

        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());
        coordinator.add_observer(Box::new(Arc::clone(&observer)));

        // Two rejected attempts, then a corrected retry
        let mut form = filled_form();
        form.category_index = 9;
        assert!(coordinator.submit(&form).await.is_err());
        assert!(coordinator.submit(&form).await.is_err());
        assert_eq!(coordinator.report_mut().attachments().len(), 0);

        coordinator.submit(&filled_form()).await.unwrap();

        // Observer data was applied exactly once despite the retries
        assert_eq!(observer.collected.load(Ordering::SeqCst), 3);
        assert_eq!(board.attached_names(), vec!["device-info.txt"]);
        let body = &board.created_cards()[0].body;
        assert_eq!(body.matches("Device\n").count(), 1);
    }

    #[tokio::test]
    async fn test_category_and_priority_selections_are_independent() {
        let board = Arc::new(MockBoard::new());
        let mut coordinator = SubmissionCoordinator::new(Arc::clone(&board), test_config());

        let form = FormFields {
            summary: "s".to_string(),
            category_index: 0,
            priority_index: 2,
            ..Default::default()
        };
        coordinator.submit(&form).await.unwrap();

        let cards = board.created_cards();
        assert_eq!(cards[0].list_id, "list-feedback");
        assert_eq!(cards[0].label_ids, vec!["3".to_string()]);
    }
}
