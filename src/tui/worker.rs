//! Background worker for evaluations and report delivery.
//!
//! Scoring is fast, but a positive verdict triggers an HTTP lookup and a
//! report opens an SMTP session. Both run off the UI thread so the terminal
//! keeps redrawing while they wait on the network.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{ReportService, ScreeningOutcome, ScreeningService};
use crate::domain::{Language, Selection};
use crate::ports::{Classifier, KnowledgeSource, Mailer};

/// Kind of job a worker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Evaluation,
    Report,
}

/// Progress updates from a worker.
#[derive(Debug, Clone)]
pub enum WorkerProgress {
    /// Scoring the checklist (and fetching the summary if positive)
    Evaluating,
    /// Handing the report to the mail relay
    Sending,
    /// Evaluation finished
    Evaluated(Box<ScreeningOutcome>),
    /// Report accepted by the relay
    Delivered,
    /// Job failed; message is safe to display
    Failed(String),
}

/// Handle to a running worker.
pub struct WorkerHandle {
    kind: JobKind,
    language: Language,
    progress_rx: Receiver<WorkerProgress>,
    _handle: JoinHandle<()>,
}

impl WorkerHandle {
    #[must_use]
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Language tab the job was started from.
    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Try to receive the next progress update (non-blocking).
    ///
    /// A worker that exits without a final update is reported as
    /// [`WorkerProgress::Failed`].
    #[must_use]
    pub fn try_recv(&self) -> Option<WorkerProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                tracing::error!(kind = ?self.kind, "Worker stopped without a result");
                Some(WorkerProgress::Failed("Worker stopped unexpectedly".to_string()))
            }
        }
    }
}

/// Spawns one-shot background jobs.
pub struct Worker;

impl Worker {
    /// Evaluate a selection in the background.
    pub fn spawn_evaluation<C, K>(
        service: Arc<ScreeningService<C, K>>,
        selection: Selection,
    ) -> WorkerHandle
    where
        C: Classifier + 'static,
        K: KnowledgeSource + 'static,
    {
        let language = selection.language();
        Self::spawn(JobKind::Evaluation, language, move |tx| {
            let _ = tx.send(WorkerProgress::Evaluating);
            let progress = match service.evaluate(&selection) {
                Ok(outcome) => WorkerProgress::Evaluated(Box::new(outcome)),
                Err(e) => WorkerProgress::Failed(e.to_string()),
            };
            let _ = tx.send(progress);
        })
    }

    /// Deliver a free-text report in the background.
    pub fn spawn_report<M>(service: Arc<ReportService<M>>, text: String, language: Language) -> WorkerHandle
    where
        M: Mailer + 'static,
    {
        Self::spawn(JobKind::Report, language, move |tx| {
            let _ = tx.send(WorkerProgress::Sending);
            let progress = match service.submit(&text, language) {
                Ok(()) => WorkerProgress::Delivered,
                Err(e) => WorkerProgress::Failed(e.to_string()),
            };
            let _ = tx.send(progress);
        })
    }

    fn spawn<F>(kind: JobKind, language: Language, job: F) -> WorkerHandle
    where
        F: FnOnce(Sender<WorkerProgress>) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || job(tx));

        WorkerHandle {
            kind,
            language,
            progress_rx: rx,
            _handle: handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::ports::{MailError, OutgoingMail};

    struct NullMailer;

    impl Mailer for NullMailer {
        fn send(&self, _mail: &OutgoingMail) -> Result<(), MailError> {
            Ok(())
        }
    }

    fn drain(handle: &WorkerHandle) -> Vec<WorkerProgress> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            match handle.try_recv() {
                Some(p) => {
                    let done = !matches!(p, WorkerProgress::Evaluating | WorkerProgress::Sending);
                    seen.push(p);
                    if done {
                        break;
                    }
                }
                None => thread::sleep(Duration::from_millis(5)),
            }
        }
        seen
    }

    #[test]
    fn test_report_job_reports_delivery() {
        let service = Arc::new(ReportService::new(Arc::new(NullMailer), "inbox@example.org"));
        let handle = Worker::spawn_report(service, "night sweats".into(), Language::English);
        assert_eq!(handle.kind(), JobKind::Report);

        let seen = drain(&handle);
        assert!(matches!(seen.first(), Some(WorkerProgress::Sending)));
        assert!(matches!(seen.last(), Some(WorkerProgress::Delivered)));
    }

    #[test]
    fn test_blank_report_job_fails() {
        let service = Arc::new(ReportService::new(Arc::new(NullMailer), "inbox@example.org"));
        let handle = Worker::spawn_report(service, "  ".into(), Language::Swahili);
        assert_eq!(handle.language(), Language::Swahili);

        let seen = drain(&handle);
        assert!(matches!(seen.last(), Some(WorkerProgress::Failed(_))));
    }

    #[test]
    fn test_silent_worker_exit_is_failure() {
        let handle = Worker::spawn(JobKind::Evaluation, Language::English, drop);

        let seen = drain(&handle);
        assert!(matches!(seen.last(), Some(WorkerProgress::Failed(_))));
    }
}
