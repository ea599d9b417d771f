//! Free-text report path, independent of the verdict path.

use std::sync::{Arc, Mutex};

use diagai::application::ReportService;
use diagai::domain::{Language, Selection, REPORT_SUBJECT};
use diagai::ports::{MailError, Mailer, OutgoingMail};
use diagai::DiagaiError;

#[derive(Default)]
struct CountingMailer {
    attempts: Mutex<Vec<OutgoingMail>>,
    reject: bool,
}

impl Mailer for CountingMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        self.attempts.lock().expect("lock").push(mail.clone());
        if self.reject {
            Err(MailError::Transport("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

impl CountingMailer {
    fn attempts(&self) -> usize {
        self.attempts.lock().expect("lock").len()
    }
}

fn service(reject: bool) -> (ReportService<CountingMailer>, Arc<CountingMailer>) {
    let mailer = Arc::new(CountingMailer {
        reject,
        ..CountingMailer::default()
    });
    (
        ReportService::new(Arc::clone(&mailer), "reports@example.org"),
        mailer,
    )
}

#[test]
fn sentinel_with_empty_text_makes_no_attempt() {
    let selection = Selection::from_choices(["Fever", "Others"], Language::English);
    assert!(selection.wants_free_text());

    let (svc, mailer) = service(false);
    for blank in ["", "   ", "\n\t"] {
        let err = svc.submit(blank, selection.language()).expect_err("blank");
        assert!(matches!(err, DiagaiError::Report(_)));
    }
    assert_eq!(mailer.attempts(), 0);
}

#[test]
fn sentinel_with_text_sends_exactly_once() {
    let selection = Selection::from_choices(["Mengineyo"], Language::Swahili);
    let (svc, mailer) = service(false);

    svc.submit("Maumivu ya mgongo", selection.language())
        .expect("delivered");

    let attempts = mailer.attempts.lock().expect("lock");
    assert_eq!(attempts.len(), 1);
    assert!(attempts[0].subject.contains("Additional Symptoms"));
    assert_eq!(attempts[0].subject, REPORT_SUBJECT);
    assert!(attempts[0].body.contains("Maumivu ya mgongo"));
    assert_eq!(attempts[0].recipient, "reports@example.org");
}

#[test]
fn relay_failure_surfaces_without_retry() {
    let (svc, mailer) = service(true);

    let err = svc
        .submit("persistent back pain", Language::English)
        .expect_err("relay failure");

    assert!(matches!(err, DiagaiError::MailDelivery(_)));
    assert!(err.to_string().contains("connection reset"));
    assert_eq!(mailer.attempts(), 1);
}
