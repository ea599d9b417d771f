//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation and language tabs
//! - Input event handling
//! - Service integration
//! - Evaluations and report delivery via background worker

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::model::DenseClassifier;
use crate::adapters::secrets::SMTP_PASSWORD;
use crate::adapters::smtp::SmtpMailer;
use crate::adapters::wikipedia::WikipediaClient;
use crate::application::{ReportService, ScreeningService, SummaryService};
use crate::config::AppConfig;
use crate::domain::Language;
use crate::DiagaiError;

use super::ui::{
    about::{render_about, AboutInfo},
    checklist::{render_checklist, ChecklistState, Focus},
    render_disclaimer, render_tabs,
    result::{render_result, ResultState},
    Notice, NoticeKind, UiText,
};
use super::worker::{JobKind, Worker, WorkerHandle, WorkerProgress};

type Screening = ScreeningService<DenseClassifier, WikipediaClient>;
type Reporting = ReportService<SmtpMailer>;

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Checklist,
    Result,
    About,
}

/// Main application state
pub struct App {
    screen: Screen,

    should_quit: bool,

    /// Tab currently shown
    active: Language,

    screening: Arc<Screening>,

    /// `None` when mail is disabled or no credential was found
    reporting: Option<Arc<Reporting>>,

    /// One checklist per language, in `Language::ALL` order
    tabs: Vec<ChecklistState>,

    result_state: ResultState,

    about: AboutInfo,

    /// Evaluation and report jobs run independently, at most one of each
    evaluation_worker: Option<WorkerHandle>,
    report_worker: Option<WorkerHandle>,
}

impl App {
    /// Build the application from configuration.
    ///
    /// The model must load; the report path is optional and a missing SMTP
    /// credential only disables it.
    ///
    /// # Errors
    /// Returns error if the bundle is invalid, the model cannot be loaded or
    /// does not match the bundle, or the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let bundle = config.bundle()?;

        let model_path = bundle.model_path().to_path_buf();
        if !model_path.exists() {
            return Err(anyhow!(
                "Model artifact not found at {:?}. Set DIAGAI_MODEL_PATH or [bundle].model_path.",
                model_path
            ));
        }

        let classifier = DenseClassifier::load(&model_path, bundle.model_sha256())
            .map_err(|e| DiagaiError::ModelLoad(format!("{}: {e}", model_path.display())))?;

        let knowledge = &config.knowledge;
        let wikipedia = WikipediaClient::new(
            &knowledge.base_url,
            &knowledge.user_agent,
            knowledge.timeout_secs,
        )?;

        let screening = ScreeningService::new(
            Arc::new(classifier),
            Arc::new(bundle),
            SummaryService::new(Arc::new(wikipedia), knowledge.max_sentences),
        )?;

        let reporting = match config.smtp() {
            Some((settings, recipient)) => match SmtpMailer::from_secret(&settings, &SMTP_PASSWORD) {
                Ok(mailer) => Some(Arc::new(ReportService::new(Arc::new(mailer), recipient))),
                Err(e) => {
                    tracing::warn!("Symptom reports disabled: {}", e);
                    None
                }
            },
            None => {
                tracing::info!("Symptom reports disabled by configuration");
                None
            }
        };

        Ok(Self::with_dependencies(Arc::new(screening), reporting))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    #[must_use]
    pub fn with_dependencies(screening: Arc<Screening>, reporting: Option<Arc<Reporting>>) -> Self {
        let bundle = screening.bundle();
        let tabs = Language::ALL
            .iter()
            .map(|&l| ChecklistState::new(bundle.catalog(), l))
            .collect();
        let about = AboutInfo {
            bundle: bundle.name().to_string(),
            symptoms: bundle.expected_width(),
            threshold: bundle.policy().threshold(),
            model_path: bundle.model_path().display().to_string(),
            reporting_enabled: reporting.is_some(),
        };

        Self {
            screen: Screen::Checklist,
            should_quit: false,
            active: Language::English,
            screening,
            reporting,
            tabs,
            result_state: ResultState::default(),
            about,
            evaluation_worker: None,
            report_worker: None,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(2), // Tabs
                        Constraint::Min(0),    // Content
                        Constraint::Length(3), // Disclaimer
                    ])
                    .split(f.area());

                render_tabs(f, chunks[0], self.active);

                match self.screen {
                    Screen::Checklist => render_checklist(f, chunks[1], self.tab()),
                    Screen::Result => render_result(
                        f,
                        chunks[1],
                        &self.result_state,
                        self.screening.bundle().catalog(),
                    ),
                    Screen::About => render_about(f, chunks[1], self.active, &self.about),
                }

                render_disclaimer(f, chunks[2]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn tab(&self) -> &ChecklistState {
        let i = Self::tab_index(self.active);
        &self.tabs[i]
    }

    fn tab_mut(&mut self) -> &mut ChecklistState {
        let i = Self::tab_index(self.active);
        &mut self.tabs[i]
    }

    fn tab_index(language: Language) -> usize {
        Language::ALL.iter().position(|l| *l == language).unwrap_or(0)
    }

    fn set_notice(&mut self, language: Language, kind: NoticeKind, text: impl Into<String>) {
        self.tabs[Self::tab_index(language)].notice = Some(Notice::new(kind, text));
    }

    fn worker_slot(&mut self, kind: JobKind) -> &mut Option<WorkerHandle> {
        match kind {
            JobKind::Evaluation => &mut self.evaluation_worker,
            JobKind::Report => &mut self.report_worker,
        }
    }

    /// Poll both background workers for progress updates.
    fn poll_worker(&mut self) {
        self.poll_slot(JobKind::Evaluation);
        self.poll_slot(JobKind::Report);
    }

    fn poll_slot(&mut self, kind: JobKind) {
        loop {
            let Some((progress, language)) = self
                .worker_slot(kind)
                .as_ref()
                .and_then(|w| w.try_recv().map(|p| (p, w.language())))
            else {
                break;
            };
            let text = UiText::for_language(language);

            match progress {
                WorkerProgress::Evaluating => {}
                WorkerProgress::Sending => {
                    self.set_notice(language, NoticeKind::Info, text.sending);
                }
                WorkerProgress::Evaluated(outcome) => {
                    self.result_state = ResultState::Complete(outcome);
                    *self.worker_slot(kind) = None;
                    break;
                }
                WorkerProgress::Delivered => {
                    let i = Self::tab_index(language);
                    self.tabs[i].clear_free_text();
                    self.set_notice(language, NoticeKind::Success, text.report_sent);
                    *self.worker_slot(kind) = None;
                    break;
                }
                WorkerProgress::Failed(message) => {
                    match kind {
                        JobKind::Evaluation => {
                            self.result_state = ResultState::Error { language, message };
                        }
                        JobKind::Report => {
                            self.set_notice(
                                language,
                                NoticeKind::Error,
                                format!("{} ({message})", text.report_failed),
                            );
                        }
                    }
                    *self.worker_slot(kind) = None;
                    break;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Checklist => match self.tab().focus {
                Focus::List => self.handle_list_key(key),
                Focus::FreeText => self.handle_free_text_key(key, modifiers),
            },
            Screen::Result => self.handle_result_key(key),
            Screen::About => self.handle_about_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => self.switch_tab(),
            KeyCode::Up | KeyCode::Char('k') => self.tab_mut().prev(),
            KeyCode::Down | KeyCode::Char('j') => self.tab_mut().next(),
            KeyCode::Char(' ') => self.tab_mut().toggle(),
            KeyCode::Enter => self.start_evaluation(),
            KeyCode::Char('t') | KeyCode::Char('T') => {
                if !self.tab_mut().focus_free_text() {
                    let text = UiText::for_language(self.active);
                    self.set_notice(self.active, NoticeKind::Warning, text.free_text_locked);
                }
            }
            KeyCode::Char('?') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.screen = Screen::About;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_free_text_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => self.submit_report(),
            KeyCode::Esc => self.tab_mut().focus = Focus::List,
            KeyCode::Enter => self.tab_mut().input_char('\n'),
            KeyCode::Backspace => self.tab_mut().delete_char(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.tab_mut().input_char(c);
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        if self.result_state.is_working() {
            return;
        }
        match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => self.screen = Screen::Checklist,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.tab_mut().reset();
                self.result_state = ResultState::Idle;
                self.screen = Screen::Checklist;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_about_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => self.switch_tab(),
            _ => self.screen = Screen::Checklist,
        }
    }

    fn switch_tab(&mut self) {
        let i = Self::tab_index(self.active);
        self.active = Language::ALL[(i + 1) % Language::ALL.len()];
    }

    fn start_evaluation(&mut self) {
        if self.evaluation_worker.is_some() {
            let text = UiText::for_language(self.active);
            self.set_notice(self.active, NoticeKind::Warning, text.busy);
            return;
        }

        let selection = self.tab().selection();
        self.result_state = ResultState::Working {
            language: self.active,
            started: Instant::now(),
        };
        self.screen = Screen::Result;
        self.evaluation_worker = Some(Worker::spawn_evaluation(Arc::clone(&self.screening), selection));
    }

    fn submit_report(&mut self) {
        let language = self.active;
        let text = UiText::for_language(language);

        let Some(reporting) = self.reporting.clone() else {
            self.set_notice(language, NoticeKind::Warning, text.reporting_disabled);
            return;
        };
        if self.report_worker.is_some() {
            self.set_notice(language, NoticeKind::Warning, text.busy);
            return;
        }
        // Blank text never reaches the mailer.
        if self.tab().free_text.trim().is_empty() {
            self.set_notice(language, NoticeKind::Warning, text.report_empty);
            return;
        }

        let report = self.tab().free_text.clone();
        self.set_notice(language, NoticeKind::Info, text.sending);
        self.report_worker = Some(Worker::spawn_report(reporting, report, language));
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver};
    use std::sync::Mutex;

    use super::*;
    use crate::domain::ModelBundle;
    use crate::ports::{MailError, Mailer, OutgoingMail};

    /// Holds every send until the test releases it.
    struct GatedMailer {
        release: Mutex<Receiver<()>>,
    }

    impl Mailer for GatedMailer {
        fn send(&self, _mail: &OutgoingMail) -> Result<(), MailError> {
            let _ = self.release.lock().expect("lock").recv();
            Ok(())
        }
    }

    fn app() -> App {
        let bundle = ModelBundle::builtin("malaria-v1").expect("bundle");
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(bundle.model_path());
        let classifier = DenseClassifier::load(&path, None).expect("model");
        let wikipedia =
            WikipediaClient::new("http://127.0.0.1:9/{lang}", "diagai-test", 1).expect("client");
        let screening = ScreeningService::new(
            Arc::new(classifier),
            Arc::new(bundle),
            SummaryService::new(Arc::new(wikipedia), 5),
        )
        .expect("aligned");
        App::with_dependencies(Arc::new(screening), None)
    }

    #[test]
    fn test_pending_report_does_not_block_evaluation() {
        let mut app = app();
        let (release, gate) = mpsc::channel();
        let reports = Arc::new(ReportService::new(
            Arc::new(GatedMailer {
                release: Mutex::new(gate),
            }),
            "inbox@example.org",
        ));
        app.report_worker = Some(Worker::spawn_report(reports, "rash".into(), Language::English));

        // Empty checklist: negative verdict, no summary lookup.
        app.start_evaluation();
        assert!(app.evaluation_worker.is_some());
        assert_eq!(app.screen, Screen::Result);
        assert!(app.tab().notice.is_none());

        let deadline = Instant::now() + Duration::from_secs(5);
        while app.result_state.is_working() && Instant::now() < deadline {
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(app.result_state, ResultState::Complete(_)));
        assert!(app.evaluation_worker.is_none());
        assert!(app.report_worker.is_some());

        release.send(()).expect("release");
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.report_worker.is_some() && Instant::now() < deadline {
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(app.report_worker.is_none());
        assert_eq!(
            app.tab().notice.as_ref().map(|n| n.kind),
            Some(NoticeKind::Success)
        );
    }

    #[test]
    fn test_busy_only_within_same_job_kind() {
        let mut app = app();
        app.start_evaluation();
        assert!(app.evaluation_worker.is_some());

        app.start_evaluation();
        assert_eq!(
            app.tab().notice.as_ref().map(|n| n.kind),
            Some(NoticeKind::Warning)
        );
    }
}
