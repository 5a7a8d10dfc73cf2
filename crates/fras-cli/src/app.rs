//! Application state machine and event dispatcher.

use std::sync::Arc;

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fras_core::{
  accounts::AccountTable,
  attendance::{AttendanceRecord, Notification, unread_count},
  dashboard::Dashboard,
  identity::Identity,
  issue::IssueReport,
  session::SessionManager,
  supplier::{RecordSupplier, ServiceDesk},
};
use fras_mock::MockSupplier;
use fras_store_sqlite::SqliteSlot;
use strum::{EnumIter, IntoEnumIterator};
use tokio::task::JoinHandle;

use crate::screens::{
  Action, HistoryView, LoginForm, ReportForm, SettingsView,
};

pub type Session = SessionManager<SqliteSlot, AccountTable>;

// ─── Screen ───────────────────────────────────────────────────────────────────

/// Sidebar destinations once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Screen {
  Dashboard,
  History,
  ReportIssue,
  Notifications,
  Settings,
}

impl Screen {
  pub fn title(self) -> &'static str {
    match self {
      Self::Dashboard => "Dashboard",
      Self::History => "History",
      Self::ReportIssue => "Report Issue",
      Self::Notifications => "Notifications",
      Self::Settings => "Settings",
    }
  }

  pub fn hotkey(self) -> char {
    match self {
      Self::Dashboard => '1',
      Self::History => '2',
      Self::ReportIssue => '3',
      Self::Notifications => '4',
      Self::Settings => '5',
    }
  }

  fn from_hotkey(c: char) -> Option<Self> {
    Self::iter().find(|s| s.hotkey() == c)
  }
}

// ─── Portal ───────────────────────────────────────────────────────────────────

/// Everything loaded for a signed-in user. Dropped wholesale on logout.
pub struct Portal {
  pub identity:            Identity,
  pub screen:              Screen,
  pub today:               NaiveDate,
  pub dashboard:           Dashboard,
  pub history:             HistoryView,
  pub report:              ReportForm,
  pub past_issues:         Vec<IssueReport>,
  pub notifications:       Vec<Notification>,
  pub notification_scroll: usize,
  pub settings:            SettingsView,
}

impl Portal {
  pub async fn load(
    identity: Identity,
    supplier: &MockSupplier,
  ) -> anyhow::Result<Self> {
    let today = supplier.today();
    let dashboard = Dashboard::load(identity.role, supplier, today, &Local)
      .await
      .context("loading dashboard")?;
    let records = supplier.monthly_attendance().await?;
    let notifications = supplier.notifications().await?;
    let past_issues = supplier.past_issues().await?;

    let mut portal = Self::new(identity, dashboard, records, notifications, today);
    portal.past_issues = past_issues;
    portal.settings.prefs = supplier.notification_prefs();
    Ok(portal)
  }

  pub fn new(
    identity: Identity,
    dashboard: Dashboard,
    records: Vec<AttendanceRecord>,
    mut notifications: Vec<Notification>,
    today: NaiveDate,
  ) -> Self {
    notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let settings = SettingsView::new(&identity, Default::default());
    Self {
      identity,
      screen: Screen::Dashboard,
      today,
      dashboard,
      history: HistoryView::new(records, today),
      report: ReportForm::new(today),
      past_issues: Vec::new(),
      notifications,
      notification_scroll: 0,
      settings,
    }
  }

  pub fn unread(&self) -> usize { unread_count(&self.notifications) }

  /// A text field has the keyboard; global shortcuts are suspended.
  pub fn is_editing(&self) -> bool {
    (self.screen == Screen::ReportIssue && self.report.editing)
      || (self.screen == Screen::Settings && self.settings.edit.is_some())
  }

  pub fn handle_key(&mut self, code: KeyCode) -> Action {
    if !self.is_editing()
      && let KeyCode::Char(c) = code
    {
      match c {
        'q' => return Action::Quit,
        'o' => return Action::Logout,
        _ => {
          if let Some(screen) = Screen::from_hotkey(c) {
            self.screen = screen;
            return Action::None;
          }
        }
      }
    }

    match self.screen {
      Screen::Dashboard => {
        if let Dashboard::Faculty(d) = &mut self.dashboard {
          match code {
            KeyCode::Down | KeyCode::Char('j') => d.select_next(),
            KeyCode::Up | KeyCode::Char('k') => d.select_prev(),
            _ => {}
          }
        }
        Action::None
      }
      Screen::History => self.history.handle_key(code, self.today),
      Screen::ReportIssue => self.report.handle_key(code, &self.history.courses),
      Screen::Notifications => {
        match code {
          KeyCode::Down | KeyCode::Char('j') => {
            let last = self.notifications.len().saturating_sub(1);
            self.notification_scroll = (self.notification_scroll + 1).min(last);
          }
          KeyCode::Up | KeyCode::Char('k') => {
            self.notification_scroll = self.notification_scroll.saturating_sub(1);
          }
          _ => {}
        }
        Action::None
      }
      Screen::Settings => self.settings.handle_key(code, self.identity.role),
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Result of a request handed to the service desk.
#[derive(Debug)]
pub enum DeskOutcome {
  IssueFiled(IssueReport),
  ProfileSaved,
  PrefsSaved,
}

/// Top-level application state.
pub struct App {
  pub session:    Arc<Session>,
  pub supplier:   Arc<MockSupplier>,
  /// Login form, shown whenever no one is signed in.
  pub login:      LoginForm,
  /// `Some` once signed in.
  pub portal:     Option<Portal>,
  /// One-line status message shown in the status bar.
  pub status_msg: String,
  login_task:     Option<JoinHandle<fras_core::Result<Identity>>>,
  desk_task:      Option<JoinHandle<anyhow::Result<DeskOutcome>>>,
}

impl App {
  pub fn new(session: Arc<Session>, supplier: Arc<MockSupplier>) -> Self {
    Self {
      session,
      supplier,
      login: LoginForm::default(),
      portal: None,
      status_msg: String::new(),
      login_task: None,
      desk_task: None,
    }
  }

  /// Open the portal straight away if a session was restored.
  pub async fn start(&mut self) -> anyhow::Result<()> {
    if let Some(identity) = self.session.identity() {
      self.status_msg = format!("Welcome back, {}!", identity.name);
      self.enter(identity).await?;
    }
    Ok(())
  }

  pub fn is_authenticating(&self) -> bool { self.login_task.is_some() }

  pub fn is_saving(&self) -> bool { self.desk_task.is_some() }

  async fn enter(&mut self, identity: Identity) -> anyhow::Result<()> {
    tracing::info!(user = %identity.id, role = %identity.role, "loading portal");
    self.portal = Some(Portal::load(identity, &self.supplier).await?);
    Ok(())
  }

  // ── Background tasks ──────────────────────────────────────────────────────

  fn submit_login(&mut self) {
    if self.login_task.is_some() || self.session.is_authenticating() {
      self.status_msg = fras_core::Error::LoginInProgress.to_string();
      return;
    }
    let session = Arc::clone(&self.session);
    let email = self.login.email.value.trim().to_string();
    let password = self.login.password.value.clone();
    let role = self.login.role;
    self.login_task = Some(tokio::spawn(async move {
      session.login(&email, &password, role).await
    }));
    self.status_msg = "Authenticating…".into();
  }

  fn submit_to_desk(&mut self, action: Action) {
    if self.desk_task.is_some() {
      self.status_msg = "Still saving the previous request…".into();
      return;
    }
    let supplier = Arc::clone(&self.supplier);
    let task = match action {
      Action::SubmitIssue(issue) => {
        self.status_msg = "Submitting report…".into();
        tokio::spawn(async move {
          let report = supplier.submit_issue(issue).await?;
          Ok::<_, anyhow::Error>(DeskOutcome::IssueFiled(report))
        })
      }
      Action::SaveProfile(profile) => {
        self.status_msg = "Saving profile…".into();
        tokio::spawn(async move {
          supplier.update_profile(profile).await?;
          Ok::<_, anyhow::Error>(DeskOutcome::ProfileSaved)
        })
      }
      Action::SavePrefs(prefs) => {
        self.status_msg = "Saving preferences…".into();
        tokio::spawn(async move {
          supplier.save_notification_prefs(prefs).await?;
          Ok::<_, anyhow::Error>(DeskOutcome::PrefsSaved)
        })
      }
      _ => return,
    };
    self.desk_task = Some(task);
  }

  /// Collect finished background work. Called once per frame.
  pub async fn poll_tasks(&mut self) -> anyhow::Result<()> {
    if self.login_task.as_ref().is_some_and(JoinHandle::is_finished)
      && let Some(task) = self.login_task.take()
    {
      self.login.password.clear();
      match task.await.context("login task failed")? {
        Ok(identity) => {
          self.status_msg = format!("Welcome back, {}!", identity.name);
          self.enter(identity).await?;
        }
        Err(e) => {
          tracing::debug!(error = %e, "login rejected");
          self.status_msg = format!("Login failed: {e}");
        }
      }
    }

    if self.desk_task.as_ref().is_some_and(JoinHandle::is_finished)
      && let Some(task) = self.desk_task.take()
    {
      match task.await.context("service desk task failed")? {
        Ok(outcome) => self.apply(outcome),
        Err(e) => self.status_msg = format!("Error: {e}"),
      }
    }
    Ok(())
  }

  fn apply(&mut self, outcome: DeskOutcome) {
    let Some(portal) = self.portal.as_mut() else {
      return;
    };
    self.status_msg = match outcome {
      DeskOutcome::IssueFiled(report) => {
        portal.past_issues.insert(0, report);
        portal.report = ReportForm::new(portal.today);
        "Issue report submitted successfully".into()
      }
      DeskOutcome::ProfileSaved => "Profile updated successfully".into(),
      DeskOutcome::PrefsSaved => "Notification preferences saved".into(),
    };
  }

  async fn logout(&mut self) {
    if let Some(task) = self.desk_task.take() {
      task.abort();
    }
    self.session.logout().await;
    self.portal = None;
    self.login = LoginForm::default();
    self.status_msg = "You have been logged out".into();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Returns `false` if the app should quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.code == KeyCode::Char('c')
      && key.modifiers.contains(KeyModifiers::CONTROL)
    {
      return Ok(false);
    }

    let Some(portal) = self.portal.as_mut() else {
      return Ok(self.handle_login_key(key.code));
    };

    match portal.handle_key(key.code) {
      Action::None => {}
      Action::Quit => return Ok(false),
      Action::Logout => self.logout().await,
      Action::Status(msg) => self.status_msg = msg,
      action => self.submit_to_desk(action),
    }
    Ok(true)
  }

  fn handle_login_key(&mut self, code: KeyCode) -> bool {
    match code {
      KeyCode::Esc => return false,
      KeyCode::Enter => self.submit_login(),
      code => self.login.handle_key(code),
    }
    true
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use chrono::Utc;
  use fras_core::{dashboard::FacultyDashboard, identity::Role};

  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  async fn app() -> App {
    let slot = SqliteSlot::open_in_memory().await.unwrap();
    let accounts = AccountTable::demo().with_latency(Duration::from_millis(200));
    let session = SessionManager::init(slot, accounts).await;
    let supplier = MockSupplier::new(Some(7)).with_latency(Duration::ZERO);
    App::new(Arc::new(session), Arc::new(supplier))
  }

  async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
  }

  async fn settle(app: &mut App) {
    for _ in 0..100 {
      app.poll_tasks().await.unwrap();
      if !app.is_authenticating() && !app.is_saving() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("background task did not finish");
  }

  async fn sign_in(app: &mut App) {
    type_text(app, "student@example.com").await;
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    type_text(app, "password").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    settle(app).await;
  }

  #[tokio::test]
  async fn login_flow_opens_the_portal() {
    let mut app = app().await;
    app.start().await.unwrap();
    assert!(app.portal.is_none());

    type_text(&mut app, "student@example.com").await;
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    type_text(&mut app, "password").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.is_authenticating());
    assert_eq!(app.status_msg, "Authenticating…");

    // A second submit while the first is outstanding is refused.
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert_eq!(app.status_msg, "a login is already in progress");

    settle(&mut app).await;
    let portal = app.portal.as_ref().unwrap();
    assert_eq!(portal.identity.name, "Alex Student");
    assert_eq!(portal.screen, Screen::Dashboard);
    assert!(app.login.password.value.is_empty());
  }

  #[tokio::test]
  async fn wrong_password_stays_on_login() {
    let mut app = app().await;
    type_text(&mut app, "student@example.com").await;
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    type_text(&mut app, "nope").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    settle(&mut app).await;

    assert!(app.portal.is_none());
    assert_eq!(app.status_msg, "Login failed: invalid credentials");
    assert!(!app.session.is_authenticated());
  }

  #[tokio::test]
  async fn stored_session_skips_the_login_screen() {
    let slot = SqliteSlot::open_in_memory().await.unwrap();
    let accounts = AccountTable::demo().with_latency(Duration::ZERO);
    let first = SessionManager::init(slot.clone(), accounts.clone()).await;
    first.login("faculty@example.com", "password", Role::Faculty).await.unwrap();

    let session = SessionManager::init(slot, accounts).await;
    let supplier = MockSupplier::new(Some(7)).with_latency(Duration::ZERO);
    let mut app = App::new(Arc::new(session), Arc::new(supplier));
    app.start().await.unwrap();

    let portal = app.portal.as_ref().unwrap();
    assert_eq!(portal.identity.role, Role::Faculty);
    assert!(matches!(portal.dashboard, Dashboard::Faculty(_)));
    assert_eq!(app.status_msg, "Welcome back, Dr. Morgan Faculty!");
  }

  #[tokio::test]
  async fn logout_returns_to_login() {
    let mut app = app().await;
    sign_in(&mut app).await;
    assert!(app.session.is_authenticated());

    app.handle_key(key(KeyCode::Char('o'))).await.unwrap();
    assert!(app.portal.is_none());
    assert!(!app.session.is_authenticated());
    assert_eq!(app.status_msg, "You have been logged out");
  }

  #[tokio::test]
  async fn hotkeys_switch_screens_but_not_while_typing() {
    let mut app = app().await;
    sign_in(&mut app).await;

    app.handle_key(key(KeyCode::Char('3'))).await.unwrap();
    let portal = app.portal.as_mut().unwrap();
    assert_eq!(portal.screen, Screen::ReportIssue);

    // Focus the time field and start typing: digits are text now.
    portal.report.focus = crate::screens::ReportField::Time;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    type_text(&mut app, "1").await;
    let portal = app.portal.as_ref().unwrap();
    assert_eq!(portal.screen, Screen::ReportIssue);
    assert_eq!(portal.report.time.value, "1");
  }

  #[tokio::test]
  async fn submitted_issue_lands_on_top_of_past_issues() {
    let mut app = app().await;
    sign_in(&mut app).await;
    let portal = app.portal.as_mut().unwrap();
    let before = portal.past_issues.len();
    portal.screen = Screen::ReportIssue;
    portal.report.course = Some(0);
    portal.report.time.value = "10:00".into();
    portal.report.reason.value = "camera was offline all morning".into();
    portal.report.focus = crate::screens::ReportField::Submit;

    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    assert!(app.is_saving());
    settle(&mut app).await;

    let portal = app.portal.as_ref().unwrap();
    assert_eq!(portal.past_issues.len(), before + 1);
    assert_eq!(portal.past_issues[0].course, "CS101");
    assert_eq!(app.status_msg, "Issue report submitted successfully");
    assert!(portal.report.time.value.is_empty());
  }

  #[test]
  fn faculty_dashboard_selection_follows_keys() {
    let identity = Identity {
      id:              "faculty1".into(),
      name:            "Dr. Morgan Faculty".into(),
      email:           "faculty@example.com".into(),
      role:            Role::Faculty,
      profile_picture: None,
    };
    let today = Utc::now().date_naive();
    let classes = fras_mock::generate::today_classes(&Utc, today, Role::Faculty);
    let dashboard = Dashboard::Faculty(FacultyDashboard::new(
      classes,
      fras_mock::generate::student_list(),
    ));
    let mut portal = Portal::new(identity, dashboard, Vec::new(), Vec::new(), today);

    portal.handle_key(KeyCode::Char('k'));
    let Dashboard::Faculty(d) = &portal.dashboard else { unreachable!() };
    assert_eq!(d.selected, Some(2));
  }
}
