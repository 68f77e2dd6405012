use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{info, warn};

use crate::{
    dashboard::BlogDashboard,
    error::{BlogError, Result},
    notify::Notifier,
    post::PostSource,
    session::SessionContext,
};

enum View<S: PostSource> {
    Login,
    Dashboard(BlogDashboard<S>),
}

/// Shows the dashboard to a logged-in user and the login form otherwise.
pub struct Index<S: PostSource> {
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    make_source: Box<dyn Fn() -> S + Send>,
    logged_out: Arc<AtomicBool>,
    view: View<S>,
}

impl<S: PostSource> Index<S> {
    /// Starts authenticated when an identity is already stored.
    pub async fn mount(
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
        make_source: impl Fn() -> S + Send + 'static,
    ) -> Self {
        let mut index = Self {
            session,
            notifier,
            make_source: Box::new(make_source),
            logged_out: Arc::new(AtomicBool::new(false)),
            view: View::Login,
        };

        match index.session.has_user() {
            Ok(true) => index.enter_dashboard().await,
            Ok(false) => info!("No stored session, showing login"),
            Err(e) => warn!("Cannot read session: {}", e),
        }
        index
    }

    /// The login form reported success.
    pub async fn login_succeeded(&mut self) {
        if !self.is_authenticated() {
            self.enter_dashboard().await;
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.view, View::Dashboard(_)) && !self.logged_out.load(Ordering::SeqCst)
    }

    pub fn dashboard_mut(&mut self) -> Option<&mut BlogDashboard<S>> {
        self.apply_logout();
        match &mut self.view {
            View::Dashboard(dashboard) => Some(dashboard),
            View::Login => None,
        }
    }

    pub fn logout(&mut self) -> Result<()> {
        let result = match &mut self.view {
            View::Dashboard(dashboard) => dashboard.logout(),
            View::Login => Err(BlogError::NotAuthenticated),
        };
        self.apply_logout();
        result
    }

    pub fn render(&self) -> String {
        match &self.view {
            View::Dashboard(dashboard) if self.is_authenticated() => dashboard.render(),
            _ => "BlogSpace\n\nPlease log in: blogspace login --name <name> --token <token>\n".to_string(),
        }
    }

    async fn enter_dashboard(&mut self) {
        self.logged_out.store(false, Ordering::SeqCst);
        let logged_out = self.logged_out.clone();
        let mut dashboard = BlogDashboard::new(
            (self.make_source)(),
            self.session.clone(),
            self.notifier.clone(),
            move || logged_out.store(true, Ordering::SeqCst),
        );
        // failures were already shown to the user
        let _ = dashboard.load().await;
        self.view = View::Dashboard(dashboard);
    }

    /// Drops the dashboard, and with it its pending requests.
    fn apply_logout(&mut self) {
        if self.logged_out.swap(false, Ordering::SeqCst) {
            info!("Logged out, showing login");
            self.view = View::Login;
        }
    }
}
