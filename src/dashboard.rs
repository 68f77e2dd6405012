use std::{
    fmt::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use log::{debug, info, warn};

use crate::{
    error::{BlogError, Result},
    notify::{Notifier, Toast},
    post::{Draft, Post, PostSource, Published},
    scope::{RequestScope, ScopeHandle},
    session::{Session, SessionContext},
};

pub const LOAD_FAILED: &str = "Failed to fetch blogs";
pub const CREATE_FAILED: &str = "Failed to create blog post";

fn publish_label(publishing: bool) -> &'static str {
    if publishing {
        "Publishing..."
    } else {
        "Publish Blog"
    }
}

/// Read side of the composer's in-flight flag, usable while `submit` runs.
#[derive(Debug, Clone)]
pub struct PublishingHandle {
    flag: Arc<AtomicBool>,
}

impl PublishingHandle {
    pub fn is_publishing(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
    /// What the publish button currently reads.
    pub fn label(&self) -> &'static str {
        publish_label(self.is_publishing())
    }
}

/// Holds the flag up for as long as a publish is pending.
struct Publishing<'a>(&'a AtomicBool);

impl<'a> Publishing<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for Publishing<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The logged-in view: post list plus the new-post composer.
pub struct BlogDashboard<S: PostSource> {
    source: S,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    on_logout: Box<dyn FnMut() + Send>,
    scope: RequestScope,
    posts: Vec<Post>,
    draft: Draft,
    show_form: bool,
    publishing: Arc<AtomicBool>,
}

impl<S: PostSource> BlogDashboard<S> {
    pub fn new(
        source: S,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
        on_logout: impl FnMut() + Send + 'static,
    ) -> Self {
        Self {
            source,
            session,
            notifier,
            on_logout: Box::new(on_logout),
            scope: RequestScope::new(),
            posts: vec![],
            draft: Draft::default(),
            show_form: false,
            publishing: Arc::default(),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }
    pub fn draft(&self) -> &Draft {
        &self.draft
    }
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }
    pub fn is_form_visible(&self) -> bool {
        self.show_form
    }
    pub fn is_loading(&self) -> bool {
        self.publishing.load(Ordering::SeqCst)
    }
    pub fn publishing_handle(&self) -> PublishingHandle {
        PublishingHandle {
            flag: self.publishing.clone(),
        }
    }
    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
    }
    /// Hide the composer, keeping whatever was typed.
    pub fn cancel_form(&mut self) {
        self.show_form = false;
    }
    pub fn scope_handle(&self) -> ScopeHandle {
        self.scope.handle()
    }

    fn current_session(&self) -> Session {
        self.session.read().unwrap_or_else(|e| {
            warn!("{}", e);
            Session::default()
        })
    }

    /// Replace the list with what the source holds now.
    ///
    /// On failure the list is left as it was and one destructive toast is
    /// shown.
    pub async fn load(&mut self) -> Result<()> {
        match self.scope.run(self.source.load()).await {
            Ok(posts) => {
                debug!("{} posts loaded", posts.len());
                self.posts = posts;
                Ok(())
            }
            Err(BlogError::Cancelled) => {
                debug!("load discarded");
                Err(BlogError::Cancelled)
            }
            Err(e) => {
                warn!("Loading posts failed: {}", e);
                self.notifier.notify(Toast::destructive("Error", LOAD_FAILED));
                Err(e)
            }
        }
    }

    /// Publish the draft. Empty title or content never reaches the source.
    pub async fn submit(&mut self) -> Result<()> {
        self.draft.check()?;

        let session = self.current_session();
        let publishing = Publishing::start(&self.publishing);
        let published = self.scope.run(self.source.publish(&self.draft, &session)).await;
        drop(publishing);

        match published {
            Ok(published) => {
                self.draft.clear();
                self.show_form = false;
                self.notifier.notify(Toast::new(
                    "Blog published!",
                    "Your blog post has been published successfully.",
                ));
                match published {
                    Published::Prepend(post) => {
                        info!("Published {}", post.title);
                        self.posts.insert(0, post);
                    }
                    // the list endpoint reports its own failures
                    Published::Reload => {
                        info!("Published, reloading");
                        let _ = self.load().await;
                    }
                }
                Ok(())
            }
            Err(BlogError::Cancelled) => {
                debug!("publish discarded");
                Err(BlogError::Cancelled)
            }
            Err(e) => {
                warn!("Publishing failed: {}", e);
                let description = e.server_message().unwrap_or(CREATE_FAILED).to_string();
                self.notifier.notify(Toast::destructive("Error", description));
                Err(e)
            }
        }
    }

    /// Forget the session and hand control back to the parent view.
    pub fn logout(&mut self) -> Result<()> {
        let cleared = self.session.clear();
        self.notifier.notify(Toast::new(
            "Logged out",
            "You have been logged out successfully.",
        ));
        (self.on_logout)();
        cleared
    }

    pub fn render(&self) -> String {
        let session = self.current_session();
        let name = session.user.as_ref().and_then(|user| user.display_name()).unwrap_or_default();
        let initial = name.chars().next().unwrap_or('U');

        let mut out = String::new();
        let _ = writeln!(out, "BlogSpace  |  Welcome, {}  [{}]", name, initial);
        let _ = writeln!(out);

        if self.show_form {
            let _ = writeln!(out, "+ Create New Blog Post");
            let _ = writeln!(out, "  Title:   {}", self.draft.title);
            let _ = writeln!(out, "  Content: {}", self.draft.content);
            let _ = writeln!(out, "  Tags:    {}", self.draft.tags);
            let _ = writeln!(out, "  [{}]", publish_label(self.is_loading()));
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "Latest Blog Posts");
        for post in &self.posts {
            let _ = writeln!(out);
            let _ = writeln!(out, "## {}", post.title);
            let _ = writeln!(out, "   by {} on {}", post.author, post.created_at);
            let _ = writeln!(out, "   {}", post.excerpt);
            if !post.tags.is_empty() {
                let _ = writeln!(out, "   #{}", post.tags.join(" #"));
            }
            let _ = writeln!(out, "   likes {}  comments {}", post.likes, post.comments);
        }
        out
    }
}

impl<S: PostSource> std::fmt::Debug for BlogDashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogDashboard")
            .field("posts", &self.posts.len())
            .field("draft", &self.draft)
            .field("show_form", &self.show_form)
            .field("publishing", &self.is_loading())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use super::*;
    use crate::{
        notify::RecordingNotifier,
        post::LocalSource,
        session::{KeyValueStore, MemoryStore, User, TOKEN_KEY, USER_KEY},
    };

    fn local_dashboard() -> (BlogDashboard<LocalSource>, RecordingNotifier, Arc<MemoryStore>, Arc<AtomicUsize>) {
        let store = Arc::new(MemoryStore::new());
        let session = SessionContext::new(store.clone());
        session.store(&User::named("Kim"), "t0k3n").unwrap();
        let notifier = RecordingNotifier::default();
        let logouts = Arc::new(AtomicUsize::new(0));
        let counter = logouts.clone();
        let dashboard = BlogDashboard::new(
            LocalSource::new(Duration::ZERO),
            session,
            Arc::new(notifier.clone()),
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        (dashboard, notifier, store, logouts)
    }

    #[tokio::test]
    async fn local_publish_prepends() {
        let (mut dashboard, notifier, _, _) = local_dashboard();
        dashboard.load().await.unwrap();
        assert_eq!(dashboard.posts().len(), 3);

        dashboard.toggle_form();
        *dashboard.draft_mut() = Draft::new("Fresh", "Brand new post").with_tags("rust, , cli ");
        dashboard.submit().await.unwrap();

        let first = &dashboard.posts()[0];
        assert_eq!(dashboard.posts().len(), 4);
        assert_eq!(first.title, "Fresh");
        assert_eq!(first.author, "Kim");
        assert_eq!((first.likes, first.comments), (0, 0));
        assert_eq!(first.tags, vec!["rust", "cli"]);
        assert_eq!(dashboard.draft(), &Draft::default());
        assert!(!dashboard.is_form_visible());
        assert!(!dashboard.is_loading());
        assert_eq!(notifier.toasts()[0].title, "Blog published!");
    }

    #[tokio::test]
    async fn empty_fields_are_rejected_quietly() {
        let (mut dashboard, notifier, _, _) = local_dashboard();
        dashboard.toggle_form();
        *dashboard.draft_mut() = Draft::new("", "content");

        let result = dashboard.submit().await;
        assert!(matches!(result, Err(BlogError::MissingField("title"))));
        assert!(dashboard.posts().is_empty());
        assert!(dashboard.is_form_visible());
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_session_and_calls_back_once() {
        let (mut dashboard, notifier, store, logouts) = local_dashboard();
        dashboard.load().await.unwrap();
        dashboard.logout().unwrap();

        assert_eq!(store.get(USER_KEY).unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(logouts.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.toasts(), vec![Toast::new("Logged out", "You have been logged out successfully.")]);
        assert_eq!(dashboard.posts().len(), 3);
    }

    #[tokio::test]
    async fn cancel_keeps_the_draft() {
        let (mut dashboard, _, _, _) = local_dashboard();
        dashboard.toggle_form();
        dashboard.draft_mut().title = "half written".into();
        dashboard.cancel_form();
        assert!(!dashboard.is_form_visible());
        assert_eq!(dashboard.draft().title, "half written");
    }

    #[tokio::test]
    async fn abandoned_publish_clears_the_flag() {
        let (mut dashboard, _, _, _) = local_dashboard();
        dashboard.source = LocalSource::new(Duration::from_secs(30));
        let handle = dashboard.publishing_handle();
        *dashboard.draft_mut() = Draft::new("Slow", "post");

        let timed_out = tokio::time::timeout(Duration::from_millis(20), dashboard.submit()).await;
        assert!(timed_out.is_err());
        assert!(!handle.is_publishing());
        assert_eq!(handle.label(), "Publish Blog");
    }

    #[tokio::test]
    async fn renders_form_and_posts() {
        let (mut dashboard, _, _, _) = local_dashboard();
        dashboard.load().await.unwrap();
        dashboard.toggle_form();
        dashboard.draft_mut().title = "Draft title".into();

        let page = dashboard.render();
        assert!(page.contains("Welcome, Kim  [K]"));
        assert!(page.contains("Title:   Draft title"));
        assert!(page.contains("## Getting Started with React Development"));
        assert!(page.contains("by Mike Chen on 2024-01-12"));
        assert!(page.contains("#Node.js #API #Backend"));
    }
}
