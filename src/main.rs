use std::{error::Error, sync::Arc};

use blogspace::{
    config::{Command, Config},
    notify::LogNotifier,
    post::{Draft, Source},
    session::{SessionContext, SqliteStore, User},
    BlogError, Index,
};
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("# BlogSpace #");
    info!("");

    let store = SqliteStore::open(config.store())?;
    let session = SessionContext::new(Arc::new(store));
    let source = Source::from_config(&config);
    let mut index = Index::mount(session.clone(), Arc::new(LogNotifier), move || source.clone()).await;

    match config.command() {
        Command::List => {}
        Command::Login { name, token } => {
            session.store(&User::named(name), &token)?;
            index.login_succeeded().await;
        }
        Command::Publish {
            title,
            content,
            tags,
        } => {
            let Some(dashboard) = index.dashboard_mut() else {
                warn!("Log in before publishing");
                return Ok(());
            };
            dashboard.toggle_form();
            *dashboard.draft_mut() = Draft::new(title, content).with_tags(tags);
            if let Err(e @ BlogError::MissingField(_)) = dashboard.submit().await {
                warn!("{}", e);
            }
        }
        Command::Logout => {
            if let Err(e) = index.logout() {
                warn!("{}", e);
            }
        }
    }

    println!("{}", index.render());
    Ok(())
}
