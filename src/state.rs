use std::sync::Arc;

use crate::config::Config;
use crate::email::EmailSender;
use crate::sheets::SheetsClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    /// `None` when the service-account variables are missing.
    pub sheets: Option<SheetsClient>,
    pub mailer: Arc<dyn EmailSender>,
}
