use std::sync::Arc;

use crate::config::Config;
use crate::delivery::Transport;
use crate::origin::OriginPolicy;

pub type SharedState = Arc<AppState>;

/// Read-only after startup; shared by every request.
pub struct AppState {
    pub config: Config,
    pub origins: OriginPolicy,
    pub transport: Arc<dyn Transport>,
}
