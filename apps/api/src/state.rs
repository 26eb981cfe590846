use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::media::MediaStore;
use crate::pages::careers::CareersPage;
use crate::pages::skills::SkillsPage;
use crate::pages::vault::VaultPage;
use crate::session::IdentityProvider;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The external integrations are carried as trait objects so
/// handlers and tests never reach for a hidden global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub media: Arc<dyn MediaStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Config,
    /// Page view state, owned by the controller behind a lock for the
    /// lifetime of the process.
    pub vault: Arc<RwLock<VaultPage>>,
    pub skills: Arc<RwLock<SkillsPage>>,
    pub careers: Arc<RwLock<CareersPage>>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn RecordStore>,
        media: Arc<dyn MediaStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let vault = Arc::new(RwLock::new(VaultPage::new(
            store.clone(),
            config.public_base_url.clone(),
        )));
        let skills = Arc::new(RwLock::new(SkillsPage::new(store.clone())));
        let careers = Arc::new(RwLock::new(CareersPage::new(store.clone())));
        Self {
            store,
            media,
            identity,
            config,
            vault,
            skills,
            careers,
        }
    }
}
