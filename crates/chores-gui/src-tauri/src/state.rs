use anyhow::Context;
use chores_core::config::Config;
use chores_core::service::ChoreService;
use chores_core::store::RestStore;
use chores_shared::AppSettingsDto;
use tracing::info;

pub struct AppState {
    pub service: ChoreService<RestStore>,
    pub settings: AppSettingsDto,
}

impl AppState {
    pub fn new() -> anyhow::Result<Self> {
        let cfg = Config::load(None).context("failed to load chores config")?;
        let endpoint = cfg
            .store
            .endpoint()
            .context("the GUI needs a configured store")?;
        let store = RestStore::new(&endpoint)?;
        info!(
            url = %endpoint.url,
            tasks = %cfg.store.tasks_table,
            categories = %cfg.store.categories_table,
            "connected GUI backend to store"
        );

        Ok(Self {
            service: ChoreService::new(store, &cfg.store),
            settings: cfg.settings(),
        })
    }
}
