use crate::api::{ApiClient, SurveyClient};
use crate::auth::AuthClient;
use crate::config::PortalConfig;
use crate::exercise_log::ExerciseLogClient;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub auth: AuthClient,
    pub exercise_log: ExerciseLogClient,
    pub survey: SurveyClient,
}

impl AppState {
    pub fn new(config: PortalConfig) -> Self {
        let api = ApiClient::new(&config.api_base_url);
        Self {
            auth: AuthClient::new(api.clone()),
            exercise_log: ExerciseLogClient::new(api.clone()),
            survey: SurveyClient::new(api),
            config: Arc::new(config),
        }
    }
}
