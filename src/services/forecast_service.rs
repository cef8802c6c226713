use std::sync::Arc;

use tracing::info;

use crate::db::observation_store::{normalize_exercise, ObservationStore};
use crate::error::{AppError, AppResult};
use crate::models::forecast::{Forecast, ForecastQuery, ForecastReport};
use crate::services::forecast_engine::{ForecastEngine, ForecastRequest};
use crate::services::settings_service::{SettingsService, MAX_DEGREE, MAX_HORIZON_DAYS};

/// Reads one history through the store and projects it under the active policy.
pub struct ForecastService {
    store: Arc<dyn ObservationStore>,
    settings: Arc<SettingsService>,
}

impl ForecastService {
    pub fn new(store: Arc<dyn ObservationStore>, settings: Arc<SettingsService>) -> Self {
        Self { store, settings }
    }

    pub fn forecast(&self, query: &ForecastQuery) -> AppResult<ForecastReport> {
        let settings = self.settings.get()?;
        let request = ForecastRequest {
            horizon_days: query.horizon_days.unwrap_or(settings.default_horizon_days),
            degree: query.degree.unwrap_or(settings.default_degree),
            initial_tier: query.initial_tier.unwrap_or_default(),
        };
        ensure_request_bounds(&request)?;

        let exercise = normalize_exercise(&query.exercise);
        let series = self.store.fetch_series(query.user_id, &exercise)?;
        let report = ForecastEngine::new(settings.policy).forecast_report(
            query.user_id,
            &exercise,
            &series,
            &request,
        )?;

        info!(
            target: "liftcast::forecast",
            user_id = query.user_id,
            exercise = %exercise,
            tier = %report.tier,
            horizon = request.horizon_days,
            "forecast generated"
        );
        Ok(report)
    }

    /// Reps projection only, with the configured defaults.
    pub fn forecast_reps(&self, user_id: i64, exercise: &str) -> AppResult<Vec<Forecast>> {
        let report = self.forecast(&ForecastQuery {
            user_id,
            exercise: exercise.to_string(),
            ..ForecastQuery::default()
        })?;
        Ok(report.reps)
    }
}

fn ensure_request_bounds(request: &ForecastRequest) -> AppResult<()> {
    if request.horizon_days > MAX_HORIZON_DAYS {
        return Err(AppError::validation(format!(
            "forecast horizon must be at most {MAX_HORIZON_DAYS} days"
        )));
    }
    if request.degree > MAX_DEGREE {
        return Err(AppError::validation(format!(
            "curve degree must be at most {MAX_DEGREE}"
        )));
    }
    Ok(())
}
