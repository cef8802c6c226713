use crate::models::forecast::{Forecast, ForecastQuery, ForecastReport};

use super::{AppState, CommandResult};

pub fn forecast_generate(state: &AppState, query: ForecastQuery) -> CommandResult<ForecastReport> {
    state.forecasts().forecast(&query).map_err(Into::into)
}

pub fn forecast_reps(state: &AppState, user_id: i64, exercise: String) -> CommandResult<Vec<Forecast>> {
    state
        .forecasts()
        .forecast_reps(user_id, &exercise)
        .map_err(Into::into)
}
