pub mod confidence_estimator;
pub mod curve_fitter;
pub mod forecast_engine;
pub mod growth_governor;
pub mod leaderboard_ranker;
pub mod series_builder;
pub mod tier_classifier;

pub mod forecast_service;
pub mod goal_service;
pub mod leaderboard_service;
pub mod settings_service;
pub mod workout_service;
