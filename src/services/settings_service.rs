use std::fs;
use std::path::Path;
use std::sync::RwLock;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::migrations::KEY_ENGINE_SETTINGS;
use crate::db::repositories::settings_repository::SettingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::{Ceiling, EngineSettings, ForecastPolicy};

pub const MAX_HORIZON_DAYS: usize = 60;
pub const MAX_DEGREE: usize = 6;
const SNAPSHOT_TIME_FORMAT: &str = "%H:%M";

/// Partial update. `None` leaves the current value in place; a provided
/// `policy` replaces the whole policy block.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsUpdateInput {
    pub policy: Option<ForecastPolicy>,
    pub default_horizon_days: Option<usize>,
    pub default_degree: Option<usize>,
    pub leaderboard_snapshot_time: Option<String>,
}

pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<EngineSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> AppResult<Self> {
        Ok(Self {
            db,
            cache: RwLock::new(None),
        })
    }

    pub fn get(&self) -> AppResult<EngineSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load_settings_from_db()?;
        self.store_in_cache(&settings);
        Ok(settings)
    }

    /// Active forecast policy.
    pub fn policy(&self) -> AppResult<ForecastPolicy> {
        Ok(self.get()?.policy)
    }

    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<EngineSettings> {
        let mut next = self.get()?;

        if let Some(policy) = input.policy {
            next.policy = policy;
        }
        if let Some(horizon) = input.default_horizon_days {
            next.default_horizon_days = horizon;
        }
        if let Some(degree) = input.default_degree {
            next.default_degree = degree;
        }
        if let Some(time) = input.leaderboard_snapshot_time {
            next.leaderboard_snapshot_time = time.trim().to_string();
        }

        validate_settings(&next)?;
        self.persist(next)
    }

    /// Applies a YAML document shaped like [`SettingsUpdateInput`].
    pub fn import_yaml(&self, path: &Path) -> AppResult<EngineSettings> {
        let raw = fs::read_to_string(path)?;
        let input: SettingsUpdateInput = serde_yaml::from_str(&raw)?;
        info!(
            target: "liftcast::settings",
            path = %path.display(),
            "importing engine settings from yaml"
        );
        self.update(input)
    }

    pub fn reset(&self) -> AppResult<EngineSettings> {
        self.persist(EngineSettings::default())
    }

    fn persist(&self, mut settings: EngineSettings) -> AppResult<EngineSettings> {
        settings.updated_at = None;
        let updated_at = self.db.with_connection(|conn| {
            SettingsRepository::upsert_json(conn, KEY_ENGINE_SETTINGS, &settings)?;
            Ok(SettingsRepository::get(conn, KEY_ENGINE_SETTINGS)?.map(|row| row.updated_at))
        })?;

        settings.updated_at = updated_at;
        self.store_in_cache(&settings);
        info!(target: "liftcast::settings", "engine settings saved");
        Ok(settings)
    }

    fn load_settings_from_db(&self) -> AppResult<EngineSettings> {
        self.db.with_connection(|conn| {
            let Some(row) = SettingsRepository::get(conn, KEY_ENGINE_SETTINGS)? else {
                return Ok(EngineSettings::default());
            };

            match serde_json::from_str::<EngineSettings>(&row.value) {
                Ok(mut settings) => {
                    settings.updated_at = Some(row.updated_at);
                    Ok(settings)
                }
                Err(err) => {
                    warn!(
                        target: "liftcast::settings",
                        error = %err,
                        "stored engine settings are unreadable, using defaults"
                    );
                    Ok(EngineSettings::default())
                }
            }
        })
    }

    fn store_in_cache(&self, settings: &EngineSettings) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
    }
}

pub fn validate_settings(settings: &EngineSettings) -> AppResult<()> {
    validate_policy(&settings.policy)?;

    if !(1..=MAX_HORIZON_DAYS).contains(&settings.default_horizon_days) {
        return Err(AppError::config(format!(
            "default horizon must be between 1 and {MAX_HORIZON_DAYS} days"
        )));
    }
    if !(1..=MAX_DEGREE).contains(&settings.default_degree) {
        return Err(AppError::config(format!(
            "default degree must be between 1 and {MAX_DEGREE}"
        )));
    }

    parse_snapshot_time(&settings.leaderboard_snapshot_time)?;
    Ok(())
}

pub fn validate_policy(policy: &ForecastPolicy) -> AppResult<()> {
    let governor = &policy.governor;
    for (name, value) in [
        ("weightGrowthRate", governor.weight_growth_rate),
        ("repsGrowthRate", governor.reps_growth_rate),
        ("highLoadRepsBoost", governor.high_load_reps_boost),
        ("lowLoadWeightPush", governor.low_load_weight_push),
        ("lowLoadRepsDamping", governor.low_load_reps_damping),
    ] {
        ensure_rate(name, value)?;
    }

    for (name, value) in [
        ("highLoadRatio", governor.high_load_ratio),
        ("lowLoadRatio", governor.low_load_ratio),
        ("highLoadDamping", governor.high_load_damping),
        ("promotionRatio", policy.promotion_ratio),
        ("smallSampleFactor", policy.confidence.small_sample_factor),
    ] {
        ensure_ratio(name, value)?;
    }

    if !(governor.max_growth_step.is_finite() && governor.max_growth_step >= 0.0) {
        return Err(AppError::config("maxGrowthStep must be zero or positive"));
    }

    let confidence = &policy.confidence;
    if !(confidence.floor.is_finite() && confidence.floor >= 0.0) {
        return Err(AppError::config("confidence floor must be zero or positive"));
    }
    if !(confidence.z_score.is_finite() && confidence.z_score > 0.0) {
        return Err(AppError::config("zScore must be positive"));
    }

    let ceilings = &policy.ceilings;
    ensure_ceiling("intermediate", &ceilings.intermediate)?;
    ensure_ceiling("expert", &ceilings.expert)?;
    if ceilings.expert.max_reps < ceilings.intermediate.max_reps
        || ceilings.expert.max_weight < ceilings.intermediate.max_weight
    {
        return Err(AppError::config(
            "expert ceilings must not be lower than intermediate ceilings",
        ));
    }

    Ok(())
}

pub fn parse_snapshot_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), SNAPSHOT_TIME_FORMAT).map_err(|_| {
        AppError::config(format!("snapshot time must be HH:MM, got '{value}'"))
    })
}

fn ensure_rate(name: &str, value: f64) -> AppResult<()> {
    if (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(AppError::config(format!("{name} must be in [0, 1), got {value}")))
    }
}

fn ensure_ratio(name: &str, value: f64) -> AppResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(AppError::config(format!("{name} must be in (0, 1], got {value}")))
    }
}

fn ensure_ceiling(tier: &str, ceiling: &Ceiling) -> AppResult<()> {
    let valid = |value: f64| value.is_finite() && value > 0.0;
    if valid(ceiling.max_reps) && valid(ceiling.max_weight) {
        Ok(())
    } else {
        Err(AppError::config(format!("{tier} ceilings must be positive")))
    }
}
