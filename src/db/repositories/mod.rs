pub mod goal_repository;
pub mod settings_repository;
pub mod user_repository;
pub mod workout_repository;
