pub mod forecast;
pub mod goal;
pub mod leaderboard;
pub mod observation;
pub mod settings;
pub mod workout;
