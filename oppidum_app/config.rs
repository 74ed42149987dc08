use dotenvy::dotenv;
use std::env;

pub struct Config {
    /// Multiplies production rates and divides base training, build and
    /// travel times.
    pub game_speed: f64,
    /// Interval of the combat ticker.
    pub combat_tick_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let game_speed = match env::var("OPPIDUM_GAME_SPEED") {
            Ok(val) => val.parse::<f64>().unwrap_or(1.0).clamp(0.1, 50.0),
            Err(_) => 1.0,
        };

        let combat_tick_secs = match env::var("OPPIDUM_COMBAT_TICK_SECS") {
            Ok(val) => val.parse::<u64>().unwrap_or(30).max(1),
            Err(_) => 30,
        };

        Self {
            game_speed,
            combat_tick_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            game_speed: 1.0,
            combat_tick_secs: 30,
        }
    }
}
