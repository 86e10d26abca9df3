//! Drive modes the simulator can exercise.

use routetrace_core::StrategyConfig;

/// Which animation strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    /// Timer fires every interval and adds a fixed step
    FixedTick,

    /// Per-frame callback turns elapsed time into progress
    FrameDriven,
}

impl DriveMode {
    /// Returns a list of all modes.
    pub fn all() -> Vec<DriveMode> {
        vec![DriveMode::FixedTick, DriveMode::FrameDriven]
    }

    /// Returns the mode name.
    pub fn name(&self) -> &'static str {
        match self {
            DriveMode::FixedTick => "fixed_tick",
            DriveMode::FrameDriven => "frame_driven",
        }
    }

    /// Returns a description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            DriveMode::FixedTick => "Tick every 3 s, +5% per tick, 20 ticks to arrive",
            DriveMode::FrameDriven => "~60 FPS frames, elapsed / journey, one minute to arrive",
        }
    }

    /// Default strategy parameters for this mode.
    pub fn default_strategy(&self) -> StrategyConfig {
        match self {
            DriveMode::FixedTick => StrategyConfig::default(),
            DriveMode::FrameDriven => StrategyConfig::frame_driven(),
        }
    }

    /// The mode a strategy configuration belongs to.
    pub fn of(strategy: &StrategyConfig) -> DriveMode {
        match strategy {
            StrategyConfig::FixedTick { .. } => DriveMode::FixedTick,
            StrategyConfig::FrameDriven { .. } => DriveMode::FrameDriven,
        }
    }
}

impl std::fmt::Display for DriveMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DriveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed_tick" | "fixedtick" | "tick" | "interval" => Ok(DriveMode::FixedTick),
            "frame_driven" | "framedriven" | "frame" | "raf" => Ok(DriveMode::FrameDriven),
            _ => Err(format!("Unknown drive mode: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("tick".parse::<DriveMode>().unwrap(), DriveMode::FixedTick);
        assert_eq!("Frame_Driven".parse::<DriveMode>().unwrap(), DriveMode::FrameDriven);
        assert!("warp".parse::<DriveMode>().is_err());
    }

    #[test]
    fn test_name_round_trips_through_from_str() {
        for mode in DriveMode::all() {
            assert_eq!(mode.name().parse::<DriveMode>().unwrap(), mode);
            assert_eq!(DriveMode::of(&mode.default_strategy()), mode);
        }
    }
}
