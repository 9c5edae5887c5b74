//! Distribution families and estimation/simulation modes.

use crate::domain::error::StocksimError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistributionKind {
    Normal,
    Lognormal,
    Uniform,
}

impl DistributionKind {
    pub const ALL: [DistributionKind; 3] = [
        DistributionKind::Normal,
        DistributionKind::Lognormal,
        DistributionKind::Uniform,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DistributionKind::Normal => "normal",
            DistributionKind::Lognormal => "lognormal",
            DistributionKind::Uniform => "uniform",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DistributionKind {
    type Err = StocksimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(DistributionKind::Normal),
            "lognormal" => Ok(DistributionKind::Lognormal),
            "uniform" => Ok(DistributionKind::Uniform),
            _ => Err(StocksimError::UnknownDistribution {
                name: s.to_string(),
            }),
        }
    }
}

/// How distribution parameters are estimated from a price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EstimationMode {
    /// Statistics over raw price levels.
    PriceLevel,
    /// Statistics over consecutive log-returns.
    #[default]
    LogReturn,
}

impl EstimationMode {
    pub fn name(self) -> &'static str {
        match self {
            EstimationMode::PriceLevel => "price_level",
            EstimationMode::LogReturn => "log_return",
        }
    }

    pub fn simulation_mode(self) -> SimulationMode {
        match self {
            EstimationMode::PriceLevel => SimulationMode::Additive,
            EstimationMode::LogReturn => SimulationMode::Multiplicative,
        }
    }
}

impl fmt::Display for EstimationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EstimationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "price_level" => Ok(EstimationMode::PriceLevel),
            "log_return" => Ok(EstimationMode::LogReturn),
            other => Err(format!(
                "unknown estimation mode '{}' (expected price_level or log_return)",
                other
            )),
        }
    }
}

/// How a sampled value is applied to the running price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationMode {
    /// price + sample
    Additive,
    /// price * exp(sample)
    Multiplicative,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!("normal".parse::<DistributionKind>().unwrap(), DistributionKind::Normal);
        assert_eq!(
            "LogNormal".parse::<DistributionKind>().unwrap(),
            DistributionKind::Lognormal
        );
        assert_eq!(
            " uniform ".parse::<DistributionKind>().unwrap(),
            DistributionKind::Uniform
        );
    }

    #[test]
    fn parse_unknown_kind_fails() {
        let err = "poisson".parse::<DistributionKind>().unwrap_err();
        match err {
            StocksimError::UnknownDistribution { name } => assert_eq!(name, "poisson"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for kind in DistributionKind::ALL {
            assert_eq!(kind.to_string().parse::<DistributionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn estimation_mode_parse() {
        assert_eq!(
            "price_level".parse::<EstimationMode>().unwrap(),
            EstimationMode::PriceLevel
        );
        assert_eq!(
            "log-return".parse::<EstimationMode>().unwrap(),
            EstimationMode::LogReturn
        );
        assert!("garch".parse::<EstimationMode>().is_err());
    }

    #[test]
    fn estimation_mode_selects_simulation_mode() {
        assert_eq!(
            EstimationMode::PriceLevel.simulation_mode(),
            SimulationMode::Additive
        );
        assert_eq!(
            EstimationMode::LogReturn.simulation_mode(),
            SimulationMode::Multiplicative
        );
    }

    #[test]
    fn default_mode_is_log_return() {
        assert_eq!(EstimationMode::default(), EstimationMode::LogReturn);
    }
}
