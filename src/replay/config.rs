use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidScale { name: &'static str, value: f64 },
}

/// Parameters of one replay run
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub trace_file: PathBuf,
    /// Inclusive lower bound on trace time, in fractional days
    pub t_start: f64,
    /// Inclusive upper bound on trace time, in fractional days
    pub t_stop: f64,
    /// Scale applied to each row's normalized request count
    pub max_rq_cnt: f64,
    /// Scale applied to sampled lifetime fractions
    pub max_lft: f64,
    /// Scale applied to sampled vCPU fractions
    pub max_vcpu_cnt: f64,
}

impl ReplayConfig {
    /// Reject scale factors that would produce negative lifetimes or sizes.
    ///
    /// The time window is not checked; a reversed or NaN window keeps no rows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("max_rq_cnt", self.max_rq_cnt),
            ("max_lft", self.max_lft),
            ("max_vcpu_cnt", self.max_vcpu_cnt),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidScale { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ReplayConfig {
        ReplayConfig {
            trace_file: PathBuf::from("trace.csv"),
            t_start: 0.8,
            t_stop: 0.9,
            max_rq_cnt: 5.0,
            max_lft: 0.00277778,
            max_vcpu_cnt: 12.0,
        }
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(config().validate(), Ok(()));
    }

    #[test]
    fn test_window_bounds_not_validated() {
        let reversed = ReplayConfig { t_start: 1.0, t_stop: 0.5, ..config() };
        assert_eq!(reversed.validate(), Ok(()));
        let nan = ReplayConfig { t_start: f64::NAN, ..config() };
        assert_eq!(nan.validate(), Ok(()));
    }

    #[test]
    fn test_negative_scale_rejected() {
        let cfg = ReplayConfig { max_vcpu_cnt: -1.0, ..config() };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidScale { name: "max_vcpu_cnt", value: -1.0 })
        );
    }
}
