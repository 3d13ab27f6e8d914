// src/domain/criteria.rs

use crate::errors::ConfigError;

/// Inclusive acceptance bounds for a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub rent_min: u64,
    pub rent_max: u64,
    pub rooms_min: f64,
    pub rooms_max: f64,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            rent_min: 1100,
            rent_max: 1700,
            rooms_min: 1.5,
            rooms_max: 3.0,
        }
    }
}

impl FilterCriteria {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rent_min > self.rent_max {
            return Err(ConfigError::Invalid(format!(
                "rent range is empty: {} > {}",
                self.rent_min, self.rent_max
            )));
        }
        if self.rooms_min.is_nan() || self.rooms_max.is_nan() || self.rooms_min > self.rooms_max {
            return Err(ConfigError::Invalid(format!(
                "rooms range is empty: {} > {}",
                self.rooms_min, self.rooms_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_are_valid() {
        assert!(FilterCriteria::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let rent = FilterCriteria {
            rent_min: 2000,
            rent_max: 1000,
            ..FilterCriteria::default()
        };
        assert!(rent.validate().is_err());

        let rooms = FilterCriteria {
            rooms_min: 4.0,
            rooms_max: 2.0,
            ..FilterCriteria::default()
        };
        assert!(rooms.validate().is_err());
    }
}
