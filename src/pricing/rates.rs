use crate::pricing::models::{DistanceBand, VehicleType};

/// Upper bound (inclusive) of the short band, in miles
pub const SHORT_BAND_MAX_MILES: f64 = 500.0;
/// Upper bound (inclusive) of the mid band, in miles
pub const MID_BAND_MAX_MILES: f64 = 1500.0;

/// Per-mile base rates for one vehicle class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCard {
    pub short: f64,
    pub mid: f64,
    pub long: f64,
    pub accident: f64,
}

impl RateCard {
    pub fn for_band(&self, band: DistanceBand) -> f64 {
        match band {
            DistanceBand::Short => self.short,
            DistanceBand::Mid => self.mid,
            DistanceBand::Long => self.long,
        }
    }
}

pub fn rate_card(vehicle: VehicleType) -> RateCard {
    match vehicle {
        VehicleType::Sedan => RateCard {
            short: 1.80,
            mid: 0.95,
            long: 0.60,
            accident: 2.50,
        },
        VehicleType::Suv => RateCard {
            short: 2.00,
            mid: 1.05,
            long: 0.70,
            accident: 2.75,
        },
        VehicleType::Truck => RateCard {
            short: 2.20,
            mid: 1.15,
            long: 0.75,
            accident: 3.00,
        },
    }
}

pub fn miles_to_band(miles: f64) -> DistanceBand {
    if miles <= SHORT_BAND_MAX_MILES {
        DistanceBand::Short
    } else if miles <= MID_BAND_MAX_MILES {
        DistanceBand::Mid
    } else {
        DistanceBand::Long
    }
}

/// Accident recovery bypasses the band rate entirely
pub fn base_rate_per_mile(vehicle: VehicleType, band: DistanceBand, is_accident_recovery: bool) -> f64 {
    let card = rate_card(vehicle);
    if is_accident_recovery {
        card.accident
    } else {
        card.for_band(band)
    }
}

pub fn bulk_discount_percent(vehicle_count: u32) -> u32 {
    match vehicle_count {
        0..=2 => 0,
        3..=5 => 10,
        6..=9 => 15,
        _ => 20,
    }
}

/// Round a currency or distance value to 2 decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(miles_to_band(0.0), DistanceBand::Short);
        assert_eq!(miles_to_band(500.0), DistanceBand::Short);
        assert_eq!(miles_to_band(500.01), DistanceBand::Mid);
        assert_eq!(miles_to_band(501.0), DistanceBand::Mid);
        assert_eq!(miles_to_band(1500.0), DistanceBand::Mid);
        assert_eq!(miles_to_band(1500.01), DistanceBand::Long);
    }

    #[test]
    fn test_bulk_discount_boundaries() {
        assert_eq!(bulk_discount_percent(1), 0);
        assert_eq!(bulk_discount_percent(2), 0);
        assert_eq!(bulk_discount_percent(3), 10);
        assert_eq!(bulk_discount_percent(5), 10);
        assert_eq!(bulk_discount_percent(6), 15);
        assert_eq!(bulk_discount_percent(9), 15);
        assert_eq!(bulk_discount_percent(10), 20);
        assert_eq!(bulk_discount_percent(250), 20);
    }

    #[test]
    fn test_rate_table() {
        assert_eq!(base_rate_per_mile(VehicleType::Sedan, DistanceBand::Short, false), 1.80);
        assert_eq!(base_rate_per_mile(VehicleType::Suv, DistanceBand::Mid, false), 1.05);
        assert_eq!(base_rate_per_mile(VehicleType::Truck, DistanceBand::Long, false), 0.75);
    }

    #[test]
    fn test_accident_rate_ignores_band() {
        for band in [DistanceBand::Short, DistanceBand::Mid, DistanceBand::Long] {
            assert_eq!(base_rate_per_mile(VehicleType::Sedan, band, true), 2.50);
            assert_eq!(base_rate_per_mile(VehicleType::Suv, band, true), 2.75);
            assert_eq!(base_rate_per_mile(VehicleType::Truck, band, true), 3.00);
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(720.0000000001), 720.0);
        assert_eq!(round2(89.82686), 89.83);
        assert_eq!(round2(0.0), 0.0);
    }
}
