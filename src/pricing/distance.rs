//! Distance estimation from whatever location facts are available
//!
//! Sources are tried in a fixed order and the first usable one wins:
//! coordinates, ZIP codes, state codes, states parsed from addresses, and
//! finally a fixed default. Partial data from different sources is never
//! blended.

use regex::Regex;
use std::sync::LazyLock;

use crate::pricing::models::{
    Confidence, Coordinates, DistanceBasis, DistanceEstimate, DistanceSource,
    ShipmentPricingRequest,
};
use crate::pricing::rates::round2;

pub const EARTH_RADIUS_MILES: f64 = 3959.0;
/// Straight-line to road distance correction
pub const ROAD_DISTANCE_FACTOR: f64 = 1.3;

pub const SAME_ZIP_MILES: f64 = 25.0;
pub const DIFFERENT_ZIP_MILES: f64 = 250.0;
pub const SAME_STATE_MILES: f64 = 300.0;
pub const DIFFERENT_STATE_MILES: f64 = 800.0;
pub const DEFAULT_DISTANCE_MILES: f64 = 500.0;

static STATE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{2}\b").unwrap()
});

/// Great-circle distance in miles (no road correction)
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Last standalone 2-letter uppercase token in a free-text address
pub fn extract_state_code(address: &str) -> Option<&str> {
    STATE_CODE_RE.find_iter(address).last().map(|m| m.as_str())
}

pub fn estimate_distance(request: &ShipmentPricingRequest) -> DistanceEstimate {
    if let Some((pickup, delivery)) = request.coordinate_pair() {
        return DistanceEstimate {
            miles: round2(haversine_miles(pickup, delivery) * ROAD_DISTANCE_FACTOR),
            source: DistanceSource::Haversine,
            confidence: Confidence::Medium,
            basis: DistanceBasis::Coordinates,
        };
    }

    if let Some((pickup, delivery)) = request.zip_pair() {
        let miles = if pickup == delivery {
            SAME_ZIP_MILES
        } else {
            DIFFERENT_ZIP_MILES
        };
        return user_provided(miles, DistanceBasis::ZipCodes);
    }

    if let Some((pickup, delivery)) = request.state_pair() {
        return user_provided(state_distance(pickup, delivery), DistanceBasis::States);
    }

    if let Some((pickup, delivery)) = request.address_pair() {
        if let (Some(from), Some(to)) = (extract_state_code(pickup), extract_state_code(delivery)) {
            return user_provided(state_distance(from, to), DistanceBasis::AddressStates);
        }
    }

    default_distance()
}

/// The distance used when nothing usable was supplied
pub fn default_distance() -> DistanceEstimate {
    user_provided(DEFAULT_DISTANCE_MILES, DistanceBasis::Default)
}

fn user_provided(miles: f64, basis: DistanceBasis) -> DistanceEstimate {
    DistanceEstimate {
        miles,
        source: DistanceSource::UserProvided,
        confidence: Confidence::Low,
        basis,
    }
}

fn state_distance(from: &str, to: &str) -> f64 {
    if from.eq_ignore_ascii_case(to) {
        SAME_STATE_MILES
    } else {
        DIFFERENT_STATE_MILES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_one_degree_on_equator() {
        let miles = haversine_miles(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((miles - 69.0976).abs() < 0.001, "got {miles}");
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let point = Coordinates::new(34.0522, -118.2437);
        assert_eq!(haversine_miles(point, point), 0.0);
    }

    #[test]
    fn test_coordinates_apply_road_factor() {
        let request = ShipmentPricingRequest::new("sedan")
            .with_locations(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        let distance = estimate_distance(&request);

        assert_eq!(distance.miles, 89.83);
        assert_eq!(distance.source, DistanceSource::Haversine);
        assert_eq!(distance.confidence, Confidence::Medium);
        assert_eq!(distance.basis, DistanceBasis::Coordinates);
    }

    #[test]
    fn test_coordinates_win_over_zip_and_state() {
        let request = ShipmentPricingRequest::new("sedan")
            .with_locations(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0))
            .with_zips("90210", "90210")
            .with_states("CA", "NY");
        let distance = estimate_distance(&request);

        assert_eq!(distance.source, DistanceSource::Haversine);
        assert_eq!(distance.miles, 89.83);
    }

    #[test]
    fn test_zip_distance() {
        let same = ShipmentPricingRequest::new("sedan").with_zips("90210", "90210");
        assert_eq!(estimate_distance(&same).miles, SAME_ZIP_MILES);

        let different = ShipmentPricingRequest::new("sedan")
            .with_zips("90210", "10001")
            .with_states("CA", "CA");
        let distance = estimate_distance(&different);
        assert_eq!(distance.miles, DIFFERENT_ZIP_MILES);
        assert_eq!(distance.basis, DistanceBasis::ZipCodes);
        assert_eq!(distance.confidence, Confidence::Low);
    }

    #[test]
    fn test_state_distance() {
        let same = ShipmentPricingRequest::new("sedan").with_states("TX", "tx");
        assert_eq!(estimate_distance(&same).miles, SAME_STATE_MILES);

        let different = ShipmentPricingRequest::new("sedan").with_states("TX", "CA");
        let distance = estimate_distance(&different);
        assert_eq!(distance.miles, DIFFERENT_STATE_MILES);
        assert_eq!(distance.basis, DistanceBasis::States);
    }

    #[test]
    fn test_single_sided_data_does_not_blend() {
        // Pickup coordinates with a delivery ZIP is not a usable pair of anything
        let mut request = ShipmentPricingRequest::new("sedan");
        request.pickup_location = Some(Coordinates::new(34.0, -118.0));
        request.delivery_zip = Some("10001".to_string());
        request.pickup_state = Some("CA".to_string());

        assert_eq!(estimate_distance(&request), default_distance());
    }

    #[test]
    fn test_extract_state_code_takes_last_match() {
        assert_eq!(extract_state_code("123 Main St, Austin, TX 78701"), Some("TX"));
        assert_eq!(extract_state_code("NY warehouse, Newark, NJ"), Some("NJ"));
        assert_eq!(extract_state_code("1 Infinite Loop, Cupertino, CA 95014, USA"), Some("CA"));
        assert_eq!(extract_state_code("somewhere without a state"), None);
    }

    #[test]
    fn test_address_states() {
        let request = ShipmentPricingRequest::new("sedan")
            .with_addresses("10 Elm St, Dallas, TX 75201", "500 Oak Ave, Houston, TX 77002");
        let distance = estimate_distance(&request);
        assert_eq!(distance.miles, SAME_STATE_MILES);
        assert_eq!(distance.basis, DistanceBasis::AddressStates);

        let request = ShipmentPricingRequest::new("sedan")
            .with_addresses("10 Elm St, Dallas, TX 75201", "1 Market St, San Francisco, CA");
        assert_eq!(estimate_distance(&request).miles, DIFFERENT_STATE_MILES);
    }

    #[test]
    fn test_address_without_state_falls_through() {
        let request = ShipmentPricingRequest::new("sedan")
            .with_addresses("10 Elm St, Dallas, TX 75201", "somewhere in the hills");
        assert_eq!(estimate_distance(&request), default_distance());
    }

    #[test]
    fn test_invalid_coordinates_fall_through_to_zip() {
        let request = ShipmentPricingRequest::new("sedan")
            .with_locations(Coordinates::new(120.0, 0.0), Coordinates::new(0.0, 1.0))
            .with_zips("90210", "90210");
        let distance = estimate_distance(&request);
        assert_eq!(distance.basis, DistanceBasis::ZipCodes);
        assert_eq!(distance.miles, SAME_ZIP_MILES);
    }

    #[test]
    fn test_nothing_usable_uses_default() {
        let distance = estimate_distance(&ShipmentPricingRequest::new("sedan"));
        assert_eq!(distance.miles, DEFAULT_DISTANCE_MILES);
        assert_eq!(distance.source, DistanceSource::UserProvided);
        assert_eq!(distance.confidence, Confidence::Low);
        assert_eq!(distance.basis, DistanceBasis::Default);
    }
}
