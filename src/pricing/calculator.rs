use crate::pricing::distance::estimate_distance;
use crate::pricing::models::{
    Confidence, DistanceEstimate, EstimateType, PriceEstimate, PriceRange, PricingBreakdown,
    PricingData, PricingFactors, ShipmentPricingRequest,
};
use crate::pricing::rates::{base_rate_per_mile, bulk_discount_percent, miles_to_band, round2};

/// Stateless shipment price calculator
///
/// Holds no data; every call is independent and gives the same output for
/// the same input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceCalculator;

impl PriceCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Estimate a price from whatever location data the request carries
    pub fn estimate(&self, request: &ShipmentPricingRequest) -> PricingData {
        self.estimate_with_distance(request, estimate_distance(request))
    }

    /// Price a request against an already known distance
    pub fn estimate_with_distance(
        &self,
        request: &ShipmentPricingRequest,
        distance: DistanceEstimate,
    ) -> PricingData {
        let breakdown = self.calculate_breakdown(request, distance.miles);

        let has_coordinates = request.coordinate_pair().is_some();
        let has_addresses = request.address_pair().is_some();
        let confidence = overall_confidence(distance.confidence, has_coordinates, has_addresses);

        PricingData {
            estimate: PriceEstimate {
                total: breakdown.total,
                range: price_range(breakdown.total, confidence),
                confidence,
                kind: EstimateType::Estimate,
            },
            breakdown,
            distance,
            factors: PricingFactors {
                has_accurate_distance: distance.confidence != Confidence::Low,
                has_coordinates,
                has_addresses,
            },
        }
    }

    pub fn calculate_breakdown(
        &self,
        request: &ShipmentPricingRequest,
        distance_miles: f64,
    ) -> PricingBreakdown {
        let band = miles_to_band(distance_miles);
        let rate = base_rate_per_mile(request.vehicle(), band, request.is_accident_recovery);
        let discount_percent = bulk_discount_percent(request.effective_vehicle_count());
        let mut surge = request.effective_surge_multiplier();

        // Full precision is carried through; only reported fields are rounded
        let raw_base_price = rate * distance_miles;
        let discount_amount = raw_base_price * f64::from(discount_percent) / 100.0;
        let mut subtotal = (raw_base_price - discount_amount) * surge;

        // A surge that overflows the price is ignored like a non-finite one
        if !subtotal.is_finite() {
            surge = 1.0;
            subtotal = raw_base_price - discount_amount;
        }
        let total = if subtotal > 0.0 { subtotal } else { 0.0 };

        PricingBreakdown {
            base_rate_per_mile: rate,
            distance_band: band,
            raw_base_price: round2(raw_base_price),
            bulk_discount_percent: discount_percent,
            bulk_discount_amount: round2(discount_amount),
            surge_multiplier: surge,
            total: round2(total),
        }
    }
}

/// Estimate with a fresh calculator
pub fn estimate(request: &ShipmentPricingRequest) -> PricingData {
    PriceCalculator::new().estimate(request)
}

/// Combine distance confidence with how much identifying data was supplied
///
/// Coordinates and addresses together keep the distance confidence as is;
/// either one alone caps it at medium; neither leaves it low.
pub fn overall_confidence(
    distance_confidence: Confidence,
    has_coordinates: bool,
    has_addresses: bool,
) -> Confidence {
    match (has_coordinates, has_addresses) {
        (true, true) => distance_confidence,
        (true, false) | (false, true) => {
            if distance_confidence == Confidence::Low {
                Confidence::Low
            } else {
                Confidence::Medium
            }
        }
        (false, false) => Confidence::Low,
    }
}

/// Customer-facing range around a total, each bound rounded on its own
pub fn price_range(total: f64, confidence: Confidence) -> PriceRange {
    let spread = confidence.range_percent() / 100.0;
    PriceRange {
        min: round2(total * (1.0 - spread)),
        max: round2(total * (1.0 + spread)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{Coordinates, DistanceBand};

    #[test]
    fn test_breakdown_without_discount() {
        let request = ShipmentPricingRequest::new("sedan");
        let breakdown = PriceCalculator::new().calculate_breakdown(&request, 400.0);

        assert_eq!(breakdown.distance_band, DistanceBand::Short);
        assert_eq!(breakdown.base_rate_per_mile, 1.80);
        assert_eq!(breakdown.raw_base_price, 720.0);
        assert_eq!(breakdown.bulk_discount_percent, 0);
        assert_eq!(breakdown.bulk_discount_amount, 0.0);
        assert_eq!(breakdown.surge_multiplier, 1.0);
        assert_eq!(breakdown.total, 720.0);
    }

    #[test]
    fn test_breakdown_with_bulk_discount_and_surge() {
        let request = ShipmentPricingRequest::new("suv")
            .with_vehicle_count(6)
            .with_surge_multiplier(1.5);
        let breakdown = PriceCalculator::new().calculate_breakdown(&request, 1000.0);

        // 1.05 * 1000 = 1050, minus 15% = 892.50, times 1.5 = 1338.75
        assert_eq!(breakdown.distance_band, DistanceBand::Mid);
        assert_eq!(breakdown.raw_base_price, 1050.0);
        assert_eq!(breakdown.bulk_discount_percent, 15);
        assert_eq!(breakdown.bulk_discount_amount, 157.5);
        assert_eq!(breakdown.total, 1338.75);
    }

    #[test]
    fn test_negative_surge_floors_at_zero() {
        let request = ShipmentPricingRequest::new("sedan").with_surge_multiplier(-1.0);
        let breakdown = PriceCalculator::new().calculate_breakdown(&request, 400.0);

        assert_eq!(breakdown.surge_multiplier, -1.0);
        assert_eq!(breakdown.total, 0.0);
        assert!(breakdown.total.is_sign_positive());
    }

    #[test]
    fn test_non_finite_surge_is_ignored() {
        let request = ShipmentPricingRequest::new("sedan").with_surge_multiplier(f64::NAN);
        let breakdown = PriceCalculator::new().calculate_breakdown(&request, 400.0);
        assert_eq!(breakdown.surge_multiplier, 1.0);
        assert_eq!(breakdown.total, 720.0);
    }

    #[test]
    fn test_price_range_by_confidence() {
        assert_eq!(price_range(720.0, Confidence::Medium), PriceRange { min: 612.0, max: 828.0 });
        assert_eq!(price_range(50.0, Confidence::Low), PriceRange { min: 35.0, max: 65.0 });
        assert_eq!(price_range(100.0, Confidence::High), PriceRange { min: 95.0, max: 105.0 });
    }

    #[test]
    fn test_overall_confidence() {
        assert_eq!(overall_confidence(Confidence::High, true, true), Confidence::High);
        assert_eq!(overall_confidence(Confidence::Medium, true, true), Confidence::Medium);
        assert_eq!(overall_confidence(Confidence::Low, true, true), Confidence::Low);

        assert_eq!(overall_confidence(Confidence::High, true, false), Confidence::Medium);
        assert_eq!(overall_confidence(Confidence::Medium, false, true), Confidence::Medium);
        assert_eq!(overall_confidence(Confidence::Low, false, true), Confidence::Low);

        assert_eq!(overall_confidence(Confidence::High, false, false), Confidence::Low);
    }

    #[test]
    fn test_factors() {
        let request = ShipmentPricingRequest::new("sedan")
            .with_locations(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0))
            .with_addresses("Quito, EC", "Somewhere, EC");
        let data = estimate(&request);

        assert!(data.factors.has_accurate_distance);
        assert!(data.factors.has_coordinates);
        assert!(data.factors.has_addresses);
        assert_eq!(data.estimate.confidence, Confidence::Medium);
        assert_eq!(data.estimate.kind, EstimateType::Estimate);
    }

    #[test]
    fn test_zip_only_is_low_confidence() {
        let data = estimate(&ShipmentPricingRequest::new("sedan").with_zips("10001", "60601"));
        assert!(!data.factors.has_accurate_distance);
        assert!(!data.factors.has_coordinates);
        assert!(!data.factors.has_addresses);
        assert_eq!(data.estimate.confidence, Confidence::Low);
    }

    #[test]
    fn test_overflowing_surge_is_ignored() {
        let request = ShipmentPricingRequest::new("sedan")
            .with_zips("1", "2")
            .with_surge_multiplier(1e307);
        let data = PriceCalculator::new().estimate(&request);

        // 250 mi at 1.80
        assert_eq!(data.breakdown.surge_multiplier, 1.0);
        assert_eq!(data.estimate.total, 450.0);
        assert!(data.estimate.range.max.is_finite());
    }
}
