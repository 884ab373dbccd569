pub mod calculator;
pub mod distance;
pub mod models;
pub mod rates;

pub use calculator::{estimate, overall_confidence, price_range, PriceCalculator};
pub use distance::{estimate_distance, extract_state_code, haversine_miles};
pub use models::{
    Confidence, Coordinates, DistanceBand, DistanceBasis, DistanceEstimate, DistanceSource,
    EstimateType, PriceEstimate, PriceRange, PricingBreakdown, PricingData, PricingFactors,
    ShipmentPricingRequest, VehicleType,
};
pub use rates::{bulk_discount_percent, miles_to_band, round2};
