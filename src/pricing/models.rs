use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Canonical vehicle classes the rate table is keyed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Sedan,
    Suv,
    Truck,
}

impl VehicleType {
    /// Canonicalize free-text input (case-insensitive)
    ///
    /// "pickup" is treated as a truck; anything unrecognized prices as a sedan.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "suv" => Self::Suv,
            "truck" | "pickup" => Self::Truck,
            _ => Self::Sedan,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedan => "sedan",
            Self::Suv => "suv",
            Self::Truck => "truck",
        }
    }
}

/// A point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the valid latitude/longitude ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Partial shipment facts available at the time of pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentPricingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_coordinates", skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<Coordinates>,
    #[serde(default, deserialize_with = "lenient_coordinates", skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_state: Option<String>,
    pub vehicle_type: String,
    #[serde(default = "default_vehicle_count")]
    pub vehicle_count: i64,
    #[serde(default)]
    pub is_accident_recovery: bool,
    #[serde(default = "default_surge_multiplier")]
    pub surge_multiplier: f64,
}

/// Anything that is not a `{lat, lng}` pair of numbers reads as absent
fn lenient_coordinates<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn default_vehicle_count() -> i64 {
    1
}

fn default_surge_multiplier() -> f64 {
    1.0
}

impl ShipmentPricingRequest {
    pub fn new(vehicle_type: impl Into<String>) -> Self {
        Self {
            pickup_address: None,
            delivery_address: None,
            pickup_location: None,
            delivery_location: None,
            pickup_zip: None,
            delivery_zip: None,
            pickup_state: None,
            delivery_state: None,
            vehicle_type: vehicle_type.into(),
            vehicle_count: default_vehicle_count(),
            is_accident_recovery: false,
            surge_multiplier: default_surge_multiplier(),
        }
    }

    pub fn with_locations(mut self, pickup: Coordinates, delivery: Coordinates) -> Self {
        self.pickup_location = Some(pickup);
        self.delivery_location = Some(delivery);
        self
    }

    pub fn with_addresses(mut self, pickup: impl Into<String>, delivery: impl Into<String>) -> Self {
        self.pickup_address = Some(pickup.into());
        self.delivery_address = Some(delivery.into());
        self
    }

    pub fn with_zips(mut self, pickup: impl Into<String>, delivery: impl Into<String>) -> Self {
        self.pickup_zip = Some(pickup.into());
        self.delivery_zip = Some(delivery.into());
        self
    }

    pub fn with_states(mut self, pickup: impl Into<String>, delivery: impl Into<String>) -> Self {
        self.pickup_state = Some(pickup.into());
        self.delivery_state = Some(delivery.into());
        self
    }

    pub fn with_vehicle_count(mut self, count: i64) -> Self {
        self.vehicle_count = count;
        self
    }

    pub fn with_accident_recovery(mut self, is_accident_recovery: bool) -> Self {
        self.is_accident_recovery = is_accident_recovery;
        self
    }

    pub fn with_surge_multiplier(mut self, surge: f64) -> Self {
        self.surge_multiplier = surge;
        self
    }

    pub fn vehicle(&self) -> VehicleType {
        VehicleType::parse(&self.vehicle_type)
    }

    /// Vehicle count clamped to at least one
    pub fn effective_vehicle_count(&self) -> u32 {
        if self.vehicle_count <= 0 {
            1
        } else {
            u32::try_from(self.vehicle_count).unwrap_or(u32::MAX)
        }
    }

    /// Surge multiplier, with non-finite input treated as no surge
    pub fn effective_surge_multiplier(&self) -> f64 {
        if self.surge_multiplier.is_finite() {
            self.surge_multiplier
        } else {
            1.0
        }
    }

    /// Both coordinate pairs, only when both are valid
    pub fn coordinate_pair(&self) -> Option<(Coordinates, Coordinates)> {
        match (self.pickup_location, self.delivery_location) {
            (Some(pickup), Some(delivery)) if pickup.is_valid() && delivery.is_valid() => {
                Some((pickup, delivery))
            }
            _ => None,
        }
    }

    pub fn address_pair(&self) -> Option<(&str, &str)> {
        both_present(&self.pickup_address, &self.delivery_address)
    }

    pub fn zip_pair(&self) -> Option<(&str, &str)> {
        both_present(&self.pickup_zip, &self.delivery_zip)
    }

    pub fn state_pair(&self) -> Option<(&str, &str)> {
        both_present(&self.pickup_state, &self.delivery_state)
    }
}

/// Blank strings count as absent
fn both_present<'a>(a: &'a Option<String>, b: &'a Option<String>) -> Option<(&'a str, &'a str)> {
    let a = a.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    let b = b.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    Some((a, b))
}

/// Provenance of a distance figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    Haversine,
    GoogleMaps,
    UserProvided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Half-width of the customer-facing price range, in percent
    pub fn range_percent(&self) -> f64 {
        match self {
            Self::High => 5.0,
            Self::Medium => 15.0,
            Self::Low => 30.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Which location facts produced the distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBasis {
    Coordinates,
    ZipCodes,
    States,
    AddressStates,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
    pub miles: f64,
    pub source: DistanceSource,
    pub confidence: Confidence,
    pub basis: DistanceBasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceBand {
    Short,
    Mid,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    pub base_rate_per_mile: f64,
    pub distance_band: DistanceBand,
    pub raw_base_price: f64,
    pub bulk_discount_percent: u32,
    pub bulk_discount_amount: f64,
    pub surge_multiplier: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateType {
    Estimate,
    Quote,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub total: f64,
    pub range: PriceRange,
    pub confidence: Confidence,
    #[serde(rename = "type")]
    pub kind: EstimateType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingFactors {
    pub has_accurate_distance: bool,
    pub has_coordinates: bool,
    pub has_addresses: bool,
}

/// Everything the estimator derives for one request
///
/// Field casing is mixed on purpose: `breakdown` is camelCase while
/// `distance`, `factors` and `estimate` keep their snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingData {
    pub estimate: PriceEstimate,
    pub breakdown: PricingBreakdown,
    pub distance: DistanceEstimate,
    pub factors: PricingFactors,
}
