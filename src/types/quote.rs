//! Shipment parameters: cargo/service classification and the validated
//! quote request passed into the pricing core.

use serde::{Deserialize, Serialize};

/// Cargo classification for a shipment.
///
/// Unknown values degrade to [`CargoType::Unknown`] at deserialization,
/// which prices like general cargo (neutral multipliers, no surcharges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CargoType {
    General,
    Hazardous,
    Refrigerated,
    Oversized,
    Fragile,
    HighValue,
    #[serde(other)]
    Unknown,
}

impl CargoType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Hazardous => "hazardous",
            Self::Refrigerated => "refrigerated",
            Self::Oversized => "oversized",
            Self::Fragile => "fragile",
            Self::HighValue => "high-value",
            Self::Unknown => "unknown",
        }
    }
}

/// Service level requested by the shipper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Standard,
    Express,
    Economy,
    Premium,
    #[serde(other)]
    Unknown,
}

impl ServiceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Economy => "economy",
            Self::Premium => "premium",
            Self::Unknown => "unknown",
        }
    }
}

impl Default for ServiceType {
    fn default() -> Self {
        Self::Standard
    }
}

/// A validated quote request.
///
/// Built by the API boundary after required-field validation; everything
/// downstream (tariff book, market board, predictor) consumes this form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    pub origin: String,
    pub destination: String,
    pub cargo_type: CargoType,
    /// Shipment weight in kilograms.
    pub weight_kg: f64,
    /// Shipment volume in cubic meters.
    pub volume_cbm: f64,
    pub service: ServiceType,
    pub customer_id: String,
    pub forwarder_id: String,
}

impl QuoteParams {
    /// Directional route key. "A-B" and "B-A" are distinct routes and may
    /// carry asymmetric rates.
    pub fn route_key(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_type_wire_names() {
        let hv: CargoType = serde_json::from_str("\"high-value\"").unwrap();
        assert_eq!(hv, CargoType::HighValue);
        assert_eq!(serde_json::to_string(&CargoType::Hazardous).unwrap(), "\"hazardous\"");
    }

    #[test]
    fn test_unknown_cargo_degrades_instead_of_erroring() {
        let got: CargoType = serde_json::from_str("\"antimatter\"").unwrap();
        assert_eq!(got, CargoType::Unknown);
        let got: ServiceType = serde_json::from_str("\"teleport\"").unwrap();
        assert_eq!(got, ServiceType::Unknown);
    }

    #[test]
    fn test_route_key_is_directional() {
        let mut q = QuoteParams {
            origin: "Shanghai".to_string(),
            destination: "Los Angeles".to_string(),
            cargo_type: CargoType::General,
            weight_kg: 100.0,
            volume_cbm: 1.0,
            service: ServiceType::Standard,
            customer_id: String::new(),
            forwarder_id: String::new(),
        };
        assert_eq!(q.route_key(), "Shanghai-Los Angeles");
        std::mem::swap(&mut q.origin, &mut q.destination);
        assert_eq!(q.route_key(), "Los Angeles-Shanghai");
    }
}
