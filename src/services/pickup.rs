//! Waste-pickup quoting and dispatch
//!
//! Pricing is a base charge plus a per-kg rate by trash type. Dispatch
//! is mocked: a collector is drawn from a fixed roster and the caller's
//! pickup counter is incremented.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Flat charge applied to every pickup, in addition to the per-kg rate
pub const PICKUP_BASE_CHARGE: i64 = 100;

/// Category of waste being collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrashType {
    General,
    Recyclables,
    Organic,
    Electronics,
    Furniture,
    Medicinal,
}

impl TrashType {
    /// Collection rate per kilogram, in currency units
    pub fn rate_per_kg(&self) -> i64 {
        match self {
            Self::General => 15,
            Self::Recyclables => 10,
            Self::Organic => 8,
            Self::Electronics => 50,
            Self::Furniture => 120,
            Self::Medicinal => 90,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "General Waste",
            Self::Recyclables => "Recyclables",
            Self::Organic => "Organic/Compost",
            Self::Electronics => "Electronics",
            Self::Furniture => "Large Items/Furniture",
            Self::Medicinal => "Medicinal Waste",
        }
    }
}

/// A collection service from the mock roster
#[derive(Debug, Clone, Serialize)]
pub struct Collector {
    pub id: u32,
    pub name: &'static str,
    pub driver: &'static str,
    pub rating: f32,
    pub phone: &'static str,
    pub truck_number: &'static str,
    /// Estimated arrival in minutes
    pub estimated_arrival: u32,
}

/// The fixed collector roster
pub fn collector_roster() -> &'static [Collector] {
    &[
        Collector {
            id: 1,
            name: "Nabhay's Waste Solutions",
            driver: "Nabhay Khanna",
            rating: 4.8,
            phone: "98134 12309",
            truck_number: "WS-401",
            estimated_arrival: 15,
        },
        Collector {
            id: 2,
            name: "Green Earth Disposal",
            driver: "Aditya Das",
            rating: 4.9,
            phone: "98108 26969",
            truck_number: "GE-203",
            estimated_arrival: 25,
        },
        Collector {
            id: 3,
            name: "City Clean Pickup",
            driver: "Anika Gupta",
            rating: 4.7,
            phone: "93118 66007",
            truck_number: "CC-156",
            estimated_arrival: 20,
        },
    ]
}

/// Pick a collector pseudo-randomly from the roster
pub fn assign_collector() -> &'static Collector {
    let roster = collector_roster();
    roster
        .choose(&mut rand::thread_rng())
        .expect("collector roster is never empty")
}

/// `base + weight × rate`, rounded to whole currency units
pub fn estimate_cost(trash_type: TrashType, weight_kg: f64) -> i64 {
    PICKUP_BASE_CHARGE + (weight_kg * trash_type.rate_per_kg() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_for_every_trash_type() {
        let cases = [
            (TrashType::General, 15),
            (TrashType::Recyclables, 10),
            (TrashType::Organic, 8),
            (TrashType::Electronics, 50),
            (TrashType::Furniture, 120),
            (TrashType::Medicinal, 90),
        ];

        for (trash_type, rate) in cases {
            assert_eq!(
                estimate_cost(trash_type, 1.0),
                PICKUP_BASE_CHARGE + rate,
                "rate mismatch for {:?}",
                trash_type
            );
            assert_eq!(
                estimate_cost(trash_type, 3.0),
                PICKUP_BASE_CHARGE + 3 * rate
            );
        }
    }

    #[test]
    fn test_fractional_weight_rounds() {
        // 2.5 kg of general waste at 15/kg = 37.5, rounds to 38
        assert_eq!(estimate_cost(TrashType::General, 2.5), 138);
    }

    #[test]
    fn test_zero_weight_is_base_charge() {
        assert_eq!(estimate_cost(TrashType::Electronics, 0.0), PICKUP_BASE_CHARGE);
    }

    #[test]
    fn test_assigned_collector_is_from_roster() {
        let collector = assign_collector();
        assert!(collector_roster().iter().any(|c| c.id == collector.id));
    }

    #[test]
    fn test_trash_type_wire_names() {
        let t: TrashType = serde_json::from_str("\"recyclables\"").unwrap();
        assert_eq!(t, TrashType::Recyclables);
        assert_eq!(serde_json::to_string(&TrashType::Medicinal).unwrap(), "\"medicinal\"");
    }
}
