use serde::Serialize;

use crate::request::StatSpread;

/// Damage seen in a log, for later spread inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DamageObservation {
    pub attacker: String,
    pub move_name: String,
    /// HP lost, in the units the log reported
    pub hp_lost: u32,
}

/// Result of spread inference for one species
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpreadEstimate {
    pub species: String,
    pub level: u8,
    /// Spreads consistent with the observations
    pub possible_spreads: Vec<StatSpread>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_hp: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub observed_damage: Vec<DamageObservation>,
}

/// EV/IV inference placeholder
///
/// Echoes the observations back with no candidate spreads.
// TODO: test candidate spreads against observed damage with a DamageCalculator
pub fn estimate_spreads(
    species: &str,
    level: u8,
    observed_hp: Option<u32>,
    observed_damage: &[DamageObservation],
) -> SpreadEstimate {
    SpreadEstimate {
        species: species.to_string(),
        level,
        possible_spreads: Vec::new(),
        observed_hp,
        observed_damage: observed_damage.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_estimate_echoes_observations() {
        let hit = DamageObservation {
            attacker: "Garchomp".to_string(),
            move_name: "Earthquake".to_string(),
            hp_lost: 62,
        };

        let estimate = estimate_spreads("Heatran", 100, Some(386), std::slice::from_ref(&hit));

        assert_eq!(estimate.species, "Heatran");
        assert!(estimate.possible_spreads.is_empty());
        assert_eq!(estimate.observed_hp, Some(386));
        assert_eq!(estimate.observed_damage, vec![hit]);
    }

    #[test]
    fn test_empty_observations_are_omitted() {
        let estimate = estimate_spreads("Heatran", 50, None, &[]);
        let value = serde_json::to_value(&estimate).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"species": "Heatran", "level": 50, "possible_spreads": []})
        );
    }
}
