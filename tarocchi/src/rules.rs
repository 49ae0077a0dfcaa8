//! Tunable constants of a game.

use serde::{Deserialize, Serialize};

/// Configuration of a game.
///
/// Missing fields take their default value when deserialized, so a rules file
/// only needs to name what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Debt of the player who claimed the prize.
    pub asking_debt: i32,
    /// Debt of every other player.
    pub defender_debt: i32,
    /// How many proposals a strategy gets before the game picks a card itself.
    pub max_attempts: usize,
    /// How many times the cards may be dealt again, after the first deal, before
    /// giving up on anybody claiming the prize.
    pub max_redeals: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            asking_debt: 21 * 3,
            defender_debt: 19 * 3,
            max_attempts: 1000,
            max_redeals: 100,
        }
    }
}

impl Rules {
    /// Returns the debt for a player, depending on whether they asked.
    pub fn debt(&self, asking: bool) -> i32 {
        if asking {
            self.asking_debt
        } else {
            self.defender_debt
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debts() {
        let rules = Rules::default();
        assert_eq!(rules.debt(true), 63);
        assert_eq!(rules.debt(false), 57);
        assert!(rules.debt(true) > rules.debt(false));
    }

    #[test]
    fn test_partial_rules() {
        let rules: Rules = serde_json::from_str(r#"{ "asking_debt": 70 }"#).unwrap();
        assert_eq!(rules.asking_debt, 70);
        assert_eq!(rules.defender_debt, 57);
        assert_eq!(rules.max_redeals, Rules::default().max_redeals);
    }
}
