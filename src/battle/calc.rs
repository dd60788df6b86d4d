//! Damage step arithmetic.
//!
//! Pure functions; the resolver applies the result.
//!
//! | Defender        | a > d                                | a < d                          | a = d          |
//! |-----------------|--------------------------------------|--------------------------------|----------------|
//! | Attack (ATK d)  | defender destroyed, a-d to defender  | attacker destroyed, d-a to attacker | both destroyed |
//! | Defense (DEF d) | defender destroyed, a-d if piercing  | d-a to attacker                | nothing        |
//!
//! A direct attack deals the attacker's full ATK.

use serde::{Deserialize, Serialize};

/// What the attacker runs into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenderStance {
    /// Defender in attack position, with its ATK.
    Attack(i32),
    /// Defender in defense position, with its DEF.
    Defense(i32),
    /// No defender.
    Direct,
}

/// Result of one damage calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub destroy_attacker: bool,
    pub destroy_defender: bool,
    /// Damage to the attacking agent's controller.
    pub damage_to_attacker: i32,
    /// Damage to the defending player.
    pub damage_to_defender: i32,
}

/// Compute the damage step.
///
/// ```
/// use netduel::battle::{calculate, DefenderStance};
///
/// let outcome = calculate(1800, DefenderStance::Defense(1200), true);
/// assert!(outcome.destroy_defender);
/// assert_eq!(outcome.damage_to_defender, 600);
/// ```
#[must_use]
pub fn calculate(atk: i32, defender: DefenderStance, piercing: bool) -> BattleOutcome {
    match defender {
        DefenderStance::Direct => BattleOutcome {
            damage_to_defender: atk,
            ..BattleOutcome::default()
        },
        DefenderStance::Attack(def_atk) => match atk.cmp(&def_atk) {
            std::cmp::Ordering::Greater => BattleOutcome {
                destroy_defender: true,
                damage_to_defender: atk - def_atk,
                ..BattleOutcome::default()
            },
            std::cmp::Ordering::Less => BattleOutcome {
                destroy_attacker: true,
                damage_to_attacker: def_atk - atk,
                ..BattleOutcome::default()
            },
            std::cmp::Ordering::Equal => BattleOutcome {
                destroy_attacker: true,
                destroy_defender: true,
                ..BattleOutcome::default()
            },
        },
        DefenderStance::Defense(def) => match atk.cmp(&def) {
            std::cmp::Ordering::Greater => BattleOutcome {
                destroy_defender: true,
                damage_to_defender: if piercing { atk - def } else { 0 },
                ..BattleOutcome::default()
            },
            std::cmp::Ordering::Less => BattleOutcome {
                damage_to_attacker: def - atk,
                ..BattleOutcome::default()
            },
            std::cmp::Ordering::Equal => BattleOutcome::default(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_attack_vs_attack() {
        let win = calculate(1900, DefenderStance::Attack(1400), false);
        assert!(win.destroy_defender && !win.destroy_attacker);
        assert_eq!(win.damage_to_defender, 500);

        let lose = calculate(1000, DefenderStance::Attack(1400), false);
        assert!(lose.destroy_attacker && !lose.destroy_defender);
        assert_eq!(lose.damage_to_attacker, 400);

        let tie = calculate(1400, DefenderStance::Attack(1400), false);
        assert!(tie.destroy_attacker && tie.destroy_defender);
        assert_eq!((tie.damage_to_attacker, tie.damage_to_defender), (0, 0));
    }

    #[test]
    fn test_attack_vs_defense() {
        let plain = calculate(1600, DefenderStance::Defense(1200), false);
        assert!(plain.destroy_defender);
        assert_eq!(plain.damage_to_defender, 0);

        let pierce = calculate(1600, DefenderStance::Defense(1200), true);
        assert_eq!(pierce.damage_to_defender, 400);

        let wall = calculate(1000, DefenderStance::Defense(2000), true);
        assert!(!wall.destroy_attacker && !wall.destroy_defender);
        assert_eq!(wall.damage_to_attacker, 1000);

        assert_eq!(calculate(1200, DefenderStance::Defense(1200), true), BattleOutcome::default());
    }

    #[test]
    fn test_direct() {
        let outcome = calculate(1100, DefenderStance::Direct, false);
        assert_eq!(outcome.damage_to_defender, 1100);
        assert!(!outcome.destroy_defender);
    }

    proptest! {
        #[test]
        fn prop_attack_position(a in 0i32..5000, d in 0i32..5000) {
            let o = calculate(a, DefenderStance::Attack(d), false);
            prop_assert_eq!(o.destroy_defender, a >= d);
            prop_assert_eq!(o.destroy_attacker, a <= d);
            prop_assert_eq!(o.damage_to_defender, (a - d).max(0));
            prop_assert_eq!(o.damage_to_attacker, (d - a).max(0));
        }

        #[test]
        fn prop_defense_position(a in 0i32..5000, d in 0i32..5000, piercing: bool) {
            let o = calculate(a, DefenderStance::Defense(d), piercing);
            prop_assert!(!o.destroy_attacker);
            prop_assert_eq!(o.destroy_defender, a > d);
            let pierce = if piercing { (a - d).max(0) } else { 0 };
            prop_assert_eq!(o.damage_to_defender, pierce);
            prop_assert_eq!(o.damage_to_attacker, (d - a).max(0));
        }
    }
}
