use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, EnumIter)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
    Typeless,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PokemonType {
    /// Calculate type effectiveness multiplier for attacking type vs defending type
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f32 {
        use PokemonType::*;

        match (attacking, defending) {
            (Typeless, _) | (_, Typeless) => 1.0,

            // Normal
            (Normal, Ghost) => 0.0,
            (Normal, Rock) | (Normal, Steel) => 0.5,
            (Normal, _) => 1.0,

            // Fighting
            (Fighting, Ghost) => 0.0,
            (Fighting, Flying)
            | (Fighting, Poison)
            | (Fighting, Bug)
            | (Fighting, Psychic)
            | (Fighting, Fairy) => 0.5,
            (Fighting, Normal)
            | (Fighting, Rock)
            | (Fighting, Steel)
            | (Fighting, Ice)
            | (Fighting, Dark) => 2.0,
            (Fighting, _) => 1.0,

            // Flying
            (Flying, Rock) | (Flying, Steel) | (Flying, Electric) => 0.5,
            (Flying, Fighting) | (Flying, Bug) | (Flying, Grass) => 2.0,
            (Flying, _) => 1.0,

            // Poison
            (Poison, Steel) => 0.0,
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 0.5,
            (Poison, Grass) | (Poison, Fairy) => 2.0,
            (Poison, _) => 1.0,

            // Ground
            (Ground, Flying) => 0.0,
            (Ground, Bug) | (Ground, Grass) => 0.5,
            (Ground, Poison)
            | (Ground, Rock)
            | (Ground, Steel)
            | (Ground, Fire)
            | (Ground, Electric) => 2.0,
            (Ground, _) => 1.0,

            // Rock
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,
            (Rock, Flying) | (Rock, Bug) | (Rock, Fire) | (Rock, Ice) => 2.0,
            (Rock, _) => 1.0,

            // Bug
            (Bug, Fighting)
            | (Bug, Flying)
            | (Bug, Poison)
            | (Bug, Ghost)
            | (Bug, Steel)
            | (Bug, Fire)
            | (Bug, Fairy) => 0.5,
            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,
            (Bug, _) => 1.0,

            // Ghost
            (Ghost, Normal) => 0.0,
            (Ghost, Dark) => 0.5,
            (Ghost, Ghost) | (Ghost, Psychic) => 2.0,
            (Ghost, _) => 1.0,

            // Steel
            (Steel, Steel) | (Steel, Fire) | (Steel, Water) | (Steel, Electric) => 0.5,
            (Steel, Rock) | (Steel, Ice) | (Steel, Fairy) => 2.0,
            (Steel, _) => 1.0,

            // Fire
            (Fire, Rock) | (Fire, Fire) | (Fire, Water) | (Fire, Dragon) => 0.5,
            (Fire, Bug) | (Fire, Steel) | (Fire, Grass) | (Fire, Ice) => 2.0,
            (Fire, _) => 1.0,

            // Water
            (Water, Water) | (Water, Grass) | (Water, Dragon) => 0.5,
            (Water, Ground) | (Water, Rock) | (Water, Fire) => 2.0,
            (Water, _) => 1.0,

            // Grass
            (Grass, Flying)
            | (Grass, Poison)
            | (Grass, Bug)
            | (Grass, Steel)
            | (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Dragon) => 0.5,
            (Grass, Ground) | (Grass, Rock) | (Grass, Water) => 2.0,
            (Grass, _) => 1.0,

            // Electric
            (Electric, Ground) => 0.0,
            (Electric, Grass) | (Electric, Electric) | (Electric, Dragon) => 0.5,
            (Electric, Flying) | (Electric, Water) => 2.0,
            (Electric, _) => 1.0,

            // Psychic
            (Psychic, Dark) => 0.0,
            (Psychic, Steel) | (Psychic, Psychic) => 0.5,
            (Psychic, Fighting) | (Psychic, Poison) => 2.0,
            (Psychic, _) => 1.0,

            // Ice
            (Ice, Steel) | (Ice, Fire) | (Ice, Water) | (Ice, Ice) => 0.5,
            (Ice, Flying) | (Ice, Ground) | (Ice, Grass) | (Ice, Dragon) => 2.0,
            (Ice, _) => 1.0,

            // Dragon
            (Dragon, Fairy) => 0.0,
            (Dragon, Steel) => 0.5,
            (Dragon, Dragon) => 2.0,
            (Dragon, _) => 1.0,

            // Dark
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,
            (Dark, Ghost) | (Dark, Psychic) => 2.0,
            (Dark, _) => 1.0,

            // Fairy
            (Fairy, Poison) | (Fairy, Steel) | (Fairy, Fire) => 0.5,
            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,
            (Fairy, _) => 1.0,
        }
    }

    /// Combined multiplier of one attacking type against every defending type.
    pub fn effectiveness_against(attacking: PokemonType, defending: &[PokemonType]) -> f32 {
        defending
            .iter()
            .map(|defending| Self::type_effectiveness(attacking, *defending))
            .product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dual_type_effectiveness() {
        use PokemonType::*;
        assert_eq!(PokemonType::effectiveness_against(Electric, &[Water, Flying]), 4.0);
        assert_eq!(PokemonType::effectiveness_against(Ground, &[Electric, Flying]), 0.0);
        assert_eq!(PokemonType::effectiveness_against(Fire, &[Steel]), 2.0);
        assert_eq!(PokemonType::effectiveness_against(Typeless, &[Ghost]), 1.0);
    }
}
