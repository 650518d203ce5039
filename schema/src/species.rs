use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Species {
    Bulbasaur,
    Charmander,
    Squirtle,
    Pikachu,
    Sandshrew,
    Machop,
    Geodude,
    Magnemite,
    Gastly,
    Gyarados,
    Lapras,
    Snorlax,
    Ninjask,
    Castform,
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

impl BaseStats {
    pub fn as_array(&self) -> [u16; 6] {
        [
            self.hp as u16,
            self.attack as u16,
            self.defense as u16,
            self.sp_attack as u16,
            self.sp_defense as u16,
            self.speed as u16,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub pokedex_number: u16,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    /// Types of alternate forms, indexed by form index. Form 0 uses `types`.
    pub form_types: Vec<Vec<PokemonType>>,
}

const fn stats(hp: u8, attack: u8, defense: u8, sp_attack: u8, sp_defense: u8, speed: u8) -> BaseStats {
    BaseStats {
        hp,
        attack,
        defense,
        sp_attack,
        sp_defense,
        speed,
    }
}

impl Species {
    pub fn data(&self) -> SpeciesData {
        use PokemonType::*;

        let (pokedex_number, types, base_stats) = match self {
            Species::Bulbasaur => (1, vec![Grass, Poison], stats(45, 49, 49, 65, 65, 45)),
            Species::Charmander => (4, vec![Fire], stats(39, 52, 43, 60, 50, 65)),
            Species::Squirtle => (7, vec![Water], stats(44, 48, 65, 50, 64, 43)),
            Species::Pikachu => (25, vec![Electric], stats(35, 55, 40, 50, 50, 90)),
            Species::Sandshrew => (27, vec![Ground], stats(50, 75, 85, 20, 30, 40)),
            Species::Machop => (66, vec![Fighting], stats(70, 80, 50, 35, 35, 35)),
            Species::Geodude => (74, vec![Rock, Ground], stats(40, 80, 100, 30, 30, 20)),
            Species::Magnemite => (81, vec![Electric, Steel], stats(25, 35, 70, 95, 55, 45)),
            Species::Gastly => (92, vec![Ghost, Poison], stats(30, 35, 30, 100, 35, 80)),
            Species::Gyarados => (130, vec![Water, Flying], stats(95, 125, 79, 60, 100, 81)),
            Species::Lapras => (131, vec![Water, Ice], stats(130, 85, 80, 85, 95, 60)),
            Species::Snorlax => (143, vec![Normal], stats(160, 110, 65, 65, 110, 30)),
            Species::Ninjask => (291, vec![Bug, Flying], stats(61, 90, 45, 50, 50, 160)),
            Species::Castform => (351, vec![Normal], stats(70, 70, 70, 70, 70, 70)),
        };

        let form_types = match self {
            // Sunny, Rainy and Snowy forms.
            Species::Castform => vec![vec![Normal], vec![Fire], vec![Water], vec![Ice]],
            _ => vec![types.clone()],
        };

        SpeciesData {
            pokedex_number,
            types,
            base_stats,
            form_types,
        }
    }

    pub fn types_for_form(&self, form_index: u8) -> Vec<PokemonType> {
        let data = self.data();
        data.form_types
            .get(form_index as usize)
            .cloned()
            .unwrap_or(data.types)
    }
}
