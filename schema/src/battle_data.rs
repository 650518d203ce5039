use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

/// Non-volatile status effects. A combatant holds at most one at a time.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum StatusEffect {
    Poison,
    Toxic,
    Paralysis,
    Sleep,
    Freeze,
    Burn,
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            StatusEffect::Poison => "poison",
            StatusEffect::Toxic => "bad poison",
            StatusEffect::Paralysis => "paralysis",
            StatusEffect::Sleep => "sleep",
            StatusEffect::Freeze => "freeze",
            StatusEffect::Burn => "burn",
        };
        write!(f, "{}", display_name)
    }
}

impl StatusEffect {
    /// Text shown when the status is inflicted, e.g. "Pikachu was paralyzed!".
    pub fn obtain_text(&self, pokemon_name: &str) -> String {
        match self {
            StatusEffect::Poison => format!("{} was poisoned!", pokemon_name),
            StatusEffect::Toxic => format!("{} was badly poisoned!", pokemon_name),
            StatusEffect::Paralysis => format!(
                "{} was paralyzed!\nIt may be unable to move!",
                pokemon_name
            ),
            StatusEffect::Sleep => format!("{} fell asleep!", pokemon_name),
            StatusEffect::Freeze => format!("{} was frozen solid!", pokemon_name),
            StatusEffect::Burn => format!("{} was burned!", pokemon_name),
        }
    }

    /// Text shown when the status is cured.
    pub fn heal_text(&self, pokemon_name: &str) -> String {
        match self {
            StatusEffect::Poison | StatusEffect::Toxic => {
                format!("{} was cured of its poison!", pokemon_name)
            }
            StatusEffect::Paralysis => format!("{} was cured of paralysis!", pokemon_name),
            StatusEffect::Sleep => format!("{} woke up!", pokemon_name),
            StatusEffect::Freeze => format!("{} thawed out!", pokemon_name),
            StatusEffect::Burn => format!("{}'s burn was healed!", pokemon_name),
        }
    }
}

/// Stats that can carry a temporary stage in battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum StatType {
    Atk,
    Def,
    SpAtk,
    SpDef,
    Spe,
    Acc,
    Eva,
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatType::Atk => write!(f, "Attack"),
            StatType::Def => write!(f, "Defense"),
            StatType::SpAtk => write!(f, "Sp. Atk"),
            StatType::SpDef => write!(f, "Sp. Def"),
            StatType::Spe => write!(f, "Speed"),
            StatType::Acc => write!(f, "accuracy"),
            StatType::Eva => write!(f, "evasiveness"),
        }
    }
}

impl StatType {
    /// The five stats with a permanent value, in stat-array order after HP.
    pub const EFFECTIVE: [StatType; 5] = [
        StatType::Atk,
        StatType::Def,
        StatType::SpAtk,
        StatType::SpDef,
        StatType::Spe,
    ];

    /// Index into a `[u16; 6]` stat array (HP is index 0), or None for accuracy/evasion.
    pub fn permanent_index(&self) -> Option<usize> {
        match self {
            StatType::Atk => Some(1),
            StatType::Def => Some(2),
            StatType::SpAtk => Some(3),
            StatType::SpDef => Some(4),
            StatType::Spe => Some(5),
            StatType::Acc | StatType::Eva => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum WeatherType {
    Sunny,
    Rain,
    Sandstorm,
    Hail,
    Fog,
    HeavyRain,
    HarshSun,
    StrongWinds,
}

impl WeatherType {
    /// Primal weathers cannot be replaced by ordinary weather setters.
    pub fn is_immutable(&self) -> bool {
        matches!(
            self,
            WeatherType::HeavyRain | WeatherType::HarshSun | WeatherType::StrongWinds
        )
    }

    pub fn is_damaging(&self) -> bool {
        matches!(self, WeatherType::Sandstorm | WeatherType::Hail)
    }

    pub fn start_message(&self) -> &'static str {
        match self {
            WeatherType::Sunny => "The sunlight got bright!",
            WeatherType::Rain => "A downpour started!",
            WeatherType::Sandstorm => "A sandstorm brewed!",
            WeatherType::Hail => "It started to hail!",
            WeatherType::Fog => "A thick fog emerged!",
            WeatherType::HeavyRain => "A heavy downpour started!",
            WeatherType::HarshSun => "The sunlight got hot!",
            WeatherType::StrongWinds => "A heavy wind began!",
        }
    }

    pub fn lapse_message(&self) -> &'static str {
        match self {
            WeatherType::Sunny => "The sunlight is strong.",
            WeatherType::Rain => "The downpour continues.",
            WeatherType::Sandstorm => "The sandstorm rages.",
            WeatherType::Hail => "Hail continues to fall.",
            WeatherType::Fog => "The fog continues.",
            WeatherType::HeavyRain => "The rain is pouring down.",
            WeatherType::HarshSun => "The sun is scorching hot.",
            WeatherType::StrongWinds => "The wind blows intensely.",
        }
    }

    pub fn clear_message(&self) -> &'static str {
        match self {
            WeatherType::Sunny | WeatherType::HarshSun => "The sunlight faded.",
            WeatherType::Rain | WeatherType::HeavyRain => "The rain stopped.",
            WeatherType::Sandstorm => "The sandstorm subsided.",
            WeatherType::Hail => "The hail stopped.",
            WeatherType::Fog => "The fog disappeared.",
            WeatherType::StrongWinds => "The heavy wind stopped.",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TerrainType {
    Misty,
    Electric,
    Grassy,
    Psychic,
}

impl fmt::Display for TerrainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} Terrain", self)
    }
}

/// Volatile conditions attached to a single combatant while it is on the field.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum BattlerTagType {
    Flinched,
    Confused,
    Infatuated,
    Taunt,
    FireBoost,
    Truant,
    Unburden,
    QuarkDrive,
    Substitute,
    Trapped,
}

impl fmt::Display for BattlerTagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            BattlerTagType::Flinched => "flinching",
            BattlerTagType::Confused => "confusion",
            BattlerTagType::Infatuated => "infatuation",
            BattlerTagType::Taunt => "taunt",
            BattlerTagType::FireBoost => "fire boost",
            BattlerTagType::Truant => "truant",
            BattlerTagType::Unburden => "unburden",
            BattlerTagType::QuarkDrive => "quark drive",
            BattlerTagType::Substitute => "substitute",
            BattlerTagType::Trapped => "trapping",
        };
        write!(f, "{}", display_name)
    }
}

impl BattlerTagType {
    /// Default number of turns the tag lasts when no explicit count is given.
    /// Zero means the tag lasts until the holder leaves the field.
    pub fn default_turns(&self) -> u8 {
        match self {
            BattlerTagType::Flinched => 1,
            BattlerTagType::Confused => 3,
            BattlerTagType::Taunt => 3,
            BattlerTagType::Trapped => 4,
            _ => 0,
        }
    }
}

/// Side-scoped field effects such as hazards and screens.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ArenaTagType {
    Spikes,
    StealthRock,
    Reflect,
    LightScreen,
    Mist,
    Tailwind,
}

impl fmt::Display for ArenaTagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Hazards and screens read better with spaces in messages.
        let display_name = match self {
            ArenaTagType::Spikes => "Spikes",
            ArenaTagType::StealthRock => "Stealth Rock",
            ArenaTagType::Reflect => "Reflect",
            ArenaTagType::LightScreen => "Light Screen",
            ArenaTagType::Mist => "Mist",
            ArenaTagType::Tailwind => "Tailwind",
        };
        write!(f, "{}", display_name)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArenaTagSide {
    Both,
    Player,
    Enemy,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PokeballType {
    PokeBall,
    GreatBall,
    UltraBall,
    RogueBall,
    MasterBall,
}

impl fmt::Display for PokeballType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let display_name = match self {
            PokeballType::PokeBall => "Poké Ball",
            PokeballType::GreatBall => "Great Ball",
            PokeballType::UltraBall => "Ultra Ball",
            PokeballType::RogueBall => "Rogue Ball",
            PokeballType::MasterBall => "Master Ball",
        };
        write!(f, "{}", display_name)
    }
}

/// Rarity tier of a reward item.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum ModifierTier {
    Common,
    Great,
    Ultra,
    Rogue,
    Master,
}

impl ModifierTier {
    /// The ball handed out in place of an item whose stack is already full.
    pub fn default_pokeball(&self) -> PokeballType {
        match self {
            ModifierTier::Common => PokeballType::PokeBall,
            ModifierTier::Great => PokeballType::GreatBall,
            ModifierTier::Ultra => PokeballType::UltraBall,
            ModifierTier::Rogue => PokeballType::RogueBall,
            ModifierTier::Master => PokeballType::MasterBall,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Relaxed,
    Impish,
    Timid,
    Modest,
    Calm,
    Jolly,
}

impl Nature {
    /// Multiplier the nature applies to one of the five effective stats.
    pub fn stat_multiplier(&self, stat: StatType) -> f64 {
        let (up, down) = match self {
            Nature::Hardy => return 1.0,
            Nature::Lonely => (StatType::Atk, StatType::Def),
            Nature::Brave => (StatType::Atk, StatType::Spe),
            Nature::Adamant => (StatType::Atk, StatType::SpAtk),
            Nature::Naughty => (StatType::Atk, StatType::SpDef),
            Nature::Bold => (StatType::Def, StatType::Atk),
            Nature::Relaxed => (StatType::Def, StatType::Spe),
            Nature::Impish => (StatType::Def, StatType::SpAtk),
            Nature::Timid => (StatType::Spe, StatType::Atk),
            Nature::Modest => (StatType::SpAtk, StatType::Atk),
            Nature::Calm => (StatType::SpDef, StatType::Atk),
            Nature::Jolly => (StatType::Spe, StatType::SpAtk),
        };
        if stat == up {
            1.1
        } else if stat == down {
            0.9
        } else {
            1.0
        }
    }
}
