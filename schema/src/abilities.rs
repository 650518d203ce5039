use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Identifier of an ability catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter)]
pub enum AbilityId {
    None,
    Stench,
    Drizzle,
    SpeedBoost,
    BattleArmor,
    Sturdy,
    Limber,
    SandVeil,
    Static,
    VoltAbsorb,
    WaterAbsorb,
    Oblivious,
    CompoundEyes,
    Insomnia,
    Immunity,
    FlashFire,
    OwnTempo,
    Intimidate,
    ShadowTag,
    MagnetPull,
    ArenaTrap,
    RoughSkin,
    Levitate,
    ClearBody,
    NaturalCure,
    SwiftSwim,
    Chlorophyll,
    HugePower,
    PoisonPoint,
    FlameBody,
    RainDish,
    SandStream,
    Drought,
    Pressure,
    ThickFat,
    KeenEye,
    HyperCutter,
    Truant,
    StickyHold,
    ShedSkin,
    Guts,
    RockHead,
    Synchronize,
    MagicGuard,
    RunAway,
    Moxie,
    Aftermath,
    Unburden,
    Defiant,
    Regenerator,
    MotorDrive,
    Dancer,
    Magician,
    Pickup,
    Berserk,
    Forecast,
    CloudNine,
    TabletsOfRuin,
    ElectricSurge,
    QuarkDrive,
    IntrepidSword,
    ChillingNeigh,
    SoulHeart,
    Pixilate,
    Illuminate,
}
