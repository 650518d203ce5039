use crate::abilities::conditions::AbilityCondition;
use schema::{
    AbilityId, BattlerTagType, MoveCategory, PokemonType, StatType, StatusEffect, TerrainType, WeatherType,
};
use strum::{Display, EnumIter};

/// Battle moments at which ability attributes are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum HookKind {
    Generic,
    PostBattleInit,
    PreDefend,
    PostDefend,
    PreAttack,
    PostAttack,
    PreStatStageChange,
    PostStatStageChange,
    PostSummon,
    PreSwitchOut,
    PostVictory,
    PostKnockOut,
    PostFaint,
    PostTurn,
    PostWeatherChange,
    PostWeatherLapse,
    PostTerrainChange,
    PreSetStatus,
    PostSetStatus,
    PreApplyBattlerTag,
    CheckTrapped,
    PostBattle,
    PostMoveUsed,
    PostItemLost,
    FieldStatMultiplier,
    StatMultiplier,
    PostDamage,
    PreWeatherEffect,
}

/// Attributes consulted directly by engine code rather than at a fixed hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenericAttr {
    BlockRecoil,
    BlockItemTheft,
    BlockCrit,
    BlockOneHitKo,
    BlockNonDirectDamage,
    RunSuccess,
    DoubleBattleChance,
    IntimidateImmunity,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostBattleInitAttr {
    StatStageChange { stats: Vec<StatType>, stages: i8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreDefendAttr {
    /// Zeroes damage from moves of `immune_type`. `damaging_only` limits the
    /// immunity to non-status moves.
    TypeImmunity {
        immune_type: PokemonType,
        damaging_only: bool,
    },
    /// Immunity that also restores a quarter of max HP.
    TypeImmunityHeal { immune_type: PokemonType },
    TypeImmunityAddBattlerTag {
        immune_type: PokemonType,
        tag: BattlerTagType,
    },
    TypeImmunityStatStageChange {
        immune_type: PokemonType,
        stat: StatType,
        stages: i8,
    },
    ReceivedTypeDamageMultiplier {
        move_type: PokemonType,
        multiplier: f64,
    },
    /// Leaves the holder at 1 HP when a hit at full HP would knock it out.
    FullHpEndure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostDefendAttr {
    ContactApplyStatusEffect {
        chance: u8,
        effects: Vec<StatusEffect>,
    },
    /// Deals 1/`ratio` of the attacker's max HP on contact.
    ContactDamage { ratio: u16 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreAttackAttr {
    MoveTypeChange {
        from: PokemonType,
        to: PokemonType,
        power_multiplier: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostAttackAttr {
    ApplyBattlerTag {
        chance: u8,
        tag: BattlerTagType,
    },
    StealHeldItem,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreStatStageChangeAttr {
    /// Blocks drops caused by others. `None` protects every stat.
    ProtectStat { stat: Option<StatType> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostStatStageChangeAttr {
    StatStageChangeOnDrop { stats: Vec<StatType>, stages: i8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostSummonAttr {
    WeatherChange(WeatherType),
    TerrainChange(TerrainType),
    /// `intimidate` marks drops aimed at opponents that respect substitutes
    /// and intimidate immunities.
    StatStageChange {
        stats: Vec<StatType>,
        stages: i8,
        self_target: bool,
        intimidate: bool,
    },
    AddBattlerTag { tag: BattlerTagType, turns: u8 },
    /// `{pokemon}` in the template is replaced with the holder's name.
    Message(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreSwitchOutAttr {
    ResetStatus,
    Heal { denominator: u16 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostVictoryAttr {
    StatStageChange { stat: StatType, stages: i8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostKnockOutAttr {
    StatStageChange { stat: StatType, stages: i8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostFaintAttr {
    ContactDamage { ratio: u16 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostTurnAttr {
    SpeedBoost,
    /// Cures the holder, or its ally when `ally_target` is set.
    ResetStatus { ally_target: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostWeatherChangeAttr {
    FormChange {
        forms: Vec<(WeatherType, u8)>,
        default_form: u8,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostWeatherLapseAttr {
    /// Heals 1/(16 / factor) of max HP under one of `weathers`.
    Heal {
        weathers: Vec<WeatherType>,
        factor: u16,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostTerrainChangeAttr {
    AddBattlerTag {
        tag: BattlerTagType,
        terrains: Vec<TerrainType>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreSetStatusAttr {
    /// An empty list blocks every status.
    StatusEffectImmunity { effects: Vec<StatusEffect> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostSetStatusAttr {
    SyncStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreApplyBattlerTagAttr {
    BattlerTagImmunity { tags: Vec<BattlerTagType> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapCondition {
    TargetWithoutAbility(AbilityId),
    TargetOfType(PokemonType),
    TargetGrounded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckTrappedAttr {
    ArenaTrap { condition: TrapCondition },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostBattleAttr {
    Loot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostMoveUsedAttr {
    Dancer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostItemLostAttr {
    ApplyBattlerTag(BattlerTagType),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldStatMultiplierAttr {
    /// Scales `stat` of every other combatant on the field.
    MultiplyOthers { stat: StatType, multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatMultiplierAttr {
    Multiply {
        stat: StatType,
        multiplier: f64,
        category: Option<MoveCategory>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostDamageAttr {
    /// Fires when a hit takes the holder from above half HP to half or below.
    StatStageChangeBelowHalf { stat: StatType, stages: i8 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreWeatherEffectAttr {
    BlockWeatherDamage { weathers: Vec<WeatherType> },
    SuppressWeatherEffect { affects_immutable: bool },
}

/// One ability attribute, grouped by the hook that dispatches it.
#[derive(Debug, Clone, PartialEq)]
pub enum AbAttr {
    Generic(GenericAttr),
    PostBattleInit(PostBattleInitAttr),
    PreDefend(PreDefendAttr),
    PostDefend(PostDefendAttr),
    PreAttack(PreAttackAttr),
    PostAttack(PostAttackAttr),
    PreStatStageChange(PreStatStageChangeAttr),
    PostStatStageChange(PostStatStageChangeAttr),
    PostSummon(PostSummonAttr),
    PreSwitchOut(PreSwitchOutAttr),
    PostVictory(PostVictoryAttr),
    PostKnockOut(PostKnockOutAttr),
    PostFaint(PostFaintAttr),
    PostTurn(PostTurnAttr),
    PostWeatherChange(PostWeatherChangeAttr),
    PostWeatherLapse(PostWeatherLapseAttr),
    PostTerrainChange(PostTerrainChangeAttr),
    PreSetStatus(PreSetStatusAttr),
    PostSetStatus(PostSetStatusAttr),
    PreApplyBattlerTag(PreApplyBattlerTagAttr),
    CheckTrapped(CheckTrappedAttr),
    PostBattle(PostBattleAttr),
    PostMoveUsed(PostMoveUsedAttr),
    PostItemLost(PostItemLostAttr),
    FieldStatMultiplier(FieldStatMultiplierAttr),
    StatMultiplier(StatMultiplierAttr),
    PostDamage(PostDamageAttr),
    PreWeatherEffect(PreWeatherEffectAttr),
}

/// Extra values a trigger message may mention.
#[derive(Debug, Clone, Copy, Default)]
pub struct TriggerArgs {
    pub status: Option<StatusEffect>,
    pub tag: Option<BattlerTagType>,
    pub stat: Option<StatType>,
}

impl AbAttr {
    pub fn hook(&self) -> HookKind {
        match self {
            AbAttr::Generic(_) => HookKind::Generic,
            AbAttr::PostBattleInit(_) => HookKind::PostBattleInit,
            AbAttr::PreDefend(_) => HookKind::PreDefend,
            AbAttr::PostDefend(_) => HookKind::PostDefend,
            AbAttr::PreAttack(_) => HookKind::PreAttack,
            AbAttr::PostAttack(_) => HookKind::PostAttack,
            AbAttr::PreStatStageChange(_) => HookKind::PreStatStageChange,
            AbAttr::PostStatStageChange(_) => HookKind::PostStatStageChange,
            AbAttr::PostSummon(_) => HookKind::PostSummon,
            AbAttr::PreSwitchOut(_) => HookKind::PreSwitchOut,
            AbAttr::PostVictory(_) => HookKind::PostVictory,
            AbAttr::PostKnockOut(_) => HookKind::PostKnockOut,
            AbAttr::PostFaint(_) => HookKind::PostFaint,
            AbAttr::PostTurn(_) => HookKind::PostTurn,
            AbAttr::PostWeatherChange(_) => HookKind::PostWeatherChange,
            AbAttr::PostWeatherLapse(_) => HookKind::PostWeatherLapse,
            AbAttr::PostTerrainChange(_) => HookKind::PostTerrainChange,
            AbAttr::PreSetStatus(_) => HookKind::PreSetStatus,
            AbAttr::PostSetStatus(_) => HookKind::PostSetStatus,
            AbAttr::PreApplyBattlerTag(_) => HookKind::PreApplyBattlerTag,
            AbAttr::CheckTrapped(_) => HookKind::CheckTrapped,
            AbAttr::PostBattle(_) => HookKind::PostBattle,
            AbAttr::PostMoveUsed(_) => HookKind::PostMoveUsed,
            AbAttr::PostItemLost(_) => HookKind::PostItemLost,
            AbAttr::FieldStatMultiplier(_) => HookKind::FieldStatMultiplier,
            AbAttr::StatMultiplier(_) => HookKind::StatMultiplier,
            AbAttr::PostDamage(_) => HookKind::PostDamage,
            AbAttr::PreWeatherEffect(_) => HookKind::PreWeatherEffect,
        }
    }

    /// Whether the ability banner is shown when this attribute fires. Passive
    /// number tweaks and effects that queue their own phases stay quiet.
    pub fn default_show_ability(&self) -> bool {
        !matches!(
            self,
            AbAttr::StatMultiplier(_)
                | AbAttr::FieldStatMultiplier(_)
                | AbAttr::PreAttack(_)
                | AbAttr::PostSummon(PostSummonAttr::StatStageChange { .. })
                | AbAttr::PostSummon(PostSummonAttr::Message(_))
                | AbAttr::PreDefend(PreDefendAttr::ReceivedTypeDamageMultiplier { .. })
                | AbAttr::PostWeatherChange(_)
                | AbAttr::PostMoveUsed(_)
                | AbAttr::Generic(GenericAttr::DoubleBattleChance)
                | AbAttr::Generic(GenericAttr::RunSuccess)
        )
    }

    /// Text queued (and reported) when this attribute applies.
    pub fn trigger_message(
        &self,
        pokemon_name: &str,
        ability_name: &str,
        args: &TriggerArgs,
    ) -> Option<String> {
        match self {
            AbAttr::PostDefend(PostDefendAttr::ContactDamage { .. })
            | AbAttr::PostFaint(PostFaintAttr::ContactDamage { .. }) => Some(format!(
                "{}'s {} hurt its attacker!",
                pokemon_name, ability_name
            )),
            AbAttr::PreStatStageChange(PreStatStageChangeAttr::ProtectStat { stat }) => {
                let protected = stat
                    .or(args.stat)
                    .map(|stat| stat.to_string())
                    .unwrap_or_else(|| "stats".to_string());
                Some(format!(
                    "{}'s {} prevents lowering its {}!",
                    pokemon_name, ability_name, protected
                ))
            }
            AbAttr::PreSetStatus(PreSetStatusAttr::StatusEffectImmunity { .. }) => {
                Some(match args.status {
                    Some(status) => format!(
                        "{}'s {} prevents {}!",
                        pokemon_name, ability_name, status
                    ),
                    None => format!(
                        "{}'s {} prevents status problems!",
                        pokemon_name, ability_name
                    ),
                })
            }
            AbAttr::PreApplyBattlerTag(PreApplyBattlerTagAttr::BattlerTagImmunity { .. }) => {
                args.tag.map(|tag| {
                    format!("{}'s {} prevents {}!", pokemon_name, ability_name, tag)
                })
            }
            AbAttr::CheckTrapped(_) => Some(format!(
                "{}'s {} prevents switching!",
                pokemon_name, ability_name
            )),
            AbAttr::Generic(GenericAttr::IntimidateImmunity) => Some(format!(
                "{}'s {} prevents it from being intimidated!",
                pokemon_name, ability_name
            )),
            AbAttr::Generic(GenericAttr::BlockItemTheft) => Some(format!(
                "{}'s {} prevents item theft!",
                pokemon_name, ability_name
            )),
            AbAttr::PreDefend(PreDefendAttr::FullHpEndure) => {
                Some(format!("{} endured the hit!", pokemon_name))
            }
            AbAttr::PostSummon(PostSummonAttr::Message(template)) => {
                Some(template.replace("{pokemon}", pokemon_name))
            }
            _ => None,
        }
    }
}

/// An attribute as attached to an ability.
#[derive(Debug, Clone)]
pub struct AttrEntry {
    pub attr: AbAttr,
    pub show_ability: bool,
    pub extra_condition: Option<AbilityCondition>,
}

/// Whether an attribute took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    NotApplied,
    Applied,
    /// Took effect; the scheduler should play `VisualCue` before moving on.
    AppliedAwaitingCue(VisualCue),
}

impl ApplyOutcome {
    pub fn applied(&self) -> bool {
        !matches!(self, ApplyOutcome::NotApplied)
    }

    pub fn from_applied(applied: bool) -> Self {
        if applied {
            ApplyOutcome::Applied
        } else {
            ApplyOutcome::NotApplied
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualCue {
    FormChange,
    AbilityActivation,
}
