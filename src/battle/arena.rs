use crate::pokemon::CombatantId;
use schema::{ArenaTagSide, ArenaTagType, TerrainType, WeatherType};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Weather {
    pub weather_type: WeatherType,
    /// Zero lasts until replaced.
    pub turns_left: u8,
}

impl Weather {
    pub fn new(weather_type: WeatherType, turns_left: u8) -> Self {
        Self {
            weather_type,
            turns_left,
        }
    }

    /// Count one turn down. Returns false once the weather has run out.
    pub fn lapse(&mut self) -> bool {
        if self.turns_left == 0 {
            return true;
        }
        self.turns_left -= 1;
        self.turns_left > 0
    }

    pub fn is_immutable(&self) -> bool {
        self.weather_type.is_immutable()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terrain {
    pub terrain_type: TerrainType,
    pub turns_left: u8,
}

impl Terrain {
    pub fn lapse(&mut self) -> bool {
        if self.turns_left == 0 {
            return true;
        }
        self.turns_left -= 1;
        self.turns_left > 0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ArenaTag {
    pub tag_type: ArenaTagType,
    pub side: ArenaTagSide,
    pub turns_left: u8,
    pub source_id: Option<CombatantId>,
    pub layers: u8,
}

impl ArenaTag {
    pub fn max_layers(tag_type: ArenaTagType) -> u8 {
        match tag_type {
            ArenaTagType::Spikes => 3,
            _ => 1,
        }
    }
}

/// Field state shared by both sides: weather, terrain and side tags.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Arena {
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
    pub tags: Vec<ArenaTag>,
}

impl Arena {
    pub fn weather_type(&self) -> Option<WeatherType> {
        self.weather.map(|weather| weather.weather_type)
    }

    pub fn terrain_type(&self) -> Option<TerrainType> {
        self.terrain.map(|terrain| terrain.terrain_type)
    }

    pub fn get_tag(&self, tag_type: ArenaTagType, side: ArenaTagSide) -> Option<&ArenaTag> {
        self.tags
            .iter()
            .find(|tag| tag.tag_type == tag_type && (tag.side == side || tag.side == ArenaTagSide::Both))
    }

    /// Add a tag or another layer of an existing one. Returns false when the
    /// tag is already present at its maximum layer count.
    pub fn add_tag(
        &mut self,
        tag_type: ArenaTagType,
        turns: u8,
        source_id: Option<CombatantId>,
        side: ArenaTagSide,
    ) -> bool {
        if let Some(existing) = self
            .tags
            .iter_mut()
            .find(|tag| tag.tag_type == tag_type && tag.side == side)
        {
            if existing.layers >= ArenaTag::max_layers(tag_type) {
                return false;
            }
            existing.layers += 1;
            return true;
        }
        self.tags.push(ArenaTag {
            tag_type,
            side,
            turns_left: turns,
            source_id,
            layers: 1,
        });
        true
    }

    pub fn remove_tag(&mut self, tag_type: ArenaTagType, side: ArenaTagSide) -> bool {
        let before = self.tags.len();
        self.tags
            .retain(|tag| !(tag.tag_type == tag_type && tag.side == side));
        before != self.tags.len()
    }

    /// Count every timed tag down and return the ones that expired.
    pub fn lapse_tags(&mut self) -> Vec<ArenaTag> {
        let mut expired = Vec::new();
        self.tags.retain_mut(|tag| {
            if tag.turns_left == 0 {
                return true;
            }
            tag.turns_left -= 1;
            if tag.turns_left == 0 {
                expired.push(tag.clone());
                return false;
            }
            true
        });
        expired
    }

    pub fn reset(&mut self) {
        self.weather = None;
        self.terrain = None;
        self.tags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spikes_stack_to_three_layers() {
        let mut arena = Arena::default();
        for _ in 0..3 {
            assert!(arena.add_tag(ArenaTagType::Spikes, 0, None, ArenaTagSide::Enemy));
        }
        assert!(!arena.add_tag(ArenaTagType::Spikes, 0, None, ArenaTagSide::Enemy));
        assert_eq!(
            arena
                .get_tag(ArenaTagType::Spikes, ArenaTagSide::Enemy)
                .map(|tag| tag.layers),
            Some(3)
        );
        assert!(arena
            .get_tag(ArenaTagType::Spikes, ArenaTagSide::Player)
            .is_none());
    }

    #[test]
    fn test_timed_tags_expire() {
        let mut arena = Arena::default();
        arena.add_tag(ArenaTagType::Mist, 2, None, ArenaTagSide::Player);
        assert!(arena.lapse_tags().is_empty());
        let expired = arena.lapse_tags();
        assert_eq!(expired.len(), 1);
        assert!(arena.tags.is_empty());
    }

    #[test]
    fn test_weather_lapse() {
        let mut weather = Weather::new(WeatherType::Rain, 2);
        assert!(weather.lapse());
        assert!(!weather.lapse());

        let mut endless = Weather::new(WeatherType::Sandstorm, 0);
        assert!(endless.lapse());
    }
}
