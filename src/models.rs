use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RankError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Epic,
    Steam,
    Psn,
    Xbl,
    Switch,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Epic => "epic",
            Platform::Steam => "steam",
            Platform::Psn => "psn",
            Platform::Xbl => "xbl",
            Platform::Switch => "switch",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "epic" => Ok(Platform::Epic),
            "steam" => Ok(Platform::Steam),
            "psn" => Ok(Platform::Psn),
            "xbl" => Ok(Platform::Xbl),
            "switch" => Ok(Platform::Switch),
            _ => Err(RankError::InvalidPlatform(s.to_string())),
        }
    }
}

/// A `platform:username` pair as accepted by the rank endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentifier {
    pub platform: Platform,
    pub username: String,
}

impl FromStr for PlayerIdentifier {
    type Err = RankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let (platform, username) = match parts.as_slice() {
            [platform, username] if !platform.is_empty() && !username.is_empty() => {
                (*platform, *username)
            }
            _ => return Err(RankError::InvalidFormat(s.to_string())),
        };

        Ok(PlayerIdentifier {
            platform: platform.parse()?,
            username: username.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankInfo {
    pub rank: String,
    pub division: i32,
    pub mmr: i32,
    pub tier: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

impl Default for RankInfo {
    fn default() -> Self {
        RankInfo {
            rank: "Unranked".to_string(),
            division: 0,
            mmr: 0,
            tier: 0,
            icon_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRank {
    pub player_id: String,
    pub platform: Platform,
    #[serde(rename = "duel1v1", default, skip_serializing_if = "Option::is_none")]
    pub duel_1v1: Option<RankInfo>,
    #[serde(rename = "doubles2v2", default, skip_serializing_if = "Option::is_none")]
    pub doubles_2v2: Option<RankInfo>,
    #[serde(rename = "standard3v3", default, skip_serializing_if = "Option::is_none")]
    pub standard_3v3: Option<RankInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournament: Option<RankInfo>,
}

impl PlayerRank {
    pub fn new(identifier: &PlayerIdentifier) -> Self {
        PlayerRank {
            player_id: identifier.username.clone(),
            platform: identifier.platform,
            duel_1v1: None,
            doubles_2v2: None,
            standard_3v3: None,
            tournament: None,
        }
    }

    pub fn has_any_rank(&self) -> bool {
        self.duel_1v1.is_some()
            || self.doubles_2v2.is_some()
            || self.standard_3v3.is_some()
            || self.tournament.is_some()
    }
}

// Tracker.gg profile payload. Missing keys and explicit nulls both fall back to
// defaults so partial profiles still parse.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
pub struct TrackerResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: TrackerData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerData {
    #[serde(deserialize_with = "null_as_default")]
    pub platform_info: PlatformInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub segments: Vec<Segment>,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: TrackerMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformInfo {
    pub platform_user_handle: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackerMetadata {
    pub current_season: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Segment {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: SegmentMetadata,
    #[serde(deserialize_with = "null_as_default")]
    pub stats: HashMap<String, StatValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SegmentMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatValue {
    pub value: Option<f64>,
    pub metadata: Option<StatMetadata>,
}

impl StatValue {
    /// Tracker reports every stat as a float; ranks are whole numbers.
    pub fn as_i32(&self) -> i32 {
        self.value.unwrap_or(0.0) as i32
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatMetadata {
    pub icon_url: Option<String>,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_identifier_case_insensitively() {
        let id: PlayerIdentifier = "EPIC:SomePlayer".parse().unwrap();
        assert_eq!(id.platform, Platform::Epic);
        assert_eq!(id.username, "SomePlayer");

        let id: PlayerIdentifier = "Switch:someone".parse().unwrap();
        assert_eq!(id.platform, Platform::Switch);
    }

    #[test]
    fn rejects_identifiers_without_exactly_one_separator() {
        for input in ["", "epic", "epic:", ":SomePlayer", ":", "epic:a:b", "epic::b"] {
            let result = input.parse::<PlayerIdentifier>();
            assert!(
                matches!(result, Err(RankError::InvalidFormat(_))),
                "expected InvalidFormat for {:?}, got {:?}",
                input,
                result
            );
        }
    }

    #[test]
    fn rejects_unknown_platforms() {
        for input in ["ps5:someone", "origin:someone", "xbox:someone"] {
            let result = input.parse::<PlayerIdentifier>();
            assert!(matches!(result, Err(RankError::InvalidPlatform(_))), "{:?}", input);
        }
    }

    #[test]
    fn player_rank_round_trips_and_omits_missing_modes() {
        let mut rank = PlayerRank::new(&"psn:someone".parse().unwrap());
        rank.doubles_2v2 = Some(RankInfo {
            rank: "Champion II".to_string(),
            division: 3,
            mmr: 1290,
            tier: 17,
            icon_url: Some("https://trackercdn.com/champ2.png".to_string()),
        });
        rank.tournament = Some(RankInfo::default());

        let json = serde_json::to_value(&rank).unwrap();
        assert_eq!(json["playerId"], "someone");
        assert_eq!(json["platform"], "psn");
        assert_eq!(json["doubles2v2"]["iconUrl"], "https://trackercdn.com/champ2.png");
        assert!(json.get("duel1v1").is_none());
        assert!(json.get("standard3v3").is_none());
        assert!(json["tournament"].get("iconUrl").is_none());

        let back: PlayerRank = serde_json::from_value(json).unwrap();
        assert_eq!(back, rank);
    }

    #[test]
    fn tracker_profile_tolerates_nulls_and_missing_fields() {
        let body = r#"{
            "data": {
                "segments": [
                    {
                        "type": "playlist",
                        "metadata": { "name": "Ranked Duel 1v1" },
                        "stats": {
                            "tier": { "value": 13.0, "metadata": { "name": "Diamond I" } },
                            "division": { "value": null, "metadata": null }
                        }
                    },
                    { "type": "overview" }
                ]
            }
        }"#;

        let profile: TrackerResponse = serde_json::from_str(body).unwrap();
        assert_eq!(profile.data.segments.len(), 2);
        let duel = &profile.data.segments[0];
        assert_eq!(duel.stats["tier"].as_i32(), 13);
        assert_eq!(duel.stats["division"].as_i32(), 0);
        assert!(profile.data.segments[1].stats.is_empty());
    }

    #[test]
    fn tracker_profile_treats_null_as_default() {
        let profile: TrackerResponse = serde_json::from_str(r#"{ "data": null }"#).unwrap();
        assert!(profile.data.segments.is_empty());

        let body = r#"{
            "data": {
                "platformInfo": null,
                "metadata": null,
                "segments": null
            }
        }"#;
        let profile: TrackerResponse = serde_json::from_str(body).unwrap();
        assert!(profile.data.segments.is_empty());
        assert!(profile.data.platform_info.platform_user_handle.is_none());
        assert!(profile.data.metadata.current_season.is_none());

        let body = r#"{
            "data": {
                "segments": [
                    { "type": null, "metadata": null, "stats": null },
                    { "type": "playlist", "metadata": { "name": null }, "stats": {} }
                ]
            }
        }"#;
        let profile: TrackerResponse = serde_json::from_str(body).unwrap();
        let segments = &profile.data.segments;
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].kind, "");
        assert_eq!(segments[0].metadata.name, "");
        assert!(segments[0].stats.is_empty());
        assert_eq!(segments[1].kind, "playlist");
        assert_eq!(segments[1].metadata.name, "");
    }
}
