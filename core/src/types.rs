//! Domain DTOs for the Betterpick API.
//!
//! # Design
//! These types mirror the JSON the API serves (camelCase keys) but are
//! defined independently from the mock-server crate; integration tests
//! catch schema drift between the two.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Represents a team with only the information needed for a list row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPreview {
    #[serde(rename = "teamId")]
    pub team_id: String,
    pub name: String,
    #[serde(rename = "logoURL")]
    pub logo_url: Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaguePreview {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default, rename = "logoURL", skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<Url>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(default)]
    pub clubs: Vec<TeamPreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nationality {
    pub id: String,
    pub name: String,
}

/// Playing position, serialized as its short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "GK")]
    Goalkeeper,
    #[serde(rename = "CB")]
    CentreBack,
    #[serde(rename = "LB")]
    LeftBack,
    #[serde(rename = "RB")]
    RightBack,
    #[serde(rename = "CDM")]
    DefensiveMidfielder,
    #[serde(rename = "CM")]
    CentralMidfielder,
    #[serde(rename = "CAM")]
    AttackingMidfielder,
    #[serde(rename = "LM")]
    LeftMidfielder,
    #[serde(rename = "RM")]
    RightMidfielder,
    #[serde(rename = "LW")]
    LeftWinger,
    #[serde(rename = "RW")]
    RightWinger,
    #[serde(rename = "ST")]
    Striker,
}

impl Position {
    pub const ALL: [Position; 12] = [
        Position::Goalkeeper,
        Position::CentreBack,
        Position::LeftBack,
        Position::RightBack,
        Position::DefensiveMidfielder,
        Position::CentralMidfielder,
        Position::AttackingMidfielder,
        Position::LeftMidfielder,
        Position::RightMidfielder,
        Position::LeftWinger,
        Position::RightWinger,
        Position::Striker,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::CentreBack => "CB",
            Position::LeftBack => "LB",
            Position::RightBack => "RB",
            Position::DefensiveMidfielder => "CDM",
            Position::CentralMidfielder => "CM",
            Position::AttackingMidfielder => "CAM",
            Position::LeftMidfielder => "LM",
            Position::RightMidfielder => "RM",
            Position::LeftWinger => "LW",
            Position::RightWinger => "RW",
            Position::Striker => "ST",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::CentreBack => "Centre Back",
            Position::LeftBack => "Left Back",
            Position::RightBack => "Right Back",
            Position::DefensiveMidfielder => "Defensive Midfielder",
            Position::CentralMidfielder => "Central Midfielder",
            Position::AttackingMidfielder => "Attacking Midfielder",
            Position::LeftMidfielder => "Left Midfielder",
            Position::RightMidfielder => "Right Midfielder",
            Position::LeftWinger => "Left Winger",
            Position::RightWinger => "Right Winger",
            Position::Striker => "Striker",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A player as shown in search results and squad lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPreview {
    pub id: String,
    pub name: String,
    pub overall: u8,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<Nationality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<TeamPreview>,
}

/// Full player detail from `GET /players/{id}/full`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    pub overall: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential: Option<u8>,
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<Nationality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<TeamPreview>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<Url>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLeaguesResponseBody {
    pub leagues: Vec<LeaguePreview>,
}

pub type GetLeagueResponseBody = League;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetNationalitiesBody {
    pub nationalities: Vec<Nationality>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetClubPlayersResponseBody {
    pub players: Vec<PlayerPreview>,
}

/// Free-text search results; any list may be missing from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetSearchResponseBody {
    #[serde(default)]
    pub players: Vec<PlayerPreview>,
    #[serde(default)]
    pub clubs: Vec<TeamPreview>,
    #[serde(default)]
    pub leagues: Vec<LeaguePreview>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPlayersResponseBody {
    pub players: Vec<PlayerPreview>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_preview_uses_api_keys() {
        let json = r#"{"teamId":"241","name":"FC Barcelona","logoURL":"https://cdn.example.com/241.png"}"#;
        let team: TeamPreview = serde_json::from_str(json).unwrap();
        assert_eq!(team.team_id, "241");
        assert_eq!(team.logo_url.as_str(), "https://cdn.example.com/241.png");

        let back = serde_json::to_value(&team).unwrap();
        assert_eq!(back["teamId"], "241");
        assert_eq!(back["logoURL"], "https://cdn.example.com/241.png");
    }

    #[test]
    fn team_preview_rejects_invalid_logo_url() {
        let json = r#"{"teamId":"1","name":"X","logoURL":"not a url"}"#;
        assert!(serde_json::from_str::<TeamPreview>(json).is_err());
    }

    #[test]
    fn position_codes_match_serde() {
        for position in Position::ALL {
            let json = serde_json::to_value(position).unwrap();
            assert_eq!(json, position.code());
        }
    }

    #[test]
    fn search_body_tolerates_missing_lists() {
        let body: GetSearchResponseBody = serde_json::from_str(r#"{"players":[]}"#).unwrap();
        assert!(body.clubs.is_empty());
        assert!(body.leagues.is_empty());
    }

    #[test]
    fn player_optional_fields_default() {
        let json = r#"{"id":"158023","name":"L. Messi","overall":94}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert!(player.positions.is_empty());
        assert!(player.club.is_none());
        assert!(player.photo_url.is_none());
    }
}
