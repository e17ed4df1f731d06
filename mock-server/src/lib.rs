use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamPreview {
    #[serde(rename = "teamId")]
    pub team_id: String,
    pub name: String,
    #[serde(rename = "logoURL")]
    pub logo_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaguePreview {
    pub id: String,
    pub name: String,
    pub country_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: String,
    pub country_name: String,
    pub clubs: Vec<TeamPreview>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Nationality {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerPreview {
    pub id: String,
    pub name: String,
    pub overall: u8,
    pub position: String,
    pub nationality: Nationality,
    pub club: TeamPreview,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub age: u8,
    pub overall: u8,
    pub potential: u8,
    pub positions: Vec<String>,
    pub nationality: Nationality,
    pub club: TeamPreview,
}

#[derive(Debug, Deserialize)]
pub struct LeaguesQuery {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlayerSearchQuery {
    pub nationality: Option<String>,
    pub position: Option<String>,
    pub ovr_min: Option<u8>,
    pub ovr_max: Option<u8>,
    pub sort: Option<String>,
}

struct ClubRecord {
    league_id: &'static str,
    team: TeamPreview,
}

struct PlayerRecord {
    full_name: &'static str,
    age: u8,
    potential: u8,
    positions: Vec<String>,
    preview: PlayerPreview,
}

/// Fixture data served by every route.
pub struct Db {
    leagues: Vec<LeaguePreview>,
    clubs: Vec<ClubRecord>,
    nationalities: Vec<Nationality>,
    players: Vec<PlayerRecord>,
}

pub type SharedDb = Arc<Db>;

fn team(id: &str, name: &str) -> TeamPreview {
    TeamPreview {
        team_id: id.to_string(),
        name: name.to_string(),
        logo_url: format!("https://cdn.betterpick.dev/clubs/{id}.png"),
    }
}

fn nationality(id: &str, name: &str) -> Nationality {
    Nationality {
        id: id.to_string(),
        name: name.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn player_record(
    id: &str,
    name: &str,
    full_name: &'static str,
    age: u8,
    overall: u8,
    potential: u8,
    positions: &[&str],
    nationality: &Nationality,
    club: &TeamPreview,
) -> PlayerRecord {
    PlayerRecord {
        full_name,
        age,
        potential,
        positions: positions.iter().map(|p| p.to_string()).collect(),
        preview: PlayerPreview {
            id: id.to_string(),
            name: name.to_string(),
            overall,
            position: positions[0].to_string(),
            nationality: nationality.clone(),
            club: club.clone(),
        },
    }
}

impl Db {
    pub fn fixtures() -> Self {
        let leagues = vec![
            LeaguePreview {
                id: "53".to_string(),
                name: "LaLiga Santander".to_string(),
                country_name: "Spain".to_string(),
            },
            LeaguePreview {
                id: "13".to_string(),
                name: "Premier League".to_string(),
                country_name: "England".to_string(),
            },
        ];
        let clubs = vec![
            ClubRecord {
                league_id: "53",
                team: team("241", "FC Barcelona"),
            },
            ClubRecord {
                league_id: "53",
                team: team("243", "Real Madrid"),
            },
            ClubRecord {
                league_id: "13",
                team: team("10", "Manchester City"),
            },
        ];
        let nationalities = vec![
            nationality("52", "Argentina"),
            nationality("54", "Brazil"),
            nationality("18", "France"),
            nationality("7", "Belgium"),
        ];
        let players = vec![
            player_record("158023", "L. Messi", "Lionel Andrés Messi Cuccittini", 32, 94, 94, &["RW", "ST"], &nationalities[0], &clubs[0].team),
            player_record("190871", "Neymar Jr", "Neymar da Silva Santos Júnior", 27, 88, 89, &["LW"], &nationalities[1], &clubs[0].team),
            player_record("192985", "K. De Bruyne", "Kevin De Bruyne", 28, 91, 91, &["CAM", "CM"], &nationalities[3], &clubs[2].team),
            player_record("165153", "K. Benzema", "Karim Benzema", 31, 89, 89, &["ST"], &nationalities[2], &clubs[1].team),
            player_record("192119", "T. Courtois", "Thibaut Courtois", 27, 89, 90, &["GK"], &nationalities[3], &clubs[1].team),
        ];
        Self {
            leagues,
            clubs,
            nationalities,
            players,
        }
    }
}

pub fn app() -> Router {
    router(Arc::new(Db::fixtures()))
}

pub fn router(db: SharedDb) -> Router {
    Router::new()
        .route("/leagues", get(list_leagues))
        .route("/leagues/{league_id}", get(get_league))
        .route("/nationalities", get(list_nationalities))
        .route("/players/club/{club_id}", get(club_players))
        .route("/players/search", get(search_players))
        .route("/players/{player_id}/full", get(get_player))
        .route("/search", get(search))
        .route("/clubs/{club_id}", get(get_club))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_leagues(
    State(db): State<SharedDb>,
    Query(query): Query<LeaguesQuery>,
) -> Json<serde_json::Value> {
    let leagues: Vec<&LeaguePreview> = db
        .leagues
        .iter()
        .filter(|l| query.id.as_deref().is_none_or(|id| l.id == id))
        .collect();
    Json(serde_json::json!({ "leagues": leagues }))
}

async fn get_league(
    State(db): State<SharedDb>,
    Path(league_id): Path<String>,
) -> Result<Json<League>, StatusCode> {
    let league = db
        .leagues
        .iter()
        .find(|l| l.id == league_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(League {
        id: league.id.clone(),
        name: league.name.clone(),
        country_name: league.country_name.clone(),
        clubs: db
            .clubs
            .iter()
            .filter(|c| c.league_id == league_id)
            .map(|c| c.team.clone())
            .collect(),
    }))
}

async fn list_nationalities(State(db): State<SharedDb>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "nationalities": db.nationalities }))
}

async fn club_players(
    State(db): State<SharedDb>,
    Path(club_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if !db.clubs.iter().any(|c| c.team.team_id == club_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let players: Vec<&PlayerPreview> = db
        .players
        .iter()
        .map(|p| &p.preview)
        .filter(|p| p.club.team_id == club_id)
        .collect();
    Ok(Json(serde_json::json!({ "players": players })))
}

async fn get_player(
    State(db): State<SharedDb>,
    Path(player_id): Path<String>,
) -> Result<Json<Player>, StatusCode> {
    let record = db
        .players
        .iter()
        .find(|p| p.preview.id == player_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let preview = &record.preview;
    Ok(Json(Player {
        id: preview.id.clone(),
        name: preview.name.clone(),
        full_name: record.full_name.to_string(),
        age: record.age,
        overall: preview.overall,
        potential: record.potential,
        positions: record.positions.clone(),
        nationality: preview.nationality.clone(),
        club: preview.club.clone(),
    }))
}

async fn search(
    State(db): State<SharedDb>,
    Query(query): Query<SearchQuery>,
) -> Json<serde_json::Value> {
    let needle = query.name.to_lowercase();
    let matches = |name: &str| !needle.is_empty() && name.to_lowercase().contains(&needle);
    let players: Vec<&PlayerPreview> = db
        .players
        .iter()
        .map(|p| &p.preview)
        .filter(|p| matches(&p.name))
        .collect();
    let clubs: Vec<&TeamPreview> = db
        .clubs
        .iter()
        .map(|c| &c.team)
        .filter(|t| matches(&t.name))
        .collect();
    let leagues: Vec<&LeaguePreview> = db.leagues.iter().filter(|l| matches(&l.name)).collect();
    Json(serde_json::json!({ "players": players, "clubs": clubs, "leagues": leagues }))
}

async fn search_players(
    State(db): State<SharedDb>,
    Query(query): Query<PlayerSearchQuery>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let min = query.ovr_min.unwrap_or(1);
    let max = query.ovr_max.unwrap_or(99);
    if min > max {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut players: Vec<&PlayerPreview> = db
        .players
        .iter()
        .map(|p| &p.preview)
        .filter(|p| query.nationality.as_deref().is_none_or(|n| p.nationality.id == n))
        .filter(|p| query.position.as_deref().is_none_or(|pos| p.position == pos))
        .filter(|p| (min..=max).contains(&p.overall))
        .collect();
    match query.sort.as_deref() {
        Some("asc") => players.sort_by_key(|p| p.overall),
        None | Some("desc") => players.sort_by_key(|p| std::cmp::Reverse(p.overall)),
        Some(_) => return Err(StatusCode::BAD_REQUEST),
    }
    Ok(Json(serde_json::json!({ "players": players })))
}

async fn get_club(
    State(db): State<SharedDb>,
    Path(club_id): Path<String>,
) -> Result<Json<TeamPreview>, StatusCode> {
    db.clubs
        .iter()
        .find(|c| c.team.team_id == club_id)
        .map(|c| Json(c.team.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}
