//! Stateless HTTP request builder and response parser for the Betterpick API.
//!
//! # Design
//! `BetterpickClient` holds only its configuration. Each endpoint has a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; the round-trip in between belongs to the
//! host. `ApiManager` glues the two halves to a `Transport`.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::filter::PlayerFilterData;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    GetClubPlayersResponseBody, GetLeagueResponseBody, GetLeaguesResponseBody,
    GetNationalitiesBody, GetPlayersResponseBody, GetSearchResponseBody, Player, TeamPreview,
};

/// Synchronous, stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct BetterpickClient {
    config: ClientConfig,
}

impl Default for BetterpickClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl BetterpickClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a request for `segments` below the base URL.
    ///
    /// Every segment is percent-encoded on its own, so identifiers containing
    /// `/`, `?` or spaces stay inside their segment. Parameters are appended
    /// in iteration order with their values form-encoded.
    pub fn request<K, V>(
        &self,
        segments: &[&str],
        method: HttpMethod,
        parameters: Option<&[(K, V)]>,
    ) -> Result<HttpRequest, ApiError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = Url::parse(&self.config.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);

        if let Some(parameters) = parameters.filter(|p| !p.is_empty()) {
            let mut query = url.query_pairs_mut();
            for (key, value) in parameters {
                query.append_pair(key.as_ref(), value.as_ref());
            }
        }

        debug!(%method, url = %url, "built request");
        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            timeout: self.config.timeout,
        })
    }

    fn get(&self, segments: &[&str]) -> Result<HttpRequest, ApiError> {
        self.request::<&str, &str>(segments, HttpMethod::Get, None)
    }

    /// `GET /leagues`, optionally narrowed to one id with `?id=`.
    pub fn build_leagues(&self, league_id: Option<&str>) -> Result<HttpRequest, ApiError> {
        match league_id {
            Some(id) => self.request(&["leagues"], HttpMethod::Get, Some(&[("id", id)][..])),
            None => self.get(&["leagues"]),
        }
    }

    pub fn build_league(&self, league_id: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["leagues", league_id])
    }

    pub fn build_nationalities(&self) -> Result<HttpRequest, ApiError> {
        self.get(&["nationalities"])
    }

    pub fn build_club_players(&self, club_id: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["players", "club", club_id])
    }

    pub fn build_player(&self, player_id: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["players", player_id, "full"])
    }

    pub fn build_search(&self, name: &str) -> Result<HttpRequest, ApiError> {
        self.request(&["search"], HttpMethod::Get, Some(&[("name", name)][..]))
    }

    pub fn build_players(&self, filter: &PlayerFilterData) -> Result<HttpRequest, ApiError> {
        let parameters = filter.parameters();
        self.request(&["players", "search"], HttpMethod::Get, Some(parameters.as_slice()))
    }

    pub fn build_club(&self, club_id: &str) -> Result<HttpRequest, ApiError> {
        self.get(&["clubs", club_id])
    }

    pub fn parse_leagues(&self, response: HttpResponse) -> Result<GetLeaguesResponseBody, ApiError> {
        parse_body(response)
    }

    pub fn parse_league(&self, response: HttpResponse) -> Result<GetLeagueResponseBody, ApiError> {
        parse_body(response)
    }

    pub fn parse_nationalities(&self, response: HttpResponse) -> Result<GetNationalitiesBody, ApiError> {
        parse_body(response)
    }

    pub fn parse_club_players(
        &self,
        response: HttpResponse,
    ) -> Result<GetClubPlayersResponseBody, ApiError> {
        parse_body(response)
    }

    pub fn parse_player(&self, response: HttpResponse) -> Result<Player, ApiError> {
        parse_body(response)
    }

    pub fn parse_search(&self, response: HttpResponse) -> Result<GetSearchResponseBody, ApiError> {
        parse_body(response)
    }

    pub fn parse_players(&self, response: HttpResponse) -> Result<GetPlayersResponseBody, ApiError> {
        parse_body(response)
    }

    pub fn parse_club(&self, response: HttpResponse) -> Result<TeamPreview, ApiError> {
        parse_body(response)
    }
}

/// Validate the status and decode the JSON body into `B`.
pub fn parse_body<B: DeserializeOwned>(response: HttpResponse) -> Result<B, ApiError> {
    check_status(&response)?;
    let body = match response.body {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Err(ApiError::InvalidResponseBody("response body is empty".to_string())),
    };
    serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponseBody(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..=299).contains(&response.status) {
        Ok(())
    } else {
        Err(ApiError::InvalidStatusCode {
            status: response.status,
        })
    }
}
