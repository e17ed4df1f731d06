//! Endpoint methods bound to a transport.
//!
//! # Design
//! `ApiManager` pairs a `BetterpickClient` with a `Transport`. Each endpoint
//! method builds one request, hands it to the transport and classifies the
//! outcome through `perform`. Callers only ever see `ManagerError`; the
//! detailed `ApiError` is logged and dropped here.

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::client::{parse_body, BetterpickClient};
use crate::error::{ApiError, ManagerError};
use crate::filter::PlayerFilterData;
use crate::http::{HttpRequest, Transport};
use crate::types::{
    GetClubPlayersResponseBody, GetLeagueResponseBody, GetLeaguesResponseBody,
    GetNationalitiesBody, GetPlayersResponseBody, GetSearchResponseBody, Player, TeamPreview,
};

pub type ManagerResult<B> = Result<B, ManagerError>;

#[derive(Debug, Clone)]
pub struct ApiManager<T> {
    client: BetterpickClient,
    transport: T,
}

impl<T: Transport> ApiManager<T> {
    pub fn new(client: BetterpickClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BetterpickClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run `request` and decode the body as `B`.
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub fn perform<B>(
        &self,
        request: HttpRequest,
        completion: impl FnOnce(ManagerResult<B>) + Send + 'static,
    ) where
        B: DeserializeOwned + 'static,
    {
        self.transport.perform(
            request,
            Box::new(move |outcome| {
                let result = outcome.and_then(parse_body::<B>).map_err(classify);
                completion(result)
            }),
        );
    }

    fn dispatch<B>(
        &self,
        built: Result<HttpRequest, ApiError>,
        completion: impl FnOnce(ManagerResult<B>) + Send + 'static,
    ) where
        B: DeserializeOwned + 'static,
    {
        match built {
            Ok(request) => self.perform(request, completion),
            Err(e) => completion(Err(classify(e))),
        }
    }

    /// `GET /leagues[?id=]`
    #[instrument(skip(self, completion))]
    pub fn leagues(
        &self,
        league_id: Option<&str>,
        completion: impl FnOnce(ManagerResult<GetLeaguesResponseBody>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_leagues(league_id), completion)
    }

    /// `GET /leagues/{leagueID}`
    #[instrument(skip(self, completion))]
    pub fn league(
        &self,
        league_id: &str,
        completion: impl FnOnce(ManagerResult<GetLeagueResponseBody>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_league(league_id), completion)
    }

    /// `GET /nationalities`
    #[instrument(skip(self, completion))]
    pub fn nationalities(
        &self,
        completion: impl FnOnce(ManagerResult<GetNationalitiesBody>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_nationalities(), completion)
    }

    /// `GET /players/club/{clubID}`
    #[instrument(skip(self, completion))]
    pub fn club_players(
        &self,
        club_id: &str,
        completion: impl FnOnce(ManagerResult<GetClubPlayersResponseBody>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_club_players(club_id), completion)
    }

    /// `GET /players/{playerID}/full`
    #[instrument(skip(self, completion))]
    pub fn player(
        &self,
        player_id: &str,
        completion: impl FnOnce(ManagerResult<Player>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_player(player_id), completion)
    }

    /// `GET /search?name={name}`
    #[instrument(skip(self, completion))]
    pub fn search(
        &self,
        name: &str,
        completion: impl FnOnce(ManagerResult<GetSearchResponseBody>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_search(name), completion)
    }

    /// `GET /players/search` with the filter as query parameters.
    #[instrument(skip(self, completion))]
    pub fn players(
        &self,
        filter: &PlayerFilterData,
        completion: impl FnOnce(ManagerResult<GetPlayersResponseBody>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_players(filter), completion)
    }

    /// `GET /clubs/{clubID}`
    #[instrument(skip(self, completion))]
    pub fn club(
        &self,
        club_id: &str,
        completion: impl FnOnce(ManagerResult<TeamPreview>) + Send + 'static,
    ) {
        self.dispatch(self.client.build_club(club_id), completion)
    }
}

fn classify(error: ApiError) -> ManagerError {
    let kind = error.classify();
    match kind {
        ManagerError::UserNetwork => debug!(%error, "request failed on the user's network"),
        ManagerError::Server => warn!(%error, "request failed on the server side"),
    }
    kind
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::sync::Mutex;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::{HttpResponse, TransportCompletion, TransportResult};

    /// Answers every request with a canned outcome and records the URL.
    struct CannedTransport {
        outcome: TransportResult,
        urls: Mutex<Vec<String>>,
    }

    impl CannedTransport {
        fn new(outcome: TransportResult) -> Self {
            Self {
                outcome,
                urls: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        fn perform(&self, request: HttpRequest, completion: TransportCompletion) {
            self.urls.lock().unwrap().push(request.url);
            completion(self.outcome.clone());
        }
    }

    fn manager(outcome: TransportResult) -> ApiManager<CannedTransport> {
        ApiManager::new(
            BetterpickClient::new(ClientConfig::new("http://localhost:8080")),
            CannedTransport::new(outcome),
        )
    }

    fn run<B: Send + 'static>(call: impl FnOnce(mpsc::Sender<ManagerResult<B>>)) -> ManagerResult<B> {
        let (tx, rx) = mpsc::channel();
        call(tx);
        rx.recv().unwrap()
    }

    #[test]
    fn success_decodes_body() {
        let m = manager(Ok(HttpResponse::new(
            200,
            r#"{"nationalities":[{"id":"54","name":"Brazil"}]}"#,
        )));
        let result = run(|tx| m.nationalities(move |r| tx.send(r).unwrap()));
        let body = result.unwrap();
        assert_eq!(body.nationalities.len(), 1);
        assert_eq!(body.nationalities[0].name, "Brazil");
    }

    #[test]
    fn no_connectivity_is_user_network() {
        let m = manager(Err(ApiError::Transport("offline".to_string())));
        let result = run(|tx| m.leagues(None, move |r| tx.send(r).unwrap()));
        assert_eq!(result.unwrap_err(), ManagerError::UserNetwork);
    }

    #[test]
    fn http_500_is_server() {
        let m = manager(Ok(HttpResponse::new(500, "boom")));
        let result = run(|tx| m.club("241", move |r| tx.send(r).unwrap()));
        assert_eq!(result.unwrap_err(), ManagerError::Server);
    }

    #[test]
    fn undecodable_body_is_server() {
        let m = manager(Ok(HttpResponse::new(200, r#"{"players":"nope"}"#)));
        let result = run(|tx| m.search("messi", move |r| tx.send(r).unwrap()));
        assert_eq!(result.unwrap_err(), ManagerError::Server);
    }

    #[test]
    fn every_transport_cause_maps_to_one_kind() {
        let cases = [
            (Ok(HttpResponse::new(404, "")), ManagerError::Server),
            (Ok(HttpResponse::new(200, "")), ManagerError::Server),
            (Err(ApiError::ResponseNotCreated), ManagerError::Server),
            (Err(ApiError::Unknown("?".to_string())), ManagerError::Server),
            (Err(ApiError::Transport("dns".to_string())), ManagerError::UserNetwork),
        ];
        for (outcome, expected) in cases {
            let m = manager(outcome);
            let result = run(|tx| m.player("1", move |r| tx.send(r).unwrap()));
            assert_eq!(result.unwrap_err(), expected);
        }
    }

    #[test]
    fn build_failure_skips_transport() {
        let m = ApiManager::new(
            BetterpickClient::new(ClientConfig::new("::nonsense")),
            CannedTransport::new(Ok(HttpResponse::new(200, "{}"))),
        );
        let result = run(|tx| m.league("ES1", move |r| tx.send(r).unwrap()));
        assert_eq!(result.unwrap_err(), ManagerError::Server);
        assert!(m.transport().urls.lock().unwrap().is_empty());
    }

    #[test]
    fn each_endpoint_makes_one_call() {
        let m = manager(Err(ApiError::Transport("offline".to_string())));
        m.leagues(Some("13"), |_| {});
        m.league("13", |_| {});
        m.nationalities(|_| {});
        m.club_players("241", |_| {});
        m.player("158023", |_| {});
        m.search("messi", |_| {});
        m.players(&PlayerFilterData::default(), |_| {});
        m.club("241", |_| {});
        let urls = m.transport().urls.lock().unwrap().clone();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8080/leagues?id=13",
                "http://localhost:8080/leagues/13",
                "http://localhost:8080/nationalities",
                "http://localhost:8080/players/club/241",
                "http://localhost:8080/players/158023/full",
                "http://localhost:8080/search?name=messi",
                "http://localhost:8080/players/search?ovr_min=1&ovr_max=99&sort=desc",
                "http://localhost:8080/clubs/241",
            ]
        );
    }
}
