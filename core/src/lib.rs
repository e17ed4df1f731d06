//! Client core for the Betterpick football browser.
//!
//! # Overview
//! Builds `HttpRequest` values for every Betterpick endpoint, interprets the
//! `HttpResponse` values a host hands back, and drives the player discovery
//! screen on top of that. The core never opens a socket itself: a
//! `Transport` supplied by the host does the round-trip.
//!
//! # Design
//! - `BetterpickClient` is stateless; it holds only its `ClientConfig`.
//! - `ApiManager` binds the client to a transport and collapses every
//!   failure into `ManagerError::{UserNetwork, Server}`.
//! - `DiscoverPlayerViewModel` refetches on each explicit filter mutation;
//!   `FetchController` drops results of superseded fetches.
//! - `PlayerFilterTable` maps the filter to table sections and row taps.
//! - Types use owned `String` / `Vec` fields so they map cleanly across FFI.

pub mod client;
pub mod config;
pub mod discover;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod filter_table;
pub mod http;
pub mod manager;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;

pub use client::BetterpickClient;
pub use config::ClientConfig;
pub use discover::DiscoverPlayerViewModel;
pub use error::{ApiError, FilterError, ManagerError};
pub use fetch::{Dispatch, FetchController, FetchState, FetchTicket, Immediate};
pub use filter::{OverallRange, PlayerFilterData, SortOrder};
pub use filter_table::{CellModel, FilterSection, IndexPath, PlayerFilterTable, PlayerInfoRow, TableAction, TableUpdate};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportCompletion, TransportResult};
pub use manager::{ApiManager, ManagerResult};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{
    GetClubPlayersResponseBody, GetLeagueResponseBody, GetLeaguesResponseBody, GetNationalitiesBody,
    GetPlayersResponseBody, GetSearchResponseBody, League, LeaguePreview, Nationality, Player,
    PlayerPreview, Position, TeamPreview,
};
