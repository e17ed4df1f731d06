//! View model of the player discovery screen.
//!
//! Every filter mutation goes through a method on `DiscoverPlayerViewModel`
//! that stores the new criteria and then starts exactly one fetch. There is
//! no debounce or coalescing; overlapping requests are resolved by the
//! generation check in `FetchController`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument};

use crate::error::FilterError;
use crate::fetch::{Dispatch, FetchController, FetchState, Immediate};
use crate::filter::{OverallRange, PlayerFilterData, SortOrder};
use crate::http::Transport;
use crate::manager::ApiManager;
use crate::types::{Nationality, PlayerPreview, Position};

pub struct DiscoverPlayerViewModel<T> {
    manager: Arc<ApiManager<T>>,
    filter: Mutex<PlayerFilterData>,
    nationalities: Vec<Nationality>,
    fetch: Arc<FetchController<Vec<PlayerPreview>>>,
}

impl<T: Transport> DiscoverPlayerViewModel<T> {
    /// Completions are applied inline on the transport's thread.
    pub fn new(manager: Arc<ApiManager<T>>, nationalities: Vec<Nationality>) -> Self {
        Self::with_dispatcher(manager, nationalities, Arc::new(Immediate))
    }

    pub fn with_dispatcher(
        manager: Arc<ApiManager<T>>,
        nationalities: Vec<Nationality>,
        dispatcher: Arc<dyn Dispatch>,
    ) -> Self {
        Self {
            manager,
            filter: Mutex::new(PlayerFilterData::default()),
            nationalities,
            fetch: Arc::new(FetchController::new(dispatcher)),
        }
    }

    pub fn nationalities(&self) -> &[Nationality] {
        &self.nationalities
    }

    pub fn filter_data(&self) -> PlayerFilterData {
        self.lock_filter().clone()
    }

    pub fn state(&self) -> FetchState<Vec<PlayerPreview>> {
        self.fetch.state()
    }

    /// Number of fetches started since creation.
    pub fn fetches_started(&self) -> u64 {
        self.fetch.generation()
    }

    pub fn subscribe(
        &self,
        observer: impl Fn(&FetchState<Vec<PlayerPreview>>) + Send + Sync + 'static,
    ) {
        self.fetch.subscribe(observer)
    }

    /// Fetch players matching the current filter.
    #[instrument(skip(self))]
    pub fn start(&self) {
        // The newest ticket must carry the newest filter.
        let (filter, ticket) = {
            let filter = self.lock_filter();
            (filter.clone(), self.fetch.advance())
        };
        self.fetch.announce(ticket);
        debug!(generation = ticket.generation(), "fetching players");
        let fetch = Arc::clone(&self.fetch);
        self.manager.players(&filter, move |result| {
            fetch.complete(ticket, result.map(|body| body.players))
        });
    }

    pub fn number_of_players(&self) -> usize {
        self.fetch
            .state()
            .displaying()
            .map_or(0, |players| players.len())
    }

    pub fn player(&self, index: usize) -> Option<PlayerPreview> {
        self.fetch.state().displaying()?.get(index).cloned()
    }

    /// Replace the whole filter and refetch.
    pub fn set_filter_data(&self, filter: PlayerFilterData) {
        *self.lock_filter() = filter;
        self.start();
    }

    /// Mutate the filter in place and refetch.
    pub fn update_filter(&self, mutate: impl FnOnce(&mut PlayerFilterData)) {
        mutate(&mut self.lock_filter());
        self.start();
    }

    pub fn select_sort_order(&self, sort: SortOrder) {
        self.update_filter(|f| f.sort = sort)
    }

    pub fn select_nationality(&self, nationality: Option<Nationality>) {
        self.update_filter(|f| f.nationality = nationality)
    }

    pub fn select_position(&self, position: Option<Position>) {
        self.update_filter(|f| f.position = position)
    }

    /// Rejected ranges leave the filter untouched and start no fetch.
    pub fn set_overall_range(&self, min: u8, max: u8) -> Result<(), FilterError> {
        let range = OverallRange::new(min, max)?;
        self.update_filter(|f| f.overall = range);
        Ok(())
    }

    pub fn reset_filter_data(&self) {
        self.set_filter_data(PlayerFilterData::default())
    }

    fn lock_filter(&self) -> MutexGuard<'_, PlayerFilterData> {
        self.filter.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
