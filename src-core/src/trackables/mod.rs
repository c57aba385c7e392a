pub(crate) mod trackables_model;
pub(crate) mod trackables_repository;
pub(crate) mod trackables_service;
pub(crate) mod trackables_traits;

pub use trackables_model::{
    LinkedExpense, NewTrackable, Trackable, TrackableChangeset, TrackableDB, TrackableKind,
    TrackablePage, TrackableQuery, TrackableUpdate, TrackableWithExpenses, TrackableWithMetrics,
};
pub use trackables_repository::TrackableRepository;
pub use trackables_service::TrackableService;
pub use trackables_traits::{TrackableRepositoryTrait, TrackableServiceTrait};
