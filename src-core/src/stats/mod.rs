pub(crate) mod stats_model;
pub(crate) mod stats_repository;
pub(crate) mod stats_service;
pub(crate) mod stats_traits;

pub use stats_model::{
    CategoryStat, DashboardStats, ExpenseFact, ExpenseStats, GoalFact, GoalStats,
};
pub use stats_repository::StatsRepository;
pub use stats_service::StatsService;
pub use stats_traits::{StatsRepositoryTrait, StatsServiceTrait};
