use crate::errors::Result;
use crate::stats::stats_model::{DashboardStats, ExpenseFact, GoalFact};

/// Trait for stats repository operations
pub trait StatsRepositoryTrait: Send + Sync {
    fn expense_facts(&self, user_id: &str) -> Result<Vec<ExpenseFact>>;
    fn goal_facts(&self, user_id: &str) -> Result<Vec<GoalFact>>;
}

/// Trait for stats service operations
pub trait StatsServiceTrait: Send + Sync {
    fn dashboard(&self, user_id: &str) -> Result<DashboardStats>;
}
