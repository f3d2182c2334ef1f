use crate::{PageId, ResultRow, ResultTable};

/// Full table snapshots are taken whenever the id is a multiple of this.
pub const CHECKPOINT_INTERVAL: PageId = 10;
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 100;

/// Fixed inputs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestPlan {
    pub base_url: String,
    pub max_consecutive_failures: u32,
    /// Last id to visit; `None` runs until the failure ceiling.
    pub max_id: Option<PageId>,
    /// Zero disables checkpoints.
    pub checkpoint_every: PageId,
}

impl HarvestPlan {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
            max_id: None,
            checkpoint_every: CHECKPOINT_INTERVAL,
        }
    }

    pub fn url_for(&self, id: PageId) -> String {
        format!("{}{}", self.base_url, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ConsecutiveFailures { count: u32 },
    IdBoundReached { max_id: PageId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Fetching {
        id: PageId,
    },
    Finished(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestState {
    plan: HarvestPlan,
    session: SessionState,
    next_id: PageId,
    consecutive_failures: u32,
    table: ResultTable,
}

impl HarvestState {
    pub fn new(plan: HarvestPlan) -> Self {
        Self {
            plan,
            session: SessionState::Idle,
            next_id: 1,
            consecutive_failures: 0,
            table: ResultTable::new(),
        }
    }

    pub fn plan(&self) -> &HarvestPlan {
        &self.plan
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn next_id(&self) -> PageId {
        self.next_id
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    pub fn into_table(self) -> ResultTable {
        self.table
    }

    pub(crate) fn stop_reason(&self) -> Option<StopReason> {
        if self.consecutive_failures >= self.plan.max_consecutive_failures {
            return Some(StopReason::ConsecutiveFailures {
                count: self.consecutive_failures,
            });
        }
        match self.plan.max_id {
            Some(max_id) if self.next_id > max_id => Some(StopReason::IdBoundReached { max_id }),
            _ => None,
        }
    }

    pub(crate) fn set_session(&mut self, session: SessionState) {
        self.session = session;
    }

    /// Append the row for the current id and move the cursor past it.
    pub(crate) fn record(&mut self, row: ResultRow, scraped: bool) {
        if scraped {
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        }
        self.next_id = row.id + 1;
        self.table.push(row);
    }

    pub(crate) fn checkpoint_due(&self, id: PageId) -> bool {
        self.plan.checkpoint_every != 0 && id % self.plan.checkpoint_every == 0
    }
}
