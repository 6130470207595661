use serde::{Deserialize, Serialize};

/// Conteos de una fase (map o reduce).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStatus {
    pub total: u32,
    pub ready: u32,
    pub in_progress: u32,
    pub done: bool,
}

impl PhaseStatus {
    pub fn completed(&self) -> u32 {
        self.total.saturating_sub(self.ready + self.in_progress)
    }
}

/// Estado del job que expone el coordinador en `/api/v1/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub map: PhaseStatus,
    pub reduce: PhaseStatus,
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_is_total_minus_pending() {
        let phase = PhaseStatus {
            total: 8,
            ready: 3,
            in_progress: 2,
            done: false,
        };
        assert_eq!(phase.completed(), 3);
    }
}
