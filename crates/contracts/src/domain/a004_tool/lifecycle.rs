//! Tool lifecycle
//!
//! ```text
//! Available --assign--> Assigned --start_use--> InUse
//!     ^                    |  \                   |
//!     |                 recall  \--return--\    recall / return
//!     |                    v                 \    |
//!     +-----return------ Recalled             +---+--> Available
//!
//! Available <--> Maintenance,  Available | Maintenance --retire--> Retired
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    #[default]
    Available,
    Assigned,
    InUse,
    /// Отозван менеджером, ожидает возврата на склад
    Recalled,
    Maintenance,
    /// Списан, конечное состояние
    Retired,
}

impl ToolStatus {
    pub const ALL: [ToolStatus; 6] = [
        ToolStatus::Available,
        ToolStatus::Assigned,
        ToolStatus::InUse,
        ToolStatus::Recalled,
        ToolStatus::Maintenance,
        ToolStatus::Retired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Available => "available",
            ToolStatus::Assigned => "assigned",
            ToolStatus::InUse => "in_use",
            ToolStatus::Recalled => "recalled",
            ToolStatus::Maintenance => "maintenance",
            ToolStatus::Retired => "retired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Инструмент находится у сотрудника
    pub fn is_checked_out(&self) -> bool {
        matches!(
            self,
            ToolStatus::Assigned | ToolStatus::InUse | ToolStatus::Recalled
        )
    }

    /// Next status for `action`, or an error when the move is not allowed
    pub fn transition(self, action: &ToolAction) -> Result<ToolStatus, ToolLifecycleError> {
        use ToolAction as A;
        use ToolStatus as S;

        let next = match (self, action) {
            (S::Available, A::Assign { to }) => {
                if to.trim().is_empty() {
                    return Err(ToolLifecycleError::MissingAssignee);
                }
                S::Assigned
            }
            (S::Assigned, A::StartUse) => S::InUse,
            (S::Assigned | S::InUse, A::Recall) => S::Recalled,
            (S::Assigned | S::InUse | S::Recalled, A::Return) => S::Available,
            (S::Available, A::SendToMaintenance) => S::Maintenance,
            (S::Maintenance, A::CompleteMaintenance) => S::Available,
            (S::Available | S::Maintenance, A::Retire) => S::Retired,
            (from, action) => {
                return Err(ToolLifecycleError::InvalidTransition {
                    from,
                    action: action.name(),
                })
            }
        };
        Ok(next)
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ToolAction {
    Assign { to: String },
    StartUse,
    Return,
    Recall,
    SendToMaintenance,
    CompleteMaintenance,
    Retire,
}

impl ToolAction {
    pub fn name(&self) -> &'static str {
        match self {
            ToolAction::Assign { .. } => "assign",
            ToolAction::StartUse => "start_use",
            ToolAction::Return => "return",
            ToolAction::Recall => "recall",
            ToolAction::SendToMaintenance => "send_to_maintenance",
            ToolAction::CompleteMaintenance => "complete_maintenance",
            ToolAction::Retire => "retire",
        }
    }

    /// Actions a holder may perform on a tool assigned to them
    pub fn is_holder_action(&self) -> bool {
        matches!(self, ToolAction::StartUse | ToolAction::Return)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolLifecycleError {
    #[error("cannot {action} a tool that is {from}")]
    InvalidTransition { from: ToolStatus, action: &'static str },
    #[error("assignee must not be empty")]
    MissingAssignee,
}
