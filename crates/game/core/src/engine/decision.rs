use crate::state::CombatantId;

/// The action a decision provider picks for one turn.
///
/// Targets are suggestions: the round controller re-validates them before
/// anything is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Decision {
    /// Cast the echo titled `echo`. Area and self echoes may leave `target`
    /// empty.
    Cast {
        echo: String,
        target: Option<CombatantId>,
    },
    /// Basic attack. An empty or illegal target becomes a random legal enemy.
    Attack { target: Option<CombatantId> },
}

impl Decision {
    pub fn cast(echo: impl Into<String>, target: Option<CombatantId>) -> Self {
        Self::Cast {
            echo: echo.into(),
            target,
        }
    }

    pub fn attack(target: CombatantId) -> Self {
        Self::Attack {
            target: Some(target),
        }
    }

    pub fn target(&self) -> Option<CombatantId> {
        match self {
            Self::Cast { target, .. } | Self::Attack { target } => *target,
        }
    }
}
