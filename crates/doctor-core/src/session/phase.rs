//! Diagnostic session state and its transitions.

use serde::{Deserialize, Serialize};

use crate::knowledge::Selection;

/// Identifies one scan attempt. Strictly increasing within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanToken(u64);

impl ScanToken {
    /// Value before any scan has been issued.
    pub const ZERO: ScanToken = ScanToken(0);

    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for ScanToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Scanning {
        selection: Selection,
        token: ScanToken,
    },
    Resolved {
        selection: Selection,
        token: ScanToken,
    },
}

impl Phase {
    pub fn is_scanning(&self) -> bool {
        matches!(self, Self::Scanning { .. })
    }

    /// The resolved selection, if any.
    pub fn resolved(&self) -> Option<&Selection> {
        match self {
            Self::Resolved { selection, .. } => Some(selection),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<ScanToken> {
        match self {
            Self::Idle => None,
            Self::Scanning { token, .. } | Self::Resolved { token, .. } => Some(*token),
        }
    }

    /// Status line shown by the presentation shell.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Scanning { .. } => "Scanning...",
            Self::Resolved { .. } => "Resolved",
        }
    }
}

/// A scan waiting for its delay to elapse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScan {
    pub selection: Selection,
    pub token: ScanToken,
}

/// Result of delivering a scan completion to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The completion matched the live scan and the session is now resolved.
    Resolved(Selection),
    /// A newer scan was issued after this one; the completion was discarded.
    Superseded {
        stale: ScanToken,
        current: Option<ScanToken>,
    },
    /// The owning controller no longer exists.
    Abandoned,
}

/// The single mutable state owned by a [`super::DiagnosticController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticSession {
    phase: Phase,
    last_token: ScanToken,
}

impl Default for DiagnosticSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            last_token: ScanToken::ZERO,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Highest token ever issued by this session.
    pub fn last_token(&self) -> ScanToken {
        self.last_token
    }

    /// Issue a fresh token and enter `Scanning`, dropping any resolved result.
    pub fn begin_scan(&mut self, selection: Selection) -> ScanToken {
        let token = self.last_token.next();
        self.last_token = token;
        self.phase = Phase::Scanning { selection, token };
        token
    }

    /// Apply a completion. Only the completion for the live scan resolves it.
    pub fn complete(&mut self, pending: &PendingScan) -> ScanOutcome {
        debug_assert!(
            pending.token <= self.last_token,
            "completion for token {} that was never issued (last {})",
            pending.token,
            self.last_token
        );

        match &self.phase {
            Phase::Scanning { token, .. } if *token == pending.token => {
                self.phase = Phase::Resolved {
                    selection: pending.selection.clone(),
                    token: pending.token,
                };
                ScanOutcome::Resolved(pending.selection.clone())
            }
            other => ScanOutcome::Superseded {
                stale: pending.token,
                current: other.token(),
            },
        }
    }
}
