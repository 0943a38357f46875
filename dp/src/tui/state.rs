//! TUI application state
//!
//! Pure data structures for the TUI. No rendering logic here. Planner data
//! (plan, error, loading) lives in `PlannerState`; this holds only what the
//! terminal front end adds on top: the edit buffer, selection and notices.

use rand::seq::IndexedRandom;
use tracing::debug;

use crate::wallet::{DeviceClass, ReadyState, WalletGate};

/// Words for the loading indicator
pub const PLANNING_WORDS: &[&str] = &[
    "Planning",
    "Scheduling",
    "Prioritizing",
    "Arranging",
    "Time-boxing",
    "Juggling",
    "Sorting",
];

/// Spinner frames for the loading indicator
pub const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Which screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Wallet selection; the planner is unreachable
    #[default]
    Gate,
    /// Task editor and plan
    Planner,
}

/// Work queued by a key press for the runner to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Edit buffer changed; push it into the planner
    TasksEdited,
    /// "Plan My Day"
    Submit,
    /// Connect the wallet at this index
    Connect(usize),
    /// Forget the saved connection
    Disconnect,
}

/// Read-only snapshot of the wallet gate for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateView {
    pub wallets: Vec<(String, ReadyState)>,
    pub available: bool,
    pub device: DeviceClass,
    pub error: Option<String>,
    pub public_key: Option<String>,
}

impl GateView {
    pub fn from_gate(gate: &WalletGate) -> Self {
        Self {
            wallets: gate
                .wallets()
                .iter()
                .map(|w| (w.name().to_string(), w.ready_state()))
                .collect(),
            available: gate.is_available(),
            device: gate.device(),
            error: gate.error().map(str::to_string),
            public_key: gate.public_key().map(|k| k.short()),
        }
    }
}

/// Front-end state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub screen: Screen,
    /// Task text being edited; mirrored into the planner on change
    pub input: String,
    /// Byte offset of the cursor in `input`
    pub cursor: usize,
    pub selected_wallet: usize,
    pub wallet_count: usize,
    /// One-line informational message (redirects, connects)
    pub notice: Option<String>,
    /// A wallet handshake is in flight
    pub connecting: bool,
    pub status_word: &'static str,
    pub spinner_frame: usize,
    pub pending_action: Option<PendingAction>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        debug!("AppState::new: called");
        Self {
            status_word: PLANNING_WORDS[0],
            ..Default::default()
        }
    }

    /// Pick a fresh loading word for a new request
    pub fn roll_status_word(&mut self) {
        self.status_word = PLANNING_WORDS.choose(&mut rand::rng()).copied().unwrap_or(PLANNING_WORDS[0]);
        debug!(word = %self.status_word, "AppState::roll_status_word");
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
    }

    pub fn spinner(&self) -> char {
        SPINNER[self.spinner_frame % SPINNER.len()]
    }

    /// Cursor as (line, column) in characters, for terminal placement
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.input[..self.cursor.min(self.input.len())];
        let line = before.matches('\n').count();
        let col = before.rsplit('\n').next().map(|s| s.chars().count()).unwrap_or(0);
        (line, col)
    }

    /// Show that a handshake has started; the wallet may be waiting on the user
    pub fn begin_connect(&mut self, wallet: &str) {
        debug!(%wallet, "AppState::begin_connect");
        self.connecting = true;
        self.notice = Some(format!("Connecting to {}... approve the request in your wallet", wallet));
    }

    pub fn finish_connect(&mut self) {
        self.connecting = false;
        self.notice = None;
    }

    /// Take the queued action, leaving none
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending_action.take()
    }
}
