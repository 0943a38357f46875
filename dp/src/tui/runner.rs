//! TUI Runner - main loop that owns the terminal, the planner and the gate
//!
//! The TuiRunner is responsible for:
//! - Choosing the screen from the gate state on every frame
//! - Dispatching key events to App and performing the actions it queues
//! - Running plan requests in the background and feeding results back
//! - Rendering at ~30 FPS

use std::time::Duration;

use eyre::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::planner::{Planner, PlannerEvent, run_effect};
use crate::wallet::{ConnectOutcome, RedirectKind, WalletGate};

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::state::{GateView, PendingAction, Screen};
use super::views;

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    app: App,
    terminal: Tui,
    event_handler: EventHandler,
    planner: Planner,
    /// None when the wallet gate is disabled
    gate: Option<WalletGate>,
    /// Launch the browser for wallet redirects
    open_redirects: bool,
    plan_tx: mpsc::UnboundedSender<PlannerEvent>,
    plan_rx: mpsc::UnboundedReceiver<PlannerEvent>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, planner: Planner, gate: Option<WalletGate>, open_redirects: bool) -> Self {
        debug!(gated = gate.is_some(), open_redirects, "TuiRunner::new: called");
        let (plan_tx, plan_rx) = mpsc::unbounded_channel();
        let mut app = App::new();
        if let Some(gate) = &gate {
            app.state_mut().wallet_count = gate.wallets().len();
            app.state_mut().selected_wallet = gate.first_ready().unwrap_or(0);
        }

        Self {
            app,
            terminal,
            event_handler: EventHandler::new(Duration::from_millis(33)), // ~30 FPS
            planner,
            gate,
            open_redirects,
            plan_tx,
            plan_rx,
        }
    }

    fn gate_open(&self) -> bool {
        self.gate.as_ref().is_none_or(|g| g.is_open())
    }

    /// Main event loop
    pub async fn run(&mut self) -> Result<()> {
        debug!("TuiRunner::run: entering main loop");
        loop {
            let screen = if self.gate_open() { Screen::Planner } else { Screen::Gate };
            self.app.state_mut().screen = screen;

            self.draw()?;

            tokio::select! {
                event = self.event_handler.next() => {
                    match event? {
                        Event::Tick => {
                            if self.planner.state().is_loading() {
                                self.app.state_mut().advance_spinner();
                            }
                        }
                        Event::Key(key) => {
                            if self.app.handle_key(key) {
                                break;
                            }
                            self.perform_pending().await;
                        }
                        Event::Resize(width, height) => {
                            debug!(width, height, "TuiRunner::run: resize");
                        }
                    }
                }
                Some(event) = self.plan_rx.recv() => {
                    debug!(?event, "TuiRunner::run: plan result");
                    self.planner.dispatch(event);
                }
            }

            if self.app.state().should_quit {
                debug!("TuiRunner::run: should_quit is true, breaking");
                break;
            }
        }

        debug!("TuiRunner::run: exiting");
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let gate_view = self.gate.as_ref().map(GateView::from_gate);
        let state = self.app.state();
        let planner = self.planner.state();
        self.terminal
            .draw(|frame| views::render(state, planner, gate_view.as_ref(), frame))?;
        Ok(())
    }

    async fn perform_pending(&mut self) {
        let Some(action) = self.app.state_mut().take_pending() else {
            return;
        };
        debug!(?action, "TuiRunner::perform_pending: called");

        match action {
            PendingAction::TasksEdited => {
                let text = self.app.state().input.clone();
                self.planner.update_tasks(text);
            }
            PendingAction::Submit => self.submit(),
            PendingAction::Connect(index) => self.connect(index).await,
            PendingAction::Disconnect => self.disconnect(),
        }
    }

    fn submit(&mut self) {
        let gate_open = self.gate_open();
        self.app.state_mut().notice = None;
        let Some(effect) = self.planner.dispatch(PlannerEvent::SubmitRequested { gate_open }) else {
            return;
        };

        self.app.state_mut().roll_status_word();
        let client = self.planner.client();
        let tx = self.plan_tx.clone();
        tokio::spawn(async move {
            let event = run_effect(client, effect).await;
            if tx.send(event).is_err() {
                debug!("TuiRunner::submit: runner gone, dropping plan result");
            }
        });
    }

    async fn connect(&mut self, index: usize) {
        let Some(gate) = self.gate.as_ref() else {
            return;
        };

        // The handshake can wait on the user for a long time; show it before blocking
        if let Some(wallet) = gate.wallets().get(index) {
            let name = wallet.name().to_string();
            self.app.state_mut().begin_connect(&name);
            if let Err(e) = self.draw() {
                warn!(error = %e, "TuiRunner::connect: failed to draw progress");
            }
        }

        let Some(gate) = self.gate.as_mut() else {
            return;
        };
        let result = gate.connect(index).await;
        self.app.state_mut().finish_connect();

        match result {
            Ok(ConnectOutcome::Connected(key)) => {
                self.app.state_mut().notice = Some(format!("Connected {}", key.short()));
            }
            Ok(ConnectOutcome::Redirect(redirect)) => {
                let verb = match redirect.kind {
                    RedirectKind::HandOff => "Continue in",
                    RedirectKind::Install => "Install",
                };
                let mut notice = format!("{} {}: {}", verb, redirect.wallet, redirect.url);
                if self.open_redirects {
                    match open::that(redirect.url.as_str()) {
                        Ok(()) => info!(url = %redirect.url, "Opened wallet redirect"),
                        Err(e) => {
                            warn!(error = %e, url = %redirect.url, "Failed to open wallet redirect");
                            notice.push_str(" (open it manually)");
                        }
                    }
                }
                self.app.state_mut().notice = Some(notice);
            }
            Err(e) => {
                // The gate already holds the user-facing message
                debug!(error = %e, "TuiRunner::connect: failed");
            }
        }
    }

    fn disconnect(&mut self) {
        let notice = match self.gate.as_mut() {
            None => "Wallet gate is disabled".to_string(),
            Some(gate) => match gate.disconnect() {
                Ok(()) => "Wallet disconnected".to_string(),
                Err(e) => {
                    warn!(error = %e, "Failed to disconnect wallet");
                    format!("Failed to disconnect: {}", e)
                }
            },
        };
        self.app.state_mut().notice = Some(notice);
    }
}
