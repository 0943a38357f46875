//! TUI key handling
//!
//! Translates key presses into edits of [`AppState`] and queued
//! [`PendingAction`]s. Nothing here touches the network or the gate.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use super::state::{AppState, PendingAction, Screen};

pub struct App {
    state: AppState,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        debug!("App::new: called");
        Self { state: AppState::new() }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key press; returns true when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        debug!(?key, screen = ?self.state.screen, "App::handle_key: called");
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
            debug!("App::handle_key: quit");
            self.state.should_quit = true;
            return true;
        }

        match self.state.screen {
            Screen::Gate => self.handle_gate_key(key),
            Screen::Planner => self.handle_planner_key(key),
        }

        self.state.should_quit
    }

    fn handle_gate_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.selected_wallet = self.state.selected_wallet.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.state.selected_wallet + 1 < self.state.wallet_count {
                    self.state.selected_wallet += 1;
                }
            }
            KeyCode::Enter => {
                debug!(index = self.state.selected_wallet, "App::handle_gate_key: connect");
                self.state.pending_action = Some(PendingAction::Connect(self.state.selected_wallet));
            }
            KeyCode::Char('q') => {
                self.state.should_quit = true;
            }
            _ => {
                debug!("App::handle_gate_key: unhandled key");
            }
        }
    }

    fn handle_planner_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let before = self.state.input.len();
        let mut edited = false;

        match key.code {
            KeyCode::Char('s') if ctrl => {
                debug!("App::handle_planner_key: submit");
                self.state.pending_action = Some(PendingAction::Submit);
                return;
            }
            KeyCode::F(5) => {
                self.state.pending_action = Some(PendingAction::Submit);
                return;
            }
            KeyCode::Char('d') if ctrl => {
                debug!("App::handle_planner_key: disconnect");
                self.state.pending_action = Some(PendingAction::Disconnect);
                return;
            }
            KeyCode::Char('u') if ctrl => {
                self.state.input.clear();
                self.state.cursor = 0;
                edited = before > 0;
            }
            KeyCode::Char(c) if !ctrl => {
                self.insert(c);
                edited = true;
            }
            KeyCode::Enter => {
                self.insert('\n');
                edited = true;
            }
            KeyCode::Backspace => {
                if self.state.cursor > 0 {
                    let start = self.prev_char_boundary(self.state.cursor);
                    self.state.input.drain(start..self.state.cursor);
                    self.state.cursor = start;
                    edited = true;
                }
            }
            KeyCode::Delete => {
                if self.state.cursor < self.state.input.len() {
                    let end = self.next_char_boundary(self.state.cursor);
                    self.state.input.drain(self.state.cursor..end);
                    edited = true;
                }
            }
            KeyCode::Left => {
                if self.state.cursor > 0 {
                    self.state.cursor = self.prev_char_boundary(self.state.cursor);
                }
            }
            KeyCode::Right => {
                if self.state.cursor < self.state.input.len() {
                    self.state.cursor = self.next_char_boundary(self.state.cursor);
                }
            }
            KeyCode::Home => {
                self.state.cursor = self.line_start(self.state.cursor);
            }
            KeyCode::End => {
                self.state.cursor = self.line_end(self.state.cursor);
            }
            _ => {
                debug!("App::handle_planner_key: unhandled key");
            }
        }

        if edited {
            self.state.pending_action = Some(PendingAction::TasksEdited);
        }
    }

    fn insert(&mut self, c: char) {
        self.state.input.insert(self.state.cursor, c);
        self.state.cursor += c.len_utf8();
    }

    fn prev_char_boundary(&self, pos: usize) -> usize {
        let input = &self.state.input;
        let mut new_pos = pos.saturating_sub(1);
        while new_pos > 0 && !input.is_char_boundary(new_pos) {
            new_pos -= 1;
        }
        new_pos
    }

    fn next_char_boundary(&self, pos: usize) -> usize {
        let input = &self.state.input;
        let mut new_pos = pos + 1;
        while new_pos < input.len() && !input.is_char_boundary(new_pos) {
            new_pos += 1;
        }
        new_pos.min(input.len())
    }

    fn line_start(&self, pos: usize) -> usize {
        self.state.input[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.state.input[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.state.input.len())
    }
}
