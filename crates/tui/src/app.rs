use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use handtally_core::{
    parse_target, Action, AppConfig, HandKind, HandPlayRecord, Outcome, Projection,
    ScoreAdjustment, Session, SessionStatus, Step, TOTAL_TURNS,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_TARGET_DIGITS: usize = 9;
const TITLE: &str = "BEJEWELED 3 POKER · SCORE TRACKER";
const INVALID_TARGET_MESSAGE: &str = "Enter a valid number greater than 0.";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Target,
    Play,
    GameOver(Outcome),
}

/// How the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppExit {
    /// Player chose quit during a session.
    Quit,
    /// Player declined another session after one finished.
    Done,
}

impl AppExit {
    /// Lines printed once the terminal has been restored.
    pub fn farewell(self) -> Vec<&'static str> {
        match self {
            AppExit::Quit => vec!["Thanks for playing! See you soon!", "Bye!"],
            AppExit::Done => vec!["Bye!"],
        }
    }
}

#[derive(Debug, Clone)]
struct TargetPromptModal {
    input: String,
    cursor: usize,
    error: Option<String>,
}

impl TargetPromptModal {
    fn new(default: Option<u32>) -> Self {
        let input = default.map(|value| value.to_string()).unwrap_or_default();
        Self {
            cursor: input.len(),
            input,
            error: None,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        let next = (self.cursor as isize + delta).clamp(0, len);
        self.cursor = next as usize;
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_TARGET_DIGITS || !ch.is_ascii_digit() {
            return;
        }
        self.input.insert(self.cursor, ch);
        self.cursor += 1;
        self.error = None;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
            self.error = None;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
            self.error = None;
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Interactive shell around a [`Session`].
pub struct HandtallyApp {
    config: AppConfig,
    state: UiState,
    screen: Screen,
    session: Option<Session>,
    prompt: TargetPromptModal,
    analysis: Option<Projection>,
    menu: Vec<Action>,
    exit: Option<AppExit>,
    theme: Theme,
}

impl HandtallyApp {
    pub fn new(config: AppConfig) -> Self {
        let prompt = TargetPromptModal::new(config.default_target);
        Self {
            config,
            state: UiState::default(),
            screen: Screen::Target,
            session: None,
            prompt,
            analysis: None,
            menu: Action::menu(),
            exit: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<AppExit> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        let result = self.event_loop(&mut terminal, &mut event_rx).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        event_rx: &mut mpsc::Receiver<AppEvent>,
    ) -> Result<AppExit> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if let Some(exit) = self.exit {
                return Ok(exit);
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event)?,
                Some(AppEvent::Tick) => {}
                None => return Ok(self.exit.unwrap_or(AppExit::Quit)),
            }
        }
    }

    /// Session currently being played, if any.
    pub(crate) fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub(crate) fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if self.handle_global_shortcut(&key) {
            return Ok(());
        }
        match self.screen {
            Screen::Target => self.handle_target_key(key),
            Screen::Play => self.handle_play_key(key),
            Screen::GameOver(_) => {
                self.handle_game_over_key(key);
                Ok(())
            }
        }
    }

    fn handle_global_shortcut(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers == KeyModifiers::CONTROL {
            if let KeyCode::Char('c') = key.code {
                info!("Interrupted from keyboard");
                self.exit = Some(AppExit::Quit);
                return true;
            }
        }
        false
    }

    fn handle_target_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.exit = Some(AppExit::Quit);
            }
            KeyCode::Char(ch) => self.prompt.insert(ch),
            KeyCode::Backspace => self.prompt.backspace(),
            KeyCode::Delete => self.prompt.delete(),
            KeyCode::Left => self.prompt.move_cursor(-1),
            KeyCode::Right => self.prompt.move_cursor(1),
            KeyCode::Home => self.prompt.move_home(),
            KeyCode::End => self.prompt.move_end(),
            KeyCode::Enter => match parse_target(&self.prompt.input) {
                Ok(target) => {
                    self.session = Some(Session::new(target)?);
                    self.screen = Screen::Play;
                    self.state.menu_cursor = 0;
                    self.state
                        .set_status(format!("Target set to {target} pts. Good luck!"));
                }
                Err(err) => {
                    warn!(%err, "Rejected target score");
                    self.prompt.error = Some(INVALID_TARGET_MESSAGE.to_string());
                }
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_play_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.analysis.take().is_some() {
            self.state.set_status("Back to the game".to_string());
            return Ok(());
        }
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_menu_cursor(1, self.menu.len());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.move_menu_cursor(-1, self.menu.len());
                None
            }
            KeyCode::Enter => self.menu.get(self.state.menu_cursor).copied(),
            KeyCode::Char(ch @ '1'..='7') => {
                let index = ch as usize - '1' as usize;
                HandKind::from_index(index).map(Action::PlayHand)
            }
            KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Analyze),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                Some(Action::Adjust(ScoreAdjustment::Increase))
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                Some(Action::Adjust(ScoreAdjustment::Decrease))
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        };
        match action {
            Some(action) => self.dispatch(action),
            None => Ok(()),
        }
    }

    fn dispatch(&mut self, action: Action) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .context("no active session to apply the action to")?;
        debug!(?action, "Applying action");
        match session.apply(action)? {
            Step::Played { record, status } => {
                self.state.set_status(format!(
                    "Played {} (+{}pts) → Total: {}pts",
                    record.hand_name, record.points_awarded, record.score_after_play
                ));
                if let SessionStatus::Finished(outcome) = status {
                    self.screen = Screen::GameOver(outcome);
                }
            }
            Step::Adjusted { score } => {
                self.state.set_status(format!("Score adjusted to: {score}"));
            }
            Step::Analysis(projection) => {
                self.analysis = Some(projection);
            }
            Step::Quit => {
                self.exit = Some(AppExit::Quit);
            }
        }
        Ok(())
    }

    fn handle_game_over_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                info!("Starting a new session");
                self.session = None;
                self.analysis = None;
                self.prompt = TargetPromptModal::new(self.config.default_target);
                self.screen = Screen::Target;
                self.state.set_status("New session: choose a target".to_string());
            }
            KeyCode::Char('n')
            | KeyCode::Char('N')
            | KeyCode::Char('q')
            | KeyCode::Enter
            | KeyCode::Esc => {
                self.exit = Some(AppExit::Done);
            }
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        match self.screen {
            Screen::Target => self.draw_target(frame),
            Screen::Play => self.draw_play(frame),
            Screen::GameOver(outcome) => {
                self.draw_play(frame);
                self.render_game_over(frame, outcome);
            }
        }
        if let (Some(projection), Some(session)) = (&self.analysis, self.session()) {
            self.render_analysis(frame, projection, session);
        }
    }

    fn draw_target(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(7)])
            .split(area);
        self.render_title(frame, layout[0]);

        let prompt_area = centered_rect(52.min(layout[1].width), 7, layout[1]);
        let mut lines = vec![
            Line::from("Welcome! What is the target score? (e.g. 3000)"),
            Line::from(""),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.accent)),
                Span::styled(
                    self.prompt.input.clone(),
                    Style::default()
                        .fg(self.theme.primary_fg)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        if let Some(error) = &self.prompt.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(self.theme.danger),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to start · Esc to exit",
                Style::default().fg(self.theme.muted),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Target Score"))
            .wrap(Wrap { trim: false });
        frame.render_widget(Clear, prompt_area);
        frame.render_widget(paragraph, prompt_area);

        let cursor_x = prompt_area.x + 3 + self.prompt.cursor as u16;
        let cursor_y = prompt_area.y + 3;
        if cursor_x < prompt_area.right() && cursor_y < prompt_area.bottom() {
            frame.set_cursor(cursor_x, cursor_y);
        }
    }

    fn draw_play(&self, frame: &mut Frame) {
        let Some(session) = self.session() else {
            return;
        };
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(area);
        self.render_title(frame, layout[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1]);
        self.render_menu(frame, body[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(body[1]);
        self.render_progress(frame, right[0], session);
        self.render_history(frame, right[1], session.history());
        self.render_status(frame, layout[2]);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(self.theme.accent)
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        frame.render_widget(title, area);
    }

    fn render_menu(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .menu
            .iter()
            .enumerate()
            .map(|(idx, action)| {
                let label = match action {
                    Action::PlayHand(_) => format!("{}. {}", idx + 1, action.label()),
                    _ => format!("   {}", action.label()),
                };
                let style = match action {
                    Action::PlayHand(_) => Style::default().fg(self.theme.primary_fg),
                    Action::Quit => Style::default().fg(self.theme.danger),
                    _ => Style::default().fg(self.theme.warning),
                };
                ListItem::new(Line::from(Span::styled(label, style)))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Choose a Hand or Action"),
            )
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        let mut list_state = ListState::default();
        list_state.select(Some(self.state.menu_cursor));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let lines = vec![
            Line::from(format!(
                "Turn: {}/{}",
                session.turns_remaining(),
                TOTAL_TURNS
            )),
            Line::from(format!(
                "Score: {}/{}",
                session.current_score(),
                session.target_score()
            )),
            Line::from(Span::styled(
                format!("Progress: {:.1}%", session.progress_percent()),
                Style::default().fg(self.theme.success),
            )),
        ];
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Session"));
        frame.render_widget(paragraph, area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect, history: &[HandPlayRecord]) {
        let items: Vec<ListItem> = if history.is_empty() {
            vec![ListItem::new(Span::styled(
                "No hands played yet",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            history
                .iter()
                .enumerate()
                .map(|(idx, record)| ListItem::new(history_line(idx, record)))
                .collect()
        };
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Hand History"),
        );
        frame.render_widget(list, area);
    }

    fn render_analysis(&self, frame: &mut Frame, projection: &Projection, session: &Session) {
        let body = analysis_lines(projection, session.target_score(), self.config.analysis_rows);
        let color = match projection {
            Projection::TargetMet => self.theme.success,
            Projection::Combinations(list) if list.is_empty() => self.theme.danger,
            Projection::Combinations(_) => self.theme.primary_fg,
        };
        let mut lines: Vec<Line> = body
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(color))))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key to return to the game...",
            Style::default().fg(self.theme.muted),
        )));

        let height = (lines.len() as u16).saturating_add(2);
        let popup = centered_rect(64, height, frame.size());
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Analysis"))
            .wrap(Wrap { trim: false });
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    fn render_game_over(&self, frame: &mut Frame, outcome: Outcome) {
        let Some(session) = self.session() else {
            return;
        };
        let (headline, color) = match outcome {
            Outcome::Won => (
                "Congratulations! You reached the target score!".to_string(),
                self.theme.success,
            ),
            Outcome::Exhausted => (
                format!(
                    "Out of turns! Final score: {}/{}",
                    session.current_score(),
                    session.target_score()
                ),
                self.theme.warning,
            ),
        };
        let lines = vec![
            Line::from(Span::styled(
                headline,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Play again? (y/N)"),
        ];
        let popup = centered_rect(56, 5, frame.size());
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Game Over"))
            .alignment(Alignment::Center);
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let secondary = "1-7 play · p analysis · +/- adjust · q quit";
        let paragraph = Paragraph::new(vec![
            Line::from(self.state.status.clone()),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn history_line(idx: usize, record: &HandPlayRecord) -> String {
    format!(
        "{}. {} (+{}pts) → Total: {}pts  {}",
        idx + 1,
        record.hand_name,
        record.points_awarded,
        record.score_after_play,
        record.played_at.format("%H:%M:%S")
    )
}

/// Text body of the analysis overlay, capped at `rows` combinations.
fn analysis_lines(projection: &Projection, target: u32, rows: usize) -> Vec<String> {
    match projection {
        Projection::TargetMet => vec!["Congratulations! You reached the target score!".to_string()],
        Projection::Combinations(list) if list.is_empty() => {
            vec!["Impossible to reach the target with the remaining turns.".to_string()]
        }
        Projection::Combinations(list) => {
            let mut lines = vec![format!("Minimal hands to reach {target}:"), String::new()];
            lines.extend(list.iter().take(rows).map(|combo| {
                format!(
                    "  • {}x {} ({})",
                    combo.quantity,
                    combo.hand.name(),
                    combo.breakdown()
                )
            }));
            lines
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

struct UiState {
    status: String,
    menu_cursor: usize,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
            menu_cursor: 0,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = message;
    }

    fn move_menu_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            return;
        }
        let max_index = total as isize - 1;
        let next = (self.menu_cursor as isize + delta).clamp(0, max_index);
        self.menu_cursor = next as usize;
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use handtally_core::Combination;
    use ratatui::backend::TestBackend;

    fn press(app: &mut HandtallyApp, code: KeyCode) -> Result<()> {
        app.handle_input(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(app: &mut HandtallyApp, text: &str) -> Result<()> {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch))?;
        }
        Ok(())
    }

    fn started(target: &str) -> Result<HandtallyApp> {
        let mut app = HandtallyApp::new(AppConfig::default());
        type_text(&mut app, target)?;
        press(&mut app, KeyCode::Enter)?;
        Ok(app)
    }

    fn rendered(app: &HandtallyApp) -> Result<String> {
        let mut terminal = Terminal::new(TestBackend::new(100, 32))?;
        terminal.draw(|frame| app.draw(frame))?;
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let text = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        Ok(text)
    }

    #[test]
    fn invalid_targets_reprompt() -> Result<()> {
        let mut app = HandtallyApp::new(AppConfig::default());
        press(&mut app, KeyCode::Enter)?;
        assert_eq!(app.screen, Screen::Target);
        assert_eq!(app.prompt.error.as_deref(), Some(INVALID_TARGET_MESSAGE));

        type_text(&mut app, "0")?;
        press(&mut app, KeyCode::Enter)?;
        assert_eq!(app.screen, Screen::Target);
        assert!(app.session.is_none());

        // Letters are ignored by the prompt.
        press(&mut app, KeyCode::Backspace)?;
        type_text(&mut app, "3a000")?;
        assert_eq!(app.prompt.input, "3000");
        press(&mut app, KeyCode::Enter)?;
        assert_eq!(app.screen, Screen::Play);
        assert_eq!(app.session.as_ref().map(Session::target_score), Some(3000));
        Ok(())
    }

    #[test]
    fn default_target_prefills_prompt() -> Result<()> {
        let config = AppConfig {
            default_target: Some(2500),
            ..AppConfig::default()
        };
        let mut app = HandtallyApp::new(config);
        press(&mut app, KeyCode::Enter)?;
        assert_eq!(app.session.as_ref().map(Session::target_score), Some(2500));
        Ok(())
    }

    #[test]
    fn hotkeys_and_menu_play_hands() -> Result<()> {
        let mut app = started("5000")?;
        press(&mut app, KeyCode::Char('1'))?;
        press(&mut app, KeyCode::Down)?;
        press(&mut app, KeyCode::Down)?;
        press(&mut app, KeyCode::Enter)?;
        let session = app.session.as_ref().context("session")?;
        assert_eq!(session.current_score(), 750 + 350);
        assert_eq!(session.turns_remaining(), 8);
        assert_eq!(session.history()[1].hand, HandKind::FullHouse);
        assert!(app.state.status.contains("Full House"));
        Ok(())
    }

    #[test]
    fn adjustments_do_not_consume_turns() -> Result<()> {
        let mut app = started("1000")?;
        press(&mut app, KeyCode::Char('+'))?;
        press(&mut app, KeyCode::Char('+'))?;
        press(&mut app, KeyCode::Char('-'))?;
        let session = app.session.as_ref().context("session")?;
        assert_eq!(session.current_score(), 50);
        assert_eq!(session.turns_remaining(), 10);
        assert_eq!(app.state.status, "Score adjusted to: 50");
        Ok(())
    }

    #[test]
    fn analysis_overlay_opens_and_any_key_dismisses() -> Result<()> {
        let mut app = started("3000")?;
        press(&mut app, KeyCode::Char('p'))?;
        assert!(matches!(app.analysis, Some(Projection::Combinations(_))));
        let screen = rendered(&app)?;
        assert!(screen.contains("4x Flush (4 × 750pts = 3000pts)"));
        assert!(!screen.contains("x Pair"));

        press(&mut app, KeyCode::Char('1'))?;
        assert!(app.analysis.is_none());
        // The dismissing key is not treated as a play.
        assert_eq!(app.session.as_ref().map(Session::turns_remaining), Some(10));
        Ok(())
    }

    #[test]
    fn winning_offers_replay() -> Result<()> {
        let mut app = started("3000")?;
        for _ in 0..4 {
            press(&mut app, KeyCode::Char('1'))?;
        }
        assert_eq!(app.screen, Screen::GameOver(Outcome::Won));
        assert!(rendered(&app)?.contains("Play again? (y/N)"));

        press(&mut app, KeyCode::Char('y'))?;
        assert_eq!(app.screen, Screen::Target);
        assert!(app.session.is_none());
        assert!(app.exit.is_none());
        Ok(())
    }

    #[test]
    fn exhausting_turns_then_declining_exits() -> Result<()> {
        let mut app = started("1000")?;
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('7'))?;
        }
        assert_eq!(app.screen, Screen::GameOver(Outcome::Exhausted));
        assert!(rendered(&app)?.contains("Out of turns! Final score: 500/1000"));
        press(&mut app, KeyCode::Char('n'))?;
        assert_eq!(app.exit, Some(AppExit::Done));
        Ok(())
    }

    #[test]
    fn quit_exits_immediately() -> Result<()> {
        let mut app = started("3000")?;
        press(&mut app, KeyCode::Char('q'))?;
        assert_eq!(app.exit, Some(AppExit::Quit));
        assert_eq!(AppExit::Quit.farewell().len(), 2);
        Ok(())
    }

    #[test]
    fn play_screen_shows_progress_and_history() -> Result<()> {
        let mut app = started("3000")?;
        press(&mut app, KeyCode::Char('1'))?;
        let screen = rendered(&app)?;
        assert!(screen.contains("Turn: 9/10"));
        assert!(screen.contains("Score: 750/3000"));
        assert!(screen.contains("Progress: 25.0%"));
        assert!(screen.contains("1. Flush (+750pts) → Total: 750pts"));
        assert!(screen.contains("Flush (+750 pts)"));
        Ok(())
    }

    #[test]
    fn analysis_lines_cover_all_cases() {
        assert_eq!(
            analysis_lines(&Projection::Combinations(Vec::new()), 3000, 5),
            vec!["Impossible to reach the target with the remaining turns.".to_string()]
        );
        assert_eq!(analysis_lines(&Projection::TargetMet, 3000, 5).len(), 1);

        let many: Vec<Combination> = HandKind::ALL
            .into_iter()
            .map(|hand| Combination {
                hand,
                quantity: 1,
                points: hand.points(),
                total: hand.points(),
            })
            .collect();
        let lines = analysis_lines(&Projection::Combinations(many), 50, 5);
        assert_eq!(lines.len(), 2 + 5);
        assert_eq!(lines[2], "  • 1x Flush (1 × 750pts = 750pts)");
    }
}
