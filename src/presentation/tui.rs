//! Terminal event loop

use std::io::{self, Stdout};

use crossterm::{
    event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::select;

use crate::controller::InteractionController;
use crate::state_machine::Event;
use crate::transport::Transport;

use super::render::{render, UiState};
use super::view::can_submit;

const PAGE_ROWS: u16 = 5;

/// Run the interactive UI until the user quits
pub async fn run_ui<T: Transport + 'static>(controller: InteractionController<T>) -> io::Result<()> {
    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, controller).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_event_loop<T: Transport + 'static>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut controller: InteractionController<T>,
) -> io::Result<()> {
    let mut ui = UiState::default();
    let mut reader = EventStream::new();

    controller.start();

    loop {
        terminal.draw(|f| render(f, controller.state(), &mut ui))?;

        let busy = controller.in_flight() > 0;
        select! {
            maybe_event = reader.next() => {
                let Some(event) = maybe_event else { break };
                if process_event(event?, &mut controller, &mut ui) == KeyOutcome::Quit {
                    break;
                }
            }
            Some(completion) = controller.next_completion(), if busy => {
                controller.apply_completion(completion);
            }
        }
    }

    tracing::info!(in_flight = controller.in_flight(), "Session ended");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
}

fn process_event<T: Transport + 'static>(
    event: TermEvent,
    controller: &mut InteractionController<T>,
    ui: &mut UiState,
) -> KeyOutcome {
    match event {
        TermEvent::Key(key) => handle_key(key, controller, ui),
        TermEvent::Paste(data) => {
            let draft = ui.cursor.insert_str(controller.state().draft(), &data);
            set_draft(controller, draft);
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

fn handle_key<T: Transport + 'static>(
    key: KeyEvent,
    controller: &mut InteractionController<T>,
    ui: &mut UiState,
) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let draft = controller.state().draft().to_string();

    match key.code {
        KeyCode::Esc => return KeyOutcome::Quit,
        KeyCode::Char('c') if ctrl => return KeyOutcome::Quit,
        KeyCode::Char('l') if ctrl => {
            let _ = controller.dispatch(Event::ClearHistory);
        }
        KeyCode::Char('r') if ctrl => {
            let _ = controller.dispatch(Event::RefreshHistory);
        }
        KeyCode::Char('t') if ctrl => ui.show_trace = !ui.show_trace,
        KeyCode::Enter => {
            if can_submit(controller.state()) {
                // Rejections leave the state untouched
                let _ = controller.dispatch(Event::Ask { question: draft });
            }
        }
        KeyCode::Char(ch) if !ctrl => {
            let edited = ui.cursor.insert_char(&draft, ch);
            set_draft(controller, edited);
        }
        KeyCode::Backspace => {
            if let Some(edited) = ui.cursor.backspace(&draft) {
                set_draft(controller, edited);
            }
        }
        KeyCode::Delete => {
            if let Some(edited) = ui.cursor.delete(&draft) {
                set_draft(controller, edited);
            }
        }
        KeyCode::Left => ui.cursor.move_left(&draft),
        KeyCode::Right => ui.cursor.move_right(&draft),
        KeyCode::Home => ui.cursor.move_home(),
        KeyCode::End => ui.cursor.move_end(&draft),
        KeyCode::Up => ui.scroll_answer_up(1),
        KeyCode::Down => ui.scroll_answer_down(1),
        KeyCode::PageUp => ui.scroll_answer_up(PAGE_ROWS),
        KeyCode::PageDown => ui.scroll_answer_down(PAGE_ROWS),
        _ => {}
    }

    KeyOutcome::Continue
}

fn set_draft<T: Transport + 'static>(controller: &mut InteractionController<T>, text: String) {
    let _ = controller.dispatch(Event::DraftChanged { text });
}

fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
