use super::app::TuiApp;
use super::dialogs::{ButtonRow, PathPrompt};
use super::state::{StatusLevel, UiMode};
use crate::app::keybindings::KeyAction;
use crate::dialog::{Dialogs, MessageBoxOptions, MessageKind};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// Main rendering function
pub fn render<D: Dialogs>(app: &TuiApp<D>, f: &mut Frame) {
    let size = f.area();

    // Main layout: editor + status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Editor
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    render_editor(app, f, main_chunks[0]);
    render_status_bar(app, f, main_chunks[1]);

    if app.state.ui_mode == UiMode::Help {
        render_help(app, f, size);
    }
}

/// Area available to the editor for a terminal of the given size
pub fn editor_area(size: Rect) -> Rect {
    Rect {
        height: size.height.saturating_sub(1),
        ..size
    }
}

fn render_editor<D: Dialogs>(app: &TuiApp<D>, f: &mut Frame, area: Rect) {
    let buffer = &app.manager.window().buffer;

    // Only the visible rows; Paragraph's scroll offset is a u16
    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .skip(app.state.scroll_row)
        .take(area.height as usize)
        .map(|line| Line::from(line.trim_end_matches('\r').to_string()))
        .collect();

    let scroll_col = u16::try_from(app.state.scroll_col).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines).scroll((0, scroll_col));
    f.render_widget(paragraph, area);

    if app.state.ui_mode == UiMode::Editing {
        let (row, _) = buffer.cursor();
        let col = buffer.cursor_display_column();
        let x = u16::try_from(col.saturating_sub(app.state.scroll_col)).unwrap_or(u16::MAX);
        let y = u16::try_from(row.saturating_sub(app.state.scroll_row)).unwrap_or(u16::MAX);
        if x < area.width && y < area.height {
            f.set_cursor_position((area.x + x, area.y + y));
        }
    }
}

/// Status bar: document name, unsaved marker and last message on the left,
/// cursor position on the right
fn render_status_bar<D: Dialogs>(app: &TuiApp<D>, f: &mut Frame, area: Rect) {
    let name = app.manager.state().display_name();
    let dirty = if app.manager.is_unsaved() { "*" } else { "" };
    let left_content = format!(" {}{}", name, dirty);

    let (message, message_style) = match &app.state.status {
        Some(status) => {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::Green),
                StatusLevel::Error => Style::default().fg(Color::Red),
            };
            (
                format!(" | {} ({})", status.text, status.at.format("%H:%M:%S")),
                style,
            )
        }
        None => (String::new(), Style::default()),
    };

    let (row, col) = app.manager.window().buffer.cursor();
    let right_content = format!("Ln {}, Col {} | F1 help ", row + 1, col + 1);

    let padding_width = area.width.saturating_sub(
        (left_content.width() + message.width() + right_content.width()) as u16,
    );

    let status_line = Line::from(vec![
        Span::styled(
            left_content,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(message, message_style),
        Span::raw(" ".repeat(padding_width as usize)),
        Span::styled(right_content, Style::default().fg(Color::Yellow)),
    ]);

    let paragraph = Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray));
    f.render_widget(paragraph, area);
}

/// Render help screen overlay as centered popup
fn render_help<D: Dialogs>(app: &TuiApp<D>, f: &mut Frame, area: Rect) {
    let dialog_width = 56;
    let dialog_height = 20;

    let dialog_area = centered(area, dialog_width, dialog_height);

    let mut help_text = vec![
        Line::from(Span::styled(
            "mdpad",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Commands",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    for action in KeyAction::all() {
        let keys = app.state.keybindings.keys_for(action);
        let keys = if keys.is_empty() {
            "(unbound)".to_string()
        } else {
            keys.join(" / ")
        };
        help_text.push(Line::from(format!(
            "  {:<20} {}",
            keys,
            action.description()
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        "Editing",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    help_text.push(Line::from("  Arrows, Home/End, PgUp/PgDn   Move"));
    help_text.push(Line::from("  Backspace/Delete              Erase"));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::Green),
    )));

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .style(Style::default().bg(Color::Black)),
        )
        .wrap(Wrap { trim: false });

    // Clear the background area and render the popup
    f.render_widget(Clear, dialog_area);
    f.render_widget(paragraph, dialog_area);
}

/// Copy the last main-screen frame under a modal dialog
pub fn paint_backdrop(f: &mut Frame, backdrop: Option<&Buffer>) {
    let Some(backdrop) = backdrop else {
        return;
    };
    let area = f.area().intersection(backdrop.area);
    let buf = f.buffer_mut();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let (Some(src), Some(dst)) = (backdrop.cell((x, y)), buf.cell_mut((x, y))) {
                *dst = src.clone();
            }
        }
    }
}

/// Render the file picker (centered overlay)
pub fn render_path_prompt(f: &mut Frame, prompt: &PathPrompt) {
    let area = f.area();
    let dialog_width = 70;
    let dialog_height = 18;
    let dialog_area = centered(area, dialog_width, dialog_height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Min(0),    // Entries
            Constraint::Length(1), // Hints or error
        ])
        .split(dialog_area);

    let title = format!("{} - {}", prompt.title, prompt.filter_label);

    let input = Paragraph::new(prompt.input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().bg(Color::Black)),
    );
    f.render_widget(Clear, dialog_area);
    f.render_widget(input, chunks[0]);

    // Keep the selection inside the visible window
    let visible = chunks[1].height.saturating_sub(1) as usize;
    let offset = match prompt.selected {
        Some(i) if visible > 0 && i >= visible => i + 1 - visible,
        _ => 0,
    };

    let entry_lines: Vec<Line> = prompt
        .entries
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, entry)| {
            let is_selected = prompt.selected == Some(idx);
            let prefix = if is_selected { "▶ " } else { "  " };
            let suffix = if entry.is_dir { "/" } else { "" };
            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if entry.is_dir {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}{}", entry.name, suffix), style),
            ])
        })
        .collect();

    let list = Paragraph::new(entry_lines)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Left);
    f.render_widget(list, chunks[1]);

    let footer = match &prompt.error {
        Some(error) => Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red).bg(Color::Black)),
        None => Paragraph::new(" Enter: confirm  Esc: cancel  Up/Down: select  Tab: complete")
            .style(Style::default().fg(Color::DarkGray).bg(Color::Black)),
    };
    f.render_widget(footer, chunks[2]);

    let cursor_x = chunks[0].x + 1 + prompt.input.width() as u16;
    if cursor_x < chunks[0].right().saturating_sub(1) {
        f.set_cursor_position((cursor_x, chunks[0].y + 1));
    }
}

/// Render a message box with a row of buttons (centered overlay)
pub fn render_message_box(f: &mut Frame, options: &MessageBoxOptions, row: &ButtonRow) {
    let area = f.area();
    let button_width: usize = row.buttons.iter().map(|b| b.width() + 6).sum();
    let dialog_width = (options.message.width().max(button_width) as u16 + 6).clamp(30, 80);
    let dialog_height = 7;
    let dialog_area = centered(area, dialog_width, dialog_height);

    let border_color = match options.kind {
        MessageKind::Info => Color::Cyan,
        MessageKind::Question => Color::Yellow,
        MessageKind::Warning => Color::LightRed,
        MessageKind::Error => Color::Red,
    };

    let mut buttons = Vec::new();
    for (idx, label) in row.buttons.iter().enumerate() {
        let style = if idx == row.selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        buttons.push(Span::raw("  "));
        buttons.push(Span::styled(format!("[ {} ]", label), style));
    }

    let text = vec![
        Line::from(""),
        Line::from(options.message.as_str()),
        Line::from(""),
        Line::from(buttons),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(options.title.as_str())
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    // Clear area and render dialog
    f.render_widget(Clear, dialog_area);
    f.render_widget(paragraph, dialog_area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::config::Config;
    use crate::dialog::preset::PresetDialogs;
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|cell| cell.symbol().to_string()))
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_editor_shows_rows_past_u16_range() {
        let mut app = TuiApp::new(&Config::default(), PresetDialogs::new());
        let text = (0..70_000)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let buffer = &mut app.manager.window_mut().buffer;
        buffer.set_text(&text);
        buffer.move_down(69_999);
        app.resize(20, 6);
        assert_eq!(app.state.scroll_row, 69_995);

        let mut terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        terminal.draw(|f| render(&app, f)).unwrap();

        let buf = terminal.backend().buffer();
        assert_eq!(row_text(buf, 0), "line 69995");
        assert_eq!(row_text(buf, 4), "line 69999");
        assert_eq!(terminal.get_cursor_position().unwrap().y, 4);
    }

    #[test]
    fn test_status_bar_marks_unsaved_document() {
        let mut app = TuiApp::new(&Config::default(), PresetDialogs::new());
        app.manager.window_mut().buffer.insert_str("draft");
        app.resize(40, 3);

        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal.draw(|f| render(&app, f)).unwrap();

        let status = row_text(terminal.backend().buffer(), 2);
        assert!(status.starts_with(" untitled*"), "status was {:?}", status);
        assert_eq!(row_text(terminal.backend().buffer(), 0), "draft");
    }
}
