use crate::core::app::App;
use crate::core::message::Message;
use crate::core::text_wrapping::{count_wrapped_lines, wrap_text};
use crate::core::zones::{ZoneId, ZonePersona};
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const RAIL_WIDTH: u16 = 26;
const ASSISTANT_LABEL: &str = "Staff Note";
const EMPTY_TITLE: &str = "Begin the Service";
const IN_FLIGHT_NOTE: &str = "Service in progress...";

pub fn ui(f: &mut Frame, app: &mut App) {
    let persona = app.active_persona().clone();
    let theme = Theme::for_accent_hex(&persona.accent_color);

    let area = f.area();
    f.buffer_mut()
        .set_style(area, Style::default().bg(theme.background_color));

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(RAIL_WIDTH), Constraint::Min(20)])
        .split(area);

    render_rail(f, app, &theme, columns[0]);

    let main = columns[1];
    let header_height = header_height(&persona, main.width);
    let suggestion_height = persona.suggested_prompts.len() as u16 + 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Min(3),
            Constraint::Length(suggestion_height),
            Constraint::Length(3),
        ])
        .split(main);

    render_header(f, app, &persona, &theme, rows[0]);
    render_conversation(f, app, &theme, rows[1]);
    render_suggestions(f, &persona, &theme, rows[2]);
    render_input(f, app, &theme, rows[3]);

    if app.is_dimmed() {
        f.buffer_mut()
            .set_style(main, Style::default().add_modifier(Modifier::DIM));
    }
}

fn render_rail(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let lines = rail_lines(app, theme);
    let rail = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::RIGHT)
            .title(Span::styled(" Five Points ", theme.rail_active_style)),
    );
    f.render_widget(rail, area);
}

/// One row per zone plus the key hints at the bottom.
pub fn rail_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let active = app.session.active_zone();
    let pending = app.session.pending_zone();
    let registry = app.session.registry();

    let mut lines = vec![Line::default()];
    for persona in registry.iter() {
        let number = registry.number(persona.id);
        let (marker, style) = if persona.id == active {
            ("▸", theme.rail_active_style)
        } else if Some(persona.id) == pending {
            (" ", theme.rail_pending_style)
        } else {
            (" ", theme.rail_style)
        };
        let mut spans = vec![Span::styled(
            format!("{marker} F{number} {}", persona.metaphor),
            style,
        )];
        if Some(persona.id) == pending {
            spans.push(Span::styled(" …", theme.rail_pending_style));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    for hint in ["Tab/Shift+Tab switch", "Alt+1-3 suggestion", "Esc clear  Ctrl+C quit"] {
        lines.push(Line::from(Span::styled(hint, theme.system_text_style)));
    }
    lines
}

fn header_height(persona: &ZonePersona, width: u16) -> u16 {
    let inner = width.saturating_sub(2) as usize;
    let description_rows = count_wrapped_lines(&persona.description, inner) as u16;
    let insight_rows = u16::from(!persona.featured_insights.is_empty());
    // borders + number/title + metaphor + tagline
    2 + 3 + description_rows + insight_rows
}

fn render_header(f: &mut Frame, app: &App, persona: &ZonePersona, theme: &Theme, area: Rect) {
    let number = app.session.registry().number(persona.id);
    let lines = header_lines(persona, number, theme);
    let header = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.input_border_style),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(header, area);
}

pub fn header_lines(persona: &ZonePersona, number: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("Zone {number} · "), theme.zone_number_style),
            Span::styled(persona.title.clone(), theme.zone_number_style),
        ]),
        Line::from(Span::styled(persona.metaphor.clone(), theme.metaphor_style)),
        Line::from(Span::styled(persona.tagline.clone(), theme.tagline_style)),
        Line::from(Span::styled(
            persona.description.clone(),
            theme.description_style,
        )),
    ];

    if !persona.featured_insights.is_empty() {
        let mut spans = Vec::new();
        for (i, insight) in persona.featured_insights.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("   ", theme.insight_label_style));
            }
            spans.push(Span::styled(
                format!("{}: ", insight.label),
                theme.insight_label_style,
            ));
            spans.push(Span::styled(
                insight.value.clone(),
                theme.insight_value_style,
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn render_conversation(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let block = Block::default().title(Span::styled(" Service ", theme.input_title_style));
    let inner = block.inner(area);
    let lines = conversation_lines(
        app.session.messages(),
        app.session.is_in_flight(),
        inner.width as usize,
        theme,
    );

    let max_scroll = max_scroll_for(lines.len(), inner.height);
    let scroll = app.ui.effective_scroll(max_scroll);

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

/// Rows hidden above the viewport when `total_rows` rows are shown in `viewport` rows.
pub fn max_scroll_for(total_rows: usize, viewport: u16) -> u16 {
    u16::try_from(total_rows)
        .unwrap_or(u16::MAX)
        .saturating_sub(viewport)
}

/// Pre-wrapped conversation rows for a pane `width` columns wide.
pub fn conversation_lines(
    messages: &[Message],
    in_flight: bool,
    width: usize,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if messages.is_empty() && !in_flight {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(EMPTY_TITLE, theme.metaphor_style)));
        lines.push(Line::from(Span::styled(
            "Type below or pick a suggestion to place your first order.",
            theme.system_text_style,
        )));
        return lines;
    }

    for message in messages {
        if message.is_user() {
            let prefix = "You: ";
            let rows = wrap_text(&message.content, width.saturating_sub(prefix.len()));
            for (i, row) in rows.into_iter().enumerate() {
                let lead = if i == 0 { prefix } else { "     " };
                lines.push(Line::from(vec![
                    Span::styled(lead, theme.user_prefix_style),
                    Span::styled(row, theme.user_text_style),
                ]));
            }
        } else {
            lines.push(Line::from(Span::styled(
                ASSISTANT_LABEL,
                theme.assistant_label_style,
            )));
            for row in wrap_text(&message.content, width) {
                lines.push(Line::from(Span::styled(row, theme.assistant_text_style)));
            }
        }
        lines.push(Line::default());
    }

    if in_flight {
        lines.push(Line::from(Span::styled(
            IN_FLIGHT_NOTE,
            theme.system_text_style.add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn render_suggestions(f: &mut Frame, persona: &ZonePersona, theme: &Theme, area: Rect) {
    let lines: Vec<Line> = persona
        .suggested_prompts
        .iter()
        .enumerate()
        .map(|(i, prompt)| {
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), theme.insight_value_style),
                Span::styled(prompt.clone(), theme.suggestion_style),
            ])
        })
        .collect();
    let suggestions = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.system_text_style)
            .title(Span::styled(
                " Suggestions (Alt+1-3) ",
                theme.input_title_style,
            )),
    );
    f.render_widget(suggestions, area);
}

fn render_input(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = if app.is_dimmed() {
        "Changing zones..."
    } else if app.session.is_in_flight() {
        "Waiting for the kitchen (Ctrl+C to quit)"
    } else {
        "Your order (Enter to send, Esc to clear)"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.input_border_style)
        .title(Span::styled(title, theme.input_title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(app.ui.textarea(), inner);
}

/// Zone shown for the F-key at `number` (1-based), if any.
pub fn zone_for_function_key(number: u8) -> Option<ZoneId> {
    ZoneId::from_index(usize::from(number).checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction};
    use crate::utils::test_utils::create_test_app;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn empty_conversation_invites_first_order() {
        let rows = plain(&conversation_lines(&[], false, 40, &Theme::default()));
        assert!(rows.iter().any(|row| row == EMPTY_TITLE));
    }

    #[test]
    fn assistant_turns_are_labelled_and_in_flight_is_noted() {
        let messages = vec![
            Message::user("Is the grill hot?"),
            Message::assistant("Four fifty and climbing."),
            Message::user("Great"),
        ];
        let rows = plain(&conversation_lines(&messages, true, 40, &Theme::default()));
        assert_eq!(rows[0], "You: Is the grill hot?");
        assert_eq!(rows[2], ASSISTANT_LABEL);
        assert_eq!(rows[3], "Four fifty and climbing.");
        assert_eq!(rows.last().map(String::as_str), Some(IN_FLIGHT_NOTE));
        assert!(!rows.iter().any(|row| row == EMPTY_TITLE));
    }

    #[test]
    fn long_user_turns_wrap_under_the_prefix() {
        let messages = vec![Message::user("one two three four five six")];
        let rows = plain(&conversation_lines(&messages, false, 15, &Theme::default()));
        assert_eq!(rows[0], "You: one two");
        assert_eq!(rows[1], "     three four");
    }

    #[test]
    fn rail_marks_active_and_pending_zones() {
        let mut app = create_test_app();
        apply_action(
            &mut app,
            AppAction::SelectZone {
                zone: ZoneId::Silence,
            },
        );
        let rows = plain(&rail_lines(&app, &Theme::default()));
        assert!(rows.contains(&"▸ F1 Burger Point".to_string()));
        assert!(rows.contains(&"  F5 Water Point …".to_string()));
    }

    #[test]
    fn header_shows_number_metaphor_and_insights() {
        let app = create_test_app();
        let persona = app.active_persona();
        let rows = plain(&header_lines(persona, 1, &Theme::default()));
        assert!(rows[0].starts_with("Zone 1 · "));
        assert_eq!(rows[1], persona.metaphor);
        assert_eq!(rows[2], persona.tagline);
        let insight = &persona.featured_insights[0];
        let expected = format!("{}: {}", insight.label, insight.value);
        assert!(rows[4].contains(&expected));
    }

    fn draw_to_text(app: &mut App, width: u16, height: u16) -> String {
        let mut term = Terminal::new(TestBackend::new(width, height)).expect("term");
        term.draw(|f| ui(f, app)).expect("draw");
        term.backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn full_frame_draws_rail_header_and_empty_conversation() {
        let mut app = create_test_app();
        let screen = draw_to_text(&mut app, 100, 40);
        assert!(screen.contains("F1 Burger Point"));
        assert!(screen.contains("Zone 1"));
        assert!(screen.contains(EMPTY_TITLE));
    }

    #[test]
    fn drawing_refreshes_the_scroll_bound() {
        let mut app = create_test_app();
        for i in 0..40 {
            let request = app
                .session
                .begin_submit(&format!("order {i}"))
                .expect("idle session accepts input");
            app.session.settle(request.ticket, Ok(format!("ready {i}")));
        }
        draw_to_text(&mut app, 100, 40);
        assert!(app.ui.max_scroll > 0);
        assert_eq!(app.ui.scroll_offset, app.ui.max_scroll);
    }

    #[test]
    fn max_scroll_saturates_for_very_long_conversations() {
        assert_eq!(max_scroll_for(10, 4), 6);
        assert_eq!(max_scroll_for(3, 4), 0);
        assert_eq!(max_scroll_for(70_000, 20), u16::MAX - 20);
    }

    #[test]
    fn function_keys_map_to_zones() {
        assert_eq!(zone_for_function_key(1), Some(ZoneId::Observation));
        assert_eq!(zone_for_function_key(5), Some(ZoneId::Silence));
        assert_eq!(zone_for_function_key(0), None);
        assert_eq!(zone_for_function_key(6), None);
    }
}
