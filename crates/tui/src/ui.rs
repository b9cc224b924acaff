use crate::app::{App, Screen};
use crate::presentation::TooltipContent;
use crate::theme::Theme;
use crate::views::{help, tooltip, trace};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render<P>(frame: &mut Frame, app: &mut App<P>) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, app, header_area);

    app.hits = trace::render(frame, &app.view, &app.palette, app.scroll, body_area);

    render_footer(frame, app, footer_area);

    render_tooltips(frame, app);

    // Help overlay
    if app.screen == Screen::Help {
        help::render(frame, frame.area());
    }
}

fn render_header<P>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let block = Theme::block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = app.view.trace().log.len();
    let mut spans = vec![
        Span::styled(" otlog ", Style::new().fg(Theme::ACCENT_ORANGE).bold()),
        Span::styled(" ", Style::new()),
        Span::styled(app.title.clone(), Style::new().fg(Theme::TEXT_PRIMARY)),
        Span::styled(
            format!("  {entries} entries  "),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ),
        Span::styled(
            app.view.trace().current_state().status_str(),
            Style::new().fg(Theme::ACCENT_GREEN),
        ),
    ];
    if app.settings.show_validation && !app.warnings.is_empty() {
        spans.push(Span::styled(
            format!("  {} invalid diagram(s)", app.warnings.len()),
            Style::new().fg(Theme::ACCENT_RED).bold(),
        ));
    }
    if let Some(message) = &app.flash_message {
        spans.push(Span::styled(
            format!("  {message}"),
            Style::new().fg(Theme::ACCENT_YELLOW).italic(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_footer<P>(frame: &mut Frame, app: &App<P>, area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let mut spans = vec![
        Span::styled(" j/k ", key_style),
        Span::styled("scroll  ", desc_style),
        Span::styled("Tab ", key_style),
        Span::styled("focus  ", desc_style),
        Span::styled("Esc ", key_style),
        Span::styled("leave  ", desc_style),
        Span::styled("? ", key_style),
        Span::styled("help  ", desc_style),
        Span::styled("q ", key_style),
        Span::styled("quit", desc_style),
    ];
    let position = format!("  row {}/{}", app.scroll + 1, app.row_count());
    spans.push(Span::styled(position, Style::new().fg(Theme::TEXT_MUTED)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Related labels first so an open detail tooltip stays on top.
fn render_tooltips<P>(frame: &mut Frame, app: &App<P>) {
    let mut tooltips = app.view.visible_tooltips();
    tooltips.sort_by_key(|(_, content)| matches!(content, TooltipContent::Detail { .. }));

    for (id, content) in tooltips {
        let (Some(anchor), Some(unit)) = (app.hits.rect_of(id), app.view.unit(id)) else {
            continue;
        };
        tooltip::render(
            frame,
            anchor,
            unit.placement(),
            &content,
            app.settings.tooltip_max_width,
        );
    }
}
