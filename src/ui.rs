use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use darkroom::catalog::{PATTERN_SIZE, RewardItem};
use darkroom::floor::{FLOOR_HEIGHT, FLOOR_WIDTH, Position};
use darkroom::loader::{LoaderSequence, LoaderStage};
use darkroom::theme::{Theme, parse_hex};

use crate::app::{App, CatMood, PaneFocus, Screen, format_progress};

pub fn draw(f: &mut Frame<'_>, app: &App) {
    let theme = &app.theme;
    let area = f.size();
    f.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );
    match &app.screen {
        Screen::Loading(loader) => draw_loader(f, area, loader, theme),
        Screen::Lobby => draw_lobby(f, area, app),
        Screen::Darkroom => draw_darkroom(f, area, app),
    }
}

fn draw_loader(f: &mut Frame<'_>, area: Rect, loader: &LoaderSequence, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let style = if loader.stage() == LoaderStage::Flash {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.accent)
    };
    let caption = Paragraph::new(loader.stage().caption())
        .alignment(Alignment::Center)
        .style(style);
    f.render_widget(caption, rows[1]);

    if matches!(
        loader.stage(),
        LoaderStage::Developing | LoaderStage::Complete
    ) {
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(theme.accent).bg(Color::Black))
            .percent(loader.progress() as u16);
        f.render_widget(gauge, centered(rows[2], 50));
    }
}

fn draw_lobby(f: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = &app.theme;
    let count = app.session.history().lifetime_count;
    let mut lines = vec![
        Line::from(Span::styled(
            "FRAME X • BONUS REEL",
            Style::default().fg(theme.accent),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "DARKROOM CAT",
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Help Miso develop mysterious photos in the darkroom.",
            Style::default().fg(theme.muted),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] ENTER DARKROOM   [D] darkroom mode   [Q] quit",
            Style::default().fg(theme.accent),
        )),
    ];
    if count > 0 {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Photos developed: {count}"),
            Style::default().fg(theme.accent),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(12),
            Constraint::Min(0),
        ])
        .split(area);
    f.render_widget(paragraph, centered(rows[1], 60));
}

fn draw_darkroom(f: &mut Frame<'_>, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),
            Constraint::Min(0),
            Constraint::Length(7),
        ])
        .split(area);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_line(f, chunks[0], app);
    draw_station(f, main_chunks[0], app);
    draw_floor(f, main_chunks[1], app);
    draw_footer(f, chunks[2], app);
}

fn draw_line(f: &mut Frame<'_>, area: Rect, app: &App) {
    let block = pane_block("Drying Line", app.focus == PaneFocus::Line, &app.theme);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let photos = &app.session.history().recent_draws;
    if photos.is_empty() {
        let paragraph = Paragraph::new("Nothing hanging yet. Develop a frame to start the line.")
            .style(Style::default().fg(app.theme.muted));
        f.render_widget(paragraph, inner);
        return;
    }

    // Each thumbnail is the pattern drawn two cells per pixel plus a gap.
    let per_photo = (PATTERN_SIZE * 2 + 1) as u16;
    let fit = (inner.width / per_photo).max(1) as usize;
    let start = photos.len().saturating_sub(fit);
    let mut rows: Vec<Vec<Span>> = vec![Vec::new(); PATTERN_SIZE];
    for (idx, photo) in photos.iter().enumerate().skip(start) {
        let selected = app.focus == PaneFocus::Line && idx == app.line_selected;
        for (row, spans) in rows.iter_mut().enumerate() {
            spans.extend(pattern_row(photo, row, &app.theme));
            spans.push(Span::styled(
                if selected { "◂" } else { " " },
                Style::default().fg(app.theme.focus),
            ));
        }
    }
    let lines: Vec<Line> = rows.into_iter().map(Line::from).collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn pattern_row(photo: &RewardItem, row: usize, theme: &Theme) -> Vec<Span<'static>> {
    photo.pattern[row]
        .iter()
        .map(|hex| {
            let color = parse_hex(hex).unwrap_or(theme.muted);
            Span::styled("██", Style::default().fg(color))
        })
        .collect()
}

fn draw_station(f: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = pane_block("Development Station", app.focus == PaneFocus::Station, theme);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let segments = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(inner);

    let history = app.session.history();
    let stats = Paragraph::new(Line::from(vec![
        Span::styled("PHOTOS DEVELOPED ", Style::default().fg(theme.accent)),
        Span::styled(
            history.lifetime_count.to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("ON THE LINE ", Style::default().fg(theme.accent)),
        Span::styled(
            history.recent_draws.len().to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]));
    f.render_widget(stats, segments[0]);

    let state = app.session.state();
    let gauge = Gauge::default()
        .block(Block::default().title("Development Progress"))
        .ratio((state.progress / 100.0).clamp(0.0, 1.0))
        .gauge_style(
            Style::default()
                .fg(theme.accent)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .label(format_progress(state.progress));
    f.render_widget(gauge, segments[1]);

    let (label, style) = if state.active {
        ("DEVELOPING...", Style::default().fg(theme.muted))
    } else {
        (
            "[Enter] DEVELOP PHOTO",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )
    };
    let mood = match app.mood {
        CatMood::Working => Style::default().fg(Color::LightRed),
        _ => Style::default().fg(Color::Rgb(0xff, 0xa7, 0x26)),
    };
    let bubbles = "°".repeat(app.bubbles.len().min(12));
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(label, style),
            Span::raw("   "),
            Span::styled(app.mood.caption(), mood),
            Span::raw(" "),
            Span::styled(bubbles, Style::default().fg(Color::LightRed)),
        ])),
        segments[2],
    );

    match &app.latest {
        Some(frame) => {
            let item = &frame.item;
            let mut lines: Vec<Line> = (0..PATTERN_SIZE)
                .map(|row| Line::from(pattern_row(item, row, theme)))
                .collect();
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", item.rarity.icon()),
                    Style::default().fg(theme.rarity(item.rarity)),
                ),
                Span::styled(
                    item.name.clone(),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(frame.frame_id.clone(), Style::default().fg(theme.muted)),
            ]));
            lines.push(Line::from(Span::styled(
                item.description.clone(),
                Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::from(Span::styled(
                item.rarity.label(),
                Style::default().fg(theme.rarity(item.rarity)),
            )));
            f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), segments[3]);
        }
        None => {
            let placeholder = Paragraph::new("The tray is empty.")
                .style(Style::default().fg(theme.muted))
                .wrap(Wrap { trim: true });
            f.render_widget(placeholder, segments[3]);
        }
    }
}

fn draw_floor(f: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = pane_block("Darkroom Floor", app.focus == PaneFocus::Floor, theme);
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let mut lines = Vec::with_capacity(FLOOR_HEIGHT + 2);
    for y in 0..FLOOR_HEIGHT {
        let mut spans = Vec::with_capacity(FLOOR_WIDTH);
        for x in 0..FLOOR_WIDTH {
            let at = Position { x, y };
            let span = if app.floor.cat == at {
                Span::styled(" ^^", Style::default().fg(Color::Rgb(0xff, 0xa7, 0x26)))
            } else if let Some(tray) = app.floor.tray_at(at) {
                let glyph = if tray.developed { " ✓ " } else { " ▭ " };
                Span::styled(glyph, Style::default().fg(theme.text))
            } else {
                Span::styled(" · ", Style::default().fg(theme.muted))
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    let hint = if app.floor.near_tray() {
        "Use arrow keys to move. Press Space to develop film."
    } else {
        "Use arrow keys to move."
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(theme.accent))));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Controls & Feed")
        .border_style(Style::default().fg(theme.border));
    f.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let instruction_lines = vec![
        Line::from("Tab cycle focus | D darkroom mode | Esc exit | Q quit"),
        Line::from("Station: Enter develop"),
        Line::from("Floor: ←↑→↓ move  Space develop tray"),
        Line::from("Line: ←→ browse photos"),
    ];
    f.render_widget(
        Paragraph::new(instruction_lines).wrap(Wrap { trim: true }),
        columns[0],
    );

    let mut items: Vec<ListItem> = app
        .messages
        .iter()
        .map(|msg| ListItem::new(Line::from(Span::raw(msg.clone()))))
        .collect();
    if let Some(photo) = app.session.history().recent_draws.get(app.line_selected) {
        if app.focus == PaneFocus::Line {
            items.insert(
                0,
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", photo.rarity.icon()),
                        Style::default().fg(theme.rarity(photo.rarity)),
                    ),
                    Span::styled(photo.name.clone(), Style::default().fg(theme.text)),
                    Span::raw(" - "),
                    Span::styled(photo.description.clone(), Style::default().fg(theme.muted)),
                ])),
            );
        }
    }
    if items.is_empty() {
        items.push(ListItem::new(Span::styled(
            "Red light on...",
            Style::default().fg(theme.muted),
        )));
    }
    f.render_widget(List::new(items), columns[1]);
}

fn pane_block<'a>(title: &'a str, focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if focused {
        Style::default()
            .fg(theme.focus)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border)
    };
    Block::default()
        .title(Span::styled(title, Style::default().fg(theme.text)))
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn centered(area: Rect, percent: u16) -> Rect {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent) / 2),
            Constraint::Percentage(percent),
            Constraint::Min(0),
        ])
        .split(area);
    columns[1]
}
