// ============================================================================
// Details - Rendu de la page de détail d'une crypto
// ============================================================================
// Dessine l'interface à partir de l'état de App :
// - Loading : indicateur de chargement seul
// - Ready : titre, sélecteur de période, graphique, statistiques,
//   description et liens
//
// CONCEPTS RATATUI :
// 1. Layout imbriqués : vertical puis horizontal
// 2. Tabs : sélecteur de période
// 3. Paragraph + Wrap + scroll : description longue
// 4. List : statistiques et liens
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, ViewState};
use crate::models::{Glyph, IconKey, StatEntry, StatValue, TimePeriod};
use crate::ui::chart;
use crate::view::{DetailView, LinkEntry};

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - ViewState::Loading : rien d'autre que l'indicateur
/// - ViewState::Ready : la page complète
pub fn render(frame: &mut Frame, app: &App) {
    match (app.view_state(), app.detail_view()) {
        (ViewState::Ready, Some(view)) => render_details(frame, app, &view),
        _ => render_loading(frame, app),
    }
}

// ============================================================================
// Loading
// ============================================================================

fn render_loading(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" coinview ")
        .title_alignment(Alignment::Center);

    // Centre verticalement le message
    let padding = chunks[0].height.saturating_sub(3) / 2;
    let mut text: Vec<Line> = (0..padding).map(|_| Line::from("")).collect();
    text.push(Line::from(Span::styled(
        "Loading ...",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, chunks[0]);
    render_footer(frame, app, chunks[1]);
}

// ============================================================================
// Ready : page complète
// ============================================================================

/// Découpage :
/// - header (titre + sous-titre)
/// - sélecteur de période
/// - graphique | statistiques
/// - description | liens
/// - footer
fn render_details(frame: &mut Frame, app: &App, view: &DetailView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),       // Header
            Constraint::Length(3),       // Périodes
            Constraint::Min(12),         // Graphique + stats
            Constraint::Percentage(30),  // Description + liens
            Constraint::Length(4),       // Footer
        ])
        .split(frame.size());

    render_header(frame, view, rows[0]);
    render_period_tabs(frame, app.time_period, rows[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    chart::render_price_chart(
        frame,
        &view.chart,
        app.time_period,
        app.history_pending,
        middle[0],
    );

    let stats = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(middle[1]);

    render_stats_panel(
        frame,
        &view.value_stats_title,
        &view.value_stats_subtitle,
        &view.primary,
        stats[0],
    );
    render_stats_panel(
        frame,
        &view.other_stats_title,
        &view.other_stats_subtitle,
        &view.secondary,
        stats[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[3]);

    render_description(frame, view, app.description_scroll, bottom[0]);
    render_links(frame, view, app.selected_link, bottom[1]);

    render_footer(frame, app, rows[4]);
}

fn render_header(frame: &mut Frame, view: &DetailView, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = vec![
        Line::from(Span::styled(
            view.heading.as_str(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            view.subtitle.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Sélecteur de période : les 8 jetons, dans l'ordre fixe
fn render_period_tabs(frame: &mut Frame, selected: TimePeriod, area: Rect) {
    let titles: Vec<Line> = TimePeriod::all()
        .iter()
        .enumerate()
        .map(|(index, period)| Line::from(format!("{} {}", index + 1, period.token())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Select Timeperiod "),
        )
        .select(selected.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        );

    frame.render_widget(tabs, area);
}

// ============================================================================
// Statistiques
// ============================================================================

/// Symbole terminal pour chaque icône
pub fn icon_symbol(icon: IconKey) -> &'static str {
    match icon {
        IconKey::DollarCircle => "$",
        IconKey::Number => "#",
        IconKey::Thunderbolt => "⚡",
        IconKey::Trophy => "🏆",
        IconKey::Fund => "📊",
        IconKey::MoneyCollect => "💰",
        IconKey::ExclamationCircle => "❗",
    }
}

pub fn glyph_symbol(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Confirmed => "✔",
        Glyph::Unconfirmed => "✖",
    }
}

/// Une ligne "icône  libellé   valeur"
fn stat_line(entry: &StatEntry) -> Line<'static> {
    let value = match &entry.value {
        StatValue::Text(text) => Span::styled(
            text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        StatValue::Glyph(glyph) => {
            let color = match glyph {
                Glyph::Confirmed => Color::Green,
                Glyph::Unconfirmed => Color::Red,
            };
            Span::styled(glyph_symbol(*glyph), Style::default().fg(color))
        }
    };

    Line::from(vec![
        Span::styled(
            format!(" {:<2} ", icon_symbol(entry.icon)),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!("{:<28}", entry.label)),
        value,
    ])
}

fn render_stats_panel(
    frame: &mut Frame,
    title: &str,
    subtitle: &str,
    entries: &[StatEntry],
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", title));

    let mut items = vec![
        ListItem::new(Line::from(Span::styled(
            subtitle.to_string(),
            Style::default().fg(Color::Gray),
        ))),
        ListItem::new(""),
    ];
    items.extend(entries.iter().map(|entry| ListItem::new(stat_line(entry))));

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Description et liens
// ============================================================================

fn render_description(frame: &mut Frame, view: &DetailView, scroll: u16, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", view.description_title));

    let text: Vec<Line> = view
        .description
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Ligne de la liste des liens : type en titre, nom en valeur
fn link_line(link: &LinkEntry) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {:<12}", link.kind),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(link.name.clone()),
    ])
}

fn render_links(frame: &mut Frame, view: &DetailView, selected: usize, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", view.links_title));

    if view.links.is_empty() {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "No links",
            Style::default().fg(Color::Gray),
        )))
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = view
        .links
        .iter()
        .enumerate()
        .map(|(index, link)| {
            let item = ListItem::new(link_line(link));
            if index == selected {
                item.style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                )
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Footer : raccourcis et message d'état
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = |label: &'static str| {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    };

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_ready() {
        Line::from(vec![
            key("[q]"),
            Span::raw(" Quit  "),
            key("[h l / ← →]"),
            Span::raw(" Period  "),
            key("[1-8]"),
            Span::raw(" Jump  "),
            key("[↑↓ / j k]"),
            Span::raw(" Links  "),
            key("[Enter]"),
            Span::raw(" Open  "),
            key("[PgUp PgDn]"),
            Span::raw(" Scroll  "),
            key("[r]"),
            Span::raw(" Refresh"),
        ])
    } else {
        Line::from(vec![
            key("[q]"),
            Span::raw(" Quit  "),
            key("[r]"),
            Span::raw(" Retry"),
        ])
    };

    let status = match &app.status_message {
        Some(message) => Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    };

    let paragraph = Paragraph::new(vec![shortcuts, status])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
