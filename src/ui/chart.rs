// ============================================================================
// Chart - Graphique de l'historique de prix
// ============================================================================
// Affiche l'en-tête (variation, prix courant) et la courbe de prix
// pour la période sélectionnée
//
// CONCEPTS RUST :
// 1. Option handling : couleur de marque absente ou invalide
// 2. Iterator chaining : bornes min/max en un seul fold
// 3. Parsing manuel : "#rrggbb" vers Color::Rgb
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : bornes et labels des axes X et Y
// ============================================================================

use chrono::DateTime;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::format::millify;
use crate::models::TimePeriod;
use crate::view::ChartInput;

// ============================================================================
// Fonction principale de rendu du graphique
// ============================================================================

/// Dessine l'en-tête et la courbe de prix
///
/// # Arguments
/// * `input` - données assemblées par DetailView
/// * `selected` - période sélectionnée (une requête peut être en vol)
/// * `pending` - une requête d'historique est en vol
pub fn render_price_chart(
    frame: &mut Frame,
    input: &ChartInput,
    selected: TimePeriod,
    pending: bool,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Change + prix courant
            Constraint::Min(0),    // Graphique
        ])
        .split(area);

    let color = line_color(input);
    render_chart_header(frame, input, color, chunks[0]);

    if input.points.is_empty() {
        render_placeholder(frame, chunks[1], placeholder_message(pending));
        return;
    }

    render_chart_graph(frame, input, selected, pending, color, chunks[1]);
}

/// Message quand il n'y a aucun point : chargement en cours ou historique vide
fn placeholder_message(pending: bool) -> &'static str {
    if pending {
        "Loading chart..."
    } else {
        "No data"
    }
}

/// Période des points affichés
///
/// Les points viennent de l'historique chargé : tant que la nouvelle
/// sélection est en vol, labels et titre suivent l'ancien historique
fn displayed_period(input: &ChartInput, selected: TimePeriod) -> TimePeriod {
    input.period.unwrap_or(selected)
}

// ============================================================================
// Couleur de la courbe
// ============================================================================

/// Couleur de marque si elle est valide, sinon vert/rouge selon la variation
fn line_color(input: &ChartInput) -> Color {
    if let Some(color) = input.color.as_deref().and_then(parse_hex_color) {
        return color;
    }
    match input.change {
        Some(change) if change < 0.0 => Color::Red,
        _ => Color::Green,
    }
}

/// Parse "#rrggbb" (ou "rrggbb") en Color::Rgb
///
/// CONCEPT RUST : u8::from_str_radix
/// - Chaque paire hexadécimale devient un octet
/// - .ok()? abandonne au premier caractère invalide
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ============================================================================
// Header du graphique
// ============================================================================

fn render_chart_header(frame: &mut Frame, input: &ChartInput, color: Color, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" 📈 {} Price Chart ", input.coin_name));

    let change = match input.change {
        Some(change) => format!("{}%", change),
        None => String::new(),
    };

    let text = vec![Line::from(vec![
        Span::raw("Change: "),
        Span::styled(change, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw("    "),
        Span::raw(format!("Current {} Price: ", input.coin_name)),
        Span::styled(
            format!("$ {}", input.current_price),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Graphique principal
// ============================================================================

/// Dessine la courbe de prix
///
/// L'axe X est en secondes unix : les points gardent leur espacement réel
fn render_chart_graph(
    frame: &mut Frame,
    input: &ChartInput,
    selected: TimePeriod,
    pending: bool,
    color: Color,
    area: Rect,
) {
    let points = &input.points;
    let period = displayed_period(input, selected);

    // Bornes en un seul passage
    let (min_price, max_price) = points.iter().fold(
        (f64::MAX, f64::MIN),
        |(min, max), &(_x, y)| (min.min(y), max.max(y)),
    );
    let (min_time, max_time) = points.iter().fold(
        (f64::MAX, f64::MIN),
        |(min, max), &(x, _y)| (min.min(x), max.max(x)),
    );

    // Marge de 5%, jamais sous 0
    let margin = (max_price - min_price) * 0.05;
    let y_min = (min_price - margin).max(0.0);
    let y_max = if max_price + margin > y_min {
        max_price + margin
    } else {
        // Un seul point ou prix constant : on évite des bornes égales
        y_min + 1.0
    };
    let x_max = if max_time > min_time { max_time } else { min_time + 1.0 };

    let datasets = vec![Dataset::default()
        .name(input.coin_name.as_str())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(points)];

    let x_title = if period.is_intraday() { "Time (UTC)" } else { "Date" };
    let x_axis = Axis::default()
        .title(x_title)
        .style(Style::default().fg(Color::Gray))
        .bounds([min_time, x_max])
        .labels(vec![
            Span::raw(time_label(min_time, period)),
            Span::raw(time_label((min_time + x_max) / 2.0, period)),
            Span::raw(time_label(x_max, period)),
        ]);

    let y_axis = Axis::default()
        .title("Price In USD")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("$ {}", millify(y_min))),
            Span::raw(format!("$ {}", millify((y_min + y_max) / 2.0))),
            Span::raw(format!("$ {}", millify(y_max))),
        ]);

    let title = if pending {
        format!(" {} · {} (loading {}...) ", input.coin_name, period, selected)
    } else {
        format!(" {} · {} ", input.coin_name, period)
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Label de l'axe X pour un timestamp unix (secondes)
fn time_label(seconds: f64, period: TimePeriod) -> String {
    DateTime::from_timestamp(seconds as i64, 0)
        .map(|date| date.format(period.axis_format()).to_string())
        .unwrap_or_default()
}

// ============================================================================
// Helper : Placeholder
// ============================================================================

fn render_placeholder(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
