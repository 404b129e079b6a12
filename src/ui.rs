use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use cardstack::app::App;
use cardstack::content::{CardItem, Catalog, Category};
use cardstack::metrics::MetricGenerator;
use cardstack::page::ROW_PX;
use cardstack::pause::Clock;
use cardstack::progress::{ItemVisual, STACKED_OPACITY};

const CARD_HEIGHT: i32 = 7;
const SPOTLIGHT_HEIGHT: u16 = 5;

/// Rows of chrome around the page viewport (status bar, spotlight, hints)
pub const CHROME_ROWS: u16 = 2 + SPOTLIGHT_HEIGHT;

pub fn draw<C: Clock>(app: &App<C>, catalog: &Catalog, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(SPOTLIGHT_HEIGHT),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_status(app, f, chunks[0]);
    draw_page(app, f, chunks[1]);
    draw_spotlight(app, catalog, f, chunks[2]);

    let hints = Paragraph::new(Span::styled(
        "↑/↓ scroll · enter interact · space pause · r resume · q quit",
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    f.render_widget(hints, chunks[3]);
}

fn draw_status<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let snap = app.controller.snapshot();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let autoplay = if app.pause.is_paused() {
        match app.pause.time_until_resume() {
            Some(left) => Span::styled(
                format!("paused · resumes in {}s", left.as_secs()),
                Style::default().fg(Color::Yellow).patch(bold),
            ),
            None => Span::styled("paused", Style::default().fg(Color::Yellow).patch(bold)),
        }
    } else {
        Span::styled("autoplay", Style::default().fg(Color::Green).patch(bold))
    };

    let line = Line::from(vec![
        Span::styled(" cardstack ", Style::default().fg(Color::Magenta).patch(bold)),
        Span::raw(format!(
            "card {}/{} · {:>3.0}% · ",
            snap.active_index + 1,
            snap.items.len(),
            snap.progress * 100.0
        )),
        autoplay,
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_page<C: Clock>(app: &App<C>, f: &mut Frame, area: Rect) {
    let layout = app.page.layout();

    let hero_top = px_to_rows(-app.page.scroll_y());
    let hero_rows = px_to_rows(layout.hero_height);
    if let Some(rect) = band(area, hero_top, hero_rows) {
        let hero = Paragraph::new(vec![
            Line::from(Span::styled(
                "Clinical answers, coded and documented",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "scroll down to walk through the cards",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        f.render_widget(hero, rect);
    }

    let panel_top = px_to_rows(app.page.pinned_top());
    let panel_rows = px_to_rows(layout.viewport_height);
    if band(area, panel_top, panel_rows).is_none() {
        return;
    }

    let snap = app.controller.snapshot();
    for (idx, (visual, card)) in snap.items.iter().zip(app.cards.iter()).enumerate() {
        if visual.opacity <= 0.0 {
            continue;
        }
        let top = panel_top + px_to_rows(visual.vertical_offset);
        let Some(rows) = band(area, top, CARD_HEIGHT) else {
            continue;
        };
        let rect = scaled_width(rows, visual.scale);
        draw_card(f, rect, card, visual, idx == snap.active_index);
    }
}

fn draw_card(f: &mut Frame, rect: Rect, card: &CardItem, visual: &ItemVisual, active: bool) {
    let mut style = Style::default();
    if visual.opacity <= STACKED_OPACITY {
        style = style.add_modifier(Modifier::DIM);
    }
    let border = if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        style
    };

    let inner_width = rect.width.saturating_sub(4) as usize;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            format!(" {} ", fit(card.category.label(), inner_width)),
            border,
        ));
    let body = Paragraph::new(vec![
        Line::from(Span::styled(
            fit(&card.title, inner_width),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(card.summary.clone(), style)),
    ])
    .block(block)
    .wrap(Wrap { trim: true });

    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}

fn draw_spotlight<C: Clock>(app: &App<C>, catalog: &Catalog, f: &mut Frame, area: Rect) {
    let Some(card) = app.spotlight_card() else {
        return;
    };
    let block = Block::default()
        .borders(Borders::TOP)
        .title(" spotlight ")
        .border_style(Style::default().add_modifier(Modifier::DIM));
    let mut text = vec![
        Line::from(Span::styled(
            card.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(spotlight_detail(card)),
    ];
    if let Some(related) = related_line(catalog, card) {
        text.push(Line::from(Span::styled(
            related,
            Style::default().add_modifier(Modifier::DIM),
        )));
    }
    f.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Metrics are only meaningful for case studies; other cards show their summary
fn spotlight_detail(card: &CardItem) -> String {
    if card.category != Category::CaseStudy {
        return card.summary.clone();
    }
    let metrics = MetricGenerator::case_study(&card.slug);
    format!(
        "{:.1}% coding accuracy · {} hours saved weekly · {} claims processed",
        metrics.accuracy_pct, metrics.hours_saved_weekly, metrics.claims_processed
    )
}

fn related_line(catalog: &Catalog, card: &CardItem) -> Option<String> {
    let related = catalog.related(&card.slug, 2);
    if related.is_empty() {
        return None;
    }
    let titles: Vec<&str> = related.iter().map(|i| i.title.as_str()).collect();
    Some(format!("related: {}", titles.join(" · ")))
}

fn px_to_rows(px: f64) -> i32 {
    (px / ROW_PX).round() as i32
}

/// Vertical slice of `area` starting `top` rows below its top edge,
/// clipped to the area. `None` when nothing of it is on screen.
fn band(area: Rect, top: i32, height: i32) -> Option<Rect> {
    let start = top.max(0);
    let end = (top + height).min(area.height as i32);
    if end <= start {
        return None;
    }
    Some(Rect {
        x: area.x,
        y: area.y + start as u16,
        width: area.width,
        height: (end - start) as u16,
    })
}

fn scaled_width(rect: Rect, scale: f64) -> Rect {
    if rect.width == 0 {
        return rect;
    }
    let width = ((rect.width as f64 * 0.8 * scale).round() as u16).clamp(1, rect.width);
    Rect {
        x: rect.x + (rect.width - width) / 2,
        width,
        ..rect
    }
}

/// Truncate to `width` display columns, adding an ellipsis when cut
fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_clips_to_the_area() {
        let area = Rect::new(0, 2, 40, 10);
        assert_eq!(band(area, -3, 5), Some(Rect::new(0, 2, 40, 2)));
        assert_eq!(band(area, 8, 7), Some(Rect::new(0, 10, 40, 2)));
        assert_eq!(band(area, 10, 3), None);
        assert_eq!(band(area, -7, 5), None);
    }

    #[test]
    fn scaled_width_stays_centred() {
        let r = scaled_width(Rect::new(0, 0, 100, 5), 1.0);
        assert_eq!(r.width, 80);
        assert_eq!(r.x, 10);
    }

    #[test]
    fn scaled_width_of_a_zero_column_area() {
        let r = scaled_width(Rect::new(3, 0, 0, 5), 0.95);
        assert_eq!(r, Rect::new(3, 0, 0, 5));
    }

    #[test]
    fn only_case_studies_get_metrics() {
        let catalog = Catalog::load_embedded().unwrap();
        for category in Category::ALL {
            let card = catalog.by_category(*category)[0];
            let detail = spotlight_detail(card);
            if *category == Category::CaseStudy {
                assert!(detail.contains("coding accuracy"));
            } else {
                assert_eq!(detail, card.summary);
            }
        }
    }

    #[test]
    fn related_line_lists_titles_sharing_tags() {
        let catalog = Catalog::load_embedded().unwrap();
        let with_related = catalog
            .sequence(None)
            .unwrap()
            .iter()
            .find(|c| !catalog.related(&c.slug, 2).is_empty())
            .cloned()
            .unwrap();
        let line = related_line(&catalog, &with_related).unwrap();
        assert!(line.starts_with("related: "));
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("Hemoglobin A1c", 6), "Hemog…");
    }
}
