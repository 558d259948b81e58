use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};

// Cool violet palette
pub const ACCENT: Color = Color::Rgb(170, 120, 255); // Violet accent
pub const ACCENT_DIM: Color = Color::Rgb(120, 85, 190); // Dimmed violet
pub const ACCENT_HIGHLIGHT_BG: Color = Color::Rgb(38, 32, 52); // Selected rows
pub const LIGHT_BORDER: Color = Color::Rgb(75, 72, 88); // Subtle border
pub const DIM_TEXT: Color = Color::Rgb(115, 110, 130); // Dimmed text
pub const SURFACE_BG: Color = Color::Rgb(20, 19, 26); // Card background
pub const HEADER_BG: Color = Color::Rgb(28, 26, 36); // Header background
pub const SUCCESS_COLOR: Color = Color::Rgb(100, 220, 150);
pub const ERROR_COLOR: Color = Color::Rgb(240, 100, 100);
pub const WARNING_COLOR: Color = Color::Rgb(240, 180, 80);
pub const CODE_COLOR: Color = Color::Rgb(255, 184, 108);

const TITLE: &str = "vinw workspace";
const GRADIENT_START: (u8, u8, u8) = (255, 121, 198);
const GRADIENT_END: (u8, u8, u8) = (139, 233, 253);

pub fn key_hint(key: &str) -> Span<'static> {
    Span::styled(
        key.to_string(),
        Style::default().fg(ACCENT_DIM).add_modifier(Modifier::BOLD),
    )
}

pub fn hint_text(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(DIM_TEXT))
}

/// A row of `key description` pairs for screen footers.
pub fn hints(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, (key, text)) in pairs.iter().enumerate() {
        if idx > 0 {
            spans.push(hint_text("  "));
        }
        spans.push(key_hint(key));
        spans.push(hint_text(&format!(" {}", text)));
    }
    Line::from(spans)
}

pub fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Style::default().fg(ACCENT).bg(SURFACE_BG)
        } else {
            Style::default().fg(LIGHT_BORDER).bg(SURFACE_BG)
        })
        .style(Style::default().bg(SURFACE_BG))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(if focused { ACCENT } else { DIM_TEXT }),
        ))
}

fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

fn lerp(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

/// Title with a left-to-right colour sweep. Before `frame` reaches `frames`
/// only the revealed prefix is drawn; afterwards the full gradient is static.
pub fn animated_title(frame: u16, frames: u16) -> Line<'static> {
    let chars: Vec<char> = TITLE.chars().collect();
    let progress = if frames == 0 {
        1.0
    } else {
        ease_out_cubic((frame.min(frames) as f32) / frames as f32)
    };
    let revealed = ((chars.len() as f32) * progress).ceil() as usize;
    let steps = chars.len().saturating_sub(1).max(1) as f32;

    let spans = chars
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            if idx >= revealed {
                return Span::raw(" ");
            }
            let t = idx as f32 / steps;
            let color = Color::Rgb(
                lerp(GRADIENT_START.0, GRADIENT_END.0, t),
                lerp(GRADIENT_START.1, GRADIENT_END.1, t),
                lerp(GRADIENT_START.2, GRADIENT_END.2, t),
            );
            Span::styled(
                c.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
