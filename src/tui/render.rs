use std::f64::consts::FRAC_PI_4;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as Segment};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

use crate::editor::form::{Form, TextInput, Widget};
use crate::surface::scene::{Scene, ShapeKind};
use crate::surface::{ArrowKind, Point, ShapeId, TextStyle};
use crate::tui::input::Focus;

/// Eight-way arrow heads, clockwise from east (canvas `y` grows downward).
const HEADS: [char; 8] = ['→', '↘', '↓', '↙', '←', '↖', '↑', '↗'];

#[derive(Debug, Clone, Copy)]
pub enum DialogView<'a> {
    Confirm(&'a str),
    Alert(&'a str),
}

#[derive(Debug)]
pub struct RenderData<'a> {
    pub form: &'a Form,
    pub panel_title: &'a str,
    pub scene: &'a Scene,
    pub selected: Option<ShapeId>,
    pub focus: Focus,
    pub panel_width: u16,
    pub hints: &'a str,
    pub message: Option<&'a str>,
    pub thought_count: usize,
    pub arrow_count: usize,
    pub show_help: bool,
    pub dialog: Option<DialogView<'a>>,
}

/// Where the interactive parts ended up, for mapping mouse positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameAreas {
    pub panel: Rect,
    pub canvas: Rect,
}

pub fn draw(frame: &mut Frame, data: &RenderData<'_>) -> FrameAreas {
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let title = Line::from(vec![
        Span::styled("philosophy", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[Ctrl-c] quit", Style::default().fg(Color::DarkGray)),
    ]);
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(6), Constraint::Length(2)]).areas(inner);
    let [panel_area, canvas_area] = Layout::horizontal([
        Constraint::Length(data.panel_width),
        Constraint::Min(10),
    ])
    .areas(main_area);

    let areas = FrameAreas {
        panel: draw_panel(frame, panel_area, data),
        canvas: draw_canvas(frame, canvas_area, data),
    };
    draw_status(frame, status_area, data);

    if data.show_help {
        render_help_overlay(frame);
    }
    match data.dialog {
        Some(DialogView::Confirm(question)) => draw_confirm(frame, question),
        Some(DialogView::Alert(message)) => draw_alert(frame, message),
        None => {}
    }
    areas
}

/// Which widget each panel row shows; `None` rows are spacing.
pub fn panel_rows(form: &Form) -> Vec<Option<usize>> {
    let mut rows = Vec::new();
    for (idx, widget) in form.widgets().iter().enumerate() {
        rows.push(Some(idx));
        if matches!(widget, Widget::Heading(_)) {
            rows.push(None);
        }
    }
    rows
}

/// The widget under `row` of the panel's inner area.
pub fn widget_at_row(form: &Form, row: usize) -> Option<usize> {
    panel_rows(form).get(row).copied().flatten()
}

/// Map a terminal cell inside the canvas area to canvas coordinates.
pub fn canvas_point(area: Rect, column: u16, row: u16, width: f64, height: f64) -> Option<Point> {
    if area.width == 0
        || area.height == 0
        || column < area.x
        || row < area.y
        || column >= area.x + area.width
        || row >= area.y + area.height
    {
        return None;
    }
    let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width) * width;
    let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height) * height;
    Some(Point::new(x, y))
}

fn draw_panel(frame: &mut Frame, area: Rect, data: &RenderData<'_>) -> Rect {
    let focused = data.focus == Focus::Panel;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(" {} ", data.panel_title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .padding(Padding::new(1, 1, 0, 0));
    let inner = block.inner(area);

    let widgets = data.form.widgets();
    let focus_idx = data.form.focus_index();
    let lines = panel_rows(data.form)
        .into_iter()
        .map(|row| match row.and_then(|idx| widgets.get(idx).map(|w| (idx, w))) {
            Some((idx, widget)) => widget_line(widget, focused && focus_idx == Some(idx)),
            None => Line::from(""),
        })
        .collect::<Vec<_>>();

    frame.render_widget(Paragraph::new(lines).block(block), area);
    inner
}

fn widget_line(widget: &Widget, focused: bool) -> Line<'static> {
    match widget {
        Widget::Heading(text) => Line::from(Span::styled(
            text.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Widget::Input(input) => input_line(input, focused),
        Widget::Button { label, .. } => {
            let style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Line::from(Span::styled(format!("[ {label} ]"), style))
        }
    }
}

fn input_line(input: &TextInput, focused: bool) -> Line<'static> {
    let mut spans = Vec::new();
    let indicator = if focused { ">" } else { " " };
    spans.push(Span::styled(
        format!("{indicator} "),
        Style::default().fg(Color::Yellow),
    ));
    if let Some(label) = &input.label {
        spans.push(Span::styled(
            format!("{label} "),
            Style::default().fg(Color::Gray),
        ));
    }
    if focused {
        spans.extend(
            line_with_cursor(
                input.value(),
                input.cursor(),
                "type here",
                Style::default().fg(Color::White),
                Style::default().fg(Color::DarkGray),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            )
            .spans,
        );
    } else if input.value().is_empty() {
        spans.push(Span::styled("…", Style::default().fg(Color::DarkGray)));
    } else {
        spans.push(Span::styled(
            input.value().to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::UNDERLINED),
        ));
    }
    Line::from(spans)
}

fn draw_canvas(frame: &mut Frame, area: Rect, data: &RenderData<'_>) -> Rect {
    let focused = data.focus == Focus::Canvas;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(" canvas ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);

    let scene = data.scene;
    let (width, height) = (scene.width(), scene.height());
    let units_per_col = width / f64::from(inner.width.max(1));
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for shape in scene.shapes() {
                let root = shape.parent.unwrap_or(shape.id);
                let selected = data.selected == Some(root);
                paint_shape(ctx, &shape.kind, selected, height, units_per_col);
            }
        });
    frame.render_widget(canvas, area);
    inner
}

fn paint_shape(ctx: &mut Context<'_>, kind: &ShapeKind, selected: bool, height: f64, unit: f64) {
    let highlight = Color::Yellow;
    match kind {
        ShapeKind::Circle { center, radius } => {
            ctx.draw(&Circle {
                x: center.x,
                y: height - center.y,
                radius: *radius,
                color: if selected { highlight } else { Color::White },
            });
        }
        ShapeKind::Text { at, text, style } => {
            let mut text_style = match style {
                TextStyle::Label => Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            };
            if selected {
                text_style = text_style.fg(highlight);
            }
            let half_width = text.chars().count() as f64 * unit / 2.0;
            ctx.print(
                at.x - half_width,
                height - at.y,
                Span::styled(text.clone(), text_style),
            );
        }
        ShapeKind::Arrow { from, to, kind } => {
            paint_arrow(ctx, *from, *to, *kind, selected, height, unit);
        }
    }
}

fn paint_arrow(
    ctx: &mut Context<'_>,
    from: Point,
    to: Point,
    kind: ArrowKind,
    selected: bool,
    height: f64,
    unit: f64,
) {
    let style = kind.style();
    let color = if selected { Color::Yellow } else { style.color };
    ctx.draw(&Segment::new(from.x, height - from.y, to.x, height - to.y, color));

    let glyph_style = Style::default().fg(color).add_modifier(Modifier::BOLD);
    let octant = head_octant(from, to);
    let mut glyph = |at: Point, ch: char| {
        ctx.print(
            at.x - unit / 2.0,
            height - at.y,
            Span::styled(ch.to_string(), glyph_style),
        );
    };
    glyph(to, HEADS[octant]);
    if style.double_headed {
        glyph(from, HEADS[(octant + 4) % 8]);
    }
    if style.negated {
        glyph(
            Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0),
            '/',
        );
    }
}

/// Index into [`HEADS`] for an arrow pointing from `from` to `to`.
fn head_octant(from: Point, to: Point) -> usize {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    ((angle / FRAC_PI_4).round() as i64).rem_euclid(8) as usize
}

fn draw_status(frame: &mut Frame, area: Rect, data: &RenderData<'_>) {
    let focus_label = match data.focus {
        Focus::Panel => "PANEL",
        Focus::Canvas => "CANVAS",
    };
    let summary = format!(
        "{} thought{}, {} arrow{}",
        data.thought_count,
        if data.thought_count == 1 { "" } else { "s" },
        data.arrow_count,
        if data.arrow_count == 1 { "" } else { "s" },
    );
    let second = match data.message {
        Some(message) => Span::styled(message.to_string(), Style::default().fg(Color::Yellow)),
        None => Span::styled(summary, Style::default().fg(Color::DarkGray)),
    };
    let status = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("[{focus_label}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(data.hints.to_string(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(second),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn draw_confirm(frame: &mut Frame, question: &str) {
    let area = centered_rect(frame.area(), 56, 22);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(
                question.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(
                "[y/Enter]",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" yes   ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                "[n/Esc]",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" no", Style::default().fg(Color::DarkGray)),
        ]),
    ])
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .title(" confirm ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_alert(frame: &mut Frame, message: &str) {
    let area = centered_rect(frame.area(), 56, 22);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Error: {message}"),
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[any key] close",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .title(" alert ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::LightRed))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 70, 60);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("PANEL (left): create and edit thoughts"),
        Line::from("  Tab/Shift-Tab or ↑↓ move between fields and buttons"),
        Line::from("  type to edit the focused field; details save as you type"),
        Line::from("  Enter presses the focused button (Enter in the name field thinks it)"),
        Line::from(""),
        Line::from("CANVAS (right): thoughts and arrows"),
        Line::from("  click a thought to edit it, drag to move it"),
        Line::from("  Tab selects the next element, Enter opens a selected thought"),
        Line::from("  arrows/hjkl drag the selected element"),
        Line::from(""),
        Line::from("Esc switches between panel and canvas. q quits from the canvas."),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, area);
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

fn line_with_cursor(
    text: &str,
    cursor: usize,
    placeholder: &str,
    text_style: Style,
    placeholder_style: Style,
    caret_style: Style,
) -> Line<'static> {
    let mut spans = Vec::new();
    let char_len = text.chars().count();
    let clamped = cursor.min(char_len);

    if char_len == 0 {
        spans.push(Span::styled("▌", caret_style));
        if !placeholder.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(placeholder.to_string(), placeholder_style));
        }
        return Line::from(spans);
    }

    let split = text
        .char_indices()
        .nth(clamped)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());
    let (left, right) = text.split_at(split);
    if !left.is_empty() {
        spans.push(Span::styled(left.to_string(), text_style));
    }
    spans.push(Span::styled("▌", caret_style));
    if !right.is_empty() {
        spans.push(Span::styled(right.to_string(), text_style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn panel_rows_leave_a_gap_under_the_heading() {
        let form = Form::create();
        assert_eq!(
            panel_rows(&form),
            vec![Some(0), None, Some(1), Some(2), Some(3), Some(4), Some(5)]
        );
        assert_eq!(widget_at_row(&form, 1), None);
        assert_eq!(widget_at_row(&form, 3), Some(2));
        assert_eq!(widget_at_row(&form, 40), None);
    }

    #[test]
    fn canvas_point_maps_cells_to_canvas_units() {
        let area = Rect::new(10, 5, 80, 30);
        assert_eq!(canvas_point(area, 9, 5, 800.0, 600.0), None);
        assert_eq!(canvas_point(area, 90, 5, 800.0, 600.0), None);
        assert_eq!(
            canvas_point(area, 10, 5, 800.0, 600.0),
            Some(Point::new(5.0, 10.0))
        );
        assert_eq!(
            canvas_point(area, 49, 19, 800.0, 600.0),
            Some(Point::new(395.0, 290.0))
        );
    }

    #[test]
    fn head_octants_follow_screen_directions() {
        let origin = Point::new(100.0, 100.0);
        assert_eq!(HEADS[head_octant(origin, Point::new(200.0, 100.0))], '→');
        assert_eq!(HEADS[head_octant(origin, Point::new(200.0, 200.0))], '↘');
        assert_eq!(HEADS[head_octant(origin, Point::new(100.0, 0.0))], '↑');
        assert_eq!(HEADS[head_octant(origin, Point::new(0.0, 100.0))], '←');
    }

    #[test]
    fn draw_shows_panel_canvas_and_dialog() {
        let mut scene = Scene::new(800.0, 600.0);
        let circle = scene.circle(Point::new(300.0, 300.0), 70.0).unwrap();
        let label = scene
            .text(Point::new(300.0, 300.0), "Cogito", TextStyle::Label)
            .unwrap();
        scene.attach(circle, label).unwrap();
        let form = Form::create();
        let data = RenderData {
            form: &form,
            panel_title: "Create",
            scene: &scene,
            selected: Some(circle),
            focus: Focus::Panel,
            panel_width: 34,
            hints: "[Tab] next",
            message: None,
            thought_count: 1,
            arrow_count: 0,
            show_help: false,
            dialog: None,
        };

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut areas = FrameAreas::default();
        terminal
            .draw(|frame| {
                areas = draw(frame, &data);
            })
            .unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains("Add a new thought"));
        assert!(text.contains("[ Think it ]"));
        assert!(text.contains("Cogito"), "label is printed on the canvas");
        assert!(areas.canvas.width > 0 && areas.panel.width > 0);
        assert!(areas.panel.x < areas.canvas.x, "panel sits left of the canvas");

        // The alert sits over the middle of the frame, on top of the label.
        let alerted = RenderData {
            dialog: Some(DialogView::Alert("Give your thought a name.")),
            ..data
        };
        terminal
            .draw(|frame| {
                draw(frame, &alerted);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Error: Give your thought a name."));
        assert!(text.contains("Add a new thought"), "the panel stays visible");
    }
}
