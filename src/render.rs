use crate::calendar::{Calendar, DayCell, color_for};
use crate::config::{CalendarConfig, GraphConfig};
use crate::force::PositionedGraph;
use crate::svg::SvgNode;
use crate::theme::Theme;

const WEEKDAY_LABELS: [(u32, &str); 3] = [(1, "Mon"), (3, "Wed"), (5, "Fri")];

pub fn calendar_size(calendar: &Calendar, config: &CalendarConfig) -> (f32, f32) {
    let step = config.cell_step();
    let width = config.left_margin + calendar.week_count() as f32 * step + config.right_margin;
    let height = config.top_margin + 7.0 * step + config.bottom_margin;
    (width, height)
}

pub fn graph_scene(graph: &PositionedGraph, theme: &Theme, config: &GraphConfig) -> SvgNode {
    let mut links = SvgNode::new("g")
        .attr("stroke", &theme.line_color)
        .attr("stroke-opacity", 0.6);
    for edge in &graph.edges {
        let (Some(source), Some(target)) = (graph.nodes.get(edge.source), graph.nodes.get(edge.target))
        else {
            continue;
        };
        links.push(
            SvgNode::new("line")
                .attr("x1", source.x)
                .attr("y1", source.y)
                .attr("x2", target.x)
                .attr("y2", target.y)
                .attr("stroke-width", config.stroke_width_for(edge.weight)),
        );
    }

    let mut nodes = SvgNode::new("g")
        .attr("stroke", &theme.node_stroke)
        .attr("stroke-width", 1.5);
    let mut labels = SvgNode::new("g")
        .attr("font-family", &theme.font_family)
        .attr("font-size", theme.font_size + 2.0)
        .attr("fill", &theme.text_color);
    for node in &graph.nodes {
        nodes.push(
            SvgNode::new("circle")
                .attr("cx", node.x)
                .attr("cy", node.y)
                .attr("r", config.node_radius)
                .attr("fill", theme.category_color(node.category))
                .child(SvgNode::new("title").text(node.id.as_str())),
        );
        labels.push(
            SvgNode::new("text")
                .attr("x", node.x + config.label_offset)
                .attr("y", node.y + 4.0)
                .text(node.id.as_str()),
        );
    }

    SvgNode::document(config.width, config.height)
        .child(
            SvgNode::new("rect")
                .attr("width", "100%")
                .attr("height", "100%")
                .attr("fill", &theme.background),
        )
        .child(links)
        .child(nodes)
        .child(labels)
}

pub fn render_graph_svg(graph: &PositionedGraph, theme: &Theme, config: &GraphConfig) -> String {
    graph_scene(graph, theme, config).to_svg_string()
}

fn day_rect(day: &DayCell, column: usize, theme: &Theme, config: &CalendarConfig) -> SvgNode {
    let step = config.cell_step();
    let rect = SvgNode::new("rect")
        .attr("x", config.left_margin + column as f32 * step)
        .attr("y", config.top_margin + day.row() as f32 * step)
        .attr("width", config.cell_size)
        .attr("height", config.cell_size)
        .attr("rx", config.cell_radius)
        .attr("data-date", day.date.format("%Y-%m-%d"));

    if !day.in_year {
        return rect.attr("fill", &theme.background).attr("stroke", "none");
    }

    let noun = if day.count == 1 { "commit" } else { "commits" };
    rect.attr("fill", color_for(day.count, config))
        .attr("stroke", &theme.cell_stroke)
        .attr("data-count", day.count)
        .child(SvgNode::new("title").text(format!(
            "{} {noun} on {}",
            day.count,
            day.date.format("%Y-%m-%d")
        )))
}

fn legend(calendar: &Calendar, theme: &Theme, config: &CalendarConfig, width: f32) -> SvgNode {
    let step = config.cell_step();
    let y = config.top_margin + 7.0 * step + 8.0;
    let text_y = y + config.cell_size - 1.0;
    let text = |x: f32, anchor: &str, content: String| {
        SvgNode::new("text")
            .attr("x", x)
            .attr("y", text_y)
            .attr("text-anchor", anchor)
            .text(content)
    };

    let swatches_right = width - config.right_margin - 30.0;
    let swatches_left = swatches_right - config.palette.len() as f32 * step;
    let mut group = SvgNode::new("g")
        .attr("font-family", &theme.font_family)
        .attr("font-size", theme.font_size)
        .attr("fill", &theme.muted_text_color)
        .child(text(
            config.left_margin,
            "start",
            format!("{} contributions in {}", calendar.total(), calendar.year),
        ))
        .child(text(swatches_left - 4.0, "end", "Less".to_string()));
    for (idx, color) in config.palette.iter().enumerate() {
        group.push(
            SvgNode::new("rect")
                .attr("x", swatches_left + idx as f32 * step)
                .attr("y", y)
                .attr("width", config.cell_size)
                .attr("height", config.cell_size)
                .attr("rx", config.cell_radius)
                .attr("fill", color.as_str())
                .attr("stroke", &theme.cell_stroke),
        );
    }
    group.child(text(swatches_right + 4.0, "start", "More".to_string()))
}

pub fn calendar_scene(calendar: &Calendar, theme: &Theme, config: &CalendarConfig) -> SvgNode {
    let (width, height) = calendar_size(calendar, config);
    let step = config.cell_step();

    let months = SvgNode::new("g")
        .attr("font-family", &theme.font_family)
        .attr("font-size", theme.font_size)
        .attr("fill", &theme.text_color)
        .children(calendar.months.iter().map(|anchor| {
            SvgNode::new("text")
                .attr("x", config.left_margin + anchor.column as f32 * step)
                .attr("y", config.top_margin - 8.0)
                .text(anchor.label())
        }));

    let weekdays = SvgNode::new("g")
        .attr("font-family", &theme.font_family)
        .attr("font-size", theme.font_size)
        .attr("fill", &theme.text_color)
        .attr("text-anchor", "end")
        .children(WEEKDAY_LABELS.iter().map(|(row, label)| {
            SvgNode::new("text")
                .attr("x", config.left_margin - 6.0)
                .attr("y", config.top_margin + *row as f32 * step + config.cell_size - 2.0)
                .text(*label)
        }));

    let cells = SvgNode::new("g").children(
        calendar
            .days
            .iter()
            .map(|day| day_rect(day, calendar.column_of(day.date), theme, config)),
    );

    let mut doc = SvgNode::document(width, height)
        .child(
            SvgNode::new("rect")
                .attr("width", "100%")
                .attr("height", "100%")
                .attr("fill", &theme.background),
        )
        .child(months)
        .child(weekdays)
        .child(cells);
    if config.show_legend {
        doc.push(legend(calendar, theme, config, width));
    }
    doc
}

pub fn render_calendar_svg(calendar: &Calendar, theme: &Theme, config: &CalendarConfig) -> String {
    calendar_scene(calendar, theme, config).to_svg_string()
}
