use commitviz::{
    CalendarConfig, ForceSimulation, Graph, GraphConfig, Histogram, LayoutEngine, Theme,
    build_calendar, render_calendar_svg, render_graph_svg,
};

fn assert_valid_svg(svg: &str, case: &str) {
    assert!(svg.starts_with("<svg"), "{case}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{case}: missing </svg tag");
}

#[test]
fn render_calendar_for_assorted_years() {
    let histogram = Histogram::from_dates([
        "1970-01-01", "2000-02-29", "2000-02-29", "2024-12-31", "2100-12-31",
    ]);
    for theme in [Theme::github(), Theme::dark()] {
        for year in [1970, 1999, 2000, 2015, 2024, 2100] {
            let calendar = build_calendar(year, &histogram).expect("calendar failed");
            let svg = render_calendar_svg(&calendar, &theme, &CalendarConfig::default());
            assert_valid_svg(&svg, &format!("calendar {year}"));
            let in_year = calendar.days.iter().filter(|d| d.in_year).count();
            assert!(in_year == 365 || in_year == 366, "{year}: {in_year}");
            assert_eq!(svg.matches("data-date=").count(), calendar.days.len());
        }
    }
}

#[test]
fn leap_day_is_counted() {
    let histogram = Histogram::from_dates(["2000-02-29", "2000-02-29"]);
    let calendar = build_calendar(2000, &histogram).unwrap();
    assert_eq!(calendar.total(), 2);
    let svg = render_calendar_svg(&calendar, &Theme::github(), &CalendarConfig::default());
    assert!(svg.contains("2 commits on 2000-02-29"));
}

#[test]
fn render_sample_graph() {
    let graph = Graph::sample();
    let config = GraphConfig::default();
    for theme in [Theme::github(), Theme::dark()] {
        let positioned = ForceSimulation.layout(&graph, &config).expect("layout failed");
        let svg = render_graph_svg(&positioned, &theme, &config);
        assert_valid_svg(&svg, "sample graph");
        assert!(svg.contains(&theme.background));
    }
}
