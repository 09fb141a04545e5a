//! Force-directed placement for small graphs.
//!
//! The simulation follows the usual d3-force recipe: a link spring per edge,
//! pairwise charge repulsion, a centering shift and a collision pass, all
//! scaled by a cooling `alpha` and integrated with velocity decay. Initial
//! positions come from a phyllotaxis spiral, so identical input always
//! settles to identical coordinates.

use crate::config::GraphConfig;
use crate::ir::Graph;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LayoutError {
    #[error("edge {from} -> {to} references unknown node '{missing}'")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },
    #[error("edge {from} -> {to} has non-positive weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub category: usize,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGraph {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
}

pub trait LayoutEngine {
    fn layout(&self, graph: &Graph, config: &GraphConfig) -> Result<PositionedGraph, LayoutError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ForceSimulation;

#[derive(Debug, Clone, Copy)]
struct Body {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
}

struct Link {
    source: usize,
    target: usize,
    distance: f32,
    strength: f32,
    bias: f32,
}

const INITIAL_RADIUS: f32 = 10.0;

fn initial_bodies(count: usize, center: (f32, f32)) -> Vec<Body> {
    let angle_step = std::f32::consts::PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|i| {
            let radius = INITIAL_RADIUS * (0.5 + i as f32).sqrt();
            let angle = i as f32 * angle_step;
            Body {
                x: center.0 + radius * angle.cos(),
                y: center.1 + radius * angle.sin(),
                vx: 0.0,
                vy: 0.0,
            }
        })
        .collect()
}

/// Tiny deterministic offset used when two bodies coincide.
fn jiggle(i: usize, j: usize) -> (f32, f32) {
    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
    (angle.cos() * 1e-3, angle.sin() * 1e-3)
}

fn resolve_links(graph: &Graph, config: &GraphConfig) -> Result<Vec<Link>, LayoutError> {
    let mut degree = vec![0usize; graph.nodes.len()];
    let mut resolved = Vec::with_capacity(graph.edges.len());
    for edge in &graph.edges {
        let lookup = |id: &str| {
            graph.index_of(id).ok_or_else(|| LayoutError::UnknownNode {
                from: edge.source.clone(),
                to: edge.target.clone(),
                missing: id.to_string(),
            })
        };
        let source = lookup(&edge.source)?;
        let target = lookup(&edge.target)?;
        if edge.weight.is_nan() || edge.weight <= 0.0 {
            return Err(LayoutError::InvalidWeight {
                from: edge.source.clone(),
                to: edge.target.clone(),
                weight: edge.weight,
            });
        }
        degree[source] += 1;
        degree[target] += 1;
        resolved.push((source, target, edge.weight));
    }

    Ok(resolved
        .into_iter()
        .map(|(source, target, weight)| {
            let (ds, dt) = (degree[source] as f32, degree[target] as f32);
            Link {
                source,
                target,
                distance: config.link_distance_for(weight),
                strength: 1.0 / ds.min(dt),
                bias: ds / (ds + dt),
            }
        })
        .collect())
}

fn apply_links(bodies: &mut [Body], links: &[Link], alpha: f32) {
    for (k, link) in links.iter().enumerate() {
        if link.source == link.target {
            continue;
        }
        let (s, t) = (bodies[link.source], bodies[link.target]);
        let mut dx = t.x + t.vx - s.x - s.vx;
        let mut dy = t.y + t.vy - s.y - s.vy;
        if dx == 0.0 && dy == 0.0 {
            (dx, dy) = jiggle(k, link.target);
        }
        let len = (dx * dx + dy * dy).sqrt();
        let pull = (len - link.distance) / len * alpha * link.strength;
        dx *= pull;
        dy *= pull;
        bodies[link.target].vx -= dx * link.bias;
        bodies[link.target].vy -= dy * link.bias;
        bodies[link.source].vx += dx * (1.0 - link.bias);
        bodies[link.source].vy += dy * (1.0 - link.bias);
    }
}

fn apply_charge(bodies: &mut [Body], strength: f32, alpha: f32) {
    let n = bodies.len();
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let mut dx = bodies[j].x - bodies[i].x;
            let mut dy = bodies[j].y - bodies[i].y;
            if dx == 0.0 && dy == 0.0 {
                (dx, dy) = jiggle(i, j);
            }
            // Clamp very short distances so near-coincident bodies do not explode.
            let dist2 = (dx * dx + dy * dy).max(1.0);
            let w = strength * alpha / dist2;
            bodies[i].vx += dx * w;
            bodies[i].vy += dy * w;
        }
    }
}

fn apply_center(bodies: &mut [Body], center: (f32, f32)) {
    if bodies.is_empty() {
        return;
    }
    let n = bodies.len() as f32;
    let (sx, sy) = bodies
        .iter()
        .fold((0.0, 0.0), |(sx, sy), body| (sx + body.x, sy + body.y));
    let (shift_x, shift_y) = (sx / n - center.0, sy / n - center.1);
    for body in bodies.iter_mut() {
        body.x -= shift_x;
        body.y -= shift_y;
    }
}

fn apply_collide(bodies: &mut [Body], radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let min_dist = radius * 2.0;
    let n = bodies.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let mut dx = (bodies[i].x + bodies[i].vx) - (bodies[j].x + bodies[j].vx);
            let mut dy = (bodies[i].y + bodies[i].vy) - (bodies[j].y + bodies[j].vy);
            if dx == 0.0 && dy == 0.0 {
                (dx, dy) = jiggle(i, j);
            }
            let len = (dx * dx + dy * dy).sqrt();
            if len >= min_dist {
                continue;
            }
            // Equal radii, so the overlap is split evenly.
            let push = (min_dist - len) / len * 0.5;
            bodies[i].vx += dx * push;
            bodies[i].vy += dy * push;
            bodies[j].vx -= dx * push;
            bodies[j].vy -= dy * push;
        }
    }
}

impl LayoutEngine for ForceSimulation {
    fn layout(&self, graph: &Graph, config: &GraphConfig) -> Result<PositionedGraph, LayoutError> {
        let links = resolve_links(graph, config)?;
        let center = config.center();
        let mut bodies = initial_bodies(graph.nodes.len(), center);

        let ticks = config.ticks.max(1);
        let alpha_decay = 1.0 - config.alpha_min.powf(1.0 / ticks as f32);
        let keep = 1.0 - config.velocity_decay;
        let mut alpha = 1.0_f32;

        for _ in 0..ticks {
            alpha += (0.0 - alpha) * alpha_decay;
            apply_links(&mut bodies, &links, alpha);
            apply_charge(&mut bodies, config.charge_strength, alpha);
            apply_center(&mut bodies, center);
            apply_collide(&mut bodies, config.collide_radius);
            for body in bodies.iter_mut() {
                body.vx *= keep;
                body.vy *= keep;
                body.x += body.vx;
                body.y += body.vy;
            }
        }
        tracing::debug!(
            nodes = bodies.len(),
            links = links.len(),
            ticks,
            alpha,
            "force simulation settled"
        );

        let margin = config.node_radius + 2.0;
        let clamp = |value: f32, max: f32| {
            if max <= margin * 2.0 {
                max / 2.0
            } else {
                value.clamp(margin, max - margin)
            }
        };

        let nodes = graph
            .nodes
            .iter()
            .zip(bodies.iter())
            .map(|(node, body)| PositionedNode {
                id: node.id.clone(),
                category: node.category,
                x: clamp(body.x, config.width),
                y: clamp(body.y, config.height),
            })
            .collect();
        let edges = links
            .iter()
            .zip(graph.edges.iter())
            .map(|(link, edge)| PositionedEdge {
                source: link.source,
                target: link.target,
                weight: edge.weight,
            })
            .collect();

        Ok(PositionedGraph { nodes, edges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: &PositionedNode, b: &PositionedNode) -> f32 {
        ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn layout_is_deterministic() {
        let graph = Graph::sample();
        let config = GraphConfig::default();
        let first = ForceSimulation.layout(&graph, &config).unwrap();
        let second = ForceSimulation.layout(&graph, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn nodes_stay_on_canvas_and_apart() {
        let graph = Graph::sample();
        let config = GraphConfig::default();
        let positioned = ForceSimulation.layout(&graph, &config).unwrap();
        assert_eq!(positioned.nodes.len(), graph.nodes.len());
        assert_eq!(positioned.edges.len(), graph.edges.len());
        for node in &positioned.nodes {
            assert!(node.x.is_finite() && node.y.is_finite());
            assert!(node.x >= 0.0 && node.x <= config.width, "{} x={}", node.id, node.x);
            assert!(node.y >= 0.0 && node.y <= config.height, "{} y={}", node.id, node.y);
        }
        for i in 0..positioned.nodes.len() {
            for j in (i + 1)..positioned.nodes.len() {
                let d = distance(&positioned.nodes[i], &positioned.nodes[j]);
                assert!(
                    d > config.node_radius,
                    "{} and {} overlap",
                    positioned.nodes[i].id,
                    positioned.nodes[j].id
                );
            }
        }
    }

    #[test]
    fn heavier_links_settle_closer() {
        let mut graph = Graph::new();
        for id in ["a", "b", "c", "d"] {
            graph.ensure_node(id, 0);
        }
        graph.add_edge("a", "b", 4.0);
        graph.add_edge("c", "d", 1.0);
        let positioned = ForceSimulation.layout(&graph, &GraphConfig::default()).unwrap();
        let strong = distance(&positioned.nodes[0], &positioned.nodes[1]);
        let weak = distance(&positioned.nodes[2], &positioned.nodes[3]);
        assert!(strong < weak, "strong={strong} weak={weak}");
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut graph = Graph::new();
        graph.ensure_node("a", 0);
        graph.add_edge("a", "ghost", 1.0);
        let err = ForceSimulation.layout(&graph, &GraphConfig::default()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownNode {
                from: "a".to_string(),
                to: "ghost".to_string(),
                missing: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn zero_weight_is_rejected() {
        let mut graph = Graph::new();
        graph.ensure_node("a", 0);
        graph.ensure_node("b", 0);
        graph.add_edge("a", "b", 0.0);
        let err = ForceSimulation.layout(&graph, &GraphConfig::default()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidWeight { .. }));
    }

    #[test]
    fn single_node_sits_at_center() {
        let mut graph = Graph::new();
        graph.ensure_node("solo", 0);
        let config = GraphConfig::default();
        let positioned = ForceSimulation.layout(&graph, &config).unwrap();
        let node = &positioned.nodes[0];
        assert!((node.x - 450.0).abs() < 1e-3);
        assert!((node.y - 250.0).abs() < 1e-3);
    }
}
