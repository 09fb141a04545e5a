#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub category: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Stronger links are drawn thicker and pulled closer together.
    pub weight: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_node(&mut self, id: &str, category: usize) {
        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
            node.category = category;
            return;
        }
        self.nodes.push(Node {
            id: id.to_string(),
            category,
        });
    }

    pub fn add_edge(&mut self, source: &str, target: &str, weight: f32) {
        self.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        });
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    /// The fixed diagram drawn by `commitviz-graph`.
    pub fn sample() -> Self {
        let mut graph = Self::new();
        for (id, category) in [
            ("cli", 0),
            ("config", 0),
            ("history", 1),
            ("git", 1),
            ("calendar", 2),
            ("force", 2),
            ("svg", 3),
            ("render", 3),
            ("raster", 4),
            ("png", 4),
        ] {
            graph.ensure_node(id, category);
        }
        for (source, target, weight) in [
            ("cli", "config", 2.0),
            ("cli", "history", 1.0),
            ("cli", "render", 1.0),
            ("cli", "raster", 1.0),
            ("history", "git", 3.0),
            ("history", "calendar", 2.0),
            ("calendar", "render", 2.0),
            ("force", "render", 2.0),
            ("config", "calendar", 1.0),
            ("config", "force", 1.0),
            ("render", "svg", 3.0),
            ("raster", "svg", 1.0),
            ("raster", "png", 3.0),
        ] {
            graph.add_edge(source, target, weight);
        }
        graph
    }
}
