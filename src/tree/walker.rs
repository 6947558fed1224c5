//! Iterative depth-first traversal over a forest
//!
//! The walker keeps an explicit stack so deep trees cannot overflow the call
//! stack. Nodes are visited in pre-order, siblings in the order the forest
//! reports them.

/// Minimal capability a forest must offer to be walked
pub trait Forest {
    type Node: Clone;

    fn roots(&self) -> Vec<Self::Node>;
    fn children_of(&self, node: &Self::Node) -> Vec<Self::Node>;
}

/// Visitor invoked once per node with its depth (roots are depth 0)
pub trait TreeVisitor<N> {
    fn visit(&mut self, node: &N, depth: usize);
}

/// Walk every node of `forest` depth-first, pre-order
pub fn walk<F, V>(forest: &F, visitor: &mut V)
where
    F: Forest,
    V: TreeVisitor<F::Node>,
{
    let mut stack: Vec<(F::Node, usize)> = forest
        .roots()
        .into_iter()
        .rev()
        .map(|root| (root, 0))
        .collect();

    while let Some((node, depth)) = stack.pop() {
        visitor.visit(&node, depth);
        for child in forest.children_of(&node).into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

/// Counts visited nodes
#[derive(Debug, Default)]
pub struct NodeCounter {
    pub count: usize,
}

impl<N> TreeVisitor<N> for NodeCounter {
    fn visit(&mut self, _node: &N, _depth: usize) {
        self.count += 1;
    }
}

/// Collects visited nodes in visit order
#[derive(Debug)]
pub struct NodeCollector<N> {
    pub nodes: Vec<N>,
}

impl<N> Default for NodeCollector<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N: Clone> TreeVisitor<N> for NodeCollector<N> {
    fn visit(&mut self, node: &N, _depth: usize) {
        self.nodes.push(node.clone());
    }
}

/// Derives a caption per node, indented by depth
pub struct CaptionCollector<F> {
    caption: F,
    pub captions: Vec<String>,
}

impl<F> CaptionCollector<F> {
    pub fn new(caption: F) -> Self {
        Self {
            caption,
            captions: Vec::new(),
        }
    }
}

impl<N, F> TreeVisitor<N> for CaptionCollector<F>
where
    F: FnMut(&N) -> String,
{
    fn visit(&mut self, node: &N, depth: usize) {
        let caption = (self.caption)(node);
        self.captions.push(format!("{}{}", "  ".repeat(depth), caption));
    }
}
