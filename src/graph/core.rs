//! Core Graph type

use super::GraphId;
use crate::autograd::GradFn;
use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Arc label type
///
/// Labels are plain integers; [`EPSILON`] (label `0`) denotes "no symbol
/// consumed or emitted" and is treated specially by composition, closure,
/// and removal.
pub type Label = i32;

/// The epsilon label
pub const EPSILON: Label = 0;

/// Per-node arc-index lists; most nodes have only a few arcs
type ArcList = SmallVec<[usize; 4]>;

#[derive(Debug, Default)]
struct NodeData {
    start: bool,
    accept: bool,
    in_arcs: ArcList,
    out_arcs: ArcList,
}

#[derive(Debug)]
struct ArcData {
    src: usize,
    dst: usize,
    ilabel: Label,
    olabel: Label,
    weight: f32,
}

/// How a result graph was derived: the input handles plus the backward
/// function that routes deltas to them.
struct AutogradMeta {
    inputs: Vec<Graph>,
    grad_fn: Rc<dyn GradFn>,
}

struct GraphData {
    id: GraphId,
    nodes: Vec<NodeData>,
    arcs: Vec<ArcData>,
    start_nodes: Vec<usize>,
    accept_nodes: Vec<usize>,
    calc_grad: bool,
    grad: Option<Graph>,
    autograd: Option<AutogradMeta>,
}

/// A weighted directed multigraph shared by value-like handles
///
/// `Graph` is the fundamental data structure in fstr. Nodes carry start and
/// accept flags; arcs carry an input label, an output label, and a real
/// weight. Node and arc indices are assigned in insertion order and remain
/// stable for the lifetime of the graph.
///
/// # Handle Sharing
///
/// Cloning a `Graph` is O(1) and does not copy the graph: all clones observe
/// the same nodes, arcs, and gradient accumulator. Operations in
/// [`crate::functions`] record their input handles on the result so the
/// backward pass can walk the expression that built it.
///
/// # Gradients
///
/// A graph optionally owns a gradient graph of the same shape whose arc
/// weights accumulate partial derivatives. [`Graph::add_grad`] initializes it
/// on first use and adds element-wise afterwards; [`Graph::calc_grad`] gates
/// whether backward populates it.
pub struct Graph {
    data: Rc<RefCell<GraphData>>,
}

impl Clone for Graph {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
        }
    }
}

impl Graph {
    /// Create an empty graph that tracks gradients
    pub fn new() -> Self {
        Self::with_calc_grad(true)
    }

    /// Create an empty graph, choosing whether it tracks gradients
    pub fn with_calc_grad(calc_grad: bool) -> Self {
        Self {
            data: Rc::new(RefCell::new(GraphData {
                id: GraphId::new(),
                nodes: Vec::new(),
                arcs: Vec::new(),
                start_nodes: Vec::new(),
                accept_nodes: Vec::new(),
                calc_grad,
                grad: None,
                autograd: None,
            })),
        }
    }

    /// Create an item graph holding a single scalar
    ///
    /// The result has two nodes (start, accept) and one arc between them
    /// with epsilon labels carrying `weight`. [`Graph::item`] reads the
    /// scalar back.
    pub fn scalar(weight: f32) -> Self {
        let graph = Graph::new();
        graph.add_node(true, false);
        graph.add_node(false, true);
        graph.add_arc(0, 1, EPSILON, EPSILON, weight);
        graph
    }

    /// Get the ID of the shared graph state
    ///
    /// All handles to the same state report the same ID.
    #[inline]
    pub fn id(&self) -> GraphId {
        self.data.borrow().id
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Append a node, returning its index
    pub fn add_node(&self, start: bool, accept: bool) -> usize {
        let mut data = self.data.borrow_mut();
        let node = data.nodes.len();
        data.nodes.push(NodeData {
            start,
            accept,
            ..NodeData::default()
        });
        if start {
            data.start_nodes.push(node);
        }
        if accept {
            data.accept_nodes.push(node);
        }
        node
    }

    /// Set the accept flag on `node`
    ///
    /// Idempotent: a node already accepting is not appended to the accept
    /// list again.
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn make_accept(&self, node: usize) {
        self.check_node(node);
        let mut data = self.data.borrow_mut();
        if !data.nodes[node].accept {
            data.nodes[node].accept = true;
            data.accept_nodes.push(node);
        }
    }

    /// Append an arc from `src` to `dst`, returning its index
    ///
    /// # Panics
    ///
    /// Panics if `src` or `dst` is out of range.
    pub fn add_arc(&self, src: usize, dst: usize, ilabel: Label, olabel: Label, weight: f32) -> usize {
        self.check_node(src);
        self.check_node(dst);
        let mut data = self.data.borrow_mut();
        let arc = data.arcs.len();
        data.arcs.push(ArcData {
            src,
            dst,
            ilabel,
            olabel,
            weight,
        });
        data.nodes[src].out_arcs.push(arc);
        data.nodes[dst].in_arcs.push(arc);
        arc
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Number of nodes
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.data.borrow().nodes.len()
    }

    /// Number of arcs
    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.data.borrow().arcs.len()
    }

    /// Whether `node` is a start node
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    #[inline]
    pub fn is_start(&self, node: usize) -> bool {
        self.check_node(node);
        self.data.borrow().nodes[node].start
    }

    /// Whether `node` is an accept node
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    #[inline]
    pub fn is_accept(&self, node: usize) -> bool {
        self.check_node(node);
        self.data.borrow().nodes[node].accept
    }

    /// Start nodes, in insertion order
    pub fn start_nodes(&self) -> Vec<usize> {
        self.data.borrow().start_nodes.clone()
    }

    /// Accept nodes, in insertion order
    pub fn accept_nodes(&self) -> Vec<usize> {
        self.data.borrow().accept_nodes.clone()
    }

    /// Indices of arcs entering `node`, in arc-insertion order
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn in_arcs(&self, node: usize) -> Vec<usize> {
        self.check_node(node);
        self.data.borrow().nodes[node].in_arcs.to_vec()
    }

    /// Indices of arcs leaving `node`, in arc-insertion order
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    pub fn out_arcs(&self, node: usize) -> Vec<usize> {
        self.check_node(node);
        self.data.borrow().nodes[node].out_arcs.to_vec()
    }

    /// Number of arcs entering `node`
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    #[inline]
    pub fn num_in(&self, node: usize) -> usize {
        self.check_node(node);
        self.data.borrow().nodes[node].in_arcs.len()
    }

    /// Number of arcs leaving `node`
    ///
    /// # Panics
    ///
    /// Panics if `node` is out of range.
    #[inline]
    pub fn num_out(&self, node: usize) -> usize {
        self.check_node(node);
        self.data.borrow().nodes[node].out_arcs.len()
    }

    /// Source node of `arc`
    ///
    /// # Panics
    ///
    /// Panics if `arc` is out of range.
    #[inline]
    pub fn src_node(&self, arc: usize) -> usize {
        self.check_arc(arc);
        self.data.borrow().arcs[arc].src
    }

    /// Destination node of `arc`
    ///
    /// # Panics
    ///
    /// Panics if `arc` is out of range.
    #[inline]
    pub fn dst_node(&self, arc: usize) -> usize {
        self.check_arc(arc);
        self.data.borrow().arcs[arc].dst
    }

    /// Input label of `arc`
    ///
    /// # Panics
    ///
    /// Panics if `arc` is out of range.
    #[inline]
    pub fn ilabel(&self, arc: usize) -> Label {
        self.check_arc(arc);
        self.data.borrow().arcs[arc].ilabel
    }

    /// Output label of `arc`
    ///
    /// # Panics
    ///
    /// Panics if `arc` is out of range.
    #[inline]
    pub fn olabel(&self, arc: usize) -> Label {
        self.check_arc(arc);
        self.data.borrow().arcs[arc].olabel
    }

    /// Weight of `arc`
    ///
    /// # Panics
    ///
    /// Panics if `arc` is out of range.
    #[inline]
    pub fn weight(&self, arc: usize) -> f32 {
        self.check_arc(arc);
        self.data.borrow().arcs[arc].weight
    }

    /// Read the scalar out of an item graph
    ///
    /// An item graph has exactly two nodes (node 0 start, node 1 accept)
    /// and one arc from 0 to 1; its scalar value is that arc's weight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperation`] if the graph is not an item graph.
    pub fn item(&self) -> Result<f32> {
        let data = self.data.borrow();
        let is_item = data.nodes.len() == 2
            && data.arcs.len() == 1
            && data.nodes[0].start
            && data.nodes[1].accept
            && data.arcs[0].src == 0
            && data.arcs[0].dst == 1;
        if !is_item {
            return Err(Error::invalid_operation(
                "item",
                format!(
                    "graph with {} nodes and {} arcs does not hold a single scalar",
                    data.nodes.len(),
                    data.arcs.len()
                ),
            ));
        }
        Ok(data.arcs[0].weight)
    }

    // ------------------------------------------------------------------
    // Weights
    // ------------------------------------------------------------------

    /// All arc weights, in arc order
    pub fn weights(&self) -> Vec<f32> {
        self.data.borrow().arcs.iter().map(|a| a.weight).collect()
    }

    /// Set the weight of `arc`
    ///
    /// # Panics
    ///
    /// Panics if `arc` is out of range.
    pub fn set_weight(&self, arc: usize, weight: f32) {
        self.check_arc(arc);
        self.data.borrow_mut().arcs[arc].weight = weight;
    }

    /// Replace all arc weights
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `weights.len() != num_arcs()`.
    pub fn set_weights(&self, weights: &[f32]) -> Result<()> {
        let mut data = self.data.borrow_mut();
        if weights.len() != data.arcs.len() {
            return Err(Error::shape_mismatch(data.arcs.len(), weights.len()));
        }
        for (arc, &w) in data.arcs.iter_mut().zip(weights) {
            arc.weight = w;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Gradients
    // ------------------------------------------------------------------

    /// Whether backward populates this graph's gradient
    #[inline]
    pub fn calc_grad(&self) -> bool {
        self.data.borrow().calc_grad
    }

    /// Enable or disable gradient tracking
    ///
    /// Disabling drops the autograd record and any accumulated gradient.
    pub fn set_calc_grad(&self, calc_grad: bool) {
        let mut data = self.data.borrow_mut();
        data.calc_grad = calc_grad;
        if !calc_grad {
            data.autograd = None;
            data.grad = None;
        }
    }

    /// The accumulated gradient graph, if any
    pub fn grad(&self) -> Option<Graph> {
        self.data.borrow().grad.clone()
    }

    /// Clear the accumulated gradient
    pub fn zero_grad(&self) {
        self.data.borrow_mut().grad = None;
    }

    /// Accumulate `deltas`' arc weights into this graph's gradient
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if the arc counts differ.
    pub fn add_grad(&self, deltas: &Graph) -> Result<()> {
        self.add_grad_vec(deltas.weights())
    }

    /// Accumulate a weight vector into this graph's gradient
    ///
    /// The first call initializes the gradient graph; later calls add
    /// element-wise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `deltas.len() != num_arcs()`.
    pub fn add_grad_vec(&self, deltas: Vec<f32>) -> Result<()> {
        let num_arcs = self.num_arcs();
        if deltas.len() != num_arcs {
            return Err(Error::shape_mismatch(num_arcs, deltas.len()));
        }
        let existing = self.data.borrow().grad.clone();
        match existing {
            Some(grad) => {
                let mut data = grad.data.borrow_mut();
                for (arc, d) in data.arcs.iter_mut().zip(&deltas) {
                    arc.weight += *d;
                }
            }
            None => {
                let grad = self.grad_like(&deltas);
                self.data.borrow_mut().grad = Some(grad);
            }
        }
        Ok(())
    }

    /// Build a same-shape gradient graph carrying `weights`
    fn grad_like(&self, weights: &[f32]) -> Graph {
        let grad = Graph::with_calc_grad(false);
        let data = self.data.borrow();
        for node in &data.nodes {
            grad.add_node(node.start, node.accept);
        }
        for (arc, &w) in data.arcs.iter().zip(weights) {
            grad.add_arc(arc.src, arc.dst, arc.ilabel, arc.olabel, w);
        }
        grad
    }

    // ------------------------------------------------------------------
    // Autograd linkage
    // ------------------------------------------------------------------

    /// Record how this graph was derived
    ///
    /// The result tracks gradients iff any input does; otherwise nothing is
    /// stored and the graph is a leaf.
    pub(crate) fn register_op(&self, inputs: Vec<Graph>, grad_fn: Rc<dyn GradFn>) {
        let calc_grad = inputs.iter().any(Graph::calc_grad);
        let mut data = self.data.borrow_mut();
        data.calc_grad = calc_grad;
        if calc_grad {
            data.autograd = Some(AutogradMeta { inputs, grad_fn });
        }
    }

    /// The recorded input handles, if this graph was derived by an operation
    pub(crate) fn autograd_inputs(&self) -> Option<Vec<Graph>> {
        self.data
            .borrow()
            .autograd
            .as_ref()
            .map(|meta| meta.inputs.clone())
    }

    /// The recorded inputs and backward function together
    pub(crate) fn autograd_record(&self) -> Option<(Vec<Graph>, Rc<dyn GradFn>)> {
        self.data
            .borrow()
            .autograd
            .as_ref()
            .map(|meta| (meta.inputs.clone(), Rc::clone(&meta.grad_fn)))
    }

    // ------------------------------------------------------------------
    // Comparison
    // ------------------------------------------------------------------

    /// Structural equality: same nodes, flags, arcs, labels, and weights
    ///
    /// Exact weight comparison; intended for operations that copy weights
    /// verbatim, not for numerically computed results.
    pub fn struct_eq(&self, other: &Graph) -> bool {
        if Rc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        let a = self.data.borrow();
        let b = other.data.borrow();
        a.nodes.len() == b.nodes.len()
            && a.arcs.len() == b.arcs.len()
            && a.nodes
                .iter()
                .zip(&b.nodes)
                .all(|(x, y)| x.start == y.start && x.accept == y.accept)
            && a.arcs.iter().zip(&b.arcs).all(|(x, y)| {
                x.src == y.src
                    && x.dst == y.dst
                    && x.ilabel == y.ilabel
                    && x.olabel == y.olabel
                    && x.weight == y.weight
            })
    }

    #[inline]
    fn check_node(&self, node: usize) {
        let len = self.data.borrow().nodes.len();
        assert!(node < len, "node index {} out of range for {} nodes", node, len);
    }

    #[inline]
    fn check_arc(&self, arc: usize) {
        let len = self.data.borrow().arcs.len();
        assert!(arc < len, "arc index {} out of range for {} arcs", arc, len);
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.borrow();
        f.debug_struct("Graph")
            .field("id", &data.id)
            .field("num_nodes", &data.nodes.len())
            .field("num_arcs", &data.arcs.len())
            .field("calc_grad", &data.calc_grad)
            .field("has_grad_fn", &data.autograd.is_some())
            .finish()
    }
}
