//! Expression graph arena and the forcing engine.
//!
//! Every runtime value is a [`Node`] stored in a [`Graph`] and referenced by
//! a [`NodeId`]. Sharing is explicit: two parents holding the same `NodeId`
//! see the same node, and an application node forced through either parent
//! is reduced once.

use crate::error::{EvalError, EvalResult};
use crate::render::Picture;
use crate::transport::{Transport, TransportError};
use galaxy_types::{Builtin, Data};
use std::fmt;

/// Stable handle to a node in a [`Graph`].
///
/// A handle is only meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A primitive applied to zero or more (but fewer than its arity) arguments.
///
/// Closures are never mutated; supplying one more argument allocates a new
/// closure or fires the reduction rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure {
    pub builtin: Builtin,
    pub bound: Vec<NodeId>,
}

impl Closure {
    /// Arguments still needed before the rule fires.
    pub fn remaining(&self) -> usize {
        self.builtin.arity() - self.bound.len()
    }
}

/// A single value in the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Nil,
    Int(i64),
    Pair(NodeId, NodeId),
    Function(Closure),
    /// An unevaluated call. `forced` caches the normal form once computed.
    Apply {
        function: NodeId,
        argument: NodeId,
        forced: Option<NodeId>,
    },
    Picture(Picture),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Nil => "nil",
            Node::Int(_) => "integer",
            Node::Pair(..) => "pair",
            Node::Function(_) => "function",
            Node::Apply { .. } => "application",
            Node::Picture(_) => "picture",
        }
    }

    pub fn is_normal(&self) -> bool {
        !matches!(self, Node::Apply { .. })
    }
}

/// Node arena with the reduction engine.
///
/// Node 0 is the Nil atom and nodes `1..` are the bare primitives, one per
/// [`Builtin`], so [`Graph::nil`] and [`Graph::builtin`] always return the
/// same handles.
pub struct Graph {
    nodes: Vec<Node>,
    /// Application steps performed so far.
    gas: u64,
    gas_limit: u64,
    transport: Option<Box<dyn Transport>>,
}

impl Graph {
    /// Create a graph with no reduction limit.
    pub fn new() -> Self {
        Self::with_gas_limit(u64::MAX)
    }

    /// Create a graph that fails with [`EvalError::GasExhausted`] after
    /// `gas_limit` application steps.
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        let nodes = Builtin::ALL
            .iter()
            .map(|b| match b {
                Builtin::Nil => Node::Nil,
                other => Node::Function(Closure {
                    builtin: *other,
                    bound: Vec::new(),
                }),
            })
            .collect();
        Self {
            nodes,
            gas: 0,
            gas_limit,
            transport: None,
        }
    }

    /// Install the transport used by `send` and the interaction loop.
    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.transport = Some(Box::new(transport));
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.set_transport(transport);
        self
    }

    pub fn gas_used(&self) -> u64 {
        self.gas
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different graph and lies past the end
    /// of this one. Use [`Graph::get`] for handles of unknown origin.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// The node behind `id`, or `None` if this graph never issued it.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Construction
    // ══════════════════════════════════════════════════════════════════════

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn nil(&self) -> NodeId {
        self.builtin(Builtin::Nil)
    }

    pub fn builtin(&self, builtin: Builtin) -> NodeId {
        NodeId(builtin as usize)
    }

    /// The canonical selector for `value`: `t` or `f`.
    pub fn boolean(&self, value: bool) -> NodeId {
        self.builtin(if value { Builtin::T } else { Builtin::F })
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.alloc(Node::Int(value))
    }

    pub fn pair(&mut self, first: NodeId, second: NodeId) -> NodeId {
        self.alloc(Node::Pair(first, second))
    }

    pub fn picture(&mut self, picture: Picture) -> NodeId {
        self.alloc(Node::Picture(picture))
    }

    /// A pending application of `function` to `argument`.
    pub fn apply(&mut self, function: NodeId, argument: NodeId) -> NodeId {
        self.alloc(Node::Apply {
            function,
            argument,
            forced: None,
        })
    }

    /// Left-nested application: `apply_n(f, [a, b])` is `ap ap f a b`.
    pub fn apply_n(&mut self, function: NodeId, arguments: &[NodeId]) -> NodeId {
        arguments
            .iter()
            .fold(function, |acc, arg| self.apply(acc, *arg))
    }

    /// Build a Nil-terminated pair chain.
    pub fn list(&mut self, items: &[NodeId]) -> NodeId {
        let nil = self.nil();
        items
            .iter()
            .rev()
            .fold(nil, |tail, head| self.pair(*head, tail))
    }

    /// Allocate a fresh copy of a data tree.
    pub fn alloc_data(&mut self, data: &Data) -> NodeId {
        enum Frame<'d> {
            First(&'d Data),
            Second(NodeId),
        }

        let mut stack = Vec::new();
        let mut next = data;
        loop {
            let mut id = match next {
                Data::Nil => self.nil(),
                Data::Int(n) => self.int(*n),
                Data::Pair(first, second) => {
                    stack.push(Frame::First(&**second));
                    next = &**first;
                    continue;
                }
            };
            loop {
                match stack.pop() {
                    None => return id,
                    Some(Frame::First(second)) => {
                        stack.push(Frame::Second(id));
                        next = second;
                        break;
                    }
                    Some(Frame::Second(first)) => id = self.pair(first, id),
                }
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Forcing
    // ══════════════════════════════════════════════════════════════════════

    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.gas_limit {
            Err(EvalError::GasExhausted)
        } else {
            Ok(())
        }
    }

    /// Reduce `id` to a node that is not an application.
    ///
    /// Every application node passed through on the way is memoized with the
    /// final result, so forcing any of them again returns the same handle
    /// without further reduction.
    ///
    /// The function side of an application is forced on an explicit spine
    /// stack, so `ap ap ap f a b c` chains of any length are safe. Strict
    /// builtin arguments (the operands of `add`, `car`, `isnil` and so on)
    /// are forced by a nested call, so a term like `inc (inc (.. 0))` uses
    /// native stack in proportion to its nesting and can exhaust it when
    /// nested tens of thousands deep. Gas does not bound that depth.
    pub fn force(&mut self, id: NodeId) -> EvalResult<NodeId> {
        // `trails[k + 1]` is the chain entered while forcing the callee of
        // the last node in `trails[k]`, which is waiting on `arguments[k]`.
        let mut trails: Vec<Vec<NodeId>> = vec![Vec::new()];
        let mut arguments: Vec<NodeId> = Vec::new();
        let mut current = id;
        loop {
            let value = match self.node(current) {
                Node::Apply {
                    forced: Some(done), ..
                } => *done,
                Node::Apply {
                    function,
                    argument,
                    forced: None,
                } => {
                    let (function, argument) = (*function, *argument);
                    if let Some(trail) = trails.last_mut() {
                        trail.push(current);
                    }
                    trails.push(Vec::new());
                    arguments.push(argument);
                    current = function;
                    continue;
                }
                _ => current,
            };

            for visited in trails.pop().unwrap_or_default() {
                if let Node::Apply { forced, .. } = &mut self.nodes[visited.index()] {
                    *forced = Some(value);
                }
            }
            let Some(argument) = arguments.pop() else {
                return Ok(value);
            };
            self.tick()?;
            current = self.call(value, argument)?;
        }
    }

    /// Apply an already-forced callee to one more argument.
    fn call(&mut self, callee: NodeId, argument: NodeId) -> EvalResult<NodeId> {
        match self.node(callee) {
            Node::Nil => self.reduce(Builtin::Nil, &[argument]),
            Node::Function(closure) => {
                let builtin = closure.builtin;
                let mut bound = closure.bound.clone();
                bound.push(argument);
                if bound.len() == builtin.arity() {
                    self.reduce(builtin, &bound)
                } else {
                    Ok(self.alloc(Node::Function(Closure { builtin, bound })))
                }
            }
            Node::Pair(first, second) => {
                let (first, second) = (*first, *second);
                let partial = self.apply(argument, first);
                Ok(self.apply(partial, second))
            }
            other => Err(EvalError::TypeMismatch {
                expected: "function",
                found: other.kind(),
            }),
        }
    }

    /// Follow memoized results without reducing anything.
    pub fn resolve(&self, id: NodeId) -> NodeId {
        match self.node(id) {
            Node::Apply {
                forced: Some(done), ..
            } => *done,
            _ => id,
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Typed access
    // ══════════════════════════════════════════════════════════════════════

    pub fn force_int(&mut self, id: NodeId) -> EvalResult<i64> {
        let forced = self.force(id)?;
        match self.node(forced) {
            Node::Int(n) => Ok(*n),
            other => Err(EvalError::TypeMismatch {
                expected: "integer",
                found: other.kind(),
            }),
        }
    }

    pub fn force_pair(&mut self, id: NodeId) -> EvalResult<(NodeId, NodeId)> {
        let forced = self.force(id)?;
        match self.node(forced) {
            Node::Pair(first, second) => Ok((*first, *second)),
            other => Err(EvalError::TypeMismatch {
                expected: "pair",
                found: other.kind(),
            }),
        }
    }

    /// First component of a pair, left unforced.
    pub fn car(&mut self, id: NodeId) -> EvalResult<NodeId> {
        Ok(self.force_pair(id)?.0)
    }

    /// Second component of a pair, left unforced.
    pub fn cdr(&mut self, id: NodeId) -> EvalResult<NodeId> {
        Ok(self.force_pair(id)?.1)
    }

    pub fn is_nil(&mut self, id: NodeId) -> EvalResult<bool> {
        let forced = self.force(id)?;
        Ok(matches!(self.node(forced), Node::Nil))
    }

    /// Force a Nil-terminated pair chain into its element handles.
    /// Elements themselves are left unforced.
    pub fn force_list(&mut self, id: NodeId) -> EvalResult<Vec<NodeId>> {
        let mut items = Vec::new();
        let mut cursor = self.force(id)?;
        loop {
            match self.node(cursor) {
                Node::Nil => return Ok(items),
                Node::Pair(head, tail) => {
                    items.push(*head);
                    let tail = *tail;
                    cursor = self.force(tail)?;
                }
                other => {
                    return Err(EvalError::TypeMismatch {
                        expected: "list",
                        found: other.kind(),
                    })
                }
            }
        }
    }

    /// Force a whole Nil/Integer/Pair tree into [`Data`].
    pub fn to_data(&mut self, id: NodeId) -> EvalResult<Data> {
        enum Frame {
            First(NodeId),
            Second(Data),
        }

        let mut stack = Vec::new();
        let mut next = id;
        loop {
            let forced = self.force(next)?;
            let mut value = match self.node(forced) {
                Node::Nil => Data::Nil,
                Node::Int(n) => Data::Int(*n),
                Node::Pair(first, second) => {
                    stack.push(Frame::First(*second));
                    next = *first;
                    continue;
                }
                other => {
                    return Err(EvalError::TypeMismatch {
                        expected: "data",
                        found: other.kind(),
                    })
                }
            };
            loop {
                match stack.pop() {
                    None => return Ok(value),
                    Some(Frame::First(second)) => {
                        stack.push(Frame::Second(value));
                        next = second;
                        break;
                    }
                    Some(Frame::Second(first)) => value = Data::pair(first, value),
                }
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Transport
    // ══════════════════════════════════════════════════════════════════════

    /// Hand `data` to the installed transport and wait for the reply.
    pub fn send(&mut self, data: &Data) -> EvalResult<Data> {
        let transport = self
            .transport
            .as_mut()
            .ok_or(TransportError::Unavailable)?;
        Ok(transport.send(data)?)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Display
    // ══════════════════════════════════════════════════════════════════════

    /// Render a node for logs without forcing anything.
    ///
    /// Memoized applications print as their result; pending ones print in
    /// `ap f x` form.
    pub fn display(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(self.resolve(id), &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Node::Nil => out.push_str("nil"),
            Node::Int(n) => out.push_str(&n.to_string()),
            Node::Pair(first, second) => {
                if let Some(items) = self.proper_list(id) {
                    out.push('[');
                    for (i, item) in items.into_iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.write_node(item, out);
                    }
                    out.push(']');
                } else {
                    out.push('(');
                    self.write_node(self.resolve(*first), out);
                    out.push_str(", ");
                    self.write_node(self.resolve(*second), out);
                    out.push(')');
                }
            }
            Node::Function(closure) => {
                for _ in &closure.bound {
                    out.push_str("ap ");
                }
                out.push_str(closure.builtin.name());
                for arg in &closure.bound {
                    out.push(' ');
                    self.write_node(self.resolve(*arg), out);
                }
            }
            Node::Apply {
                function, argument, ..
            } => {
                out.push_str("ap ");
                self.write_node(self.resolve(*function), out);
                out.push(' ');
                self.write_node(self.resolve(*argument), out);
            }
            Node::Picture(picture) => {
                out.push_str(&format!("<picture {} points>", picture.len()));
            }
        }
    }

    /// Elements of an already-evaluated proper list, if `id` is one.
    fn proper_list(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let mut items = Vec::new();
        let mut cursor = id;
        loop {
            match self.node(cursor) {
                Node::Nil => return Some(items),
                Node::Pair(head, tail) => {
                    items.push(self.resolve(*head));
                    cursor = self.resolve(*tail);
                }
                _ => return None,
            }
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes.len())
            .field("gas", &self.gas)
            .field("gas_limit", &self.gas_limit)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}
