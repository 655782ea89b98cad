//! The interaction loop.
//!
//! A protocol is a curried function `protocol state vector` whose result
//! must be the chain `(flag, (state', (data, _)))`. Between rounds the new
//! state is pushed through the modulation codec, which both checks that it
//! is plain data and rebuilds it as a fresh tree. A zero flag ends the
//! loop; any other flag sends `data` through the transport and feeds the
//! reply back in as the next vector.

use crate::error::{EvalError, EvalResult};
use crate::graph::{Graph, Node, NodeId};
use crate::render::{self, Picture};
use galaxy_modem::{demodulate, modulate};
use galaxy_types::Data;
use tracing::{debug, info, instrument};

/// Where the loop currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    /// Next step forces `protocol state vector`.
    Evaluating { vector: NodeId },
    /// Next step sends `data` and waits for the reply.
    Dispatching { data: Data },
    /// The protocol reported flag 0.
    Done { state: NodeId, data: NodeId },
}

/// Final state and data of a finished interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub state: NodeId,
    /// Forced to normal form; nested components may still be pending.
    pub data: NodeId,
    /// Number of protocol evaluations performed.
    pub rounds: usize,
}

impl Outcome {
    /// Render `data` with the `multipledraw` rule.
    pub fn pictures(&self, graph: &mut Graph) -> EvalResult<Vec<Picture>> {
        render::multiple_draw(graph, self.data)
    }
}

/// Explicit state machine driving one interaction.
///
/// Sends go through the transport installed on the graph.
pub struct Interaction<'g> {
    graph: &'g mut Graph,
    protocol: NodeId,
    state: NodeId,
    phase: Phase,
    rounds: usize,
}

impl<'g> Interaction<'g> {
    pub fn new(graph: &'g mut Graph, protocol: NodeId, state: NodeId, vector: NodeId) -> Self {
        Self {
            graph,
            protocol,
            state,
            phase: Phase::Evaluating { vector },
            rounds: 0,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> NodeId {
        self.state
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Done { .. })
    }

    /// Advance exactly one transition. A finished interaction stays finished.
    pub fn step(&mut self) -> EvalResult<()> {
        match &self.phase {
            Phase::Evaluating { vector } => {
                let vector = *vector;
                self.phase = self.evaluate(vector)?;
            }
            Phase::Dispatching { data } => {
                let reply = self.graph.send(data)?;
                debug!(reply = %reply, "transport replied");
                let vector = self.graph.alloc_data(&reply);
                self.phase = Phase::Evaluating { vector };
            }
            Phase::Done { .. } => {}
        }
        Ok(())
    }

    /// Drive the loop until the protocol reports flag 0.
    #[instrument(skip_all, name = "interact")]
    pub fn run(mut self) -> EvalResult<Outcome> {
        loop {
            if let Phase::Done { state, data } = self.phase {
                info!(rounds = self.rounds, "interaction finished");
                return Ok(Outcome {
                    state,
                    data,
                    rounds: self.rounds,
                });
            }
            self.step()?;
        }
    }

    fn evaluate(&mut self, vector: NodeId) -> EvalResult<Phase> {
        self.rounds += 1;
        let round = self.rounds;

        let app = self.graph.apply_n(self.protocol, &[self.state, vector]);
        let (flag, rest) = self.shape_pair(app, "protocol result")?;
        let flag = self.graph.force(flag)?;
        let flag = match self.graph.node(flag) {
            Node::Int(n) => *n,
            other => {
                return Err(EvalError::Shape(format!(
                    "flag must be an integer, found {}",
                    other.kind()
                )))
            }
        };
        let (new_state, rest) = self.shape_pair(rest, "state cell")?;
        let (data, _) = self.shape_pair(rest, "data cell")?;

        let state = self.graph.to_data(new_state)?;
        let canonical = demodulate(&modulate(&state))?;
        self.state = self.graph.alloc_data(&canonical);
        let data = self.graph.force(data)?;

        info!(round, flag, "protocol evaluated");
        debug!(
            state = %canonical,
            data = %self.graph.display(data),
            "round result"
        );

        if flag == 0 {
            Ok(Phase::Done {
                state: self.state,
                data,
            })
        } else {
            Ok(Phase::Dispatching {
                data: self.graph.to_data(data)?,
            })
        }
    }

    /// Force `id` as a pair, reporting a non-pair as a shape error.
    fn shape_pair(&mut self, id: NodeId, what: &str) -> EvalResult<(NodeId, NodeId)> {
        let forced = self.graph.force(id)?;
        match self.graph.node(forced) {
            Node::Pair(first, second) => Ok((*first, *second)),
            other => Err(EvalError::Shape(format!(
                "{what} must be a pair, found {}",
                other.kind()
            ))),
        }
    }
}

impl Graph {
    /// Run `protocol` from `state` and `vector` to completion.
    pub fn interact(
        &mut self,
        protocol: NodeId,
        state: NodeId,
        vector: NodeId,
    ) -> EvalResult<Outcome> {
        Interaction::new(self, protocol, state, vector).run()
    }
}
