//! Reduction rules for the builtin catalog.
//!
//! `reduce` runs only once a primitive has received all of its arguments.
//! Rules force exactly the arguments they need to inspect; everything else
//! is passed through as an unforced handle, so selectors like `t` and `f`
//! never touch the branch they discard.

use crate::error::{EvalError, EvalResult};
use crate::graph::{Graph, NodeId};
use crate::interact::Interaction;
use crate::render;
use galaxy_modem::{demodulate, modulate};
use galaxy_types::Builtin;

impl Graph {
    pub(crate) fn reduce(&mut self, builtin: Builtin, args: &[NodeId]) -> EvalResult<NodeId> {
        debug_assert_eq!(args.len(), builtin.arity());
        match builtin {
            // ── Lists & pairs ─────────────────────────────────────────────
            Builtin::Nil => Ok(self.boolean(true)),
            Builtin::IsNil => {
                let nil = self.is_nil(args[0])?;
                Ok(self.boolean(nil))
            }
            Builtin::Cons | Builtin::Vec => Ok(self.pair(args[0], args[1])),
            Builtin::Car => self.car(args[0]),
            Builtin::Cdr => self.cdr(args[0]),

            // ── Arithmetic ────────────────────────────────────────────────
            Builtin::Neg => self.unary(args[0], "neg", i64::checked_neg),
            Builtin::Inc => self.unary(args[0], "inc", |n| n.checked_add(1)),
            Builtin::Dec => self.unary(args[0], "dec", |n| n.checked_sub(1)),
            Builtin::Add => self.binary(args, "add", i64::checked_add),
            Builtin::Mul => self.binary(args, "mul", i64::checked_mul),
            Builtin::Div => {
                let (dividend, divisor) = self.int_args(args)?;
                if divisor == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                let quotient = dividend
                    .checked_div(divisor)
                    .ok_or(EvalError::Overflow("div"))?;
                Ok(self.int(quotient))
            }

            // ── Comparison ────────────────────────────────────────────────
            Builtin::Eq => {
                let (a, b) = self.int_args(args)?;
                Ok(self.boolean(a == b))
            }
            Builtin::Lt => {
                let (a, b) = self.int_args(args)?;
                Ok(self.boolean(a < b))
            }
            Builtin::If0 => {
                let zero = self.force_int(args[0])? == 0;
                Ok(if zero { args[1] } else { args[2] })
            }

            // ── Combinators ───────────────────────────────────────────────
            Builtin::I => Ok(args[0]),
            Builtin::T => Ok(args[0]),
            Builtin::F => Ok(args[1]),
            Builtin::S => {
                let (x, y, z) = (args[0], args[1], args[2]);
                let xz = self.apply(x, z);
                let yz = self.apply(y, z);
                Ok(self.apply(xz, yz))
            }
            Builtin::C => {
                let (x, y, z) = (args[0], args[1], args[2]);
                let xz = self.apply(x, z);
                Ok(self.apply(xz, y))
            }
            Builtin::B => {
                let (x, y, z) = (args[0], args[1], args[2]);
                let yz = self.apply(y, z);
                Ok(self.apply(x, yz))
            }

            // ── Boundary ──────────────────────────────────────────────────
            Builtin::Draw => {
                let picture = render::draw(self, args[0])?;
                Ok(self.picture(picture))
            }
            Builtin::MultipleDraw => {
                let pictures = render::multiple_draw(self, args[0])?;
                let nodes: Vec<NodeId> = pictures.into_iter().map(|p| self.picture(p)).collect();
                Ok(self.list(&nodes))
            }
            Builtin::Send => {
                let data = self.to_data(args[0])?;
                let reply = self.send(&data)?;
                Ok(self.alloc_data(&reply))
            }
            Builtin::Interact => {
                let outcome = Interaction::new(self, args[0], args[1], args[2]).run()?;
                Ok(self.pair(outcome.state, outcome.data))
            }
            Builtin::Modem => {
                let data = self.to_data(args[0])?;
                let canonical = demodulate(&modulate(&data))?;
                Ok(self.alloc_data(&canonical))
            }
        }
    }

    fn unary(
        &mut self,
        arg: NodeId,
        name: &'static str,
        op: fn(i64) -> Option<i64>,
    ) -> EvalResult<NodeId> {
        let n = self.force_int(arg)?;
        let result = op(n).ok_or(EvalError::Overflow(name))?;
        Ok(self.int(result))
    }

    fn binary(
        &mut self,
        args: &[NodeId],
        name: &'static str,
        op: fn(i64, i64) -> Option<i64>,
    ) -> EvalResult<NodeId> {
        let (a, b) = self.int_args(args)?;
        let result = op(a, b).ok_or(EvalError::Overflow(name))?;
        Ok(self.int(result))
    }

    fn int_args(&mut self, args: &[NodeId]) -> EvalResult<(i64, i64)> {
        Ok((self.force_int(args[0])?, self.force_int(args[1])?))
    }
}
