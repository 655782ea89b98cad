use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed catalog of primitive callables.
///
/// Every primitive has a fixed arity; applying it to fewer arguments
/// yields a closure, and the reduction rule fires when the last argument
/// arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Builtin {
    // ── Lists & pairs ──
    Nil,
    IsNil,
    Cons,
    Vec,
    Car,
    Cdr,

    // ── Arithmetic ──
    Neg,
    Inc,
    Dec,
    Add,
    Mul,
    Div,

    // ── Comparison ──
    Eq,
    Lt,
    If0,

    // ── Combinators ──
    I,
    T,
    F,
    S,
    C,
    B,

    // ── Boundary ──
    Draw,
    MultipleDraw,
    Send,
    Interact,
    Modem,
}

impl Builtin {
    pub const ALL: [Builtin; 26] = [
        Builtin::Nil,
        Builtin::IsNil,
        Builtin::Cons,
        Builtin::Vec,
        Builtin::Car,
        Builtin::Cdr,
        Builtin::Neg,
        Builtin::Inc,
        Builtin::Dec,
        Builtin::Add,
        Builtin::Mul,
        Builtin::Div,
        Builtin::Eq,
        Builtin::Lt,
        Builtin::If0,
        Builtin::I,
        Builtin::T,
        Builtin::F,
        Builtin::S,
        Builtin::C,
        Builtin::B,
        Builtin::Draw,
        Builtin::MultipleDraw,
        Builtin::Send,
        Builtin::Interact,
        Builtin::Modem,
    ];

    /// Number of arguments the reduction rule consumes.
    pub fn arity(self) -> usize {
        match self {
            Builtin::Nil
            | Builtin::IsNil
            | Builtin::Car
            | Builtin::Cdr
            | Builtin::Neg
            | Builtin::Inc
            | Builtin::Dec
            | Builtin::I
            | Builtin::Draw
            | Builtin::MultipleDraw
            | Builtin::Send
            | Builtin::Modem => 1,
            Builtin::Cons
            | Builtin::Vec
            | Builtin::Add
            | Builtin::Mul
            | Builtin::Div
            | Builtin::Eq
            | Builtin::Lt
            | Builtin::T
            | Builtin::F => 2,
            Builtin::If0
            | Builtin::S
            | Builtin::C
            | Builtin::B
            | Builtin::Interact => 3,
        }
    }

    /// Canonical lowercase name, as used in galaxy scripts.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Nil => "nil",
            Builtin::IsNil => "isnil",
            Builtin::Cons => "cons",
            Builtin::Vec => "vec",
            Builtin::Car => "car",
            Builtin::Cdr => "cdr",
            Builtin::Neg => "neg",
            Builtin::Inc => "inc",
            Builtin::Dec => "dec",
            Builtin::Add => "add",
            Builtin::Mul => "mul",
            Builtin::Div => "div",
            Builtin::Eq => "eq",
            Builtin::Lt => "lt",
            Builtin::If0 => "if0",
            Builtin::I => "i",
            Builtin::T => "t",
            Builtin::F => "f",
            Builtin::S => "s",
            Builtin::C => "c",
            Builtin::B => "b",
            Builtin::Draw => "draw",
            Builtin::MultipleDraw => "multipledraw",
            Builtin::Send => "send",
            Builtin::Interact => "interact",
            Builtin::Modem => "modem",
        }
    }

    /// Look up a builtin by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.name() == name)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
