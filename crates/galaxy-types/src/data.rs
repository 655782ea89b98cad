use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem;

/// A fully-evaluated value tree: the subset of runtime values that can be
/// modulated.
///
/// Functions and pending applications never appear here; the evaluator
/// forces them away (or rejects them) before producing a `Data`.
///
/// Cloning, equality and drop walk the tree with an explicit stack, so a
/// list of any length can be handled without deep recursion.
#[derive(Debug, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Data {
    Nil,
    Int(i64),
    Pair(Box<Data>, Box<Data>),
}

impl Data {
    pub fn pair(first: Data, second: Data) -> Self {
        Data::Pair(Box::new(first), Box::new(second))
    }

    /// Build a Nil-terminated pair chain from `items`.
    pub fn list(items: impl IntoIterator<Item = Data>) -> Self {
        let items: Vec<Data> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(Data::Nil, |tail, head| Data::pair(head, tail))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Data::Nil)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Data::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Data, &Data)> {
        match self {
            Data::Pair(first, second) => Some((first, second)),
            _ => None,
        }
    }

    /// Flatten a Nil-terminated pair chain. Returns `None` for improper lists.
    pub fn as_list(&self) -> Option<Vec<&Data>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Data::Nil => return Some(items),
                Data::Pair(head, tail) => {
                    items.push(head.as_ref());
                    cursor = tail;
                }
                Data::Int(_) => return None,
            }
        }
    }

    /// Interpret `(x, y)` as a point.
    pub fn as_point(&self) -> Option<Point> {
        let (x, y) = self.as_pair()?;
        Some(Point::new(x.as_int()?, y.as_int()?))
    }
}

impl Clone for Data {
    fn clone(&self) -> Self {
        enum Frame<'d> {
            First(&'d Data),
            Second(Data),
        }

        let mut stack = Vec::new();
        let mut next = self;
        loop {
            let mut value = match next {
                Data::Nil => Data::Nil,
                Data::Int(n) => Data::Int(*n),
                Data::Pair(first, second) => {
                    stack.push(Frame::First(&**second));
                    next = &**first;
                    continue;
                }
            };
            loop {
                match stack.pop() {
                    None => return value,
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
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(next) = pending.pop() {
            match next {
                (Data::Nil, Data::Nil) => {}
                (Data::Int(a), Data::Int(b)) if a == b => {}
                (Data::Pair(a1, a2), Data::Pair(b1, b2)) => {
                    pending.push((&**a2, &**b2));
                    pending.push((&**a1, &**b1));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Drop for Data {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach_children(self, &mut pending);
        while let Some(mut data) = pending.pop() {
            detach_children(&mut data, &mut pending);
        }
    }
}

/// Move the components of a pair onto `pending`, leaving Nil behind.
fn detach_children(data: &mut Data, pending: &mut Vec<Data>) {
    if let Data::Pair(first, second) = data {
        for child in [first, second] {
            if matches!(**child, Data::Pair(..)) {
                pending.push(mem::replace(&mut **child, Data::Nil));
            }
        }
    }
}

impl From<i64> for Data {
    fn from(n: i64) -> Self {
        Data::Int(n)
    }
}

impl From<Point> for Data {
    fn from(p: Point) -> Self {
        Data::pair(Data::Int(p.x), Data::Int(p.y))
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Data::Nil => f.write_str("nil"),
            Data::Int(n) => write!(f, "{n}"),
            Data::Pair(first, second) => {
                if let Some(items) = self.as_list() {
                    f.write_str("[")?;
                    for (i, item) in items.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{item}")?;
                    }
                    f.write_str("]")
                } else {
                    write!(f, "({first}, {second})")
                }
            }
        }
    }
}

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_builds_nil_terminated_chain() {
        let list = Data::list([Data::Int(1), Data::Int(2)]);
        assert_eq!(
            list,
            Data::pair(Data::Int(1), Data::pair(Data::Int(2), Data::Nil))
        );
        assert_eq!(list.as_list().map(|l| l.len()), Some(2));
    }

    #[test]
    fn display_prefers_list_form() {
        assert_eq!(Data::list([Data::Int(1), Data::Nil]).to_string(), "[1, nil]");
        assert_eq!(Data::pair(Data::Int(1), Data::Int(2)).to_string(), "(1, 2)");
        assert_eq!(Data::Nil.to_string(), "nil");
    }

    #[test]
    fn point_conversion() {
        let data = Data::from(Point::new(-3, 4));
        assert_eq!(data.as_point(), Some(Point::new(-3, 4)));
        assert_eq!(Data::Int(3).as_point(), None);
    }

    #[test]
    fn long_lists_compare_and_drop_without_recursion() {
        let long = Data::list((0..200_000).map(Data::Int));
        let same = Data::list((0..200_000).map(Data::Int));
        let other = Data::list((0..200_000).map(|n| Data::Int(if n == 199_999 { -1 } else { n })));
        assert!(long == same);
        assert!(long != other);
        assert!(long.clone() == same);
        drop(long);
        drop(same);
        drop(other);
    }

    #[test]
    fn deep_left_nesting_drops() {
        let mut nested = Data::Nil;
        for n in 0..200_000 {
            nested = Data::pair(nested, Data::Int(n));
        }
        let copy = nested.clone();
        assert!(copy == nested);
        drop(nested);
        drop(copy);
    }

    #[test]
    fn json_shape() {
        let data = Data::pair(Data::Int(1), Data::Nil);
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"pair":[{"int":1},"nil"]}"#);
        let back: Data = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }
}
