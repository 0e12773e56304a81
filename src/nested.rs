//! Numbers nested in lists to any depth, and their deep sum.

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use thiserror::Error;

/// A number, or a group of further numbers and groups.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested<T = i64> {
    Number(T),
    Group(Vec<Nested<T>>),
}

impl<T: Copy + Sum> Nested<T> {
    /// Sum of every number at any depth. An empty group sums to zero.
    pub fn sum(&self) -> T {
        match self {
            Nested::Number(value) => *value,
            Nested::Group(items) => sum_nested(items),
        }
    }
}

/// Sum of every number found in `data`, at any depth.
pub fn sum_nested<T: Copy + Sum>(data: &[Nested<T>]) -> T {
    data.iter().map(Nested::sum).sum()
}

impl<T: fmt::Display> fmt::Display for Nested<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nested::Number(value) => write!(f, "{}", value),
            Nested::Group(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Builds a [`Nested::Group`] from a bracket literal. Leaves are any expressions.
///
/// ```
/// use fibmemo::{nested, Nested};
///
/// let list: Nested = nested![1, [2, 3], [4, [5, 6]], [-1, -5], 0];
/// assert_eq!(list.sum(), 15);
/// let x = 4;
/// let computed: Nested = nested![x, [x + 1, -x]];
/// assert_eq!(computed.sum(), 5);
/// let empty: Nested = nested![];
/// assert_eq!(empty.sum(), 0);
/// ```
#[macro_export]
macro_rules! nested {
    (@acc [$($out:expr),*]) => {
        $crate::Nested::Group(::std::vec![$($out),*])
    };
    (@acc [$($out:expr),*] [$($inner:tt)*] $(, $($rest:tt)*)?) => {
        $crate::nested!(@acc [$($out,)* $crate::nested![$($inner)*]] $($($rest)*)?)
    };
    (@acc [$($out:expr),*] $value:expr $(, $($rest:tt)*)?) => {
        $crate::nested!(@acc [$($out,)* $crate::Nested::Number($value)] $($($rest)*)?)
    };
    ($($items:tt)*) => {
        $crate::nested!(@acc [] $($items)*)
    };
}

/// Deepest group nesting accepted by the parser.
pub const MAX_DEPTH: usize = 256;

/// Failures parsing the text form of a [`Nested`] value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseNestedError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    /// A leaf that does not parse as the number type
    #[error("{token:?} at offset {offset} is not a number")]
    NotANumber { token: String, offset: usize },
    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },
    #[error("groups nested deeper than {} at offset {offset}", MAX_DEPTH)]
    TooDeep { offset: usize },
}

/// Parses `1`, `[]`, `[1, [2, 3], -4]` and so on. Whitespace between tokens is ignored.
impl<T: FromStr> FromStr for Nested<T> {
    type Err = ParseNestedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser {
            input: s,
            pos: 0,
            depth: 0,
        };
        let value = parser.item()?;
        parser.skip_whitespace();
        if parser.pos < s.len() {
            return Err(ParseNestedError::TrailingInput { offset: parser.pos });
        }
        Ok(value)
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn item<T: FromStr>(&mut self) -> Result<Nested<T>, ParseNestedError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseNestedError::UnexpectedEnd),
            Some('[') => {
                if self.depth == MAX_DEPTH {
                    return Err(ParseNestedError::TooDeep { offset: self.pos });
                }
                self.pos += 1;
                self.depth += 1;
                let group = self.group();
                self.depth -= 1;
                group
            }
            Some(c @ ']') | Some(c @ ',') => Err(ParseNestedError::Unexpected {
                found: c,
                offset: self.pos,
            }),
            Some(_) => self.number(),
        }
    }

    /// Items of a group, after the opening bracket.
    fn group<T: FromStr>(&mut self) -> Result<Nested<T>, ParseNestedError> {
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Nested::Group(items));
        }
        loop {
            items.push(self.item()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(Nested::Group(items));
                }
                Some(found) => {
                    return Err(ParseNestedError::Unexpected {
                        found,
                        offset: self.pos,
                    })
                }
                None => return Err(ParseNestedError::UnexpectedEnd),
            }
        }
    }

    fn number<T: FromStr>(&mut self) -> Result<Nested<T>, ParseNestedError> {
        let start = self.pos;
        let rest = &self.input[start..];
        let len = rest
            .find(|c: char| c == '[' || c == ']' || c == ',' || c.is_whitespace())
            .unwrap_or(rest.len());
        let token = &rest[..len];
        self.pos += len;
        token
            .parse()
            .map(Nested::Number)
            .map_err(|_| ParseNestedError::NotANumber {
                token: token.to_string(),
                offset: start,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = "[1, [2, 3], [4, [5, 6]], [-1, -5], 0]";

    #[test]
    fn sums() {
        let empty: Vec<Nested> = vec![];
        assert_eq!(sum_nested(&empty), 0);
        assert_eq!(Nested::<i64>::Group(vec![]).sum(), 0);
        assert_eq!(Nested::Number(7).sum(), 7);

        let list: Nested = nested![1, [2, 3], [4, [5, 6]], [-1, -5], 0];
        assert_eq!(list.sum(), 15);
        if let Nested::Group(items) = &list {
            assert_eq!(sum_nested(items), 15);
            assert_eq!(items.len(), 5);
        } else {
            panic!("nested! builds a group");
        }
    }

    #[test]
    fn deep_and_empty_groups() {
        let list: Nested = nested![[[[[]]]], [[[42]]], [], [[-2], []]];
        assert_eq!(list.sum(), 40);
    }

    #[test]
    fn expression_leaves() {
        let (x, y) = (3, 10);
        let list: Nested = nested![x, [y + 1, [x * y]], -x];
        assert_eq!(list, nested![3, [11, [30]], -3]);
        assert_eq!(list.sum(), 41);
    }

    #[test]
    fn floats() {
        let list: Nested<f64> = "[0.5, [1.25, [2.25]], -1]".parse().unwrap();
        assert_eq!(list.sum(), 3.0);
    }

    #[test]
    fn parse_and_display() {
        let list: Nested = DEMO.parse().unwrap();
        assert_eq!(list, nested![1, [2, 3], [4, [5, 6]], [-1, -5], 0]);
        assert_eq!(list.to_string(), DEMO);

        let spaced: Nested = " [ 1 ,[2,3 ] ] ".parse().unwrap();
        assert_eq!(spaced.to_string(), "[1, [2, 3]]");
        assert_eq!("[]".parse::<Nested>().unwrap(), Nested::Group(vec![]));
        assert_eq!("-9".parse::<Nested>().unwrap(), Nested::Number(-9));
    }

    #[test]
    fn text_leaf_is_not_a_number() {
        assert_eq!(
            "[1, 'a', 3]".parse::<Nested>(),
            Err(ParseNestedError::NotANumber {
                token: "'a'".to_string(),
                offset: 4,
            })
        );
        assert_eq!(
            "[1.5]".parse::<Nested<i64>>(),
            Err(ParseNestedError::NotANumber {
                token: "1.5".to_string(),
                offset: 1,
            })
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let deepest = format!("{}{}", "[".repeat(MAX_DEPTH), "]".repeat(MAX_DEPTH));
        assert_eq!(deepest.parse::<Nested>().map(|list| list.sum()), Ok(0));

        let too_deep = format!("{}{}", "[".repeat(50_000), "]".repeat(50_000));
        assert_eq!(
            too_deep.parse::<Nested>(),
            Err(ParseNestedError::TooDeep { offset: MAX_DEPTH })
        );
    }

    #[test]
    fn malformed_input() {
        assert_eq!("".parse::<Nested>(), Err(ParseNestedError::UnexpectedEnd));
        assert_eq!("[1, [2]".parse::<Nested>(), Err(ParseNestedError::UnexpectedEnd));
        assert_eq!("[1,]".parse::<Nested>(), Err(ParseNestedError::Unexpected { found: ']', offset: 3 }));
        assert_eq!("[1 2]".parse::<Nested>(), Err(ParseNestedError::Unexpected { found: '2', offset: 3 }));
        assert_eq!("[1] 2".parse::<Nested>(), Err(ParseNestedError::TrailingInput { offset: 4 }));
    }
}
