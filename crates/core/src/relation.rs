//! Relationship between two operations shown on screen.
//!
//! Two operations are related when they share `meta.id`, i.e. they are the
//! same logical edit. Their transformation chains then decide the
//! direction: the one whose chain is a prefix of the other is the older
//! version.

use crate::operation::HasIdentity;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Different edits. Chain contents are never consulted.
    Unrelated,
    /// Same edit, but the chains diverge before the shorter one ends.
    DifferentlyTransformed,
    /// Same edit, same version.
    SameDepth,
    /// The first operation is this many transformations before the second.
    Ancestor(usize),
    /// The first operation is this many transformations after the second.
    Descendant(usize),
}

impl Relation {
    /// Whether a tooltip should react to the other operation at all.
    pub fn is_related(self) -> bool {
        !matches!(self, Relation::Unrelated)
    }

    /// Tooltip text describing how the first operation relates to the
    /// second, or `None` when they are unrelated.
    pub fn describe(self) -> Option<String> {
        match self {
            Relation::Unrelated => None,
            Relation::DifferentlyTransformed => Some("differently transformed".to_string()),
            Relation::SameDepth => Some("同一变更".to_string()),
            Relation::Ancestor(n) => Some(format!("{} 转化之前", transformation_count(n))),
            Relation::Descendant(n) => Some(format!("{} 转化之后", transformation_count(n))),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Unrelated => f.write_str("unrelated"),
            Relation::DifferentlyTransformed => f.write_str("differently transformed"),
            Relation::SameDepth => f.write_str("same depth"),
            Relation::Ancestor(n) => write!(f, "ancestor by {n}"),
            Relation::Descendant(n) => write!(f, "descendant by {n}"),
        }
    }
}

/// Decide how `a` relates to `b`.
pub fn relate<A, B>(a: &A, b: &B) -> Relation
where
    A: HasIdentity + ?Sized,
    B: HasIdentity + ?Sized,
{
    if a.meta().id != b.meta().id {
        return Relation::Unrelated;
    }
    let (xs, ys) = (a.transformed_against(), b.transformed_against());
    if !is_one_prefix_of_the_other(xs, ys) {
        return Relation::DifferentlyTransformed;
    }
    match xs.len().cmp(&ys.len()) {
        std::cmp::Ordering::Equal => Relation::SameDepth,
        std::cmp::Ordering::Less => Relation::Ancestor(ys.len() - xs.len()),
        std::cmp::Ordering::Greater => Relation::Descendant(xs.len() - ys.len()),
    }
}

fn is_one_prefix_of_the_other(xs: &[String], ys: &[String]) -> bool {
    xs.iter().zip(ys).all(|(x, y)| x == y)
}

/// Counted-times word for a number of transformations: 一次 … 九次, then 多次.
pub fn transformation_count(count: usize) -> &'static str {
    match count {
        1 => "一次",
        2 => "两次",
        3 => "三次",
        4 => "四次",
        5 => "五次",
        6 => "六次",
        7 => "七次",
        8 => "八次",
        9 => "九次",
        _ => "多次",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperationIdentity;

    fn op(id: &str, chain: &[&str]) -> OperationIdentity {
        let mut op = OperationIdentity::new(id, "alice");
        op.transformed_against = chain.iter().map(|s| s.to_string()).collect();
        op
    }

    #[test]
    fn different_ids_are_unrelated_even_with_identical_chains() {
        let a = op("x", &["p", "q"]);
        let b = op("y", &["p", "q"]);
        assert_eq!(relate(&a, &b), Relation::Unrelated);
        assert_eq!(relate(&b, &a), Relation::Unrelated);
        assert_eq!(relate(&a, &b).describe(), None);
    }

    #[test]
    fn operation_is_same_depth_as_itself() {
        let a = op("x", &["p"]);
        assert_eq!(relate(&a, &a), Relation::SameDepth);
        assert_eq!(relate(&a, &a).describe().as_deref(), Some("同一变更"));
    }

    #[test]
    fn strict_prefix_yields_ancestor_and_descendant() {
        let a = op("x", &["p"]);
        let b = op("x", &["p", "q", "r"]);
        assert_eq!(relate(&a, &b), Relation::Ancestor(2));
        assert_eq!(relate(&b, &a), Relation::Descendant(2));
    }

    #[test]
    fn empty_chain_is_prefix_of_everything() {
        let original = op("x", &[]);
        let transformed = op("x", &["y"]);
        assert_eq!(relate(&original, &transformed), Relation::Ancestor(1));
    }

    #[test]
    fn order_of_steps_matters() {
        let a = op("x", &["p", "q"]);
        let b = op("x", &["q", "p"]);
        assert_eq!(relate(&a, &b), Relation::DifferentlyTransformed);
        assert!(relate(&a, &b).is_related());
        assert_eq!(
            relate(&a, &b).describe().as_deref(),
            Some("differently transformed")
        );
    }

    #[test]
    fn divergence_after_common_prefix_is_detected() {
        let a = op("x", &["p", "q"]);
        let b = op("x", &["p", "z", "w"]);
        assert_eq!(relate(&a, &b), Relation::DifferentlyTransformed);
    }

    #[test]
    fn labels_carry_direction() {
        let a = op("x", &[]);
        let b = op("x", &["p"]);
        assert_eq!(relate(&a, &b).describe().as_deref(), Some("一次 转化之前"));
        assert_eq!(relate(&b, &a).describe().as_deref(), Some("一次 转化之后"));
    }

    #[test]
    fn transformation_count_words() {
        let expected = [
            "一次", "两次", "三次", "四次", "五次", "六次", "七次", "八次", "九次",
        ];
        for (i, word) in expected.iter().enumerate() {
            assert_eq!(transformation_count(i + 1), *word);
        }
        assert_eq!(transformation_count(10), "多次");
        assert_eq!(transformation_count(42), "多次");
    }

    #[test]
    fn many_steps_use_many_times_label() {
        let chain: Vec<String> = (0..12).map(|i| format!("s{i}")).collect();
        let a = op("x", &[]);
        let mut b = op("x", &[]);
        b.transformed_against = chain;
        assert_eq!(relate(&a, &b), Relation::Ancestor(12));
        assert_eq!(relate(&a, &b).describe().as_deref(), Some("多次 转化之前"));
    }
}
