//! Binds a parsed expression to a table's columns and evaluates it per row.

use super::parser::{CmpOp, Expr, Operand};
use super::QueryError;
use crate::table::{ColumnType, Table};
use crate::types::Scalar;
use std::cmp::Ordering;

#[derive(Debug)]
enum Slot {
    Column { idx: usize, name: String },
    Literal(Scalar),
}

#[derive(Debug)]
enum Node {
    Or(Vec<Node>),
    And(Vec<Node>),
    Not(Box<Node>),
    Compare { left: Slot, op: CmpOp, right: Slot },
    Membership {
        slot: Slot,
        values: Vec<Scalar>,
        negated: bool,
    },
    Truthy(Slot),
}

/// Expression with every column resolved to a position.
#[derive(Debug)]
pub(super) struct Bound {
    root: Node,
}

/// Coarse type used to reject ordering comparisons that can never succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Number,
    Text,
    Boolean,
    Unknown,
}

impl Bound {
    /// Resolve columns against `table`.
    ///
    /// `Ok(None)` when the expression names a column the table lacks.
    pub(super) fn bind(expr: &Expr, table: &Table) -> Result<Option<Self>, QueryError> {
        if expr
            .columns()
            .iter()
            .any(|name| table.column_index(name).is_none())
        {
            return Ok(None);
        }
        Ok(Some(Self {
            root: bind_node(expr, table)?,
        }))
    }

    pub(super) fn matches(&self, row: &[Scalar]) -> Result<bool, QueryError> {
        eval(&self.root, row)
    }
}

fn bind_node(expr: &Expr, table: &Table) -> Result<Node, QueryError> {
    Ok(match expr {
        Expr::Or(terms) => Node::Or(bind_all(terms, table)?),
        Expr::And(terms) => Node::And(bind_all(terms, table)?),
        Expr::Not(inner) => Node::Not(Box::new(bind_node(inner, table)?)),
        Expr::Compare { left, op, right } => {
            let left = bind_slot(left, table);
            let right = bind_slot(right, table);
            if op.is_ordering() {
                let (lf, rf) = (family(&left, table), family(&right, table));
                if lf != Family::Unknown && rf != Family::Unknown && lf != rf {
                    return Err(QueryError::unplaced(format!(
                        "cannot compare {} {} {}",
                        describe(&left),
                        op.symbol(),
                        describe(&right)
                    )));
                }
            }
            Node::Compare {
                left,
                op: *op,
                right,
            }
        }
        Expr::Membership {
            operand,
            values,
            negated,
        } => Node::Membership {
            slot: bind_slot(operand, table),
            values: values.clone(),
            negated: *negated,
        },
        Expr::Truthy(operand) => {
            let slot = bind_slot(operand, table);
            if family(&slot, table) != Family::Boolean {
                return Err(QueryError::unplaced(format!(
                    "{} is not a boolean condition",
                    describe(&slot)
                )));
            }
            Node::Truthy(slot)
        }
    })
}

fn bind_all(terms: &[Expr], table: &Table) -> Result<Vec<Node>, QueryError> {
    terms.iter().map(|term| bind_node(term, table)).collect()
}

fn bind_slot(operand: &Operand, table: &Table) -> Slot {
    match operand {
        // Presence was checked in `Bound::bind`.
        Operand::Column(name) => Slot::Column {
            idx: table.column_index(name).unwrap_or(usize::MAX),
            name: name.clone(),
        },
        Operand::Literal(value) => Slot::Literal(value.clone()),
    }
}

fn family(slot: &Slot, table: &Table) -> Family {
    match slot {
        Slot::Column { idx, .. } => match table.column_type(*idx) {
            Some(ColumnType::Integer) | Some(ColumnType::Float) => Family::Number,
            Some(ColumnType::Boolean) => Family::Boolean,
            Some(ColumnType::Text) => Family::Text,
            None => Family::Unknown,
        },
        Slot::Literal(Scalar::Int(_)) | Slot::Literal(Scalar::Float(_)) => Family::Number,
        Slot::Literal(Scalar::Text(_)) => Family::Text,
        Slot::Literal(Scalar::Bool(_)) => Family::Boolean,
        Slot::Literal(Scalar::Null) => Family::Unknown,
    }
}

fn describe(slot: &Slot) -> String {
    match slot {
        Slot::Column { name, .. } => format!("column `{}`", name),
        Slot::Literal(Scalar::Text(s)) => format!("{:?}", s),
        Slot::Literal(Scalar::Null) => "None".to_string(),
        Slot::Literal(value) => value.to_string(),
    }
}

fn resolve<'a>(slot: &'a Slot, row: &'a [Scalar]) -> &'a Scalar {
    const NULL: &Scalar = &Scalar::Null;
    match slot {
        Slot::Column { idx, .. } => row.get(*idx).unwrap_or(NULL),
        Slot::Literal(value) => value,
    }
}

fn eval(node: &Node, row: &[Scalar]) -> Result<bool, QueryError> {
    match node {
        Node::Or(terms) => {
            for term in terms {
                if eval(term, row)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Node::And(terms) => {
            for term in terms {
                if !eval(term, row)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Node::Not(inner) => Ok(!eval(inner, row)?),
        Node::Compare { left, op, right } => {
            let (l, r) = (resolve(left, row), resolve(right, row));
            match op {
                CmpOp::Eq => Ok(l.matches(r)),
                CmpOp::Ne => Ok(!l.matches(r)),
                ordering_op => {
                    let ordering = l.try_order(r).map_err(QueryError::unplaced)?;
                    Ok(ordering.map_or(false, |ord| ordering_holds(*ordering_op, ord)))
                }
            }
        }
        Node::Membership {
            slot,
            values,
            negated,
        } => {
            let value = resolve(slot, row);
            let found = values.iter().any(|v| value.matches(v));
            Ok(found != *negated)
        }
        Node::Truthy(slot) => Ok(matches!(resolve(slot, row), Scalar::Bool(true))),
    }
}

fn ordering_holds(op: CmpOp, ord: Ordering) -> bool {
    match op {
        CmpOp::Lt => ord == Ordering::Less,
        CmpOp::Le => ord != Ordering::Greater,
        CmpOp::Gt => ord == Ordering::Greater,
        CmpOp::Ge => ord != Ordering::Less,
        CmpOp::Eq => ord == Ordering::Equal,
        CmpOp::Ne => ord != Ordering::Equal,
    }
}
