//! Expression tree traversal.

use crate::expr::Expr;

/// A depth-first visitor over an expression tree.
///
/// Override [`ExprVisitor::visit`] to observe or act on each node; call
/// [`ExprVisitor::walk`] (the default body) to descend into children.
pub trait ExprVisitor {
    fn visit(&mut self, expr: &Expr) {
        self.walk(expr);
    }

    fn walk(&mut self, expr: &Expr) {
        for child in expr.children() {
            self.visit(child);
        }
    }
}

/// Records the kind of every visited node in pre-order.
#[derive(Debug, Default)]
pub struct NodeTrace {
    pub kinds: Vec<&'static str>,
}

impl ExprVisitor for NodeTrace {
    fn visit(&mut self, expr: &Expr) {
        self.kinds.push(expr.kind());
        self.walk(expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_preorder() {
        // p * 3
        let expr = Expr::mul(Expr::column("p"), Expr::int(3));
        let mut trace = NodeTrace::default();
        trace.visit(&expr);
        assert_eq!(trace.kinds, vec!["Mul", "Column", "Literal"]);
    }

    #[test]
    fn test_default_walk_visits_all() {
        struct Counter(usize);
        impl ExprVisitor for Counter {
            fn visit(&mut self, expr: &Expr) {
                self.0 += 1;
                self.walk(expr);
            }
        }

        let expr = Expr::if_then_else(
            Expr::ge(Expr::column("Age"), Expr::int(18)),
            Expr::string("Adult"),
            Expr::string("Minor"),
        );
        let mut counter = Counter(0);
        counter.visit(&expr);
        assert_eq!(counter.0, 6);
    }
}
