use tree_sitter::Node;

use crate::{
    UnsupportedKind,
    blank::{Visited, Walker, children, first_named, last_named},
    kind::{NodeKind, is_token},
};

impl Walker<'_, '_> {
    /// `expr as T`, `expr satisfies T`
    ///
    /// When the cast ends a statement that has no `;`, the erased range starts with `;` so the
    /// next line cannot continue the expression.
    pub(crate) fn visit_postfix_cast(&mut self, node: Node<'_>) -> Visited {
        // Checked before the operand, whose own statements move `missing_semi_pos`.
        let at_boundary = self.at_statement_end(node);
        self.erase_postfix_cast(node, at_boundary)
    }

    /// Visits the operand and erases the rest of the cast, starting with `;` when `terminate`.
    ///
    /// A type never continues across a line break before `[`. When the grammar read such a
    /// bracket into the cast's type, erasing stops before the break and the statement is
    /// terminated there.
    pub(crate) fn erase_postfix_cast(&mut self, node: Node<'_>, terminate: bool) -> Visited {
        let Some(expr) = first_named(node) else {
            return Visited::Js;
        };
        self.visit(expr);
        let (end, terminate) = match self.type_cut(node) {
            Some(cut) => (cut, true),
            None => (node.end_byte(), terminate),
        };
        if terminate {
            self.buf.blank_start_with_semi(expr.end_byte(), end);
        } else {
            self.buf.blank(expr.end_byte(), end);
        }
        Visited::Js
    }

    /// End of the type inside `cast` that precedes the earliest line-broken `[` of an indexed
    /// access or array type. `None` when there is no such bracket.
    pub(crate) fn type_cut(&self, cast: Node<'_>) -> Option<usize> {
        // `as const` has no type node.
        let ty = last_named(cast).filter(|ty| Some(*ty) != first_named(cast))?;
        let mut cut: Option<(usize, usize)> = None;
        let mut stack = vec![ty];
        while let Some(node) = stack.pop() {
            if matches!(node.kind(), "lookup_type" | "array_type")
                && let Some(object) = first_named(node)
                && let Some(bracket) = children(node).into_iter().find(|c| is_token(*c, "["))
                && self.spans_lines(object.end_byte(), bracket.start_byte())
                && cut.is_none_or(|(at, _)| bracket.start_byte() < at)
            {
                cut = Some((bracket.start_byte(), object.end_byte()));
            }
            let mut cursor = node.walk();
            stack.extend(node.named_children(&mut cursor));
        }
        cut.map(|(_, end)| end)
    }

    /// `f(…)` and `o[…]`. tree-sitter continues a cast across a line break into a call or an
    /// element access; the statement ends at the cast instead.
    pub(crate) fn visit_call_or_subscript(&mut self, node: Node<'_>) -> Visited {
        let kids = children(node)
            .into_iter()
            .filter(|c| !c.is_extra())
            .collect::<Vec<_>>();
        if let [target, next, ..] = kids[..]
            && matches!(
                NodeKind::of(target),
                NodeKind::AsExpression | NodeKind::SatisfiesExpression
            )
            && (next.kind() == "arguments" || is_token(next, "["))
            && self.spans_lines(target.end_byte(), next.start_byte())
        {
            tracing::debug!(start = target.start_byte(), "cast ends before a line break");
            self.erase_postfix_cast(target, true);
            let mut cursor = node.walk();
            let rest = node
                .named_children(&mut cursor)
                .filter(|c| *c != target)
                .collect::<Vec<_>>();
            for child in rest {
                self.visit(child);
            }
            return Visited::Js;
        }
        self.visit_children(node)
    }

    /// `` f<T>`x` ``. tree-sitter reads the type arguments of a tagged template as comparisons
    /// ending in `` > `x` ``; the `<…>` is re-scanned from the start of the comparison chain.
    pub(crate) fn visit_binary(&mut self, node: Node<'_>) -> Visited {
        let (Some(op), Some(right)) = (
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            return self.visit_children(node);
        };
        if !matches!(op.kind(), ">" | ">>" | ">>>") || right.kind() != "template_string" {
            return self.visit_children(node);
        }

        let from = comparison_chain_start(node);
        let Some(open) = self.scan.type_list_start(from, op.end_byte()) else {
            let after_comparison = node
                .child_by_field_name("left")
                .and_then(|left| left.child_by_field_name("operator"))
                .is_some_and(|lt| lt.kind() == "<");
            if after_comparison {
                self.report(UnsupportedKind::TemplateTypeArguments, node);
            }
            return self.visit_children(node);
        };

        let mut tag = node.child_by_field_name("left");
        while let Some(n) = tag.filter(|n| n.end_byte() > open) {
            tag = n.child_by_field_name("left");
        }
        if let Some(tag) = tag {
            self.visit(tag);
        }
        self.buf.blank(open, op.end_byte());
        self.visit(right);
        Visited::Js
    }

    /// `expr!`
    pub(crate) fn visit_non_null(&mut self, node: Node<'_>) -> Visited {
        if let Some(expr) = first_named(node) {
            self.visit(expr);
        }
        let end = node.end_byte();
        self.buf.blank(end.saturating_sub(1), end);
        Visited::Js
    }

    /// `<T>expr` outside the positions where it can be rewritten.
    pub(crate) fn visit_prefix_cast(&mut self, node: Node<'_>) -> Visited {
        self.report(UnsupportedKind::PrefixTypeAssertion, node);
        if let Some(expr) = last_named(node) {
            self.visit(expr);
        }
        Visited::Js
    }
}

/// Where the type arguments of a tagged template may start: the outermost comparison, sequence
/// or assignment around `node`, or the inside of the argument list or array holding it.
fn comparison_chain_start(node: Node<'_>) -> usize {
    let mut top = node;
    while let Some(parent) = top.parent().filter(|p| {
        matches!(
            p.kind(),
            "binary_expression" | "sequence_expression" | "assignment_expression"
        )
    }) {
        top = parent;
    }
    match top.parent() {
        Some(list) if matches!(list.kind(), "arguments" | "array") => list.start_byte() + 1,
        _ => top.start_byte(),
    }
}
