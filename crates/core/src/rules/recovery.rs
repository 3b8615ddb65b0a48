//! Parse errors.
//!
//! tree-sitter-typescript rejects a few valid TypeScript forms (type arguments and casts on
//! decorators, `export type *`, decorators ahead of `declare class`, some tagged template type
//! arguments) and wraps them in `ERROR` nodes. Those shapes are recognized here and erased. Every other `ERROR` or missing node is
//! reported as [`UnsupportedKind::ParseError`] and its text is left as written.

use tree_sitter::Node;

use crate::{
    UnsupportedKind,
    blank::{Visited, Walker, children, first_named},
    kind::{NodeKind, is_token},
};

/// An `ERROR` node the walk knows how to erase.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Recovery<'t> {
    /// `@dec<T>`: a type argument list after a decorator expression.
    DecoratorGenerics(Node<'t>),
    /// `@(dec as T)`: a cast inside a decorator's parentheses.
    DecoratorCast,
    /// Decorators the grammar could not attach to the statement that follows them.
    Decorators,
    /// `type` in `export type * from "m"`. The export statement is erased.
    ExportType,
    /// `declare` on a decorated class. The class is erased.
    DeclareClass,
    /// ``f<A, B>`x` ``: an instantiation the grammar could not attach to the template after it.
    TemplateGenerics(Node<'t>),
}

impl<'t> Recovery<'t> {
    pub(crate) fn of(source: &str, node: Node<'t>) -> Option<Self> {
        let kids = children(node)
            .into_iter()
            .filter(|c| !c.is_extra())
            .collect::<Vec<_>>();
        let first = *kids.first()?;
        let text = source.get(node.byte_range()).unwrap_or_default();
        let parent = node.parent().map(NodeKind::of);

        if let [list] = kids[..]
            && NodeKind::of(list) == NodeKind::TypeArguments
            && (follows_decorator(node) || inside_decorator(node))
        {
            return Some(Recovery::DecoratorGenerics(list));
        }
        if let [instantiation] = kids[..]
            && instantiation.kind() == "instantiation_expression"
            && source
                .get(node.end_byte()..)
                .is_some_and(|rest| rest.trim_start().starts_with('`'))
        {
            return Some(Recovery::TemplateGenerics(instantiation));
        }
        if (is_token(first, "@") || NodeKind::of(first) == NodeKind::Decorator)
            && kids.iter().all(|k| !k.is_named() || is_decorator_part(*k))
        {
            return Some(Recovery::Decorators);
        }
        let keyword = source.get(first.byte_range()).unwrap_or_default();
        if matches!(keyword, "as" | "satisfies") && inside_decorator(node) {
            return Some(Recovery::DecoratorCast);
        }
        match (text, parent) {
            ("type", Some(NodeKind::ExportStatement)) => Some(Recovery::ExportType),
            ("declare", Some(NodeKind::ClassDeclaration)) => Some(Recovery::DeclareClass),
            _ => None,
        }
    }
}

impl Walker<'_, '_> {
    /// Reports every `ERROR` and missing node that no recovery covers.
    ///
    /// A line break before `[` ends a cast's type (see `type_cut`). When the grammar
    /// instead read the following line as an index type, it leaves a missing `]` in that type and
    /// a stray `]` after it. Both are expected and stay quiet.
    pub(crate) fn report_syntax_errors(&mut self, root: Node<'_>) {
        if !root.has_error() {
            return;
        }
        let mut open_cut_brackets = 0usize;
        let mut cursor = root.walk();
        'walk: loop {
            let node = cursor.node();
            let mut descend = true;
            if node.is_missing() {
                if is_token(node, "]") && self.in_cut_index_type(node) {
                    open_cut_brackets += 1;
                } else if !is_template_instantiation_bang(node) {
                    self.report(UnsupportedKind::ParseError, node);
                }
            } else if node.is_error() {
                descend = false;
                let stray_bracket = self.source.get(node.byte_range()) == Some("]");
                if stray_bracket && open_cut_brackets > 0 {
                    open_cut_brackets -= 1;
                } else if Recovery::of(self.source, node).is_none() {
                    self.report(UnsupportedKind::ParseError, node);
                }
            }

            if descend && cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
            }
        }
    }

    /// Whether `bracket` closes an index type that a cast's type cut leaves in the output.
    fn in_cut_index_type(&self, bracket: Node<'_>) -> bool {
        let Some(index_type) = bracket.parent() else {
            return false;
        };
        let mut ancestor = index_type.parent();
        while let Some(node) = ancestor {
            if matches!(
                NodeKind::of(node),
                NodeKind::AsExpression | NodeKind::SatisfiesExpression
            ) {
                return self
                    .type_cut(node)
                    .is_some_and(|cut| index_type.byte_range().contains(&cut));
            }
            ancestor = node.parent();
        }
        false
    }

    /// An `ERROR` node met by the walk. Unrecoverable ones were reported up front.
    pub(crate) fn visit_error(&mut self, node: Node<'_>) -> Visited {
        match Recovery::of(self.source, node) {
            Some(Recovery::DecoratorGenerics(list)) => {
                self.blank_generics(list);
                Visited::Blank
            }
            Some(Recovery::DecoratorCast) => {
                self.blank_exact(node);
                Visited::Blank
            }
            Some(Recovery::Decorators) => self.visit_stray_decorators(node),
            Some(Recovery::ExportType | Recovery::DeclareClass) => Visited::Blank,
            Some(Recovery::TemplateGenerics(instantiation)) => self.visit(instantiation),
            None => Visited::Js,
        }
    }

    /// `@dec declare class C {}`: the grammar leaves the decorators in an `ERROR` ahead of the
    /// statement. An erased statement takes its decorators along; otherwise only their type
    /// arguments go.
    fn visit_stray_decorators(&mut self, node: Node<'_>) -> Visited {
        let mut next = node.next_named_sibling();
        while let Some(sibling) = next.filter(|n| NodeKind::of(*n).is_trivia()) {
            next = sibling.next_named_sibling();
        }
        if let Some(statement) = next.filter(|n| erased_with_decorators(self.source, *n)) {
            self.blank_statement_span(node.start_byte(), statement.end_byte());
            return Visited::Blank;
        }

        let mut cursor = node.walk();
        let named = node.named_children(&mut cursor).collect::<Vec<_>>();
        for child in named {
            if NodeKind::of(child) == NodeKind::TypeArguments {
                self.blank_generics(child);
            } else {
                self.visit(child);
            }
        }
        Visited::Js
    }
}

/// ``f<A, N.B<C>>`x` `` parses as a call of `f<…>!` with the `!` missing. The walk erases the
/// type arguments and the empty `!` alike.
fn is_template_instantiation_bang(node: Node<'_>) -> bool {
    is_token(node, "!")
        && node.parent().is_some_and(|bang| {
            NodeKind::of(bang) == NodeKind::NonNullExpression
                && first_named(bang).is_some_and(|e| e.kind() == "instantiation_expression")
        })
}

/// Statements that leave nothing behind, so decorators in front of them go too.
fn erased_with_decorators(source: &str, statement: Node<'_>) -> bool {
    match NodeKind::of(statement) {
        NodeKind::AmbientDeclaration => true,
        NodeKind::ClassDeclaration => declares_class(source, statement),
        _ => false,
    }
}

/// Whether a class carries a `declare` keyword the grammar could not place.
pub(crate) fn declares_class(source: &str, class: Node<'_>) -> bool {
    children(class)
        .into_iter()
        .any(|c| c.is_error() && source.get(c.byte_range()) == Some("declare"))
}

/// Kinds a decorator the grammar could not attach is made of.
fn is_decorator_part(node: Node<'_>) -> bool {
    matches!(
        NodeKind::of(node),
        NodeKind::Decorator | NodeKind::TypeArguments | NodeKind::CallExpression
    ) || matches!(
        node.kind(),
        "identifier" | "member_expression" | "parenthesized_expression" | "arguments"
    ) || NodeKind::of(node).is_trivia()
}

fn follows_decorator(node: Node<'_>) -> bool {
    let mut prev = node.prev_sibling();
    while let Some(sibling) = prev.filter(|n| n.is_extra()) {
        prev = sibling.prev_sibling();
    }
    prev.is_some_and(|p| NodeKind::of(p) == NodeKind::Decorator)
}

fn inside_decorator(node: Node<'_>) -> bool {
    let mut ancestor = node.parent();
    while let Some(n) = ancestor {
        if NodeKind::of(n) == NodeKind::Decorator {
            return true;
        }
        ancestor = n.parent();
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::{
        BlankError, Dialect, UnsupportedKind, blank_space_strict,
        rules::testing::{blank, blank_reporting},
    };

    /// Type arguments after a decorator expression are erased wherever the decorator sits.
    #[test]
    fn decorator_type_arguments() {
        assert_eq!(
            blank("@Object.freeze<any>export class B {}"),
            "@Object.freeze     export class B {}"
        );
        assert_eq!(
            blank("@(Object.freeze<any>) class D {}"),
            "@(Object.freeze     ) class D {}"
        );
        assert_eq!(
            blank("class E {\n  @dec<any>\n  field;\n  @dec<any>\n  private m() {}\n}"),
            "class E {\n  @dec     \n  field;\n  @dec     \n          m() {}\n}"
        );
    }

    /// A cast inside a decorator's parentheses is erased.
    #[test]
    fn decorator_cast() {
        assert_eq!(
            blank("@(Object.freeze as any)\nclass A {}"),
            "@(Object.freeze       )\nclass A {}"
        );
    }

    /// A decorated `declare class` goes away with its decorators.
    #[test]
    fn decorated_declare_class() {
        assert_eq!(
            blank("@dec declare class D {}\n"),
            "                       \n"
        );
        assert_eq!(
            blank("@(Object.freeze<any>) declare class D {}\n"),
            "                                        \n"
        );
        assert_eq!(
            blank("x;\n@(f as any) declare class D {}\n"),
            "x;\n;                             \n"
        );
    }

    /// Syntax the grammar cannot parse is reported and left as written.
    #[test]
    fn parse_errors_are_reported() {
        let (out, kinds) = blank_reporting("let a = ;");
        assert_eq!(out, "let a = ;");
        assert_eq!(kinds, vec![UnsupportedKind::ParseError]);

        let src = "class ASI {\n    f = 1 as number/*trailing*/\n    [\"method\"]() {}\n}";
        let (out, kinds) = blank_reporting(src);
        assert_eq!(out, src);
        assert_eq!(kinds, vec![UnsupportedKind::ParseError]);
    }

    /// Strict callers fail on a parse error, with diagnostics in source order.
    #[test]
    fn strict_fails_on_parse_error() {
        let err = blank_space_strict("enum E {}\nlet a = ;\n", Dialect::TypeScript).unwrap_err();
        let BlankError::Unsupported { diagnostics } = err else {
            panic!("expected unsupported error, got {err:?}");
        };
        let kinds = diagnostics.iter().map(|d| d.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![UnsupportedKind::Enum, UnsupportedKind::ParseError]
        );
    }
}
