use tree_sitter::Node;

use crate::{
    UnsupportedKind,
    blank::{Visited, Walker, children, first_named, last_named},
    kind::{NodeKind, is_token},
};

impl Walker<'_, '_> {
    /// `expr;`. tree-sitter also wraps `namespace N {}` statements in one.
    pub(crate) fn visit_expression_statement(&mut self, node: Node<'_>) -> Visited {
        if let Some(inner) = first_named(node) {
            if matches!(
                NodeKind::of(inner),
                NodeKind::InternalModule | NodeKind::Module
            ) {
                return self.visit_module(inner, node);
            }
        }
        self.note_terminator(node);
        self.visit_children(node)
    }

    /// `let`, `const` and `var` statements.
    pub(crate) fn visit_variable_statement(&mut self, node: Node<'_>) -> Visited {
        self.note_terminator(node);
        self.visit_children(node)
    }

    /// `x!: T = v`
    pub(crate) fn visit_declarator(&mut self, node: Node<'_>) -> Visited {
        for child in children(node) {
            if is_token(child, "!") {
                self.blank_exact(child);
            } else if child.is_named() {
                self.visit(child);
            }
        }
        Visited::Js
    }

    /// `return …` and `throw …`.
    pub(crate) fn visit_return(&mut self, node: Node<'_>) -> Visited {
        self.note_terminator(node);
        let Some(arg) = first_named(node) else {
            return Visited::Js;
        };
        if NodeKind::of(arg) == NodeKind::TypeAssertion {
            self.visit_operand_cast(arg);
        } else {
            self.visit(arg);
        }
        Visited::Js
    }

    /// `return <T>expr`: the cast is erasable here, so it is not reported.
    ///
    /// A line break before the operand would leave the keyword alone on its line, so the list
    /// becomes ` 0,` instead of spaces. When ` 0,` cannot fit before that line break the cast is
    /// reported.
    fn visit_operand_cast(&mut self, cast: Node<'_>) {
        let mut cursor = cast.walk();
        let generics = cast
            .named_children(&mut cursor)
            .find(|c| NodeKind::of(*c) == NodeKind::TypeArguments);
        let expr = last_named(cast);
        let (Some(generics), Some(expr)) = (generics, expr) else {
            self.visit_children(cast);
            return;
        };

        let (start, end) = self.generics_range(generics);
        if !self.spans_lines(start, expr.start_byte()) {
            self.buf.blank(start, end);
        } else if self.fits_before_line_end(start, 3) {
            self.buf.blank_start_with_comma_operator(start, end);
        } else {
            self.report(UnsupportedKind::PrefixTypeAssertion, cast);
        }
        self.visit(expr);
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        UnsupportedKind,
        rules::testing::{blank, blank_reporting},
    };

    /// Type aliases and interfaces vanish, code around them stays put.
    #[test]
    fn type_declarations() {
        assert_eq!(
            blank("type A = string;\ninterface I {\n  a: A;\n}\nlet a = 1;\n"),
            "                \n             \n       \n \nlet a = 1;\n"
        );
    }

    /// After surviving code, an erased statement starts with `;`.
    #[test]
    fn erased_statement_after_code_gets_semicolon() {
        assert_eq!(
            blank("foo\ntype x = 1;\n(1);\n"),
            "foo\n;          \n(1);\n"
        );
        assert_eq!(
            blank("foo\ndeclare let x: number;\n(1);\n"),
            "foo\n;                     \n(1);\n"
        );
    }

    /// Blocks track surviving code on their own.
    #[test]
    fn blocks_reset_statement_state() {
        assert_eq!(
            blank("let a = 1;\n{\n  type T = 1;\n}\n"),
            "let a = 1;\n{\n             \n}\n"
        );
    }

    /// Ambient declarations are erased whole, enums included.
    #[test]
    fn ambient_declarations() {
        assert_eq!(blank("declare enum E1 {}\n"), "                  \n");
        assert_eq!(
            blank("declare const FOO: number;\ndeclare function f(): void;\n"),
            "                          \n                           \n"
        );
    }

    /// Function overloads without a body are erased.
    #[test]
    fn function_overloads() {
        assert_eq!(
            blank("function f(a: string): void;\nfunction f(a) {}\n"),
            "                            \nfunction f(a) {}\n"
        );
    }

    /// A prefix cast after `return` with a line break keeps the operand on the `return` line.
    #[test]
    fn return_cast_across_lines() {
        assert_eq!(
            blank("function f() { return<string>\n  \"x\"; }"),
            "function f() { return 0,     \n  \"x\"; }"
        );
        assert_eq!(
            blank("function f() { return <string>\"x\"; }"),
            "function f() { return         \"x\"; }"
        );
    }

    /// With the line break right after `<`, ` 0,` has no room and the cast is reported.
    #[test]
    fn return_cast_without_room_is_reported() {
        let src = "function f() { return<\n string>\n \"x\"; }";
        let (out, kinds) = blank_reporting(src);
        assert_eq!(out, src);
        assert_eq!(kinds, vec![UnsupportedKind::PrefixTypeAssertion]);
    }

    /// `catch` clause annotations are erased.
    #[test]
    fn catch_clause_annotation() {
        assert_eq!(
            blank("try {} catch (e: unknown) {}"),
            "try {} catch (e         ) {}"
        );
    }
}
