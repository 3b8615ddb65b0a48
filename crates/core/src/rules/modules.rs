use tree_sitter::Node;

use crate::{
    UnsupportedKind,
    blank::{Visited, Walker, children, first_named},
    kind::{NodeKind, is_token},
};

impl Walker<'_, '_> {
    /// `import …`
    pub(crate) fn visit_import(&mut self, node: Node<'_>) -> Visited {
        if token_after(node, "import").is_some_and(|t| is_token(t, "type")) {
            self.blank_statement(node);
            return Visited::Blank;
        }

        let mut cursor = node.walk();
        let named = node.named_children(&mut cursor).collect::<Vec<_>>();
        for child in named {
            match child.kind() {
                "import_require_clause" => {
                    self.report(UnsupportedKind::ImportRequire, node);
                    return Visited::Js;
                }
                "import_clause" => self.visit_import_clause(child),
                _ => {}
            }
        }
        Visited::Js
    }

    /// `{ type A, b }` loses `type A,`.
    fn visit_import_clause(&mut self, clause: Node<'_>) {
        let mut cursor = clause.walk();
        let Some(list) = clause
            .named_children(&mut cursor)
            .find(|c| c.kind() == "named_imports")
        else {
            return;
        };
        self.blank_type_specifiers(list);
    }

    /// `export …`
    pub(crate) fn visit_export(&mut self, node: Node<'_>) -> Visited {
        if let Some(next) = token_after(node, "export") {
            let type_error = next.is_error() && self.source.get(next.byte_range()) == Some("type");
            if is_token(next, "type") || is_token(next, "as") || type_error {
                // `export type { A }`, `export as namespace Lib`, `export type * from "m"`
                self.blank_statement(node);
                return Visited::Blank;
            }
            if is_token(next, "=") {
                self.report(UnsupportedKind::ExportAssignment, node);
                return Visited::Js;
            }
        }

        let declaration = node.child_by_field_name("declaration");
        if declaration.is_some_and(is_erasable_declaration) {
            self.blank_statement(node);
            return Visited::Blank;
        }

        let value = node.child_by_field_name("value");
        let mut cursor = node.walk();
        let named = node.named_children(&mut cursor).collect::<Vec<_>>();
        for child in named {
            if Some(child) == value {
                // `export default x as T`
                self.note_terminator(node);
                self.visit(child);
            } else if child.kind() == "export_clause" {
                self.blank_type_specifiers(child);
            } else if Some(child) == declaration
                || matches!(NodeKind::of(child), NodeKind::Decorator | NodeKind::Error)
            {
                self.visit(child);
            }
        }
        Visited::Js
    }

    fn blank_type_specifiers(&mut self, list: Node<'_>) {
        let mut cursor = list.walk();
        let specifiers = list.named_children(&mut cursor).collect::<Vec<_>>();
        for spec in specifiers {
            let leading = children(spec).into_iter().find(|c| !c.is_extra());
            if leading.is_some_and(|t| is_token(t, "type")) {
                self.blank_with_trailing_comma(spec, list);
            }
        }
    }

    /// `namespace N {}` and `module M {}` outside `declare`. `statement` is what gets erased when
    /// the module is type-only: the module itself or the statement wrapping it.
    pub(crate) fn visit_module(&mut self, node: Node<'_>, statement: Node<'_>) -> Visited {
        if is_type_only_module(node) {
            self.blank_statement(statement);
            return Visited::Blank;
        }
        let kind = match NodeKind::of(node) {
            NodeKind::Module => UnsupportedKind::LegacyModule,
            _ => UnsupportedKind::Namespace,
        };
        self.report(kind, node);
        Visited::Js
    }
}

/// The first non-comment child after the anonymous token `keyword`.
fn token_after<'t>(node: Node<'t>, keyword: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let mut kids = node.children(&mut cursor).filter(|c| !c.is_extra());
    kids.find(|c| is_token(*c, keyword))?;
    kids.next()
}

/// Declarations under `export` that leave nothing behind once erased.
fn is_erasable_declaration(decl: Node<'_>) -> bool {
    match NodeKind::of(decl) {
        kind if kind.is_type_declaration() => true,
        NodeKind::AmbientDeclaration | NodeKind::FunctionSignature => true,
        NodeKind::Module | NodeKind::InternalModule => is_type_only_module(decl),
        _ => false,
    }
}

/// A module whose erasure cannot remove runtime code.
///
/// String-named modules only ever declare types. A namespace qualifies when every statement in
/// its body does; anything else (`declare` included) counts as a value.
pub(crate) fn is_type_only_module(node: Node<'_>) -> bool {
    let name = node.child_by_field_name("name");
    if NodeKind::of(node) == NodeKind::Module {
        return name.is_some_and(|n| n.kind() == "string");
    }
    let Some(body) = node.child_by_field_name("body") else {
        return true;
    };
    let mut cursor = body.walk();
    body.named_children(&mut cursor)
        .all(statement_is_type_only)
}

fn statement_is_type_only(statement: Node<'_>) -> bool {
    match NodeKind::of(statement) {
        kind if kind.is_type_declaration() => true,
        NodeKind::Comment | NodeKind::ImportAlias => true,
        NodeKind::Module | NodeKind::InternalModule => is_type_only_module(statement),
        NodeKind::ExpressionStatement => first_named(statement).is_some_and(|inner| {
            matches!(
                NodeKind::of(inner),
                NodeKind::Module | NodeKind::InternalModule
            ) && is_type_only_module(inner)
        }),
        NodeKind::ExportStatement => {
            statement
                .child_by_field_name("declaration")
                .is_some_and(|decl| match NodeKind::of(decl) {
                    kind if kind.is_type_declaration() => true,
                    NodeKind::Module | NodeKind::InternalModule => is_type_only_module(decl),
                    _ => false,
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        UnsupportedKind,
        rules::testing::{blank, blank_reporting},
    };

    /// Whole type-only imports vanish, `type` specifiers go with their comma.
    #[test]
    fn type_imports() {
        assert_eq!(
            blank("import type { A } from \"a\";\nimport { type B, c, type D } from \"b\";\n"),
            "                           \nimport {         c,        } from \"b\";\n"
        );
    }

    /// Type-only exports and exported type declarations.
    #[test]
    fn type_exports() {
        assert_eq!(
            blank("export type { A };\nexport { type B, c };\nexport type T = 1;\nexport interface I {}\nexport declare const d: number;\n"),
            "                  \nexport {         c };\n;                 \n;                    \n;                              \n"
        );
    }

    /// `export type *` re-exports only types, with or without a namespace name.
    #[test]
    fn export_type_star() {
        assert_eq!(
            blank("export type * from \"m\";\nexport type * as ns from \"m\";\n"),
            "                       \n                             \n"
        );
        assert_eq!(
            blank("let a = 1;\nexport type * from \"m\";\n"),
            "let a = 1;\n;                      \n"
        );
    }

    /// `export as namespace` is a global declaration only.
    #[test]
    fn export_as_namespace() {
        assert_eq!(blank("export as namespace Lib;\n"), "                        \n");
    }

    /// `export default` keeps its value and loses a trailing cast.
    #[test]
    fn export_default_cast() {
        assert_eq!(
            blank("export default x as T\nlet y = 1;\n"),
            "export default x;    \nlet y = 1;\n"
        );
    }

    /// CommonJS-style forms are reported and left in place.
    #[test]
    fn legacy_module_forms() {
        let src = "import lib = require(\"lib\");\nimport B = N.B;\nexport = lib;\n";
        let (out, kinds) = blank_reporting(src);
        assert_eq!(out, src);
        assert_eq!(
            kinds,
            vec![
                UnsupportedKind::ImportRequire,
                UnsupportedKind::ImportAlias,
                UnsupportedKind::ExportAssignment,
            ]
        );
    }

    /// Namespaces holding only types are erased, nested ones included.
    #[test]
    fn type_only_namespace() {
        assert_eq!(
            blank("namespace N {\n  type A = 1;\n  export interface I {}\n  namespace M { type B = 2; }\n}\nlet x = 1;\n"),
            "             \n             \n                       \n                             \n \nlet x = 1;\n"
        );
    }

    /// Ambient and string-named modules are erased.
    #[test]
    fn ambient_modules() {
        assert_eq!(
            blank("declare module \"m\" {}\ndeclare global {}\ndeclare namespace D {}\n"),
            "                     \n                 \n                      \n"
        );
        assert_eq!(
            blank("module \"m\" { export type A = 1; }\n"),
            "                                 \n"
        );
    }

    /// Namespaces with runtime code are reported, never descended into.
    #[test]
    fn value_namespaces_are_reported() {
        let src = "namespace A { let x: number = 1; }\nnamespace B.C { export const y = 2; }\nmodule M {}\nexport namespace D { export function f() {} }\nnamespace E { declare const z: number; }\n";
        let (out, kinds) = blank_reporting(src);
        assert_eq!(out, src);
        assert_eq!(
            kinds,
            vec![
                UnsupportedKind::Namespace,
                UnsupportedKind::Namespace,
                UnsupportedKind::LegacyModule,
                UnsupportedKind::Namespace,
                UnsupportedKind::Namespace,
            ]
        );
    }

    /// Enums are reported, exported or not.
    #[test]
    fn enums_are_reported() {
        let src = "enum A { X }\nexport const enum B { Y }\n";
        let (out, kinds) = blank_reporting(src);
        assert_eq!(out, src);
        assert_eq!(kinds, vec![UnsupportedKind::Enum; 2]);
    }
}
