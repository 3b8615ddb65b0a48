use tree_sitter::Node;

use crate::{
    blank::{Visited, Walker, children},
    kind::{NodeKind, is_token, is_type_modifier},
    rules::recovery::declares_class,
};

impl Walker<'_, '_> {
    /// Class declarations and expressions.
    pub(crate) fn visit_class(&mut self, node: Node<'_>) -> Visited {
        if declares_class(self.source, node) {
            // `@dec declare class C {}`
            self.blank_statement(node);
            return Visited::Blank;
        }
        for child in children(node) {
            match NodeKind::of(child) {
                NodeKind::TypeParameters => self.blank_generics(child),
                NodeKind::ClassHeritage => {
                    self.visit_heritage(child);
                }
                NodeKind::ClassBody => {
                    self.visit_class_body(child);
                }
                _ if is_token(child, "abstract") => self.blank_exact(child),
                _ if child.is_named() => {
                    self.visit(child);
                }
                _ => {}
            }
        }
        Visited::Js
    }

    /// `extends` stays (its type arguments go), `implements` goes entirely.
    pub(crate) fn visit_heritage(&mut self, node: Node<'_>) -> Visited {
        let mut cursor = node.walk();
        let clauses = node.named_children(&mut cursor).collect::<Vec<_>>();
        for clause in clauses {
            if clause.kind() == "implements_clause" {
                self.blank_exact(clause);
            } else {
                self.visit(clause);
            }
        }
        Visited::Js
    }

    /// Class members.
    ///
    /// A field without `;` followed by a member whose first token is erased would let the field's
    /// initializer run into the next member (`a = 1\n public ["b"]() {}`), so that token becomes
    /// `;`.
    pub(crate) fn visit_class_body(&mut self, body: Node<'_>) -> Visited {
        let saved = self.missing_semi_pos.take();
        let members = {
            let mut cursor = body.walk();
            body.named_children(&mut cursor).collect::<Vec<_>>()
        };

        let mut open_field = false;
        for member in members {
            match NodeKind::of(member) {
                NodeKind::Comment => {}
                NodeKind::PublicFieldDefinition => {
                    self.visit_field(member, open_field);
                    open_field = !followed_by_semicolon(member);
                }
                NodeKind::MethodSignature
                | NodeKind::AbstractMethodSignature
                | NodeKind::IndexSignature => {
                    self.blank_member(member, open_field);
                    open_field = false;
                }
                NodeKind::MethodDefinition => {
                    if open_field {
                        self.terminate_at_modifier(member);
                    }
                    self.visit(member);
                    open_field = false;
                }
                _ => {
                    self.visit(member);
                    open_field = false;
                }
            }
        }

        self.missing_semi_pos = saved;
        Visited::Js
    }

    /// Class fields: `declare`/`abstract` fields vanish, others lose modifiers, markers and type.
    pub(crate) fn visit_field(&mut self, field: Node<'_>, open_field: bool) -> Visited {
        let kids = children(field);
        if kids
            .iter()
            .any(|c| is_token(*c, "declare") || is_token(*c, "abstract"))
        {
            self.blank_member(field, open_field);
            return Visited::Blank;
        }

        if !followed_by_semicolon(field) {
            self.missing_semi_pos = Some(field.end_byte());
        }
        let mut leading = true;
        for child in kids {
            if child.is_extra() {
                continue;
            }
            if is_type_modifier(child) {
                if leading && open_field {
                    self.buf
                        .blank_start_with_semi(child.start_byte(), child.end_byte());
                } else {
                    self.blank_exact(child);
                }
            } else if is_token(child, "?") || is_token(child, "!") {
                self.blank_exact(child);
            } else if child.is_named() {
                self.visit(child);
            }
            leading = false;
        }
        Visited::Js
    }

    fn blank_member(&mut self, member: Node<'_>, open_field: bool) {
        if open_field {
            self.buf
                .blank_start_with_semi(member.start_byte(), member.end_byte());
        } else {
            self.blank_exact(member);
        }
    }

    /// Turns an erased leading modifier into `;`. The method rule erases the same token later;
    /// that op is swallowed by this one.
    fn terminate_at_modifier(&mut self, member: Node<'_>) {
        let mut cursor = member.walk();
        let first = member.children(&mut cursor).find(|c| !c.is_extra());
        if let Some(first) = first.filter(|c| is_type_modifier(*c)) {
            self.buf
                .blank_start_with_semi(first.start_byte(), first.end_byte());
        }
    }
}

/// Whether the next non-comment sibling is `;`.
fn followed_by_semicolon(node: Node<'_>) -> bool {
    let mut next = node.next_sibling();
    while let Some(sibling) = next {
        if !sibling.is_extra() {
            return sibling.kind() == ";";
        }
        next = sibling.next_sibling();
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::blank;

    /// Class generics are erased.
    #[test]
    fn class_generics() {
        assert_eq!(blank("class C<T> {}"), "class C    {}");
    }

    /// `implements` goes, `extends` keeps its expression.
    #[test]
    fn heritage() {
        assert_eq!(
            blank("class A extends B<string> implements I, J {}"),
            "class A extends B                         {}"
        );
    }

    /// Abstract classes lose `abstract`, abstract members and signatures.
    #[test]
    fn abstract_class() {
        assert_eq!(
            blank("abstract class A {\n  abstract m(): void;\n  abstract x: number;\n  n() {}\n}"),
            "         class A {\n                    ;\n                    ;\n  n() {}\n}"
        );
    }

    /// Field modifiers, markers, types and `declare` fields.
    #[test]
    fn fields() {
        assert_eq!(
            blank("class A {\n  private readonly x?: number = 1;\n  y!: string;\n  declare z: number;\n  static w = 2;\n}"),
            "class A {\n                   x          = 1;\n  y         ;\n                   ;\n  static w = 2;\n}"
        );
    }

    /// Index signatures and overloads in a class body.
    #[test]
    fn signatures() {
        assert_eq!(
            blank("class A {\n  [k: string]: any;\n  m(a: string): void;\n  m(a) {}\n}"),
            "class A {\n                  ;\n                    ;\n  m(a) {}\n}"
        );
    }

    /// An erased leading modifier after an unterminated field becomes `;`.
    #[test]
    fn open_field_before_erased_modifier() {
        assert_eq!(
            blank("class A {\n  g = 2\n  public [\"k\"] = 1\n  h = 3\n  public [\"m\"]() {}\n}"),
            "class A {\n  g = 2\n  ;      [\"k\"] = 1\n  h = 3\n  ;      [\"m\"]() {}\n}"
        );
    }

    /// A kept leading modifier needs nothing.
    #[test]
    fn open_field_before_static() {
        assert_eq!(
            blank("class A {\n  f = 1\n  static readonly [\"k\"] = 1\n}"),
            "class A {\n  f = 1\n  static          [\"k\"] = 1\n}"
        );
    }

    /// Decorators stay and lose their type arguments.
    #[test]
    fn decorators() {
        assert_eq!(
            blank("@Object.freeze\nclass C {\n  @dec<T>() private m() {}\n}"),
            "@Object.freeze\nclass C {\n  @dec   ()         m() {}\n}"
        );
    }
}
