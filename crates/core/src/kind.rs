//! Node classification for the dispatcher.
//!
//! tree-sitter exposes node kinds as strings. The walk matches on [`NodeKind`] instead, so the
//! compiler checks that every kind the rules care about has an arm. Kinds not listed here map to
//! [`NodeKind::Other`] and are recursed into unchanged.

use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    StatementBlock,
    ExpressionStatement,
    /// `let` / `const`.
    LexicalDeclaration,
    /// `var`.
    VariableDeclaration,
    VariableDeclarator,
    ReturnStatement,
    ThrowStatement,

    InterfaceDeclaration,
    TypeAliasDeclaration,
    EnumDeclaration,
    /// `declare …`.
    AmbientDeclaration,
    /// A body-less function (overload).
    FunctionSignature,
    /// `module M {}` and `module "m" {}`.
    Module,
    /// `namespace N {}`.
    InternalModule,
    ImportStatement,
    ExportStatement,
    /// `import A = N.B`.
    ImportAlias,

    ClassDeclaration,
    AbstractClassDeclaration,
    /// Class expression.
    Class,
    ClassBody,
    ClassHeritage,
    PublicFieldDefinition,
    MethodSignature,
    AbstractMethodSignature,
    IndexSignature,
    ClassStaticBlock,
    Decorator,

    FunctionDeclaration,
    GeneratorFunctionDeclaration,
    FunctionExpression,
    GeneratorFunction,
    ArrowFunction,
    MethodDefinition,

    /// `: T`, `: asserts x`, `: x is T`.
    TypeAnnotation,
    TypeArguments,
    TypeParameters,
    AsExpression,
    SatisfiesExpression,
    NonNullExpression,
    /// Legacy prefix cast `<T>expr`.
    TypeAssertion,
    CallExpression,
    SubscriptExpression,
    BinaryExpression,

    /// A span the grammar could not parse.
    Error,

    Comment,
    HashBangLine,
    Other,
}

impl NodeKind {
    pub fn of(node: Node<'_>) -> Self {
        Self::from_kind(node.kind())
    }

    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "program" => NodeKind::Program,
            "statement_block" => NodeKind::StatementBlock,
            "expression_statement" => NodeKind::ExpressionStatement,
            "lexical_declaration" => NodeKind::LexicalDeclaration,
            "variable_declaration" => NodeKind::VariableDeclaration,
            "variable_declarator" => NodeKind::VariableDeclarator,
            "return_statement" => NodeKind::ReturnStatement,
            "throw_statement" => NodeKind::ThrowStatement,

            "interface_declaration" => NodeKind::InterfaceDeclaration,
            "type_alias_declaration" => NodeKind::TypeAliasDeclaration,
            "enum_declaration" => NodeKind::EnumDeclaration,
            "ambient_declaration" => NodeKind::AmbientDeclaration,
            "function_signature" => NodeKind::FunctionSignature,
            "module" => NodeKind::Module,
            "internal_module" => NodeKind::InternalModule,
            "import_statement" => NodeKind::ImportStatement,
            "export_statement" => NodeKind::ExportStatement,
            "import_alias" => NodeKind::ImportAlias,

            "class_declaration" => NodeKind::ClassDeclaration,
            "abstract_class_declaration" => NodeKind::AbstractClassDeclaration,
            "class" => NodeKind::Class,
            "class_body" => NodeKind::ClassBody,
            "class_heritage" => NodeKind::ClassHeritage,
            "public_field_definition" => NodeKind::PublicFieldDefinition,
            "method_signature" => NodeKind::MethodSignature,
            "abstract_method_signature" => NodeKind::AbstractMethodSignature,
            "index_signature" => NodeKind::IndexSignature,
            "class_static_block" => NodeKind::ClassStaticBlock,
            "decorator" => NodeKind::Decorator,

            "function_declaration" => NodeKind::FunctionDeclaration,
            "generator_function_declaration" => NodeKind::GeneratorFunctionDeclaration,
            "function_expression" | "function" => NodeKind::FunctionExpression,
            "generator_function" => NodeKind::GeneratorFunction,
            "arrow_function" => NodeKind::ArrowFunction,
            "method_definition" => NodeKind::MethodDefinition,

            "type_annotation" | "asserts_annotation" | "type_predicate_annotation" => {
                NodeKind::TypeAnnotation
            }
            "type_arguments" => NodeKind::TypeArguments,
            "type_parameters" => NodeKind::TypeParameters,
            "as_expression" => NodeKind::AsExpression,
            "satisfies_expression" => NodeKind::SatisfiesExpression,
            "non_null_expression" => NodeKind::NonNullExpression,
            "type_assertion" => NodeKind::TypeAssertion,
            "call_expression" => NodeKind::CallExpression,
            "subscript_expression" => NodeKind::SubscriptExpression,
            "binary_expression" => NodeKind::BinaryExpression,

            "ERROR" => NodeKind::Error,

            "comment" | "html_comment" => NodeKind::Comment,
            "hash_bang_line" => NodeKind::HashBangLine,
            _ => NodeKind::Other,
        }
    }

    /// Declarations that never produce runtime code.
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::InterfaceDeclaration | NodeKind::TypeAliasDeclaration
        )
    }

    /// Trivia that neither counts as code nor blocks statement detection.
    pub fn is_trivia(self) -> bool {
        matches!(self, NodeKind::Comment | NodeKind::HashBangLine)
    }
}

/// Erasable modifier tokens: visibility, `override`, `abstract`, `declare`, `readonly`.
pub fn is_type_modifier(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        "accessibility_modifier" | "override_modifier" | "abstract" | "declare" | "readonly"
    )
}

/// True for the anonymous token `text` (keywords and punctuation).
pub fn is_token(node: Node<'_>, text: &str) -> bool {
    !node.is_named() && node.kind() == text
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Known kinds map to their variant, everything else is `Other`.
    #[test]
    fn classifies_kind_strings() {
        assert_eq!(NodeKind::from_kind("interface_declaration"), NodeKind::InterfaceDeclaration);
        assert_eq!(NodeKind::from_kind("asserts_annotation"), NodeKind::TypeAnnotation);
        assert_eq!(NodeKind::from_kind("ERROR"), NodeKind::Error);
        assert_eq!(NodeKind::from_kind("member_expression"), NodeKind::Other);
        assert!(NodeKind::from_kind("type_alias_declaration").is_type_declaration());
        assert!(!NodeKind::from_kind("enum_declaration").is_type_declaration());
    }
}
