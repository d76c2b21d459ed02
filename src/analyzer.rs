use crate::ast::{Builtin, Node, Operator, Program, Type};
use crate::diagnostics::Diagnostic;
use crate::symbol_table::{Symbol, SymbolTable};
use crate::token::Position;

/// Static semantic pass: declaration and type checks over the AST with a
/// fresh scoped symbol table, run before any side effect can happen.
///
/// The pass never aborts; every problem is recorded so one run can surface
/// multiple errors. A sub-expression that fails to type becomes "unknown"
/// (`None`) and propagates upward without producing secondary diagnostics.
pub struct Analyzer {
    table: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn analyze(&mut self, program: &Program) {
        for statement in &program.statements {
            self.check_statement(statement);
        }
    }

    pub fn errors_detected(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn check_statement(&mut self, statement: &Node) {
        match statement {
            Node::Expression {
                position,
                op: Operator::Init,
                left,
                right,
            } => self.check_declaration(*position, left, right.as_deref()),
            Node::Expression {
                position,
                op: Operator::Assign,
                left,
                right,
            } => self.check_assignment(*position, left, right.as_deref()),
            Node::ForLoop {
                position,
                iterator,
                start,
                end,
                body,
            } => self.check_for_loop(*position, iterator, start, end, body),
            Node::Function {
                position,
                builtin,
                parameter,
            } => self.check_function(*position, *builtin, parameter),
            // The parser only produces the statement forms above.
            _ => {}
        }
    }

    fn check_declaration(&mut self, position: Position, left: &Node, right: Option<&Node>) {
        let Node::Variable {
            name,
            declared_type: Some(declared_type),
            ..
        } = left
        else {
            return;
        };

        if self.table.contains(name) {
            self.report(
                position,
                format!("Variable {name} already defined in this scope!"),
            );
            return;
        }

        if let Some(initializer) = right
            && let Some(found) = self.expression_type(initializer)
            && found != *declared_type
        {
            self.report(
                position,
                format!(
                    "Cannot initialize variable {name} of type {declared_type} with a {found} value!"
                ),
            );
        }

        // Insert even after a failed initializer so later uses of the name
        // don't cascade into spurious undeclared-variable errors.
        self.table.declare(Symbol::new(
            name.clone(),
            *declared_type,
            declared_type.default_value(),
            self.table.current_scope(),
        ));
    }

    fn check_assignment(&mut self, position: Position, left: &Node, right: Option<&Node>) {
        let Node::Variable { name, .. } = left else {
            return;
        };

        let declared_type = match self.table.lookup(name) {
            Some(symbol) => Some(symbol.declared_type),
            None => {
                self.report(position, format!("Variable {name} has not been declared!"));
                None
            }
        };

        let Some(value) = right else {
            return;
        };
        if let Some(found) = self.expression_type(value)
            && let Some(declared_type) = declared_type
            && found != declared_type
        {
            self.report(
                position,
                format!(
                    "Cannot assign a {found} value to variable {name} of type {declared_type}!"
                ),
            );
        }
    }

    fn check_for_loop(
        &mut self,
        position: Position,
        iterator: &Node,
        start: &Node,
        end: &Node,
        body: &[Node],
    ) {
        if let Node::Variable { name, .. } = iterator
            && !self.table.contains(name)
        {
            self.report(position, format!("Variable {name} has not been declared!"));
        }

        for bound in [start, end] {
            if let Some(found) = self.expression_type(bound)
                && found != Type::Int
            {
                self.report(
                    bound.position(),
                    format!("For-loop bounds must be int, got {found}!"),
                );
            }
        }

        self.table.add_scope();
        for statement in body {
            self.check_statement(statement);
        }
        self.table.remove_scope();
    }

    fn check_function(&mut self, position: Position, builtin: Builtin, parameter: &Node) {
        match builtin {
            Builtin::Read => {
                if let Node::Variable { name, .. } = parameter
                    && !self.table.contains(name)
                {
                    self.report(position, format!("Variable {name} has not been declared!"));
                }
            }
            Builtin::Print => {
                // Any well-typed expression may be printed.
                self.expression_type(parameter);
            }
            Builtin::Assert => {
                if let Some(found) = self.expression_type(parameter)
                    && found != Type::Bool
                {
                    self.report(
                        position,
                        format!("Assert expects a bool expression, got {found}!"),
                    );
                }
            }
        }
    }

    /// Computes the static type of an expression, or `None` when a
    /// sub-expression already failed. Each mismatch is reported exactly once.
    fn expression_type(&mut self, node: &Node) -> Option<Type> {
        match node {
            Node::Integer { .. } => Some(Type::Int),
            Node::String { .. } => Some(Type::String),
            Node::Variable { position, name, .. } => match self.table.lookup(name) {
                Some(symbol) => Some(symbol.declared_type),
                None => {
                    self.report(*position, format!("Variable {name} has not been declared!"));
                    None
                }
            },
            Node::Not { position, child } => match self.expression_type(child)? {
                Type::Bool => Some(Type::Bool),
                found => {
                    self.report(
                        *position,
                        format!("Operator ! expects a bool operand, got {found}!"),
                    );
                    None
                }
            },
            Node::Expression {
                position,
                op,
                left,
                right,
            } => {
                let left_type = self.expression_type(left);
                let right_type = right.as_deref().and_then(|node| self.expression_type(node));
                let (left_type, right_type) = (left_type?, right_type?);
                self.binary_type(*position, *op, left_type, right_type)
            }
            Node::ForLoop { .. } | Node::Function { .. } => None,
        }
    }

    fn binary_type(
        &mut self,
        position: Position,
        op: Operator,
        left: Type,
        right: Type,
    ) -> Option<Type> {
        let result = match op {
            Operator::And => (left == Type::Bool && right == Type::Bool).then_some(Type::Bool),
            Operator::Equal | Operator::Less => (left == right).then_some(Type::Bool),
            Operator::Add => {
                (left == right && left != Type::Bool).then_some(left)
            }
            Operator::Sub | Operator::Mul | Operator::Div => {
                (left == Type::Int && right == Type::Int).then_some(Type::Int)
            }
            // Init and Assign never occur inside expressions.
            Operator::Init | Operator::Assign => None,
        };
        if result.is_none() {
            self.report(
                position,
                format!("Operator {op} cannot be applied to types {left} and {right}!"),
            );
        }
        result
    }

    fn report(&mut self, position: Position, message: String) {
        self.diagnostics.push(Diagnostic::semantic(position, message));
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
