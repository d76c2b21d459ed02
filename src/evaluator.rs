//! Tree-walking evaluator.
//!
//! Executes checked statements in order against a fresh symbol table. All
//! values travel as text tagged with their static type (`Evaluated`), so the
//! symbol table stores one uniform value representation and `+`/`<` dispatch
//! on the operand type. The first runtime fault is recorded as a `Runtime`
//! diagnostic and execution stops.

use std::io::{BufRead, Write};

use crate::ast::{Builtin, Node, Operator, Program, Type};
use crate::diagnostics::Diagnostic;
use crate::symbol_table::{Symbol, SymbolTable};
use crate::token::Position;

mod error;
mod value;

pub use error::RuntimeError;

use value::{Evaluated, parse_int};

type EvalResult<T> = Result<T, Diagnostic>;

pub struct Evaluator<R, W> {
    table: SymbolTable,
    input: R,
    output: W,
    diagnostic: Option<Diagnostic>,
}

impl<R: BufRead, W: Write> Evaluator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            table: SymbolTable::new(),
            input,
            output,
            diagnostic: None,
        }
    }

    /// Runs the program. Only called when parsing and analysis reported no
    /// errors; the first runtime fault stops execution.
    pub fn execute(&mut self, program: &Program) {
        for statement in &program.statements {
            if let Err(diagnostic) = self.exec_statement(statement) {
                self.diagnostic = Some(diagnostic);
                return;
            }
        }
    }

    pub fn errors_detected(&self) -> bool {
        self.diagnostic.is_some()
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_ref()
    }

    fn exec_statement(&mut self, statement: &Node) -> EvalResult<()> {
        match statement {
            Node::Expression {
                op: Operator::Init,
                left,
                right,
                ..
            } => self.exec_declaration(left, right.as_deref()),
            Node::Expression {
                op: Operator::Assign,
                left,
                right,
                ..
            } => self.exec_assignment(left, right.as_deref()),
            Node::ForLoop {
                iterator,
                start,
                end,
                body,
                ..
            } => self.exec_for_loop(iterator, start, end, body),
            Node::Function {
                position,
                builtin,
                parameter,
            } => self.exec_function(*position, *builtin, parameter),
            _ => Ok(()),
        }
    }

    fn exec_declaration(&mut self, left: &Node, right: Option<&Node>) -> EvalResult<()> {
        let Node::Variable {
            name,
            declared_type: Some(declared_type),
            ..
        } = left
        else {
            return Ok(());
        };
        let value = match right {
            Some(initializer) => self.eval_expression(initializer)?.text,
            None => declared_type.default_value().to_string(),
        };
        self.table.declare(Symbol::new(
            name.clone(),
            *declared_type,
            value,
            self.table.current_scope(),
        ));
        Ok(())
    }

    fn exec_assignment(&mut self, left: &Node, right: Option<&Node>) -> EvalResult<()> {
        let Node::Variable { name, .. } = left else {
            return Ok(());
        };
        let Some(value) = right else {
            return Ok(());
        };
        let value = self.eval_expression(value)?;
        self.table.update(name, value.text);
        Ok(())
    }

    /// Runs the body once for every value from `start` to `end` inclusive,
    /// updating the iterator symbol before each pass. The last update is the
    /// final iteration's, so afterwards the iterator reads `end`; an empty
    /// range leaves it untouched.
    fn exec_for_loop(
        &mut self,
        iterator: &Node,
        start: &Node,
        end: &Node,
        body: &[Node],
    ) -> EvalResult<()> {
        let Node::Variable { name, .. } = iterator else {
            return Ok(());
        };
        let start_value = self.eval_int(start)?;
        let end_value = self.eval_int(end)?;

        self.table.add_scope();
        let result = self.run_for_loop(name, start_value, end_value, body);
        self.table.remove_scope();
        result
    }

    fn run_for_loop(
        &mut self,
        name: &str,
        start_value: i64,
        end_value: i64,
        body: &[Node],
    ) -> EvalResult<()> {
        let mut current = start_value;
        while current <= end_value {
            self.table.update(name, current.to_string());
            for statement in body {
                self.exec_statement(statement)?;
            }
            if current == end_value {
                break;
            }
            current += 1;
        }
        Ok(())
    }

    fn exec_function(
        &mut self,
        position: Position,
        builtin: Builtin,
        parameter: &Node,
    ) -> EvalResult<()> {
        match builtin {
            Builtin::Read => self.exec_read(position, parameter),
            Builtin::Print => {
                let value = self.eval_expression(parameter)?;
                self.write_output(position, &value.text)
            }
            Builtin::Assert => {
                let value = self.eval_expression(parameter)?;
                if !value.is_true() {
                    self.write_output(position, "Expected the result to be true. Got false\n")?;
                }
                Ok(())
            }
        }
    }

    fn exec_read(&mut self, position: Position, parameter: &Node) -> EvalResult<()> {
        let Node::Variable { name, .. } = parameter else {
            return Ok(());
        };

        let mut line = String::new();
        self.input.read_line(&mut line).map_err(|error| {
            fault(
                position,
                RuntimeError::Input {
                    message: error.to_string(),
                },
            )
        })?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }

        let declared_type = self.variable(name, position)?.declared_type;
        match declared_type {
            Type::Int => {
                let value: i64 = line
                    .trim()
                    .parse()
                    .map_err(|_| fault(position, RuntimeError::InputNotInt))?;
                self.table.update(name, value.to_string());
            }
            Type::Bool => return Err(fault(position, RuntimeError::InputNotBool)),
            Type::String => self.table.update(name, line),
        }
        Ok(())
    }

    fn eval_expression(&mut self, node: &Node) -> EvalResult<Evaluated> {
        match node {
            Node::Integer { position, lexeme } => parse_int(lexeme)
                .map(Evaluated::int)
                .map_err(|error| fault(*position, error)),
            Node::String { value, .. } => Ok(Evaluated::string(value.clone())),
            Node::Variable { position, name, .. } => {
                let symbol = self.variable(name, *position)?;
                Ok(Evaluated {
                    ty: symbol.declared_type,
                    text: symbol.value.clone(),
                })
            }
            Node::Not { child, .. } => {
                let value = self.eval_expression(child)?;
                Ok(Evaluated::bool_value(!value.is_true()))
            }
            Node::Expression {
                position,
                op,
                left,
                right,
            } => {
                let left = self.eval_expression(left)?;
                let Some(right) = right.as_deref() else {
                    return Ok(left);
                };
                let right = self.eval_expression(right)?;
                self.apply_binary(*position, *op, left, right)
            }
            Node::ForLoop { .. } | Node::Function { .. } => Ok(Evaluated::string("")),
        }
    }

    fn apply_binary(
        &mut self,
        position: Position,
        op: Operator,
        left: Evaluated,
        right: Evaluated,
    ) -> EvalResult<Evaluated> {
        let value = match op {
            Operator::And => Evaluated::bool_value(left.is_true() && right.is_true()),
            Operator::Equal => Evaluated::bool_value(left.text == right.text),
            Operator::Less => {
                // Ints compare numerically; strings and booleans fall back to
                // the lexicographic order of their text ("false" < "true").
                if left.ty == Type::Int {
                    let (a, b) = self.int_operands(position, &left, &right)?;
                    Evaluated::bool_value(a < b)
                } else {
                    Evaluated::bool_value(left.text < right.text)
                }
            }
            Operator::Add => {
                if left.ty == Type::String {
                    Evaluated::string(left.text + &right.text)
                } else {
                    let (a, b) = self.int_operands(position, &left, &right)?;
                    let sum = a
                        .checked_add(b)
                        .ok_or_else(|| fault(position, RuntimeError::IntegerOverflow))?;
                    Evaluated::int(sum)
                }
            }
            Operator::Sub => {
                let (a, b) = self.int_operands(position, &left, &right)?;
                let difference = a
                    .checked_sub(b)
                    .ok_or_else(|| fault(position, RuntimeError::IntegerOverflow))?;
                Evaluated::int(difference)
            }
            Operator::Mul => {
                let (a, b) = self.int_operands(position, &left, &right)?;
                let product = a
                    .checked_mul(b)
                    .ok_or_else(|| fault(position, RuntimeError::IntegerOverflow))?;
                Evaluated::int(product)
            }
            Operator::Div => {
                let (a, b) = self.int_operands(position, &left, &right)?;
                if b == 0 {
                    return Err(fault(position, RuntimeError::DivisionByZero));
                }
                // Truncates toward zero; i64::MIN / -1 is the one overflow.
                let quotient = a
                    .checked_div(b)
                    .ok_or_else(|| fault(position, RuntimeError::IntegerOverflow))?;
                Evaluated::int(quotient)
            }
            // Statement-level operators never nest inside expressions.
            Operator::Init | Operator::Assign => left,
        };
        Ok(value)
    }

    fn int_operands(
        &self,
        position: Position,
        left: &Evaluated,
        right: &Evaluated,
    ) -> EvalResult<(i64, i64)> {
        let a = left.as_int().map_err(|error| fault(position, error))?;
        let b = right.as_int().map_err(|error| fault(position, error))?;
        Ok((a, b))
    }

    fn eval_int(&mut self, node: &Node) -> EvalResult<i64> {
        let value = self.eval_expression(node)?;
        value
            .as_int()
            .map_err(|error| fault(node.position(), error))
    }

    fn variable(&self, name: &str, position: Position) -> EvalResult<&Symbol> {
        self.table.lookup(name).ok_or_else(|| {
            fault(
                position,
                RuntimeError::UndefinedVariable {
                    name: name.to_string(),
                },
            )
        })
    }

    fn write_output(&mut self, position: Position, text: &str) -> EvalResult<()> {
        let result = self
            .output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush());
        result.map_err(|error| {
            fault(
                position,
                RuntimeError::Output {
                    message: error.to_string(),
                },
            )
        })
    }
}

fn fault(position: Position, error: RuntimeError) -> Diagnostic {
    Diagnostic::runtime(position, error.to_string())
}
