//! Type checker for the Sageleaf programming language
//!
//! A deliberately thin validation pass over the parsed AST:
//!
//! - Function definitions are collected into a name index; duplicates are
//!   rejected at the redefining name.
//! - `return` statements must agree with the enclosing function's declared
//!   return type (a value exactly when a type is declared).
//! - Literals are checked against expected types where one is known: integer
//!   and float literals satisfy any numeric primitive, `true`/`false` satisfy
//!   `bool`.
//! - Calls to known functions are checked for return type, arity, and literal
//!   arguments.
//!
//! Everything the checker cannot see through is accepted unchecked. That
//! keeps the pass permissive while still catching the mistakes the code
//! generator would otherwise turn into confusing C compiler errors.

use std::collections::HashMap;

use thiserror::Error;

use sageleaf_syntax::ast::{
    Expr, FunctionDef, Program, SourceSpan, Spanned, Statement, TopLevelStmt, Type,
};

/// A validation failure at a specific source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {span}")]
pub struct TypeError {
    pub message: String,
    pub span: SourceSpan,
}

impl TypeError {
    fn new(message: impl Into<String>, span: &SourceSpan) -> Self {
        Self {
            message: message.into(),
            span: span.clone(),
        }
    }
}

/// Function definitions indexed by name, in declaration order behind the map.
type FunctionIndex<'a> = HashMap<&'a str, &'a FunctionDef>;

/// Validate `program`, failing on the first error found.
#[tracing::instrument(skip_all)]
pub fn check(program: &Program) -> Result<(), TypeError> {
    let functions = collect_functions(program)?;
    for stmt in &program.statements {
        if let TopLevelStmt::Function(f) = &stmt.node {
            check_function(f, &functions)?;
        }
    }
    Ok(())
}

fn collect_functions(program: &Program) -> Result<FunctionIndex<'_>, TypeError> {
    let mut functions = FunctionIndex::new();
    for stmt in &program.statements {
        if let TopLevelStmt::Function(f) = &stmt.node {
            if functions.insert(f.name.node.as_str(), f).is_some() {
                return Err(TypeError::new(
                    format!("Duplicate function definition '{}'", f.name.node),
                    &f.name.span,
                ));
            }
        }
    }
    Ok(functions)
}

fn check_function(f: &FunctionDef, functions: &FunctionIndex<'_>) -> Result<(), TypeError> {
    for stmt in &f.body {
        match &stmt.node {
            Statement::Return(value) => {
                check_return(value.as_ref(), f.return_type.as_ref(), &stmt.span, functions)?;
            }
            Statement::Expr(e) => check_expr(e, None, functions)?,
            _ => {}
        }
    }
    Ok(())
}

fn check_return(
    value: Option<&Spanned<Expr>>,
    declared: Option<&Spanned<Type>>,
    stmt_span: &SourceSpan,
    functions: &FunctionIndex<'_>,
) -> Result<(), TypeError> {
    match (declared, value) {
        (Some(ty), Some(value)) => check_expr(value, Some(&ty.node), functions),
        (Some(_), None) => Err(TypeError::new(
            "Return statement must have a value",
            stmt_span,
        )),
        (None, Some(_)) => Err(TypeError::new(
            "Return statement must not have a value",
            stmt_span,
        )),
        (None, None) => Ok(()),
    }
}

/// Check `expr` against `expected`, where `None` means any type is fine.
fn check_expr(
    expr: &Spanned<Expr>,
    expected: Option<&Type>,
    functions: &FunctionIndex<'_>,
) -> Result<(), TypeError> {
    match &expr.node {
        Expr::Int(_) => match expected {
            Some(ty) if !ty.is_numeric() => Err(TypeError::new(
                format!("Expected {ty}, got integer literal"),
                &expr.span,
            )),
            _ => Ok(()),
        },
        Expr::Float(_) => match expected {
            Some(ty) if !ty.is_numeric() => Err(TypeError::new(
                format!("Expected {ty}, got float literal"),
                &expr.span,
            )),
            _ => Ok(()),
        },
        Expr::Bool(_) => match expected {
            None | Some(Type::Bool) => Ok(()),
            Some(ty) => Err(TypeError::new(
                format!("Expected {ty}, got bool literal"),
                &expr.span,
            )),
        },
        Expr::Call(name, args) => {
            let Some(callee) = functions.get(name.as_str()) else {
                // Unknown callees pass in untyped positions; when a specific
                // return type is required the call cannot be validated at all.
                return match expected {
                    None => Ok(()),
                    Some(_) => Err(TypeError::new(
                        format!("Unknown function '{name}'"),
                        &expr.span,
                    )),
                };
            };

            if let Some(ty) = expected {
                let returns_expected = callee
                    .return_type
                    .as_ref()
                    .is_some_and(|rt| types_equal(&rt.node, ty));
                if !returns_expected {
                    return Err(TypeError::new(
                        format!("Expected {ty}, got function call"),
                        &expr.span,
                    ));
                }
            }

            if args.len() != callee.params.len() {
                return Err(TypeError::new(
                    format!(
                        "Expected {} arguments, got {}",
                        callee.params.len(),
                        args.len()
                    ),
                    &expr.span,
                ));
            }

            for (arg, param) in args.iter().zip(&callee.params) {
                check_expr(arg, Some(&param.node.ty.node), functions)?;
            }
            Ok(())
        }
        // Expression forms the checker cannot see through are accepted.
        _ => Ok(()),
    }
}

/// Structural type equality, ignoring spans.
fn types_equal(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Pointer(x), Type::Pointer(y)) => types_equal(&x.node, &y.node),
        (Type::Generic(x), Type::Generic(y)) => x == y,
        (Type::Custom(name_a, args_a), Type::Custom(name_b, args_b)) => {
            name_a == name_b
                && args_a.len() == args_b.len()
                && args_a
                    .iter()
                    .zip(args_b)
                    .all(|(x, y)| types_equal(&x.node, &y.node))
        }
        (Type::AnonymousStruct(fields_a), Type::AnonymousStruct(fields_b)) => {
            fields_a.len() == fields_b.len()
                && fields_a.iter().zip(fields_b).all(|(x, y)| {
                    x.node.name == y.node.name && types_equal(&x.node.ty.node, &y.node.ty.node)
                })
        }
        (Type::AnonymousUnion(variants_a), Type::AnonymousUnion(variants_b)) => {
            variants_a.len() == variants_b.len()
                && variants_a.iter().zip(variants_b).all(|(x, y)| {
                    x.node.name == y.node.name
                        && match (&x.node.payload, &y.node.payload) {
                            (Some(p), Some(q)) => types_equal(&p.node, &q.node),
                            (None, None) => true,
                            _ => false,
                        }
                })
        }
        // The remaining variants carry no structure.
        _ => std::mem::discriminant(a) == std::mem::discriminant(b),
    }
}
