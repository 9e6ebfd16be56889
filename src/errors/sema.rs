// src/errors/sema.rs
//! Semantic analysis errors (E2xxx).
//!
//! The `#[error]` templates are an external contract: tools downstream match
//! on the exact wording, so the text here must not drift. A few legacy
//! comparison wordings (E2013-E2016) stay in the catalog for contract
//! stability even though the current checking rules never produce them.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SemanticError {
    #[error("No declaration found for type '{name}'")]
    #[diagnostic(code(E2001))]
    UndeclaredType {
        name: String,
        #[label("unknown type")]
        span: SourceSpan,
    },

    #[error("No declaration found for class '{name}'")]
    #[diagnostic(code(E2002))]
    UndeclaredClass {
        name: String,
        #[label("unknown class")]
        span: SourceSpan,
    },

    #[error("No declaration found for interface '{name}'")]
    #[diagnostic(code(E2003))]
    UndeclaredInterface {
        name: String,
        #[label("unknown interface")]
        span: SourceSpan,
    },

    #[error("No declaration found for variable '{name}'")]
    #[diagnostic(code(E2004))]
    UndeclaredVariable {
        name: String,
        #[label("not found in scope")]
        span: SourceSpan,
    },

    #[error("No declaration found for function '{name}'")]
    #[diagnostic(code(E2005))]
    UndeclaredFunction {
        name: String,
        #[label("not found in scope")]
        span: SourceSpan,
    },

    #[error("Declaration of '{name}' here conflicts with declaration on line {line}")]
    #[diagnostic(code(E2006))]
    ConflictingDeclaration {
        name: String,
        line: u32,
        #[label("redeclared here")]
        span: SourceSpan,
    },

    #[error("Class '{class}' does not implement entire interface '{interface}'")]
    #[diagnostic(code(E2007))]
    InterfaceNotImplemented {
        class: String,
        interface: String,
        #[label("missing interface methods")]
        span: SourceSpan,
    },

    #[error("Class '{class}' repeated interface '{interface}'")]
    #[diagnostic(code(E2008))]
    RepeatedInterface {
        class: String,
        interface: String,
        #[label("already listed")]
        span: SourceSpan,
    },

    #[error("Method '{method}' must match inherited type signature")]
    #[diagnostic(code(E2009))]
    SignatureMismatch {
        method: String,
        #[label("signature differs")]
        span: SourceSpan,
    },

    #[error("Incompatible operands: {left} {op} {right}")]
    #[diagnostic(code(E2010))]
    IncompatibleOperands {
        left: String,
        op: String,
        right: String,
        #[label("operand types differ")]
        span: SourceSpan,
    },

    #[error("Incompatible operand: {op} {right}")]
    #[diagnostic(code(E2011))]
    IncompatibleOperand {
        op: String,
        right: String,
        #[label("wrong operand type")]
        span: SourceSpan,
    },

    #[error("{found} where int/double expected")]
    #[diagnostic(code(E2012))]
    NumericOperandExpected {
        found: String,
        #[label("not numeric")]
        span: SourceSpan,
    },

    #[error("Cannot compare {left} with {right}")]
    #[diagnostic(code(E2013))]
    CannotCompare {
        left: String,
        right: String,
        #[label("incomparable")]
        span: SourceSpan,
    },

    #[error("Must compare numbers")]
    #[diagnostic(code(E2014))]
    MustCompareNumbers {
        #[label("not numeric")]
        span: SourceSpan,
    },

    #[error("Operand must be numerical")]
    #[diagnostic(code(E2015))]
    OperandNotNumerical {
        #[label("not numeric")]
        span: SourceSpan,
    },

    #[error("Operands {left} and {right} are not same type")]
    #[diagnostic(code(E2016))]
    OperandsNotSameType {
        left: String,
        right: String,
        #[label("types differ")]
        span: SourceSpan,
    },

    #[error("Test expression must have boolean type")]
    #[diagnostic(code(E2017))]
    TestNotBoolean {
        #[label("expected bool")]
        span: SourceSpan,
    },

    #[error("Incompatible return: {given} given, {expected} expected")]
    #[diagnostic(code(E2018))]
    IncompatibleReturn {
        given: String,
        expected: String,
        #[label("wrong return type")]
        span: SourceSpan,
    },

    #[error("Incompatible argument {index}: {given} given, {expected} expected")]
    #[diagnostic(code(E2019))]
    IncompatibleArgument {
        index: usize,
        given: String,
        expected: String,
        #[label("wrong argument type")]
        span: SourceSpan,
    },

    #[error("Function '{function}' expects {expected} arguments but {given} given")]
    #[diagnostic(code(E2020))]
    WrongArgumentCount {
        function: String,
        expected: usize,
        given: usize,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("{ty} has no such field '{field}'")]
    #[diagnostic(code(E2021))]
    NoSuchField {
        ty: String,
        field: String,
        #[label("unknown member")]
        span: SourceSpan,
    },

    #[error("{class} field '{field}' only accessible within class scope")]
    #[diagnostic(code(E2022))]
    FieldNotAccessible {
        class: String,
        field: String,
        #[label("private field")]
        span: SourceSpan,
    },

    #[error("[] can only be applied to arrays")]
    #[diagnostic(code(E2023))]
    SubscriptOnNonArray {
        #[label("not an array")]
        span: SourceSpan,
    },

    #[error("Array subscript must be an integer")]
    #[diagnostic(code(E2024))]
    SubscriptNotInteger {
        #[label("expected int")]
        span: SourceSpan,
    },

    #[error("Size for NewArray must be an integer")]
    #[diagnostic(code(E2025))]
    NewArraySizeNotInteger {
        #[label("expected int")]
        span: SourceSpan,
    },

    #[error("'this' is only valid within class scope")]
    #[diagnostic(code(E2026))]
    ThisOutsideClass {
        #[label("no enclosing class")]
        span: SourceSpan,
    },

    #[error("break is only allowed inside a loop")]
    #[diagnostic(code(E2027))]
    BreakOutsideLoop {
        #[label("no enclosing loop")]
        span: SourceSpan,
    },
}
