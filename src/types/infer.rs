//! # Type Inference
//!
//! A single depth-first walk over a validated program. Every node gets its
//! [`TypeInfo`] filled in: either the inferred type or "untypable".
//!
//! ## Algorithm
//!
//! Types are unified against the [`Context`]'s substitution as the walk
//! goes. Each block first hoists its declarations, binding every declared
//! name to a fresh monomorphic type variable, so that functions can refer
//! to each other regardless of order. When the declaration itself is
//! reached, its inferred type is unified with that placeholder and the name
//! is rebound to the generalized scheme (`let` bindings stay monomorphic).
//! Inside its own body a function therefore only sees its monomorphic
//! placeholder.
//!
//! ## Recovery
//!
//! A failed check is reported and the walk continues. A node below which
//! any error was reported is untypable; its parent carries on with a fresh
//! type variable in its place, and declarations of untypable values bind
//! their name to `∀T. T` so later uses don't pile up follow-up errors.
//!
//! ## Lists
//!
//! `pair(x, xs)` produces `[X, List<E>]` when `xs` is a list. When `X`
//! unifies with `E` the call is given the type `List<E>` instead, so that
//! lists built with `pair` and `null` read as lists. The collapse never binds
//! a variable the environment can see: `pair("h", xs)` for a parameter
//! `xs: List<T>` stays `[string, List<T>]` rather than deciding `T`.

use super::context::Context;
use super::error::{Construct, TypeErrorKind};
use super::prelude;
use super::ty::{Type, TypeInfo, TypeScheme};
use super::unify::UnifyError;
use crate::ast::*;
use crate::fmt::{
    assignment_to_string, binary_op_to_string, conditional_header, declaration_header,
    function_call_to_string, function_header, if_header, unary_op_to_string,
};

/// Infer types for a validated program, annotating every node and reporting
/// errors into `ctx`.
///
/// Annotations are resolved against the final substitution once the whole
/// program has been walked.
pub fn analyse(program: &mut Program<TypeInfo>, ctx: &mut Context) {
    let _span = tracing::debug_span!("analyse", statements = program.body.len()).entered();
    let errors_before = ctx.error_count();

    let mut infer = Infer { ctx: &mut *ctx };
    infer.ctx.env.push_scope();
    infer.hoist(&program.body);
    for stmt in &mut program.body {
        infer.infer_statement(stmt);
    }
    infer.ctx.env.pop_scope();

    program.for_each_info_mut(&mut |info: &mut TypeInfo| {
        if let Some(ty) = info.inferred.take() {
            info.inferred = Some(ctx.resolve(&ty));
        }
    });

    tracing::debug!(errors = ctx.error_count() - errors_before, "analysis finished");
}

struct Infer<'a> {
    ctx: &'a mut Context,
}

/// Which kind of declaration binds a name.
#[derive(Clone, Copy)]
enum Binding {
    Function,
    Const,
    Let,
}

impl Binding {
    fn construct(self) -> Construct {
        match self {
            Binding::Function => Construct::FunctionDeclaration,
            Binding::Const => Construct::ConstantDeclaration,
            Binding::Let => Construct::VariableDeclaration,
        }
    }
}

impl Infer<'_> {
    fn hoist(&mut self, statements: &[Statement<TypeInfo>]) {
        for stmt in statements {
            if let Some(name) = stmt.declared_name() {
                let placeholder = self.ctx.fresh_var();
                self.ctx
                    .env
                    .bind(name.value.clone(), TypeScheme::monomorphic(placeholder));
            }
        }
    }

    /// Record the outcome for a node inferred since `checkpoint` errors were
    /// reported. Untypable nodes hand a fresh variable to their parent.
    fn annotate(&mut self, info: &mut TypeInfo, checkpoint: usize, ty: Type) -> Type {
        if self.ctx.error_count() > checkpoint {
            *info = TypeInfo::untypable();
            self.ctx.fresh_var()
        } else {
            *info = TypeInfo::typed(ty.clone());
            ty
        }
    }

    fn resolve_all(&self, types: &[Type]) -> Vec<Type> {
        types.iter().map(|ty| self.ctx.resolve(ty)).collect()
    }

    fn report(&mut self, kind: TypeErrorKind, location: Location) {
        self.ctx.report(kind, location);
    }

    /// Report a failed unification, singling out infinite types.
    fn report_unify_error(
        &mut self,
        err: UnifyError,
        construct: Construct,
        source: String,
        location: Location,
        otherwise: impl FnOnce(&Self, String) -> TypeErrorKind,
    ) {
        let kind = match err {
            UnifyError::OccursCheck { var, ty } => TypeErrorKind::OccursCheckFailure {
                construct,
                source,
                var,
                ty: self.ctx.resolve(&ty),
            },
            UnifyError::Mismatch { .. } | UnifyError::Arity { .. } => otherwise(&*self, source),
        };
        self.report(kind, location);
    }

    // statements

    /// Infer a statement. Returns the type it returns with, if it leaves the
    /// enclosing function.
    fn infer_statement(&mut self, stmt: &mut Statement<TypeInfo>) -> Option<Type> {
        match stmt {
            Statement::Const(decl) => {
                self.infer_declaration(decl, Binding::Const);
                None
            }
            Statement::Let(decl) => {
                self.infer_declaration(decl, Binding::Let);
                None
            }
            Statement::Function(func) => {
                self.infer_function(func);
                None
            }
            Statement::Return(ret) => {
                let checkpoint = self.ctx.error_count();
                let ty = match &mut ret.value {
                    Some(value) => self.infer_expr(value),
                    None => Type::undefined(),
                };
                Some(self.annotate(&mut ret.info, checkpoint, ty))
            }
            Statement::If(stmt) => self.infer_if(stmt),
            Statement::Block(block) => self.infer_block(block),
            Statement::Expression(expr) => {
                self.infer_expr(expr);
                None
            }
        }
    }

    /// A block has the type of its first returning statement. All statements
    /// are inferred regardless.
    fn infer_block(&mut self, block: &mut Block<TypeInfo>) -> Option<Type> {
        let checkpoint = self.ctx.error_count();
        self.ctx.env.push_scope();
        self.hoist(&block.statements);

        let mut returned = None;
        for stmt in &mut block.statements {
            let ty = self.infer_statement(stmt);
            if returned.is_none() {
                returned = ty;
            }
        }
        self.ctx.env.pop_scope();

        let ty = returned.clone().unwrap_or_else(Type::undefined);
        let ty = self.annotate(&mut block.info, checkpoint, ty);
        returned.map(|_| ty)
    }

    fn infer_if(&mut self, stmt: &mut IfStatement<TypeInfo>) -> Option<Type> {
        let checkpoint = self.ctx.error_count();

        let test_ty = self.infer_expr(&mut stmt.test);
        if !stmt.test.info().is_untypable() && self.ctx.unify(&test_ty, &Type::boolean()).is_err() {
            let kind = TypeErrorKind::ConditionalTestTypeMismatch {
                construct: Construct::IfStatement,
                source: if_header(stmt),
                found: self.ctx.resolve(&test_ty),
            };
            self.report(kind, stmt.position);
        }

        let consequent = self.infer_block(&mut stmt.consequent);
        let consequent_ok = !stmt.consequent.info.is_untypable();
        let (alternate, alternate_ok) = match &mut stmt.alternate {
            Some(Alternate::Block(block)) => {
                let ty = self.infer_block(block);
                (ty, !block.info.is_untypable())
            }
            Some(Alternate::If(inner)) => {
                let ty = self.infer_if(inner);
                (ty, !inner.info.is_untypable())
            }
            None => (None, true),
        };

        let returned = if consequent.is_none() && alternate.is_none() {
            None
        } else {
            let consequent = consequent.unwrap_or_else(Type::undefined);
            let alternate = alternate.unwrap_or_else(Type::undefined);
            if consequent_ok && alternate_ok {
                if let Err(err) = self.ctx.unify(&consequent, &alternate) {
                    let source = if_header(stmt);
                    self.report_unify_error(
                        err,
                        Construct::IfStatement,
                        source,
                        stmt.position,
                        |this, source| TypeErrorKind::BranchTypeMismatch {
                            construct: Construct::IfStatement,
                            source,
                            consequent: this.ctx.resolve(&consequent),
                            alternate: this.ctx.resolve(&alternate),
                        },
                    );
                }
            }
            Some(consequent)
        };

        let ty = returned.clone().unwrap_or_else(Type::undefined);
        let ty = self.annotate(&mut stmt.info, checkpoint, ty);
        returned.map(|_| ty)
    }

    fn infer_function(&mut self, func: &mut FunctionDeclaration<TypeInfo>) {
        let checkpoint = self.ctx.error_count();

        self.ctx.env.push_scope();
        let params = self.bind_params(&mut func.params);
        let ret = self
            .infer_block(&mut func.body)
            .unwrap_or_else(Type::undefined);
        self.ctx.env.pop_scope();

        let ty = Type::func(params, ret);
        let source = function_header(func);
        let info = self.bind_declaration(
            &func.name.value,
            ty,
            Binding::Function,
            source,
            func.position,
            checkpoint,
        );
        func.name.info = info.clone();
        func.info = info;
    }

    fn infer_declaration(&mut self, decl: &mut Declaration<TypeInfo>, binding: Binding) {
        let checkpoint = self.ctx.error_count();
        let ty = self.infer_expr(&mut decl.init);
        let keyword = match binding {
            Binding::Let => "let",
            Binding::Const | Binding::Function => "const",
        };
        let source = declaration_header(keyword, decl);
        let info = self.bind_declaration(
            &decl.name.value,
            ty,
            binding,
            source,
            decl.position,
            checkpoint,
        );
        decl.name.info = info.clone();
        decl.info = info;
    }

    /// Unify a declared value with its hoisted placeholder and rebind the
    /// name to its final scheme.
    fn bind_declaration(
        &mut self,
        name: &str,
        ty: Type,
        binding: Binding,
        source: String,
        location: Location,
        checkpoint: usize,
    ) -> TypeInfo {
        if self.ctx.error_count() == checkpoint {
            if let Some(placeholder) = self.ctx.env.lookup_local(name).cloned() {
                let placeholder = self.ctx.instantiate(&placeholder);
                if let Err(err) = self.ctx.unify(&placeholder, &ty) {
                    let construct = binding.construct();
                    self.report_unify_error(err, construct, source, location, |this, source| {
                        TypeErrorKind::GeneralUnificationFailure {
                            construct,
                            source,
                            expected: this.ctx.resolve(&placeholder),
                            found: this.ctx.resolve(&ty),
                        }
                    });
                }
            }
        }

        self.ctx.env.remove(name);
        if self.ctx.error_count() > checkpoint {
            let any = self.ctx.fresh_type_var(false);
            self.ctx.env.bind(
                name,
                TypeScheme::polymorphic(vec![any.clone()], Type::Var(any)),
            );
            return TypeInfo::untypable();
        }

        match binding {
            Binding::Function | Binding::Const => {
                let scheme = self.ctx.generalize(&ty);
                let ty = scheme.ty.clone();
                self.ctx.env.bind(name, scheme);
                TypeInfo::typed(ty)
            }
            Binding::Let => {
                let ty = self.ctx.apply(&ty);
                self.ctx
                    .env
                    .bind(name, TypeScheme::monomorphic(ty.clone()));
                TypeInfo::typed(ty)
            }
        }
    }

    fn bind_params(&mut self, params: &mut [Ident<TypeInfo>]) -> Vec<Type> {
        params
            .iter_mut()
            .map(|param| {
                let ty = self.ctx.fresh_var();
                self.ctx
                    .env
                    .bind(param.value.clone(), TypeScheme::monomorphic(ty.clone()));
                param.info = TypeInfo::typed(ty.clone());
                ty
            })
            .collect()
    }

    // expressions

    fn infer_expr(&mut self, expr: &mut Expression<TypeInfo>) -> Type {
        let checkpoint = self.ctx.error_count();
        let ty = match expr {
            Expression::Number(_) => Type::number(),
            Expression::String(_) => Type::string(),
            Expression::Boolean(_) => Type::boolean(),
            Expression::Null(null) => self.infer_name(prelude::NULL, null.position),
            Expression::Ident(ident) => self.infer_name(&ident.value, ident.position),
            Expression::UnaryOp(unop) => self.infer_unop(unop),
            Expression::BinaryOp(binop) => self.infer_binop(binop),
            Expression::Conditional(cond) => self.infer_conditional(cond),
            Expression::FunctionCall(call) => self.infer_call(call),
            Expression::Lambda(lambda) => self.infer_lambda(lambda),
            Expression::Assignment(assign) => self.infer_assignment(assign),
        };
        self.annotate(expr.info_mut(), checkpoint, ty)
    }

    fn infer_name(&mut self, name: &str, location: Location) -> Type {
        match self.ctx.env.lookup(name).cloned() {
            Some(scheme) => self.ctx.instantiate(&scheme),
            None => {
                self.report(
                    TypeErrorKind::UnboundName {
                        name: name.to_string(),
                    },
                    location,
                );
                self.ctx.fresh_var()
            }
        }
    }

    /// Instantiate the prelude type of an operator.
    fn operator_type(&mut self, key: &str, location: Location) -> Option<(Vec<Type>, Type)> {
        match self.infer_name(key, location) {
            Type::Func(params, ret) => Some((params, *ret)),
            _ => None,
        }
    }

    fn infer_unop(&mut self, unop: &mut UnaryOp<TypeInfo>) -> Type {
        let operand = self.infer_expr(&mut unop.operand);
        if unop.operand.info().is_untypable() {
            return self.ctx.fresh_var();
        }

        let Some((params, ret)) = self.operator_type(prelude::unary_key(unop.op), unop.position)
        else {
            return self.ctx.fresh_var();
        };
        let operands = [operand];
        self.check_operands(&params, &operands, unop.op.symbol(), unop.position, || {
            unary_op_to_string(unop)
        });
        self.ctx.apply(&ret)
    }

    fn infer_binop(&mut self, binop: &mut BinaryOp<TypeInfo>) -> Type {
        let left = self.infer_expr(&mut binop.left);
        let right = self.infer_expr(&mut binop.right);
        if binop.left.info().is_untypable() || binop.right.info().is_untypable() {
            return self.ctx.fresh_var();
        }

        let Some((params, ret)) = self.operator_type(prelude::binary_key(binop.op), binop.position)
        else {
            return self.ctx.fresh_var();
        };
        let operands = [left, right];
        self.check_operands(&params, &operands, binop.op.symbol(), binop.position, || {
            binary_op_to_string(binop)
        });
        self.ctx.apply(&ret)
    }

    /// Unify operands with the operator's parameters from left to right,
    /// reporting the first failure.
    fn check_operands(
        &mut self,
        params: &[Type],
        operands: &[Type],
        operator: &str,
        location: Location,
        source: impl FnOnce() -> String,
    ) {
        let construct = if operands.len() == 1 {
            Construct::UnaryExpression
        } else {
            Construct::BinaryExpression
        };
        for (param, operand) in params.iter().zip(operands) {
            if let Err(err) = self.ctx.unify(param, operand) {
                self.report_unify_error(err, construct, source(), location, |this, source| {
                    TypeErrorKind::OperatorTypeMismatch {
                        operator: operator.to_string(),
                        source,
                        expected: this.resolve_all(params),
                        found: this.resolve_all(operands),
                    }
                });
                return;
            }
        }
    }

    fn infer_conditional(&mut self, cond: &mut Conditional<TypeInfo>) -> Type {
        let test = self.infer_expr(&mut cond.test);
        if !cond.test.info().is_untypable() && self.ctx.unify(&test, &Type::boolean()).is_err() {
            let kind = TypeErrorKind::ConditionalTestTypeMismatch {
                construct: Construct::ConditionalExpression,
                source: conditional_header(cond),
                found: self.ctx.resolve(&test),
            };
            self.report(kind, cond.position);
        }

        let consequent = self.infer_expr(&mut cond.consequent);
        let alternate = self.infer_expr(&mut cond.alternate);
        if cond.consequent.info().is_untypable() || cond.alternate.info().is_untypable() {
            return self.ctx.fresh_var();
        }

        if let Err(err) = self.ctx.unify(&consequent, &alternate) {
            let source = conditional_header(cond);
            self.report_unify_error(
                err,
                Construct::ConditionalExpression,
                source,
                cond.position,
                |this, source| TypeErrorKind::BranchTypeMismatch {
                    construct: Construct::ConditionalExpression,
                    source,
                    consequent: this.ctx.resolve(&consequent),
                    alternate: this.ctx.resolve(&alternate),
                },
            );
        }
        self.ctx.apply(&consequent)
    }

    fn infer_call(&mut self, call: &mut FunctionCall<TypeInfo>) -> Type {
        let func_ty = self.infer_expr(&mut call.func);
        let args: Vec<Type> = call
            .args
            .iter_mut()
            .map(|arg| self.infer_expr(arg))
            .collect();
        if call.func.info().is_untypable() || call.args.iter().any(|arg| arg.info().is_untypable())
        {
            return self.ctx.fresh_var();
        }

        let callee = self.ctx.apply(&func_ty);
        if let Type::Func(params, _) = &callee {
            if params.len() != args.len() {
                let kind = TypeErrorKind::CallArityMismatch {
                    source: function_call_to_string(call),
                    expected: self.resolve_all(params),
                    found: self.resolve_all(&args),
                };
                self.report(kind, call.position);
                return self.ctx.fresh_var();
            }
        }

        let ret = self.ctx.fresh_var();
        let expected = Type::func(args.clone(), ret.clone());
        if let Err(err) = self.ctx.unify(&callee, &expected) {
            let source = function_call_to_string(call);
            match &callee {
                // a known function is blamed on its arguments, infinite types included
                Type::Func(params, _) => {
                    let kind = TypeErrorKind::CallArgumentTypeMismatch {
                        source,
                        expected: self.resolve_all(params),
                        found: self.resolve_all(&args),
                    };
                    self.report(kind, call.position);
                }
                _ => self.report_unify_error(
                    err,
                    Construct::FunctionCall,
                    source,
                    call.position,
                    |this, source| TypeErrorKind::GeneralUnificationFailure {
                        construct: Construct::FunctionCall,
                        source,
                        expected: this.ctx.resolve(&expected),
                        found: this.ctx.resolve(&callee),
                    },
                ),
            }
            return self.ctx.fresh_var();
        }

        let result = self.ctx.apply(&ret);
        self.collapse_list(result)
    }

    /// `[X, List<E>]` becomes `List<E>` when `X` and `E` unify without
    /// binding anything visible in the environment.
    fn collapse_list(&mut self, ty: Type) -> Type {
        if let Type::Pair(head, tail) = &ty {
            if let Type::List(element) = tail.as_ref() {
                if self.ctx.unify_unconstrained(element, head) {
                    return self.ctx.apply(tail);
                }
            }
        }
        ty
    }

    fn infer_lambda(&mut self, lambda: &mut Lambda<TypeInfo>) -> Type {
        self.ctx.env.push_scope();
        let params = self.bind_params(&mut lambda.params);
        let ret = match &mut lambda.body {
            LambdaBody::Expression(body) => self.infer_expr(body),
            LambdaBody::Block(block) => self.infer_block(block).unwrap_or_else(Type::undefined),
        };
        self.ctx.env.pop_scope();
        Type::func(params, ret)
    }

    fn infer_assignment(&mut self, assign: &mut Assignment<TypeInfo>) -> Type {
        let value = self.infer_expr(&mut assign.value);
        let Some(scheme) = self.ctx.env.lookup(&assign.name.value).cloned() else {
            self.report(
                TypeErrorKind::UnboundName {
                    name: assign.name.value.clone(),
                },
                assign.name.position,
            );
            assign.name.info = TypeInfo::untypable();
            return self.ctx.fresh_var();
        };
        let target = self.ctx.instantiate(&scheme);
        assign.name.info = TypeInfo::typed(target.clone());
        if assign.value.info().is_untypable() {
            return value;
        }

        if let Err(err) = self.ctx.unify(&target, &value) {
            let source = assignment_to_string(assign);
            self.report_unify_error(
                err,
                Construct::Assignment,
                source,
                assign.position,
                |this, source| TypeErrorKind::GeneralUnificationFailure {
                    construct: Construct::Assignment,
                    source,
                    expected: this.ctx.resolve(&target),
                    found: this.ctx.resolve(&value),
                },
            );
        }
        self.ctx.apply(&value)
    }
}
