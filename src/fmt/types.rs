//! Pretty printer for type terms
//!
//! Variables are renamed in order of first appearance: plain ones become
//! `T1`, `T2`, ... and addable ones `Addable1`, `Addable2`, ... on a separate
//! counter. The internal ids never show up in the output.

use std::collections::HashMap;

use crate::ast::{Program, Statement};
use crate::types::{Type, TypeInfo, TypeVar};

#[derive(Debug, Default)]
pub struct TypeNamer {
    names: HashMap<usize, String>,
    plain: usize,
    addable: usize,
}

impl TypeNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, var: &TypeVar) -> String {
        if let Some(name) = self.names.get(&var.id) {
            return name.clone();
        }
        let name = if var.addable {
            self.addable += 1;
            format!("Addable{}", self.addable)
        } else {
            self.plain += 1;
            format!("T{}", self.plain)
        };
        self.names.insert(var.id, name.clone());
        name
    }

    pub fn render(&mut self, ty: &Type) -> String {
        match ty {
            Type::Var(var) => self.name(var),
            Type::Primitive(p) => p.name().to_string(),
            Type::Func(params, ret) => {
                let params = match params.as_slice() {
                    [] => "()".to_string(),
                    [param] if param.is_func() => format!("({})", self.render(param)),
                    [param] => self.render(param),
                    params => {
                        let rendered: Vec<String> = params.iter().map(|p| self.render(p)).collect();
                        format!("({})", rendered.join(", "))
                    }
                };
                format!("{} -> {}", params, self.render(ret))
            }
            Type::Pair(head, tail) => {
                let head = self.render(head);
                format!("[{}, {}]", head, self.render(tail))
            }
            Type::List(element) => format!("List<{}>", self.render(element)),
        }
    }
}

/// Render a type on its own, numbering its variables from one.
pub fn type_to_string(ty: &Type) -> String {
    TypeNamer::new().render(ty)
}

/// One `name: type` line per top-level declaration, in program order.
///
/// Declarations inference could not type read `Couldn't infer type`.
pub fn declaration_types(program: &Program<TypeInfo>) -> String {
    program
        .body
        .iter()
        .filter_map(|statement| {
            let (name, info) = match statement {
                Statement::Const(decl) | Statement::Let(decl) => (&decl.name.value, &decl.info),
                Statement::Function(func) => (&func.name.value, &func.info),
                _ => return None,
            };
            let ty = match (&info.inferred, info.is_untypable()) {
                (Some(ty), false) => type_to_string(ty),
                _ => "Couldn't infer type".to_string(),
            };
            Some(format!("{}: {}", name, ty))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
