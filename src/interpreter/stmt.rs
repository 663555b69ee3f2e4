use std::{cell::RefCell, rc::Rc};

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::Error,
};

use super::{
    environment::{get, Env, Environment},
    expr::{eval_expression, eval_place},
    interpreter::{owns_object, Interpreter},
    value::{ArrayValue, Instance, Value},
};

/// How a statement finished.
#[derive(Debug)]
pub enum Flow<'p> {
    Normal,
    /// A `return` unwinding to the nearest call.
    Return(Value<'p>),
}

pub fn is_declaration(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::VarDecl | NodeKind::VarRef | NodeKind::ArrayDecl | NodeKind::ArrayInit | NodeKind::ArrayRef
    )
}

pub fn exec_statement<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    node: &'p Node,
    env: &Env<'p>,
) -> Result<Flow<'p>, Error> {
    match node.kind {
        NodeKind::VarDecl => declare_variable(interpreter, node, env)?,
        NodeKind::VarRef | NodeKind::ArrayRef => declare_reference(interpreter, node, env)?,
        NodeKind::ArrayDecl | NodeKind::ArrayInit => declare_array(interpreter, node, env)?,
        NodeKind::Block => return exec_block(interpreter, node, env),
        NodeKind::If => return exec_if(interpreter, node, env),
        NodeKind::While => return exec_while(interpreter, node, env),
        NodeKind::Return => {
            let value = match node.first() {
                Some(value) => eval_expression(interpreter, value, env)?,
                None => Value::Null,
            };
            return Ok(Flow::Return(value));
        }
        _ => {
            eval_expression(interpreter, node, env)?;
        }
    }

    Ok(Flow::Normal)
}

/// Runs `block` in a fresh child environment and destroys the objects it declared, last first.
pub fn exec_block<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    block: &'p Node,
    parent: &Env<'p>,
) -> Result<Flow<'p>, Error> {
    let env = Environment::child(parent);
    let mut owned: Vec<Rc<Instance<'p>>> = vec![];
    let mut flow = Flow::Normal;

    for statement in block.children.iter() {
        flow = exec_statement(interpreter, statement, &env)?;

        if owns_object(statement) {
            if let Value::Instance(instance) = get(&env, statement.value()) {
                owned.push(instance);
            }
        }

        if matches!(flow, Flow::Return(_)) {
            break;
        }
    }

    for instance in owned.iter().rev() {
        // A returned local is handed to the caller instead
        if let Flow::Return(Value::Instance(returned)) = &flow {
            if Rc::ptr_eq(returned, instance) {
                continue;
            }
        }
        interpreter.destroy(instance)?;
    }

    Ok(flow)
}

fn exec_if<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<Flow<'p>, Error> {
    let mut children = node.children.iter();

    while let Some(child) = children.next() {
        if child.kind == NodeKind::Block {
            return exec_block(interpreter, child, env);
        }

        let branch = children.next();
        if eval_expression(interpreter, child, env)?.as_bool() {
            return match branch {
                Some(branch) => exec_statement(interpreter, branch, env),
                None => Ok(Flow::Normal),
            };
        }
    }

    Ok(Flow::Normal)
}

fn exec_while<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<Flow<'p>, Error> {
    let (Some(condition), Some(body)) = (node.first(), node.child(1)) else {
        return Ok(Flow::Normal);
    };

    while eval_expression(interpreter, condition, env)?.as_bool() {
        if let Flow::Return(value) = exec_statement(interpreter, body, env)? {
            return Ok(Flow::Return(value));
        }
    }

    Ok(Flow::Normal)
}

fn declared_type(node: &Node) -> (String, bool) {
    node.type_node()
        .map(|type_node| (type_node.type_name(), type_node.kind == NodeKind::ClassType))
        .unwrap_or_default()
}

/// Binds the zero value first so the initializer sees the new name, then stores the initial value.
fn declare_variable<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<(), Error> {
    let (type_name, is_class) = declared_type(node);
    let slot = env.borrow_mut().define(node.value(), Value::zero(&type_name));

    let value = match node.child(1) {
        None if is_class => match get(env, &type_name) {
            Value::Class(class) => Value::Instance(interpreter.construct(&class, vec![])?),
            _ => Value::Null,
        },
        None => return Ok(()),
        Some(init) if is_class && init.is_lvalue() => {
            let value = eval_expression(interpreter, init, env)?;
            interpreter.copy_value(value)?
        }
        Some(init) => {
            let value = eval_expression(interpreter, init, env)?;
            Value::convert(&type_name, value)
        }
    };

    *slot.borrow_mut() = value;
    Ok(())
}

/// References and array references share the slot of their origin.
fn declare_reference<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<(), Error> {
    let origin = match node.last() {
        Some(origin) => eval_place(interpreter, origin, env)?,
        None => None,
    };

    match origin {
        Some(origin) => env.borrow_mut().alias(node.value(), origin),
        None => {
            env.borrow_mut().define(node.value(), Value::Null);
        }
    }

    Ok(())
}

fn declare_array<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<(), Error> {
    let (type_name, is_class) = declared_type(node);
    let literal = node.find(NodeKind::Array);

    let mut dimensions = vec![];
    for dim in node.dims() {
        let size = eval_expression(interpreter, dim, env)?.as_int();
        dimensions.push(size.max(0) as usize);
    }
    if dimensions.is_empty() {
        if let Some(literal) = literal {
            dimensions = literal.literal_shape();
        }
    }

    let array = ArrayValue::new(node.value(), dimensions, || Value::zero(&type_name)).map_err(Error::semantic)?;

    if is_class {
        if let Value::Class(class) = get(env, &type_name) {
            for element in array.elements.iter() {
                let instance = interpreter.construct(&class, vec![])?;
                *element.borrow_mut() = Value::Instance(instance);
            }
        }
    }

    if let Some(literal) = literal {
        fill_array(interpreter, &array, &type_name, literal, 0, 0, env)?;
    }

    env.borrow_mut()
        .define(node.value(), Value::Array(Rc::new(RefCell::new(array))));
    Ok(())
}

/// Stores the elements of a (nested) array literal starting at flat position `offset`.
fn fill_array<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    array: &ArrayValue<'p>,
    type_name: &str,
    literal: &'p Node,
    level: usize,
    offset: usize,
    env: &Env<'p>,
) -> Result<(), Error> {
    let stride = array.stride(level);

    for (index, element) in literal.children.iter().enumerate() {
        if element.kind == NodeKind::Array {
            fill_array(interpreter, array, type_name, element, level + 1, offset + index * stride, env)?;
            continue;
        }

        let value = eval_expression(interpreter, element, env)?;
        if let Some(slot) = array.elements.get(offset + index) {
            *slot.borrow_mut() = Value::convert(type_name, value);
        }
    }

    Ok(())
}
