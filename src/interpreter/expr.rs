use std::rc::Rc;

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, ErrorImpl},
};

use super::{
    builtins::call_builtin,
    environment::{get, lookup, Env},
    interpreter::Interpreter,
    value::{read_slot, slot, Closure, Instance, Slot, Value},
};

pub fn eval_expression<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    node: &'p Node,
    env: &Env<'p>,
) -> Result<Value<'p>, Error> {
    match node.kind {
        NodeKind::Int | NodeKind::Bool | NodeKind::Char => Ok(Value::from_literal(node)),
        NodeKind::Null => Ok(Value::Null),
        NodeKind::Id => Ok(get(env, node.value())),
        NodeKind::This => Ok(get(env, "this")),
        NodeKind::ArrayItem => read(eval_place(interpreter, node, env)?),
        NodeKind::ObjUsage => match node.child(1) {
            Some(member) if member.kind == NodeKind::FnCall => {
                let instance = eval_object(interpreter, node, env)?;
                call_method(interpreter, &instance, member, env)
            }
            _ => read(eval_place(interpreter, node, env)?),
        },
        NodeKind::And => {
            let value = operand(interpreter, node.first(), env)?.as_bool()
                && operand(interpreter, node.child(1), env)?.as_bool();
            Ok(Value::Bool(value))
        }
        NodeKind::Or => {
            let value = operand(interpreter, node.first(), env)?.as_bool()
                || operand(interpreter, node.child(1), env)?.as_bool();
            Ok(Value::Bool(value))
        }
        NodeKind::Not => Ok(Value::Bool(!operand(interpreter, node.first(), env)?.as_bool())),
        kind if kind.is_arithmetic() => {
            let left = operand(interpreter, node.first(), env)?.as_int();
            let right = operand(interpreter, node.child(1), env)?.as_int();
            arithmetic(kind, left, right).map(Value::Int)
        }
        kind if kind.is_comparison() => {
            let left = operand(interpreter, node.first(), env)?;
            let right = operand(interpreter, node.child(1), env)?;
            Ok(Value::Bool(compare(kind, &left, &right)))
        }
        NodeKind::Assign => eval_assignment(interpreter, node, env),
        NodeKind::DecInc => eval_dec_inc(interpreter, node, env),
        NodeKind::FnCall => eval_call(interpreter, node, env),
        _ => Ok(Value::Null),
    }
}

fn operand<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    node: Option<&'p Node>,
    env: &Env<'p>,
) -> Result<Value<'p>, Error> {
    match node {
        Some(node) => eval_expression(interpreter, node, env),
        None => Ok(Value::Null),
    }
}

fn read<'p>(place: Option<Slot<'p>>) -> Result<Value<'p>, Error> {
    Ok(place.as_ref().map(read_slot).unwrap_or_default())
}

/// Wrapping integer arithmetic; division and remainder by zero are fatal.
pub fn arithmetic(kind: NodeKind, left: i32, right: i32) -> Result<i32, Error> {
    match kind {
        NodeKind::Add => Ok(left.wrapping_add(right)),
        NodeKind::Sub => Ok(left.wrapping_sub(right)),
        NodeKind::Mul => Ok(left.wrapping_mul(right)),
        NodeKind::Div | NodeKind::Mod if right == 0 => Err(Error::semantic(ErrorImpl::DivisionByZero)),
        NodeKind::Div => Ok(left.wrapping_div(right)),
        NodeKind::Mod => Ok(left.wrapping_rem(right)),
        _ => Ok(0),
    }
}

pub fn compare<'p>(kind: NodeKind, left: &Value<'p>, right: &Value<'p>) -> bool {
    let (l, r) = (left.as_int(), right.as_int());

    match kind {
        NodeKind::Equal => left.same(right),
        NodeKind::NotEqual => !left.same(right),
        NodeKind::Less => l < r,
        NodeKind::LessEqual => l <= r,
        NodeKind::Greater => l > r,
        NodeKind::GreaterEqual => l >= r,
        _ => false,
    }
}

/// The slot an lvalue names. Out-of-bounds accesses are reported and give `None`;
/// rvalues are evaluated into a temporary slot.
pub fn eval_place<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    node: &'p Node,
    env: &Env<'p>,
) -> Result<Option<Slot<'p>>, Error> {
    match node.kind {
        NodeKind::Id => Ok(lookup(env, node.value())),
        NodeKind::This => Ok(lookup(env, "this")),
        NodeKind::ArrayItem => {
            let array = get(env, node.value());
            index_array(interpreter, array, node, env)
        }
        NodeKind::ObjUsage => {
            let Some(member) = node.child(1) else {
                return Ok(None);
            };
            let instance = eval_object(interpreter, node, env)?;

            match member.kind {
                NodeKind::Id => Ok(Some(instance.attribute(member.value()).map_err(Error::semantic)?)),
                NodeKind::ArrayItem => {
                    let attribute = instance.attribute(member.value()).map_err(Error::semantic)?;
                    let array = attribute.borrow().clone();
                    index_array(interpreter, array, member, env)
                }
                NodeKind::FnCall => Ok(Some(slot(call_method(interpreter, &instance, member, env)?))),
                _ => Ok(None),
            }
        }
        _ => Ok(Some(slot(eval_expression(interpreter, node, env)?))),
    }
}

/// Arguments are passed as slots so reference parameters can alias them.
pub fn eval_argument<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    node: &'p Node,
    env: &Env<'p>,
) -> Result<Slot<'p>, Error> {
    if node.is_lvalue() {
        return Ok(eval_place(interpreter, node, env)?.unwrap_or_else(|| slot(Value::Null)));
    }

    Ok(slot(eval_expression(interpreter, node, env)?))
}

fn eval_arguments<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    args: &'p [Node],
    env: &Env<'p>,
) -> Result<Vec<Slot<'p>>, Error> {
    args.iter()
        .map(|arg| eval_argument(interpreter, arg, env))
        .collect()
}

fn index_array<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    array: Value<'p>,
    item: &'p Node,
    env: &Env<'p>,
) -> Result<Option<Slot<'p>>, Error> {
    let mut indices = vec![];
    for index in item.children.iter() {
        indices.push(eval_expression(interpreter, index, env)?.as_int());
    }

    let Value::Array(array) = array else {
        return Ok(None);
    };

    let element = array.borrow().element(&indices);
    match element {
        Ok(element) => Ok(Some(element)),
        Err(error) => {
            interpreter.report(error);
            Ok(None)
        }
    }
}

/// The instance an `ObjUsage` is applied to; anything else is a fatal missing member.
fn eval_object<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    node: &'p Node,
    env: &Env<'p>,
) -> Result<Rc<Instance<'p>>, Error> {
    let object = operand(interpreter, node.first(), env)?;
    let member = node.child(1).map(Node::value).unwrap_or_default();

    match object {
        Value::Instance(instance) => Ok(instance),
        other => Err(Error::semantic(ErrorImpl::MissingMember {
            member: member.to_string(),
            class: other.type_name(),
        })),
    }
}

/// Calls `call` as a method of `instance`, dispatching on its dynamic class.
fn call_method<'p>(
    interpreter: &mut Interpreter<'p, '_>,
    instance: &Rc<Instance<'p>>,
    call: &'p Node,
    env: &Env<'p>,
) -> Result<Value<'p>, Error> {
    let name = call.value();

    let Some(method) = instance.class.method(name) else {
        let error = if instance.attributes.contains_key(name) {
            ErrorImpl::NotCallable {
                name: name.to_string(),
            }
        } else {
            ErrorImpl::MissingMember {
                member: name.to_string(),
                class: instance.class.name.clone(),
            }
        };
        return Err(Error::semantic(error));
    };

    let args = eval_arguments(interpreter, call.args(), env)?;
    let closure = Closure {
        node: method,
        env: instance.class.env.clone(),
        receiver: Some(instance.clone()),
    };

    interpreter.call(&closure, args)
}

fn eval_call<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<Value<'p>, Error> {
    match get(env, node.value()) {
        Value::BuiltIn(function) => {
            let argument = operand(interpreter, node.args().first(), env)?;
            call_builtin(function, &argument, interpreter.out);
            Ok(Value::Null)
        }
        Value::Function(closure) => {
            let args = eval_arguments(interpreter, node.args(), env)?;
            interpreter.call(&closure, args)
        }
        Value::Class(class) => {
            let args = eval_arguments(interpreter, node.args(), env)?;
            Ok(Value::Instance(interpreter.construct(&class, args)?))
        }
        _ => {
            tracing::debug!(name = node.value(), "call of an unresolved name");
            Ok(Value::Null)
        }
    }
}

fn compound_operator(operator: &str) -> Option<NodeKind> {
    match operator {
        "+=" => Some(NodeKind::Add),
        "-=" => Some(NodeKind::Sub),
        "*=" => Some(NodeKind::Mul),
        "/=" => Some(NodeKind::Div),
        "%=" => Some(NodeKind::Mod),
        _ => None,
    }
}

fn eval_assignment<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<Value<'p>, Error> {
    let (Some(target), Some(value)) = (node.first(), node.child(1)) else {
        return Ok(Value::Null);
    };

    let value = eval_expression(interpreter, value, env)?;
    let Some(place) = eval_place(interpreter, target, env)? else {
        return Ok(value);
    };

    match compound_operator(node.value()) {
        Some(kind) => {
            let current = place.borrow().clone();
            let result = arithmetic(kind, current.as_int(), value.as_int())?;
            *place.borrow_mut() = current.coerce(Value::Int(result));
        }
        None => interpreter.assign(&place, value)?,
    }

    let assigned = place.borrow().clone();
    Ok(assigned)
}

/// Prefix forms yield the updated value, postfix forms the previous one.
fn eval_dec_inc<'p>(interpreter: &mut Interpreter<'p, '_>, node: &'p Node, env: &Env<'p>) -> Result<Value<'p>, Error> {
    let is_marker = |child: &&Node| matches!(child.kind, NodeKind::Inc | NodeKind::Dec);

    let prefix = node.first().is_some_and(|first| is_marker(&first));
    let (Some(marker), Some(target)) = (
        node.children.iter().find(is_marker),
        node.children.iter().find(|child| !is_marker(child)),
    ) else {
        return Ok(Value::Null);
    };

    let Some(place) = eval_place(interpreter, target, env)? else {
        return Ok(Value::Null);
    };

    let delta = if marker.kind == NodeKind::Inc { 1 } else { -1 };
    let previous = place.borrow().clone();
    let updated = previous.coerce(Value::Int(previous.as_int().wrapping_add(delta)));
    *place.borrow_mut() = updated.clone();

    Ok(if prefix { updated } else { previous })
}
