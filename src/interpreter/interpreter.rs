//! Evaluator entry point and call machinery.
//!
//! The `Interpreter` owns the global environment and the output stream.
//! Statements and expressions are evaluated by free functions in `stmt`
//! and `expr` that take the interpreter as their first argument.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, ErrorImpl},
    output::Output,
    symbols::symbol::FunctionRole,
};

use super::{
    builtins::define_builtins,
    environment::{get, Env, Environment},
    expr::eval_argument,
    stmt::{exec_block, exec_statement, is_declaration, Flow},
    value::{slot, ArrayValue, ClassValue, Closure, Instance, Slot, Value},
};

/// Evaluates a checked program: hoists functions and classes, runs the
/// top-level declarations, then calls `main`.
///
/// # Arguments
///
/// * `program` - Program completed by `build_scopes`
/// * `out` - Receives printed values and non-fatal runtime diagnostics
///
/// # Returns
///
/// Returns `Err` only for fatal runtime errors; everything else is reported on `out`.
#[tracing::instrument(level = "debug", skip_all)]
pub fn evaluate(program: &Node, out: &mut Output) -> Result<(), Error> {
    let mut interpreter = Interpreter::new(out);
    interpreter.run(program)
}

pub struct Interpreter<'p, 'o> {
    pub out: &'o mut Output,
    pub globals: Env<'p>,
}

impl<'p, 'o> Interpreter<'p, 'o> {
    pub fn new(out: &'o mut Output) -> Self {
        let globals = Environment::new(None);
        define_builtins(&globals);

        Interpreter { out, globals }
    }

    /// Reports a non-fatal runtime error and lets evaluation go on.
    pub fn report(&mut self, error: ErrorImpl) {
        self.out.report(&Error::semantic(error));
    }

    pub fn run(&mut self, program: &'p Node) -> Result<(), Error> {
        self.hoist(program);

        let globals = self.globals.clone();
        for declaration in program
            .children
            .iter()
            .filter(|child| is_declaration(child.kind))
        {
            exec_statement(self, declaration, &globals)?;
        }

        match get(&globals, "main") {
            Value::Function(main) => {
                self.call(&main, vec![])?;
            }
            _ => tracing::debug!("program declares no main function"),
        }

        Ok(())
    }

    /// Binds every function and class before any code runs.
    fn hoist(&mut self, program: &'p Node) {
        let globals = self.globals.clone();

        for child in program.children.iter() {
            match child.kind {
                NodeKind::FnDecl | NodeKind::AbstractFn => {
                    // A prototype never replaces a definition
                    let defined = matches!(
                        get(&globals, child.value()),
                        Value::Function(existing) if existing.node.body().is_some()
                    );
                    if defined && child.body().is_none() {
                        continue;
                    }

                    let closure = Closure {
                        node: child,
                        env: globals.clone(),
                        receiver: None,
                    };
                    globals
                        .borrow_mut()
                        .define(child.value(), Value::Function(Rc::new(closure)));
                }
                NodeKind::Class => {
                    let superclass = child.find(NodeKind::Extends).and_then(|extends| {
                        match get(&globals, extends.value()) {
                            Value::Class(class) => Some(class),
                            _ => None,
                        }
                    });

                    let class = ClassValue {
                        name: child.value().to_string(),
                        node: child,
                        superclass,
                        env: globals.clone(),
                    };
                    globals
                        .borrow_mut()
                        .define(child.value(), Value::Class(Rc::new(class)));
                }
                _ => {}
            }
        }
    }

    /// Calls a function or bound method with already evaluated argument slots.
    pub fn call(&mut self, closure: &Closure<'p>, args: Vec<Slot<'p>>) -> Result<Value<'p>, Error> {
        let node = closure.node;

        let Some(body) = node.body() else {
            self.report(ErrorImpl::NotImplemented {
                function: node.value().to_string(),
            });
            return Ok(Value::Null);
        };

        tracing::trace!(function = node.value(), args = args.len(), "call");

        let env = match &closure.receiver {
            Some(receiver) => self.receiver_env(receiver, &closure.env),
            None => closure.env.clone(),
        };
        let frame = Environment::child(&env);
        self.bind_parameters(node, &frame, args)?;

        let value = match exec_block(self, body, &frame)? {
            Flow::Return(value) => value,
            Flow::Normal => Value::Null,
        };

        Ok(match node.type_node() {
            Some(type_node) => Value::convert(&type_node.type_name(), value),
            None => value,
        })
    }

    /// Reference parameters alias the argument slot; value parameters get a copy.
    fn bind_parameters(&mut self, node: &'p Node, frame: &Env<'p>, args: Vec<Slot<'p>>) -> Result<(), Error> {
        for (param, arg) in node.params().iter().zip(args) {
            let type_node = param.type_node();

            if type_node.is_some_and(Node::is_reference) {
                frame.borrow_mut().alias(param.value(), arg);
                continue;
            }

            let value = arg.borrow().clone();
            let value = match value {
                Value::Instance(instance) => Value::Instance(self.copy_instance(&instance)?),
                value => {
                    let type_name = type_node.map(Node::type_name).unwrap_or_default();
                    Value::convert(&type_name, value)
                }
            };
            frame.borrow_mut().define(param.value(), value);
        }

        Ok(())
    }

    /// The environment a method body sees: `this`, the receiver's attributes and
    /// its methods, most derived declaration winning.
    fn receiver_env(&self, receiver: &Rc<Instance<'p>>, parent: &Env<'p>) -> Env<'p> {
        let env = Environment::child(parent);

        {
            let mut scope = env.borrow_mut();
            scope.define("this", Value::Instance(receiver.clone()));

            for (name, attribute) in receiver.attributes.iter() {
                scope.alias(name.clone(), attribute.clone());
            }

            for class in receiver.class.chain().iter().rev() {
                for method in class.methods() {
                    if method.body().is_none() && scope.has_local(method.value()) {
                        continue;
                    }

                    let closure = Closure {
                        node: method,
                        env: class.env.clone(),
                        receiver: Some(receiver.clone()),
                    };
                    scope.define(method.value(), Value::Function(Rc::new(closure)));
                }
            }
        }

        env
    }

    /// Allocates an instance of `class` and runs its constructor chain.
    pub fn construct(&mut self, class: &Rc<ClassValue<'p>>, args: Vec<Slot<'p>>) -> Result<Rc<Instance<'p>>, Error> {
        let instance = Rc::new(self.allocate(class)?);
        self.run_constructor(&instance, class, args)?;
        Ok(instance)
    }

    /// Initialises the attributes of every class in the chain, base first.
    fn allocate(&mut self, class: &Rc<ClassValue<'p>>) -> Result<Instance<'p>, Error> {
        let mut attributes = HashMap::new();

        for ancestor in class.chain().iter().rev() {
            let scratch = Environment::child(&ancestor.env);
            for attribute in ancestor.attributes() {
                if holds_own_hierarchy(ancestor, attribute) {
                    scratch.borrow_mut().define(attribute.value(), Value::Null);
                    continue;
                }
                exec_statement(self, attribute, &scratch)?;
            }
            attributes.extend(scratch.borrow_mut().take_values());
        }

        Ok(Instance {
            class: class.clone(),
            attributes,
        })
    }

    fn run_constructor(
        &mut self,
        instance: &Rc<Instance<'p>>,
        class: &Rc<ClassValue<'p>>,
        args: Vec<Slot<'p>>,
    ) -> Result<(), Error> {
        // A single argument of this class selects the copy constructor
        let source = match args.as_slice() {
            [only] => match &*only.borrow() {
                Value::Instance(source) if source.class.is_a(&class.name) => Some(source.clone()),
                _ => None,
            },
            _ => None,
        };
        let role = match source {
            Some(_) => FunctionRole::CopyConstructor,
            None => FunctionRole::Constructor,
        };

        let Some(constructor) = class.special(role) else {
            if let Some(base) = &class.superclass {
                self.run_constructor(instance, base, vec![])?;
            }
            return Ok(());
        };

        tracing::debug!(class = %class.name, role = role.describe(), "constructing");

        let env = self.receiver_env(instance, &class.env);
        let frame = Environment::child(&env);
        self.bind_parameters(constructor, &frame, args)?;

        if let (true, Some(source)) = (constructor.is_synthesized(), &source) {
            self.copy_attributes(class, instance, source)?;
        }

        if let Some(base) = &class.superclass {
            let args = match constructor.find(NodeKind::BaseInit) {
                Some(init) => init
                    .args()
                    .iter()
                    .map(|arg| eval_argument(self, arg, &frame))
                    .collect::<Result<Vec<_>, _>>()?,
                None => vec![],
            };
            self.run_constructor(instance, base, args)?;
        }

        if let Some(body) = constructor.body() {
            exec_block(self, body, &frame)?;
        }

        Ok(())
    }

    /// Memberwise copy of the attributes `class` itself declares.
    fn copy_attributes(
        &mut self,
        class: &ClassValue<'p>,
        target: &Instance<'p>,
        source: &Instance<'p>,
    ) -> Result<(), Error> {
        for attribute in class.attributes() {
            let (Ok(to), Ok(from)) = (
                target.attribute(attribute.value()),
                source.attribute(attribute.value()),
            ) else {
                continue;
            };

            let value = from.borrow().clone();
            let value = self.copy_value(value)?;
            *to.borrow_mut() = value;
        }

        Ok(())
    }

    /// Deep copy: instances are copy-constructed, arrays copied element by element.
    pub fn copy_value(&mut self, value: Value<'p>) -> Result<Value<'p>, Error> {
        match value {
            Value::Instance(instance) => Ok(Value::Instance(self.copy_instance(&instance)?)),
            Value::Array(array) => {
                let (name, dimensions, values) = {
                    let array = array.borrow();
                    let values = array
                        .elements
                        .iter()
                        .map(|element| element.borrow().clone())
                        .collect::<Vec<_>>();
                    (array.name.clone(), array.dimensions.clone(), values)
                };

                let mut elements = Vec::with_capacity(values.len());
                for value in values {
                    elements.push(slot(self.copy_value(value)?));
                }

                Ok(Value::Array(Rc::new(RefCell::new(ArrayValue {
                    name,
                    dimensions,
                    elements,
                }))))
            }
            value => Ok(value),
        }
    }

    pub fn copy_instance(&mut self, source: &Rc<Instance<'p>>) -> Result<Rc<Instance<'p>>, Error> {
        let class = source.class.clone();
        self.construct(&class, vec![slot(Value::Instance(source.clone()))])
    }

    /// Stores `value` into `target`. Objects go through `operator=`; scalars keep the slot's type.
    pub fn assign(&mut self, target: &Slot<'p>, value: Value<'p>) -> Result<(), Error> {
        let current = target.borrow().clone();

        let value = match (current, value) {
            (Value::Instance(target), Value::Instance(source)) => {
                return self.assign_instance(&target, &source);
            }
            (Value::Null, Value::Instance(source)) => Value::Instance(self.copy_instance(&source)?),
            (current, value) => current.coerce(value),
        };

        *target.borrow_mut() = value;
        Ok(())
    }

    /// Runs `operator=`: the nearest user-written one, memberwise copy below it.
    fn assign_instance(&mut self, target: &Rc<Instance<'p>>, source: &Rc<Instance<'p>>) -> Result<(), Error> {
        if Rc::ptr_eq(target, source) {
            return Ok(());
        }

        for class in target.class.chain() {
            match class.special(FunctionRole::AssignOperator) {
                Some(operator) if !operator.is_synthesized() => {
                    let closure = Closure {
                        node: operator,
                        env: class.env.clone(),
                        receiver: Some(target.clone()),
                    };
                    self.call(&closure, vec![slot(Value::Instance(source.clone()))])?;
                    break;
                }
                _ => self.copy_attributes(&class, target, source)?,
            }
        }

        Ok(())
    }

    /// Runs destructors derived then base; each class's object attributes are destroyed after its body.
    pub fn destroy(&mut self, instance: &Rc<Instance<'p>>) -> Result<(), Error> {
        for class in instance.class.chain() {
            if let Some(destructor) = class.special(FunctionRole::Destructor) {
                tracing::debug!(class = %class.name, "destroying");

                let closure = Closure {
                    node: destructor,
                    env: class.env.clone(),
                    receiver: Some(instance.clone()),
                };
                self.call(&closure, vec![])?;
            }

            for attribute in class.attributes().filter(|attribute| owns_object(attribute)) {
                let Ok(member) = instance.attribute(attribute.value()) else {
                    continue;
                };
                let member = member.borrow().clone();
                if let Value::Instance(member) = member {
                    self.destroy(&member)?;
                }
            }
        }

        Ok(())
    }
}

/// An attribute storing an object of `owner`'s own hierarchy by value; it is left null.
fn holds_own_hierarchy(owner: &Rc<ClassValue<'_>>, attribute: &Node) -> bool {
    let Some(type_node) = attribute
        .type_node()
        .filter(|type_node| type_node.kind == NodeKind::ClassType && !type_node.is_reference())
    else {
        return false;
    };

    match get(&owner.env, type_node.value()) {
        Value::Class(class) => class.is_a(&owner.name),
        _ => false,
    }
}

/// A declaration of a class-typed variable that owns its object.
pub fn owns_object(declaration: &Node) -> bool {
    declaration.kind == NodeKind::VarDecl
        && declaration
            .type_node()
            .is_some_and(|type_node| type_node.kind == NodeKind::ClassType && !type_node.is_reference())
}
